use lifelink_backend::util::password::{PasswordUtils, PasswordUtilsImpl};

#[test]
fn test_hash_and_verify_round_trip() {
    let hash = PasswordUtilsImpl::hash_password("Str0ngPass").expect("hash");
    assert!(hash.starts_with("$argon2"));
    assert!(PasswordUtilsImpl::verify_password("Str0ngPass", &hash).expect("verify"));
}

#[test]
fn test_wrong_password_does_not_verify() {
    let hash = PasswordUtilsImpl::hash_password("Str0ngPass").expect("hash");
    assert!(!PasswordUtilsImpl::verify_password("WrongPass1", &hash).expect("verify"));
}

#[test]
fn test_same_password_hashes_differently() {
    let first = PasswordUtilsImpl::hash_password("Str0ngPass").expect("hash");
    let second = PasswordUtilsImpl::hash_password("Str0ngPass").expect("hash");
    assert_ne!(first, second);
}

#[test]
fn test_invalid_hash_format_is_an_error() {
    assert!(PasswordUtilsImpl::verify_password("whatever", "not-a-hash").is_err());
}

#[test]
fn test_password_strength_rules() {
    assert!(PasswordUtilsImpl::validate_password_strength("Str0ngPass").is_ok());

    let errors = PasswordUtilsImpl::validate_password_strength("short").unwrap_err();
    assert!(!errors.is_empty());

    assert!(PasswordUtilsImpl::validate_password_strength("alllowercase1").is_err());
    assert!(PasswordUtilsImpl::validate_password_strength("ALLUPPERCASE1").is_err());
    assert!(PasswordUtilsImpl::validate_password_strength("NoDigitsHere").is_err());
}
