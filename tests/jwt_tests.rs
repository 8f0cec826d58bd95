use lifelink_backend::config::JwtConfig;
use lifelink_backend::util::jwt::*;

fn create_test_jwt_utils() -> JwtTokenUtilsImpl {
    JwtTokenUtilsImpl::new(JwtConfig::default())
}

#[test]
fn test_token_type_as_str() {
    assert_eq!(TokenType::Access.as_str(), "access");
    assert_eq!(TokenType::Refresh.as_str(), "refresh");
}

#[test]
fn test_generate_and_validate_access_token() {
    let jwt_utils = create_test_jwt_utils();
    let token = jwt_utils
        .generate_access_token("USR-1234567", "donor@example.com", "donor", 0)
        .expect("token generation");

    let claims = jwt_utils.validate_access_token(&token).expect("validation");
    assert_eq!(claims.sub, "USR-1234567");
    assert_eq!(claims.email, "donor@example.com");
    assert_eq!(claims.role, "donor");
    assert_eq!(claims.jwt_version, 0);
    assert_eq!(claims.token_type, "access");
}

#[test]
fn test_claims_carry_jwt_version() {
    let jwt_utils = create_test_jwt_utils();
    let token = jwt_utils
        .generate_access_token("USR-1234567", "donor@example.com", "donor", 7)
        .expect("token generation");
    let claims = jwt_utils.validate_access_token(&token).expect("validation");
    assert_eq!(claims.jwt_version, 7);
}

#[test]
fn test_refresh_token_rejected_as_access() {
    let jwt_utils = create_test_jwt_utils();
    let refresh = jwt_utils
        .generate_refresh_token("USR-1234567", "donor@example.com", "donor", 0)
        .expect("token generation");
    let result = jwt_utils.validate_access_token(&refresh);
    assert!(matches!(result, Err(JwtError::InvalidTokenType { .. })));
}

#[test]
fn test_token_pair_has_bearer_type_and_expiry() {
    let jwt_utils = create_test_jwt_utils();
    let pair = jwt_utils
        .generate_token_pair("USR-1234567", "donor@example.com", "staff", 1)
        .expect("token pair");
    assert_eq!(pair.token_type, "Bearer");
    assert!(pair.expires_in > 0);
    assert_ne!(pair.access_token, pair.refresh_token);
}

#[test]
fn test_tampered_token_is_rejected() {
    let jwt_utils = create_test_jwt_utils();
    let mut token = jwt_utils
        .generate_access_token("USR-1234567", "donor@example.com", "donor", 0)
        .expect("token generation");
    token.push('x');
    assert!(jwt_utils.validate_access_token(&token).is_err());
}

#[test]
fn test_extract_token_from_header() {
    let jwt_utils = create_test_jwt_utils();
    assert_eq!(
        jwt_utils.extract_token_from_header("Bearer abc.def.ghi").unwrap(),
        "abc.def.ghi"
    );
    assert!(jwt_utils.extract_token_from_header("Basic abc").is_err());
    assert!(jwt_utils.extract_token_from_header("Bearer ").is_err());
}
