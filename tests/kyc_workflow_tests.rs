//! End-to-end checks of the KYC state machine and completion evaluator as
//! they compose on a user document, without a running database.

use lifelink_backend::dto::profile_dto::KycDecision;
use lifelink_backend::model::user::{
    Address, BloodType, KycDocument, KycStatus, MedicalInfo, User,
};
use lifelink_backend::util::notify::kyc_status_notification;

fn donor() -> User {
    User::new("USR-1234567".to_string(), "donor@example.com".to_string())
}

fn fill_profile_except_kyc(user: &mut User) {
    user.name = Some("Asha Rao".to_string());
    user.date_of_birth = Some("1990-04-01".to_string());
    user.gender = Some("female".to_string());
    user.blood_type = BloodType::OPositive;
    user.phone = Some("+91-9999999999".to_string());
    user.address = Address {
        street: Some("12 MG Road".to_string()),
        city: Some("Bengaluru".to_string()),
        state: Some("Karnataka".to_string()),
        postal_code: Some("560001".to_string()),
        country: Some("India".to_string()),
    };
    user.medical_info = MedicalInfo {
        height_cm: Some(165.0),
        weight_kg: Some(60.0),
        ..Default::default()
    };
}

fn upload(user: &mut User, url: &str) {
    user.record_kyc_document(KycDocument {
        url: url.to_string(),
        document_type: Some("aadhar".to_string()),
        uploaded_at: None,
        verified_at: None,
        verified_by: None,
        rejection_reason: None,
    });
    user.refresh_completion();
}

#[test]
fn test_upload_moves_to_pending_but_does_not_complete_profile() {
    let mut user = donor();
    fill_profile_except_kyc(&mut user);
    upload(&mut user, "http://files/aadhar.png");

    assert_eq!(user.kyc_status, KycStatus::Pending);
    assert_eq!(user.profile_completion, 75);
    assert!(!user.profile_completed);
    assert!(!user.profile_completion_details.kyc_verification);
}

#[test]
fn test_approval_completes_profile() {
    let mut user = donor();
    fill_profile_except_kyc(&mut user);
    upload(&mut user, "http://files/aadhar.png");

    // Staff approval flips the whole-profile status and the completion score.
    user.kyc_status = KycStatus::Completed;
    user.refresh_completion();

    assert_eq!(user.profile_completion, 100);
    assert!(user.profile_completed);
    assert!(user.profile_completion_details.kyc_verification);
}

#[test]
fn test_rejection_with_reason_keeps_completion_unchanged() {
    let mut user = donor();
    fill_profile_except_kyc(&mut user);
    upload(&mut user, "http://files/aadhar.png");
    let completion_before = user.profile_completion;

    let decision = KycDecision::parse("rejected", Some("blurry image")).expect("decision");
    let reason = match decision {
        KycDecision::Reject { reason } => reason,
        KycDecision::Approve => panic!("expected rejection"),
    };

    user.kyc_status = KycStatus::Rejected;
    if let Some(document) = user.kyc_document.as_mut() {
        document.rejection_reason = Some(reason.clone());
    }

    let draft = kyc_status_notification(KycStatus::Rejected, Some(&reason));
    assert!(draft.message.contains("blurry image"));
    assert_eq!(user.kyc_status, KycStatus::Rejected);
    assert_eq!(user.profile_completion, completion_before);
}

#[test]
fn test_rejection_after_approval_leaves_completion_untouched() {
    let mut user = donor();
    fill_profile_except_kyc(&mut user);
    upload(&mut user, "http://files/aadhar.png");
    user.kyc_status = KycStatus::Completed;
    user.refresh_completion();
    assert_eq!(user.profile_completion, 100);
    assert!(user.profile_completed);

    // A later rejection changes the status and reason but never recomputes
    // the score; the stale 100% is inherited behavior.
    user.kyc_status = KycStatus::Rejected;
    if let Some(document) = user.kyc_document.as_mut() {
        document.rejection_reason = Some("document expired".to_string());
    }

    assert_eq!(user.kyc_status, KycStatus::Rejected);
    assert_eq!(user.profile_completion, 100);
    assert!(user.profile_completed);
}

#[test]
fn test_rejection_without_reason_never_parses() {
    assert!(KycDecision::parse("rejected", None).is_err());
    assert!(KycDecision::parse("rejected", Some("")).is_err());
}

#[test]
fn test_reupload_after_rejection_keeps_rejected_status() {
    let mut user = donor();
    upload(&mut user, "http://files/first.png");
    user.kyc_status = KycStatus::Rejected;

    upload(&mut user, "http://files/second.png");

    // Inherited behavior: only not_submitted promotes to pending.
    assert_eq!(user.kyc_status, KycStatus::Rejected);
    // The mirror and latest document still follow the new upload.
    assert_eq!(
        user.kyc_documents.aadhar_card.as_ref().map(|a| a.url.as_str()),
        Some("http://files/second.png")
    );
    assert_eq!(
        user.kyc_document.as_ref().map(|d| d.url.as_str()),
        Some("http://files/second.png")
    );
}

#[test]
fn test_mirror_matches_document_after_every_upload() {
    let mut user = donor();
    for i in 0..4 {
        upload(&mut user, &format!("http://files/doc-{}.png", i));
        assert_eq!(
            user.kyc_documents.aadhar_card.as_ref().map(|a| a.url.as_str()),
            user.kyc_document.as_ref().map(|d| d.url.as_str())
        );
    }
    assert_eq!(user.kyc_documents.items.len(), 4);
}
