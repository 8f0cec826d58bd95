use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::user::{
    Address, BloodType, CompletionDetails, DocumentStatus, DonationHistoryEntry, KycDocument,
    KycDocuments, KycStatus, MedicalInfo, Roles, User,
};

/// User document with credentials and internal fields stripped, as returned
/// by the profile and staff endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub user_id: String,
    pub email: String,
    pub roles: Roles,
    pub staff_approval: bool,
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub blood_type: BloodType,
    pub phone: Option<String>,
    pub address: Address,
    pub medical_info: MedicalInfo,
    pub kyc_status: KycStatus,
    pub kyc_document: Option<KycDocument>,
    pub kyc_documents: KycDocuments,
    pub profile_completion: u8,
    pub profile_completion_details: CompletionDetails,
    pub profile_completed: bool,
    pub donation_history: Vec<DonationHistoryEntry>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            user_id: user.user_id,
            email: user.email,
            roles: user.roles,
            staff_approval: user.staff_approval,
            name: user.name,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            blood_type: user.blood_type,
            phone: user.phone,
            address: user.address,
            medical_info: user.medical_info,
            kyc_status: user.kyc_status,
            kyc_document: user.kyc_document,
            kyc_documents: user.kyc_documents,
            profile_completion: user.profile_completion,
            profile_completion_details: user.profile_completion_details,
            profile_completed: user.profile_completed,
            donation_history: user.donation_history,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Whitelisted profile mutation; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub gender: Option<String>,
    /// Parsed against the closed blood type list; invalid values are a 400.
    pub blood_type: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub medical_info: Option<MedicalInfo>,
}

impl UpdateProfileRequest {
    /// Apply the whitelisted fields onto a user document. Returns an error
    /// message for an unparseable blood type.
    pub fn apply_to(&self, user: &mut User) -> Result<(), String> {
        if let Some(ref blood_type) = self.blood_type {
            match BloodType::parse(blood_type) {
                Some(parsed) => user.blood_type = parsed,
                None => return Err(format!("Invalid blood type: {}", blood_type)),
            }
        }
        if let Some(ref name) = self.name {
            user.name = Some(name.clone());
        }
        if let Some(ref date_of_birth) = self.date_of_birth {
            user.date_of_birth = Some(date_of_birth.clone());
        }
        if let Some(ref gender) = self.gender {
            user.gender = Some(gender.clone());
        }
        if let Some(ref phone) = self.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(ref address) = self.address {
            user.address = address.clone();
        }
        if let Some(ref medical_info) = self.medical_info {
            user.medical_info = medical_info.clone();
        }
        Ok(())
    }
}

/// JSON alternative to the multipart upload: the client already hosts the
/// document somewhere and submits its URL.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KycUploadLinkRequest {
    #[validate(url)]
    pub url: String,
    #[validate(length(min = 2, max = 64))]
    pub document_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KycReviewRequest {
    #[validate(length(min = 2, max = 32))]
    pub status: String,
    pub rejection_reason: Option<String>,
}

/// Parsed staff verdict on a KYC submission. A rejection without a non-blank
/// reason never makes it past parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum KycDecision {
    Approve,
    Reject { reason: String },
}

impl KycDecision {
    pub fn parse(status: &str, rejection_reason: Option<&str>) -> Result<Self, String> {
        match status.trim().to_lowercase().as_str() {
            "completed" | "approved" => Ok(KycDecision::Approve),
            "rejected" => {
                let reason = rejection_reason.map(str::trim).unwrap_or_default();
                if reason.is_empty() {
                    Err("A rejection reason is required when rejecting KYC".to_string())
                } else {
                    Ok(KycDecision::Reject { reason: reason.to_string() })
                }
            }
            other => Err(format!("Invalid KYC review status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DocumentReviewRequest {
    #[validate(length(min = 2, max = 32))]
    pub status: String,
    pub rejection_reason: Option<String>,
}

impl DocumentReviewRequest {
    pub fn parse_status(&self) -> Result<DocumentStatus, String> {
        DocumentStatus::parse(&self.status)
            .ok_or_else(|| format!("Invalid document status: {}", self.status))
            .and_then(|status| {
                if status == DocumentStatus::Rejected
                    && self
                        .rejection_reason
                        .as_deref()
                        .map(str::trim)
                        .unwrap_or_default()
                        .is_empty()
                {
                    Err("A rejection reason is required when rejecting a document".to_string())
                } else {
                    Ok(status)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kyc_decision_approve_synonyms() {
        assert_eq!(KycDecision::parse("completed", None), Ok(KycDecision::Approve));
        assert_eq!(KycDecision::parse("Approved", None), Ok(KycDecision::Approve));
    }

    #[test]
    fn test_kyc_decision_reject_requires_reason() {
        assert!(KycDecision::parse("rejected", None).is_err());
        assert!(KycDecision::parse("rejected", Some("   ")).is_err());
        assert_eq!(
            KycDecision::parse("rejected", Some("blurry image")),
            Ok(KycDecision::Reject { reason: "blurry image".to_string() })
        );
    }

    #[test]
    fn test_kyc_decision_unknown_status_rejected() {
        assert!(KycDecision::parse("pending", None).is_err());
    }

    #[test]
    fn test_update_profile_invalid_blood_type_is_rejected() {
        let mut user = User::new("USR-1".to_string(), "u@example.com".to_string());
        let request = UpdateProfileRequest {
            blood_type: Some("purple".to_string()),
            ..Default::default()
        };
        assert!(request.apply_to(&mut user).is_err());
    }

    #[test]
    fn test_update_profile_applies_only_present_fields() {
        let mut user = User::new("USR-1".to_string(), "u@example.com".to_string());
        user.name = Some("Old Name".to_string());
        let request = UpdateProfileRequest {
            phone: Some("+91-9999999999".to_string()),
            ..Default::default()
        };
        request.apply_to(&mut user).expect("apply");
        assert_eq!(user.name.as_deref(), Some("Old Name"));
        assert_eq!(user.phone.as_deref(), Some("+91-9999999999"));
    }
}
