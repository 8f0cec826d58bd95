//! Profile completion evaluator.
//!
//! Pure derivation of the 4-section completion score from a user document.
//! Missing or empty fields count as "not complete"; nothing here can fail.
//! Callers re-run the evaluator after every mutation of a tracked field and
//! persist its output, keeping `profile_completed == (percentage == 100)`.

use serde::Serialize;

use crate::model::user::{BloodType, CompletionDetails, KycStatus, User};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionReport {
    pub percentage: u8,
    pub details: CompletionDetails,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

/// Compute the completion report for a user.
pub fn evaluate_completion(user: &User) -> CompletionReport {
    let basic_info = present(&user.name)
        && present(&user.date_of_birth)
        && present(&user.gender)
        && user.blood_type != BloodType::Unknown;

    let contact_info = present(&user.phone)
        && present(&user.address.street)
        && present(&user.address.city)
        && present(&user.address.state)
        && present(&user.address.postal_code);

    let medical_info = user.medical_info.height_cm.is_some() && user.medical_info.weight_kg.is_some();

    let kyc_verification = user.kyc_status == KycStatus::Completed;

    let details = CompletionDetails {
        basic_info,
        contact_info,
        medical_info,
        kyc_verification,
    };

    let count = [basic_info, contact_info, medical_info, kyc_verification]
        .iter()
        .filter(|b| **b)
        .count() as u32;

    CompletionReport {
        percentage: (count * 100 / 4) as u8,
        details,
    }
}

impl User {
    /// Persist a completion report onto the cached fields.
    pub fn apply_completion(&mut self, report: CompletionReport) {
        self.profile_completion = report.percentage;
        self.profile_completion_details = report.details;
        self.profile_completed = report.percentage == 100;
    }

    /// Recompute and apply in one step; returns the report for callers that
    /// want to react to milestones.
    pub fn refresh_completion(&mut self) -> CompletionReport {
        let report = evaluate_completion(self);
        self.apply_completion(report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::{Address, MedicalInfo};

    fn empty_user() -> User {
        User::new("USR-0000001".to_string(), "u@example.com".to_string())
    }

    fn with_basic_info(user: &mut User) {
        user.name = Some("Asha Rao".to_string());
        user.date_of_birth = Some("1990-04-01".to_string());
        user.gender = Some("female".to_string());
        user.blood_type = BloodType::OPositive;
    }

    fn with_contact_info(user: &mut User) {
        user.phone = Some("+91-9999999999".to_string());
        user.address = Address {
            street: Some("12 MG Road".to_string()),
            city: Some("Bengaluru".to_string()),
            state: Some("Karnataka".to_string()),
            postal_code: Some("560001".to_string()),
            country: None,
        };
    }

    fn with_medical_info(user: &mut User) {
        user.medical_info = MedicalInfo {
            height_cm: Some(165.0),
            weight_kg: Some(60.0),
            ..Default::default()
        };
    }

    #[test]
    fn test_empty_user_is_zero_percent() {
        let user = empty_user();
        let report = evaluate_completion(&user);
        assert_eq!(report.percentage, 0);
        assert_eq!(report.details, CompletionDetails::default());
    }

    #[test]
    fn test_basic_info_only_is_25_percent() {
        let mut user = empty_user();
        with_basic_info(&mut user);
        let report = evaluate_completion(&user);
        assert_eq!(report.percentage, 25);
        assert!(report.details.basic_info);
        assert!(!report.details.contact_info);
        assert!(!report.details.medical_info);
        assert!(!report.details.kyc_verification);
    }

    #[test]
    fn test_unknown_blood_type_blocks_basic_info() {
        let mut user = empty_user();
        with_basic_info(&mut user);
        user.blood_type = BloodType::Unknown;
        let report = evaluate_completion(&user);
        assert!(!report.details.basic_info);
        assert_eq!(report.percentage, 0);
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let mut user = empty_user();
        with_basic_info(&mut user);
        user.gender = Some("   ".to_string());
        let report = evaluate_completion(&user);
        assert!(!report.details.basic_info);
    }

    #[test]
    fn test_all_sections_is_100_percent() {
        let mut user = empty_user();
        with_basic_info(&mut user);
        with_contact_info(&mut user);
        with_medical_info(&mut user);
        user.kyc_status = KycStatus::Completed;
        let report = evaluate_completion(&user);
        assert_eq!(report.percentage, 100);
        assert!(report.details.basic_info);
        assert!(report.details.contact_info);
        assert!(report.details.medical_info);
        assert!(report.details.kyc_verification);
    }

    #[test]
    fn test_profile_completed_iff_100() {
        let mut user = empty_user();
        with_basic_info(&mut user);
        with_contact_info(&mut user);
        with_medical_info(&mut user);
        user.refresh_completion();
        assert_eq!(user.profile_completion, 75);
        assert!(!user.profile_completed);

        user.kyc_status = KycStatus::Completed;
        user.refresh_completion();
        assert_eq!(user.profile_completion, 100);
        assert!(user.profile_completed);
    }

    #[test]
    fn test_kyc_rejection_does_not_complete() {
        let mut user = empty_user();
        user.kyc_status = KycStatus::Rejected;
        let report = evaluate_completion(&user);
        assert!(!report.details.kyc_verification);
    }
}
