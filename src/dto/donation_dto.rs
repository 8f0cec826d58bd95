use serde::Deserialize;
use validator::Validate;

use crate::model::donation::{Donation, DonationStatus, DonationType};
use crate::model::user::BloodType;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDonationRequest {
    #[validate(length(min = 2, max = 32))]
    pub donation_type: String,
    pub blood_type: Option<String>,
    #[validate(length(min = 2, max = 64))]
    pub organ: Option<String>,
    #[validate(range(min = 0.1))]
    pub quantity: Option<f64>,
    #[validate(length(min = 2, max = 200))]
    pub hospital: Option<String>,
    pub donation_date: Option<String>,
    #[validate(length(max = 2000))]
    pub medical_notes: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl CreateDonationRequest {
    /// Build an unsaved donation for the owning user. The `donation_id` is
    /// left empty; the service assigns it after the collision check.
    pub fn into_donation(self, user_id: &str, donor_name: Option<String>) -> Result<Donation, String> {
        let donation_type = DonationType::parse(&self.donation_type)
            .ok_or_else(|| format!("Invalid donation type: {}", self.donation_type))?;

        let blood_type = match self.blood_type {
            Some(ref raw) => Some(
                BloodType::parse(raw).ok_or_else(|| format!("Invalid blood type: {}", raw))?,
            ),
            None => None,
        };

        if donation_type == DonationType::Blood && blood_type.is_none() {
            return Err("Blood donations require a blood type".to_string());
        }
        if donation_type == DonationType::Organ
            && self.organ.as_deref().map(str::trim).unwrap_or_default().is_empty()
        {
            return Err("Organ donations require an organ".to_string());
        }

        Ok(Donation {
            id: None,
            donation_id: String::new(),
            user_id: user_id.to_string(),
            donation_type,
            status: DonationStatus::Pending,
            donor_name,
            blood_type,
            organ: self.organ,
            quantity: self.quantity,
            hospital: self.hospital,
            donation_date: self.donation_date,
            medical_notes: self.medical_notes,
            notes: self.notes,
            created_at: None,
            updated_at: None,
        })
    }
}

/// Owner-editable donation fields. Type and status are fixed after
/// creation; those change through their own endpoints.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDonationDetailsRequest {
    pub blood_type: Option<String>,
    #[validate(length(min = 2, max = 64))]
    pub organ: Option<String>,
    #[validate(range(min = 0.1))]
    pub quantity: Option<f64>,
    #[validate(length(min = 2, max = 200))]
    pub hospital: Option<String>,
    pub donation_date: Option<String>,
    #[validate(length(max = 2000))]
    pub medical_notes: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl UpdateDonationDetailsRequest {
    pub fn apply_to(self, donation: &mut Donation) -> Result<(), String> {
        if let Some(ref raw) = self.blood_type {
            let parsed = BloodType::parse(raw).ok_or_else(|| format!("Invalid blood type: {}", raw))?;
            donation.blood_type = Some(parsed);
        }
        if self.organ.is_some() {
            donation.organ = self.organ;
        }
        if self.quantity.is_some() {
            donation.quantity = self.quantity;
        }
        if self.hospital.is_some() {
            donation.hospital = self.hospital;
        }
        if self.donation_date.is_some() {
            donation.donation_date = self.donation_date;
        }
        if self.medical_notes.is_some() {
            donation.medical_notes = self.medical_notes;
        }
        if self.notes.is_some() {
            donation.notes = self.notes;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDonationStatusRequest {
    #[validate(length(min = 2, max = 32))]
    pub status: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl UpdateDonationStatusRequest {
    pub fn parse_status(&self) -> Result<DonationStatus, String> {
        DonationStatus::parse(&self.status)
            .ok_or_else(|| format!("Invalid donation status: {}", self.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blood_request() -> CreateDonationRequest {
        CreateDonationRequest {
            donation_type: "blood".to_string(),
            blood_type: Some("O+".to_string()),
            organ: None,
            quantity: Some(1.0),
            hospital: Some("City Hospital".to_string()),
            donation_date: None,
            medical_notes: None,
            notes: None,
        }
    }

    #[test]
    fn test_blood_donation_requires_blood_type() {
        let mut request = blood_request();
        request.blood_type = None;
        assert!(request.into_donation("USR-1", None).is_err());
    }

    #[test]
    fn test_organ_donation_requires_organ() {
        let mut request = blood_request();
        request.donation_type = "organ".to_string();
        request.blood_type = None;
        request.organ = None;
        assert!(request.into_donation("USR-1", None).is_err());
    }

    #[test]
    fn test_details_update_only_touches_provided_fields() {
        let mut donation = blood_request().into_donation("USR-1", None).expect("donation");
        let update = UpdateDonationDetailsRequest {
            hospital: Some("Regional Center".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut donation).expect("apply");
        assert_eq!(donation.hospital.as_deref(), Some("Regional Center"));
        assert_eq!(donation.quantity, Some(1.0));
        assert_eq!(donation.blood_type, Some(BloodType::OPositive));
    }

    #[test]
    fn test_details_update_rejects_bad_blood_type() {
        let mut donation = blood_request().into_donation("USR-1", None).expect("donation");
        let update = UpdateDonationDetailsRequest {
            blood_type: Some("Z+".to_string()),
            ..Default::default()
        };
        assert!(update.apply_to(&mut donation).is_err());
    }

    #[test]
    fn test_new_donation_starts_pending_without_id() {
        let donation = blood_request().into_donation("USR-1", Some("Asha Rao".to_string())).expect("donation");
        assert_eq!(donation.status, DonationStatus::Pending);
        assert!(donation.donation_id.is_empty());
        assert_eq!(donation.user_id, "USR-1");
        assert_eq!(donation.donor_name.as_deref(), Some("Asha Rao"));
    }
}
