use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::user::{BloodType, DonationHistoryEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationType {
    Blood,
    Organ,
    Tissue,
    Other,
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationType::Blood => "Blood",
            DonationType::Organ => "Organ",
            DonationType::Tissue => "Tissue",
            DonationType::Other => "Other",
        }
    }

    /// Prefix used when generating `donation_id` values.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            DonationType::Blood => "BD",
            DonationType::Organ => "OD",
            DonationType::Tissue | DonationType::Other => "DN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "blood" => Some(DonationType::Blood),
            "organ" => Some(DonationType::Organ),
            "tissue" => Some(DonationType::Tissue),
            "other" => Some(DonationType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Approved,
    Processing,
    Completed,
    Rejected,
    Cancelled,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Approved => "approved",
            DonationStatus::Processing => "processing",
            DonationStatus::Completed => "completed",
            DonationStatus::Rejected => "rejected",
            DonationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(DonationStatus::Pending),
            "approved" => Some(DonationStatus::Approved),
            "processing" => Some(DonationStatus::Processing),
            "completed" => Some(DonationStatus::Completed),
            "rejected" => Some(DonationStatus::Rejected),
            "cancelled" => Some(DonationStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    /// Type-prefixed id, e.g. `BD-1234567`
    pub donation_id: String,
    /// Owning user's `user_id` string; denormalized, not a DBRef
    pub user_id: String,
    pub donation_type: DonationType,
    pub status: DonationStatus,
    pub donor_name: Option<String>,
    pub blood_type: Option<BloodType>,
    pub organ: Option<String>,
    /// Blood units or grams of tissue, free-form per type
    pub quantity: Option<f64>,
    pub hospital: Option<String>,
    pub donation_date: Option<String>,
    pub medical_notes: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Donation {
    /// Apply a status transition, carrying over reviewer notes when provided.
    pub fn apply_transition(&mut self, status: DonationStatus, notes: Option<String>) {
        self.status = status;
        if notes.is_some() {
            self.notes = notes;
        }
    }

    /// Cached summary entry pushed onto the owner's `donation_history`.
    pub fn history_entry(&self) -> DonationHistoryEntry {
        DonationHistoryEntry {
            donation_id: self.donation_id.clone(),
            donation_type: self.donation_type.as_str().to_string(),
            date: self.donation_date.clone(),
            hospital: self.hospital.clone(),
            status: self.status.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_prefix_by_type() {
        assert_eq!(DonationType::Blood.id_prefix(), "BD");
        assert_eq!(DonationType::Organ.id_prefix(), "OD");
        assert_eq!(DonationType::Tissue.id_prefix(), "DN");
        assert_eq!(DonationType::Other.id_prefix(), "DN");
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            DonationStatus::Pending,
            DonationStatus::Approved,
            DonationStatus::Processing,
            DonationStatus::Completed,
            DonationStatus::Rejected,
            DonationStatus::Cancelled,
        ] {
            assert_eq!(DonationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DonationStatus::parse("shipped"), None);
    }

    #[test]
    fn test_history_entry_mirrors_donation() {
        let donation = Donation {
            id: None,
            donation_id: "BD-7654321".to_string(),
            user_id: "USR-1111111".to_string(),
            donation_type: DonationType::Blood,
            status: DonationStatus::Pending,
            donor_name: None,
            blood_type: None,
            organ: None,
            quantity: Some(1.0),
            hospital: Some("City Hospital".to_string()),
            donation_date: Some("2026-08-01".to_string()),
            medical_notes: None,
            notes: None,
            created_at: None,
            updated_at: None,
        };
        let entry = donation.history_entry();
        assert_eq!(entry.donation_id, "BD-7654321");
        assert_eq!(entry.donation_type, "Blood");
        assert_eq!(entry.status, "pending");
        assert_eq!(entry.hospital.as_deref(), Some("City Hospital"));
    }
}
