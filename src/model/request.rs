use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::user::BloodType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Blood,
    Organ,
    Tissue,
    Other,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Blood => "blood",
            RequestType::Organ => "organ",
            RequestType::Tissue => "tissue",
            RequestType::Other => "other",
        }
    }

    /// Parse a request type, tolerating the legacy `"Blood Request"` /
    /// `"Organ Request"` strings still sent by older clients.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "blood" | "blood request" => Some(RequestType::Blood),
            "organ" | "organ request" => Some(RequestType::Organ),
            "tissue" => Some(RequestType::Tissue),
            "other" => Some(RequestType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Medium
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }

    /// Normalize urgency values, folding the synonyms the source system
    /// accepted inconsistently (`normal`→medium, `urgent`→high,
    /// `emergency`→critical) into the canonical enum.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Urgency::Low),
            "medium" | "normal" => Some(Urgency::Medium),
            "high" | "urgent" => Some(Urgency::High),
            "critical" | "emergency" => Some(Urgency::Critical),
            _ => None,
        }
    }
}

/// Canonical status rule set; the two drifted enums in the source route files
/// are merged into this single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Matched,
    Fulfilled,
    Completed,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Matched => "matched",
            RequestStatus::Fulfilled => "fulfilled",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(RequestStatus::Pending),
            "matched" => Some(RequestStatus::Matched),
            "fulfilled" => Some(RequestStatus::Fulfilled),
            "completed" => Some(RequestStatus::Completed),
            "rejected" => Some(RequestStatus::Rejected),
            "cancelled" => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }
}

/// One partial or full fulfillment of a request by a donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentEntry {
    pub donor_user_id: String,
    pub donor_name: Option<String>,
    /// Blood units; None for organ/tissue matches
    pub quantity: Option<f64>,
    pub fulfilled_at: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    /// Generated id, e.g. `RQ-1234567`
    pub request_id: String,
    /// Proper reference to the owning user document
    pub user_object_id: Option<ObjectId>,
    /// Redundant string copy of the owner's `user_id`
    pub user_id: String,
    pub request_type: RequestType,
    pub status: RequestStatus,
    #[serde(default)]
    pub urgency: Urgency,
    /// Required iff `request_type == blood`
    pub blood_type: Option<BloodType>,
    /// Required iff `request_type == organ`
    pub organ: Option<String>,
    /// Required iff the request is not for the requester themself
    pub patient_name: Option<String>,
    #[serde(default)]
    pub is_self: bool,
    /// Requested blood units
    pub quantity: Option<f64>,
    pub hospital: Option<String>,
    pub needed_by: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub fulfilled_by: Vec<FulfillmentEntry>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Request {
    /// Sum of fulfilled blood units so far.
    pub fn fulfilled_quantity(&self) -> f64 {
        self.fulfilled_by.iter().filter_map(|f| f.quantity).sum()
    }

    /// Append a fulfillment event and derive the resulting status.
    ///
    /// Blood requests flip to `fulfilled` once the accumulated quantity
    /// reaches the requested quantity; any other request type is matched by a
    /// single fulfillment. There is no rollback path for over-fulfillment.
    pub fn record_fulfillment(&mut self, entry: FulfillmentEntry) -> RequestStatus {
        self.fulfilled_by.push(entry);
        match self.request_type {
            RequestType::Blood => {
                let needed = self.quantity.unwrap_or(0.0);
                if needed > 0.0 && self.fulfilled_quantity() >= needed {
                    self.status = RequestStatus::Fulfilled;
                }
            }
            _ => {
                self.status = RequestStatus::Matched;
            }
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blood_request(quantity: f64) -> Request {
        Request {
            id: None,
            request_id: "RQ-1234567".to_string(),
            user_object_id: None,
            user_id: "USR-1111111".to_string(),
            request_type: RequestType::Blood,
            status: RequestStatus::Pending,
            urgency: Urgency::High,
            blood_type: Some(BloodType::OPositive),
            organ: None,
            patient_name: None,
            is_self: true,
            quantity: Some(quantity),
            hospital: None,
            needed_by: None,
            notes: None,
            fulfilled_by: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn fulfillment(quantity: Option<f64>) -> FulfillmentEntry {
        FulfillmentEntry {
            donor_user_id: "USR-2222222".to_string(),
            donor_name: None,
            quantity,
            fulfilled_at: chrono::Utc::now().to_rfc3339(),
            note: None,
        }
    }

    #[test]
    fn test_blood_request_partial_fulfillment_stays_pending() {
        let mut request = blood_request(3.0);
        let status = request.record_fulfillment(fulfillment(Some(1.0)));
        assert_eq!(status, RequestStatus::Pending);
        assert_eq!(request.fulfilled_quantity(), 1.0);
    }

    #[test]
    fn test_blood_request_fulfilled_at_quantity() {
        let mut request = blood_request(3.0);
        request.record_fulfillment(fulfillment(Some(2.0)));
        let status = request.record_fulfillment(fulfillment(Some(1.0)));
        assert_eq!(status, RequestStatus::Fulfilled);
    }

    #[test]
    fn test_blood_request_over_fulfillment_still_fulfilled() {
        let mut request = blood_request(2.0);
        let status = request.record_fulfillment(fulfillment(Some(5.0)));
        assert_eq!(status, RequestStatus::Fulfilled);
        assert_eq!(request.fulfilled_quantity(), 5.0);
    }

    #[test]
    fn test_organ_request_matched_by_single_fulfillment() {
        let mut request = blood_request(0.0);
        request.request_type = RequestType::Organ;
        request.blood_type = None;
        request.organ = Some("kidney".to_string());
        request.quantity = None;
        let status = request.record_fulfillment(fulfillment(None));
        assert_eq!(status, RequestStatus::Matched);
    }

    #[test]
    fn test_urgency_synonyms_normalize() {
        assert_eq!(Urgency::parse("normal"), Some(Urgency::Medium));
        assert_eq!(Urgency::parse("urgent"), Some(Urgency::High));
        assert_eq!(Urgency::parse("emergency"), Some(Urgency::Critical));
        assert_eq!(Urgency::parse("LOW"), Some(Urgency::Low));
        assert_eq!(Urgency::parse("whenever"), None);
    }

    #[test]
    fn test_legacy_type_strings_normalize() {
        assert_eq!(RequestType::parse("Blood Request"), Some(RequestType::Blood));
        assert_eq!(RequestType::parse("Organ Request"), Some(RequestType::Organ));
        assert_eq!(RequestType::parse("tissue"), Some(RequestType::Tissue));
        assert_eq!(RequestType::parse("plasma"), None);
    }
}
