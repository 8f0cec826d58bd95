use serde::Deserialize;
use validator::Validate;

use crate::model::request::{FulfillmentEntry, Request, RequestStatus, RequestType, Urgency};
use crate::model::user::BloodType;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRequestRequest {
    #[validate(length(min = 2, max = 32))]
    pub request_type: String,
    /// Free-form urgency, normalized (`normal`, `urgent`, `emergency` accepted).
    pub urgency: Option<String>,
    pub blood_type: Option<String>,
    #[validate(length(min = 2, max = 64))]
    pub organ: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub patient_name: Option<String>,
    pub is_self: Option<bool>,
    #[validate(range(min = 0.1))]
    pub quantity: Option<f64>,
    #[validate(length(min = 2, max = 200))]
    pub hospital: Option<String>,
    pub needed_by: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl CreateRequestRequest {
    /// Build an unsaved request for the owning user, normalizing the
    /// shape-varying inputs into closed enums. The `request_id` is left
    /// empty; the service assigns it after the collision check.
    pub fn into_request(self, user_id: &str) -> Result<Request, String> {
        let request_type = RequestType::parse(&self.request_type)
            .ok_or_else(|| format!("Invalid request type: {}", self.request_type))?;

        let urgency = match self.urgency {
            Some(ref raw) => {
                Urgency::parse(raw).ok_or_else(|| format!("Invalid urgency: {}", raw))?
            }
            None => Urgency::default(),
        };

        let blood_type = match self.blood_type {
            Some(ref raw) => Some(
                BloodType::parse(raw).ok_or_else(|| format!("Invalid blood type: {}", raw))?,
            ),
            None => None,
        };

        if request_type == RequestType::Blood && blood_type.is_none() {
            return Err("Blood requests require a blood type".to_string());
        }
        if request_type == RequestType::Organ
            && self.organ.as_deref().map(str::trim).unwrap_or_default().is_empty()
        {
            return Err("Organ requests require an organ".to_string());
        }

        let is_self = self.is_self.unwrap_or(true);
        if !is_self
            && self
                .patient_name
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .is_empty()
        {
            return Err("A patient name is required for third-party requests".to_string());
        }

        Ok(Request {
            id: None,
            request_id: String::new(),
            user_object_id: None,
            user_id: user_id.to_string(),
            request_type,
            status: RequestStatus::Pending,
            urgency,
            blood_type,
            organ: self.organ,
            patient_name: self.patient_name,
            is_self,
            quantity: self.quantity,
            hospital: self.hospital,
            needed_by: self.needed_by,
            notes: self.notes,
            fulfilled_by: Vec::new(),
            created_at: None,
            updated_at: None,
        })
    }
}

/// Owner-editable request fields. Type, `is_self` and status stay fixed;
/// fulfillments arrive through the fulfill endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRequestDetailsRequest {
    pub urgency: Option<String>,
    pub blood_type: Option<String>,
    #[validate(length(min = 2, max = 64))]
    pub organ: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub patient_name: Option<String>,
    #[validate(range(min = 0.1))]
    pub quantity: Option<f64>,
    #[validate(length(min = 2, max = 200))]
    pub hospital: Option<String>,
    pub needed_by: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl UpdateRequestDetailsRequest {
    pub fn apply_to(self, request: &mut Request) -> Result<(), String> {
        if let Some(ref raw) = self.urgency {
            request.urgency =
                Urgency::parse(raw).ok_or_else(|| format!("Invalid urgency: {}", raw))?;
        }
        if let Some(ref raw) = self.blood_type {
            let parsed = BloodType::parse(raw).ok_or_else(|| format!("Invalid blood type: {}", raw))?;
            request.blood_type = Some(parsed);
        }
        if self.organ.is_some() {
            request.organ = self.organ;
        }
        if self.patient_name.is_some() {
            request.patient_name = self.patient_name;
        }
        if self.quantity.is_some() {
            request.quantity = self.quantity;
        }
        if self.hospital.is_some() {
            request.hospital = self.hospital;
        }
        if self.needed_by.is_some() {
            request.needed_by = self.needed_by;
        }
        if self.notes.is_some() {
            request.notes = self.notes;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRequestStatusRequest {
    #[validate(length(min = 2, max = 32))]
    pub status: String,
}

impl UpdateRequestStatusRequest {
    pub fn parse_status(&self) -> Result<RequestStatus, String> {
        RequestStatus::parse(&self.status)
            .ok_or_else(|| format!("Invalid request status: {}", self.status))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FulfillRequestRequest {
    #[validate(length(min = 3, max = 32))]
    pub donor_user_id: String,
    #[validate(length(min = 2, max = 100))]
    pub donor_name: Option<String>,
    #[validate(range(min = 0.1))]
    pub quantity: Option<f64>,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

impl FulfillRequestRequest {
    pub fn into_entry(self) -> FulfillmentEntry {
        FulfillmentEntry {
            donor_user_id: self.donor_user_id,
            donor_name: self.donor_name,
            quantity: self.quantity,
            fulfilled_at: chrono::Utc::now().to_rfc3339(),
            note: self.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blood_request() -> CreateRequestRequest {
        CreateRequestRequest {
            request_type: "Blood Request".to_string(),
            urgency: Some("urgent".to_string()),
            blood_type: Some("AB-".to_string()),
            organ: None,
            patient_name: None,
            is_self: Some(true),
            quantity: Some(2.0),
            hospital: None,
            needed_by: None,
            notes: None,
        }
    }

    #[test]
    fn test_legacy_type_and_urgency_normalize_at_boundary() {
        let request = blood_request().into_request("USR-1").expect("request");
        assert_eq!(request.request_type, RequestType::Blood);
        assert_eq!(request.urgency, Urgency::High);
        assert_eq!(request.blood_type, Some(BloodType::AbNegative));
    }

    #[test]
    fn test_missing_urgency_defaults_to_medium() {
        let mut raw = blood_request();
        raw.urgency = None;
        let request = raw.into_request("USR-1").expect("request");
        assert_eq!(request.urgency, Urgency::Medium);
    }

    #[test]
    fn test_third_party_request_requires_patient_name() {
        let mut raw = blood_request();
        raw.is_self = Some(false);
        assert!(raw.clone().into_request("USR-1").is_err());
        raw.patient_name = Some("Ravi Kumar".to_string());
        assert!(raw.into_request("USR-1").is_ok());
    }

    #[test]
    fn test_details_update_normalizes_urgency() {
        let mut request = blood_request().into_request("USR-1").expect("request");
        let update = UpdateRequestDetailsRequest {
            urgency: Some("emergency".to_string()),
            quantity: Some(4.0),
            ..Default::default()
        };
        update.apply_to(&mut request).expect("apply");
        assert_eq!(request.urgency, Urgency::Critical);
        assert_eq!(request.quantity, Some(4.0));
        assert_eq!(request.blood_type, Some(BloodType::AbNegative));
    }

    #[test]
    fn test_organ_request_requires_organ() {
        let mut raw = blood_request();
        raw.request_type = "organ".to_string();
        raw.blood_type = None;
        raw.organ = Some("  ".to_string());
        assert!(raw.into_request("USR-1").is_err());
    }
}
