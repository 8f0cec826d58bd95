use lifelink_backend::dto::request_dto::{CreateRequestRequest, FulfillRequestRequest};
use lifelink_backend::model::request::{RequestStatus, RequestType, Urgency};
use lifelink_backend::util::ids::generate_request_id;

fn blood_request_payload() -> CreateRequestRequest {
    CreateRequestRequest {
        request_type: "blood".to_string(),
        urgency: Some("emergency".to_string()),
        blood_type: Some("B-".to_string()),
        organ: None,
        patient_name: None,
        is_self: Some(true),
        quantity: Some(3.0),
        hospital: Some("City Hospital".to_string()),
        needed_by: Some("2026-09-15".to_string()),
        notes: None,
    }
}

fn fulfillment(quantity: Option<f64>) -> lifelink_backend::model::request::FulfillmentEntry {
    FulfillRequestRequest {
        donor_user_id: "USR-7654321".to_string(),
        donor_name: Some("Ravi Kumar".to_string()),
        quantity,
        note: None,
    }
    .into_entry()
}

#[test]
fn test_request_id_shape() {
    let id = generate_request_id();
    assert!(id.starts_with("RQ-"));
    assert_eq!(id.len(), "RQ-".len() + 7);
}

#[test]
fn test_boundary_normalization_of_urgency_and_type() {
    let request = blood_request_payload().into_request("USR-1234567").expect("request");
    assert_eq!(request.request_type, RequestType::Blood);
    assert_eq!(request.urgency, Urgency::Critical);
    assert_eq!(request.status, RequestStatus::Pending);
}

#[test]
fn test_blood_request_fulfills_when_quantity_reached() {
    let mut request = blood_request_payload().into_request("USR-1234567").expect("request");

    assert_eq!(request.record_fulfillment(fulfillment(Some(1.0))), RequestStatus::Pending);
    assert_eq!(request.record_fulfillment(fulfillment(Some(1.5))), RequestStatus::Pending);
    assert_eq!(request.record_fulfillment(fulfillment(Some(0.5))), RequestStatus::Fulfilled);
    assert_eq!(request.fulfilled_by.len(), 3);
}

#[test]
fn test_organ_request_matches_on_first_fulfillment() {
    let payload = CreateRequestRequest {
        request_type: "Organ Request".to_string(),
        urgency: None,
        blood_type: None,
        organ: Some("kidney".to_string()),
        patient_name: Some("Meera Shah".to_string()),
        is_self: Some(false),
        quantity: None,
        hospital: None,
        needed_by: None,
        notes: None,
    };
    let mut request = payload.into_request("USR-1234567").expect("request");
    assert_eq!(request.request_type, RequestType::Organ);
    assert_eq!(request.urgency, Urgency::Medium);

    assert_eq!(request.record_fulfillment(fulfillment(None)), RequestStatus::Matched);
}
