use lifelink_backend::dto::donation_dto::CreateDonationRequest;
use lifelink_backend::model::donation::{DonationStatus, DonationType};
use lifelink_backend::model::user::User;
use lifelink_backend::util::ids::generate_donation_id;
use lifelink_backend::util::notify::donation_status_notification;

fn create_blood_donation() -> lifelink_backend::model::donation::Donation {
    let request = CreateDonationRequest {
        donation_type: "blood".to_string(),
        blood_type: Some("O+".to_string()),
        organ: None,
        quantity: Some(1.0),
        hospital: Some("City Hospital".to_string()),
        donation_date: Some("2026-08-01".to_string()),
        medical_notes: None,
        notes: None,
    };
    let mut donation = request
        .into_donation("USR-1234567", Some("Asha Rao".to_string()))
        .expect("donation");
    donation.donation_id = generate_donation_id(donation.donation_type);
    donation
}

#[test]
fn test_blood_donation_id_shape_and_pending_history() {
    let donation = create_blood_donation();

    assert!(donation.donation_id.starts_with("BD-"));
    assert_eq!(donation.donation_id.len(), "BD-".len() + 7);
    assert!(donation.donation_id[3..].chars().all(|c| c.is_ascii_digit()));

    let mut owner = User::new("USR-1234567".to_string(), "donor@example.com".to_string());
    let inserted = owner.upsert_donation_history(donation.history_entry());
    assert!(inserted);
    assert_eq!(owner.donation_history[0].status, "pending");
    assert_eq!(owner.donation_history[0].donation_type, "Blood");
}

#[test]
fn test_status_transitions_upsert_one_history_entry() {
    let mut donation = create_blood_donation();
    let mut owner = User::new("USR-1234567".to_string(), "donor@example.com".to_string());
    owner.upsert_donation_history(donation.history_entry());

    for status in [
        DonationStatus::Approved,
        DonationStatus::Processing,
        DonationStatus::Completed,
    ] {
        donation.status = status;
        let inserted = owner.upsert_donation_history(donation.history_entry());
        assert!(!inserted, "transition must update, not insert");
        assert_eq!(owner.donation_history.len(), 1);
        assert_eq!(owner.donation_history[0].status, status.as_str());
    }
}

#[test]
fn test_transition_persists_optional_notes() {
    let mut donation = create_blood_donation();
    donation.notes = Some("walk-in donor".to_string());

    // Transitions without notes keep whatever is already on the record.
    donation.apply_transition(DonationStatus::Approved, None);
    assert_eq!(donation.status, DonationStatus::Approved);
    assert_eq!(donation.notes.as_deref(), Some("walk-in donor"));

    donation.apply_transition(DonationStatus::Completed, Some("1 unit collected".to_string()));
    assert_eq!(donation.status, DonationStatus::Completed);
    assert_eq!(donation.notes.as_deref(), Some("1 unit collected"));
}

#[test]
fn test_each_transition_produces_one_notification_draft() {
    let donation = create_blood_donation();
    for status in [
        DonationStatus::Approved,
        DonationStatus::Processing,
        DonationStatus::Completed,
        DonationStatus::Rejected,
        DonationStatus::Cancelled,
    ] {
        let draft = donation_status_notification(status, donation.donation_type, &donation.donation_id);
        assert!(draft.message.contains(&donation.donation_id));
    }
}

#[test]
fn test_organ_and_tissue_id_prefixes() {
    assert!(generate_donation_id(DonationType::Organ).starts_with("OD-"));
    assert!(generate_donation_id(DonationType::Tissue).starts_with("DN-"));
    assert!(generate_donation_id(DonationType::Other).starts_with("DN-"));
}

#[test]
fn test_deleted_donation_removes_history_entry() {
    let donation = create_blood_donation();
    let mut owner = User::new("USR-1234567".to_string(), "donor@example.com".to_string());
    owner.upsert_donation_history(donation.history_entry());

    assert!(owner.remove_donation_history(&donation.donation_id));
    assert!(owner.donation_history.is_empty());
    assert!(!owner.remove_donation_history(&donation.donation_id));
}
