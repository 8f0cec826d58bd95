//! Human-readable id generation for users, donations, and requests.
//!
//! Ids are a short prefix plus 7 random digits. Uniqueness is enforced by
//! the callers: services check the collection and regenerate on collision.

use rand::Rng;

use crate::model::donation::DonationType;

pub const ID_DIGITS: usize = 7;

fn random_digits(count: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

/// Generate a candidate user id, e.g. `USR-4821907`.
pub fn generate_user_id() -> String {
    format!("USR-{}", random_digits(ID_DIGITS))
}

/// Generate a candidate donation id with the type prefix, e.g. `BD-1234567`.
pub fn generate_donation_id(donation_type: DonationType) -> String {
    format!("{}-{}", donation_type.id_prefix(), random_digits(ID_DIGITS))
}

/// Generate a candidate request id, e.g. `RQ-1234567`.
pub fn generate_request_id() -> String {
    format!("RQ-{}", random_digits(ID_DIGITS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_id_shape(id: &str, prefix: &str) {
        let (head, digits) = id.split_at(prefix.len() + 1);
        assert_eq!(head, format!("{}-", prefix));
        assert_eq!(digits.len(), ID_DIGITS);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_user_id_shape() {
        assert_id_shape(&generate_user_id(), "USR");
    }

    #[test]
    fn test_donation_id_prefix_matches_type() {
        assert_id_shape(&generate_donation_id(DonationType::Blood), "BD");
        assert_id_shape(&generate_donation_id(DonationType::Organ), "OD");
        assert_id_shape(&generate_donation_id(DonationType::Tissue), "DN");
        assert_id_shape(&generate_donation_id(DonationType::Other), "DN");
    }

    #[test]
    fn test_request_id_shape() {
        assert_id_shape(&generate_request_id(), "RQ");
    }

    #[test]
    fn test_regenerate_on_conflict_terminates_with_unique_id() {
        // Same loop shape as the services: re-roll while the candidate is taken.
        let mut taken: HashSet<String> = HashSet::new();
        for _ in 0..500 {
            taken.insert(generate_user_id());
        }
        let mut candidate = generate_user_id();
        let mut attempts = 0;
        while taken.contains(&candidate) {
            candidate = generate_user_id();
            attempts += 1;
            assert!(attempts < 1000, "id generation loop failed to terminate");
        }
        assert!(!taken.contains(&candidate));
    }
}
