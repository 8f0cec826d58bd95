//! Canned notification message tables.
//!
//! Pure status → (message, kind) mappings for the KYC, donation, and request
//! workflows. Unknown or uninteresting statuses fall back to a generic
//! "status updated" message of kind `verification`.

use crate::model::donation::{DonationStatus, DonationType};
use crate::model::request::RequestStatus;
use crate::model::user::{DocumentStatus, KycStatus, NotificationKind};

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub message: String,
    pub kind: NotificationKind,
}

fn generic(status: &str) -> NotificationDraft {
    NotificationDraft {
        message: format!("Your status has been updated to {}", status),
        kind: NotificationKind::Verification,
    }
}

/// Message for a whole-profile KYC status change. The rejection reason is
/// included verbatim when present.
pub fn kyc_status_notification(status: KycStatus, reason: Option<&str>) -> NotificationDraft {
    match status {
        KycStatus::Pending => NotificationDraft {
            message: "Your KYC document has been received and is pending review.".to_string(),
            kind: NotificationKind::Verification,
        },
        KycStatus::Completed => NotificationDraft {
            message: "Your KYC verification has been approved. Your identity is now verified.".to_string(),
            kind: NotificationKind::Success,
        },
        KycStatus::Rejected => NotificationDraft {
            message: match reason {
                Some(reason) => format!(
                    "Your KYC verification was rejected: {}. Please upload a new document.",
                    reason
                ),
                None => "Your KYC verification was rejected. Please upload a new document.".to_string(),
            },
            kind: NotificationKind::Urgent,
        },
        KycStatus::NotSubmitted => generic(status.as_str()),
    }
}

/// Message for a per-document review, independent of the whole-KYC status.
pub fn document_status_notification(status: DocumentStatus, reason: Option<&str>) -> NotificationDraft {
    match status {
        DocumentStatus::Verified => NotificationDraft {
            message: "One of your KYC documents has been verified.".to_string(),
            kind: NotificationKind::Success,
        },
        DocumentStatus::Rejected => NotificationDraft {
            message: match reason {
                Some(reason) => format!("One of your KYC documents was rejected: {}.", reason),
                None => "One of your KYC documents was rejected.".to_string(),
            },
            kind: NotificationKind::Urgent,
        },
        DocumentStatus::Pending => generic(status.as_str()),
    }
}

pub fn donation_status_notification(
    status: DonationStatus,
    donation_type: DonationType,
    donation_id: &str,
) -> NotificationDraft {
    let type_name = donation_type.as_str();
    match status {
        DonationStatus::Approved => NotificationDraft {
            message: format!("Your {} donation {} has been approved.", type_name, donation_id),
            kind: NotificationKind::Approval,
        },
        DonationStatus::Processing => NotificationDraft {
            message: format!("Your {} donation {} is now being processed.", type_name, donation_id),
            kind: NotificationKind::Event,
        },
        DonationStatus::Completed => NotificationDraft {
            message: format!(
                "Thank you! Your {} donation {} has been completed.",
                type_name, donation_id
            ),
            kind: NotificationKind::Appreciation,
        },
        DonationStatus::Rejected => NotificationDraft {
            message: format!("Your {} donation {} has been rejected.", type_name, donation_id),
            kind: NotificationKind::Urgent,
        },
        DonationStatus::Cancelled => NotificationDraft {
            message: format!("Your {} donation {} has been cancelled.", type_name, donation_id),
            kind: NotificationKind::Event,
        },
        DonationStatus::Pending => generic(status.as_str()),
    }
}

pub fn request_status_notification(status: RequestStatus, request_id: &str) -> NotificationDraft {
    match status {
        RequestStatus::Matched => NotificationDraft {
            message: format!("Your request {} has been matched with a donor.", request_id),
            kind: NotificationKind::Success,
        },
        RequestStatus::Fulfilled => NotificationDraft {
            message: format!("Your request {} has been fulfilled.", request_id),
            kind: NotificationKind::Success,
        },
        RequestStatus::Completed => NotificationDraft {
            message: format!("Your request {} has been completed. We wish a speedy recovery.", request_id),
            kind: NotificationKind::Appreciation,
        },
        RequestStatus::Rejected => NotificationDraft {
            message: format!("Your request {} has been rejected.", request_id),
            kind: NotificationKind::Urgent,
        },
        RequestStatus::Cancelled => NotificationDraft {
            message: format!("Your request {} has been cancelled.", request_id),
            kind: NotificationKind::Event,
        },
        RequestStatus::Pending => generic(status.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kyc_rejection_message_contains_reason() {
        let draft = kyc_status_notification(KycStatus::Rejected, Some("blurry image"));
        assert!(draft.message.contains("blurry image"));
        assert_eq!(draft.kind, NotificationKind::Urgent);
    }

    #[test]
    fn test_kyc_approval_is_success() {
        let draft = kyc_status_notification(KycStatus::Completed, None);
        assert_eq!(draft.kind, NotificationKind::Success);
    }

    #[test]
    fn test_unhandled_status_falls_back_to_generic() {
        let draft = kyc_status_notification(KycStatus::NotSubmitted, None);
        assert_eq!(draft.kind, NotificationKind::Verification);
        assert!(draft.message.contains("status has been updated to not_submitted"));
    }

    #[test]
    fn test_donation_completed_is_appreciation() {
        let draft =
            donation_status_notification(DonationStatus::Completed, DonationType::Blood, "BD-1234567");
        assert_eq!(draft.kind, NotificationKind::Appreciation);
        assert!(draft.message.contains("BD-1234567"));
        assert!(draft.message.contains("Blood"));
    }

    #[test]
    fn test_donation_pending_falls_back_to_generic() {
        let draft =
            donation_status_notification(DonationStatus::Pending, DonationType::Organ, "OD-1234567");
        assert_eq!(draft.kind, NotificationKind::Verification);
    }

    #[test]
    fn test_request_matched_is_success() {
        let draft = request_status_notification(RequestStatus::Matched, "RQ-1234567");
        assert_eq!(draft.kind, NotificationKind::Success);
        assert!(draft.message.contains("RQ-1234567"));
    }

    #[test]
    fn test_document_rejection_includes_reason() {
        let draft = document_status_notification(DocumentStatus::Rejected, Some("wrong side scanned"));
        assert!(draft.message.contains("wrong side scanned"));
        assert_eq!(draft.kind, NotificationKind::Urgent);
    }
}
