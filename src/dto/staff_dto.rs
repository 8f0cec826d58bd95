use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::user::NotificationKind;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StaffApprovalRequest {
    pub approved: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StaffNotificationRequest {
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
    /// Defaults to `event` when absent.
    pub kind: Option<NotificationKind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// Aggregate counters for the staff dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardCounts {
    pub total_users: u64,
    pub pending_kyc: u64,
    pub pending_donations: u64,
    pub completed_donations: u64,
    pub pending_requests: u64,
    pub fulfilled_requests: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults_and_clamps() {
        let query = ListQuery { page: None, limit: None };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 20);

        let query = ListQuery { page: Some(0), limit: Some(1000) };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 100);
    }
}
