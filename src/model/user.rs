use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Embedded notification lists are trimmed to this many entries on every push.
pub const NOTIFICATION_CAP: usize = 100;
/// Login IP history keeps only the most recent entries.
pub const LOGIN_IP_CAP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Default for BloodType {
    fn default() -> Self {
        BloodType::Unknown
    }
}

impl BloodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
            BloodType::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "A+" => Some(BloodType::APositive),
            "A-" => Some(BloodType::ANegative),
            "B+" => Some(BloodType::BPositive),
            "B-" => Some(BloodType::BNegative),
            "AB+" => Some(BloodType::AbPositive),
            "AB-" => Some(BloodType::AbNegative),
            "O+" => Some(BloodType::OPositive),
            "O-" => Some(BloodType::ONegative),
            "UNKNOWN" => Some(BloodType::Unknown),
            _ => None,
        }
    }
}

/// Independent role flags; `staff` is inert until `staff_approval` is set on the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    #[serde(default)]
    pub donor: bool,
    #[serde(default)]
    pub staff: bool,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalInfo {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub last_checkup: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    NotSubmitted,
    Pending,
    Completed,
    Rejected,
}

impl Default for KycStatus {
    fn default() -> Self {
        KycStatus::NotSubmitted
    }
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::NotSubmitted => "not_submitted",
            KycStatus::Pending => "pending",
            KycStatus::Completed => "completed",
            KycStatus::Rejected => "rejected",
        }
    }
}

/// Review status of an individual entry in the user's document list,
/// distinct from the whole-profile `KycStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Verified => "verified",
            DocumentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(DocumentStatus::Pending),
            "verified" => Some(DocumentStatus::Verified),
            "rejected" => Some(DocumentStatus::Rejected),
            _ => None,
        }
    }
}

/// Latest KYC upload plus its review trail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KycDocument {
    pub url: String,
    pub document_type: Option<String>,
    pub uploaded_at: Option<String>,
    pub verified_at: Option<String>,
    pub verified_by: Option<String>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AadharCardMirror {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycDocumentEntry {
    pub id: String,
    pub url: String,
    pub document_type: Option<String>,
    pub status: DocumentStatus,
    pub uploaded_at: Option<String>,
    pub rejection_reason: Option<String>,
}

/// Denormalized document container. `aadhar_card.url` always mirrors
/// `User::kyc_document.url` when the latter is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KycDocuments {
    pub aadhar_card: Option<AadharCardMirror>,
    #[serde(default)]
    pub items: Vec<KycDocumentEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationSource {
    System,
    Staff,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Welcome,
    Reminder,
    Success,
    Verification,
    Approval,
    Urgent,
    Appreciation,
    Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub time: String,
    pub from: NotificationSource,
    pub is_read: bool,
    pub kind: NotificationKind,
    pub staff_id: Option<String>,
    pub staff_name: Option<String>,
}

impl Notification {
    pub fn system(message: impl Into<String>, kind: NotificationKind) -> Self {
        Notification {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.into(),
            time: chrono::Utc::now().to_rfc3339(),
            from: NotificationSource::System,
            is_read: false,
            kind,
            staff_id: None,
            staff_name: None,
        }
    }

    pub fn from_staff(message: impl Into<String>, kind: NotificationKind, staff_id: &str, staff_name: &str) -> Self {
        Notification {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.into(),
            time: chrono::Utc::now().to_rfc3339(),
            from: NotificationSource::Staff,
            is_read: false,
            kind,
            staff_id: Some(staff_id.to_string()),
            staff_name: Some(staff_name.to_string()),
        }
    }
}

/// Cached mirror of a Donation document, kept in sync by the donation workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationHistoryEntry {
    pub donation_id: String,
    pub donation_type: String,
    pub date: Option<String>,
    pub hospital: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginIp {
    pub ip: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionDetails {
    pub basic_info: bool,
    pub contact_info: bool,
    pub medical_info: bool,
    pub kyc_verification: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    /// Human-readable id (`USR-` + 7 digits), regenerated on collision at save time
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub roles: Roles,
    #[serde(default)]
    pub staff_approval: bool,

    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    #[serde(default)]
    pub blood_type: BloodType,
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub medical_info: MedicalInfo,

    #[serde(default)]
    pub kyc_status: KycStatus,
    pub kyc_document: Option<KycDocument>,
    #[serde(default)]
    pub kyc_documents: KycDocuments,

    #[serde(default)]
    pub profile_completion: u8,
    #[serde(default)]
    pub profile_completion_details: CompletionDetails,
    #[serde(default)]
    pub profile_completed: bool,

    #[serde(default)]
    pub donation_history: Vec<DonationHistoryEntry>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub login_ips: Vec<LoginIp>,

    /// Token invalidation nonce; bumping it forces logout of all sessions
    #[serde(default)]
    pub jwt_version: i64,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl User {
    /// Bare account shell as created at registration, before seeding notifications.
    pub fn new(user_id: String, email: String) -> Self {
        User {
            id: None,
            user_id,
            email,
            password_hash: String::new(),
            roles: Roles { donor: true, staff: false, admin: false },
            staff_approval: false,
            name: None,
            date_of_birth: None,
            gender: None,
            blood_type: BloodType::Unknown,
            phone: None,
            address: Address::default(),
            medical_info: MedicalInfo::default(),
            kyc_status: KycStatus::NotSubmitted,
            kyc_document: None,
            kyc_documents: KycDocuments::default(),
            profile_completion: 0,
            profile_completion_details: CompletionDetails::default(),
            profile_completed: false,
            donation_history: Vec::new(),
            notifications: Vec::new(),
            login_ips: Vec::new(),
            jwt_version: 0,
            created_at: None,
            updated_at: None,
        }
    }

    /// Coarse role label used in token claims; staff capability still requires
    /// `staff_approval` and is re-checked against the live document.
    pub fn role_label(&self) -> &'static str {
        if self.roles.admin {
            "admin"
        } else if self.roles.staff {
            "staff"
        } else {
            "donor"
        }
    }

    pub fn is_approved_staff(&self) -> bool {
        self.roles.admin || (self.roles.staff && self.staff_approval)
    }

    /// Record a new KYC document upload.
    ///
    /// Status is promoted to `pending` only from `not_submitted`; a re-upload
    /// while `completed` or `rejected` leaves the status untouched until staff
    /// act again (inherited quirk, guarded by tests). The aadhar mirror and
    /// the reviewable entry list are updated unconditionally.
    pub fn record_kyc_document(&mut self, mut document: KycDocument) {
        if document.uploaded_at.is_none() {
            document.uploaded_at = Some(chrono::Utc::now().to_rfc3339());
        }
        if self.kyc_status == KycStatus::NotSubmitted {
            self.kyc_status = KycStatus::Pending;
        }
        self.kyc_documents.aadhar_card = Some(AadharCardMirror { url: document.url.clone() });
        self.kyc_documents.items.push(KycDocumentEntry {
            id: uuid::Uuid::new_v4().to_string(),
            url: document.url.clone(),
            document_type: document.document_type.clone(),
            status: DocumentStatus::Pending,
            uploaded_at: document.uploaded_at.clone(),
            rejection_reason: None,
        });
        self.kyc_document = Some(document);
    }

    /// Prepend a notification, trimming the list to [`NOTIFICATION_CAP`].
    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.insert(0, notification);
        self.notifications.truncate(NOTIFICATION_CAP);
    }

    /// Prepend a login IP, trimming the list to [`LOGIN_IP_CAP`].
    pub fn record_login_ip(&mut self, ip: impl Into<String>) {
        self.login_ips.insert(
            0,
            LoginIp {
                ip: ip.into(),
                time: chrono::Utc::now().to_rfc3339(),
            },
        );
        self.login_ips.truncate(LOGIN_IP_CAP);
    }

    /// Update the cached donation history entry matching `donation_id`, or
    /// insert it when absent so inconsistent history self-heals.
    /// Returns true when a new entry was inserted.
    pub fn upsert_donation_history(&mut self, entry: DonationHistoryEntry) -> bool {
        match self
            .donation_history
            .iter_mut()
            .find(|e| e.donation_id == entry.donation_id)
        {
            Some(existing) => {
                *existing = entry;
                false
            }
            None => {
                self.donation_history.push(entry);
                true
            }
        }
    }

    pub fn remove_donation_history(&mut self, donation_id: &str) -> bool {
        let before = self.donation_history.len();
        self.donation_history.retain(|e| e.donation_id != donation_id);
        self.donation_history.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_user() -> User {
        User::new("USR-1234567".to_string(), "donor@example.com".to_string())
    }

    #[test]
    fn test_upload_promotes_not_submitted_to_pending() {
        let mut user = base_user();
        assert_eq!(user.kyc_status, KycStatus::NotSubmitted);
        user.record_kyc_document(KycDocument {
            url: "http://files/aadhar.png".to_string(),
            ..Default::default()
        });
        assert_eq!(user.kyc_status, KycStatus::Pending);
    }

    #[test]
    fn test_upload_does_not_reset_completed_status() {
        let mut user = base_user();
        user.kyc_status = KycStatus::Completed;
        user.record_kyc_document(KycDocument {
            url: "http://files/new.png".to_string(),
            ..Default::default()
        });
        // Inherited quirk: a re-upload never demotes a reviewed status.
        assert_eq!(user.kyc_status, KycStatus::Completed);
    }

    #[test]
    fn test_upload_does_not_reset_rejected_status() {
        let mut user = base_user();
        user.kyc_status = KycStatus::Rejected;
        user.record_kyc_document(KycDocument {
            url: "http://files/retry.png".to_string(),
            ..Default::default()
        });
        assert_eq!(user.kyc_status, KycStatus::Rejected);
    }

    #[test]
    fn test_aadhar_mirror_follows_document_url() {
        let mut user = base_user();
        user.record_kyc_document(KycDocument {
            url: "http://files/first.png".to_string(),
            ..Default::default()
        });
        assert_eq!(
            user.kyc_documents.aadhar_card.as_ref().map(|a| a.url.as_str()),
            Some("http://files/first.png")
        );

        user.record_kyc_document(KycDocument {
            url: "http://files/second.png".to_string(),
            ..Default::default()
        });
        assert_eq!(
            user.kyc_documents.aadhar_card.as_ref().map(|a| a.url.as_str()),
            user.kyc_document.as_ref().map(|d| d.url.as_str())
        );
        assert_eq!(user.kyc_documents.items.len(), 2);
    }

    #[test]
    fn test_notification_cap() {
        let mut user = base_user();
        for i in 0..(NOTIFICATION_CAP + 10) {
            user.push_notification(Notification::system(format!("n{}", i), NotificationKind::Event));
        }
        assert_eq!(user.notifications.len(), NOTIFICATION_CAP);
        // Newest stays at the front.
        assert_eq!(user.notifications[0].message, format!("n{}", NOTIFICATION_CAP + 9));
    }

    #[test]
    fn test_login_ip_cap() {
        let mut user = base_user();
        for i in 0..8 {
            user.record_login_ip(format!("10.0.0.{}", i));
        }
        assert_eq!(user.login_ips.len(), LOGIN_IP_CAP);
        assert_eq!(user.login_ips[0].ip, "10.0.0.7");
    }

    #[test]
    fn test_donation_history_upsert_inserts_then_updates() {
        let mut user = base_user();
        let inserted = user.upsert_donation_history(DonationHistoryEntry {
            donation_id: "BD-1234567".to_string(),
            donation_type: "Blood".to_string(),
            date: None,
            hospital: None,
            status: "pending".to_string(),
        });
        assert!(inserted);

        let inserted = user.upsert_donation_history(DonationHistoryEntry {
            donation_id: "BD-1234567".to_string(),
            donation_type: "Blood".to_string(),
            date: None,
            hospital: None,
            status: "approved".to_string(),
        });
        assert!(!inserted);
        assert_eq!(user.donation_history.len(), 1);
        assert_eq!(user.donation_history[0].status, "approved");
    }

    #[test]
    fn test_role_label_precedence() {
        let mut user = base_user();
        assert_eq!(user.role_label(), "donor");
        user.roles.staff = true;
        assert_eq!(user.role_label(), "staff");
        user.roles.admin = true;
        assert_eq!(user.role_label(), "admin");
    }

    #[test]
    fn test_staff_capability_requires_approval() {
        let mut user = base_user();
        user.roles.staff = true;
        assert!(!user.is_approved_staff());
        user.staff_approval = true;
        assert!(user.is_approved_staff());
    }
}
