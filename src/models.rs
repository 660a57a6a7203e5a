//! Record types for the portal's backend collections
//!
//! Field names match the backend columns one to one; timestamps are epoch
//! milliseconds throughout, months are 1-12 billing months.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role claim stored alongside a user's profile document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Guest,
    Resident,
    Admin,
}

/// A portal user: auth identity plus residence data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub house_block: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    pub created_at: i64,
}

/// Verification state of a dues payment.
///
/// `Pending` is the only state a verification may start from; `Success` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monthly dues payment, submitted by a resident or recorded by an admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    /// Billing month, 1-12
    pub month: u32,
    pub year: i32,
    pub status: PaymentStatus,
    pub payment_method: String,
    #[serde(default)]
    pub proof_url: Option<String>,
    #[serde(default)]
    pub verified_by: Option<String>,
    #[serde(default)]
    pub verified_at: Option<i64>,
    pub created_at: i64,
}

/// A recorded community expense. Append-only plus delete; there is no edit path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: i64,
    /// Date the money was spent, not the date the record was created
    pub date: i64,
    pub category: String,
    pub recorded_by: String,
    pub created_at: i64,
}

/// Handling state of a resident complaint. Any state is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    Pending,
    Processing,
    Done,
    Rejected,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::Processing => "processing",
            ComplaintStatus::Done => "done",
            ComplaintStatus::Rejected => "rejected",
        }
    }
}

/// A resident-submitted issue report tracked to resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub response: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Publication state of a news post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Draft,
    Published,
}

/// Author reference embedded in a news post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityAuthor {
    pub uid: String,
    pub display_name: String,
}

/// A news post / activity report shown on the public site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    /// URL-safe identifier derived from the title unless overridden.
    /// Uniqueness is not enforced anywhere; the first match wins on lookup.
    pub slug: String,
    pub excerpt: String,
    /// Full HTML body
    pub content: String,
    pub main_image: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    /// When the event took place
    pub date: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub author: Option<ActivityAuthor>,
    pub status: ActivityStatus,
    pub is_featured: bool,
    pub created_at: i64,
}

/// Badge category of a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleCategory {
    Rapat,
    KerjaBakti,
    Sosial,
    Keamanan,
}

/// An entry in the community agenda
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSchedule {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: i64,
    /// Display string, e.g. "08:00 WIB"
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub location: String,
    pub category: ScheduleCategory,
}

/// A photo in the public gallery. `storage_path` is kept so the underlying
/// blob can be removed when the item is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    pub url: String,
    pub storage_path: String,
    pub created_at: i64,
}

/// Kind of payment instruction shown to residents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodKind {
    Bank,
    Qris,
}

/// Payment instructions: a bank account or a scannable QRIS image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PaymentMethodKind,
    /// Bank name or QRIS label
    pub name: String,
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
    pub qris_image_url: Option<String>,
    pub is_active: bool,
}
