//! Domain services encoding the portal's business rules
//!
//! Each service is a thin layer over the document store and the media
//! bucket: one or two requests per operation, no retries, no transactions
//! spanning writes. Role gates are enforced here, at the data-access layer.

pub mod activities;
pub mod complaints;
pub mod dashboard;
pub mod expenses;
pub mod gallery;
pub mod payment_methods;
pub mod payments;
pub mod schedules;
pub mod users;

pub use activities::{generate_slug, ActivityDraft, ActivityService};
pub use complaints::ComplaintService;
pub use dashboard::{DashboardService, DashboardStats, MonthlyFlow};
pub use expenses::{ExpenseService, NewExpense};
pub use gallery::GalleryService;
pub use payment_methods::{PaymentMethodDraft, PaymentMethodService};
pub use payments::{DuesSubmission, PaymentService, METHOD_CASH_MANUAL};
pub use schedules::{ScheduleDraft, ScheduleService};
pub use users::{NewResident, ProfileUpdate, UserService};

/// Current wall-clock time as epoch milliseconds, the timestamp format of
/// every collection
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
