//! Administrator dashboard aggregates
//!
//! A read-only fold over the full payment and expense collections plus a
//! few counts. Everything is recomputed from scratch on every call; the
//! result does not depend on the order the backend returns rows in.

use chrono::{DateTime, Datelike, Utc};
use log::debug;
use serde::Serialize;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::models::{
    Complaint, ComplaintStatus, EventSchedule, Expense, Payment, PaymentStatus, UserProfile,
};
use crate::store::Store;

use super::now_millis;

/// How many rows the "needs attention" widgets show
const RECENT_LIMIT: usize = 5;

/// One month of the current year's cash flow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFlow {
    /// Calendar month, 1-12
    pub month: u32,
    pub income: i64,
    pub expense: i64,
}

/// Everything the admin dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// `total_income - total_expense`
    pub total_balance: i64,
    /// Sum of successful payments, all years
    pub total_income: i64,
    /// Sum of all expenses, all years
    pub total_expense: i64,
    /// Payments waiting for verification
    pub pending_dues: usize,
    /// Complaints still open (pending or processing)
    pub pending_complaints: usize,
    pub total_residents: usize,
    /// Newest pending payments, at most five
    pub recent_pending_payments: Vec<Payment>,
    /// Newest complaints, at most five
    pub recent_complaints: Vec<Complaint>,
    /// The next agenda entry, if any
    pub upcoming_event: Option<EventSchedule>,
    /// Twelve entries, January through December of the current year
    pub monthly: Vec<MonthlyFlow>,
}

/// Service computing the dashboard
pub struct DashboardService {
    store: Store,
}

impl DashboardService {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    /// Fetch all inputs concurrently and fold them into [`DashboardStats`].
    /// Any fetch failing fails the whole call; there is no partial result.
    pub async fn stats(&self, ctx: &AuthContext) -> Result<DashboardStats, Error> {
        ctx.require_admin()?;

        let (payments, expenses, complaints, residents, upcoming_event) = tokio::try_join!(
            self.fetch_payments(ctx),
            self.fetch_expenses(ctx),
            self.fetch_complaints(ctx),
            self.fetch_residents(ctx),
            self.fetch_upcoming_event(ctx),
        )?;

        let current_year = Utc::now().year();
        let stats = compute_stats(
            current_year,
            payments,
            expenses,
            complaints,
            residents.len(),
            upcoming_event,
        );
        debug!(
            "dashboard: balance {} ({} income, {} expense), {} pending dues",
            stats.total_balance, stats.total_income, stats.total_expense, stats.pending_dues
        );

        Ok(stats)
    }

    async fn fetch_payments(&self, ctx: &AuthContext) -> Result<Vec<Payment>, Error> {
        let mut query = self.store.collection("payments").select("*");
        query.authed(ctx);
        query.execute().await
    }

    async fn fetch_expenses(&self, ctx: &AuthContext) -> Result<Vec<Expense>, Error> {
        let mut query = self.store.collection("expenses").select("*");
        query.authed(ctx);
        query.execute().await
    }

    async fn fetch_complaints(&self, ctx: &AuthContext) -> Result<Vec<Complaint>, Error> {
        let mut query = self.store.collection("complaints").select("*");
        query.order("created_at", false).authed(ctx);
        query.execute().await
    }

    async fn fetch_residents(&self, ctx: &AuthContext) -> Result<Vec<UserProfile>, Error> {
        let mut query = self.store.collection("users").select("*");
        query.eq("role", "resident").authed(ctx);
        query.execute().await
    }

    async fn fetch_upcoming_event(
        &self,
        ctx: &AuthContext,
    ) -> Result<Option<EventSchedule>, Error> {
        let mut query = self.store.collection("schedules").select("*");
        query
            .gte("date", now_millis())
            .order("date", true)
            .authed(ctx);
        query.execute_one().await
    }
}

/// The pure fold. Payments bucket into the chart by their billing month,
/// expenses by the calendar month of their spend date; both only for the
/// current year. Totals span all years.
fn compute_stats(
    current_year: i32,
    payments: Vec<Payment>,
    expenses: Vec<Expense>,
    complaints: Vec<Complaint>,
    total_residents: usize,
    upcoming_event: Option<EventSchedule>,
) -> DashboardStats {
    let mut monthly: Vec<MonthlyFlow> = (1..=12)
        .map(|month| MonthlyFlow {
            month,
            income: 0,
            expense: 0,
        })
        .collect();

    let mut total_income = 0;
    for payment in &payments {
        if payment.status != PaymentStatus::Success {
            continue;
        }
        total_income += payment.amount;
        if payment.year == current_year {
            // months outside 1-12 would be bad data; they keep counting
            // toward the total but stay off the chart
            if let Some(slot) = payment
                .month
                .checked_sub(1)
                .and_then(|index| monthly.get_mut(index as usize))
            {
                slot.income += payment.amount;
            }
        }
    }

    let mut total_expense = 0;
    for expense in &expenses {
        total_expense += expense.amount;
        if let Some(date) = DateTime::<Utc>::from_timestamp_millis(expense.date) {
            if date.year() == current_year {
                monthly[date.month() as usize - 1].expense += expense.amount;
            }
        }
    }

    let mut recent_pending_payments: Vec<Payment> = payments
        .into_iter()
        .filter(|payment| payment.status == PaymentStatus::Pending)
        .collect();
    let pending_dues = recent_pending_payments.len();
    recent_pending_payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_pending_payments.truncate(RECENT_LIMIT);

    let pending_complaints = complaints
        .iter()
        .filter(|complaint| {
            matches!(
                complaint.status,
                ComplaintStatus::Pending | ComplaintStatus::Processing
            )
        })
        .count();

    let mut recent_complaints = complaints;
    recent_complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_complaints.truncate(RECENT_LIMIT);

    DashboardStats {
        total_balance: total_income - total_expense,
        total_income,
        total_expense,
        pending_dues,
        pending_complaints,
        total_residents,
        recent_pending_payments,
        recent_complaints,
        upcoming_event,
        monthly,
    }
}
