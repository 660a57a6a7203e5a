//! Community expense ledger

use serde_json::json;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::models::Expense;
use crate::store::Store;

use super::now_millis;

const COLLECTION: &str = "expenses";

/// A new expense entry
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub title: String,
    pub amount: i64,
    /// Date the money was spent, epoch milliseconds
    pub date: i64,
    /// Free-form, e.g. "Operasional", "Sosial", "Pembangunan"
    pub category: String,
}

/// Service for expense records
pub struct ExpenseService {
    store: Store,
}

impl ExpenseService {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    /// All expenses, newest spend date first
    pub async fn all(&self, ctx: &AuthContext) -> Result<Vec<Expense>, Error> {
        ctx.require_admin()?;

        let mut query = self.store.collection(COLLECTION).select("*");
        query.order("date", false).authed(ctx);
        query.execute().await
    }

    /// Record a new expense, attributed to the recording admin
    pub async fn create(&self, ctx: &AuthContext, expense: NewExpense) -> Result<Expense, Error> {
        ctx.require_admin()?;

        let row = json!({
            "title": expense.title,
            "amount": expense.amount,
            "date": expense.date,
            "category": expense.category,
            "recorded_by": ctx.uid(),
            "created_at": now_millis(),
        });

        let mut insert = self.store.collection(COLLECTION).insert(row);
        insert.authed(ctx);
        let created: Vec<Expense> = insert.execute().await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| Error::database("expense insert returned no row"))
    }

    /// Delete an expense. There is no edit path; a wrong entry is deleted
    /// and re-recorded.
    pub async fn delete(&self, ctx: &AuthContext, id: &str) -> Result<(), Error> {
        ctx.require_admin()?;

        let mut delete = self.store.collection(COLLECTION).delete();
        delete.eq("id", id).authed(ctx);
        delete.execute_no_return().await
    }
}
