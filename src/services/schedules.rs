//! The community agenda

use chrono::{NaiveTime, Utc};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::models::{EventSchedule, ScheduleCategory};
use crate::store::Store;

const COLLECTION: &str = "schedules";

/// Start of the current day (00:00 UTC) as epoch milliseconds, so events
/// happening today still count as upcoming
fn start_of_today() -> i64 {
    Utc::now()
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

/// The fields an editor controls when creating or updating an agenda entry.
/// `id: None` creates, `id: Some(..)` replaces.
#[derive(Debug, Clone, Default)]
pub struct ScheduleDraft {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub date: i64,
    pub start_time: String,
    pub end_time: Option<String>,
    pub location: String,
    pub category: Option<ScheduleCategory>,
}

/// Service for agenda entries
pub struct ScheduleService {
    store: Store,
}

impl ScheduleService {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    /// Every agenda entry, past ones included, newest first
    pub async fn all(&self, ctx: &AuthContext) -> Result<Vec<EventSchedule>, Error> {
        ctx.require_admin()?;

        let mut query = self.store.collection(COLLECTION).select("*");
        query.order("date", false).authed(ctx);
        query.execute().await
    }

    /// Upcoming entries for the public site, soonest first
    pub async fn upcoming(&self, limit: Option<u32>) -> Result<Vec<EventSchedule>, Error> {
        let mut query = self.store.collection(COLLECTION).select("*");
        query
            .gte("date", start_of_today())
            .order("date", true)
            .limit(limit.unwrap_or(5));
        query.execute().await
    }

    /// Create or replace an agenda entry; returns its id
    pub async fn save(&self, ctx: &AuthContext, draft: ScheduleDraft) -> Result<String, Error> {
        ctx.require_admin()?;

        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let schedule = EventSchedule {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            location: draft.location,
            category: draft.category.unwrap_or(ScheduleCategory::Sosial),
        };

        let mut upsert = self.store.collection(COLLECTION).upsert(&schedule);
        upsert.on_conflict("id").authed(ctx);
        upsert.execute_no_return().await?;

        Ok(id)
    }

    /// Delete an agenda entry
    pub async fn delete(&self, ctx: &AuthContext, id: &str) -> Result<(), Error> {
        ctx.require_admin()?;

        let mut delete = self.store.collection(COLLECTION).delete();
        delete.eq("id", id).authed(ctx);
        delete.execute_no_return().await
    }
}
