use crate::events::api::{check_status, APIError, EventsAPI};
use crate::listing::criteria::FilterCriteria;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

const ANALYTICS_TABLE: &str = "analytics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Click,
    Filter,
}

/// Which card action was clicked
#[derive(strum::IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum ClickTarget {
    Tickets,
    Calendar,
    Venue,
    Details,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsRecord {
    pub session_id: Uuid,
    pub kind: RecordKind,
    pub event_title: Option<String>,
    pub details: Value,
}

/// Insert-only writer for the `analytics` table
pub struct AnalyticsAPI {
    api: EventsAPI,
    session_id: Uuid,
}

impl AnalyticsAPI {
    pub fn new(api: EventsAPI) -> Self {
        Self {
            api,
            session_id: Uuid::new_v4(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub async fn record_click(&self, event_title: &str, target: ClickTarget) -> Result<(), APIError> {
        let target: &'static str = target.into();

        self.insert(AnalyticsRecord {
            session_id: self.session_id,
            kind: RecordKind::Click,
            event_title: Some(event_title.to_string()),
            details: json!({ "target": target }),
        })
        .await
    }

    pub async fn record_filter(&self, criteria: &FilterCriteria) -> Result<(), APIError> {
        self.insert(AnalyticsRecord {
            session_id: self.session_id,
            kind: RecordKind::Filter,
            event_title: None,
            details: serde_json::to_value(criteria)
                .map_err(|e| APIError::InvalidRequest(e.to_string()))?,
        })
        .await
    }

    /// Records the click, logging instead of failing
    pub async fn track_click(&self, event_title: &str, target: ClickTarget) {
        if let Err(e) = self.record_click(event_title, target).await {
            warn!("Couldn't record click on '{}': {}", event_title, e);
        }
    }

    /// Records the criteria, logging instead of failing
    pub async fn track_filter(&self, criteria: &FilterCriteria) {
        if let Err(e) = self.record_filter(criteria).await {
            warn!("Couldn't record filter: {}", e);
        }
    }

    #[instrument(skip(self, record), fields(kind = ?record.kind))]
    async fn insert(&self, record: AnalyticsRecord) -> Result<(), APIError> {
        let response = self
            .api
            .client()
            .post(self.api.table_url(ANALYTICS_TABLE))
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await
            .map_err(|e| APIError::RequestFailed(e.to_string()))?;

        check_status(response).await?;

        debug!("Recorded");

        Ok(())
    }
}
