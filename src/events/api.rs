use super::{
    dto::EventResponse,
    model::{Event, EventQuery},
};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use thiserror::Error;
use tracing::{debug, error, info};

const EVENTS_TABLE: &str = "events";
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Client for the hosted PostgREST backend
#[derive(Clone)]
pub struct EventsAPI {
    client: ClientWithMiddleware,
    base_url: String,
    page_size: usize,
}

impl EventsAPI {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, APIError> {
        Self::with_retries(base_url, api_key, 0)
    }

    /// Transient failures are retried with exponential backoff, up to `max_retries` times
    pub fn with_retries(base_url: &str, api_key: &str, max_retries: u32) -> Result<Self, APIError> {
        let client = Client::builder()
            .default_headers(auth_headers(api_key)?)
            .build()
            .map_err(|e| APIError::RequestFailed(e.to_string()))?;

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(max_retries),
            ))
            .build();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn client(&self) -> &ClientWithMiddleware {
        &self.client
    }

    /**
    Returns every event matching the query, in the query's order.

    The backend caps the rows of a single response, so the total is counted
    first and the rows are requested one page at a time.
    */
    #[tracing::instrument(skip(self), fields(page_size = self.page_size))]
    pub async fn get_events(&self, query: &EventQuery) -> Result<Vec<Event>, APIError> {
        let total = self.count(query).await?;
        let pages = total.div_ceil(self.page_size);

        info!("Getting {} events in {} pages", total, pages);

        // total is server-reported, reserve one page at most
        let mut events = Vec::with_capacity(total.min(self.page_size));

        for page in 0..pages {
            let from = page * self.page_size;
            let to = from.saturating_add(self.page_size - 1);

            let mut rows = self.get_page(query, from, to).await?;
            let row_count = rows.len();

            events.append(&mut rows);

            if row_count < self.page_size {
                debug!("Page {} came back short ({} rows), stopping", page, row_count);
                break;
            }
        }

        info!("Got {} events", events.len());

        Ok(events)
    }

    pub async fn get_upcoming_events(&self, today: NaiveDate) -> Result<Vec<Event>, APIError> {
        self.get_events(&EventQuery::upcoming(today)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn count(&self, query: &EventQuery) -> Result<usize, APIError> {
        let response = self
            .filtered(self.client.head(self.table_url(EVENTS_TABLE)), query)
            .query(&[("select", "*")])
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|e| APIError::RequestFailed(e.to_string()))?;

        let response = check_status(response).await?;

        let content_range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .ok_or(APIError::MissingCount)?;

        parse_total(content_range).ok_or_else(|| {
            error!("Unexpected Content-Range '{}'", content_range);
            APIError::MissingCount
        })
    }

    /// Rows `from..=to` of the ordered table
    #[tracing::instrument(skip(self))]
    pub async fn get_page(
        &self,
        query: &EventQuery,
        from: usize,
        to: usize,
    ) -> Result<Vec<Event>, APIError> {
        let direction: &'static str = query.direction.into();
        let limit = to.saturating_sub(from) + 1;

        let response = self
            .filtered(self.client.get(self.table_url(EVENTS_TABLE)), query)
            .query(&[
                ("select", "*".to_string()),
                ("order", format!("date.{}", direction)),
                ("offset", from.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| APIError::RequestFailed(e.to_string()))?;

        let json_response = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| APIError::RequestFailed(e.to_string()))?;

        match serde_json::from_str::<Vec<EventResponse>>(&json_response) {
            Ok(parsed_response) => {
                debug!("Page {}-{} has {} rows", from, to, parsed_response.len());

                Ok(parsed_response
                    .into_iter()
                    .map(EventResponse::into_model)
                    .collect())
            }
            Err(e) => {
                error!("Response parse failed: {:?}", e);
                Err(APIError::InvalidResponse)
            }
        }
    }

    fn filtered(&self, request: RequestBuilder, query: &EventQuery) -> RequestBuilder {
        match query.from {
            Some(from) => request.query(&[("date", format!("gte.{}", from.format("%Y-%m-%d")))]),
            None => request,
        }
    }
}

fn auth_headers(api_key: &str) -> Result<HeaderMap, APIError> {
    let mut headers = HeaderMap::new();

    headers.insert("apikey", HeaderValue::from_str(api_key)?);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))?,
    );

    Ok(headers)
}

pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, APIError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("Backend answered {}: {}", status, body);

    Err(APIError::Status { status, body })
}

/// `0-999/2500` and `*/2500` both yield 2500
fn parse_total(content_range: &str) -> Option<usize> {
    content_range
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
}

#[derive(Debug, Error)]
pub enum APIError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Backend answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Received invalid response")]
    InvalidResponse,

    #[error("Backend did not report a row count")]
    MissingCount,

    #[error("Invalid API key: {0}")]
    InvalidApiKey(#[from] InvalidHeaderValue),
}
