use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A single concert listing.
///
/// Title, venue and date together identify an event, there is no id column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub title: String,
    pub date: NaiveDateTime,
    pub venue: String,
    pub venue_link: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl Event {
    pub fn new(title: String, date: NaiveDateTime, venue: String) -> Self {
        Self {
            title,
            date,
            venue,
            venue_link: None,
            location: None,
            image: None,
            link: None,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// `YYYY-MM-DD`, as used for searching and slugs
    pub fn iso_day(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(strum::IntoStaticStr, strum::EnumString, strum::Display, Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// What to ask the backend for
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub direction: SortDirection,
    /// Only events on or after this day
    pub from: Option<NaiveDate>,
}

impl EventQuery {
    pub fn all(direction: SortDirection) -> Self {
        Self {
            direction,
            from: None,
        }
    }

    pub fn upcoming(today: NaiveDate) -> Self {
        Self {
            direction: SortDirection::Asc,
            from: Some(today),
        }
    }
}

/// Parses the ISO-ish strings stored in the `date` column.
///
/// Offsets are dropped, keeping the wall-clock time they were stored with.
pub fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.naive_local());
    }

    if let Ok(date) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(date.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
