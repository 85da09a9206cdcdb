use crate::events::model::SortDirection;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(strum::IntoStaticStr, strum::EnumString, strum::Display, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Title,
    Venue,
}

/// Inclusive day interval, either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, CriteriaError> {
        if let (Some(from), Some(to)) = (from, to) {
            if to < from {
                return Err(CriteriaError::InvertedDateRange { from, to });
            }
        }

        Ok(Self { from, to })
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

/// What the visitor narrowed the listing down to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub search: String,
    pub venues: BTreeSet<String>,
    pub date_range: Option<DateRange>,
    pub sort_by: SortField,
    pub direction: SortDirection,
    pub favorites_only: bool,
}

impl FilterCriteria {
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    pub fn with_venue(mut self, venue: &str) -> Self {
        self.venues.insert(venue.to_string());
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = Some(date_range);
        self
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_by = field;
        self.direction = direction;
        self
    }

    pub fn only_favorites(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    /// Adds the venue if missing, removes it otherwise
    pub fn toggle_venue(&mut self, venue: &str) {
        if !self.venues.remove(venue) {
            self.venues.insert(venue.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.venues.is_empty()
            && self.date_range.is_none()
            && !self.favorites_only
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("Date range ends ({to}) before it starts ({from})")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },
}
