use super::criteria::{FilterCriteria, SortField};
use crate::events::model::{Event, SortDirection};
use crate::favorites::Favorites;
use crate::slug::collation_key;
use itertools::Itertools;
use std::cmp::Ordering;

/// Events matching every criterion, ordered as the criteria ask
pub fn filter_events(events: &[Event], criteria: &FilterCriteria, favorites: &Favorites) -> Vec<Event> {
    let search = criteria.search.trim().to_lowercase();

    let mut filtered: Vec<Event> = events
        .iter()
        .filter(|event| matches_search(event, &search))
        .filter(|event| criteria.venues.is_empty() || criteria.venues.contains(&event.venue))
        .filter(|event| {
            criteria
                .date_range
                .map_or(true, |range| range.contains(event.day()))
        })
        .filter(|event| !criteria.favorites_only || favorites.contains(&event.title))
        .cloned()
        .collect();

    sort_events(&mut filtered, criteria.sort_by, criteria.direction);

    filtered
}

/// `search` is expected lowercased; blank matches everything
pub fn matches_search(event: &Event, search: &str) -> bool {
    search.is_empty()
        || event.title.to_lowercase().contains(search)
        || event.venue.to_lowercase().contains(search)
        || event.iso_day().contains(search)
}

pub fn sort_events(events: &mut [Event], field: SortField, direction: SortDirection) {
    events.sort_by(|a, b| {
        let ordering = compare(a, b, field);

        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &Event, b: &Event, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Title => compare_text(&a.title, &b.title),
        SortField::Venue => compare_text(&a.venue, &b.venue),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Distinct venues, for the venue picker
pub fn venues(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|event| event.venue.as_str())
        .filter(|venue| !venue.is_empty())
        .unique()
        .sorted_by(|a, b| compare_text(a, b))
        .map(str::to_string)
        .collect()
}
