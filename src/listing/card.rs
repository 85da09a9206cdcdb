use crate::calendar::google_calendar_url;
use crate::events::model::Event;
use crate::favorites::Favorites;
use crate::slug::event_slug;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;
use thiserror::Error;

const NORWEGIAN_MONTHS: [&str; 12] = [
    "januar",
    "februar",
    "mars",
    "april",
    "mai",
    "juni",
    "juli",
    "august",
    "september",
    "oktober",
    "november",
    "desember",
];

/// Everything a listing card or detail page shows for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCard {
    pub slug: String,
    pub title: String,
    pub date_label: String,
    pub venue: String,
    pub venue_link: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub ticket_link: Option<String>,
    pub detail_url: String,
    pub calendar_url: String,
    pub is_favorite: bool,
}

impl EventCard {
    pub fn new(event: &Event, favorites: &Favorites, site_url: &str) -> Self {
        let slug = event_slug(event);

        Self {
            detail_url: detail_url(site_url, &slug),
            slug,
            title: event.title.clone(),
            date_label: date_to_norwegian_display(&event.date),
            venue: event.venue.clone(),
            venue_link: event.venue_link.clone(),
            location: event.location.clone(),
            image: event.image.clone(),
            ticket_link: event.link.clone(),
            calendar_url: google_calendar_url(event).to_string(),
            is_favorite: favorites.contains(&event.title),
        }
    }
}

pub fn detail_url(site_url: &str, slug: &str) -> String {
    format!("{}/event/{}", site_url.trim_end_matches('/'), slug)
}

pub fn find_by_slug<'a>(events: &'a [Event], slug: &str) -> Result<&'a Event, ListingError> {
    events
        .iter()
        .find(|event| event_slug(event) == slug)
        .ok_or_else(|| ListingError::NotFound(slug.to_string()))
}

pub fn month_to_norwegian_display(date: &NaiveDateTime) -> &'static str {
    NORWEGIAN_MONTHS[(date.month() - 1) as usize]
}

/// `12. januar 2025 kl. 20:00`, time omitted for midnight
pub fn date_to_norwegian_display(date: &NaiveDateTime) -> String {
    let day = format!(
        "{}. {} {}",
        date.day(),
        month_to_norwegian_display(date),
        date.year()
    );

    if date.hour() == 0 && date.minute() == 0 {
        day
    } else {
        format!("{} kl. {}", day, date.format("%H:%M"))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("No event found for '{0}'")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn kygo() -> Event {
        let mut event = Event::new(
            "Kygo".to_string(),
            NaiveDate::from_ymd_opt(2025, 6, 7)
                .unwrap()
                .and_hms_opt(19, 30, 0)
                .unwrap(),
            "Bergenhus Festning".to_string(),
        );
        event.link = Some("https://tickets.example.com/kygo".to_string());
        event
    }

    #[test_log::test]
    fn should_build_card_with_links_and_favorite_flag() {
        let mut favorites = Favorites::default();
        favorites.toggle("Kygo");

        let card = EventCard::new(&kygo(), &favorites, "https://konserter.example.no/");

        assert_eq!(card.slug, "kygo-bergenhus-festning-2025-06-07");
        assert_eq!(
            card.detail_url,
            "https://konserter.example.no/event/kygo-bergenhus-festning-2025-06-07"
        );
        assert_eq!(card.date_label, "7. juni 2025 kl. 19:30");
        assert_eq!(card.ticket_link.as_deref(), Some("https://tickets.example.com/kygo"));
        assert!(card.calendar_url.starts_with("https://calendar.google.com/"));
        assert!(card.is_favorite);
    }

    #[test_log::test]
    fn when_time_is_midnight_should_show_only_the_day() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 24)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert_eq!(date_to_norwegian_display(&date), "24. desember 2025");
    }

    #[test_log::test]
    fn should_find_event_by_its_slug() {
        let events = vec![kygo()];

        let found = find_by_slug(&events, "kygo-bergenhus-festning-2025-06-07");

        assert_eq!(found, Ok(&events[0]));
    }

    #[test_log::test]
    fn when_slug_is_unknown_should_be_not_found() {
        let events = vec![kygo()];

        assert_eq!(
            find_by_slug(&events, "kygo-2024"),
            Err(ListingError::NotFound("kygo-2024".to_string()))
        );
    }
}
