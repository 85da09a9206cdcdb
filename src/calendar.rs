use crate::events::model::Event;
use chrono::{Duration, NaiveDateTime};
use lazy_static::lazy_static;
use reqwest::Url;

const COMPACT_FORMAT: &str = "%Y%m%dT%H%M%S";
const DEFAULT_DURATION_HOURS: i64 = 2;

lazy_static! {
    static ref GOOGLE_CALENDAR_URL: Url =
        Url::parse("https://calendar.google.com/calendar/render").unwrap();
}

/// "Add to calendar" link, no API call involved
pub fn google_calendar_url(event: &Event) -> Url {
    let end = event.date + Duration::hours(DEFAULT_DURATION_HOURS);
    let location = match &event.location {
        Some(location) => format!("{}, {}", event.venue, location),
        None => event.venue.clone(),
    };

    let mut params = vec![
        ("action", "TEMPLATE".to_string()),
        ("text", event.title.clone()),
        ("dates", format!("{}/{}", compact(event.date), compact(end))),
        ("location", location),
    ];

    if let Some(link) = &event.link {
        params.push(("details", format!("Billetter: {}", link)));
    }

    let mut url = GOOGLE_CALENDAR_URL.clone();
    url.query_pairs_mut().extend_pairs(params);

    url
}

fn compact(date: NaiveDateTime) -> String {
    date.format(COMPACT_FORMAT).to_string()
}
