pub mod card;
pub mod criteria;
pub mod filter;

use crate::events::api::{APIError, EventsAPI};
use crate::events::model::EventQuery;
use crate::favorites::Favorites;
use card::EventCard;
use criteria::FilterCriteria;
use filter::filter_events;
use tracing::info;

/// Fetches everything in the criteria's direction and narrows it down to cards
pub async fn load_listing(
    api: &EventsAPI,
    criteria: &FilterCriteria,
    favorites: &Favorites,
    site_url: &str,
) -> Result<Vec<EventCard>, APIError> {
    let events = api.get_events(&EventQuery::all(criteria.direction)).await?;
    let visible = filter_events(&events, criteria, favorites);

    info!("Showing {} of {} events", visible.len(), events.len());

    Ok(visible
        .iter()
        .map(|event| EventCard::new(event, favorites, site_url))
        .collect())
}
