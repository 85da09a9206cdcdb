use konsertliste::analytics::AnalyticsAPI;
use konsertliste::config::env_loader::load_config;
use konsertliste::events::api::EventsAPI;
use konsertliste::favorites::FavoritesStore;
use konsertliste::listing::load_listing;
use konsertliste::tracing::setup_loki;
use std::env;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let loki_url = env::var("LOKI_URL").ok();
    let _loki = setup_loki(loki_url.as_deref(), "listing").await;

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let api = match EventsAPI::with_retries(
        &config.backend.url,
        &config.backend.api_key,
        config.backend.max_retries,
    ) {
        Ok(api) => api.with_page_size(config.backend.page_size),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut favorites = FavoritesStore::open(&config.favorites_path);

    if let Some(title) = &config.toggle_favorite {
        let is_favorite = favorites.toggle(title);
        info!(
            "'{}' is {} a favorite",
            title,
            if is_favorite { "now" } else { "no longer" }
        );
    }

    let analytics = AnalyticsAPI::new(api.clone());
    analytics.track_filter(&config.criteria).await;

    match load_listing(&api, &config.criteria, favorites.favorites(), &config.site_url).await {
        Ok(cards) => {
            cards.iter().for_each(|card| {
                info!(
                    "{}{} | {} | {} | {}",
                    if card.is_favorite { "★ " } else { "" },
                    card.date_label,
                    card.title,
                    card.venue,
                    card.ticket_link.as_deref().unwrap_or(&card.detail_url)
                )
            });

            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Couldn't load concerts: {}", e);
            ExitCode::FAILURE
        }
    }
}
