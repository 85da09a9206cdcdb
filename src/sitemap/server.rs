use super::xml::render_sitemap;
use crate::config::model::Config;
use crate::events::api::{APIError, EventsAPI};
use axum::{
    extract::State,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use std::sync::Arc;
use thiserror::Error;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, instrument};

const CACHE_ONE_HOUR: &str = "public, max-age=3600";

pub struct AppState {
    pub api: EventsAPI,
    pub site_url: String,
}

impl AppState {
    pub fn new(api: EventsAPI, site_url: &str) -> Arc<Self> {
        Arc::new(Self {
            api,
            site_url: site_url.to_string(),
        })
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Couldn't load events: {0}")]
    Backend(#[from] APIError),

    #[error("Server failed: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{}", self);

        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/sitemap.xml", get(sitemap_handler))
        .layer(cors)
        .with_state(state)
}

#[instrument(skip(state))]
pub async fn sitemap_handler(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let today = Local::now().date_naive();
    let events = state.api.get_upcoming_events(today).await?;

    info!("Rendering sitemap with {} events", events.len());

    let xml = render_sitemap(&state.site_url, &events, today);

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/xml; charset=utf-8")),
            (CACHE_CONTROL, HeaderValue::from_static(CACHE_ONE_HOUR)),
        ],
        xml,
    )
        .into_response())
}

pub async fn start_server(config: &Config) -> Result<(), AppError> {
    let api = EventsAPI::with_retries(
        &config.backend.url,
        &config.backend.api_key,
        config.backend.max_retries,
    )?
    .with_page_size(config.backend.page_size);

    let app = router(AppState::new(api, &config.site_url));

    let address = format!("0.0.0.0:{}", config.sitemap_port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Sitemap server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
