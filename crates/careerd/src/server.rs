//! HTTP server for careerd

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{middleware, Router};
use career_common::i18n::Translations;
use career_common::modules;
use career_common::{CareerStore, ProgressEngine};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth;
use crate::config::Config;
use crate::routes;

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<CareerStore>,
    pub engine: ProgressEngine,
    pub translations: Translations,
    pub config: Config,
    pub start_time: Instant,
}

pub type AppStateArc = Arc<AppState>;

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(CareerStore::open(&config.server.database_path)?);
        let catalog = modules::load_or_default(config.modules.map_path.as_deref());
        let engine = ProgressEngine::new(Arc::clone(&store), catalog);
        let translations = Translations::new(
            &config.i18n.translations_dir,
            config.i18n.default_locale.as_str(),
        );

        Ok(Self {
            store,
            engine,
            translations,
            config,
            start_time: Instant::now(),
        })
    }
}

/// Build the full router: the API behind the auth layer, health outside it.
pub fn router(state: AppStateArc) -> Router {
    let api = Router::new()
        .merge(routes::career_routes())
        .merge(routes::step_routes())
        .merge(routes::progress_routes())
        .merge(routes::challenge_routes())
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::authenticate,
        ));

    Router::new()
        .merge(api)
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(config: Config) -> Result<()> {
    if config.auth.shared_secret.is_empty() {
        warn!("Auth shared secret is empty; bearer token checks are disabled");
    }

    let state = Arc::new(AppState::new(config)?);
    let app = router(Arc::clone(&state));

    let addr = state.config.server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
