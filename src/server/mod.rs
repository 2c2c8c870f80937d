pub mod handlers;
pub mod types;

use crate::{
    config::Config,
    model::{artifacts, Predictor},
    store::UserStore,
    Result,
};
use axum::{
    routing::{get, post},
    Router,
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub async fn run(config: Config) -> Result<()> {
    // Initialize the user store
    let db_path =
        std::env::var("USER_DB_PATH").unwrap_or_else(|_| config.server.database_path.clone());
    let store = UserStore::new(&db_path).await?;

    // Load model artifacts; a failure here means the process never serves
    let (model, transformer) =
        artifacts::load(&config.model.model_path, &config.model.transformer_path).await?;
    let predictor = Predictor::new(model, transformer)?;

    let app_state = AppState {
        store: Arc::new(store),
        predictor: Arc::new(predictor),
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/healthcheck", get(handlers::healthcheck))
        .route("/api/users/create", post(handlers::create_user))
        .route(
            "/api/users/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/api/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
