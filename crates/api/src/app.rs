use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use persistence::repositories::ContactStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id, METRICS_PATH,
};
use crate::routes::{api_contacts, contacts, health};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, store: Arc<dyn ContactStore>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        store,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Browser-facing pages and form posts
    let ui_routes = Router::new()
        .route("/", get(contacts::index))
        .route("/add", post(contacts::add_contact))
        .route("/edit/:id", post(contacts::edit_contact))
        .route("/delete/:id", post(contacts::delete_contact));

    let api_routes = Router::new()
        .route(
            "/api/v1/contacts",
            get(api_contacts::list_contacts).post(api_contacts::create_contact),
        )
        .route(
            "/api/v1/contacts/:id",
            put(api_contacts::update_contact).delete(api_contacts::delete_contact),
        );

    let mut public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));
    if config.metrics.enabled {
        public_routes = public_routes.route(METRICS_PATH, get(metrics_handler));
    }

    Router::new()
        .merge(public_routes)
        .merge(ui_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
