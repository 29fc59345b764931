// handlers/mod.rs - HTTP surface
//
// /                  service info
// /health            store health
// /api/todos[/:id]   todo collection
// /api/users[/:id]   user collection

pub mod resource;
pub mod system;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::resources::{Resource, ResourceController, Todo, User};
use crate::store::DocumentStore;

/// Routes without global middleware. The store handle is shared by every
/// controller.
pub fn router(store: Arc<dyn DocumentStore>) -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .with_state(Arc::clone(&store))
        .merge(resource_routes::<Todo>(Arc::clone(&store)))
        .merge(resource_routes::<User>(store))
}

/// Full application: routes plus tracing and CORS layers.
pub fn app(store: Arc<dyn DocumentStore>, security: &SecurityConfig) -> Router {
    let middleware = ServiceBuilder::new().layer(TraceLayer::new_for_http());
    let app = router(store);
    if security.enable_cors {
        app.layer(middleware.layer(cors_layer(&security.cors_origins)))
    } else {
        app.layer(middleware)
    }
}

fn resource_routes<R: Resource>(store: Arc<dyn DocumentStore>) -> Router {
    let collection = format!("/api/{}", R::COLLECTION);
    let record = format!("{}/:id", collection);

    Router::new()
        .route(&collection, get(resource::list::<R>).post(resource::create::<R>))
        .route(&record, get(resource::get_one::<R>).delete(resource::delete::<R>))
        .with_state(ResourceController::<R>::new(store))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
