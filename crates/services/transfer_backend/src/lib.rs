// File: services/transfer_backend/src/lib.rs
pub mod service_factory;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use transfer_common::http::{route_fallback, with_cors};
use transfer_common::services::CalendarService;
use transfer_config::AppConfig;

/// The full application: `/api/health`, `/api/create-booking` and, with the
/// `openapi` feature, Swagger UI at `/api/docs`.
///
/// Unknown paths answer preflights with 200 and everything else with 404.
pub fn app(config: Arc<AppConfig>, calendar: Arc<dyn CalendarService>) -> Router {
    let api_router = Router::new()
        .merge(transfer_common::routes(config.clone()))
        .merge(transfer_gcal::routes::routes(config.clone(), calendar));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new()
        .nest("/api", api_router)
        .fallback(route_fallback);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(docs::swagger_ui());
    }

    with_cors(app, &config.cors, "GET, POST, OPTIONS").layer(TraceLayer::new_for_http())
}

#[cfg(feature = "openapi")]
mod docs {
    use transfer_gcal::doc::BookingApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Transfer Booking API",
            version = "0.1.0",
            description = "Transfer booking service API docs",
            license(name = "MIT", url = "https://opensource.org/licenses/MIT")
        ),
        paths(transfer_common::handlers::health_handler),
        components(schemas(transfer_common::booking::HealthResponse)),
        tags((name = "Health", description = "Service status")),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    pub fn swagger_ui() -> SwaggerUi {
        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
    }
}
