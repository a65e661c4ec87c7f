//! HTTP surface and server bootstrap for the companies API.
//!
//! The store is built once at startup and injected into `CompanyResource`,
//! which handlers reach through an `Extension`. Nothing else is shared between
//! requests.

#![allow(clippy::needless_for_each)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cli::telemetry;

pub mod error;
pub mod handlers;
pub mod memory;
pub mod resource;
pub mod storage;
pub mod types;

pub use self::error::ApiError;
pub use self::memory::InMemoryCompanyStore;
pub use self::resource::CompanyResource;
pub use self::storage::{CompanyIndustryRow, CompanyStore, PgCompanyStore};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::companies::list_companies,
        handlers::companies::get_company,
        handlers::companies::create_company,
        handlers::companies::patch_company,
        handlers::companies::delete_company,
        handlers::industries::list_industries,
    ),
    components(schemas(
        handlers::health::Health,
        error::ErrorResponse,
        types::CompanyListResponse,
        types::CompanyDetail,
        types::CreateCompanyRequest,
        types::CreatedCompanyResponse,
        types::UpdateCompanyRequest,
        types::CompanyResponse,
        types::DeletedResponse,
        types::IndustryListResponse,
    )),
    tags(
        (name = "companies", description = "Company CRUD"),
        (name = "industries", description = "Read-only industry listing"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router around an already constructed resource.
#[must_use]
pub fn router(resource: CompanyResource) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route(
            "/companies",
            get(handlers::list_companies).post(handlers::create_company),
        )
        .route(
            "/companies/:code",
            get(handlers::get_company)
                .patch(handlers::patch_company)
                .delete(handlers::delete_company),
        )
        .route("/industries", get(handlers::list_industries))
        .route("/health", get(handlers::health).options(handlers::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(resource)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to connect to the database or to bind the port
pub async fn new(port: u16, dsn: String, max_connections: u32) -> Result<()> {
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(max_connections)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let resource = CompanyResource::new(Arc::new(PgCompanyStore::new(pool)));
    let app = router(resource);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    let served = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    telemetry::shutdown_tracer();
    served?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests;
