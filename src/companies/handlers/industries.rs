use axum::{extract::Extension, response::IntoResponse, Json};
use tracing::instrument;

use crate::companies::{
    error::{ApiError, ErrorResponse},
    resource::CompanyResource,
    types::IndustryListResponse,
};

#[utoipa::path(
    get,
    path = "/industries",
    responses(
        (status = 200, description = "List industries.", body = IndustryListResponse),
        (status = 500, description = "Store failure.", body = ErrorResponse),
    ),
    tag = "industries"
)]
// read-only; industries are managed outside this service
#[instrument(skip(resource))]
pub async fn list_industries(
    Extension(resource): Extension<CompanyResource>,
) -> Result<impl IntoResponse, ApiError> {
    let industries = resource.industries().await?;

    Ok(Json(IndustryListResponse { industries }))
}
