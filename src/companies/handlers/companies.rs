//! Company CRUD handlers.
//!
//! Every handler returns `Result<_, ApiError>` so failures reach the single
//! `ApiError` translator; body extraction errors are folded into `BadRequest`
//! to keep error responses JSON.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::companies::{
    error::{ApiError, ErrorResponse},
    resource::CompanyResource,
    types::{
        CompanyDetail, CompanyListResponse, CompanyResponse, CreateCompanyRequest,
        CreatedCompanyResponse, DeletedResponse, UpdateCompanyRequest,
    },
};

#[utoipa::path(
    get,
    path = "/companies",
    responses(
        (status = 200, description = "List companies.", body = CompanyListResponse),
        (status = 500, description = "Store failure.", body = ErrorResponse),
    ),
    tag = "companies"
)]
/// Lists every company as `{code, name}` in store order.
#[instrument(skip(resource))]
pub async fn list_companies(
    Extension(resource): Extension<CompanyResource>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = resource.list().await?;

    Ok(Json(CompanyListResponse { companies }))
}

#[utoipa::path(
    get,
    path = "/companies/{code}",
    params(("code" = String, Path, description = "Company code")),
    responses(
        (status = 200, description = "Company detail with linked industries.", body = CompanyDetail),
        (status = 404, description = "Company not found.", body = ErrorResponse),
    ),
    tag = "companies"
)]
/// Fetches one company together with the labels of every linked industry.
#[instrument(skip(resource))]
pub async fn get_company(
    Path(code): Path<String>,
    Extension(resource): Extension<CompanyResource>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = resource.get(&code).await?;

    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created.", body = CreatedCompanyResponse),
        (status = 400, description = "Missing or malformed fields.", body = ErrorResponse),
        (status = 500, description = "Store failure, including duplicate codes.", body = ErrorResponse),
    ),
    tag = "companies"
)]
/// Creates a company from `{code, name}`; `description` is not settable here.
#[instrument(skip(resource, payload))]
pub async fn create_company(
    Extension(resource): Extension<CompanyResource>,
    payload: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let company = resource.create(&payload.code, &payload.name).await?;

    Ok((StatusCode::CREATED, Json(CreatedCompanyResponse { company })))
}

#[utoipa::path(
    patch,
    path = "/companies/{code}",
    request_body = UpdateCompanyRequest,
    params(("code" = String, Path, description = "Company code")),
    responses(
        (status = 200, description = "Company updated.", body = CompanyResponse),
        (status = 400, description = "Payload contains `code` or is malformed.", body = ErrorResponse),
        (status = 404, description = "Company not found.", body = ErrorResponse),
    ),
    tag = "companies"
)]
/// Replaces `name` and `description`. The body is taken as raw JSON so a `code`
/// key can be detected even when its value is `null`.
#[instrument(skip(resource, payload))]
pub async fn patch_company(
    Path(code): Path<String>,
    Extension(resource): Extension<CompanyResource>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let company = resource.update(&code, payload).await?;

    Ok(Json(CompanyResponse { company }))
}

#[utoipa::path(
    delete,
    path = "/companies/{code}",
    params(("code" = String, Path, description = "Company code")),
    responses(
        (status = 200, description = "Company deleted.", body = DeletedResponse),
        (status = 404, description = "Company not found.", body = ErrorResponse),
    ),
    tag = "companies"
)]
#[instrument(skip(resource))]
pub async fn delete_company(
    Path(code): Path<String>,
    Extension(resource): Extension<CompanyResource>,
) -> Result<impl IntoResponse, ApiError> {
    resource.delete(&code).await?;

    Ok(Json(DeletedResponse {
        status: "deleted".to_string(),
    }))
}
