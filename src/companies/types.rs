//! Request/response types for the companies API.
//!
//! These payloads are shared between handlers and `OpenAPI` generation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    pub code: String,
    pub name: String,
}

/// `code` is rejected before this type is parsed, so it has no field for it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CompanyDetail {
    pub company_code: String,
    pub company_name: String,
    pub company_description: Option<String>,
    pub industries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Industry {
    pub code: String,
    pub industry: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanySummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedCompanyResponse {
    pub company: CompanySummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub company: Company,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IndustryListResponse {
    pub industries: Vec<Industry>,
}
