//! The five company operations, independent of HTTP.
//!
//! `CompanyResource` owns the injected store and performs its own existence
//! checks so a missing row is always a typed `NotFound` rather than whatever
//! the store happens to return.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    error::ApiError,
    storage::{CompanyIndustryRow, CompanyStore},
    types::{Company, CompanyDetail, CompanySummary, Industry, UpdateCompanyRequest},
};

#[derive(Clone)]
pub struct CompanyResource {
    store: Arc<dyn CompanyStore>,
}

impl std::fmt::Debug for CompanyResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanyResource").finish_non_exhaustive()
    }
}

impl CompanyResource {
    #[must_use]
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn CompanyStore {
        self.store.as_ref()
    }

    /// # Errors
    /// Store failures are returned as `Unhandled`.
    pub async fn list(&self) -> Result<Vec<CompanySummary>, ApiError> {
        Ok(self.store.list_companies().await?)
    }

    /// # Errors
    /// `NotFound` when no company has this code.
    pub async fn get(&self, code: &str) -> Result<CompanyDetail, ApiError> {
        let rows = self.store.company_industry_rows(code).await?;
        debug!(code, rows = rows.len(), "company join rows fetched");

        collapse_rows(rows).ok_or_else(|| ApiError::company_not_found(code))
    }

    /// # Errors
    /// Duplicate codes surface as `Unhandled`.
    pub async fn create(&self, code: &str, name: &str) -> Result<CompanySummary, ApiError> {
        let company = self.store.insert_company(code, name).await?;
        info!(code = %company.code, "company created");
        Ok(company)
    }

    /// Applies an update payload. Any `code` key is refused, even `null`.
    ///
    /// # Errors
    /// `BadRequest` for a `code` key or a malformed payload, `NotFound` when no
    /// company has this code.
    pub async fn update(&self, code: &str, payload: Value) -> Result<Company, ApiError> {
        let payload = parse_update(payload)?;

        let company = self
            .store
            .update_company(code, &payload.name, payload.description.as_deref())
            .await?
            .ok_or_else(|| ApiError::company_not_found(code))?;

        info!(code = %company.code, "company updated");
        Ok(company)
    }

    /// # Errors
    /// `NotFound` when no company has this code.
    pub async fn delete(&self, code: &str) -> Result<(), ApiError> {
        let deleted = self
            .store
            .delete_company(code)
            .await?
            .ok_or_else(|| ApiError::company_not_found(code))?;

        info!(code = %deleted, "company deleted");
        Ok(())
    }

    /// # Errors
    /// Store failures are returned as `Unhandled`.
    pub async fn industries(&self) -> Result<Vec<Industry>, ApiError> {
        Ok(self.store.list_industries().await?)
    }
}

fn parse_update(payload: Value) -> Result<UpdateCompanyRequest, ApiError> {
    let Value::Object(fields) = payload else {
        return Err(ApiError::BadRequest(
            "Expected a JSON object body".to_string(),
        ));
    };

    if fields.contains_key("code") {
        return Err(ApiError::BadRequest("Not allowed".to_string()));
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|err| ApiError::BadRequest(format!("Invalid company payload: {err}")))
}

/// Folds LEFT JOIN rows into one company record.
///
/// Scalar fields come from the first row; `industries` keeps join order and
/// drops the NULL produced for a company without any linked industry.
/// Returns `None` for an empty row set.
pub(crate) fn collapse_rows(rows: Vec<CompanyIndustryRow>) -> Option<CompanyDetail> {
    let mut rows = rows.into_iter();
    let first = rows.next()?;

    let detail = CompanyDetail {
        industries: first.industry.into_iter().collect(),
        company_code: first.code,
        company_name: first.name,
        company_description: first.description,
    };

    Some(rows.fold(detail, |mut detail, row| {
        detail.industries.extend(row.industry);
        detail
    }))
}
