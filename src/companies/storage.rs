//! Query executor seam for the companies API.
//!
//! `CompanyStore` is the only thing handlers know about persistence. The
//! PostgreSQL implementation runs one parameterized statement per call and
//! hands back flat rows; reshaping (like folding join rows) happens in
//! `resource`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, Connection, PgPool, Row};
use tracing::{info_span, instrument, Instrument};

use super::types::{Company, CompanySummary, Industry};

/// One row of the company/industry LEFT JOIN. `industry` is `None` when the
/// company has no linked industries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyIndustryRow {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Checks the backing store is reachable.
    async fn ping(&self) -> Result<()>;

    /// All companies in store order.
    async fn list_companies(&self) -> Result<Vec<CompanySummary>>;

    /// Flat join rows for one company; empty when the code is unknown.
    async fn company_industry_rows(&self, code: &str) -> Result<Vec<CompanyIndustryRow>>;

    /// Inserts a company. Duplicate codes fail with the store's error.
    async fn insert_company(&self, code: &str, name: &str) -> Result<CompanySummary>;

    /// Returns `None` when no row matched `code`.
    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Company>>;

    /// Returns the deleted code, or `None` when no row matched.
    async fn delete_company(&self, code: &str) -> Result<Option<String>>;

    async fn list_industries(&self) -> Result<Vec<Industry>>;
}

#[derive(Debug, Clone)]
pub struct PgCompanyStore {
    pool: PgPool,
}

impl PgCompanyStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn summary_from_row(row: &PgRow) -> Result<CompanySummary> {
    Ok(CompanySummary {
        code: row.try_get("code")?,
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    async fn ping(&self) -> Result<()> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("Failed to acquire database connection")?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("Failed to ping database")
    }

    #[instrument(skip(self))]
    async fn list_companies(&self) -> Result<Vec<CompanySummary>> {
        let rows = sqlx::query("SELECT code, name FROM companies")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list companies")?;

        rows.iter().map(summary_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn company_industry_rows(&self, code: &str) -> Result<Vec<CompanyIndustryRow>> {
        let query = r"
            SELECT c.code, c.name, c.description, i.industry
            FROM companies AS c
            LEFT JOIN company_industries AS ci ON c.code = ci.comp_code
            LEFT JOIN industries AS i ON ci.ind_code = i.code
            WHERE c.code = $1
        ";
        let rows = sqlx::query(query)
            .bind(code)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch company with industries")?;

        rows.iter()
            .map(|row| -> Result<CompanyIndustryRow> {
                Ok(CompanyIndustryRow {
                    code: row.try_get("code")?,
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                    industry: row.try_get("industry")?,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn insert_company(&self, code: &str, name: &str) -> Result<CompanySummary> {
        let query = r"
            INSERT INTO companies (code, name)
            VALUES ($1, $2)
            RETURNING code, name
        ";
        let row = sqlx::query(query)
            .bind(code)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert company")?;

        summary_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Company>> {
        let query = r"
            UPDATE companies
            SET name = $1, description = $2
            WHERE code = $3
            RETURNING code, name, description
        ";
        let row = sqlx::query(query)
            .bind(name)
            .bind(description)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update company")?;

        row.map(|row| -> Result<Company> {
            Ok(Company {
                code: row.try_get("code")?,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self))]
    async fn delete_company(&self, code: &str) -> Result<Option<String>> {
        let row = sqlx::query("DELETE FROM companies WHERE code = $1 RETURNING code")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to delete company")?;

        Ok(row
            .map(|row| row.try_get::<String, _>("code"))
            .transpose()?)
    }

    #[instrument(skip(self))]
    async fn list_industries(&self) -> Result<Vec<Industry>> {
        let rows = sqlx::query("SELECT code, industry FROM industries")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list industries")?;

        rows.iter()
            .map(|row| -> Result<Industry> {
                Ok(Industry {
                    code: row.try_get("code")?,
                    industry: row.try_get("industry")?,
                })
            })
            .collect()
    }
}
