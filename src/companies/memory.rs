//! In-memory `CompanyStore` for development and tests.
//!
//! Mirrors the PostgreSQL schema closely enough for the handlers not to tell
//! the difference: insertion order is preserved, codes and names are unique, the detail
//! query yields one `industry: None` row for an unlinked company, and deleting
//! a company drops its `company_industries` links.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    storage::{CompanyIndustryRow, CompanyStore},
    types::{Company, CompanySummary, Industry},
};

#[derive(Debug, Default)]
struct Tables {
    companies: Vec<Company>,
    industries: Vec<Industry>,
    // (comp_code, ind_code)
    company_industries: Vec<(String, String)>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCompanyStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCompanyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an industry row.
    /// # Errors
    /// Fails when the industry code already exists.
    pub async fn insert_industry(&self, code: &str, industry: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.industries.iter().any(|row| row.code == code) {
            bail!("duplicate key value violates unique constraint \"industries_pkey\"");
        }
        tables.industries.push(Industry {
            code: code.to_string(),
            industry: industry.to_string(),
        });
        Ok(())
    }

    /// Links a company to an industry.
    /// # Errors
    /// Fails when either code is unknown or the link already exists.
    pub async fn link_industry(&self, comp_code: &str, ind_code: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.companies.iter().any(|row| row.code == comp_code) {
            bail!("insert violates foreign key constraint on comp_code '{comp_code}'");
        }
        if !tables.industries.iter().any(|row| row.code == ind_code) {
            bail!("insert violates foreign key constraint on ind_code '{ind_code}'");
        }
        if tables
            .company_industries
            .iter()
            .any(|(comp, ind)| comp == comp_code && ind == ind_code)
        {
            bail!("duplicate key value violates unique constraint \"company_industries_pkey\"");
        }
        tables
            .company_industries
            .push((comp_code.to_string(), ind_code.to_string()));
        Ok(())
    }
}

#[async_trait]
impl CompanyStore for InMemoryCompanyStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<CompanySummary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .companies
            .iter()
            .map(|company| CompanySummary {
                code: company.code.clone(),
                name: company.name.clone(),
            })
            .collect())
    }

    async fn company_industry_rows(&self, code: &str) -> Result<Vec<CompanyIndustryRow>> {
        let tables = self.tables.read().await;
        let Some(company) = tables.companies.iter().find(|row| row.code == code) else {
            return Ok(Vec::new());
        };

        let join_row = |industry: Option<String>| CompanyIndustryRow {
            code: company.code.clone(),
            name: company.name.clone(),
            description: company.description.clone(),
            industry,
        };

        let rows: Vec<CompanyIndustryRow> = tables
            .company_industries
            .iter()
            .filter(|(comp, _)| comp == code)
            .map(|(_, ind)| {
                let industry = tables
                    .industries
                    .iter()
                    .find(|row| &row.code == ind)
                    .map(|row| row.industry.clone());
                join_row(industry)
            })
            .collect();

        if rows.is_empty() {
            Ok(vec![join_row(None)])
        } else {
            Ok(rows)
        }
    }

    async fn insert_company(&self, code: &str, name: &str) -> Result<CompanySummary> {
        let mut tables = self.tables.write().await;
        if tables.companies.iter().any(|row| row.code == code) {
            bail!("duplicate key value violates unique constraint \"companies_pkey\"");
        }
        if tables.companies.iter().any(|row| row.name == name) {
            bail!("duplicate key value violates unique constraint \"companies_name_key\"");
        }
        tables.companies.push(Company {
            code: code.to_string(),
            name: name.to_string(),
            description: None,
        });
        Ok(CompanySummary {
            code: code.to_string(),
            name: name.to_string(),
        })
    }

    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Company>> {
        let mut tables = self.tables.write().await;
        if tables
            .companies
            .iter()
            .any(|row| row.code != code && row.name == name)
        {
            bail!("duplicate key value violates unique constraint \"companies_name_key\"");
        }
        let Some(company) = tables.companies.iter_mut().find(|row| row.code == code) else {
            return Ok(None);
        };
        company.name = name.to_string();
        company.description = description.map(str::to_string);
        Ok(Some(company.clone()))
    }

    async fn delete_company(&self, code: &str) -> Result<Option<String>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.companies.iter().position(|row| row.code == code) else {
            return Ok(None);
        };
        let removed = tables.companies.remove(index);
        tables.company_industries.retain(|(comp, _)| comp != code);
        Ok(Some(removed.code))
    }

    async fn list_industries(&self) -> Result<Vec<Industry>> {
        Ok(self.tables.read().await.industries.clone())
    }
}
