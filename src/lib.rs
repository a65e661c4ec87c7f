//! # Companies
//!
//! `companies` is a small HTTP CRUD service over a PostgreSQL store holding
//! companies and the industries they are linked to.
//!
//! ## Data Model
//!
//! - **Companies** are identified by an immutable `code`; only `name` and
//!   `description` can change after creation.
//! - **Industries** are read-only reference rows.
//! - **`company_industries`** links both sides many-to-many. The company detail
//!   endpoint folds the flat join rows into a single record with an
//!   `industries` list.
//!
//! ## Errors
//!
//! Every failure is an [`companies::ApiError`] rendered as
//! `{"error": {"message": ..., "status": ...}}`.

pub mod cli;
pub mod companies;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
