//! Route handlers for the companies service.
//!
//! Handlers only extract path/body parameters and shape the JSON envelope;
//! the operations themselves live on `CompanyResource`.

pub mod companies;
pub mod health;
pub mod industries;

pub use self::companies::{
    create_company, delete_company, get_company, list_companies, patch_company,
};
pub use self::health::health;
pub use self::industries::list_industries;
