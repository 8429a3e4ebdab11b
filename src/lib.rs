//! `enrich-http` is an async HTTP client for a profile/company
//! data-enrichment REST API.
//!
//! The crate wraps the enrichment endpoints with typed methods on
//! [`EnrichClient`] and routes every call through one execution core:
//! bearer-token auth, a per-attempt timeout, uniform error classification,
//! and retry with rate-limit-aware exponential backoff. [`run_bulk`] fans
//! out many independent calls under a fixed concurrency cap and returns one
//! outcome per call in input order.
//!
//! ```no_run
//! use enrich_http::{EnrichClient, PersonProfileParams};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = EnrichClient::from_env().expect("missing ENRICH_* env vars");
//! let person = client
//!     .person_profile(PersonProfileParams::new("https://example.com/in/gates"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod bulk;
mod client;
mod decode;
mod error;
mod options;
mod params;
mod request;
mod types;

pub use bulk::run_bulk;
pub use client::{EnrichClient, DEFAULT_BASE_URL};
pub use decode::Decoded;
pub use error::EnrichError;
pub use options::{ClientOptions, DEFAULT_MAX_WORKERS};
pub use params::{
    CompanyProfileParams, CompanySearchParams, EmailLookupParams, EmployeeCountParams,
    PersonProfileParams, PersonSearchParams, ResolveCompanyParams, ResolvePersonParams,
};
pub use request::{Method, RequestSpec};
pub use types::{
    CompanyProfile, CompanySearchHit, CompanySearchPage, CreditBalance, EmployeeCount, Experience,
    PersonProfile, PersonSearchHit, PersonSearchPage, ProfilePicture, ResolvedProfile,
};

pub type Result<T> = std::result::Result<T, EnrichError>;
