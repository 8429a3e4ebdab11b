//! Parameter structs for the operation catalog.
//!
//! Each struct mirrors one endpoint's recognized parameters. Required inputs
//! are plain fields set through the constructor; optional ones default to
//! `None` and are omitted from the request entirely when unset.

/// Parameters for [`person_profile`](crate::EnrichClient::person_profile).
///
/// The enrichment toggles (`extra`, `personal_email`, ...) accept the API's
/// `"include"` / `"exclude"` values; unset means the endpoint default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonProfileParams {
    pub profile_url: String,
    pub extra: Option<String>,
    pub personal_email: Option<String>,
    pub personal_contact_number: Option<String>,
    pub skills: Option<String>,
    pub use_cache: Option<String>,
    pub fallback_to_cache: Option<String>,
}

impl PersonProfileParams {
    pub fn new(profile_url: impl Into<String>) -> Self {
        Self {
            profile_url: profile_url.into(),
            ..Self::default()
        }
    }
}

/// Parameters for [`resolve_person`](crate::EnrichClient::resolve_person).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvePersonParams {
    pub first_name: String,
    pub last_name: Option<String>,
    pub company_domain: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
}

impl ResolvePersonParams {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..Self::default()
        }
    }
}

/// Parameters for
/// [`lookup_person_by_email`](crate::EnrichClient::lookup_person_by_email).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmailLookupParams {
    pub email: String,
    pub lookup_depth: Option<String>,
}

impl EmailLookupParams {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            lookup_depth: None,
        }
    }
}

/// Parameters for [`company_profile`](crate::EnrichClient::company_profile).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompanyProfileParams {
    pub url: String,
    pub categories: Option<String>,
    pub funding_data: Option<String>,
    pub exit_data: Option<String>,
    pub acquisitions: Option<String>,
    pub use_cache: Option<String>,
}

impl CompanyProfileParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Parameters for [`resolve_company`](crate::EnrichClient::resolve_company).
///
/// At least one of the fields should be set for the lookup to have anything
/// to work with; the API answers 400 otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolveCompanyParams {
    pub company_name: Option<String>,
    pub company_domain: Option<String>,
    pub company_location: Option<String>,
}

/// Parameters for
/// [`company_employee_count`](crate::EnrichClient::company_employee_count).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmployeeCountParams {
    pub url: String,
    pub employment_status: Option<String>,
}

impl EmployeeCountParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            employment_status: None,
        }
    }
}

/// Filters for [`search_people`](crate::EnrichClient::search_people).
/// Sent as the POST body; `page_size` travels as a query parameter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonSearchParams {
    pub country: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub current_company_name: Option<String>,
    pub current_role_title: Option<String>,
    pub page_size: Option<u32>,
}

/// Filters for [`search_companies`](crate::EnrichClient::search_companies).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompanySearchParams {
    pub name: Option<String>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub employee_count_min: Option<u64>,
    pub employee_count_max: Option<u64>,
    pub page_size: Option<u32>,
}
