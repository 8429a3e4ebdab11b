use serde::{Deserialize, Serialize};

/// Structured person profile returned by the person endpoints.
///
/// Every field is optional on the wire; the API omits whatever it has no
/// data for, and new fields appear between client releases.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PersonProfile {
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub personal_emails: Vec<String>,
    #[serde(default)]
    pub personal_numbers: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub follower_count: Option<u64>,
}

/// One entry in a person's work history.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Experience {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Structured company profile.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_size_on_site: Option<u64>,
    #[serde(default)]
    pub founded_year: Option<u32>,
    #[serde(default)]
    pub specialities: Vec<String>,
    #[serde(default)]
    pub hq_country: Option<String>,
    #[serde(default)]
    pub hq_city: Option<String>,
    #[serde(default)]
    pub follower_count: Option<u64>,
}

/// Result of a resolve/lookup operation: the canonical profile URL the
/// inputs mapped to.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ResolvedProfile {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name_similarity_score: Option<f64>,
}

/// Temporary profile picture URL.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ProfilePicture {
    #[serde(default)]
    pub tmp_profile_pic_url: Option<String>,
}

/// Employee headcounts for a company.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct EmployeeCount {
    #[serde(default)]
    pub total_employee: Option<u64>,
    #[serde(default)]
    pub listed_employee: Option<u64>,
}

/// One page of person search hits.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PersonSearchPage {
    #[serde(default)]
    pub results: Vec<PersonSearchHit>,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub total_result_count: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PersonSearchHit {
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub profile: Option<PersonProfile>,
}

/// One page of company search hits.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CompanySearchPage {
    #[serde(default)]
    pub results: Vec<CompanySearchHit>,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub total_result_count: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CompanySearchHit {
    #[serde(default)]
    pub company_url: Option<String>,
    #[serde(default)]
    pub profile: Option<CompanyProfile>,
}

/// Remaining credit balance for the configured API key.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CreditBalance {
    #[serde(default)]
    pub credit_balance: u64,
}
