use std::fmt;
use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    decode::decode_payload,
    params::{
        CompanyProfileParams, CompanySearchParams, EmailLookupParams, EmployeeCountParams,
        PersonProfileParams, PersonSearchParams, ResolveCompanyParams, ResolvePersonParams,
    },
    request::{Method, RequestSpec},
    types::{
        CompanyProfile, CompanySearchPage, CreditBalance, EmployeeCount, PersonProfile,
        PersonSearchPage, ProfilePicture, ResolvedProfile,
    },
    ClientOptions, Decoded, EnrichError, Result,
};

/// Base URL used when `ENRICH_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.enrichhq.com";

#[derive(Clone)]
/// HTTP client for the enrichment API.
///
/// Owns the configuration (base URL, API key, timeout and retry budget) for
/// its whole lifetime; nothing is mutated after construction.
pub struct EnrichClient {
    http: reqwest::Client,
    base_url: String,
    auth: String,
    options: ClientOptions,
}

impl fmt::Debug for EnrichClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichClient")
            .field("base_url", &self.base_url)
            .field("auth", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl EnrichClient {
    /// Creates a client from a base URL and an API key.
    ///
    /// If the key is missing the `Bearer ` prefix, it is added automatically.
    pub fn new(base_url: impl Into<String>, api_key: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            auth: normalize_bearer_authorization(api_key.as_ref()),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `ENRICH_API_KEY` — API key (Bearer prefix optional), required
    /// - `ENRICH_BASE_URL` — endpoint base URL, defaults to [`DEFAULT_BASE_URL`]
    /// - `ENRICH_TIMEOUT` — per-attempt timeout in seconds
    /// - `ENRICH_MAX_RETRIES` — retries after the initial attempt
    /// - `ENRICH_MAX_BACKOFF_SECONDS` — backoff sleep cap
    /// - `ENRICH_MAX_WORKERS` — bulk concurrency cap
    ///
    /// Returns an error if the key is missing or empty, or if a numeric
    /// override does not parse.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use enrich_http::EnrichClient;
    ///
    /// let client = EnrichClient::from_env().expect("missing ENRICH_* env vars");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let api_key = std::env::var("ENRICH_API_KEY")
            .map_err(|_| "missing ENRICH_API_KEY environment variable".to_owned())?;
        if api_key.trim().is_empty() {
            return Err("ENRICH_API_KEY is set but empty".to_owned());
        }
        let base_url =
            std::env::var("ENRICH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());

        let mut options = ClientOptions::default();
        if let Some(timeout) = env_parse::<u64>("ENRICH_TIMEOUT")? {
            options.timeout_secs = timeout;
        }
        if let Some(retries) = env_parse::<usize>("ENRICH_MAX_RETRIES")? {
            options.max_retries = retries;
        }
        if let Some(cap) = env_parse::<u64>("ENRICH_MAX_BACKOFF_SECONDS")? {
            options.max_backoff_secs = cap;
        }
        if let Some(workers) = env_parse::<usize>("ENRICH_MAX_WORKERS")? {
            options.max_workers = workers;
        }

        Ok(Self::new(base_url, api_key).with_options(options))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Options this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Person profile endpoint. Cost: 1 credit per successful request.
    pub async fn person_profile(
        &self,
        params: PersonProfileParams,
    ) -> Result<Decoded<PersonProfile>> {
        let spec = RequestSpec::get("/v2/person")
            .query("profile_url", params.profile_url)
            .query_opt("extra", params.extra)
            .query_opt("personal_email", params.personal_email)
            .query_opt("personal_contact_number", params.personal_contact_number)
            .query_opt("skills", params.skills)
            .query_opt("use_cache", params.use_cache)
            .query_opt("fallback_to_cache", params.fallback_to_cache);
        self.execute(spec).await
    }

    /// Resolves a person from name and employment hints to a profile URL.
    /// Cost: 2 credits per successful request.
    pub async fn resolve_person(
        &self,
        params: ResolvePersonParams,
    ) -> Result<Decoded<ResolvedProfile>> {
        let spec = RequestSpec::get("/v2/person/resolve")
            .query("first_name", params.first_name)
            .query_opt("last_name", params.last_name)
            .query_opt("company_domain", params.company_domain)
            .query_opt("location", params.location)
            .query_opt("title", params.title);
        self.execute(spec).await
    }

    /// Looks up the profile behind a work email address.
    pub async fn lookup_person_by_email(
        &self,
        params: EmailLookupParams,
    ) -> Result<Decoded<ResolvedProfile>> {
        let spec = RequestSpec::get("/v2/person/resolve/email")
            .query("email", params.email)
            .query_opt("lookup_depth", params.lookup_depth);
        self.execute(spec).await
    }

    /// Fetches a temporary URL for a person's profile picture.
    pub async fn person_profile_picture(
        &self,
        profile_url: impl Into<String>,
    ) -> Result<Decoded<ProfilePicture>> {
        let spec =
            RequestSpec::get("/v2/person/profile-picture").query("profile_url", profile_url);
        self.execute(spec).await
    }

    /// Company profile endpoint. Cost: 1 credit per successful request.
    pub async fn company_profile(
        &self,
        params: CompanyProfileParams,
    ) -> Result<Decoded<CompanyProfile>> {
        let spec = RequestSpec::get("/v2/company")
            .query("url", params.url)
            .query_opt("categories", params.categories)
            .query_opt("funding_data", params.funding_data)
            .query_opt("exit_data", params.exit_data)
            .query_opt("acquisitions", params.acquisitions)
            .query_opt("use_cache", params.use_cache);
        self.execute(spec).await
    }

    /// Resolves a company from name, domain, or location hints.
    pub async fn resolve_company(
        &self,
        params: ResolveCompanyParams,
    ) -> Result<Decoded<ResolvedProfile>> {
        let spec = RequestSpec::get("/v2/company/resolve")
            .query_opt("company_name", params.company_name)
            .query_opt("company_domain", params.company_domain)
            .query_opt("company_location", params.company_location);
        self.execute(spec).await
    }

    /// Employee headcount for a company.
    pub async fn company_employee_count(
        &self,
        params: EmployeeCountParams,
    ) -> Result<Decoded<EmployeeCount>> {
        let spec = RequestSpec::get("/v2/company/employees/count")
            .query("url", params.url)
            .query_opt("employment_status", params.employment_status);
        self.execute(spec).await
    }

    /// Searches people matching the given filters.
    /// Cost: 3 credits per returned result.
    pub async fn search_people(
        &self,
        params: PersonSearchParams,
    ) -> Result<Decoded<PersonSearchPage>> {
        let spec = RequestSpec::post("/v2/search/person")
            .query_opt("page_size", params.page_size.map(|size| size.to_string()))
            .field_opt("country", params.country)
            .field_opt("first_name", params.first_name)
            .field_opt("last_name", params.last_name)
            .field_opt("current_company_name", params.current_company_name)
            .field_opt("current_role_title", params.current_role_title);
        self.execute(spec).await
    }

    /// Searches companies matching the given filters.
    pub async fn search_companies(
        &self,
        params: CompanySearchParams,
    ) -> Result<Decoded<CompanySearchPage>> {
        let spec = RequestSpec::post("/v2/search/company")
            .query_opt("page_size", params.page_size.map(|size| size.to_string()))
            .field_opt("name", params.name)
            .field_opt("country", params.country)
            .field_opt("industry", params.industry)
            .field_opt("employee_count_min", params.employee_count_min)
            .field_opt("employee_count_max", params.employee_count_max);
        self.execute(spec).await
    }

    /// Remaining credit balance for the configured API key. Free.
    pub async fn credit_balance(&self) -> Result<Decoded<CreditBalance>> {
        self.execute(RequestSpec::get("/v2/credit-balance")).await
    }

    /// Sends an arbitrary [`RequestSpec`] through the same execution core and
    /// returns the raw JSON payload.
    ///
    /// Escape hatch for endpoints this crate has no typed wrapper for yet.
    pub async fn request_raw(&self, spec: RequestSpec) -> Result<Value> {
        let body = self.send_with_retry(&spec).await?;
        serde_json::from_str(&body).map_err(|err| {
            EnrichError::Decode(format!("invalid JSON response: {err}; body: {body}"))
        })
    }

    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
    ) -> Result<Decoded<T>> {
        let body = self.send_with_retry(&spec).await?;
        decode_payload(&body)
    }

    /// One logical request: issues attempts until a terminal success, a
    /// non-retryable classification, or retry exhaustion. The timeout applies
    /// per attempt, never to the sequence as a whole.
    async fn send_with_retry(&self, spec: &RequestSpec) -> Result<String> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut attempt = 0usize;
        loop {
            let request = match spec.method {
                Method::Get => self.http.get(&url),
                Method::Post => self.http.post(&url).json(&spec.body),
            };
            let mut request = request
                .header(header::AUTHORIZATION, &self.auth)
                .timeout(Duration::from_secs(self.options.timeout_secs));
            if !spec.query.is_empty() {
                request = request.query(&spec.query);
            }

            let response = request.send().await;

            match response {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.map_err(EnrichError::Transport)?;

                    if status == StatusCode::OK || status == StatusCode::ACCEPTED {
                        return Ok(body);
                    }

                    match status.as_u16() {
                        status @ (400 | 401 | 403 | 404) => {
                            return Err(EnrichError::Client { status, body });
                        }
                        429 => {
                            if attempt < self.options.max_retries {
                                let delay = self.backoff_delay(attempt);
                                tracing::debug!(
                                    path = %spec.path,
                                    attempt,
                                    delay_secs = delay.as_secs(),
                                    "rate limited, backing off before retry"
                                );
                                sleep(delay).await;
                                attempt += 1;
                                continue;
                            }
                            return Err(EnrichError::RateLimited { body });
                        }
                        // A bare 500 gets one extra attempt, and only from the
                        // first; a repeat propagates even with retries left.
                        500 => {
                            if attempt == 0 && self.options.max_retries > 0 {
                                tracing::debug!(path = %spec.path, "server error, retrying once");
                                attempt += 1;
                                continue;
                            }
                            return Err(EnrichError::Server { status: 500, body });
                        }
                        // Every other status is retried up to the budget,
                        // without a backoff sleep.
                        status => {
                            if attempt < self.options.max_retries {
                                tracing::debug!(
                                    path = %spec.path,
                                    status,
                                    attempt,
                                    "unexpected status, retrying"
                                );
                                attempt += 1;
                                continue;
                            }
                            return Err(classify_status(status, body));
                        }
                    }
                }
                Err(err) => {
                    if attempt < self.options.max_retries {
                        tracing::debug!(
                            path = %spec.path,
                            attempt,
                            error = %err,
                            "transport failure, retrying"
                        );
                        attempt += 1;
                        continue;
                    }
                    tracing::warn!(path = %spec.path, error = %err, "request failed after retries");
                    return Err(if err.is_timeout() {
                        EnrichError::Timeout(err)
                    } else {
                        EnrichError::Transport(err)
                    });
                }
            }
        }
    }

    /// Exponential backoff for rate-limited attempts, capped at
    /// `max_backoff_secs`.
    fn backoff_delay(&self, attempt: usize) -> Duration {
        let exp = attempt.min(16) as u32;
        let delay = self.options.base_backoff_secs.saturating_mul(1u64 << exp);
        Duration::from_secs(delay.min(self.options.max_backoff_secs))
    }
}

/// Maps a non-success status to its error class once retries are spent.
fn classify_status(status: u16, body: String) -> EnrichError {
    match status {
        400..=499 => EnrichError::Client { status, body },
        500..=599 => EnrichError::Server { status, body },
        _ => EnrichError::UnexpectedStatus { status, body },
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> std::result::Result<Option<T>, String> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("{name} is set but not a valid number: '{value}'")),
        Err(_) => Ok(None),
    }
}

fn normalize_bearer_authorization(api_key: &str) -> String {
    let key = api_key.trim();
    match key.split_once(' ') {
        Some((scheme, _)) if scheme.eq_ignore_ascii_case("bearer") => key.to_owned(),
        _ => format!("Bearer {key}"),
    }
}
