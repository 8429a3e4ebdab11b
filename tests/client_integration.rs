use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Router,
};
use enrich_http::{
    ClientOptions, Decoded, EnrichClient, EnrichError, PersonProfileParams, PersonSearchParams,
    RequestSpec,
};
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
struct MockResponse {
    status: StatusCode,
    body: String,
    json: bool,
    delay: Duration,
}

impl MockResponse {
    fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body: body.to_string(),
            json: true,
            delay: Duration::from_millis(0),
        }
    }

    fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
            json: false,
            delay: Duration::from_millis(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the mock saw for one request, for asserting on the wire shape.
#[derive(Clone, Debug)]
struct RecordedRequest {
    method: String,
    path: String,
    query: String,
    authorization: Option<String>,
    body: String,
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    hits: Arc<AtomicUsize>,
}

async fn api_handler(State(state): State<MockState>, request: Request) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let (parts, body) = request.into_parts();
    let body_bytes = to_bytes(body, usize::MAX)
        .await
        .expect("request body must be readable");
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().unwrap_or_default().to_owned(),
        authorization: parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
        body: String::from_utf8_lossy(&body_bytes).into_owned(),
    };
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(recorded);

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let content_type = if response.json {
        "application/json"
    } else {
        "text/plain"
    };
    (
        response.status,
        [(header::CONTENT_TYPE, content_type)],
        response.body,
    )
}

struct TestServer {
    base_url: String,
    state: MockState,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .clone()
    }
}

async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new().fallback(api_handler).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        state,
        task,
    }
}

fn person_body() -> JsonValue {
    json!({
        "public_identifier": "gates",
        "full_name": "Bill Gates",
        "first_name": "Bill",
        "last_name": "Gates",
        "occupation": "Co-chair at Gates Foundation",
        "country": "US",
        "experiences": [
            { "company": "Gates Foundation", "title": "Co-chair" }
        ],
        "skills": ["philanthropy"]
    })
}

fn balance_body(balance: u64) -> JsonValue {
    json!({ "credit_balance": balance })
}

fn fast_options() -> ClientOptions {
    ClientOptions {
        timeout_secs: 5,
        max_retries: 2,
        base_backoff_secs: 1,
        max_backoff_secs: 60,
        ..ClientOptions::default()
    }
}

#[tokio::test]
async fn person_profile_decodes_typed_payload() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, person_body())]).await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let person = client
        .person_profile(PersonProfileParams::new("https://example.com/in/gates"))
        .await
        .expect("request must succeed")
        .typed()
        .expect("payload must match the declared shape");

    assert_eq!(person.full_name.as_deref(), Some("Bill Gates"));
    assert_eq!(person.experiences.len(), 1);
    assert_eq!(server.hits(), 1);

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/v2/person");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer token"));
}

#[tokio::test]
async fn absent_params_are_omitted_from_query() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, person_body())]).await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let params = PersonProfileParams {
        skills: Some("include".to_owned()),
        ..PersonProfileParams::new("https://example.com/in/gates")
    };
    client
        .person_profile(params)
        .await
        .expect("request must succeed");

    let query = server.requests()[0].query.clone();
    assert!(query.contains("profile_url="));
    assert!(query.contains("skills=include"));
    assert!(!query.contains("extra"));
    assert!(!query.contains("use_cache"));
    assert!(!query.contains("fallback_to_cache"));
}

#[tokio::test]
async fn accepted_status_counts_as_success() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::ACCEPTED,
        balance_body(42),
    )])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let balance = client
        .credit_balance()
        .await
        .expect("202 must be a success")
        .typed()
        .expect("payload must match");

    assert_eq!(balance.credit_balance, 42);
}

#[tokio::test]
async fn shape_mismatch_degrades_to_raw_json() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({ "credit_balance": "plenty" }),
    )])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let decoded = client
        .credit_balance()
        .await
        .expect("shape mismatch must not fail the call");

    match decoded {
        Decoded::Raw(value) => assert_eq!(value["credit_balance"], "plenty"),
        Decoded::Typed(_) => panic!("expected raw fallback"),
    }
}

#[tokio::test]
async fn non_json_success_body_is_decode_error() {
    let server = spawn_server(vec![MockResponse::text(StatusCode::OK, "<html>oops</html>")]).await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let err = client
        .credit_balance()
        .await
        .expect_err("non-JSON body must surface");

    assert!(matches!(err, EnrichError::Decode(_)));
}

#[tokio::test]
async fn rate_limited_retries_after_one_backoff() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::TOO_MANY_REQUESTS, json!({"error": "slow down"})),
        MockResponse::json(StatusCode::OK, balance_body(7)),
    ])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let started = Instant::now();
    let balance = client
        .credit_balance()
        .await
        .expect("must succeed after one retry")
        .typed()
        .expect("payload must match");
    let elapsed = started.elapsed();

    assert_eq!(balance.credit_balance, 7);
    assert_eq!(server.hits(), 2);
    // One backoff sleep of base * 2^0 = 1s.
    assert!(elapsed >= Duration::from_secs(1), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "elapsed: {elapsed:?}");
}

#[tokio::test]
async fn rate_limit_exhaustion_propagates_last_error() {
    let limited = MockResponse::json(StatusCode::TOO_MANY_REQUESTS, json!({"error": "slow down"}));
    let server = spawn_server(vec![limited.clone(), limited.clone(), limited]).await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(ClientOptions {
        max_retries: 2,
        base_backoff_secs: 0,
        ..fast_options()
    });

    let err = client
        .credit_balance()
        .await
        .expect_err("exhausted retries must fail");

    assert!(matches!(err, EnrichError::RateLimited { .. }));
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn server_error_retried_exactly_once() {
    let boom = MockResponse::json(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}));
    let server = spawn_server(vec![boom.clone(), boom, MockResponse::json(
        StatusCode::OK,
        balance_body(1),
    )])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(ClientOptions {
        max_retries: 5,
        ..fast_options()
    });

    let err = client
        .credit_balance()
        .await
        .expect_err("second consecutive 500 must propagate");

    assert!(matches!(err, EnrichError::Server { status: 500, .. }));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn server_error_then_success_recovers() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})),
        MockResponse::json(StatusCode::OK, balance_body(3)),
    ])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let balance = client
        .credit_balance()
        .await
        .expect("must succeed on the retry")
        .typed()
        .expect("payload must match");

    assert_eq!(balance.credit_balance, 3);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn client_error_is_never_retried() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::NOT_FOUND,
        json!({"error": "no such profile"}),
    )])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(ClientOptions {
        max_retries: 5,
        ..fast_options()
    });

    let err = client
        .person_profile(PersonProfileParams::new("https://example.com/in/nobody"))
        .await
        .expect_err("404 must surface immediately");

    assert!(matches!(err, EnrichError::Client { status: 404, .. }));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn zero_retries_means_single_attempt() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": "slow down"}),
    )])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(ClientOptions {
        max_retries: 0,
        ..fast_options()
    });

    let err = client
        .credit_balance()
        .await
        .expect_err("single attempt must fail");
    assert!(matches!(err, EnrichError::RateLimited { .. }));
    assert_eq!(server.hits(), 1);

    let server = spawn_server(vec![MockResponse::json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "boom"}),
    )])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(ClientOptions {
        max_retries: 0,
        ..fast_options()
    });

    let err = client
        .credit_balance()
        .await
        .expect_err("single attempt must fail");
    assert!(matches!(err, EnrichError::Server { status: 500, .. }));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn gateway_errors_retry_up_to_budget() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::SERVICE_UNAVAILABLE, json!({"error": "down"})),
        MockResponse::json(StatusCode::BAD_GATEWAY, json!({"error": "bad hop"})),
        MockResponse::json(StatusCode::OK, balance_body(9)),
    ])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let balance = client
        .credit_balance()
        .await
        .expect("must succeed within the retry budget")
        .typed()
        .expect("payload must match");

    assert_eq!(balance.credit_balance, 9);
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn unenumerated_status_is_retried_then_surfaces() {
    // A 301 without a Location header is not followed; like any status
    // outside the enumerated set it burns through the retry budget before
    // surfacing.
    let moved = MockResponse::json(StatusCode::MOVED_PERMANENTLY, json!({"error": "elsewhere"}));
    let server = spawn_server(vec![moved.clone(), moved]).await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(ClientOptions {
        max_retries: 1,
        ..fast_options()
    });

    let err = client
        .credit_balance()
        .await
        .expect_err("301 must not silently succeed");

    assert!(matches!(
        err,
        EnrichError::UnexpectedStatus { status: 301, .. }
    ));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn unlisted_client_status_retries_generically() {
    // Only 400/401/403/404 short-circuit; any other 4xx is treated like a
    // transient fault and retried without a backoff sleep.
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::PAYMENT_REQUIRED, json!({"error": "out of credits"})),
        MockResponse::json(StatusCode::OK, balance_body(12)),
    ])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let balance = client
        .credit_balance()
        .await
        .expect("must succeed within the retry budget")
        .typed()
        .expect("payload must match");

    assert_eq!(balance.credit_balance, 12);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn post_search_sends_json_body_and_query_params() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({
            "results": [
                { "profile_url": "https://example.com/in/gates" }
            ],
            "total_result_count": 1
        }),
    )])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let page = client
        .search_people(PersonSearchParams {
            country: Some("US".to_owned()),
            last_name: Some("Gates".to_owned()),
            page_size: Some(5),
            ..PersonSearchParams::default()
        })
        .await
        .expect("search must succeed")
        .typed()
        .expect("payload must match");

    assert_eq!(page.results.len(), 1);

    let requests = server.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/v2/search/person");
    assert!(requests[0].query.contains("page_size=5"));

    let body: JsonValue =
        serde_json::from_str(&requests[0].body).expect("body must be JSON");
    assert_eq!(body["country"], "US");
    assert_eq!(body["last_name"], "Gates");
    assert!(body.get("first_name").is_none());
}

#[tokio::test]
async fn per_attempt_timeout_surfaces_timeout_error() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, balance_body(1))
        .with_delay(Duration::from_millis(2_500))])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(ClientOptions {
        timeout_secs: 1,
        max_retries: 0,
        ..fast_options()
    });

    let err = client
        .credit_balance()
        .await
        .expect_err("request must time out");

    assert!(matches!(err, EnrichError::Timeout(_)));
}

#[tokio::test]
async fn request_raw_returns_plain_json() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({ "anything": ["goes", 1, true] }),
    )])
    .await;
    let client = EnrichClient::new(&server.base_url, "token").with_options(fast_options());

    let value = client
        .request_raw(RequestSpec::get("/v2/unwrapped").query("a", "x"))
        .await
        .expect("raw request must succeed");

    assert_eq!(value["anything"][0], "goes");
    let requests = server.requests();
    assert_eq!(requests[0].path, "/v2/unwrapped");
    assert_eq!(requests[0].query, "a=x");
}

#[tokio::test]
async fn from_env_reads_key_and_overrides() {
    // Single test so the shared process environment is touched once.
    std::env::remove_var("ENRICH_API_KEY");
    assert!(EnrichClient::from_env().is_err());

    std::env::set_var("ENRICH_API_KEY", "env-key");
    std::env::set_var("ENRICH_MAX_RETRIES", "4");
    std::env::set_var("ENRICH_TIMEOUT", "30");
    let client = EnrichClient::from_env().expect("must build from env");
    assert_eq!(client.options().max_retries, 4);
    assert_eq!(client.options().timeout_secs, 30);
    assert_eq!(client.options().max_backoff_secs, 60);

    std::env::set_var("ENRICH_MAX_RETRIES", "not-a-number");
    assert!(EnrichClient::from_env().is_err());

    std::env::remove_var("ENRICH_API_KEY");
    std::env::remove_var("ENRICH_MAX_RETRIES");
    std::env::remove_var("ENRICH_TIMEOUT");
}
