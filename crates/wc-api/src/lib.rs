use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::connect_info::ConnectInfo,
    extract::DefaultBodyLimit,
    extract::State,
    http::header::{HeaderName, HeaderValue, CONTENT_TYPE},
    http::Method,
    http::Request,
    middleware,
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use clap::Parser;
use dotenvy::dotenv;
use governor::{
    clock::DefaultClock, middleware::NoOpMiddleware, state::keyed::DashMapStateStore, Quota,
    RateLimiter,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use wc_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use wc_common::matching::engine::RecommendationEngine;
use wc_common::matching::scoring::MatchingConfig;
use wc_common::provider::{
    Application, Dataset, InMemoryCandidateProvider, RecommendationService,
};
use wc_common::{JobPosting, WorkerProfile};

pub mod auth;
pub mod error;
pub mod handlers;

use auth::AuthConfig;
use error::ApiError;
use handlers::{health, recommendations};

const SHUTDOWN_DRAIN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Parser)]
#[command(name = "wc-api", about = "HTTP API for Worker Connect recommendations")]
struct Cli {
    /// Server port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// API key for X-API-Key authentication
    #[arg(long, env = "WC_API_KEY")]
    api_key: Option<String>,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "WC_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// Path to the JSON candidate dataset served by the in-memory provider
    #[arg(long, env = "WC_DATASET")]
    dataset: Option<PathBuf>,

    /// Deadline (ms) for one candidate-provider fetch
    #[arg(long, env = "WC_FETCH_TIMEOUT_MS", default_value_t = 2000)]
    fetch_timeout_ms: u64,

    /// Outer commute band of the proximity score (km)
    #[arg(long, env = "WC_MAX_TRAVEL_KM", default_value_t = 50.0)]
    max_travel_km: f64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub auth: AuthConfig,
    pub dataset_path: PathBuf,
    pub fetch_timeout: Duration,
    pub max_travel_km: f64,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::BadRequest(
                "WC_CORS_ORIGINS must list explicit origins".into(),
            ));
        }

        let api_key = cli
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::BadRequest("WC_API_KEY is required".into()))?;

        let dataset_path = cli
            .dataset
            .ok_or_else(|| ApiError::BadRequest("WC_DATASET is required".into()))?;

        if cli.fetch_timeout_ms == 0 {
            return Err(ApiError::BadRequest(
                "WC_FETCH_TIMEOUT_MS must be positive".into(),
            ));
        }

        if !cli.max_travel_km.is_finite() || cli.max_travel_km <= 0.0 {
            return Err(ApiError::BadRequest(
                "WC_MAX_TRAVEL_KM must be a positive distance".into(),
            ));
        }

        Ok(Self {
            port: cli.port,
            cors_origins,
            auth: AuthConfig { api_key },
            dataset_path,
            fetch_timeout: Duration::from_millis(cli.fetch_timeout_ms),
            max_travel_km: cli.max_travel_km,
        })
    }
}

type IpRateLimiter = RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock, NoOpMiddleware>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_sec: u64,
    pub burst: u32,
}

impl RateLimitConfig {
    fn from_env() -> Self {
        let per_sec = env::var("WC_RATE_LIMIT_PER_SEC")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(20);
        let burst = env::var("WC_RATE_LIMIT_BURST")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(40);

        Self { per_sec, burst }
    }
}

fn build_ip_limiter(config: &RateLimitConfig) -> Arc<IpRateLimiter> {
    let nanos_per_token = 1_000_000_000u64 / config.per_sec.max(1);
    let quota = Quota::with_period(Duration::from_nanos(nanos_per_token.max(1)))
        .unwrap()
        .allow_burst(NonZeroU32::new(config.burst).unwrap());

    Arc::new(RateLimiter::keyed(quota))
}

pub struct AppState {
    pub service: RecommendationService,
    pub config: AppConfig,
    rate_limit: Arc<IpRateLimiter>,
    pub readiness: Arc<AtomicBool>,
}

pub type SharedState = Arc<AppState>;

impl axum::extract::FromRef<SharedState> for AuthConfig {
    fn from_ref(input: &SharedState) -> AuthConfig {
        input.config.auth.clone()
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-api-key")])
}

fn request_ip<B>(req: &Request<B>) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
}

async fn global_rate_limit(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(client_ip) = request_ip(&req) {
        if state.rate_limit.check_key(&client_ip).is_err() {
            return Err(ApiError::TooManyRequests("rate limit exceeded".into()));
        }
    }

    Ok(next.run(req).await)
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    Ok(error::with_request_id(request_id, next.run(req)).await)
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api_routes = Router::new()
        .route(
            "/workers/:worker_id/job-recommendations",
            get(recommendations::jobs_for_worker),
        )
        .route(
            "/jobs/:job_id/worker-recommendations",
            get(recommendations::workers_for_job),
        );

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            global_rate_limit,
        ))
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

/// Small fixture pool: worker 1 has an open application to job 11, so only
/// job 10 may ever be recommended to them.
pub fn test_dataset() -> Dataset {
    Dataset {
        workers: vec![WorkerProfile {
            id: 1,
            skill_tags: vec!["plumbing".into()],
            city: Some("Minneapolis".into()),
            rating: Some(4.5),
            ..WorkerProfile::default()
        }],
        jobs: vec![
            JobPosting {
                id: 10,
                title: "Bathroom plumbing repair".into(),
                skill_tags: vec!["plumbing".into()],
                city: Some("Minneapolis".into()),
                ..JobPosting::default()
            },
            JobPosting {
                id: 11,
                title: "Kitchen drain cleaning".into(),
                skill_tags: vec!["plumbing".into()],
                city: Some("Minneapolis".into()),
                ..JobPosting::default()
            },
        ],
        applications: vec![Application {
            worker_id: 1,
            job_id: 11,
        }],
    }
}

pub fn test_state(api_key: &str) -> SharedState {
    test_state_with_readiness(api_key, true)
}

pub fn test_state_with_readiness(api_key: &str, ready: bool) -> SharedState {
    let provider = InMemoryCandidateProvider::new(test_dataset());
    let service = RecommendationService::new(
        RecommendationEngine::with_defaults(),
        Arc::new(provider),
        Duration::from_secs(1),
    );

    let config = AppConfig {
        port: 8080,
        cors_origins: vec!["http://localhost:3000".into()],
        auth: AuthConfig {
            api_key: api_key.to_string(),
        },
        dataset_path: PathBuf::from("fixtures/dataset.json"),
        fetch_timeout: Duration::from_secs(1),
        max_travel_km: 50.0,
    };

    Arc::new(AppState {
        service,
        config,
        rate_limit: build_ip_limiter(&RateLimitConfig::from_env()),
        readiness: Arc::new(AtomicBool::new(ready)),
    })
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber("wc-api");
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"));

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;

    let raw_dataset = std::fs::read_to_string(&config.dataset_path).map_err(|err| {
        ApiError::Internal(format!(
            "failed to read {}: {err}",
            config.dataset_path.display()
        ))
    })?;
    let provider = InMemoryCandidateProvider::from_json(&raw_dataset)
        .map_err(|err| ApiError::Internal(format!("invalid dataset: {err}")))?;

    let engine = RecommendationEngine::new(MatchingConfig {
        max_travel_km: config.max_travel_km,
        ..MatchingConfig::default()
    })
    .map_err(|err| ApiError::Internal(err.to_string()))?;
    let service = RecommendationService::new(engine, Arc::new(provider), config.fetch_timeout);

    let state = Arc::new(AppState {
        service,
        config: config.clone(),
        rate_limit: build_ip_limiter(&RateLimitConfig::from_env()),
        readiness: Arc::new(AtomicBool::new(true)),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone());

    info!(%addr, dataset = %config.dataset_path.display(), "wc-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state
        .readiness
        .store(false, std::sync::atomic::Ordering::SeqCst);

    // Load balancers need to observe /readyz as not ready before the
    // listener stops accepting connections.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}
