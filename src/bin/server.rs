use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shelf_packer::generate::{GenerateConfig, generate};
use shelf_packer::{ItemSpec, OverflowPolicy, Packer, PackingInput, Placement, Strategy};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PackRequest {
    #[serde(flatten)]
    input: PackingInput,
    #[serde(default)]
    strategy: Strategy,
    #[serde(default)]
    allow_overflow: bool,
}

#[derive(Serialize)]
struct PackResponse {
    bin_width: u64,
    total_height: u64,
    placements: Vec<Placement>,
    level_count: usize,
    waste_percent: f64,
}

#[derive(Deserialize, Serialize)]
struct GenerateRequest {
    #[serde(flatten)]
    config: GenerateConfig,
    #[serde(default)]
    rectangle_list: Vec<ItemSpec>,
}

async fn pack(Json(req): Json<PackRequest>) -> Result<Json<PackResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    let overflow = if req.allow_overflow {
        OverflowPolicy::Allow
    } else {
        OverflowPolicy::Reject
    };
    let result = Packer::new(req.strategy)
        .with_overflow_policy(overflow)
        .pack(&req.input)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(PackResponse {
        level_count: result.level_count(),
        waste_percent: result.waste_percent(),
        bin_width: result.bin_width,
        total_height: result.total_height,
        placements: result.placements,
    }))
}

async fn generate_input(
    Json(req): Json<GenerateRequest>,
) -> Result<Json<PackingInput>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /generate"
    );

    generate(&req.config, &req.rectangle_list)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

fn app() -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/pack", post(pack))
        .route("/generate", post(generate_input))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn main() {
    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    // Sentry has to be initialised before the runtime starts.
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
        .block_on(serve());
}

async fn serve() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app()).await.unwrap();
}
