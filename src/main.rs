use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use freshquote::booking::{
    booking_router, BookingService, CsvBookingExport, InMemoryBookingLedger, NotificationSink,
    OutwardCodeTable, PropertyParameters, PropertyType, QuoteEngine, QuoteRequestAdapter,
    ServiceKind,
};
use freshquote::config::AppConfig;
use freshquote::error::AppError;
use freshquote::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "freshquote",
    about = "Run the instant quote and booking service, or price a job from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a single job without starting the service
    Quote(QuoteArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// Service kind, e.g. carpet_cleaning or mattress_cleaning_double
    #[arg(long, value_parser = parse_service_kind)]
    service: ServiceKind,
    /// Room count for room-priced services
    #[arg(long)]
    rooms: Option<u32>,
    /// Square meterage for area-priced services
    #[arg(long)]
    square_meters: Option<f64>,
    /// Add the stain removal treatment
    #[arg(long)]
    stain_removal: bool,
    /// One-way distance from the depot in miles
    #[arg(long)]
    distance_miles: f64,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Quote(args) => run_quote(args),
    }
}

fn parse_service_kind(raw: &str) -> Result<ServiceKind, String> {
    ServiceKind::from_slug(raw).ok_or_else(|| {
        let known = ServiceKind::ALL
            .iter()
            .map(|kind| kind.slug())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown service '{raw}' (expected one of: {known})")
    })
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let resolver = match &config.distance_table_path {
        Some(path) => {
            let table = OutwardCodeTable::from_csv_path(path)
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
            info!(path = %path, entries = table.len(), "distance table loaded");
            table
        }
        None => {
            warn!("QUOTE_DISTANCE_TABLE is not set; quote requests will fail until it is");
            OutwardCodeTable::default()
        }
    };

    let mut sinks: Vec<Arc<dyn NotificationSink>> = Vec::new();
    if let Some(path) = &config.booking_export_path {
        sinks.push(Arc::new(CsvBookingExport::new(path)));
    }

    let service = Arc::new(BookingService::new(
        QuoteRequestAdapter::new(Arc::new(resolver), QuoteEngine::new(config.pricing.clone())),
        Arc::new(InMemoryBookingLedger::default()),
        sinks,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(booking_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "instant quote service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = QuoteEngine::new(config.pricing);

    let params = PropertyParameters {
        property_type: PropertyType::House,
        property_size: None,
        room_count: args.rooms,
        square_meters: args.square_meters,
        stain_removal: args.stain_removal,
    };

    let quote = engine
        .calculate(args.service, &params, args.distance_miles)
        .map_err(|err| {
            AppError::Booking(freshquote::booking::BookingServiceError::Quote(err.into()))
        })?;

    println!("service        {}", args.service.slug());
    println!("distance       {:.1} miles", quote.distance_miles);
    println!("base price     {:>8.2}", quote.breakdown.base_price);
    println!("add-on fee     {:>8.2}", quote.breakdown.add_on_fee);
    println!("service cost   {:>8.2}", quote.service_cost);
    println!("travel cost    {:>8.2}", quote.travel_cost);
    println!("total          {:>8.2}", quote.total_cost);
    if quote.outside_service_area {
        println!("note: address is outside the usual service area");
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(json!({ "ready": ready })))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
