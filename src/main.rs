//! ScriptScan - handwriting transcription web service
//!
//! Serves the JSON API and, when configured, the single-page client.

use std::env;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::broadcast::error::RecvError;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, warn, Level};

use scriptscan::config::LogFormat;
use scriptscan::{
    api_router, config, db,
    services::{GeminiClient, SessionEvent, SessionManager},
    AppConfig, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("ScriptScan {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if let Some(pos) = args.iter().position(|arg| arg == "--init-config") {
        let path = args
            .get(pos + 1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config.yaml"));
        AppConfig::create_default_config(&path)
            .with_context(|| format!("Failed to write default config to {:?}", path))?;
        println!("Wrote default configuration to {:?}", path);
        return Ok(());
    }

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The guard must live for the whole program so file logs are flushed
    let _log_guard = init_logging(&config);

    info!("ScriptScan starting up");

    ensure_data_directory(&config)?;

    info!("Initializing database connection");
    let db = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;

    let transcriber = GeminiClient::new(&config.ocr).context("Failed to initialize OCR client")?;
    info!(
        endpoint = %transcriber.endpoint(),
        service = %config.ocr.service_name,
        "Transcription client ready"
    );

    let state = AppState::new(config.clone(), db, Arc::new(transcriber));
    spawn_session_listener(&state.sessions);

    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address configuration")?;

    if let Some(ref tls_config) = config.server.tls {
        info!("Starting HTTPS server on https://{}", addr);
        info!("TLS certificate: {:?}", tls_config.cert_file);

        let rustls_config = create_rustls_config(tls_config).await?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("Failed to bind to address")?;

        axum_server::from_tcp_rustls(listener.into_std()?, rustls_config)?
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .context("HTTPS server error")?;
    } else {
        info!("Starting HTTP server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("Failed to bind to address")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .context("HTTP server error")?;
    }

    Ok(())
}

/// Log session changes as they happen
fn spawn_session_listener(sessions: &SessionManager) {
    let mut events = sessions.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn { user_id, email }) => {
                    info!(%user_id, %email, "Session started");
                }
                Ok(SessionEvent::SignedOut { user_id }) => {
                    info!(%user_id, "Session ended");
                }
                Ok(SessionEvent::ProfileRefreshed { user_id, fallback }) => {
                    if fallback {
                        warn!(%user_id, "Profile refreshed from fallback");
                    } else {
                        debug!(%user_id, "Profile refreshed");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Session listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Create RusTLS configuration from TLS config
async fn create_rustls_config(
    tls_config: &config::TlsConfig,
) -> Result<axum_server::tls_rustls::RustlsConfig> {
    use axum_server::tls_rustls::RustlsConfig;
    use rustls::crypto::aws_lc_rs::default_provider;
    use rustls::ServerConfig;

    let cert_file = std::fs::File::open(&tls_config.cert_file)
        .with_context(|| format!("Failed to open certificate file: {:?}", tls_config.cert_file))?;
    let mut cert_reader = BufReader::new(cert_file);
    let certs: Vec<_> = rustls_pemfile::certs(&mut cert_reader)
        .filter_map(|r| r.ok())
        .collect();

    if certs.is_empty() {
        anyhow::bail!("No certificates found in {:?}", tls_config.cert_file);
    }

    let key_file = std::fs::File::open(&tls_config.key_file)
        .with_context(|| format!("Failed to open key file: {:?}", tls_config.key_file))?;
    let mut key_reader = BufReader::new(key_file);
    let key = rustls_pemfile::private_key(&mut key_reader)
        .with_context(|| format!("Failed to read private key: {:?}", tls_config.key_file))?
        .ok_or_else(|| anyhow::anyhow!("No private key found in {:?}", tls_config.key_file))?;

    let versions: Vec<&'static rustls::SupportedProtocolVersion> =
        match tls_config.min_version.as_str() {
            "1.3" => vec![&rustls::version::TLS13],
            _ => vec![&rustls::version::TLS12, &rustls::version::TLS13],
        };

    let mut server_config = ServerConfig::builder_with_provider(default_provider().into())
        .with_protocol_versions(&versions)
        .context("Failed to set TLS protocol versions")?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("Failed to build TLS server config")?;

    server_config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(RustlsConfig::from_config(Arc::new(server_config)))
}

/// Initialize the logging/tracing infrastructure
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use config::LogTarget;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_config = &config.logging;
    let subscriber = tracing_subscriber::registry().with(env_filter);

    match &log_config.target {
        LogTarget::Console => {
            init_console_logging(subscriber, &log_config.format);
            None
        }
        LogTarget::File => {
            let (writer, guard) = create_file_writer(log_config);
            init_file_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
        LogTarget::Both => {
            let (writer, guard) = create_file_writer(log_config);
            init_console_logging(
                subscriber.with(file_layer(&log_config.format, writer)),
                &log_config.format,
            );
            Some(guard)
        }
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &config::LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Boxed file layer in the configured format
fn file_layer<S>(
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, Layer};

    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
    }
}

/// Initialize console logging
fn init_console_logging<S>(subscriber: S, format: &LogFormat)
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_target(false))
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .init();
        }
    }
}

/// Initialize file-only logging
fn init_file_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::prelude::*;

    subscriber.with(file_layer(format, writer)).init();
}

/// Ensure the directory holding the SQLite file exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    let url = &config.database.url;
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .map(|p| p.split('?').next().unwrap_or(p));

    if let Some(path) = path.filter(|p| !p.starts_with(":memory:")) {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).context("Failed to create data directory")?;
                info!("Created data directory: {:?}", parent);
            }
        }
    }
    Ok(())
}

/// Full application router: API, optional client, global layers
fn create_router(state: AppState, config: &AppConfig) -> Router {
    // Only needed when the client is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let api = api_router(state);

    let router = match config.server.static_dir {
        Some(ref static_dir) if static_dir.exists() => {
            info!("Serving client from {:?}", static_dir);
            let index_file = static_dir.join("index.html");
            if index_file.exists() {
                api.fallback_service(
                    ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_file)),
                )
            } else {
                warn!("index.html not found in {:?}, SPA fallback disabled", static_dir);
                api.fallback_service(ServeDir::new(static_dir))
            }
        }
        Some(ref static_dir) => {
            warn!("Static directory {:?} does not exist, client not served", static_dir);
            api
        }
        None => api,
    };

    router
        .layer(CompressionLayer::new())
        .layer(trace_layer)
        .layer(cors)
}

fn print_help() {
    println!(
        r#"ScriptScan {}

USAGE:
    scriptscan [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --init-config [PATH]    Write a default configuration file
                            (default: ./config.yaml) and exit

ENVIRONMENT:
    SCRIPTSCAN_CONFIG       Path to configuration file
    SCRIPTSCAN_HOST         Bind address
    SCRIPTSCAN_PORT         Bind port
    DATABASE_URL            SQLite database URL
    JWT_SECRET              Token signing secret (at least 32 characters)
    GEMINI_BASE_URL         Transcription API base URL
    GEMINI_MODEL            Transcription model name
    RUST_LOG                Log filter

CONFIGURATION:
    The application looks for configuration files in the following order:
    1. Path specified by SCRIPTSCAN_CONFIG
    2. ./config.yaml
    3. ./config/config.yaml
    4. /etc/scriptscan/config.yaml
    5. <user config dir>/scriptscan/config.yaml"#,
        env!("CARGO_PKG_VERSION")
    );
}
