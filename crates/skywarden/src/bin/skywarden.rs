//! Skywarden CLI - alert server and one-shot alert generation.
//!
//! Usage:
//!   skywarden serve [-p port] [-c config]   # Run the HTTP alert server
//!   skywarden alert [--lat .. --lon ..]     # Print one alert as JSON
//!   skywarden alert --profile "Aurora Hunter" --lang de
//!   skywarden alert --question "Will I see the aurora tonight?"

use argh::FromArgs;
use std::path::Path;
use std::sync::Arc;

use skywarden::alert::AlertRequest;
use skywarden::{api, AppConfig, HttpAlertService};

/// Skywarden - environmental & space-weather alerts
#[derive(FromArgs)]
struct Args {
    /// show version information
    #[argh(switch, short = 'V')]
    version: bool,

    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Serve(ServeArgs),
    Alert(AlertArgs),
}

/// Run the HTTP alert server
#[derive(FromArgs)]
#[argh(subcommand, name = "serve")]
struct ServeArgs {
    /// listen port (default: 8090)
    #[argh(option, short = 'p', default = "8090")]
    port: u16,

    /// path to config.yaml (default: ~/.skywarden/config.yaml)
    #[argh(option, short = 'c')]
    config: Option<String>,
}

/// Generate one alert and print it as JSON
#[derive(FromArgs)]
#[argh(subcommand, name = "alert")]
struct AlertArgs {
    /// latitude (default: from config)
    #[argh(option)]
    lat: Option<f64>,

    /// longitude (default: from config)
    #[argh(option)]
    lon: Option<f64>,

    /// activity profile (default: "General Public")
    #[argh(option)]
    profile: Option<String>,

    /// output language: en, de, fr, it (default: en)
    #[argh(option)]
    lang: Option<String>,

    /// free-text question to answer
    #[argh(option, short = 'q')]
    question: Option<String>,

    /// path to config.yaml (default: ~/.skywarden/config.yaml)
    #[argh(option, short = 'c')]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    if args.version {
        println!("skywarden {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match args.command {
        Some(Command::Serve(serve_args)) => serve(serve_args).await,
        Some(Command::Alert(alert_args)) => alert(alert_args).await,
        None => {
            eprintln!("Usage: skywarden <serve|alert> [options]. See --help.");
            Ok(())
        }
    }
}

/// Load configuration and overlay environment credentials. Environment is
/// read exactly once here — the core only ever sees config values.
fn load_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load_or_default(path.map(Path::new))?;

    if config.open_meteo_api_key.is_none() {
        if let Ok(key) = std::env::var("OPEN_METEO_API_KEY") {
            config.open_meteo_api_key = Some(key);
        }
    }
    if let Ok(key) = std::env::var("GENERATOR_API_KEY") {
        for endpoint in &mut config.generators {
            if endpoint.api_key.is_none() {
                endpoint.api_key = Some(key.clone());
            }
        }
    }

    Ok(config)
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    log::info!(
        "[SERVE] {} generator endpoint(s) configured, {} domain(s) disabled",
        config.generators.len(),
        config.domains.disabled.len()
    );

    let service = Arc::new(HttpAlertService::from_config(&config));
    let app = api::router(service);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("[SERVE] listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn alert(args: AlertArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let service = HttpAlertService::from_config(&config);

    let response = service
        .build_alert(AlertRequest {
            lat: args.lat,
            lon: args.lon,
            profile: args.profile,
            language: args.lang,
            question: args.question,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
