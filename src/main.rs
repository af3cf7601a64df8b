//! BallotBuddy server entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Load config (file + env overrides)
//!   4. Init logger once (CLI `-v` flags > RUST_LOG > config)
//!   5. Build the provider and chat service
//!   6. Spawn Ctrl-C → shutdown signal watcher
//!   7. Serve HTTP until shutdown

use ballotbuddy::chat::ChatService;
use ballotbuddy::config::{self, Config, EnvOverrides};
use ballotbuddy::error::AppError;
use ballotbuddy::llm::providers;
use ballotbuddy::logger;
use ballotbuddy::server::{self, AppState};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref(), &EnvOverrides::from_env())?;

    let level_source = logger::init(&config.server.log_level, args.verbosity)?;

    info!(
        name = %config.server.name,
        bind = %config.server.bind_addr(),
        provider = %config.llm.provider,
        model = %config.llm.openai.model,
        log_level = %config.server.log_level,
        log_source = %level_source,
        "config loaded"
    );

    if config.llm.openai.temperature_is_high() {
        warn!(
            temperature = config.llm.openai.temperature,
            max_recommended = config::MAX_RECOMMENDED_TEMPERATURE,
            "llm.openai.temperature is above the recommended range; answers may drift"
        );
    }

    if config.llm.provider != "dummy" && config.llm_api_key.is_none() {
        // Not fatal: every request will take the fallback path until a key is set.
        warn!("no OPENAI_API_KEY set; provider calls will fail and return the fallback answer");
    }

    let provider = providers::build(&config.llm, config.llm_api_key.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;
    let chat = ChatService::from_config(&config.chat, provider)?;
    let state = AppState::new(config.server.name.as_str(), chat);
    let router = server::build_router(state, config.server.max_upload_bytes);

    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            ctrlc_token.cancel();
        }
    });

    print_status(&config);

    server::serve(&config.server.bind_addr(), router, shutdown).await
}

fn print_status(config: &Config) {
    let llm_line = if config.llm.provider == "dummy" {
        "dummy (offline echo)".to_string()
    } else {
        format!("{} / {}", config.llm.provider, config.llm.openai.model)
    };
    println!("🗳️  {}: Georgia voting assistant", config.server.name);
    println!("   🌐 http://{}", config.server.bind_addr());
    println!("   🧠 {llm_line}");
}

struct CliArgs {
    verbosity: u8,
    config_path: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: ballotbuddy [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: {})", config::DEFAULT_CONFIG_PATH);
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                println!();
                println!("Environment: PORT, OPENAI_API_KEY, OPENAI_MODEL, BALLOTBUDDY_LOG_LEVEL");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            other => eprintln!("warning: ignoring unknown argument '{other}'"),
        }
    }

    CliArgs { verbosity, config_path }
}
