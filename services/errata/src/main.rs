use std::path::PathBuf;
use std::process::ExitCode;

use errata_core::{logging, Config};
use errata_crypto::CryptoEnvironment;
use errata_service::{password, startup_exit_code, EXIT_CONFIG, EXIT_PASSWORD, EXIT_RUNTIME};
use tokio::net::TcpListener;
use tracing::{error, info};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config = match parse_config_path(&args).and_then(|path| {
        Config::load(path.as_deref()).map_err(|e| e.to_string())
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[errata] configuration error: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    logging::init_from_config(&config.log);

    let password = match password::read_password() {
        Ok(password) => password,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(EXIT_PASSWORD);
        }
    };

    // Blocking gate: nothing listens until the key material round-trips
    let env = match CryptoEnvironment::bootstrap(&config.crypto.base_dir, password) {
        Ok(env) => env,
        Err(e) => {
            error!("FAIL ({e})");
            return ExitCode::from(startup_exit_code(&e));
        }
    };

    match run(config, env) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Service failed: {e:#}");
            ExitCode::from(EXIT_RUNTIME)
        }
    }
}

#[tokio::main]
async fn run(config: Config, env: CryptoEnvironment) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.server.listen_addr()).await?;
    info!(base_dir = %env.directory().base_dir().display(), "Startup checks passed");
    errata_service::serve(listener, &config, &env).await
}

/// `--config <path>` on the command line, else `ERRATA_CONFIG`, else none.
fn parse_config_path(args: &[String]) -> Result<Option<PathBuf>, String> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            if let Some(path) = args_iter.next() {
                return Ok(Some(PathBuf::from(path)));
            }
            return Err("--config was provided without a path".into());
        }
    }

    Ok(std::env::var_os("ERRATA_CONFIG").map(PathBuf::from))
}
