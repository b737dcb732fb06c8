use bau_cua::{
    GameConfig,
    Variant,
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use std::path::PathBuf;

mod client;
mod ui;

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: bau-cua [--free] [--seed <n>] [--config <path>] [--log-dir <path>]\n\
         \n\
         Flags:\n\
           --free             Free-to-play table (no coins)\n\
           --seed <n>         Seed the dice for a reproducible session\n\
           --config <path>    JSON file overriding table settings\n\
           --log-dir <path>   Where to write logs (default {})",
        client::DEFAULT_LOG_DIR,
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<client::AppConfig> {
    let mut args = std::env::args().skip(1);
    let mut variant = Variant::Wager;
    let mut seed: Option<u64> = None;
    let mut config_path: Option<String> = None;
    let mut log_dir: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--free" => variant = Variant::Free,
            "--seed" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--seed requires a number"))?;
                if seed.is_some() {
                    return Err(eyre!("--seed may only be specified once"));
                }
                let parsed = raw
                    .parse::<u64>()
                    .map_err(|e| eyre!("invalid --seed '{raw}': {e}"))?;
                seed = Some(parsed);
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--config requires a path argument"))?;
                if config_path.is_some() {
                    return Err(eyre!("--config may only be specified once"));
                }
                config_path = Some(path);
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                if log_dir.is_some() {
                    return Err(eyre!("--log-dir may only be specified once"));
                }
                log_dir = Some(dir);
            }
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let game = match config_path {
        Some(path) => GameConfig::load(&expand(&path))?,
        None => GameConfig::default(),
    };
    let log_dir = expand(log_dir.as_deref().unwrap_or(client::DEFAULT_LOG_DIR));

    Ok(client::AppConfig {
        variant,
        seed,
        game,
        log_dir,
    })
}

fn expand(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let app_config = parse_cli_args()?;
    let _guard = client::init_tracing(&app_config.log_dir)?;
    tracing::info!("starting bau-cua");
    client::run_app(app_config).await
}
