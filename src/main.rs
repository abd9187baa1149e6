#![deny(missing_docs)]

//! Command-line front end: check the backend, submit features, print the price.

use std::path::PathBuf;
use std::time::Duration;

use house_price_client::config::{self, ClientConfig};
use house_price_client::format::format_price;
use house_price_client::logging::{self, LogSettings};
use house_price_client::{Connectivity, FeatureName, PredictionClient};

/// Slack on top of the configured deadlines before the CLI stops waiting.
const SETTLE_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    health_timeout_ms: Option<u64>,
    edits: Vec<(FeatureName, String)>,
    skip_health: bool,
    list_features: bool,
    write_config: bool,
    log: LogSettings,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), String> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    match logging::init(args.log) {
        Ok(Some(path)) => eprintln!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(err) => eprintln!("Logging disabled: {err}"),
    }

    let config = resolve_config(&args)?;
    if args.write_config {
        let path = match &args.config_path {
            Some(path) => path.clone(),
            None => config::config_path().map_err(|err| err.to_string())?,
        };
        config::save_to_path(&config, &path).map_err(|err| err.to_string())?;
        println!("Wrote {}", path.display());
    }

    let mut client = PredictionClient::new(config).map_err(|err| err.to_string())?;
    if !args.skip_health && !args.list_features {
        client.check_health();
    }
    for (name, raw) in &args.edits {
        client.set_feature(*name, raw);
    }

    if args.list_features {
        print_features(&client);
        return Ok(());
    }

    client
        .submit()
        .map_err(|err| format!("Could not submit: {err}"))?;
    let limit = client
        .config()
        .request_timeout()
        .max(client.config().health_timeout())
        + SETTLE_GRACE;
    if !client.block_until_settled(limit) {
        return Err("Gave up waiting for the backend".to_string());
    }

    let state = client.state();
    if !args.skip_health {
        println!("Backend: {}", connectivity_line(state.connectivity));
    }
    match (state.last_prediction, state.last_error_message()) {
        (Some(value), _) => {
            println!("Predicted house price: {}", format_price(value));
            println!("Median value of owner-occupied homes, in $1000s.");
            Ok(())
        }
        (None, Some(message)) => Err(format!("Error: {message}")),
        (None, None) => Err("Error: no result from the backend".to_string()),
    }
}

fn resolve_config(args: &CliArgs) -> Result<ClientConfig, String> {
    let loaded = match &args.config_path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    let mut config = loaded.apply_env();
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(ms) = args.request_timeout_ms {
        config.request_timeout_ms = ms;
    }
    if let Some(ms) = args.health_timeout_ms {
        config.health_timeout_ms = ms;
    }
    let config = config.normalized();
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn connectivity_line(connectivity: Connectivity) -> &'static str {
    match connectivity {
        Connectivity::Connected => "connected",
        Connectivity::Disconnected => "disconnected (predictions may fail)",
        Connectivity::Checking => "still checking",
    }
}

fn print_features(client: &PredictionClient) {
    for (name, value) in client.features().iter() {
        println!("{:<8} {:>10}  {}", name.key(), value, name.description());
    }
}

fn parse_args(args: Vec<String>) -> Result<CliArgs, String> {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        return Err(help_text());
    }
    let mut parsed = CliArgs::default();
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--config" => {
                parsed.config_path = Some(PathBuf::from(next_value(&args, &mut i, "--config")?));
            }
            "--base-url" => {
                parsed.base_url = Some(next_value(&args, &mut i, "--base-url")?);
            }
            "--timeout-ms" => {
                parsed.request_timeout_ms =
                    Some(parse_ms(&next_value(&args, &mut i, "--timeout-ms")?)?);
            }
            "--health-timeout-ms" => {
                parsed.health_timeout_ms =
                    Some(parse_ms(&next_value(&args, &mut i, "--health-timeout-ms")?)?);
            }
            "--set" => {
                let value = next_value(&args, &mut i, "--set")?;
                parsed.edits.push(parse_edit(&value)?);
            }
            "--skip-health" => parsed.skip_health = true,
            "--list-features" => parsed.list_features = true,
            "--write-config" => parsed.write_config = true,
            "-v" | "--verbose" => parsed.log.verbose = true,
            "--log-file" => parsed.log.to_file = true,
            unknown => return Err(format!("Unknown argument '{unknown}'\n\n{}", help_text())),
        }
        i += 1;
    }
    Ok(parsed)
}

fn next_value(args: &[String], i: &mut usize, name: &str) -> Result<String, String> {
    let next = args.get(*i + 1).ok_or_else(|| format!("Missing value for {name}"))?;
    *i += 1;
    Ok(next.clone())
}

fn parse_ms(value: &str) -> Result<u64, String> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("Expected milliseconds, got '{value}'"))
}

fn parse_edit(value: &str) -> Result<(FeatureName, String), String> {
    let (name, raw) = value
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=VALUE, got '{value}'"))?;
    let name = name.parse::<FeatureName>().map_err(|err| err.to_string())?;
    Ok((name, raw.to_string()))
}

fn help_text() -> String {
    format!(
        "Usage: house-price [options]\n\n\
Options:\n\
  --config <PATH>             Config file (default: <config dir>/.house-price/config.toml)\n\
  --base-url <URL>            Backend root (env: {env}; default: http://localhost:5000)\n\
  --timeout-ms <MS>           Prediction deadline (default: 10000)\n\
  --health-timeout-ms <MS>    Health check deadline (default: 5000)\n\
  --set <NAME=VALUE>          Set a feature; repeatable; invalid numbers become 0\n\
  --skip-health               Do not call /api/health\n\
  --list-features             Print features and their current values, then exit\n\
  --write-config              Save the effective config\n\
  -v, --verbose               Show debug logs on stderr (RUST_LOG overrides)\n\
  --log-file                  Also write logs under <config dir>/.house-price/logs\n\
  -h, --help                  Show help\n",
        env = config::BASE_URL_ENV
    )
}
