//! Client configuration persisted as TOML under the app directory.

mod defaults;
mod errors;
mod io;
mod types;


/// Default filename used to store the client configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that overrides the configured backend URL.
pub const BASE_URL_ENV: &str = "HOUSE_PRICE_BASE_URL";

pub use errors::ConfigError;
pub use io::{config_path, load_from, load_or_default, save_to_path};
pub use types::ClientConfig;
