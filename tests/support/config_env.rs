use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const VARS: [&str; 2] = ["HOUSE_PRICE_CONFIG_HOME", "HOUSE_PRICE_BASE_URL"];

/// Serializes environment changes and restores the previous values on drop.
pub struct ConfigEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl ConfigEnvGuard {
    pub fn new() -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = VARS
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();
        let guard = Self {
            previous,
            _lock: lock,
        };
        for name in VARS {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                std::env::remove_var(name);
            }
        }
        guard
    }

    pub fn set_config_home(self, path: PathBuf) -> Self {
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var("HOUSE_PRICE_CONFIG_HOME", path);
        }
        self
    }

    pub fn set_base_url(self, url: &str) -> Self {
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var("HOUSE_PRICE_BASE_URL", url);
        }
        self
    }
}

impl Drop for ConfigEnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }
}
