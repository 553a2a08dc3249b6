pub mod config;

static CONFIG_LOCATION: &str = "./config.toml";

use lazy_static::lazy_static;

use crate::config::config::TempusConfig;

lazy_static! {
    static ref LOADED: (TempusConfig, Option<String>) = load_or_default(CONFIG_LOCATION);
    pub static ref CONFIG: TempusConfig = LOADED.0.clone();
}

/// Set when [`CONFIG`] fell back to the defaults. [`CONFIG`] is usually read before a subscriber exists, so this is
/// logged by the caller once logging is up.
pub fn config_warning() -> Option<&'static str> {
    LOADED.1.as_deref()
}

fn load_or_default(path: &str) -> (TempusConfig, Option<String>) {
    match TempusConfig::load(path) {
        Ok(config) => (config, None),
        Err(e) => (
            TempusConfig::default(),
            Some(format!("Using default configuration, {path} could not be loaded: {e:#}")),
        ),
    }
}
