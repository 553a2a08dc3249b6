use std::sync::Arc;

use tempus_common::config::config::TempusConfig;
use tempus_common::{Locale, Translations};
use tempus_duration::UnitCache;
use tracing::debug;

use crate::command::ParseCtxt;

pub type ThreadSafeTempus = Arc<Tempus>;

/// Shared state for argument parsing.
///
/// Holds the configuration, the translation bundles and the per-locale unit cache. Parses only ever borrow it, so
/// one instance serves any number of concurrent invocations.
pub struct Tempus {
    pub config: TempusConfig,
    pub translations: Arc<Translations>,
    /// Unit tables for the duration parser, filled as locales are first seen.
    pub units: UnitCache,
}

impl Tempus {
    pub fn new(config: TempusConfig) -> anyhow::Result<Tempus> {
        let mut translations = Translations::builtin(Locale::new(&config.locale.default))?;
        if let Some(dir) = &config.locale.bundle_dir {
            translations = translations.with_bundle_dir(dir)?;
        }

        let locales = translations.locales().map(Locale::as_str).collect::<Vec<_>>();
        debug!("Loaded translations for {}", locales.join(", "));

        let translations = Arc::new(translations);

        Ok(Tempus {
            units: UnitCache::new(translations.clone()),
            translations,
            config,
        })
    }

    /// A parsing context for one invocation in `locale`.
    pub fn context(&self, locale: Locale) -> ParseCtxt<'_> {
        ParseCtxt::new(self, locale)
    }
}
