//! The argument system.
//!
//! The key things that make up the argument system are:
//!
//! - The [`converters::Converter`] trait: Turns raw input into one typed argument value.
//!
//!   Converters are built by composing a value parser (what a single value looks like, e.g. a duration) with a
//!   cardinality policy (how many values are taken and what happens when they're missing or invalid). See the
//!   [`converters`] module for the available policies.
//!
//! - [`arguments::Arguments`]: An ordered set of named converters declared by a command. Registering a converter
//!   hands back a typed key used to read the parsed value afterwards.
//!
//! - The driver in [`parser`]: Feeds either a positional token stream (chat-style input, see [`tokens`]) or the
//!   structured options of an interaction into each argument in order, producing [`arguments::ParsedArguments`] or
//!   a single user-facing error.

use std::fmt::Display;
use std::sync::Arc;

use tempus_common::{Locale, Translate};
use tempus_duration::{DurationParser, Negatives, UnitTable};

use crate::tempus::Tempus;

pub mod arguments;
pub mod converters;
pub mod errors;
pub mod parser;
pub mod tokens;

/// Everything a converter may need while parsing one invocation.
#[derive(Clone)]
pub struct ParseCtxt<'a> {
    pub tempus: &'a Tempus,
    pub locale: Locale,
}

impl<'a> ParseCtxt<'a> {
    pub fn new(tempus: &'a Tempus, locale: Locale) -> Self {
        Self { tempus, locale }
    }

    pub fn translate(&self, key: &str) -> String {
        self.tempus.translations.translate(key, &self.locale)
    }

    pub fn translate_with(&self, key: &str, replacements: &[&dyn Display]) -> String {
        self.tempus.translations.translate_with(key, &self.locale, replacements)
    }

    /// A translated, comma-separated list, split and trimmed. Empty entries are dropped.
    pub fn translate_list(&self, key: &str) -> Vec<String> {
        self.translate(key)
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn units(&self) -> Arc<UnitTable> {
        self.tempus.units.get_units(&self.locale)
    }

    pub fn durations(&self, negatives: Negatives) -> DurationParser<'a> {
        DurationParser::new(&self.tempus.units, negatives)
    }
}
