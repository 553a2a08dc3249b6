use tempus_common::Locale;

use crate::cache::UnitCache;
use crate::container::DurationContainer;
use crate::errors::{DurationError, ParserErrorKind};

/// Whether amounts may carry a leading `-`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Negatives {
    Allowed,
    Rejected,
}

/// Parses strings like `1w2d`, `3 hours, 20 minutes` or `-5d` into a [`DurationContainer`].
///
/// Commas, `+` signs and whitespace are dropped first. What remains must alternate between amounts and units,
/// starting with an amount, and every unit must be known to the locale's [`UnitTable`](crate::UnitTable).
#[derive(Clone, Copy)]
pub struct DurationParser<'a> {
    units: &'a UnitCache,
    negatives: Negatives,
}

impl<'a> DurationParser<'a> {
    pub fn new(units: &'a UnitCache, negatives: Negatives) -> Self {
        Self { units, negatives }
    }

    /// Accepts per-amount negation, like `1d-2h`.
    pub fn signed(units: &'a UnitCache) -> Self {
        Self::new(units, Negatives::Allowed)
    }

    /// Rejects any `-` in the input.
    pub fn unsigned(units: &'a UnitCache) -> Self {
        Self::new(units, Negatives::Rejected)
    }

    pub fn negatives(&self) -> Negatives {
        self.negatives
    }

    pub fn parse(&self, input: &str, locale: &Locale) -> Result<DurationContainer, DurationError> {
        let cleaned = input
            .chars()
            .filter(|c| *c != ',' && *c != '+' && !c.is_whitespace())
            .collect::<String>();

        if self.negatives == Negatives::Rejected && cleaned.contains('-') {
            return Err(ParserErrorKind::NegativeUnsupported.into());
        }

        let mut values = Vec::new();
        let mut units = Vec::new();
        let mut buffer = cleaned.as_str();

        while let Some(first) = buffer.chars().next() {
            let (run, remaining) = if is_value_char(first) {
                split_on(buffer, |c| !is_value_char(c))
            } else {
                split_on(buffer, is_value_char)
            };

            if is_value_char(first) {
                values.push(run);
            } else {
                units.push(run);
            }

            buffer = remaining;
        }

        if cleaned.chars().next().is_some_and(|c| !is_value_char(c)) {
            return Err(ParserErrorKind::BadUnitPairs.into());
        }

        let table = self.units.get_units(locale);
        let mut container = DurationContainer::new();

        for (value, unit) in values.iter().zip(&units) {
            let resolved = table.resolve(unit).ok_or_else(|| DurationError::invalid_unit(*unit))?;
            let amount = value
                .parse::<i64>()
                .map_err(|_| ParserErrorKind::InvalidValue((*value).to_owned()))?;

            container.plus(amount, resolved);
        }

        if values.len() > units.len() {
            return Err(DurationError::invalid_unit(""));
        }

        Ok(container)
    }

    /// Whether `c` could appear in a duration: a digit, a space or the first letter of a unit.
    pub fn char_valid(&self, c: char, locale: &Locale) -> bool {
        c.is_ascii_digit() || c == ' ' || self.units.get_units(locale).starts_unit(c)
    }
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}

/// Splits `s` before the first char matching `pattern`.
fn split_on(s: &str, pattern: impl Fn(char) -> bool) -> (&str, &str) {
    match s.find(pattern) {
        Some(index) => s.split_at(index),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempus_common::Translations;

    use super::*;
    use crate::unit::TimeUnit;

    fn cache() -> UnitCache {
        UnitCache::new(Arc::new(Translations::builtin(Locale::ENGLISH).unwrap()))
    }

    #[test]
    fn packed() {
        let cache = cache();
        let parsed = DurationParser::signed(&cache).parse("1w2d3h", &Locale::ENGLISH).unwrap();
        assert_eq!(parsed.get(TimeUnit::Days), 9);
        assert_eq!(parsed.get(TimeUnit::Hours), 3);
    }

    #[test]
    fn spaced_and_separated() {
        let cache = cache();
        let parsed = DurationParser::signed(&cache)
            .parse("1,000 seconds + 2 Minutes", &Locale::ENGLISH)
            .unwrap();
        assert_eq!(parsed.get(TimeUnit::Seconds), 1000);
        assert_eq!(parsed.get(TimeUnit::Minutes), 2);
    }

    #[test]
    fn french() {
        let cache = cache();
        let parsed = DurationParser::signed(&cache)
            .parse("10 minutes, 4 heures", &Locale::FRENCH)
            .unwrap();
        assert_eq!(parsed.get(TimeUnit::Minutes), 10);
        assert_eq!(parsed.get(TimeUnit::Hours), 4);
    }

    #[test]
    fn repeated_units_accumulate() {
        let cache = cache();
        let parsed = DurationParser::signed(&cache).parse("1d1d", &Locale::ENGLISH).unwrap();
        assert_eq!(parsed.get(TimeUnit::Days), 2);
    }

    #[test]
    fn empty_input() {
        let cache = cache();
        assert!(DurationParser::signed(&cache).parse("  ", &Locale::ENGLISH).unwrap().is_empty());
    }

    #[test]
    fn missing_unit() {
        let cache = cache();
        let err = DurationParser::signed(&cache).parse("10", &Locale::ENGLISH).unwrap_err();
        assert_eq!(err, DurationError::invalid_unit(""));
        assert!(err.is_missing_unit());

        let err = DurationParser::signed(&cache).parse("1d10", &Locale::ENGLISH).unwrap_err();
        assert!(err.is_missing_unit());
    }

    #[test]
    fn unknown_unit() {
        let cache = cache();
        let err = DurationParser::signed(&cache).parse("10zz", &Locale::ENGLISH).unwrap_err();
        assert_eq!(err, DurationError::invalid_unit("zz"));
    }

    #[test]
    fn unit_without_value() {
        let cache = cache();
        let err = DurationParser::signed(&cache).parse("days", &Locale::ENGLISH).unwrap_err();
        assert_eq!(err, DurationError::from(ParserErrorKind::BadUnitPairs));
    }

    #[test]
    fn malformed_value() {
        let cache = cache();
        let err = DurationParser::signed(&cache).parse("5-d", &Locale::ENGLISH).unwrap_err();
        assert_eq!(err, DurationError::from(ParserErrorKind::InvalidValue("5-".to_owned())));

        let err = DurationParser::signed(&cache)
            .parse("99999999999999999999d", &Locale::ENGLISH)
            .unwrap_err();
        assert!(matches!(err, DurationError::Parser(_)));
    }

    #[test]
    fn negatives_diverge() {
        let cache = cache();

        let err = DurationParser::unsigned(&cache).parse("-5d", &Locale::ENGLISH).unwrap_err();
        assert_eq!(err, DurationError::from(ParserErrorKind::NegativeUnsupported));

        let parsed = DurationParser::signed(&cache).parse("-5d", &Locale::ENGLISH).unwrap();
        assert_eq!(parsed.get(TimeUnit::Days), -5);
    }

    #[test]
    fn char_validity() {
        let cache = cache();
        let parser = DurationParser::signed(&cache);
        assert!(parser.char_valid('4', &Locale::ENGLISH));
        assert!(parser.char_valid(' ', &Locale::ENGLISH));
        assert!(parser.char_valid('d', &Locale::ENGLISH));
        assert!(!parser.char_valid('z', &Locale::ENGLISH));
        assert!(parser.char_valid('j', &Locale::FRENCH));
        assert!(!parser.char_valid('j', &Locale::ENGLISH));
    }
}
