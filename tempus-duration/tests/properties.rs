use std::sync::Arc;

use tempus_common::{Locale, Translations};
use tempus_duration::{DurationError, DurationParser, ParserErrorKind, TimeUnit, UnitCache};
use time::macros::datetime;

fn cache() -> Arc<UnitCache> {
    Arc::new(UnitCache::new(Arc::new(Translations::builtin(Locale::ENGLISH).unwrap())))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_access_is_stable() {
    let cache = cache();

    let handles = (0..16)
        .map(|i| {
            let cache = cache.clone();
            let locale = if i % 2 == 0 { Locale::ENGLISH } else { Locale::FRENCH };
            tokio::task::spawn_blocking(move || (locale.clone(), cache.get_units(&locale)))
        })
        .collect::<Vec<_>>();

    let mut tables = Vec::new();
    for handle in handles {
        tables.push(handle.await.unwrap());
    }

    for (locale, table) in &tables {
        assert_eq!(**table, *cache.get_units(locale));
        assert_eq!(table.resolve("s"), Some(TimeUnit::Seconds));
    }
    assert_eq!(cache.cached_locales(), 2);
}

#[test]
fn weeks_equal_seven_days() {
    let cache = cache();
    let parser = DurationParser::signed(&cache);
    let reference = datetime!(2024-06-01 0:00 UTC);

    let weeks = parser.parse("1w", &Locale::ENGLISH).unwrap();
    let days = parser.parse("7d", &Locale::ENGLISH).unwrap();

    assert_eq!(weeks, days);
    assert_eq!(weeks.get(TimeUnit::Days), 7);
    assert_eq!(weeks.normalize(reference), days.normalize(reference));
}

#[test]
fn missing_and_unknown_units() {
    let cache = cache();
    let parser = DurationParser::unsigned(&cache);

    assert_eq!(
        parser.parse("10", &Locale::ENGLISH),
        Err(DurationError::InvalidTimeUnit { unit: String::new() })
    );
    assert_eq!(
        parser.parse("10zz", &Locale::ENGLISH),
        Err(DurationError::InvalidTimeUnit { unit: "zz".to_owned() })
    );
}

#[test]
fn legacy_parser_rejects_negatives() {
    let cache = cache();

    let legacy = DurationParser::unsigned(&cache).parse("-5d", &Locale::ENGLISH);
    assert_eq!(legacy, Err(DurationError::from(ParserErrorKind::NegativeUnsupported)));

    let signed = DurationParser::signed(&cache).parse("-5d", &Locale::ENGLISH).unwrap();
    assert_eq!(signed.get(TimeUnit::Days), -5);
}

#[test]
fn apply_after_parse() {
    let cache = cache();
    let parsed = DurationParser::signed(&cache)
        .parse("1 month 2 days 3 hours", &Locale::ENGLISH)
        .unwrap();

    assert_eq!(parsed.apply(datetime!(2024-01-30 0:00 UTC)), Some(datetime!(2024-03-02 3:00 UTC)));
}
