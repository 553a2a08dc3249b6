use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use moka::sync::Cache;
use tempus_common::{Locale, Translate};
use tracing::debug;

use crate::unit::TimeUnit;

/// Synonym lookup for one locale. Synonyms are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTable {
    units: HashMap<String, TimeUnit>,
    synonyms: BTreeMap<TimeUnit, Vec<String>>,
    initials: HashSet<char>,
}

impl UnitTable {
    pub fn build(translations: &dyn Translate, locale: &Locale) -> UnitTable {
        let mut table = UnitTable {
            units: HashMap::new(),
            synonyms: BTreeMap::new(),
            initials: HashSet::new(),
        };

        for unit in TimeUnit::ALL {
            let raw = translations.translate(&unit.translation_key(), locale);

            for synonym in raw.split(',').map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) {
                // first unit to claim a synonym keeps it
                if table.units.contains_key(&synonym) {
                    continue;
                }

                table.initials.extend(synonym.chars().next());
                table.synonyms.entry(unit).or_default().push(synonym.clone());
                table.units.insert(synonym, unit);
            }
        }

        table
    }

    /// Resolves a synonym, ignoring case.
    pub fn resolve(&self, synonym: &str) -> Option<TimeUnit> {
        self.units.get(&synonym.to_lowercase()).copied()
    }

    pub fn units(&self) -> &HashMap<String, TimeUnit> {
        &self.units
    }

    /// Synonyms registered for `unit`, in bundle order.
    pub fn synonyms(&self, unit: TimeUnit) -> &[String] {
        self.synonyms.get(&unit).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether some synonym starts with `c`, ignoring case.
    pub fn starts_unit(&self, c: char) -> bool {
        c.to_lowercase().all(|c| self.initials.contains(&c))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Per-locale [`UnitTable`]s, built on first use and kept for the lifetime of the cache.
pub struct UnitCache {
    translations: Arc<dyn Translate>,
    tables: Cache<Locale, Arc<UnitTable>>,
}

impl UnitCache {
    pub fn new(translations: Arc<dyn Translate>) -> UnitCache {
        UnitCache {
            translations,
            tables: Cache::builder().build(),
        }
    }

    pub fn get_units(&self, locale: &Locale) -> Arc<UnitTable> {
        self.tables.get_with_by_ref(locale, || {
            let table = UnitTable::build(self.translations.as_ref(), locale);
            debug!("Built unit table for {locale} ({} synonyms)", table.len());
            Arc::new(table)
        })
    }

    /// Number of locales with a built table.
    pub fn cached_locales(&self) -> u64 {
        self.tables.run_pending_tasks();
        self.tables.entry_count()
    }
}
