//! Locale-keyed string lookup.
//!
//! Bundles are flat TOML tables mapping dotted keys to strings, for example
//! `"utils.units.days" = "d, day, days"`. English and French bundles are compiled in; further bundles can be
//! layered over them from a directory of `<locale>.toml` files.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::Path;

use anyhow::Context;
use tracing::debug;

static ENGLISH_BUNDLE: &str = include_str!("../../i18n/en.toml");
static FRENCH_BUNDLE: &str = include_str!("../../i18n/fr.toml");

/// A lower-cased language tag such as `en`, `fr` or `en-gb`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(Cow<'static, str>);

impl Locale {
    pub const ENGLISH: Locale = Locale(Cow::Borrowed("en"));
    pub const FRENCH: Locale = Locale(Cow::Borrowed("fr"));

    pub fn new(tag: &str) -> Locale {
        Locale(Cow::Owned(tag.trim().to_lowercase().replace('_', "-")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, `en` for `en-gb`.
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(self.as_str())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::ENGLISH
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Locale::new(value)
    }
}

pub trait Translate: Send + Sync {
    /// Looks up `key` for `locale`. Unknown keys come back unchanged.
    fn translate(&self, key: &str, locale: &Locale) -> String;

    /// Like [`Translate::translate`], replacing `{0}`, `{1}`, ... with the given values.
    fn translate_with(&self, key: &str, locale: &Locale, replacements: &[&dyn Display]) -> String {
        let mut translated = self.translate(key, locale);
        for (index, replacement) in replacements.iter().enumerate() {
            translated = translated.replace(&format!("{{{index}}}"), &replacement.to_string());
        }
        translated
    }
}

type Bundle = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct Translations {
    default_locale: Locale,
    bundles: HashMap<Locale, Bundle>,
}

impl Translations {
    /// Translations backed by the compiled-in bundles only.
    pub fn builtin(default_locale: Locale) -> anyhow::Result<Translations> {
        let mut translations = Translations {
            default_locale,
            bundles: HashMap::new(),
        };

        translations.insert_bundle(Locale::ENGLISH, parse_bundle(ENGLISH_BUNDLE).context("Invalid english bundle")?);
        translations.insert_bundle(Locale::FRENCH, parse_bundle(FRENCH_BUNDLE).context("Invalid french bundle")?);

        Ok(translations)
    }

    /// Layers every `<locale>.toml` file in `dir` over the bundles already loaded.
    pub fn with_bundle_dir(mut self, dir: impl AsRef<Path>) -> anyhow::Result<Translations> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).with_context(|| format!("Failed to read bundle dir {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let raw = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            let bundle = parse_bundle(&raw).with_context(|| format!("Failed to parse {}", path.display()))?;

            debug!("Loaded {} translations for {stem} from {}", bundle.len(), path.display());
            self.insert_bundle(Locale::new(stem), bundle);
        }

        Ok(self)
    }

    /// Merges `entries` into the bundle for `locale`, overwriting existing keys.
    pub fn insert_bundle(&mut self, locale: Locale, entries: HashMap<String, String>) {
        self.bundles.entry(locale).or_default().extend(entries);
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.bundles.keys()
    }

    fn lookup(&self, key: &str, locale: &Locale) -> Option<&str> {
        let language = Locale::new(locale.language());

        // bound first: the array temporary must not outlive `language`
        let found = [locale, &language, &self.default_locale]
            .into_iter()
            .find_map(|candidate| self.bundles.get(candidate).and_then(|bundle| bundle.get(key)))
            .map(String::as_str);
        found
    }
}

impl Translate for Translations {
    fn translate(&self, key: &str, locale: &Locale) -> String {
        self.lookup(key, locale).unwrap_or(key).to_owned()
    }
}

fn parse_bundle(raw: &str) -> anyhow::Result<Bundle> {
    Ok(toml::from_str::<Bundle>(raw)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn builtin() -> Translations {
        Translations::builtin(Locale::ENGLISH).unwrap()
    }

    #[test]
    fn locale_normalisation() {
        let locale = Locale::new(" en_GB ");
        assert_eq!(locale.as_str(), "en-gb");
        assert_eq!(locale.language(), "en");
        assert_eq!(Locale::ENGLISH.language(), "en");
    }

    #[test]
    fn exact_locale() {
        let t = builtin();
        assert_eq!(t.translate("utils.durations.ignoredWords", &Locale::FRENCH), "et");
    }

    #[test]
    fn falls_back_to_language() {
        let t = builtin();
        assert_eq!(
            t.translate("utils.durations.ignoredWords", &Locale::new("fr-ca")),
            t.translate("utils.durations.ignoredWords", &Locale::FRENCH)
        );
    }

    #[test]
    fn falls_back_to_default_locale() {
        let t = builtin();
        assert_eq!(
            t.translate("converters.duration.signatureType", &Locale::new("de")),
            t.translate("converters.duration.signatureType", &Locale::ENGLISH)
        );
    }

    #[test]
    fn unknown_key_passes_through() {
        let t = builtin();
        assert_eq!(t.translate("reminder", &Locale::ENGLISH), "reminder");
    }

    #[test]
    fn placeholders() {
        let t = builtin();
        let message = t.translate_with("argumentParser.error.errorInArgument", &Locale::ENGLISH, &[&"time", &"oops"]);
        assert!(message.contains("time"));
        assert!(message.contains("oops"));
        assert!(!message.contains("{0}"));
    }

    #[test]
    fn bundle_dir_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("en.toml")).unwrap();
        writeln!(file, "\"utils.durations.ignoredWords\" = \"and, plus\"").unwrap();
        let mut file = std::fs::File::create(dir.path().join("de.toml")).unwrap();
        writeln!(file, "\"utils.durations.ignoredWords\" = \"und\"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let t = builtin().with_bundle_dir(dir.path()).unwrap();
        assert_eq!(t.translate("utils.durations.ignoredWords", &Locale::ENGLISH), "and, plus");
        assert_eq!(t.translate("utils.durations.ignoredWords", &Locale::new("de")), "und");
        assert_eq!(t.locales().count(), 3);
    }
}
