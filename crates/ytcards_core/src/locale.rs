//! Locale resource table
//!
//! Phrase tables are embedded YAML files parsed once into a [`LocaleTable`].
//! The table is immutable after construction and is handed to formatting
//! functions by reference.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::model::TextDirection;

pub const DEFAULT_LOCALE: &str = "en";

const EMBEDDED_LOCALES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.yml")),
    ("de", include_str!("../locales/de.yml")),
    ("es", include_str!("../locales/es.yml")),
    ("fr", include_str!("../locales/fr.yml")),
    ("he", include_str!("../locales/he.yml")),
    ("it", include_str!("../locales/it.yml")),
    ("ja", include_str!("../locales/ja.yml")),
    ("ru", include_str!("../locales/ru.yml")),
];

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("failed to parse locale {tag}: {source}")]
    Parse {
        tag: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("default locale '{0}' is missing from the locale table")]
    MissingDefault(String),
    #[error("locale {tag} declares '{found}' but is registered as '{tag}'")]
    TagMismatch { tag: String, found: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralRule {
    /// `one` for exactly 1.
    OneOther,
    /// `one` for 0 and 1.
    ZeroOneOther,
    /// one / few / many, as in Russian and Ukrainian.
    EastSlavic,
    /// No grammatical number.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    One,
    Few,
    Many,
    Other,
}

impl PluralRule {
    pub fn category(self, count: u64) -> PluralCategory {
        match self {
            PluralRule::OneOther if count == 1 => PluralCategory::One,
            PluralRule::ZeroOneOther if count <= 1 => PluralCategory::One,
            PluralRule::EastSlavic => {
                let rem10 = count % 10;
                let rem100 = count % 100;
                if rem10 == 1 && rem100 != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&rem10) && !(12..=14).contains(&rem100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            _ => PluralCategory::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluralForms {
    pub one: Option<String>,
    pub few: Option<String>,
    pub many: Option<String>,
    pub other: String,
}

impl PluralForms {
    pub fn pick(&self, category: PluralCategory) -> &str {
        let form = match category {
            PluralCategory::One => self.one.as_ref(),
            PluralCategory::Few => self.few.as_ref(),
            PluralCategory::Many => self.many.as_ref(),
            PluralCategory::Other => None,
        };
        form.unwrap_or(&self.other)
    }
}

#[derive(Debug, Deserialize)]
struct LocaleRaw {
    tag: String,
    direction: Option<TextDirectionRaw>,
    decimal_separator: Option<String>,
    plural: Option<PluralRule>,
    #[serde(default)]
    phrases: BTreeMap<String, PluralForms>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TextDirectionRaw {
    Ltr,
    Rtl,
}

#[derive(Debug, Clone)]
pub struct Locale {
    pub tag: String,
    pub direction: TextDirection,
    pub decimal_separator: String,
    pub plural: PluralRule,
    phrases: BTreeMap<String, PluralForms>,
}

impl Locale {
    pub fn is_rtl(&self) -> bool {
        self.direction == TextDirection::Rtl
    }

    /// Picks the plural form for `count` and substitutes `{count}`.
    pub fn phrase(&self, key: &str, count: u64) -> String {
        let category = self.plural.category(count);
        self.phrase_with(key, category, "count", &count.to_string())
    }

    pub fn phrase_with(
        &self,
        key: &str,
        category: PluralCategory,
        placeholder: &str,
        value: &str,
    ) -> String {
        let Some(forms) = self.phrases.get(key) else {
            return key.to_string();
        };
        forms
            .pick(category)
            .replace(&format!("{{{placeholder}}}"), value)
    }

    pub fn has_phrase(&self, key: &str) -> bool {
        self.phrases.contains_key(key)
    }
}

#[derive(Debug, Clone)]
pub struct LocaleTable {
    default_tag: String,
    locales: BTreeMap<String, Locale>,
}

impl LocaleTable {
    /// Builds the table from the locale files compiled into the crate.
    pub fn embedded() -> Result<Self, LocaleError> {
        Self::from_sources(EMBEDDED_LOCALES, DEFAULT_LOCALE)
    }

    pub fn from_sources(sources: &[(&str, &str)], default_tag: &str) -> Result<Self, LocaleError> {
        let mut locales = BTreeMap::new();
        for (tag, yaml) in sources {
            let raw: LocaleRaw = serde_yaml::from_str(yaml).map_err(|source| LocaleError::Parse {
                tag: tag.to_string(),
                source,
            })?;
            if raw.tag != *tag {
                return Err(LocaleError::TagMismatch {
                    tag: tag.to_string(),
                    found: raw.tag,
                });
            }
            let locale = Locale {
                tag: raw.tag,
                direction: match raw.direction {
                    Some(TextDirectionRaw::Rtl) => TextDirection::Rtl,
                    _ => TextDirection::Ltr,
                },
                decimal_separator: raw.decimal_separator.unwrap_or_else(|| ".".to_string()),
                plural: raw.plural.unwrap_or(PluralRule::OneOther),
                phrases: raw.phrases,
            };
            locales.insert(normalize_tag(tag), locale);
        }

        let default_key = normalize_tag(default_tag);
        let default_phrases = locales
            .get(&default_key)
            .map(|locale| locale.phrases.clone())
            .ok_or_else(|| LocaleError::MissingDefault(default_tag.to_string()))?;
        for locale in locales.values_mut() {
            for (key, forms) in &default_phrases {
                if !locale.phrases.contains_key(key) {
                    tracing::debug!(locale = %locale.tag, key = %key, "phrase falls back to default locale");
                    locale.phrases.insert(key.clone(), forms.clone());
                }
            }
        }

        Ok(Self {
            default_tag: default_key,
            locales,
        })
    }

    pub fn default_locale(&self) -> &Locale {
        &self.locales[&self.default_tag]
    }

    /// Exact tag, then the primary subtag, then the default locale.
    pub fn resolve(&self, tag: &str) -> &Locale {
        let normalized = normalize_tag(tag);
        if let Some(locale) = self.locales.get(&normalized) {
            return locale;
        }
        if let Some((primary, _)) = normalized.split_once('-') {
            if let Some(locale) = self.locales.get(primary) {
                return locale;
            }
        }
        self.default_locale()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.locales.contains_key(&normalize_tag(tag))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.locales.values().map(|locale| locale.tag.as_str())
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_locales_parse() {
        let table = LocaleTable::embedded().expect("locales");
        assert_eq!(table.default_locale().tag, "en");
        assert!(table.tags().count() >= 8);
        for tag in table.tags() {
            let locale = table.resolve(tag);
            for key in [
                "just-now",
                "seconds-ago",
                "minutes-ago",
                "hours-ago",
                "days-ago",
                "months-ago",
                "years-ago",
                "views",
            ] {
                assert!(locale.has_phrase(key), "{tag} is missing {key}");
            }
        }
    }

    #[test]
    fn resolve_falls_back_through_subtags() {
        let table = LocaleTable::embedded().expect("locales");
        assert_eq!(table.resolve("de").tag, "de");
        assert_eq!(table.resolve("de_AT").tag, "de");
        assert_eq!(table.resolve("fr-CA").tag, "fr");
        assert_eq!(table.resolve("xx").tag, "en");
        assert_eq!(table.resolve("").tag, "en");
    }

    #[test]
    fn direction_comes_from_locale() {
        let table = LocaleTable::embedded().expect("locales");
        assert!(table.resolve("he").is_rtl());
        assert!(!table.resolve("en").is_rtl());
    }

    #[test]
    fn plural_rules_pick_categories() {
        assert_eq!(PluralRule::OneOther.category(1), PluralCategory::One);
        assert_eq!(PluralRule::OneOther.category(0), PluralCategory::Other);
        assert_eq!(PluralRule::ZeroOneOther.category(0), PluralCategory::One);
        assert_eq!(PluralRule::EastSlavic.category(21), PluralCategory::One);
        assert_eq!(PluralRule::EastSlavic.category(11), PluralCategory::Many);
        assert_eq!(PluralRule::EastSlavic.category(3), PluralCategory::Few);
        assert_eq!(PluralRule::EastSlavic.category(13), PluralCategory::Many);
        assert_eq!(PluralRule::None.category(1), PluralCategory::Other);
    }

    #[test]
    fn missing_phrases_come_from_default() {
        let en = "tag: en\nphrases:\n  views:\n    one: \"{number} view\"\n    other: \"{number} views\"\n";
        let xx = "tag: xx\ndirection: rtl\n";
        let table = LocaleTable::from_sources(&[("en", en), ("xx", xx)], "en").expect("table");
        let locale = table.resolve("xx");
        assert!(locale.is_rtl());
        assert_eq!(
            locale.phrase_with("views", PluralCategory::Other, "number", "5"),
            "5 views"
        );
    }

    #[test]
    fn missing_default_is_an_error() {
        let xx = "tag: xx\n";
        let err = LocaleTable::from_sources(&[("xx", xx)], "en").expect_err("missing default");
        assert!(err.to_string().contains("'en'"));
    }
}
