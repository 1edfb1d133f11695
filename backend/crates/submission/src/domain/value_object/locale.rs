//! Locales and locale-keyed values
//!
//! The blog is bilingual. English is the primary locale and always complete;
//! Bangla is optional per field.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Bn,
}

impl Locale {
    pub const PRIMARY: Locale = Locale::En;
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Bn];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Bn => "bn",
        }
    }

    #[inline]
    pub const fn is_primary(&self) -> bool {
        matches!(self, Locale::En)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A value that may exist in each locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bn: Option<T>,
}

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self { en: None, bn: None }
    }
}

impl<T> Localized<T> {
    pub fn new(en: Option<T>, bn: Option<T>) -> Self {
        Self { en, bn }
    }

    pub fn get(&self, locale: Locale) -> Option<&T> {
        match locale {
            Locale::En => self.en.as_ref(),
            Locale::Bn => self.bn.as_ref(),
        }
    }

    pub fn set(&mut self, locale: Locale, value: Option<T>) {
        match locale {
            Locale::En => self.en = value,
            Locale::Bn => self.bn = value,
        }
    }

    /// Present values, primary locale first
    pub fn iter(&self) -> impl Iterator<Item = (Locale, &T)> {
        Locale::ALL
            .into_iter()
            .filter_map(move |locale| self.get(locale).map(|v| (locale, v)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Locale, &T) -> U) -> Localized<U> {
        Localized {
            en: self.en.as_ref().map(|v| f(Locale::En, v)),
            bn: self.bn.as_ref().map(|v| f(Locale::Bn, v)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_none() && self.bn.is_none()
    }
}

impl Localized<String> {
    /// Treat blank strings as absent
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            en: keep(self.en),
            bn: keep(self.bn),
        }
    }

    pub fn text(&self, locale: Locale) -> Option<&str> {
        self.get(locale).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_skips_missing_locale() {
        let value = Localized::new(Some("Hello".to_string()), None);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"en":"Hello"}"#);

        let back: Localized<String> = serde_json::from_str(r#"{"bn":"নমস্কার"}"#).unwrap();
        assert_eq!(back.en, None);
        assert_eq!(back.text(Locale::Bn), Some("নমস্কার"));
    }

    #[test]
    fn test_normalized_drops_blank() {
        let value = Localized::new(Some("  ".to_string()), Some("x".to_string())).normalized();
        assert_eq!(value.en, None);
        assert_eq!(value.bn.as_deref(), Some("x"));
    }

    #[test]
    fn test_iter_primary_first() {
        let value = Localized::new(Some(1), Some(2));
        let locales: Vec<Locale> = value.iter().map(|(l, _)| l).collect();
        assert_eq!(locales, vec![Locale::En, Locale::Bn]);
    }
}
