//! A typed stand-in for "the field name that depends on the active locale".
//!
//! The source system this crate is modeled on computes field names at
//! runtime (`error_name_zh` vs `error_name_en`) and looks them up by string
//! concatenation. Here every bilingual attribute is a `Localized<T>` record
//! and `pick` resolves it once, at the read boundary, with no stringly-typed
//! key ever constructed.

use serde::{Deserialize, Serialize};

use crate::types::Locale;

/// A value that exists in both supported locales.
///
/// `en` and `zh` are required fields rather than `Option`s: the catalog
/// invariant ("at least one locale name populated") is enforced at
/// construction time by [`Localized::new_partial`], which is the only entry
/// point that accepts a possibly-missing translation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub en: Option<T>,
    pub zh: Option<T>,
}

impl<T> Localized<T> {
    #[must_use]
    pub fn new(en: T, zh: T) -> Self {
        Self {
            en: Some(en),
            zh: Some(zh),
        }
    }

    /// Construct from a seed document where one side may be absent.
    #[must_use]
    pub fn new_partial(en: Option<T>, zh: Option<T>) -> Self {
        Self { en, zh }
    }

    #[must_use]
    pub fn en_only(en: T) -> Self {
        Self {
            en: Some(en),
            zh: None,
        }
    }

    pub fn has_any(&self) -> bool {
        self.en.is_some() || self.zh.is_some()
    }
}

impl<T: AsRef<str>> Localized<T> {
    /// Resolve this field for `locale`: exact locale, else English, else
    /// `None`.
    #[must_use]
    pub fn pick(&self, locale: Locale) -> Option<&str> {
        let exact = match locale {
            Locale::En => self.en.as_ref(),
            Locale::Zh => self.zh.as_ref(),
        };
        exact.or(self.en.as_ref()).map(AsRef::as_ref)
    }

    /// [`pick`](Self::pick), falling back to `code` when neither locale is
    /// populated.
    #[must_use]
    pub fn pick_or_code<'a>(&'a self, locale: Locale, code: &'a str) -> &'a str {
        self.pick(locale).unwrap_or(code)
    }
}
