//! Language-map resolution.
//!
//! Statements carry human readable labels as maps from a language tag to a
//! value (`{"en-US": "attempted", "sv": "försökte"}`). Picking a label means
//! testing the preferred tag, then progressively dropping its most specific
//! subtag until something matches or nothing is left.
//!
//! The preferred tag comes from a [`LocaleProvider`] that is handed to the
//! resolver, rather than being read from process state behind its back.

use std::cell::OnceCell;
use std::collections::HashMap;

use tracing::debug;

/// Values keyed by language tag.
pub type LanguageMap<V = String> = HashMap<String, V>;

/// Used when no provider has an opinion.
pub const DEFAULT_LANGUAGE: &str = "en-US";

// ------------- Providers -------------
pub trait LocaleProvider {
    /// The preferred language tag, `None` when this source has nothing to say.
    fn preferred_language(&self) -> Option<String>;
}

impl<P: LocaleProvider + ?Sized> LocaleProvider for Box<P> {
    fn preferred_language(&self) -> Option<String> {
        (**self).preferred_language()
    }
}
impl<P: LocaleProvider + ?Sized> LocaleProvider for &P {
    fn preferred_language(&self) -> Option<String> {
        (**self).preferred_language()
    }
}

/// Reads the locale of the running process from its environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocale;

impl LocaleProvider for SystemLocale {
    fn preferred_language(&self) -> Option<String> {
        detect_locale(|name| std::env::var(name).ok())
    }
}

/// Always prefers the same tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLocale(pub String);

impl StaticLocale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}
impl LocaleProvider for StaticLocale {
    fn preferred_language(&self) -> Option<String> {
        Some(self.0.clone()).filter(|tag| !tag.is_empty())
    }
}

/// Finds a usable tag given a way to read environment variables.
///
/// The colon separated `LANGUAGE` list is consulted first, then the usual
/// locale variables from most to least specific.
pub fn detect_locale<F>(var: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(tag) = var("LANGUAGE").and_then(|list| list.split(':').find_map(normalize_locale)) {
        return Some(tag);
    }
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|name| var(name))
        .find_map(|raw| normalize_locale(&raw))
}

/// `en_US.UTF-8` becomes `en-US`. The `C` and `POSIX` locales name no language.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or("").trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

// ------------- Fallback -------------
/// The tags tried for `tag`, most specific first: `en-US-CA`, `en-US`, `en`.
pub fn fallback_chain(tag: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(tag).filter(|t| !t.is_empty()), |&t| {
        t.rfind('-').map(|i| &t[..i]).filter(|t| !t.is_empty())
    })
}

/// Looks `tag` up in `map`, falling back along [`fallback_chain`].
pub fn lookup<'m, V>(map: &'m LanguageMap<V>, tag: &str) -> Option<&'m V> {
    lookup_where(map, tag, |_| true)
}

/// Like [`lookup`], but values rejected by `usable` count as missing and the
/// fallback carries on past them.
pub fn lookup_where<'m, V, F>(map: &'m LanguageMap<V>, tag: &str, usable: F) -> Option<&'m V>
where
    F: Fn(&V) -> bool,
{
    fallback_chain(tag).find_map(|candidate| {
        let found = map.get(candidate).filter(|v| usable(v));
        debug!(candidate, hit = found.is_some(), "language lookup");
        found
    })
}

// ------------- Resolver -------------
#[derive(Debug, Clone, Default)]
pub struct LanguageResolver<P = SystemLocale> {
    provider: P,
}

impl<P: LocaleProvider> LanguageResolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
    pub fn provider(&self) -> &P {
        &self.provider
    }
    /// The provider's tag, or [`DEFAULT_LANGUAGE`].
    pub fn preferred_language(&self) -> String {
        self.provider
            .preferred_language()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }
    /// Starts a resolution chain. An explicit tag wins over the provider.
    pub fn preference<'r>(&'r self, explicit: Option<&'r str>) -> Preference<'r, P> {
        Preference {
            resolver: self,
            explicit,
            snapshot: OnceCell::new(),
        }
    }
    /// Best match in `map` for `preferred`, or for the provider's tag when none is given.
    pub fn resolve<'m, V>(&self, map: Option<&'m LanguageMap<V>>, preferred: Option<&str>) -> Option<&'m V> {
        self.preference(preferred).resolve(map)
    }
}

/// The preferred tag for one resolution chain.
///
/// The provider is asked at most once, and only when a non-empty map actually
/// needs resolving.
pub struct Preference<'r, P> {
    resolver: &'r LanguageResolver<P>,
    explicit: Option<&'r str>,
    snapshot: OnceCell<String>,
}

impl<P: LocaleProvider> Preference<'_, P> {
    pub fn tag(&self) -> &str {
        match self.explicit {
            Some(tag) => tag,
            None => self.snapshot.get_or_init(|| self.resolver.preferred_language()),
        }
    }
    pub fn resolve<'m, V>(&self, map: Option<&'m LanguageMap<V>>) -> Option<&'m V> {
        self.resolve_where(map, |_| true)
    }
    pub fn resolve_where<'m, V, F>(&self, map: Option<&'m LanguageMap<V>>, usable: F) -> Option<&'m V>
    where
        F: Fn(&V) -> bool,
    {
        let map = map.filter(|m| !m.is_empty())?;
        lookup_where(map, self.tag(), usable)
    }
}
