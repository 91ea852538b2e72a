use std::cell::Cell;
use std::collections::HashMap;

use xapi_util::language::{
    DEFAULT_LANGUAGE, LanguageMap, LanguageResolver, LocaleProvider, StaticLocale, detect_locale, fallback_chain,
    lookup, lookup_where, normalize_locale,
};

struct Counting {
    tag: &'static str,
    asked: Cell<usize>,
}
impl Counting {
    fn new(tag: &'static str) -> Self {
        Self { tag, asked: Cell::new(0) }
    }
}
impl LocaleProvider for Counting {
    fn preferred_language(&self) -> Option<String> {
        self.asked.set(self.asked.get() + 1);
        Some(self.tag.to_string())
    }
}

fn greetings() -> LanguageMap {
    LanguageMap::from([("en".to_string(), "Hello".to_string()), ("fr".to_string(), "Bonjour".to_string())])
}

#[test]
fn chain_drops_the_last_subtag() {
    assert_eq!(fallback_chain("en-US-CA").collect::<Vec<_>>(), ["en-US-CA", "en-US", "en"]);
    assert_eq!(fallback_chain("en").collect::<Vec<_>>(), ["en"]);
    assert_eq!(fallback_chain("").count(), 0);
}

#[test]
fn falls_back_to_the_primary_language() {
    let map = greetings();
    assert_eq!(lookup(&map, "en-US-CA").map(String::as_str), Some("Hello"));
    assert_eq!(lookup(&map, "fr").map(String::as_str), Some("Bonjour"));
    assert_eq!(lookup(&map, "de"), None);
}

#[test]
fn explicit_tag_wins_over_provider() {
    let resolver = LanguageResolver::new(StaticLocale::new("fr-CA"));
    let map = greetings();
    assert_eq!(resolver.resolve(Some(&map), Some("en-US-CA")).map(String::as_str), Some("Hello"));
    assert_eq!(resolver.resolve(Some(&map), None).map(String::as_str), Some("Bonjour"));
    assert_eq!(resolver.resolve(Some(&map), Some("de")), None);
}

#[test]
fn empty_or_missing_maps_skip_the_provider() {
    let provider = Counting::new("en");
    let resolver = LanguageResolver::new(&provider);
    let empty: LanguageMap = HashMap::new();
    assert_eq!(resolver.resolve(Some(&empty), None), None);
    assert_eq!(resolver.resolve::<String>(None, None), None);
    assert_eq!(provider.asked.get(), 0);
    assert!(resolver.resolve(Some(&greetings()), None).is_some());
    assert_eq!(provider.asked.get(), 1);
}

#[test]
fn provider_is_asked_once_per_chain() {
    let provider = Counting::new("en");
    let resolver = LanguageResolver::new(&provider);
    let preference = resolver.preference(None);
    let map = greetings();
    assert!(preference.resolve(Some(&map)).is_some());
    assert!(preference.resolve(Some(&map)).is_some());
    assert_eq!(provider.asked.get(), 1);
}

#[test]
fn silent_provider_means_default_language() {
    let resolver = LanguageResolver::new(StaticLocale::new(""));
    assert_eq!(resolver.preferred_language(), DEFAULT_LANGUAGE);
    assert_eq!(resolver.resolve(Some(&greetings()), None).map(String::as_str), Some("Hello"));
}

#[test]
fn resolves_structured_values() {
    let map: LanguageMap<Vec<u8>> = LanguageMap::from([("sv".to_string(), vec![1, 2])]);
    let resolver = LanguageResolver::new(StaticLocale::new("sv-FI"));
    assert_eq!(resolver.resolve(Some(&map), None), Some(&vec![1, 2]));
}

#[test]
fn environment_locales_are_normalized() {
    assert_eq!(normalize_locale("en_US.UTF-8").as_deref(), Some("en-US"));
    assert_eq!(normalize_locale("de_DE@euro").as_deref(), Some("de-DE"));
    assert_eq!(normalize_locale("sv").as_deref(), Some("sv"));
    assert_eq!(normalize_locale("C.UTF-8"), None);
    assert_eq!(normalize_locale("POSIX"), None);
    assert_eq!(normalize_locale(""), None);
}

#[test]
fn detection_prefers_the_language_list() {
    let env = |pairs: &'static [(&'static str, &'static str)]| {
        move |name: &str| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string())
    };
    assert_eq!(detect_locale(env(&[("LANGUAGE", "sv_SE:en"), ("LANG", "en_US.UTF-8")])).as_deref(), Some("sv-SE"));
    assert_eq!(detect_locale(env(&[("LANGUAGE", ""), ("LANG", "fr_FR.UTF-8")])).as_deref(), Some("fr-FR"));
    assert_eq!(detect_locale(env(&[("LC_ALL", "de_DE@euro"), ("LANG", "en_US.UTF-8")])).as_deref(), Some("de-DE"));
    assert_eq!(detect_locale(env(&[("LANG", "C")])), None);
    assert_eq!(detect_locale(env(&[])), None);
}

#[test]
fn rejected_values_count_as_missing() {
    let labels: LanguageMap = HashMap::from([("en-US".to_string(), String::new()), ("en".to_string(), "Hello".to_string())]);
    assert_eq!(lookup(&labels, "en-US").map(String::as_str), Some(""));
    assert_eq!(lookup_where(&labels, "en-US", |l: &String| !l.is_empty()).map(String::as_str), Some("Hello"));
    assert_eq!(lookup_where(&labels, "en-US", |_: &String| false), None);

    let resolver = LanguageResolver::new(StaticLocale::new("en-US"));
    let preference = resolver.preference(None);
    assert_eq!(preference.resolve_where(Some(&labels), |l: &String| !l.is_empty()).map(String::as_str), Some("Hello"));
}
