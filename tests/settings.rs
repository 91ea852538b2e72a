use xapi_util::UtilError;
use xapi_util::language::LocaleProvider;
use xapi_util::settings::Settings;

#[test]
fn defaults_when_empty() {
    let settings = Settings::from_toml("").expect("empty settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.log, "info");
}

#[test]
fn language_overrides_the_system() {
    let settings = Settings::from_toml("language = \"sv-SE\"\nlog = \"debug\"").unwrap();
    assert_eq!(settings.language.as_deref(), Some("sv-SE"));
    assert_eq!(settings.log, "debug");
    assert_eq!(settings.locale().preferred_language().as_deref(), Some("sv-SE"));
}

#[test]
fn loads_a_named_file() {
    let path = std::env::temp_dir().join(format!("xapi-util-settings-{}.toml", std::process::id()));
    std::fs::write(&path, "language = \"fr\"\n").unwrap();
    let loaded = Settings::load(path.to_str());
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.unwrap().language.as_deref(), Some("fr"));
}

#[test]
fn a_named_file_must_exist() {
    let missing = std::env::temp_dir().join("xapi-util-settings-missing.toml");
    assert!(matches!(Settings::load(missing.to_str()), Err(UtilError::Config(_))));
}
