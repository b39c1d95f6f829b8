use super::*;
use std::collections::HashMap;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn from_vars_defaults_when_unset() {
    let cfg = AdvisorConfig::from_vars(vars(&[])).unwrap();
    assert_eq!(cfg, AdvisorConfig::default());
    assert_eq!(cfg.model, "gpt-4o");
    assert_eq!(cfg.catalog_source, DEFAULT_CATALOG_SOURCE);
}

#[test]
fn from_vars_parses_overrides() {
    let cfg = AdvisorConfig::from_vars(vars(&[
        ("ADVISOR_ENDPOINT", "https://proxy.example.test/"),
        ("ADVISOR_MODEL", "gpt-4o-mini"),
        ("ADVISOR_CATALOG", "https://cdn.example.test/products.json"),
        ("ADVISOR_STORE_PATH", "/tmp/advisor.json"),
    ]))
    .unwrap();
    assert_eq!(cfg.endpoint, "https://proxy.example.test/");
    assert_eq!(cfg.model, "gpt-4o-mini");
    assert_eq!(cfg.catalog_source, "https://cdn.example.test/products.json");
    assert_eq!(cfg.store_path, "/tmp/advisor.json");
}

#[test]
fn from_vars_blank_values_fall_back_to_defaults() {
    let cfg = AdvisorConfig::from_vars(vars(&[("ADVISOR_MODEL", "   ")])).unwrap();
    assert_eq!(cfg.model, DEFAULT_MODEL);
}

#[test]
fn from_vars_rejects_non_http_endpoint() {
    let err = AdvisorConfig::from_vars(vars(&[("ADVISOR_ENDPOINT", "ftp://nope")])).unwrap_err();
    assert!(err.to_string().contains("ADVISOR_ENDPOINT"));
    assert_eq!(err.error_code(), "E_CONFIG_INVALID");
}

#[test]
fn validate_rejects_blank_model() {
    let cfg = AdvisorConfig { model: String::new(), ..AdvisorConfig::default() };
    assert!(cfg.validate().is_err());
}
