use std::collections::HashMap;

use super::*;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn site_defaults_when_nothing_set() {
    let cfg = SiteConfig::from_lookup(vars(&[])).unwrap();
    assert_eq!(cfg, SiteConfig::default());
    assert_eq!(cfg.theme_key, "portfolio-theme");
    assert_eq!(cfg.mobile_breakpoint_px, 900);
    assert_eq!(cfg.back_to_top_px, 120);
    assert!(cfg.contact.endpoint.is_none());
    assert_eq!(cfg.contact.sending_message, "Sending...");
    assert_eq!(
        cfg.contact.timeouts,
        ContactTimeouts {
            request_secs: DEFAULT_CONTACT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONTACT_CONNECT_TIMEOUT_SECS
        }
    );
}

#[test]
fn site_overrides_parse() {
    let cfg = SiteConfig::from_lookup(vars(&[
        ("PORTFOLIO_THEME_KEY", "site-theme"),
        ("PORTFOLIO_MOBILE_BREAKPOINT_PX", " 768 "),
        ("PORTFOLIO_BACK_TO_TOP_PX", "200"),
        ("PORTFOLIO_METER_THRESHOLD", "0.5"),
        ("CONTACT_FORM_ENDPOINT", "https://forms.example.test/f/abc"),
        ("CONTACT_FALLBACK_MESSAGE", "Something went wrong."),
        ("CONTACT_REQUEST_TIMEOUT_SECS", "5"),
    ]))
    .unwrap();
    assert_eq!(cfg.theme_key, "site-theme");
    assert_eq!(cfg.mobile_breakpoint_px, 768);
    assert_eq!(cfg.back_to_top_px, 200);
    assert!((cfg.meter_threshold - 0.5).abs() < f64::EPSILON);
    assert_eq!(cfg.contact.endpoint.as_deref(), Some("https://forms.example.test/f/abc"));
    assert_eq!(cfg.contact.fallback_message, "Something went wrong.");
    assert_eq!(cfg.contact.network_message, DEFAULT_NETWORK_MESSAGE);
    assert_eq!(cfg.contact.timeouts.request_secs, 5);
    assert_eq!(cfg.contact.timeouts.connect_secs, DEFAULT_CONTACT_CONNECT_TIMEOUT_SECS);
}

#[test]
fn blank_endpoint_means_form_action() {
    let cfg = SiteConfig::from_lookup(vars(&[("CONTACT_FORM_ENDPOINT", "  ")])).unwrap();
    assert!(cfg.contact.endpoint.is_none());
}

#[test]
fn invalid_number_errors() {
    let err = SiteConfig::from_lookup(vars(&[("PORTFOLIO_BACK_TO_TOP_PX", "lots")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORTFOLIO_BACK_TO_TOP_PX", value: "lots".into() });
    assert!(err.to_string().contains("PORTFOLIO_BACK_TO_TOP_PX"));
}

#[test]
fn meter_threshold_out_of_range_errors() {
    let err = SiteConfig::from_lookup(vars(&[("PORTFOLIO_METER_THRESHOLD", "1.5")])).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { var: "PORTFOLIO_METER_THRESHOLD", .. }));
}

#[test]
fn preview_defaults() {
    let cfg = PreviewConfig::from_lookup(vars(&[])).unwrap();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.site_dir, PathBuf::from("site"));
}

#[test]
fn preview_overrides() {
    let cfg = PreviewConfig::from_lookup(vars(&[("PORT", "8080"), ("SITE_DIR", "/srv/www")])).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.site_dir, PathBuf::from("/srv/www"));
}

#[test]
fn preview_port_overflow_errors() {
    let err = PreviewConfig::from_lookup(vars(&[("PORT", "70000")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
}

#[test]
fn site_config_json_fills_missing_fields() {
    let cfg: SiteConfig = serde_json::from_str(r#"{"theme_key":"k","contact":{"endpoint":"https://f.test"}}"#).unwrap();
    assert_eq!(cfg.theme_key, "k");
    assert_eq!(cfg.back_to_top_px, DEFAULT_BACK_TO_TOP_PX);
    assert_eq!(cfg.contact.endpoint.as_deref(), Some("https://f.test"));
    assert_eq!(cfg.contact.network_message, DEFAULT_NETWORK_MESSAGE);
}
