use barscan::{config::Config, symbology::Symbology};

#[test]
fn parse_example_config() {
    let raw = include_str!("../barscan.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    cfg.validate().expect("example config is valid");
    assert_eq!(cfg.scan.default_formats, vec![Symbology::QR_CODE]);
    assert_eq!(cfg.scan.default_scale, 2.0);
    assert!(cfg.engines.fast_enabled && cfg.engines.general_enabled);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("[limits]\nmax_input_bytes = 10\nmax_pages = 3\n").expect("parse TOML");
    assert_eq!(cfg.limits.max_pages, 3);
    assert_eq!(cfg.scan.default_scale, 2.0);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn unknown_default_format_is_a_parse_error() {
    let raw = "[scan]\ndefault_formats = [\"HOLOGRAM\"]\ndefault_scale = 2.0\n";
    assert!(toml::from_str::<Config>(raw).is_err());
}

#[test]
fn all_engines_disabled_is_rejected() {
    let mut cfg = Config::default();
    cfg.engines.fast_enabled = false;
    cfg.engines.general_enabled = false;
    assert!(cfg.validate().is_err());
}

#[test]
fn empty_default_formats_is_rejected() {
    let raw = "[scan]\ndefault_formats = []\ndefault_scale = 2.0\n";
    let cfg: Config = toml::from_str(raw).unwrap();
    assert!(cfg.validate().is_err());
}
