use std::time::Duration;

use fillview::config::{Configuration, Settings, SettingsUpdate};

#[test]
fn parse_kebab_case_settings() {
    let yaml = r#"
src: "photos/coast.jpg"
focus-x: 25
focus-y: 75
speed: 300ms
"#;
    let settings: Settings = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(settings.src.as_deref(), Some("photos/coast.jpg"));
    assert!((settings.focus_x - 25.0).abs() < f64::EPSILON);
    assert!((settings.focus_y - 75.0).abs() < f64::EPSILON);
    assert_eq!(settings.speed, Duration::from_millis(300));
}

#[test]
fn defaults_are_centered_and_immediate() {
    let settings: Settings = serde_yaml::from_str("{}").unwrap();
    assert_eq!(settings.src, None);
    assert!((settings.focus_x - 50.0).abs() < f64::EPSILON);
    assert!((settings.focus_y - 50.0).abs() < f64::EPSILON);
    assert_eq!(settings.speed, Duration::ZERO);
    assert_eq!(settings.centered_x, None);
    assert_eq!(settings.centered_y, None);
}

#[test]
fn legacy_centered_flags_override_focus() {
    let yaml = r#"
src: "a.jpg"
focus-x: 10
focus-y: 90
centered-x: true
"#;
    let settings: Settings = serde_yaml::from_str(yaml).unwrap();
    let focus = settings.focus();
    assert!((focus.x - 50.0).abs() < f64::EPSILON);
    assert!((focus.y - 90.0).abs() < f64::EPSILON);
}

#[test]
fn update_merges_only_supplied_fields() {
    let mut settings: Settings = serde_yaml::from_str(r#"{ src: "a.jpg", focus-x: 10 }"#).unwrap();
    settings.apply(SettingsUpdate {
        focus_y: Some(80.0),
        speed: Some(Duration::from_millis(150)),
        ..SettingsUpdate::default()
    });

    assert_eq!(settings.src.as_deref(), Some("a.jpg"));
    assert!((settings.focus_x - 10.0).abs() < f64::EPSILON);
    assert!((settings.focus_y - 80.0).abs() < f64::EPSILON);
    assert_eq!(settings.speed, Duration::from_millis(150));
}

#[test]
fn out_of_range_focus_fails_validation() {
    let settings: Settings = serde_yaml::from_str(r#"{ focus-x: 120 }"#).unwrap();
    let err = settings.validated().unwrap_err();
    assert!(err.to_string().contains("focus-x"));
}

#[test]
fn empty_src_fails_validation() {
    let settings: Settings = serde_yaml::from_str(r#"{ src: "" }"#).unwrap();
    assert!(settings.validated().is_err());
}

#[test]
fn parse_full_configuration() {
    let yaml = r#"
settings:
  src: "photos/coast.jpg"
  speed: 150ms
capabilities:
  native-cover: true
container:
  width: 500
  height: 600
resizes:
  - { width: 800, height: 600 }
  - { width: 320, height: 480 }
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let cfg = cfg.validated().unwrap();

    assert!(cfg.capabilities.native_cover);
    assert!((cfg.container.width - 500.0).abs() < f64::EPSILON);
    assert_eq!(cfg.resizes.len(), 2);
}

#[test]
fn configuration_requires_a_src() {
    let yaml = r#"
container:
  width: 500
  height: 600
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn configuration_rejects_zero_sized_container() {
    let yaml = r#"
settings:
  src: "a.jpg"
container:
  width: 0
  height: 600
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(cfg.validated().is_err());
}
