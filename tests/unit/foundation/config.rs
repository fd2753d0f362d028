use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = ModelConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.color, Rgba8::BLACK);
    assert_eq!(cfg.live_span_limit, Some(64));
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let cfg = ModelConfig::from_json_str(
        r#"{"stroke_width":4.0,"initial_size":{"width":300,"height":120}}"#,
    )
    .unwrap();
    assert_eq!(cfg.stroke_width, 4.0);
    assert_eq!(cfg.pixel_scale, 1.0);
    assert_eq!(cfg.initial_size.unwrap().width(), 300.0);
}

#[test]
fn json_null_disables_live_flush() {
    let cfg = ModelConfig::from_json_str(r#"{"live_span_limit":null}"#).unwrap();
    assert_eq!(cfg.live_span_limit, None);
}

#[test]
fn validate_rejects_bad_numbers() {
    for json in [
        r#"{"stroke_width":0}"#,
        r#"{"pixel_scale":-2}"#,
        r#"{"curve_tolerance":0}"#,
        r#"{"live_span_limit":0}"#,
    ] {
        let err = ModelConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("validation error:"), "{json}");
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = ModelConfig::from_json_str("{").unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn overrides_replace_configured_values() {
    let cfg = ModelConfig::default().with_overrides(vars(&[
        ("SIGPAD_STROKE_WIDTH", "4.5"),
        ("SIGPAD_PIXEL_SCALE", " 2 "),
        ("SIGPAD_LIVE_SPAN_LIMIT", "16"),
    ]));
    assert_eq!(cfg.stroke_width, 4.5);
    assert_eq!(cfg.pixel_scale, 2.0);
    assert_eq!(cfg.live_span_limit, Some(16));
    cfg.validate().unwrap();
}

#[test]
fn zero_span_limit_override_disables_flushing() {
    let cfg = ModelConfig::default().with_overrides(vars(&[("SIGPAD_LIVE_SPAN_LIMIT", "0")]));
    assert_eq!(cfg.live_span_limit, None);
}

#[test]
fn invalid_overrides_are_ignored() {
    let cfg = ModelConfig::default().with_overrides(vars(&[
        ("SIGPAD_STROKE_WIDTH", "-3"),
        ("SIGPAD_PIXEL_SCALE", "NaN"),
        ("SIGPAD_LIVE_SPAN_LIMIT", "many"),
    ]));
    assert_eq!(cfg, ModelConfig::default());

    let cfg = ModelConfig::default().with_overrides(vars(&[
        ("SIGPAD_STROKE_WIDTH", "wide"),
        ("SIGPAD_PIXEL_SCALE", "0"),
        ("SIGPAD_LIVE_SPAN_LIMIT", "-1"),
    ]));
    assert_eq!(cfg, ModelConfig::default());
}

#[test]
fn unset_variables_leave_the_config_alone() {
    let cfg = ModelConfig {
        stroke_width: 7.0,
        ..ModelConfig::default()
    };
    assert_eq!(cfg.clone().with_overrides(|_| None), cfg);
}
