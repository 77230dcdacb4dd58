use super::*;

#[test]
fn defaults_validate() {
    MemeframeConfig::default().validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = MemeframeConfig::from_json_str(r#"{ "export": { "trailing_flush_ms": 250 } }"#)
        .unwrap();
    assert_eq!(cfg.export.trailing_flush_ms, 250);
    assert_eq!(cfg.export.fps, Fps { num: 25, den: 1 });
    assert_eq!(cfg.editor.min_background_px, 500);
}

#[test]
fn rejects_odd_output_and_empty_preference() {
    let err = MemeframeConfig::from_json_str(
        r#"{ "export": { "output": { "width": 1081, "height": 1920 } } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));

    let err = MemeframeConfig::from_json_str(r#"{ "export": { "codec_preference": [] } }"#)
        .unwrap_err();
    assert!(err.to_string().contains("codec_preference"));
}

#[test]
fn rejects_malformed_json() {
    assert!(MemeframeConfig::from_json_str("{").is_err());
}
