use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MemeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MemeError::generation("x")
            .to_string()
            .contains("generation error:")
    );
    assert!(MemeError::export("x").to_string().contains("export error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MemeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_export());
}
