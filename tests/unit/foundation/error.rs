use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SigpadError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SigpadError::render("x").to_string().contains("render error:"));
    assert!(SigpadError::worker("x").to_string().contains("worker error:"));
    assert!(
        SigpadError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SigpadError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
