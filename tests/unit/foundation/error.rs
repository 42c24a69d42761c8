use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChartError::not_found("canvas 3")
            .to_string()
            .contains("not found:")
    );
    assert!(
        ChartError::invalid_geometry("x")
            .to_string()
            .contains("invalid geometry:")
    );
    assert!(
        ChartError::storage(anyhow::anyhow!("disk full"))
            .to_string()
            .contains("storage failure:")
    );
    assert!(
        ChartError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn storage_keeps_context_chain() {
    let base = std::io::Error::other("boom");
    let err = ChartError::storage(anyhow::Error::new(base).context("write blob 7"));
    let msg = err.to_string();
    assert!(msg.contains("write blob 7"));
    assert!(msg.contains("boom"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChartError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_not_found());
}

#[test]
fn sqlite_errors_map_to_storage() {
    let err = ChartError::from(rusqlite::Error::QueryReturnedNoRows);
    assert!(matches!(err, ChartError::Storage(_)));
}
