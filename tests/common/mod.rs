#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)]

use richtext_core::{LogLevel, PieceTable, set_log_callback};
use std::sync::Once;

/// Install a tracing subscriber and route the crate's log callback into it.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
        set_log_callback(|level, message| match level {
            LogLevel::Debug => tracing::debug!(target: "richtext_core", "{message}"),
            LogLevel::Info => tracing::info!(target: "richtext_core", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "richtext_core", "{message}"),
            LogLevel::Error => tracing::error!(target: "richtext_core", "{message}"),
        });
    });
}

/// Assert that the decoration runs tile the table and that both coordinate
/// spaces agree at the ends.
pub fn assert_consistent(table: &PieceTable) {
    let models = table.decoration_model_list();
    let mut expected = 0;
    for model in &models {
        assert_eq!(model.start, expected, "runs must be contiguous: {models:?}");
        assert!(model.length > 0, "runs must not be empty: {models:?}");
        expected = model.end();
    }
    assert_eq!(expected, table.text_length(), "runs must cover the text");

    let exportable = table.text().chars().count();
    assert_eq!(table.internal_position(exportable), table.text_length());
    assert_eq!(table.exportable_position(table.text_length()), exportable);
    assert_eq!(table.internal_text().chars().count(), table.text_length());
    assert!(table.to_document(0).validate().is_ok());
}
