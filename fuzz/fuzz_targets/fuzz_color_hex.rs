//! Fuzz target for color hex parsing.
//!
//! Tests that Rgba::from_hex handles arbitrary strings without panicking
//! and that every accepted color prints back to an equal color.

#![no_main]

use libfuzzer_sys::fuzz_target;
use richtext_core::color::Rgba;

fuzz_target!(|data: &str| {
    if let Some(color) = Rgba::from_hex(data) {
        assert_eq!(Rgba::from_hex(&color.to_hex()), Some(color));
    }

    if !data.starts_with('#') {
        let _ = Rgba::from_hex(&format!("#{data}"));
    }

    // Suffixes on char boundaries
    for (i, _) in data.char_indices().take(10) {
        let _ = Rgba::from_hex(&data[i..]);
    }
});
