//! Fuzz target for content unit parsing.
//!
//! Parsing arbitrary text must never panic, and outside of named blocks the
//! units must export back to the input exactly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use richtext_core::convert_text_to_units;
use richtext_core::unit::BLOCK_START;

fuzz_target!(|data: &str| {
    let units = convert_text_to_units(data);
    assert!(units.iter().all(|u| u.internal_len() > 0));

    if !data.contains(BLOCK_START) {
        let exported: String = units.iter().map(|u| u.text()).collect();
        assert_eq!(exported, data);
    }
});
