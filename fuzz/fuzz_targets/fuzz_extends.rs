#![no_main]

use jsonschema_compat_core::{schema_equals, schema_extends, CompareOptions};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

// Arbitrary bytes are parsed as a JSON array `[child, parent]` (or a single
// schema compared against itself) and fed to the public entry points.
// Goal: no panics, even on malformed input.
fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let (child, parent) = match value {
        Value::Array(mut pair) if pair.len() == 2 => {
            let parent = pair.pop().unwrap_or_default();
            let child = pair.pop().unwrap_or_default();
            (child, parent)
        }
        single => (single.clone(), single),
    };

    let options = CompareOptions::default();
    if let Ok(report) = schema_extends(&child, &parent, &options) {
        // A reported failure always carries at least one reason.
        assert_eq!(report.extends, report.reasons.is_empty());
    }
    let _ = schema_equals(&child, &parent, &options);
});
