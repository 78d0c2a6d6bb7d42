#![no_main]

use guascope::aggregate::aggregate;
use guascope::normalize::extract;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    // Anything that parses as JSON must normalize without panicking
    if let Ok(raw) = serde_json::from_slice::<serde_json::Value>(data) {
        if let Ok(snapshot) = extract(&raw, Path::new("fuzz.json")) {
            let section = aggregate(&snapshot.records);
            assert_eq!(section.total as usize, snapshot.records.len());
        }
    }
});
