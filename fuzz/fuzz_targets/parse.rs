#![no_main]

use judgekit::fixtures::{generator, manifest, time_limit};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fixture parsers must reject bad input with an error, never a panic
        let _ = manifest::parse(s);
        let _ = generator::parse(s);
        let _ = time_limit::parse(s);
    }
});
