#![no_main]

use libfuzzer_sys::fuzz_target;
use telemu::config::loader::{inline_source, load_profile_str};

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        if let Ok(loaded) = load_profile_str(yaml, &inline_source()) {
            // A profile that loads must render frames with its codes.
            for phase in &loaded.table {
                let frame = telemu::frame::TelemetryFrame::now(phase.code).to_string();
                assert!(frame.starts_with(phase.code));
            }
        }
    }
});
