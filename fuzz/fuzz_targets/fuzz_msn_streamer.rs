#![no_main]

use libfuzzer_sys::fuzz_target;
use pairfinder::features::{extract_features, ExtractionParams};
use pairfinder::msn::MsnStreamer;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Parsing must either succeed or return an error, never panic
    let mut streamer = MsnStreamer::new(Cursor::new(data));
    let params = ExtractionParams::default();

    for _ in 0..100 {
        match streamer.next_spectrum() {
            Ok(Some(spectrum)) => {
                let _ = extract_features(&spectrum, "fuzz", &params);
            }
            Ok(None) | Err(_) => break,
        }
    }
});
