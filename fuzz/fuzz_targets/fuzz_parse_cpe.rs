#![no_main]
use cvefeed::wfn;
use libfuzzer_sys::fuzz_target;

/// Fuzz CPE unbinding.
///
/// Tries the raw input, then the input behind each prefix so most runs get
/// past prefix detection. Anything that parses must survive rebinding.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for candidate in [s.to_string(), format!("cpe:2.3:{s}"), format!("cpe:/{s}")] {
            if let Ok(name) = wfn::parse(&candidate) {
                let _ = wfn::parse(&name.to_string());
                let _ = name.matches(&name);
            }
        }
    }
});
