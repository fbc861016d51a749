#![no_main]
use cvefeed::utils::compare_versions;
use libfuzzer_sys::fuzz_target;

/// Fuzz the version comparator; the split point divides the input into two versions.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mid = s.char_indices().nth(s.chars().count() / 2).map_or(s.len(), |(i, _)| i);
        let (a, b) = s.split_at(mid);
        assert_eq!(compare_versions(a, b), compare_versions(b, a).reverse());
        assert_eq!(compare_versions(a, a), std::cmp::Ordering::Equal);
    }
});
