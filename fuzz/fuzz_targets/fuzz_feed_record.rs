#![no_main]
use cvefeed::schema::CveItem;
use cvefeed::{Attributes, Evaluator, VulnerabilityRecord};
use libfuzzer_sys::fuzz_target;

/// Fuzz feed item projection and evaluation.
///
/// Any item that deserializes must project and evaluate without panicking.
fuzz_target!(|data: &[u8]| {
    if let Ok(item) = serde_json::from_slice::<CveItem>(data) {
        let record = VulnerabilityRecord::from_item(&item);
        let platform = Attributes::application("vendor", "product", "1.0");
        let _ = Evaluator::default().is_affected(&record, &platform);
    }
});
