//! Integration tests for cvefeed
//!
//! These tests load a small NVD feed fixture and check end-to-end
//! applicability decisions through the public API.

use cvefeed::{
    schema::load_feed, wfn, Attributes, ConfigPreset, Evaluator, EvaluatorConfig,
    VulnerabilityItem, VulnerabilityRecord,
};
use std::path::Path;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn load_records() -> Vec<VulnerabilityRecord> {
    let path = Path::new(FIXTURES_DIR).join("nvdcve-sample.json");
    let feed = load_feed(&path).expect("Failed to load feed fixture");
    VulnerabilityRecord::from_feed(&feed)
}

fn record<'a>(records: &'a [VulnerabilityRecord], id: &str) -> &'a VulnerabilityRecord {
    records
        .iter()
        .find(|r| r.id() == id)
        .unwrap_or_else(|| panic!("{id} missing from fixture"))
}

fn cpe(s: &str) -> Attributes {
    wfn::parse(s).expect("valid CPE")
}

// ============================================================================
// Feed Projection
// ============================================================================

mod projection_tests {
    use super::*;

    #[test]
    fn test_feed_order_is_kept() {
        let records = load_records();
        let ids: Vec<&str> = records.iter().map(VulnerabilityRecord::id).collect();
        assert_eq!(
            ids,
            ["CVE-2020-1000", "CVE-2020-2000", "CVE-2020-3000", "CVE-2020-4000", ""]
        );
    }

    #[test]
    fn test_scores_and_classifications() {
        let records = load_records();

        let widget = record(&records, "CVE-2020-1000");
        assert_eq!(widget.problem_types(), ["CWE-787"]);
        assert!((widget.cvss_v3_base() - 9.8).abs() < f64::EPSILON);
        assert!((widget.cvss_v2_base() - 7.5).abs() < f64::EPSILON);

        let server = record(&records, "CVE-2020-2000");
        assert_eq!(server.problem_types(), ["CWE-502", ""]);
        assert!((server.cvss_v2_base() - 6.8).abs() < f64::EPSILON);
        assert!(server.cvss_v3_base().abs() < f64::EPSILON);
    }

    #[test]
    fn test_description_prefers_english() {
        let records = load_records();
        assert_eq!(
            record(&records, "CVE-2020-2000").description(),
            "Unsafe deserialization in Acme Server running on Acme OS."
        );
        assert_eq!(record(&records, "CVE-2020-3000").description(), "");
    }

    #[test]
    fn test_record_without_identity() {
        let records = load_records();
        let anonymous = records.last().expect("fixture has records");
        assert_eq!(anonymous.id(), "");
        assert!(anonymous.problem_types().is_empty());
        assert!(anonymous.config().is_empty());
        assert!(!Evaluator::default().is_affected(anonymous, &cpe("cpe:2.3:*:*:*:*:*:*:*:*:*:*:*")));
    }
}

// ============================================================================
// Applicability
// ============================================================================

mod applicability_tests {
    use super::*;

    #[test]
    fn test_exact_and_ranged_rules() {
        let records = load_records();
        let widget = record(&records, "CVE-2020-1000");
        let evaluator = Evaluator::default();

        assert!(evaluator.is_affected(widget, &Attributes::application("acme", "widget", "2.3.1")));
        assert!(evaluator.is_affected(widget, &Attributes::application("acme", "widget", "5.0")));
        assert!(evaluator.is_affected(widget, &Attributes::application("acme", "widget", "5.9")));
        assert!(!evaluator.is_affected(widget, &Attributes::application("acme", "widget", "6.0")));
        assert!(!evaluator.is_affected(widget, &Attributes::application("acme", "widget", "4.9")));
        assert!(!evaluator.is_affected(widget, &Attributes::application("acme", "gizmo", "5.5")));
    }

    #[test]
    fn test_platform_without_version_matches_any_rule() {
        let records = load_records();
        let platform = cpe("cpe:2.3:a:acme:widget:*:*:*:*:*:*:*:*");
        assert!(Evaluator::default().is_affected(record(&records, "CVE-2020-1000"), &platform));
    }

    #[test]
    fn test_running_on_configuration() {
        let records = load_records();
        let server = record(&records, "CVE-2020-2000");
        let evaluator = Evaluator::default();

        let app = cpe("cpe:2.3:a:acme:server:4.1.7:*:*:*:*:*:*:*");
        let newer_app = cpe("cpe:2.3:a:acme:server:4.1.8:*:*:*:*:*:*:*");
        let os = cpe("cpe:2.3:o:acme:acme_os:-:*:*:*:*:*:*:*");

        // Neither platform alone satisfies both sides of the AND.
        assert!(!evaluator.is_affected(server, &app));
        assert!(!evaluator.is_affected(server, &os));

        assert!(evaluator.is_inventory_affected(server, &[app.clone(), os.clone()]));
        assert!(!evaluator.is_inventory_affected(server, &[newer_app, os]));
        assert!(!evaluator.is_inventory_affected(server, &[app]));
    }

    #[test]
    fn test_unparseable_rule_does_not_hide_fallback() {
        let records = load_records();
        let gadget = record(&records, "CVE-2020-3000");

        assert_eq!(gadget.unresolved_rule_count(), 1);
        let errors = gadget.resolution_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("CVE-2020-3000"), "{}", errors[0]);
        let evaluator = Evaluator::default();
        assert!(evaluator.is_affected(gadget, &Attributes::application("acme", "gadget", "1.0.2")));
        assert!(!evaluator.is_affected(gadget, &Attributes::application("acme", "gadget", "1.0.3")));
    }

    #[test]
    fn test_not_applicable_version_never_satisfies_range() {
        let records = load_records();
        let firmware = record(&records, "CVE-2020-4000");
        let evaluator = Evaluator::default();

        for version in ["0.9", "1.0", "2.5"] {
            assert!(
                !evaluator.is_affected(firmware, &Attributes::application("acme", "firmware", version)),
                "firmware {version} should not be affected"
            );
        }
    }

    #[test]
    fn test_affected_by_and_matching_platforms() {
        let records = load_records();
        let evaluator = Evaluator::default();

        let widget = Attributes::application("acme", "widget", "5.1");
        assert_eq!(evaluator.affected_by(&records, &widget), ["CVE-2020-1000"]);

        let inventory = [
            Attributes::application("acme", "widget", "1.0"),
            Attributes::application("acme", "widget", "2.3.1"),
            Attributes::application("acme", "widget", "5.5"),
        ];
        let hits = evaluator.matching_platforms(record(&records, "CVE-2020-1000"), &inventory);
        assert_eq!(hits, [&inventory[1], &inventory[2]]);
    }

    #[test]
    fn test_strict_preset_keeps_pinned_and_ranged_rules() {
        let records = load_records();
        let os = cpe("cpe:2.3:o:acme:acme_os:-:*:*:*:*:*:*:*");
        let app = cpe("cpe:2.3:a:acme:server:4.0:*:*:*:*:*:*:*");

        let strict = Evaluator::new(EvaluatorConfig::from_preset(ConfigPreset::Strict));
        // The OS rule pins a not-applicable version, so it still counts.
        assert!(strict.is_inventory_affected(record(&records, "CVE-2020-2000"), &[app, os]));
        // Ranged and pinned rules are unaffected by the preset.
        let widget = Attributes::application("acme", "widget", "5.5");
        assert!(strict.is_affected(record(&records, "CVE-2020-1000"), &widget));
    }

    #[test]
    fn test_records_are_shareable_between_threads() {
        let records = load_records();
        let evaluator = Evaluator::default();
        let platform = Attributes::application("acme", "widget", "2.3.1");

        let hits = std::thread::scope(|scope| {
            let handle = scope.spawn(|| evaluator.affected_by(&records, &platform));
            handle.join().expect("worker panicked")
        });
        assert_eq!(hits, ["CVE-2020-1000"]);
    }
}
