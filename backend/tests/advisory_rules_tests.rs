//! Advisory rule engine tests
//!
//! Exercises the shipped rule table through the public `shared` API:
//! - Known weather scenarios and their advisories
//! - Ordering by severity, category and rule id
//! - Deduplication and determinism for arbitrary observations

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    advisory_order, default_rules, AdvisoryCategory, AdvisoryItem, AdvisoryRule, RuleSet,
    Severity, WeatherObservation,
};
use std::collections::HashSet;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 15, 6, 30, 0).unwrap()
}

fn observation(district: &str, temp: &str, humidity: &str, rain: &str, wind: &str) -> WeatherObservation {
    WeatherObservation {
        district: district.to_string(),
        temperature_c: dec(temp),
        humidity_pct: dec(humidity),
        rainfall_mm: dec(rain),
        wind_speed_kph: dec(wind),
        observed_at: generated_at(),
    }
}

fn rule_ids(items: &[AdvisoryItem]) -> Vec<&str> {
    items.iter().map(|item| item.rule_id.as_str()).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Hot, dry district gets an irrigation warning first
    #[test]
    fn test_drought_scenario() {
        let obs = observation("kalaburagi", "38", "20", "0", "5");
        let items = default_rules().evaluate_at(&obs, generated_at());

        assert_eq!(rule_ids(&items), vec!["drought-irrigation", "dry-harvest-window"]);
        assert_eq!(items[0].category, AdvisoryCategory::Irrigation);
        assert_eq!(items[0].severity, Severity::Warning);
        assert!(items[0].message.contains("kalaburagi"));
        assert!(items[0].message.contains("38"));
    }

    /// Humid, very wet district gets pest and harvest advice ahead of the irrigation note
    #[test]
    fn test_monsoon_scenario() {
        let obs = observation("udupi", "24", "95", "150", "5");
        let items = default_rules().evaluate_at(&obs, generated_at());

        assert_eq!(
            rule_ids(&items),
            vec!["fungal-disease-pressure", "harvest-rain-delay", "heavy-rain-irrigation-pause"]
        );
        assert_eq!(items[0].severity, Severity::Advisory);
        assert_eq!(items[1].severity, Severity::Advisory);
        assert_eq!(items[2].severity, Severity::Info);
    }

    /// Mild weather produces no advisories at all
    #[test]
    fn test_mild_weather_is_empty() {
        let obs = observation("mysuru", "28", "60", "5", "5");
        assert!(default_rules().evaluate_at(&obs, generated_at()).is_empty());
    }

    /// Equal severity and category fall back to rule id order
    #[test]
    fn test_critical_tie_broken_by_rule_id() {
        let obs = observation("raichur", "43", "50", "250", "5");
        let items = default_rules().evaluate_at(&obs, generated_at());

        assert_eq!(rule_ids(&items)[..2], ["extreme-heat", "flood-risk"]);
        assert!(items[..2].iter().all(|i| i.severity == Severity::Critical));
    }

    /// Strong wind outranks the informational spray note
    #[test]
    fn test_high_wind_scenario() {
        let obs = observation("chitradurga", "30", "50", "0", "45");
        let items = default_rules().evaluate_at(&obs, generated_at());

        assert_eq!(items[0].rule_id, "high-wind-harvest");
        assert_eq!(items[0].severity, Severity::Warning);
        assert!(!rule_ids(&items).contains(&"spray-drift-wind"));
    }

    /// Frost boundary is inclusive
    #[test]
    fn test_frost_boundary() {
        let at_limit = observation("chikkamagaluru", "2", "70", "0", "5");
        let above = observation("chikkamagaluru", "2.1", "70", "0", "5");

        assert!(rule_ids(&default_rules().evaluate_at(&at_limit, generated_at())).contains(&"frost-risk"));
        assert!(!rule_ids(&default_rules().evaluate_at(&above, generated_at())).contains(&"frost-risk"));
    }

    /// A custom table is evaluated the same way as the shipped one
    #[test]
    fn test_custom_rule_set() {
        fn always(_: &WeatherObservation) -> bool {
            true
        }

        let rules = RuleSet::new(
            "custom-1",
            vec![
                AdvisoryRule::new("b-note", AdvisoryCategory::General, Severity::Info, always, "Note for {district}"),
                AdvisoryRule::new("a-note", AdvisoryCategory::General, Severity::Info, always, "Other note"),
                AdvisoryRule::new("alarm", AdvisoryCategory::General, Severity::Critical, always, "{temperature_c}°C"),
            ],
        )
        .unwrap();

        let obs = observation("hassan", "21.55", "60", "0", "0");
        let items = rules.evaluate_at(&obs, generated_at());

        assert_eq!(rule_ids(&items), vec!["alarm", "a-note", "b-note"]);
        assert_eq!(items[0].message, "21.6°C");
        assert_eq!(items[2].message, "Note for hassan");
        assert_eq!(rules.version(), "custom-1");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn tenths(range: std::ops::Range<i64>) -> impl Strategy<Value = Decimal> {
        range.prop_map(|v| Decimal::new(v, 1))
    }

    fn arb_observation() -> impl Strategy<Value = WeatherObservation> {
        (
            prop::sample::select(vec!["mysuru", "udupi", "kalaburagi", "belagavi"]),
            tenths(-100..500),
            tenths(0..1001),
            tenths(0..3000),
            tenths(0..800),
        )
            .prop_map(|(district, temp, humidity, rain, wind)| WeatherObservation {
                district: district.to_string(),
                temperature_c: temp,
                humidity_pct: humidity,
                rainfall_mm: rain,
                wind_speed_kph: wind,
                observed_at: generated_at(),
            })
    }

    proptest! {
        /// The same observation and timestamp always give the same list
        #[test]
        fn prop_evaluation_is_deterministic(obs in arb_observation()) {
            let rules = default_rules();
            prop_assert_eq!(
                rules.evaluate_at(&obs, generated_at()),
                rules.evaluate_at(&obs, generated_at())
            );
        }

        /// Output respects the advisory total order
        #[test]
        fn prop_items_are_sorted(obs in arb_observation()) {
            let items = default_rules().evaluate_at(&obs, generated_at());

            for pair in items.windows(2) {
                prop_assert!(pair[0].severity >= pair[1].severity);
                prop_assert_ne!(advisory_order(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
            }
        }

        /// No rule fires twice
        #[test]
        fn prop_rule_ids_are_unique(obs in arb_observation()) {
            let items = default_rules().evaluate_at(&obs, generated_at());
            let ids: HashSet<&str> = items.iter().map(|i| i.rule_id.as_str()).collect();
            prop_assert_eq!(ids.len(), items.len());
        }

        /// Irrigation advice never contradicts itself
        #[test]
        fn prop_single_irrigation_advisory(obs in arb_observation()) {
            let items = default_rules().evaluate_at(&obs, generated_at());
            let irrigation = items
                .iter()
                .filter(|i| i.category == AdvisoryCategory::Irrigation)
                .count();
            prop_assert!(irrigation <= 1);
        }

        /// Items carry the observation's district and timestamp with fully rendered text
        #[test]
        fn prop_items_are_stamped_and_rendered(obs in arb_observation()) {
            for item in default_rules().evaluate_at(&obs, generated_at()) {
                prop_assert_eq!(&item.district, &obs.district);
                prop_assert_eq!(item.generated_at, generated_at());
                prop_assert!(
                    !item.message.contains('{'),
                    "unrendered placeholder in {}",
                    item.rule_id
                );
                prop_assert!(item.translated_message.is_none());
                prop_assert!(!item.translation_degraded);
            }
        }
    }
}
