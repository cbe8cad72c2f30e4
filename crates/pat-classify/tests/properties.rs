use pat_classify::SensitivityClassifier;
use pat_model::{ColumnMetadata, DataType, SensitivityClass};
use proptest::prelude::*;

fn arb_marker() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("email"), Just("ssn"), Just("phone")]
}

fn arb_qualifier() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("customer"),
        Just("primary"),
        Just("work"),
        Just("user"),
        Just("billing"),
    ]
}

fn arb_description() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just("captured at signup"),
        Just("reference value"),
        Just("as provided by the customer"),
    ]
}

#[derive(Debug, Clone, Copy)]
enum NameStyle {
    Snake,
    RunTogether,
    Camel,
    ScreamingSnake,
}

fn arb_style() -> impl Strategy<Value = NameStyle> {
    prop_oneof![
        Just(NameStyle::Snake),
        Just(NameStyle::RunTogether),
        Just(NameStyle::Camel),
        Just(NameStyle::ScreamingSnake),
    ]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn column_name(first: &str, second: &str, style: NameStyle) -> String {
    match style {
        NameStyle::Snake => format!("{first}_{second}"),
        NameStyle::RunTogether => format!("{first}{second}"),
        NameStyle::Camel => format!("{first}{}", capitalize(second)),
        NameStyle::ScreamingSnake => format!("{first}_{second}").to_uppercase(),
    }
}

proptest! {
    #[test]
    fn pii_markers_classify_as_pii(
        marker in arb_marker(),
        qualifier in arb_qualifier(),
        description in arb_description(),
        marker_first in any::<bool>(),
        style in arb_style(),
    ) {
        let name = if marker_first {
            column_name(marker, qualifier, style)
        } else {
            column_name(qualifier, marker, style)
        };
        let column = ColumnMetadata::new(name, DataType::String).with_description(description);
        let classifier = SensitivityClassifier::rule_only().unwrap();
        let result = classifier.classify(&column).unwrap();

        prop_assert_eq!(result.class, SensitivityClass::Pii);
        prop_assert!(result.confidence >= 0.7);
        prop_assert!(result.confidence <= 1.0);
    }

    #[test]
    fn confidence_always_in_unit_range(name in "[a-z]{1,8}(_[a-z]{1,8}){0,2}") {
        let column = ColumnMetadata::new(name, DataType::String);
        let classifier = SensitivityClassifier::rule_only().unwrap();
        let result = classifier.classify(&column).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }
}
