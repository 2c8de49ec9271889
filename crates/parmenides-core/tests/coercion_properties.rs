//! Property tests for coercion and validation.
//!
//! These cover the invariants the declaration entry point relies on:
//! integer literals round-trip, coercion is idempotent, boolean spellings
//! map consistently, and ordering constraints ignore absent values.

use parmenides_core::{
    coerce, validate, ConstraintKind, EngineSettings, ParamOptions, ParamValue, TargetType,
};
use proptest::prelude::*;

fn run(raw: &ParamValue, target: TargetType) -> Result<Option<ParamValue>, parmenides_core::ParamError> {
    coerce(Some(raw), target, &ParamOptions::new(), &EngineSettings::default())
}

// Strategy: text with at least one letter, so it can never be an integer literal
fn arb_non_numeric() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9]{0,3}[g-nG-N][a-zA-Z0-9 ]{0,8}").unwrap()
}

fn arb_target() -> impl Strategy<Value = TargetType> {
    prop_oneof![
        Just(TargetType::Integer),
        Just(TargetType::Float),
        Just(TargetType::String),
        Just(TargetType::Date),
        Just(TargetType::Array),
        Just(TargetType::Hash),
        Just(TargetType::Boolean),
    ]
}

proptest! {
    /// Property: every integer literal coerces to its numeric value
    #[test]
    fn proptest_integer_literals_round_trip(n in any::<i64>()) {
        let raw = ParamValue::from(n.to_string());
        prop_assert_eq!(run(&raw, TargetType::Integer).unwrap(), Some(ParamValue::Integer(n)));
    }

    /// Property: non-numeric text fails integer coercion with kind `is`
    #[test]
    fn proptest_non_numeric_text_is_rejected(text in arb_non_numeric()) {
        let raw = ParamValue::from(text);
        let err = run(&raw, TargetType::Integer).unwrap_err();
        prop_assert_eq!(err.kind(), ConstraintKind::Is);
    }

    /// Property: coercing an already-coerced value returns it unchanged
    #[test]
    fn proptest_coercion_is_idempotent(
        text in "[a-z0-9:,]{0,12}",
        target in arb_target(),
    ) {
        let raw = ParamValue::from(text);
        if let Ok(Some(first)) = run(&raw, target) {
            prop_assert_eq!(run(&first, target).unwrap(), Some(first));
        }
    }

    /// Property: boolean spellings map to the same flag in any case
    #[test]
    fn proptest_boolean_spellings(
        index in 0usize..5,
        truthy in any::<bool>(),
        upper in any::<bool>(),
    ) {
        let spellings = if truthy {
            ["true", "t", "yes", "y", "1"]
        } else {
            ["false", "f", "no", "n", "0"]
        };
        let spelling = if upper {
            spellings[index].to_uppercase()
        } else {
            spellings[index].to_string()
        };

        let raw = ParamValue::from(spelling);
        prop_assert_eq!(run(&raw, TargetType::Boolean).unwrap(), Some(ParamValue::Boolean(truthy)));
    }

    /// Property: ordering and length constraints never fail on absent values
    #[test]
    fn proptest_absent_satisfies_bounds(min in any::<i64>(), max in any::<i64>(), len in 0usize..64) {
        let options = ParamOptions::new()
            .min(min)
            .max(max)
            .min_length(len)
            .max_length(len)
            .within(min..=max);
        prop_assert!(validate(None, &options).is_ok());
    }

    /// Property: `required` never fails on a present value
    #[test]
    fn proptest_required_accepts_present(flag in any::<bool>(), n in any::<i64>()) {
        let options = ParamOptions::new().required();
        prop_assert!(validate(Some(&ParamValue::Boolean(flag)), &options).is_ok());
        prop_assert!(validate(Some(&ParamValue::Integer(n)), &options).is_ok());
        prop_assert!(validate(None, &options).is_err());
    }
}
