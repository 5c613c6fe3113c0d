//! Property tests: tokenizer balance, selector determinism, translator totality.

use cy2pw_compiler::{classify, optimize_selector, tokenize_args, translate, ParsedCommand, Value};
use proptest::prelude::*;

/// One balanced argument fragment.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,4}",
        "[a-z][a-zA-Z0-9_]{0,8}",
        "'[a-z ,(){}\\[\\]]{0,10}'",
        "\"[a-z ,']{0,10}\"",
        "\\{[a-z]{1,3}: [0-9]{1,2}(, [a-z]{1,3}: '[a-z,]{0,4}')?\\}",
        "\\[[0-9]{1,2}(, [0-9]{1,2}){0,3}\\]",
        "\\([a-z](,[a-z])?\\) => [a-z]\\([a-z], [0-9]\\)",
    ]
}

fn command_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("get".to_string()),
        Just("contains".to_string()),
        Just("visit".to_string()),
        Just("wait".to_string()),
        Just("intercept".to_string()),
        Just("url".to_string()),
        Just("viewport".to_string()),
        "[a-z][a-zA-Z]{0,10}",
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1000i32..1000).prop_map(|n| Value::Number(f64::from(n))),
        "\\PC{0,20}".prop_map(Value::String),
        "[a-z.]{1,12}".prop_map(Value::raw),
    ]
}

fn chain_method() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("click".to_string()),
        Just("type".to_string()),
        Just("should".to_string()),
        Just("and".to_string()),
        Just("first".to_string()),
        Just("find".to_string()),
        Just("as".to_string()),
        "[a-z]{1,8}",
    ]
}

proptest! {
    #[test]
    fn tokenizer_splits_on_top_level_commas(fragments in prop::collection::vec(fragment(), 1..6)) {
        let joined = fragments.join(", ");
        let tokens = tokenize_args(&joined);
        prop_assert_eq!(tokens, fragments);
    }

    #[test]
    fn selector_optimization_is_deterministic(selector in "\\PC{0,40}") {
        prop_assert_eq!(optimize_selector(&selector), optimize_selector(&selector));
    }

    #[test]
    fn translate_is_total(
        name in command_name(),
        args in prop::collection::vec(value(), 0..4),
        chain in prop::collection::vec((chain_method(), prop::collection::vec(value(), 0..3)), 0..4),
    ) {
        let mut command = ParsedCommand::new(name, args);
        for (method, args) in chain {
            command = command.chain(method, args);
        }
        let result = translate(&command);
        prop_assert_eq!(&result.imports[0], "import { test, expect } from '@playwright/test';");
        if result.has_todo() {
            prop_assert!(!result.diagnostics.is_empty());
        }
    }

    #[test]
    fn classify_is_total(raw in "\\PC{0,60}") {
        let result = classify(&raw);
        if result.is_failure() {
            prop_assert!(result.generated_code.starts_with("// TODO"));
        }
    }
}
