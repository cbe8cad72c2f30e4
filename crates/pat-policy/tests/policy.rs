//! Policy registration and lookup through the public API.

use std::collections::BTreeMap;

use pat_model::{ParamValue, SensitivityClass, TransformKind, TransformationRule, ValidationError};
use pat_policy::{PolicyEngine, PolicyError, REPORTING};

#[test]
fn default_matrix() {
    let engine = PolicyEngine::with_defaults();
    insta::assert_snapshot!(engine.render_matrix().trim_end(), @r"
    external_partner: PII=hash(algorithm=sha256) PHI=hash(algorithm=sha256) Sensitive=mask(reveal_prefix=0;reveal_suffix=0) Non-Sensitive=keep
    internal_analyst: PII=tokenize(token_length=16) PHI=tokenize(token_length=16) Sensitive=mask(reveal_prefix=1;reveal_suffix=1) Non-Sensitive=keep
    public: PII=hash(algorithm=sha512) PHI=hash(algorithm=sha512) Sensitive=mask(reveal_prefix=0;reveal_suffix=0) Non-Sensitive=keep
    reporting: PII=mask(reveal_prefix=0;reveal_suffix=0) PHI=mask(reveal_prefix=0;reveal_suffix=0) Sensitive=mask(reveal_prefix=1;reveal_suffix=1) Non-Sensitive=keep
    ");
}

#[test]
fn every_registered_consumer_is_complete() {
    let text = r#"
[policies.auditor]
description = "Internal audit exports"

[policies.auditor.rules.PII]
kind = "hash"
algorithm = "sha512"
salt = "audit"

[policies.auditor.rules.PHI]
kind = "hash"
algorithm = "sha512"

[policies.auditor.rules.sensitive]
kind = "mask"
reveal_prefix = 2
reveal_suffix = 0

[policies.auditor.rules.Non-Sensitive]
kind = "keep"
"#;
    let engine = PolicyEngine::from_toml_str(text).expect("parse policies");
    let consumers: Vec<&str> = engine.consumer_types().collect();
    assert_eq!(
        consumers,
        vec!["auditor", "external_partner", "internal_analyst", "public", "reporting"]
    );
    for consumer in consumers {
        for class in SensitivityClass::ALL {
            engine
                .get_rule(class, consumer)
                .unwrap_or_else(|err| panic!("{consumer}/{class}: {err}"));
        }
    }

    let rule = engine
        .get_rule(SensitivityClass::Pii, "auditor")
        .expect("auditor PII rule");
    assert_eq!(rule.kind, TransformKind::Hash);
    assert_eq!(rule.param("salt"), Some(&ParamValue::Text("audit".to_string())));
}

#[test]
fn incomplete_toml_policy_is_rejected_without_side_effects() {
    let text = r#"
[policies.auditor.rules.PII]
kind = "keep"
"#;
    let err = PolicyEngine::from_toml_str(text).expect_err("incomplete policy");
    match err {
        PolicyError::Incomplete {
            consumer_type,
            missing,
        } => {
            assert_eq!(consumer_type, "auditor");
            assert_eq!(missing.len(), 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_kind_is_rejected() {
    let text = r#"
[policies.auditor.rules.PII]
kind = "encrypt"
"#;
    assert!(matches!(
        PolicyEngine::from_toml_str(text),
        Err(PolicyError::Validation { .. })
    ));
}

#[test]
fn misspelled_parameter_is_rejected() {
    let text = r#"
[policies.auditor.rules.PII]
kind = "mask"
reveal_prefx = 2

[policies.auditor.rules.PHI]
kind = "keep"

[policies.auditor.rules.Sensitive]
kind = "keep"

[policies.auditor.rules.Non-Sensitive]
kind = "keep"
"#;
    let err = PolicyEngine::from_toml_str(text).expect_err("typo in parameter");
    assert_eq!(
        err.to_string(),
        "policy `auditor`: unknown parameter `reveal_prefx` for mask rule"
    );

    let mut rules: BTreeMap<_, _> = SensitivityClass::ALL
        .iter()
        .map(|class| (*class, TransformationRule::keep()))
        .collect();
    rules.insert(
        SensitivityClass::Pii,
        TransformationRule::hash("sha256").with_param("pepper", "x"),
    );
    let err = PolicyEngine::new()
        .register_policy("auditor", rules)
        .expect_err("unknown hash parameter");
    assert!(matches!(
        err,
        PolicyError::Validation {
            source: ValidationError::UnknownParameter { kind: TransformKind::Hash, ref param },
            ..
        } if param == "pepper"
    ));
}

#[test]
fn malformed_toml_is_reported() {
    assert!(matches!(
        PolicyEngine::from_toml_str("[policies.auditor"),
        Err(PolicyError::Toml(_))
    ));
}

#[test]
fn missing_class_error_names_it() {
    let err = PolicyError::NotFound {
        consumer_type: REPORTING.to_string(),
        sensitivity: Some(SensitivityClass::Phi),
    };
    assert_eq!(err.to_string(), "policy `reporting` has no rule for PHI");

    let mut engine = PolicyEngine::new();
    let rules: BTreeMap<_, _> = SensitivityClass::ALL
        .iter()
        .map(|class| (*class, TransformationRule::mask(0, 0)))
        .collect();
    engine.register_policy(REPORTING, rules).expect("register");
    assert!(engine.get_rule(SensitivityClass::Phi, REPORTING).is_ok());
    assert!(engine.get_rule(SensitivityClass::Phi, "public").is_err());
}
