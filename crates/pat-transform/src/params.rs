//! Typed access to rule parameters with defaults.

use pat_model::{ParamValue, TransformationRule};

use crate::error::{Result, TransformError};

/// Fail on the first parameter the rule's kind does not read.
pub(crate) fn reject_unknown(rule: &TransformationRule) -> Result<()> {
    match rule.unknown_params().next() {
        Some(name) => Err(TransformError::invalid(rule.kind, name, "unknown parameter")),
        None => Ok(()),
    }
}

pub(crate) fn int(rule: &TransformationRule, name: &str, default: i64) -> Result<i64> {
    match rule.param(name) {
        None => Ok(default),
        Some(value) => value.as_int().ok_or_else(|| {
            TransformError::invalid(rule.kind, name, format!("expected an integer, got `{value}`"))
        }),
    }
}

/// Integer parameter constrained to `min..=max`.
pub(crate) fn bounded(
    rule: &TransformationRule,
    name: &str,
    default: i64,
    min: i64,
    max: i64,
) -> Result<usize> {
    let value = int(rule, name, default)?;
    if !(min..=max).contains(&value) {
        return Err(TransformError::invalid(
            rule.kind,
            name,
            format!("{value} is outside {min}..={max}"),
        ));
    }
    usize::try_from(value)
        .map_err(|_| TransformError::invalid(rule.kind, name, format!("{value} is negative")))
}

pub(crate) fn flag(rule: &TransformationRule, name: &str, default: bool) -> Result<bool> {
    match rule.param(name) {
        None => Ok(default),
        Some(value) => value.as_bool().ok_or_else(|| {
            TransformError::invalid(rule.kind, name, format!("expected a boolean, got `{value}`"))
        }),
    }
}

/// Text parameter; integers and booleans are accepted in their display form.
pub(crate) fn text(rule: &TransformationRule, name: &str, default: &str) -> String {
    match rule.param(name) {
        None => default.to_string(),
        Some(ParamValue::Text(value)) => value.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn single_char(rule: &TransformationRule, name: &str, default: char) -> Result<char> {
    let Some(value) = rule.param(name) else {
        return Ok(default);
    };
    let raw = value.to_string();
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TransformError::invalid(
            rule.kind,
            name,
            format!("expected a single character, got `{raw}`"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pat_model::TransformKind;

    #[test]
    fn defaults_apply_when_missing() {
        let rule = TransformationRule::new(TransformKind::Mask);
        assert_eq!(int(&rule, "reveal_prefix", 1).unwrap(), 1);
        assert!(!flag(&rule, "preserve_email_domain", false).unwrap());
        assert_eq!(single_char(&rule, "mask_char", '*').unwrap(), '*');
    }

    #[test]
    fn malformed_values_are_rejected() {
        let rule = TransformationRule::new(TransformKind::Mask)
            .with_param("reveal_prefix", "lots")
            .with_param("mask_char", "##");
        assert!(matches!(
            int(&rule, "reveal_prefix", 1),
            Err(TransformError::InvalidParameter { .. })
        ));
        assert!(single_char(&rule, "mask_char", '*').is_err());
    }

    #[test]
    fn unknown_names_are_rejected() {
        let rule = TransformationRule::tokenize(16).with_param("token_lenght", 8);
        assert!(matches!(
            reject_unknown(&rule),
            Err(TransformError::InvalidParameter { ref param, .. }) if param == "token_lenght"
        ));
        assert!(reject_unknown(&TransformationRule::tokenize(16).with_param("key", "audit")).is_ok());
    }

    #[test]
    fn bounded_checks_range() {
        let rule = TransformationRule::tokenize(65);
        assert!(bounded(&rule, "token_length", 16, 1, 64).is_err());
        let rule = TransformationRule::tokenize(8);
        assert_eq!(bounded(&rule, "token_length", 16, 1, 64).unwrap(), 8);
    }
}
