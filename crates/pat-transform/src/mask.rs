//! Partial-reveal masking.
//!
//! Parameters: `reveal_prefix` (default 1), `reveal_suffix` (default 1),
//! `mask_char` (default `*`), `preserve_email_domain` (default false).

use pat_model::{TransformKind, TransformationRule, Value};

use crate::error::Result;
use crate::params;
use crate::transformer::{TransformContext, Transformer};

pub const DEFAULT_MASK_CHAR: char = '*';

/// Reveal settings for [`mask_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskOptions {
    pub reveal_prefix: usize,
    pub reveal_suffix: usize,
    pub mask_char: char,
    pub preserve_email_domain: bool,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            reveal_prefix: 1,
            reveal_suffix: 1,
            mask_char: DEFAULT_MASK_CHAR,
            preserve_email_domain: false,
        }
    }
}

impl MaskOptions {
    pub fn from_rule(rule: &TransformationRule) -> Result<Self> {
        params::reject_unknown(rule)?;
        Ok(Self {
            reveal_prefix: params::bounded(rule, "reveal_prefix", 1, 0, i64::MAX)?,
            reveal_suffix: params::bounded(rule, "reveal_suffix", 1, 0, i64::MAX)?,
            mask_char: params::single_char(rule, "mask_char", DEFAULT_MASK_CHAR)?,
            preserve_email_domain: params::flag(rule, "preserve_email_domain", false)?,
        })
    }
}

/// Mask `input` character by character.
///
/// The output always has as many characters as the input. When the reveal
/// counts cover the whole string nothing is revealed.
pub fn mask_text(input: &str, options: &MaskOptions) -> String {
    if options.preserve_email_domain
        && let Some((local, domain)) = input.rsplit_once('@')
    {
        return format!("{}@{domain}", mask_chars(local, options));
    }
    mask_chars(input, options)
}

fn mask_chars(input: &str, options: &MaskOptions) -> String {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let revealed = options.reveal_prefix.saturating_add(options.reveal_suffix);
    let (prefix, suffix) = if revealed >= len {
        (0, 0)
    } else {
        (options.reveal_prefix, options.reveal_suffix)
    };
    let alternate = alternate_mask_char(options.mask_char);

    chars
        .iter()
        .enumerate()
        .map(|(idx, &original)| {
            if idx < prefix || idx >= len - suffix {
                original
            } else if original == options.mask_char {
                alternate
            } else {
                options.mask_char
            }
        })
        .collect()
}

fn alternate_mask_char(mask_char: char) -> char {
    if mask_char == '#' { '*' } else { '#' }
}

pub struct MaskTransformer;

impl Transformer for MaskTransformer {
    fn kind(&self) -> TransformKind {
        TransformKind::Mask
    }

    fn transform(
        &self,
        input: &Value,
        rule: &TransformationRule,
        _ctx: &TransformContext<'_>,
    ) -> Result<Value> {
        let options = MaskOptions::from_rule(rule)?;
        Ok(Value::Text(mask_text(&input.render(), &options)))
    }
}
