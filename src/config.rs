//! Run configuration
//!
//! Built from CLI flags in `main.rs`; every field has a default matching the
//! stock demo (namespace `default`, claims `pvc-0` to `pvc-5`, 1Gi each).

use crate::domain::manifest::{ClaimTemplate, ConsumerTemplate, IndexRange};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAMESPACE: &str = "default";

/// Binary and decimal SI suffixes of a Kubernetes quantity
const QUANTITY_SUFFIXES: &[&str] = &[
    "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "n", "u", "m", "k", "M", "G", "T", "P", "E",
];

/// Configuration for one sequencer run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Namespace for claims and the consumer
    pub namespace: String,
    /// Claim indices, inclusive
    pub range: IndexRange,
    pub claim: ClaimTemplate,
    pub consumer: ConsumerTemplate,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            range: IndexRange::default(),
            claim: ClaimTemplate::default(),
            consumer: ConsumerTemplate::default(),
        }
    }
}

impl SequencerConfig {
    /// Reject malformed input before any call is made: an empty namespace or
    /// image, a capacity that is not a quantity, or a negative capacity
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(Error::Configuration("namespace must not be empty".into()));
        }
        if !is_quantity(&self.claim.capacity) {
            return Err(Error::Configuration(format!(
                "invalid claim capacity: {:?}",
                self.claim.capacity
            )));
        }
        // storage requests must be non-negative
        if self.claim.capacity.starts_with('-') {
            return Err(Error::Configuration(format!(
                "claim capacity must not be negative: {:?}",
                self.claim.capacity
            )));
        }
        if self.consumer.image.trim().is_empty() {
            return Err(Error::Configuration("consumer image must not be empty".into()));
        }
        Ok(())
    }
}

/// Syntax check for a Kubernetes quantity.
///
/// Accepts `[+-]<number><suffix>` where the number is digits with an optional
/// decimal point and the suffix is empty, a binary or decimal SI suffix, or a
/// decimal exponent (`e3`, `E-2`). `1E` is exa, `1E3` is an exponent.
fn is_quantity(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let number_len = unsigned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(unsigned.len());
    let (number, suffix) = unsigned.split_at(number_len);

    let number_ok =
        number.matches('.').count() <= 1 && number.chars().any(|c| c.is_ascii_digit());
    if !number_ok {
        return false;
    }

    if suffix.is_empty() || QUANTITY_SUFFIXES.contains(&suffix) {
        return true;
    }

    suffix
        .strip_prefix(['e', 'E'])
        .map(|exp| exp.strip_prefix(['+', '-']).unwrap_or(exp))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
