use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::RejectionReason;

const MIN_DIGITS: usize = 12;
const MAX_DIGITS: usize = 15;

/// Canonicalization settings for raw recipient input.
#[derive(Debug, Clone)]
pub struct RecipientDefaults {
    /// Country prefix prepended when the bare digits do not already carry it.
    pub country_prefix: String,
    /// Transport suffix appended to the canonical form, e.g. `@c.us`.
    pub suffix: String,
}

impl Default for RecipientDefaults {
    fn default() -> Self {
        Self {
            country_prefix: "91".to_string(),
            suffix: "@c.us".to_string(),
        }
    }
}

/// Canonical transport-addressable recipient: `<12-15 digits><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jid(String);

impl Jid {
    /// Canonicalize a raw user-written identifier.
    ///
    /// Users write numbers with or without a leading `+`, country prefix or
    /// transport suffix; all of those collapse onto the same canonical form.
    /// Already-canonical input passes through unchanged.
    pub fn normalize(raw: &str, defaults: &RecipientDefaults) -> Result<Jid, RejectionReason> {
        let bare = raw.trim();
        let bare = bare.split('@').next().unwrap_or(bare);
        let bare = bare.trim().trim_start_matches('+');

        if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_digit()) {
            return Err(RejectionReason::InvalidFormat);
        }

        let digits = if bare.starts_with(&defaults.country_prefix) {
            bare.to_string()
        } else {
            format!("{}{}", defaults.country_prefix, bare)
        };

        if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
            return Err(RejectionReason::InvalidFormat);
        }

        Ok(Jid(format!("{}{}", digits, defaults.suffix)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RecipientDefaults {
        RecipientDefaults::default()
    }

    #[test]
    fn prepends_country_prefix_to_bare_number() {
        let jid = Jid::normalize("9876543210", &defaults()).unwrap();
        assert_eq!(jid.as_str(), "919876543210@c.us");
    }

    #[test]
    fn does_not_double_prepend_prefix() {
        let jid = Jid::normalize("919876543210", &defaults()).unwrap();
        assert_eq!(jid.as_str(), "919876543210@c.us");
    }

    #[test]
    fn strips_plus_and_foreign_suffix() {
        let jid = Jid::normalize("+919876543210@x", &defaults()).unwrap();
        assert_eq!(jid.as_str(), "919876543210@c.us");
    }

    #[test]
    fn equivalent_spellings_collapse_to_one_canonical_form() {
        let a = Jid::normalize("9876543210", &defaults()).unwrap();
        let b = Jid::normalize("+919876543210@x", &defaults()).unwrap();
        let c = Jid::normalize(" 919876543210@c.us ", &defaults()).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = Jid::normalize("9876543210", &defaults()).unwrap();
        let twice = Jid::normalize(once.as_str(), &defaults()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(
            Jid::normalize("123", &defaults()),
            Err(RejectionReason::InvalidFormat)
        );
    }

    #[test]
    fn rejects_overlong_input() {
        assert_eq!(
            Jid::normalize("9999999999999999", &defaults()),
            Err(RejectionReason::InvalidFormat)
        );
    }

    #[test]
    fn rejects_non_digit_input() {
        assert_eq!(
            Jid::normalize("98765abc43210", &defaults()),
            Err(RejectionReason::InvalidFormat)
        );
        assert_eq!(
            Jid::normalize("", &defaults()),
            Err(RejectionReason::InvalidFormat)
        );
    }
}
