//! UDI identifiers: the field-instance-array triple naming one documented column.

use std::fmt;
use std::str::FromStr;

/// A field-instance-array triple uniquely naming one documented column.
///
/// Keyed and displayed as `<field>-<instance>.<array>` (e.g. `31-0.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Udi {
    pub field: u32,
    pub instance: u32,
    pub array: u32,
}

impl Udi {
    pub fn new(field: u32, instance: u32, array: u32) -> Self {
        Self {
            field,
            instance,
            array,
        }
    }

    /// Parse a raw table header into a UDI.
    ///
    /// Accepts both header spellings found in exports: the dotted form
    /// `f.<field>.<instance>.<array>` and the dashed form
    /// `<field>-<instance>.<array>`. Returns `None` for anything else.
    pub fn parse_header(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Some(rest) = trimmed.strip_prefix("f.") {
            let mut parts = rest.split('.');
            let field = parse_component(parts.next()?)?;
            let instance = parse_component(parts.next()?)?;
            let array = parse_component(parts.next()?)?;
            if parts.next().is_some() {
                return None;
            }
            return Some(Self::new(field, instance, array));
        }
        trimmed.parse().ok()
    }

    /// The serialized key form, identical to `Display`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Udi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.{}", self.field, self.instance, self.array)
    }
}

/// Error returned when a string is not a valid dashed UDI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier `{raw}`: expected `<field>-<instance>.<array>`")]
pub struct ParseUdiError {
    pub raw: String,
}

impl FromStr for Udi {
    type Err = ParseUdiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseUdiError { raw: s.to_string() };
        let (field, rest) = s.split_once('-').ok_or_else(err)?;
        let (instance, array) = rest.split_once('.').ok_or_else(err)?;
        Ok(Self {
            field: parse_component(field).ok_or_else(err)?,
            instance: parse_component(instance).ok_or_else(err)?,
            array: parse_component(array).ok_or_else(err)?,
        })
    }
}

/// Parse one all-digits component; rejects signs, spaces, and empty input.
fn parse_component(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_dashed_form() {
        let udi: Udi = "31-0.0".parse().unwrap();
        assert_eq!(udi, Udi::new(31, 0, 0));
        assert_eq!(udi.to_string(), "31-0.0");
    }

    #[test]
    fn parses_both_header_forms() {
        assert_eq!(Udi::parse_header("3-1.2"), Some(Udi::new(3, 1, 2)));
        assert_eq!(Udi::parse_header("f.3.1.2"), Some(Udi::new(3, 1, 2)));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for raw in ["", "eid", "31-0", "31.0.0", "a-0.0", "31-0.0.1", "f.3.1", "f.3.1.2.4", "-1-0.0", " 31-0.0"] {
            assert!(raw.parse::<Udi>().is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn header_parse_trims_whitespace() {
        assert_eq!(Udi::parse_header(" 31-0.0 "), Some(Udi::new(31, 0, 0)));
        assert_eq!(Udi::parse_header("notes"), None);
    }

    proptest! {
        #[test]
        fn parse_recovers_exact_triple(field in 0u32..=1_000_000, instance in 0u32..=99, array in 0u32..=999) {
            let raw = format!("{field}-{instance}.{array}");
            let udi: Udi = raw.parse().unwrap();
            prop_assert_eq!(udi, Udi::new(field, instance, array));
            prop_assert_eq!(udi.to_string(), raw);
        }
    }
}
