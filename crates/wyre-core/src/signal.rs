//! The tri-state signal value carried by connectors.

use std::fmt;

/// A boolean signal with an explicit "no driver" state.
///
/// Connectors start out `Unset` and return to `Unset` on circuit reset
/// or when their driving gate is deleted. For evaluation purposes an
/// `Unset` input reads as logical false ([`as_bool()`](Signal::as_bool)),
/// but the distinction is preserved so a host UI can render undriven
/// wires differently from driven-low ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Signal {
    /// No value has been driven onto the connector.
    #[default]
    Unset,
    /// Driven logical false.
    Low,
    /// Driven logical true.
    High,
}

impl Signal {
    /// Coerce to a plain boolean. `Unset` reads as false.
    pub fn as_bool(self) -> bool {
        matches!(self, Self::High)
    }

    /// Lift a boolean into a driven signal.
    pub fn from_bool(v: bool) -> Self {
        if v {
            Self::High
        } else {
            Self::Low
        }
    }

    /// Whether the connector is actually driven (`Low` or `High`).
    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl From<bool> for Signal {
    fn from(v: bool) -> Self {
        Self::from_bool(v)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_reads_as_false() {
        assert!(!Signal::Unset.as_bool());
        assert!(!Signal::Low.as_bool());
        assert!(Signal::High.as_bool());
    }

    #[test]
    fn unset_is_distinguishable_from_low() {
        assert_ne!(Signal::Unset, Signal::Low);
        assert!(!Signal::Unset.is_set());
        assert!(Signal::Low.is_set());
    }

    #[test]
    fn bool_round_trip() {
        assert_eq!(Signal::from_bool(true), Signal::High);
        assert_eq!(Signal::from_bool(false), Signal::Low);
        assert_eq!(Signal::from(true).as_bool(), true);
    }

    #[test]
    fn default_is_unset() {
        assert_eq!(Signal::default(), Signal::Unset);
    }
}
