//! Engine availability.
//!
//! Probing is advisory: it pushes a one-qubit circuit through each engine's
//! translate path and records whether that worked. A snapshot is a separate
//! value; the registry it came from is never modified.

use serde::{Deserialize, Serialize};

/// Availability of one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Whether the engine accepted the probe circuit.
    pub available: bool,
    /// Why the engine is unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Availability {
    /// Engine is usable.
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    /// Engine is not usable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
        }
    }
}

/// Availability of every registered engine, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    entries: Vec<(String, Availability)>,
}

impl AvailabilitySnapshot {
    pub(crate) fn push(&mut self, engine: impl Into<String>, availability: Availability) {
        self.entries.push((engine.into(), availability));
    }

    /// Availability of `engine`, if it was probed.
    pub fn get(&self, engine: &str) -> Option<&Availability> {
        self.entries
            .iter()
            .find(|(name, _)| name == engine)
            .map(|(_, a)| a)
    }

    /// Whether `engine` was probed and found available.
    pub fn is_available(&self, engine: &str) -> bool {
        self.get(engine).is_some_and(|a| a.available)
    }

    /// Ids of available engines, in registration order.
    pub fn available(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, a)| a.available)
            .map(|(name, _)| name.as_str())
    }

    /// All probed entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Availability)> {
        self.entries.iter().map(|(name, a)| (name.as_str(), a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookup() {
        let mut snapshot = AvailabilitySnapshot::default();
        snapshot.push("sim", Availability::available());
        snapshot.push("gpu", Availability::unavailable("no device"));

        assert!(snapshot.is_available("sim"));
        assert!(!snapshot.is_available("gpu"));
        assert!(!snapshot.is_available("missing"));
        assert_eq!(snapshot.available().collect::<Vec<_>>(), vec!["sim"]);
        assert_eq!(
            snapshot.get("gpu").and_then(|a| a.reason.as_deref()),
            Some("no device")
        );
    }
}
