use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide overlay counter. Ids are handed out once and never reused.
static COUNTER: AtomicU64 = AtomicU64::new(1);

const PREFIX: &str = "overlay-";

/// A lightweight identifier for overlays in the scene store.
/// 8 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Allocate a fresh id. Stable for the overlay's lifetime.
    pub fn next() -> Self {
        OverlayId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Parse the display form (`overlay-12`) or a bare number (`12`).
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix(PREFIX).unwrap_or(s);
        digits.parse().ok().map(OverlayId)
    }
}

impl fmt::Debug for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0)
    }
}

impl Serialize for OverlayId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OverlayId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        OverlayId::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid overlay id {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = OverlayId::next();
        let b = OverlayId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn display_parse_roundtrip() {
        let id = OverlayId::next();
        assert_eq!(OverlayId::parse(&id.to_string()), Some(id));
        assert_eq!(OverlayId::parse(&id.get().to_string()), Some(id));
        assert_eq!(OverlayId::parse("overlay-x"), None);
    }

    #[test]
    fn serializes_as_display_string() {
        let id = OverlayId::next();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: OverlayId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
