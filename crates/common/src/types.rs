use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a generated point cloud.
///
/// Every regeneration produces a new id, so a stale id can never refer to the
/// cloud that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CloudId(pub Uuid);

impl CloudId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and panels.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for CloudId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CloudId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_id_uniqueness() {
        let a = CloudId::new();
        let b = CloudId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn short_id_is_eight_chars() {
        let id = CloudId::new();
        assert_eq!(id.short().len(), 8);
        assert_eq!(format!("{id}"), id.short());
    }
}
