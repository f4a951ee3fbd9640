use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Catalog row identifier, as assigned by the backend.
///
/// Opaque: the PostgREST backend hands out UUIDs, the in-memory store
/// uses sequential strings.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_display() {
        let id = ItemId::from("8d1c".to_string());
        assert_eq!(id.to_string(), "8d1c");
        assert_eq!(id.as_str(), "8d1c");
    }

    #[test]
    fn item_id_serde_transparent() {
        let id = ItemId::from("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let parsed: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn item_id_into_string() {
        let id = ItemId::from("xyz");
        let s: String = id.into();
        assert_eq!(s, "xyz");
    }
}
