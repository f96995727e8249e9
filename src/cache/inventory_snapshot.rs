use crate::models::InventoryItem;
use crate::storage::{load_json_from_storage, save_json_to_storage, INVENTORY_SNAPSHOT_KEY};
use serde::{Deserialize, Serialize};

/// Last confirmed copy of the collection, painted before the first live read.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct InventorySnapshot {
    pub saved_ms: i64,
    pub uid: String,
    pub items: Vec<InventoryItem>,
}

impl InventorySnapshot {
    /// A snapshot written under another account is never shown.
    pub fn belongs_to(&self, uid: &str) -> bool {
        !uid.trim().is_empty() && self.uid == uid
    }
}

pub(crate) fn save_inventory_snapshot(uid: &str, items: &[InventoryItem], saved_ms: i64) {
    if uid.trim().is_empty() {
        return;
    }

    let snap = InventorySnapshot {
        saved_ms,
        uid: uid.to_string(),
        items: items.to_vec(),
    };

    save_json_to_storage(INVENTORY_SNAPSHOT_KEY, &snap);
}

pub(crate) fn load_inventory_snapshot(uid: &str) -> Option<InventorySnapshot> {
    load_json_from_storage::<InventorySnapshot>(INVENTORY_SNAPSHOT_KEY)
        .filter(|snap| snap.belongs_to(uid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_owner_check() {
        let snap = InventorySnapshot {
            saved_ms: 1,
            uid: "uid-1".to_string(),
            items: vec![],
        };
        assert!(snap.belongs_to("uid-1"));
        assert!(!snap.belongs_to("uid-2"));
        assert!(!snap.belongs_to(" "));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = r#"{"saved_ms":5,"uid":"u","items":[]}"#;
        let snap: InventorySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.saved_ms, 5);
        assert!(snap.items.is_empty());
    }
}
