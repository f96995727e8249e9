use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// One document of the `inventory` collection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,

    /// Absent when the stored value could not be read as a calendar date.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,

    /// Server time of creation; missing on legacy documents.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn draft(&self) -> ItemDraft {
        ItemDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            quantity: self.quantity,
            expiry_date: self.expiry_date,
        }
    }

    /// Overwrite the editable fields, keeping id and timestamps.
    pub fn apply_draft(&mut self, draft: &ItemDraft) {
        self.name = draft.name.clone();
        self.category = draft.category.clone();
        self.quantity = draft.quantity;
        self.expiry_date = draft.expiry_date;
    }

    pub fn from_draft(id: &str, draft: &ItemDraft) -> Self {
        Self {
            id: id.to_string(),
            name: draft.name.clone(),
            category: draft.category.clone(),
            quantity: draft.quantity,
            expiry_date: draft.expiry_date,
            created_at: None,
            updated_at: None,
        }
    }
}

/// The user-editable part of an item.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ItemDraft {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
        }
    }
}

/// Stored under `users/{uid}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// A signed-in identity. Persisted in localStorage so reloads stay signed in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at_ms: i64,
}

impl Session {
    /// Tokens are refreshed a minute early so in-flight requests do not race expiry.
    pub fn needs_refresh(&self, now_ms: i64) -> bool {
        now_ms + 60_000 >= self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_string_forms() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::from_str("staff").unwrap(), Role::Staff);
        assert!(Role::from_str("viewer").is_err());
        let v = serde_json::to_value(Role::Staff).unwrap();
        assert_eq!(v, "staff");
    }

    #[test]
    fn test_session_needs_refresh_one_minute_early() {
        let s = Session {
            uid: "u1".to_string(),
            email: "a@b.c".to_string(),
            id_token: "t".to_string(),
            refresh_token: "r".to_string(),
            expires_at_ms: 1_000_000,
        };
        assert!(!s.needs_refresh(900_000));
        assert!(s.needs_refresh(940_000));
        assert!(s.needs_refresh(2_000_000));
    }

    #[test]
    fn test_apply_draft_keeps_identity() {
        let mut item = InventoryItem {
            id: "abc".to_string(),
            name: "Milk".to_string(),
            category: "Dairy".to_string(),
            quantity: 3,
            expiry_date: None,
            created_at: Some(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()),
            updated_at: None,
        };
        let draft = ItemDraft {
            name: "Oat milk".to_string(),
            category: "Dairy".to_string(),
            quantity: 12,
            expiry_date: NaiveDate::from_ymd_opt(2026, 1, 2),
        };
        item.apply_draft(&draft);
        assert_eq!(item.id, "abc");
        assert_eq!(item.draft(), draft);
        assert!(item.created_at.is_some());
    }
}
