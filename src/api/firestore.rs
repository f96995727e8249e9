//! Document codec for the hosted store's REST representation.
//!
//! Field values arrive wrapped in their type (`{"stringValue": "..."}`,
//! `{"integerValue": "5"}`, ...). Older documents were written by several
//! clients with different shapes, so decoding accepts the common variants.

use crate::models::{InventoryItem, ItemDraft, Role, UserProfile};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::str::FromStr;

pub(crate) const FIELD_NAME: &str = "name";
pub(crate) const FIELD_CATEGORY: &str = "category";
pub(crate) const FIELD_QUANTITY: &str = "quantity";
pub(crate) const FIELD_EXPIRY: &str = "expiryDate";
pub(crate) const FIELD_CREATED: &str = "createdAt";
pub(crate) const FIELD_UPDATED: &str = "updatedAt";

/// Fields covered by an item update mask.
pub(crate) const ITEM_FIELD_PATHS: [&str; 4] =
    [FIELD_NAME, FIELD_CATEGORY, FIELD_QUANTITY, FIELD_EXPIRY];

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    /// Last path segment of `projects/.../documents/{collection}/{id}`.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommitResponse {
    #[serde(default)]
    pub write_results: Vec<WriteResult>,
    #[serde(default)]
    pub commit_time: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WriteResult {
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub transform_results: Vec<Value>,
}

impl CommitResponse {
    /// The `REQUEST_TIME` transform result, or the commit time when absent.
    pub fn server_timestamp(&self) -> Option<DateTime<Utc>> {
        self.write_results
            .first()
            .and_then(|w| w.transform_results.first())
            .and_then(decode_timestamp)
            .or_else(|| self.commit_time.as_deref().and_then(parse_rfc3339))
    }
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

pub(crate) fn decode_string(v: &Value) -> Option<String> {
    v.get("stringValue")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Integers travel as strings; doubles are truncated; numeric strings are accepted.
pub(crate) fn decode_integer(v: &Value) -> Option<i64> {
    if let Some(i) = v.get("integerValue") {
        return match i {
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
    }
    if let Some(d) = v.get("doubleValue").and_then(Value::as_f64) {
        return d.is_finite().then_some(d.trunc() as i64);
    }
    let s = decode_string(v)?;
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|d| d.is_finite()).map(|d| d.trunc() as i64))
}

pub(crate) fn decode_timestamp(v: &Value) -> Option<DateTime<Utc>> {
    v.get("timestampValue")
        .and_then(Value::as_str)
        .and_then(parse_rfc3339)
}

/// Expiry dates are normally `YYYY-MM-DD` strings; some clients stored timestamps.
pub(crate) fn decode_date(v: &Value) -> Option<NaiveDate> {
    if let Some(ts) = decode_timestamp(v) {
        return Some(ts.date_naive());
    }
    let s = decode_string(v)?;
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_rfc3339(s).map(|d| d.date_naive()))
}

pub(crate) fn decode_item(doc: &Document) -> Option<InventoryItem> {
    let id = doc.id();
    if id.trim().is_empty() {
        return None;
    }

    let field = |k: &str| doc.fields.get(k);
    let string_field = |k: &str| field(k).and_then(decode_string).unwrap_or_default();

    let quantity = match field(FIELD_QUANTITY).map(|v| (v, decode_integer(v))) {
        Some((_, Some(q))) => q,
        Some((raw, None)) => {
            log::warn!("inventory/{id}: unreadable quantity {raw}");
            0
        }
        None => 0,
    };

    Some(InventoryItem {
        id: id.to_string(),
        name: string_field(FIELD_NAME),
        category: string_field(FIELD_CATEGORY),
        quantity,
        expiry_date: field(FIELD_EXPIRY).and_then(decode_date),
        created_at: field(FIELD_CREATED)
            .and_then(decode_timestamp)
            .or_else(|| doc.create_time.as_deref().and_then(parse_rfc3339)),
        updated_at: field(FIELD_UPDATED)
            .and_then(decode_timestamp)
            .or_else(|| doc.update_time.as_deref().and_then(parse_rfc3339)),
    })
}

pub(crate) fn encode_draft_fields(draft: &ItemDraft, updated_at: Option<DateTime<Utc>>) -> Value {
    let mut fields = Map::new();
    fields.insert(FIELD_NAME.to_string(), json!({ "stringValue": draft.name }));
    fields.insert(FIELD_CATEGORY.to_string(), json!({ "stringValue": draft.category }));
    fields.insert(
        FIELD_QUANTITY.to_string(),
        json!({ "integerValue": draft.quantity.to_string() }),
    );
    fields.insert(
        FIELD_EXPIRY.to_string(),
        match draft.expiry_date {
            Some(d) => json!({ "stringValue": d.format("%Y-%m-%d").to_string() }),
            None => json!({ "nullValue": null }),
        },
    );
    if let Some(ts) = updated_at {
        fields.insert(
            FIELD_UPDATED.to_string(),
            json!({ "timestampValue": ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true) }),
        );
    }
    Value::Object(fields)
}

pub(crate) fn encode_profile_fields(profile: &UserProfile) -> Value {
    json!({
        "email": { "stringValue": profile.email },
        "role": match profile.role {
            Some(role) => json!({ "stringValue": role.as_ref() }),
            None => json!({ "nullValue": null }),
        },
    })
}

pub(crate) fn decode_profile(doc: &Document) -> Option<UserProfile> {
    let email = doc.fields.get("email").and_then(decode_string)?;
    let role = doc
        .fields
        .get("role")
        .and_then(decode_string)
        .and_then(|r| Role::from_str(r.trim()).ok());
    Some(UserProfile { email, role })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> Document {
        serde_json::from_str(json).expect("document should parse")
    }

    #[test]
    fn test_decode_item_from_list_response() {
        let json = r#"{
            "documents": [{
                "name": "projects/p/databases/(default)/documents/inventory/abc123",
                "fields": {
                    "name": {"stringValue": "Milk"},
                    "category": {"stringValue": "Dairy"},
                    "quantity": {"integerValue": "4"},
                    "expiryDate": {"stringValue": "2026-10-20"},
                    "createdAt": {"timestampValue": "2026-10-01T08:30:00.123Z"}
                },
                "createTime": "2026-10-01T08:30:00.200Z",
                "updateTime": "2026-10-02T09:00:00Z"
            }],
            "nextPageToken": "tok"
        }"#;
        let page: ListDocumentsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("tok"));

        let item = decode_item(&page.documents[0]).unwrap();
        assert_eq!(item.id, "abc123");
        assert_eq!(item.name, "Milk");
        assert_eq!(item.quantity, 4);
        assert_eq!(item.expiry_date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!(
            item.created_at.unwrap().to_rfc3339(),
            "2026-10-01T08:30:00.123+00:00"
        );
        assert!(item.updated_at.is_some());
    }

    #[test]
    fn test_decode_item_lenient_shapes() {
        let d = doc(r#"{
            "name": "projects/p/databases/(default)/documents/inventory/x",
            "fields": {
                "name": {"stringValue": "Rice"},
                "quantity": {"stringValue": " 12 "},
                "expiryDate": {"timestampValue": "2027-01-05T00:00:00Z"}
            }
        }"#);
        let item = decode_item(&d).unwrap();
        assert_eq!(item.category, "");
        assert_eq!(item.quantity, 12);
        assert_eq!(item.expiry_date, NaiveDate::from_ymd_opt(2027, 1, 5));
        assert!(item.created_at.is_none());

        let d = doc(r#"{
            "name": "projects/p/databases/(default)/documents/inventory/y",
            "fields": {
                "quantity": {"doubleValue": 7.9},
                "expiryDate": {"stringValue": "soon"}
            }
        }"#);
        let item = decode_item(&d).unwrap();
        assert_eq!(item.quantity, 7);
        assert!(item.expiry_date.is_none());

        let d = doc(r#"{
            "name": "projects/p/databases/(default)/documents/inventory/z",
            "fields": { "quantity": {"stringValue": "lots"} }
        }"#);
        assert_eq!(decode_item(&d).unwrap().quantity, 0);
    }

    #[test]
    fn test_decode_item_falls_back_to_create_time() {
        let d = doc(r#"{
            "name": "projects/p/databases/(default)/documents/inventory/q",
            "fields": {},
            "createTime": "2026-05-01T00:00:00Z"
        }"#);
        let item = decode_item(&d).unwrap();
        assert_eq!(item.created_at.unwrap().to_rfc3339(), "2026-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_document_without_name_is_skipped() {
        assert!(decode_item(&Document::default()).is_none());
    }

    #[test]
    fn test_encode_draft_fields() {
        let draft = ItemDraft {
            name: "Eggs".to_string(),
            category: "Dairy".to_string(),
            quantity: 30,
            expiry_date: NaiveDate::from_ymd_opt(2026, 11, 3),
        };
        let v = encode_draft_fields(&draft, None);
        assert_eq!(v["quantity"]["integerValue"], "30");
        assert_eq!(v["expiryDate"]["stringValue"], "2026-11-03");
        assert!(v.get("updatedAt").is_none());

        let ts = DateTime::parse_from_rfc3339("2026-10-15T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let v = encode_draft_fields(&draft, Some(ts));
        assert_eq!(v["updatedAt"]["timestampValue"], "2026-10-15T10:00:00.000Z");
    }

    #[test]
    fn test_encoded_fields_decode_back() {
        let draft = ItemDraft {
            name: "Flour".to_string(),
            category: "Baking".to_string(),
            quantity: 2,
            expiry_date: None,
        };
        let d = Document {
            name: "projects/p/databases/(default)/documents/inventory/f1".to_string(),
            fields: encode_draft_fields(&draft, None)
                .as_object()
                .cloned()
                .unwrap_or_default(),
            ..Default::default()
        };
        assert_eq!(decode_item(&d).unwrap().draft(), draft);
    }

    #[test]
    fn test_commit_response_server_timestamp() {
        let json = r#"{
            "writeResults": [{
                "updateTime": "2026-10-15T10:00:01Z",
                "transformResults": [{"timestampValue": "2026-10-15T10:00:00.5Z"}]
            }],
            "commitTime": "2026-10-15T10:00:01Z"
        }"#;
        let c: CommitResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            c.server_timestamp().unwrap().timestamp_millis() % 1000,
            500
        );

        let c: CommitResponse =
            serde_json::from_str(r#"{"writeResults":[{}],"commitTime":"2026-10-15T10:00:01Z"}"#)
                .unwrap();
        assert!(c.server_timestamp().is_some());
    }

    #[test]
    fn test_profile_codec() {
        let p = UserProfile {
            email: "a@b.c".to_string(),
            role: Some(Role::Admin),
        };
        let fields = encode_profile_fields(&p);
        assert_eq!(fields["role"]["stringValue"], "admin");

        let d = Document {
            name: "projects/p/databases/(default)/documents/users/u1".to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        };
        assert_eq!(decode_profile(&d), Some(p));

        let d = doc(r#"{"name":"x/users/u2","fields":{"email":{"stringValue":"c@d.e"},"role":{"stringValue":"owner"}}}"#);
        assert_eq!(decode_profile(&d).unwrap().role, None);
    }
}
