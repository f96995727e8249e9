//! Wire types for the hosted identity service (`accounts:*` and `token`).

use super::{ApiError, ApiErrorKind};
use crate::models::Session;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordSignInRequest {
    pub email: String,
    pub password: String,
    pub return_secure_token: bool,
}

impl PasswordSignInRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
            return_secure_token: true,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePasswordRequest {
    pub id_token: String,
    pub password: String,
    pub return_secure_token: bool,
}

impl UpdatePasswordRequest {
    pub fn new(id_token: &str, password: &str) -> Self {
        Self {
            id_token: id_token.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct RefreshRequest {
    pub grant_type: &'static str,
    pub refresh_token: String,
}

impl RefreshRequest {
    pub fn new(refresh_token: &str) -> Self {
        Self {
            grant_type: "refresh_token",
            refresh_token: refresh_token.to_string(),
        }
    }
}

/// Response of `signInWithPassword`, `signUp` and `update`.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds, sent as a string.
    #[serde(default)]
    pub expires_in: Option<String>,
}

fn expires_at(now_ms: i64, expires_in: Option<&str>) -> i64 {
    let secs = expires_in
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(3600);
    now_ms + secs * 1000
}

impl AuthResponse {
    pub fn into_session(self, now_ms: i64) -> Session {
        Session {
            expires_at_ms: expires_at(now_ms, self.expires_in.as_deref()),
            uid: self.local_id,
            email: self.email,
            id_token: self.id_token.unwrap_or_default(),
            refresh_token: self.refresh_token.unwrap_or_default(),
        }
    }

    /// `accounts:update` may omit fields that did not change.
    pub fn into_session_keeping(self, previous: &Session, now_ms: i64) -> Session {
        let Some(id_token) = self.id_token.filter(|t| !t.is_empty()) else {
            return previous.clone();
        };
        Session {
            uid: if self.local_id.is_empty() {
                previous.uid.clone()
            } else {
                self.local_id
            },
            email: if self.email.is_empty() {
                previous.email.clone()
            } else {
                self.email
            },
            id_token,
            refresh_token: self
                .refresh_token
                .unwrap_or_else(|| previous.refresh_token.clone()),
            expires_at_ms: expires_at(now_ms, self.expires_in.as_deref()),
        }
    }
}

/// Response of the refresh-token grant (snake_case, unlike the `accounts:*` family).
#[derive(Deserialize, Clone, Debug)]
pub(crate) struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl RefreshResponse {
    pub fn into_session(self, previous: &Session, now_ms: i64) -> Session {
        Session {
            uid: self.user_id.unwrap_or_else(|| previous.uid.clone()),
            email: previous.email.clone(),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at_ms: expires_at(now_ms, self.expires_in.as_deref()),
        }
    }
}

/// Maps identity error codes (e.g. `WEAK_PASSWORD : Password should be ...`) to
/// messages fit for the forms.
pub(crate) fn map_identity_error(raw: &str) -> ApiError {
    let code = raw
        .split(|c: char| c == ':' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            ApiError::auth("Invalid email or password.")
        }
        "EMAIL_EXISTS" => ApiError::auth("An account with this email already exists."),
        "WEAK_PASSWORD" => ApiError::auth("Password should be at least 6 characters."),
        "INVALID_EMAIL" => ApiError::auth("Please enter a valid email address."),
        "USER_DISABLED" => ApiError::auth("This account has been disabled."),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => ApiError::auth("Too many attempts. Try again later."),
        "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" | "TOKEN_EXPIRED" | "INVALID_ID_TOKEN"
        | "USER_NOT_FOUND" | "INVALID_REFRESH_TOKEN" => ApiError {
            kind: ApiErrorKind::Unauthorized,
            message: "Your session has expired. Please sign in again.".to_string(),
        },
        "" => ApiError::auth("Authentication failed."),
        other => ApiError::auth(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_request_wire_shape() {
        let v = serde_json::to_value(PasswordSignInRequest::new(" u@example.com ", "pw")).unwrap();
        assert_eq!(v["email"], "u@example.com");
        assert_eq!(v["returnSecureToken"], true);
    }

    #[test]
    fn test_auth_response_into_session() {
        let json = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "uid-1",
            "email": "u@example.com",
            "idToken": "id",
            "refreshToken": "rt",
            "expiresIn": "3600",
            "registered": true
        }"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        let s = resp.into_session(1_000);
        assert_eq!(s.uid, "uid-1");
        assert_eq!(s.id_token, "id");
        assert_eq!(s.expires_at_ms, 1_000 + 3_600_000);
    }

    #[test]
    fn test_update_response_without_token_keeps_session() {
        let prev = Session {
            uid: "uid-1".to_string(),
            email: "u@example.com".to_string(),
            id_token: "old".to_string(),
            refresh_token: "rt".to_string(),
            expires_at_ms: 5,
        };
        let resp: AuthResponse = serde_json::from_str(r#"{"localId":"uid-1"}"#).unwrap();
        assert_eq!(resp.into_session_keeping(&prev, 0), prev);

        let resp: AuthResponse =
            serde_json::from_str(r#"{"idToken":"new","expiresIn":"60"}"#).unwrap();
        let s = resp.into_session_keeping(&prev, 0);
        assert_eq!(s.id_token, "new");
        assert_eq!(s.email, "u@example.com");
        assert_eq!(s.refresh_token, "rt");
        assert_eq!(s.expires_at_ms, 60_000);
    }

    #[test]
    fn test_refresh_response_snake_case() {
        let prev = Session {
            uid: "uid-1".to_string(),
            email: "u@example.com".to_string(),
            id_token: "old".to_string(),
            refresh_token: "rt".to_string(),
            expires_at_ms: 5,
        };
        let json = r#"{"expires_in":"3600","token_type":"Bearer","refresh_token":"rt2","id_token":"id2","user_id":"uid-1","project_id":"1"}"#;
        let resp: RefreshResponse = serde_json::from_str(json).unwrap();
        let s = resp.into_session(&prev, 0);
        assert_eq!(s.id_token, "id2");
        assert_eq!(s.refresh_token, "rt2");
        assert_eq!(s.email, "u@example.com");
    }

    #[test]
    fn test_identity_error_mapping() {
        assert_eq!(
            map_identity_error("INVALID_LOGIN_CREDENTIALS").message,
            "Invalid email or password."
        );
        let weak = map_identity_error("WEAK_PASSWORD : Password should be at least 6 characters");
        assert_eq!(weak.kind, ApiErrorKind::Auth);
        assert_eq!(weak.message, "Password should be at least 6 characters.");
        assert_eq!(
            map_identity_error("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled").message,
            "Too many attempts. Try again later."
        );
        assert_eq!(
            map_identity_error("CREDENTIAL_TOO_OLD_LOGIN_AGAIN").kind,
            ApiErrorKind::Unauthorized
        );
        assert_eq!(map_identity_error("OPERATION_NOT_ALLOWED").message, "OPERATION_NOT_ALLOWED");
    }
}
