use crate::models::{Session, UserProfile};
use serde::{Deserialize, Serialize};

pub(crate) const SESSION_KEY: &str = "smartinventory_session";
pub(crate) const PROFILE_KEY: &str = "smartinventory_profile";
pub(crate) const THEME_KEY: &str = "smartinventory_theme";
pub(crate) const INVENTORY_SNAPSHOT_KEY: &str = "smartinventory_inventory_snapshot";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn remove_from_storage(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

pub(crate) fn load_session() -> Option<Session> {
    load_json_from_storage::<Session>(SESSION_KEY)
}

pub(crate) fn save_session(session: &Session) {
    save_json_to_storage(SESSION_KEY, session);
}

pub(crate) fn load_profile() -> Option<UserProfile> {
    load_json_from_storage::<UserProfile>(PROFILE_KEY)
}

pub(crate) fn save_profile(profile: &UserProfile) {
    save_json_to_storage(PROFILE_KEY, profile);
}

/// Drops everything tied to the signed-in account, including the cached inventory.
pub(crate) fn clear_account_storage() {
    remove_from_storage(SESSION_KEY);
    remove_from_storage(PROFILE_KEY);
    remove_from_storage(INVENTORY_SNAPSHOT_KEY);
}

pub(crate) fn load_dark_mode() -> bool {
    local_storage()
        .and_then(|s| s.get_item(THEME_KEY).ok().flatten())
        .map(|v| v == "dark")
        .unwrap_or(false)
}

pub(crate) fn save_dark_mode(dark: bool) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(THEME_KEY, if dark { "dark" } else { "light" });
    }
}
