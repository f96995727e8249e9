pub(crate) mod inventory_sync;
pub(crate) mod mirror;
pub(crate) mod sync_control;
pub(crate) mod toasts;

pub(crate) use inventory_sync::InventorySync;
pub(crate) use toasts::{ToastKind, Toasts};

use crate::api::ApiClient;
use crate::models::{Session, UserProfile};
use crate::storage::{load_dark_mode, load_profile, save_dark_mode, save_profile};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// `users/{uid}` of the signed-in account; loaded lazily.
    pub profile: RwSignal<Option<UserProfile>>,

    /// Global UI state.
    pub dark_mode: RwSignal<bool>,
    pub toasts: Toasts,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::load_from_storage();
        let stored_profile = if stored_client.is_authenticated() {
            load_profile()
        } else {
            None
        };

        Self {
            api_client: RwSignal::new(stored_client),
            profile: RwSignal::new(stored_profile),
            dark_mode: RwSignal::new(load_dark_mode()),
            toasts: Toasts::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.api_client.with_untracked(|c| c.is_authenticated())
    }

    /// Stores a fresh session (sign-in, refresh, password change).
    pub fn set_session(&self, session: Session) {
        self.api_client.update(|c| {
            c.set_session(session);
            c.save_to_storage();
        });
    }

    pub fn set_profile(&self, profile: UserProfile) {
        save_profile(&profile);
        self.profile.set(Some(profile));
    }

    pub fn set_dark_mode(&self, dark: bool) {
        save_dark_mode(dark);
        self.dark_mode.set(dark);
    }

    /// Drops the session and every account-scoped cache.
    pub fn sign_out(&self) {
        self.api_client.update(|c| c.logout());
        self.profile.set(None);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

/// Full reload to the login page so no signed-in state survives.
pub(crate) fn redirect_to_login() {
    if let Some(win) = web_sys::window() {
        let _ = win.location().set_href("/login");
    }
}
