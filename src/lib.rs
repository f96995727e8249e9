mod api;
mod app;
mod cache;
mod charts;
mod components;
mod drafts;
mod models;
mod pages;
mod state;
mod storage;
mod util;
mod view_model;

pub use app::App;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // A second init (hot reload) is harmless.
    let _ = console_log::init_with_level(level);
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    log::info!("starting smartinventory");
    mount_to_body(App);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::ApiClient;
    use crate::models::{InventoryItem, Role, Session, UserProfile};
    use crate::storage::{load_dark_mode, load_profile, save_dark_mode, save_profile};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn session(uid: &str) -> Session {
        Session {
            uid: uid.to_string(),
            email: format!("{uid}@example.com"),
            id_token: "id-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_at_ms: i64::MAX,
        }
    }

    #[wasm_bindgen_test]
    fn test_api_client_storage_roundtrip_session() {
        ApiClient::clear_storage();

        let mut c = ApiClient::load_from_storage();
        assert!(!c.is_authenticated());

        c.set_session(session("u1"));
        c.save_to_storage();

        let c2 = ApiClient::load_from_storage();
        assert_eq!(c2.session().map(|s| s.uid.as_str()), Some("u1"));

        ApiClient::clear_storage();
        let c3 = ApiClient::load_from_storage();
        assert!(c3.session().is_none());
    }

    #[wasm_bindgen_test]
    fn test_profile_storage_roundtrip() {
        let profile = UserProfile {
            email: "a@example.com".to_string(),
            role: Some(Role::Admin),
        };
        save_profile(&profile);
        assert_eq!(load_profile(), Some(profile));
        ApiClient::clear_storage();
        assert_eq!(load_profile(), None);
    }

    #[wasm_bindgen_test]
    fn test_dark_mode_storage_roundtrip() {
        save_dark_mode(true);
        assert!(load_dark_mode());
        save_dark_mode(false);
        assert!(!load_dark_mode());
    }

    #[wasm_bindgen_test]
    fn test_inventory_snapshot_is_scoped_to_account() {
        use crate::cache::{load_inventory_snapshot, save_inventory_snapshot};

        let items = vec![InventoryItem {
            id: "i1".to_string(),
            name: "Milk".to_string(),
            category: "Dairy".to_string(),
            quantity: 3,
            expiry_date: None,
            created_at: None,
            updated_at: None,
        }];
        save_inventory_snapshot("u1", &items, 10);
        assert_eq!(load_inventory_snapshot("u1").map(|s| s.items), Some(items));
        assert!(load_inventory_snapshot("u2").is_none());
        ApiClient::clear_storage();
        assert!(load_inventory_snapshot("u1").is_none());
    }
}
