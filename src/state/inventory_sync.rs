use crate::api::{ApiClient, ApiError, ApiErrorKind, ApiResult};
use crate::cache::{load_inventory_snapshot, save_inventory_snapshot};
use crate::models::{InventoryItem, ItemDraft};
use crate::state::mirror::{ChangeSet, InventoryMirror, PollTicket, SnapshotOutcome};
use crate::state::sync_control::{failure_message, AuthRecovery, SyncControl};
use crate::state::{redirect_to_login, AppContext};
use crate::util::{new_document_id, now_ms, roll_date, today_local};
use chrono::NaiveDate;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::{
    set_interval_with_handle, set_timeout_with_handle, window_event_listener,
    window_event_listener_untyped, IntervalHandle, TimeoutHandle, WindowListenerHandle,
};
use std::time::Duration;

enum Ack {
    Upsert(InventoryItem),
    Delete,
}

/// Keeps the inventory mirror live while at least one page is subscribed.
///
/// Responsibilities:
/// - periodic collection reads, plus immediate reads after writes, `online`
///   and the tab becoming visible
/// - optimistic create/update/delete with rollback and toasts
/// - exponential backoff while the store is unreachable
/// - one token refresh on `Unauthorized`, then sign-out
///
/// Non-responsibilities:
/// - form state (see `drafts::EditSession`)
#[derive(Clone, Copy)]
pub(crate) struct InventorySync {
    app_state: AppContext,
    mirror: StoredValue<InventoryMirror>,

    /// Published state.
    items: RwSignal<Vec<InventoryItem>>,
    pending_ids: RwSignal<Vec<String>>,
    loading: RwSignal<bool>,
    online: RwSignal<bool>,
    last_error: RwSignal<Option<String>>,
    changes: RwSignal<ChangeSet>,
    /// Local calendar date; moves forward past midnight while pages stay open.
    today: RwSignal<NaiveDate>,

    control: StoredValue<SyncControl>,

    poll_interval_ms: u64,
    poll_timer: StoredValue<Option<IntervalHandle>>,
    retry_timer: StoredValue<Option<TimeoutHandle>>,

    /// Global listeners (keep handles alive).
    _online_handle: StoredValue<Option<WindowListenerHandle>>,
    _visibility_handle: StoredValue<Option<WindowListenerHandle>>,
}

/// Held by a page for as long as it shows live data.
pub(crate) struct SubscriptionGuard {
    sync: InventorySync,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.sync.unsubscribe();
    }
}

impl InventorySync {
    pub fn new(app_state: AppContext) -> Self {
        let poll_interval_ms = app_state
            .0
            .api_client
            .with_untracked(|c| u64::from(c.config.poll_interval_ms));

        let s = Self {
            app_state,
            mirror: StoredValue::new(InventoryMirror::new()),
            items: RwSignal::new(vec![]),
            pending_ids: RwSignal::new(vec![]),
            loading: RwSignal::new(true),
            online: RwSignal::new(true),
            last_error: RwSignal::new(None),
            changes: RwSignal::new(ChangeSet::default()),
            today: RwSignal::new(today_local()),
            control: StoredValue::new(SyncControl::new()),
            poll_interval_ms,
            poll_timer: StoredValue::new(None),
            retry_timer: StoredValue::new(None),
            _online_handle: StoredValue::new(None),
            _visibility_handle: StoredValue::new(None),
        };

        s.start_global_listeners();
        s
    }

    pub fn items(&self) -> ReadSignal<Vec<InventoryItem>> {
        self.items.read_only()
    }

    pub fn pending_ids(&self) -> ReadSignal<Vec<String>> {
        self.pending_ids.read_only()
    }

    pub fn loading(&self) -> ReadSignal<bool> {
        self.loading.read_only()
    }

    pub fn online(&self) -> ReadSignal<bool> {
        self.online.read_only()
    }

    pub fn last_error(&self) -> ReadSignal<Option<String>> {
        self.last_error.read_only()
    }

    pub fn changes(&self) -> ReadSignal<ChangeSet> {
        self.changes.read_only()
    }

    pub fn today(&self) -> ReadSignal<NaiveDate> {
        self.today.read_only()
    }

    fn refresh_today(&self) {
        let now = today_local();
        self.today.maybe_update(|d| roll_date(d, now));
    }

    pub fn subscribe(&self) -> SubscriptionGuard {
        let first = self
            .control
            .try_update_value(|c| c.subscribe())
            .unwrap_or(false);

        if first {
            log::debug!("inventory subscription started");
            self.seed_from_cache();
            self.start_polling();
            self.fetch_now();
        }

        SubscriptionGuard { sync: *self }
    }

    fn unsubscribe(&self) {
        let last = self
            .control
            .try_update_value(|c| c.unsubscribe())
            .unwrap_or(false);

        if last {
            log::debug!("inventory subscription stopped");
            self.stop_polling();
        }
    }

    fn is_subscribed(&self) -> bool {
        self.control
            .try_with_value(|c| c.is_subscribed())
            .unwrap_or(false)
    }

    fn seed_from_cache(&self) {
        let Some(uid) = self.current_uid() else {
            return;
        };
        let Some(snap) = load_inventory_snapshot(&uid) else {
            return;
        };

        let seeded = self
            .mirror
            .try_update_value(|m| m.seed_from_cache(snap.items))
            .unwrap_or(false);
        if seeded {
            log::debug!("painted cached inventory saved at {}", snap.saved_ms);
            self.publish();
            self.loading.set(false);
        }
    }

    fn start_polling(&self) {
        if self.poll_timer.get_value().is_some() {
            return;
        }

        let s = *self;
        match set_interval_with_handle(
            move || s.poll_tick(),
            Duration::from_millis(self.poll_interval_ms),
        ) {
            Ok(handle) => self.poll_timer.set_value(Some(handle)),
            Err(e) => log::warn!("could not start inventory polling: {e:?}"),
        }
    }

    fn stop_polling(&self) {
        if let Some(handle) = self.poll_timer.try_get_value().flatten() {
            handle.clear();
            self.poll_timer.set_value(None);
        }
        self.clear_retry();
    }

    fn poll_tick(&self) {
        if !self.is_subscribed() {
            return;
        }
        self.refresh_today();
        // While offline the backoff timer owns the next attempt.
        if self.retry_timer.get_value().is_some() {
            return;
        }
        self.fetch_now();
    }

    fn current_uid(&self) -> Option<String> {
        self.app_state
            .0
            .api_client
            .with_untracked(|c| c.session().map(|s| s.uid.clone()))
    }

    /// Returns a client whose id token is not about to expire.
    async fn authed_client(&self) -> ApiResult<ApiClient> {
        let client = self.app_state.0.api_client.get_untracked();
        if !client.is_authenticated() {
            return Err(ApiError::unauthorized());
        }
        if !client.needs_refresh() {
            return Ok(client);
        }

        let session = client.refresh_session().await?;
        self.app_state.0.set_session(session);
        Ok(self.app_state.0.api_client.get_untracked())
    }

    /// Reads the collection now, or right after the read already in flight.
    pub fn fetch_now(&self) {
        if !self.app_state.0.is_authenticated() {
            return;
        }
        if !self
            .control
            .try_update_value(|c| c.try_begin_fetch())
            .unwrap_or(false)
        {
            return;
        }

        let Some(ticket) = self.mirror.try_update_value(|m| m.begin_poll()) else {
            return;
        };

        let s = *self;
        spawn_local(async move {
            let result = match s.authed_client().await {
                Ok(client) => client.list_items().await,
                Err(e) => Err(e),
            };
            let queued = s
                .control
                .try_update_value(|c| c.finish_fetch())
                .unwrap_or(false);

            match result {
                Ok(items) => s.on_snapshot(ticket, items),
                Err(e) => s.on_fetch_error(e),
            }

            if queued {
                s.fetch_now();
            }
        });
    }

    fn on_snapshot(&self, ticket: PollTicket, items: Vec<InventoryItem>) {
        self.mark_online();

        match self.mirror.try_update_value(|m| m.apply_snapshot(ticket, items)) {
            Some(SnapshotOutcome::Applied(changes)) => {
                self.persist_confirmed();
                self.publish();
                if !changes.is_empty() {
                    log::debug!(
                        "inventory snapshot #{}: +{} ~{} -{}",
                        ticket.seq,
                        changes.added.len(),
                        changes.modified.len(),
                        changes.removed.len()
                    );
                    self.changes.set(changes);
                }
                self.loading.set(false);
            }
            Some(SnapshotOutcome::Stale) => {
                log::debug!("discarded stale inventory snapshot #{}", ticket.seq);
            }
            None => {}
        }
    }

    fn on_fetch_error(&self, e: ApiError) {
        match e.kind {
            ApiErrorKind::Unauthorized => self.handle_unauthorized(),
            ApiErrorKind::Network => {
                self.mark_offline(&e);
                self.schedule_retry();
            }
            _ => {
                log::warn!("inventory read failed: {e}");
                self.last_error.set(Some(e.message));
            }
        }
        self.loading.set(false);
    }

    fn mark_online(&self) {
        self.online.set(true);
        self.last_error.set(None);
        self.control.update_value(|c| c.on_success());
        self.clear_retry();
    }

    fn mark_offline(&self, e: &ApiError) {
        if self.online.get_untracked() {
            log::warn!("inventory store unreachable: {e}");
        }
        self.online.set(false);
        self.last_error.set(Some(e.to_string()));
    }

    fn schedule_retry(&self) {
        if !self.is_subscribed() || self.retry_timer.get_value().is_some() {
            return;
        }

        let Some(delay) = self.control.try_update_value(|c| c.take_retry_delay()) else {
            return;
        };
        log::info!("retrying inventory read in {delay} ms");

        let s = *self;
        match set_timeout_with_handle(
            move || {
                s.retry_timer.set_value(None);
                s.fetch_now();
            },
            Duration::from_millis(delay),
        ) {
            Ok(handle) => self.retry_timer.set_value(Some(handle)),
            Err(e) => log::warn!("could not schedule inventory retry: {e:?}"),
        }
    }

    fn clear_retry(&self) {
        if let Some(handle) = self.retry_timer.try_get_value().flatten() {
            handle.clear();
            self.retry_timer.set_value(None);
        }
    }

    fn handle_unauthorized(&self) {
        let recovery = self
            .control
            .try_update_value(|c| c.on_unauthorized())
            .unwrap_or(AuthRecovery::SignOut);
        if recovery == AuthRecovery::SignOut {
            self.force_sign_out();
            return;
        }

        let client = self.app_state.0.api_client.get_untracked();
        let s = *self;
        spawn_local(async move {
            match client.refresh_session().await {
                Ok(session) => {
                    log::info!("session refreshed after rejected request");
                    s.app_state.0.set_session(session);
                    s.fetch_now();
                }
                Err(e) => {
                    log::warn!("session refresh failed: {e}");
                    s.force_sign_out();
                }
            }
        });
    }

    fn force_sign_out(&self) {
        self.reset();
        self.app_state.0.sign_out();
        redirect_to_login();
    }

    /// Forgets all account data; used on sign-out.
    pub fn reset(&self) {
        self.mirror.update_value(|m| m.reset());
        self.items.set(vec![]);
        self.pending_ids.set(vec![]);
        self.changes.set(ChangeSet::default());
        self.loading.set(true);
        self.last_error.set(None);
        self.control.update_value(|c| c.reset());
        self.clear_retry();
    }

    fn publish(&self) {
        let (visible, pending) = self.mirror.with_value(|m| (m.visible(), m.pending_ids()));
        self.items.set(visible);
        self.pending_ids.set(pending);
    }

    fn persist_confirmed(&self) {
        let Some(uid) = self.current_uid() else {
            return;
        };
        self.mirror
            .with_value(|m| save_inventory_snapshot(&uid, m.confirmed(), now_ms()));
    }

    fn settle(&self, op_id: u64, result: Result<Ack, &ApiError>, success: &str, failure: &str) {
        match result {
            Ok(ack) => {
                self.mirror.update_value(|m| match ack {
                    Ack::Upsert(item) => m.ack_upsert(op_id, item),
                    Ack::Delete => m.ack_delete(op_id),
                });
                self.mark_online();
                self.persist_confirmed();
                self.publish();
                self.app_state.0.toasts.success(success);
                self.fetch_now();
            }
            Err(e) => {
                log::warn!("{failure}: {e}");
                self.mirror.update_value(|m| {
                    m.rollback(op_id);
                });
                self.publish();

                self.app_state.0.toasts.error(failure_message(failure, e));

                match e.kind {
                    ApiErrorKind::Unauthorized => self.handle_unauthorized(),
                    ApiErrorKind::Network => self.mark_offline(e),
                    _ => {}
                }
            }
        }
    }

    pub async fn create(&self, draft: ItemDraft) -> ApiResult<InventoryItem> {
        let id = new_document_id();
        let op_id = self
            .mirror
            .try_update_value(|m| m.stage_create(InventoryItem::from_draft(&id, &draft)))
            .unwrap_or_default();
        self.publish();

        let result = match self.authed_client().await {
            Ok(client) => client.create_item(&id, &draft).await,
            Err(e) => Err(e),
        };
        self.settle(
            op_id,
            result.as_ref().map(|item| Ack::Upsert(item.clone())),
            "Item added successfully",
            "Error adding item",
        );
        result
    }

    pub async fn update(&self, id: String, draft: ItemDraft) -> ApiResult<InventoryItem> {
        let op_id = self
            .mirror
            .try_update_value(|m| m.stage_update(&id, draft.clone()))
            .unwrap_or_default();
        self.publish();

        let result = match self.authed_client().await {
            Ok(client) => client.update_item(&id, &draft).await,
            Err(e) => Err(e),
        };
        self.settle(
            op_id,
            result.as_ref().map(|item| Ack::Upsert(item.clone())),
            "Item updated",
            "Error updating item",
        );
        result
    }

    pub async fn delete(&self, id: String) -> ApiResult<()> {
        let op_id = self
            .mirror
            .try_update_value(|m| m.stage_delete(&id))
            .unwrap_or_default();
        self.publish();

        let result = match self.authed_client().await {
            Ok(client) => client.delete_item(&id).await,
            Err(e) => Err(e),
        };
        self.settle(
            op_id,
            result.as_ref().map(|_| Ack::Delete),
            "Item deleted",
            "Error deleting item",
        );
        result
    }

    fn start_global_listeners(&self) {
        // online -> read now, dropping any pending backoff
        let s = *self;
        let online = window_event_listener(ev::online, move |_ev: web_sys::Event| {
            if s.is_subscribed() {
                s.control.update_value(|c| c.reset_backoff());
                s.clear_retry();
                s.fetch_now();
            }
        });
        self._online_handle.set_value(Some(online));

        // tab visible again -> read now
        let s2 = *self;
        let visibility = window_event_listener_untyped("visibilitychange", move |_ev| {
            let visible = web_sys::window()
                .and_then(|w| w.document())
                .map(|d| d.visibility_state() == web_sys::VisibilityState::Visible)
                .unwrap_or(false);
            if visible && s2.is_subscribed() {
                s2.refresh_today();
                s2.fetch_now();
            }
        });
        self._visibility_handle.set_value(Some(visibility));
    }
}

/// Subscribes the calling component for its lifetime.
pub(crate) fn use_inventory() -> InventorySync {
    let sync = expect_context::<InventorySync>();
    let guard = sync.subscribe();
    on_cleanup(move || drop(guard));
    sync
}
