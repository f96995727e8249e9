use leptos::prelude::*;
use wasm_bindgen::JsCast;

pub(crate) const TOAST_TTL_MS: i32 = 4_000;
pub(crate) const MAX_TOASTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Appends `toast`, dropping the oldest entries beyond `max`.
pub(crate) fn push_capped(list: &mut Vec<Toast>, toast: Toast, max: usize) {
    list.push(toast);
    if list.len() > max {
        let overflow = list.len() - max;
        list.drain(..overflow);
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Toasts {
    items: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(vec![]),
            next_id: StoredValue::new(1),
        }
    }

    pub fn items(&self) -> RwSignal<Vec<Toast>> {
        self.items
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        let toast = Toast {
            id,
            kind,
            message: message.into(),
        };
        self.items
            .update(|list| push_capped(list, toast, MAX_TOASTS));

        let Some(win) = web_sys::window() else {
            return;
        };
        let s = *self;
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || s.dismiss(id));
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            TOAST_TTL_MS,
        );
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn dismiss(&self, id: u64) {
        // The toast may have been dropped already (cap or manual close).
        let _ = self.items.try_update(|list| list.retain(|t| t.id != id));
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(id: u64) -> Toast {
        Toast {
            id,
            kind: ToastKind::Info,
            message: format!("t{id}"),
        }
    }

    #[test]
    fn test_push_capped_drops_oldest() {
        let mut list = vec![];
        for id in 1..=6 {
            push_capped(&mut list, toast(id), MAX_TOASTS);
        }
        let ids: Vec<u64> = list.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_push_capped_under_limit() {
        let mut list = vec![toast(1)];
        push_capped(&mut list, toast(2), MAX_TOASTS);
        assert_eq!(list.len(), 2);
    }
}
