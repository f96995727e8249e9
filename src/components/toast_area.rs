use crate::state::{AppContext, ToastKind};
use icons::X;
use leptos::prelude::*;

fn toast_class(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "border-emerald-500/40 bg-emerald-50 text-emerald-800 dark:bg-emerald-500/10 dark:text-emerald-300",
        ToastKind::Error => "border-destructive/30 bg-background text-destructive",
        ToastKind::Info => "bg-background text-foreground",
    }
}

/// Stack of transient notifications, newest at the bottom.
#[component]
pub fn ToastArea() -> impl IntoView {
    let toasts = expect_context::<AppContext>().0.toasts;
    let items = toasts.items();

    view! {
        <div class="pointer-events-none fixed bottom-4 right-4 z-50 flex w-80 flex-col gap-2" aria-live="polite">
            <For
                each=move || items.get()
                key=|t| t.id
                children=move |t| {
                    let id = t.id;
                    view! {
                        <div class=format!(
                            "pointer-events-auto flex items-start justify-between gap-3 rounded-lg border px-4 py-3 text-sm shadow-md {}",
                            toast_class(t.kind)
                        )>
                            <span>{t.message}</span>
                            <button
                                type="button"
                                class="text-xs opacity-60 hover:opacity-100"
                                aria-label="Dismiss"
                                on:click=move |_| toasts.dismiss(id)
                            >
                                <X class="size-3.5" />
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
