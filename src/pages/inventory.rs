use crate::components::ui::{
    Alert, AlertDescription, AlertVariant, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardHeader, CardTitle, NativeSelect, SearchInput, SelectOption,
};
use crate::components::{InventoryForm, InventoryTable};
use crate::drafts::{EditSession, Reconcile, Submission, REMOTE_DELETED_MESSAGE};
use crate::models::InventoryItem;
use crate::state::inventory_sync::use_inventory;
use crate::state::mirror::ChangeSet;
use crate::state::AppContext;
use crate::view_model::{alert_counts, categories, filter_items, ItemFilter};
use icons::TriangleAlert;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) fn alert_lines(expired: usize, low_stock: usize) -> Vec<String> {
    let mut out = vec![];
    if expired > 0 {
        out.push(format!("{expired} expired item(s)!"));
    }
    if low_stock > 0 {
        out.push(format!("{low_stock} low stock item(s)!"));
    }
    out
}

pub(crate) fn change_summary(changes: &ChangeSet) -> Option<String> {
    if changes.is_empty() {
        return None;
    }
    Some(format!(
        "Last sync: {} added, {} updated, {} removed",
        changes.added.len(),
        changes.modified.len(),
        changes.removed.len()
    ))
}

#[component]
pub fn InventoryPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let sync = use_inventory();
    let items = sync.items();
    let pending_ids = sync.pending_ids();
    let last_error = sync.last_error();
    let changes = sync.changes();
    let today = sync.today();

    let session: RwSignal<EditSession> = RwSignal::new(EditSession::new());
    let query: RwSignal<String> = RwSignal::new(String::new());
    let category: RwSignal<String> = RwSignal::new(String::new());
    let delete_target: RwSignal<Option<InventoryItem>> = RwSignal::new(None);

    // Keep the open form consistent with what other clients do.
    Effect::new(move |_| {
        let outcome = items.with(|current| session.try_update(|s| s.reconcile(current)));
        match outcome {
            Some(Reconcile::RemoteDeleted) => app_state.0.toasts.info(REMOTE_DELETED_MESSAGE),
            Some(Reconcile::Refreshed) => log::debug!("edit form picked up remote values"),
            Some(Reconcile::Conflict) => log::debug!("edit form diverged from remote values"),
            _ => {}
        }
    });

    let all_categories = Memo::new(move |_| items.with(|i| categories(i)));
    let category_options = Signal::derive(move || {
        all_categories
            .get()
            .into_iter()
            .map(|c| SelectOption::new(c.clone(), c))
            .collect::<Vec<_>>()
    });

    let filter = Memo::new(move |_| ItemFilter {
        query: query.get(),
        category: Some(category.get()).filter(|c| !c.is_empty()),
    });
    let visible = Memo::new(move |_| {
        let f = filter.get();
        items.with(|i| filter_items(i, &f))
    });

    // Alerts count the whole inventory, not just the filtered view.
    let banner = Memo::new(move |_| {
        let counts = items.with(|i| alert_counts(i, today.get()));
        alert_lines(counts.expired, counts.low_stock)
    });

    let on_submit = Callback::new(move |submission: Submission| match submission {
        Submission::Create(draft) => spawn_local(async move {
            let _ = sync.create(draft).await;
        }),
        Submission::Update { id, draft } => spawn_local(async move {
            let _ = sync.update(id, draft).await;
        }),
    });

    let on_edit = Callback::new(move |item: InventoryItem| {
        session.update(|s| s.begin_edit(&item));
        if let Some(win) = web_sys::window() {
            win.scroll_to_with_x_and_y(0.0, 0.0);
        }
    });

    let on_delete = Callback::new(move |item: InventoryItem| delete_target.set(Some(item)));

    let confirm_delete = move |_| {
        let Some(item) = delete_target.get_untracked() else {
            return;
        };
        delete_target.set(None);
        if session.with_untracked(|s| s.editing_id() == Some(item.id.as_str())) {
            session.update(|s| s.cancel());
        }
        spawn_local(async move {
            let _ = sync.delete(item.id).await;
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-end justify-between gap-2">
                <div>
                    <h1 class="text-xl font-semibold">"Inventory Management"</h1>
                    <p class="text-xs text-muted-foreground">
                        {move || changes.with(change_summary).unwrap_or_else(|| "Live".to_string())}
                    </p>
                </div>
            </div>

            <Show when=move || !banner.with(|b| b.is_empty()) fallback=|| ().into_view()>
                <Alert variant=AlertVariant::Warning>
                    <TriangleAlert />
                    <AlertDescription>
                        {move || banner.get().into_iter().map(|line| view! { <p>{line}</p> }).collect_view()}
                    </AlertDescription>
                </Alert>
            </Show>

            <Show when=move || last_error.get().is_some() fallback=|| ().into_view()>
                {move || last_error.get().map(|e| view! {
                    <Alert variant=AlertVariant::Destructive>
                        <AlertDescription class="text-xs">{e}</AlertDescription>
                    </Alert>
                })}
            </Show>

            <Card>
                <CardHeader>
                    <CardTitle class="text-sm">
                        {move || if session.with(|s| s.is_editing()) { "Edit item" } else { "New item" }}
                    </CardTitle>
                </CardHeader>
                <CardContent>
                    <InventoryForm session=session on_submit=on_submit categories=all_categories />
                </CardContent>
            </Card>

            <div class="space-y-3">
                <div class="flex flex-col gap-2 sm:flex-row sm:items-center sm:justify-between">
                    <SearchInput placeholder="Search by name or category" bind_value=query />
                    <NativeSelect
                        class="sm:w-48"
                        placeholder="All categories".to_string()
                        options=category_options
                        bind_value=category
                    />
                </div>

                <InventoryTable
                    items=visible
                    pending_ids=pending_ids
                    on_edit=on_edit
                    on_delete=on_delete
                    empty_text=Signal::derive(move || empty_text_for(&filter.get()))
                />
            </div>

            <Show when=move || delete_target.get().is_some() fallback=|| ().into_view()>
                <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                    <div class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg">
                        <div class="mb-3 space-y-1">
                            <div class="text-sm font-medium text-destructive">"Delete item"</div>
                            <div class="text-xs text-muted-foreground">
                                "This removes the item for everyone. It cannot be undone."
                            </div>
                        </div>

                        <div class="rounded-md border border-border bg-muted px-3 py-2 text-sm">
                            {move || delete_target.get().map(|i| i.name).unwrap_or_default()}
                        </div>

                        <div class="flex items-center justify-end gap-2 pt-4">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=move |_| delete_target.set(None)
                            >
                                "Cancel"
                            </Button>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                class="border-destructive/40 text-destructive"
                                on:click=confirm_delete
                            >
                                "Delete"
                            </Button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}

fn empty_text_for(filter: &ItemFilter) -> &'static str {
    if filter.is_active() {
        "No items match your search."
    } else {
        "No items in inventory."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_lines() {
        assert!(alert_lines(0, 0).is_empty());
        assert_eq!(
            alert_lines(2, 1),
            vec!["2 expired item(s)!".to_string(), "1 low stock item(s)!".to_string()]
        );
        assert_eq!(alert_lines(0, 3), vec!["3 low stock item(s)!".to_string()]);
    }

    #[test]
    fn test_empty_text_depends_on_filter() {
        assert_eq!(empty_text_for(&ItemFilter::default()), "No items in inventory.");
        let f = ItemFilter {
            query: "milk".to_string(),
            category: None,
        };
        assert_eq!(empty_text_for(&f), "No items match your search.");
    }

    #[test]
    fn test_change_summary() {
        assert_eq!(change_summary(&ChangeSet::default()), None);
        let c = ChangeSet {
            added: vec!["a".to_string()],
            modified: vec![],
            removed: vec!["b".to_string(), "c".to_string()],
        };
        assert_eq!(
            change_summary(&c).as_deref(),
            Some("Last sync: 1 added, 0 updated, 2 removed")
        );
    }
}
