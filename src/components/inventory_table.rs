use crate::components::ui::{
    Badge, BadgeVariant, Button, ButtonSize, ButtonVariant, Table, TableBody, TableCell, TableHead,
    TableHeader, TableRow, TableWrapper,
};
use crate::models::InventoryItem;
use crate::state::InventorySync;
use crate::view_model::{format_date_in, sort_items, status_badges, SortDir, SortKey, StatusBadge};
use icons::{ChevronDown, ChevronUp};
use leptos::prelude::*;

#[component]
fn SortHeader(
    label: &'static str,
    key: SortKey,
    sort: RwSignal<(SortKey, SortDir)>,
    #[prop(optional)] class: &'static str,
) -> impl IntoView {
    let on_click = move |_| {
        sort.update(|(k, d)| {
            if *k == key {
                *d = d.flip();
            } else {
                *k = key;
                *d = SortDir::Asc;
            }
        });
    };

    let indicator = move || {
        let (k, d) = sort.get();
        if k != key {
            return ().into_any();
        }
        match d {
            SortDir::Asc => view! { <ChevronUp class="size-3.5" /> }.into_any(),
            SortDir::Desc => view! { <ChevronDown class="size-3.5" /> }.into_any(),
        }
    };

    view! {
        <TableHead class=class>
            <button type="button" class="inline-flex items-center gap-1 hover:text-foreground" on:click=on_click>
                {label}
                {indicator}
            </button>
        </TableHead>
    }
}

/// Item list with status badges. Without `on_edit`/`on_delete` it renders
/// read-only (no Status or Actions columns).
#[component]
pub fn InventoryTable(
    #[prop(into)] items: Signal<Vec<InventoryItem>>,
    #[prop(into, optional)] pending_ids: Signal<Vec<String>>,
    #[prop(into, optional)] on_edit: Option<Callback<InventoryItem>>,
    #[prop(into, optional)] on_delete: Option<Callback<InventoryItem>>,
    #[prop(into, default = Signal::stored("No items in inventory."))] empty_text: Signal<&'static str>,
) -> impl IntoView {
    let sort: RwSignal<(SortKey, SortDir)> = RwSignal::new((SortKey::None, SortDir::Asc));
    let interactive = on_edit.is_some() || on_delete.is_some();
    let today = expect_context::<InventorySync>().today();

    let rows = Memo::new(move |_| {
        let (key, dir) = sort.get();
        let mut out = items.get();
        sort_items(&mut out, key, dir);
        out
    });

    let column_count = if interactive { 6 } else { 4 };

    view! {
        <TableWrapper>
            <Table>
                <TableHeader>
                    <TableRow class="hover:bg-transparent">
                        <SortHeader label="Name" key=SortKey::Name sort=sort />
                        <SortHeader label="Category" key=SortKey::Category sort=sort />
                        <SortHeader label="Quantity" key=SortKey::Quantity sort=sort class="text-right" />
                        <SortHeader label="Expiry" key=SortKey::Expiry sort=sort />
                        {interactive.then(|| view! {
                            <TableHead>"Status"</TableHead>
                            <TableHead class="text-right">"Actions"</TableHead>
                        })}
                    </TableRow>
                </TableHeader>
                <TableBody>
                    <Show
                        when=move || !rows.with(|r| r.is_empty())
                        fallback=move || view! {
                            <tr>
                                <td colspan=column_count.to_string() class="p-6 text-center text-sm text-muted-foreground">
                                    {move || empty_text.get()}
                                </td>
                            </tr>
                        }
                    >
                        <For
                            each=move || rows.get()
                            key=|item| {
                                (
                                    item.id.clone(),
                                    item.name.clone(),
                                    item.category.clone(),
                                    item.quantity,
                                    item.expiry_date,
                                )
                            }
                            children=move |item| {
                                let id = item.id.clone();
                                let pending = Memo::new(move |_| pending_ids.with(|p| p.contains(&id)));
                                let badge_item = item.clone();
                                let badges = move || status_badges(&badge_item, today.get());
                                let edit_item = item.clone();
                                let delete_item = item.clone();

                                view! {
                                    <tr class=move || {
                                        if pending.get() {
                                            "border-b opacity-60"
                                        } else {
                                            "border-b transition-colors hover:bg-muted/50"
                                        }
                                    }>
                                        <TableCell class="font-medium">
                                            {item.name.clone()}
                                            <Show when=move || pending.get() fallback=|| ().into_view()>
                                                <span class="ml-2 text-xs font-normal text-muted-foreground">"Saving…"</span>
                                            </Show>
                                        </TableCell>
                                        <TableCell>{item.category.clone()}</TableCell>
                                        <TableCell class="text-right tabular-nums">{item.quantity}</TableCell>
                                        <TableCell class="whitespace-nowrap">{format_date_in(item.expiry_date)}</TableCell>
                                        {interactive.then(move || view! {
                                            <TableCell>
                                                <div class="flex flex-wrap gap-1">
                                                    {move || badges()
                                                        .into_iter()
                                                        .map(|b| {
                                                            let variant = match b {
                                                                StatusBadge::Expired => BadgeVariant::Destructive,
                                                                StatusBadge::LowStock => BadgeVariant::Warning,
                                                            };
                                                            view! { <Badge variant=variant>{b.label()}</Badge> }
                                                        })
                                                        .collect_view()}
                                                </div>
                                            </TableCell>
                                            <TableCell class="text-right whitespace-nowrap">
                                                {on_edit.map(move |cb| view! {
                                                    <Button
                                                        variant=ButtonVariant::Ghost
                                                        size=ButtonSize::Sm
                                                        attr:disabled=move || pending.get()
                                                        on:click=move |_| cb.run(edit_item.clone())
                                                    >
                                                        "Edit"
                                                    </Button>
                                                })}
                                                {on_delete.map(move |cb| view! {
                                                    <Button
                                                        variant=ButtonVariant::Ghost
                                                        size=ButtonSize::Sm
                                                        class="text-destructive"
                                                        attr:disabled=move || pending.get()
                                                        on:click=move |_| cb.run(delete_item.clone())
                                                    >
                                                        "Delete"
                                                    </Button>
                                                })}
                                            </TableCell>
                                        })}
                                    </tr>
                                }
                            }
                        />
                    </Show>
                </TableBody>
            </Table>
        </TableWrapper>
    }
}
