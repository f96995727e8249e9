use crate::components::ui::{
    Card, CardContent, CardDescription, CardHeader, CardItem, CardList, CardTitle, KpiValue,
};
use crate::components::{BarChart, InventoryTable, PieChart};
use crate::state::inventory_sync::use_inventory;
use crate::view_model::{
    category_histogram, expiring_soon, format_date_in, kpis, recent_items, ExpiringItem,
};
use leptos::prelude::*;

const RECENT_LIMIT: usize = 5;
const EXPIRING_LIMIT: usize = 5;

#[component]
pub fn KpiCard(
    title: &'static str,
    #[prop(into)] value: Signal<usize>,
    #[prop(optional)] tone: &'static str,
) -> impl IntoView {
    view! {
        <Card class="gap-2 py-4">
            <CardHeader class="px-4">
                <CardDescription class="text-xs">{title}</CardDescription>
            </CardHeader>
            <CardContent class="px-4">
                <KpiValue class=tone>{move || value.get()}</KpiValue>
            </CardContent>
        </Card>
    }
}

pub(crate) fn days_label(days: i64) -> String {
    format!("{days} day(s)")
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let sync = use_inventory();
    let items = sync.items();
    let loading = sync.loading();
    let today = sync.today();

    let stats = Memo::new(move |_| items.with(|i| kpis(i, today.get())));
    let histogram = Memo::new(move |_| items.with(|i| category_histogram(i)));
    let histogram_bars = Signal::derive(move || {
        histogram.with(|h| {
            h.iter()
                .map(|c| (c.name.clone(), c.value as i64))
                .collect::<Vec<_>>()
        })
    });
    let recent = Memo::new(move |_| items.with(|i| recent_items(i, RECENT_LIMIT)));
    let expiring = Memo::new(move |_| items.with(|i| expiring_soon(i, today.get(), EXPIRING_LIMIT)));

    let is_empty = move || items.with(|i| i.is_empty());

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-xl font-semibold">"Dashboard"</h1>
                <p class="text-sm text-muted-foreground">"Overview of your inventory."</p>
            </div>

            <Show
                when=move || !(loading.get() && is_empty())
                fallback=|| view! { <p class="text-sm text-muted-foreground">"Loading..."</p> }
            >
                <Show
                    when=move || !is_empty()
                    fallback=|| view! { <p class="text-sm text-muted-foreground">"No inventory found."</p> }
                >
                    <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4">
                        <KpiCard title="Total Items" value=Signal::derive(move || stats.get().total) />
                        <KpiCard title="Low Stock" value=Signal::derive(move || stats.get().low_stock) tone="text-amber-600" />
                        <KpiCard title="Expired" value=Signal::derive(move || stats.get().expired) tone="text-destructive" />
                        <KpiCard title="Categories" value=Signal::derive(move || stats.get().categories) />
                    </div>

                    <div class="grid gap-4 lg:grid-cols-2">
                        <Card>
                            <CardHeader>
                                <CardTitle class="text-sm">"Items by category"</CardTitle>
                            </CardHeader>
                            <CardContent>
                                <PieChart data=histogram />
                            </CardContent>
                        </Card>
                        <Card>
                            <CardHeader>
                                <CardTitle class="text-sm">"Category counts"</CardTitle>
                            </CardHeader>
                            <CardContent>
                                <BarChart data=histogram_bars label="Items per category" />
                            </CardContent>
                        </Card>
                    </div>

                    <div class="grid gap-4 lg:grid-cols-2">
                        <Card>
                            <CardHeader>
                                <CardTitle class="text-sm">"Recently Added"</CardTitle>
                            </CardHeader>
                            <CardContent>
                                <CardList>
                                    <For
                                        each=move || recent.get()
                                        key=|i| i.id.clone()
                                        children=|i| view! {
                                            <CardItem>
                                                <span class="truncate">{i.name}</span>
                                                <span class="text-muted-foreground tabular-nums">{i.quantity}</span>
                                            </CardItem>
                                        }
                                    />
                                </CardList>
                            </CardContent>
                        </Card>
                        <Card>
                            <CardHeader>
                                <CardTitle class="text-sm">"Expiring Soon"</CardTitle>
                            </CardHeader>
                            <CardContent>
                                <Show
                                    when=move || !expiring.with(|e| e.is_empty())
                                    fallback=|| view! { <p class="text-sm text-muted-foreground">"Nothing expires this week."</p> }
                                >
                                    <CardList>
                                        <For
                                            each=move || expiring.get()
                                            key=|e: &ExpiringItem| e.item.id.clone()
                                            children=|e: ExpiringItem| view! {
                                                <CardItem>
                                                    <span class="truncate">{e.item.name.clone()}</span>
                                                    <span class="text-amber-600 whitespace-nowrap">
                                                        {days_label(e.days_left)}
                                                        <span class="ml-2 text-muted-foreground">{format_date_in(e.item.expiry_date)}</span>
                                                    </span>
                                                </CardItem>
                                            }
                                        />
                                    </CardList>
                                </Show>
                            </CardContent>
                        </Card>
                    </div>

                    <div class="space-y-2">
                        <h2 class="text-sm font-semibold">"All items"</h2>
                        <InventoryTable items=items empty_text="No inventory found." />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_label() {
        assert_eq!(days_label(1), "1 day(s)");
        assert_eq!(days_label(3), "3 day(s)");
    }
}
