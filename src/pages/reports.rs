use super::dashboard::KpiCard;
use crate::charts::show_bar_labels;
use crate::components::ui::{Card, CardContent, CardDescription, CardHeader, CardTitle};
use crate::components::{BarChart, PieChart};
use crate::state::inventory_sync::use_inventory;
use crate::view_model::{category_histogram, kpis, stock_levels};
use leptos::prelude::*;

#[component]
pub fn ReportsPage() -> impl IntoView {
    let sync = use_inventory();
    let items = sync.items();
    let loading = sync.loading();
    let today = sync.today();

    let stats = Memo::new(move |_| items.with(|i| kpis(i, today.get())));
    let histogram = Memo::new(move |_| items.with(|i| category_histogram(i)));
    let levels = Memo::new(move |_| items.with(|i| stock_levels(i)));

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-xl font-semibold">"Reports"</h1>
                <p class="text-sm text-muted-foreground">"Stock health across the whole inventory."</p>
            </div>

            <Show
                when=move || !(loading.get() && items.with(|i| i.is_empty()))
                fallback=|| view! { <p class="text-sm text-muted-foreground">"Loading..."</p> }
            >
                <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4">
                    <KpiCard title="Expired" value=Signal::derive(move || stats.get().expired) tone="text-destructive" />
                    <KpiCard
                        title="Expiring Soon (7 days)"
                        value=Signal::derive(move || stats.get().expiring_soon)
                        tone="text-amber-600"
                    />
                    <KpiCard title="Low Stock" value=Signal::derive(move || stats.get().low_stock) tone="text-amber-600" />
                    <KpiCard title="Total Items" value=Signal::derive(move || stats.get().total) />
                </div>

                <div class="grid gap-4 lg:grid-cols-2">
                    <Card>
                        <CardHeader>
                            <CardTitle class="text-sm">"Category distribution"</CardTitle>
                        </CardHeader>
                        <CardContent>
                            <PieChart data=histogram show_labels=true />
                        </CardContent>
                    </Card>
                    <Card>
                        <CardHeader>
                            <CardTitle class="text-sm">"Stock levels"</CardTitle>
                            <Show when=move || !show_bar_labels(levels.with(|l| l.len())) fallback=|| ().into_view()>
                                <CardDescription class="text-xs">
                                    "Item names are hidden when there are more than 10 items."
                                </CardDescription>
                            </Show>
                        </CardHeader>
                        <CardContent>
                            <BarChart data=levels label="Quantity per item" />
                        </CardContent>
                    </Card>
                </div>
            </Show>
        </div>
    }
}
