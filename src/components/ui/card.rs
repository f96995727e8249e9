use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "bg-card text-card-foreground flex flex-col gap-4 rounded-xl border py-6 shadow-sm"}
    clx! {CardHeader, div, "flex flex-col items-start gap-1.5 px-6"}
    clx! {CardTitle, h2, "leading-none font-semibold"}
    clx! {CardContent, div, "px-6"}
    clx! {CardDescription, p, "text-muted-foreground text-sm"}

    // Dashboard/report figures.
    clx! {KpiValue, p, "text-3xl font-semibold tabular-nums"}
    clx! {CardList, ul, "flex flex-col divide-y"}
    clx! {CardItem, li, "flex items-center justify-between gap-3 py-2 text-sm"}
}

pub use components::*;
