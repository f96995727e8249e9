use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {TableWrapper, div, "relative w-full overflow-x-auto rounded-lg border"}
    clx! {Table, table, "w-full caption-bottom text-sm"}
    clx! {TableHeader, thead, "[&_tr]:border-b bg-muted/40"}
    clx! {TableBody, tbody, "[&_tr:last-child]:border-0"}
    clx! {TableRow, tr, "border-b transition-colors hover:bg-muted/50"}
    clx! {TableHead, th, "h-10 px-3 text-left align-middle font-medium text-muted-foreground whitespace-nowrap"}
    clx! {TableCell, td, "p-3 align-middle"}
}

pub use components::*;
