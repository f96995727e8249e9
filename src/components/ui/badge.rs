use leptos::prelude::*;
use tw_merge::*;

#[component]
pub fn Badge(
    #[prop(into, optional)] variant: Signal<BadgeVariant>,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let merged_class = move || {
        let variant = variant.get();
        let badge = BadgeClass { variant };
        badge.with_class(class.clone())
    };

    view! { <span class=merged_class>{children()}</span> }
}

#[derive(TwClass, Default)]
#[tw(class = "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium whitespace-nowrap")]
pub struct BadgeClass {
    variant: BadgeVariant,
}

#[derive(TwVariant)]
pub enum BadgeVariant {
    #[tw(default, class = "border-transparent bg-secondary text-secondary-foreground")]
    Default,
    #[tw(class = "border-transparent bg-destructive/10 text-destructive")]
    Destructive,
    #[tw(class = "border-transparent bg-amber-100 text-amber-800 dark:bg-amber-500/15 dark:text-amber-300")]
    Warning,
    #[tw(class = "border-dashed text-muted-foreground")]
    Muted,
}
