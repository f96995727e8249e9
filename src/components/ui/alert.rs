use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

#[component]
pub fn Alert(
    #[prop(into, optional)] variant: Signal<AlertVariant>,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let merged_class = move || {
        let variant = variant.get();
        let alert = AlertClass { variant };
        alert.with_class(class.clone())
    };

    view! {
        <div class=merged_class role="alert">
            {children()}
        </div>
    }
}

#[derive(TwClass, Default)]
#[tw(class = "relative w-full rounded-lg border px-4 py-3 text-sm flex items-start gap-2 [&_svg]:size-4 [&_svg]:shrink-0 [&_svg]:mt-0.5")]
pub struct AlertClass {
    variant: AlertVariant,
}

#[derive(TwVariant)]
pub enum AlertVariant {
    #[tw(default, class = "bg-card text-card-foreground")]
    Default,
    #[tw(class = "border-destructive/30 text-destructive bg-destructive/5")]
    Destructive,
    #[tw(class = "border-amber-500/40 text-amber-800 bg-amber-50 dark:text-amber-300 dark:bg-amber-500/10")]
    Warning,
}

mod components {
    use super::*;
    clx! {AlertDescription, div, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;
