use icons::Search;
use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const CONTROL_CLASS: &str = "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground dark:bg-input/30 border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50 md:text-sm focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2 aria-invalid:ring-destructive/20 dark:aria-invalid:ring-destructive/40 aria-invalid:border-destructive";

#[component]
pub fn Input(
    // Styling
    #[prop(into, optional)] class: String,

    // Common HTML attributes
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] name: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] autocomplete: String,
    #[prop(into, optional)] disabled: Signal<bool>,
    #[prop(optional)] required: bool,
    #[prop(optional)] autofocus: bool,
    #[prop(into, optional)] invalid: Signal<bool>,

    // Two-way binding, wired by hand instead of `bind:value`.
    #[prop(into)] bind_value: RwSignal<String>,

    // Ref for direct DOM access
    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!(CONTROL_CLASS, class);

    let on_input = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
                bind_value.set(input.value());
            }
        }
    };

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            name=name
            id=id
            autocomplete=autocomplete
            disabled=move || disabled.get()
            required=required
            autofocus=autofocus
            aria-invalid=move || if invalid.get() { "true" } else { "false" }
            prop:value=move || bind_value.get()
            on:input=on_input
            node_ref=node_ref
        />
    }
}

/// Search box with a leading icon slot.
#[component]
pub fn SearchInput(
    #[prop(into, optional)] placeholder: String,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div class="relative w-full sm:max-w-xs">
            <Search class="pointer-events-none absolute left-2.5 top-2.5 size-4 text-muted-foreground" />
            <Input
                r#type="search"
                class="pl-8"
                placeholder=placeholder
                bind_value=bind_value
            />
        </div>
    }
}

/// Controlled input whose value lives elsewhere (e.g. inside a larger form state).
#[component]
pub fn FieldInput(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] min: Option<String>,
    #[prop(into, optional)] step: Option<String>,
    #[prop(into, optional)] list: Option<String>,
    #[prop(into, optional)] invalid: Signal<bool>,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_value: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(CONTROL_CLASS, class);

    let on_input = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
                on_value.run(input.value());
            }
        }
    };

    view! {
        <input
            data-name="FieldInput"
            type=r#type
            class=merged_class
            id=id
            placeholder=placeholder
            min=min
            step=step
            list=list
            aria-invalid=move || if invalid.get() { "true" } else { "false" }
            prop:value=move || value.get()
            on:input=on_input
        />
    }
}
