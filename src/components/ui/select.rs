use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Native `<select>` bound to a string signal. An empty value selects the
/// placeholder option.
#[component]
pub fn NativeSelect(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] placeholder: Option<String>,
    #[prop(optional)] required: bool,
    #[prop(into, optional)] invalid: Signal<bool>,
    #[prop(into)] options: Signal<Vec<SelectOption>>,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "border-input dark:bg-input/30 h-9 w-full rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2 aria-invalid:border-destructive",
        class
    );

    let on_change = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(select) = target.dyn_ref::<web_sys::HtmlSelectElement>() {
                bind_value.set(select.value());
            }
        }
    };

    view! {
        <select
            data-name="NativeSelect"
            id=id
            class=merged_class
            required=required
            aria-invalid=move || if invalid.get() { "true" } else { "false" }
            prop:value=move || bind_value.get()
            on:change=on_change
        >
            {placeholder.map(|p| view! { <option value="">{p}</option> })}
            <For
                each=move || options.get()
                key=|o| o.value.clone()
                children=move |o| {
                    let value = o.value.clone();
                    view! {
                        <option value=o.value selected=move || bind_value.get() == value>
                            {o.label}
                        </option>
                    }
                }
            />
        </select>
    }
}
