use crate::components::hooks::use_random::use_random_id_for;
use crate::components::ui::{
    Alert, AlertDescription, AlertVariant, Button, ButtonSize, ButtonVariant, FieldError,
    FieldInput, Label, Spinner,
};
use crate::drafts::{EditSession, FormField, Submission};
use leptos::prelude::*;

/// Add/edit form for one item. All state lives in `session` so the owning
/// page can reconcile it against live data.
#[component]
pub fn InventoryForm(
    session: RwSignal<EditSession>,
    #[prop(into)] on_submit: Callback<Submission>,
    /// Existing categories, offered as suggestions.
    #[prop(into, optional)] categories: Signal<Vec<String>>,
    #[prop(into, optional)] submitting: Signal<bool>,
) -> impl IntoView {
    let name_id = use_random_id_for("name");
    let category_id = use_random_id_for("category");
    let quantity_id = use_random_id_for("quantity");
    let expiry_id = use_random_id_for("expiry");
    let categories_list_id = use_random_id_for("categories");

    let editing = Memo::new(move |_| session.with(|s| s.is_editing()));
    let conflict = Memo::new(move |_| session.with(|s| s.has_conflict()));

    let value = move |field: FormField| Signal::derive(move || session.with(|s| s.form().get(field).to_string()));
    let error = move |field: FormField| Signal::derive(move || session.with(|s| s.errors().get(field)));
    let invalid = move |field: FormField| Signal::derive(move || session.with(|s| s.errors().get(field).is_some()));
    let setter = move |field: FormField| Callback::new(move |v: String| session.update(|s| s.set_field(field, v)));

    let on_form_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        if let Some(Ok(submission)) = session.try_update(|s| s.submit()) {
            on_submit.run(submission);
        }
    };

    view! {
        <form class="grid gap-3 sm:grid-cols-2 lg:grid-cols-4" on:submit=on_form_submit>
            <Show when=move || conflict.get() fallback=|| ().into_view()>
                <div class="sm:col-span-2 lg:col-span-4">
                    <Alert variant=AlertVariant::Warning>
                        <AlertDescription class="flex w-full items-center justify-between gap-3 text-xs">
                            <span>"This item was changed elsewhere. Your edits are kept."</span>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:r#type="button"
                                on:click=move |_| session.update(|s| {
                                    s.reload_remote();
                                })
                            >
                                "Load latest"
                            </Button>
                        </AlertDescription>
                    </Alert>
                </div>
            </Show>

            <div class="flex flex-col gap-1.5">
                <Label html_for=name_id.clone() class="text-xs">"Name"</Label>
                <FieldInput
                    id=name_id
                    placeholder="Item name"
                    value=value(FormField::Name)
                    on_value=setter(FormField::Name)
                    invalid=invalid(FormField::Name)
                />
                <FieldError message=error(FormField::Name) />
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for=category_id.clone() class="text-xs">"Category"</Label>
                <FieldInput
                    id=category_id
                    placeholder="Category"
                    list=categories_list_id.clone()
                    value=value(FormField::Category)
                    on_value=setter(FormField::Category)
                    invalid=invalid(FormField::Category)
                />
                <datalist id=categories_list_id>
                    <For
                        each=move || categories.get()
                        key=|c| c.clone()
                        children=|c| view! { <option value=c></option> }
                    />
                </datalist>
                <FieldError message=error(FormField::Category) />
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for=quantity_id.clone() class="text-xs">"Quantity"</Label>
                <FieldInput
                    id=quantity_id
                    r#type="number"
                    min="0".to_string()
                    step="1".to_string()
                    placeholder="0"
                    value=value(FormField::Quantity)
                    on_value=setter(FormField::Quantity)
                    invalid=invalid(FormField::Quantity)
                />
                <FieldError message=error(FormField::Quantity) />
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for=expiry_id.clone() class="text-xs">"Expiry date"</Label>
                <FieldInput
                    id=expiry_id
                    r#type="date"
                    value=value(FormField::ExpiryDate)
                    on_value=setter(FormField::ExpiryDate)
                    invalid=invalid(FormField::ExpiryDate)
                />
                <FieldError message=error(FormField::ExpiryDate) />
            </div>

            <div class="flex items-center gap-2 sm:col-span-2 lg:col-span-4">
                <Button size=ButtonSize::Sm attr:r#type="submit" attr:disabled=move || submitting.get()>
                    <span class="inline-flex items-center gap-2">
                        <Show when=move || submitting.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        {move || if editing.get() { "Update Item" } else { "Add Item" }}
                    </span>
                </Button>
                <Show when=move || editing.get() fallback=|| ().into_view()>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:r#type="button"
                        on:click=move |_| session.update(|s| s.cancel())
                    >
                        "Cancel"
                    </Button>
                </Show>
            </div>
        </form>
    }
}
