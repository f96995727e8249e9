use crate::components::ui::{Card, CardContent, CardDescription, CardHeader, CardTitle};
use crate::components::InventoryForm;
use crate::drafts::{EditSession, Submission};
use crate::state::inventory_sync::use_inventory;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[component]
pub fn AddItemPage() -> impl IntoView {
    let sync = use_inventory();
    let items = sync.items();
    let navigate = StoredValue::new(use_navigate());

    let session: RwSignal<EditSession> = RwSignal::new(EditSession::new());
    let submitting: RwSignal<bool> = RwSignal::new(false);
    let categories = Memo::new(move |_| items.with(|i| crate::view_model::categories(i)));

    let on_submit = Callback::new(move |submission: Submission| {
        let Submission::Create(draft) = submission else {
            return;
        };
        submitting.set(true);
        spawn_local(async move {
            let created = sync.create(draft).await;
            submitting.set(false);
            if created.is_ok() {
                navigate.with_value(|nav| nav("/inventory", Default::default()));
            }
        });
    });

    view! {
        <div class="mx-auto max-w-3xl space-y-6">
            <div>
                <h1 class="text-xl font-semibold">"Add Item"</h1>
                <p class="text-sm text-muted-foreground">"Record a new product in the shared inventory."</p>
            </div>

            <Card>
                <CardHeader>
                    <CardTitle class="text-sm">"Item details"</CardTitle>
                    <CardDescription class="text-xs">"All fields are required."</CardDescription>
                </CardHeader>
                <CardContent>
                    <InventoryForm
                        session=session
                        on_submit=on_submit
                        categories=categories
                        submitting=submitting
                    />
                </CardContent>
            </Card>
        </div>
    }
}
