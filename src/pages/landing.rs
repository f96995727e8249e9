use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::state::AppContext;
use icons::{Moon, Sun};
use leptos::prelude::*;

#[component]
pub fn DarkModeToggle() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let dark = app_state.0.dark_mode;

    view! {
        <Button
            variant=ButtonVariant::Outline
            size=ButtonSize::Icon
            class="h-8 w-8"
            attr:title="Toggle dark mode"
            on:click=move |_| app_state.0.set_dark_mode(!dark.get_untracked())
        >
            {move || if dark.get() {
                view! { <Sun /> }.into_any()
            } else {
                view! { <Moon /> }.into_any()
            }}
        </Button>
    }
}

#[component]
pub fn LandingPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.with(|c| c.is_authenticated());

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <header class="mx-auto flex w-full max-w-5xl items-center justify-between px-4 py-4">
                <span class="text-sm font-semibold">"SmartInventory"</span>
                <DarkModeToggle />
            </header>

            <main class="mx-auto flex w-full max-w-3xl flex-col items-center gap-6 px-4 py-20 text-center">
                <h1 class="text-4xl font-semibold tracking-tight">"Know what is on your shelves."</h1>
                <p class="max-w-xl text-muted-foreground">
                    "Track quantities and expiry dates, get warned about low stock and expired goods, and see where your inventory sits by category. Changes made by your team show up live."
                </p>
                <div class="flex items-center gap-3">
                    <Show
                        when=is_authenticated
                        fallback=|| view! {
                            <Button href="/login">"Log in"</Button>
                            <Button href="/signup" variant=ButtonVariant::Outline>"Sign up"</Button>
                        }
                    >
                        <Button href="/dashboard">"Go to dashboard"</Button>
                    </Show>
                </div>

                <ul class="mt-8 grid w-full gap-4 text-left sm:grid-cols-3">
                    <li class="rounded-lg border p-4">
                        <p class="text-sm font-medium">"Live inventory"</p>
                        <p class="mt-1 text-xs text-muted-foreground">"Edits from other devices appear without a reload."</p>
                    </li>
                    <li class="rounded-lg border p-4">
                        <p class="text-sm font-medium">"Alerts"</p>
                        <p class="mt-1 text-xs text-muted-foreground">"Low stock and expired items are flagged as they happen."</p>
                    </li>
                    <li class="rounded-lg border p-4">
                        <p class="text-sm font-medium">"Reports"</p>
                        <p class="mt-1 text-xs text-muted-foreground">"Category breakdowns and stock levels at a glance."</p>
                    </li>
                </ul>
            </main>
        </div>
    }
}
