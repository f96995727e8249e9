use crate::components::ui::{Badge, BadgeVariant, Button, ButtonSize, ButtonVariant};
use crate::components::ToastArea;
use crate::pages::landing::DarkModeToggle;
use crate::pages::LoginPage;
use crate::state::{AppContext, InventorySync};
use icons::{ChartPie, LayoutDashboard, LogOut, Package, Plus, Settings};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};

/// Clears the session and every account cache, then shows the login page.
pub(crate) fn sign_out(app_state: AppContext, sync: InventorySync) {
    sync.reset();
    app_state.0.sign_out();
    log::info!("signed out");
}

#[derive(Clone, Copy)]
enum NavIcon {
    Dashboard,
    Inventory,
    Add,
    Reports,
    Settings,
}

const NAV_ITEMS: [(&str, &str, NavIcon); 5] = [
    ("/dashboard", "Dashboard", NavIcon::Dashboard),
    ("/inventory", "Inventory", NavIcon::Inventory),
    ("/add", "Add Item", NavIcon::Add),
    ("/reports", "Reports", NavIcon::Reports),
    ("/settings", "Settings", NavIcon::Settings),
];

fn nav_icon(icon: NavIcon) -> AnyView {
    match icon {
        NavIcon::Dashboard => view! { <LayoutDashboard /> }.into_any(),
        NavIcon::Inventory => view! { <Package /> }.into_any(),
        NavIcon::Add => view! { <Plus /> }.into_any(),
        NavIcon::Reports => view! { <ChartPie /> }.into_any(),
        NavIcon::Settings => view! { <Settings /> }.into_any(),
    }
}

#[component]
pub fn AppLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let sync = expect_context::<InventorySync>();
    let pathname = use_location().pathname;
    let navigate = StoredValue::new(use_navigate());

    // Profile (role) is loaded once per session.
    Effect::new(move |_| {
        let Some(uid) = app_state
            .0
            .api_client
            .with(|c| c.session().map(|s| s.uid.clone()))
        else {
            return;
        };
        if app_state.0.profile.with_untracked(|p| p.is_some()) {
            return;
        }

        let client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match client.get_profile(&uid).await {
                Ok(Some(profile)) => app_state.0.set_profile(profile),
                Ok(None) => log::info!("no profile document for {uid}"),
                Err(e) => log::warn!("profile load failed: {e}"),
            }
        });
    });

    let online = sync.online();

    let on_logout = move |_| {
        sign_out(app_state, sync);
        navigate.with_value(|nav| nav("/login", Default::default()));
    };

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex min-h-screen w-full max-w-6xl gap-6 px-4 py-6">
                <aside class="w-48 shrink-0">
                    <div class="sticky top-6 space-y-4">
                        <div class="flex items-center justify-between">
                            <a href="/" class="text-sm font-semibold text-foreground">"SmartInventory"</a>
                            <DarkModeToggle />
                        </div>

                        <nav class="flex flex-col gap-1">
                            {NAV_ITEMS
                                .into_iter()
                                .map(|(href, label, icon)| {
                                    let active = move || pathname.get() == href;
                                    view! {
                                        <a
                                            href=href
                                            aria-current=move || if active() { Some("page") } else { None }
                                            class=move || {
                                                if active() {
                                                    "flex items-center gap-2 rounded-md bg-accent px-3 py-2 text-sm font-medium text-accent-foreground [&_svg]:size-4"
                                                } else {
                                                    "flex items-center gap-2 rounded-md px-3 py-2 text-sm text-muted-foreground hover:bg-accent/50 hover:text-foreground [&_svg]:size-4"
                                                }
                                            }
                                        >
                                            {nav_icon(icon)}
                                            {label}
                                        </a>
                                    }
                                })
                                .collect_view()}
                        </nav>

                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            class="w-full justify-start text-muted-foreground"
                            on:click=on_logout
                        >
                            <LogOut />
                            "Logout"
                        </Button>

                        <Show when=move || !online.get() fallback=|| ().into_view()>
                            <Badge variant=BadgeVariant::Muted>"Offline, retrying…"</Badge>
                        </Show>
                    </div>
                </aside>

                <main class="min-w-0 flex-1">
                    {children()}
                </main>
            </div>
            <ToastArea />
        </div>
    }
}

#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.with(|c| c.is_authenticated());

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <AppLayout>
                {move || children.with_value(|c| c())}
            </AppLayout>
        </Show>
    }
}
