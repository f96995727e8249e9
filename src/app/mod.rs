use crate::pages::{
    AddItemPage, DashboardPage, InventoryPage, LandingPage, LoginPage, ReportsPage, RootAuthed,
    SettingsPage, SignupPage,
};
use crate::state::{AppContext, AppState, InventorySync};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

fn apply_dark_class(dark: bool) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let _ = root.class_list().toggle_with_force("dark", dark);
}

#[component]
pub fn App() -> impl IntoView {
    let app = AppContext(AppState::new());
    provide_context(app);
    // One live mirror for the whole app; pages subscribe through `use_inventory`.
    provide_context(InventorySync::new(app));

    Effect::new(move |_| apply_dark_class(app.0.dark_mode.get()));

    // Router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("signup") view=SignupPage />
                <Route path=path!("dashboard") view=move || view! {
                    <RootAuthed>
                        <DashboardPage />
                    </RootAuthed>
                } />
                <Route path=path!("inventory") view=move || view! {
                    <RootAuthed>
                        <InventoryPage />
                    </RootAuthed>
                } />
                <Route path=path!("add") view=move || view! {
                    <RootAuthed>
                        <AddItemPage />
                    </RootAuthed>
                } />
                <Route path=path!("reports") view=move || view! {
                    <RootAuthed>
                        <ReportsPage />
                    </RootAuthed>
                } />
                <Route path=path!("settings") view=move || view! {
                    <RootAuthed>
                        <SettingsPage />
                    </RootAuthed>
                } />
                <Route path=path!("") view=LandingPage />
            </Routes>
        </Router>
    }
}
