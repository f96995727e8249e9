use crate::components::ui::{
    Alert, AlertDescription, AlertVariant, Button, ButtonSize, Card, CardContent, CardDescription,
    CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::api::{ApiError, ApiErrorKind};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

/// Inline alert text for a failed sign-in.
fn login_error_message(e: &ApiError) -> String {
    match e.kind {
        ApiErrorKind::Auth => e.message.clone(),
        ApiErrorKind::Network => "Could not reach the server. Check your connection.".to_string(),
        _ => "Invalid email or password.".to_string(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.sign_in(&email_val, &password_val).await {
                Ok(session) => {
                    log::info!("signed in as {}", session.email);
                    app_state.0.set_session(session);
                    navigate.with_value(|nav| nav("/dashboard", Default::default()));
                }
                Err(e) => {
                    error.set(Some(login_error_message(&e)));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"SmartInventory"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Log in"</CardTitle>
                        <CardDescription class="text-xs">"Use your email and password to continue."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    autocomplete="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    autocomplete="current-password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| {
                                        view! {
                                            <Alert variant=AlertVariant::Destructive>
                                                <AlertDescription class="text-xs">{e}</AlertDescription>
                                            </Alert>
                                        }
                                    })
                                }}
                            </Show>

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Log in" }}
                                </span>
                            </Button>

                            <div class="pt-1 text-xs text-muted-foreground">
                                "No account? "
                                <a class="text-primary underline underline-offset-4" href="/signup">"Sign up"</a>
                            </div>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(kind: ApiErrorKind, message: &str) -> ApiError {
        ApiError {
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_login_error_message_hides_transport_detail() {
        assert_eq!(
            login_error_message(&err(ApiErrorKind::Auth, "Too many attempts. Try again later.")),
            "Too many attempts. Try again later."
        );
        assert_eq!(
            login_error_message(&err(ApiErrorKind::Network, "error sending request for url")),
            "Could not reach the server. Check your connection."
        );
        for kind in [ApiErrorKind::Http, ApiErrorKind::Parse, ApiErrorKind::Unauthorized] {
            assert_eq!(
                login_error_message(&err(kind, "sign in (400 Bad Request): junk")),
                "Invalid email or password."
            );
        }
    }
}
