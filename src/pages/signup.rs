use crate::components::ui::{
    Alert, AlertDescription, AlertVariant, Button, ButtonSize, Card, CardContent, CardDescription,
    CardHeader, CardTitle, Input, Label, NativeSelect, SelectOption, Spinner,
};
use crate::models::{Role, UserProfile};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use std::str::FromStr;
use strum::IntoEnumIterator;

pub(super) const MIN_PASSWORD_LEN: usize = 6;

/// Checks the form before any request goes out.
pub(crate) fn validate_signup(email: &str, password: &str, role: &str) -> Result<Role, String> {
    if email.trim().is_empty() {
        return Err("Email is required.".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password should be at least 6 characters.".to_string());
    }
    Role::from_str(role).map_err(|_| "Please select a role.".to_string())
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let role: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let role_options = Signal::derive(|| {
        Role::iter()
            .map(|r| SelectOption::new(r.to_string(), r.label()))
            .collect::<Vec<_>>()
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get().trim().to_string();
        let password_val = password.get();

        let role_val = match validate_signup(&email_val, &password_val, &role.get()) {
            Ok(r) => r,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };

        let api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let session = match api_client.sign_up(&email_val, &password_val).await {
                Ok(s) => s,
                Err(e) => {
                    error.set(Some(e.message));
                    loading.set(false);
                    return;
                }
            };

            let uid = session.uid.clone();
            app_state.0.set_session(session);

            let profile = UserProfile {
                email: email_val,
                role: Some(role_val),
            };
            let client = app_state.0.api_client.get_untracked();
            if let Err(e) = client.set_profile(&uid, &profile).await {
                // The account exists; the profile can be fixed later.
                log::warn!("profile write failed for {uid}: {e}");
                app_state.0.toasts.error(format!("Could not save your role: {}", e.message));
            }
            app_state.0.set_profile(profile);

            loading.set(false);
            navigate.with_value(|nav| nav("/dashboard", Default::default()));
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
                        <CardTitle class="text-lg">"Create account"</CardTitle>
                        <CardDescription class="text-xs">"Pick the role you work in."</CardDescription>
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
                                    autocomplete="new-password"
                                    placeholder="At least 6 characters"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="role" class="text-xs">"Role"</Label>
                                <NativeSelect
                                    id="role"
                                    placeholder="Select a role".to_string()
                                    required=true
                                    options=role_options
                                    bind_value=role
                                    class="h-8"
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
                                    {move || if loading.get() { "Creating account..." } else { "Sign up" }}
                                </span>
                            </Button>

                            <div class="pt-1 text-xs text-muted-foreground">
                                "Already have an account? "
                                <a class="text-primary underline underline-offset-4" href="/login">"Log in"</a>
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

    #[test]
    fn test_validate_signup() {
        assert_eq!(validate_signup("a@b.c", "secret", "staff"), Ok(Role::Staff));
        assert_eq!(
            validate_signup("a@b.c", "12345", "admin").unwrap_err(),
            "Password should be at least 6 characters."
        );
        assert_eq!(
            validate_signup("a@b.c", "secret", "").unwrap_err(),
            "Please select a role."
        );
        assert_eq!(
            validate_signup(" ", "secret", "admin").unwrap_err(),
            "Email is required."
        );
    }
}
