use super::layout::sign_out;
use super::signup::MIN_PASSWORD_LEN;
use crate::components::ui::{
    Alert, AlertDescription, AlertVariant, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::state::{AppContext, InventorySync};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

pub(crate) fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), String> {
    if current.is_empty() {
        return Err("Current password is required.".to_string());
    }
    if new != confirm {
        return Err("New passwords do not match.".to_string());
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password should be at least 6 characters.".to_string());
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Outcome {
    Saved,
    Failed(String),
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let sync = expect_context::<InventorySync>();
    let navigate = StoredValue::new(use_navigate());

    let current: RwSignal<String> = RwSignal::new(String::new());
    let new_password: RwSignal<String> = RwSignal::new(String::new());
    let confirm: RwSignal<String> = RwSignal::new(String::new());
    let outcome: RwSignal<Option<Outcome>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);

    let email = move || {
        app_state
            .0
            .profile
            .with(|p| p.as_ref().map(|p| p.email.clone()))
            .or_else(|| {
                app_state
                    .0
                    .api_client
                    .with(|c| c.session().map(|s| s.email.clone()))
            })
            .unwrap_or_default()
    };
    let role = move || {
        app_state
            .0
            .profile
            .with(|p| p.as_ref().and_then(|p| p.role))
            .map(|r| r.label())
            .unwrap_or("Unknown")
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }

        let current_val = current.get_untracked();
        let new_val = new_password.get_untracked();
        if let Err(msg) = validate_password_change(&current_val, &new_val, &confirm.get_untracked()) {
            outcome.set(Some(Outcome::Failed(msg)));
            return;
        }

        saving.set(true);
        outcome.set(None);

        spawn_local(async move {
            let result = async {
                let client = app_state.0.api_client.get_untracked();
                let session = client.reauthenticate(&current_val).await?;
                app_state.0.set_session(session);

                let client = app_state.0.api_client.get_untracked();
                let session = client.update_password(&new_val).await?;
                app_state.0.set_session(session);
                Ok::<_, crate::api::ApiError>(())
            }
            .await;

            match result {
                Ok(()) => {
                    log::info!("password updated");
                    current.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                    outcome.set(Some(Outcome::Saved));
                }
                Err(e) => {
                    log::warn!("password update failed: {e}");
                    outcome.set(Some(Outcome::Failed(format!(
                        "Failed to update password: {}",
                        e.message
                    ))));
                }
            }
            saving.set(false);
        });
    };

    let on_logout = move |_| {
        sign_out(app_state, sync);
        navigate.with_value(|nav| nav("/login", Default::default()));
    };

    view! {
        <div class="mx-auto max-w-2xl space-y-6">
            <div>
                <h1 class="text-xl font-semibold">"Settings"</h1>
                <p class="text-sm text-muted-foreground">"Your account and security."</p>
            </div>

            <Card>
                <CardHeader>
                    <CardTitle class="text-sm">"Profile"</CardTitle>
                </CardHeader>
                <CardContent>
                    <dl class="grid grid-cols-[6rem_1fr] gap-y-2 text-sm">
                        <dt class="text-muted-foreground">"Email"</dt>
                        <dd class="truncate">{email}</dd>
                        <dt class="text-muted-foreground">"Role"</dt>
                        <dd>{role}</dd>
                    </dl>
                </CardContent>
            </Card>

            <Card>
                <CardHeader>
                    <CardTitle class="text-sm">"Change password"</CardTitle>
                    <CardDescription class="text-xs">"You will need your current password."</CardDescription>
                </CardHeader>
                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="current-password" class="text-xs">"Current password"</Label>
                            <Input
                                id="current-password"
                                r#type="password"
                                autocomplete="current-password"
                                bind_value=current
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="new-password" class="text-xs">"New password"</Label>
                            <Input
                                id="new-password"
                                r#type="password"
                                autocomplete="new-password"
                                bind_value=new_password
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="confirm-password" class="text-xs">"Confirm new password"</Label>
                            <Input
                                id="confirm-password"
                                r#type="password"
                                autocomplete="new-password"
                                bind_value=confirm
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        {move || outcome.get().map(|o| match o {
                            Outcome::Saved => view! {
                                <Alert>
                                    <AlertDescription class="text-xs">"Password updated successfully."</AlertDescription>
                                </Alert>
                            }.into_any(),
                            Outcome::Failed(msg) => view! {
                                <Alert variant=AlertVariant::Destructive>
                                    <AlertDescription class="text-xs">{msg}</AlertDescription>
                                </Alert>
                            }.into_any(),
                        })}

                        <div>
                            <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || saving.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    "Update password"
                                </span>
                            </Button>
                        </div>
                    </form>
                </CardContent>
            </Card>

            <Card>
                <CardHeader>
                    <CardTitle class="text-sm">"Session"</CardTitle>
                </CardHeader>
                <CardContent>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        class="border-destructive/40 text-destructive"
                        on:click=on_logout
                    >
                        "Logout"
                    </Button>
                </CardContent>
            </Card>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_change_validation() {
        assert_eq!(
            validate_password_change("old", "newpass1", "newpass2"),
            Err("New passwords do not match.".to_string())
        );
        assert_eq!(
            validate_password_change("", "newpass1", "newpass1"),
            Err("Current password is required.".to_string())
        );
        assert!(validate_password_change("old", "abc", "abc").is_err());
        assert_eq!(validate_password_change("old", "newpass1", "newpass1"), Ok(()));
    }
}
