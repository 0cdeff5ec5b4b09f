//! Second step of the admin login: verifies the 4-digit SMS code. Offers a
//! resend link throttled by a 60 second countdown.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::model::ROLE_ADMIN;
use crate::session::{KEY_PENDING_PHONE, use_session};
use crate::web::SessionStore;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const RESEND_COOLDOWN_SECS: u32 = 60;

/// Countdown guarding the resend link. A code was already sent by the
/// previous screen, so the throttle is armed as soon as the page mounts,
/// then re-armed after every resend.
#[derive(Clone, Copy)]
pub struct ResendThrottle {
    remaining: RwSignal<u32>,
}

impl ResendThrottle {
    pub fn new() -> Self {
        Self { remaining: RwSignal::new(0) }
    }

    pub fn arm(&self, secs: u32) {
        self.remaining.set(secs);
    }

    pub fn tick(&self) {
        self.remaining.update(|c| {
            if *c > 0 {
                *c -= 1;
            }
        });
    }

    /// Reactive: `true` once the countdown has run out.
    pub fn ready(&self) -> bool {
        self.remaining.get() == 0
    }

    /// Reactive: seconds left before a resend is allowed.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining.get()
    }
}

#[component]
pub fn SmsCodePage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let router = use_router();

    // No pending number means the user landed here directly; send them back
    // to the start of the flow.
    let pending_phone = SessionStore::get(KEY_PENDING_PHONE).unwrap_or_default();
    if pending_phone.is_empty() {
        Effect::new(move |_| {
            router.navigate_to(AppRoute::PhoneInput);
        });
    }

    let (code, set_code) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (info_msg, set_info_msg) = signal(Option::<String>::None);
    let throttle = ResendThrottle::new();

    // One interval drives the countdown; it is started when the throttle is
    // armed and stops itself once the countdown has run out.
    let start_cooldown = move || {
        throttle.arm(RESEND_COOLDOWN_SECS);
        let handle = set_interval_with_handle(
            move || throttle.tick(),
            Duration::from_secs(1),
        );
        if let Ok(handle) = handle {
            set_timeout(
                move || handle.clear(),
                Duration::from_secs(u64::from(RESEND_COOLDOWN_SECS) + 1),
            );
        }
    };

    // The first code went out on the previous screen, so the cooldown is
    // already running when this one appears.
    start_cooldown();

    let on_resend = {
        let pending_phone = pending_phone.clone();
        let api = api.clone();
        move |_| {
            if !throttle.ready() {
                return;
            }
            let api = api.clone();
            let telephone = pending_phone.clone();
            set_error_msg.set(None);
            spawn_local(async move {
                match api.connexion_admin(&telephone).await {
                    Ok(()) => {
                        set_info_msg.set(Some("Un nouveau code vous a été envoyé.".to_string()));
                        start_cooldown();
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("l'envoi du code")));
                    }
                }
            });
        }
    };

    let on_submit = {
        let pending_phone = pending_phone.clone();
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let entered = code.get();
            if entered.len() != 4 || !entered.chars().all(|c| c.is_ascii_digit()) {
                set_error_msg.set(Some("Le code doit contenir 4 chiffres.".to_string()));
                return;
            }

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let api = api.clone();
            let telephone = pending_phone.clone();
            spawn_local(async move {
                match api.verifier_sms_admin(&telephone, &entered).await {
                    Ok(response) => match response.bearer() {
                        Some(token) => {
                            session.open(&api, token, &telephone, ROLE_ADMIN);
                            // The router's auth effect takes over from here.
                        }
                        None => {
                            set_error_msg
                                .set(Some("Réponse du serveur invalide.".to_string()));
                        }
                    },
                    Err(e) => {
                        let message = match e.status() {
                            Some(400) | Some(401) => e
                                .server_message()
                                .map(str::to_string)
                                .unwrap_or_else(|| "Code incorrect ou expiré.".to_string()),
                            _ => e.user_message("la vérification"),
                        };
                        set_error_msg.set(Some(message));
                    }
                }
                set_is_submitting.set(false);
            });
        }
    };

    let displayed_phone = pending_phone.clone();

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Vérification"</h1>
                    <p class="text-base-content/70 mt-2">
                        "Un code à 4 chiffres a été envoyé au " {displayed_phone}
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <Show when=move || info_msg.get().is_some()>
                            <div role="alert" class="alert alert-info text-sm py-2">
                                <span>{move || info_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="code">
                                <span class="label-text">"Code de vérification"</span>
                            </label>
                            <input
                                id="code"
                                type="text"
                                inputmode="numeric"
                                maxlength="4"
                                placeholder="0000"
                                class="input input-bordered text-center text-2xl tracking-widest"
                                on:input=move |ev| set_code.set(event_target_value(&ev))
                                prop:value=code
                                required
                            />
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Vérification..."
                                        }
                                            .into_any()
                                    } else {
                                        "Valider".into_any()
                                    }
                                }}
                            </button>
                        </div>

                        <div class="text-center mt-2">
                            {move || {
                                let remaining = throttle.remaining_secs();
                                if remaining > 0 {
                                    view! {
                                        <span class="text-sm text-base-content/50">
                                            "Renvoyer le code dans " {remaining} " s"
                                        </span>
                                    }
                                        .into_any()
                                } else {
                                    view! {
                                        <a
                                            class="link link-hover text-sm"
                                            on:click=on_resend.clone()
                                        >
                                            "Renvoyer le code"
                                        </a>
                                    }
                                        .into_any()
                                }
                            }}
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_throttle_blocks_until_every_second_has_ticked() {
        let throttle = ResendThrottle::new();
        assert!(throttle.ready());

        throttle.arm(RESEND_COOLDOWN_SECS);
        assert!(!throttle.ready());
        assert_eq!(throttle.remaining_secs(), 60);

        for _ in 0..59 {
            throttle.tick();
        }
        assert!(!throttle.ready());
        assert_eq!(throttle.remaining_secs(), 1);

        throttle.tick();
        assert!(throttle.ready());
    }

    #[test]
    fn ticking_an_expired_throttle_does_not_underflow() {
        let throttle = ResendThrottle::new();
        throttle.tick();
        assert!(throttle.ready());
        assert_eq!(throttle.remaining_secs(), 0);
    }

    #[test]
    fn a_resend_re_arms_the_full_cooldown() {
        let throttle = ResendThrottle::new();
        throttle.arm(RESEND_COOLDOWN_SECS);
        for _ in 0..30 {
            throttle.tick();
        }
        assert_eq!(throttle.remaining_secs(), 30);

        throttle.arm(RESEND_COOLDOWN_SECS);
        assert_eq!(throttle.remaining_secs(), 60);
    }
}
