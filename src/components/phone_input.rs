//! First step of the admin login: asks for a phone number and triggers the
//! SMS code delivery.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::session::{KEY_PENDING_PHONE, normalize_phone};
use crate::web::SessionStore;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn PhoneInputPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let (telephone, set_telephone) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let normalized = normalize_phone(&telephone.get());
        if normalized.is_empty() {
            set_error_msg.set(Some("Veuillez saisir un numéro de téléphone.".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match api.connexion_admin(&normalized).await {
                Ok(()) => {
                    // The verification screen needs the number to resend.
                    SessionStore::set(KEY_PENDING_PHONE, &normalized);
                    router.navigate_to(AppRoute::SmsCode);
                }
                Err(e) => {
                    set_error_msg.set(Some(e.user_message("l'envoi du code")));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"FasoDocs Admin"</h1>
                    <p class="text-base-content/70 mt-2">
                        "Saisissez votre numéro de téléphone pour recevoir un code de vérification"
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="telephone">
                                <span class="label-text">"Numéro de téléphone"</span>
                            </label>
                            <input
                                id="telephone"
                                type="tel"
                                placeholder="+226 70 00 00 00"
                                on:input=move |ev| set_telephone.set(event_target_value(&ev))
                                prop:value=telephone
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Envoi en cours..."
                                        }
                                            .into_any()
                                    } else {
                                        "Recevoir le code".into_any()
                                    }
                                }}
                            </button>
                        </div>

                        <div class="text-center mt-2">
                            <a
                                class="link link-hover text-sm"
                                on:click=move |_| router.navigate_to(AppRoute::Login)
                            >
                                "Se connecter avec un mot de passe"
                            </a>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
