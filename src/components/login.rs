//! Username and password login, kept alongside the SMS flow.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::model::ROLE_ADMIN;
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let router = use_router();

    let (nom_utilisateur, set_nom_utilisateur) = signal(String::new());
    let (mot_de_passe, set_mot_de_passe) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if nom_utilisateur.get().trim().is_empty() || mot_de_passe.get().is_empty() {
                set_error_msg.set(Some("Veuillez remplir tous les champs.".to_string()));
                return;
            }

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                match api
                    .connexion(nom_utilisateur.get().trim(), &mot_de_passe.get())
                    .await
                {
                    Ok(response) => match response.bearer() {
                        Some(token) => {
                            session.open(&api, token, "", ROLE_ADMIN);
                        }
                        None => {
                            set_error_msg
                                .set(Some("Réponse du serveur invalide.".to_string()));
                        }
                    },
                    Err(e) => {
                        let message = match e.status() {
                            Some(401) => "Identifiants incorrects.".to_string(),
                            _ => e.user_message("la connexion"),
                        };
                        set_error_msg.set(Some(message));
                    }
                }
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"FasoDocs Admin"</h1>
                    <p class="text-base-content/70 mt-2">"Connexion par identifiants"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="nom-utilisateur">
                                <span class="label-text">"Nom d'utilisateur"</span>
                            </label>
                            <input
                                id="nom-utilisateur"
                                type="text"
                                on:input=move |ev| set_nom_utilisateur.set(event_target_value(&ev))
                                prop:value=nom_utilisateur
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="mot-de-passe">
                                <span class="label-text">"Mot de passe"</span>
                            </label>
                            <input
                                id="mot-de-passe"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_mot_de_passe.set(event_target_value(&ev))
                                prop:value=mot_de_passe
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
                                            "Connexion..."
                                        }
                                            .into_any()
                                    } else {
                                        "Se connecter".into_any()
                                    }
                                }}
                            </button>
                        </div>

                        <div class="text-center mt-2">
                            <a
                                class="link link-hover text-sm"
                                on:click=move |_| router.navigate_to(AppRoute::PhoneInput)
                            >
                                "Se connecter par SMS"
                            </a>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
