//! Creation form for user accounts.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::use_data_cache;
use crate::model::{CreateUtilisateurRequest, ROLE_ADMIN};
use crate::session::normalize_phone;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const MIN_PASSWORD_LEN: usize = 6;

#[component]
pub fn AddUtilisateurPage() -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();
    let router = use_router();

    let (nom, set_nom) = signal(String::new());
    let (prenom, set_prenom) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (telephone, set_telephone) = signal(String::new());
    let (mot_de_passe, set_mot_de_passe) = signal(String::new());
    let (role, set_role) = signal(ROLE_ADMIN.to_string());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();

            let request = CreateUtilisateurRequest {
                nom: nom.get().trim().to_string(),
                prenom: prenom.get().trim().to_string(),
                email: email.get().trim().to_string(),
                telephone: normalize_phone(&telephone.get()),
                mot_de_passe: mot_de_passe.get(),
                role: role.get(),
            };

            if request.nom.is_empty()
                || request.prenom.is_empty()
                || request.email.is_empty()
                || request.telephone.is_empty()
            {
                set_error_msg.set(Some("Veuillez remplir tous les champs.".to_string()));
                return;
            }
            if request.mot_de_passe.len() < MIN_PASSWORD_LEN {
                set_error_msg.set(Some(
                    "Le mot de passe doit contenir au moins 6 caractères.".to_string(),
                ));
                return;
            }

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                match api.create_utilisateur(&request).await {
                    Ok(created) => {
                        cache.utilisateurs.add(created);
                        set_success_msg.set(Some("Utilisateur créé avec succès.".to_string()));
                        set_timeout(
                            move || router.navigate_to(AppRoute::Users),
                            Duration::from_secs(2),
                        );
                    }
                    Err(e) => {
                        let message = match e.status() {
                            Some(409) => {
                                "Un utilisateur avec ce téléphone ou cet email existe déjà."
                                    .to_string()
                            }
                            _ => e.user_message("la création de l'utilisateur"),
                        };
                        set_error_msg.set(Some(message));
                    }
                }
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="max-w-2xl space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"Ajouter un utilisateur"</h2>
                <button
                    class="btn btn-ghost btn-sm"
                    on:click=move |_| router.navigate_to(AppRoute::Users)
                >
                    "Retour"
                </button>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>
            <Show when=move || success_msg.get().is_some()>
                <div role="alert" class="alert alert-success text-sm py-2">
                    <span>{move || success_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <form class="card bg-base-100 shadow p-6 space-y-4" on:submit=on_submit>
                <div class="grid grid-cols-2 gap-4">
                    <div class="form-control">
                        <label class="label" for="nom">
                            <span class="label-text">"Nom"</span>
                        </label>
                        <input
                            id="nom"
                            type="text"
                            class="input input-bordered"
                            on:input=move |ev| set_nom.set(event_target_value(&ev))
                            prop:value=nom
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="prenom">
                            <span class="label-text">"Prénom"</span>
                        </label>
                        <input
                            id="prenom"
                            type="text"
                            class="input input-bordered"
                            on:input=move |ev| set_prenom.set(event_target_value(&ev))
                            prop:value=prenom
                            required
                        />
                    </div>
                </div>

                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        class="input input-bordered"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        required
                    />
                </div>

                <div class="form-control">
                    <label class="label" for="telephone">
                        <span class="label-text">"Téléphone"</span>
                    </label>
                    <input
                        id="telephone"
                        type="tel"
                        placeholder="+226 70 00 00 00"
                        class="input input-bordered"
                        on:input=move |ev| set_telephone.set(event_target_value(&ev))
                        prop:value=telephone
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
                        class="input input-bordered"
                        on:input=move |ev| set_mot_de_passe.set(event_target_value(&ev))
                        prop:value=mot_de_passe
                        required
                    />
                </div>

                <div class="form-control">
                    <label class="label" for="role">
                        <span class="label-text">"Rôle"</span>
                    </label>
                    <select
                        id="role"
                        class="select select-bordered"
                        on:change=move |ev| set_role.set(event_target_value(&ev))
                        prop:value=role
                    >
                        <option value="ADMIN">"Administrateur"</option>
                        <option value="UTILISATEUR">"Utilisateur"</option>
                    </select>
                </div>

                <div class="form-control mt-4">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || {
                            if is_submitting.get() {
                                view! {
                                    <span class="loading loading-spinner"></span>
                                    "Création..."
                                }
                                    .into_any()
                            } else {
                                "Créer l'utilisateur".into_any()
                            }
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}
