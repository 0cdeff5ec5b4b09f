//! Profile screen for the logged-in admin. Saving also refreshes the copy of
//! this account in the users cache so the table stays in sync.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::use_data_cache;
use crate::model::Utilisateur;
use crate::session::normalize_phone;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();

    let (profil, set_profil) = signal(Option::<Utilisateur>::None);
    let (loading, set_loading) = signal(true);
    let (nom, set_nom) = signal(String::new());
    let (prenom, set_prenom) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (telephone, set_telephone) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    {
        let api = api.clone();
        spawn_local(async move {
            match api.profil().await {
                Ok(user) => {
                    set_nom.set(user.nom.clone());
                    set_prenom.set(user.prenom.clone());
                    set_email.set(user.email.clone());
                    set_telephone.set(user.telephone.clone());
                    set_profil.set(Some(user));
                }
                Err(e) => {
                    set_error_msg.set(Some(e.user_message("le chargement du profil")));
                }
            }
            set_loading.set(false);
        });
    }

    Effect::new(move |_| {
        if success_msg.get().is_some() {
            set_timeout(move || set_success_msg.set(None), Duration::from_secs(5));
        }
    });

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();

            let Some(current) = profil.get_untracked() else {
                return;
            };
            let updated = Utilisateur {
                nom: nom.get().trim().to_string(),
                prenom: prenom.get().trim().to_string(),
                email: email.get().trim().to_string(),
                telephone: normalize_phone(&telephone.get()),
                ..current
            };
            if updated.nom.is_empty() || updated.prenom.is_empty() || updated.email.is_empty() {
                set_error_msg.set(Some("Veuillez remplir tous les champs.".to_string()));
                return;
            }

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                match api.update_utilisateur(&updated).await {
                    Ok(saved) => {
                        // Keep the users table consistent with the new data.
                        cache.utilisateurs.update(saved.clone());
                        set_profil.set(Some(saved));
                        set_success_msg.set(Some("Profil mis à jour.".to_string()));
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("la mise à jour du profil")));
                    }
                }
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="max-w-2xl space-y-4">
            <h2 class="text-2xl font-bold">"Mon profil"</h2>

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

            <Show
                when=move || !loading.get()
                fallback=|| {
                    view! {
                        <div class="flex justify-center p-8">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                }
            >
                <form class="card bg-base-100 shadow p-6 space-y-4" on:submit=on_submit.clone()>
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
                            class="input input-bordered"
                            on:input=move |ev| set_telephone.set(event_target_value(&ev))
                            prop:value=telephone
                            required
                        />
                    </div>

                    <div class="form-control mt-4">
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            {move || {
                                if is_submitting.get() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "Enregistrement..."
                                    }
                                        .into_any()
                                } else {
                                    "Enregistrer".into_any()
                                }
                            }}
                        </button>
                    </div>
                </form>
            </Show>
        </div>
    }
}
