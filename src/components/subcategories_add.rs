//! Creation form for subcategories. The parent category list comes from the
//! shared cache and is fetched on demand.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::use_data_cache;
use crate::model::CreateSousCategorieRequest;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn AddSousCategoriePage() -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();
    let router = use_router();

    let categories = cache.categories;
    let (nom, set_nom) = signal(String::new());
    let (categorie_id, set_categorie_id) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    if categories.is_empty() {
        let api = api.clone();
        spawn_local(async move {
            match api.categories().await {
                Ok(items) => categories.set(items),
                Err(e) => {
                    set_error_msg.set(Some(e.user_message("le chargement des catégories")));
                }
            }
        });
    }

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();

            let parsed_id = categorie_id.get().parse::<i64>().ok();
            let nom_value = nom.get().trim().to_string();
            if nom_value.is_empty() || parsed_id.is_none() {
                set_error_msg.set(Some(
                    "Le nom et la catégorie parente sont obligatoires.".to_string(),
                ));
                return;
            }
            let request = CreateSousCategorieRequest {
                nom: nom_value,
                categorie_id: parsed_id.unwrap_or_default(),
                description: description.get().trim().to_string(),
            };

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                match api.create_sous_categorie(&request).await {
                    Ok(created) => {
                        cache.sous_categories.add(created);
                        set_success_msg
                            .set(Some("Sous-catégorie créée avec succès.".to_string()));
                        set_timeout(
                            move || router.navigate_to(AppRoute::Subcategories),
                            Duration::from_secs(1),
                        );
                    }
                    Err(e) => {
                        let message = match e.status() {
                            Some(409) => {
                                "Une sous-catégorie avec ce nom existe déjà.".to_string()
                            }
                            _ => e.user_message("la création de la sous-catégorie"),
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
                <h2 class="text-2xl font-bold">"Ajouter une sous-catégorie"</h2>
                <button
                    class="btn btn-ghost btn-sm"
                    on:click=move |_| router.navigate_to(AppRoute::Subcategories)
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
                    <label class="label" for="categorie">
                        <span class="label-text">"Catégorie parente"</span>
                    </label>
                    <select
                        id="categorie"
                        class="select select-bordered"
                        on:change=move |ev| set_categorie_id.set(event_target_value(&ev))
                        prop:value=categorie_id
                        required
                    >
                        <option value="" disabled selected>
                            "Choisir une catégorie"
                        </option>
                        <For
                            each=move || categories.get()
                            key=|c| c.id
                            children=move |c| {
                                view! { <option value=c.id.to_string()>{c.titre.clone()}</option> }
                            }
                        />
                    </select>
                </div>

                <div class="form-control">
                    <label class="label" for="description">
                        <span class="label-text">"Description"</span>
                    </label>
                    <textarea
                        id="description"
                        class="textarea textarea-bordered"
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                        prop:value=description
                    ></textarea>
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
                                "Créer la sous-catégorie".into_any()
                            }
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}
