//! Creation form for categories, with quick-pick suggestions for the
//! technical name.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::use_data_cache;
use crate::model::CreateCategorieRequest;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const NOM_SUGGESTIONS: &[&str] = &[
    "SANTE",
    "EDUCATION",
    "JUSTICE",
    "TRANSPORT",
    "COMMUNICATION",
];

#[component]
pub fn AddCategoriePage() -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();
    let router = use_router();

    let (titre, set_titre) = signal(String::new());
    let (nom_categorie, set_nom_categorie) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (icone_url, set_icone_url) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();

            let request = CreateCategorieRequest {
                titre: titre.get().trim().to_string(),
                nom_categorie: nom_categorie.get().trim().to_uppercase(),
                description: description.get().trim().to_string(),
                icone_url: icone_url.get().trim().to_string(),
            };
            if request.titre.is_empty() || request.nom_categorie.is_empty() {
                set_error_msg.set(Some(
                    "Le titre et le nom de la catégorie sont obligatoires.".to_string(),
                ));
                return;
            }

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                match api.create_categorie(&request).await {
                    Ok(created) => {
                        cache.categories.add(created);
                        set_success_msg.set(Some("Catégorie créée avec succès.".to_string()));
                        set_timeout(
                            move || router.navigate_to(AppRoute::Categories),
                            Duration::from_secs(1),
                        );
                    }
                    Err(e) => {
                        let message = match e.status() {
                            Some(409) => "Une catégorie avec ce nom existe déjà.".to_string(),
                            _ => e.user_message("la création de la catégorie"),
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
                <h2 class="text-2xl font-bold">"Ajouter une catégorie"</h2>
                <button
                    class="btn btn-ghost btn-sm"
                    on:click=move |_| router.navigate_to(AppRoute::Categories)
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
                    <label class="label" for="titre">
                        <span class="label-text">"Titre affiché"</span>
                    </label>
                    <input
                        id="titre"
                        type="text"
                        placeholder="Santé"
                        class="input input-bordered"
                        on:input=move |ev| set_titre.set(event_target_value(&ev))
                        prop:value=titre
                        required
                    />
                </div>

                <div class="form-control">
                    <label class="label" for="nom-categorie">
                        <span class="label-text">"Nom technique"</span>
                    </label>
                    <input
                        id="nom-categorie"
                        type="text"
                        placeholder="SANTE"
                        class="input input-bordered"
                        on:input=move |ev| set_nom_categorie.set(event_target_value(&ev))
                        prop:value=nom_categorie
                        required
                    />
                    <div class="flex flex-wrap gap-2 mt-2">
                        {NOM_SUGGESTIONS
                            .iter()
                            .map(|suggestion| {
                                view! {
                                    <button
                                        type="button"
                                        class="badge badge-outline cursor-pointer"
                                        on:click=move |_| set_nom_categorie
                                            .set((*suggestion).to_string())
                                    >
                                        {*suggestion}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
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

                <div class="form-control">
                    <label class="label" for="icone-url">
                        <span class="label-text">"URL de l'icône"</span>
                    </label>
                    <input
                        id="icone-url"
                        type="url"
                        class="input input-bordered"
                        on:input=move |ev| set_icone_url.set(event_target_value(&ev))
                        prop:value=icone_url
                    />
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
                                "Créer la catégorie".into_any()
                            }
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}
