//! Categories table with inline row editing.
//!
//! Edits are buffered in local signals while a row is in edit mode, so
//! cancelling never touches the cached data.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::{ReloadBudget, use_data_cache};
use crate::dialog::{DialogRequest, use_dialog};
use crate::model::Categorie;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const MAX_LOAD_ATTEMPTS: u32 = 3;

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();
    let dialog = use_dialog();
    let router = use_router();

    let store = cache.categories;
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    // Row edit buffer.
    let (editing_id, set_editing_id) = signal(Option::<i64>::None);
    let (edit_titre, set_edit_titre) = signal(String::new());
    let (edit_nom, set_edit_nom) = signal(String::new());
    let (edit_description, set_edit_description) = signal(String::new());

    // One request per call, no automatic retries; the budget caps how often
    // the user can hit "Recharger" after failures.
    let load_budget = ReloadBudget::new(MAX_LOAD_ATTEMPTS);
    let load = {
        let api = api.clone();
        move || {
            if !load_budget.try_take() {
                return;
            }
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.categories().await {
                    Ok(items) => {
                        store.set(items);
                        set_error_msg.set(None);
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("le chargement des catégories")));
                    }
                }
                set_loading.set(false);
            });
        }
    };
    if store.is_empty() {
        load();
    }
    // `Copy` handle so the nested `Show` closures stay `Fn`.
    let load = Callback::new(move |()| load());

    Effect::new(move |_| {
        if success_msg.get().is_some() {
            set_timeout(move || set_success_msg.set(None), Duration::from_secs(5));
        }
    });

    let start_edit = move |categorie: &Categorie| {
        set_edit_titre.set(categorie.titre.clone());
        set_edit_nom.set(categorie.nom_categorie.clone());
        set_edit_description.set(categorie.description.clone().unwrap_or_default());
        set_editing_id.set(Some(categorie.id));
    };

    let cancel_edit = move |_| set_editing_id.set(None);

    let save_edit = {
        let api = api.clone();
        move |categorie: Categorie| {
            let titre = edit_titre.get().trim().to_string();
            let nom = edit_nom.get().trim().to_string();
            if titre.is_empty() || nom.is_empty() {
                set_error_msg.set(Some(
                    "Le titre et le nom de la catégorie sont obligatoires.".to_string(),
                ));
                return;
            }
            let description = edit_description.get().trim().to_string();
            let updated = Categorie {
                titre,
                nom_categorie: nom,
                description: (!description.is_empty()).then_some(description),
                ..categorie
            };
            let api = api.clone();
            spawn_local(async move {
                match api.update_categorie(&updated).await {
                    Ok(saved) => {
                        store.update(saved);
                        set_editing_id.set(None);
                        set_success_msg.set(Some("Catégorie mise à jour.".to_string()));
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("la mise à jour")));
                    }
                }
            });
        }
    };

    let handle_delete = {
        let api = api.clone();
        move |categorie: Categorie| {
            let api = api.clone();
            spawn_local(async move {
                let confirmed = dialog
                    .confirm(DialogRequest::delete(
                        "Supprimer la catégorie",
                        format!(
                            "Voulez-vous vraiment supprimer « {} » ? Les procédures associées \
                             perdront leur catégorie.",
                            categorie.titre
                        ),
                    ))
                    .await;
                if !confirmed {
                    return;
                }
                match api.delete_categorie(categorie.id).await {
                    Ok(()) => {
                        store.remove(categorie.id);
                        set_success_msg.set(Some("Catégorie supprimée.".to_string()));
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("la suppression")));
                    }
                }
            });
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"Catégories"</h2>
                <button
                    class="btn btn-primary btn-sm"
                    on:click=move |_| router.navigate_to(AppRoute::CategoriesAdd)
                >
                    "Ajouter une catégorie"
                </button>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                    <Show when=move || !load_budget.exhausted()>
                        <button
                            class="btn btn-outline btn-xs"
                            on:click=move |_| load.run(())
                        >
                            "Recharger"
                        </button>
                    </Show>
                    <button class="btn btn-ghost btn-xs" on:click=move |_| set_error_msg.set(None)>
                        "✕"
                    </button>
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
                <div class="overflow-x-auto bg-base-100 rounded-lg shadow">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Titre"</th>
                                <th>"Nom"</th>
                                <th>"Description"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || store.get()
                                key=|categorie| categorie.id
                                children={
                                    let save_edit = save_edit.clone();
                                    let handle_delete = handle_delete.clone();
                                    move |categorie: Categorie| {
                                        let save_edit = save_edit.clone();
                                        let handle_delete = handle_delete.clone();
                                        let id = categorie.id;
                                        let row = categorie.clone();
                                        let is_editing = move || editing_id.get() == Some(id);
                                        view! {
                                            <tr>
                                                {move || {
                                                    if is_editing() {
                                                        let save_categorie = row.clone();
                                                        let save_edit = save_edit.clone();
                                                        view! {
                                                            <td>
                                                                <input
                                                                    class="input input-bordered input-sm"
                                                                    on:input=move |ev| set_edit_titre
                                                                        .set(event_target_value(&ev))
                                                                    prop:value=edit_titre
                                                                />
                                                            </td>
                                                            <td>
                                                                <input
                                                                    class="input input-bordered input-sm"
                                                                    on:input=move |ev| set_edit_nom
                                                                        .set(event_target_value(&ev))
                                                                    prop:value=edit_nom
                                                                />
                                                            </td>
                                                            <td>
                                                                <input
                                                                    class="input input-bordered input-sm"
                                                                    on:input=move |ev| set_edit_description
                                                                        .set(event_target_value(&ev))
                                                                    prop:value=edit_description
                                                                />
                                                            </td>
                                                            <td class="space-x-2">
                                                                <button
                                                                    class="btn btn-xs btn-success"
                                                                    on:click=move |_| save_edit(save_categorie.clone())
                                                                >
                                                                    "Enregistrer"
                                                                </button>
                                                                <button
                                                                    class="btn btn-xs btn-ghost"
                                                                    on:click=cancel_edit
                                                                >
                                                                    "Annuler"
                                                                </button>
                                                            </td>
                                                        }
                                                            .into_any()
                                                    } else {
                                                        let edit_categorie = row.clone();
                                                        let delete_categorie = row.clone();
                                                        let handle_delete = handle_delete.clone();
                                                        view! {
                                                            <td>{row.titre.clone()}</td>
                                                            <td>{row.nom_categorie.clone()}</td>
                                                            <td>
                                                                {row.description.clone().unwrap_or_default()}
                                                            </td>
                                                            <td class="space-x-2">
                                                                <button
                                                                    class="btn btn-xs btn-outline"
                                                                    on:click=move |_| start_edit(&edit_categorie)
                                                                >
                                                                    "Modifier"
                                                                </button>
                                                                <button
                                                                    class="btn btn-xs btn-error btn-outline"
                                                                    on:click=move |_| handle_delete(
                                                                        delete_categorie.clone(),
                                                                    )
                                                                >
                                                                    "Supprimer"
                                                                </button>
                                                            </td>
                                                        }
                                                            .into_any()
                                                    }
                                                }}
                                            </tr>
                                        }
                                    }
                                }
                            />
                        </tbody>
                    </table>
                    <Show when=move || store.get().is_empty()>
                        <p class="text-center text-base-content/50 p-8">
                            "Aucune catégorie enregistrée."
                        </p>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
