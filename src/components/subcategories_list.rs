//! Subcategories table. Edit mode is carried on the cached rows themselves
//! through the transient `is_editing` flag; a snapshot of the row taken
//! before editing makes cancel a pure restore.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::{ReloadBudget, use_data_cache};
use crate::dialog::{DialogRequest, use_dialog};
use crate::model::SousCategorie;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const MAX_LOAD_ATTEMPTS: u32 = 3;

#[component]
pub fn SousCategoriesPage() -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();
    let dialog = use_dialog();
    let router = use_router();

    let store = cache.sous_categories;
    let categories = cache.categories;
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    // Pre-edit snapshot for the row currently in edit mode, plus the field
    // buffers the inputs write into.
    let (backup, set_backup) = signal(Option::<SousCategorie>::None);
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
                match api.sous_categories().await {
                    Ok(items) => {
                        store.set(items);
                        set_error_msg.set(None);
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("le chargement des sous-catégories")));
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

    // Category names for the table come from the shared cache too.
    if categories.is_empty() {
        let api = api.clone();
        spawn_local(async move {
            if let Ok(items) = api.categories().await {
                categories.set(items);
            }
        });
    }

    Effect::new(move |_| {
        if success_msg.get().is_some() {
            set_timeout(move || set_success_msg.set(None), Duration::from_secs(5));
        }
    });

    let start_edit = move |item: &SousCategorie| {
        // Restore any row left in edit mode before switching.
        if let Some(previous) = backup.get_untracked() {
            store.update(previous);
        }
        set_backup.set(Some(item.clone()));
        set_edit_nom.set(item.nom.clone());
        set_edit_description.set(item.description.clone().unwrap_or_default());
        let mut editing = item.clone();
        editing.is_editing = true;
        store.update(editing);
    };

    let cancel_edit = move |_| {
        if let Some(previous) = backup.get_untracked() {
            store.update(previous);
        }
        set_backup.set(None);
    };

    let save_edit = {
        let api = api.clone();
        move |item: SousCategorie| {
            let nom = edit_nom.get().trim().to_string();
            if nom.is_empty() {
                set_error_msg.set(Some("Le nom est obligatoire.".to_string()));
                return;
            }
            let description = edit_description.get().trim().to_string();
            let updated = SousCategorie {
                nom,
                description: (!description.is_empty()).then_some(description),
                is_editing: false,
                ..item
            };
            let api = api.clone();
            spawn_local(async move {
                match api.update_sous_categorie(&updated).await {
                    Ok(mut saved) => {
                        saved.is_editing = false;
                        store.update(saved);
                        set_backup.set(None);
                        set_success_msg.set(Some("Sous-catégorie mise à jour.".to_string()));
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
        move |item: SousCategorie| {
            let api = api.clone();
            spawn_local(async move {
                let confirmed = dialog
                    .confirm(DialogRequest::delete(
                        "Supprimer la sous-catégorie",
                        format!("Voulez-vous vraiment supprimer « {} » ?", item.nom),
                    ))
                    .await;
                if !confirmed {
                    return;
                }
                match api.delete_sous_categorie(item.id).await {
                    Ok(()) => {
                        store.remove(item.id);
                        set_success_msg.set(Some("Sous-catégorie supprimée.".to_string()));
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("la suppression")));
                    }
                }
            });
        }
    };

    // Tracked so names appear once the categories finish loading.
    let categorie_titre = move |categorie_id: i64| {
        categories
            .get()
            .into_iter()
            .find(|c| c.id == categorie_id)
            .map(|c| c.titre)
            .unwrap_or_else(|| "—".to_string())
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"Sous-catégories"</h2>
                <button
                    class="btn btn-primary btn-sm"
                    on:click=move |_| router.navigate_to(AppRoute::SubcategoriesAdd)
                >
                    "Ajouter une sous-catégorie"
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
                                <th>"Nom"</th>
                                <th>"Catégorie"</th>
                                <th>"Description"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || store.get()
                                key=|item| (item.id, item.is_editing)
                                children={
                                    let save_edit = save_edit.clone();
                                    let handle_delete = handle_delete.clone();
                                    move |item: SousCategorie| {
                                        let save_edit = save_edit.clone();
                                        let handle_delete = handle_delete.clone();
                                        if item.is_editing {
                                            let save_item = item.clone();
                                            view! {
                                                <tr>
                                                    <td>
                                                        <input
                                                            class="input input-bordered input-sm"
                                                            on:input=move |ev| set_edit_nom
                                                                .set(event_target_value(&ev))
                                                            prop:value=edit_nom
                                                        />
                                                    </td>
                                                    <td>{
                                                        let cid = item.categorie_id;
                                                        move || categorie_titre(cid)
                                                    }</td>
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
                                                            on:click=move |_| save_edit(save_item.clone())
                                                        >
                                                            "Enregistrer"
                                                        </button>
                                                        <button class="btn btn-xs btn-ghost" on:click=cancel_edit>
                                                            "Annuler"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                                .into_any()
                                        } else {
                                            let edit_item = item.clone();
                                            let delete_item = item.clone();
                                            view! {
                                                <tr>
                                                    <td>{item.nom.clone()}</td>
                                                    <td>{
                                                        let cid = item.categorie_id;
                                                        move || categorie_titre(cid)
                                                    }</td>
                                                    <td>{item.description.clone().unwrap_or_default()}</td>
                                                    <td class="space-x-2">
                                                        <button
                                                            class="btn btn-xs btn-outline"
                                                            on:click=move |_| start_edit(&edit_item)
                                                        >
                                                            "Modifier"
                                                        </button>
                                                        <button
                                                            class="btn btn-xs btn-error btn-outline"
                                                            on:click=move |_| handle_delete(delete_item.clone())
                                                        >
                                                            "Supprimer"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                                .into_any()
                                        }
                                    }
                                }
                            />
                        </tbody>
                    </table>
                    <Show when=move || store.get().is_empty()>
                        <p class="text-center text-base-content/50 p-8">
                            "Aucune sous-catégorie enregistrée."
                        </p>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
