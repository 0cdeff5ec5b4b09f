//! Procedures table. Editing happens on a dedicated screen keyed by id.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::{ReloadBudget, use_data_cache};
use crate::dialog::{DialogRequest, use_dialog};
use crate::model::Procedure;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const MAX_LOAD_ATTEMPTS: u32 = 3;

#[component]
pub fn ProceduresPage() -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();
    let dialog = use_dialog();
    let router = use_router();

    let store = cache.procedures;
    let categories = cache.categories;
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

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
                match api.procedures().await {
                    Ok(items) => {
                        store.set(items);
                        set_error_msg.set(None);
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("le chargement des procédures")));
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

    let handle_delete = {
        let api = api.clone();
        move |procedure: Procedure| {
            let api = api.clone();
            spawn_local(async move {
                let confirmed = dialog
                    .confirm(DialogRequest::delete(
                        "Supprimer la procédure",
                        format!("Voulez-vous vraiment supprimer « {} » ?", procedure.titre),
                    ))
                    .await;
                if !confirmed {
                    return;
                }
                match api.delete_procedure(procedure.id).await {
                    Ok(()) => {
                        store.remove(procedure.id);
                        set_success_msg.set(Some("Procédure supprimée.".to_string()));
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
                <h2 class="text-2xl font-bold">"Procédures"</h2>
                <button
                    class="btn btn-primary btn-sm"
                    on:click=move |_| router.navigate_to(AppRoute::ProceduresAdd)
                >
                    "Ajouter une procédure"
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
                                <th>"Catégorie"</th>
                                <th>"Délai"</th>
                                <th>"Étapes"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || store.get()
                                key=|procedure| procedure.id
                                children={
                                    let handle_delete = handle_delete.clone();
                                    move |procedure: Procedure| {
                                        let handle_delete = handle_delete.clone();
                                        let delete_procedure = procedure.clone();
                                        let edit_id = procedure.id;
                                        view! {
                                            <tr>
                                                <td>{procedure.titre.clone()}</td>
                                                <td>{
                                                    let cid = procedure.categorie_id;
                                                    move || categorie_titre(cid)
                                                }</td>
                                                <td>{procedure.delai.clone()}</td>
                                                <td>{procedure.etapes.len()}</td>
                                                <td class="space-x-2">
                                                    <button
                                                        class="btn btn-xs btn-outline"
                                                        on:click=move |_| router
                                                            .navigate_to(AppRoute::ProcedureEdit(edit_id))
                                                    >
                                                        "Modifier"
                                                    </button>
                                                    <button
                                                        class="btn btn-xs btn-error btn-outline"
                                                        on:click=move |_| handle_delete(
                                                            delete_procedure.clone(),
                                                        )
                                                    >
                                                        "Supprimer"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                }
                            />
                        </tbody>
                    </table>
                    <Show when=move || store.get().is_empty()>
                        <p class="text-center text-base-content/50 p-8">
                            "Aucune procédure enregistrée."
                        </p>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
