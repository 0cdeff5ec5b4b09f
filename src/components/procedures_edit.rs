//! Edition screen for an existing procedure, reached from the table with the
//! id in the URL.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::use_data_cache;
use crate::components::procedure_form::{ProcedureFields, ProcedureFormState};
use crate::model::{Centre, Cout};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn EditProcedurePage(id: i64) -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();
    let router = use_router();

    let state = ProcedureFormState::new();
    let centres = RwSignal::new(Vec::<Centre>::new());
    let couts = RwSignal::new(Vec::<Cout>::new());
    let (loading, set_loading) = signal(true);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    // The cached copy prefills the form immediately; a full reload of the
    // list only happens when the page is opened from a deep link.
    {
        let api = api.clone();
        spawn_local(async move {
            if cache.categories.is_empty() {
                if let Ok(items) = api.categories().await {
                    cache.categories.set(items);
                }
            }
            if cache.sous_categories.is_empty() {
                if let Ok(items) = api.sous_categories().await {
                    cache.sous_categories.set(items);
                }
            }
            if let Ok(items) = api.centres().await {
                centres.set(items);
            }
            if let Ok(items) = api.couts().await {
                couts.set(items);
            }

            let cached = cache.procedures.find(id);
            match cached {
                Some(procedure) => state.load(&procedure),
                None => match api.procedures().await {
                    Ok(items) => {
                        cache.procedures.set(items);
                        match cache.procedures.find(id) {
                            Some(procedure) => state.load(&procedure),
                            None => {
                                set_error_msg
                                    .set(Some("Procédure introuvable.".to_string()));
                            }
                        }
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("le chargement de la procédure")));
                    }
                },
            }
            set_loading.set(false);
        });
    }

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();

            if let Some(message) = state.validate() {
                set_error_msg.set(Some(message));
                return;
            }

            let selected_categorie = state
                .categorie_id
                .get_untracked()
                .parse::<i64>()
                .ok()
                .and_then(|cid| cache.categories.find(cid));
            let selected_sous_categorie = state
                .sous_categorie_id
                .get_untracked()
                .parse::<i64>()
                .ok()
                .and_then(|scid| cache.sous_categories.find(scid));
            let draft = state.to_draft(
                selected_categorie.map(|c| c.nom_categorie),
                selected_sous_categorie.map(|sc| sc.nom),
            );

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                match api.update_procedure(id, &draft).await {
                    Ok(updated) => {
                        cache.procedures.update(updated);
                        set_success_msg
                            .set(Some("Procédure mise à jour avec succès.".to_string()));
                        set_timeout(
                            move || router.navigate_to(AppRoute::Procedures),
                            Duration::from_secs(2),
                        );
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("la mise à jour de la procédure")));
                    }
                }
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="max-w-3xl space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"Modifier la procédure"</h2>
                <button
                    class="btn btn-ghost btn-sm"
                    on:click=move |_| router.navigate_to(AppRoute::Procedures)
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
                    <ProcedureFields state=state centres=centres couts=couts />

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
                                    "Enregistrer les modifications".into_any()
                                }
                            }}
                        </button>
                    </div>
                </form>
            </Show>
        </div>
    }
}
