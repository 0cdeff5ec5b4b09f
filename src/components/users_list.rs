//! User administration table: activate, deactivate, delete, with guards so
//! the last admin account can never be removed or disabled.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

use crate::api::use_api;
use crate::cache::{ReloadBudget, use_data_cache};
use crate::dialog::{DialogRequest, use_dialog};
use crate::model::{Utilisateur, is_last_active_admin, is_last_admin};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const MAX_LOAD_ATTEMPTS: u32 = 3;

#[component]
pub fn UtilisateursPage() -> impl IntoView {
    let api = use_api();
    let cache = use_data_cache();
    let dialog = use_dialog();
    let router = use_router();

    let store = cache.utilisateurs;
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    // Fresh data only when the cache is empty; otherwise the table renders
    // straight from it. One request per call, no automatic retries; the
    // budget caps how often the user can hit "Recharger" after failures.
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
                match api.utilisateurs().await {
                    Ok(users) => {
                        store.set(users);
                        set_error_msg.set(None);
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("le chargement des utilisateurs")));
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

    // Success banners fade out on their own.
    Effect::new(move |_| {
        if success_msg.get().is_some() {
            set_timeout(move || set_success_msg.set(None), Duration::from_secs(5));
        }
    });

    let handle_delete = {
        let api = api.clone();
        move |user: Utilisateur| {
            if is_last_admin(&store.snapshot(), &user) {
                set_error_msg.set(Some(
                    "Impossible de supprimer le dernier administrateur.".to_string(),
                ));
                return;
            }
            let api = api.clone();
            spawn_local(async move {
                let confirmed = dialog
                    .confirm(DialogRequest::delete(
                        "Supprimer l'utilisateur",
                        format!(
                            "Voulez-vous vraiment supprimer {} ? Cette action est irréversible.",
                            user.display_name()
                        ),
                    ))
                    .await;
                if !confirmed {
                    return;
                }
                match api.delete_utilisateur(user.id).await {
                    Ok(()) => {
                        store.remove(user.id);
                        set_success_msg.set(Some("Utilisateur supprimé.".to_string()));
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("la suppression")));
                    }
                }
            });
        }
    };

    let handle_toggle_active = {
        let api = api.clone();
        move |user: Utilisateur| {
            if user.est_actif && is_last_active_admin(&store.snapshot(), &user) {
                set_error_msg.set(Some(
                    "Impossible de désactiver le dernier administrateur actif.".to_string(),
                ));
                return;
            }
            let api = api.clone();
            spawn_local(async move {
                let result = if user.est_actif {
                    api.desactiver_utilisateur(user.id).await
                } else {
                    api.activer_utilisateur(user.id).await
                };
                match result {
                    Ok(()) => {
                        let mut updated = user.clone();
                        updated.est_actif = !user.est_actif;
                        store.update(updated);
                        set_success_msg.set(Some(
                            if user.est_actif {
                                "Utilisateur désactivé."
                            } else {
                                "Utilisateur activé."
                            }
                            .to_string(),
                        ));
                    }
                    Err(e) => {
                        set_error_msg.set(Some(e.user_message("la mise à jour du statut")));
                    }
                }
            });
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"Utilisateurs"</h2>
                <button
                    class="btn btn-primary btn-sm"
                    on:click=move |_| router.navigate_to(AppRoute::UsersAdd)
                >
                    "Ajouter un utilisateur"
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
                                <th>"Téléphone"</th>
                                <th>"Email"</th>
                                <th>"Rôle"</th>
                                <th>"Statut"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || store.get()
                                key=|user| (user.id, user.est_actif)
                                children={
                                    let handle_delete = handle_delete.clone();
                                    let handle_toggle_active = handle_toggle_active.clone();
                                    move |user: Utilisateur| {
                                        let delete_user = user.clone();
                                        let toggle_user = user.clone();
                                        let handle_delete = handle_delete.clone();
                                        let handle_toggle_active = handle_toggle_active.clone();
                                        view! {
                                            <tr>
                                                <td>{user.display_name()}</td>
                                                <td>{user.telephone.clone()}</td>
                                                <td>{user.email.clone()}</td>
                                                <td>{user.role.clone()}</td>
                                                <td>
                                                    {if user.est_actif {
                                                        view! {
                                                            <span class="badge badge-success">"Actif"</span>
                                                        }
                                                            .into_any()
                                                    } else {
                                                        view! {
                                                            <span class="badge badge-ghost">"Inactif"</span>
                                                        }
                                                            .into_any()
                                                    }}
                                                </td>
                                                <td class="space-x-2">
                                                    <button
                                                        class="btn btn-xs btn-outline"
                                                        on:click=move |_| handle_toggle_active(
                                                            toggle_user.clone(),
                                                        )
                                                    >
                                                        {if user.est_actif {
                                                            "Désactiver"
                                                        } else {
                                                            "Activer"
                                                        }}
                                                    </button>
                                                    <button
                                                        class="btn btn-xs btn-error btn-outline"
                                                        on:click=move |_| handle_delete(
                                                            delete_user.clone(),
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
                            "Aucun utilisateur enregistré."
                        </p>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
