//! Sidebar shell for authenticated screens. Also hosts the confirmation
//! dialog overlay so every screen gets it for free.

use leptos::prelude::*;

use crate::api::use_api;
use crate::cache::use_data_cache;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const NAV_ITEMS: &[(AppRoute, &str)] = &[
    (AppRoute::Users, "Utilisateurs"),
    (AppRoute::Categories, "Catégories"),
    (AppRoute::Subcategories, "Sous-catégories"),
    (AppRoute::Procedures, "Procédures"),
    (AppRoute::Languages, "Langues"),
    (AppRoute::Downloads, "Téléchargements"),
    (AppRoute::Profile, "Profil"),
];

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let router = use_router();
    let session = use_session();
    let api = use_api();
    let cache = use_data_cache();

    // The next login starts from fresh backend data.
    let on_logout = move |_| {
        cache.clear_all();
        session.logout(&api);
    };

    view! {
        <div class="flex min-h-screen bg-base-200">
            <aside class="w-64 bg-base-100 shadow-lg flex flex-col">
                <div class="p-4 border-b border-base-300">
                    <h1 class="text-xl font-bold text-primary">"FasoDocs Admin"</h1>
                </div>
                <ul class="menu flex-1 p-2">
                    {NAV_ITEMS
                        .iter()
                        .map(|(route, label)| {
                            let route = *route;
                            view! {
                                <li>
                                    <a
                                        class=move || {
                                            if router.current_route().get() == route {
                                                "active"
                                            } else {
                                                ""
                                            }
                                        }
                                        on:click=move |_| router.navigate_to(route)
                                    >
                                        {*label}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <div class="p-4 border-t border-base-300">
                    <button class="btn btn-outline btn-error btn-sm w-full" on:click=on_logout>
                        "Déconnexion"
                    </button>
                </div>
            </aside>
            <main class="flex-1 p-6 overflow-y-auto">{children()}</main>
            <ConfirmDialog />
        </div>
    }
}
