//! FasoDocs administration front-end.
//!
//! Context-driven architecture:
//! - `web::route` / `web::router`: typed routes and the history-API engine
//! - `session`: login state backed by session storage
//! - `api`: REST client for the backend
//! - `cache`: shared reactive collections the list views subscribe to
//! - `dialog`: single-slot confirmation dialog broker
//! - `components`: one module per screen

mod api;
mod cache;
mod dialog;
mod model;
mod session;

mod components {
    pub mod categories_add;
    pub mod categories_list;
    mod confirm_dialog;
    pub mod downloads;
    pub mod languages;
    pub mod layout;
    pub mod login;
    pub mod phone_input;
    mod procedure_form;
    pub mod procedures_add;
    pub mod procedures_edit;
    pub mod procedures_list;
    pub mod profile;
    pub mod sms_code;
    pub mod subcategories_add;
    pub mod subcategories_list;
    pub mod users_add;
    pub mod users_list;
}

use leptos::prelude::*;

// Thin wrappers over the browser APIs the app needs directly. Everything
// HTTP goes through `api` instead.
pub(crate) mod web {
    pub mod route;
    pub mod router;
    mod storage;

    pub use storage::SessionStore;
}

use crate::api::{API_URL, FasoDocsApi};
use crate::cache::DataCache;
use crate::components::categories_add::AddCategoriePage;
use crate::components::categories_list::CategoriesPage;
use crate::components::downloads::DownloadsPage;
use crate::components::languages::LanguagesPage;
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::phone_input::PhoneInputPage;
use crate::components::procedures_add::AddProcedurePage;
use crate::components::procedures_edit::EditProcedurePage;
use crate::components::procedures_list::ProceduresPage;
use crate::components::profile::ProfilePage;
use crate::components::sms_code::SmsCodePage;
use crate::components::subcategories_add::AddSousCategoriePage;
use crate::components::subcategories_list::SousCategoriesPage;
use crate::components::users_add::AddUtilisateurPage;
use crate::components::users_list::UtilisateursPage;
use crate::dialog::DialogBroker;
use crate::model::ProcedureFkStyle;
use crate::session::Session;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// Wraps an authenticated screen in the sidebar layout.
fn in_layout(view: AnyView) -> AnyView {
    view! { <Layout>{view}</Layout> }.into_any()
}

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::PhoneInput => view! { <PhoneInputPage /> }.into_any(),
        AppRoute::SmsCode => view! { <SmsCodePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Users => in_layout(view! { <UtilisateursPage /> }.into_any()),
        AppRoute::UsersAdd => in_layout(view! { <AddUtilisateurPage /> }.into_any()),
        AppRoute::Categories => in_layout(view! { <CategoriesPage /> }.into_any()),
        AppRoute::CategoriesAdd => in_layout(view! { <AddCategoriePage /> }.into_any()),
        AppRoute::Subcategories => in_layout(view! { <SousCategoriesPage /> }.into_any()),
        AppRoute::SubcategoriesAdd => in_layout(view! { <AddSousCategoriePage /> }.into_any()),
        AppRoute::Procedures => in_layout(view! { <ProceduresPage /> }.into_any()),
        AppRoute::ProceduresAdd => in_layout(view! { <AddProcedurePage /> }.into_any()),
        AppRoute::ProcedureEdit(id) => in_layout(view! { <EditProcedurePage id=id /> }.into_any()),
        AppRoute::Languages => in_layout(view! { <LanguagesPage /> }.into_any()),
        AppRoute::Downloads => in_layout(view! { <DownloadsPage /> }.into_any()),
        AppRoute::Profile => in_layout(view! { <ProfilePage /> }.into_any()),
        AppRoute::NotFound => view! {
            <div class="not-found">
                <h1>"404"</h1>
                <p>"Page introuvable"</p>
                <a href="/">"Retour à l'accueil"</a>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Session first: the API client and the router both derive from it.
    let session = Session::new();
    provide_context(session);

    provide_context(FasoDocsApi::new(API_URL, ProcedureFkStyle::default()));
    provide_context(DataCache::new());
    provide_context(DialogBroker::new());

    let is_authenticated = session.signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
