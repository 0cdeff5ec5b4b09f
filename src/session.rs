//! Admin session state.
//!
//! Session storage holds the durable record of who is logged in; the
//! [`Session`] signal is what the UI and the route guards react to. A page
//! reload re-derives the signal from storage so the session survives it.

use leptos::prelude::*;

use crate::api::FasoDocsApi;
use crate::web::SessionStore;

pub const KEY_TOKEN: &str = "token";
pub const KEY_LOGGED_IN: &str = "isLoggedIn";
pub const KEY_TELEPHONE: &str = "telephone";
pub const KEY_PENDING_PHONE: &str = "pendingPhone";
pub const KEY_USER_ROLE: &str = "userRole";

/// Strips formatting from a phone number, keeping a leading `+` and digits.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c == '+' || c.is_ascii_digit())
        .collect()
}

/// Reactive handle on the login state. Cheap to copy into closures.
#[derive(Clone, Copy)]
pub struct Session {
    logged_in: RwSignal<bool>,
}

impl Session {
    /// Reads the stored session; both the token and the explicit flag must be
    /// present, a token alone is not enough.
    pub fn is_logged_in() -> bool {
        let has_token = SessionStore::get(KEY_TOKEN).is_some_and(|t| !t.is_empty());
        let flagged = SessionStore::get(KEY_LOGGED_IN).as_deref() == Some("true");
        has_token && flagged
    }

    pub fn new() -> Self {
        Self {
            logged_in: RwSignal::new(Self::is_logged_in()),
        }
    }

    pub fn signal(&self) -> Signal<bool> {
        self.logged_in.into()
    }

    /// Records a successful login and flips the signal.
    pub fn open(&self, api: &FasoDocsApi, token: &str, telephone: &str, role: &str) {
        api.set_token(token);
        SessionStore::set(KEY_LOGGED_IN, "true");
        SessionStore::set(KEY_TELEPHONE, telephone);
        SessionStore::set(KEY_USER_ROLE, role);
        SessionStore::remove(KEY_PENDING_PHONE);
        self.logged_in.set(true);
    }

    /// Clears every stored session key and flips the signal. The route guard
    /// reacts to the signal and sends the user back to the login flow.
    pub fn logout(&self, api: &FasoDocsApi) {
        api.clear_token();
        SessionStore::remove(KEY_LOGGED_IN);
        SessionStore::remove(KEY_TELEPHONE);
        SessionStore::remove(KEY_USER_ROLE);
        SessionStore::remove(KEY_PENDING_PHONE);
        self.logged_in.set(false);
    }

    pub fn telephone(&self) -> Option<String> {
        SessionStore::get(KEY_TELEPHONE)
    }

    pub fn role(&self) -> Option<String> {
        SessionStore::get(KEY_USER_ROLE)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_session() -> Session {
    use_context::<Session>().expect("Session should be provided at the app root")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::API_URL;
    use crate::model::ProcedureFkStyle;

    #[test]
    fn normalize_keeps_plus_and_digits_only() {
        assert_eq!(normalize_phone("+226 70 00 00 00"), "+22670000000");
        assert_eq!(normalize_phone("(70) 12-34-56"), "70123456");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn token_alone_does_not_open_a_session() {
        SessionStore::clear();
        SessionStore::set(KEY_TOKEN, "jwt-abc");
        assert!(!Session::is_logged_in());
        SessionStore::set(KEY_LOGGED_IN, "true");
        assert!(Session::is_logged_in());
        SessionStore::clear();
    }

    #[test]
    fn open_then_logout_round_trips_the_stored_state() {
        SessionStore::clear();
        let api = FasoDocsApi::new(API_URL, ProcedureFkStyle::Id);
        let session = Session::new();
        assert!(!session.signal().get_untracked());

        session.open(&api, "jwt-abc", "+22670000000", "ADMIN");
        assert!(session.signal().get_untracked());
        assert!(Session::is_logged_in());
        assert_eq!(session.telephone().as_deref(), Some("+22670000000"));
        assert_eq!(session.role().as_deref(), Some("ADMIN"));

        session.logout(&api);
        assert!(!session.signal().get_untracked());
        assert!(!Session::is_logged_in());
        assert_eq!(SessionStore::get(KEY_TOKEN), None);
        SessionStore::clear();
    }
}
