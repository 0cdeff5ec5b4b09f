//! Route definitions.
//!
//! Pure domain layer: no DOM or `web_sys` here. Each screen of the admin
//! panel is a variant; the guard rules (`requires_auth`, redirect targets)
//! live next to the routes they protect.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// Entry screen: phone number input (default route).
    #[default]
    PhoneInput,
    /// SMS verification code screen.
    SmsCode,
    /// Username/password login (legacy flow, kept alongside SMS login).
    Login,
    Users,
    UsersAdd,
    Categories,
    CategoriesAdd,
    Subcategories,
    SubcategoriesAdd,
    Procedures,
    ProceduresAdd,
    ProcedureEdit(i64),
    Languages,
    Downloads,
    Profile,
    NotFound,
}

impl AppRoute {
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        if let Some(rest) = path.strip_prefix("/procedures/edit/") {
            return match rest.trim_end_matches('/').parse::<i64>() {
                Ok(id) => Self::ProcedureEdit(id),
                Err(_) => Self::NotFound,
            };
        }
        match path.trim_end_matches('/') {
            "" | "/phone-input" => Self::PhoneInput,
            "/sms-code" => Self::SmsCode,
            "/login" => Self::Login,
            "/users" => Self::Users,
            "/users/add" => Self::UsersAdd,
            "/categories" => Self::Categories,
            "/categories/add" => Self::CategoriesAdd,
            "/subcategories" => Self::Subcategories,
            "/subcategories/add" => Self::SubcategoriesAdd,
            "/procedures" => Self::Procedures,
            "/procedures/add" => Self::ProceduresAdd,
            "/languages" => Self::Languages,
            "/downloads" => Self::Downloads,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::PhoneInput => "/".to_string(),
            Self::SmsCode => "/sms-code".to_string(),
            Self::Login => "/login".to_string(),
            Self::Users => "/users".to_string(),
            Self::UsersAdd => "/users/add".to_string(),
            Self::Categories => "/categories".to_string(),
            Self::CategoriesAdd => "/categories/add".to_string(),
            Self::Subcategories => "/subcategories".to_string(),
            Self::SubcategoriesAdd => "/subcategories/add".to_string(),
            Self::Procedures => "/procedures".to_string(),
            Self::ProceduresAdd => "/procedures/add".to_string(),
            Self::ProcedureEdit(id) => format!("/procedures/edit/{id}"),
            Self::Languages => "/languages".to_string(),
            Self::Downloads => "/downloads".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Guard rule: every admin screen requires a valid session.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::PhoneInput | Self::SmsCode | Self::Login | Self::NotFound
        )
    }

    /// Authenticated users have no business on the login screens.
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::PhoneInput | Self::SmsCode | Self::Login)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::PhoneInput
    }

    pub fn auth_success_redirect() -> Self {
        Self::Users
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for route in [
            AppRoute::PhoneInput,
            AppRoute::SmsCode,
            AppRoute::Login,
            AppRoute::Users,
            AppRoute::UsersAdd,
            AppRoute::Categories,
            AppRoute::CategoriesAdd,
            AppRoute::Subcategories,
            AppRoute::SubcategoriesAdd,
            AppRoute::Procedures,
            AppRoute::ProceduresAdd,
            AppRoute::ProcedureEdit(42),
            AppRoute::Languages,
            AppRoute::Downloads,
            AppRoute::Profile,
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn edit_route_parses_its_id() {
        assert_eq!(
            AppRoute::from_path("/procedures/edit/17"),
            AppRoute::ProcedureEdit(17)
        );
        assert_eq!(AppRoute::from_path("/procedures/edit/abc"), AppRoute::NotFound);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn only_login_screens_are_public() {
        assert!(!AppRoute::PhoneInput.requires_auth());
        assert!(!AppRoute::SmsCode.requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(AppRoute::Users.requires_auth());
        assert!(AppRoute::ProcedureEdit(1).requires_auth());
        assert!(AppRoute::Profile.requires_auth());
    }

    #[test]
    fn query_strings_are_ignored() {
        assert_eq!(AppRoute::from_path("/users?page=2"), AppRoute::Users);
    }
}
