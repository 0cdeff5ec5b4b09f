//! HTTP client for the FasoDocs backend.
//!
//! One async method per REST endpoint. Authenticated calls attach
//! `Authorization: Bearer <token>` when a token is held and simply omit the
//! header otherwise; rejecting unauthenticated calls is the server's job.
//! No retry logic lives here, that belongs to the calling view.

use gloo_net::http::{Request, RequestBuilder, Response};
use leptos::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::model::{
    AuthResponse, Categorie, Centre, Cout, CreateCategorieRequest, CreateSousCategorieRequest,
    CreateUtilisateurRequest, Procedure, ProcedureDraft, ProcedureFkStyle, SousCategorie,
    Utilisateur,
};
use crate::session::KEY_TOKEN;
use crate::web::SessionStore;

/// Base URL of the Spring Boot backend.
pub const API_URL: &str = "http://localhost:8080/api";

/// Structured failure for any backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced an HTTP status (server down, CORS, DNS).
    Network(String),
    /// Non-2xx response, with the server's `message` field when it sent one.
    Http { status: u16, message: Option<String> },
    /// 2xx response whose body could not be decoded.
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Default French banner text; views override specific statuses when
    /// they have something more precise to say.
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ApiError::Network(_) => {
                "Impossible de contacter le serveur. Vérifiez que le backend est démarré."
                    .to_string()
            }
            ApiError::Http { status: 401, message } | ApiError::Http { status: 403, message } => {
                message.clone().unwrap_or_else(|| {
                    "Non autorisé. Votre session a peut-être expiré. Reconnectez-vous.".to_string()
                })
            }
            ApiError::Http { status: 409, message } => message
                .clone()
                .unwrap_or_else(|| "Cette ressource existe déjà.".to_string()),
            ApiError::Http { status: 500, .. } => {
                "Erreur interne du serveur. Veuillez réessayer plus tard.".to_string()
            }
            ApiError::Http { status, message } => message
                .clone()
                .unwrap_or_else(|| format!("Erreur lors de {action} (code {status})")),
            ApiError::Decode(_) => "Réponse du serveur invalide.".to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "erreur réseau: {msg}"),
            ApiError::Http { status, message } => match message {
                Some(m) => write!(f, "HTTP {status}: {m}"),
                None => write!(f, "HTTP {status}"),
            },
            ApiError::Decode(msg) => write!(f, "réponse illisible: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

#[derive(Deserialize)]
struct ServerMessage {
    #[serde(default)]
    message: Option<String>,
}

/// Extracts the server's error message from a failed response body.
async fn http_error(response: Response) -> ApiError {
    let status = response.status();
    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ServerMessage>(&body)
            .ok()
            .and_then(|m| m.message)
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string())),
        Err(_) => None,
    };
    ApiError::Http { status, message }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(http_error(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn expect_ok(response: Response) -> Result<(), ApiError> {
    if !response.ok() {
        return Err(http_error(response).await);
    }
    Ok(())
}

/// Backend client. The bearer token is the only mutable state; it lives in a
/// signal so a login mid-session is picked up by every later request, and it
/// is mirrored to the Storage Adapter.
#[derive(Clone)]
pub struct FasoDocsApi {
    base_url: String,
    fk_style: ProcedureFkStyle,
    token: RwSignal<Option<String>>,
}

impl FasoDocsApi {
    pub fn new(base_url: &str, fk_style: ProcedureFkStyle) -> Self {
        let stored = SessionStore::get(KEY_TOKEN).filter(|t| !t.is_empty());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fk_style,
            token: RwSignal::new(stored),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.get_untracked() {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    pub fn set_token(&self, token: &str) {
        self.token.set(Some(token.to_string()));
        SessionStore::set(KEY_TOKEN, token);
    }

    pub fn clear_token(&self) {
        self.token.set(None);
        SessionStore::remove(KEY_TOKEN);
    }

    pub fn has_token(&self) -> bool {
        self.token.with_untracked(|t| t.is_some())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.authorize(Request::get(&self.url(path))).send().await?;
        decode(response).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(Request::post(&self.url(path)))
            .header("Content-Type", "application/json")
            .json(body)?
            .send()
            .await?;
        decode(response).await
    }

    async fn put_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(Request::put(&self.url(path)))
            .header("Content-Type", "application/json")
            .json(body)?
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .authorize(Request::delete(&self.url(path)))
            .send()
            .await?;
        expect_ok(response).await
    }

    // ====================
    // Authentification
    // ====================

    /// Username/password login (legacy flow).
    pub async fn connexion(
        &self,
        nom_utilisateur: &str,
        mot_de_passe: &str,
    ) -> Result<AuthResponse, ApiError> {
        self.post_json(
            "/auth/connexion",
            &serde_json::json!({
                "nomUtilisateur": nom_utilisateur,
                "motDePasse": mot_de_passe,
            }),
        )
        .await
    }

    /// Asks the backend to text a verification code to `telephone`.
    pub async fn connexion_admin(&self, telephone: &str) -> Result<(), ApiError> {
        let response = self
            .authorize(Request::post(&self.url("/auth/connexion-admin")))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "telephone": telephone }))?
            .send()
            .await?;
        expect_ok(response).await
    }

    /// Exchanges the SMS code for a session token.
    pub async fn verifier_sms_admin(
        &self,
        telephone: &str,
        code: &str,
    ) -> Result<AuthResponse, ApiError> {
        self.post_json(
            "/auth/verifier-sms-admin",
            &serde_json::json!({ "telephone": telephone, "code": code }),
        )
        .await
    }

    pub async fn profil(&self) -> Result<Utilisateur, ApiError> {
        self.get_json("/auth/profil").await
    }

    // ====================
    // Catégories
    // ====================

    pub async fn categories(&self) -> Result<Vec<Categorie>, ApiError> {
        self.get_json("/admin/categories").await
    }

    pub async fn create_categorie(
        &self,
        body: &CreateCategorieRequest,
    ) -> Result<Categorie, ApiError> {
        self.post_json("/admin/categories", body).await
    }

    pub async fn update_categorie(&self, categorie: &Categorie) -> Result<Categorie, ApiError> {
        self.put_json(&format!("/admin/categories/{}", categorie.id), categorie)
            .await
    }

    pub async fn delete_categorie(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/admin/categories/{id}")).await
    }

    // ====================
    // Sous-catégories
    // ====================

    pub async fn sous_categories(&self) -> Result<Vec<SousCategorie>, ApiError> {
        self.get_json("/admin/sous-categories").await
    }

    pub async fn create_sous_categorie(
        &self,
        body: &CreateSousCategorieRequest,
    ) -> Result<SousCategorie, ApiError> {
        self.post_json("/admin/sous-categories", body).await
    }

    pub async fn update_sous_categorie(
        &self,
        sous_categorie: &SousCategorie,
    ) -> Result<SousCategorie, ApiError> {
        self.put_json(
            &format!("/admin/sous-categories/{}", sous_categorie.id),
            sous_categorie,
        )
        .await
    }

    pub async fn delete_sous_categorie(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/admin/sous-categories/{id}")).await
    }

    // ====================
    // Procédures
    // ====================

    pub async fn procedures(&self) -> Result<Vec<Procedure>, ApiError> {
        self.get_json("/admin/procedures").await
    }

    pub async fn create_procedure(&self, draft: &ProcedureDraft) -> Result<Procedure, ApiError> {
        self.post_json("/admin/procedures", &draft.payload(self.fk_style))
            .await
    }

    pub async fn update_procedure(
        &self,
        id: i64,
        draft: &ProcedureDraft,
    ) -> Result<Procedure, ApiError> {
        self.put_json(
            &format!("/admin/procedures/{id}"),
            &draft.payload(self.fk_style),
        )
        .await
    }

    pub async fn delete_procedure(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/admin/procedures/{id}")).await
    }

    // ====================
    // Utilisateurs
    // ====================

    pub async fn utilisateurs(&self) -> Result<Vec<Utilisateur>, ApiError> {
        self.get_json("/admin/utilisateurs").await
    }

    pub async fn create_utilisateur(
        &self,
        body: &CreateUtilisateurRequest,
    ) -> Result<Utilisateur, ApiError> {
        self.post_json("/admin/utilisateurs", body).await
    }

    pub async fn update_utilisateur(
        &self,
        utilisateur: &Utilisateur,
    ) -> Result<Utilisateur, ApiError> {
        self.put_json(
            &format!("/admin/utilisateurs/{}", utilisateur.id),
            utilisateur,
        )
        .await
    }

    pub async fn delete_utilisateur(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/admin/utilisateurs/{id}")).await
    }

    pub async fn activer_utilisateur(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .authorize(Request::put(&self.url(&format!(
                "/admin/utilisateurs/{id}/activer"
            ))))
            .send()
            .await?;
        expect_ok(response).await
    }

    pub async fn desactiver_utilisateur(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .authorize(Request::put(&self.url(&format!(
                "/admin/utilisateurs/{id}/desactiver"
            ))))
            .send()
            .await?;
        expect_ok(response).await
    }

    // ====================
    // Référentiels (lecture seule)
    // ====================

    pub async fn centres(&self) -> Result<Vec<Centre>, ApiError> {
        self.get_json("/centres").await
    }

    pub async fn couts(&self) -> Result<Vec<Cout>, ApiError> {
        self.get_json("/couts").await
    }
}

pub fn use_api() -> FasoDocsApi {
    use_context::<FasoDocsApi>().expect("FasoDocsApi should be provided at the app root")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = FasoDocsApi::new("http://localhost:8080/api/", ProcedureFkStyle::Id);
        assert_eq!(api.url("/auth/profil"), "http://localhost:8080/api/auth/profil");
        assert_eq!(api.url("centres"), "http://localhost:8080/api/centres");
    }

    #[test]
    fn token_lifecycle_mirrors_storage() {
        let api = FasoDocsApi::new(API_URL, ProcedureFkStyle::Id);
        assert!(!api.has_token());
        api.set_token("jwt-abc");
        assert!(api.has_token());
        assert_eq!(SessionStore::get(KEY_TOKEN).as_deref(), Some("jwt-abc"));
        api.clear_token();
        assert!(!api.has_token());
        assert_eq!(SessionStore::get(KEY_TOKEN), None);
    }

    #[test]
    fn user_message_maps_status_codes() {
        let network = ApiError::Network("fetch failed".into());
        assert!(network.user_message("la création").contains("contacter le serveur"));

        let unauthorized = ApiError::Http { status: 401, message: None };
        assert!(unauthorized.user_message("la création").contains("session"));

        let server_said = ApiError::Http {
            status: 400,
            message: Some("Numéro de téléphone invalide.".into()),
        };
        assert_eq!(
            server_said.user_message("l'envoi"),
            "Numéro de téléphone invalide."
        );

        let anonymous = ApiError::Http { status: 418, message: None };
        assert_eq!(
            anonymous.user_message("la création"),
            "Erreur lors de la création (code 418)"
        );
    }
}
