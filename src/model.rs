//! DTOs exchanged with the FasoDocs backend.
//!
//! The backend speaks French camelCase JSON (`nomCategorie`, `estActif`, ...);
//! every record here mirrors that wire shape and carries no invariants of its
//! own beyond what the server guarantees. The one rule enforced client-side
//! lives at the bottom: the system must never lose its last administrator.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Lookup key shared by every cached collection.
pub trait Keyed {
    fn id(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categorie {
    pub id: i64,
    pub titre: String,
    pub nom_categorie: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icone_url: Option<String>,
}

impl Keyed for Categorie {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SousCategorie {
    pub id: i64,
    pub nom: String,
    #[serde(default)]
    pub description: Option<String>,
    pub categorie_id: i64,
    /// Transient inline-edit flag, never sent to or read from the backend.
    #[serde(skip, default)]
    pub is_editing: bool,
}

impl Keyed for SousCategorie {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Etape {
    pub nom: String,
    pub description: String,
    pub ordre: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequis {
    pub nom: String,
    pub description: String,
    pub obligatoire: bool,
    #[serde(default)]
    pub modele_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLegale {
    pub description: String,
    pub texte_reference: String,
    #[serde(default)]
    pub lien_audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: i64,
    pub nom: String,
    pub titre: String,
    #[serde(default)]
    pub description: Option<String>,
    pub delai: String,
    pub categorie_id: i64,
    #[serde(default)]
    pub sous_categorie_id: Option<i64>,
    #[serde(default)]
    pub centre_id: Option<i64>,
    #[serde(default)]
    pub cout_id: Option<i64>,
    #[serde(default)]
    pub etapes: Vec<Etape>,
    #[serde(default)]
    pub documents_requis: Vec<DocumentRequis>,
    #[serde(default)]
    pub references_legales: Vec<ReferenceLegale>,
}

impl Keyed for Procedure {
    fn id(&self) -> i64 {
        self.id
    }
}

pub const ROLE_ADMIN: &str = "ADMIN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utilisateur {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub telephone: String,
    pub email: String,
    pub role: String,
    pub est_actif: bool,
}

impl Keyed for Utilisateur {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Utilisateur {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

/// Processing centre, read-only on this surface (`GET /centres`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Centre {
    pub id: i64,
    pub nom: String,
    #[serde(default)]
    pub adresse: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
}

/// Cost entry, read-only on this surface (`GET /couts`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cout {
    pub id: i64,
    pub montant: f64,
    #[serde(default)]
    pub type_monnaie: Option<String>,
}

// =========================================================
// Requests
// =========================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategorieRequest {
    pub titre: String,
    pub nom_categorie: String,
    pub description: String,
    pub icone_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSousCategorieRequest {
    pub nom: String,
    pub categorie_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUtilisateurRequest {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: String,
    pub mot_de_passe: String,
    pub role: String,
}

/// Which foreign-key contract the backend expects for procedure payloads.
///
/// Two shapes were observed in the wild: one keyed by numeric ids
/// (`categorieId`, `sousCategorieId`) and one keyed by names (`categorie`,
/// `sousCategorie`). The client does not guess; the choice is made at
/// [`crate::api::FasoDocsApi`] construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcedureFkStyle {
    #[default]
    Id,
    Nom,
}

#[derive(Debug, Clone, Default)]
pub struct ProcedureDraft {
    pub nom: String,
    pub titre: String,
    pub description: String,
    pub delai: String,
    pub categorie_id: Option<i64>,
    pub sous_categorie_id: Option<i64>,
    pub centre_id: Option<i64>,
    pub cout_id: Option<i64>,
    /// Names mirrored from the selected dropdown entries, used only when the
    /// client is configured for [`ProcedureFkStyle::Nom`].
    pub categorie_nom: Option<String>,
    pub sous_categorie_nom: Option<String>,
    pub etapes: Vec<Etape>,
    pub documents_requis: Vec<DocumentRequis>,
    pub references_legales: Vec<ReferenceLegale>,
}

impl ProcedureDraft {
    /// Builds the JSON body for create/update in the configured FK style.
    /// Optional relations are omitted entirely rather than sent as null.
    pub fn payload(&self, style: ProcedureFkStyle) -> serde_json::Value {
        let mut body = json!({
            "nom": self.nom,
            "titre": self.titre,
            "description": self.description,
            "delai": self.delai,
            "etapes": self.etapes,
            "documentsRequis": self.documents_requis,
            "referencesLegales": self.references_legales,
        });
        let map = body.as_object_mut().expect("payload root is an object");
        match style {
            ProcedureFkStyle::Id => {
                if let Some(id) = self.categorie_id {
                    map.insert("categorieId".into(), json!(id));
                }
                if let Some(id) = self.sous_categorie_id {
                    map.insert("sousCategorieId".into(), json!(id));
                }
            }
            ProcedureFkStyle::Nom => {
                if let Some(nom) = &self.categorie_nom {
                    map.insert("categorie".into(), json!(nom));
                }
                if let Some(nom) = &self.sous_categorie_nom {
                    map.insert("sousCategorie".into(), json!(nom));
                }
            }
        }
        if let Some(id) = self.centre_id {
            map.insert("centreId".into(), json!(id));
        }
        if let Some(id) = self.cout_id {
            map.insert("coutId".into(), json!(id));
        }
        body
    }
}

/// Login/verification response. Older backend builds returned `accessToken`
/// where newer ones return `token`; both are accepted, `token` wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl AuthResponse {
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().or(self.access_token.as_deref())
    }
}

// =========================================================
// Last-admin guards (client-side, checked before any request)
// =========================================================

/// True when removing `user` would leave the system without any ADMIN.
pub fn is_last_admin(users: &[Utilisateur], user: &Utilisateur) -> bool {
    user.is_admin() && users.iter().filter(|u| u.is_admin()).count() <= 1
}

/// True when deactivating `user` would leave the system without any active
/// ADMIN.
pub fn is_last_active_admin(users: &[Utilisateur], user: &Utilisateur) -> bool {
    user.is_admin()
        && users
            .iter()
            .filter(|u| u.is_admin() && u.est_actif)
            .count()
            <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: &str, actif: bool) -> Utilisateur {
        Utilisateur {
            id,
            nom: "Traoré".into(),
            prenom: "Awa".into(),
            telephone: "+22670000000".into(),
            email: "awa@example.com".into(),
            role: role.into(),
            est_actif: actif,
        }
    }

    #[test]
    fn sole_admin_cannot_be_deleted() {
        let users = vec![user(1, ROLE_ADMIN, true), user(2, "EDITEUR", true)];
        assert!(is_last_admin(&users, &users[0]));
        assert!(!is_last_admin(&users, &users[1]));
    }

    #[test]
    fn sole_active_admin_cannot_be_deactivated() {
        let users = vec![
            user(1, ROLE_ADMIN, true),
            user(2, ROLE_ADMIN, false),
            user(3, "EDITEUR", true),
        ];
        // Two admins exist, so deletion of either is allowed...
        assert!(!is_last_admin(&users, &users[0]));
        // ...but only one is active.
        assert!(is_last_active_admin(&users, &users[0]));
        assert!(!is_last_active_admin(&users, &users[2]));
    }

    #[test]
    fn guard_relaxes_with_a_second_active_admin() {
        let users = vec![user(1, ROLE_ADMIN, true), user(2, ROLE_ADMIN, true)];
        assert!(!is_last_active_admin(&users, &users[0]));
    }

    #[test]
    fn auth_response_prefers_token_over_access_token() {
        let both: AuthResponse =
            serde_json::from_str(r#"{"token":"a","accessToken":"b"}"#).unwrap();
        assert_eq!(both.bearer(), Some("a"));
        let legacy: AuthResponse = serde_json::from_str(r#"{"accessToken":"b"}"#).unwrap();
        assert_eq!(legacy.bearer(), Some("b"));
        let neither: AuthResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(neither.bearer(), None);
    }

    #[test]
    fn categorie_round_trips_camel_case() {
        let cat: Categorie = serde_json::from_str(
            r#"{"id":4,"titre":"Santé","nomCategorie":"SANTE","iconeUrl":null}"#,
        )
        .unwrap();
        assert_eq!(cat.nom_categorie, "SANTE");
        let back = serde_json::to_value(&cat).unwrap();
        assert_eq!(back["nomCategorie"], "SANTE");
    }

    #[test]
    fn procedure_payload_by_id() {
        let draft = ProcedureDraft {
            nom: "CNIB".into(),
            titre: "Carte nationale d'identité".into(),
            delai: "7 jours".into(),
            categorie_id: Some(2),
            sous_categorie_id: None,
            cout_id: Some(9),
            categorie_nom: Some("Identité".into()),
            ..Default::default()
        };
        let body = draft.payload(ProcedureFkStyle::Id);
        assert_eq!(body["categorieId"], 2);
        assert_eq!(body["coutId"], 9);
        assert!(body.get("sousCategorieId").is_none());
        assert!(body.get("categorie").is_none());
    }

    #[test]
    fn procedure_payload_by_name() {
        let draft = ProcedureDraft {
            nom: "CNIB".into(),
            titre: "Carte nationale d'identité".into(),
            delai: "7 jours".into(),
            categorie_id: Some(2),
            categorie_nom: Some("Identité".into()),
            sous_categorie_nom: Some("Pièces".into()),
            ..Default::default()
        };
        let body = draft.payload(ProcedureFkStyle::Nom);
        assert_eq!(body["categorie"], "Identité");
        assert_eq!(body["sousCategorie"], "Pièces");
        assert!(body.get("categorieId").is_none());
    }
}
