//! Shared form state and editor for procedures, used by both the creation
//! and the edition screens.
//!
//! `RwSignal` fields make the whole state `Copy`, so it moves into event
//! handlers without ceremony. The repeated sections (steps, required
//! documents, legal references) are keyed rows of signals: typing writes the
//! row's own signal, the surrounding list only changes on add or remove, so
//! the focused input is never rebuilt mid-keystroke.

use leptos::prelude::*;

use crate::cache::use_data_cache;
use crate::model::{Centre, Cout, DocumentRequis, Etape, Procedure, ProcedureDraft, ReferenceLegale};

/// One step row. The key is stable for the lifetime of the form so `<For>`
/// can keep the DOM node while the fields change.
#[derive(Clone, Copy)]
pub struct EtapeRow {
    pub key: usize,
    pub nom: RwSignal<String>,
    pub description: RwSignal<String>,
}

impl EtapeRow {
    fn new(key: usize, etape: Etape) -> Self {
        Self {
            key,
            nom: RwSignal::new(etape.nom),
            description: RwSignal::new(etape.description),
        }
    }

    fn commit(&self, ordre: u32) -> Etape {
        Etape {
            nom: self.nom.get_untracked(),
            description: self.description.get_untracked(),
            ordre,
        }
    }
}

/// One required-document row.
#[derive(Clone, Copy)]
pub struct DocumentRow {
    pub key: usize,
    pub nom: RwSignal<String>,
    pub description: RwSignal<String>,
    pub obligatoire: RwSignal<bool>,
    modele_url: RwSignal<Option<String>>,
}

impl DocumentRow {
    fn new(key: usize, document: DocumentRequis) -> Self {
        Self {
            key,
            nom: RwSignal::new(document.nom),
            description: RwSignal::new(document.description),
            obligatoire: RwSignal::new(document.obligatoire),
            modele_url: RwSignal::new(document.modele_url),
        }
    }

    fn commit(&self) -> DocumentRequis {
        DocumentRequis {
            nom: self.nom.get_untracked(),
            description: self.description.get_untracked(),
            obligatoire: self.obligatoire.get_untracked(),
            modele_url: self.modele_url.get_untracked(),
        }
    }
}

/// One legal-reference row.
#[derive(Clone, Copy)]
pub struct ReferenceRow {
    pub key: usize,
    pub texte_reference: RwSignal<String>,
    pub description: RwSignal<String>,
    lien_audio: RwSignal<Option<String>>,
}

impl ReferenceRow {
    fn new(key: usize, reference: ReferenceLegale) -> Self {
        Self {
            key,
            texte_reference: RwSignal::new(reference.texte_reference),
            description: RwSignal::new(reference.description),
            lien_audio: RwSignal::new(reference.lien_audio),
        }
    }

    fn commit(&self) -> ReferenceLegale {
        ReferenceLegale {
            description: self.description.get_untracked(),
            texte_reference: self.texte_reference.get_untracked(),
            lien_audio: self.lien_audio.get_untracked(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct ProcedureFormState {
    pub nom: RwSignal<String>,
    pub titre: RwSignal<String>,
    pub description: RwSignal<String>,
    pub delai: RwSignal<String>,
    pub categorie_id: RwSignal<String>,
    pub sous_categorie_id: RwSignal<String>,
    pub centre_id: RwSignal<String>,
    pub cout_id: RwSignal<String>,
    pub etapes: RwSignal<Vec<EtapeRow>>,
    pub documents: RwSignal<Vec<DocumentRow>>,
    pub references: RwSignal<Vec<ReferenceRow>>,
    next_key: RwSignal<usize>,
}

impl ProcedureFormState {
    pub fn new() -> Self {
        Self {
            nom: RwSignal::new(String::new()),
            titre: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            delai: RwSignal::new(String::new()),
            categorie_id: RwSignal::new(String::new()),
            sous_categorie_id: RwSignal::new(String::new()),
            centre_id: RwSignal::new(String::new()),
            cout_id: RwSignal::new(String::new()),
            etapes: RwSignal::new(Vec::new()),
            documents: RwSignal::new(Vec::new()),
            references: RwSignal::new(Vec::new()),
            next_key: RwSignal::new(0),
        }
    }

    fn alloc_key(&self) -> usize {
        let key = self.next_key.get_untracked();
        self.next_key.set(key + 1);
        key
    }

    pub fn push_etape(&self, etape: Etape) {
        let row = EtapeRow::new(self.alloc_key(), etape);
        self.etapes.update(|rows| rows.push(row));
    }

    pub fn remove_etape(&self, key: usize) {
        self.etapes.update(|rows| rows.retain(|r| r.key != key));
    }

    pub fn push_document(&self, document: DocumentRequis) {
        let row = DocumentRow::new(self.alloc_key(), document);
        self.documents.update(|rows| rows.push(row));
    }

    pub fn remove_document(&self, key: usize) {
        self.documents.update(|rows| rows.retain(|r| r.key != key));
    }

    pub fn push_reference(&self, reference: ReferenceLegale) {
        let row = ReferenceRow::new(self.alloc_key(), reference);
        self.references.update(|rows| rows.push(row));
    }

    pub fn remove_reference(&self, key: usize) {
        self.references.update(|rows| rows.retain(|r| r.key != key));
    }

    /// Prefills every field from an existing procedure.
    pub fn load(&self, procedure: &Procedure) {
        self.nom.set(procedure.nom.clone());
        self.titre.set(procedure.titre.clone());
        self.description
            .set(procedure.description.clone().unwrap_or_default());
        self.delai.set(procedure.delai.clone());
        self.categorie_id.set(procedure.categorie_id.to_string());
        self.sous_categorie_id.set(
            procedure
                .sous_categorie_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        );
        self.centre_id.set(
            procedure
                .centre_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        );
        self.cout_id.set(
            procedure
                .cout_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        );
        self.etapes.set(Vec::new());
        for etape in procedure.etapes.clone() {
            self.push_etape(etape);
        }
        self.documents.set(Vec::new());
        for document in procedure.documents_requis.clone() {
            self.push_document(document);
        }
        self.references.set(Vec::new());
        for reference in procedure.references_legales.clone() {
            self.push_reference(reference);
        }
    }

    /// Validation message, or `None` when the form can be submitted.
    pub fn validate(&self) -> Option<String> {
        if self.nom.get_untracked().trim().is_empty()
            || self.titre.get_untracked().trim().is_empty()
            || self.delai.get_untracked().trim().is_empty()
        {
            return Some("Le nom, le titre et le délai sont obligatoires.".to_string());
        }
        if self.categorie_id.get_untracked().parse::<i64>().is_err() {
            return Some("Veuillez choisir une catégorie.".to_string());
        }
        None
    }

    /// Builds the request draft. Step ordering is renumbered from 1 so
    /// removals in the middle never leave gaps.
    pub fn to_draft(
        &self,
        categorie_nom: Option<String>,
        sous_categorie_nom: Option<String>,
    ) -> ProcedureDraft {
        let etapes = self
            .etapes
            .get_untracked()
            .iter()
            .enumerate()
            .map(|(i, row)| row.commit((i + 1) as u32))
            .collect();

        ProcedureDraft {
            nom: self.nom.get_untracked().trim().to_string(),
            titre: self.titre.get_untracked().trim().to_string(),
            description: self.description.get_untracked().trim().to_string(),
            delai: self.delai.get_untracked().trim().to_string(),
            categorie_id: self.categorie_id.get_untracked().parse().ok(),
            sous_categorie_id: self.sous_categorie_id.get_untracked().parse().ok(),
            centre_id: self.centre_id.get_untracked().parse().ok(),
            cout_id: self.cout_id.get_untracked().parse().ok(),
            categorie_nom,
            sous_categorie_nom,
            etapes,
            documents_requis: self
                .documents
                .get_untracked()
                .iter()
                .map(DocumentRow::commit)
                .collect(),
            references_legales: self
                .references
                .get_untracked()
                .iter()
                .map(ReferenceRow::commit)
                .collect(),
        }
    }
}

impl Default for ProcedureFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Scalar fields and relation dropdowns shared by the create and edit
/// screens. Categories and subcategories come from the data cache; centres
/// and costs are read-only referentials passed in by the page.
#[component]
pub fn ProcedureFields(
    state: ProcedureFormState,
    centres: RwSignal<Vec<Centre>>,
    couts: RwSignal<Vec<Cout>>,
) -> impl IntoView {
    let cache = use_data_cache();
    let categories = cache.categories;
    let sous_categories = cache.sous_categories;

    // Subcategory choices follow the selected category.
    let filtered_sous_categories = move || {
        let selected = state.categorie_id.get().parse::<i64>().ok();
        sous_categories
            .get()
            .into_iter()
            .filter(|sc| Some(sc.categorie_id) == selected)
            .collect::<Vec<_>>()
    };

    view! {
        <div class="grid grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label" for="nom">
                    <span class="label-text">"Nom technique"</span>
                </label>
                <input
                    id="nom"
                    type="text"
                    placeholder="CNIB"
                    class="input input-bordered"
                    on:input=move |ev| state.nom.set(event_target_value(&ev))
                    prop:value=state.nom
                    required
                />
            </div>
            <div class="form-control">
                <label class="label" for="titre">
                    <span class="label-text">"Titre affiché"</span>
                </label>
                <input
                    id="titre"
                    type="text"
                    placeholder="Carte d'identité"
                    class="input input-bordered"
                    on:input=move |ev| state.titre.set(event_target_value(&ev))
                    prop:value=state.titre
                    required
                />
            </div>
        </div>

        <div class="form-control">
            <label class="label" for="description">
                <span class="label-text">"Description"</span>
            </label>
            <textarea
                id="description"
                class="textarea textarea-bordered"
                on:input=move |ev| state.description.set(event_target_value(&ev))
                prop:value=state.description
            ></textarea>
        </div>

        <div class="form-control">
            <label class="label" for="delai">
                <span class="label-text">"Délai de traitement"</span>
            </label>
            <input
                id="delai"
                type="text"
                placeholder="7 jours"
                class="input input-bordered"
                on:input=move |ev| state.delai.set(event_target_value(&ev))
                prop:value=state.delai
                required
            />
        </div>

        <div class="grid grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label" for="categorie">
                    <span class="label-text">"Catégorie"</span>
                </label>
                <select
                    id="categorie"
                    class="select select-bordered"
                    on:change=move |ev| {
                        state.categorie_id.set(event_target_value(&ev));
                        state.sous_categorie_id.set(String::new());
                    }
                    prop:value=state.categorie_id
                    required
                >
                    <option value="">"Choisir une catégorie"</option>
                    <For
                        each=move || categories.get()
                        key=|c| c.id
                        children=move |c| {
                            view! { <option value=c.id.to_string()>{c.titre.clone()}</option> }
                        }
                    />
                </select>
            </div>
            <div class="form-control">
                <label class="label" for="sous-categorie">
                    <span class="label-text">"Sous-catégorie"</span>
                </label>
                <select
                    id="sous-categorie"
                    class="select select-bordered"
                    on:change=move |ev| state.sous_categorie_id.set(event_target_value(&ev))
                    prop:value=state.sous_categorie_id
                >
                    <option value="">"Aucune"</option>
                    <For
                        each=filtered_sous_categories
                        key=|sc| sc.id
                        children=move |sc| {
                            view! { <option value=sc.id.to_string()>{sc.nom.clone()}</option> }
                        }
                    />
                </select>
            </div>
        </div>

        <div class="grid grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label" for="centre">
                    <span class="label-text">"Centre de traitement"</span>
                </label>
                <select
                    id="centre"
                    class="select select-bordered"
                    on:change=move |ev| state.centre_id.set(event_target_value(&ev))
                    prop:value=state.centre_id
                >
                    <option value="">"Aucun"</option>
                    <For
                        each=move || centres.get()
                        key=|c| c.id
                        children=move |c| {
                            view! { <option value=c.id.to_string()>{c.nom.clone()}</option> }
                        }
                    />
                </select>
            </div>
            <div class="form-control">
                <label class="label" for="cout">
                    <span class="label-text">"Coût"</span>
                </label>
                <select
                    id="cout"
                    class="select select-bordered"
                    on:change=move |ev| state.cout_id.set(event_target_value(&ev))
                    prop:value=state.cout_id
                >
                    <option value="">"Aucun"</option>
                    <For
                        each=move || couts.get()
                        key=|c| c.id
                        children=move |c| {
                            let label = format!(
                                "{} {}",
                                c.montant,
                                c.type_monnaie.clone().unwrap_or_else(|| "FCFA".to_string()),
                            );
                            view! { <option value=c.id.to_string()>{label}</option> }
                        }
                    />
                </select>
            </div>
        </div>

        <EtapesEditor state=state />
        <DocumentsEditor state=state />
        <ReferencesEditor state=state />
    }
}

/// Editor for the ordered list of steps.
#[component]
pub fn EtapesEditor(state: ProcedureFormState) -> impl IntoView {
    let etapes = state.etapes;

    let add_etape = move |_| {
        state.push_etape(Etape {
            nom: String::new(),
            description: String::new(),
            ordre: 0,
        });
    };

    view! {
        <div class="space-y-2">
            <div class="flex items-center justify-between">
                <span class="label-text font-semibold">"Étapes"</span>
                <button type="button" class="btn btn-xs btn-outline" on:click=add_etape>
                    "+ Ajouter une étape"
                </button>
            </div>
            <For
                each=move || etapes.get()
                key=|row| row.key
                children=move |row| {
                    // Position, not key: rows renumber when one is removed.
                    let position = move || {
                        etapes
                            .get()
                            .iter()
                            .position(|r| r.key == row.key)
                            .map(|i| i + 1)
                            .unwrap_or_default()
                    };
                    view! {
                        <div class="flex gap-2 items-start">
                            <span class="badge badge-neutral mt-2">{position}</span>
                            <input
                                class="input input-bordered input-sm flex-1"
                                placeholder="Nom de l'étape"
                                prop:value=row.nom
                                on:input=move |ev| row.nom.set(event_target_value(&ev))
                            />
                            <input
                                class="input input-bordered input-sm flex-1"
                                placeholder="Description"
                                prop:value=row.description
                                on:input=move |ev| row.description.set(event_target_value(&ev))
                            />
                            <button
                                type="button"
                                class="btn btn-xs btn-error btn-outline mt-1"
                                on:click=move |_| state.remove_etape(row.key)
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

/// Editor for the required documents list.
#[component]
pub fn DocumentsEditor(state: ProcedureFormState) -> impl IntoView {
    let documents = state.documents;

    let add_document = move |_| {
        state.push_document(DocumentRequis {
            nom: String::new(),
            description: String::new(),
            obligatoire: true,
            modele_url: None,
        });
    };

    view! {
        <div class="space-y-2">
            <div class="flex items-center justify-between">
                <span class="label-text font-semibold">"Documents requis"</span>
                <button type="button" class="btn btn-xs btn-outline" on:click=add_document>
                    "+ Ajouter un document"
                </button>
            </div>
            <For
                each=move || documents.get()
                key=|row| row.key
                children=move |row| {
                    view! {
                        <div class="flex gap-2 items-center">
                            <input
                                class="input input-bordered input-sm flex-1"
                                placeholder="Nom du document"
                                prop:value=row.nom
                                on:input=move |ev| row.nom.set(event_target_value(&ev))
                            />
                            <input
                                class="input input-bordered input-sm flex-1"
                                placeholder="Description"
                                prop:value=row.description
                                on:input=move |ev| row.description.set(event_target_value(&ev))
                            />
                            <label class="label cursor-pointer gap-1">
                                <span class="label-text text-xs">"Obligatoire"</span>
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-sm"
                                    prop:checked=row.obligatoire
                                    on:change=move |ev| {
                                        row.obligatoire.set(event_target_checked(&ev))
                                    }
                                />
                            </label>
                            <button
                                type="button"
                                class="btn btn-xs btn-error btn-outline"
                                on:click=move |_| state.remove_document(row.key)
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

/// Editor for the legal references list.
#[component]
pub fn ReferencesEditor(state: ProcedureFormState) -> impl IntoView {
    let references = state.references;

    let add_reference = move |_| {
        state.push_reference(ReferenceLegale {
            description: String::new(),
            texte_reference: String::new(),
            lien_audio: None,
        });
    };

    view! {
        <div class="space-y-2">
            <div class="flex items-center justify-between">
                <span class="label-text font-semibold">"Références légales"</span>
                <button type="button" class="btn btn-xs btn-outline" on:click=add_reference>
                    "+ Ajouter une référence"
                </button>
            </div>
            <For
                each=move || references.get()
                key=|row| row.key
                children=move |row| {
                    view! {
                        <div class="flex gap-2 items-center">
                            <input
                                class="input input-bordered input-sm flex-1"
                                placeholder="Texte de référence"
                                prop:value=row.texte_reference
                                on:input=move |ev| row.texte_reference.set(event_target_value(&ev))
                            />
                            <input
                                class="input input-bordered input-sm flex-1"
                                placeholder="Description"
                                prop:value=row.description
                                on:input=move |ev| row.description.set(event_target_value(&ev))
                            />
                            <button
                                type="button"
                                class="btn btn-xs btn-error btn-outline"
                                on:click=move |_| state.remove_reference(row.key)
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_state() -> ProcedureFormState {
        let state = ProcedureFormState::new();
        state.nom.set("CNIB".to_string());
        state.titre.set("Carte d'identité".to_string());
        state.delai.set("7 jours".to_string());
        state.categorie_id.set("3".to_string());
        state
    }

    fn etape(nom: &str, ordre: u32) -> Etape {
        Etape {
            nom: nom.to_string(),
            description: String::new(),
            ordre,
        }
    }

    #[test]
    fn validate_requires_the_mandatory_fields() {
        let state = ProcedureFormState::new();
        assert!(state.validate().is_some());

        let state = filled_state();
        assert!(state.validate().is_none());
    }

    #[test]
    fn validate_rejects_a_missing_category() {
        let state = filled_state();
        state.categorie_id.set(String::new());
        assert_eq!(
            state.validate().as_deref(),
            Some("Veuillez choisir une catégorie.")
        );
    }

    #[test]
    fn to_draft_renumbers_steps_from_one() {
        let state = filled_state();
        state.push_etape(etape("Dépôt", 5));
        state.push_etape(etape("Retrait", 9));
        let draft = state.to_draft(None, None);
        let ordres: Vec<u32> = draft.etapes.iter().map(|e| e.ordre).collect();
        assert_eq!(ordres, vec![1, 2]);
    }

    #[test]
    fn row_edits_flow_into_the_draft_and_removal_keeps_the_rest() {
        let state = filled_state();
        state.push_etape(etape("", 1));
        state.push_etape(etape("", 2));
        let rows = state.etapes.get_untracked();
        assert_ne!(rows[0].key, rows[1].key);

        // Typing writes the row's own signal, never the list.
        rows[0].nom.set("Dépôt".to_string());
        rows[1].nom.set("Retrait".to_string());
        assert_eq!(state.etapes.get_untracked().len(), 2);

        state.remove_etape(rows[0].key);
        let draft = state.to_draft(None, None);
        assert_eq!(draft.etapes.len(), 1);
        assert_eq!(draft.etapes[0].nom, "Retrait");
        assert_eq!(draft.etapes[0].ordre, 1);
    }

    #[test]
    fn load_round_trips_through_to_draft() {
        let procedure = Procedure {
            id: 12,
            nom: "CNIB".to_string(),
            titre: "Carte d'identité".to_string(),
            description: Some("Pièce nationale".to_string()),
            delai: "7 jours".to_string(),
            categorie_id: 3,
            sous_categorie_id: Some(4),
            centre_id: None,
            cout_id: Some(2),
            etapes: vec![etape("Dépôt", 1)],
            documents_requis: vec![DocumentRequis {
                nom: "Acte de naissance".to_string(),
                description: String::new(),
                obligatoire: true,
                modele_url: Some("https://example.org/acte.pdf".to_string()),
            }],
            references_legales: vec![ReferenceLegale {
                description: "Décret".to_string(),
                texte_reference: "Décret 2020-123".to_string(),
                lien_audio: None,
            }],
        };
        let state = ProcedureFormState::new();
        state.load(&procedure);
        let draft = state.to_draft(None, None);
        assert_eq!(draft.nom, "CNIB");
        assert_eq!(draft.categorie_id, Some(3));
        assert_eq!(draft.sous_categorie_id, Some(4));
        assert_eq!(draft.centre_id, None);
        assert_eq!(draft.cout_id, Some(2));
        assert_eq!(draft.etapes[0].nom, "Dépôt");
        assert_eq!(
            draft.documents_requis[0].modele_url.as_deref(),
            Some("https://example.org/acte.pdf")
        );
        assert_eq!(draft.references_legales[0].texte_reference, "Décret 2020-123");
    }
}
