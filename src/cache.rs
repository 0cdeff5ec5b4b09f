//! Local mirror of the backend collections.
//!
//! Each collection lives in one [`CollectionStore`]; views read it through
//! the reactive signal (subscription with replay-latest semantics) and push
//! the results of their own create/update/delete calls into it, so every
//! subscribed screen reflects a mutation without re-fetching. The store
//! performs no network I/O: a view fetches only when its collection is
//! empty, which is the store's entire notion of staleness.

use leptos::prelude::*;

use crate::model::{Categorie, Keyed, Procedure, SousCategorie, Utilisateur};

/// Observable container for one entity collection.
///
/// Mutations take effect synchronously and in call order; a snapshot never
/// holds two items with the same id as long as ids enter via `add`/`set`
/// uniquely, because `update` replaces in place rather than appending.
pub struct CollectionStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    items: RwSignal<Vec<T>>,
}

// Manual impls: the store is a signal handle and copies regardless of
// whether `T` itself is `Copy`, which a derive would wrongly require.
impl<T> Clone for CollectionStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CollectionStore<T> where T: Clone + Send + Sync + 'static {}

/// Caps how many loads a view may issue for its collection, so a failing
/// backend is never hammered in a loop. One budget per screen visit.
#[derive(Clone, Copy)]
pub struct ReloadBudget {
    used: RwSignal<u32>,
    max: u32,
}

impl ReloadBudget {
    pub fn new(max: u32) -> Self {
        Self {
            used: RwSignal::new(0),
            max,
        }
    }

    /// Consumes one attempt; `false` once the budget is spent.
    pub fn try_take(&self) -> bool {
        let used = self.used.get_untracked();
        if used >= self.max {
            return false;
        }
        self.used.set(used + 1);
        true
    }

    /// Reactive: `true` when no attempts remain.
    pub fn exhausted(&self) -> bool {
        self.used.get() >= self.max
    }
}

impl<T> CollectionStore<T>
where
    T: Keyed + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
        }
    }

    /// Replace the whole snapshot and notify subscribers.
    pub fn set(&self, items: Vec<T>) {
        self.items.set(items);
    }

    /// Reactive read: subscribes the caller and replays the latest value.
    pub fn get(&self) -> Vec<T> {
        self.items.get()
    }

    /// Current value without subscribing.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.get_untracked()
    }

    pub fn is_empty(&self) -> bool {
        self.items.with_untracked(|items| items.is_empty())
    }

    pub fn find(&self, id: i64) -> Option<T> {
        self.items
            .with_untracked(|items| items.iter().find(|item| item.id() == id).cloned())
    }

    pub fn add(&self, item: T) {
        self.items.update(|items| items.push(item));
    }

    /// Replace the item with the same id; no-op when the id is absent.
    pub fn update(&self, item: T) {
        self.items.update(|items| {
            if let Some(slot) = items.iter_mut().find(|existing| existing.id() == item.id()) {
                *slot = item;
            }
        });
    }

    pub fn remove(&self, id: i64) {
        self.items.update(|items| items.retain(|item| item.id() != id));
    }
}

impl<T> Default for CollectionStore<T>
where
    T: Keyed + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// The four mirrored collections, provided once via context.
#[derive(Clone, Copy)]
pub struct DataCache {
    pub categories: CollectionStore<Categorie>,
    pub sous_categories: CollectionStore<SousCategorie>,
    pub utilisateurs: CollectionStore<Utilisateur>,
    pub procedures: CollectionStore<Procedure>,
}

impl DataCache {
    pub fn new() -> Self {
        Self {
            categories: CollectionStore::new(),
            sous_categories: CollectionStore::new(),
            utilisateurs: CollectionStore::new(),
            procedures: CollectionStore::new(),
        }
    }

    /// Dropped on logout so the next session starts from the backend.
    pub fn clear_all(&self) {
        self.categories.set(Vec::new());
        self.sous_categories.set(Vec::new());
        self.utilisateurs.set(Vec::new());
        self.procedures.set(Vec::new());
    }
}

impl Default for DataCache {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_data_cache() -> DataCache {
    use_context::<DataCache>().expect("DataCache should be provided at the app root")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, titre: &str) -> Categorie {
        Categorie {
            id,
            titre: titre.into(),
            nom_categorie: titre.to_uppercase(),
            description: None,
            icone_url: None,
        }
    }

    #[test]
    fn add_then_update_never_duplicates_ids() {
        let store = CollectionStore::new();
        store.add(cat(1, "Santé"));
        store.add(cat(2, "Justice"));
        store.update(cat(1, "Santé publique"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].titre, "Santé publique");
        let mut ids: Vec<_> = snapshot.iter().map(|c| c.id).collect();
        ids.dedup();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn update_with_absent_id_is_a_no_op() {
        let store = CollectionStore::new();
        store.add(cat(1, "Santé"));
        store.update(cat(99, "Fantôme"));
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.snapshot()[0].titre, "Santé");
    }

    #[test]
    fn remove_filters_by_id() {
        let store = CollectionStore::new();
        store.set(vec![cat(1, "A"), cat(2, "B"), cat(3, "C")]);
        store.remove(2);
        let ids: Vec<_> = store.snapshot().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        // Removing an unknown id changes nothing.
        store.remove(42);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn late_subscriber_sees_the_current_snapshot() {
        let store = CollectionStore::new();
        store.set(vec![cat(1, "Santé")]);
        // A reader arriving after `set` gets the latest value, not a default.
        assert_eq!(store.get().len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn find_returns_a_clone_by_id() {
        let store = CollectionStore::new();
        store.set(vec![cat(1, "A"), cat(2, "B")]);
        assert_eq!(store.find(2).map(|c| c.titre), Some("B".to_string()));
        assert!(store.find(9).is_none());
    }

    #[test]
    fn clear_all_empties_every_collection() {
        let cache = DataCache::new();
        cache.categories.add(cat(1, "A"));
        cache.utilisateurs.add(crate::model::Utilisateur {
            id: 1,
            nom: "Traoré".into(),
            prenom: "Awa".into(),
            telephone: "+22670000000".into(),
            email: "awa@example.com".into(),
            role: "ADMIN".into(),
            est_actif: true,
        });
        cache.clear_all();
        assert!(cache.categories.is_empty());
        assert!(cache.utilisateurs.is_empty());
    }

    #[test]
    fn stores_of_non_copy_items_still_copy() {
        fn assert_copy<C: Copy>(_: C) {}

        // `Categorie` is not `Copy`; the store handle must copy anyway so
        // views can move it into any number of closures.
        let store: CollectionStore<Categorie> = CollectionStore::new();
        assert_copy(store);
        assert_copy(DataCache::new());

        let a = store;
        let b = store;
        a.add(cat(1, "Santé"));
        assert_eq!(b.snapshot().len(), 1);
    }

    #[test]
    fn reload_budget_refuses_after_the_cap() {
        let budget = ReloadBudget::new(3);
        assert!(!budget.exhausted());
        assert!(budget.try_take());
        assert!(budget.try_take());
        assert!(budget.try_take());
        assert!(budget.exhausted());
        assert!(!budget.try_take());
        // Spent budgets stay spent.
        assert!(!budget.try_take());
    }
}
