//! Confirmation dialog broker.
//!
//! Any view can ask for a confirmation and await a boolean without knowing
//! which component renders the modal. One slot holds the pending request;
//! the layout owns the single dialog surface and resolves it. A second
//! `confirm` issued while one is pending replaces it, and the superseded
//! caller resolves to `false` so no future is left dangling.

use futures::channel::oneshot;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Delete,
    Edit,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogRequest {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub kind: DialogKind,
}

impl DialogRequest {
    pub fn delete(title: &str, message: String) -> Self {
        Self {
            title: title.to_string(),
            message,
            confirm_text: "Supprimer".to_string(),
            kind: DialogKind::Delete,
        }
    }

    pub fn info(title: &str, message: String, confirm_text: &str) -> Self {
        Self {
            title: title.to_string(),
            message,
            confirm_text: confirm_text.to_string(),
            kind: DialogKind::Info,
        }
    }
}

struct PendingDialog {
    request: DialogRequest,
    resolver: oneshot::Sender<bool>,
}

/// Single-slot request/response channel between views and the dialog
/// surface. `Copy`, shared through context.
#[derive(Clone, Copy)]
pub struct DialogBroker {
    slot: RwSignal<Option<PendingDialog>>,
}

impl DialogBroker {
    pub fn new() -> Self {
        Self {
            slot: RwSignal::new(None),
        }
    }

    /// Parks `request` until the dialog surface resolves it. Resolves to
    /// `false` if the request is superseded or the surface disappears.
    pub async fn confirm(&self, request: DialogRequest) -> bool {
        let (tx, rx) = oneshot::channel();
        let superseded = self.slot.write().replace(PendingDialog {
            request,
            resolver: tx,
        });
        if let Some(previous) = superseded {
            let _ = previous.resolver.send(false);
        }
        rx.await.unwrap_or(false)
    }

    /// Reactive view of the pending request, for the dialog surface.
    pub fn pending_request(&self) -> Option<DialogRequest> {
        self.slot.with(|slot| slot.as_ref().map(|d| d.request.clone()))
    }

    /// Resolves the pending request exactly once; extra calls are no-ops.
    pub fn resolve(&self, confirmed: bool) {
        if let Some(dialog) = self.slot.write().take() {
            let _ = dialog.resolver.send(confirmed);
        }
    }
}

impl Default for DialogBroker {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_dialog() -> DialogBroker {
    use_context::<DialogBroker>().expect("DialogBroker should be provided at the app root")
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn request(title: &str) -> DialogRequest {
        DialogRequest::delete(title, "Voulez-vous vraiment continuer ?".to_string())
    }

    #[test]
    fn resolves_true_on_confirm() {
        let broker = DialogBroker::new();
        let mut fut = Box::pin(broker.confirm(request("Suppression")));
        // First poll parks the request in the slot.
        assert!(fut.as_mut().now_or_never().is_none());
        assert_eq!(
            broker.pending_request().map(|r| r.title),
            Some("Suppression".to_string())
        );

        broker.resolve(true);
        assert_eq!(fut.now_or_never(), Some(true));
        assert!(broker.pending_request().is_none());
    }

    #[test]
    fn resolves_false_on_cancel() {
        let broker = DialogBroker::new();
        let mut fut = Box::pin(broker.confirm(request("Suppression")));
        assert!(fut.as_mut().now_or_never().is_none());
        broker.resolve(false);
        assert_eq!(fut.now_or_never(), Some(false));
    }

    #[test]
    fn resolver_fires_at_most_once() {
        let broker = DialogBroker::new();
        let mut fut = Box::pin(broker.confirm(request("Suppression")));
        assert!(fut.as_mut().now_or_never().is_none());
        broker.resolve(true);
        // Slot is empty now, a stray second resolve must not panic or leak.
        broker.resolve(false);
        assert_eq!(fut.now_or_never(), Some(true));
    }

    #[test]
    fn second_request_supersedes_the_first() {
        let broker = DialogBroker::new();
        let mut first = Box::pin(broker.confirm(request("Première")));
        assert!(first.as_mut().now_or_never().is_none());

        let mut second = Box::pin(broker.confirm(request("Seconde")));
        assert!(second.as_mut().now_or_never().is_none());

        // The superseded caller is released with a refusal.
        assert_eq!(first.now_or_never(), Some(false));
        assert_eq!(
            broker.pending_request().map(|r| r.title),
            Some("Seconde".to_string())
        );

        broker.resolve(true);
        assert_eq!(second.now_or_never(), Some(true));
    }
}
