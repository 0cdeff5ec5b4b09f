//! Modal surface for the dialog broker. Mounted once, inside the layout.

use leptos::prelude::*;

use crate::dialog::{DialogKind, use_dialog};

#[component]
pub fn ConfirmDialog() -> impl IntoView {
    let broker = use_dialog();

    view! {
        <Show when=move || broker.pending_request().is_some()>
            {move || {
                broker
                    .pending_request()
                    .map(|request| {
                        let confirm_class = match request.kind {
                            DialogKind::Delete => "btn btn-error",
                            DialogKind::Edit => "btn btn-warning",
                            DialogKind::Info => "btn btn-primary",
                        };
                        view! {
                            <div
                                class="modal modal-open"
                                on:click=move |_| broker.resolve(false)
                            >
                                <div
                                    class="modal-box"
                                    on:click=move |ev| ev.stop_propagation()
                                >
                                    <h3 class="font-bold text-lg">{request.title.clone()}</h3>
                                    <p class="py-4">{request.message.clone()}</p>
                                    <div class="modal-action">
                                        <button
                                            class="btn btn-ghost"
                                            on:click=move |_| broker.resolve(false)
                                        >
                                            "Annuler"
                                        </button>
                                        <button
                                            class=confirm_class
                                            on:click=move |_| broker.resolve(true)
                                        >
                                            {request.confirm_text.clone()}
                                        </button>
                                    </div>
                                </div>
                            </div>
                        }
                    })
            }}
        </Show>
    }
}
