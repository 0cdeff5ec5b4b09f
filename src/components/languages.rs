//! Supported languages screen. The catalogue is fixed for now; the backend
//! has no endpoint for it yet.

use leptos::prelude::*;

struct Langue {
    nom: &'static str,
    code: &'static str,
    active: bool,
}

const LANGUES: &[Langue] = &[
    Langue { nom: "Français", code: "fr", active: true },
    Langue { nom: "Anglais", code: "en", active: false },
    Langue { nom: "Bambara", code: "br", active: false },
    Langue { nom: "Espagnole", code: "es", active: true },
];

#[component]
pub fn LanguagesPage() -> impl IntoView {
    view! {
        <div class="space-y-4">
            <h2 class="text-2xl font-bold">"Langues"</h2>
            <div class="overflow-x-auto bg-base-100 rounded-lg shadow">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Langue"</th>
                            <th>"Code"</th>
                            <th>"Statut"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {LANGUES
                            .iter()
                            .map(|langue| {
                                view! {
                                    <tr>
                                        <td>{langue.nom}</td>
                                        <td>
                                            <code>{langue.code}</code>
                                        </td>
                                        <td>
                                            {if langue.active {
                                                view! {
                                                    <span class="badge badge-success">"Active"</span>
                                                }
                                                    .into_any()
                                            } else {
                                                view! {
                                                    <span class="badge badge-ghost">"Inactive"</span>
                                                }
                                                    .into_any()
                                            }}
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
