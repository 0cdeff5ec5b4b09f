//! Download activity screen. Placeholder data until the backend exposes a
//! download log endpoint.

use leptos::prelude::*;

struct Telechargement {
    email: &'static str,
    date: &'static str,
    statut: &'static str,
}

const TELECHARGEMENTS: &[Telechargement] = &[
    Telechargement { email: "Issiaka@gmail.com", date: "13/10/2025", statut: "Complet" },
    Telechargement { email: "traorea12@gmail.com", date: "12/07/2025", statut: "Complet" },
    Telechargement { email: "nouu98@gmail.com", date: "08/11/2025", statut: "En cours" },
    Telechargement { email: "moussatraore@gmail.com", date: "10/09/2025", statut: "Arrêter" },
];

fn statut_badge(statut: &str) -> &'static str {
    match statut {
        "Complet" => "badge badge-success",
        "En cours" => "badge badge-info",
        _ => "badge badge-error",
    }
}

#[component]
pub fn DownloadsPage() -> impl IntoView {
    view! {
        <div class="space-y-4">
            <h2 class="text-2xl font-bold">"Téléchargements"</h2>
            <div class="overflow-x-auto bg-base-100 rounded-lg shadow">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Utilisateur"</th>
                            <th>"Date"</th>
                            <th>"Statut"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {TELECHARGEMENTS
                            .iter()
                            .map(|t| {
                                view! {
                                    <tr>
                                        <td>{t.email}</td>
                                        <td>{t.date}</td>
                                        <td>
                                            <span class=statut_badge(t.statut)>{t.statut}</span>
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
