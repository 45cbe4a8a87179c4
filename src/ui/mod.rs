// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;   // Gestion des événements clavier
pub mod layout;   // Header (onglets) + footer (raccourcis, statut)
pub mod home;     // Écran d'accueil
pub mod plans;    // Cartes des plans
pub mod ledger;   // Formulaire + totaux + liste des lançamentos
pub mod checkout; // Assistant de paiement

use ratatui::Frame;

use crate::app::{App, Screen};

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Header et footer communs à tous les écrans
/// - Le contenu dépend de app.current_screen
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = layout::create_layout(frame.size());

    layout::render_header(frame, app, chunks[0]);

    match app.current_screen {
        Screen::Home => home::render_home(frame, app, chunks[1]),
        Screen::Plans => plans::render_plans(frame, app, chunks[1]),
        Screen::Ledger => ledger::render_ledger(frame, app, chunks[1]),
        Screen::Checkout => checkout::render_checkout(frame, app, chunks[1]),
    }

    layout::render_footer(frame, app, chunks[2]);
}
