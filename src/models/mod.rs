// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public (accessible depuis l'extérieur)
// - Les re-exports permettent d'écrire myfinance::models::LedgerEntry
// ============================================================================

pub mod entry;    // Lançamentos + formulaire
pub mod totals;   // Agrégation entrées / sorties / solde
pub mod plan;     // Catalogue des plans
pub mod checkout; // Assistant de paiement en 3 étapes

pub use entry::{Category, EntryForm, EntryKind, LedgerEntry};
pub use totals::{format_brl, Totals};
pub use plan::{Plan, PlanId};
pub use checkout::{
    format_card_number, Address, AddressLookup, CheckoutField, CheckoutSession, CheckoutStep,
    PaymentInfo, PersonalInfo,
};
