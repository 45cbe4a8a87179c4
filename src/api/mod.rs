// ============================================================================
// Module : api
// ============================================================================
// Clients des services externes (recherche d'adresse par CEP)
// ============================================================================

pub mod viacep;  // Client API ViaCEP

// Re-export des fonctions principales
pub use viacep::{fetch_address, is_valid_cep};
