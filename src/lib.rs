// ============================================================================
// MyFinance - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests d'intégration
// ============================================================================

pub mod api;     // Client ViaCEP (recherche d'adresse par CEP)
pub mod app;     // État de l'application + routes
pub mod config;  // Configuration (variables d'environnement)
pub mod error;   // Erreurs métier (validation)
pub mod models;  // Structures de données
pub mod storage; // Persistance clé/valeur des lançamentos
pub mod ui;      // Interface utilisateur
pub mod worker;  // Worker thread (CEP, paiement simulé)
