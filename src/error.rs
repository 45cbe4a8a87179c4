// ============================================================================
// Module : error
// ============================================================================
// Erreurs métier affichées à l'utilisateur
//
// CONCEPTS RUST :
// 1. thiserror : dérive Display + Error à partir d'attributs
// 2. Deux familles d'erreurs :
//    - Erreurs métier (ici) : validation, affichées dans le footer
//    - Erreurs techniques (anyhow) : I/O, HTTP, JSON, loggées
// ============================================================================

use thiserror::Error;

/// Rejet d'un lancement par le formulaire
///
/// Le texte de chaque variant est le message montré à l'utilisateur.
/// Aucune de ces erreurs ne modifie la liste des lancements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Preencha todos os campos obrigatórios!")]
    MissingFields,

    #[error("Valor inválido: {0}")]
    InvalidAmount(String),

    #[error("O valor deve ser maior que zero!")]
    NonPositiveAmount,

    #[error("Data inválida: {0}")]
    InvalidDate(String),

    #[error("Categoria desconhecida: {0}")]
    UnknownCategory(String),

    /// Le lancement est valide mais n'a pas pu être sauvegardé
    #[error("Falha ao salvar lançamentos: {0}")]
    Storage(String),
}

/// Transition refusée dans le checkout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Champs obligatoires de l'étape 1 manquants (noms des champs)
    #[error("Preencha: {}", .0.join(", "))]
    MissingPersonalFields(Vec<&'static str>),

    /// Champs obligatoires de l'étape 2 manquants
    #[error("Preencha: {}", .0.join(", "))]
    MissingPaymentFields(Vec<&'static str>),

    /// Transition demandée depuis la mauvaise étape
    #[error("Ação indisponível na etapa {0}")]
    WrongStep(u8),

    /// Paiement déjà en cours de traitement
    #[error("Pagamento em processamento...")]
    Processing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_error_messages() {
        assert_eq!(
            EntryError::MissingFields.to_string(),
            "Preencha todos os campos obrigatórios!"
        );
        assert_eq!(
            EntryError::NonPositiveAmount.to_string(),
            "O valor deve ser maior que zero!"
        );
    }

    #[test]
    fn test_checkout_error_lists_fields() {
        let err = CheckoutError::MissingPersonalFields(vec!["Email", "CPF"]);
        assert_eq!(err.to_string(), "Preencha: Email, CPF");
    }
}
