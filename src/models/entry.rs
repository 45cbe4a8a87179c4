// ============================================================================
// Structure : LedgerEntry (lançamento)
// ============================================================================
// Représente une entrée ou une sortie d'argent dans le livre de comptes
//
// CONCEPTS RUST :
// 1. Serde rename : garder le format JSON historique (data, descricao, ...)
//    tout en utilisant des noms Rust idiomatiques
// 2. Decimal : montants exacts, jamais de f64 pour de l'argent
// 3. Validation : un EntryForm (texte brut) devient un LedgerEntry typé
//    seulement si toutes les règles passent
// ============================================================================

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EntryError;

/// Format de date utilisé dans le formulaire et dans le JSON
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Nombre maximum de décimales d'un montant (centavos)
pub const AMOUNT_DECIMALS: u32 = 2;

/// Plus grand montant accepté : R$ 999.999.999,99
///
/// Avec au plus 11 chiffres significatifs, "valor" reste exact une fois
/// stocké comme nombre JSON (f64), et les totaux ne peuvent pas déborder.
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999, AMOUNT_DECIMALS)
}

// ============================================================================
// Enum : EntryKind
// ============================================================================

/// Sens du lançamento : entrée ou sortie d'argent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Entrada,
    Saida,
}

impl EntryKind {
    /// Libellé affiché dans l'interface
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Entrada => "Entrada",
            EntryKind::Saida => "Saída",
        }
    }

    /// Signe affiché devant le montant dans la liste
    pub fn sign(&self) -> char {
        match self {
            EntryKind::Entrada => '+',
            EntryKind::Saida => '-',
        }
    }

    /// Bascule entre les deux variants (bouton radio)
    pub fn toggle(&self) -> Self {
        match self {
            EntryKind::Entrada => EntryKind::Saida,
            EntryKind::Saida => EntryKind::Entrada,
        }
    }
}

// ============================================================================
// Enum : Category
// ============================================================================
// CONCEPT RUST : Ensemble fermé de valeurs
// - Le <select> du formulaire devient un enum
// - ALL sert à la fois pour le cycle dans l'UI et pour le parsing
// ============================================================================

/// Catégorie d'un lançamento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Alimentação")]
    Alimentacao,
    #[serde(rename = "Transporte")]
    Transporte,
    #[serde(rename = "Moradia")]
    Moradia,
    #[serde(rename = "Saúde")]
    Saude,
    #[serde(rename = "Educação")]
    Educacao,
    #[serde(rename = "Lazer")]
    Lazer,
    #[serde(rename = "Salário")]
    Salario,
    #[serde(rename = "Investimentos")]
    Investimentos,
    #[serde(rename = "Outros")]
    Outros,
}

impl Category {
    /// Toutes les catégories, dans l'ordre du formulaire
    pub const ALL: [Category; 9] = [
        Category::Alimentacao,
        Category::Transporte,
        Category::Moradia,
        Category::Saude,
        Category::Educacao,
        Category::Lazer,
        Category::Salario,
        Category::Investimentos,
        Category::Outros,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Alimentacao => "Alimentação",
            Category::Transporte => "Transporte",
            Category::Moradia => "Moradia",
            Category::Saude => "Saúde",
            Category::Educacao => "Educação",
            Category::Lazer => "Lazer",
            Category::Salario => "Salário",
            Category::Investimentos => "Investimentos",
            Category::Outros => "Outros",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    /// Catégorie suivante (boucle à la fin)
    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Catégorie précédente (boucle au début)
    pub fn previous(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EntryError::UnknownCategory(wanted.to_string()))
    }
}

// ============================================================================
// Structure : LedgerEntry
// ============================================================================

/// Un lançamento validé
///
/// Immuable après création : il n'existe ni édition ni suppression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Identifiant unique (timestamp de création en millisecondes)
    pub id: i64,

    #[serde(rename = "data")]
    pub date: NaiveDate,

    #[serde(rename = "descricao")]
    pub description: String,

    #[serde(rename = "categoria")]
    pub category: Category,

    /// Toujours strictement positif, le sens est porté par `kind`
    #[serde(rename = "valor")]
    pub amount: Decimal,

    #[serde(rename = "tipo")]
    pub kind: EntryKind,
}

impl LedgerEntry {
    /// Date au format brésilien (dd/mm/aaaa)
    pub fn display_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// Montant signé : positif pour une entrée, négatif pour une sortie
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Entrada => self.amount,
            EntryKind::Saida => -self.amount,
        }
    }
}

// ============================================================================
// Structure : EntryForm
// ============================================================================
// CONCEPT : Formulaire = texte brut
// - Tous les champs sont des String (ce que l'utilisateur a tapé)
// - validate() est la seule porte d'entrée vers un LedgerEntry
// ============================================================================

/// Champs bruts du formulaire de lançamento
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub kind: EntryKind,
}

impl EntryForm {
    /// Formulaire vide avec la date donnée et le type "saída"
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            description: String::new(),
            category: String::new(),
            amount: String::new(),
            kind: EntryKind::Saida,
        }
    }

    /// Vide le formulaire après un ajout réussi (la date est conservée)
    pub fn reset(&mut self) {
        self.description.clear();
        self.category.clear();
        self.amount.clear();
        self.kind = EntryKind::Saida;
    }

    /// Passe à la catégorie suivante/précédente
    ///
    /// Un champ vide ou inconnu démarre sur la première catégorie.
    pub fn cycle_category(&mut self, forward: bool) {
        let next = match self.category.parse::<Category>() {
            Ok(current) if forward => current.next(),
            Ok(current) => current.previous(),
            Err(_) if forward => Category::ALL[0],
            Err(_) => Category::ALL[Category::ALL.len() - 1],
        };
        self.category = next.label().to_string();
    }

    /// Valide le formulaire et construit le lançamento
    ///
    /// # Erreurs
    /// - champ obligatoire vide : `MissingFields`
    /// - montant illisible : `InvalidAmount`
    /// - montant <= 0 : `NonPositiveAmount`
    /// - plus de 2 décimales ou au-dessus de max_amount() : `InvalidAmount`
    /// - date illisible : `InvalidDate`
    /// - catégorie inconnue : `UnknownCategory`
    pub fn validate(&self, id: i64) -> Result<LedgerEntry, EntryError> {
        let description = self.description.trim();
        if self.date.trim().is_empty()
            || description.is_empty()
            || self.category.trim().is_empty()
            || self.amount.trim().is_empty()
        {
            return Err(EntryError::MissingFields);
        }

        let amount = parse_amount(&self.amount)?;
        if amount <= Decimal::ZERO {
            return Err(EntryError::NonPositiveAmount);
        }
        // Pas de fractions de centavo (0.001, 10.505), pas de montants démesurés
        if amount.normalize().scale() > AMOUNT_DECIMALS || amount > max_amount() {
            return Err(EntryError::InvalidAmount(self.amount.trim().to_string()));
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| EntryError::InvalidDate(self.date.trim().to_string()))?;
        let category = self.category.parse::<Category>()?;

        Ok(LedgerEntry {
            id,
            date,
            description: description.to_string(),
            category,
            amount,
            kind: self.kind,
        })
    }
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// Parse un montant saisi ("10.50" ou "10,50")
fn parse_amount(raw: &str) -> Result<Decimal, EntryError> {
    let normalized = raw.trim().replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| EntryError::InvalidAmount(raw.trim().to_string()))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn filled_form() -> EntryForm {
        let mut form = EntryForm::new(today());
        form.description = "  Supermercado ".to_string();
        form.category = "Alimentação".to_string();
        form.amount = "10.50".to_string();
        form
    }

    #[test]
    fn test_validate_valid_form() {
        let entry = filled_form().validate(1).unwrap();
        assert_eq!(entry.id, 1);
        assert_eq!(entry.description, "Supermercado");
        assert_eq!(entry.category, Category::Alimentacao);
        assert_eq!(entry.amount, dec!(10.50));
        assert_eq!(entry.kind, EntryKind::Saida);
        assert_eq!(entry.date, today());
    }

    #[test]
    fn test_validate_accepts_comma_separator() {
        let mut form = filled_form();
        form.amount = "10,50".to_string();
        assert_eq!(form.validate(1).unwrap().amount, dec!(10.50));
    }

    #[test]
    fn test_validate_rejects_blank_description() {
        let mut form = filled_form();
        form.description = "   ".to_string();
        assert_eq!(form.validate(1), Err(EntryError::MissingFields));
    }

    #[test]
    fn test_validate_rejects_missing_category() {
        let mut form = filled_form();
        form.category.clear();
        assert_eq!(form.validate(1), Err(EntryError::MissingFields));
    }

    #[test]
    fn test_validate_rejects_zero_and_negative() {
        let mut form = filled_form();
        form.amount = "0".to_string();
        assert_eq!(form.validate(1), Err(EntryError::NonPositiveAmount));

        form.amount = "-5".to_string();
        assert_eq!(form.validate(1), Err(EntryError::NonPositiveAmount));
    }

    #[test]
    fn test_validate_rejects_garbage_amount() {
        let mut form = filled_form();
        form.amount = "abc".to_string();
        assert!(matches!(form.validate(1), Err(EntryError::InvalidAmount(_))));
    }

    #[test]
    fn test_validate_rejects_fractions_of_centavo() {
        let mut form = filled_form();
        form.amount = "0.001".to_string();
        assert_eq!(form.validate(1), Err(EntryError::InvalidAmount("0.001".to_string())));

        form.amount = "10,505".to_string();
        assert!(matches!(form.validate(1), Err(EntryError::InvalidAmount(_))));

        // Zéros de fin sans importance
        form.amount = "0.010".to_string();
        assert_eq!(form.validate(1).unwrap().amount, dec!(0.01));
    }

    #[test]
    fn test_validate_caps_amount() {
        let mut form = filled_form();
        form.amount = "999999999.99".to_string();
        assert_eq!(form.validate(1).unwrap().amount, max_amount());

        form.amount = "1000000000".to_string();
        assert!(matches!(form.validate(1), Err(EntryError::InvalidAmount(_))));

        form.amount = "50000000000000000000000000000".to_string();
        assert!(matches!(form.validate(1), Err(EntryError::InvalidAmount(_))));
    }

    #[test]
    fn test_max_amount_survives_json() {
        let mut form = filled_form();
        form.amount = "999999999.99".to_string();
        let entry = form.validate(1).unwrap();

        let json = serde_json::to_string(&entry).unwrap();
        let back: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        let mut form = filled_form();
        form.date = "15/03/2024".to_string();
        assert!(matches!(form.validate(1), Err(EntryError::InvalidDate(_))));
    }

    #[test]
    fn test_reset_keeps_date() {
        let mut form = filled_form();
        form.kind = EntryKind::Entrada;
        form.reset();
        assert_eq!(form.date, "2024-03-15");
        assert!(form.description.is_empty());
        assert!(form.category.is_empty());
        assert!(form.amount.is_empty());
        assert_eq!(form.kind, EntryKind::Saida);
    }

    #[test]
    fn test_cycle_category_wraps() {
        let mut form = EntryForm::new(today());
        form.cycle_category(true);
        assert_eq!(form.category, "Alimentação");
        form.cycle_category(false);
        assert_eq!(form.category, "Outros");
        form.cycle_category(true);
        assert_eq!(form.category, "Alimentação");
    }

    #[test]
    fn test_entry_json_field_names() {
        let entry = filled_form().validate(1710460800000).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], 1710460800000_i64);
        assert_eq!(json["data"], "2024-03-15");
        assert_eq!(json["descricao"], "Supermercado");
        assert_eq!(json["categoria"], "Alimentação");
        assert_eq!(json["valor"], 10.5);
        assert_eq!(json["tipo"], "saida");
    }

    #[test]
    fn test_entry_reads_stored_json() {
        let raw = r#"{"id":1,"data":"2024-01-02","descricao":"Salário","categoria":"Salário","valor":3500,"tipo":"entrada"}"#;
        let entry: LedgerEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.amount, dec!(3500));
        assert_eq!(entry.kind, EntryKind::Entrada);
        assert_eq!(entry.display_date(), "02/01/2024");
        assert_eq!(entry.signed_amount(), dec!(3500));
    }
}
