// ============================================================================
// Structure : Totals
// ============================================================================
// Agrège une liste de lançamentos en entrées / sorties / solde
//
// CONCEPTS RUST :
// 1. Fold : réduire un itérateur en une seule valeur
// 2. Copy : Totals est petit, on le copie au lieu de le référencer
// 3. Fonction pure : pas d'effet de bord, l'ordre des entrées ne compte pas
// ============================================================================

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{EntryKind, LedgerEntry};

/// Totaux affichés au-dessus de la liste
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// Somme des entrées
    pub total_in: Decimal,
    /// Somme des sorties (positive)
    pub total_out: Decimal,
    /// total_in - total_out
    pub balance: Decimal,
}

impl Totals {
    /// Calcule les totaux d'une liste de lançamentos
    ///
    /// CONCEPT RUST : fold
    /// - Accumulateur (entrées, sorties) mis à jour à chaque élément
    /// - O(n), un seul passage
    ///
    /// Ne panique jamais : une liste dont la somme dépasse Decimal::MAX
    /// (fichier édité à la main) donne des totaux saturés.
    pub fn from_entries(entries: &[LedgerEntry]) -> Self {
        Self::checked_from_entries(entries).unwrap_or_else(|| {
            let (total_in, total_out) = entries.iter().fold(
                (Decimal::ZERO, Decimal::ZERO),
                |(total_in, total_out), entry| match entry.kind {
                    EntryKind::Entrada => (total_in.saturating_add(entry.amount), total_out),
                    EntryKind::Saida => (total_in, total_out.saturating_add(entry.amount)),
                },
            );
            Self {
                total_in,
                total_out,
                balance: total_in.saturating_sub(total_out),
            }
        })
    }

    /// Comme from_entries(), mais None si une somme déborde
    pub fn checked_from_entries(entries: &[LedgerEntry]) -> Option<Self> {
        let (total_in, total_out) = entries.iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(total_in, total_out), entry| match entry.kind {
                EntryKind::Entrada => Some((total_in.checked_add(entry.amount)?, total_out)),
                EntryKind::Saida => Some((total_in, total_out.checked_add(entry.amount)?)),
            },
        )?;

        Some(Self {
            total_in,
            total_out,
            balance: total_in.checked_sub(total_out)?,
        })
    }

    /// Vrai si le solde est positif ou nul
    pub fn is_positive(&self) -> bool {
        self.balance >= Decimal::ZERO
    }
}

/// Formate un montant en reais avec deux décimales : "R$ 1234.50"
///
/// Le signe est placé après le symbole : "R$ -20.00".
pub fn format_brl(value: Decimal) -> String {
    format!(
        "R$ {:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(id: i64, amount: Decimal, kind: EntryKind) -> LedgerEntry {
        LedgerEntry {
            id,
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            description: format!("entry {}", id),
            category: Category::Outros,
            amount,
            kind,
        }
    }

    #[test]
    fn test_empty_list() {
        let totals = Totals::from_entries(&[]);
        assert_eq!(totals, Totals::default());
        assert!(totals.is_positive());
    }

    #[test]
    fn test_totals_split_by_kind() {
        let entries = vec![
            entry(1, dec!(3500), EntryKind::Entrada),
            entry(2, dec!(120.35), EntryKind::Saida),
            entry(3, dec!(0.65), EntryKind::Saida),
            entry(4, dec!(100), EntryKind::Entrada),
        ];

        let totals = Totals::from_entries(&entries);
        assert_eq!(totals.total_in, dec!(3600));
        assert_eq!(totals.total_out, dec!(121.00));
        assert_eq!(totals.balance, dec!(3479));
        assert_eq!(totals.total_in - totals.total_out, totals.balance);
    }

    #[test]
    fn test_totals_ignore_order() {
        let mut entries = vec![
            entry(1, dec!(10.10), EntryKind::Entrada),
            entry(2, dec!(20.20), EntryKind::Saida),
            entry(3, dec!(0.30), EntryKind::Entrada),
        ];
        let forward = Totals::from_entries(&entries);
        entries.reverse();
        assert_eq!(forward, Totals::from_entries(&entries));
    }

    #[test]
    fn test_negative_balance() {
        let entries = vec![
            entry(1, dec!(10), EntryKind::Entrada),
            entry(2, dec!(30), EntryKind::Saida),
        ];
        let totals = Totals::from_entries(&entries);
        assert_eq!(totals.balance, dec!(-20));
        assert!(!totals.is_positive());
        assert_eq!(format_brl(totals.balance), "R$ -20.00");
    }

    #[test]
    fn test_overflowing_sums_do_not_panic() {
        let entries = vec![
            entry(1, Decimal::MAX, EntryKind::Entrada),
            entry(2, Decimal::MAX, EntryKind::Entrada),
            entry(3, dec!(10), EntryKind::Saida),
        ];
        assert_eq!(Totals::checked_from_entries(&entries), None);

        let totals = Totals::from_entries(&entries);
        assert_eq!(totals.total_in, Decimal::MAX);
        assert_eq!(totals.total_out, dec!(10));
    }

    #[test]
    fn test_checked_totals_match_plain_totals() {
        let entries = vec![
            entry(1, dec!(3500), EntryKind::Entrada),
            entry(2, dec!(120.35), EntryKind::Saida),
        ];
        assert_eq!(
            Totals::checked_from_entries(&entries),
            Some(Totals::from_entries(&entries))
        );
    }

    #[test]
    fn test_format_brl_two_decimals() {
        assert_eq!(format_brl(dec!(10.5)), "R$ 10.50");
        assert_eq!(format_brl(dec!(49)), "R$ 49.00");
        assert_eq!(format_brl(dec!(0.005)), "R$ 0.01");
    }
}
