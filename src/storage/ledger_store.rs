// ============================================================================
// Structure : LedgerStore
// ============================================================================
// Liste des lançamentos en mémoire + persistance sous une seule clé
//
// CONCEPTS RUST :
// 1. Cache en mémoire : la liste est chargée une fois au démarrage
// 2. Generics : S peut être un fichier JSON ou un HashMap
// 3. Rollback : si la sauvegarde échoue, l'ajout est annulé
// ============================================================================

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::error::EntryError;
use crate::models::{EntryForm, LedgerEntry, Totals};
use crate::storage::KeyValueStore;

/// Clé de stockage de la liste (nom historique du localStorage)
pub const LEDGER_KEY: &str = "lancamentos-financeiros";

/// Copie d'un contenu illisible, gardée avant de repartir d'une liste vide
pub const LEDGER_BACKUP_KEY: &str = "lancamentos-financeiros.corrompido";

/// Lançamentos chargés, du plus récent au plus ancien
pub struct LedgerStore<S: KeyValueStore> {
    store: S,
    entries: Vec<LedgerEntry>,
}

impl<S: KeyValueStore> LedgerStore<S> {
    /// Charge la liste depuis le stockage
    ///
    /// N'échoue jamais : une clé absente donne une liste vide. Un contenu
    /// illisible est copié sous LEDGER_BACKUP_KEY avant de repartir d'une
    /// liste vide, pour que le prochain ajout ne le fasse pas disparaître.
    pub fn open(mut store: S) -> Self {
        let raw = match store.get(LEDGER_KEY) {
            Ok(raw) => raw.filter(|raw| !raw.trim().is_empty()),
            Err(e) => {
                error!(error = ?e, "Failed to read ledger entries, starting empty");
                None
            }
        };

        let entries = match raw.as_deref().map(parse_entries).transpose() {
            Ok(entries) => {
                let entries = entries.unwrap_or_default();
                info!(count = entries.len(), "Ledger entries loaded");
                entries
            }
            Err(e) => {
                error!(error = ?e, "Failed to parse ledger entries, starting empty");
                if let Some(raw) = &raw {
                    match store.set(LEDGER_BACKUP_KEY, raw) {
                        Ok(()) => warn!(key = LEDGER_BACKUP_KEY, "Unreadable ledger backed up"),
                        Err(e) => error!(error = ?e, "Failed to back up unreadable ledger"),
                    }
                }
                Vec::new()
            }
        };
        Self { store, entries }
    }

    /// Lançamentos, du plus récent au plus ancien
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Totaux de la liste courante
    pub fn totals(&self) -> Totals {
        Totals::from_entries(&self.entries)
    }

    /// Accès au stockage sous-jacent
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Valide le formulaire, ajoute le lançamento en tête et sauvegarde
    pub fn add(&mut self, form: &EntryForm) -> Result<&LedgerEntry, EntryError> {
        self.add_at(form, Utc::now().timestamp_millis())
    }

    /// Comme add(), avec l'horloge fournie par l'appelant (millisecondes)
    ///
    /// L'id est le timestamp, décalé au-delà du plus grand id existant si
    /// l'horloge n'a pas avancé.
    pub fn add_at(&mut self, form: &EntryForm, now_millis: i64) -> Result<&LedgerEntry, EntryError> {
        let id = self.next_id(now_millis);
        let entry = form.validate(id).map_err(|e| {
            debug!(error = %e, "Entry rejected by validation");
            e
        })?;

        self.entries.insert(0, entry);

        // Une liste éditée à la main peut déjà être proche de Decimal::MAX
        if Totals::checked_from_entries(&self.entries).is_none() {
            warn!(id, "Entry would overflow ledger totals, rejected");
            self.entries.remove(0);
            return Err(EntryError::InvalidAmount(form.amount.trim().to_string()));
        }

        if let Err(e) = self.save() {
            error!(error = ?e, "Failed to save ledger, rolling back new entry");
            self.entries.remove(0);
            return Err(EntryError::Storage(e.to_string()));
        }

        info!(id, count = self.entries.len(), "Ledger entry added");
        Ok(&self.entries[0])
    }

    /// Sauvegarde la liste complète sous LEDGER_KEY
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)
            .context("Échec de la sérialisation des lançamentos")?;
        self.store.set(LEDGER_KEY, &json)
    }

    fn next_id(&self, now_millis: i64) -> i64 {
        match self.entries.iter().map(|e| e.id).max() {
            Some(max) if max >= now_millis => {
                warn!(max, now_millis, "Clock did not advance, bumping entry id");
                max.saturating_add(1)
            }
            _ => now_millis,
        }
    }
}

/// Désérialise la liste stockée
fn parse_entries(raw: &str) -> Result<Vec<LedgerEntry>> {
    serde_json::from_str(raw).context("Contenu JSON des lançamentos invalide")
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn form(description: &str, amount: &str) -> EntryForm {
        let mut form = EntryForm::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        form.description = description.to_string();
        form.category = "Outros".to_string();
        form.amount = amount.to_string();
        form
    }

    /// Stockage qui refuse toute écriture
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("disque plein")
        }
    }

    #[test]
    fn test_open_empty_store() {
        let ledger = LedgerStore::open(MemoryStore::new());
        assert!(ledger.is_empty());
        assert_eq!(ledger.totals(), Totals::default());
    }

    #[test]
    fn test_add_prepends_and_saves() {
        let mut ledger = LedgerStore::open(MemoryStore::new());
        ledger.add_at(&form("Primeiro", "1"), 1000).unwrap();
        ledger.add_at(&form("Segundo", "10.50"), 2000).unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].description, "Segundo");
        assert_eq!(ledger.entries()[0].amount, dec!(10.50));

        let saved = ledger.store().get(LEDGER_KEY).unwrap().unwrap();
        let reloaded: Vec<LedgerEntry> = serde_json::from_str(&saved).unwrap();
        assert_eq!(reloaded, ledger.entries());
    }

    #[test]
    fn test_rejected_entry_leaves_list_unchanged() {
        let mut ledger = LedgerStore::open(MemoryStore::new());
        ledger.add_at(&form("Ok", "5"), 1000).unwrap();

        assert_eq!(
            ledger.add_at(&form("Zero", "0"), 2000).unwrap_err(),
            EntryError::NonPositiveAmount
        );
        assert_eq!(
            ledger.add_at(&form("Negativo", "-3"), 3000).unwrap_err(),
            EntryError::NonPositiveAmount
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_ids_stay_unique_when_clock_stalls() {
        let mut ledger = LedgerStore::open(MemoryStore::new());
        ledger.add_at(&form("A", "1"), 5000).unwrap();
        ledger.add_at(&form("B", "1"), 5000).unwrap();
        ledger.add_at(&form("C", "1"), 4000).unwrap();

        let ids: Vec<i64> = ledger.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5002, 5001, 5000]);
    }

    #[test]
    fn test_corrupt_json_starts_empty() {
        let mut store = MemoryStore::new();
        store.set(LEDGER_KEY, "{not json").unwrap();
        let ledger = LedgerStore::open(store);
        assert!(ledger.is_empty());
        // Le contenu illisible n'est pas écrasé au chargement
        assert_eq!(ledger.store().get(LEDGER_KEY).unwrap().as_deref(), Some("{not json"));
        assert_eq!(
            ledger.store().get(LEDGER_BACKUP_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_add_after_corrupt_load_keeps_backup() {
        let mut store = MemoryStore::new();
        store.set(LEDGER_KEY, "[{\"id\": 1, \"valor\": ").unwrap();
        let mut ledger = LedgerStore::open(store);

        ledger.add_at(&form("Novo", "5"), 1000).unwrap();
        let saved = ledger.store().get(LEDGER_KEY).unwrap().unwrap();
        assert_eq!(serde_json::from_str::<Vec<LedgerEntry>>(&saved).unwrap().len(), 1);
        assert_eq!(
            ledger.store().get(LEDGER_BACKUP_KEY).unwrap().as_deref(),
            Some("[{\"id\": 1, \"valor\": ")
        );
    }

    #[test]
    fn test_largest_amount_reloads_exactly() {
        let mut ledger = LedgerStore::open(MemoryStore::new());
        let mut salary = form("Prêmio", "999999999,99");
        salary.kind = EntryKind::Entrada;
        ledger.add_at(&salary, 1000).unwrap();
        ledger.add_at(&form("Centavo", "0.01"), 2000).unwrap();

        let saved = ledger.store().get(LEDGER_KEY).unwrap().unwrap();
        let mut store = MemoryStore::new();
        store.set(LEDGER_KEY, &saved).unwrap();
        let reloaded = LedgerStore::open(store);

        assert_eq!(reloaded.entries(), ledger.entries());
        assert_eq!(reloaded.entries()[1].amount, dec!(999999999.99));
        assert_eq!(reloaded.totals().balance, dec!(999999999.98));
        assert_eq!(reloaded.store().get(LEDGER_BACKUP_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_rejected_when_totals_would_overflow() {
        // Fichier édité à la main : deux montants hors des bornes de validation
        let stored = r#"[
            {"id":2,"data":"2024-03-15","descricao":"B","categoria":"Outros","valor":5e28,"tipo":"entrada"},
            {"id":1,"data":"2024-03-15","descricao":"A","categoria":"Outros","valor":5e28,"tipo":"entrada"}
        ]"#;
        let mut store = MemoryStore::new();
        store.set(LEDGER_KEY, stored).unwrap();
        let mut ledger = LedgerStore::open(store);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.totals().total_in, rust_decimal::Decimal::MAX);

        let before = ledger.entries().to_vec();
        let err = ledger.add_at(&form("Mais", "10"), 3000).unwrap_err();
        assert_eq!(err, EntryError::InvalidAmount("10".to_string()));
        assert_eq!(ledger.entries(), before.as_slice());
        assert_eq!(ledger.store().get(LEDGER_KEY).unwrap().as_deref(), Some(stored));
    }

    #[test]
    fn test_next_id_saturates_at_max() {
        let stored = format!(
            r#"[{{"id":{},"data":"2024-03-15","descricao":"A","categoria":"Outros","valor":1,"tipo":"saida"}}]"#,
            i64::MAX
        );
        let mut store = MemoryStore::new();
        store.set(LEDGER_KEY, &stored).unwrap();
        let ledger = LedgerStore::open(store);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.next_id(1000), i64::MAX);
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let mut ledger = LedgerStore::open(ReadOnlyStore);
        let err = ledger.add_at(&form("A", "1"), 1000).unwrap_err();
        assert!(matches!(err, EntryError::Storage(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_totals_follow_entries() {
        let mut ledger = LedgerStore::open(MemoryStore::new());
        let mut salary = form("Salário", "3500");
        salary.kind = EntryKind::Entrada;
        ledger.add_at(&salary, 1000).unwrap();
        ledger.add_at(&form("Aluguel", "1200.50"), 2000).unwrap();

        let totals = ledger.totals();
        assert_eq!(totals.total_in, dec!(3500));
        assert_eq!(totals.total_out, dec!(1200.50));
        assert_eq!(totals.balance, dec!(2299.50));
    }
}
