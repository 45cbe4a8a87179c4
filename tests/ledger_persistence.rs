// ============================================================================
// Tests d'intégration : persistance des lançamentos sur disque
// ============================================================================

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use myfinance::models::{Category, EntryForm, EntryKind};
use myfinance::storage::{JsonFileStore, KeyValueStore, LedgerStore, LEDGER_KEY};

fn form(description: &str, category: Category, amount: &str, kind: EntryKind) -> EntryForm {
    let mut form = EntryForm::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    form.description = description.to_string();
    form.category = category.label().to_string();
    form.amount = amount.to_string();
    form.kind = kind;
    form
}

#[test]
fn test_reload_restores_three_entries_in_order() {
    let dir = tempfile::tempdir().unwrap();

    let saved = {
        let store = JsonFileStore::open(dir.path()).unwrap();
        let mut ledger = LedgerStore::open(store);
        ledger
            .add_at(&form("Salário", Category::Salario, "5000", EntryKind::Entrada), 1_000)
            .unwrap();
        ledger
            .add_at(&form("Aluguel", Category::Moradia, "1500,00", EntryKind::Saida), 2_000)
            .unwrap();
        ledger
            .add_at(&form("Café", Category::Alimentacao, "10.50", EntryKind::Saida), 3_000)
            .unwrap();
        ledger.entries().to_vec()
    };

    let reopened = LedgerStore::open(JsonFileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.entries(), saved.as_slice());

    let descriptions: Vec<&str> = reopened
        .entries()
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["Café", "Aluguel", "Salário"]);

    let totals = reopened.totals();
    assert_eq!(totals.total_in, dec!(5000));
    assert_eq!(totals.total_out, dec!(1510.50));
    assert_eq!(totals.balance, dec!(3489.50));
}

#[test]
fn test_file_uses_historical_key_and_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).unwrap();
    let mut ledger = LedgerStore::open(store);
    ledger
        .add_at(&form("Ônibus", Category::Transporte, "4,40", EntryKind::Saida), 42)
        .unwrap();

    let raw = ledger.store().get(LEDGER_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json[0];
    assert_eq!(first["id"], 42);
    assert_eq!(first["data"], "2024-03-15");
    assert_eq!(first["descricao"], "Ônibus");
    assert_eq!(first["categoria"], "Transporte");
    assert_eq!(first["valor"], 4.4);
    assert_eq!(first["tipo"], "saida");

    assert!(dir.path().join("lancamentos-financeiros.json").exists());
}

#[test]
fn test_corrupt_file_starts_empty_and_is_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lancamentos-financeiros.json"), "{not json").unwrap();

    let mut ledger = LedgerStore::open(JsonFileStore::open(dir.path()).unwrap());
    assert!(ledger.is_empty());

    ledger
        .add_at(&form("Livro", Category::Educacao, "59.90", EntryKind::Saida), 7)
        .unwrap();

    let reopened = LedgerStore::open(JsonFileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.len(), 1);

    // L'ancien contenu survit dans un fichier à part
    let backup = std::fs::read_to_string(dir.path().join("lancamentos-financeiros.corrompido.json")).unwrap();
    assert_eq!(backup, "{not json");
}

#[test]
fn test_largest_amount_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut ledger = LedgerStore::open(JsonFileStore::open(dir.path()).unwrap());
        ledger
            .add_at(&form("Herança", Category::Outros, "999999999,99", EntryKind::Entrada), 1)
            .unwrap();
        ledger
            .add_at(&form("Taxa", Category::Outros, "0,01", EntryKind::Saida), 2)
            .unwrap();
    }

    let reopened = LedgerStore::open(JsonFileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.entries()[1].amount, dec!(999999999.99));
    assert_eq!(reopened.entries()[0].amount, dec!(0.01));
    assert_eq!(reopened.totals().balance, dec!(999999999.98));
    assert!(!dir.path().join("lancamentos-financeiros.corrompido.json").exists());
}
