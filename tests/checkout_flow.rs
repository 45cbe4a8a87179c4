// ============================================================================
// Tests d'intégration : parcours de checkout à travers App
// ============================================================================
// Le worker est exécuté pour de vrai (thread + runtime tokio), avec un
// délai de paiement court et une URL ViaCEP injoignable.
// ============================================================================

use std::sync::mpsc;
use std::time::Duration;

use rust_decimal::Decimal;

use myfinance::app::{App, Route, Screen};
use myfinance::models::{CheckoutField, CheckoutStep};
use myfinance::storage::MemoryStore;
use myfinance::worker::{spawn_background_worker, AppCommand, AppResult, WorkerSettings};

fn settings() -> WorkerSettings {
    WorkerSettings {
        viacep_base_url: "http://127.0.0.1:9".to_string(),
        payment_delay: Duration::from_millis(10),
    }
}

/// Tape une valeur dans le champ donné, en déplaçant le focus avec Tab
fn fill(app: &mut App, field: CheckoutField, value: &str) -> Vec<AppCommand> {
    while app.focused_checkout_field() != Some(field) {
        app.next_checkout_field();
    }
    value.chars().filter_map(|c| app.checkout_input_char(c)).collect()
}

#[test]
fn test_full_purchase_of_premium() {
    let (command_tx, command_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let worker = spawn_background_worker(settings(), command_rx, result_tx);

    let mut app = App::with_store(MemoryStore::new());
    app.navigate(Route::Plans);
    app.buy_selected_plan();

    assert!(app.is_on(Screen::Checkout));
    let session = app.checkout.as_ref().unwrap();
    assert_eq!(session.plan.name, "Plano Premium");
    assert_eq!(session.plan.total(), Decimal::from(49));

    // Étape 1
    fill(&mut app, CheckoutField::Name, "Maria Silva");
    fill(&mut app, CheckoutField::Email, "maria@example.com");
    fill(&mut app, CheckoutField::Phone, "11999990000");
    fill(&mut app, CheckoutField::TaxId, "123.456.789-00");
    assert_eq!(app.checkout_submit(), None);
    assert_eq!(app.checkout.as_ref().unwrap().step(), CheckoutStep::Payment);

    // Étape 2
    fill(&mut app, CheckoutField::CardNumber, "4111111111111111");
    fill(&mut app, CheckoutField::CardName, "MARIA SILVA");
    fill(&mut app, CheckoutField::Expiry, "12/30");
    fill(&mut app, CheckoutField::Cvv, "123");

    let command = app.checkout_submit().expect("payment command");
    assert!(app.is_loading);
    assert!(app.checkout.as_ref().unwrap().is_processing());

    // Échap pendant le traitement : refusé, on reste à l'étape 2
    app.checkout_back();
    assert_eq!(app.checkout.as_ref().unwrap().step(), CheckoutStep::Payment);

    command_tx.send(command).unwrap();
    let result = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    app.apply_result(result);

    assert!(!app.is_loading);
    assert_eq!(
        app.checkout.as_ref().unwrap().step(),
        CheckoutStep::Confirmation
    );

    // "Acessar Minha Conta" → lançamentos
    app.checkout_submit();
    assert!(app.is_on(Screen::Ledger));
    assert!(app.checkout.is_none());

    drop(command_tx);
    worker.join().unwrap();
}

#[test]
fn test_missing_email_keeps_step_one() {
    let mut app = App::with_store(MemoryStore::new());
    app.navigate_path("/checkout?plano=anual");

    fill(&mut app, CheckoutField::Name, "João");
    fill(&mut app, CheckoutField::Phone, "11988887777");
    fill(&mut app, CheckoutField::TaxId, "00011122233");

    assert_eq!(app.checkout_submit(), None);
    let session = app.checkout.as_ref().unwrap();
    assert_eq!(session.step(), CheckoutStep::Personal);
    assert_eq!(session.personal.name, "João");
}

#[test]
fn test_back_from_payment_keeps_fields() {
    let mut app = App::with_store(MemoryStore::new());
    app.navigate_path("/checkout?plano=pro");
    fill(&mut app, CheckoutField::Name, "Ana");
    fill(&mut app, CheckoutField::Email, "ana@example.com");
    fill(&mut app, CheckoutField::Phone, "1133334444");
    fill(&mut app, CheckoutField::TaxId, "99988877766");
    app.checkout_submit();
    fill(&mut app, CheckoutField::CardName, "ANA");

    app.checkout_back();
    let session = app.checkout.as_ref().unwrap();
    assert_eq!(session.step(), CheckoutStep::Personal);
    assert_eq!(session.personal.email, "ana@example.com");
    assert_eq!(session.payment.card_name, "ANA");
}

#[test]
fn test_unknown_plan_redirects_to_plans() {
    let mut app = App::with_store(MemoryStore::new());
    assert!(app.navigate_path("/checkout?plano=diamante"));
    assert!(app.is_on(Screen::Plans));
    assert!(app.checkout.is_none());
}

#[test]
fn test_unreachable_cep_service_leaves_address_untouched() {
    let (command_tx, command_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let worker = spawn_background_worker(settings(), command_rx, result_tx);

    let mut app = App::with_store(MemoryStore::new());
    app.navigate_path("/checkout?plano=premium");
    fill(&mut app, CheckoutField::Street, "Rua das Flores");
    let commands = fill(&mut app, CheckoutField::Cep, "01001000");
    assert_eq!(commands.len(), 1);

    for command in commands {
        command_tx.send(command).unwrap();
    }
    let result = result_rx.recv_timeout(Duration::from_secs(30)).unwrap();
    assert!(matches!(result, AppResult::LookupFailed { .. }));
    app.apply_result(result);

    let address = &app.checkout.as_ref().unwrap().address;
    assert_eq!(address.street, "Rua das Flores");
    assert_eq!(address.cep, "01001000");

    drop(command_tx);
    worker.join().unwrap();
}

#[test]
fn test_result_for_closed_session_is_ignored() {
    let mut app = App::with_store(MemoryStore::new());
    app.navigate_path("/checkout?plano=pro");
    let old = app.checkout.as_ref().unwrap().id;

    app.navigate(Route::Home);
    app.navigate_path("/checkout?plano=pro");
    fill(&mut app, CheckoutField::Cep, "01001000");

    app.apply_result(AppResult::AddressFound {
        session: old,
        cep: "01001000".to_string(),
        address: myfinance::models::AddressLookup {
            street: "Praça da Sé".to_string(),
            neighborhood: "Sé".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        },
    });

    assert!(app.checkout.as_ref().unwrap().address.street.is_empty());
}
