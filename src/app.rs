// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Routing : Route (chemin textuel) → Screen (écran affiché)
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Les effets async (CEP, paiement) sont renvoyés sous forme d'AppCommand
//   que la boucle principale transmet au worker
// ============================================================================

use tracing::{debug, info, warn};

use crate::error::CheckoutError;
use crate::models::{
    CheckoutField, CheckoutSession, CheckoutStep, EntryForm, EntryKind, Plan, PlanId,
};
use crate::storage::{BoxedStore, KeyValueStore, LedgerStore};
use crate::worker::{AppCommand, AppResult};

// ============================================================================
// Enum : Route
// ============================================================================
// CONCEPT : Routeur côté client
// - Chaque écran a un chemin ("/", "/planos", ...)
// - Le checkout lit le plan dans la query string (?plano=premium)
// ============================================================================

/// Destination de navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/planos`
    Plans,
    /// `/lancamentos`
    Ledger,
    /// `/checkout?plano=<id>` (le plan peut manquer ou être inconnu)
    Checkout { plan: Option<String> },
}

impl Route {
    /// Parse un chemin ; None si le chemin ne correspond à aucun écran
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        let (base, query) = match path.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (path, None),
        };
        let base = match base.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        match base {
            "/" => Some(Route::Home),
            "/planos" => Some(Route::Plans),
            "/lancamentos" => Some(Route::Ledger),
            "/checkout" => {
                let plan = query.and_then(|q| {
                    q.split('&')
                        .filter_map(|pair| pair.split_once('='))
                        .find(|(key, _)| *key == "plano")
                        .map(|(_, value)| value.to_string())
                });
                Some(Route::Checkout { plan })
            }
            _ => None,
        }
    }

    /// Chemin textuel de la route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Plans => "/planos".to_string(),
            Route::Ledger => "/lancamentos".to_string(),
            Route::Checkout { plan: Some(plan) } => format!("/checkout?plano={}", plan),
            Route::Checkout { plan: None } => "/checkout".to_string(),
        }
    }
}

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Accueil : présentation du produit
    Home,
    /// Planos : les trois offres
    Plans,
    /// Lançamentos : formulaire + totaux + liste
    Ledger,
    /// Checkout : assistant de paiement
    Checkout,
}

impl Screen {
    /// Onglets du header, dans l'ordre
    pub const TABS: [Screen; 3] = [Screen::Home, Screen::Plans, Screen::Ledger];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Plans => "Planos",
            Screen::Ledger => "Teste Grátis",
            Screen::Checkout => "Checkout",
        }
    }
}

// ============================================================================
// Enum : LedgerField
// ============================================================================

/// Champ du formulaire de lançamento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerField {
    Date,
    Description,
    Category,
    Amount,
    Kind,
}

impl LedgerField {
    pub const ALL: [LedgerField; 5] = [
        LedgerField::Date,
        LedgerField::Description,
        LedgerField::Category,
        LedgerField::Amount,
        LedgerField::Kind,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LedgerField::Date => "Data",
            LedgerField::Description => "Descrição",
            LedgerField::Category => "Categoria",
            LedgerField::Amount => "Valor (R$)",
            LedgerField::Kind => "Tipo",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

// ============================================================================
// Messages de statut (footer)
// ============================================================================

/// Type de message affiché dans le footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Message affiché à l'utilisateur jusqu'à la prochaine touche
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Boutons de l'écran de confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationChoice {
    /// "Acessar Minha Conta" → /lancamentos
    Account,
    /// "Voltar para Home" → /
    Home,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Two-step quit : première pression de 'q' → confirm_quit = true
    pub confirm_quit: bool,

    /// Indique si une tâche async est en cours (paiement)
    pub is_loading: bool,

    /// Message de chargement optionnel
    pub loading_message: Option<String>,

    /// Compteur de ticks (animation du spinner)
    pub tick_count: u64,

    /// Message de statut (erreur de validation, succès, ...)
    pub status: Option<StatusMessage>,

    // ---- Lançamentos ----
    /// Lançamentos persistés
    pub ledger: LedgerStore<BoxedStore>,

    /// Formulaire de saisie
    pub entry_form: EntryForm,

    /// Champ du formulaire qui a le focus
    pub ledger_field: LedgerField,

    /// Décalage de la liste (scroll)
    pub ledger_offset: usize,

    // ---- Planos ----
    /// Index de la carte sélectionnée
    pub selected_plan: usize,

    // ---- Checkout ----
    /// Session en cours (None hors de l'écran Checkout)
    pub checkout: Option<CheckoutSession>,

    /// Index du champ qui a le focus dans l'étape courante
    pub checkout_field: usize,

    /// Bouton sélectionné sur l'écran de confirmation
    pub confirmation_choice: ConfirmationChoice,

    /// Id de la prochaine session de checkout
    next_session_id: u64,
}

impl App {
    /// Crée l'application avec un stockage donné
    ///
    /// La liste des lançamentos est chargée immédiatement.
    pub fn new(store: BoxedStore) -> Self {
        Self {
            running: true,
            current_screen: Screen::Home,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            tick_count: 0,
            status: None,
            ledger: LedgerStore::open(store),
            entry_form: EntryForm::default(),
            ledger_field: LedgerField::Description,
            ledger_offset: 0,
            selected_plan: 1, // Premium, la carte "MAIS POPULAR"
            checkout: None,
            checkout_field: 0,
            confirmation_choice: ConfirmationChoice::Account,
            next_session_id: 1,
        }
    }

    /// Raccourci : App avec un stockage concret
    pub fn with_store<S: KeyValueStore + Send + 'static>(store: S) -> Self {
        Self::new(Box::new(store))
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Route correspondant à l'écran courant
    pub fn current_route(&self) -> Route {
        match self.current_screen {
            Screen::Home => Route::Home,
            Screen::Plans => Route::Plans,
            Screen::Ledger => Route::Ledger,
            Screen::Checkout => Route::Checkout {
                plan: self
                    .checkout
                    .as_ref()
                    .map(|s| s.plan.id.as_str().to_string()),
            },
        }
    }

    /// Navigue vers une route
    ///
    /// CONCEPT : Redirection
    /// - Checkout sans plan reconnu → Planos (pas d'écran d'erreur)
    /// - Quitter le Checkout détruit la session
    pub fn navigate(&mut self, route: Route) {
        let target = match route {
            Route::Home => Screen::Home,
            Route::Plans => Screen::Plans,
            Route::Ledger => Screen::Ledger,
            Route::Checkout { plan } => match plan.as_deref().and_then(Plan::find) {
                Some(plan) => {
                    self.open_checkout(plan);
                    return;
                }
                None => {
                    warn!(plan = ?plan, "Unknown or missing plan, redirecting to /planos");
                    Screen::Plans
                }
            },
        };

        if self.checkout.take().is_some() {
            debug!("Checkout session discarded");
            self.stop_loading();
        }
        info!(from = ?self.current_screen, to = ?target, "Navigation");
        self.current_screen = target;
        self.checkout_field = 0;
    }

    /// Navigue vers un chemin textuel
    ///
    /// Retourne false (et ne bouge pas) si le chemin est inconnu.
    pub fn navigate_path(&mut self, path: &str) -> bool {
        match Route::parse(path) {
            Some(route) => {
                self.navigate(route);
                true
            }
            None => {
                warn!(path, "Unknown route");
                false
            }
        }
    }

    fn open_checkout(&mut self, plan: Plan) {
        let id = self.next_session_id;
        self.next_session_id += 1;
        info!(session = id, plan = plan.id.as_str(), "Checkout session opened");

        self.stop_loading();
        self.checkout = Some(CheckoutSession::new(id, plan));
        self.checkout_field = 0;
        self.confirmation_choice = ConfirmationChoice::Account;
        self.current_screen = Screen::Checkout;
    }

    pub fn is_on(&self, screen: Screen) -> bool {
        self.current_screen == screen
    }

    /// Vrai si l'écran courant capture les caractères tapés
    pub fn is_typing(&self) -> bool {
        match self.current_screen {
            Screen::Ledger => true,
            Screen::Checkout => self
                .checkout
                .as_ref()
                .map(|s| s.step() != CheckoutStep::Confirmation)
                .unwrap_or(false),
            Screen::Home | Screen::Plans => false,
        }
    }

    // ========================================================================
    // Quit / chargement / statut
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    /// Efface un message "en cours" devenu sans objet
    fn clear_info_status(&mut self) {
        if self.status.as_ref().is_some_and(|s| s.kind == StatusKind::Info) {
            self.status = None;
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // ========================================================================
    // Planos
    // ========================================================================

    pub fn next_plan(&mut self) {
        self.selected_plan = (self.selected_plan + 1).min(PlanId::ALL.len() - 1);
    }

    pub fn previous_plan(&mut self) {
        self.selected_plan = self.selected_plan.saturating_sub(1);
    }

    /// "Comprar Agora" sur la carte sélectionnée
    pub fn buy_selected_plan(&mut self) {
        let plan = PlanId::ALL[self.selected_plan.min(PlanId::ALL.len() - 1)];
        self.navigate(Route::Checkout {
            plan: Some(plan.as_str().to_string()),
        });
    }

    // ========================================================================
    // Lançamentos
    // ========================================================================

    pub fn next_ledger_field(&mut self) {
        self.ledger_field = self.ledger_field.next();
    }

    pub fn previous_ledger_field(&mut self) {
        self.ledger_field = self.ledger_field.previous();
    }

    /// Tape un caractère dans le champ qui a le focus
    pub fn ledger_input_char(&mut self, c: char) {
        let form = &mut self.entry_form;
        match self.ledger_field {
            LedgerField::Date => {
                if (c.is_ascii_digit() || c == '-') && form.date.len() < 10 {
                    form.date.push(c);
                }
            }
            LedgerField::Description => {
                if !c.is_control() {
                    form.description.push(c);
                }
            }
            LedgerField::Amount => {
                // "999999999,99" tient largement, au-delà la validation refuse
                if (c.is_ascii_digit() || c == '.' || c == ',') && form.amount.len() < 15 {
                    form.amount.push(c);
                }
            }
            LedgerField::Category => {
                if c == ' ' {
                    form.cycle_category(true);
                }
            }
            LedgerField::Kind => {
                if c == ' ' {
                    form.kind = form.kind.toggle();
                }
            }
        }
    }

    pub fn ledger_backspace(&mut self) {
        let form = &mut self.entry_form;
        match self.ledger_field {
            LedgerField::Date => {
                form.date.pop();
            }
            LedgerField::Description => {
                form.description.pop();
            }
            LedgerField::Amount => {
                form.amount.pop();
            }
            LedgerField::Category => form.category.clear(),
            LedgerField::Kind => {}
        }
    }

    /// ←/→ sur les champs à choix (catégorie, type)
    pub fn ledger_cycle(&mut self, forward: bool) {
        match self.ledger_field {
            LedgerField::Category => self.entry_form.cycle_category(forward),
            LedgerField::Kind => {
                self.entry_form.kind = if forward {
                    EntryKind::Saida
                } else {
                    EntryKind::Entrada
                }
            }
            _ => {}
        }
    }

    /// Valide et ajoute le lançamento
    ///
    /// En cas d'erreur : message dans le footer, liste et formulaire inchangés.
    pub fn submit_entry(&mut self) -> bool {
        match self.ledger.add(&self.entry_form) {
            Ok(entry) => {
                let text = format!("Lançamento adicionado: {}", entry.description);
                self.entry_form.reset();
                self.ledger_field = LedgerField::Description;
                self.ledger_offset = 0;
                self.set_status(StatusKind::Success, text);
                true
            }
            Err(e) => {
                self.set_status(StatusKind::Error, e.to_string());
                false
            }
        }
    }

    pub fn scroll_ledger_down(&mut self) {
        let max = self.ledger.len().saturating_sub(1);
        self.ledger_offset = (self.ledger_offset + 1).min(max);
    }

    pub fn scroll_ledger_up(&mut self) {
        self.ledger_offset = self.ledger_offset.saturating_sub(1);
    }

    // ========================================================================
    // Checkout
    // ========================================================================

    /// Champ qui a le focus dans l'étape courante
    pub fn focused_checkout_field(&self) -> Option<CheckoutField> {
        let session = self.checkout.as_ref()?;
        session.step().fields().get(self.checkout_field).copied()
    }

    pub fn next_checkout_field(&mut self) {
        if let Some(session) = &self.checkout {
            let len = session.step().fields().len();
            if len > 0 {
                self.checkout_field = (self.checkout_field + 1) % len;
            }
        }
    }

    pub fn previous_checkout_field(&mut self) {
        if let Some(session) = &self.checkout {
            let len = session.step().fields().len();
            if len > 0 {
                self.checkout_field = (self.checkout_field + len - 1) % len;
            }
        }
    }

    /// Tape un caractère dans le champ du checkout
    ///
    /// Retourne une commande de recherche quand le CEP atteint 8 chiffres.
    pub fn checkout_input_char(&mut self, c: char) -> Option<AppCommand> {
        let field = self.focused_checkout_field()?;
        let session = self.checkout.as_mut()?;
        if session.is_processing() {
            return None;
        }
        if !session.push_char(field, c) || field != CheckoutField::Cep {
            return None;
        }

        let cep = session.cep_ready()?.to_string();
        let session = session.id;
        info!(session, cep = %cep, "CEP complete, requesting address lookup");
        self.set_status(StatusKind::Info, format!("Buscando endereço do CEP {}...", cep));
        Some(AppCommand::LookupCep { session, cep })
    }

    pub fn checkout_backspace(&mut self) {
        if let Some(field) = self.focused_checkout_field() {
            if let Some(session) = self.checkout.as_mut() {
                if !session.is_processing() {
                    session.pop_char(field);
                }
            }
        }
    }

    /// Entrée sur le checkout : avancer d'une étape
    ///
    /// - Étape 1 : vers Pagamento si les champs obligatoires sont remplis
    /// - Étape 2 : lance le paiement simulé (commande pour le worker)
    /// - Étape 3 : active le bouton sélectionné
    pub fn checkout_submit(&mut self) -> Option<AppCommand> {
        let session = self.checkout.as_mut()?;
        let result = match session.step() {
            CheckoutStep::Personal => session.advance_to_payment().map(|_| None),
            CheckoutStep::Payment => session.submit_payment().map(|_| {
                Some(AppCommand::ProcessPayment {
                    session: session.id,
                })
            }),
            CheckoutStep::Confirmation => {
                let route = match self.confirmation_choice {
                    ConfirmationChoice::Account => Route::Ledger,
                    ConfirmationChoice::Home => Route::Home,
                };
                self.navigate(route);
                return None;
            }
        };

        match result {
            Ok(command) => {
                self.checkout_field = 0;
                self.clear_status();
                if command.is_some() {
                    let price = crate::models::format_brl(
                        self.checkout.as_ref().map(|s| s.plan.total()).unwrap_or_default(),
                    );
                    self.start_loading(Some(format!("Processando pagamento de {}...", price)));
                }
                command
            }
            Err(e) => {
                self.report_checkout_error(e);
                None
            }
        }
    }

    /// Échap sur le checkout
    ///
    /// Étape 2 → étape 1 (champs conservés), étape 1 → Planos.
    pub fn checkout_back(&mut self) {
        let Some(session) = self.checkout.as_mut() else {
            return;
        };
        match session.step() {
            CheckoutStep::Personal => self.navigate(Route::Plans),
            CheckoutStep::Payment => match session.back_to_personal() {
                Ok(()) => {
                    self.checkout_field = 0;
                    self.clear_status();
                }
                Err(e) => self.report_checkout_error(e),
            },
            CheckoutStep::Confirmation => self.navigate(Route::Home),
        }
    }

    /// Alterne entre les deux boutons de la confirmation
    pub fn toggle_confirmation_choice(&mut self) {
        self.confirmation_choice = match self.confirmation_choice {
            ConfirmationChoice::Account => ConfirmationChoice::Home,
            ConfirmationChoice::Home => ConfirmationChoice::Account,
        };
    }

    fn report_checkout_error(&mut self, error: CheckoutError) {
        debug!(error = %error, "Checkout transition refused");
        self.set_status(StatusKind::Error, error.to_string());
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Applique un résultat du worker
    ///
    /// Les résultats d'une session disparue sont ignorés. Les échecs de
    /// recherche de CEP ne sont que loggés.
    pub fn apply_result(&mut self, result: AppResult) {
        let current = self.checkout.as_ref().map(|s| s.id);

        match result {
            AppResult::AddressFound {
                session,
                cep,
                address,
            } if current == Some(session) => {
                if let Some(checkout) = self.checkout.as_mut() {
                    if checkout.apply_address(&cep, address) {
                        info!(session, cep = %cep, "Address filled from CEP");
                        self.set_status(StatusKind::Success, "Endereço preenchido pelo CEP");
                    } else {
                        debug!(session, cep = %cep, "CEP changed since lookup, result dropped");
                    }
                }
            }
            AppResult::AddressNotFound { session, cep } => {
                warn!(session, cep = %cep, "CEP not found, address left untouched");
                self.clear_info_status();
            }
            AppResult::LookupFailed {
                session,
                cep,
                error,
            } => {
                warn!(session, cep = %cep, error = %error, "CEP lookup failed, address left untouched");
                self.clear_info_status();
            }
            AppResult::PaymentApproved { session } if current == Some(session) => {
                self.stop_loading();
                if let Some(checkout) = self.checkout.as_mut() {
                    match checkout.complete_payment() {
                        Ok(()) => {
                            info!(session, plan = checkout.plan.id.as_str(), "Payment approved");
                            self.checkout_field = 0;
                            self.confirmation_choice = ConfirmationChoice::Account;
                        }
                        Err(e) => warn!(session, error = %e, "Unexpected payment result"),
                    }
                }
            }
            other => {
                debug!(result = ?other, "Result for a closed checkout session, ignored");
            }
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
