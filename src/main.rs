// ============================================================================
// MyFinance - Controle financeiro no terminal
// ============================================================================
// Programme TUI : accueil, plans, lançamentos (entrées/sorties) et checkout
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Worker thread : tâches async (CEP, paiement) hors de la boucle UI
// 4. Channels : commandes vers le worker, résultats vers l'UI
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use myfinance::app::{App, Route, Screen};
use myfinance::config::{Config, APP_NAME};
use myfinance::storage::JsonFileStore;
use myfinance::ui::{events::EventHandler, render};
use myfinance::worker::{spawn_background_worker, AppCommand, AppResult, WorkerSettings};

// ============================================================================
// Arguments de la ligne de commande
// ============================================================================
// CONCEPT RUST : Derive macros (clap)
// - #[derive(Parser)] génère le parsing des arguments
// - Les doc comments deviennent l'aide (--help)
// ============================================================================

/// Controle suas finanças de forma inteligente
#[derive(Debug, Parser)]
#[command(name = "myfinance", version, about)]
struct Args {
    /// Écran de démarrage (/, /planos, /lancamentos, /checkout?plano=premium)
    #[arg(long, default_value = "/")]
    route: String,

    /// Répertoire des données (remplace MYFINANCE_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

// ============================================================================
// Logging
// ============================================================================
// CONCEPT : Tracing
// - Logs structurés (clé = valeur)
// - Écrits dans un fichier : stdout appartient au TUI
// - EnvFilter : filtre par niveau (RUST_LOG env var)
// ============================================================================

/// Initialise le logging dans <log_dir>/myfinance.log (rotation quotidienne)
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // Rotation::DAILY : myfinance.log.2026-10-15, myfinance.log.2026-10-16, ...
    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, &log_dir, format!("{}.log", APP_NAME));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG=myfinance=trace pour plus de détails
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "myfinance=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    // Logging avant tout le reste ; en cas d'échec on continue sans logs
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "MyFinance starting up");

    // Stockage des lançamentos
    let store = JsonFileStore::open(&config.data_dir)?;
    let mut app = App::with_store(store);
    info!(entries = app.ledger.len(), "Ledger loaded");

    let start = Route::parse(&args.route)
        .with_context(|| format!("Route inconnue : {}", args.route))?;

    // Channels worker <-> UI
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    let worker = spawn_background_worker(WorkerSettings::from(&config), command_rx, result_tx);

    // --route : écran de démarrage (checkout sans plan connu → Planos)
    app.navigate(start);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Ferme le channel : le worker sort de sa boucle
    drop(command_tx);
    if worker.join().is_err() {
        error!("Worker thread panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event loop
// ============================================================================
// 0. RÉSULTATS : applique les résultats du worker (try_recv, non bloquant)
// 1. RENDER : dessine l'interface
// 2. INPUT : traite l'événement clavier
// 3. UPDATE : tick (spinner)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    let mut worker_alive = true;

    while app.is_running() {
        // 0. Résultats : on vide tout ce qui est arrivé depuis le dernier tour
        loop {
            match result_rx.try_recv() {
                Ok(result) => app.apply_result(result),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if worker_alive {
                        error!("Worker thread disconnected!");
                        worker_alive = false;
                    }
                    break;
                }
            }
        }

        // 1. Render
        terminal.draw(|frame| render(frame, app))?;

        // 2. Input
        match events.next() {
            Ok(event) => {
                if let Some(command) = handle_event(app, event) {
                    if command_tx.send(command).is_err() {
                        warn!("Worker unavailable, command dropped");
                    }
                }
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read terminal event");
            }
        }

        // 3. Update
        app.tick();
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// CONCEPT : Event Handler Pattern
// - Sépare la logique de gestion des événements
// - Modifie l'état de app selon l'événement
// - Retourne une commande pour le worker si besoin
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Les touches globales (quit, F1-F3) passent en premier
/// - Ensuite chaque écran a ses propres touches
/// - 'q' n'est une touche de quit que hors des formulaires
fn handle_event(app: &mut App, event: myfinance::ui::events::Event) -> Option<AppCommand> {
    use myfinance::ui::events::{is_interrupt_event, is_quit_event, route_from_event, Event};

    if matches!(event, Event::Tick) {
        return None;
    }

    // Quit two-step : 'q' (hors saisie) ou Ctrl+C
    if is_interrupt_event(&event) || (is_quit_event(&event) && !app.is_typing()) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return None;
    }

    // Toute autre touche annule la confirmation et efface le statut
    app.cancel_quit();
    app.clear_status();

    if let Some(route) = route_from_event(&event) {
        debug!(route = %route.path(), "Header tab selected");
        app.navigate(route);
        return None;
    }

    match app.current_screen {
        Screen::Home => handle_home_event(app, &event),
        Screen::Plans => handle_plans_event(app, &event),
        Screen::Ledger => handle_ledger_event(app, &event),
        Screen::Checkout => return handle_checkout_event(app, &event),
    }
    None
}

fn handle_home_event(app: &mut App, event: &myfinance::ui::events::Event) {
    use myfinance::ui::events::{get_char_from_event, is_enter_event};

    if is_enter_event(event) {
        // "Teste Grátis"
        app.navigate(Route::Ledger);
    } else if matches!(get_char_from_event(event), Some('p' | 'P')) {
        // "Ver Planos"
        app.navigate(Route::Plans);
    }
}

fn handle_plans_event(app: &mut App, event: &myfinance::ui::events::Event) {
    use myfinance::ui::events::{is_enter_event, is_escape_event, is_left_event, is_right_event};

    if is_left_event(event) {
        app.previous_plan();
    } else if is_right_event(event) {
        app.next_plan();
    } else if is_enter_event(event) {
        info!(index = app.selected_plan, "User clicked Comprar Agora");
        app.buy_selected_plan();
    } else if is_escape_event(event) {
        app.navigate(Route::Home);
    }
}

fn handle_ledger_event(app: &mut App, event: &myfinance::ui::events::Event) {
    use myfinance::ui::events::{
        get_char_from_event, is_backspace_event, is_backtab_event, is_down_event, is_enter_event,
        is_escape_event, is_left_event, is_right_event, is_tab_event, is_up_event,
    };

    if is_tab_event(event) {
        app.next_ledger_field();
    } else if is_backtab_event(event) {
        app.previous_ledger_field();
    } else if is_left_event(event) {
        app.ledger_cycle(false);
    } else if is_right_event(event) {
        app.ledger_cycle(true);
    } else if is_up_event(event) {
        app.scroll_ledger_up();
    } else if is_down_event(event) {
        app.scroll_ledger_down();
    } else if is_enter_event(event) {
        app.submit_entry();
    } else if is_backspace_event(event) {
        app.ledger_backspace();
    } else if is_escape_event(event) {
        app.navigate(Route::Home);
    } else if let Some(c) = get_char_from_event(event) {
        app.ledger_input_char(c);
    }
}

fn handle_checkout_event(
    app: &mut App,
    event: &myfinance::ui::events::Event,
) -> Option<AppCommand> {
    use myfinance::models::CheckoutStep;
    use myfinance::ui::events::{
        get_char_from_event, is_backspace_event, is_backtab_event, is_down_event, is_enter_event,
        is_escape_event, is_left_event, is_right_event, is_tab_event, is_up_event,
    };

    let on_confirmation = app
        .checkout
        .as_ref()
        .map(|s| s.step() == CheckoutStep::Confirmation)
        .unwrap_or(false);

    if on_confirmation {
        if is_left_event(event) || is_right_event(event) || is_tab_event(event) {
            app.toggle_confirmation_choice();
            return None;
        }
    } else if is_tab_event(event) || is_down_event(event) {
        app.next_checkout_field();
        return None;
    } else if is_backtab_event(event) || is_up_event(event) {
        app.previous_checkout_field();
        return None;
    } else if is_backspace_event(event) {
        app.checkout_backspace();
        return None;
    }

    if is_enter_event(event) {
        app.checkout_submit()
    } else if is_escape_event(event) {
        app.checkout_back();
        None
    } else if let Some(c) = get_char_from_event(event) {
        if on_confirmation {
            None
        } else {
            app.checkout_input_char(c)
        }
    } else {
        None
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Raw mode : pas d'écho, pas de buffering ligne par ligne
    enable_raw_mode()?;

    // Alternate screen : l'écran précédent est restauré à la sortie
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal dans son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
