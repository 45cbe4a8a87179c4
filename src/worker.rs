// ============================================================================
// Background Worker
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui exécute les tâches async (HTTP, délai simulé)
// - Reçoit des AppCommand via un channel (command_rx)
// - Envoie des AppResult via un autre channel (result_tx)
// - L'UI ne bloque jamais : elle lit les résultats avec try_recv()
//
// Chaque commande porte l'id de la session de checkout qui l'a émise :
// un résultat destiné à une session disparue est simplement ignoré.
// ============================================================================

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::api::viacep::fetch_address;
use crate::config::Config;
use crate::models::AddressLookup;

/// Commandes envoyées au worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Rechercher l'adresse d'un CEP complet
    LookupCep { session: u64, cep: String },

    /// Simuler le traitement du paiement (délai fixe, toujours accepté)
    ProcessPayment { session: u64 },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppResult {
    /// Adresse trouvée pour ce CEP
    AddressFound {
        session: u64,
        cep: String,
        address: AddressLookup,
    },

    /// Le service ne connaît pas ce CEP
    AddressNotFound { session: u64, cep: String },

    /// Erreur réseau / HTTP / JSON pendant la recherche
    LookupFailed {
        session: u64,
        cep: String,
        error: String,
    },

    /// Paiement simulé terminé
    PaymentApproved { session: u64 },
}

/// Paramètres du worker, extraits de la configuration
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub viacep_base_url: String,
    pub payment_delay: Duration,
}

impl From<&Config> for WorkerSettings {
    fn from(config: &Config) -> Self {
        Self {
            viacep_base_url: config.viacep_base_url.clone(),
            payment_delay: config.payment_delay,
        }
    }
}

/// Exécute une commande et produit son résultat
///
/// CONCEPT RUST : async fn
/// - La recherche de CEP attend la réponse HTTP
/// - Le paiement attend simplement le délai configuré
pub async fn execute(
    client: &reqwest::Client,
    settings: &WorkerSettings,
    command: AppCommand,
) -> AppResult {
    match command {
        AppCommand::LookupCep { session, cep } => {
            match fetch_address(client, &settings.viacep_base_url, &cep).await {
                Ok(Some(address)) => AppResult::AddressFound {
                    session,
                    cep,
                    address,
                },
                Ok(None) => AppResult::AddressNotFound { session, cep },
                Err(e) => AppResult::LookupFailed {
                    session,
                    cep,
                    error: format!("{:#}", e),
                },
            }
        }
        AppCommand::ProcessPayment { session } => {
            tokio::time::sleep(settings.payment_delay).await;
            AppResult::PaymentApproved { session }
        }
    }
}

/// Lance le worker thread
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : crée un thread OS
/// - tokio::runtime::Runtime : runtime async propre à ce thread
/// - Le thread s'arrête quand le Sender des commandes est droppé
pub fn spawn_background_worker(
    settings: WorkerSettings,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker disabled");
                return;
            }
        };

        let client = match reqwest::Client::builder()
            .user_agent(concat!("myfinance/", env!("CARGO_PKG_VERSION")))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                error!(error = ?e, "Failed to build HTTP client, worker disabled");
                return;
            }
        };

        // Boucle de traitement : une commande à la fois
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");
            let result = runtime.block_on(execute(&client, &settings, command));

            if let AppResult::LookupFailed { cep, error, .. } = &result {
                warn!(cep = %cep, error = %error, "CEP lookup failed");
            }

            if result_tx.send(result).is_err() {
                // L'UI est partie, plus personne pour lire les résultats
                break;
            }
        }

        info!("Worker thread exiting (channel closed)");
    })
}
