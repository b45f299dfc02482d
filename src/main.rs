// ============================================================================
// SneakerWatch - Tableau de bord des prix de sneakers
// ============================================================================
// Programme TUI : sélection marque/modèle, historique des prix et prédiction
// Les données viennent du service de données de marché (HTTP/JSON)
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : le runtime tokio exécute les fetchs en arrière-plan
// 4. watch channel : l'UI lit le dernier snapshot publié
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use sneakerwatch::api::{MarketDataClient, MarketDataSource, ReqwestTransport};
use sneakerwatch::app::{ViewController, ViewSnapshot};
use sneakerwatch::config::Config;
use sneakerwatch::models::Catalog;
use sneakerwatch::ui::{action_for, render, Action, EventHandler};

// ============================================================================
// Logging
// ============================================================================
// Les logs vont dans un fichier : stdout appartient au TUI
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : transforme et route les logs
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
/// - RollingFileAppender : rotation automatique
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ./logs/sneakerwatch.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=sneakerwatch=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    // Nouveau fichier chaque jour : sneakerwatch.log.2024-09-15
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "sneakerwatch.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true) // Utile : les fetchs tournent sur les workers tokio
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour sneakerwatch, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sneakerwatch=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Un fichier .env est optionnel
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Configuration invalide")?;

    // Si le logging échoue, on continue quand même
    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, timeout = ?config.request_timeout, "SneakerWatch starting up");

    // CONCEPT RUST : Runtime tokio explicite
    // - main() reste synchrone (boucle TUI)
    // - Les fetchs sont spawnés sur le runtime via son Handle
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let transport = ReqwestTransport::new(config.request_timeout).context("Échec de la création du client HTTP")?;
    let client = MarketDataClient::new(transport, config.api_url.clone());

    // Le contrôleur émet immédiatement le fetch de la sélection par défaut
    let mut controller = ViewController::new(
        Arc::new(Catalog::reference()),
        Arc::new(client),
        runtime.handle().clone(),
    )?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::default();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut controller, &events);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event loop
// ============================================================================
// 0. RÉSULTATS : applique les fetchs terminés (non bloquant)
// 1. RENDER : dessine le dernier snapshot publié
// 2. INPUT : traduit la touche en action sur le contrôleur
// ============================================================================

/// Exécute la boucle principale de l'application
fn run<S: MarketDataSource>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut ViewController<S>,
    events: &EventHandler,
) -> Result<()> {
    let mut snapshots: watch::Receiver<ViewSnapshot> = controller.subscribe();

    loop {
        // 0. Les résultats obsolètes sont écartés par le contrôleur
        let applied = controller.drain_completions();
        if applied > 0 {
            debug!(applied, "Applied fetch results");
        }

        // 1. borrow_and_update : marque le snapshot comme vu
        let view = snapshots.borrow_and_update().clone();
        terminal.draw(|frame| render(frame, &view, controller.catalog()))?;

        // 2. Entrée utilisateur (Tick si rien pendant tick_rate)
        let event = match events.next() {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Failed to read terminal event");
                continue;
            }
        };

        let Some(action) = action_for(&event) else {
            continue;
        };

        if action == Action::Quit {
            info!("Quit requested");
            break;
        }

        handle_action(controller, action);
    }

    Ok(())
}

/// Applique une action utilisateur au contrôleur
///
/// Les erreurs de sélection ne peuvent venir que d'un catalogue
/// incohérent : on les journalise sans interrompre l'application.
fn handle_action<S: MarketDataSource>(controller: &mut ViewController<S>, action: Action) {
    let outcome = match action {
        Action::Refresh => {
            controller.on_refresh();
            Ok(())
        }
        Action::NextItem => controller.cycle_item(1),
        Action::PreviousItem => controller.cycle_item(-1),
        Action::NextCategory => controller.cycle_category(1),
        Action::PreviousCategory => controller.cycle_category(-1),
        Action::Quit => Ok(()),
    };

    if let Err(e) = outcome {
        warn!(?action, error = %e, "Selection rejected");
    }
}

// ============================================================================
// Terminal
// ============================================================================

/// Configure le terminal en mode TUI
///
/// CONCEPT : Raw mode + alternate screen
/// - Pas d'écho ni de buffering ligne par ligne
/// - L'écran précédent est restauré à la sortie
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
