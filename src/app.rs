// ============================================================================
// Structure : ViewController
// ============================================================================
// Gère l'état de la vue : sélection courante + état de chargement
//
// CONCEPTS RUST :
// 1. State Machine : LoadState (Idle | Loading | Loaded | Failed)
// 2. Tâches tokio : chaque fetch tourne dans sa propre tâche
// 3. Channels : les résultats reviennent par un mpsc, traités un par un
// 4. watch : un snapshot immuable est publié après chaque transition
//
// PATTERN : "Application State" centralisé
// - Toutes les modifications passent par les méthodes du contrôleur
// - Le rendu ne lit que le ViewSnapshot publié
// - Un seul fil logique mute l'état : aucun verrou nécessaire
// ============================================================================

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::api::MarketDataSource;
use crate::error::{FetchError, SelectionError};
use crate::models::{Catalog, MarketPayload, MarketSnapshot, Selection, SelectionState};
use crate::sequencer::{FetchRequest, RequestSequencer};

// ============================================================================
// Enum : LoadState
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul variant actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Catégorie d'erreur affichable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    Network,
    Server { status: u16 },
    MalformedResponse,
}

/// Erreur présentée à l'utilisateur dans l'état Failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,

    /// Message lisible dérivé du type d'erreur
    pub message: String,
}

impl From<&FetchError> for ErrorInfo {
    fn from(err: &FetchError) -> Self {
        let (kind, message) = match err {
            FetchError::InvalidRequest(detail) => (
                ErrorKind::InvalidRequest,
                format!("Error: invalid selection ({detail})"),
            ),
            FetchError::Network(detail) => (
                ErrorKind::Network,
                format!("Error: unable to reach the market data service ({detail})"),
            ),
            FetchError::Server { status, message } => (
                ErrorKind::Server { status: *status },
                match message {
                    Some(msg) => format!("Error: the market data service returned HTTP {status}: {msg}"),
                    None => format!("Error: the market data service returned HTTP {status}"),
                },
            ),
            FetchError::MalformedResponse(detail) => (
                ErrorKind::MalformedResponse,
                format!("Error: unexpected response from the market data service ({detail})"),
            ),
        };
        Self { kind, message }
    }
}

/// État de chargement observable
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    /// Aucun fetch émis
    #[default]
    Idle,

    /// Un fetch est en vol pour la sélection courante
    Loading,

    /// Données disponibles
    Loaded(Arc<MarketSnapshot>),

    /// Dernier fetch en échec
    Failed(ErrorInfo),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn snapshot(&self) -> Option<&Arc<MarketSnapshot>> {
        match self {
            LoadState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            LoadState::Failed(info) => Some(info),
            _ => None,
        }
    }

    /// Nom court pour les logs
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Loaded(_) => "loaded",
            LoadState::Failed(_) => "failed",
        }
    }
}

/// Snapshot immuable publié vers la couche de rendu
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    /// Incrémenté à chaque transition publiée
    pub revision: u64,

    pub selection: Selection,

    pub load_state: LoadState,
}

/// Résultat d'un fetch renvoyé par sa tâche
#[derive(Debug)]
pub struct FetchCompletion {
    pub seq: u64,
    pub selection: Selection,
    pub result: Result<MarketPayload, FetchError>,
}

/// Effet du traitement d'un résultat de fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Résultat de la dernière requête : état mis à jour et publié
    Applied,

    /// Résultat obsolète : ignoré, rien de publié
    Discarded,
}

// ============================================================================
// ViewController
// ============================================================================

/// Contrôleur de l'état de la vue
///
/// CONCEPT RUST : Générique sur la source de données
/// - S = MarketDataClient<ReqwestTransport> en production
/// - S = source factice dans les tests
pub struct ViewController<S> {
    selection: SelectionState,
    load_state: LoadState,
    sequencer: RequestSequencer,
    source: Arc<S>,
    runtime: Handle,
    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    publisher: watch::Sender<ViewSnapshot>,
    revision: u64,
}

impl<S: MarketDataSource> ViewController<S> {
    /// Crée le contrôleur et émet immédiatement le fetch de la sélection par défaut
    ///
    /// L'état initial observable est donc Loading.
    pub fn new(catalog: Arc<Catalog>, source: Arc<S>, runtime: Handle) -> Result<Self, SelectionError> {
        let mut controller = Self::idle(catalog, source, runtime)?;
        controller.start_fetch();
        Ok(controller)
    }

    /// Crée le contrôleur sans émettre de fetch (état Idle)
    pub fn idle(catalog: Arc<Catalog>, source: Arc<S>, runtime: Handle) -> Result<Self, SelectionError> {
        let selection = SelectionState::new(catalog).ok_or(SelectionError::EmptyCatalog)?;
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (publisher, _) = watch::channel(ViewSnapshot {
            revision: 0,
            selection: selection.current().clone(),
            load_state: LoadState::Idle,
        });

        Ok(Self {
            selection,
            load_state: LoadState::Idle,
            sequencer: RequestSequencer::new(),
            source,
            runtime,
            completion_tx,
            completion_rx,
            publisher,
            revision: 0,
        })
    }

    // ========================================================================
    // Lecture de l'état
    // ========================================================================

    /// Abonnement aux snapshots (un par transition)
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.publisher.subscribe()
    }

    /// Dernier snapshot publié
    pub fn snapshot(&self) -> ViewSnapshot {
        self.publisher.borrow().clone()
    }

    pub fn selection(&self) -> &Selection {
        self.selection.current()
    }

    pub fn catalog(&self) -> &Catalog {
        self.selection.catalog()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Vrai tant que le résultat de la dernière requête n'a pas été appliqué
    pub fn has_pending_fetch(&self) -> bool {
        self.sequencer.has_in_flight()
    }

    // ========================================================================
    // Déclencheurs
    // ========================================================================

    /// Remplace la sélection et relance un fetch
    pub fn on_selection_change(&mut self, selection: Selection) -> Result<(), SelectionError> {
        self.selection.set(selection)?;
        info!(selection = %self.selection.current(), "Selection changed");
        self.start_fetch();
        Ok(())
    }

    /// Relance un fetch pour la sélection courante
    pub fn on_refresh(&mut self) {
        info!(selection = %self.selection.current(), "Refresh requested");
        self.start_fetch();
    }

    /// Change de catégorie (item remis au défaut) ; refetch si la sélection change
    pub fn set_category(&mut self, category: &str) -> Result<(), SelectionError> {
        let changed = self.selection.set_category(category)?;
        self.refetch_if(changed);
        Ok(())
    }

    /// Change d'item dans la catégorie courante ; refetch si la sélection change
    pub fn set_item(&mut self, item: &str) -> Result<(), SelectionError> {
        let changed = self.selection.set_item(item)?;
        self.refetch_if(changed);
        Ok(())
    }

    /// Item suivant/précédent de la catégorie courante
    pub fn cycle_item(&mut self, step: isize) -> Result<(), SelectionError> {
        let changed = self.selection.cycle_item(step)?;
        self.refetch_if(changed);
        Ok(())
    }

    /// Catégorie suivante/précédente
    pub fn cycle_category(&mut self, step: isize) -> Result<(), SelectionError> {
        let changed = self.selection.cycle_category(step)?;
        self.refetch_if(changed);
        Ok(())
    }

    // ========================================================================
    // Résultats des fetchs
    // ========================================================================

    /// Applique un résultat de fetch s'il correspond à la dernière requête
    pub fn handle_completion(&mut self, completion: FetchCompletion) -> Transition {
        let FetchCompletion { seq, selection, result } = completion;

        if !self.sequencer.is_current(seq) {
            debug!(seq, latest = self.sequencer.latest(), selection = %selection, "Discarding stale fetch result");
            return Transition::Discarded;
        }
        self.sequencer.settle(seq);

        match result {
            Ok(payload) => {
                let snapshot = MarketSnapshot::build(selection, payload);
                info!(seq, selection = %snapshot.selection, points = snapshot.series.len(), "Market data loaded");
                self.transition(LoadState::Loaded(Arc::new(snapshot)));
            }
            Err(err) => {
                error!(seq, selection = %selection, error = %err, "Market data fetch failed");
                self.transition(LoadState::Failed(ErrorInfo::from(&err)));
            }
        }
        Transition::Applied
    }

    /// Traite tous les résultats déjà arrivés, sans bloquer
    ///
    /// Retourne le nombre de résultats appliqués (pour la boucle UI).
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            if self.handle_completion(completion) == Transition::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Attend le prochain résultat de fetch et le traite
    ///
    /// Ne retourne pas si aucune tâche n'est en vol : vérifier
    /// has_pending_fetch() avant d'attendre.
    pub async fn next_completion(&mut self) -> Option<Transition> {
        let completion = self.completion_rx.recv().await?;
        Some(self.handle_completion(completion))
    }

    /// Attend que la dernière requête émise soit appliquée
    pub async fn wait_until_settled(&mut self) {
        while self.sequencer.has_in_flight() {
            if self.next_completion().await.is_none() {
                warn!("Completion channel closed while a fetch was pending");
                break;
            }
        }
    }

    // ========================================================================
    // Interne
    // ========================================================================

    fn refetch_if(&mut self, changed: bool) {
        if changed {
            info!(selection = %self.selection.current(), "Selection changed");
            self.start_fetch();
        } else {
            debug!(selection = %self.selection.current(), "Selection unchanged, no fetch");
        }
    }

    /// Émet une requête séquencée et passe en Loading
    fn start_fetch(&mut self) {
        let FetchRequest { seq, selection } = self.sequencer.issue(self.selection.current().clone());
        debug!(seq, selection = %selection, "Issuing market data fetch");

        let source = Arc::clone(&self.source);
        let tx = self.completion_tx.clone();
        let task = self.runtime.spawn(async move {
            // CONCEPT : JoinSet comme superviseur
            // - un panic du fetch devient un JoinError au lieu d'une réponse perdue
            // - abort() du superviseur drop le JoinSet, qui abort() le fetch
            let mut fetch = JoinSet::new();
            let request = selection.clone();
            fetch.spawn(async move { source.fetch(&request).await });

            let result = match fetch.join_next().await {
                Some(Ok(result)) => result,
                Some(Err(err)) if err.is_panic() => {
                    error!(seq, selection = %selection, "Market data fetch task panicked");
                    Err(FetchError::Network("fetch task panicked".to_string()))
                }
                // Annulé : plus personne n'attend ce résultat
                _ => return,
            };

            // Le contrôleur détient aussi un sender : l'envoi n'échoue
            // que si le contrôleur a été détruit
            let _ = tx.send(FetchCompletion { seq, selection, result });
        });
        self.sequencer.track(seq, task.abort_handle());

        self.transition(LoadState::Loading);
    }

    /// Change l'état et publie un nouveau snapshot
    fn transition(&mut self, next: LoadState) {
        debug!(from = self.load_state.label(), to = next.label(), "Load state transition");
        self.load_state = next;
        self.revision += 1;
        self.publisher.send_replace(ViewSnapshot {
            revision: self.revision,
            selection: self.selection.current().clone(),
            load_state: self.load_state.clone(),
        });
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
