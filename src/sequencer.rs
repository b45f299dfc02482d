// ============================================================================
// Structure : RequestSequencer
// ============================================================================
// Garde anti-obsolescence des fetchs asynchrones
//
// CONCEPTS :
// - Chaque requête reçoit un numéro tiré d'un compteur strictement croissant
// - Une réponse n'est appliquée que si son numéro est le dernier émis
// - Les réponses obsolètes sont ignorées silencieusement (pas des erreurs)
// - Annulation best-effort : la tâche en vol précédente est abort()ée,
//   mais la correction repose uniquement sur la comparaison des numéros
// ============================================================================

use tokio::task::AbortHandle;
use tracing::debug;

use crate::models::Selection;

/// Requête de fetch émise pour une sélection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Numéro de séquence (1 pour la première requête)
    pub seq: u64,

    pub selection: Selection,
}

/// Compteur de séquence + handle de la tâche en vol
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
    in_flight: Option<AbortHandle>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Émet une nouvelle requête ; la précédente devient obsolète
    pub fn issue(&mut self, selection: Selection) -> FetchRequest {
        self.cancel_in_flight();
        self.latest += 1;
        FetchRequest {
            seq: self.latest,
            selection,
        }
    }

    /// Associe la tâche tokio de la requête courante (pour l'annuler plus tard)
    pub fn track(&mut self, seq: u64, handle: AbortHandle) {
        if seq == self.latest {
            self.in_flight = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Vrai si `seq` est la dernière requête émise
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }

    /// Marque la requête courante comme terminée (oublie son handle)
    pub fn settle(&mut self, seq: u64) {
        if self.is_current(seq) {
            self.in_flight = None;
        }
    }

    /// Dernier numéro émis (0 si aucune requête)
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// Vrai si la requête courante n'a pas encore été réglée
    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            debug!(seq = self.latest, "Aborting superseded fetch");
            handle.abort();
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
