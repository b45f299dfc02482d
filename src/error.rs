// ============================================================================
// Module : error
// ============================================================================
// Taxonomie des erreurs du domaine
//
// CONCEPTS RUST :
// 1. thiserror : dérive Display + std::error::Error à partir des attributs
// 2. Un enum par couche : sélection, transport, fetch, statistiques
// 3. anyhow reste réservé au binaire (main, config, logging)
// ============================================================================

use thiserror::Error;

/// Erreurs de sélection (erreur de programmation : le catalogue fait foi)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Catégorie inconnue (item = None) ou item absent de la catégorie
    #[error("invalid selection: {}", describe_selection(.category, .item.as_deref()))]
    InvalidSelection { category: String, item: Option<String> },

    /// Le catalogue ne propose aucune paire : pas de sélection par défaut
    #[error("invalid selection: the catalog is empty")]
    EmptyCatalog,
}

impl SelectionError {
    /// Catégorie absente du catalogue
    pub fn unknown_category(category: impl Into<String>) -> Self {
        SelectionError::InvalidSelection {
            category: category.into(),
            item: None,
        }
    }

    /// Item non proposé pour la catégorie
    pub fn unknown_item(category: impl Into<String>, item: impl Into<String>) -> Self {
        SelectionError::InvalidSelection {
            category: category.into(),
            item: Some(item.into()),
        }
    }
}

fn describe_selection(category: &str, item: Option<&str>) -> String {
    match item {
        Some(item) => format!("item '{item}' is not offered for category '{category}'"),
        None => format!("unknown category '{category}'"),
    }
}

/// Erreurs du collaborateur HTTP (couche transport)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Erreurs du fetch de données de marché
///
/// Aucune de ces erreurs n'est fatale : le contrôleur les convertit
/// en état `Failed` et l'utilisateur peut relancer un fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// La sélection envoyée est vide (seule validation locale)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Échec réseau : connexion refusée, timeout, etc.
    #[error("network error: {0}")]
    Network(String),

    /// Le service a répondu avec un statut non-2xx
    #[error("server error: HTTP {status}{}", .message.as_deref().map(|m| format!(" ({m})")).unwrap_or_default())]
    Server { status: u16, message: Option<String> },

    /// Le payload ne respecte pas le format attendu
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// Erreurs de dérivation des statistiques
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// L'historique est vide : aucune statistique possible
    #[error("insufficient data: price history is empty")]
    InsufficientData,

    /// Pas de point à (ou avant) la date de référence pour cette fenêtre
    #[error("insufficient history for the {window_days}-day change")]
    InsufficientHistory { window_days: i64 },
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message() {
        let err = FetchError::Server {
            status: 404,
            message: Some("Sneaker not found".to_string()),
        };
        assert_eq!(err.to_string(), "server error: HTTP 404 (Sneaker not found)");

        let err = FetchError::Server { status: 500, message: None };
        assert_eq!(err.to_string(), "server error: HTTP 500");
    }

    #[test]
    fn test_invalid_selection_messages() {
        assert_eq!(
            SelectionError::unknown_category("puma").to_string(),
            "invalid selection: unknown category 'puma'"
        );
        assert_eq!(
            SelectionError::unknown_item("nike", "superstar").to_string(),
            "invalid selection: item 'superstar' is not offered for category 'nike'"
        );
    }

    #[test]
    fn test_transport_error_becomes_network_error() {
        let err: FetchError = TransportError::Timeout.into();
        assert_eq!(err, FetchError::Network("request timed out".to_string()));
    }
}
