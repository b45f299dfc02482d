// ============================================================================
// SneakerWatch - Library
// ============================================================================
// Expose les modules publics pour le binaire TUI et les tests
// ============================================================================

pub mod api;       // Client du service de données de marché
pub mod app;       // Contrôleur de l'état de la vue
pub mod config;    // Configuration (variables d'environnement)
pub mod error;     // Taxonomie des erreurs
pub mod models;    // Structures de données
pub mod sequencer; // Garde anti-obsolescence des fetchs
pub mod ui;        // Interface utilisateur
