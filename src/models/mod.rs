// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod catalog;     // Catalogue des paires (marque, modèle)
pub mod selection;   // Sélection courante validée contre le catalogue
pub mod price_point; // Points de prix et payload typé du service
pub mod series;      // Composition historique + prédiction
pub mod statistics;  // Statistiques dérivées de l'historique
pub mod market;      // Snapshot de marché complet

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use sneakerwatch::models::selection::Selection;
// On peut faire : use sneakerwatch::models::Selection;
pub use catalog::{Catalog, CatalogCategory, CatalogItem};
pub use selection::{Selection, SelectionState};
pub use price_point::{MarketPayload, PricePoint, ProductInfo, ProductVariant, ReportedStatistics};
pub use series::{compose, DisplaySeries, Provenance, SeriesPoint};
pub use statistics::Statistics;
pub use market::MarketSnapshot;
