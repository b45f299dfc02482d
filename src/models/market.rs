// ============================================================================
// Structure : MarketSnapshot
// ============================================================================
// Résultat normalisé d'un fetch réussi, prêt pour le rendu
//
// CONCEPTS RUST :
// 1. Composition : le snapshot contient les séries brutes, la série composée
//    et les statistiques dérivées
// 2. Construction unique : build() est le seul chemin, le snapshot est immuable
// ============================================================================

use tracing::{debug, warn};

use crate::models::{
    compose, statistics, DisplaySeries, MarketPayload, PricePoint, ProductInfo,
    ReportedStatistics, Selection, Statistics,
};

/// Écart toléré (en points de %) entre statistiques locales et du service
const DIVERGENCE_TOLERANCE: f64 = 0.5;

/// Données de marché d'une sélection
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    /// Sélection pour laquelle le fetch a été émis
    pub selection: Selection,

    pub history: Vec<PricePoint>,

    pub predictions: Vec<PricePoint>,

    /// Statistiques dérivées localement (source de vérité)
    /// None seulement si l'historique est vide
    pub statistics: Option<Statistics>,

    /// Statistiques annoncées par le service (informatives)
    pub reported_statistics: Option<ReportedStatistics>,

    pub product: Option<ProductInfo>,

    /// Série composée historique + prédiction
    pub series: DisplaySeries,
}

impl MarketSnapshot {
    /// Compose la série et dérive les statistiques
    pub fn build(selection: Selection, payload: MarketPayload) -> Self {
        let series = compose(&payload.history, &payload.predictions);

        let statistics = match statistics::derive(&payload.history) {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!(selection = %selection, error = %err, "No statistics for this snapshot");
                None
            }
        };

        if let (Some(local), Some(reported)) = (&statistics, &payload.reported_statistics) {
            log_divergence(&selection, local, reported);
        }

        debug!(
            selection = %selection,
            history = payload.history.len(),
            predictions = payload.predictions.len(),
            "Built market snapshot"
        );

        Self {
            selection,
            history: payload.history,
            predictions: payload.predictions,
            statistics,
            reported_statistics: payload.reported_statistics,
            product: payload.product,
            series,
        }
    }

    /// Nom affichable du produit (métadonnées du service, sinon la sélection)
    pub fn display_name(&self) -> String {
        match &self.product {
            Some(product) if !product.name.is_empty() => product.name.clone(),
            _ => self.selection.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.predictions.is_empty()
    }
}

/// Le service ne réconcilie pas ses statistiques avec l'historique :
/// on garde les nôtres et on signale l'écart
fn log_divergence(selection: &Selection, local: &Statistics, reported: &ReportedStatistics) {
    let diverges = |a: Option<f64>, b: f64| a.map(|a| (a - b).abs() > DIVERGENCE_TOLERANCE).unwrap_or(false);

    if (local.current_price - reported.current_price).abs() > f64::EPSILON
        || diverges(local.price_change_7d, reported.price_change_7d)
        || diverges(local.price_change_30d, reported.price_change_30d)
    {
        warn!(
            selection = %selection,
            local_current = local.current_price,
            reported_current = reported.current_price,
            local_7d = ?local.price_change_7d,
            reported_7d = reported.price_change_7d,
            local_30d = ?local.price_change_30d,
            reported_30d = reported.price_change_30d,
            "Service statistics diverge from derived statistics"
        );
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_build_composes_and_derives() {
        let payload = MarketPayload {
            history: vec![PricePoint::new(day(1), 100.0), PricePoint::new(day(2), 120.0)],
            predictions: vec![PricePoint::new(day(3), 125.0)],
            reported_statistics: None,
            product: None,
        };

        let snapshot = MarketSnapshot::build(Selection::new("nike", "dunk-low"), payload);
        assert_eq!(snapshot.series.len(), 3);

        let stats = snapshot.statistics.unwrap();
        assert_eq!(stats.current_price, 120.0);
        assert_eq!(stats.highest_price, 120.0);
        assert_eq!(snapshot.display_name(), "nike/dunk-low");
    }

    #[test]
    fn test_empty_history_has_no_statistics() {
        let payload = MarketPayload {
            predictions: vec![PricePoint::new(day(3), 125.0)],
            ..MarketPayload::default()
        };

        let snapshot = MarketSnapshot::build(Selection::new("adidas", "superstar"), payload);
        assert!(snapshot.statistics.is_none());
        assert_eq!(snapshot.series.len(), 1);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_display_name_prefers_product() {
        let payload = MarketPayload {
            product: Some(ProductInfo {
                name: "Nike Air Jordan 1".to_string(),
                base_price: Some(170.0),
                variants: Vec::new(),
            }),
            ..MarketPayload::default()
        };

        let snapshot = MarketSnapshot::build(Selection::new("nike", "air-jordan-1"), payload);
        assert_eq!(snapshot.display_name(), "Nike Air Jordan 1");
    }
}
