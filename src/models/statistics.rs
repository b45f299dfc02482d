// ============================================================================
// Module : statistics
// ============================================================================
// Dérive les statistiques d'affichage à partir de l'historique de prix
//
// CONCEPTS :
// - Prix actuel : dernier point de l'historique
// - Variation N jours : base = dernier point daté au plus tard (dernier - N jours)
// - Tolérance par champ : une fenêtre trop courte donne None, pas une erreur globale
// ============================================================================

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DerivationError;
use crate::models::price_point::{percent_change, PricePoint};

/// Fenêtre de la variation courte (jours)
pub const SHORT_WINDOW_DAYS: i64 = 7;

/// Fenêtre de la variation longue (jours)
pub const LONG_WINDOW_DAYS: i64 = 30;

/// Statistiques affichées pour une sélection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub current_price: f64,

    /// Variation sur 7 jours en %, None si l'historique est trop court
    pub price_change_7d: Option<f64>,

    /// Variation sur 30 jours en %, None si l'historique est trop court
    pub price_change_30d: Option<f64>,

    pub highest_price: f64,

    pub lowest_price: f64,
}

/// Dérive les statistiques ; échoue seulement si l'historique est vide
///
/// L'historique doit être trié par date croissante.
pub fn derive(history: &[PricePoint]) -> Result<Statistics, DerivationError> {
    let last = history.last().ok_or(DerivationError::InsufficientData)?;

    let (lowest_price, highest_price) = history.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), p| (min.min(p.price), max.max(p.price)),
    );

    Ok(Statistics {
        current_price: last.price,
        price_change_7d: tolerate(change_over(history, SHORT_WINDOW_DAYS)),
        price_change_30d: tolerate(change_over(history, LONG_WINDOW_DAYS)),
        highest_price,
        lowest_price,
    })
}

/// Variation en % entre le point de base de la fenêtre et le dernier point
///
/// CONCEPT RUST : rev().find()
/// - Parcourt depuis la fin : le premier point <= cible est le plus proche
pub fn change_over(history: &[PricePoint], window_days: i64) -> Result<f64, DerivationError> {
    let last = history.last().ok_or(DerivationError::InsufficientData)?;
    let target = last.date - Duration::days(window_days);

    let base = history
        .iter()
        .rev()
        .find(|p| p.date <= target)
        .ok_or(DerivationError::InsufficientHistory { window_days })?;

    percent_change(base.price, last.price).ok_or(DerivationError::InsufficientHistory { window_days })
}

fn tolerate(result: Result<f64, DerivationError>) -> Option<f64> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(error = %err, "Statistic unavailable");
            None
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Série quotidienne : prix = 100 + jour, du jour 0 au jour `last_day`
    fn linear_series(last_day: i64) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        (0..=last_day)
            .map(|d| PricePoint::new(start + Duration::days(d), 100.0 + d as f64))
            .collect()
    }

    #[test]
    fn test_derive_linear_31_days() {
        let stats = derive(&linear_series(30)).unwrap();

        assert_eq!(stats.current_price, 130.0);
        assert_eq!(stats.price_change_30d, Some((130.0 - 100.0) / 100.0 * 100.0));
        assert_eq!(stats.price_change_7d, Some((130.0 - 123.0) / 123.0 * 100.0));
        assert_eq!(stats.highest_price, 130.0);
        assert_eq!(stats.lowest_price, 100.0);
    }

    #[test]
    fn test_derive_empty_history() {
        assert_eq!(derive(&[]), Err(DerivationError::InsufficientData));
    }

    #[test]
    fn test_short_history_tolerates_missing_30d() {
        // 10 jours : la fenêtre 7j existe, pas la fenêtre 30j
        let history = linear_series(9);
        let stats = derive(&history).unwrap();

        assert_eq!(stats.current_price, 109.0);
        assert_eq!(stats.price_change_7d, Some((109.0 - 102.0) / 102.0 * 100.0));
        assert_eq!(stats.price_change_30d, None);
        assert_eq!(
            change_over(&history, LONG_WINDOW_DAYS),
            Err(DerivationError::InsufficientHistory { window_days: 30 })
        );
    }

    #[test]
    fn test_single_point() {
        let history = linear_series(0);
        let stats = derive(&history).unwrap();
        assert_eq!(stats.current_price, 100.0);
        assert_eq!(stats.highest_price, 100.0);
        assert_eq!(stats.price_change_7d, None);
        assert_eq!(stats.price_change_30d, None);
    }

    #[test]
    fn test_base_point_is_latest_before_target() {
        // Trou dans la série : pas de point exactement 7 jours avant
        let d = |day: u32| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        let history = vec![
            PricePoint::new(d(1), 80.0),
            PricePoint::new(d(5), 100.0),
            PricePoint::new(d(10), 90.0),
            PricePoint::new(d(14), 150.0),
        ];

        // cible = 7 mai -> base = 5 mai (100.0)
        assert_eq!(change_over(&history, 7), Ok(50.0));
    }

    #[test]
    fn test_zero_base_price_is_tolerated() {
        let d = |day: u32| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        let history = vec![PricePoint::new(d(1), 0.0), PricePoint::new(d(9), 50.0)];

        let stats = derive(&history).unwrap();
        assert_eq!(stats.price_change_7d, None);
        assert_eq!(stats.lowest_price, 0.0);
    }
}
