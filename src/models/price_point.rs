// ============================================================================
// Structure : PricePoint
// ============================================================================
// Un point de prix daté (historique ou prédiction)
//
// CONCEPTS RUST :
// 1. NaiveDate : date sans fuseau horaire (le service envoie "YYYY-MM-DD")
// 2. f64 : prix en dollars (précision suffisante pour l'affichage)
// 3. Invariant des séries : dates uniques, triées par ordre croissant
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Point de prix (date, prix)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Vérifie l'invariant d'une série : dates strictement croissantes
///
/// CONCEPT RUST : windows(2)
/// - Itère sur des paires de voisins consécutifs sans copie
pub fn is_strictly_ascending(points: &[PricePoint]) -> bool {
    points.windows(2).all(|w| w[0].date < w[1].date)
}

/// Variation en pourcentage entre deux prix
///
/// None si le prix de base est nul (division impossible)
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        None
    } else {
        Some(((to - from) / from) * 100.0)
    }
}

/// Statistiques fournies directement par le service
///
/// Informatives uniquement : les statistiques affichées sont dérivées
/// localement de l'historique (voir `statistics::derive`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportedStatistics {
    pub current_price: f64,
    pub price_change_7d: f64,
    pub price_change_30d: f64,
    pub highest_price: f64,
    pub lowest_price: Option<f64>,
}

/// Variante d'un produit (coloris, SKU)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub sku: String,
    pub color: String,
    pub release_date: Option<NaiveDate>,
}

/// Métadonnées du produit renvoyées par le service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Nom complet (ex: "Nike Air Jordan 1")
    pub name: String,

    /// Prix de sortie
    pub base_price: Option<f64>,

    pub variants: Vec<ProductVariant>,
}

/// Données typées d'une réponse du service, avant composition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketPayload {
    /// Historique trié par date croissante
    pub history: Vec<PricePoint>,

    /// Prédictions triées par date croissante
    pub predictions: Vec<PricePoint>,

    pub reported_statistics: Option<ReportedStatistics>,

    pub product: Option<ProductInfo>,
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_is_strictly_ascending() {
        let sorted = vec![PricePoint::new(day(1), 1.0), PricePoint::new(day(2), 2.0)];
        assert!(is_strictly_ascending(&sorted));
        assert!(is_strictly_ascending(&[]));

        let duplicated = vec![PricePoint::new(day(1), 1.0), PricePoint::new(day(1), 2.0)];
        assert!(!is_strictly_ascending(&duplicated));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(100.0, 110.0), Some(10.0));
        assert_eq!(percent_change(200.0, 150.0), Some(-25.0));
        assert_eq!(percent_change(0.0, 10.0), None);
    }
}
