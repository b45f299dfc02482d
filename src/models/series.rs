// ============================================================================
// Structure : DisplaySeries
// ============================================================================
// Fusionne historique et prédictions sur un seul axe chronologique
//
// CONCEPTS RUST :
// 1. Enum de provenance : chaque point sait de quelle sous-série il vient
// 2. sort_by stable : à date égale, l'historique passe avant la prédiction
// 3. dedup_by : supprime les doublons (date, sous-série) consécutifs
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PricePoint;

/// Sous-série d'origine d'un point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provenance {
    Historical,
    Predicted,
}

impl Provenance {
    /// Nom de la sous-série (légende du graphique)
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Historical => "Historical Price",
            Provenance::Predicted => "Predicted Price",
        }
    }
}

/// Point de la série d'affichage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub provenance: Provenance,
}

/// Série prête pour le rendu : points triés par date croissante
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplaySeries {
    points: Vec<SeriesPoint>,
}

impl DisplaySeries {
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axe des dates (une entrée par point, donc une date peut apparaître
    /// deux fois si elle existe dans les deux sous-séries)
    pub fn axis(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Points d'une sous-série, dans l'ordre chronologique
    pub fn sub_series(&self, provenance: Provenance) -> impl Iterator<Item = &SeriesPoint> + '_ {
        self.points.iter().filter(move |p| p.provenance == provenance)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Bornes (min, max) des prix, toutes sous-séries confondues
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), p| (min.min(p.price), max.max(p.price)),
        ))
    }
}

/// Compose la série d'affichage
///
/// Aucune interpolation : les trous restent des trous.
pub fn compose(history: &[PricePoint], predictions: &[PricePoint]) -> DisplaySeries {
    let tag = |points: &[PricePoint], provenance: Provenance| -> Vec<SeriesPoint> {
        points
            .iter()
            .map(|p| SeriesPoint {
                date: p.date,
                price: p.price,
                provenance,
            })
            .collect()
    };

    let mut points = tag(history, Provenance::Historical);
    points.extend(tag(predictions, Provenance::Predicted));

    points.sort_by(|a, b| (a.date, a.provenance).cmp(&(b.date, b.provenance)));
    points.dedup_by(|next, kept| next.date == kept.date && next.provenance == kept.provenance);

    DisplaySeries { points }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_compose_empty() {
        let series = compose(&[], &[]);
        assert!(series.is_empty());
        assert!(series.axis().is_empty());
        assert_eq!(series.price_bounds(), None);
    }

    #[test]
    fn test_compose_sorted_union() {
        let history = vec![PricePoint::new(day(1), 100.0), PricePoint::new(day(2), 101.0)];
        let predictions = vec![PricePoint::new(day(3), 102.0), PricePoint::new(day(4), 103.0)];

        let series = compose(&history, &predictions);
        assert_eq!(series.axis(), vec![day(1), day(2), day(3), day(4)]);
        assert_eq!(series.sub_series(Provenance::Historical).count(), 2);
        assert_eq!(series.sub_series(Provenance::Predicted).count(), 2);
        assert_eq!(series.price_bounds(), Some((100.0, 103.0)));
    }

    #[test]
    fn test_shared_date_keeps_both_points() {
        let history = vec![PricePoint::new(day(2), 100.0)];
        let predictions = vec![PricePoint::new(day(2), 110.0)];

        let series = compose(&history, &predictions);
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].provenance, Provenance::Historical);
        assert_eq!(series.points()[0].price, 100.0);
        assert_eq!(series.points()[1].provenance, Provenance::Predicted);
        assert_eq!(series.points()[1].price, 110.0);
    }

    #[test]
    fn test_unsorted_input_with_duplicates() {
        let history = vec![
            PricePoint::new(day(5), 105.0),
            PricePoint::new(day(1), 101.0),
            PricePoint::new(day(5), 999.0),
        ];
        let predictions = vec![PricePoint::new(day(3), 103.0)];

        let series = compose(&history, &predictions);
        let axis = series.axis();
        assert!(axis.windows(2).all(|w| w[0] <= w[1]));

        let mut pairs: Vec<_> = series.points().iter().map(|p| (p.date, p.provenance)).collect();
        let before = pairs.len();
        pairs.dedup();
        assert_eq!(pairs.len(), before);
        assert_eq!(series.len(), 3);
        // Le premier point rencontré est conservé
        assert_eq!(series.points()[2].price, 105.0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Provenance::Historical.label(), "Historical Price");
        assert_eq!(Provenance::Predicted.label(), "Predicted Price");
    }
}
