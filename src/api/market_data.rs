// ============================================================================
// API Client : service de données de marché
// ============================================================================
// Récupère historique + prédictions pour une sélection (marque, modèle)
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : le fetch suspend l'appelant jusqu'à la réponse
// 2. Serde : structures "wire" qui matchent exactement le JSON du service
// 3. Conversion à la frontière : JSON non typé -> MarketPayload typé,
//    ou FetchError::MalformedResponse si un champ manque ou est invalide
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::api::transport::HttpTransport;
use crate::error::FetchError;
use crate::models::{
    price_point::is_strictly_ascending, MarketPayload, PricePoint, ProductInfo, ProductVariant,
    ReportedStatistics, Selection,
};

// ============================================================================
// Structures pour parser la réponse JSON du service
// ============================================================================
// Forme attendue :
// {"status": "success", "timestamp": "...",
//  "data": {"sneaker": {...}, "history": [{"date", "price"}],
//           "predictions": [{"date", "price"}], "statistics": {...}}}
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireEnvelope {
    status: Option<String>,
    timestamp: Option<String>,
    data: WireData,
}

#[derive(Debug, Deserialize)]
struct WireData {
    sneaker: Option<WireSneaker>,
    history: Vec<WirePoint>,
    predictions: Vec<WirePoint>,
    statistics: Option<WireStatistics>,
}

#[derive(Debug, Deserialize)]
struct WirePoint {
    date: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct WireStatistics {
    current_price: f64,
    price_change_7d: f64,
    price_change_30d: f64,
    highest_price: f64,
    lowest_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireSneaker {
    name: String,
    base_price: Option<f64>,
    #[serde(default)]
    variants: Vec<WireVariant>,
}

#[derive(Debug, Deserialize)]
struct WireVariant {
    sku: String,
    color: String,
    release_date: Option<String>,
}

/// Corps d'erreur du service (ex: 404 {"error": "Sneaker not found"})
#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
}

// ============================================================================
// Trait : source de données de marché
// ============================================================================

/// Source asynchrone de données de marché pour une sélection
///
/// Implémentée par MarketDataClient en production, et par des fakes
/// dans les tests du contrôleur.
#[async_trait]
pub trait MarketDataSource: Send + Sync + 'static {
    async fn fetch(&self, selection: &Selection) -> Result<MarketPayload, FetchError>;
}

/// Client du service de données de marché
///
/// Un appel sortant par fetch, aucun retry à ce niveau.
#[derive(Debug, Clone)]
pub struct MarketDataClient<T> {
    transport: T,
    api_url: String,
}

impl<T: HttpTransport> MarketDataClient<T> {
    pub fn new(transport: T, api_url: impl Into<String>) -> Self {
        Self {
            transport,
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl<T: HttpTransport + 'static> MarketDataSource for MarketDataClient<T> {
    #[instrument(skip(self, selection), fields(selection = %selection))]
    async fn fetch(&self, selection: &Selection) -> Result<MarketPayload, FetchError> {
        if selection.category.trim().is_empty() || selection.item.trim().is_empty() {
            return Err(FetchError::InvalidRequest(
                "category and item must not be empty".to_string(),
            ));
        }

        let query = [
            ("brand", selection.category.as_str()),
            ("model", selection.item.as_str()),
        ];

        let response = self.transport.get(&self.api_url, &query).await.map_err(|e| {
            error!(error = %e, "Market data request failed");
            FetchError::from(e)
        })?;

        if !response.is_success() {
            let message = serde_json::from_str::<WireError>(&response.body)
                .ok()
                .map(|e| e.error);
            error!(status = response.status, message = ?message, "Market data service returned error status");
            return Err(FetchError::Server {
                status: response.status,
                message,
            });
        }

        let payload = parse_market_payload(&response.body)?;
        info!(
            history = payload.history.len(),
            predictions = payload.predictions.len(),
            "Successfully fetched market data"
        );
        Ok(payload)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse le corps JSON du service en MarketPayload
///
/// Les séries sont triées par date ; une date dupliquée dans une même
/// série est une réponse invalide.
pub fn parse_market_payload(body: &str) -> Result<MarketPayload, FetchError> {
    let envelope: WireEnvelope = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Failed to parse market data JSON");
        FetchError::MalformedResponse(e.to_string())
    })?;

    debug!(status = ?envelope.status, timestamp = ?envelope.timestamp, "Parsing market data envelope");

    let data = envelope.data;
    let history = convert_series("history", data.history)?;
    let predictions = convert_series("predictions", data.predictions)?;

    let reported_statistics = data
        .statistics
        .map(|s| {
            let values = [s.current_price, s.price_change_7d, s.price_change_30d, s.highest_price];
            if values.iter().chain(s.lowest_price.iter()).any(|v| !v.is_finite()) {
                return Err(FetchError::MalformedResponse(
                    "statistics contain a non-finite value".to_string(),
                ));
            }
            Ok(ReportedStatistics {
                current_price: s.current_price,
                price_change_7d: s.price_change_7d,
                price_change_30d: s.price_change_30d,
                highest_price: s.highest_price,
                lowest_price: s.lowest_price,
            })
        })
        .transpose()?;

    let product = data.sneaker.map(|s| ProductInfo {
        name: s.name,
        base_price: s.base_price,
        variants: s
            .variants
            .into_iter()
            .map(|v| ProductVariant {
                sku: v.sku,
                color: v.color,
                release_date: v.release_date.as_deref().and_then(|d| parse_date(d).ok()),
            })
            .collect(),
    });

    Ok(MarketPayload {
        history,
        predictions,
        reported_statistics,
        product,
    })
}

fn convert_series(name: &str, points: Vec<WirePoint>) -> Result<Vec<PricePoint>, FetchError> {
    let mut series = points
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let date = parse_date(&p.date).map_err(|_| {
                FetchError::MalformedResponse(format!("{name}[{i}]: invalid date '{}'", p.date))
            })?;
            if !p.price.is_finite() || p.price < 0.0 {
                return Err(FetchError::MalformedResponse(format!(
                    "{name}[{i}]: invalid price {}",
                    p.price
                )));
            }
            Ok(PricePoint::new(date, p.price))
        })
        .collect::<Result<Vec<_>, _>>()?;

    series.sort_by_key(|p| p.date);
    if !is_strictly_ascending(&series) {
        return Err(FetchError::MalformedResponse(format!(
            "{name}: duplicate dates"
        )));
    }
    Ok(series)
}

/// Accepte "YYYY-MM-DD" ou un timestamp RFC 3339
fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
}

// ============================================================================
// Tests unitaires
// ============================================================================
