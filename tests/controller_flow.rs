// ============================================================================
// Tests d'intégration : contrôleur + source de données
// ============================================================================
// Scénarios de bout en bout sans réseau :
// - réponses dans le désordre (la dernière sélection gagne)
// - séquences de sélections arbitraires
// - erreur HTTP 500 puis rafraîchissement
// ============================================================================

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use sneakerwatch::api::{HttpResponse, HttpTransport, MarketDataClient, MarketDataSource};
use sneakerwatch::app::{ErrorKind, FetchCompletion, LoadState, Transition, ViewController};
use sneakerwatch::error::{FetchError, TransportError};
use sneakerwatch::models::{Catalog, MarketPayload, PricePoint, Selection};

type FetchResult = Result<MarketPayload, FetchError>;

fn payload(price: f64) -> MarketPayload {
    let start = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
    MarketPayload {
        history: (0..5)
            .map(|i| PricePoint::new(start + chrono::Duration::days(i), price))
            .collect(),
        predictions: vec![PricePoint::new(start + chrono::Duration::days(5), price + 1.0)],
        ..MarketPayload::default()
    }
}

fn loaded_price(state: &LoadState) -> Option<f64> {
    state
        .snapshot()
        .and_then(|s| s.statistics)
        .map(|s| s.current_price)
}

// ============================================================================
// Sources factices
// ============================================================================

/// Source dont chaque réponse est débloquée par le test (oneshot par sélection)
#[derive(Default)]
struct GatedSource {
    gates: Mutex<HashMap<Selection, oneshot::Receiver<FetchResult>>>,
}

impl GatedSource {
    fn gate(&self, selection: Selection) -> oneshot::Sender<FetchResult> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(selection, rx);
        tx
    }
}

#[async_trait]
impl MarketDataSource for GatedSource {
    async fn fetch(&self, selection: &Selection) -> FetchResult {
        let gate = self.gates.lock().unwrap().remove(selection);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("gate dropped".to_string()))),
            None => Err(FetchError::Network(format!("no gate for {selection}"))),
        }
    }
}

/// Source immédiate : un prix fixe par sélection
struct PricedSource;

fn price_for(selection: &Selection) -> f64 {
    match (selection.category.as_str(), selection.item.as_str()) {
        ("nike", "dunk-low") => 110.0,
        ("nike", "air-jordan-1") => 180.0,
        ("nike", "air-force-1") => 100.0,
        ("adidas", "yeezy-350") => 220.0,
        ("adidas", "superstar") => 90.0,
        _ => 0.0,
    }
}

#[async_trait]
impl MarketDataSource for PricedSource {
    async fn fetch(&self, selection: &Selection) -> FetchResult {
        tokio::task::yield_now().await;
        Ok(payload(price_for(selection)))
    }
}

/// Transport HTTP factice : rejoue une file de réponses
struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, _url: &str, _query: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other("no scripted response".to_string()))
    }
}

// ============================================================================
// Scénarios
// ============================================================================

#[tokio::test]
async fn test_out_of_order_responses_keep_latest_selection() {
    let source = Arc::new(GatedSource::default());
    let dunk = Selection::new("nike", "dunk-low");
    let yeezy = Selection::new("adidas", "yeezy-350");
    let dunk_gate = source.gate(dunk.clone());
    let yeezy_gate = source.gate(yeezy.clone());

    let mut controller =
        ViewController::new(Arc::new(Catalog::reference()), Arc::clone(&source), Handle::current())
            .unwrap();
    controller.on_selection_change(yeezy.clone()).unwrap();

    // La réponse la plus récente arrive en premier, l'ancienne ensuite
    yeezy_gate.send(Ok(payload(220.0))).unwrap();
    let _ = dunk_gate.send(Ok(payload(110.0)));
    controller.wait_until_settled().await;

    let view = controller.snapshot();
    assert_eq!(view.selection, yeezy);
    assert_eq!(view.revision, 3);
    assert_eq!(loaded_price(&view.load_state), Some(220.0));

    // Le résultat de la première requête est écarté, rien n'est publié
    let stale = FetchCompletion {
        seq: 1,
        selection: dunk,
        result: Ok(payload(110.0)),
    };
    assert_eq!(controller.handle_completion(stale), Transition::Discarded);
    assert_eq!(controller.snapshot(), view);
}

#[tokio::test]
async fn test_response_delivered_after_newer_request_is_discarded() {
    let source = Arc::new(GatedSource::default());
    let dunk = Selection::new("nike", "dunk-low");
    let yeezy = Selection::new("adidas", "yeezy-350");
    let dunk_gate = source.gate(dunk.clone());
    let yeezy_gate = source.gate(yeezy.clone());

    let mut controller =
        ViewController::new(Arc::new(Catalog::reference()), Arc::clone(&source), Handle::current())
            .unwrap();

    // La première requête répond et sa tâche envoie le résultat...
    dunk_gate.send(Ok(payload(110.0))).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // ...mais la sélection change avant que le contrôleur ne le lise
    controller.on_selection_change(yeezy.clone()).unwrap();
    assert_eq!(controller.next_completion().await, Some(Transition::Discarded));
    assert!(controller.load_state().is_loading());
    assert_eq!(controller.snapshot().selection, yeezy);

    yeezy_gate.send(Ok(payload(220.0))).unwrap();
    controller.wait_until_settled().await;

    let view = controller.snapshot();
    assert_eq!(loaded_price(&view.load_state), Some(220.0));
    assert_eq!(view.load_state.snapshot().unwrap().selection, yeezy);
}

#[tokio::test]
async fn test_latest_selection_wins_for_any_sequence() {
    let sequences: Vec<Vec<(&str, &str)>> = vec![
        vec![("adidas", "yeezy-350")],
        vec![("nike", "air-jordan-1"), ("adidas", "superstar")],
        vec![("adidas", "superstar"), ("nike", "dunk-low"), ("nike", "air-force-1")],
        vec![("nike", "air-force-1"), ("nike", "air-force-1"), ("adidas", "yeezy-350"), ("nike", "dunk-low")],
    ];

    for sequence in sequences {
        let mut controller =
            ViewController::new(Arc::new(Catalog::reference()), Arc::new(PricedSource), Handle::current())
                .unwrap();

        for (i, (category, item)) in sequence.iter().enumerate() {
            controller
                .on_selection_change(Selection::new(*category, *item))
                .unwrap();

            // Laisse parfois des fetchs intermédiaires aboutir
            if i % 2 == 1 {
                tokio::task::yield_now().await;
                controller.drain_completions();
            }
        }
        controller.wait_until_settled().await;

        let (category, item) = *sequence.last().unwrap();
        let last = Selection::new(category, item);
        let view = controller.snapshot();
        assert_eq!(view.selection, last);
        assert_eq!(loaded_price(&view.load_state), Some(price_for(&last)));
        assert_eq!(view.load_state.snapshot().unwrap().selection, last);
    }
}

#[tokio::test]
async fn test_server_error_then_refresh_recovers() {
    let body = r#"{"status": "success", "data": {
        "history": [{"date": "2024-09-01", "price": 100.0}, {"date": "2024-09-02", "price": 104.0}],
        "predictions": [{"date": "2024-09-03", "price": 106.0}]
    }}"#;
    let transport = ScriptedTransport {
        responses: Mutex::new(VecDeque::from(vec![
            HttpResponse::new(500, r#"{"error": "internal failure"}"#),
            HttpResponse::new(200, body),
        ])),
    };
    let client = MarketDataClient::new(transport, "http://svc.test/api/market-data");

    let mut controller =
        ViewController::new(Arc::new(Catalog::reference()), Arc::new(client), Handle::current()).unwrap();
    let mut updates = controller.subscribe();

    controller.wait_until_settled().await;
    let error = controller.load_state().error().cloned().unwrap();
    assert_eq!(error.kind, ErrorKind::Server { status: 500 });
    assert!(error.message.contains("HTTP 500"));
    assert!(error.message.contains("internal failure"));
    assert!(updates.has_changed().unwrap());
    updates.borrow_and_update();

    controller.on_refresh();
    assert!(controller.load_state().is_loading());
    controller.wait_until_settled().await;

    let view = updates.borrow_and_update().clone();
    assert_eq!(loaded_price(&view.load_state), Some(104.0));
    let market = view.load_state.snapshot().unwrap();
    assert_eq!(market.series.len(), 3);
    assert_eq!(market.statistics.unwrap().highest_price, 104.0);
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let transport = ScriptedTransport {
        responses: Mutex::new(VecDeque::from(vec![HttpResponse::new(200, "<html>oops</html>")])),
    };
    let client = MarketDataClient::new(transport, "http://svc.test/api/market-data");

    let mut controller =
        ViewController::new(Arc::new(Catalog::reference()), Arc::new(client), Handle::current()).unwrap();
    controller.wait_until_settled().await;

    let error = controller.load_state().error().unwrap();
    assert_eq!(error.kind, ErrorKind::MalformedResponse);
    assert!(error.message.starts_with("Error: "));
}
