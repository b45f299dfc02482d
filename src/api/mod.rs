// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client du service de données de marché et le
// transport HTTP injectable sur lequel il s'appuie
// ============================================================================

pub mod transport;   // Trait HttpTransport + implémentation reqwest
pub mod market_data; // Client du service (historique + prédictions)

// Re-export des types principaux
pub use market_data::{parse_market_payload, MarketDataClient, MarketDataSource};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
