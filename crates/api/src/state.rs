use std::sync::Arc;

use crate::config::ServerConfig;
use crate::payments::PaymentGateway;
use crate::storage::BlobStore;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The gateway and blob store are trait objects so integration
/// tests can substitute in-process fakes.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: atelier_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Payment gateway for hosted checkout sessions.
    pub gateway: Arc<dyn PaymentGateway>,
    /// Blob storage for uploaded documents.
    pub blob_store: Arc<dyn BlobStore>,
}
