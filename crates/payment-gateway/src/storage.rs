//! In-memory storage for finalized payments
//!
//! Single-process and non-durable. The pipeline is the sole writer; each
//! identifier is written at most once in practice (inserts are last-write-
//! wins regardless). Lock hold times are single map operations.

use crate::models::PaymentRecord;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Concurrency-safe keyed store of payment records
#[derive(Default, Clone)]
pub struct PaymentStore {
    payments: Arc<RwLock<HashMap<Uuid, PaymentRecord>>>,
}

impl PaymentStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, keyed by its identifier
    pub async fn put(&self, record: PaymentRecord) {
        let mut payments = self.payments.write().await;
        payments.insert(record.id, record);
    }

    /// Look up a record by identifier
    pub async fn get(&self, id: &Uuid) -> Option<PaymentRecord> {
        let payments = self.payments.read().await;
        payments.get(id).cloned()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        let payments = self.payments.read().await;
        payments.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
