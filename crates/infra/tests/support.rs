//! Shared helpers for infra integration tests: stub auth providers, a
//! wiremock-backed client and wire fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use adsync_domain::{AdSyncError, Result};
use adsync_infra::{ApiClient, AuthProvider, GoogleAdsCommands, Session, SessionStore};
use async_trait::async_trait;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Auth provider with no session that counts how often it was asked.
#[derive(Default)]
pub struct CountingSignedOut {
    calls: AtomicUsize,
}

impl CountingSignedOut {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for CountingSignedOut {
    async fn get_session(&self) -> Result<Session> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Session::default())
    }
}

/// Auth provider whose backend is unreachable.
pub struct BrokenAuth;

#[async_trait]
impl AuthProvider for BrokenAuth {
    async fn get_session(&self) -> Result<Session> {
        Err(AdSyncError::Network("auth backend unreachable".into()))
    }
}

pub fn commands_with(server: &MockServer, auth: Arc<dyn AuthProvider>) -> GoogleAdsCommands {
    let client = ApiClient::builder().base_url(server.uri()).auth(auth).build().unwrap();
    GoogleAdsCommands::new(Arc::new(client))
}

pub fn signed_in(server: &MockServer) -> GoogleAdsCommands {
    commands_with(server, Arc::new(SessionStore::with_token(TOKEN)))
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}

pub fn sync_result_json() -> Value {
    json!({
        "jobId": "j1",
        "customerId": "123",
        "customerName": "Acme",
        "status": "completed",
        "recordsFetched": 10,
        "recordsStored": 10,
        "startDate": "2024-01-01",
        "endDate": "2024-01-31",
    })
}

pub fn sync_job_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "syncStartDate": "2024-01-01",
        "syncEndDate": "2024-01-31",
        "syncType": "search_terms",
        "createdAt": "2024-02-01T10:00:00Z",
    })
}

pub fn search_term_json(text: &str) -> Value {
    json!({
        "campaignId": "c1",
        "campaignName": "Brand",
        "adGroupId": "g1",
        "adGroupName": "Brand - Exact",
        "searchTerm": text,
        "keyword": "acme",
        "metrics": {"impressions": 100, "clicks": 7, "cost": 3.5, "conversions": 1.0},
    })
}

pub fn customer_json(customer_id: &str, name: &str) -> Value {
    json!({
        "id": format!("row-{customer_id}"),
        "customerId": customer_id,
        "customerName": name,
        "loginCustomerId": customer_id,
        "isManagerAccount": false,
    })
}
