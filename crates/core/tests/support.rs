//! Shared fixtures for core integration tests: a scripted in-memory port
//! and builders for wire records.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use adsync_core::{AdsResourcePort, ResourceData, ResourceKey, ResourceKind, ResourceRequest};
use adsync_domain::{
    AdSyncError, Customer, FullSyncResult, Result, SearchTerm, SyncAccountStructureRequest,
    SyncJob, SyncJobStatus, SyncResult, SyncSearchTermsRequest,
};
use async_trait::async_trait;
use parking_lot::Mutex;

/// One scripted answer: wait `delay`, then return `result`.
pub struct Reply {
    pub delay: Duration,
    pub result: Result<ResourceData>,
}

impl Reply {
    pub fn ok(data: ResourceData) -> Self {
        Self { delay: Duration::ZERO, result: Ok(data) }
    }

    pub fn err(error: AdSyncError) -> Self {
        Self { delay: Duration::ZERO, result: Err(error) }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Port that answers reads from per-kind queues and records every call.
///
/// An empty queue answers with empty data of the requested kind.
#[derive(Default)]
pub struct ScriptedPort {
    replies: Mutex<HashMap<ResourceKind, VecDeque<Reply>>>,
    reads: Mutex<Vec<ResourceKey>>,
    search_terms_syncs: Mutex<Vec<SyncSearchTermsRequest>>,
    structure_syncs: Mutex<Vec<SyncAccountStructureRequest>>,
    sync_delay: Mutex<Duration>,
    fail_syncs: Mutex<Option<AdSyncError>>,
}

impl ScriptedPort {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, kind: ResourceKind, reply: Reply) {
        self.replies.lock().entry(kind).or_default().push_back(reply);
    }

    pub fn reads(&self) -> Vec<ResourceKey> {
        self.reads.lock().clone()
    }

    pub fn reads_of(&self, kind: ResourceKind) -> usize {
        self.reads.lock().iter().filter(|key| key.kind() == kind).count()
    }

    pub fn search_terms_syncs(&self) -> Vec<SyncSearchTermsRequest> {
        self.search_terms_syncs.lock().clone()
    }

    pub fn structure_syncs(&self) -> Vec<SyncAccountStructureRequest> {
        self.structure_syncs.lock().clone()
    }

    pub fn delay_syncs(&self, delay: Duration) {
        *self.sync_delay.lock() = delay;
    }

    pub fn fail_syncs(&self, error: AdSyncError) {
        *self.fail_syncs.lock() = Some(error);
    }

    async fn sync_pause(&self) -> Result<()> {
        let delay = *self.sync_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.fail_syncs.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AdsResourcePort for ScriptedPort {
    async fn fetch(&self, request: &ResourceRequest) -> Result<ResourceData> {
        self.reads.lock().push(request.key());
        let reply = self.replies.lock().get_mut(&request.kind()).and_then(VecDeque::pop_front);

        let Some(reply) = reply else {
            return Ok(empty(request.kind()));
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }

    async fn sync_search_terms(&self, request: &SyncSearchTermsRequest) -> Result<SyncResult> {
        self.search_terms_syncs.lock().push(request.clone());
        self.sync_pause().await?;
        Ok(sync_result(&request.customer_id, &request.start_date, &request.end_date))
    }

    async fn sync_account_structure(
        &self,
        request: &SyncAccountStructureRequest,
    ) -> Result<FullSyncResult> {
        self.structure_syncs.lock().push(request.clone());
        self.sync_pause().await?;
        Ok(FullSyncResult { total_campaigns: 3, total_ad_groups: 7, total_keywords: 42 })
    }
}

pub fn empty(kind: ResourceKind) -> ResourceData {
    match kind {
        ResourceKind::Accounts => ResourceData::Accounts(Vec::new()),
        ResourceKind::Customers => ResourceData::Customers(Vec::new()),
        ResourceKind::Campaigns => ResourceData::Campaigns(Vec::new()),
        ResourceKind::AdGroups => ResourceData::AdGroups(Vec::new()),
        ResourceKind::Keywords => ResourceData::Keywords(Vec::new()),
        ResourceKind::SearchTerms => ResourceData::SearchTerms(Vec::new()),
        ResourceKind::StoredTerms => ResourceData::StoredTerms(Vec::new()),
        ResourceKind::SyncJobs => ResourceData::SyncJobs(Vec::new()),
    }
}

pub fn customer(customer_id: &str, name: &str) -> Customer {
    serde_json::from_value(serde_json::json!({
        "id": format!("row-{customer_id}"),
        "customerId": customer_id,
        "customerName": name,
        "loginCustomerId": customer_id,
        "isManagerAccount": false,
    }))
    .unwrap()
}

pub fn search_term(text: &str) -> SearchTerm {
    serde_json::from_value(serde_json::json!({
        "campaignId": "c1",
        "campaignName": "Brand",
        "adGroupId": "g1",
        "adGroupName": "Brand - Exact",
        "searchTerm": text,
        "keyword": "acme",
        "metrics": {"impressions": 100, "clicks": 7, "cost": 3.5, "conversions": 1.0},
    }))
    .unwrap()
}

pub fn sync_job(id: &str, status: SyncJobStatus) -> SyncJob {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "status": status.as_str(),
        "syncStartDate": "2024-01-01",
        "syncEndDate": "2024-01-31",
        "syncType": "search_terms",
        "createdAt": "2024-02-01T10:00:00Z",
    }))
    .unwrap()
}

pub fn sync_result(customer_id: &str, start_date: &str, end_date: &str) -> SyncResult {
    serde_json::from_value(serde_json::json!({
        "jobId": "j1",
        "customerId": customer_id,
        "customerName": "Acme",
        "status": "completed",
        "recordsFetched": 10,
        "recordsStored": 10,
        "startDate": start_date,
        "endDate": end_date,
    }))
    .unwrap()
}

pub fn jobs(statuses: &[SyncJobStatus]) -> ResourceData {
    ResourceData::SyncJobs(
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| sync_job(&format!("job-{i}"), *status))
            .collect(),
    )
}
