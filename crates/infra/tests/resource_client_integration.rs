//! Resource client against a wiremock upstream: auth guard, validation,
//! parameter forwarding and error mapping.

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use adsync_domain::{
    AdGroupsQuery, AdSyncError, CampaignsQuery, KeywordsQuery, SearchTermsQuery, StoredTermsQuery,
    SyncAccountStructureRequest, SyncJobStatus, SyncJobsQuery, SyncResultStatus,
    SyncSearchTermsRequest,
};
use serde_json::json;
use support::{
    bearer, commands_with, customer_json, search_term_json, signed_in, sync_job_json,
    sync_result_json, BrokenAuth, CountingSignedOut,
};
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn campaigns_query() -> CampaignsQuery {
    CampaignsQuery {
        customer_id: Some("123".into()),
        login_customer_id: Some("999".into()),
        ..Default::default()
    }
}

fn search_terms_query() -> SearchTermsQuery {
    SearchTermsQuery {
        customer_id: Some("123".into()),
        login_customer_id: Some("999".into()),
        start_date: Some("2024-01-01".into()),
        end_date: Some("2024-01-31".into()),
    }
}

fn keywords_query() -> KeywordsQuery {
    KeywordsQuery {
        customer_id: Some("123".into()),
        login_customer_id: Some("999".into()),
        ad_group_id: Some("g1".into()),
        campaign_id: None,
    }
}

#[tokio::test]
async fn every_operation_fails_unauthenticated_without_network() {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let auth = Arc::new(CountingSignedOut::default());
    let commands = commands_with(&server, auth.clone());

    let results = vec![
        commands.accounts().await.map(drop),
        commands.customers().await.map(drop),
        commands.campaigns(&campaigns_query()).await.map(drop),
        commands
            .ad_groups(&AdGroupsQuery {
                customer_id: Some("123".into()),
                login_customer_id: Some("999".into()),
                campaign_id: None,
            })
            .await
            .map(drop),
        commands.keywords(&keywords_query()).await.map(drop),
        commands.search_terms(&search_terms_query()).await.map(drop),
        commands
            .stored_search_terms(&StoredTermsQuery {
                customer_id: Some("123".into()),
                ..Default::default()
            })
            .await
            .map(drop),
        commands.sync_jobs(&SyncJobsQuery { customer_id: Some("123".into()) }).await.map(drop),
        commands
            .sync_search_terms(&SyncSearchTermsRequest::new("123", "2024-01-01", "2024-01-31"))
            .await
            .map(drop),
        commands
            .sync_account_structure(&SyncAccountStructureRequest::new("123", "999"))
            .await
            .map(drop),
    ];

    assert_eq!(results.len(), 10);
    for result in results {
        assert_eq!(result.unwrap_err(), AdSyncError::Unauthenticated);
    }
    assert_eq!(auth.calls(), 10);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn auth_provider_failure_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let commands = commands_with(&server, Arc::new(BrokenAuth));

    assert_eq!(commands.customers().await.unwrap_err(), AdSyncError::Unauthenticated);
}

#[tokio::test]
async fn missing_parameters_fail_before_the_token_is_read() {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let auth = Arc::new(CountingSignedOut::default());
    let commands = commands_with(&server, auth.clone());

    let err = commands
        .campaigns(&CampaignsQuery { customer_id: Some("123".into()), ..Default::default() })
        .await
        .unwrap_err();
    assert_eq!(err, AdSyncError::missing_param("loginCustomerId"));

    let err = commands
        .keywords(&KeywordsQuery { ad_group_id: None, ..keywords_query() })
        .await
        .unwrap_err();
    assert_eq!(err, AdSyncError::missing_param("adGroupId"));

    let err = commands
        .search_terms(&SearchTermsQuery { end_date: Some("  ".into()), ..search_terms_query() })
        .await
        .unwrap_err();
    assert_eq!(err, AdSyncError::missing_param("endDate"));

    let err = commands.sync_jobs(&SyncJobsQuery::default()).await.unwrap_err();
    assert_eq!(err, AdSyncError::missing_param("customerId"));

    let err = commands
        .sync_search_terms(&SyncSearchTermsRequest::new("123", "2024-02-01", "2024-01-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, AdSyncError::Validation(_)));

    assert_eq!(auth.calls(), 0);
}

#[tokio::test]
async fn campaigns_forward_optional_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/google-ads/campaigns"))
        .and(header("Authorization", bearer().as_str()))
        .and(query_param("customerId", "123"))
        .and(query_param("loginCustomerId", "999"))
        .and(query_param("startDate", "2024-01-01"))
        .and(query_param("endDate", "2024-01-31"))
        .and(query_param("includeAdGroups", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "campaignId": "c1",
            "campaignName": "Brand",
            "status": "ENABLED",
            "adGroups": [{
                "adGroupId": "g1",
                "adGroupName": "Brand - Exact",
                "campaignId": "c1",
                "campaignName": "Brand",
                "status": "ENABLED",
                "type": "SEARCH_STANDARD",
            }],
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let commands = signed_in(&server);
    let campaigns = commands
        .campaigns(&CampaignsQuery {
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            include_ad_groups: Some(true),
            ..campaigns_query()
        })
        .await
        .unwrap();

    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].ad_group_count(), 1);
}

#[tokio::test]
async fn unset_optional_parameters_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/google-ads/keywords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let commands = signed_in(&server);
    commands.keywords(&keywords_query()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert_eq!(query, "customerId=123&loginCustomerId=999&adGroupId=g1");
}

#[tokio::test]
async fn query_values_are_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/google-ads/sync-jobs"))
        .and(query_param("customerId", "12 3&x=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let commands = signed_in(&server);
    let jobs =
        commands.sync_jobs(&SyncJobsQuery { customer_id: Some("12 3&x=1".into()) }).await.unwrap();
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn stored_terms_and_sync_jobs_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/google-ads/search-terms/stored"))
        .and(query_param("customerId", "123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([search_term_json("acme boots")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/google-ads/sync-jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sync_job_json("a", "running"),
            sync_job_json("b", "completed"),
        ])))
        .mount(&server)
        .await;

    let commands = signed_in(&server);

    let terms = commands
        .stored_search_terms(&StoredTermsQuery {
            customer_id: Some("123".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(terms[0].search_term, "acme boots");

    let jobs = commands.sync_jobs(&SyncJobsQuery { customer_id: Some("123".into()) }).await.unwrap();
    assert_eq!(jobs[0].status, SyncJobStatus::Running);
    assert!(jobs[0].is_active());
    assert!(!jobs[1].is_active());
}

#[tokio::test]
async fn sync_search_terms_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/google-ads/sync-search-terms"))
        .and(header("Authorization", bearer().as_str()))
        .and(body_json(json!({
            "customerId": "123",
            "startDate": "2024-01-01",
            "endDate": "2024-01-31",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sync_result_json()))
        .expect(1)
        .mount(&server)
        .await;

    let commands = signed_in(&server);
    let result = commands
        .sync_search_terms(&SyncSearchTermsRequest::new("123", "2024-01-01", "2024-01-31"))
        .await
        .unwrap();

    assert_eq!(result.job_id, "j1");
    assert_eq!(result.customer_name, "Acme");
    assert_eq!(result.status, SyncResultStatus::Completed);
    assert_eq!(result.records_stored, 10);
}

#[tokio::test]
async fn sync_account_structure_sends_dates_only_when_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/google-ads/sync-account-structure"))
        .and(body_json(json!({"customerId": "123", "loginCustomerId": "999"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCampaigns": 3,
            "totalAdGroups": 7,
            "totalKeywords": 42,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/google-ads/sync-account-structure"))
        .and(body_json(json!({
            "customerId": "123",
            "loginCustomerId": "999",
            "startDate": "2024-01-01",
            "endDate": "2024-01-31",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCampaigns": 1,
            "totalAdGroups": 1,
            "totalKeywords": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let commands = signed_in(&server);

    let plain =
        commands.sync_account_structure(&SyncAccountStructureRequest::new("123", "999")).await;
    assert_eq!(plain.unwrap().total_keywords, 42);

    let dated = commands
        .sync_account_structure(
            &SyncAccountStructureRequest::new("123", "999").with_dates("2024-01-01", "2024-01-31"),
        )
        .await;
    assert_eq!(dated.unwrap().total_campaigns, 1);
}

#[tokio::test]
async fn error_status_surfaces_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/google-ads/customers"))
        .respond_with(ResponseTemplate::new(502).set_body_string(r#"{"error":"google said no"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let commands = signed_in(&server);
    let err = commands.customers().await.unwrap_err();

    assert_eq!(err, AdSyncError::upstream(502, r#"{"error":"google said no"}"#));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unexpected_shape_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/google-ads/customers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"items": [customer_json("1", "A")]})),
        )
        .mount(&server)
        .await;

    let commands = signed_in(&server);
    assert!(matches!(commands.customers().await, Err(AdSyncError::MalformedResponse(_))));
}
