//! Integration tests for CPU utilization summaries using wiremock
//!
//! These tests verify the monitoring query shape and the degrade-to-summary
//! failure policy: this surface never raises, it reports.

mod common;

use chrono::{DateTime, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ycinv::monitoring::{self, Tier};

async fn mount_data_read(server: &MockServer, folder_id: &str, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/monitoring/v2/data/read"))
        .and(query_param("folderId", folder_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// An empty metrics response is a reportable outcome, not an error.
#[tokio::test]
async fn empty_metrics_yield_zeroed_no_data_summary() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    mount_data_read(&server, "f1", json!({ "metrics": [] })).await;

    let client = common::oauth_client(&server);
    let summary = monitoring::get_utilization(&client, "i-123", Some("f1"), 30).await;

    assert_eq!(summary.avg, 0.0);
    assert_eq!(summary.max, 0.0);
    assert_eq!(summary.min, 0.0);
    assert!(summary.no_data);
    assert!(summary.error.is_none());
    assert_eq!(summary.tier, Tier::Unknown);
}

/// The query filters on the instance id and requests hourly-ceiling
/// downsampling over the window.
#[tokio::test]
async fn query_requests_downsampled_cpu_series() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/monitoring/v2/data/read"))
        .and(query_param("folderId", "f1"))
        .and(body_partial_json(json!({
            "query": "\"cpu_utilization\"{resource_id=\"i-123\"}",
            "downsampling": { "maxPoints": 720 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "metrics": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::oauth_client(&server);
    let summary = monitoring::get_utilization(&client, "i-123", Some("f1"), 30).await;
    assert!(summary.no_data);
}

/// Samples spanning two UTC days bucket into two daily aggregates whose
/// counts sum to the full series.
#[tokio::test]
async fn samples_bucket_by_utc_day() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    let midnight = DateTime::parse_from_rfc3339("2026-08-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
        .timestamp_millis();
    mount_data_read(
        &server,
        "f1",
        json!({
            "metrics": [{
                "timeseries": {
                    "timestamps": [midnight - 3_600_000, midnight + 3_600_000, midnight + 7_200_000],
                    "doubleValues": [30.0, 60.0, 90.0]
                }
            }]
        }),
    )
    .await;

    let client = common::oauth_client(&server);
    let summary = monitoring::get_utilization(&client, "i-123", Some("f1"), 30).await;

    assert!(!summary.no_data);
    assert_eq!(summary.sample_count, 3);
    assert_eq!(summary.daily.len(), 2);
    assert_eq!(summary.daily[0].samples + summary.daily[1].samples, 3);
    assert_eq!(summary.avg, 60.0);
    assert_eq!(summary.max, 90.0);
    assert_eq!(summary.min, 30.0);
    assert_eq!(summary.trend, 60.0);
    assert_eq!(summary.tier, Tier::High);
}

/// A failing monitoring endpoint degrades into an error-carrying summary.
#[tokio::test]
async fn transport_failure_degrades_to_error_summary() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    Mock::given(method("POST"))
        .and(path("/monitoring/v2/data/read"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "internal" })))
        .mount(&server)
        .await;

    let client = common::oauth_client(&server);
    let summary = monitoring::get_utilization(&client, "i-123", Some("f1"), 30).await;

    assert!(summary.no_data);
    assert_eq!(summary.avg, 0.0);
    let error = summary.error.expect("summary carries the failure");
    assert!(error.contains("500"));
}

/// With no resolvable folder at all, the summary reports the resolution
/// failure instead of raising.
#[tokio::test]
async fn unresolvable_folder_reports_in_summary() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    // OAuth identity: no folder default and no service account to look up.
    let client = common::oauth_client(&server);
    let summary = monitoring::get_utilization(&client, "i-123", None, 30).await;

    assert!(summary.no_data);
    assert!(summary
        .error
        .expect("summary carries the failure")
        .contains("no folder"));
}

/// The credentials' default folder scopes the query when none is passed.
#[tokio::test]
async fn credentials_folder_default_scopes_query() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    mount_data_read(
        &server,
        "f-default",
        json!({
            "metrics": [{
                "timeseries": {
                    "timestamps": [1_000_000],
                    "doubleValues": [15.0]
                }
            }]
        }),
    )
    .await;

    let credentials =
        ycinv::yc::auth::Credentials::from_oauth_token("test-oauth-token").with_folder_id("f-default");
    let client = common::client_with(&server, credentials);

    let summary = monitoring::get_utilization(&client, "i-123", None, 30).await;
    assert_eq!(summary.sample_count, 1);
    assert_eq!(summary.avg, 15.0);
    assert_eq!(summary.tier, Tier::Low);
}
