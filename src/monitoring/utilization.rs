//! CPU utilization aggregation
//!
//! Queries the Monitoring API for an instance's CPU time series, buckets
//! the raw samples into daily points, and classifies a utilization tier.
//! This component never fails: transport and parse errors degrade into a
//! zeroed summary carrying the error message.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration as TimeDelta, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::yc::client::YcClient;
use crate::yc::clouds;
use crate::yc::http::MONITORING_TIMEOUT;

/// Metric queried for the utilization signal.
const CPU_METRIC: &str = "cpu_utilization";

/// Average CPU below this is a low-utilization instance.
const LOW_TIER_CEILING: f64 = 20.0;

/// Average CPU below this (and at or above the low ceiling) is medium.
const MEDIUM_TIER_CEILING: f64 = 60.0;

/// Coarse utilization classification derived from average CPU percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
    Unknown,
}

/// Mean CPU over one UTC calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub mean: f64,
    pub samples: usize,
}

/// Statistics over one instance's CPU series. Computed fresh per call,
/// never cached.
#[derive(Debug, Clone, Serialize)]
pub struct UtilizationSummary {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    /// Spread of the window: `max - min`.
    pub trend: f64,
    pub tier: Tier,
    pub sample_count: usize,
    pub daily: Vec<DailyAggregate>,
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UtilizationSummary {
    fn empty() -> Self {
        Self {
            avg: 0.0,
            max: 0.0,
            min: 0.0,
            trend: 0.0,
            tier: Tier::Unknown,
            sample_count: 0,
            daily: Vec::new(),
            no_data: true,
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::empty()
        }
    }
}

/// Fetch and summarize an instance's CPU utilization over the last
/// `window_days` days.
///
/// The folder scope is the explicit argument, else the credentials
/// default, else the identity's home folder. Absence of data is a
/// terminal, reportable outcome, not an error: this function always
/// returns a summary.
pub async fn get_utilization(
    client: &YcClient,
    instance_id: &str,
    folder_id: Option<&str>,
    window_days: u32,
) -> UtilizationSummary {
    match fetch_and_summarize(client, instance_id, folder_id, window_days).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("utilization query for {} failed: {}", instance_id, e);
            UtilizationSummary::failed(e.to_string())
        }
    }
}

async fn fetch_and_summarize(
    client: &YcClient,
    instance_id: &str,
    folder_id: Option<&str>,
    window_days: u32,
) -> Result<UtilizationSummary> {
    let folder_id = match folder_id {
        Some(id) => id.to_string(),
        None => match client.credentials.folder_id.clone() {
            Some(id) => id,
            None => clouds::home_folder_id(client)
                .await?
                .ok_or(Error::NoFolder)?,
        },
    };

    let now = Utc::now();
    let from = now - TimeDelta::days(i64::from(window_days));

    let body = json!({
        "query": format!("\"{}\"{{resource_id=\"{}\"}}", CPU_METRIC, instance_id),
        "fromTime": from.to_rfc3339_opts(SecondsFormat::Secs, true),
        "toTime": now.to_rfc3339_opts(SecondsFormat::Secs, true),
        // Hourly granularity ceiling; the server aggregates beyond that.
        "downsampling": { "maxPoints": window_days * 24 }
    });

    let url = client.monitoring_url("data/read");
    let response = client
        .post(&url, &[("folderId", folder_id.as_str())], &body, MONITORING_TIMEOUT)
        .await?;

    Ok(summarize(&extract_samples(&response)))
}

/// Pull `(timestamp ms, value)` pairs out of a `data/read` response,
/// dropping null and non-finite values.
fn extract_samples(response: &Value) -> Vec<(i64, f64)> {
    let Some(metrics) = response.get("metrics").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    let mut samples = Vec::new();
    for metric in metrics {
        // Points live under `timeseries`, or directly on the metric in
        // older response shapes.
        let series = metric.get("timeseries").unwrap_or(metric);

        let timestamps = series
            .get("timestamps")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let values = series
            .get("doubleValues")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();

        for (ts, value) in timestamps.iter().zip(values.iter()) {
            let (Some(ts), Some(value)) = (ts.as_i64(), value.as_f64()) else {
                continue;
            };
            if value.is_finite() {
                samples.push((ts, value));
            }
        }
    }

    samples
}

/// Aggregate raw `(timestamp ms, value)` samples into a summary: overall
/// statistics, per-UTC-day means, and the utilization tier.
pub fn summarize(samples: &[(i64, f64)]) -> UtilizationSummary {
    if samples.is_empty() {
        return UtilizationSummary::empty();
    }

    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    let mut sum = 0.0;
    let mut max = f64::MIN;
    let mut min = f64::MAX;
    let mut counted = 0usize;

    for &(ts, value) in samples {
        // Samples with timestamps outside the representable range are
        // dropped rather than panicking on a provider quirk.
        let Some(instant) = DateTime::<Utc>::from_timestamp_millis(ts) else {
            continue;
        };

        let day = by_day.entry(instant.date_naive()).or_insert((0.0, 0));
        day.0 += value;
        day.1 += 1;

        sum += value;
        max = max.max(value);
        min = min.min(value);
        counted += 1;
    }

    if counted == 0 {
        return UtilizationSummary::empty();
    }

    let daily = by_day
        .into_iter()
        .map(|(date, (day_sum, day_count))| DailyAggregate {
            date,
            mean: round2(day_sum / day_count as f64),
            samples: day_count,
        })
        .collect();

    let avg = round2(sum / counted as f64);
    let max = round2(max);
    let min = round2(min);

    UtilizationSummary {
        avg,
        max,
        min,
        trend: round2(max - min),
        tier: classify(avg),
        sample_count: counted,
        daily,
        no_data: false,
        error: None,
    }
}

fn classify(avg: f64) -> Tier {
    if avg < LOW_TIER_CEILING {
        Tier::Low
    } else if avg < MEDIUM_TIER_CEILING {
        Tier::Medium
    } else {
        Tier::High
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 24 * 3600 * 1000;

    #[test]
    fn empty_samples_yield_zeroed_no_data_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.avg, 0.0);
        assert_eq!(summary.max, 0.0);
        assert_eq!(summary.min, 0.0);
        assert!(summary.no_data);
        assert_eq!(summary.tier, Tier::Unknown);
        assert!(summary.daily.is_empty());
    }

    #[test]
    fn samples_spanning_two_days_bucket_into_two_aggregates() {
        // One sample just before UTC midnight, two just after.
        let midnight = 1_700_006_400_000; // 2023-11-15T00:00:00Z
        let samples = [
            (midnight - 1_000, 10.0),
            (midnight + 1_000, 20.0),
            (midnight + 2_000, 40.0),
        ];

        let summary = summarize(&samples);
        assert_eq!(summary.daily.len(), 2);
        assert_eq!(summary.daily[0].samples + summary.daily[1].samples, 3);
        // Days come out ascending.
        assert!(summary.daily[0].date < summary.daily[1].date);
        assert_eq!(summary.daily[0].mean, 10.0);
        assert_eq!(summary.daily[1].mean, 30.0);
    }

    #[test]
    fn statistics_are_rounded_to_two_decimals() {
        let samples = [(0, 10.0), (1_000, 10.34), (2_000, 11.0)];
        let summary = summarize(&samples);
        assert_eq!(summary.avg, 10.45);
        assert_eq!(summary.max, 11.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.trend, 1.0);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(summarize(&[(0, 19.99)]).tier, Tier::Low);
        assert_eq!(summarize(&[(0, 20.00)]).tier, Tier::Medium);
        assert_eq!(summarize(&[(0, 59.99)]).tier, Tier::Medium);
        assert_eq!(summarize(&[(0, 60.00)]).tier, Tier::High);
    }

    #[test]
    fn daily_means_cover_distinct_days() {
        let samples = [
            (0, 50.0),
            (DAY_MS, 70.0),
            (2 * DAY_MS, 90.0),
        ];
        let summary = summarize(&samples);
        assert_eq!(summary.daily.len(), 3);
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.avg, 70.0);
        assert_eq!(summary.tier, Tier::High);
    }

    #[test]
    fn extract_skips_null_and_non_finite_values() {
        let response = serde_json::json!({
            "metrics": [{
                "timeseries": {
                    "timestamps": [1000, 2000, 3000, 4000],
                    "doubleValues": [1.5, null, f64::NAN, 2.5]
                }
            }]
        });
        // serde_json encodes NAN as null, so both middle points drop out.
        let samples = extract_samples(&response);
        assert_eq!(samples, vec![(1000, 1.5), (4000, 2.5)]);
    }

    #[test]
    fn extract_handles_flattened_series_shape() {
        let response = serde_json::json!({
            "metrics": [{
                "timestamps": [1000],
                "doubleValues": [3.0]
            }]
        });
        assert_eq!(extract_samples(&response), vec![(1000, 3.0)]);
    }

    #[test]
    fn extract_handles_missing_metrics() {
        assert!(extract_samples(&serde_json::json!({})).is_empty());
        assert!(extract_samples(&serde_json::json!({ "metrics": [] })).is_empty());
    }
}
