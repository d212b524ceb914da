//! EC2 cost anomaly detection via Cost Explorer
//!
//! The detector itself is a pure function over an in-memory daily cost
//! series: the last element is "today", everything before it is the
//! baseline. Fetching the series and routing the rendered report are the
//! caller's concern.

use crate::config::Config;
use crate::error::{InfractlError, Result};
use aws_sdk_costexplorer::types::{
    DateInterval, Dimension, DimensionValues, Expression, Granularity,
};
use aws_sdk_costexplorer::Client as CeClient;
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::debug;

/// Cost Explorer SERVICE dimension value for EC2 compute.
const EC2_SERVICE: &str = "Amazon Elastic Compute Cloud - Compute";

/// Result of one anomaly check. Computed once per invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    /// Mean of all daily amounts except the last
    pub baseline: f64,
    /// The last (most recent) daily amount
    pub today: f64,
    /// Change of today vs. baseline, in percent (0 when baseline is 0)
    pub percent_change: f64,
    /// True iff percent_change strictly exceeds the threshold
    pub alert: bool,
}

/// Check today's cost against the average of the preceding days.
///
/// Errors with `InsufficientData` when fewer than two points are supplied.
/// A zero baseline is a defined edge case: the percent change is 0 and no
/// alert fires, even if today's spend is nonzero.
pub fn detect(series: &[f64], threshold_percent: f64) -> Result<AnomalyReport> {
    if series.len() < 2 {
        return Err(InfractlError::InsufficientData {
            points: series.len(),
        });
    }

    let history = &series[..series.len() - 1];
    let baseline = history.iter().sum::<f64>() / history.len() as f64;
    let today = series[series.len() - 1];

    let percent_change = if baseline == 0.0 {
        0.0
    } else {
        (today - baseline) / baseline * 100.0
    };

    Ok(AnomalyReport {
        baseline,
        today,
        percent_change,
        alert: percent_change > threshold_percent,
    })
}

/// Fetch the daily EC2 UnblendedCost series for the trailing window.
///
/// The window is [today - days, today) in UTC; Cost Explorer treats the end
/// date as exclusive, so the last element of the series is the most recent
/// day it has data for.
pub async fn fetch_daily_ec2_costs(client: &CeClient, days: i64) -> Result<Vec<f64>> {
    let end = Utc::now().date_naive();
    let start = end - Duration::days(days);

    let period = DateInterval::builder()
        .start(start.format("%Y-%m-%d").to_string())
        .end(end.format("%Y-%m-%d").to_string())
        .build()
        .map_err(|e| InfractlError::CostExplorer(format!("Invalid date interval: {}", e)))?;

    let response = client
        .get_cost_and_usage()
        .time_period(period)
        .granularity(Granularity::Daily)
        .metrics("UnblendedCost")
        .filter(
            Expression::builder()
                .dimensions(
                    DimensionValues::builder()
                        .key(Dimension::Service)
                        .values(EC2_SERVICE)
                        .build(),
                )
                .build(),
        )
        .send()
        .await
        .map_err(|e| InfractlError::CostExplorer(format!("Failed to fetch cost data: {}", e)))?;

    let mut daily_costs = Vec::new();
    for result in response.results_by_time() {
        let amount = result
            .total()
            .and_then(|t| t.get("UnblendedCost"))
            .and_then(|m| m.amount())
            .and_then(|a| a.parse::<f64>().ok())
            .unwrap_or(0.0);
        daily_costs.push(amount);
    }

    debug!("Fetched {} daily cost points", daily_costs.len());
    Ok(daily_costs)
}

/// Render the anomaly report as the text block used by `cost-check` and
/// embedded in the daily email.
pub fn render_anomaly_report(report: &AnomalyReport, days: i64) -> String {
    let mut out = String::new();
    out.push_str("EC2 Cost Anomaly Check\n");
    out.push_str(&"-".repeat(40));
    out.push('\n');
    out.push_str(&format!(
        "Average daily EC2 cost (past {} days): ${:.2}\n",
        days - 1,
        report.baseline
    ));
    out.push_str(&format!("Today's EC2 cost: ${:.2}\n", report.today));
    out.push_str(&format!("Change: {:.1}%\n", report.percent_change));
    if report.alert {
        out.push_str("ALERT: Today's EC2 cost spike exceeds threshold!\n");
    } else {
        out.push_str("No significant anomalies detected.\n");
    }
    out.push_str(&"-".repeat(40));
    out.push('\n');
    out
}

/// `cost-check` command: fetch the series, run the detector, print the report.
///
/// An insufficient series is reported, not treated as a failure; a fresh
/// account legitimately has under two days of cost data.
pub async fn run_cost_check(days: i64, threshold_percent: f64, config: &Config) -> Result<()> {
    let sdk_config = crate::aws_utils::load_us_east_1_config(config).await;
    let client = CeClient::new(&sdk_config);

    let series = fetch_daily_ec2_costs(&client, days).await?;

    match detect(&series, threshold_percent) {
        Ok(report) => {
            println!("{}", render_anomaly_report(&report, days));
            Ok(())
        }
        Err(InfractlError::InsufficientData { .. }) => {
            println!("Not enough data to detect anomalies.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_spike_alerts() {
        let series = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 200.0];
        let report = detect(&series, 50.0).unwrap();
        assert_eq!(report.baseline, 100.0);
        assert_eq!(report.today, 200.0);
        assert_eq!(report.percent_change, 100.0);
        assert!(report.alert);
    }

    #[test]
    fn test_detect_normal_variation() {
        let series = [100.0, 110.0, 90.0, 105.0, 95.0, 100.0, 108.0];
        let report = detect(&series, 50.0).unwrap();
        assert!((report.baseline - 100.0).abs() < 1e-9);
        assert_eq!(report.today, 108.0);
        assert!((report.percent_change - 8.0).abs() < 1e-9);
        assert!(!report.alert);
    }

    #[test]
    fn test_detect_zero_baseline_is_not_an_alert() {
        let series = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 50.0];
        let report = detect(&series, 50.0).unwrap();
        assert_eq!(report.baseline, 0.0);
        assert_eq!(report.percent_change, 0.0);
        assert!(!report.alert);
    }

    #[test]
    fn test_detect_single_point_is_insufficient() {
        let err = detect(&[42.0], 50.0).unwrap_err();
        assert!(matches!(err, InfractlError::InsufficientData { points: 1 }));
    }

    #[test]
    fn test_detect_empty_is_insufficient() {
        let err = detect(&[], 50.0).unwrap_err();
        assert!(matches!(err, InfractlError::InsufficientData { points: 0 }));
    }

    #[test]
    fn test_detect_two_points_is_enough() {
        let report = detect(&[10.0, 20.0], 50.0).unwrap();
        assert_eq!(report.baseline, 10.0);
        assert_eq!(report.percent_change, 100.0);
        assert!(report.alert);
    }

    #[test]
    fn test_alert_threshold_is_strict() {
        // Exactly at threshold does not alert
        let report = detect(&[100.0, 150.0], 50.0).unwrap();
        assert_eq!(report.percent_change, 50.0);
        assert!(!report.alert);

        let report = detect(&[100.0, 150.01], 50.0).unwrap();
        assert!(report.alert);
    }

    #[test]
    fn test_negative_threshold() {
        // -5% change is above a -10% threshold, below a -2% threshold
        let report = detect(&[100.0, 100.0, 95.0], -10.0).unwrap();
        assert!((report.percent_change - -5.0).abs() < 1e-9);
        assert!(report.alert);

        let report = detect(&[100.0, 100.0, 95.0], -2.0).unwrap();
        assert!(!report.alert);
    }

    #[test]
    fn test_render_anomaly_report() {
        let report = AnomalyReport {
            baseline: 100.0,
            today: 200.0,
            percent_change: 100.0,
            alert: true,
        };
        let text = render_anomaly_report(&report, 7);
        assert!(text.contains("Average daily EC2 cost (past 6 days): $100.00"));
        assert!(text.contains("Today's EC2 cost: $200.00"));
        assert!(text.contains("Change: 100.0%"));
        assert!(text.contains("ALERT"));
    }

    #[test]
    fn test_render_no_anomaly() {
        let report = AnomalyReport {
            baseline: 100.0,
            today: 108.0,
            percent_change: 8.0,
            alert: false,
        };
        let text = render_anomaly_report(&report, 7);
        assert!(text.contains("No significant anomalies detected."));
        assert!(!text.contains("ALERT"));
    }
}
