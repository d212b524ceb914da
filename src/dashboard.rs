//! CloudWatch metric retrieval and instance health dashboards
//!
//! Two consumers: the `dashboard` command (24 h health view for one
//! instance) and the daily report (last-hour CPU and per-volume EBS I/O).
//! All rendering returns strings so the report can embed any section
//! without touching stdout.

use crate::config::Config;
use crate::error::{InfractlError, Result};
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, Statistic};
use aws_sdk_cloudwatch::Client as CwClient;
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client as Ec2Client;
use chrono::{Duration, Utc};
use tracing::debug;

/// Health metrics shown by the `dashboard` command (24 h window)
#[derive(Debug, Clone, Default)]
pub struct HealthMetrics {
    pub cpu_percent: Option<f64>,
    pub network_in_bytes: Option<f64>,
    pub network_out_bytes: Option<f64>,
    pub disk_read_bytes: Option<f64>,
    pub disk_write_bytes: Option<f64>,
}

/// Last-hour metrics embedded in the daily report
#[derive(Debug, Clone, Default)]
pub struct InstanceMetrics {
    pub cpu_percent: Option<f64>,
    pub volumes: Vec<VolumeIo>,
}

#[derive(Debug, Clone)]
pub struct VolumeIo {
    pub volume_id: String,
    pub read_bytes: Option<f64>,
    pub write_bytes: Option<f64>,
}

/// Fetch one metric's most recent Average datapoint over the trailing window.
///
/// Returns None when CloudWatch has no datapoints (fresh or stopped
/// instances); callers render that as "N/A".
pub async fn latest_metric_average(
    client: &CwClient,
    namespace: &str,
    metric_name: &str,
    dimension_name: &str,
    dimension_value: &str,
    window_hours: i64,
    period_secs: i32,
) -> Result<Option<f64>> {
    let end = Utc::now();
    let start = end - Duration::hours(window_hours);

    let response = client
        .get_metric_statistics()
        .namespace(namespace)
        .metric_name(metric_name)
        .dimensions(
            Dimension::builder()
                .name(dimension_name)
                .value(dimension_value)
                .build(),
        )
        .start_time(DateTime::from_secs(start.timestamp()))
        .end_time(DateTime::from_secs(end.timestamp()))
        .period(period_secs)
        .statistics(Statistic::Average)
        .send()
        .await
        .map_err(|e| {
            InfractlError::CloudWatch(format!("Failed to fetch {}: {}", metric_name, e))
        })?;

    let datapoints = response.datapoints();
    if datapoints.is_empty() {
        debug!("No datapoints for {} on {}", metric_name, dimension_value);
    }
    Ok(latest_average(datapoints))
}

/// Average of the datapoint with the newest timestamp.
/// CloudWatch returns datapoints unordered.
fn latest_average(datapoints: &[Datapoint]) -> Option<f64> {
    datapoints
        .iter()
        .max_by_key(|d| d.timestamp().map(|t| t.secs()))
        .and_then(|d| d.average())
}

/// `dashboard` command: 24 h health view, hourly granularity
pub async fn show_instance_dashboard(instance_id: &str, config: &Config) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = CwClient::new(&sdk_config);

    let metrics = collect_health_metrics(&client, instance_id).await?;
    println!("{}", render_dashboard(instance_id, &metrics));
    Ok(())
}

pub async fn collect_health_metrics(
    client: &CwClient,
    instance_id: &str,
) -> Result<HealthMetrics> {
    let fetch = |metric: &'static str| {
        latest_metric_average(client, "AWS/EC2", metric, "InstanceId", instance_id, 24, 3600)
    };

    Ok(HealthMetrics {
        cpu_percent: fetch("CPUUtilization").await?,
        network_in_bytes: fetch("NetworkIn").await?,
        network_out_bytes: fetch("NetworkOut").await?,
        disk_read_bytes: fetch("DiskReadBytes").await?,
        disk_write_bytes: fetch("DiskWriteBytes").await?,
    })
}

pub fn render_dashboard(instance_id: &str, metrics: &HealthMetrics) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nHealth Dashboard for {}\n", instance_id));
    out.push_str(&"-".repeat(50));
    out.push('\n');
    out.push_str(&format!(
        "CPU Utilization (avg last 24h):     {}\n",
        fmt_metric(metrics.cpu_percent)
    ));
    out.push_str(&format!(
        "Network In (bytes):                 {}\n",
        fmt_metric(metrics.network_in_bytes)
    ));
    out.push_str(&format!(
        "Network Out (bytes):                {}\n",
        fmt_metric(metrics.network_out_bytes)
    ));
    out.push_str(&format!(
        "Disk Read (bytes):                  {}\n",
        fmt_metric(metrics.disk_read_bytes)
    ));
    out.push_str(&format!(
        "Disk Write (bytes):                 {}\n",
        fmt_metric(metrics.disk_write_bytes)
    ));
    out.push_str(&"-".repeat(50));
    out
}

/// CPU plus per-attached-volume EBS I/O over the last hour (5 min periods),
/// used by the daily report.
pub async fn collect_instance_metrics(
    cw: &CwClient,
    ec2: &Ec2Client,
    instance_id: &str,
) -> Result<InstanceMetrics> {
    let cpu_percent = latest_metric_average(
        cw,
        "AWS/EC2",
        "CPUUtilization",
        "InstanceId",
        instance_id,
        1,
        300,
    )
    .await?;

    let volumes_response = ec2
        .describe_volumes()
        .filters(
            Filter::builder()
                .name("attachment.instance-id")
                .values(instance_id)
                .build(),
        )
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to describe volumes: {}", e)))?;

    let mut volumes = Vec::new();
    for volume in volumes_response.volumes() {
        let Some(volume_id) = volume.volume_id() else {
            continue;
        };
        let read_bytes = latest_metric_average(
            cw, "AWS/EBS", "VolumeReadBytes", "VolumeId", volume_id, 1, 300,
        )
        .await?;
        let write_bytes = latest_metric_average(
            cw, "AWS/EBS", "VolumeWriteBytes", "VolumeId", volume_id, 1, 300,
        )
        .await?;
        volumes.push(VolumeIo {
            volume_id: volume_id.to_string(),
            read_bytes,
            write_bytes,
        });
    }

    Ok(InstanceMetrics {
        cpu_percent,
        volumes,
    })
}

/// Indented metric lines for one instance in the daily report
pub fn render_instance_metrics(metrics: &InstanceMetrics) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  CPUUtilization: {}%\n",
        fmt_metric(metrics.cpu_percent)
    ));
    for vol in &metrics.volumes {
        out.push_str(&format!(
            "  EBS {}: ReadBytes={} WriteBytes={}\n",
            vol.volume_id,
            fmt_metric(vol.read_bytes),
            fmt_metric(vol.write_bytes)
        ));
    }
    out
}

fn fmt_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datapoint(secs: i64, average: f64) -> Datapoint {
        Datapoint::builder()
            .timestamp(DateTime::from_secs(secs))
            .average(average)
            .build()
    }

    #[test]
    fn test_latest_average_picks_newest() {
        let points = vec![
            datapoint(100, 1.0),
            datapoint(300, 3.0),
            datapoint(200, 2.0),
        ];
        assert_eq!(latest_average(&points), Some(3.0));
    }

    #[test]
    fn test_latest_average_empty() {
        assert_eq!(latest_average(&[]), None);
    }

    #[test]
    fn test_render_dashboard_with_gaps() {
        let metrics = HealthMetrics {
            cpu_percent: Some(12.345),
            ..Default::default()
        };
        let text = render_dashboard("i-1234567890abcdef0", &metrics);
        assert!(text.contains("Health Dashboard for i-1234567890abcdef0"));
        assert!(text.contains("12.35"));
        assert!(text.contains("Network In (bytes):                 N/A"));
    }

    #[test]
    fn test_render_instance_metrics() {
        let metrics = InstanceMetrics {
            cpu_percent: Some(55.0),
            volumes: vec![VolumeIo {
                volume_id: "vol-0abc".to_string(),
                read_bytes: Some(1024.0),
                write_bytes: None,
            }],
        };
        let text = render_instance_metrics(&metrics);
        assert!(text.contains("CPUUtilization: 55.00%"));
        assert!(text.contains("EBS vol-0abc: ReadBytes=1024.00 WriteBytes=N/A"));
    }

    #[test]
    fn test_render_instance_metrics_no_volumes() {
        let metrics = InstanceMetrics {
            cpu_percent: None,
            volumes: vec![],
        };
        let text = render_instance_metrics(&metrics);
        assert_eq!(text, "  CPUUtilization: N/A%\n");
    }
}
