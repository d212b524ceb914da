//! Formatting tests for report and dashboard sections
//!
//! All sections are plain returned strings, so they can be verified
//! without any AWS access.

use infractl::cost::{render_anomaly_report, AnomalyReport};
use infractl::dashboard::{render_dashboard, render_instance_metrics, HealthMetrics, InstanceMetrics, VolumeIo};
use infractl::report::{compose_daily_report, instance_line, REPORT_SUBJECT};

#[test]
fn test_subject_is_stable() {
    assert_eq!(REPORT_SUBJECT, "Daily AWS EC2 & Cost Summary");
}

#[test]
fn test_full_report_composition() {
    let mut ec2_section = String::new();
    ec2_section.push_str(&instance_line("i-0abc123def4567890", "web-1", "running", "t3.medium"));
    ec2_section.push('\n');
    ec2_section.push_str(&render_instance_metrics(&InstanceMetrics {
        cpu_percent: Some(42.5),
        volumes: vec![VolumeIo {
            volume_id: "vol-0aa".to_string(),
            read_bytes: Some(2048.0),
            write_bytes: Some(0.0),
        }],
    }));

    let anomaly = render_anomaly_report(
        &AnomalyReport {
            baseline: 12.0,
            today: 30.0,
            percent_change: 150.0,
            alert: true,
        },
        7,
    );

    let body = compose_daily_report(&ec2_section, &anomaly);

    assert!(body.starts_with("=== EC2 Instances ==="));
    assert!(body.contains("i-0abc123def4567890 | web-1 | running | t3.medium"));
    assert!(body.contains("  CPUUtilization: 42.50%"));
    assert!(body.contains("  EBS vol-0aa: ReadBytes=2048.00 WriteBytes=0.00"));
    assert!(body.contains("=== Cost Anomalies ==="));
    assert!(body.contains("ALERT: Today's EC2 cost spike exceeds threshold!"));
}

#[test]
fn test_report_with_empty_fleet() {
    let body = compose_daily_report("", "Not enough data to detect anomalies.\n");
    assert!(body.contains("=== EC2 Instances ==="));
    assert!(body.contains("Not enough data to detect anomalies."));
}

#[test]
fn test_dashboard_renders_all_five_metrics() {
    let metrics = HealthMetrics {
        cpu_percent: Some(3.25),
        network_in_bytes: Some(100.0),
        network_out_bytes: Some(200.0),
        disk_read_bytes: None,
        disk_write_bytes: None,
    };
    let text = render_dashboard("i-0abc123def4567890", &metrics);
    assert!(text.contains("CPU Utilization (avg last 24h):     3.25"));
    assert!(text.contains("Network In (bytes):                 100.00"));
    assert!(text.contains("Network Out (bytes):                200.00"));
    assert!(text.contains("Disk Read (bytes):                  N/A"));
    assert!(text.contains("Disk Write (bytes):                 N/A"));
}

#[test]
fn test_metric_lines_keep_report_indentation() {
    let text = render_instance_metrics(&InstanceMetrics {
        cpu_percent: None,
        volumes: vec![],
    });
    // Two-space indent under the instance line, N/A for missing CPU data
    assert_eq!(text, "  CPUUtilization: N/A%\n");
}
