//! Daily summary report: EC2 fleet + per-instance metrics + cost anomalies
//!
//! Every section is built as a returned String and concatenated at the end;
//! nothing here writes to stdout except the final delivery confirmation.

use crate::config::Config;
use crate::error::{InfractlError, Result};
use aws_sdk_cloudwatch::Client as CwClient;
use aws_sdk_costexplorer::Client as CeClient;
use aws_sdk_ec2::Client as Ec2Client;
use tracing::info;

pub const REPORT_SUBJECT: &str = "Daily AWS EC2 & Cost Summary";

/// One report line per instance: "id | name | state | type"
pub fn instance_line(id: &str, name: &str, state: &str, instance_type: &str) -> String {
    format!("{} | {} | {} | {}", id, name, state, instance_type)
}

/// Join the two sections into the final email body.
pub fn compose_daily_report(ec2_section: &str, anomaly_section: &str) -> String {
    format!(
        "=== EC2 Instances ===\n{}\n=== Cost Anomalies ===\n{}",
        ec2_section, anomaly_section
    )
}

/// Build the full report body from live AWS state.
pub async fn build_daily_report(config: &Config) -> Result<String> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let ec2 = Ec2Client::new(&sdk_config);
    let cw = CwClient::new(&sdk_config);

    let mut ec2_section = String::new();
    let response = ec2
        .describe_instances()
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to describe instances: {}", e)))?;

    for reservation in response.reservations() {
        for instance in reservation.instances() {
            let instance_id = instance.instance_id().unwrap_or("unknown");
            let instance_type = instance
                .instance_type()
                .map(|t| format!("{}", t))
                .unwrap_or_else(|| "unknown".to_string());
            ec2_section.push_str(&instance_line(
                instance_id,
                &crate::aws_utils::name_tag(instance.tags()),
                &crate::aws_utils::instance_state(instance),
                &instance_type,
            ));
            ec2_section.push('\n');

            let metrics = crate::dashboard::collect_instance_metrics(&cw, &ec2, instance_id).await?;
            ec2_section.push_str(&crate::dashboard::render_instance_metrics(&metrics));
        }
    }

    let ce_config = crate::aws_utils::load_us_east_1_config(config).await;
    let ce = CeClient::new(&ce_config);
    let series = crate::cost::fetch_daily_ec2_costs(&ce, config.cost.anomaly_days).await?;
    let anomaly_section = match crate::cost::detect(&series, config.cost.anomaly_threshold_percent)
    {
        Ok(report) => crate::cost::render_anomaly_report(&report, config.cost.anomaly_days),
        Err(InfractlError::InsufficientData { .. }) => {
            "Not enough data to detect anomalies.\n".to_string()
        }
        Err(e) => return Err(e),
    };

    Ok(compose_daily_report(&ec2_section, &anomaly_section))
}

/// `daily-report` command: build the body and email it.
pub async fn send_daily_report(recipient: &str, config: &Config) -> Result<()> {
    let body = build_daily_report(config).await?;
    info!("Daily report built ({} bytes)", body.len());
    crate::email::send_email(REPORT_SUBJECT, &body, recipient, &config.email)
}
