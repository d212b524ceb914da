//! EC2 fleet operations: listing, start/stop by ID, bulk start/stop by tag

use crate::aws_utils::{instance_state, name_tag};
use crate::config::Config;
use crate::error::{InfractlError, Result};
use crate::utils::{smithy_to_chrono, uptime_since};
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client as Ec2Client;
use aws_sdk_pricing::Client as PricingClient;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::Serialize;
use tracing::info;

/// One row of the fleet listing
#[derive(Debug, Clone, Serialize)]
pub struct InstanceSummary {
    pub id: String,
    pub name: String,
    pub instance_type: String,
    pub state: String,
    pub uptime: String,
    pub monthly_cost: String,
}

/// Sort listing rows by state, then name (the stable order the table uses)
pub fn sort_summaries(summaries: &mut [InstanceSummary]) {
    summaries.sort_by(|a, b| (a.state.as_str(), a.name.as_str()).cmp(&(b.state.as_str(), b.name.as_str())));
}

/// `list-all` command: every instance with uptime and estimated monthly cost
pub async fn list_all_instances(config: &Config) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = Ec2Client::new(&sdk_config);
    let pricing_config = crate::aws_utils::load_us_east_1_config(config).await;
    let pricing = PricingClient::new(&pricing_config);

    let response = client
        .describe_instances()
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to describe instances: {}", e)))?;

    let mut summaries = Vec::new();
    for reservation in response.reservations() {
        for instance in reservation.instances() {
            let instance_type = instance
                .instance_type()
                .map(|t| format!("{}", t))
                .unwrap_or_else(|| "unknown".to_string());
            let launch_time = smithy_to_chrono(instance.launch_time());
            let monthly_cost =
                crate::pricing::monthly_cost_label(&pricing, &instance_type, &config.aws.pricing_location)
                    .await;

            summaries.push(InstanceSummary {
                id: instance.instance_id().unwrap_or("unknown").to_string(),
                name: name_tag(instance.tags()),
                instance_type,
                state: instance_state(instance),
                uptime: uptime_since(launch_time).unwrap_or_else(|| "N/A".to_string()),
                monthly_cost,
            });
        }
    }

    if summaries.is_empty() {
        println!("No instances found.");
        return Ok(());
    }

    sort_summaries(&mut summaries);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Instance ID", "Name", "Type", "State", "Uptime", "Cost"]);
    for inst in &summaries {
        let state_cell = match inst.state.as_str() {
            "running" => Cell::new(&inst.state).fg(comfy_table::Color::Green),
            "stopped" => Cell::new(&inst.state).fg(comfy_table::Color::Yellow),
            "terminated" => Cell::new(&inst.state).fg(comfy_table::Color::Red),
            _ => Cell::new(&inst.state),
        };
        table.add_row(vec![
            Cell::new(&inst.id),
            Cell::new(&inst.name),
            Cell::new(&inst.instance_type),
            state_cell,
            Cell::new(&inst.uptime),
            Cell::new(&inst.monthly_cost),
        ]);
    }

    println!("\n=== All EC2 Instances ===\n");
    println!("{}", table);
    Ok(())
}

/// `list-running` command
pub async fn list_running_instances(config: &Config) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = Ec2Client::new(&sdk_config);

    let response = client
        .describe_instances()
        .filters(
            Filter::builder()
                .name("instance-state-name")
                .values("running")
                .build(),
        )
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to describe instances: {}", e)))?;

    println!("\n=== Running EC2 Instances ===\n");
    let mut found = false;

    for reservation in response.reservations() {
        for instance in reservation.instances() {
            found = true;
            let instance_type = instance
                .instance_type()
                .map(|t| format!("{}", t))
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "ID: {} | Type: {} | Name: {} | State: {}",
                instance.instance_id().unwrap_or("unknown"),
                instance_type,
                name_tag(instance.tags()),
                instance_state(instance),
            );
        }
    }

    if !found {
        println!("No running instances found.");
    }
    Ok(())
}

/// Start a single instance by ID
pub async fn start_instance(instance_id: &str, config: &Config) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = Ec2Client::new(&sdk_config);

    println!("Starting instance: {} ...", instance_id);
    client
        .start_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to start {}: {}", instance_id, e)))?;
    info!("Start requested for {}", instance_id);
    println!("Start command sent.");
    Ok(())
}

/// Stop a single instance by ID
pub async fn stop_instance(instance_id: &str, config: &Config) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = Ec2Client::new(&sdk_config);

    println!("Stopping instance: {} ...", instance_id);
    client
        .stop_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to stop {}: {}", instance_id, e)))?;
    info!("Stop requested for {}", instance_id);
    println!("Stop command sent.");
    Ok(())
}

/// IDs of instances carrying the tag and currently in the given state
async fn instances_with_tag(
    client: &Ec2Client,
    tag_key: &str,
    tag_value: &str,
    state: &str,
) -> Result<Vec<String>> {
    let response = client
        .describe_instances()
        .filters(
            Filter::builder()
                .name(format!("tag:{}", tag_key))
                .values(tag_value)
                .build(),
        )
        .filters(
            Filter::builder()
                .name("instance-state-name")
                .values(state)
                .build(),
        )
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to describe instances: {}", e)))?;

    let ids = response
        .reservations()
        .iter()
        .flat_map(|r| r.instances())
        .filter_map(|i| i.instance_id().map(str::to_string))
        .collect();
    Ok(ids)
}

/// `start-tag` command: start all stopped instances carrying the tag
pub async fn start_instances_by_tag(tag_key: &str, tag_value: &str, config: &Config) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = Ec2Client::new(&sdk_config);

    let ids = instances_with_tag(&client, tag_key, tag_value, "stopped").await?;
    if ids.is_empty() {
        println!("No stopped instances found with that tag.");
        return Ok(());
    }

    println!("Starting instances: {:?}", ids);
    client
        .start_instances()
        .set_instance_ids(Some(ids.clone()))
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to start instances: {}", e)))?;
    info!("Start requested for {} instance(s)", ids.len());
    println!("Start command sent.");
    Ok(())
}

/// `stop-tag` command: stop all running instances carrying the tag
pub async fn stop_instances_by_tag(tag_key: &str, tag_value: &str, config: &Config) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = Ec2Client::new(&sdk_config);

    let ids = instances_with_tag(&client, tag_key, tag_value, "running").await?;
    if ids.is_empty() {
        println!("No running instances found with that tag.");
        return Ok(());
    }

    println!("Stopping instances: {:?}", ids);
    client
        .stop_instances()
        .set_instance_ids(Some(ids.clone()))
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to stop instances: {}", e)))?;
    info!("Stop requested for {} instance(s)", ids.len());
    println!("Stop command sent.");
    Ok(())
}
