//! Age-based cleanup of unattached EBS volumes and owned snapshots

use crate::config::Config;
use crate::error::{InfractlError, Result};
use crate::utils::smithy_to_chrono;
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client as Ec2Client;
use chrono::{DateTime, Duration, Utc};
use std::io::{self, Write};
use tracing::info;

/// Keep the (id, created) pairs older than the cutoff.
pub fn older_than(
    items: &[(String, DateTime<Utc>)],
    cutoff: DateTime<Utc>,
) -> Vec<(String, DateTime<Utc>)> {
    items
        .iter()
        .filter(|(_, created)| *created < cutoff)
        .cloned()
        .collect()
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// `cleanup-volumes` command: delete unattached volumes older than `days_old`
pub async fn cleanup_unused_volumes(
    days_old: i64,
    dry_run: bool,
    force: bool,
    config: &Config,
) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = Ec2Client::new(&sdk_config);

    let response = client
        .describe_volumes()
        .filters(Filter::builder().name("status").values("available").build())
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to list volumes: {}", e)))?;

    let candidates: Vec<(String, DateTime<Utc>)> = response
        .volumes()
        .iter()
        .filter_map(|v| {
            let id = v.volume_id()?.to_string();
            let created = smithy_to_chrono(v.create_time())?;
            Some((id, created))
        })
        .collect();

    let cutoff = Utc::now() - Duration::days(days_old);
    let to_delete = older_than(&candidates, cutoff);

    if to_delete.is_empty() {
        println!("No unused EBS volumes older than {} days found.", days_old);
        return Ok(());
    }

    println!("Deleting {} unused EBS volumes:", to_delete.len());
    for (id, created) in &to_delete {
        println!("  {} created on {}", id, created);
    }

    if dry_run {
        println!("[DRY RUN] Would delete {} volume(s)", to_delete.len());
        return Ok(());
    }

    if !force && !confirm(&format!("Delete {} volume(s)?", to_delete.len()))? {
        println!("Cancelled");
        return Ok(());
    }

    for (id, _) in &to_delete {
        match client.delete_volume().volume_id(id).send().await {
            Ok(_) => {
                info!("Deleted volume {}", id);
                println!("  Deleted volume {}", id);
            }
            Err(e) => eprintln!("  Failed to delete volume {}: {}", id, e),
        }
    }
    println!("Deletion complete.");
    Ok(())
}

/// `cleanup-snapshots` command: delete self-owned snapshots older than `days_old`
pub async fn cleanup_old_snapshots(
    days_old: i64,
    dry_run: bool,
    force: bool,
    config: &Config,
) -> Result<()> {
    let sdk_config = crate::aws_utils::load_sdk_config(config).await;
    let client = Ec2Client::new(&sdk_config);

    let response = client
        .describe_snapshots()
        .owner_ids("self")
        .send()
        .await
        .map_err(|e| InfractlError::Aws(format!("Failed to list snapshots: {}", e)))?;

    let candidates: Vec<(String, DateTime<Utc>)> = response
        .snapshots()
        .iter()
        .filter_map(|s| {
            let id = s.snapshot_id()?.to_string();
            let started = smithy_to_chrono(s.start_time())?;
            Some((id, started))
        })
        .collect();

    let cutoff = Utc::now() - Duration::days(days_old);
    let to_delete = older_than(&candidates, cutoff);

    if to_delete.is_empty() {
        println!("No snapshots older than {} days found.", days_old);
        return Ok(());
    }

    println!("Deleting {} snapshots:", to_delete.len());
    for (id, started) in &to_delete {
        println!("  {} created on {}", id, started);
    }

    if dry_run {
        println!("[DRY RUN] Would delete {} snapshot(s)", to_delete.len());
        return Ok(());
    }

    if !force && !confirm(&format!("Delete {} snapshot(s)?", to_delete.len()))? {
        println!("Cancelled");
        return Ok(());
    }

    for (id, _) in &to_delete {
        match client.delete_snapshot().snapshot_id(id).send().await {
            Ok(_) => {
                info!("Deleted snapshot {}", id);
                println!("  Deleted snapshot {}", id);
            }
            Err(e) => eprintln!("  Failed to delete snapshot {}: {}", id, e),
        }
    }
    println!("Deletion complete.");
    Ok(())
}
