use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use infractl::config::{self, Config};
use infractl::{cleanup, cost, dashboard, ec2, report, validation};

#[derive(Parser)]
#[command(name = "infractl")]
#[command(
    about = "AWS infrastructure automation toolkit",
    long_about = "infractl is a CLI for day-to-day AWS housekeeping.\n\nSupports:\n  - EC2 fleet listing with uptime and on-demand cost estimates\n  - Start/stop by instance ID or by tag\n  - CloudWatch health dashboards\n  - EC2 cost anomaly detection via Cost Explorer\n  - Age-based cleanup of unattached volumes and old snapshots\n  - Daily summary report delivered over SMTP"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all EC2 instances with uptime and estimated monthly cost
    ListAll,
    /// List running EC2 instances
    #[command(alias = "list-ec2")]
    ListRunning,
    /// Start an EC2 instance
    Start {
        /// EC2 instance ID (e.g., i-1234567890abcdef0)
        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,
    },
    /// Stop an EC2 instance
    Stop {
        /// EC2 instance ID
        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,
    },
    /// Start stopped EC2 instances carrying a tag
    StartTag {
        #[arg(value_name = "TAG_KEY")]
        tag_key: String,
        #[arg(value_name = "TAG_VALUE")]
        tag_value: String,
    },
    /// Stop running EC2 instances carrying a tag
    StopTag {
        #[arg(value_name = "TAG_KEY")]
        tag_key: String,
        #[arg(value_name = "TAG_VALUE")]
        tag_value: String,
    },
    /// Show CloudWatch health metrics for an instance
    Dashboard {
        /// EC2 instance ID
        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,
    },
    /// Detect EC2 cost anomalies using Cost Explorer
    CostCheck {
        /// Number of days to average (defaults to config)
        #[arg(long)]
        days: Option<i64>,
        /// Alert threshold in percent (defaults to config)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Delete unattached EBS volumes older than X days
    CleanupVolumes {
        /// Delete volumes older than this many days (defaults to config)
        #[arg(long)]
        days: Option<i64>,
        /// Show what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Delete old EBS snapshots
    CleanupSnapshots {
        /// Delete snapshots older than this many days (defaults to config)
        #[arg(long)]
        days: Option<i64>,
        /// Show what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Send the daily AWS report email via SMTP
    DailyReport {
        /// Recipient email
        #[arg(long)]
        to: String,
    },
    /// Initialize configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".infractl.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Suppress INFO by default; --verbose turns on debug
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::ListAll => {
            ec2::list_all_instances(&config).await?;
        }
        Commands::ListRunning => {
            ec2::list_running_instances(&config).await?;
        }
        Commands::Start { instance_id } => {
            validation::validate_instance_id(&instance_id)?;
            ec2::start_instance(&instance_id, &config).await?;
        }
        Commands::Stop { instance_id } => {
            validation::validate_instance_id(&instance_id)?;
            ec2::stop_instance(&instance_id, &config).await?;
        }
        Commands::StartTag { tag_key, tag_value } => {
            validation::validate_tag(&tag_key, &tag_value)?;
            ec2::start_instances_by_tag(&tag_key, &tag_value, &config).await?;
        }
        Commands::StopTag { tag_key, tag_value } => {
            validation::validate_tag(&tag_key, &tag_value)?;
            ec2::stop_instances_by_tag(&tag_key, &tag_value, &config).await?;
        }
        Commands::Dashboard { instance_id } => {
            validation::validate_instance_id(&instance_id)?;
            dashboard::show_instance_dashboard(&instance_id, &config).await?;
        }
        Commands::CostCheck { days, threshold } => {
            let days = days.unwrap_or(config.cost.anomaly_days);
            let threshold = threshold.unwrap_or(config.cost.anomaly_threshold_percent);
            cost::run_cost_check(days, threshold, &config).await?;
        }
        Commands::CleanupVolumes {
            days,
            dry_run,
            force,
        } => {
            let days = days.unwrap_or(config.cleanup.volume_age_days);
            cleanup::cleanup_unused_volumes(days, dry_run, force, &config).await?;
        }
        Commands::CleanupSnapshots {
            days,
            dry_run,
            force,
        } => {
            let days = days.unwrap_or(config.cleanup.snapshot_age_days);
            cleanup::cleanup_old_snapshots(days, dry_run, force, &config).await?;
        }
        Commands::DailyReport { to } => {
            report::send_daily_report(&to, &config).await?;
        }
        Commands::Init { output } => {
            config::init_config(&output)?;
        }
    }

    Ok(())
}
