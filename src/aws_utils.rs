//! Common AWS utilities shared across modules
//!
//! Clients are constructed from one shared `SdkConfig` and passed into the
//! functions that need them. No module holds a global client handle.

use crate::config::Config;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::types::{Instance, Tag};

/// Build the shared SDK config: configured region plus standard-mode
/// retries capped at 5 attempts. Every client in the crate is created
/// from the value returned here.
pub async fn load_sdk_config(config: &Config) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws.region.clone()))
        .retry_config(RetryConfig::standard().with_max_attempts(5))
        .load()
        .await
}

/// Cost Explorer and Pricing are only served out of us-east-1; the
/// configured region is ignored for those two clients.
pub async fn load_us_east_1_config(_config: &Config) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .retry_config(RetryConfig::standard().with_max_attempts(5))
        .load()
        .await
}

/// Extract the Name tag value, or empty string when untagged.
pub fn name_tag(tags: &[Tag]) -> String {
    tags.iter()
        .find(|t| t.key() == Some("Name"))
        .and_then(|t| t.value())
        .unwrap_or("")
        .to_string()
}

/// Instance state name as a plain string ("running", "stopped", ...).
pub fn instance_state(instance: &Instance) -> String {
    instance
        .state()
        .and_then(|s| s.name())
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_tag_present() {
        let tags = vec![
            Tag::builder().key("Project").value("etl").build(),
            Tag::builder().key("Name").value("web-1").build(),
        ];
        assert_eq!(name_tag(&tags), "web-1");
    }

    #[test]
    fn test_name_tag_missing() {
        let tags = vec![Tag::builder().key("Project").value("etl").build()];
        assert_eq!(name_tag(&tags), "");
    }

    #[test]
    fn test_name_tag_empty() {
        assert_eq!(name_tag(&[]), "");
    }
}
