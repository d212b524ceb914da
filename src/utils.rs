use chrono::{DateTime, Utc};

/// Format an uptime duration as "{days}d {hours}h {minutes}m".
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{}d {}h {}m", days, hours, minutes)
}

/// Uptime string since a launch time, clamped at zero for clock skew.
pub fn uptime_since(launch_time: Option<DateTime<Utc>>) -> Option<String> {
    launch_time.map(|lt| {
        let duration = Utc::now().signed_duration_since(lt);
        format_uptime(duration.num_seconds().max(0) as u64)
    })
}

/// Convert an AWS smithy timestamp into chrono UTC.
pub fn smithy_to_chrono(ts: Option<&aws_sdk_ec2::primitives::DateTime>) -> Option<DateTime<Utc>> {
    ts.and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
}
