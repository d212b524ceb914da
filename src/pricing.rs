//! On-demand price lookup via the AWS Pricing API
//!
//! The Pricing API returns each product as a JSON document serialized
//! inside the JSON response, so the hourly rate has to be dug out of
//! terms -> OnDemand -> priceDimensions -> pricePerUnit. Lookups fail
//! routinely (unsupported types, throttling, odd locations); callers get
//! "N/A" instead of an error so a price gap never breaks a listing.

use aws_sdk_pricing::types::{Filter, FilterType};
use aws_sdk_pricing::Client as PricingClient;
use tracing::debug;

const HOURS_PER_MONTH: f64 = 24.0 * 30.0;

/// Monthly on-demand cost label for an instance type, e.g. "$30.24/mo".
/// Returns "N/A" when the price cannot be determined.
pub async fn monthly_cost_label(
    client: &PricingClient,
    instance_type: &str,
    location: &str,
) -> String {
    match on_demand_hourly_price(client, instance_type, location).await {
        Some(hourly) => format!("${:.2}/mo", hourly * HOURS_PER_MONTH),
        None => "N/A".to_string(),
    }
}

/// Fetch the on-demand hourly USD price for a Linux, shared-tenancy
/// instance with no pre-installed software.
pub async fn on_demand_hourly_price(
    client: &PricingClient,
    instance_type: &str,
    location: &str,
) -> Option<f64> {
    let term_filters = [
        ("instanceType", instance_type),
        ("location", location),
        ("operatingSystem", "Linux"),
        ("preInstalledSw", "NA"),
        ("tenancy", "Shared"),
        ("capacitystatus", "Used"),
    ];

    let mut request = client
        .get_products()
        .service_code("AmazonEC2")
        .max_results(1);
    for (field, value) in term_filters {
        let filter = Filter::builder()
            .r#type(FilterType::TermMatch)
            .field(field)
            .value(value)
            .build()
            .ok()?;
        request = request.filters(filter);
    }

    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => {
            debug!("Pricing lookup failed for {}: {}", instance_type, e);
            return None;
        }
    };

    let price_item = response.price_list().first()?;
    parse_on_demand_hourly(price_item)
}

/// Navigate the nested price-list JSON to the first OnDemand USD rate.
pub fn parse_on_demand_hourly(price_item_json: &str) -> Option<f64> {
    let item: serde_json::Value = serde_json::from_str(price_item_json).ok()?;
    let on_demand = item
        .get("terms")?
        .get("OnDemand")?
        .as_object()?
        .values()
        .next()?;
    let dimension = on_demand
        .get("priceDimensions")?
        .as_object()?
        .values()
        .next()?;
    dimension
        .get("pricePerUnit")?
        .get("USD")?
        .as_str()?
        .parse::<f64>()
        .ok()
}
