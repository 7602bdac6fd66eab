//! Basic example demonstrating the Status.io API client.
//!
//! Run with:
//! ```
//! STATUSIO_API_ID=your-id STATUSIO_API_KEY=your-key \
//!     STATUSIO_STATUSPAGE_ID=your-page cargo run --example basic
//! ```

use statusio::{
    status_summary, Component, Incident, List, Maintenance, StatusioClient, StatusioError,
    Subscriber,
};

#[tokio::main]
async fn main() -> statusio::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Status.io client...");
    let client = StatusioClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    let page = std::env::var("STATUSIO_STATUSPAGE_ID").map_err(|_| {
        StatusioError::ConfigMissing("STATUSIO_STATUSPAGE_ID environment variable not set".into())
    })?;

    // Overall status
    println!("\n--- Status Summary ---");
    if let Some(summary) = status_summary(&client, &page).await?.into_result()? {
        let overall = summary.overall().map_or("unknown", |s| s.label());
        println!("Overall: {}", overall);
        for component in &summary.status {
            println!(
                "  - {}: {}",
                component.name,
                component.status.as_deref().unwrap_or("unknown")
            );
        }
    }

    // Infrastructure
    println!("\n--- Components ---");
    let components = Component::list(&client, &page).await?.into_result()?.unwrap_or_default();
    for component in &components {
        for container in &component.containers {
            println!("  - {} / {}", component.name, container.name);
        }
    }

    // Incidents
    println!("\n--- Incidents ---");
    if let Some(incidents) = Incident::list(&client, &page).await?.into_result()? {
        println!(
            "Active: {}, resolved: {}",
            incidents.active_incidents.len(),
            incidents.resolved_incidents.len()
        );
        for incident in incidents.active_incidents.iter().take(5) {
            let latest = incident.latest_message().map_or("", |m| m.details.as_str());
            println!("  - {} ({}): {}", incident.name, incident.id, latest);
        }
    }

    // Maintenance
    println!("\n--- Maintenance ---");
    if let Some(maintenances) = Maintenance::list(&client, &page).await?.into_result()? {
        for maintenance in &maintenances.upcoming_maintenances {
            println!(
                "  - {} starting {}",
                maintenance.name,
                maintenance.datetime_planned_start.as_deref().unwrap_or("?")
            );
        }
    }

    // Subscribers
    println!("\n--- Subscribers ---");
    if let Some(subscribers) = Subscriber::list(&client, &page).await?.into_result()? {
        for (method, subscriber) in subscribers.all() {
            println!("  - [{}] {}", method, subscriber.address);
        }
    }

    println!("\nDone!");
    Ok(())
}
