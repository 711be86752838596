use modulith_app::{AppConfig, AppServices, SeedOutcome};
use modulith_events::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    modulith_observability::tracing::init(config.log_format);

    let services = AppServices::new();

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received; cancelling in-flight publishes");
                cancel.cancel();
            }
        });
    }

    let outcomes = services.seed(&config.seed_items, &cancel).await;
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, SeedOutcome::Failed { .. }))
        .count();

    tracing::info!(
        items = services.catalog().list_items().len(),
        invoices = services.billing().invoice_count(),
        events = services.bus().published_count(),
        failed,
        "seeding finished"
    );

    println!("{}", services.audit_report().to_json_pretty()?);
    Ok(())
}
