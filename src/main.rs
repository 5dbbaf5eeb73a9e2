use dioxus_logger::tracing::{self, Level};

use stockpile::{config::Config, scheduler::Scheduler, startup};

#[tokio::main]
async fn main() {
    dioxus_logger::init(Level::INFO).expect("failed to init logger");

    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let esi_client = startup::build_esi_client(&config).await.unwrap();
    let db = startup::connect_to_database(&config).await.unwrap();
    let reference = startup::load_reference_catalog(&db).await.unwrap();
    let services = startup::build_asset_services(&config, esi_client, reference);

    startup::warm_asset_cache(&config, &services).await;

    let mut scheduler = Scheduler::new(services, config.owners.clone())
        .await
        .unwrap()
        .start()
        .await
        .unwrap();

    tracing::info!("Stockpile running, press Ctrl+C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }

    tracing::info!("Shutting down");
    if let Err(e) = scheduler.shutdown().await {
        tracing::error!("Failed to stop scheduler: {:?}", e);
    }
}
