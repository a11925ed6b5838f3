use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use shared::config::AppConfig;
use shared::repositories::favorite_repository::DynamoDbFavoriteRepository;
use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::repositories::review_repository::DynamoDbReviewRepository;
use shared::services::reconciliation_service::{ReconciliationReport, ReconciliationService};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().init();
    run(service_fn(reconcile_handler)).await
}

/// Runs on a schedule; the triggering event carries nothing we need.
async fn reconcile_handler(_event: LambdaEvent<Value>) -> Result<ReconciliationReport, Error> {
    let config = AppConfig::from_env()?;
    let tables = &config.tables;

    let aws_config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&aws_config);

    let service = ReconciliationService::new(
        Arc::new(DynamoDbGameRepository::new(client.clone(), &tables.games)),
        Arc::new(DynamoDbReviewRepository::new(
            client.clone(),
            &tables.reviews,
            &tables.reviews_by_game_index,
            &tables.reviews_by_user_index,
        )),
        Arc::new(DynamoDbFavoriteRepository::new(
            client,
            &tables.favorites,
            &tables.favorites_by_game_index,
        )),
    );

    info!("Starting rating reconciliation");
    let report = service.reconcile().await.map_err(|e| {
        error!("Reconciliation failed: {}", e);
        Error::from(format!("Reconciliation failed: {}", e))
    })?;
    info!("Reconciliation finished: {:?}", report);
    Ok(report)
}
