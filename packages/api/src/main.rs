use lambda_http::{run, tracing, Error};
use std::env::{self, set_var};
use std::sync::Arc;

use api::create_app;
use api::state::{AppState, Repositories};
use shared::config::AppConfig;
use shared::repositories::favorite_repository::DynamoDbFavoriteRepository;
use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::repositories::review_repository::DynamoDbReviewRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::services::identity_provider::CognitoIdentityProvider;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let config = AppConfig::from_env()?;
    let cognito = config.cognito()?;
    let tables = &config.tables;

    let aws_config = aws_config::load_from_env().await;
    let dynamo_client = aws_sdk_dynamodb::Client::new(&aws_config);
    let cognito_client = aws_sdk_cognitoidentityprovider::Client::new(&aws_config);

    let repositories = Repositories {
        games: Arc::new(DynamoDbGameRepository::new(
            dynamo_client.clone(),
            &tables.games,
        )),
        reviews: Arc::new(DynamoDbReviewRepository::new(
            dynamo_client.clone(),
            &tables.reviews,
            &tables.reviews_by_game_index,
            &tables.reviews_by_user_index,
        )),
        favorites: Arc::new(DynamoDbFavoriteRepository::new(
            dynamo_client.clone(),
            &tables.favorites,
            &tables.favorites_by_game_index,
        )),
        users: Arc::new(DynamoDbUserRepository::new(dynamo_client, &tables.users)),
    };
    let identity_provider = Arc::new(CognitoIdentityProvider::new(
        cognito_client,
        &cognito.user_pool_id,
        &cognito.client_id,
    ));

    let app_state = AppState::new(repositories, identity_provider, &config)?;
    let app = create_app(app_state);

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        run(app).await
    } else {
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
