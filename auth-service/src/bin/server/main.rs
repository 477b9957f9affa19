use std::sync::Arc;

use auth::TokenCodec;
use auth_service::config::Config;
use auth_service::domain::account::service::AuthService;
use auth_service::domain::account::service::AuthSettings;
use auth_service::inbound::grpc::AuthGrpcService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::cache::RedisSessionCache;
use auth_service::outbound::notifications::KafkaNotificationProducer;
use auth_service::outbound::repositories::PostgresAccountRepository;
use auth_service::proto::auth_service_server::AuthServiceServer;
use sqlx::postgres::PgPoolOptions;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        request_timeout_secs = config.server.request_timeout_secs,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool));
    let session_cache = Arc::new(RedisSessionCache::connect(&config.redis.url).await?);
    let notifier = Arc::new(KafkaNotificationProducer::new(&config.kafka)?);

    let auth_service = Arc::new(AuthService::new(
        account_repository,
        session_cache,
        notifier,
        TokenCodec::new(config.jwt.secret.as_bytes()),
        AuthSettings::from(&config),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        Arc::clone(&auth_service),
        config.notification.verify_email_url.clone(),
        config.request_timeout(),
    );
    let http_server =
        tokio::spawn(async move { axum::serve(http_listener, http_application).await });

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = AuthGrpcService::new(
        Arc::clone(&auth_service),
        config.notification.verify_email_url.clone(),
    );
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    let request_timeout = config.request_timeout();
    let grpc_server = tokio::spawn(async move {
        Server::builder()
            .timeout(request_timeout)
            .add_service(AuthServiceServer::new(grpc_service))
            .serve(grpc_address)
            .await
    });

    match tokio::try_join!(http_server, grpc_server) {
        Ok((Err(e), _)) => tracing::error!(error = %e, "Http server error"),
        Ok((_, Err(e))) => tracing::error!(error = %e, "gRpc server error"),
        Ok(_) => tracing::info!("Servers exited successfully"),
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    };

    Ok(())
}
