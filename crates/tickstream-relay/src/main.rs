use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tickstream_middleware::{EventLog, JetStreamLog, RedisStore};
use tickstream_relay::config::Config;
use tickstream_relay::consumer::ConsumerSupervisor;
use tickstream_relay::query::QueryService;
use tickstream_relay::registry::{HandlerRegistry, Topic};
use tickstream_relay::relay::{relay_channel, Broadcast};
use tickstream_relay::server::{create_router, AppState};
use tickstream_relay::store::TransactionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    tracing::info!(
        nats_url = %config.nats_url,
        stream = %config.stream_name,
        redis_url = %config.redis_url,
        listen_addr = %config.listen_addr,
        "Starting tickstream-relay"
    );

    // Both backends must be reachable at startup; neither connect retries.
    let log: Arc<dyn EventLog> = Arc::new(
        JetStreamLog::connect(
            &config.nats_url,
            &config.stream_name,
            &config.subject_prefix,
        )
        .await?,
    );
    let kv = RedisStore::connect(&config.redis_url).await?;

    let store = Arc::new(TransactionStore::new(Arc::new(kv)));
    let query = Arc::new(QueryService::new(Arc::clone(&store)));

    let (relay_tx, relay_rx) = relay_channel();
    let broadcast = Arc::new(Broadcast::new());
    {
        let broadcast = Arc::clone(&broadcast);
        tokio::spawn(async move { broadcast.run(relay_rx).await });
    }

    let registry = Arc::new(HandlerRegistry::new(relay_tx, Arc::clone(&store)));
    let supervisor = ConsumerSupervisor::new(log, registry);
    let mut consumers = supervisor.spawn(&Topic::ALL);
    // Keep the consumer tasks alive for the life of the process.
    tokio::spawn(async move { while consumers.join_next().await.is_some() {} });

    let app = create_router(AppState { query, broadcast });
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "serving");
    axum::serve(listener, app).await?;

    Ok(())
}
