use clap::Parser;

/// Command-line and environment configuration for the relay service.
#[derive(Parser, Debug)]
#[command(name = "tickstream-relay")]
#[command(about = "Relays market events to client sessions and records trade transactions")]
pub struct Config {
    /// NATS server backing the market data log
    #[arg(long, env = "NATS_URL", default_value = "nats://localhost:4222")]
    pub nats_url: String,

    /// JetStream stream holding the topic partitions
    #[arg(long, env = "STREAM_NAME", default_value = "TICKSTREAM")]
    pub stream_name: String,

    /// Subject prefix for partition subjects ({prefix}.{topic}.{partition})
    #[arg(long, env = "SUBJECT_PREFIX", default_value = "md")]
    pub subject_prefix: String,

    /// Redis server backing the transaction store
    #[arg(long, env = "REDIS_URL", default_value = "redis://localhost:6379")]
    pub redis_url: String,

    /// HTTP/WebSocket listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "tickstream-relay",
            "--nats-url",
            "nats://broker:4222",
            "--listen-addr",
            "127.0.0.1:9000",
        ])
        .unwrap();

        assert_eq!(config.nats_url, "nats://broker:4222");
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.stream_name, "TICKSTREAM");
    }
}
