use axum::Router;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::services::{ServeDir, ServeFile};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug)]
struct HostConfig {
    port: u16,
    static_dir: PathBuf,
    log_level: LogLevel,
}

impl HostConfig {
    fn from_env() -> Self {
        Self {
            port: parse_port(std::env::var("PORT").ok().as_deref(), DEFAULT_PORT),
            static_dir: parse_non_empty(std::env::var("STATIC_DIR").ok().as_deref())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            log_level: parse_level(std::env::var("LOG_LEVEL").ok().as_deref(), DEFAULT_LOG_LEVEL),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = HostConfig::from_env();
    log_event(
        &config,
        LogLevel::Debug,
        "host_config_resolved",
        serde_json::json!({
            "port": config.port,
            "static_dir": config.static_dir.display().to_string(),
            "log_level": config.log_level.as_str(),
        }),
    );

    let index = config.static_dir.join("index.html");
    let static_service = ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(index));
    let app = Router::new().fallback_service(static_service);

    let bind_address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        &config,
        LogLevel::Info,
        "server_listening",
        serde_json::json!({
            "port": config.port,
            "static_dir": config.static_dir.display().to_string(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_port(raw: Option<&str>, default: u16) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(default)
}

fn parse_non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_level(raw: Option<&str>, default: LogLevel) -> LogLevel {
    match parse_non_empty(raw)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        _ => default,
    }
}

fn log_event(config: &HostConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < config.log_level {
        return;
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_seconds())),
    );
    payload.insert(
        "level".to_string(),
        serde_json::Value::String(level.as_str().to_string()),
    );
    payload.insert(
        "event".to_string(),
        serde_json::Value::String(event.to_string()),
    );

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    println!("{}", serde_json::Value::Object(payload));
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}
