use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PUBLIC_DIR: &str = "../template-builder/public";
const DEFAULT_CONCEPTNET_URL: &str = "http://api.conceptnet.io";
const DEFAULT_ARASAAC_API_URL: &str = "https://api.arasaac.org/api";
const DEFAULT_ARASAAC_STATIC_URL: &str = "https://static.arasaac.org";
const DEFAULT_SYNONYM_COUNT: usize = 3;
const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:5174",
    "http://127.0.0.1:5173",
    "http://192.168.0.101:5173",
    "http://10.11.159.126:5173",
    "http://192.168.145.118:5173",
    "http://192.168.107.152:5173",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub public_dir: PathBuf,
    pub mapping_dir: PathBuf,
    pub conceptnet_url: String,
    pub arasaac_api_url: String,
    pub arasaac_static_url: String,
    pub synonym_count: usize,
    pub synonym_fallback: bool,
    pub outbound_timeout: Option<Duration>,
    pub upload_limit: usize,
    pub cors_origins: Vec<String>,
    pub lemma_lookup_path: Option<PathBuf>,
    pub file_logs: bool,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(5000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let cors_origins = env_string("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect());

        Self {
            host,
            port,
            log_level,
            public_dir: env_string("PUBLIC_DIR")
                .unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string())
                .into(),
            mapping_dir: env_string("MAPPING_DIR").unwrap_or_else(|| ".".to_string()).into(),
            conceptnet_url: trim_url(
                env_string("CONCEPTNET_API_URL").unwrap_or_else(|| DEFAULT_CONCEPTNET_URL.into()),
            ),
            arasaac_api_url: trim_url(
                env_string("ARASAAC_API_URL").unwrap_or_else(|| DEFAULT_ARASAAC_API_URL.into()),
            ),
            arasaac_static_url: trim_url(
                env_string("ARASAAC_STATIC_URL")
                    .unwrap_or_else(|| DEFAULT_ARASAAC_STATIC_URL.into()),
            ),
            synonym_count: env_string("SYNONYM_COUNT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SYNONYM_COUNT),
            synonym_fallback: env_bool("SYNONYM_FALLBACK").unwrap_or(true),
            outbound_timeout: env_string("OUTBOUND_TIMEOUT_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            upload_limit: env_string("UPLOAD_LIMIT_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_UPLOAD_LIMIT),
            cors_origins,
            lemma_lookup_path: env_string("LEMMA_LOOKUP_PATH").map(PathBuf::from),
            file_logs: env_bool("ENABLE_FILE_LOGS").unwrap_or(false),
            log_dir: env_string("LOG_DIR").unwrap_or_else(|| "./logs".to_string()).into(),
        }
    }

    /// Configuration rooted at `root`, with the public and mapping
    /// directories side by side. Remote URLs keep their defaults.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            log_level: "info".to_string(),
            public_dir: root.join("public"),
            mapping_dir: root.join("backend"),
            conceptnet_url: DEFAULT_CONCEPTNET_URL.to_string(),
            arasaac_api_url: DEFAULT_ARASAAC_API_URL.to_string(),
            arasaac_static_url: DEFAULT_ARASAAC_STATIC_URL.to_string(),
            synonym_count: DEFAULT_SYNONYM_COUNT,
            synonym_fallback: true,
            outbound_timeout: None,
            upload_limit: DEFAULT_UPLOAD_LIMIT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            lemma_lookup_path: None,
            file_logs: false,
            log_dir: root.join("logs"),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.public_dir.join("images")
    }

    pub fn word_images_path(&self) -> PathBuf {
        self.mapping_dir.join("word_images.json")
    }

    pub fn file_names_path(&self) -> PathBuf {
        self.mapping_dir.join("file_names.json")
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| trim_url(origin.to_string()))
        .filter(|origin| !origin.is_empty())
        .collect()
}
