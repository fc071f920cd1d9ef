use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PushConfig {
    pub app_id: String,
    pub key: String,
    pub secret: String,
    pub cluster: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    pub root: String,
    pub max_bytes: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            root: "public".to_string(),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("Failed to parse configuration file: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build from environment variables and defaults
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // The database URL is mandatory when there is no config file
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    smtp: SmtpConfig {
                        host: get_env("SMTP_HOST").unwrap_or_default(),
                        port: get_env_parse("SMTP_PORT", 587u16),
                        username: get_env("SMTP_USERNAME").unwrap_or_default(),
                        password: get_env("SMTP_PASSWORD").unwrap_or_default(),
                        from: get_env("SMTP_FROM").unwrap_or_default(),
                    },
                    push: PushConfig {
                        app_id: get_env("PUSH_APP_ID").unwrap_or_default(),
                        key: get_env("PUSH_KEY").unwrap_or_default(),
                        secret: get_env("PUSH_SECRET").unwrap_or_default(),
                        cluster: get_env("PUSH_CLUSTER").unwrap_or_else(|| "mt1".to_string()),
                    },
                    uploads: UploadsConfig {
                        root: get_env("UPLOADS_ROOT").unwrap_or_else(|| "public".to_string()),
                        max_bytes: get_env_parse("UPLOADS_MAX_BYTES", 10 * 1024 * 1024usize),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Unable to read configuration file {config_path}: {e}").into());
            }
        };

        // Environment variables override file values
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("SMTP_HOST") {
            config.smtp.host = v;
        }
        if let Ok(v) = env::var("SMTP_PORT")
            && let Ok(p) = v.parse()
        {
            config.smtp.port = p;
        }
        if let Ok(v) = env::var("SMTP_USERNAME") {
            config.smtp.username = v;
        }
        if let Ok(v) = env::var("SMTP_PASSWORD") {
            config.smtp.password = v;
        }
        if let Ok(v) = env::var("SMTP_FROM") {
            config.smtp.from = v;
        }
        if let Ok(v) = env::var("PUSH_APP_ID") {
            config.push.app_id = v;
        }
        if let Ok(v) = env::var("PUSH_KEY") {
            config.push.key = v;
        }
        if let Ok(v) = env::var("PUSH_SECRET") {
            config.push.secret = v;
        }
        if let Ok(v) = env::var("PUSH_CLUSTER") {
            config.push.cluster = v;
        }
        if let Ok(v) = env::var("UPLOADS_ROOT") {
            config.uploads.root = v;
        }
        if let Ok(v) = env::var("UPLOADS_MAX_BYTES")
            && let Ok(n) = v.parse()
        {
            config.uploads.max_bytes = n;
        }

        Ok(config)
    }
}
