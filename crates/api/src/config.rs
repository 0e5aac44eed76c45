use std::path::PathBuf;

use folio_blob::cloudinary::DEFAULT_FOLDER;

/// Default port the API listens on.
pub const DEFAULT_PORT: u16 = 3005;

/// Default cap on a single upload request body (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where project, completion and upload records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// A single JSON document on local disk.
    Json {
        data_file: PathBuf,
        /// Seed the demo projects when the data file does not exist yet.
        seed_demo_data: bool,
    },
    /// PostgreSQL through `folio-db`.
    Postgres { database_url: String },
}

/// Where upload bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobConfig {
    /// Files in `upload_dir`, served by this process under `/uploads`.
    Local {
        upload_dir: PathBuf,
        public_base_url: String,
    },
    /// A Cloudinary-style image host.
    Cloudinary {
        cloud_name: String,
        api_key: String,
        api_secret: String,
        folder: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development: a JSON data
/// file and a local upload directory next to the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3005`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted upload request body in bytes.
    pub max_upload_bytes: usize,
    pub store: StoreConfig,
    pub blob: BlobConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                       |
    /// |--------------------------|-------------------------------|
    /// | `HOST`                   | `0.0.0.0`                     |
    /// | `PORT`                   | `3005`                        |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                          |
    /// | `MAX_UPLOAD_BYTES`       | `10485760`                    |
    /// | `STORE_BACKEND`          | `json` (or `postgres`)        |
    /// | `DATA_FILE`              | `data.json`                   |
    /// | `SEED_DEMO_DATA`         | `true`                        |
    /// | `DATABASE_URL`           | required for `postgres`       |
    /// | `BLOB_BACKEND`           | `local` (or `cloudinary`)     |
    /// | `UPLOAD_DIR`             | `uploads`                     |
    /// | `PUBLIC_BASE_URL`        | `http://localhost:{PORT}`     |
    /// | `CLOUDINARY_CLOUD_NAME`  | required for `cloudinary`     |
    /// | `CLOUDINARY_API_KEY`     | required for `cloudinary`     |
    /// | `CLOUDINARY_API_SECRET`  | required for `cloudinary`     |
    /// | `CLOUDINARY_FOLDER`      | `portfolio-manager`           |
    ///
    /// Panics on malformed values: misconfiguration must fail at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str, backend: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| panic!("{key} must be set when using the {backend} backend"))
        };

        let host = var("HOST", "0.0.0.0");

        let port: u16 = var("PORT", &DEFAULT_PORT.to_string())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = var("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let store = match var("STORE_BACKEND", "json").to_ascii_lowercase().as_str() {
            "json" => StoreConfig::Json {
                data_file: var("DATA_FILE", "data.json").into(),
                seed_demo_data: parse_bool(&var("SEED_DEMO_DATA", "true"))
                    .expect("SEED_DEMO_DATA must be true or false"),
            },
            "postgres" | "postgresql" => StoreConfig::Postgres {
                database_url: required("DATABASE_URL", "postgres"),
            },
            other => panic!("Unknown STORE_BACKEND '{other}' (expected 'json' or 'postgres')"),
        };

        let blob = match var("BLOB_BACKEND", "local").to_ascii_lowercase().as_str() {
            "local" => BlobConfig::Local {
                upload_dir: var("UPLOAD_DIR", "uploads").into(),
                public_base_url: lookup("PUBLIC_BASE_URL")
                    .unwrap_or_else(|| format!("http://localhost:{port}")),
            },
            "cloudinary" => BlobConfig::Cloudinary {
                cloud_name: required("CLOUDINARY_CLOUD_NAME", "cloudinary"),
                api_key: required("CLOUDINARY_API_KEY", "cloudinary"),
                api_secret: required("CLOUDINARY_API_SECRET", "cloudinary"),
                folder: var("CLOUDINARY_FOLDER", DEFAULT_FOLDER),
            },
            other => panic!("Unknown BLOB_BACKEND '{other}' (expected 'local' or 'cloudinary')"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            store,
            blob,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
