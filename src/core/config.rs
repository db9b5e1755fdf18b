use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub upstream: UpstreamConfig,
    pub upload: UploadConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Map upstream 404s, oversized uploads and timeouts to 404/413/504
    /// instead of the generic 500.
    pub strict_status_codes: bool,
}

/// Connection settings for the upstream assistant service
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Bearer credential sent with every upstream call
    pub api_key: String,
    /// Base URL including the version segment (e.g. `https://api.openai.com/v1`)
    pub base_url: String,
    /// Value of the `OpenAI-Beta` header required by the assistants endpoints
    pub beta_header: String,
    /// Per-call timeout; a hung upstream call fails with a timeout error
    pub request_timeout: Duration,
}

/// Local staging of multipart attachments before they are forwarded upstream
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub staging_dir: PathBuf,
    pub max_file_size: usize,
    /// Delete the uploaded file upstream when the follow-up message fails
    pub compensate_orphans: bool,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            upstream: UpstreamConfig::from_env()?,
            upload: UploadConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

fn parse_bool(name: &str, default: bool) -> Result<bool, String> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("{} must be a boolean (true/false)", name)),
        },
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let strict_status_codes = parse_bool("STRICT_STATUS_CODES", false)?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            strict_status_codes,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl UpstreamConfig {
    const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    const DEFAULT_BETA_HEADER: &'static str = "assistants=v2";
    const DEFAULT_TIMEOUT_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "OPENAI_API_KEY environment variable is required".to_string())?;

        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let beta_header =
            env::var("OPENAI_BETA_HEADER").unwrap_or_else(|_| Self::DEFAULT_BETA_HEADER.to_string());

        let timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "UPSTREAM_TIMEOUT_SECS must be a valid number".to_string())?;

        if timeout_secs == 0 {
            return Err("UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string());
        }

        Ok(Self {
            api_key,
            base_url,
            beta_header,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl UploadConfig {
    const DEFAULT_STAGING_DIR: &'static str = "./uploads";
    const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let staging_dir = PathBuf::from(
            env::var("FILE_UPLOAD_PATH").unwrap_or_else(|_| Self::DEFAULT_STAGING_DIR.to_string()),
        );

        let max_file_size = env::var("MAX_FILE_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_FILE_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_FILE_SIZE must be a valid number".to_string())?;

        if max_file_size == 0 {
            return Err("MAX_FILE_SIZE must be greater than zero".to_string());
        }

        let compensate_orphans = parse_bool("UPLOAD_COMPENSATE_ORPHANS", true)?;

        Ok(Self {
            staging_dir,
            max_file_size,
            compensate_orphans,
        })
    }

    /// Request body limit for the attachment route: the file plus multipart overhead
    pub fn body_limit(&self) -> usize {
        self.max_file_size.saturating_add(1024 * 1024)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Assistant Gateway API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "REST surface over the upstream assistants service".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials(), Some("admin:secret".to_string()));
    }

    #[test]
    fn test_upload_body_limit_adds_multipart_overhead() {
        let upload = UploadConfig {
            staging_dir: PathBuf::from("/tmp"),
            max_file_size: 10,
            compensate_orphans: true,
        };
        assert_eq!(upload.body_limit(), 10 + 1024 * 1024);
    }
}
