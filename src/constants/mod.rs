pub struct Env {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub refresh_token_expiration: u64,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub bid_ttl_days: i64,
    /// `0` keeps expiry purely lazy.
    pub expiry_sweep_interval_secs: u64,
    pub push_gateway_url: Option<String>,
    pub push_gateway_api_key: Option<String>,
    pub upload_dir: String,
    pub upload_base_url: String,
    pub max_upload_size_mb: usize,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: &str) -> T {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>()))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");

        let access_token_expiration = parsed_or("ACCESS_TOKEN_EXPIRATION", "900");
        let refresh_token_expiration = parsed_or("REFRESH_TOKEN_EXPIRATION", "604800");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");
        let redis_url = std::env::var("REDIS_URL")
            .expect("REDIS_URL must be set in .env file or environment variable");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed_or("PORT", "8080");

        let bid_ttl_days = parsed_or("BID_TTL_DAYS", "7");
        let expiry_sweep_interval_secs = parsed_or("EXPIRY_SWEEP_INTERVAL_SECS", "0");

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());
        let upload_base_url =
            std::env::var("UPLOAD_BASE_URL").unwrap_or_else(|_| "/uploads".to_string());
        let max_upload_size_mb = parsed_or("MAX_UPLOAD_SIZE_MB", "100");

        Env {
            jwt_secret,
            access_token_expiration,
            refresh_token_expiration,
            database_url,
            redis_url,
            frontend_url,
            ip,
            port,
            bid_ttl_days,
            expiry_sweep_interval_secs,
            push_gateway_url: optional("PUSH_GATEWAY_URL"),
            push_gateway_api_key: optional("PUSH_GATEWAY_API_KEY"),
            upload_dir,
            upload_base_url,
            max_upload_size_mb,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
