use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub upload_dir: String,
    pub remember_ttl_days: i64,
    pub session_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let upload_dir =
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads".into());
        let remember_ttl_days = std::env::var("REMEMBER_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(14);
        let session_secure = std::env::var("SESSION_SECURE")
            .map(|v| v == "true")
            .unwrap_or(false);
        Ok(Self {
            database_url,
            upload_dir,
            remember_ttl_days,
            session_secure,
        })
    }
}
