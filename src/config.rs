use serde::Deserialize;

pub const DATABASE_URL: &str = "sqlite://posts.db?mode=rwc";
pub const DOWNLOAD_PATH: &str = "static/files/cheat_sheet.pdf";

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
    pub flash_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub download_path: String,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("SECRET_KEY must be set"))?;
        if secret.is_empty() {
            anyhow::bail!("SECRET_KEY must not be empty");
        }
        Ok(Self {
            database_url: DATABASE_URL.into(),
            download_path: DOWNLOAD_PATH.into(),
            session: SessionConfig {
                secret,
                issuer: "secretsite".into(),
                ttl_minutes: 60 * 24,
                flash_ttl_minutes: 5,
            },
        })
    }
}
