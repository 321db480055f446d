use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LineConfig {
    pub channel_secret: String,
    pub channel_access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinioConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub line: LineConfig,
    pub minio: MinioConfig,
    pub classifier_url: String,
    /// Public URL of the web frontend, used for "view on website" buttons.
    pub web_base_url: String,
    /// Public URL that serves bucket objects, used for flex hero images.
    pub media_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let line = LineConfig {
            channel_secret: std::env::var("LINE_CHANNEL_SECRET")?,
            channel_access_token: std::env::var("LINE_CHANNEL_ACCESS_TOKEN")?,
        };
        let minio = MinioConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")?,
            bucket: std::env::var("MINIO_BUCKET_NAME").unwrap_or_else(|_| "veg-data-bucket".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY")?,
        };
        Ok(Self {
            database_url,
            line,
            minio,
            classifier_url: std::env::var("CLASSIFIER_URL")
                .unwrap_or_else(|_| "http://localhost:7000".into()),
            web_base_url: std::env::var("WEB_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000".into()),
            media_base_url: std::env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
        })
    }
}
