use anyhow::Context;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use axum::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Fetches an object; `Ok(None)` when the key does not exist.
    async fn get_object(&self, key: &str) -> anyhow::Result<Option<Bytes>>;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    pub async fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn get_object(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        let res = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let out = match res {
            Ok(out) => out,
            Err(e) => {
                if e.as_service_error().map(|se| se.is_no_such_key()) == Some(true) {
                    return Ok(None);
                }
                return Err(e).context("s3 get_object");
            }
        };

        let data = out.body.collect().await.context("collect object body")?;
        Ok(Some(data.into_bytes()))
    }
}
