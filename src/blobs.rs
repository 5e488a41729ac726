use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BlobError {
  #[error("blob store returned status {0}")]
  Status(u16),
  #[error(transparent)]
  Transport(#[from] reqwest::Error),
}

/// Object storage boundary for offer images. One object per uploaded
/// image, keyed by the uploading user and a timestamp.
#[async_trait]
pub trait BlobStore: Send + Sync {
  /// Stores the image and returns its public URL.
  async fn put_object(&self, user_id: &str, content_type: &str, data: Vec<u8>) -> Result<String, BlobError>;
  /// Deletes the object the URL points at. Deleting an already-gone
  /// object is not an error.
  async fn delete_object(&self, url: &str) -> Result<(), BlobError>;
}

#[derive(Debug, Clone)]
pub struct HttpBlobStore {
  client: Client,
  base_url: String,
}

impl HttpBlobStore {
  pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }
}

fn object_key(user_id: &str, uploaded_at: DateTime<Utc>) -> String {
  format!("{user_id}-{}", uploaded_at.timestamp_millis())
}

#[async_trait]
impl BlobStore for HttpBlobStore {
  async fn put_object(&self, user_id: &str, content_type: &str, data: Vec<u8>) -> Result<String, BlobError> {
    let key = object_key(user_id, Utc::now());
    let url = format!("{}/{}", self.base_url, key);
    let size = data.len();

    let response = self
      .client
      .put(&url)
      .header(CONTENT_TYPE, content_type)
      .body(data)
      .send()
      .await?;
    let status = response.status();
    if !status.is_success() {
      return Err(BlobError::Status(status.as_u16()));
    }

    debug!(%key, size, "stored image blob");
    Ok(url)
  }

  async fn delete_object(&self, url: &str) -> Result<(), BlobError> {
    let response = self.client.delete(url).send().await?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Ok(());
    }
    if !status.is_success() {
      return Err(BlobError::Status(status.as_u16()));
    }
    debug!(url, "deleted image blob");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use chrono::Utc;

  use super::object_key;

  #[test]
  fn object_keys_combine_user_and_upload_time() {
    let uploaded_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    assert_eq!(object_key("uid-1", uploaded_at), "uid-1-1700000000000");
  }
}
