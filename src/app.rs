use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthClient;
use crate::auth::AuthError;
use crate::auth::Registration;
use crate::auth::validate_registration;
use crate::blobs::BlobStore;
use crate::blobs::HttpBlobStore;
use crate::config::Config;
use crate::db::Db;
use crate::db::StoreError;
use crate::geo::GeoClient;
use crate::models::UserRow;
use crate::session::AuthEvent;
use crate::session::Session;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Auth(#[from] AuthError),
  #[error(transparent)]
  Store(#[from] StoreError),
}

impl AppError {
  pub fn user_message(&self) -> String {
    match self {
      Self::Auth(error) => error.user_message(),
      Self::Store(error) => error.user_message(),
    }
  }
}

/// Application root: owns the store, the service clients and the single
/// session subscription. Screens receive this by reference instead of
/// reaching for process-wide mutable state.
pub struct App {
  db: Db,
  auth: AuthClient,
  geo: GeoClient,
  blobs: Arc<dyn BlobStore>,
  session: Session,
}

impl App {
  pub async fn connect(config: &Config) -> anyhow::Result<Self> {
    let db = Db::connect(&config.database_url).await?;
    let auth = AuthClient::new(&config.auth_api_url, &config.auth_api_key)?;
    let geo = GeoClient::new(&config.geo_api_url)?;
    let blobs: Arc<dyn BlobStore> = Arc::new(HttpBlobStore::new(&config.blob_store_url)?);
    let session = Session::start(Arc::new(db.clone()));
    info!("application connected");
    Ok(Self {
      db,
      auth,
      geo,
      blobs,
      session,
    })
  }

  pub fn db(&self) -> &Db {
    &self.db
  }

  pub fn geo(&self) -> &GeoClient {
    &self.geo
  }

  pub fn blobs(&self) -> &dyn BlobStore {
    self.blobs.as_ref()
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AppError> {
    let account = self.auth.sign_in(email, password).await?;
    self.session.notify(AuthEvent::SignedIn(account.user_id));
    Ok(())
  }

  /// Creates the provider account, then the profile document, then flips
  /// the session to signed-in.
  pub async fn register(&self, registration: &Registration) -> Result<(), AppError> {
    validate_registration(registration)?;
    let account = self.auth.sign_up(&registration.email, &registration.password).await?;
    let profile = UserRow {
      user_id: account.user_id.clone(),
      first_name: registration.first_name.clone(),
      last_name: registration.last_name.clone(),
      email: registration.email.clone(),
      phone_number: registration.phone_number.clone(),
      profile_url: None,
      saved_offers: Vec::new(),
      created_at: Utc::now(),
    };
    self.db.create_user_profile(&profile).await?;
    self.session.notify(AuthEvent::SignedIn(account.user_id));
    Ok(())
  }

  pub fn sign_out(&self) {
    self.session.notify(AuthEvent::SignedOut);
  }

  pub async fn reset_password(&self, email: &str) -> Result<(), AppError> {
    self.auth.send_password_reset(email).await?;
    Ok(())
  }

  /// Ownership-checked delete, with best-effort image cleanup through the
  /// blob store this app was wired with.
  pub async fn delete_offer(&self, offer_id: Uuid, user_id: &str) -> Result<(), AppError> {
    self.db.delete_offer(offer_id, user_id, self.blobs.as_ref()).await?;
    Ok(())
  }

  /// Explicit teardown of the session subscription at process exit.
  pub async fn shutdown(self) {
    self.session.shutdown().await;
  }
}
