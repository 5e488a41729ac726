use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::db::Db;
use crate::models::UserRow;

/// Auth/session state observed by the rest of the application.
///
/// Lifecycle: `Unknown` until the first event arrives, then either
/// `SignedIn` (profile attached when the profile document exists) or
/// `SignedOut`, until the session is torn down.
#[derive(Debug, Clone)]
pub enum AuthState {
  Unknown,
  SignedOut,
  SignedIn {
    user_id: String,
    profile: Option<UserRow>,
  },
}

impl AuthState {
  pub fn is_authenticated(&self) -> bool {
    matches!(self, Self::SignedIn { .. })
  }
}

#[derive(Debug, Clone)]
pub enum AuthEvent {
  SignedIn(String),
  SignedOut,
}

/// Where the session worker loads user profiles from on sign-in.
#[async_trait]
pub trait ProfileSource: Send + Sync {
  async fn load_profile(&self, user_id: &str) -> anyhow::Result<Option<UserRow>>;
}

#[async_trait]
impl ProfileSource for Db {
  async fn load_profile(&self, user_id: &str) -> anyhow::Result<Option<UserRow>> {
    Ok(self.get_user(user_id).await?)
  }
}

/// Process-wide session: one worker task consumes auth events and
/// publishes the resulting state on a watch channel. Owned by the
/// application root and torn down explicitly on shutdown.
pub struct Session {
  state_rx: watch::Receiver<AuthState>,
  events_tx: mpsc::UnboundedSender<AuthEvent>,
  worker: JoinHandle<()>,
}

impl Session {
  pub fn start(profiles: Arc<dyn ProfileSource>) -> Self {
    let (state_tx, state_rx) = watch::channel(AuthState::Unknown);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let worker = tokio::spawn(async move {
      while let Some(event) = events_rx.recv().await {
        let next = match event {
          AuthEvent::SignedOut => AuthState::SignedOut,
          AuthEvent::SignedIn(user_id) => {
            let profile = match profiles.load_profile(&user_id).await {
              Ok(profile) => profile,
              Err(error) => {
                warn!(%user_id, %error, "failed to load user profile");
                None
              },
            };
            AuthState::SignedIn { user_id, profile }
          },
        };
        if state_tx.send(next).is_err() {
          break;
        }
      }
    });

    Self {
      state_rx,
      events_tx,
      worker,
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<AuthState> {
    self.state_rx.clone()
  }

  pub fn state(&self) -> AuthState {
    self.state_rx.borrow().clone()
  }

  pub fn notify(&self, event: AuthEvent) {
    if self.events_tx.send(event).is_err() {
      warn!("session worker is no longer running");
    }
  }

  /// Tears the subscription down: closes the event channel and waits for
  /// the worker to drain.
  pub async fn shutdown(self) {
    drop(self.events_tx);
    let _ = self.worker.await;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use async_trait::async_trait;
  use chrono::Utc;

  use super::AuthEvent;
  use super::AuthState;
  use super::ProfileSource;
  use super::Session;
  use crate::models::UserRow;

  struct StubProfiles;

  #[async_trait]
  impl ProfileSource for StubProfiles {
    async fn load_profile(&self, user_id: &str) -> anyhow::Result<Option<UserRow>> {
      if user_id == "missing" {
        return Ok(None);
      }
      Ok(Some(UserRow {
        user_id: user_id.to_string(),
        first_name: "Anna".to_string(),
        last_name: "Jensen".to_string(),
        email: "anna@example.com".to_string(),
        phone_number: "12345678".to_string(),
        profile_url: None,
        saved_offers: Vec::new(),
        created_at: Utc::now(),
      }))
    }
  }

  #[tokio::test]
  async fn sign_in_event_publishes_profile_state() {
    let session = Session::start(Arc::new(StubProfiles));
    let mut rx = session.subscribe();
    assert!(matches!(*rx.borrow(), AuthState::Unknown));

    session.notify(AuthEvent::SignedIn("uid-1".to_string()));
    rx.changed().await.unwrap();
    match &*rx.borrow() {
      AuthState::SignedIn { user_id, profile } => {
        assert_eq!(user_id, "uid-1");
        assert_eq!(profile.as_ref().unwrap().first_name, "Anna");
      },
      other => panic!("expected signed-in state, got {other:?}"),
    }
    assert!(session.state().is_authenticated());

    session.notify(AuthEvent::SignedOut);
    rx.changed().await.unwrap();
    assert!(matches!(*rx.borrow(), AuthState::SignedOut));

    session.shutdown().await;
  }

  #[tokio::test]
  async fn missing_profile_still_counts_as_authenticated() {
    let session = Session::start(Arc::new(StubProfiles));
    let mut rx = session.subscribe();

    session.notify(AuthEvent::SignedIn("missing".to_string()));
    rx.changed().await.unwrap();
    match &*rx.borrow() {
      AuthState::SignedIn { profile, .. } => assert!(profile.is_none()),
      other => panic!("expected signed-in state, got {other:?}"),
    }

    session.shutdown().await;
  }
}
