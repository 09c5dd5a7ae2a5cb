//! The rotation runner: an isolated task that owns one active session.
//!
//! Each started session runs in its own Tokio task, communicating with
//! the handle through channels — no shared mutable session state. The
//! runner owns the rotation clock, so stopping the task is the only
//! thing required to stop the timer.
//!
//! # Divergence tolerance
//!
//! A rotation write can fail while the QR screen keeps refreshing. The
//! policy here: the in-memory token NEVER advances ahead of the store.
//! On a failed write the runner keeps serving the last *acknowledged*
//! token and flags itself degraded on the view channel; scans against
//! the stale-but-acknowledged token still verify, because verification
//! reads the store's value. Degraded clears on the next successful ack.

use std::sync::Arc;

use rollcall_rotation::{next_token, ClockTick, RotationClock};
use rollcall_types::{ClassId, Session, SessionId, StoreError};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::manager::bounded;
use crate::{SessionConfig, SessionError, SessionStore};

/// What the QR view renders: published on a watch channel every
/// countdown tick and on every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub session_id: SessionId,
    pub class_id: ClassId,
    /// The last store-acknowledged token — the value to encode.
    pub token: String,
    pub seconds_remaining: u32,
    /// True while rotation writes are failing. The UI surfaces this
    /// instead of silently showing a token the store never saw.
    pub degraded: bool,
    pub active: bool,
}

/// Commands sent to a runner through its channel.
enum RunnerCommand {
    Stop {
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Session>,
    },
}

/// Handle to a running session. Owns the runner's lifetime: dropping
/// the last handle stops rotation and deactivates the session.
pub struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<RunnerCommand>,
    view: watch::Receiver<SessionView>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// A receiver for the live QR view (token, countdown, degraded).
    pub fn view(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// Current in-memory session snapshot.
    ///
    /// # Errors
    /// [`SessionError::Stopped`] if the runner has already shut down.
    pub async fn snapshot(&self) -> Result<Session, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RunnerCommand::Snapshot { reply: tx })
            .await
            .map_err(|_| SessionError::Stopped)?;
        rx.await.map_err(|_| SessionError::Stopped)
    }

    /// Stops the session: halts rotation and deactivates the stored
    /// record. Idempotent — stopping an already-stopped session is a
    /// no-op, not an error.
    pub async fn stop(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        if self
            .sender
            .send(RunnerCommand::Stop { reply: tx })
            .await
            .is_err()
        {
            // Runner already gone — it deactivated on its way out.
            return Ok(());
        }
        rx.await.unwrap_or(Ok(()))
    }
}

/// The runner state. Lives inside its own Tokio task.
struct SessionRunner<S> {
    session: Session,
    store: Arc<S>,
    config: SessionConfig,
    clock: RotationClock,
    degraded: bool,
    view_tx: watch::Sender<SessionView>,
    receiver: mpsc::Receiver<RunnerCommand>,
}

impl<S: SessionStore> SessionRunner<S> {
    async fn run(mut self) {
        info!(session_id = %self.session.id, "rotation runner started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(RunnerCommand::Stop { reply }) => {
                        let result = self.shutdown().await;
                        let _ = reply.send(result);
                        break;
                    }
                    Some(RunnerCommand::Snapshot { reply }) => {
                        let _ = reply.send(self.session.clone());
                    }
                    // All handles dropped (admin navigated away):
                    // stop deterministically, same as an explicit stop.
                    None => {
                        if let Err(err) = self.shutdown().await {
                            warn!(
                                session_id = %self.session.id,
                                error = %err,
                                "deactivation on handle drop failed"
                            );
                        }
                        break;
                    }
                },
                tick = self.clock.wait_for_tick() => match tick {
                    ClockTick::Countdown { remaining } => self.publish(remaining),
                    ClockTick::Rotate => self.rotate().await,
                },
            }
        }

        info!(session_id = %self.session.id, "rotation runner stopped");
    }

    /// One rotation: generate, persist, and only then adopt.
    async fn rotate(&mut self) {
        let token = next_token();
        match self.persist_token(&token).await {
            Ok(rotated_at) => {
                self.session.current_token = token;
                self.session.last_rotation_at = rotated_at;
                if self.degraded {
                    info!(
                        session_id = %self.session.id,
                        "rotation writes recovered"
                    );
                }
                self.degraded = false;
                debug!(session_id = %self.session.id, "token rotated");
            }
            Err(err) => {
                self.degraded = true;
                warn!(
                    session_id = %self.session.id,
                    error = %err,
                    "rotation write failed, keeping last acknowledged token"
                );
            }
        }
        self.publish(self.clock.seconds_remaining());
    }

    /// Writes the token with the bounded timeout, retrying up to the
    /// configured attempt count.
    async fn persist_token(&self, token: &str) -> Result<chrono::DateTime<chrono::Utc>, StoreError> {
        let mut last_err = StoreError::Timeout;
        for attempt in 1..=self.config.persist_attempts {
            match bounded(
                self.config.store_timeout,
                self.store.update_token(&self.session.id, token),
            )
            .await
            {
                Ok(rotated_at) => return Ok(rotated_at),
                Err(err) if err.is_retryable() => {
                    debug!(
                        session_id = %self.session.id,
                        attempt,
                        error = %err,
                        "rotation write attempt failed"
                    );
                    last_err = err;
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err)
    }

    async fn shutdown(&mut self) -> Result<(), SessionError> {
        if !self.session.active {
            return Ok(());
        }
        bounded(
            self.config.store_timeout,
            self.store.deactivate(&self.session.id),
        )
        .await?;
        self.session.active = false;
        self.publish(0);
        info!(session_id = %self.session.id, "attendance session stopped");
        Ok(())
    }

    fn publish(&self, seconds_remaining: u32) {
        let _ = self.view_tx.send(SessionView {
            session_id: self.session.id.clone(),
            class_id: self.session.class_id.clone(),
            token: self.session.current_token.clone(),
            seconds_remaining,
            degraded: self.degraded,
            active: self.session.active,
        });
    }
}

/// Spawns the runner task for a freshly created session.
pub(crate) fn spawn_runner<S: SessionStore>(
    session: Session,
    store: Arc<S>,
    config: SessionConfig,
) -> SessionHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let clock = RotationClock::new(config.rotation.clone());
    let (view_tx, view_rx) = watch::channel(SessionView {
        session_id: session.id.clone(),
        class_id: session.class_id.clone(),
        token: session.current_token.clone(),
        seconds_remaining: clock.seconds_remaining(),
        degraded: false,
        active: true,
    });

    let session_id = session.id.clone();
    let runner = SessionRunner {
        session,
        store,
        config,
        clock,
        degraded: false,
        view_tx,
        receiver: cmd_rx,
    };
    tokio::spawn(runner.run());

    SessionHandle {
        session_id,
        sender: cmd_tx,
        view: view_rx,
    }
}
