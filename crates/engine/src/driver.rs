//! Async driver running a [`ModeEngine`] on a single task.
//!
//! Host adapters forward raw signals through a [`DriverHandle`]. Signals are
//! handled one at a time, so one transition's persist -> render -> notify
//! sequence always finishes before the next signal is looked at. The
//! debounce deadline is awaited with `tokio::time::sleep_until`.

use crate::engine::{ModeEngine, SwitchOptions};
use crate::error::{EngineError, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uxmode_context::{SessionState, UxSelection};
use uxmode_events::{Observer, SubscriptionId, TransitionDetail};

/// Messages accepted by the driver.
pub enum Signal {
    /// A display-mode media query fired.
    DisplayModeChanged,
    /// OS fullscreen was entered or exited.
    FullscreenChanged,
    Switch {
        target: UxSelection,
        options: SwitchOptions,
        reply: oneshot::Sender<TransitionDetail>,
    },
    Subscribe {
        observer: Observer,
        reply: oneshot::Sender<SubscriptionId>,
    },
    Unsubscribe {
        id: SubscriptionId,
        reply: oneshot::Sender<bool>,
    },
    State {
        reply: oneshot::Sender<SessionState>,
    },
    Shutdown,
}

/// Cloneable sender side of a running driver.
#[derive(Clone)]
pub struct DriverHandle {
    tx: mpsc::UnboundedSender<Signal>,
}

impl DriverHandle {
    fn send(&self, signal: Signal) -> Result<()> {
        self.tx.send(signal).map_err(|_| EngineError::DriverStopped)
    }

    /// Forward a display-mode media query change.
    pub fn display_mode_changed(&self) -> Result<()> {
        self.send(Signal::DisplayModeChanged)
    }

    /// Forward a fullscreen enter/exit.
    pub fn fullscreen_changed(&self) -> Result<()> {
        self.send(Signal::FullscreenChanged)
    }

    /// Manually switch the UX and wait for the resulting record.
    pub async fn switch_ux(&self, target: UxSelection, options: SwitchOptions) -> Result<TransitionDetail> {
        let (reply, rx) = oneshot::channel();
        self.send(Signal::Switch {
            target,
            options,
            reply,
        })?;
        rx.await.map_err(|_| EngineError::DriverStopped)
    }

    /// Register an observer on the running engine.
    pub async fn subscribe(&self, observer: Observer) -> Result<SubscriptionId> {
        let (reply, rx) = oneshot::channel();
        self.send(Signal::Subscribe { observer, reply })?;
        rx.await.map_err(|_| EngineError::DriverStopped)
    }

    /// Remove an observer. Resolves to false if it was not registered.
    pub async fn unsubscribe(&self, id: SubscriptionId) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Signal::Unsubscribe { id, reply })?;
        rx.await.map_err(|_| EngineError::DriverStopped)
    }

    /// Snapshot of the engine's session state.
    pub async fn state(&self) -> Result<SessionState> {
        let (reply, rx) = oneshot::channel();
        self.send(Signal::State { reply })?;
        rx.await.map_err(|_| EngineError::DriverStopped)
    }

    /// Stop the driver after the signals already queued.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Signal::Shutdown)
    }
}

enum Wake {
    Signal(Option<Signal>),
    Timer,
}

/// Owns a [`ModeEngine`] and feeds it signals.
pub struct EngineDriver {
    engine: ModeEngine,
    rx: mpsc::UnboundedReceiver<Signal>,
}

impl EngineDriver {
    /// Wrap `engine` without starting it. Call [`run`](Self::run) to process signals.
    pub fn new(engine: ModeEngine) -> (Self, DriverHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { engine, rx }, DriverHandle { tx })
    }

    /// Spawn the driver on the current runtime. The task returns the engine
    /// on shutdown.
    pub fn spawn(engine: ModeEngine) -> (DriverHandle, JoinHandle<ModeEngine>) {
        let (driver, handle) = Self::new(engine);
        (handle, tokio::spawn(driver.run()))
    }

    /// Boot the engine if needed, then process signals until shutdown or
    /// until every handle is dropped.
    pub async fn run(mut self) -> ModeEngine {
        if !self.engine.is_booted() {
            self.engine.boot();
        }
        tracing::info!(state = ?self.engine.state(), "engine driver started");

        loop {
            let deadline = self.engine.pending_deadline().map(Instant::from_std);
            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            let wake = tokio::select! {
                signal = self.rx.recv() => Wake::Signal(signal),
                _ = timer => Wake::Timer,
            };

            match wake {
                Wake::Timer => {
                    self.engine.poll_timer(Instant::now().into_std());
                }
                Wake::Signal(None) | Wake::Signal(Some(Signal::Shutdown)) => break,
                Wake::Signal(Some(signal)) => self.handle(signal),
            }
        }

        tracing::info!("engine driver stopped");
        self.engine
    }

    fn handle(&mut self, signal: Signal) {
        match signal {
            Signal::DisplayModeChanged => {
                self.engine.on_display_mode_signal(Instant::now().into_std());
            }
            Signal::FullscreenChanged => {
                self.engine.on_fullscreen_signal();
            }
            Signal::Switch {
                target,
                options,
                reply,
            } => {
                let outcome = self.engine.switch_ux(target, options);
                if let Some(request) = outcome.fullscreen {
                    tokio::spawn(request.settle());
                }
                let _ = reply.send(outcome.detail);
            }
            Signal::Subscribe { observer, reply } => {
                let _ = reply.send(self.engine.subscribe_boxed(observer));
            }
            Signal::Unsubscribe { id, reply } => {
                let _ = reply.send(self.engine.unsubscribe(id));
            }
            Signal::State { reply } => {
                let _ = reply.send(self.engine.state());
            }
            Signal::Shutdown => {}
        }
    }
}
