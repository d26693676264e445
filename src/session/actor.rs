//! Single owner of a [`BuildSession`].
//!
//! Every read or mutation of the edit-state is a message to one task, so the
//! state is only ever touched from one logical thread. Saving runs inside
//! the actor; packaging runs on a separate task and reports back through an
//! internal channel. Build state is published on a `watch` channel.

use super::{BuildSession, EditState};
use crate::build::{BuildDispatcher, BuildReport, BuildState, PackageRequest, Packager, run_packager};
use crate::descriptor::SaveDescriptorResult;
use crate::error::{ConfigError, PackagingError, Result};
use crate::project::ProjectLocation;
use crate::resources::IconStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

const COMMAND_BUFFER: usize = 32;

/// Edit applied inside the actor
pub type EditFn = Box<dyn FnOnce(&mut EditState) + Send>;

/// Requests understood by the session actor
pub enum SessionCommand {
    /// Change the edit-state
    Update(EditFn, oneshot::Sender<()>),
    /// Copy of the current edit-state
    Snapshot(oneshot::Sender<EditState>),
    /// Unsaved-changes check
    IsDirty(oneshot::Sender<bool>),
    /// Validate and persist
    Save(oneshot::Sender<Result<SaveDescriptorResult>>),
    /// Promote a loose script into a project
    Promote(oneshot::Sender<Result<ProjectLocation>>),
    /// Save then start packaging; replies `false` when a build is already running
    Build(oneshot::Sender<Result<bool>>),
    /// Return a finished build to idle
    Acknowledge(oneshot::Sender<bool>),
    /// Stop the actor and hand the session back
    Close(oneshot::Sender<BuildSession>),
}

/// Cheap, cloneable access to a session actor
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<BuildState>,
}

impl SessionHandle {
    /// Move `session` onto its own task
    pub fn spawn<I, P>(session: BuildSession, icons: I, packager: P) -> Self
    where
        I: IconStore + Send + Sync + 'static,
        P: Packager + Send + Sync + 'static,
    {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(BuildState::Idle);

        let actor = SessionActor {
            session,
            icons,
            packager: Arc::new(packager),
            dispatcher: BuildDispatcher::new(),
            state_tx,
            results_tx,
        };
        tokio::spawn(actor.run(commands_rx, results_rx));

        Self {
            commands: commands_tx,
            state: state_rx,
        }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| ConfigError::SessionClosed)?;
        rx.await.map_err(|_| ConfigError::SessionClosed)
    }

    /// Apply `edit` to the live edit-state
    pub async fn update(&self, edit: impl FnOnce(&mut EditState) + Send + 'static) -> Result<()> {
        self.request(|reply| SessionCommand::Update(Box::new(edit), reply))
            .await
    }

    /// Current edit-state
    pub async fn snapshot(&self) -> Result<EditState> {
        self.request(SessionCommand::Snapshot).await
    }

    /// Whether there are unsaved edits
    pub async fn is_dirty(&self) -> Result<bool> {
        self.request(SessionCommand::IsDirty).await
    }

    /// Validate and persist the edits
    pub async fn save(&self) -> Result<SaveDescriptorResult> {
        self.request(SessionCommand::Save).await?
    }

    /// Promote the loose script into a project
    pub async fn promote(&self) -> Result<ProjectLocation> {
        self.request(SessionCommand::Promote).await?
    }

    /// Request a build; `Ok(false)` when one is already running
    pub async fn build(&self) -> Result<bool> {
        self.request(SessionCommand::Build).await?
    }

    /// Return a finished build to idle
    pub async fn acknowledge(&self) -> Result<bool> {
        self.request(SessionCommand::Acknowledge).await
    }

    /// Latest published build state
    pub fn build_state(&self) -> BuildState {
        self.state.borrow().clone()
    }

    /// Wait until no build is running and return the state it settled in
    pub async fn wait_for_build(&self) -> Result<BuildState> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| !s.is_building())
            .await
            .map_err(|_| ConfigError::SessionClosed)?;
        Ok(settled.clone())
    }

    /// Stop the actor and take the session back
    pub async fn close(self) -> Result<BuildSession> {
        self.request(SessionCommand::Close).await
    }
}

struct SessionActor<I, P> {
    session: BuildSession,
    icons: I,
    packager: Arc<P>,
    dispatcher: BuildDispatcher,
    state_tx: watch::Sender<BuildState>,
    results_tx: mpsc::UnboundedSender<std::result::Result<BuildReport, PackagingError>>,
}

impl<I, P> SessionActor<I, P>
where
    I: IconStore + Send + Sync + 'static,
    P: Packager + Send + Sync + 'static,
{
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut results: mpsc::UnboundedReceiver<std::result::Result<BuildReport, PackagingError>>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.handle(command).await {
                        break;
                    }
                }
                Some(outcome) = results.recv() => {
                    self.dispatcher.finish(outcome);
                    self.publish();
                }
            }
        }
        log::debug!("Session actor stopped");
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.dispatcher.state().clone());
    }

    /// Returns `false` when the actor should stop
    async fn handle(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Update(edit, reply) => {
                edit(self.session.edit_mut());
                let _ = reply.send(());
            }
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.session.edit().clone());
            }
            SessionCommand::IsDirty(reply) => {
                let _ = reply.send(self.session.is_dirty());
            }
            SessionCommand::Save(reply) => {
                let _ = reply.send(self.session.save(&self.icons).await);
            }
            SessionCommand::Promote(reply) => {
                let outcome = self
                    .session
                    .promote(&self.icons)
                    .await
                    .map(|promotion| promotion.location);
                let _ = reply.send(outcome);
            }
            SessionCommand::Build(reply) => {
                let _ = reply.send(self.start_build().await);
            }
            SessionCommand::Acknowledge(reply) => {
                let changed = self.dispatcher.acknowledge();
                if changed {
                    self.publish();
                }
                let _ = reply.send(changed);
            }
            SessionCommand::Close(reply) => {
                let _ = reply.send(self.session.clone());
                return false;
            }
        }
        true
    }

    async fn start_build(&mut self) -> Result<bool> {
        let Some(started_at) = self.dispatcher.begin() else {
            return Ok(false);
        };
        self.publish();

        let saved = match self.session.save(&self.icons).await {
            Ok(saved) => saved,
            Err(e) => {
                self.dispatcher.fail(e.to_string());
                self.publish();
                return Err(e);
            }
        };

        let request = PackageRequest {
            descriptor: self.session.last_saved().cloned().unwrap_or_default(),
            descriptor_path: saved.path,
            project_dir: self.session.layout().directory().to_path_buf(),
        };
        let packager = Arc::clone(&self.packager);
        let results = self.results_tx.clone();
        tokio::spawn(async move {
            let outcome = run_packager(packager.as_ref(), &request, started_at).await;
            let _ = results.send(outcome);
        });

        Ok(true)
    }
}
