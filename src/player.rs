//! Preview clip playback.
//!
//! Playback is a single-slot resource: [`PreviewPlayer`] holds at most one
//! [`PlaybackHandle`] and stops the current clip before it starts the next.

use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::{Res, SpotiviewError, config, debug};

/// A clip that is (or was) playing.
pub trait PlaybackHandle: Send {
    /// URL of the clip this handle plays.
    fn source(&self) -> &str;

    /// Stops playback and releases the underlying resource.
    fn stop(&mut self) -> Res<()>;

    /// Returns true once the clip has played to the end.
    fn is_finished(&mut self) -> bool;
}

/// Starts playback of a preview URL.
pub trait PlaybackBackend {
    type Handle: PlaybackHandle;

    fn start(&self, url: &str) -> Res<Self::Handle>;
}

pub struct PreviewPlayer<B: PlaybackBackend> {
    backend: B,
    current: Option<B::Handle>,
}

impl<B: PlaybackBackend> PreviewPlayer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Plays `url`, stopping whatever was playing before.
    pub fn play(&mut self, url: &str) -> Res<()> {
        self.stop()?;
        self.current = Some(self.backend.start(url)?);
        Ok(())
    }

    /// Stops `url` if it is the clip playing, otherwise plays it.
    ///
    /// Returns whether a clip is playing afterwards.
    pub fn toggle(&mut self, url: &str) -> Res<bool> {
        if self.current_source() == Some(url) {
            self.stop()?;
            return Ok(false);
        }
        self.play(url)?;
        Ok(true)
    }

    /// Stops the current clip, if any.
    pub fn stop(&mut self) -> Res<()> {
        match self.current.take() {
            Some(mut handle) => handle.stop(),
            None => Ok(()),
        }
    }

    /// Returns true while a clip is playing. Finished clips release the slot.
    pub fn is_playing(&mut self) -> bool {
        if self.current.as_mut().is_some_and(|h| h.is_finished()) {
            self.current = None;
        }
        self.current.is_some()
    }

    pub fn current_source(&self) -> Option<&str> {
        self.current.as_ref().map(|h| h.source())
    }
}

/// Plays clips through an external command line player.
pub struct ProcessBackend {
    program: String,
    args: Vec<String>,
}

impl ProcessBackend {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Uses the `PREVIEW_PLAYER` command line.
    pub fn from_env() -> Res<Self> {
        let mut parts = config::preview_player().into_iter();
        let program = parts
            .next()
            .ok_or_else(|| SpotiviewError::Config("PREVIEW_PLAYER is empty".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }
}

pub struct ProcessHandle {
    source: String,
    child: Child,
}

impl PlaybackHandle for ProcessHandle {
    fn source(&self) -> &str {
        &self.source
    }

    fn stop(&mut self) -> Res<()> {
        if self.is_finished() {
            return Ok(());
        }
        self.child
            .start_kill()
            .map_err(|e| SpotiviewError::Playback(e.to_string()))
    }

    fn is_finished(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }
}

impl PlaybackBackend for ProcessBackend {
    type Handle = ProcessHandle;

    fn start(&self, url: &str) -> Res<ProcessHandle> {
        debug!("{} {}", self.program, url);
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpotiviewError::Playback(format!("cannot start {}: {}", self.program, e)))?;

        Ok(ProcessHandle {
            source: url.to_string(),
            child,
        })
    }
}
