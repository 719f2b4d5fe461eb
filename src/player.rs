use std::{
    ffi::OsString,
    process::{Child, Command, Stdio},
};

use log::{debug, warn};

use crate::{AppError, library::TrackSource};

/// Audio output. A failing `load_and_play` leaves the player silent, it is
/// never fatal to the caller.
pub trait Player: std::fmt::Debug {
    fn load_and_play(&mut self, source: &TrackSource) -> Result<(), AppError>;
    fn stop(&mut self);
}

/// Plays tracks by running an external `mpv` process, which handles both local
/// files and HTTP downloads.
#[derive(Debug)]
pub struct MpvPlayer {
    program: OsString,
    child: Option<Child>,
}

impl Default for MpvPlayer {
    fn default() -> Self {
        Self::with_program("mpv")
    }
}

impl MpvPlayer {
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            child: None,
        }
    }

    #[cfg(test)]
    fn is_running(&mut self) -> bool {
        matches!(self.child.as_mut().map(Child::try_wait), Some(Ok(None)))
    }
}

impl Player for MpvPlayer {
    fn load_and_play(&mut self, source: &TrackSource) -> Result<(), AppError> {
        self.stop();

        let mut cmd = Command::new(&self.program);
        cmd.arg("--no-video")
            .arg("--really-quiet")
            .arg("--force-window=no");
        match source {
            TrackSource::Local(path) => cmd.arg(path),
            TrackSource::Remote(url) => cmd.arg(url),
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        debug!("starting playback{}", if source.is_remote() { " of remote track" } else { "" });
        let child = cmd.spawn().map_err(|e| {
            warn!("could not start {:?}: {e}", self.program);
            AppError::Playback(e.to_string())
        })?;
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
