//! `rodio`-backed implementation of [`AudioBackend`].
//!
//! rodio has no position query that survives a rebuilt sink, so elapsed time
//! is tracked here with a start `Instant` plus time accumulated across
//! pauses. Seeking rebuilds the sink with `Source::skip_duration`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::{AudioBackend, BackendError};

pub struct RodioBackend {
    stream: OutputStream,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
    started_at: Option<Instant>,
    accumulated: Duration,
    volume: f32,
}

impl RodioBackend {
    pub fn new() -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            loaded: None,
            started_at: None,
            accumulated: Duration::ZERO,
            volume: 1.0,
        })
    }

    /// Build a paused sink for `path` starting at `start_at`.
    fn build_sink(&self, path: &Path, start_at: Duration) -> Result<Sink, BackendError> {
        let file = File::open(path).map_err(|source| BackendError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file))
            .map_err(|source| BackendError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
            .skip_duration(start_at);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        sink.pause();
        Ok(sink)
    }

    fn replace_sink(&mut self, sink: Option<Sink>) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.sink = sink;
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<(), BackendError> {
        let sink = self.build_sink(path, Duration::ZERO)?;
        self.replace_sink(Some(sink));
        self.loaded = Some(path.to_path_buf());
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            self.started_at = Some(Instant::now());
            self.accumulated = Duration::ZERO;
        }
    }

    fn play_from(&mut self, start: Duration) {
        let Some(path) = self.loaded.clone() else {
            return;
        };
        match self.build_sink(&path, start) {
            Ok(sink) => {
                sink.play();
                self.replace_sink(Some(sink));
                self.started_at = Some(Instant::now());
                self.accumulated = Duration::ZERO;
            }
            Err(e) => {
                // The file decoded at load time; losing it mid-track is rare
                // enough that going idle is the whole recovery.
                log::warn!("seek rebuild failed: {e}");
                self.stop();
            }
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        self.replace_sink(None);
        self.loaded = None;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }

    fn set_volume(&mut self, gain: f32) {
        self.volume = gain.clamp(0.0, 1.0);
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.volume);
        }
    }
}
