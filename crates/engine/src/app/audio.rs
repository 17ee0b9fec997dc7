use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;
use tracing::warn;

use super::assets::TrackData;

/// Transport controls for a single looping music track.
pub trait AudioPlayer {
    fn play(&mut self);
    fn pause(&mut self);
    fn rewind(&mut self);
    fn is_playing(&self) -> bool;
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    OutputStream(#[source] rodio::StreamError),
    #[error("failed to create audio sink: {0}")]
    Sink(#[source] rodio::PlayError),
}

/// A track played through the default output device.
pub struct MusicTrack {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Sink,
    data: TrackData,
}

impl MusicTrack {
    /// Opens the default output device and queues `data` paused at the start.
    pub fn open(data: TrackData) -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default().map_err(AudioError::OutputStream)?;
        let sink = queued_sink(&handle, &data)?;
        Ok(Self {
            _stream: stream,
            handle,
            sink,
            data,
        })
    }
}

fn queued_sink(handle: &OutputStreamHandle, data: &TrackData) -> Result<Sink, AudioError> {
    let sink = Sink::try_new(handle).map_err(AudioError::Sink)?;
    sink.pause();
    match Decoder::new(data.cursor()) {
        Ok(source) => sink.append(source),
        Err(error) => warn!(track = data.name(), error = %error, "track_decode_failed"),
    }
    Ok(sink)
}

impl AudioPlayer for MusicTrack {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn rewind(&mut self) {
        let was_playing = self.is_playing();
        match queued_sink(&self.handle, &self.data) {
            Ok(sink) => {
                self.sink.stop();
                self.sink = sink;
                if was_playing {
                    self.sink.play();
                }
            }
            Err(error) => warn!(track = self.data.name(), error = %error, "track_rewind_failed"),
        }
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }
}

/// Player with no output. Tracks transport state so callers behave the same without a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SilentTrack {
    playing: bool,
    finished: bool,
    rewinds: u32,
}

impl SilentTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the track reaching its end.
    pub fn finish(&mut self) {
        self.playing = false;
        self.finished = true;
    }

    pub fn rewind_count(&self) -> u32 {
        self.rewinds
    }
}

impl AudioPlayer for SilentTrack {
    fn play(&mut self) {
        if !self.finished {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn rewind(&mut self) {
        self.finished = false;
        self.rewinds += 1;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_track_follows_transport() {
        let mut track = SilentTrack::new();
        assert!(!track.is_playing());
        track.play();
        assert!(track.is_playing());
        track.pause();
        assert!(!track.is_playing());
    }

    #[test]
    fn finished_track_needs_rewind_to_play() {
        let mut track = SilentTrack::new();
        track.play();
        track.finish();
        track.play();
        assert!(!track.is_playing());

        track.rewind();
        track.play();
        assert!(track.is_playing());
        assert_eq!(track.rewind_count(), 1);
    }
}
