//! Sound player implementation using rodio.
//!
//! The rodio output stream cannot leave the thread that opened it, so
//! `RodioSoundPlayer` owns a dedicated audio thread and forwards play
//! requests to it over a channel. Callers never block on playback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;

/// Chime pitch in Hz.
const CHIME_FREQUENCY: f32 = 880.0;

/// Chime length.
const CHIME_DURATION: Duration = Duration::from_millis(350);

/// A queued playback request.
#[derive(Debug)]
struct PlayRequest {
    source: SoundSource,
    gain: f32,
}

/// A sound player backed by a rodio output stream on its own thread.
pub struct RodioSoundPlayer {
    requests: Sender<PlayRequest>,
}

impl RodioSoundPlayer {
    /// Opens the default output device and starts the audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (requests, inbox) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        thread::Builder::new()
            .name("pomofocus-audio".to_string())
            .spawn(move || audio_thread(inbox, ready_tx))
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))??;

        debug!("Audio output thread started");
        Ok(Self { requests })
    }

    /// Queues `source` for playback at `volume` (0-100).
    ///
    /// # Errors
    ///
    /// Returns `SoundError::PlaybackError` if the audio thread has exited.
    pub fn play(&self, source: &SoundSource, volume: u32) -> Result<(), SoundError> {
        self.requests
            .send(PlayRequest {
                source: source.clone(),
                gain: volume_to_gain(volume),
            })
            .map_err(|_| SoundError::PlaybackError("audio thread has stopped".to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("queued", &self.requests.len())
            .finish()
    }
}

/// Converts a 0-100 volume into a sink gain.
pub(crate) fn volume_to_gain(volume: u32) -> f32 {
    volume.min(100) as f32 / 100.0
}

fn audio_thread(inbox: Receiver<PlayRequest>, ready: Sender<Result<(), SoundError>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    // Exits once every RodioSoundPlayer handle is dropped.
    for request in inbox.iter() {
        if let Err(e) = play_on(&handle, &request) {
            warn!("Failed to play '{}': {}", request.source.name(), e);
        }
    }
    debug!("Audio output thread stopped");
}

fn play_on(handle: &OutputStreamHandle, request: &PlayRequest) -> Result<(), SoundError> {
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;
    sink.set_volume(request.gain);

    match &request.source {
        SoundSource::System { name, path } => match open_decoder(path) {
            Ok(decoder) => sink.append(decoder),
            Err(e) if e.should_fallback_to_chime() => {
                warn!("Cannot play system sound '{}': {}, using chime", name, e);
                sink.append(chime());
            }
            Err(e) => return Err(e),
        },
        SoundSource::Chime => sink.append(chime()),
    }

    sink.detach();
    debug!("Sound playback started (detached)");
    Ok(())
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

fn chime() -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(CHIME_FREQUENCY)
        .take_duration(CHIME_DURATION)
        .fade_in(Duration::from_millis(10))
        .amplify(0.4)
}
