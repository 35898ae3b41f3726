//! Audio system for background music and sound effects

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    SelectMove,
    SelectConfirm,
    SelectBack,
    Lock,
    Clear,
    Chain,
    LevelUp,
    GameOver,
}

impl Sfx {
    fn filename(&self) -> &'static str {
        match self {
            Sfx::SelectMove => "select_move.wav",
            Sfx::SelectConfirm => "select_confirm.wav",
            Sfx::SelectBack => "select_back.wav",
            Sfx::Lock => "lock.wav",
            Sfx::Clear => "clear.wav",
            Sfx::Chain => "chain.wav",
            Sfx::LevelUp => "level_up.wav",
            Sfx::GameOver => "game_over.wav",
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BgmTrack {
    Pulse,
    Drift,
}

impl BgmTrack {
    fn filename(&self) -> &'static str {
        match self {
            BgmTrack::Pulse => "pulse.wav",
            BgmTrack::Drift => "drift.wav",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BgmTrack::Pulse => "Pulse",
            BgmTrack::Drift => "Drift",
        }
    }
}

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    bgm_sink: Option<Sink>,
    assets_path: PathBuf,
    bgm_volume: f32,
    sfx_volume: f32,
    current_bgm: Option<BgmTrack>,
}

impl AudioManager {
    /// Create a new audio manager; None when no output device or assets
    /// are available (the game runs silently)
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = OutputStream::try_default().ok()?;
        let assets_path = Self::find_assets_path()?;

        Some(Self {
            _stream: stream,
            stream_handle,
            bgm_sink: None,
            assets_path,
            bgm_volume: 0.25,
            sfx_volume: 0.5,
            current_bgm: None,
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("assets"),
            PathBuf::from("./assets"),
            std::env::current_exe().ok()?.parent()?.join("assets"),
        ];

        paths
            .iter()
            .find(|p| p.exists() && p.join("bgm").exists())
            .cloned()
    }

    /// Set BGM volume (0.0 to 1.0)
    pub fn set_bgm_volume(&mut self, volume: f32) {
        self.bgm_volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.bgm_sink {
            sink.set_volume(self.bgm_volume);
        }
    }

    /// Set SFX volume (0.0 to 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Play background music (loops indefinitely)
    pub fn play_bgm(&mut self, track: BgmTrack) {
        // Don't restart if already playing this track
        if self.current_bgm == Some(track) {
            return;
        }

        self.stop_bgm();

        let path = self.assets_path.join("bgm").join(track.filename());
        let Ok(file) = File::open(&path) else { return };
        let Ok(sink) = Sink::try_new(&self.stream_handle) else {
            return;
        };
        let Ok(decoder) = Decoder::new(BufReader::new(file)) else {
            return;
        };

        sink.set_volume(self.bgm_volume);
        sink.append(decoder.repeat_infinite());
        self.bgm_sink = Some(sink);
        self.current_bgm = Some(track);
    }

    /// Stop background music
    pub fn stop_bgm(&mut self) {
        if let Some(sink) = self.bgm_sink.take() {
            sink.stop();
        }
        self.current_bgm = None;
    }

    /// Pause background music
    pub fn pause_bgm(&mut self) {
        if let Some(sink) = &self.bgm_sink {
            sink.pause();
        }
    }

    /// Resume background music
    pub fn resume_bgm(&mut self) {
        if let Some(sink) = &self.bgm_sink {
            sink.play();
        }
    }

    /// Play a sound effect
    pub fn play_sfx(&mut self, sfx: Sfx) {
        if self.sfx_volume <= 0.0 {
            return;
        }

        let path = self.assets_path.join("sfx").join(sfx.filename());

        if let Ok(file) = File::open(&path) {
            if let Ok(decoder) = Decoder::new(BufReader::new(file)) {
                if let Ok(sink) = Sink::try_new(&self.stream_handle) {
                    sink.set_volume(self.sfx_volume);
                    sink.append(decoder);
                    sink.detach(); // Let it play and clean up automatically
                }
            }
        }
    }
}
