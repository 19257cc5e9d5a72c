//! Monthly NDVI frames for the satellite time-lapse and the playback clock
//! that steps through them. The canvas rendering lives in the browser shell.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Time each frame stays on screen while playing.
pub const FRAME_STEP_MS: f64 = 800.0;

/// Textured blots painted over each frame's base colour.
pub const BLOT_COUNT: usize = 100;

/// Largest brightness shift of a blot relative to the base colour.
pub const SHADE_SPREAD: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Shift every channel by `factor * 255`, saturating at the ends.
    pub fn shade(self, factor: f64) -> Rgb {
        let channel = |c: u8| (f64::from(c) + factor * 255.0).clamp(0.0, 255.0).floor() as u8;
        Rgb(channel(self.0), channel(self.1), channel(self.2))
    }

    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NdviFrame {
    pub date: &'static str,
    pub ndvi: f64,
    pub color: Rgb,
}

impl NdviFrame {
    pub fn label(&self) -> String {
        format!("NDVI: {}", self.ndvi)
    }
}

/// Vegetation index over one growing season, bare soil to green-up.
pub static FRAMES: [NdviFrame; 9] = [
    NdviFrame { date: "January 2024", ndvi: 0.15, color: Rgb(0x8B, 0x45, 0x13) },
    NdviFrame { date: "February 2024", ndvi: 0.18, color: Rgb(0xA0, 0x52, 0x2D) },
    NdviFrame { date: "March 2024", ndvi: 0.22, color: Rgb(0xDA, 0xA5, 0x20) },
    NdviFrame { date: "April 2024", ndvi: 0.28, color: Rgb(0xBD, 0xB7, 0x6B) },
    NdviFrame { date: "May 2024", ndvi: 0.35, color: Rgb(0x9A, 0xCD, 0x32) },
    NdviFrame { date: "June 2024", ndvi: 0.42, color: Rgb(0x7C, 0xFC, 0x00) },
    NdviFrame { date: "July 2024", ndvi: 0.38, color: Rgb(0x9A, 0xCD, 0x32) },
    NdviFrame { date: "August 2024", ndvi: 0.41, color: Rgb(0x7C, 0xFC, 0x00) },
    NdviFrame { date: "September 2024", ndvi: 0.45, color: Rgb(0x32, 0xCD, 0x32) },
];

/// Frame clock. Playing advances one frame per [`FRAME_STEP_MS`] and holds
/// once the last frame is reached; playing again from there wraps to the
/// first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    frame: usize,
    playing: bool,
    last_step: f64,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self { frame: 0, playing: false, last_step: 0.0 }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn current(&self) -> &'static NdviFrame {
        &FRAMES[self.frame]
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self, now: f64) {
        self.playing = true;
        self.last_step = now;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump to `frame`, clamped to the last one. Used by the timeline slider.
    pub fn seek(&mut self, frame: usize) {
        self.frame = frame.min(FRAMES.len() - 1);
    }

    /// Advance if a step is due at `now`. Returns `true` when the frame
    /// changed.
    pub fn tick(&mut self, now: f64) -> bool {
        if !self.playing || now - self.last_step < FRAME_STEP_MS {
            return false;
        }
        self.last_step += FRAME_STEP_MS;
        // a backgrounded tab resumes without replaying the missed frames
        if now - self.last_step >= FRAME_STEP_MS {
            self.last_step = now;
        }
        self.frame = (self.frame + 1) % FRAMES.len();
        if self.frame == FRAMES.len() - 1 {
            self.playing = false;
        }
        true
    }
}

/// One textured circle of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
}

/// Random vegetation texture for `frame` on a `width` x `height` canvas.
pub fn texture(frame: &NdviFrame, width: f64, height: f64, seed: u64) -> Vec<Blot> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (width, height) = (width.max(1.0), height.max(1.0));
    (0..BLOT_COUNT)
        .map(|_| Blot {
            x: rng.gen_range(0.0..width),
            y: rng.gen_range(0.0..height),
            radius: rng.gen_range(5.0..25.0),
            color: frame.color.shade(rng.gen_range(-SHADE_SPREAD..SHADE_SPREAD)),
        })
        .collect()
}
