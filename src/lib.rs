//! Brickwave - a single-screen brick breaker with escalating waves
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, waves, phase machine)
//! - `renderer`: WebGPU rendering pipeline and draw-primitive adapter
//! - `audio`: Sound cues and browser playback
//! - `ui`: HUD and message text layout
//! - `tuning`: Data-driven game balance
//! - `settings`: Player-facing configuration

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Window dimensions (pixels, origin top-left, y down)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Target presentation rate
    pub const TARGET_FPS: u32 = 60;

    /// Window title
    pub const TITLE: &str = "Breakout Game";

    /// Asset paths (relative to the served page)
    pub const MUSIC_PATH: &str = "res/bg.mp3";
    pub const PADDLE_SOUND_PATH: &str = "res/paddle.wav";
    pub const WALL_SOUND_PATH: &str = "res/wall.wav";
    pub const BRICK_SOUND_PATH: &str = "res/brick.wav";
    pub const NEW_WAVE_SOUND_PATH: &str = "res/new_blocks.mp3";
}

/// RGBA colors (0-1 per channel)
pub mod palette {
    pub type Rgba = [f32; 4];

    pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const RED: Rgba = [230.0 / 255.0, 41.0 / 255.0, 55.0 / 255.0, 1.0];
    pub const ORANGE: Rgba = [1.0, 161.0 / 255.0, 0.0, 1.0];
    pub const YELLOW: Rgba = [253.0 / 255.0, 249.0 / 255.0, 0.0, 1.0];
    pub const GREEN: Rgba = [0.0, 228.0 / 255.0, 48.0 / 255.0, 1.0];
    pub const BLUE: Rgba = [0.0, 121.0 / 255.0, 241.0 / 255.0, 1.0];

    /// Brick colors by row, cycling when there are more rows than entries
    pub const BRICK_ROWS: [Rgba; 5] = [RED, ORANGE, YELLOW, GREEN, BLUE];

    /// CSS `rgba()` string for DOM text
    pub fn to_css(color: Rgba) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (color[0] * 255.0).round() as u8,
            (color[1] * 255.0).round() as u8,
            (color[2] * 255.0).round() as u8,
            color[3]
        )
    }
}
