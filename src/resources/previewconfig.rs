//! Preview configuration.
//!
//! Settings for the headless `sprycle` preview, loaded from an INI file.
//! Missing values keep their defaults and command-line flags override
//! whatever the file sets.
//!
//! # Configuration File Format
//!
//! ```ini
//! [preview]
//! fps = 10
//! steps = 40
//! dt = 0.016
//! cycle = walk
//! reversed = false
//! xflipped = false
//! yflipped = false
//!
//! [grid]
//! xstep = 4
//! total_frames = 8
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_FPS: f32 = 10.0;
const DEFAULT_STEPS: u32 = 40;
const DEFAULT_DT: f32 = 1.0 / 60.0;
const DEFAULT_XSTEP: u32 = 1;
const DEFAULT_TOTAL_FRAMES: u32 = 1;
const DEFAULT_CONFIG_PATH: &str = "./sprycle.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    /// Playback frame rate.
    pub fps: f32,
    /// Number of simulated steps.
    pub steps: u32,
    /// Seconds per step.
    pub dt: f32,
    /// Cycle to play; the first cycle when unset.
    pub cycle: Option<String>,
    pub reversed: bool,
    pub xflipped: bool,
    pub yflipped: bool,
    /// Grid cells per row when no baked data is given.
    pub xstep: u32,
    /// Grid cell count when no baked data is given.
    pub total_frames: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewConfig {
    pub fn new() -> Self {
        Self {
            fps: DEFAULT_FPS,
            steps: DEFAULT_STEPS,
            dt: DEFAULT_DT,
            cycle: None,
            reversed: false,
            xflipped: false,
            yflipped: false,
            xstep: DEFAULT_XSTEP,
            total_frames: DEFAULT_TOTAL_FRAMES,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file at `config_path`.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [preview] section
        if let Some(fps) = config.getfloat("preview", "fps").ok().flatten() {
            self.fps = fps as f32;
        }
        if let Some(steps) = config.getuint("preview", "steps").ok().flatten() {
            self.steps = steps as u32;
        }
        if let Some(dt) = config.getfloat("preview", "dt").ok().flatten() {
            self.dt = dt as f32;
        }
        if let Some(cycle) = config.get("preview", "cycle").filter(|c| !c.is_empty()) {
            self.cycle = Some(cycle);
        }
        if let Some(reversed) = config.getbool("preview", "reversed").ok().flatten() {
            self.reversed = reversed;
        }
        if let Some(xflipped) = config.getbool("preview", "xflipped").ok().flatten() {
            self.xflipped = xflipped;
        }
        if let Some(yflipped) = config.getbool("preview", "yflipped").ok().flatten() {
            self.yflipped = yflipped;
        }

        // [grid] section
        if let Some(xstep) = config.getuint("grid", "xstep").ok().flatten() {
            self.xstep = xstep as u32;
        }
        if let Some(total) = config.getuint("grid", "total_frames").ok().flatten() {
            self.total_frames = total as u32;
        }

        info!(
            "Loaded config: fps={}, steps={}, dt={}, cycle={:?}, grid {}x{}",
            self.fps, self.steps, self.dt, self.cycle, self.xstep, self.total_frames
        );
    }
}
