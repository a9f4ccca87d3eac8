//! Sprite configuration resolved from object properties.
//!
//! The host exposes configuration as loose properties on the object. Every
//! triggered step they are read into [`SpriteConfig`] (playback overrides)
//! and, on the first step only, [`GridConfig`] (sheet layout). Absent keys
//! mean "leave as is" for overrides and "use the default" for layout.
//!
//! | key            | type   | meaning                                   |
//! |----------------|--------|-------------------------------------------|
//! | `animation`    | string | active cycle; unknown names use the first |
//! | `fps`          | number | frame rate, 0 freezes                     |
//! | `reversed`     | bool   | play backwards                            |
//! | `xflipped`     | bool   | mirror horizontally                       |
//! | `yflipped`     | bool   | mirror vertically                         |
//! | `xstep`        | int    | grid cells per row (default 1)            |
//! | `total_frames` | int    | grid cell count (default 1, min `xstep`)  |

use glam::{Mat2, Vec2};

use crate::components::cyclecursor::Direction;
use crate::components::properties::Properties;

pub const PROP_ANIMATION: &str = "animation";
pub const PROP_FPS: &str = "fps";
pub const PROP_REVERSED: &str = "reversed";
pub const PROP_XFLIPPED: &str = "xflipped";
pub const PROP_YFLIPPED: &str = "yflipped";
pub const PROP_XSTEP: &str = "xstep";
pub const PROP_TOTAL_FRAMES: &str = "total_frames";
pub const PROP_CURRENT_FRAME: &str = "current_frame";
pub const PROP_DEBUG: &str = "debug";

/// Mirror across the vertical axis (negates U).
pub fn xflip_matrix() -> Mat2 {
    Mat2::from_diagonal(Vec2::new(-1.0, 1.0))
}

/// Mirror across the horizontal axis (negates V).
pub fn yflip_matrix() -> Mat2 {
    Mat2::from_diagonal(Vec2::new(1.0, -1.0))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteConfig {
    pub animation: Option<String>,
    pub fps: Option<f32>,
    pub reversed: Option<bool>,
    pub xflipped: Option<bool>,
    pub yflipped: Option<bool>,
}

impl SpriteConfig {
    pub fn resolve(props: &Properties) -> Self {
        SpriteConfig {
            animation: props.get_str(PROP_ANIMATION).map(str::to_string),
            fps: props.get_f32(PROP_FPS),
            reversed: props.get_bool(PROP_REVERSED),
            xflipped: props.get_bool(PROP_XFLIPPED),
            yflipped: props.get_bool(PROP_YFLIPPED),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        self.reversed.map(Direction::from_reversed)
    }

    /// UV transform after applying the mirroring overrides to `current`.
    ///
    /// `xflipped` replaces the transform outright. `yflipped` composes on top
    /// of the x result when `xflipped` is present, otherwise it replaces the
    /// transform too. With neither key present `current` is kept.
    pub fn uv_transform(&self, current: Mat2) -> Mat2 {
        let mut transform = current;
        if let Some(x) = self.xflipped {
            transform = if x { xflip_matrix() } else { Mat2::IDENTITY };
        }
        if let Some(y) = self.yflipped {
            let y_scale = if y { yflip_matrix() } else { Mat2::IDENTITY };
            transform = if self.xflipped.is_some() {
                y_scale * transform
            } else {
                y_scale
            };
        }
        transform
    }
}

/// Layout of a uniform sprite-sheet grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub xstep: usize,
    pub total_frames: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            xstep: 1,
            total_frames: 1,
        }
    }
}

impl GridConfig {
    /// Non-positive or missing values fall back to 1; `total_frames` is
    /// raised to at least `xstep`.
    pub fn resolve(props: &Properties) -> Self {
        let positive = |key: &str| props.get_int(key).filter(|v| *v > 0).map(|v| v as usize);
        let xstep = positive(PROP_XSTEP).unwrap_or(1);
        let total_frames = positive(PROP_TOTAL_FRAMES).unwrap_or(1).max(xstep);
        GridConfig {
            xstep,
            total_frames,
        }
    }
}
