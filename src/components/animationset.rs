//! Named UV cycles for a sprite object.
//!
//! An [`AnimationSet`] maps cycle names to ordered frame lists. Each
//! [`Frame`] holds one UV coordinate per vertex of the target polygon. Sets
//! are built once per object, either from the uniform grid convention
//! ([`AnimationSet::from_grid`]) or from baked JSON data
//! ([`AnimationSet::from_json`]), and are read-only afterwards.
//!
//! # Baked JSON Format
//!
//! ```json
//! [
//!   { "name": "walk", "frames": [ [[0.0, 0.0], [0.25, 0.0], [0.25, 0.25], [0.0, 0.25]] ] },
//!   { "name": "idle", "frames": [ [[0.0, 0.5], [0.25, 0.5], [0.25, 0.75], [0.0, 0.75]] ] }
//! ]
//! ```
//!
//! Cycle order is significant: the first cycle is the fallback for unknown
//! names.

use std::sync::Arc;

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// UV coordinates for one frame, one per polygon vertex in vertex order.
pub type Frame = SmallVec<[Vec2; 4]>;

/// Name of the single cycle produced by [`AnimationSet::from_grid`].
pub const GRID_CYCLE_NAME: &str = "offset";

#[derive(Debug, Error, PartialEq)]
pub enum AnimationDataError {
    #[error("malformed animation data: {0}")]
    Malformed(String),
    #[error("animation data contains no cycles")]
    NoCycles,
    #[error("cycle #{0} has an empty name")]
    EmptyName(usize),
    #[error("cycle '{0}' is defined more than once")]
    DuplicateCycle(String),
    #[error("cycle '{0}' has no frames")]
    EmptyCycle(String),
    #[error("cycle '{cycle}' frame {frame} has no coordinates")]
    EmptyFrame { cycle: String, frame: usize },
    #[error("cycle '{cycle}' frame {frame} has a non-finite coordinate")]
    NonFinite { cycle: String, frame: usize },
    #[error("cycle '{cycle}' frame {frame} has {found} coordinates, expected {expected}")]
    VertexCount {
        cycle: String,
        frame: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BakedCycle {
    name: String,
    frames: Vec<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub name: String,
    pub frames: Arc<[Frame]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSet {
    cycles: Vec<Cycle>,
    index: FxHashMap<String, usize>,
}

impl AnimationSet {
    /// Build a set from `(name, frames)` pairs, keeping their order.
    pub fn new<I>(cycles: I) -> Result<Self, AnimationDataError>
    where
        I: IntoIterator<Item = (String, Vec<Frame>)>,
    {
        let mut set = AnimationSet {
            cycles: Vec::new(),
            index: FxHashMap::default(),
        };
        let mut vertex_count: Option<usize> = None;

        for (pos, (name, frames)) in cycles.into_iter().enumerate() {
            if name.is_empty() {
                return Err(AnimationDataError::EmptyName(pos));
            }
            if set.index.contains_key(&name) {
                return Err(AnimationDataError::DuplicateCycle(name));
            }
            if frames.is_empty() {
                return Err(AnimationDataError::EmptyCycle(name));
            }
            for (i, frame) in frames.iter().enumerate() {
                if frame.is_empty() {
                    return Err(AnimationDataError::EmptyFrame {
                        cycle: name,
                        frame: i,
                    });
                }
                if frame.iter().any(|uv| !uv.is_finite()) {
                    return Err(AnimationDataError::NonFinite {
                        cycle: name,
                        frame: i,
                    });
                }
                let expected = *vertex_count.get_or_insert(frame.len());
                if frame.len() != expected {
                    return Err(AnimationDataError::VertexCount {
                        cycle: name,
                        frame: i,
                        expected,
                        found: frame.len(),
                    });
                }
            }
            set.index.insert(name.clone(), set.cycles.len());
            set.cycles.push(Cycle {
                name,
                frames: frames.into(),
            });
        }

        if set.cycles.is_empty() {
            return Err(AnimationDataError::NoCycles);
        }
        Ok(set)
    }

    /// Parse and validate baked cycle data.
    pub fn from_json(text: &str) -> Result<Self, AnimationDataError> {
        let baked: Vec<BakedCycle> = serde_json::from_str(text)
            .map_err(|e| AnimationDataError::Malformed(e.to_string()))?;
        Self::new(baked.into_iter().map(|cycle| {
            let frames: Vec<Frame> = cycle
                .frames
                .into_iter()
                .map(|frame| frame.into_iter().map(Vec2::from).collect())
                .collect();
            (cycle.name, frames)
        }))
    }

    /// Serialize back into the baked JSON format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let baked: Vec<BakedCycle> = self
            .cycles
            .iter()
            .map(|cycle| BakedCycle {
                name: cycle.name.clone(),
                frames: cycle
                    .frames
                    .iter()
                    .map(|frame| frame.iter().map(|uv| uv.to_array()).collect())
                    .collect(),
            })
            .collect();
        serde_json::to_string(&baked)
    }

    /// Derive a single `offset` cycle from a sprite sheet laid out as a
    /// uniform grid, row-major, `xstep` cells per row.
    ///
    /// `base_frame` is the UV quad of the first cell; vertices 0 and 2 are
    /// opposite corners and give the cell size. Rows advance toward negative
    /// V.
    pub fn from_grid(
        base_frame: &[Vec2],
        xstep: usize,
        total_frames: usize,
    ) -> Result<Self, AnimationDataError> {
        let xstep = xstep.max(1);
        let total_frames = total_frames.max(1).max(xstep);
        let cell = frame_dimensions(base_frame);

        let frames: Vec<Frame> = (0..total_frames)
            .map(|i| {
                let offset = Vec2::new(
                    cell.x * (i % xstep) as f32,
                    -cell.y * (i / xstep) as f32,
                );
                base_frame.iter().map(|uv| *uv + offset).collect()
            })
            .collect();

        Self::new([(GRID_CYCLE_NAME.to_string(), frames)])
    }

    /// Check every frame against the vertex count of the target polygon.
    pub fn validate_vertex_count(&self, expected: usize) -> Result<(), AnimationDataError> {
        for cycle in &self.cycles {
            if let Some((frame, found)) = cycle
                .frames
                .iter()
                .enumerate()
                .find(|(_, f)| f.len() != expected)
                .map(|(i, f)| (i, f.len()))
            {
                return Err(AnimationDataError::VertexCount {
                    cycle: cycle.name.clone(),
                    frame,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Cycle> {
        self.index.get(name).map(|&i| &self.cycles[i])
    }

    pub fn first(&self) -> &Cycle {
        &self.cycles[0]
    }

    /// Look up a cycle, falling back to the first one for unknown names.
    pub fn resolve(&self, name: &str) -> &Cycle {
        self.get(name).unwrap_or_else(|| self.first())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cycles.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Width and height of a quad frame from two opposite corners.
pub fn frame_dimensions(frame: &[Vec2]) -> Vec2 {
    match (frame.first(), frame.get(2)) {
        (Some(a), Some(b)) => (*a - *b).abs(),
        _ => Vec2::ZERO,
    }
}
