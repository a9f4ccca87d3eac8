//! Per-object property bag.
//!
//! Host objects carry arbitrary key/value properties that drive sprite
//! playback (`animation`, `fps`, `reversed`, ...) and receive outputs
//! (`current_frame`, `debug`). Values are loosely typed like the host's own
//! property system, so the getters coerce where the host would.

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A single property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}
impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        PropValue::Int(v as i64)
    }
}
impl From<usize> for PropValue {
    fn from(v: usize) -> Self {
        PropValue::Int(v as i64)
    }
}
impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}
impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        PropValue::Float(v as f64)
    }
}
impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}
impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}
impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}

#[derive(Debug, Clone, Default, Component)]
pub struct Properties {
    pub values: FxHashMap<String, PropValue>,
}

impl Properties {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(key, value);
        self
    }
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.values.insert(key.into(), value.into());
    }
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.values.remove(key)
    }
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.values.get(key)
    }
    /// Integer view. Floats are truncated toward zero.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            PropValue::Int(v) => Some(*v),
            PropValue::Float(v) => Some(*v as i64),
            PropValue::Bool(v) => Some(*v as i64),
            PropValue::Str(_) => None,
        }
    }
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        match self.values.get(key)? {
            PropValue::Int(v) => Some(*v as f32),
            PropValue::Float(v) => Some(*v as f32),
            PropValue::Bool(_) | PropValue::Str(_) => None,
        }
    }
    /// Truthiness the way the host evaluates it: non-zero numbers and
    /// non-empty strings are true.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            PropValue::Bool(v) => Some(*v),
            PropValue::Int(v) => Some(*v != 0),
            PropValue::Float(v) => Some(*v != 0.0),
            PropValue::Str(s) => Some(!s.is_empty()),
        }
    }
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            PropValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
