//! Logic brick that drives a sprite animator.
//!
//! The host evaluates its own sensors every step and stores their state on
//! the [`SpriteController`]. The animation step runs only when the
//! controller's trigger condition holds, and on each completed cycle it asks
//! the host to fire every actuator listed here (see
//! [`ActuatorActivated`](crate::events::actuator::ActuatorActivated)).
//!
//! # Trigger Condition
//!
//! - all sensors positive (vacuously true with no sensors), or
//! - any sensor positive, if the controller's name contains `OR`

use bevy_ecs::prelude::Component;

/// Host sensor state for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sensor {
    pub name: String,
    pub positive: bool,
}

#[derive(Component, Debug, Clone, Default)]
pub struct SpriteController {
    pub name: String,
    pub sensors: Vec<Sensor>,
    pub actuators: Vec<String>,
}

impl SpriteController {
    pub fn new(name: impl Into<String>) -> Self {
        SpriteController {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_sensor(mut self, name: impl Into<String>, positive: bool) -> Self {
        self.sensors.push(Sensor {
            name: name.into(),
            positive,
        });
        self
    }

    pub fn with_actuator(mut self, name: impl Into<String>) -> Self {
        self.actuators.push(name.into());
        self
    }

    /// Update a sensor's state. Returns false if no sensor has that name.
    pub fn set_sensor(&mut self, name: &str, positive: bool) -> bool {
        match self.sensors.iter_mut().find(|s| s.name == name) {
            Some(sensor) => {
                sensor.positive = positive;
                true
            }
            None => false,
        }
    }

    pub fn all_sensors_positive(&self) -> bool {
        self.sensors.iter().all(|s| s.positive)
    }

    pub fn any_sensor_positive(&self) -> bool {
        self.sensors.iter().any(|s| s.positive)
    }

    pub fn is_or_controller(&self) -> bool {
        self.name.contains("OR")
    }

    pub fn is_triggered(&self) -> bool {
        self.all_sensors_positive() || (self.is_or_controller() && self.any_sensor_positive())
    }
}
