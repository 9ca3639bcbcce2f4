//! Steering agent: a point mass with bounded speed and bounded steering force.
//!
//! Model
//! - Behaviors (`seek`, `flee`, `arrive`, `reject`, `stalk`, `contain`) only compute a
//!   desired velocity; nothing moves until the caller passes a desired velocity to
//!   `steer` and then calls `integrate`.
//! - `integrate` consumes the accumulated acceleration. Without acceleration the
//!   agent coasts and loses `deceleration_rate` of speed per call.

use nalgebra::Vector2;

use crate::geom::{centroid, limit_magnitude, point_in_convex_polygon, with_magnitude};

/// Preferred distance band kept by `stalk`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StalkRange {
    pub min: f64,
    pub max: f64,
}

impl Default for StalkRange {
    fn default() -> Self {
        Self {
            min: 40.0,
            max: 100.0,
        }
    }
}

/// Motion limits and behavior radii.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentCfg {
    pub max_speed: f64,
    pub max_force: f64,
    /// Speed lost per `integrate` call while no force is applied.
    pub deceleration_rate: f64,
    /// Radius inside which `arrive` slows down linearly.
    pub arrive_distance: f64,
    /// Radius inside which `reject` pushes away.
    pub reject_distance: f64,
    pub stalk: StalkRange,
}

impl Default for AgentCfg {
    fn default() -> Self {
        Self {
            max_speed: 3.0,
            max_force: 0.1,
            deceleration_rate: 0.1,
            arrive_distance: 100.0,
            reject_distance: 60.0,
            stalk: StalkRange::default(),
        }
    }
}

impl AgentCfg {
    /// First offending field, if any.
    pub(crate) fn check(&self) -> Result<(), String> {
        let fields = [
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("deceleration_rate", self.deceleration_rate),
            ("arrive_distance", self.arrive_distance),
            ("reject_distance", self.reject_distance),
            ("stalk.min", self.stalk.min),
            ("stalk.max", self.stalk.max),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("agent.{name} must be finite and >= 0 (got {v})"));
            }
        }
        if self.stalk.min > self.stalk.max {
            return Err("agent.stalk.min <= agent.stalk.max required".into());
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Agent {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub acceleration: Vector2<f64>,
    pub cfg: AgentCfg,
}

impl Agent {
    pub fn new(position: Vector2<f64>, cfg: AgentCfg) -> Self {
        Self {
            position,
            velocity: Vector2::zeros(),
            acceleration: Vector2::zeros(),
            cfg,
        }
    }

    /// Advance one frame.
    ///
    /// Post: `velocity.norm() <= max_speed` whenever a force was applied, and the
    /// acceleration is zero again.
    pub fn integrate(&mut self) {
        if self.acceleration.norm() > 0.0 {
            self.velocity = limit_magnitude(self.velocity + self.acceleration, self.cfg.max_speed);
            self.acceleration = Vector2::zeros();
        } else {
            let speed = (self.velocity.norm() - self.cfg.deceleration_rate).max(0.0);
            self.velocity = with_magnitude(self.velocity, speed);
        }
        self.position += self.velocity;
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vector2<f64>) {
        self.acceleration += force;
    }

    /// Reynolds steering: push the velocity toward `desired` by at most `max_force`.
    pub fn steer(&mut self, desired: Vector2<f64>) {
        let correction = limit_magnitude(desired - self.velocity, self.cfg.max_force);
        self.apply_force(correction);
    }

    pub fn seek(&self, target: Vector2<f64>) -> Vector2<f64> {
        with_magnitude(target - self.position, self.cfg.max_speed)
    }

    pub fn flee(&self, target: Vector2<f64>) -> Vector2<f64> {
        with_magnitude(self.position - target, self.cfg.max_speed)
    }

    pub fn arrive(&self, target: Vector2<f64>) -> Vector2<f64> {
        self.arrive_within(target, self.cfg.arrive_distance)
    }

    /// Seek that eases to a stop: speed scales linearly from `max_speed` at
    /// `distance` down to zero at the target.
    pub fn arrive_within(&self, target: Vector2<f64>, distance: f64) -> Vector2<f64> {
        let desired = target - self.position;
        let d = desired.norm();
        let speed = if d < distance {
            d / distance * self.cfg.max_speed
        } else {
            self.cfg.max_speed
        };
        with_magnitude(desired, speed)
    }

    pub fn reject(&self, target: Vector2<f64>) -> Vector2<f64> {
        self.reject_within(target, self.cfg.reject_distance)
    }

    /// Full-speed flee inside `distance`, nothing outside.
    pub fn reject_within(&self, target: Vector2<f64>, distance: f64) -> Vector2<f64> {
        let desired = self.position - target;
        if desired.norm() >= distance {
            return Vector2::zeros();
        }
        with_magnitude(desired, self.cfg.max_speed)
    }

    pub fn stalk(&self, target: Vector2<f64>) -> Vector2<f64> {
        self.stalk_band(target, self.cfg.stalk)
    }

    /// Hold `target` inside `range`: flee when closer than `min`, seek when farther
    /// than `max`, rest otherwise.
    pub fn stalk_band(&self, target: Vector2<f64>, range: StalkRange) -> Vector2<f64> {
        let desired = target - self.position;
        let d = desired.norm();
        if d >= range.min && d <= range.max {
            return Vector2::zeros();
        }
        let desired = if d < range.min { -desired } else { desired };
        with_magnitude(desired, self.cfg.max_speed)
    }

    /// Average of `behavior(self, other.position)` over every other agent that
    /// yields a non-zero vector, capped at `max_speed`.
    ///
    /// `self` is skipped by identity, so callers may pass a collection that
    /// contains this agent.
    pub fn group_behavior<'a, I, F>(&self, others: I, behavior: F) -> Vector2<f64>
    where
        I: IntoIterator<Item = &'a Agent>,
        F: Fn(&Agent, Vector2<f64>) -> Vector2<f64>,
    {
        let mut sum = Vector2::zeros();
        let mut count = 0usize;
        for other in others {
            if std::ptr::eq(other, self) {
                continue;
            }
            let v = behavior(self, other.position);
            if v.norm() > 0.0 {
                sum += v;
                count += 1;
            }
        }
        if count == 0 {
            return sum;
        }
        limit_magnitude(sum / count as f64, self.cfg.max_speed)
    }

    /// Seek the polygon's vertex centroid while outside it.
    ///
    /// Convex polygons only; zero for fewer than 3 vertices or when already inside.
    pub fn contain(&self, polygon: &[Vector2<f64>]) -> Vector2<f64> {
        if polygon.len() < 3 || point_in_convex_polygon(self.position, polygon) {
            return Vector2::zeros();
        }
        match centroid(polygon) {
            Some(c) => self.seek(c),
            None => Vector2::zeros(),
        }
    }
}
