//! Two-phase page-turn transitions.
//!
//! A transition turns the outgoing pages away (turn-out), swaps content and
//! turns the incoming pages in (turn-in). With a [`PageAnimator`] each phase
//! is handed over as a [`TransitionCue`]; without one the page containers
//! get the `flip-animation` class and the phases are timed by the editor.
//! Either way time only moves through [`Transition::advance`], so content is
//! loaded at the same point on both paths.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::TransitionConfig;

/// Class set on the page containers while the CSS fallback runs.
pub const FLIP_CLASS: &str = "flip-animation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    TurnOut,
    TurnIn,
}

/// How a transition is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Animated,
    CssFallback,
}

/// Quadratic easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    Power2In,
    Power2Out,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Power2In => t * t,
            Ease::Power2Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Rotation (degrees around the vertical axis) and opacity of the pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub rotation_y: f32,
    pub opacity: f32,
}

impl Pose {
    pub const REST: Pose = Pose {
        rotation_y: 0.0,
        opacity: 1.0,
    };

    fn lerp(self, to: Pose, t: f32) -> Pose {
        Pose {
            rotation_y: self.rotation_y + (to.rotation_y - self.rotation_y) * t,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }
}

/// One phase, as handed to an animation backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionCue {
    pub phase: Phase,
    pub from: Pose,
    pub to: Pose,
    pub duration: Duration,
    pub ease: Ease,
}

/// An animation backend for page turns.
pub trait PageAnimator {
    /// Start animating the page containers through `cue`.
    fn play(&mut self, cue: &TransitionCue) -> crate::Result<()>;
}

/// Something that happened during [`Transition::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// Turn-out finished: load the new set now.
    TurnedOut,
    Finished,
}

/// An in-flight page turn.
#[derive(Debug, Clone)]
pub struct Transition {
    direction: Direction,
    presentation: Presentation,
    phase: Phase,
    elapsed: Duration,
    phase_duration: Duration,
    rotation: f32,
    dimmed: f32,
}

impl Transition {
    pub fn new(direction: Direction, presentation: Presentation, config: &TransitionConfig) -> Self {
        let phase_ms = match presentation {
            Presentation::Animated => config.animated_phase_ms,
            Presentation::CssFallback => config.fallback_phase_ms,
        };
        Self {
            direction,
            presentation,
            phase: Phase::TurnOut,
            elapsed: Duration::ZERO,
            phase_duration: Duration::from_millis(phase_ms),
            rotation: config.rotation_deg,
            dimmed: config.min_opacity,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    /// Switch to the CSS path, e.g. after the animator failed.
    pub fn fall_back(&mut self, config: &TransitionConfig) {
        self.presentation = Presentation::CssFallback;
        self.phase_duration = Duration::from_millis(config.fallback_phase_ms);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cue for the current phase.
    ///
    /// Forward turns rotate the outgoing pages to `-rotation` and bring the
    /// new ones in from `+rotation`; backward turns mirror that.
    pub fn cue(&self) -> TransitionCue {
        let sign = match self.direction {
            Direction::Forward => -1.0,
            Direction::Backward => 1.0,
        };
        let turned_out = Pose {
            rotation_y: sign * self.rotation,
            opacity: self.dimmed,
        };
        let turning_in = Pose {
            rotation_y: -sign * self.rotation,
            opacity: self.dimmed,
        };
        match self.phase {
            Phase::TurnOut => TransitionCue {
                phase: Phase::TurnOut,
                from: Pose::REST,
                to: turned_out,
                duration: self.phase_duration,
                ease: Ease::Power2In,
            },
            Phase::TurnIn => TransitionCue {
                phase: Phase::TurnIn,
                from: turning_in,
                to: Pose::REST,
                duration: self.phase_duration,
                ease: Ease::Power2Out,
            },
        }
    }

    /// Current pose of the page containers.
    pub fn frame(&self) -> Pose {
        let cue = self.cue();
        let t = if cue.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f32() / cue.duration.as_secs_f32()
        };
        cue.from.lerp(cue.to, cue.ease.apply(t))
    }

    /// Move time forward. A large step can finish both phases at once.
    pub fn advance(&mut self, dt: Duration) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        self.elapsed += dt;

        if self.phase == Phase::TurnOut && self.elapsed >= self.phase_duration {
            self.elapsed -= self.phase_duration;
            self.phase = Phase::TurnIn;
            events.push(TransitionEvent::TurnedOut);
        }
        if self.phase == Phase::TurnIn && self.elapsed >= self.phase_duration {
            self.elapsed = self.phase_duration;
            events.push(TransitionEvent::Finished);
        }
        events
    }
}
