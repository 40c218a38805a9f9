//! Quiz Scheduling
//!
//! Decides when a low-engagement session should receive a focus-check quiz.
//! The scheduler only holds the cooldown flag and the low-focus warning; the
//! session runtime owns the timer that releases the cooldown.

use std::time::Duration;

/// Engagement below which a quiz may be triggered.
pub const DEFAULT_QUIZ_THRESHOLD: u8 = 40;

/// How long further triggers are suppressed after one fires.
pub const DEFAULT_QUIZ_COOLDOWN: Duration = Duration::from_secs(20);

/// Outcome of evaluating the trigger condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// Engagement is at or above the threshold.
    Focused,
    /// Engagement is low but a trigger is not allowed right now (cooldown
    /// active or no lesson content).
    Suppressed,
    /// A quiz must be requested now. The cooldown is already active.
    Trigger,
}

/// Cooldown-gated quiz trigger.
#[derive(Debug, Clone)]
pub struct QuizScheduler {
    threshold: u8,
    cooldown: Duration,
    cooldown_active: bool,
    low_focus: bool,
}

impl Default for QuizScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUIZ_THRESHOLD, DEFAULT_QUIZ_COOLDOWN)
    }
}

impl QuizScheduler {
    pub fn new(threshold: u8, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            cooldown_active: false,
            low_focus: false,
        }
    }

    /// Evaluates the trigger condition for the current engagement.
    ///
    /// Fires when engagement is below the threshold, no cooldown is running
    /// and `content` is not blank. Firing activates the cooldown immediately;
    /// the caller must arm a release after [`QuizScheduler::cooldown`].
    pub fn evaluate(&mut self, engagement: u8, content: &str) -> ScheduleDecision {
        if engagement >= self.threshold {
            self.low_focus = false;
            return ScheduleDecision::Focused;
        }

        self.low_focus = true;
        if self.cooldown_active || content.trim().is_empty() {
            return ScheduleDecision::Suppressed;
        }

        self.cooldown_active = true;
        ScheduleDecision::Trigger
    }

    /// Ends the cooldown window.
    pub fn release_cooldown(&mut self) {
        self.cooldown_active = false;
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn cooldown_active(&self) -> bool {
        self.cooldown_active
    }

    /// Whether the last evaluation found engagement below the threshold.
    pub fn low_focus(&self) -> bool {
        self.low_focus
    }
}
