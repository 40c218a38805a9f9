//! Attention Tracking
//!
//! The engagement and reward scores of one learner session. Every operation is
//! a saturating add or subtract, so both scores stay inside `[0, SCORE_MAX]`
//! whatever order ticks, samples and boosts arrive in.

use serde::{Deserialize, Serialize};

/// Upper bound of both scores.
pub const SCORE_MAX: u8 = 100;

/// Score changes applied by each tracker operation.
pub mod deltas {
    pub const DECAY: u8 = 1;
    pub const CENTERED_GAIN: u8 = 1;
    pub const CENTERED_REWARD: u8 = 1;
    pub const DISTRACTED_LOSS: u8 = 2;
    pub const BOOST_GAIN: u8 = 15;
    pub const BOOST_REWARD: u8 = 10;
    pub const QUIZ_ANSWER_GAIN: u8 = 10;
    pub const QUIZ_ANSWER_REWARD: u8 = 5;
}

/// The kind of explicit learner action being acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostKind {
    /// The learner pressed "boost focus".
    Manual,
    /// The learner answered a focus-check quiz.
    QuizAnswer,
}

impl BoostKind {
    fn amounts(self) -> (u8, u8) {
        match self {
            BoostKind::Manual => (deltas::BOOST_GAIN, deltas::BOOST_REWARD),
            BoostKind::QuizAnswer => (deltas::QUIZ_ANSWER_GAIN, deltas::QUIZ_ANSWER_REWARD),
        }
    }
}

/// A point-in-time copy of the two scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionScores {
    pub engagement: u8,
    pub reward: u8,
}

/// Engagement and reward scores for one session.
#[derive(Debug, Clone)]
pub struct AttentionTracker {
    engagement: u8,
    reward: u8,
}

impl AttentionTracker {
    /// Creates a tracker, clamping the starting scores into range.
    pub fn new(engagement: u8, reward: u8) -> Self {
        Self {
            engagement: engagement.min(SCORE_MAX),
            reward: reward.min(SCORE_MAX),
        }
    }

    pub fn engagement(&self) -> u8 {
        self.engagement
    }

    pub fn reward(&self) -> u8 {
        self.reward
    }

    pub fn scores(&self) -> AttentionScores {
        AttentionScores {
            engagement: self.engagement,
            reward: self.reward,
        }
    }

    /// Periodic decay.
    pub fn tick(&mut self) {
        self.engagement = lower(self.engagement, deltas::DECAY);
    }

    /// Applies one attention sample. `None` means no signal (no face found)
    /// and is treated like a distracted sample.
    pub fn sample(&mut self, centered: Option<bool>) {
        if centered == Some(true) {
            self.engagement = raise(self.engagement, deltas::CENTERED_GAIN);
            self.reward = raise(self.reward, deltas::CENTERED_REWARD);
        } else {
            self.engagement = lower(self.engagement, deltas::DISTRACTED_LOSS);
        }
    }

    /// Acknowledges an explicit learner action.
    pub fn boost(&mut self, kind: BoostKind) {
        let (gain, reward) = kind.amounts();
        self.engagement = raise(self.engagement, gain);
        self.reward = raise(self.reward, reward);
    }
}

fn raise(score: u8, by: u8) -> u8 {
    score.saturating_add(by).min(SCORE_MAX)
}

fn lower(score: u8, by: u8) -> u8 {
    score.saturating_sub(by)
}
