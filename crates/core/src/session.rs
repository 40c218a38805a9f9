//! Focus Session Runtime
//!
//! A [`FocusSession`] is the single owner of one learner's attention state. It
//! runs as one task that applies every input in arrival order: decay ticks,
//! attention samples, cooldown expiry, quiz generator results and learner
//! commands. Timers and the sample forwarder are [`TaskHandle`]s owned by the
//! session and released when it stops.

use crate::{
    attention::{AttentionTracker, BoostKind},
    error::QuizGenerationError,
    generator::QuizGenerator,
    mode::AdaptiveMode,
    quiz::{QuizBlock, QuizOutput, parse_quiz},
    scheduler::{DEFAULT_QUIZ_COOLDOWN, DEFAULT_QUIZ_THRESHOLD, QuizScheduler, ScheduleDecision},
    timer::TaskHandle,
};
use futures::Stream;
use serde::Serialize;
use std::{collections::VecDeque, sync::Arc, time::Duration};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{debug, info, trace, warn};

/// Shortest decay period a session will run with.
pub const MIN_DECAY_INTERVAL: Duration = Duration::from_millis(1);

/// Tunables of a focus session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub initial_engagement: u8,
    pub initial_reward: u8,
    pub decay_interval: Duration,
    pub quiz_threshold: u8,
    pub quiz_cooldown: Duration,
    /// Number of decay-tick engagement values kept for charting.
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_engagement: 100,
            initial_reward: 50,
            decay_interval: Duration::from_secs(6),
            quiz_threshold: DEFAULT_QUIZ_THRESHOLD,
            quiz_cooldown: DEFAULT_QUIZ_COOLDOWN,
            history_capacity: 120,
        }
    }
}

/// The quiz currently shown (or being generated) for a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizState {
    /// Lesson text the quiz was requested for.
    pub content: Option<String>,
    pub raw: Option<QuizOutput>,
    pub blocks: Vec<QuizBlock>,
    pub loading: bool,
}

/// What a client needs to render the attention panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttentionSnapshot {
    pub engagement: u8,
    pub reward: u8,
    pub cooldown_active: bool,
    pub low_focus: bool,
    pub mode: AdaptiveMode,
}

/// Notifications emitted by a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Attention(AttentionSnapshot),
    /// Engagement values recorded at each decay tick, oldest first.
    History(Vec<u8>),
    QuizLoading,
    QuizReady(Vec<QuizBlock>),
    /// `correct` is `None` when the answered block does not know its answer.
    QuizAnswered { correct: Option<bool> },
    QuizFailed { message: String },
    Stopped,
}

/// Learner actions sent through a [`SessionHandle`].
#[derive(Debug)]
enum Command {
    Boost,
    AnswerQuiz { block: usize, option: usize },
    DismissQuiz,
    SetContent(String),
    Stop,
}

/// Inputs produced by the session's own background tasks.
#[derive(Debug, Clone)]
enum Input {
    Tick,
    Sample(Option<bool>),
    CooldownElapsed,
    QuizResolved {
        generation: u64,
        outcome: Result<QuizOutput, Arc<QuizGenerationError>>,
    },
}

/// Control handle for a running session.
pub struct SessionHandle {
    commands: UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Learner-initiated focus boost. Returns `false` if the session is gone.
    pub fn boost(&self) -> bool {
        self.commands.send(Command::Boost).is_ok()
    }

    /// Answers option `option` of quiz block `block`.
    pub fn answer_quiz(&self, block: usize, option: usize) -> bool {
        self.commands
            .send(Command::AnswerQuiz { block, option })
            .is_ok()
    }

    pub fn dismiss_quiz(&self) -> bool {
        self.commands.send(Command::DismissQuiz).is_ok()
    }

    /// Replaces the lesson content used for future quizzes.
    pub fn set_content(&self, content: impl Into<String>) -> bool {
        self.commands.send(Command::SetContent(content.into())).is_ok()
    }

    /// Stops tracking and waits until every session task has been released.
    pub async fn stop(self) {
        let _ = self.commands.send(Command::Stop);
        if let Err(e) = self.task.await {
            if e.is_panic() {
                warn!("Focus session task panicked during shutdown");
            }
        }
    }
}

/// The single owner of one learner's attention state.
pub struct FocusSession {
    tracker: AttentionTracker,
    scheduler: QuizScheduler,
    quiz: QuizState,
    content: String,
    generator: Arc<dyn QuizGenerator>,
    history: VecDeque<u8>,
    history_capacity: usize,
    generation: u64,
    decay: Option<TaskHandle>,
    sampler: Option<TaskHandle>,
    cooldown: Option<TaskHandle>,
    quiz_task: Option<TaskHandle>,
    inputs: UnboundedSender<Input>,
    events: UnboundedSender<SessionEvent>,
}

impl FocusSession {
    /// Starts tracking.
    ///
    /// The decay timer starts immediately and `samples` is consumed until it
    /// ends or the session stops. Returns the control handle and the event
    /// stream. A zero `decay_interval` is raised to [`MIN_DECAY_INTERVAL`].
    pub fn start<S>(
        config: SessionConfig,
        content: String,
        generator: Arc<dyn QuizGenerator>,
        samples: S,
    ) -> (SessionHandle, UnboundedReceiver<SessionEvent>)
    where
        S: Stream<Item = Option<bool>> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let decay_interval = config.decay_interval.max(MIN_DECAY_INTERVAL);
        let mut session = FocusSession::new(&config, content, generator, input_tx, event_tx);
        session.decay = Some(TaskHandle::every(
            decay_interval,
            session.inputs.clone(),
            Input::Tick,
        ));
        session.sampler = Some(TaskHandle::forward(
            samples,
            session.inputs.clone(),
            Input::Sample,
        ));

        let task = tokio::spawn(session.run(command_rx, input_rx));
        (
            SessionHandle {
                commands: command_tx,
                task,
            },
            event_rx,
        )
    }

    /// Builds the session state without any background task attached.
    fn new(
        config: &SessionConfig,
        content: String,
        generator: Arc<dyn QuizGenerator>,
        inputs: UnboundedSender<Input>,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        FocusSession {
            tracker: AttentionTracker::new(config.initial_engagement, config.initial_reward),
            scheduler: QuizScheduler::new(config.quiz_threshold, config.quiz_cooldown),
            quiz: QuizState::default(),
            content,
            generator,
            history: VecDeque::with_capacity(config.history_capacity),
            history_capacity: config.history_capacity,
            generation: 0,
            decay: None,
            sampler: None,
            cooldown: None,
            quiz_task: None,
            inputs,
            events,
        }
    }

    async fn run(
        mut self,
        mut commands: UnboundedReceiver<Command>,
        mut inputs: UnboundedReceiver<Input>,
    ) {
        info!(engagement = self.tracker.engagement(), "Focus tracking started");
        self.on_engagement_changed();

        loop {
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(Command::Stop) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(input) = inputs.recv() => self.handle_input(input),
            }
        }

        self.teardown();
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Boost => {
                self.tracker.boost(BoostKind::Manual);
                debug!(engagement = self.tracker.engagement(), "Focus boost");
                self.on_engagement_changed();
            }
            Command::AnswerQuiz { block, option } => self.answer_quiz(block, option),
            Command::DismissQuiz => self.clear_quiz(),
            Command::SetContent(content) => {
                self.content = content;
                self.on_engagement_changed();
            }
            Command::Stop => {}
        }
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Tick => {
                self.tracker.tick();
                self.record_history();
                self.on_engagement_changed();
                self.emit(SessionEvent::History(self.history.iter().copied().collect()));
            }
            Input::Sample(centered) => {
                self.tracker.sample(centered);
                trace!(?centered, engagement = self.tracker.engagement(), "Attention sample");
                self.on_engagement_changed();
            }
            Input::CooldownElapsed => {
                self.scheduler.release_cooldown();
                self.cooldown = None;
                debug!("Quiz cooldown released");
                self.emit(SessionEvent::Attention(self.snapshot()));
            }
            Input::QuizResolved {
                generation,
                outcome,
            } => self.apply_quiz_result(generation, outcome),
        }
    }

    fn on_engagement_changed(&mut self) {
        let engagement = self.tracker.engagement();
        if self.scheduler.evaluate(engagement, &self.content) == ScheduleDecision::Trigger {
            self.trigger_quiz();
        }
        self.emit(SessionEvent::Attention(self.snapshot()));
    }

    fn trigger_quiz(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        info!(
            generation,
            engagement = self.tracker.engagement(),
            "Low focus detected. Requesting a focus-check quiz."
        );

        // The window runs from the trigger, whatever the generator does.
        self.cooldown = Some(TaskHandle::after(
            self.scheduler.cooldown(),
            self.inputs.clone(),
            Input::CooldownElapsed,
        ));

        self.quiz = QuizState {
            content: Some(self.content.clone()),
            raw: None,
            blocks: Vec::new(),
            loading: true,
        };

        let generator = self.generator.clone();
        let content = self.content.clone();
        let inputs = self.inputs.clone();
        // Replacing the handle aborts any older in-flight generation.
        self.quiz_task = Some(TaskHandle::spawn(async move {
            let outcome = generator.generate(&content).await.map_err(Arc::new);
            let _ = inputs.send(Input::QuizResolved {
                generation,
                outcome,
            });
        }));

        self.emit(SessionEvent::QuizLoading);
    }

    fn apply_quiz_result(
        &mut self,
        generation: u64,
        outcome: Result<QuizOutput, Arc<QuizGenerationError>>,
    ) {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "Discarding stale quiz result");
            return;
        }
        self.quiz_task = None;
        self.quiz.loading = false;

        match outcome {
            Ok(output) => {
                let blocks = parse_quiz(&output).into_blocks();
                info!(generation, blocks = blocks.len(), "Focus-check quiz ready");
                self.quiz.blocks = blocks.clone();
                self.quiz.raw = Some(output);
                self.emit(SessionEvent::QuizReady(blocks));
            }
            Err(e) => {
                match e.as_ref() {
                    QuizGenerationError::Schema { raw } => {
                        warn!(generation, raw = %raw, "Quiz output rejected")
                    }
                    QuizGenerationError::Transport(cause) => {
                        warn!(generation, error = ?cause, "Quiz generation failed")
                    }
                }
                self.emit(SessionEvent::QuizFailed {
                    message: "Quiz generation failed.".to_string(),
                });
            }
        }
    }

    fn answer_quiz(&mut self, block: usize, option: usize) {
        if self.quiz.blocks.is_empty() {
            debug!("Ignoring answer: no quiz is being shown");
            return;
        }
        let correct = self
            .quiz
            .blocks
            .get(block)
            .and_then(|b| b.is_correct(option));

        self.tracker.boost(BoostKind::QuizAnswer);
        self.clear_quiz();
        self.emit(SessionEvent::QuizAnswered { correct });
        self.on_engagement_changed();
    }

    /// Drops the current quiz. An in-flight generation is aborted and any
    /// result it already queued becomes stale.
    fn clear_quiz(&mut self) {
        self.generation += 1;
        if let Some(quiz_task) = self.quiz_task.take() {
            quiz_task.cancel();
        }
        self.quiz = QuizState::default();
    }

    fn record_history(&mut self) {
        if self.history_capacity == 0 {
            return;
        }
        if self.history.len() == self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(self.tracker.engagement());
    }

    fn snapshot(&self) -> AttentionSnapshot {
        let engagement = self.tracker.engagement();
        AttentionSnapshot {
            engagement,
            reward: self.tracker.reward(),
            cooldown_active: self.scheduler.cooldown_active(),
            low_focus: self.scheduler.low_focus(),
            mode: AdaptiveMode::from_engagement(engagement),
        }
    }

    /// Releases the decay timer and sample source together, then the rest.
    fn teardown(&mut self) {
        if let Some(decay) = self.decay.take() {
            decay.cancel();
        }
        if let Some(sampler) = self.sampler.take() {
            sampler.cancel();
        }
        if let Some(cooldown) = self.cooldown.take() {
            cooldown.cancel();
        }
        if let Some(quiz_task) = self.quiz_task.take() {
            quiz_task.cancel();
        }
        info!(
            engagement = self.tracker.engagement(),
            reward = self.tracker.reward(),
            "Focus tracking stopped"
        );
        self.emit(SessionEvent::Stopped);
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            trace!("Session event dropped: receiver closed");
        }
    }
}
