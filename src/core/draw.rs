//! Lucky draw engine.
//!
//! A tick-driven state machine with no internal timer. The caller starts a
//! draw, then calls `tick()` after each returned delay until the engine
//! reports a winner.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Drawing --tick--> Drawing (frame)
//!                         --tick--> Idle    (winner)
//!                         --cancel--> Idle
//! ```
//!
//! Frames only expose a transient display name. The winner is sampled
//! independently from the pool snapshot taken at `start()`.

use crate::domain::model::{new_id, DrawMode, DrawWinner, Participant};
use crate::utils::error::{Result, ToolboxError};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;

/// Roster minus every name already in `history`, or the whole roster when
/// repeats are allowed.
pub fn compute_eligible_pool<'a>(
    roster: &'a [Participant],
    history: &[DrawWinner],
    mode: DrawMode,
) -> Vec<&'a Participant> {
    match mode {
        DrawMode::AllowRepeat => roster.iter().collect(),
        DrawMode::NoRepeat => {
            let won: HashSet<&str> = history.iter().map(|w| w.name.as_str()).collect();
            roster
                .iter()
                .filter(|p| !won.contains(p.name.as_str()))
                .collect()
        }
    }
}

/// Longest reveal window a configuration may ask for. Also caps any single
/// frame delay.
pub const MAX_REVEAL_WINDOW: Duration = Duration::from_secs(15);

/// Decelerating reveal schedule: the delay after frame `n` is
/// `initial_delay * slowdown^n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTiming {
    pub frames: u32,
    pub initial_delay: Duration,
    pub slowdown: f64,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            frames: 40,
            initial_delay: Duration::from_millis(50),
            slowdown: 1.05,
        }
    }
}

impl RevealTiming {
    /// Saturates at `MAX_REVEAL_WINDOW`.
    pub fn delay_after(&self, frame: u32) -> Duration {
        let factor = self.slowdown.powi(frame.min(i32::MAX as u32) as i32);
        Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .map(|d| d.min(MAX_REVEAL_WINDOW))
            .unwrap_or(MAX_REVEAL_WINDOW)
    }

    /// Wall-clock length of the whole reveal window.
    pub fn total_duration(&self) -> Duration {
        (1..=self.frames).fold(Duration::ZERO, |total, n| {
            total.saturating_add(self.delay_after(n))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Drawing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    /// 1-based frame number.
    pub frame: u32,
    pub display_name: String,
    pub next_tick_in: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawStep {
    Frame(RevealFrame),
    Finished(DrawWinner),
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Drawing {
        pool: Vec<Participant>,
        frames_shown: u32,
    },
}

#[derive(Debug, Clone)]
pub struct DrawEngine {
    mode: DrawMode,
    timing: RevealTiming,
    history: Vec<DrawWinner>,
    phase: Phase,
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::new(DrawMode::default(), RevealTiming::default())
    }
}

impl DrawEngine {
    pub fn new(mode: DrawMode, timing: RevealTiming) -> Self {
        Self {
            mode,
            timing,
            history: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn with_history(mut self, history: Vec<DrawWinner>) -> Self {
        self.history = history;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> DrawState {
        match self.phase {
            Phase::Idle => DrawState::Idle,
            Phase::Drawing { .. } => DrawState::Drawing,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.state() == DrawState::Drawing
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    /// Most recent winner first.
    pub fn history(&self) -> &[DrawWinner] {
        &self.history
    }

    pub fn eligible_pool<'a>(&self, roster: &'a [Participant]) -> Vec<&'a Participant> {
        compute_eligible_pool(roster, &self.history, self.mode)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// The mode applies from the next `start()`; a running draw keeps its pool.
    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    /// Idle -> Drawing. Returns the first reveal frame.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        roster: &[Participant],
        rng: &mut R,
    ) -> Result<RevealFrame> {
        if self.is_drawing() {
            return Err(ToolboxError::DrawInProgress);
        }

        let pool: Vec<Participant> = self.eligible_pool(roster).into_iter().cloned().collect();
        if pool.is_empty() {
            return Err(ToolboxError::EmptyPool);
        }

        tracing::debug!("Starting draw with {} eligible participants", pool.len());
        let frame = self.frame(&pool, 1, rng);
        self.phase = Phase::Drawing {
            pool,
            frames_shown: 1,
        };
        Ok(frame)
    }

    /// Advances a running draw by one step.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> Result<DrawStep> {
        let Phase::Drawing { pool, frames_shown } = &mut self.phase else {
            return Err(ToolboxError::NotDrawing);
        };

        if *frames_shown < self.timing.frames {
            *frames_shown += 1;
            let n = *frames_shown;
            let frame = Self::sample_frame(&self.timing, pool, n, rng);
            return Ok(DrawStep::Frame(frame));
        }

        let winner = pool
            .choose(rng)
            .map(|p| DrawWinner {
                id: new_id(),
                name: p.name.clone(),
                timestamp: now,
            })
            .ok_or(ToolboxError::EmptyPool)?;

        self.history.insert(0, winner.clone());
        self.phase = Phase::Idle;
        tracing::info!("🎉 Winner drawn: {}", winner.name);
        Ok(DrawStep::Finished(winner))
    }

    /// Drawing -> Idle without recording a winner. Returns whether a draw was
    /// actually running.
    pub fn cancel(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        if was_drawing {
            tracing::debug!("Draw cancelled before a winner was chosen");
        }
        self.phase = Phase::Idle;
        was_drawing
    }

    pub fn clear_history(&mut self) -> Result<()> {
        if self.is_drawing() {
            return Err(ToolboxError::DrawInProgress);
        }
        self.history.clear();
        Ok(())
    }

    /// Runs a whole start/tick cycle without waiting between frames.
    pub fn draw_now<R: Rng + ?Sized>(
        &mut self,
        roster: &[Participant],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<DrawWinner> {
        self.start(roster, rng)?;
        loop {
            if let DrawStep::Finished(winner) = self.tick(rng, now)? {
                return Ok(winner);
            }
        }
    }

    fn frame<R: Rng + ?Sized>(&self, pool: &[Participant], n: u32, rng: &mut R) -> RevealFrame {
        Self::sample_frame(&self.timing, pool, n, rng)
    }

    fn sample_frame<R: Rng + ?Sized>(
        timing: &RevealTiming,
        pool: &[Participant],
        n: u32,
        rng: &mut R,
    ) -> RevealFrame {
        let display_name = pool
            .choose(rng)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        RevealFrame {
            frame: n,
            display_name,
            next_tick_in: timing.delay_after(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster(names: &[&str]) -> Vec<Participant> {
        names.iter().map(|n| Participant::new(*n)).collect()
    }

    fn fast_timing() -> RevealTiming {
        RevealTiming {
            frames: 3,
            initial_delay: Duration::from_millis(1),
            slowdown: 1.0,
        }
    }

    #[test]
    fn test_eligible_pool_excludes_prior_winner_names() {
        let roster = roster(&["Ana", "Bo", "Cy"]);
        let history = vec![DrawWinner {
            id: "w1".to_string(),
            name: "Bo".to_string(),
            timestamp: Utc::now(),
        }];

        let pool = compute_eligible_pool(&roster, &history, DrawMode::NoRepeat);
        let names: Vec<_> = pool.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Cy"]);

        let pool = compute_eligible_pool(&roster, &history, DrawMode::AllowRepeat);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_no_repeat_draws_exhaust_pool_then_fail() {
        let roster = roster(&["Ana", "Bo", "Cy", "Di"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, fast_timing());
        let mut rng = StdRng::seed_from_u64(11);

        let mut winners = HashSet::new();
        for _ in 0..roster.len() {
            let winner = engine.draw_now(&roster, &mut rng, Utc::now()).unwrap();
            assert!(winners.insert(winner.name), "name drawn twice");
        }

        assert_eq!(engine.history().len(), 4);
        assert!(engine.eligible_pool(&roster).is_empty());
        assert!(matches!(
            engine.draw_now(&roster, &mut rng, Utc::now()),
            Err(ToolboxError::EmptyPool)
        ));
        assert_eq!(engine.state(), DrawState::Idle);
    }

    #[test]
    fn test_allow_repeat_always_draws_from_full_roster() {
        let roster = roster(&["Ana", "Bo"]);
        let mut engine = DrawEngine::new(DrawMode::AllowRepeat, fast_timing());
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..10 {
            assert!(engine.draw_now(&roster, &mut rng, Utc::now()).is_ok());
        }
        assert_eq!(engine.history().len(), 10);
    }

    #[test]
    fn test_empty_roster_rejects_draw() {
        let mut engine = DrawEngine::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            engine.start(&[], &mut rng),
            Err(ToolboxError::EmptyPool)
        ));
    }

    #[test]
    fn test_reentrant_start_is_rejected() {
        let roster = roster(&["Ana", "Bo"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, fast_timing());
        let mut rng = StdRng::seed_from_u64(9);

        engine.start(&roster, &mut rng).unwrap();
        assert!(matches!(
            engine.start(&roster, &mut rng),
            Err(ToolboxError::DrawInProgress)
        ));
        assert!(matches!(
            engine.clear_history(),
            Err(ToolboxError::DrawInProgress)
        ));
    }

    #[test]
    fn test_tick_sequence_emits_frames_then_winner() {
        let roster = roster(&["Ana", "Bo", "Cy"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, fast_timing());
        let mut rng = StdRng::seed_from_u64(21);
        let now = Utc::now();

        let first = engine.start(&roster, &mut rng).unwrap();
        assert_eq!(first.frame, 1);

        let mut frames = vec![first.frame];
        let winner = loop {
            match engine.tick(&mut rng, now).unwrap() {
                DrawStep::Frame(f) => {
                    assert!(roster.iter().any(|p| p.name == f.display_name));
                    frames.push(f.frame);
                }
                DrawStep::Finished(w) => break w,
            }
        };

        assert_eq!(frames, vec![1, 2, 3]);
        assert_eq!(winner.timestamp, now);
        assert_eq!(engine.history()[0], winner);
        assert_eq!(engine.state(), DrawState::Idle);
        assert!(matches!(
            engine.tick(&mut rng, now),
            Err(ToolboxError::NotDrawing)
        ));
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let roster = roster(&["Ana", "Bo", "Cy"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, fast_timing());
        let mut rng = StdRng::seed_from_u64(3);

        let first = engine.draw_now(&roster, &mut rng, Utc::now()).unwrap();
        let second = engine.draw_now(&roster, &mut rng, Utc::now()).unwrap();

        assert_eq!(engine.history()[0].id, second.id);
        assert_eq!(engine.history()[1].id, first.id);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_cancel_leaves_history_untouched() {
        let roster = roster(&["Ana", "Bo"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, fast_timing());
        let mut rng = StdRng::seed_from_u64(4);

        engine.start(&roster, &mut rng).unwrap();
        assert!(engine.cancel());
        assert!(!engine.cancel());
        assert!(engine.history().is_empty());
        assert_eq!(engine.state(), DrawState::Idle);
    }

    #[test]
    fn test_clear_history_restores_full_pool() {
        let roster = roster(&["Ana", "Bo"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, fast_timing());
        let mut rng = StdRng::seed_from_u64(8);

        engine.draw_now(&roster, &mut rng, Utc::now()).unwrap();
        engine.draw_now(&roster, &mut rng, Utc::now()).unwrap();
        assert!(engine.eligible_pool(&roster).is_empty());

        engine.clear_history().unwrap();
        assert!(engine.history().is_empty());
        assert_eq!(engine.eligible_pool(&roster).len(), 2);
    }

    #[test]
    fn test_duplicate_names_are_excluded_together() {
        let roster = roster(&["Tom", "Tom", "Ana"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, fast_timing())
            .with_history(vec![DrawWinner {
                id: "w".to_string(),
                name: "Tom".to_string(),
                timestamp: Utc::now(),
            }]);

        let pool = engine.eligible_pool(&roster);
        assert_eq!(pool.len(), 1);

        let mut rng = StdRng::seed_from_u64(1);
        let winner = engine.draw_now(&roster, &mut rng, Utc::now()).unwrap();
        assert_eq!(winner.name, "Ana");
    }

    #[test]
    fn test_default_timing_decelerates_over_a_few_seconds() {
        let timing = RevealTiming::default();
        assert!(timing.delay_after(10) > timing.delay_after(1));
        let total = timing.total_duration();
        assert!(total > Duration::from_secs(3) && total < Duration::from_secs(10));
    }

    #[test]
    fn test_runaway_timing_saturates_instead_of_panicking() {
        let timing = RevealTiming {
            frames: 100,
            initial_delay: Duration::from_millis(50),
            slowdown: 2.0,
        };
        assert_eq!(timing.delay_after(99), MAX_REVEAL_WINDOW);
        assert!(timing.total_duration() > MAX_REVEAL_WINDOW);

        let nan = RevealTiming {
            slowdown: f64::NAN,
            ..timing
        };
        assert_eq!(nan.delay_after(3), MAX_REVEAL_WINDOW);

        let roster = roster(&["Ana", "Bo"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, timing);
        let mut rng = StdRng::seed_from_u64(11);
        assert!(engine.draw_now(&roster, &mut rng, Utc::now()).is_ok());
    }

    #[test]
    fn test_mode_switch_applies_to_next_draw() {
        let roster = roster(&["Ana"]);
        let mut engine = DrawEngine::new(DrawMode::NoRepeat, fast_timing());
        let mut rng = StdRng::seed_from_u64(4);

        engine.draw_now(&roster, &mut rng, Utc::now()).unwrap();
        assert!(engine.eligible_pool(&roster).is_empty());

        engine.set_mode(DrawMode::AllowRepeat);
        assert_eq!(engine.mode(), DrawMode::AllowRepeat);
        assert_eq!(engine.eligible_pool(&roster).len(), 1);
    }

    #[test]
    fn test_winner_distribution_is_uniform() {
        let roster = roster(&["Ana", "Bo", "Cy"]);
        let timing = RevealTiming {
            frames: 1,
            ..fast_timing()
        };
        let mut engine = DrawEngine::new(DrawMode::AllowRepeat, timing);
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = std::collections::HashMap::new();

        for _ in 0..9_000 {
            let w = engine.draw_now(&roster, &mut rng, Utc::now()).unwrap();
            *counts.entry(w.name).or_insert(0u32) += 1;
        }

        for name in ["Ana", "Bo", "Cy"] {
            let c = counts[name];
            assert!((2_700..3_300).contains(&c), "{} drawn {} times", name, c);
        }
    }
}
