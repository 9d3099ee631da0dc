use crate::core::draw::{DrawEngine, DrawStep, RevealFrame};
use crate::domain::model::{DrawWinner, Participant};
use crate::utils::error::Result;
use chrono::Utc;
use rand::Rng;

/// Returns the engine to Idle if the reveal is dropped before a winner.
struct CancelOnDrop<'a> {
    engine: &'a mut DrawEngine,
    armed: bool,
}

impl Drop for CancelOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.engine.cancel();
        }
    }
}

/// Drives a draw in real time, sleeping between frames.
///
/// Frames reach `on_frame` strictly in order. Dropping the returned future
/// (timeout, `select!`, task abort) drops the pending sleep and cancels the
/// draw, so nothing touches the engine afterwards.
pub async fn run_reveal<R, F>(
    engine: &mut DrawEngine,
    roster: &[Participant],
    rng: &mut R,
    mut on_frame: F,
) -> Result<DrawWinner>
where
    R: Rng + Send + ?Sized,
    F: FnMut(&RevealFrame) + Send,
{
    let first = engine.start(roster, rng)?;
    let mut guard = CancelOnDrop {
        engine,
        armed: true,
    };

    on_frame(&first);
    let mut wait = first.next_tick_in;

    loop {
        tokio::time::sleep(wait).await;
        match guard.engine.tick(rng, Utc::now())? {
            DrawStep::Frame(frame) => {
                on_frame(&frame);
                wait = frame.next_tick_in;
            }
            DrawStep::Finished(winner) => {
                guard.armed = false;
                return Ok(winner);
            }
        }
    }
}
