//! Seams between the simulation and the outside world.
//!
//! The session never touches a device. A host supplies held buttons through an
//! [`InputSource`], draws through a [`FrameSink`], and persists the high score
//! through a [`HighScoreStore`]. [`Driver`] wires the three together.

use crate::error::StoreError;
use crate::input::{Buttons, InputLatch};
use crate::sim::{Session, StepOutcome};
use crate::tape::{InputTape, TapeRecorder};

pub trait InputSource {
    /// Buttons held for the coming frame.
    fn next_input(&mut self, session: &Session) -> Buttons;
}

pub trait FrameSink {
    fn present(&mut self, session: &Session);
}

pub trait HighScoreStore {
    /// Returns 0 when nothing has been saved yet or the saved value is unusable.
    fn load_high_score(&mut self) -> u32;
    fn save_high_score(&mut self, high_score: u32) -> Result<(), StoreError>;
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn next_input(&mut self, session: &Session) -> Buttons {
        (**self).next_input(session)
    }
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn present(&mut self, session: &Session) {
        (**self).present(session)
    }
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for &mut T {
    fn load_high_score(&mut self) -> u32 {
        (**self).load_high_score()
    }

    fn save_high_score(&mut self, high_score: u32) -> Result<(), StoreError> {
        (**self).save_high_score(high_score)
    }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _session: &Session) {}
}

#[derive(Clone, Debug, Default)]
pub struct MemoryHighScoreStore {
    value: Option<u32>,
    saves: u32,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self {
            value: Some(value),
            saves: 0,
        }
    }

    pub fn value(&self) -> Option<u32> {
        self.value
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load_high_score(&mut self) -> u32 {
        self.value.unwrap_or(0)
    }

    fn save_high_score(&mut self, high_score: u32) -> Result<(), StoreError> {
        self.value = Some(high_score);
        self.saves += 1;
        Ok(())
    }
}

/// Runs a session one frame at a time against a host's input, output and
/// high-score persistence.
pub struct Driver<I, R, S> {
    session: Session,
    input: I,
    sink: R,
    store: S,
    latch: InputLatch,
    recorder: Option<TapeRecorder>,
    seed: u32,
}

impl<I, R, S> Driver<I, R, S>
where
    I: InputSource,
    R: FrameSink,
    S: HighScoreStore,
{
    /// Creates a menu-mode session seeded with `seed`, primed with the stored
    /// high score.
    pub fn new(width: f32, height: f32, seed: u32, input: I, sink: R, mut store: S) -> Self {
        let high_score = store.load_high_score();
        let session = Session::new(width, height, seed).with_high_score(high_score);
        tracing::debug!(seed, high_score, "driver ready");

        Self {
            session,
            input,
            sink,
            store,
            latch: InputLatch::new(),
            recorder: None,
            seed,
        }
    }

    /// Records every frame into an [`InputTape`]. Ignored once a frame has run.
    pub fn record(mut self) -> Self {
        if self.session.frame_count() > 0 {
            tracing::warn!(
                frames = self.session.frame_count(),
                "recording must start before the first frame; tape disabled"
            );
            return self;
        }
        self.recorder = Some(TapeRecorder::new(
            self.seed,
            self.session.bounds(),
            self.session.high_score(),
        ));
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tape(&self) -> Option<&InputTape> {
        self.recorder.as_ref().map(TapeRecorder::tape)
    }

    /// Poll, step, persist on a new high score, then present.
    pub fn run_frame(&mut self, dt: f32) -> Result<StepOutcome, StoreError> {
        let held = self.input.next_input(&self.session);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record(held, dt);
        }

        let input = self.latch.latch(held);
        let outcome = self.session.step(&input, dt);

        if outcome.high_score_raised {
            self.store.save_high_score(self.session.high_score())?;
        }

        self.sink.present(&self.session);
        Ok(outcome)
    }

    /// Flushes the high score and hands back the session and any recorded tape.
    pub fn finish(mut self) -> Result<(Session, Option<InputTape>), StoreError> {
        self.store.save_high_score(self.session.high_score())?;
        tracing::debug!(high_score = self.session.high_score(), "driver finished");
        Ok((self.session, self.recorder.map(TapeRecorder::finish)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ScreenMode;

    struct Scripted {
        frames: Vec<Buttons>,
        cursor: usize,
    }

    impl InputSource for Scripted {
        fn next_input(&mut self, _session: &Session) -> Buttons {
            let buttons = self.frames.get(self.cursor).copied().unwrap_or_default();
            self.cursor += 1;
            buttons
        }
    }

    #[derive(Default)]
    struct CountingSink {
        frames: u32,
    }

    impl FrameSink for CountingSink {
        fn present(&mut self, _session: &Session) {
            self.frames += 1;
        }
    }

    fn confirm() -> Buttons {
        Buttons {
            confirm: true,
            ..Buttons::NONE
        }
    }

    #[test]
    fn driver_loads_high_score_and_latches_input() {
        let input = Scripted {
            frames: vec![confirm(), confirm(), Buttons::NONE],
            cursor: 0,
        };
        let mut sink = CountingSink::default();
        let mut driver = Driver::new(
            800.0,
            600.0,
            5,
            input,
            &mut sink,
            MemoryHighScoreStore::with_value(1_200),
        );
        assert_eq!(driver.session().high_score(), 1_200);

        let outcome = driver.run_frame(1.0 / 60.0).expect("memory store");
        assert!(outcome.mode_changed);
        assert_eq!(driver.session().mode(), ScreenMode::Playing);

        // Confirm still held: no second press, so still playing.
        driver.run_frame(1.0 / 60.0).expect("memory store");
        driver.run_frame(1.0 / 60.0).expect("memory store");
        assert_eq!(driver.session().mode(), ScreenMode::Playing);

        let (session, tape) = driver.finish().expect("memory store");
        assert_eq!(session.high_score(), 1_200);
        assert!(tape.is_none());
        assert_eq!(sink.frames, 3);
    }

    #[test]
    fn finish_saves_and_recording_replays() {
        let input = Scripted {
            frames: vec![confirm(); 1],
            cursor: 0,
        };
        let mut store = MemoryHighScoreStore::new();
        let mut driver = Driver::new(800.0, 600.0, 77, input, NullSink, &mut store).record();
        for _ in 0..30 {
            driver.run_frame(0.02).expect("memory store");
        }
        let frame_count = driver.session().frame_count();
        let (_, tape) = driver.finish().expect("memory store");
        assert_eq!(store.value(), Some(0));
        assert_eq!(store.saves(), 1);

        let tape = tape.expect("recording enabled");
        assert_eq!(tape.frames.len(), 30);
        let result = crate::tape::replay(&tape).expect("valid tape");
        assert_eq!(result.frame_count, frame_count);
    }

    #[test]
    fn replay_matches_a_session_primed_from_the_store() {
        let held = Buttons {
            fire: true,
            left: true,
            ..Buttons::NONE
        };
        let mut frames = vec![confirm()];
        frames.extend(std::iter::repeat(held).take(119));
        let input = Scripted { frames, cursor: 0 };
        let mut driver = Driver::new(
            800.0,
            600.0,
            91,
            input,
            NullSink,
            MemoryHighScoreStore::with_value(5_000),
        )
        .record();
        for _ in 0..120 {
            driver.run_frame(1.0 / 60.0).expect("memory store");
        }

        let (session, tape) = driver.finish().expect("memory store");
        let tape = tape.expect("recording enabled");
        assert_eq!(tape.initial_high_score, 5_000);

        let replayed = crate::tape::replay(&tape).expect("valid tape");
        assert_eq!(replayed.high_score, session.high_score());
        assert_eq!(replayed.final_score, session.score());
        assert_eq!(replayed.rng_state, session.rng_state());
    }

    #[test]
    fn recording_cannot_start_mid_session() {
        let input = Scripted {
            frames: vec![confirm()],
            cursor: 0,
        };
        let store = MemoryHighScoreStore::new();
        let mut driver = Driver::new(800.0, 600.0, 3, input, NullSink, store);
        driver.run_frame(1.0 / 60.0).expect("memory store");

        let driver = driver.record();
        assert!(driver.tape().is_none());
    }
}
