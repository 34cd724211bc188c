use serde::{Deserialize, Serialize};

use crate::entities::{Bounds, ScreenMode};
use crate::error::TapeError;
use crate::input::{Buttons, InputLatch};
use crate::sim::Session;

/// Held buttons and frame delta for one recorded step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapeFrame {
    pub buttons: u16,
    pub dt: f32,
}

/// Everything needed to reproduce a session bit for bit: the seed, the
/// playfield it ran on, the high score it started with, and the held-button
/// snapshot of every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputTape {
    pub seed: u32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub initial_high_score: u32,
    pub frames: Vec<TapeFrame>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub frame_count: u32,
    pub final_score: u32,
    pub high_score: u32,
    pub level: u32,
    pub lives: u32,
    pub mode: ScreenMode,
    pub rng_state: u32,
}

impl InputTape {
    pub fn new(seed: u32, width: f32, height: f32) -> Self {
        Self {
            seed,
            width,
            height,
            initial_high_score: 0,
            frames: Vec::new(),
        }
    }

    pub fn with_initial_high_score(mut self, high_score: u32) -> Self {
        self.initial_high_score = high_score;
        self
    }

    pub fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }

    pub fn validate(&self) -> Result<(), TapeError> {
        if !Bounds::new(self.width, self.height).is_valid() {
            return Err(TapeError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }

        for (index, frame) in self.frames.iter().enumerate() {
            let frame_number = index as u32;
            if Buttons::from_bits(frame.buttons).is_none() {
                return Err(TapeError::ReservedBits {
                    frame: frame_number,
                    bits: frame.buttons,
                });
            }
            if !frame.dt.is_finite() || frame.dt < 0.0 {
                return Err(TapeError::InvalidDt {
                    frame: frame_number,
                });
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String, TapeError> {
        serde_json::to_string(self).map_err(|err| TapeError::Decode(err.to_string()))
    }

    /// Parses and validates a tape.
    pub fn from_json(json: &str) -> Result<Self, TapeError> {
        let tape: Self =
            serde_json::from_str(json).map_err(|err| TapeError::Decode(err.to_string()))?;
        tape.validate()?;
        Ok(tape)
    }
}

/// Accumulates frames as a driver steps a session.
#[derive(Clone, Debug)]
pub struct TapeRecorder {
    tape: InputTape,
}

impl TapeRecorder {
    pub fn new(seed: u32, bounds: Bounds, initial_high_score: u32) -> Self {
        Self {
            tape: InputTape::new(seed, bounds.width, bounds.height)
                .with_initial_high_score(initial_high_score),
        }
    }

    pub fn record(&mut self, held: Buttons, dt: f32) {
        self.tape.frames.push(TapeFrame {
            buttons: held.to_bits(),
            dt,
        });
    }

    pub fn tape(&self) -> &InputTape {
        &self.tape
    }

    pub fn finish(self) -> InputTape {
        self.tape
    }
}

pub fn replay(tape: &InputTape) -> Result<ReplayResult, TapeError> {
    tape.validate()?;

    let mut session = Session::new(tape.width, tape.height, tape.seed)
        .with_high_score(tape.initial_high_score);
    let mut latch = InputLatch::new();

    for frame in &tape.frames {
        let input = latch.latch(Buttons::from_bits_truncate(frame.buttons));
        session.step(&input, frame.dt);
    }

    let result = ReplayResult {
        frame_count: session.frame_count(),
        final_score: session.score(),
        high_score: session.high_score(),
        level: session.level(),
        lives: session.lives(),
        mode: session.mode(),
        rng_state: session.rng_state(),
    };
    tracing::debug!(
        frames = result.frame_count,
        score = result.final_score,
        "tape replayed"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirm_then_fire(frames: usize) -> InputTape {
        let mut tape = InputTape::new(0x1234, 800.0, 600.0);
        let confirm = Buttons {
            confirm: true,
            ..Buttons::NONE
        };
        tape.frames.push(TapeFrame {
            buttons: confirm.to_bits(),
            dt: 1.0 / 60.0,
        });
        for index in 0..frames {
            let buttons = Buttons {
                fire: index % 2 == 0,
                left: index % 7 < 3,
                thrust: index % 11 < 4,
                ..Buttons::NONE
            };
            tape.frames.push(TapeFrame {
                buttons: buttons.to_bits(),
                dt: 1.0 / 60.0,
            });
        }
        tape
    }

    #[test]
    fn replay_is_deterministic() {
        let tape = confirm_then_fire(900);
        let first = replay(&tape).expect("valid tape");
        let second = replay(&tape).expect("valid tape");
        assert_eq!(first, second);
        assert_eq!(first.frame_count, 901);
        assert_ne!(first.mode, ScreenMode::Menu);
    }

    #[test]
    fn reserved_bits_are_reported_with_frame() {
        let mut tape = confirm_then_fire(3);
        tape.frames[2].buttons = 0x0400;
        assert_eq!(
            tape.validate(),
            Err(TapeError::ReservedBits {
                frame: 2,
                bits: 0x0400
            })
        );
        assert!(replay(&tape).is_err());
    }

    #[test]
    fn negative_and_nan_dt_are_rejected() {
        let mut tape = confirm_then_fire(3);
        tape.frames[1].dt = -0.1;
        assert_eq!(tape.validate(), Err(TapeError::InvalidDt { frame: 1 }));

        tape.frames[1].dt = f32::NAN;
        assert_eq!(tape.validate(), Err(TapeError::InvalidDt { frame: 1 }));

        tape.frames[1].dt = 0.0;
        assert_eq!(tape.validate(), Ok(()));
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let tape = InputTape::new(1, 0.0, 600.0);
        assert_eq!(
            tape.validate(),
            Err(TapeError::InvalidBounds {
                width: 0.0,
                height: 600.0
            })
        );
    }

    #[test]
    fn json_round_trip_replays_identically() {
        let tape = confirm_then_fire(120);
        let json = tape.to_json().expect("encode");
        let decoded = InputTape::from_json(&json).expect("decode");
        assert_eq!(decoded, tape);
        assert_eq!(replay(&decoded), replay(&tape));
    }

    #[test]
    fn replay_starts_from_the_recorded_high_score() {
        let tape = confirm_then_fire(60).with_initial_high_score(9_000);
        let result = replay(&tape).expect("valid tape");
        assert_eq!(result.high_score, 9_000);
    }

    #[test]
    fn tapes_without_high_score_field_still_load() {
        let json = r#"{"seed":3,"width":800.0,"height":600.0,"frames":[{"buttons":64,"dt":0.016}]}"#;
        let tape = InputTape::from_json(json).expect("decode");
        assert_eq!(tape.initial_high_score, 0);
        assert_eq!(tape.frame_count(), 1);
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            InputTape::from_json("{\"seed\": 1"),
            Err(TapeError::Decode(_))
        ));
    }

    #[test]
    fn recorder_captures_held_bits() {
        let mut recorder = TapeRecorder::new(9, Bounds::new(640.0, 480.0), 1_500);
        let held = Buttons {
            thrust: true,
            cancel: true,
            ..Buttons::NONE
        };
        recorder.record(held, 0.02);
        let tape = recorder.finish();
        assert_eq!(tape.seed, 9);
        assert_eq!((tape.width, tape.height), (640.0, 480.0));
        assert_eq!(tape.initial_high_score, 1_500);
        assert_eq!(
            tape.frames,
            vec![TapeFrame {
                buttons: 0b10_0000_0001,
                dt: 0.02
            }]
        );
    }
}
