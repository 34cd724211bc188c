pub mod constants;
pub mod entities;
pub mod error;
pub mod factory;
pub mod input;
pub mod io;
pub mod math;
pub mod rng;
pub mod sim;
pub mod tape;

pub use entities::{Asteroid, AsteroidSize, Bounds, Bullet, Particle, ScreenMode, Ship, Star};
pub use error::{RuleCode, SnapshotError, StoreError, TapeError};
pub use input::{Buttons, FrameInput, InputLatch};
pub use io::{Driver, FrameSink, HighScoreStore, InputSource, MemoryHighScoreStore, NullSink};
pub use rng::SeededRng;
pub use sim::{Session, StepOutcome};
pub use tape::{replay, InputTape, ReplayResult, TapeFrame, TapeRecorder};
