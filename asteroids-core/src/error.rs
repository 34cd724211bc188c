use core::fmt;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Encode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "high score store i/o failure: {err}"),
            Self::Encode(reason) => write!(f, "high score encode failure: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotError {
    Encode(String),
    Decode(String),
    InvalidBounds { width: f32, height: f32 },
    Invariant(RuleCode),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(reason) => write!(f, "snapshot encode failure: {reason}"),
            Self::Decode(reason) => write!(f, "snapshot decode failure: {reason}"),
            Self::InvalidBounds { width, height } => {
                write!(f, "snapshot has invalid playfield bounds {width}x{height}")
            }
            Self::Invariant(rule) => write!(f, "snapshot breaks invariant {rule}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

#[derive(Clone, Debug, PartialEq)]
pub enum TapeError {
    Decode(String),
    InvalidBounds { width: f32, height: f32 },
    ReservedBits { frame: u32, bits: u16 },
    InvalidDt { frame: u32 },
}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(reason) => write!(f, "tape decode failure: {reason}"),
            Self::InvalidBounds { width, height } => {
                write!(f, "tape has invalid playfield bounds {width}x{height}")
            }
            Self::ReservedBits { frame, bits } => write!(
                f,
                "input reserved bits set at frame {frame}: 0x{bits:04x}"
            ),
            Self::InvalidDt { frame } => {
                write!(f, "frame {frame} has a negative or non-finite dt")
            }
        }
    }
}

impl std::error::Error for TapeError {}

/// World-state invariant that failed a consistency check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    ModeLivesConsistency,
    LevelNonZero,
    HighScoreBelowScore,
    NextExtraLifeScore,
    ShipBounds,
    ShipTimerRange,
    ShipNonFinite,
    BulletLimit,
    BulletState,
    AsteroidState,
    CooldownRange,
    CursorRange,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeLivesConsistency => write!(f, "MODE_LIVES_CONSISTENCY"),
            Self::LevelNonZero => write!(f, "LEVEL_NONZERO"),
            Self::HighScoreBelowScore => write!(f, "HIGH_SCORE_BELOW_SCORE"),
            Self::NextExtraLifeScore => write!(f, "NEXT_EXTRA_LIFE_SCORE"),
            Self::ShipBounds => write!(f, "SHIP_BOUNDS"),
            Self::ShipTimerRange => write!(f, "SHIP_TIMER_RANGE"),
            Self::ShipNonFinite => write!(f, "SHIP_NON_FINITE"),
            Self::BulletLimit => write!(f, "BULLET_LIMIT"),
            Self::BulletState => write!(f, "BULLET_STATE"),
            Self::AsteroidState => write!(f, "ASTEROID_STATE"),
            Self::CooldownRange => write!(f, "COOLDOWN_RANGE"),
            Self::CursorRange => write!(f, "CURSOR_RANGE"),
        }
    }
}
