use serde::{Deserialize, Serialize};

const BIT_THRUST: u16 = 1 << 0;
const BIT_LEFT: u16 = 1 << 1;
const BIT_RIGHT: u16 = 1 << 2;
const BIT_FIRE: u16 = 1 << 3;
const BIT_HYPERSPACE: u16 = 1 << 4;
const BIT_PAUSE: u16 = 1 << 5;
const BIT_CONFIRM: u16 = 1 << 6;
const BIT_MENU_UP: u16 = 1 << 7;
const BIT_MENU_DOWN: u16 = 1 << 8;
const BIT_CANCEL: u16 = 1 << 9;

pub const BUTTON_MASK: u16 = (1 << 10) - 1;

/// One boolean per abstract intent. Devices are mapped onto this by adapters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons {
    pub thrust: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub hyperspace: bool,
    pub pause: bool,
    pub confirm: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    pub cancel: bool,
}

impl Buttons {
    pub const NONE: Self = Self {
        thrust: false,
        left: false,
        right: false,
        fire: false,
        hyperspace: false,
        pause: false,
        confirm: false,
        menu_up: false,
        menu_down: false,
        cancel: false,
    };

    #[inline]
    pub fn to_bits(self) -> u16 {
        (if self.thrust { BIT_THRUST } else { 0 })
            | (if self.left { BIT_LEFT } else { 0 })
            | (if self.right { BIT_RIGHT } else { 0 })
            | (if self.fire { BIT_FIRE } else { 0 })
            | (if self.hyperspace { BIT_HYPERSPACE } else { 0 })
            | (if self.pause { BIT_PAUSE } else { 0 })
            | (if self.confirm { BIT_CONFIRM } else { 0 })
            | (if self.menu_up { BIT_MENU_UP } else { 0 })
            | (if self.menu_down { BIT_MENU_DOWN } else { 0 })
            | (if self.cancel { BIT_CANCEL } else { 0 })
    }

    /// Decodes a bit mask, rejecting bits outside [`BUTTON_MASK`].
    #[inline]
    pub fn from_bits(bits: u16) -> Option<Self> {
        if bits & !BUTTON_MASK != 0 {
            return None;
        }
        Some(Self::from_bits_truncate(bits))
    }

    #[inline]
    pub fn from_bits_truncate(bits: u16) -> Self {
        Self {
            thrust: bits & BIT_THRUST != 0,
            left: bits & BIT_LEFT != 0,
            right: bits & BIT_RIGHT != 0,
            fire: bits & BIT_FIRE != 0,
            hyperspace: bits & BIT_HYPERSPACE != 0,
            pause: bits & BIT_PAUSE != 0,
            confirm: bits & BIT_CONFIRM != 0,
            menu_up: bits & BIT_MENU_UP != 0,
            menu_down: bits & BIT_MENU_DOWN != 0,
            cancel: bits & BIT_CANCEL != 0,
        }
    }

    pub fn is_empty(self) -> bool {
        self.to_bits() == 0
    }
}

/// What the simulation reads each frame: buttons currently held, and the
/// subset that went down this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub held: Buttons,
    pub pressed: Buttons,
}

impl FrameInput {
    /// Input where everything held was also pressed this frame.
    pub fn tap(buttons: Buttons) -> Self {
        Self {
            held: buttons,
            pressed: buttons,
        }
    }

    pub fn hold(buttons: Buttons) -> Self {
        Self {
            held: buttons,
            pressed: Buttons::NONE,
        }
    }
}

/// Edge detector that turns successive held snapshots into [`FrameInput`].
#[derive(Clone, Copy, Debug, Default)]
pub struct InputLatch {
    previous: u16,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latch(&mut self, held: Buttons) -> FrameInput {
        let now = held.to_bits();
        let pressed = now & !self.previous;
        self.previous = now;
        FrameInput {
            held,
            pressed: Buttons::from_bits_truncate(pressed),
        }
    }

    pub fn reset(&mut self) {
        self.previous = 0;
    }
}
