use asteroids_core::{FrameSink, ScreenMode, Session};
use serde::Serialize;

/// Heads-up display values a renderer shows each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub mode: ScreenMode,
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub level: u32,
}

impl Hud {
    pub fn capture(session: &Session) -> Self {
        Self {
            mode: session.mode(),
            score: session.score(),
            high_score: session.high_score(),
            lives: session.lives(),
            level: session.level(),
        }
    }

    pub fn line(&self) -> String {
        format!(
            "mode={:?} score={} high={} lives={} level={}",
            self.mode, self.score, self.high_score, self.lives, self.level
        )
    }
}

/// Headless presenter: instead of drawing, logs the HUD whenever it changes.
#[derive(Debug, Default)]
pub struct TraceSink {
    last: Option<Hud>,
    frames: u64,
    changes: u64,
}

impl TraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn changes(&self) -> u64 {
        self.changes
    }

    pub fn last_hud(&self) -> Option<Hud> {
        self.last
    }
}

impl FrameSink for TraceSink {
    fn present(&mut self, session: &Session) {
        self.frames += 1;
        let hud = Hud::capture(session);
        if self.last != Some(hud) {
            self.changes += 1;
            tracing::trace!(frame = session.frame_count(), "{}", hud.line());
            self.last = Some(hud);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids_core::{Buttons, FrameInput};

    #[test]
    fn sink_counts_hud_changes_only() {
        let mut session = Session::new(800.0, 600.0, 3);
        let mut sink = TraceSink::new();

        sink.present(&session);
        sink.present(&session);
        assert_eq!(sink.frames(), 2);
        assert_eq!(sink.changes(), 1);

        session.step(
            &FrameInput::tap(Buttons {
                confirm: true,
                ..Buttons::NONE
            }),
            1.0 / 60.0,
        );
        sink.present(&session);
        assert_eq!(sink.changes(), 2);
        assert_eq!(sink.last_hud().map(|hud| hud.mode), Some(ScreenMode::Playing));
    }

    #[test]
    fn hud_line_is_readable() {
        let session = Session::new(800.0, 600.0, 1).with_high_score(900);
        let line = Hud::capture(&session).line();
        assert_eq!(line, "mode=Menu score=0 high=900 lives=3 level=1");
    }
}
