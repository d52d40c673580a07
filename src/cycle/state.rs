/// Which kind of work a frame receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Full network detection and tracker reseed.
    #[default]
    Detect,
    /// Incremental tracker update.
    Track,
}

/// What happened on the frame that was just processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEvent {
    /// A target was detected and the tracker was seeded with it.
    Seeded,
    /// No target-class box survived reduction.
    NoTarget,
    /// A target was detected but the tracker refused the seed.
    ReinitFailed,
    /// The tracker produced a box.
    Tracked,
    /// The tracker reported failure.
    TrackFailed,
}

/// Position inside the detect/track cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleState {
    pub phase: Phase,
    /// Frames processed since the last successful DETECT, in
    /// `[0, cycle_length)`. Zero exactly when `phase` is `Detect`.
    pub frames_since_detect: u32,
}

impl CycleState {
    pub const INITIAL: CycleState = CycleState {
        phase: Phase::Detect,
        frames_since_detect: 0,
    };

    /// Transition for one processed frame.
    ///
    /// Events that do not belong to the current phase leave the state
    /// unchanged.
    pub fn next(self, event: CycleEvent, cycle_length: u32) -> CycleState {
        match (self.phase, event) {
            (Phase::Detect, CycleEvent::Seeded) => self.advance(cycle_length),
            (Phase::Detect, CycleEvent::NoTarget | CycleEvent::ReinitFailed) => Self::INITIAL,
            (Phase::Track, CycleEvent::Tracked | CycleEvent::TrackFailed) => {
                self.advance(cycle_length)
            }
            _ => self,
        }
    }

    fn advance(self, cycle_length: u32) -> CycleState {
        let next = self.frames_since_detect + 1;
        if next >= cycle_length {
            Self::INITIAL
        } else {
            CycleState {
                phase: Phase::Track,
                frames_since_detect: next,
            }
        }
    }
}
