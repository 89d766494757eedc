//! Game logic
//!
//! Pure and platform-free:
//! - Seeded RNG only
//! - Time advances only through `tick`/`GameState::advance`
//! - No rendering, DOM or audio dependencies

pub mod progress;
pub mod scratch;
pub mod segments;
pub mod state;
pub mod tick;
pub mod wheel;

pub use progress::Progress;
pub use scratch::{InputChannel, ScratchSurface};
pub use segments::{AddSegment, DEFAULT_SEGMENTS, SegmentList};
pub use state::{CompleteError, GameEvent, GameState};
pub use tick::{TickInput, tick};
pub use wheel::{
    SpinPlan, Wheel, WheelPhase, boundaries_crossed, landing_offset, rotation_delta,
    segment_degree, segment_under_pointer,
};
