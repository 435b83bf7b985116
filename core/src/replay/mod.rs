//! Paced, cancellable narration of a finished game log.

mod cancel;
mod observer;
mod player;
mod render;

pub use cancel::CancelToken;
pub use observer::{RecordingObserver, ReplayObserver, ReplayStep};
pub use player::{ReplayOutcome, Replayer};
pub use render::{render_event, LineKind, RenderedLine, TableState};
