//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `escoba_core::api` instead of reaching into internal modules.

pub use crate::backend::{ModelCatalog, SimulationBackend};
pub use crate::catalog::CatalogCache;
pub use crate::config::{
    load_default, AppConfig, BackendConfig, FormConfig, LoggingConfig, ReplayConfig, TuiConfig,
};
pub use crate::dispatch::Dispatcher;
pub use crate::error::{
    CatalogUnavailable, CliError, DispatchError, TransportError, ValidationError,
};
pub use crate::form::{FormBuilder, ModelChoice, PlayerRow, RowState, CUSTOM_OPTION};
pub use crate::replay::{
    render_event, CancelToken, LineKind, RecordingObserver, RenderedLine, ReplayObserver,
    ReplayOutcome, ReplayStep, Replayer, TableState,
};
pub use crate::simulation::{
    ActionEvent, FinalScores, LogEvent, NarrativeEvent, RunConfiguration, ScoreEntry,
    SimulateRequest, SimulationResult,
};
pub use crate::state::{
    Panels, PhaseTransition, PlayerSlot, RunHandle, RunOutcome, RunSession, SessionController,
    SessionEvent, SessionPhase,
};
