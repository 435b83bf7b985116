pub mod flow_standard;
pub mod flow_tui;

pub use flow_standard as standard;
pub use flow_tui as tui;
