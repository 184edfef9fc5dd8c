pub mod config_poller;
pub mod data_poller;
pub mod liveness;
pub mod readout;
pub mod session;
pub mod state;
pub mod timer;

pub use config_poller::ConfigPoller;
pub use data_poller::{DataPoller, PollOutcome};
pub use liveness::LivenessMonitor;
pub use readout::{Readout, SharedReadout};
pub use session::{SessionStatus, TelemetrySession};
pub use state::{Connection, ConnectionState, Transition};
pub use timer::{PeriodicTask, PollSwitch};
