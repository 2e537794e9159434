//! Probe fan-out for one team and the continuous multi-team scan loop.

pub mod orchestrator;
pub mod ports;
pub mod scan_loop;

pub use orchestrator::{PassSummary, ProbeOrchestrator, plan_pass};
pub use ports::{RegistryPort, ScoreNotifier};
pub use scan_loop::{ScanLoop, ScanReport, TeamSelection};
