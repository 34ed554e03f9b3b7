//! Worker tasks that back the runtime orchestration.
//!
//! The engine worker owns every record and executes commands sequentially.

mod engine;

pub use engine::{Command, EngineParts, EngineWorker};
