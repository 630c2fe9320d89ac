//! Background worker for storage operations.
//!
//! All storage I/O runs on a dedicated thread so the event loop never blocks
//! on a write. Messages and responses cross the thread boundary as JSON, and
//! carry tracing context when OpenTelemetry export is enabled.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::ShelterWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
