//! Tracing setup for the shelter binary.
//!
//! All crate code logs through `tracing` macros and spans. This module decides
//! where those go:
//!
//! ```text
//! tracing → tracing-opentelemetry → SDK simple processor → FileSpanExporter → OTLP JSON lines
//!        └→ fmt layer → stderr          (when no trace file is configured)
//! ```
//!
//! The trace file rotates at 10 MB and keeps three numbered backups.
//!
//! - [`init`]: subscriber setup
//! - `tracer`: tracer provider with the file exporter
//! - `span_formatter`: OTLP JSON encoding
//! - `file_writer`: rotating line writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, SERVICE_NAME};
