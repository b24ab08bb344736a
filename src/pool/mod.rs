//! The worker pool: dispatcher, workers, and the shutdown protocol.
//!
//! Shutdown is two-phase. The dispatcher first awaits the queue drain
//! (every seeded link acknowledged), then enqueues one stop job per
//! worker and awaits their exit. Cancellation is the coarser escape
//! hatch: it aborts the workers at their suspension points instead of
//! waiting for the drain.

pub mod dispatcher;
pub mod worker;

pub use dispatcher::Dispatcher;
pub use worker::Worker;
