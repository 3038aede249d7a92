//! Spool - Pipeline
//!
//! The resilient ingestion loop that connects a stream source to the output
//! rotator and keeps it alive against an unreliable upstream.
//!
//! # Architecture
//!
//! ```text
//! [StreamSource] ──records──▶ [StreamSession] ──bytes──▶ [OutputRotator]
//!                                  │    │
//!                   on failure ◀───┘    └───▶ [HeartbeatMonitor]
//!                       │
//!                 [RateLimiter]
//!                 ├─ ConnectionLog   (veto: too many attempts per window)
//!                 └─ BackoffState    (exponential delay, reset when stable)
//! ```
//!
//! # Key Design
//!
//! - **Single task**: the loop owns the rotator, monitor, log and backoff
//!   state; nothing is shared except the [`ShutdownFlag`]
//! - **Pure backoff**: [`BackoffState::step`] is a side-effect-free transition
//! - **Injected time**: everything reads time through [`Clock`]
//! - **Classified errors**: transient source errors reconnect, everything
//!   else aborts with a [`PipelineError`]
//!
//! # Example
//!
//! ```ignore
//! use spool_pipeline::{SessionConfig, ShutdownFlag, StreamSession, SystemClock};
//!
//! let shutdown = ShutdownFlag::new();
//! let session = StreamSession::new(source, rotator, SystemClock, shutdown.clone(), SessionConfig::default());
//! let summary = session.run().await?;
//! ```

mod backoff;
mod clock;
mod connection_log;
mod error;
mod heartbeat;
mod rate_limiter;
mod session;
mod shutdown;

pub use backoff::{BackoffAction, BackoffEvent, BackoffPolicy, BackoffState};
pub use clock::{Clock, SystemClock};
pub use connection_log::ConnectionLog;
pub use error::{PipelineError, Result};
pub use heartbeat::{HeartbeatMonitor, HeartbeatSnapshot};
pub use rate_limiter::{RateLimiter, ReconnectDecision, SHUTDOWN_POLL_INTERVAL};
pub use session::{DEFAULT_SECONDS_PER_HEARTBEAT, SessionConfig, SessionSummary, StreamSession};
pub use shutdown::ShutdownFlag;
