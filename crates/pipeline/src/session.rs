//! Stream session loop
//!
//! Drives connect → consume → fail cycles until shutdown or a fatal error.
//!
//! # States
//!
//! ```text
//!            ┌──────────────── Proceed ─────────────────┐
//!            ▼                                          │
//!      [Connecting] ──ok──▶ [Streaming] ──fail/end──▶ [Reconnecting] ──veto──▶ error
//!            │ fail              │ shutdown              │ shutdown
//!            └──▶ Reconnecting   ▼                       ▼
//!                            [Draining] ◀────────────────┘
//!                                │ forced rotation (stopping)
//!                                ▼
//!                             [Closed]
//! ```
//!
//! The stream read is the only blocking point while streaming; shutdown is
//! observed after the next record or disconnect. Transient source errors are
//! logged and fed to the rate limiter; anything else aborts the loop. The
//! open output file is finalized on every exit path.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{error, info};

use spool_sinks::{OutputRotator, RateLimitedLogger};
use spool_sources::{KeywordFilter, RecordStream, SourceError, StreamSource};

use crate::backoff::BackoffPolicy;
use crate::clock::Clock;
use crate::error::{PipelineError, Result};
use crate::heartbeat::HeartbeatMonitor;
use crate::rate_limiter::{RateLimiter, ReconnectDecision};
use crate::shutdown::ShutdownFlag;

/// Default steady heartbeat interval in seconds
pub const DEFAULT_SECONDS_PER_HEARTBEAT: u64 = 64;

/// Session loop tuning
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Reconnect backoff
    pub backoff: BackoffPolicy,

    /// Connection attempts allowed per `connect_limit_interval`
    pub connect_limit: usize,

    /// Window for `connect_limit`
    pub connect_limit_interval: Duration,

    /// Steady heartbeat interval in seconds (power of two)
    pub seconds_per_heartbeat: u64,

    /// Keyword file reloaded at every connect
    pub keywords_file: Option<PathBuf>,

    /// Minimum gap between repeated transport warnings
    pub warning_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backoff: BackoffPolicy::default(),
            connect_limit: 10,
            connect_limit_interval: Duration::from_secs(3600),
            seconds_per_heartbeat: DEFAULT_SECONDS_PER_HEARTBEAT,
            keywords_file: None,
            warning_interval: Duration::from_secs(10),
        }
    }
}

/// Totals reported when the loop closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Records written over the whole process
    pub records: u64,

    /// Connection attempts initiated
    pub attempts: u64,

    /// Connections that reached streaming
    pub connections: u64,

    /// Output files finalized
    pub rotations: u64,
}

/// One connect-to-failure span
#[derive(Debug)]
struct Session {
    connected_at: Instant,
    filter: Option<KeywordFilter>,
    records: u64,
}

enum State<T> {
    Connecting,
    Streaming(T),
    Reconnecting,
    Draining,
}

/// The resilient ingestion loop
pub struct StreamSession<S, C> {
    source: S,
    clock: C,
    rotator: OutputRotator,
    shutdown: ShutdownFlag,
    limiter: RateLimiter,
    heartbeat: HeartbeatMonitor,
    keywords_file: Option<PathBuf>,
    warnings: RateLimitedLogger,

    /// Most recent session; replaced at the next successful connect
    session: Option<Session>,

    /// Scratch buffer for the canonical record line
    line: Vec<u8>,

    summary: SessionSummary,
}

impl<S, C> StreamSession<S, C>
where
    S: StreamSource,
    C: Clock,
{
    pub fn new(
        source: S,
        rotator: OutputRotator,
        clock: C,
        shutdown: ShutdownFlag,
        config: SessionConfig,
    ) -> Self {
        let limiter = RateLimiter::new(
            config.backoff,
            config.connect_limit,
            config.connect_limit_interval,
        );
        let heartbeat = HeartbeatMonitor::new(config.seconds_per_heartbeat, clock.now());

        Self {
            source,
            clock,
            rotator,
            shutdown,
            limiter,
            heartbeat,
            keywords_file: config.keywords_file,
            warnings: RateLimitedLogger::new(config.warning_interval),
            session: None,
            line: Vec::with_capacity(4096),
            summary: SessionSummary::default(),
        }
    }

    /// Run until shutdown (Ok) or a fatal error (Err)
    ///
    /// Opens the first output file before connecting. Whatever the outcome,
    /// the open file is finalized before returning.
    pub async fn run(mut self) -> Result<SessionSummary> {
        let result = self.drive().await;

        if self.rotator.is_open() {
            let filter = self.session.as_ref().and_then(|s| s.filter.as_ref());
            match self.rotator.rotate_if_needed(self.clock.local_now(), true, filter) {
                Ok(_) => {}
                Err(e) if result.is_err() => {
                    error!(error = %e, "failed to finalize output file after fatal error");
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.summary.rotations = self.rotator.rotations();

        match &result {
            Ok(()) => info!(
                records = self.summary.records,
                connections = self.summary.connections,
                attempts = self.summary.attempts,
                rotations = self.summary.rotations,
                "session closed"
            ),
            Err(e) => error!(
                error = %e,
                records = self.summary.records,
                connections = self.summary.connections,
                rotations = self.summary.rotations,
                "session aborted"
            ),
        }

        result.map(|()| self.summary)
    }

    async fn drive(&mut self) -> Result<()> {
        self.rotator.open(self.clock.local_now())?;

        let mut state = State::Connecting;
        loop {
            state = match state {
                State::Connecting => self.connect().await?,
                State::Streaming(stream) => self.stream(stream).await?,
                State::Reconnecting => self.reconnect().await?,
                State::Draining => return Ok(()),
            };
        }
    }

    async fn connect(&mut self) -> Result<State<S::Stream>> {
        if self.shutdown.is_set() {
            return Ok(State::Draining);
        }

        let now = self.clock.now();
        self.limiter.record_attempt(now);
        self.summary.attempts += 1;

        let filter = match &self.keywords_file {
            Some(path) => match KeywordFilter::load(path) {
                Ok(filter) => Some(filter),
                Err(e) => return self.source_failure(e),
            },
            None => None,
        };

        match self.source.connect(filter.as_ref()).await {
            Ok(stream) => {
                self.summary.connections += 1;
                self.rotate_on_filter_change(filter.as_ref())?;
                self.session = Some(Session {
                    connected_at: now,
                    filter,
                    records: 0,
                });
                Ok(State::Streaming(stream))
            }
            Err(e) => self.source_failure(e),
        }
    }

    async fn stream(&mut self, mut stream: S::Stream) -> Result<State<S::Stream>> {
        loop {
            let record = match stream.next_record().await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    self.log_disconnect();
                    return self.source_failure(SourceError::Ended);
                }
                Err(e) => {
                    self.log_disconnect();
                    return self.source_failure(e);
                }
            };

            self.line.clear();
            record.encode_line(&mut self.line)?;
            self.rotator.append(&self.line)?;

            let filter = self.session.as_ref().and_then(|s| s.filter.as_ref());
            self.rotator
                .rotate_if_needed(self.clock.local_now(), false, filter)?;

            self.summary.records += 1;
            if let Some(session) = &mut self.session {
                session.records += 1;
            }
            self.heartbeat.tick(self.clock.now());

            if self.shutdown.is_set() {
                info!("shutdown requested, draining");
                return Ok(State::Draining);
            }
        }
    }

    async fn reconnect(&mut self) -> Result<State<S::Stream>> {
        match self.limiter.await_reconnect(&self.clock, &self.shutdown).await {
            ReconnectDecision::Proceed => Ok(State::Connecting),
            ReconnectDecision::Shutdown => {
                info!("shutdown requested during reconnect delay, draining");
                Ok(State::Draining)
            }
            ReconnectDecision::Vetoed { attempts, window } => {
                Err(PipelineError::ReconnectVetoed { attempts, window })
            }
        }
    }

    /// Close the open file if its records were produced under another filter
    ///
    /// Each data file's `.keywords` dump must describe every record in it,
    /// so a changed keyword file starts a new data file. An empty file just
    /// adopts the new filter.
    fn rotate_on_filter_change(&mut self, next: Option<&KeywordFilter>) -> Result<()> {
        let previous = self.session.as_ref().and_then(|s| s.filter.as_ref());
        if previous.map(KeywordFilter::hash) == next.map(KeywordFilter::hash)
            || self.rotator.records_since_open() == 0
        {
            return Ok(());
        }

        info!(
            previous = previous.map_or("none", KeywordFilter::hash),
            next = next.map_or("none", KeywordFilter::hash),
            "keyword filter changed, rotating output file"
        );
        self.rotator.rotate(self.clock.local_now(), false, previous)?;
        Ok(())
    }

    /// Route a source error: transient ones reconnect, the rest abort
    fn source_failure(&self, e: SourceError) -> Result<State<S::Stream>> {
        if !e.is_transient() {
            return Err(PipelineError::Source(e));
        }

        if e.is_auth_failure() {
            error!(error = %e, "stream rejected credentials, will retry");
        } else {
            self.warnings
                .warn(self.clock.now(), "stream failed, reconnecting", &e);
        }
        Ok(State::Reconnecting)
    }

    fn log_disconnect(&self) {
        if let Some(session) = &self.session {
            let connected_for = self.clock.now().saturating_duration_since(session.connected_at);
            info!(
                records = session.records,
                connected_secs = connected_for.as_secs(),
                "stream disconnected"
            );
        }
    }

    /// Totals so far
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            rotations: self.rotator.rotations(),
            ..self.summary
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
