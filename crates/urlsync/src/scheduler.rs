//! Debounced URL write scheduling.
//!
//! Key properties:
//! - Writes are suppressed during an initial settle window so a
//!   just-parsed URL is not stomped by default state.
//! - Rapid state changes coalesce into a single trailing write.
//! - A failed write earns exactly one retry; a second failure is dropped
//!   (and logged by the caller).
//! - The scheduler hands out the *latest* desired-state token, never a
//!   captured one, so a retry always converges to the newest state.
//!
//! Time is caller-supplied monotonic milliseconds; there is no wall clock
//! in here, which keeps scheduling deterministic and replayable.

/// Identifies one desired-state generation. Monotonically increasing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WriteToken(pub u64);

/// What became of a reported write failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    /// A retry is armed for the current generation.
    Armed,
    /// A newer generation exists; it will write instead, nothing lost.
    Superseded,
    /// The single retry was already spent; the caller logs and gives up.
    Exhausted,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Armed {
    at_ms: f64,
}

#[derive(Debug)]
pub struct SyncScheduler {
    settle_until_ms: f64,
    debounce_ms: f64,
    retry_delay_ms: f64,
    /// Latest desired-state generation.
    token: u64,
    armed: Option<Armed>,
    /// Token that has already consumed its single retry.
    retried: Option<u64>,
}

pub const DEFAULT_SETTLE_MS: f64 = 1000.0;
pub const DEFAULT_DEBOUNCE_MS: f64 = 300.0;
pub const DEFAULT_RETRY_DELAY_MS: f64 = 500.0;

impl SyncScheduler {
    pub fn new(now_ms: f64) -> Self {
        Self::with_timing(
            now_ms,
            DEFAULT_SETTLE_MS,
            DEFAULT_DEBOUNCE_MS,
            DEFAULT_RETRY_DELAY_MS,
        )
    }

    pub fn with_timing(
        now_ms: f64,
        settle_ms: f64,
        debounce_ms: f64,
        retry_delay_ms: f64,
    ) -> Self {
        Self {
            settle_until_ms: now_ms + settle_ms,
            debounce_ms,
            retry_delay_ms,
            token: 0,
            armed: None,
            retried: None,
        }
    }

    /// Records that the desired state changed; (re)arms the trailing
    /// debounce timer.
    pub fn note_change(&mut self, now_ms: f64) {
        self.token += 1;
        let at_ms = (now_ms + self.debounce_ms).max(self.settle_until_ms);
        self.armed = Some(Armed { at_ms });
    }

    /// Returns the due write, if any. At most one fire per arming; the
    /// returned token is always the latest generation, so the caller must
    /// serialize its *current* state, never a captured copy.
    pub fn poll(&mut self, now_ms: f64) -> Option<WriteToken> {
        let armed = self.armed?;
        if now_ms < armed.at_ms {
            return None;
        }
        self.armed = None;
        Some(WriteToken(self.token))
    }

    /// Acknowledges a successful write.
    pub fn report_success(&mut self, _token: WriteToken) {
        // Nothing to clear: poll() already disarmed, and a newer
        // note_change() supersedes any stale acknowledgement.
    }

    /// Records a failed write. Arms exactly one retry for the current
    /// generation; a stale or already-retried failure arms nothing, and
    /// the returned [`RetryOutcome`] says which case it was.
    pub fn report_failure(&mut self, token: WriteToken, now_ms: f64) -> RetryOutcome {
        if token.0 != self.token {
            log::debug!("write failure for superseded token {}", token.0);
            return RetryOutcome::Superseded;
        }
        if self.retried == Some(self.token) {
            return RetryOutcome::Exhausted;
        }
        self.retried = Some(self.token);
        self.armed = Some(Armed {
            at_ms: now_ms + self.retry_delay_ms,
        });
        RetryOutcome::Armed
    }

    /// Drops any armed timer. Idempotent.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
