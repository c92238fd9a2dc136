//! Keep-alive frames for streaming connections
//!
//! Every open stream holds a [`KeepAliveLease`] for as long as its interval
//! timer exists. Dropping the stream (client disconnect, write error, server
//! shutdown) drops the timer and releases the lease, so the tracker's count
//! of active leases always equals the number of live timers.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use serde_json::json;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::debug;

/// Frames emitted on a keep-alive stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFrame {
    /// First frame, sent as soon as the stream opens
    Connected,
    /// Periodic heartbeat
    Ping,
}

impl StreamFrame {
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::Connected => json!({ "status": "connected" }),
            Self::Ping => json!({ "type": "ping" }),
        }
    }
}

/// Counts outstanding keep-alive leases
#[derive(Debug, Clone, Default)]
pub struct KeepAliveTracker {
    active: Arc<AtomicUsize>,
}

impl KeepAliveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of streams currently holding a timer
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn acquire(&self) -> KeepAliveLease {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(active, "Keep-alive lease acquired");

        KeepAliveLease {
            active: self.active.clone(),
        }
    }

    /// Opens a stream that sends `Connected`, then `Ping` every `period`
    pub fn stream(&self, period: Duration) -> KeepAliveStream {
        KeepAliveStream::new(self.acquire(), period)
    }
}

/// Ownership of one keep-alive timer; released on drop
#[derive(Debug)]
pub struct KeepAliveLease {
    active: Arc<AtomicUsize>,
}

impl Drop for KeepAliveLease {
    fn drop(&mut self) {
        let active = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(active, "Keep-alive lease released");
    }
}

/// Infinite stream of keep-alive frames
#[derive(Debug)]
pub struct KeepAliveStream {
    interval: Interval,
    connected_sent: bool,
    _lease: KeepAliveLease,
}

impl KeepAliveStream {
    fn new(lease: KeepAliveLease, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            interval,
            connected_sent: false,
            _lease: lease,
        }
    }
}

impl Stream for KeepAliveStream {
    type Item = StreamFrame;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if !this.connected_sent {
            this.connected_sent = true;
            return Poll::Ready(Some(StreamFrame::Connected));
        }

        this.interval.poll_tick(cx).map(|_| Some(StreamFrame::Ping))
    }
}
