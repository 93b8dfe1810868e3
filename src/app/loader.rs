// src/app/loader.rs: background loads for display slots, drained from the UI thread
use std::future::Future;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::error::MediaResult;
use crate::app::slot::{Slot, SlotToken};

// ---- Tunables ----
/// Completions applied per `poll_done` call; the rest wait for the next frame.
pub const MAX_DONE_PER_FRAME: usize = 12;

pub struct LoadDone<T> {
    pub slot_idx: usize,
    pub token: SlotToken,
    pub result: MediaResult<T>,
}

/// What one `poll_done` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollStats {
    pub applied: usize,
    pub stale: usize,
    pub failed: usize,
}

impl PollStats {
    pub const fn drained(&self) -> usize {
        self.applied + self.stale + self.failed
    }
}

/// Runs slot loads on the tokio runtime and hands completions back over a channel.
///
/// Every load carries the token minted when its slot was assigned. Results
/// for slots that have moved on since are counted and dropped.
pub struct SlotLoader<T> {
    runtime: Handle,
    done_tx: Sender<LoadDone<T>>,
    done_rx: Receiver<LoadDone<T>>,
    in_flight: usize,
}

impl<T: Send + 'static> SlotLoader<T> {
    pub fn new(runtime: Handle) -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            runtime,
            done_tx,
            done_rx,
            in_flight: 0,
        }
    }

    /// Loads launched but not yet drained by `poll_done`.
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Point `slots[slot_idx]` at `key` and start loading it.
    ///
    /// Returns `None` when the index is out of range.
    pub fn load<F>(
        &mut self,
        slots: &mut [Slot<T>],
        slot_idx: usize,
        key: impl Into<String>,
        fut: F,
    ) -> Option<JoinHandle<()>>
    where
        F: Future<Output = MediaResult<T>> + Send + 'static,
    {
        let slot = slots.get_mut(slot_idx)?;
        let token = slot.assign(key);
        Some(self.spawn(slot_idx, token, fut))
    }

    /// Start a load for a slot the caller already assigned.
    pub fn spawn<F>(&mut self, slot_idx: usize, token: SlotToken, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = MediaResult<T>> + Send + 'static,
    {
        self.in_flight += 1;
        let done_tx = self.done_tx.clone();
        self.runtime.spawn(async move {
            let result = fut.await;
            // receiver gone means the screen was torn down
            let _ = done_tx.send(LoadDone {
                slot_idx,
                token,
                result,
            });
        })
    }

    /// Apply finished loads to `slots`, at most `MAX_DONE_PER_FRAME` of them.
    pub fn poll_done(&mut self, slots: &mut [Slot<T>]) -> PollStats {
        let mut stats = PollStats::default();

        while stats.drained() < MAX_DONE_PER_FRAME {
            let msg = match self.done_rx.try_recv() {
                Ok(msg) => msg,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            self.in_flight = self.in_flight.saturating_sub(1);

            let Some(slot) = slots.get_mut(msg.slot_idx) else {
                stats.stale += 1;
                continue;
            };
            if !slot.is_current(msg.token) {
                debug!("dropping stale load for slot {}", msg.slot_idx);
                stats.stale += 1;
                continue;
            }

            match msg.result {
                Ok(value) => match slot.publish(msg.token, value) {
                    Ok(()) => stats.applied += 1,
                    Err(_) => stats.stale += 1,
                },
                Err(e) if e.is_stale() => stats.stale += 1,
                Err(e) => {
                    warn!(
                        "load failed for slot {} ({}): {e}",
                        msg.slot_idx,
                        slot.key().unwrap_or("?")
                    );
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}
