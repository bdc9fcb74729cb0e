// Copyright 2026 Tasksift Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Trailing debounce on a tokio timer.
//!
//! At most one timer task is live per [`Debouncer`]. Scheduling a new value
//! drops the previous [`AbortOnDropHandle`], which aborts its task, so a
//! superseded value never fires. Dropping the debouncer aborts whatever is
//! still pending.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::task::AbortOnDropHandle;
use tracing::trace;

/// A value that survived the debounce window. `seq` counts fired timers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settled<T> {
    pub seq: u64,
    pub value: T,
}

pub struct Debouncer<T> {
    delay: Duration,
    tx: Arc<watch::Sender<Settled<T>>>,
    pending: Option<AbortOnDropHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(delay: Duration, initial: T) -> (Self, watch::Receiver<Settled<T>>) {
        let (tx, rx) = watch::channel(Settled {
            seq: 0,
            value: initial,
        });
        let debouncer = Self {
            delay,
            tx: Arc::new(tx),
            pending: None,
        };
        (debouncer, rx)
    }

    /// Restarts the wait with `value`. Must be called from within a tokio
    /// runtime.
    pub fn schedule(&mut self, value: T) {
        self.cancel();
        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        trace!(delay_ms = delay.as_millis() as u64, "debounce scheduled");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_modify(|settled| {
                settled.seq += 1;
                settled.value = value;
            });
            trace!("debounce fired");
        });
        self.pending = Some(AbortOnDropHandle::new(handle));
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            trace!("debounce cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_value() {
        let (mut debouncer, mut rx) = Debouncer::new(DELAY, String::new());
        for value in ["b", "bu", "bug"] {
            debouncer.schedule(value.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(rx.borrow().seq, 0);

        rx.changed().await.expect("sender alive");
        let settled = rx.borrow_and_update().clone();
        assert_eq!(settled.value, "bug");
        assert_eq!(settled.seq, 1);

        sleep(DELAY * 3).await;
        assert!(!rx.has_changed().expect("sender alive"));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn new_value_restarts_the_wait() {
        let (mut debouncer, rx) = Debouncer::new(DELAY, 0u32);
        debouncer.schedule(1);
        sleep(Duration::from_millis(250)).await;
        debouncer.schedule(2);
        sleep(Duration::from_millis(250)).await;
        assert_eq!(rx.borrow().seq, 0);
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(60)).await;
        assert_eq!(*rx.borrow(), Settled { seq: 1, value: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn separated_inputs_fire_in_order() {
        let (mut debouncer, rx) = Debouncer::new(DELAY, "");
        debouncer.schedule("first");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(*rx.borrow(), Settled { seq: 1, value: "first" });

        debouncer.schedule("second");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(*rx.borrow(), Settled { seq: 2, value: "second" });
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_release_the_timer() {
        let (mut debouncer, rx) = Debouncer::new(DELAY, "");
        debouncer.schedule("gone");
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        sleep(DELAY * 2).await;
        assert_eq!(rx.borrow().seq, 0);

        debouncer.schedule("also gone");
        drop(debouncer);
        sleep(DELAY * 2).await;
        assert_eq!(rx.borrow().seq, 0);
        assert_eq!(rx.borrow().value, "");
    }
}
