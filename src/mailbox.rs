//! Single-slot handoff mailbox.
//!
//! A [`Mailbox`] holds at most one pending value. Sending replaces any value
//! that has not been consumed yet, so a receiver always observes the most
//! recently sent value. Sends never block; receives suspend until a value is
//! available.

use std::sync::Mutex;

use tokio::sync::Notify;
use tracing::trace;

/// Capacity-1 mailbox for handing the latest value between tasks.
///
/// Any number of concurrent receivers may wait on the same mailbox, but each
/// sent value is consumed by exactly one of them; the rest keep waiting for
/// the next send. Delivery is first-waiter-wins, not broadcast.
pub struct Mailbox<T> {
    /// The pending value, if any. At most one is ever held.
    slot: Mutex<Option<T>>,
    /// Wakes one suspended receiver per send.
    notify: Notify,
}

impl<T> Mailbox<T> {
    /// Creates an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Stores `value`, replacing any pending value that was never consumed.
    ///
    /// Never blocks and never fails. Wakes at most one suspended receiver.
    ///
    /// # Panics
    ///
    /// Panics if the slot lock is poisoned.
    pub fn send(&self, value: T) {
        let replaced = {
            let mut slot = self.slot.lock().expect("mailbox lock poisoned");
            slot.replace(value)
        };
        if replaced.is_some() {
            trace!("mailbox value overwritten before delivery");
        }
        self.notify.notify_one();
    }

    /// Receives the pending value, suspending until one is available.
    ///
    /// The pending condition is re-checked after every wakeup, so stray
    /// notifications (e.g. a permit left over from a send that raced with a
    /// non-waiting receive) cannot yield an empty result.
    pub async fn recv(&self) -> T {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        loop {
            // Register for notification before checking the slot, so a send
            // landing between the check and the await is never missed.
            notified.as_mut().enable();
            if let Some(value) = self.take() {
                return value;
            }
            notified.as_mut().await;
            notified.set(self.notify.notified());
        }
    }

    /// Takes the pending value without waiting.
    pub fn try_recv(&self) -> Option<T> {
        self.take()
    }

    fn take(&self) -> Option<T> {
        self.slot.lock().expect("mailbox lock poisoned").take()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Mailbox<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let occupied = self
            .slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or_default();
        f.debug_struct("Mailbox")
            .field("occupied", &occupied)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::task::Poll;

    use tokio_test::task;
    use tokio_test::{assert_pending, assert_ready_eq};

    use super::*;

    #[test]
    fn try_recv_on_empty_mailbox_is_none() {
        let mailbox: Mailbox<u32> = Mailbox::new();
        assert_eq!(mailbox.try_recv(), None);
    }

    #[test]
    fn send_then_try_recv_round_trips() {
        let mailbox = Mailbox::new();
        mailbox.send(5);
        assert_eq!(mailbox.try_recv(), Some(5));
        // Consumed: the slot is empty again
        assert_eq!(mailbox.try_recv(), None);
    }

    #[test]
    fn send_overwrites_pending_value() {
        let mailbox = Mailbox::new();
        mailbox.send(1);
        mailbox.send(2);

        let mut recv = task::spawn(mailbox.recv());
        assert_ready_eq!(recv.poll(), 2);
        drop(recv);

        // Only the most recent value was held
        assert_eq!(mailbox.try_recv(), None);
    }

    #[test]
    fn recv_blocks_until_send() {
        let mailbox = Mailbox::new();
        let mut recv = task::spawn(mailbox.recv());
        assert_pending!(recv.poll());

        mailbox.send(7);
        assert!(recv.is_woken());
        assert_ready_eq!(recv.poll(), 7);
    }

    #[test]
    fn recv_consumes_the_value() {
        let mailbox = Mailbox::new();
        mailbox.send(3);

        let mut first = task::spawn(mailbox.recv());
        assert_ready_eq!(first.poll(), 3);
        drop(first);

        let mut second = task::spawn(mailbox.recv());
        assert_pending!(second.poll());
    }

    #[test]
    fn single_consumer_always_sees_latest_value() {
        let mailbox = Mailbox::new();
        mailbox.send(1);
        mailbox.send(2);
        mailbox.send(3);

        let mut recv = task::spawn(mailbox.recv());
        assert_ready_eq!(recv.poll(), 3);
    }

    #[test]
    fn one_value_reaches_exactly_one_receiver() {
        let mailbox = Mailbox::new();
        let mut a = task::spawn(mailbox.recv());
        let mut b = task::spawn(mailbox.recv());
        assert_pending!(a.poll());
        assert_pending!(b.poll());

        mailbox.send(7);
        let got_a = matches!(a.poll(), Poll::Ready(7));
        let got_b = matches!(b.poll(), Poll::Ready(7));
        assert!(
            got_a ^ got_b,
            "exactly one receiver should obtain the value"
        );

        // The other receiver picks up the next send
        let mut remaining = if got_a { b } else { a };
        mailbox.send(9);
        assert!(remaining.is_woken());
        assert_ready_eq!(remaining.poll(), 9);
    }

    #[test]
    fn debug_reports_occupancy() {
        let mailbox = Mailbox::new();
        assert!(format!("{mailbox:?}").contains("occupied: false"));
        mailbox.send(1);
        assert!(format!("{mailbox:?}").contains("occupied: true"));
    }
}
