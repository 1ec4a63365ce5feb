// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

use crate::model::NoteCollection;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Handle returned by [`Notifier::subscribe`]; pass it back to
/// [`Notifier::unsubscribe`] to stop delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Payload delivered to subscribers whenever the effective selection
/// changes. Carries the new key and its resolved record so observers
/// need no catalog access of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub previous_key: Option<String>,
    pub key: Option<String>,
    pub collection: Option<NoteCollection>,
}

/// Fan-out channel for selection change notifications.
///
/// One notifier can serve several subscribers; a single shared sender can
/// also observe many selector instances, distinguishing them by payload.
/// Closed receivers are pruned lazily on the next publish.
#[derive(Debug, Default)]
pub struct Notifier {
    next_id: u64,
    outputs: Vec<(SubscriptionId, Sender<SelectionChanged>)>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh channel and register its sending half.
    pub fn subscribe(&mut self) -> (SubscriptionId, Receiver<SelectionChanged>) {
        let (sender, receiver) = channel();
        let id = self.subscribe_sender(sender);
        (id, receiver)
    }

    /// Register an existing sender, e.g. one shared across selectors.
    pub fn subscribe_sender(&mut self, sender: Sender<SelectionChanged>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.outputs.push((id, sender));
        id
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.outputs.retain(|(existing, _)| *existing != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.outputs.len()
    }

    /// Deliver one notification to every live subscriber, dropping any
    /// whose receiving half has been closed.
    pub fn publish(&mut self, change: SelectionChanged) {
        self.outputs
            .retain(|(_, sender)| sender.send(change.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::{Notifier, SelectionChanged};

    fn change(previous: Option<&str>, current: Option<&str>) -> SelectionChanged {
        SelectionChanged {
            previous_key: previous.map(str::to_owned),
            key: current.map(str::to_owned),
            collection: None,
        }
    }

    #[test]
    fn delivers_to_every_subscriber() {
        let mut notifier = Notifier::new();
        let (_, first) = notifier.subscribe();
        let (_, second) = notifier.subscribe();

        notifier.publish(change(None, Some("ionian")));

        assert_eq!(first.recv().unwrap(), change(None, Some("ionian")));
        assert_eq!(second.recv().unwrap(), change(None, Some("ionian")));
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut notifier = Notifier::new();
        let (id, receiver) = notifier.subscribe();
        notifier.unsubscribe(id);

        notifier.publish(change(None, Some("dorian")));

        assert!(receiver.try_recv().is_err());
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn prunes_closed_receivers_on_publish() {
        let mut notifier = Notifier::new();
        let (_, receiver) = notifier.subscribe();
        drop(receiver);

        notifier.publish(change(Some("ionian"), None));

        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn shared_sender_observes_multiple_notifiers() {
        let (sender, receiver) = std::sync::mpsc::channel();
        let mut first = Notifier::new();
        let mut second = Notifier::new();
        first.subscribe_sender(sender.clone());
        second.subscribe_sender(sender);

        first.publish(change(None, Some("ionian")));
        second.publish(change(None, Some("blues_minor")));

        assert_eq!(receiver.recv().unwrap().key.as_deref(), Some("ionian"));
        assert_eq!(receiver.recv().unwrap().key.as_deref(), Some("blues_minor"));
    }
}
