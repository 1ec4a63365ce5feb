// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{Catalog, NoteCollection};
use crate::notify::{Notifier, SelectionChanged, SubscriptionId};
use crate::reflector::AttributeReflector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPhase {
    Closed,
    Open,
}

/// Splitmix-seeded xorshift, enough to spread picks around. Not suitable
/// for anything security-sensitive.
#[derive(Debug, Clone)]
struct PickRng {
    state: u64,
}

impl PickRng {
    fn new(seed: u64) -> Self {
        let state = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        Self {
            state: state.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorCommand {
    OpenPicker,
    ClosePicker,
    PickKey(String),
    SetSelectedKey(Option<String>),
    ObserveAttribute(Option<String>),
    PickRandom,
    ToggleDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    PhaseChanged(PickerPhase),
    SelectionChanged(SelectionChanged),
    UnknownKeyCleared(String),
    DetailsToggled(bool),
}

/// Selection state for one picker instance, borrowing the shared catalog.
///
/// Only the key is stored; the selected record is always re-derived from
/// the catalog, so key and record cannot drift apart. All origins of a
/// selection edit (picker activation, direct key write, attribute edit,
/// random pick) funnel through one resolution path.
#[derive(Debug)]
pub struct Selector<'c> {
    catalog: &'c Catalog,
    selected_key: Option<String>,
    reflector: AttributeReflector,
    notifier: Notifier,
    phase: PickerPhase,
    show_details: bool,
    rng: PickRng,
}

impl<'c> Selector<'c> {
    /// Selector with a wall-clock random seed.
    pub fn new(catalog: &'c Catalog) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0x9e37_79b9_7f4a_7c15);
        Self::with_seed(catalog, seed)
    }

    /// Selector with a caller-supplied seed, for reproducible picks.
    pub fn with_seed(catalog: &'c Catalog, seed: u64) -> Self {
        Self {
            catalog,
            selected_key: None,
            reflector: AttributeReflector::new(),
            notifier: Notifier::new(),
            phase: PickerPhase::Closed,
            show_details: false,
            rng: PickRng::new(seed),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    /// Re-derive the selected record from the catalog. `None` whenever no
    /// key is stored; the stored key always resolves because it was
    /// validated on the way in.
    pub fn selected_collection(&self) -> Option<&'c NoteCollection> {
        self.selected_key
            .as_deref()
            .and_then(|key| self.catalog.get(key))
    }

    /// Current value of the mirrored selection attribute.
    pub fn attribute_value(&self) -> Option<&str> {
        self.reflector.value()
    }

    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    pub fn show_details(&self) -> bool {
        self.show_details
    }

    pub fn subscribe(&mut self) -> (SubscriptionId, std::sync::mpsc::Receiver<SelectionChanged>) {
        self.notifier.subscribe()
    }

    pub fn subscribe_sender(
        &mut self,
        sender: std::sync::mpsc::Sender<SelectionChanged>,
    ) -> SubscriptionId {
        self.notifier.subscribe_sender(sender)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.notifier.unsubscribe(id);
    }

    pub fn dispatch(&mut self, command: SelectorCommand) -> Vec<SelectorEvent> {
        match command {
            SelectorCommand::OpenPicker => self.set_phase(PickerPhase::Open),
            SelectorCommand::ClosePicker => self.set_phase(PickerPhase::Closed),
            SelectorCommand::PickKey(key) => self.set_selection(Some(&key)),
            SelectorCommand::SetSelectedKey(key) => self.set_selection(key.as_deref()),
            SelectorCommand::ObserveAttribute(value) => self.observe_attribute(value.as_deref()),
            SelectorCommand::PickRandom => self.pick_random(),
            SelectorCommand::ToggleDetails => {
                self.show_details = !self.show_details;
                vec![SelectorEvent::DetailsToggled(self.show_details)]
            }
        }
    }

    /// The single entry point every selection edit goes through.
    ///
    /// A key missing from the catalog degrades to a cleared selection
    /// instead of an error. When the resolved result equals the current
    /// one, nothing happens at all. On an effective change the mirrored
    /// attribute is written first, then subscribers are notified, exactly
    /// once.
    pub fn set_selection(&mut self, requested: Option<&str>) -> Vec<SelectorEvent> {
        let mut events = Vec::new();

        let resolved = match requested {
            Some(key) if self.catalog.contains(key) => Some(key),
            Some(key) => {
                events.push(SelectorEvent::UnknownKeyCleared(key.to_owned()));
                None
            }
            None => None,
        };

        if self.selected_key.as_deref() == resolved {
            // Attribute may still disagree after a rejected inbound edit;
            // realign it without notifying.
            self.reflector.sync(resolved);
            return events;
        }

        let previous_key = self.selected_key.take();
        self.selected_key = resolved.map(str::to_owned);
        self.reflector.sync(resolved);

        let change = SelectionChanged {
            previous_key,
            key: self.selected_key.clone(),
            collection: self.selected_collection().cloned(),
        };
        self.notifier.publish(change.clone());
        events.push(SelectorEvent::SelectionChanged(change));
        events
    }

    /// Inbound edit of the mirrored attribute. Echoes of our own sync
    /// writes compare equal and never reach the selection path.
    pub fn observe_attribute(&mut self, value: Option<&str>) -> Vec<SelectorEvent> {
        if !self.reflector.observe(value) {
            return Vec::new();
        }
        self.set_selection(value)
    }

    /// Pick a catalog entry other than the current one, uniformly among
    /// the remaining candidates. With two or more entries the result is
    /// guaranteed to differ from the current selection; with exactly one
    /// entry and that entry selected there is nothing to pick.
    pub fn pick_random(&mut self) -> Vec<SelectorEvent> {
        let candidates: Vec<&str> = self
            .catalog
            .keys()
            .filter(|key| Some(*key) != self.selected_key.as_deref())
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }
        let picked = candidates[self.rng.pick_index(candidates.len())].to_owned();
        self.set_selection(Some(&picked))
    }

    fn set_phase(&mut self, phase: PickerPhase) -> Vec<SelectorEvent> {
        if self.phase == phase {
            return Vec::new();
        }
        self.phase = phase;
        vec![SelectorEvent::PhaseChanged(phase)]
    }
}
