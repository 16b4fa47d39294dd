//! Output storage for canonical leads.
//!
//! Slots are allocated in first-seen order and never move, so a [`SlotId`]
//! stays valid for the whole pass and doubles as the record's output
//! position. Fusing two records vacates one slot; vacated slots are skipped
//! when the arena is drained.

use std::fmt;

use lead_types::{EntryDate, FieldNames, Lead, LeadKey};

/// Stable handle to a slot in a [`LeadArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    /// The slot's position in allocation order.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A lead together with its extracted match keys and entry date.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalLead {
    pub lead: Lead,
    pub id: Option<LeadKey>,
    pub email: Option<LeadKey>,
    pub date: EntryDate,
}

impl CanonicalLead {
    /// Extract keys and date from `lead`.
    pub fn new(lead: Lead, fields: &FieldNames, normalize_email: bool) -> Self {
        Self {
            id: lead.id_key(fields),
            email: lead.email_key(fields, normalize_email),
            date: lead.entry_date(fields),
            lead,
        }
    }
}

/// Slot storage for canonical leads.
#[derive(Debug, Default)]
pub struct LeadArena {
    slots: Vec<Option<CanonicalLead>>,
    live: usize,
}

impl LeadArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocate a slot at the end of the output order.
    pub fn push(&mut self, entry: CanonicalLead) -> SlotId {
        let slot = SlotId(self.slots.len());
        self.slots.push(Some(entry));
        self.live += 1;
        slot
    }

    /// Get the record in a slot, or `None` if it was vacated.
    pub fn get(&self, slot: SlotId) -> Option<&CanonicalLead> {
        self.slots.get(slot.0).and_then(Option::as_ref)
    }

    /// Replace the record in an occupied slot, returning the previous one.
    ///
    /// Returns `None` and leaves the arena untouched if the slot is vacant.
    pub fn replace(&mut self, slot: SlotId, entry: CanonicalLead) -> Option<CanonicalLead> {
        let cell = self.slots.get_mut(slot.0)?;
        if cell.is_none() {
            return None;
        }
        cell.replace(entry)
    }

    /// Vacate a slot, returning its record.
    pub fn vacate(&mut self, slot: SlotId) -> Option<CanonicalLead> {
        let taken = self.slots.get_mut(slot.0)?.take();
        if taken.is_some() {
            self.live -= 1;
        }
        taken
    }

    /// Iterate over occupied slots in output order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &CanonicalLead)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|entry| (SlotId(i), entry)))
    }

    /// Consume the arena, returning the occupied records in output order.
    pub fn into_leads(self) -> Vec<Lead> {
        self.slots.into_iter().flatten().map(|entry| entry.lead).collect()
    }
}
