//! The deduplication pass.
//!
//! A [`Deduplicator`] scans leads once, left to right. Each incoming record
//! is looked up by id and by email; it becomes a new canonical record when
//! neither key is known, replaces the canonical record it matches when its
//! entry date is strictly newer, and is discarded otherwise. Every
//! replacement is recorded as a [`ChangeLogEntry`].
//!
//! The id and email indexes point at arena slots rather than at copies of
//! records, so an index can never name a record that is not in the output.

use lead_diff::diff_fields;
use lead_types::Lead;
use serde::Serialize;
use tracing::debug;

use crate::arena::{CanonicalLead, LeadArena, SlotId};
use crate::config::DedupConfig;
use crate::error::DedupResult;
use crate::index::KeyIndex;
use crate::log::{ChangeLogEntry, MatchReason};

/// Counters collected during a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    /// Records read from the input.
    pub scanned: usize,
    /// Records kept as new canonical leads.
    pub inserted: usize,
    /// Canonical records replaced by a newer match.
    pub merged: usize,
    /// Pairs of canonical records combined after a cross-key update.
    pub fused: usize,
    /// Records dropped because a match was at least as recent.
    pub discarded: usize,
    /// Records whose entry date was missing or unparsable.
    pub undated: usize,
}

/// The result of a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct DedupOutcome {
    /// Deduplicated leads, in first-seen order.
    pub leads: Vec<Lead>,
    /// Merge events, in the order they happened.
    pub log: Vec<ChangeLogEntry>,
    pub stats: DedupStats,
}

/// Runs deduplication passes under a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct Deduplicator {
    config: DedupConfig,
}

impl Deduplicator {
    /// Create a deduplicator, validating the configuration.
    pub fn new(config: DedupConfig) -> DedupResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in effect.
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Deduplicate `leads`.
    ///
    /// Never fails: records missing a key are simply not matched through
    /// that key, and undated records compare according to the configured
    /// [`UndatedPolicy`](lead_types::UndatedPolicy).
    pub fn run<I>(&self, leads: I) -> DedupOutcome
    where
        I: IntoIterator<Item = Lead>,
    {
        let mut pass = Pass::new(&self.config);
        for lead in leads {
            pass.scan(lead);
        }
        pass.finish()
    }
}

/// Deduplicate `leads` with the default configuration.
pub fn deduplicate(leads: Vec<Lead>) -> DedupOutcome {
    Deduplicator::default().run(leads)
}

/// Working state of one pass. Dropped when the pass finishes.
struct Pass<'a> {
    config: &'a DedupConfig,
    arena: LeadArena,
    by_id: KeyIndex,
    by_email: KeyIndex,
    log: Vec<ChangeLogEntry>,
    stats: DedupStats,
}

impl<'a> Pass<'a> {
    fn new(config: &'a DedupConfig) -> Self {
        Self {
            config,
            arena: LeadArena::new(),
            by_id: KeyIndex::new(),
            by_email: KeyIndex::new(),
            log: Vec::new(),
            stats: DedupStats::default(),
        }
    }

    fn canonical(&self, lead: Lead) -> CanonicalLead {
        CanonicalLead::new(lead, &self.config.fields, self.config.normalize_email)
    }

    fn scan(&mut self, lead: Lead) {
        self.stats.scanned += 1;
        let incoming = self.canonical(lead);
        if !incoming.date.is_valid() {
            self.stats.undated += 1;
        }

        let by_id = self.by_id.get(incoming.id.as_ref());
        let by_email = self.by_email.get(incoming.email.as_ref());

        if by_id.is_none() && by_email.is_none() {
            self.insert(incoming);
            return;
        }

        let newer_by_id = by_id.filter(|&slot| self.is_newer(&incoming, slot));
        let newer_by_email = by_email.filter(|&slot| self.is_newer(&incoming, slot));

        // The id match wins when both keys point at older records.
        let (target, reason, other) = match (newer_by_id, newer_by_email) {
            (Some(slot), _) => (slot, MatchReason::Id, by_email),
            (None, Some(slot)) => (slot, MatchReason::Email, by_id),
            (None, None) => {
                debug!(
                    id = ?incoming.id,
                    email = ?incoming.email,
                    date = %incoming.date,
                    "discarded lead not newer than its match"
                );
                self.stats.discarded += 1;
                return;
            }
        };

        self.merge(target, reason, incoming);

        // The other key belonged to a different record: both now share it.
        if let Some(rival) = other.filter(|&slot| slot != target) {
            self.fuse(target, rival);
        }
    }

    fn is_newer(&self, incoming: &CanonicalLead, slot: SlotId) -> bool {
        self.arena
            .get(slot)
            .is_some_and(|existing| incoming.date.is_newer_than(&existing.date, self.config.undated))
    }

    fn insert(&mut self, incoming: CanonicalLead) {
        let slot = self.arena.push(incoming);
        self.bind(slot);
        self.stats.inserted += 1;
    }

    fn merge(&mut self, target: SlotId, reason: MatchReason, incoming: CanonicalLead) {
        let Some(source) = self.arena.get(target).cloned() else {
            return;
        };

        let changes = diff_fields(&source.lead, &incoming.lead);
        let updated = self.canonical(source.lead.overlay(&incoming.lead));
        let updated_lead = updated.lead.clone();

        self.release(&source, target);
        self.arena.replace(target, updated);
        self.bind(target);

        debug!(slot = %target, %reason, changed = changes.len(), "merged lead");
        self.stats.merged += 1;
        self.log.push(ChangeLogEntry {
            source_lead: source.lead,
            updated_lead,
            changes,
            matched_by: reason,
        });
    }

    /// Combine the records in `target` and `rival` into the earlier slot.
    fn fuse(&mut self, target: SlotId, rival: SlotId) {
        let (Some(updated), Some(other)) = (self.arena.get(target), self.arena.get(rival)) else {
            return;
        };

        // On equal or incomparable dates the freshly updated record wins.
        let (older, newer) = if other.date.is_newer_than(&updated.date, self.config.undated) {
            (updated, other)
        } else {
            (other, updated)
        };
        let changes = diff_fields(&older.lead, &newer.lead);
        let fused = self.canonical(older.lead.overlay(&newer.lead));
        let older_lead = older.lead.clone();
        let fused_lead = fused.lead.clone();

        let (keep, absorb) = (target.min(rival), target.max(rival));
        if let Some(absorbed) = self.arena.vacate(absorb) {
            self.release(&absorbed, absorb);
        }
        if let Some(replaced) = self.arena.replace(keep, fused) {
            self.release(&replaced, keep);
        }
        self.bind(keep);

        debug!(kept = %keep, absorbed = %absorb, changed = changes.len(), "fused leads");
        self.stats.fused += 1;
        self.log.push(ChangeLogEntry {
            source_lead: older_lead,
            updated_lead: fused_lead,
            changes,
            matched_by: MatchReason::Fusion,
        });
    }

    /// Bind the keys of the record in `slot` to it.
    fn bind(&mut self, slot: SlotId) {
        if let Some(entry) = self.arena.get(slot) {
            self.by_id.bind(entry.id.as_ref(), slot);
            self.by_email.bind(entry.email.as_ref(), slot);
        }
    }

    /// Unbind the keys of `entry` that `slot` still owns.
    fn release(&mut self, entry: &CanonicalLead, slot: SlotId) {
        self.by_id.release(entry.id.as_ref(), slot);
        self.by_email.release(entry.email.as_ref(), slot);
    }

    fn finish(self) -> DedupOutcome {
        DedupOutcome {
            leads: self.arena.into_leads(),
            log: self.log,
            stats: self.stats,
        }
    }
}


#[cfg(test)]
mod proptests {
    use std::collections::HashSet;

    use super::*;
    use lead_types::FieldNames;
    use proptest::prelude::*;
    use serde_json::json;

    fn arb_lead() -> impl Strategy<Value = Lead> {
        (
            prop::option::of(0u8..5),
            prop::option::of(0u8..5),
            prop::option::of(1u8..6),
            0u8..3,
        )
            .prop_map(|(id, email, day, name)| {
                let mut lead = Lead::new();
                if let Some(id) = id {
                    lead.insert("id", json!(id));
                }
                if let Some(email) = email {
                    lead.insert("email", json!(format!("{email}@x.com")));
                }
                if let Some(day) = day {
                    lead.insert("entryDate", json!(format!("2024-01-{day:02}")));
                }
                lead.insert("name", json!(format!("n{name}")));
                lead
            })
    }

    fn assert_unique(leads: &[Lead]) {
        let names = FieldNames::default();
        let mut ids = HashSet::new();
        let mut emails = HashSet::new();
        for lead in leads {
            if let Some(id) = lead.id_key(&names) {
                assert!(ids.insert(id.clone()), "duplicate id {id}");
            }
            if let Some(email) = lead.email_key(&names, false) {
                assert!(emails.insert(email.clone()), "duplicate email {email}");
            }
        }
    }

    proptest! {
        #[test]
        fn output_keys_are_unique(input in prop::collection::vec(arb_lead(), 0..40)) {
            let out = deduplicate(input);
            assert_unique(&out.leads);
        }

        #[test]
        fn rescan_is_a_no_op(input in prop::collection::vec(arb_lead(), 0..40)) {
            let first = deduplicate(input);
            let second = deduplicate(first.leads.clone());
            prop_assert_eq!(&second.leads, &first.leads);
            prop_assert!(second.log.is_empty());
        }

        #[test]
        fn counters_balance(input in prop::collection::vec(arb_lead(), 0..40)) {
            let n = input.len();
            let out = deduplicate(input);
            let s = out.stats;
            prop_assert_eq!(s.scanned, n);
            prop_assert_eq!(s.inserted + s.merged + s.discarded, n);
            prop_assert_eq!(out.leads.len(), s.inserted - s.fused);
            prop_assert_eq!(out.log.len(), s.merged + s.fused);
        }

        #[test]
        fn log_changes_match_records(input in prop::collection::vec(arb_lead(), 0..40)) {
            let out = deduplicate(input);
            for entry in &out.log {
                for change in &entry.changes.changes {
                    prop_assert_eq!(entry.source_lead.get(&change.field), change.from.as_ref());
                    prop_assert_eq!(entry.updated_lead.get(&change.field), Some(&change.to));
                }
            }
        }
    }
}
