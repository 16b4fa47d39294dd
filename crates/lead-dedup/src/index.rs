//! Key indexes: which slot owns each id or email.

use std::collections::HashMap;

use lead_types::LeadKey;

use crate::arena::SlotId;

/// Mapping from a match key to the slot of its canonical record.
#[derive(Debug, Default)]
pub struct KeyIndex {
    slots: HashMap<LeadKey, SlotId>,
}

impl KeyIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot owning `key`, if any. An absent key never matches.
    pub fn get(&self, key: Option<&LeadKey>) -> Option<SlotId> {
        key.and_then(|k| self.slots.get(k).copied())
    }

    /// Bind `key` to `slot`, replacing any previous owner.
    pub fn bind(&mut self, key: Option<&LeadKey>, slot: SlotId) {
        if let Some(k) = key {
            self.slots.insert(k.clone(), slot);
        }
    }

    /// Unbind `key`, but only if `slot` still owns it.
    ///
    /// Returns `true` if the binding was removed.
    pub fn release(&mut self, key: Option<&LeadKey>, slot: SlotId) -> bool {
        match key {
            Some(k) if self.slots.get(k) == Some(&slot) => {
                self.slots.remove(k);
                true
            }
            _ => false,
        }
    }
}
