use std::collections::HashMap;

use mmrag_core::error::{Error, Result};
use mmrag_core::types::EntryId;

/// Maps index-assigned ids back to the content they stand for.
#[derive(Debug, Clone)]
pub struct ContentRegistry<C> {
    entries: HashMap<EntryId, C>,
}

impl<C> Default for ContentRegistry<C> {
    fn default() -> Self { Self { entries: HashMap::new() } }
}

impl<C> ContentRegistry<C> {
    pub fn new() -> Self { Self::default() }

    /// Ids are never reused, so registering one twice is a pairing bug.
    pub fn put(&mut self, id: EntryId, content: C) -> Result<()> {
        if self.entries.contains_key(&id) {
            return Err(Error::Operation(format!("id {id} is already registered")));
        }
        self.entries.insert(id, content);
        Ok(())
    }

    pub fn get(&self, id: EntryId) -> Result<&C> {
        self.entries.get(&id).ok_or_else(|| Error::NotFound(format!("no content registered for id {id}")))
    }

    pub fn contains(&self, id: EntryId) -> bool { self.entries.contains_key(&id) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn clear(&mut self) { self.entries.clear(); }
}
