//! Identity map of member entities loaded through one repository.

use crate::model::member::{Member, MemberId};
use std::collections::HashMap;

/// Loaded-entity cache.
///
/// The first loaded copy of a member wins: later query rows for the same id
/// are answered from here, even when storage has changed underneath.
#[derive(Debug, Default)]
pub struct PersistenceContext {
    members: HashMap<MemberId, Member>,
}

impl PersistenceContext {
    /// Returns the managed copy of `loaded`, adopting it if none exists.
    pub fn attach(&mut self, loaded: Member) -> Member {
        self.members.entry(loaded.id).or_insert(loaded).clone()
    }

    /// Stores `member` as the managed copy, replacing any previous one.
    pub fn register(&mut self, member: Member) {
        self.members.insert(member.id, member);
    }

    pub fn get(&self, id: MemberId) -> Option<Member> {
        self.members.get(&id).cloned()
    }

    /// Drops every managed entity and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let evicted = self.members.len();
        self.members.clear();
        evicted
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
