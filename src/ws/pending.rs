use std::collections::{HashMap, HashSet};

use super::conn::ConnId;

/// Connections that asked for access, grouped by document.
#[derive(Default, Debug)]
pub struct PendingAccess {
    entries: HashMap<String, HashSet<ConnId>>,
    membership: HashMap<ConnId, HashSet<String>>,
}

impl PendingAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `conn` to the document's set, creating the entry on first use.
    pub fn add(&mut self, doc_id: &str, conn: ConnId) -> bool {
        self.membership.entry(conn).or_default().insert(doc_id.to_string());
        self.entries.entry(doc_id.to_string()).or_default().insert(conn)
    }

    /// Snapshot of the document's set, empty if there is no entry.
    pub fn members(&self, doc_id: &str) -> Vec<ConnId> {
        self.entries
            .get(doc_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, doc_id: &str, conn: ConnId) -> bool {
        self.entries.get(doc_id).is_some_and(|set| set.contains(&conn))
    }

    #[cfg(test)]
    pub fn has_entry(&self, doc_id: &str) -> bool {
        self.entries.contains_key(doc_id)
    }

    /// Drop `conn` from every set it belongs to. Sets left empty are removed.
    /// Returns the ids of the documents it was removed from.
    pub fn remove_conn(&mut self, conn: ConnId) -> Vec<String> {
        let Some(doc_ids) = self.membership.remove(&conn) else {
            return Vec::new();
        };
        for doc_id in &doc_ids {
            if let Some(set) = self.entries.get_mut(doc_id) {
                set.remove(&conn);
                if set.is_empty() {
                    self.entries.remove(doc_id);
                }
            }
        }
        doc_ids.into_iter().collect()
    }

    /// Remove a document's whole entry, returning its former members.
    pub fn remove_entry(&mut self, doc_id: &str) -> Vec<ConnId> {
        let Some(set) = self.entries.remove(doc_id) else {
            return Vec::new();
        };
        for conn in &set {
            if let Some(ids) = self.membership.get_mut(conn) {
                ids.remove(doc_id);
                if ids.is_empty() {
                    self.membership.remove(conn);
                }
            }
        }
        set.into_iter().collect()
    }

    /// Number of documents with a pending entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, doc_id: &str) -> usize {
        self.entries.get(doc_id).map_or(0, HashSet::len)
    }
}
