use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::conn::ConnId;

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub title: String,
    /// Username that created the document. Never changes.
    pub owner: String,
    /// Connection currently acting for the owner.
    pub owner_conn: ConnId,
    pub created_at: DateTime<Utc>,
}

/// Open documents keyed by id, plus a reverse index from owner connection
/// to the documents it owns.
#[derive(Default, Debug)]
pub struct DocumentRegistry {
    docs: HashMap<String, Document>,
    owned: HashMap<ConnId, HashSet<String>>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, doc_id: &str) -> Option<&Document> {
        self.docs.get(doc_id)
    }

    /// Create a document owned by `owner`. Returns the existing record
    /// untouched if the id is already taken.
    pub fn create(&mut self, doc_id: &str, owner: &str, conn: ConnId) -> &Document {
        if !self.docs.contains_key(doc_id) {
            self.owned.entry(conn).or_default().insert(doc_id.to_string());
        }
        self.docs.entry(doc_id.to_string()).or_insert_with(|| Document {
            id: doc_id.to_string(),
            title: doc_id.to_string(),
            owner: owner.to_string(),
            owner_conn: conn,
            created_at: Utc::now(),
        })
    }

    /// Point the document at a new owner connection. Returns false if the
    /// document does not exist.
    pub fn reattach_owner(&mut self, doc_id: &str, conn: ConnId) -> bool {
        let Some(doc) = self.docs.get_mut(doc_id) else {
            return false;
        };
        let previous = std::mem::replace(&mut doc.owner_conn, conn);
        unindex(&mut self.owned, previous, doc_id);
        self.owned.entry(conn).or_default().insert(doc_id.to_string());
        true
    }

    pub fn remove(&mut self, doc_id: &str) -> Option<Document> {
        let doc = self.docs.remove(doc_id)?;
        unindex(&mut self.owned, doc.owner_conn, doc_id);
        Some(doc)
    }

    /// Ids of the documents whose owner connection is `conn`.
    pub fn owned_by(&self, conn: ConnId) -> Vec<String> {
        self.owned
            .get(&conn)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.values()
    }
}

fn unindex(owned: &mut HashMap<ConnId, HashSet<String>>, conn: ConnId, doc_id: &str) {
    if let Some(ids) = owned.get_mut(&conn) {
        ids.remove(doc_id);
        if ids.is_empty() {
            owned.remove(&conn);
        }
    }
}
