//! Subscriber list view state.
//!
//! Projects a [`SubscriberStore`] through the current search term and keeps the
//! row selection valid as the view changes.

use crate::subscribers::export::write_export;
use crate::subscribers::models::{SubscriberId, SubscriberRecord};
use crate::subscribers::store::{InMemorySubscriberStore, SubscriberStore};
use anyhow::Result;
use chrono::NaiveDate;
use std::cmp;
use std::path::{Path, PathBuf};

/// Searchable, deletable subscriber table.
#[derive(Debug)]
pub struct SubscriberList<S: SubscriberStore = InMemorySubscriberStore> {
    /// Backing store (source of truth)
    store: S,
    /// Current search term
    search_query: String,
    /// Ids of records matching the search term, in store order
    visible: Vec<SubscriberId>,
    /// Selected row index into the visible rows
    pub selected_index: usize,
}

impl<S: SubscriberStore> SubscriberList<S> {
    /// Create a list view over a store.
    ///
    /// # Arguments
    /// * `store` - Store providing the records
    ///
    /// # Returns
    /// * `SubscriberList<S>` - View showing every record
    pub fn new(store: S) -> Self {
        let mut list = Self {
            store,
            search_query: String::new(),
            visible: Vec::new(),
            selected_index: 0,
        };
        list.refresh();
        list
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current search term.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Records whose email contains `term`, ignoring case.
    ///
    /// # Arguments
    /// * `term` - Substring to look for; empty matches everything
    ///
    /// # Returns
    /// * `Vec<&SubscriberRecord>` - Matching records in store order
    ///
    /// # Details
    /// Pure query; does not change the view's own search term.
    pub fn search(&self, term: &str) -> Vec<&SubscriberRecord> {
        let term_lower = term.to_lowercase();
        self.store
            .records()
            .iter()
            .filter(|record| term_lower.is_empty() || record.email_matches(&term_lower))
            .collect()
    }

    /// Replace the search term and recompute the visible rows.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_query = term.into();
        self.refresh();
    }

    /// Append a character to the search term.
    pub fn add_search_char(&mut self, ch: char) {
        self.search_query.push(ch);
        self.refresh();
    }

    /// Remove the last character of the search term.
    pub fn remove_search_char(&mut self) {
        self.search_query.pop();
        self.refresh();
    }

    /// Clear the search term.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.refresh();
    }

    /// Rows currently shown.
    pub fn visible_records(&self) -> Vec<&SubscriberRecord> {
        self.store
            .records()
            .iter()
            .filter(|record| self.visible.contains(&record.id))
            .collect()
    }

    /// Number of rows currently shown.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Number of records in the store.
    pub fn total_count(&self) -> usize {
        self.store.len()
    }

    /// Record under the cursor.
    pub fn selected(&self) -> Option<&SubscriberRecord> {
        let id = self.visible.get(self.selected_index)?;
        self.store.records().iter().find(|r| r.id == *id)
    }

    /// Delete a subscriber.
    ///
    /// # Arguments
    /// * `id` - Subscriber to delete
    ///
    /// # Returns
    /// * `Option<SubscriberRecord>` - Removed record, or None if no such id
    ///
    /// # Details
    /// Deleting an unknown id changes nothing.
    pub fn delete(&mut self, id: SubscriberId) -> Option<SubscriberRecord> {
        let removed = self.store.remove(id)?;
        tracing::info!(id, email = %removed.email, "subscriber deleted");
        self.refresh();
        Some(removed)
    }

    /// Delete the record under the cursor.
    pub fn delete_selected(&mut self) -> Option<SubscriberRecord> {
        let id = self.selected()?.id;
        self.delete(id)
    }

    /// Export every record, ignoring the search term.
    ///
    /// # Arguments
    /// * `dir` - Directory to write into
    /// * `today` - Date used in the file name
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path of the written CSV or error
    pub fn export_all(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf> {
        let path = write_export(self.store.records(), dir, today)?;
        tracing::info!(path = %path.display(), rows = self.store.len(), "subscribers exported");
        Ok(path)
    }

    /// Move selection up, wrapping to the bottom.
    pub fn move_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.visible.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Move selection down, wrapping to the top.
    pub fn move_down(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.visible.len();
    }

    /// Select a visible row by index; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.visible.len() {
            self.selected_index = index;
        }
    }

    fn refresh(&mut self) {
        self.visible = self
            .search(&self.search_query)
            .into_iter()
            .map(|record| record.id)
            .collect();
        self.selected_index = cmp::min(self.selected_index, self.visible.len().saturating_sub(1));
    }
}
