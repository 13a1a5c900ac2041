//! Subscriber storage.
//!
//! The list view reads and mutates subscribers only through [`SubscriberStore`],
//! so the data source can be swapped without touching rendering.

use crate::subscribers::models::{SubscriberId, SubscriberRecord};
use chrono::NaiveDate;

/// Ordered collection of subscribers.
pub trait SubscriberStore {
    /// All records, in display order.
    fn records(&self) -> &[SubscriberRecord];

    /// Remove the record with `id`.
    ///
    /// # Returns
    /// * `Option<SubscriberRecord>` - The removed record, or None if absent
    fn remove(&mut self, id: SubscriberId) -> Option<SubscriberRecord>;

    /// Number of records.
    fn len(&self) -> usize {
        self.records().len()
    }

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// Store backed by a `Vec`; contents are lost on exit.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriberStore {
    records: Vec<SubscriberRecord>,
}

impl InMemorySubscriberStore {
    /// Create a store from existing records.
    ///
    /// # Arguments
    /// * `records` - Initial records
    ///
    /// # Returns
    /// * `InMemorySubscriberStore` - New store
    ///
    /// # Details
    /// Later records with an id already present are dropped, keeping ids unique.
    pub fn new(records: Vec<SubscriberRecord>) -> Self {
        let mut unique: Vec<SubscriberRecord> = Vec::with_capacity(records.len());
        for record in records {
            if unique.iter().any(|r| r.id == record.id) {
                tracing::warn!(id = record.id, "dropping subscriber with duplicate id");
                continue;
            }
            unique.push(record);
        }
        Self { records: unique }
    }

    /// Create a store holding the dashboard's seed subscribers.
    pub fn seeded() -> Self {
        Self::new(seed_subscribers())
    }
}

impl SubscriberStore for InMemorySubscriberStore {
    fn records(&self) -> &[SubscriberRecord] {
        &self.records
    }

    fn remove(&mut self, id: SubscriberId) -> Option<SubscriberRecord> {
        let position = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(position))
    }
}

/// Subscribers loaded when the dashboard starts.
pub fn seed_subscribers() -> Vec<SubscriberRecord> {
    let seed = [
        (1, "john.doe@gmail.com", (2024, 1, 15)),
        (2, "priya.s@yahoo.com", (2024, 1, 22)),
        (3, "arun.kumar@outlook.com", (2024, 2, 3)),
        (4, "deepa.r@gmail.com", (2024, 2, 11)),
        (5, "karthik.m@hotmail.com", (2024, 2, 19)),
        (6, "lakshmi.n@rediffmail.com", (2024, 3, 1)),
        (7, "venkat.t@tnwater.gov.in", (2024, 3, 9)),
        (8, "meena.v@protonmail.com", (2024, 3, 16)),
    ];

    seed.into_iter()
        .filter_map(|(id, email, (y, m, d))| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| SubscriberRecord::new(id, email, date))
        })
        .collect()
}
