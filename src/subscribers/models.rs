//! Subscriber data structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a subscriber, unique within a store.
pub type SubscriberId = u64;

/// Subscription status.
///
/// Only active subscriptions exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    /// Receiving updates
    Active,
}

impl SubscriberStatus {
    /// Label used in the table and in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriberStatus::Active => "active",
        }
    }
}

impl fmt::Display for SubscriberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One newsletter sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriberRecord {
    /// Unique subscriber ID
    pub id: SubscriberId,
    /// Subscriber email address
    pub email: String,
    /// Date the subscription started
    pub joined_date: NaiveDate,
    /// Subscription status
    pub status: SubscriberStatus,
}

impl SubscriberRecord {
    /// Create an active subscriber record.
    ///
    /// # Arguments
    /// * `id` - Unique subscriber ID
    /// * `email` - Email address
    /// * `joined_date` - Subscription date
    ///
    /// # Returns
    /// * `SubscriberRecord` - New record with `Active` status
    pub fn new(id: SubscriberId, email: impl Into<String>, joined_date: NaiveDate) -> Self {
        Self {
            id,
            email: email.into(),
            joined_date,
            status: SubscriberStatus::Active,
        }
    }

    /// Case-insensitive substring match on the email address.
    ///
    /// `query_lower` must already be lowercased.
    pub fn email_matches(&self, query_lower: &str) -> bool {
        self.email.to_lowercase().contains(query_lower)
    }

    /// Format the join date as ISO `YYYY-MM-DD`.
    pub fn format_joined(&self) -> String {
        self.joined_date.format("%Y-%m-%d").to_string()
    }
}
