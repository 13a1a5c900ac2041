//! Subscriber list: records, the backing store and CSV export.

pub mod export;
pub mod list;
pub mod models;
pub mod store;

pub use export::{export_file_name, write_export};
pub use list::SubscriberList;
pub use models::{SubscriberId, SubscriberRecord, SubscriberStatus};
pub use store::{InMemorySubscriberStore, SubscriberStore, seed_subscribers};
