//! UI components module.
//!
//! Contains ratatui widgets for displaying the dashboard.

pub mod form;
pub mod list;
pub mod search;

pub use form::render_request_form;
pub use list::render_list;
pub use search::render_search;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::app::App;
    use crate::requests::RequestBackend;
    use crate::requests::service::SimulatedTankRequestService;
    use crate::subscribers::{InMemorySubscriberStore, SubscriberList};
    use ratatui::buffer::Buffer;
    use std::path::PathBuf;
    use std::time::Duration;

    pub fn create_app() -> App {
        App::new(
            SubscriberList::new(InMemorySubscriberStore::seeded()),
            RequestBackend::Simulated(SimulatedTankRequestService::new(Duration::from_millis(
                2000,
            ))),
            PathBuf::from("."),
            Duration::from_millis(3000),
        )
    }

    /// All cell symbols, row by row.
    pub fn buffer_text(buf: &Buffer) -> String {
        let width = buf.area.width as usize;
        buf.content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
