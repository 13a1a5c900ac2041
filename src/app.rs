//! Application state management.
//!
//! Owns the subscriber list, the visibility of the tank request form and the UI mode.

use crate::requests::{FormPhase, RequestBackend, TankRequestForm};
use crate::subscribers::SubscriberList;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Which widget receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Normal list view
    List,
    /// Editing the search term
    Search,
    /// Tank request popup is open
    RequestForm,
}

/// Main application state.
pub struct App {
    /// Subscriber table
    pub subscribers: SubscriberList,
    /// Open tank request form; None when hidden
    pub request_form: Option<TankRequestForm<RequestBackend>>,
    /// Current UI mode
    pub mode: UiMode,
    /// Status message to display
    pub status_message: Option<String>,
    /// Service new forms submit to
    backend: Arc<RequestBackend>,
    /// Directory exports are written to
    export_dir: PathBuf,
    /// Success window passed to new forms
    success_display: Duration,
}

impl App {
    /// Create a new application state.
    ///
    /// # Arguments
    /// * `subscribers` - Subscriber list to show
    /// * `backend` - Request service for the tank request form
    /// * `export_dir` - Directory CSV exports are written to
    /// * `success_display` - Success window before the form closes
    pub fn new(
        subscribers: SubscriberList,
        backend: RequestBackend,
        export_dir: PathBuf,
        success_display: Duration,
    ) -> Self {
        Self {
            subscribers,
            request_form: None,
            mode: UiMode::List,
            status_message: None,
            backend: Arc::new(backend),
            export_dir,
            success_display,
        }
    }

    /// Set status message.
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Show a fresh request form.
    ///
    /// # Details
    /// Does nothing if a form is already open.
    pub fn open_request_form(&mut self) {
        if self.request_form.is_none() {
            self.request_form = Some(TankRequestForm::new(
                Arc::clone(&self.backend),
                self.success_display,
            ));
        }
        self.mode = UiMode::RequestForm;
    }

    /// Hide the request form, discarding its state and pending work.
    pub fn close_request_form(&mut self) {
        if let Some(mut form) = self.request_form.take() {
            form.close();
        }
        self.mode = UiMode::List;
    }

    /// Submit the open request form, reporting rejections in the status bar.
    pub fn submit_request(&mut self) {
        let Some(form) = self.request_form.as_mut() else {
            return;
        };
        match form.submit() {
            Ok(()) => self.set_status("Submitting tank request...".to_string()),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Apply background form events; called once per frame.
    ///
    /// # Details
    /// Drops the form once it reports `Closed` and shows the outcome.
    pub fn tick(&mut self) {
        let Some(form) = self.request_form.as_mut() else {
            return;
        };
        let phase = form.poll().clone();
        match phase {
            FormPhase::Closed => {
                self.request_form = None;
                self.mode = UiMode::List;
                self.set_status("Tank request submitted".to_string());
            }
            FormPhase::Succeeded => {
                if let Some(message) = form.success_message() {
                    self.set_status(message);
                }
            }
            FormPhase::Failed(message) => self.set_status(format!("Request failed: {message}")),
            _ => {}
        }
    }

    /// Delete the selected subscriber.
    pub fn delete_selected(&mut self) {
        match self.subscribers.delete_selected() {
            Some(record) => self.set_status(format!("Deleted: {}", record.email)),
            None => self.set_status("No subscriber selected".to_string()),
        }
    }

    /// Export every subscriber to the export directory.
    ///
    /// # Arguments
    /// * `today` - Date used in the file name
    pub fn export_subscribers(&mut self, today: NaiveDate) {
        match self.subscribers.export_all(&self.export_dir, today) {
            Ok(path) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                self.set_status(format!("Export failed: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::FormField;
    use crate::requests::service::SimulatedTankRequestService;
    use crate::subscribers::InMemorySubscriberStore;
    use tempfile::TempDir;

    fn create_app(export_dir: PathBuf) -> App {
        App::new(
            SubscriberList::new(InMemorySubscriberStore::seeded()),
            RequestBackend::Simulated(SimulatedTankRequestService::new(Duration::from_millis(
                2000,
            ))),
            export_dir,
            Duration::from_millis(3000),
        )
    }

    #[test]
    fn test_app_new() {
        let app = create_app(PathBuf::from("."));
        assert_eq!(app.mode, UiMode::List);
        assert!(app.request_form.is_none());
        assert_eq!(app.subscribers.total_count(), 8);
    }

    #[test]
    fn test_delete_selected_sets_status() {
        let mut app = create_app(PathBuf::from("."));
        app.delete_selected();
        assert_eq!(app.subscribers.total_count(), 7);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Deleted: john.doe@gmail.com")
        );

        app.subscribers.set_search("nobody");
        app.delete_selected();
        assert_eq!(app.subscribers.total_count(), 7);
        assert_eq!(app.status_message.as_deref(), Some("No subscriber selected"));
    }

    #[test]
    fn test_export_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = create_app(temp_dir.path().to_path_buf());
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        app.export_subscribers(today);
        let expected = temp_dir.path().join("subscribers-list-2024-05-02.csv");
        assert!(expected.exists());
        assert!(app.status_message.unwrap().starts_with("Exported to"));
    }

    #[test]
    fn test_open_and_close_form() {
        let mut app = create_app(PathBuf::from("."));
        app.open_request_form();
        assert_eq!(app.mode, UiMode::RequestForm);
        assert!(app.request_form.is_some());

        app.close_request_form();
        assert_eq!(app.mode, UiMode::List);
        assert!(app.request_form.is_none());
    }

    #[test]
    fn test_submit_invalid_form_reports_error() {
        let mut app = create_app(PathBuf::from("."));
        app.open_request_form();
        app.submit_request();
        assert_eq!(app.status_message.as_deref(), Some("Location is required"));
        assert_eq!(
            app.request_form.as_ref().map(|f| f.phase().clone()),
            Some(FormPhase::Idle)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_form_closes_itself_after_success() {
        let mut app = create_app(PathBuf::from("."));
        app.open_request_form();
        if let Some(form) = app.request_form.as_mut() {
            form.set_field(FormField::Location, "Tiruppur Sector G").unwrap();
            form.set_field(FormField::Capacity, "5000").unwrap();
        }
        app.submit_request();

        assert_eq!(
            app.status_message.as_deref(),
            Some("Submitting tank request...")
        );

        tokio::time::sleep(Duration::from_millis(2010)).await;
        app.tick();
        assert_eq!(
            app.status_message.as_deref(),
            Some("Request for a new tank at Tiruppur Sector G submitted successfully.")
        );
        let form = app.request_form.as_ref().unwrap();
        assert_eq!(form.phase(), &FormPhase::Succeeded);
        assert!(form.success_message().unwrap().contains("Tiruppur Sector G"));

        tokio::time::sleep(Duration::from_millis(3010)).await;
        app.tick();
        assert!(app.request_form.is_none());
        assert_eq!(app.mode, UiMode::List);
    }
}
