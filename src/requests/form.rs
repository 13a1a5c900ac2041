//! Tank request form state machine.
//!
//! Phases run `Idle -> Submitting -> Succeeded -> Closed`, with `Failed` when
//! the service reports an error. Background work (the service call and the
//! success display window) runs in spawned tasks owned by the form; their
//! results come back over a channel and are applied by [`TankRequestForm::poll`]
//! or [`TankRequestForm::next_event`]. Dropping or closing the form aborts any
//! task still pending.

use crate::requests::models::{FormField, Purpose, TankRequest};
use crate::requests::service::{SubmitError, TankRequestService};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Lifecycle of an open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    /// Accepting input
    Idle,
    /// Waiting for the service; submit is disabled
    Submitting,
    /// Request accepted; closes after the display window
    Succeeded,
    /// Service reported an error; input and submit are enabled again
    Failed(String),
    /// Done; the owner should discard the form
    Closed,
}

/// Rejected form operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0}")]
    Invalid(String),
    #[error("A request is already being submitted")]
    AlreadySubmitting,
    #[error("The form cannot be edited right now")]
    NotEditable,
}

#[derive(Debug)]
enum FormEvent {
    SubmitFinished(Result<(), SubmitError>),
    DisplayElapsed,
}

/// Modal form for requesting a new monitoring tank.
pub struct TankRequestForm<S: TankRequestService> {
    service: Arc<S>,
    location: String,
    capacity_liters: String,
    purpose: Purpose,
    description: String,
    focus: FormField,
    phase: FormPhase,
    /// Last request handed to the service
    submitted: Option<TankRequest>,
    success_display: Duration,
    events_tx: UnboundedSender<FormEvent>,
    events_rx: UnboundedReceiver<FormEvent>,
    pending: Vec<JoinHandle<()>>,
}

impl<S: TankRequestService> TankRequestForm<S> {
    /// Open an empty form.
    ///
    /// # Arguments
    /// * `service` - Service requests are submitted to
    /// * `success_display` - How long the success message stays before closing
    ///
    /// # Returns
    /// * `TankRequestForm<S>` - Form in the `Idle` phase
    pub fn new(service: Arc<S>, success_display: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        tracing::info!("tank request form opened");
        Self {
            service,
            location: String::new(),
            capacity_liters: String::new(),
            purpose: Purpose::default(),
            description: String::new(),
            focus: FormField::Location,
            phase: FormPhase::Idle,
            submitted: None,
            success_display,
            events_tx,
            events_rx,
            pending: Vec::new(),
        }
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// Current text of a field.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Location => &self.location,
            FormField::Capacity => &self.capacity_liters,
            FormField::Purpose => self.purpose.label(),
            FormField::Description => &self.description,
        }
    }

    /// Whether fields accept input.
    pub fn is_editable(&self) -> bool {
        matches!(self.phase, FormPhase::Idle | FormPhase::Failed(_))
    }

    /// Whether the submit control is enabled.
    pub fn is_submit_enabled(&self) -> bool {
        self.is_editable()
    }

    /// Acknowledgment shown once the request succeeded.
    pub fn success_message(&self) -> Option<String> {
        if self.phase != FormPhase::Succeeded {
            return None;
        }
        let request = self.submitted.as_ref()?;
        Some(format!(
            "Request for a new tank at {} submitted successfully.",
            request.location
        ))
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Replace the text of a field.
    ///
    /// # Arguments
    /// * `field` - Field to change
    /// * `value` - New text; for `Purpose` it must match a purpose label
    ///
    /// # Returns
    /// * `Result<(), FormError>` - Error if the form is not editable or the
    ///   purpose label is unknown
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        match field {
            FormField::Location => self.location = value.to_string(),
            FormField::Capacity => self.capacity_liters = value.to_string(),
            FormField::Description => self.description = value.to_string(),
            FormField::Purpose => {
                self.purpose = Purpose::from_label(value)
                    .ok_or_else(|| FormError::Invalid(format!("Unknown purpose: {value}")))?;
            }
        }
        Ok(())
    }

    /// Type a character into the focused field.
    ///
    /// # Details
    /// Ignored when the form is not editable or the focused field is `Purpose`.
    pub fn input_char(&mut self, ch: char) {
        if !self.is_editable() {
            return;
        }
        match self.focus {
            FormField::Location => self.location.push(ch),
            FormField::Capacity => self.capacity_liters.push(ch),
            FormField::Description => self.description.push(ch),
            FormField::Purpose => {}
        }
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&mut self) {
        if !self.is_editable() {
            return;
        }
        match self.focus {
            FormField::Location => {
                self.location.pop();
            }
            FormField::Capacity => {
                self.capacity_liters.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Purpose => {}
        }
    }

    /// Step the purpose selection forwards or backwards.
    pub fn cycle_purpose(&mut self, forward: bool) {
        if !self.is_editable() {
            return;
        }
        self.purpose = if forward {
            self.purpose.next()
        } else {
            self.purpose.prev()
        };
    }

    /// Validate the fields into a request.
    ///
    /// # Details
    /// Location is required. Capacity is required and must be a whole number of
    /// liters. Description is optional.
    pub fn to_request(&self) -> Result<TankRequest, FormError> {
        let location = self.location.trim();
        if location.is_empty() {
            return Err(FormError::Invalid("Location is required".to_string()));
        }

        let capacity = self.capacity_liters.trim();
        if capacity.is_empty() {
            return Err(FormError::Invalid("Capacity is required".to_string()));
        }
        let capacity_liters = capacity.parse::<u64>().map_err(|_| {
            FormError::Invalid(format!("Capacity must be a number of liters: {capacity}"))
        })?;

        Ok(TankRequest {
            location: location.to_string(),
            capacity_liters,
            purpose: self.purpose,
            description: self.description.trim().to_string(),
        })
    }

    /// Submit the form.
    ///
    /// # Returns
    /// * `Result<(), FormError>` - Error if a submission is already in flight,
    ///   the form is finished, or a field is invalid
    ///
    /// # Details
    /// Moves to `Submitting` and spawns exactly one service call. Must be called
    /// inside a tokio runtime.
    pub fn submit(&mut self) -> Result<(), FormError> {
        match self.phase {
            FormPhase::Idle | FormPhase::Failed(_) => {}
            FormPhase::Submitting => return Err(FormError::AlreadySubmitting),
            FormPhase::Succeeded | FormPhase::Closed => return Err(FormError::NotEditable),
        }

        let request = self.to_request()?;
        tracing::info!(
            location = %request.location,
            capacity_liters = request.capacity_liters,
            purpose = %request.purpose,
            "submitting tank request"
        );

        self.phase = FormPhase::Submitting;
        self.submitted = Some(request.clone());

        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        self.spawn(async move {
            let result = service.submit(&request).await;
            let _ = tx.send(FormEvent::SubmitFinished(result));
        });

        Ok(())
    }

    /// Apply every finished background event without waiting.
    ///
    /// # Returns
    /// * `&FormPhase` - Phase after applying events
    ///
    /// # Details
    /// Called once per UI frame. `Closed` tells the owner to drop the form.
    pub fn poll(&mut self) -> &FormPhase {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
        &self.phase
    }

    /// Wait for the next background event and apply it.
    ///
    /// # Returns
    /// * `Option<&FormPhase>` - Phase after the event, or None if nothing is pending
    pub async fn next_event(&mut self) -> Option<&FormPhase> {
        if self.events_rx.is_empty() && self.pending.iter().all(|handle| handle.is_finished()) {
            return None;
        }
        let event = self.events_rx.recv().await?;
        self.apply(event);
        Some(&self.phase)
    }

    /// Close the form now, cancelling pending work.
    pub fn close(&mut self) {
        self.abort_pending();
        if self.phase != FormPhase::Closed {
            tracing::info!(phase = ?self.phase, "tank request form closed");
            self.phase = FormPhase::Closed;
        }
    }

    fn apply(&mut self, event: FormEvent) {
        match event {
            FormEvent::SubmitFinished(result) if self.phase == FormPhase::Submitting => match result {
                Ok(()) => {
                    tracing::info!("tank request accepted");
                    self.phase = FormPhase::Succeeded;

                    let tx = self.events_tx.clone();
                    let window = self.success_display;
                    self.spawn(async move {
                        tokio::time::sleep(window).await;
                        let _ = tx.send(FormEvent::DisplayElapsed);
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "tank request failed");
                    self.phase = FormPhase::Failed(e.to_string());
                }
            },
            FormEvent::DisplayElapsed if self.phase == FormPhase::Succeeded => self.close(),
            event => {
                tracing::debug!(phase = ?self.phase, ?event, "ignoring stale form event");
            }
        }
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        match self.phase {
            FormPhase::Idle | FormPhase::Failed(_) => Ok(()),
            FormPhase::Submitting => Err(FormError::AlreadySubmitting),
            FormPhase::Succeeded | FormPhase::Closed => Err(FormError::NotEditable),
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.pending.retain(|handle| !handle.is_finished());
        self.pending.push(tokio::spawn(task));
    }

    fn abort_pending(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }
}

impl<S: TankRequestService> Drop for TankRequestForm<S> {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::time::Instant;

    const SUBMIT_DELAY: Duration = Duration::from_millis(2000);
    const DISPLAY: Duration = Duration::from_millis(3000);

    #[derive(Default)]
    struct CountingService {
        calls: AtomicUsize,
        completed: AtomicUsize,
        fail_next: AtomicBool,
    }

    impl TankRequestService for CountingService {
        async fn submit(&self, _request: &TankRequest) -> Result<(), SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(SUBMIT_DELAY).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(SubmitError::Rejected {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    fn filled_form(service: &Arc<CountingService>) -> TankRequestForm<CountingService> {
        let mut form = TankRequestForm::new(Arc::clone(service), DISPLAY);
        form.set_field(FormField::Location, "Tiruppur Sector G").unwrap();
        form.set_field(FormField::Capacity, "5000").unwrap();
        form
    }

    #[test]
    fn test_form_starts_idle_and_empty() {
        let form = TankRequestForm::new(Arc::new(CountingService::default()), DISPLAY);
        assert_eq!(form.phase(), &FormPhase::Idle);
        assert_eq!(form.value(FormField::Location), "");
        assert_eq!(form.purpose(), Purpose::Irrigation);
        assert!(form.is_submit_enabled());
    }

    #[test]
    fn test_typing_follows_focus() {
        let mut form = TankRequestForm::new(Arc::new(CountingService::default()), DISPLAY);
        for ch in "Erode".chars() {
            form.input_char(ch);
        }
        form.focus_next();
        for ch in "120".chars() {
            form.input_char(ch);
        }
        form.backspace();
        form.focus_next();
        form.input_char('x');
        form.cycle_purpose(true);
        form.focus_prev();
        form.focus_prev();
        form.focus_prev();
        form.input_char('!');

        assert_eq!(form.value(FormField::Location), "Erode");
        assert_eq!(form.value(FormField::Capacity), "12");
        assert_eq!(form.purpose(), Purpose::DrinkingWater);
        assert_eq!(form.value(FormField::Description), "!");
    }

    #[test]
    fn test_set_purpose_by_label() {
        let mut form = TankRequestForm::new(Arc::new(CountingService::default()), DISPLAY);
        form.set_field(FormField::Purpose, "Poultry Farm").unwrap();
        assert_eq!(form.purpose(), Purpose::PoultryFarm);
        assert!(form.set_field(FormField::Purpose, "Swimming").is_err());
    }

    #[test]
    fn test_validation_requires_location_and_capacity() {
        let service = Arc::new(CountingService::default());
        let mut form = TankRequestForm::new(Arc::clone(&service), DISPLAY);
        assert!(matches!(form.to_request(), Err(FormError::Invalid(_))));

        form.set_field(FormField::Location, "Avinashi").unwrap();
        assert!(matches!(form.to_request(), Err(FormError::Invalid(_))));

        form.set_field(FormField::Capacity, "lots").unwrap();
        assert!(matches!(form.to_request(), Err(FormError::Invalid(_))));

        form.set_field(FormField::Capacity, " 750 ").unwrap();
        let request = form.to_request().unwrap();
        assert_eq!(request.capacity_liters, 750);
    }

    #[tokio::test]
    async fn test_invalid_submit_stays_idle() {
        let service = Arc::new(CountingService::default());
        let mut form = TankRequestForm::new(Arc::clone(&service), DISPLAY);
        assert!(matches!(form.submit(), Err(FormError::Invalid(_))));
        assert_eq!(form.phase(), &FormPhase::Idle);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_succeeds_then_closes() {
        let service = Arc::new(CountingService::default());
        let mut form = filled_form(&service);
        let start = Instant::now();

        form.submit().unwrap();
        assert_eq!(form.phase(), &FormPhase::Submitting);
        assert!(!form.is_submit_enabled());
        assert!(form.success_message().is_none());
        assert_eq!(
            form.set_field(FormField::Location, "elsewhere"),
            Err(FormError::AlreadySubmitting)
        );

        assert_eq!(form.next_event().await, Some(&FormPhase::Succeeded));
        assert!(start.elapsed() >= SUBMIT_DELAY);
        let message = form.success_message().unwrap();
        assert!(message.contains("Tiruppur Sector G"));

        assert_eq!(form.next_event().await, Some(&FormPhase::Closed));
        assert!(start.elapsed() >= SUBMIT_DELAY + DISPLAY);
        assert!(form.next_event().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_calls_service_once() {
        let service = Arc::new(CountingService::default());
        let mut form = filled_form(&service);

        form.submit().unwrap();
        assert_eq!(form.submit(), Err(FormError::AlreadySubmitting));

        form.next_event().await;
        assert_eq!(form.phase(), &FormPhase::Succeeded);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.submit(), Err(FormError::NotEditable));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_allows_retry() {
        let service = Arc::new(CountingService::default());
        service.fail_next.store(true, Ordering::SeqCst);
        let mut form = filled_form(&service);

        form.submit().unwrap();
        let phase = form.next_event().await.cloned();
        assert!(matches!(phase, Some(FormPhase::Failed(ref msg)) if msg.contains("503")));
        assert!(form.is_submit_enabled());

        form.submit().unwrap();
        assert_eq!(form.next_event().await, Some(&FormPhase::Succeeded));
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending_call() {
        let service = Arc::new(CountingService::default());
        let mut form = filled_form(&service);

        form.submit().unwrap();
        tokio::task::yield_now().await;
        form.close();
        assert_eq!(form.phase(), &FormPhase::Closed);

        tokio::time::sleep(SUBMIT_DELAY * 2).await;
        assert_eq!(service.completed.load(Ordering::SeqCst), 0);
        assert_eq!(form.poll(), &FormPhase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_call() {
        let service = Arc::new(CountingService::default());
        let mut form = filled_form(&service);
        form.submit().unwrap();
        drop(form);

        tokio::time::sleep(SUBMIT_DELAY * 2).await;
        assert_eq!(service.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_applies_finished_events() {
        let service = Arc::new(CountingService::default());
        let mut form = filled_form(&service);
        form.submit().unwrap();

        assert_eq!(form.poll(), &FormPhase::Submitting);
        tokio::time::sleep(SUBMIT_DELAY + Duration::from_millis(10)).await;
        assert_eq!(form.poll(), &FormPhase::Succeeded);
        tokio::time::sleep(DISPLAY + Duration::from_millis(10)).await;
        assert_eq!(form.poll(), &FormPhase::Closed);
    }
}
