//! The record store and form controller. Everything the screen can do to the
//! weighing log goes through `RecordStore`: the collection, the form draft,
//! the selection and edit pointers, the search query and the notification
//! badge all live here, and each user action maps onto one method. Derived
//! values (`filtered`, `computed_net_weight`) are recomputed from the current
//! state on every call.

mod draft;
mod ids;
mod notify;
mod search;

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{net_weight, seed_records, Record, RecordId};

pub use draft::{parse_number, Draft, DraftField, DATE_FORMAT};
pub use ids::{
    check_number, is_generated_check_number, Clock, FixedClock, IdSource, RandomIds,
    SequentialIds, SystemClock, CHECK_PREFIX, CHECK_SUFFIX_LEN,
};
pub use notify::{DismissToken, Notifier};
pub use search::{filter_records, FilteredRow};

/// Default lifetime of the relay notification.
pub const DEFAULT_RELAY_DISMISS: Duration = Duration::from_millis(4500);

pub const MSG_NEW_ENTRY: &str = "Ready for a new entry.";
pub const MSG_RELOADED: &str = "Data reloaded from caravan log.";
pub const MSG_RELAY: &str = "Relay signal sent across the caravan route.";

/// Where the UI should put the cursor after a store action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FocusRequest {
    /// Move focus right away.
    Immediate(DraftField),
    /// Move focus once the next frame has been drawn.
    AfterPaint(DraftField),
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(RecordId),
    Updated(RecordId),
}

pub struct RecordStore {
    records: Vec<Record>,
    draft: Draft,
    editing: Option<RecordId>,
    selected: Option<RecordId>,
    search_query: String,
    notifier: Notifier,
    focus_request: Option<FocusRequest>,
    relay_dismiss: Duration,
    ids: Box<dyn IdSource>,
    clock: Box<dyn Clock>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Box::new(RandomIds), Box::new(SystemClock))
    }
}

impl RecordStore {
    /// Store seeded with the sample rows and a blank draft.
    pub fn new(ids: Box<dyn IdSource>, clock: Box<dyn Clock>) -> Self {
        let draft = Draft::blank(clock.today());
        Self {
            records: seed_records(),
            draft,
            editing: None,
            selected: None,
            search_query: String::new(),
            notifier: Notifier::default(),
            focus_request: None,
            relay_dismiss: DEFAULT_RELAY_DISMISS,
            ids,
            clock,
        }
    }

    pub fn with_relay_dismiss(mut self, after: Duration) -> Self {
        self.relay_dismiss = after;
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn selected(&self) -> Option<&RecordId> {
        self.selected.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn notification(&self) -> Option<&str> {
        self.notifier.message()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Hand the pending focus request to the caller, leaving none behind.
    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        self.focus_request.take()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Records visible under the current search query.
    pub fn filtered(&self) -> Vec<FilteredRow<'_>> {
        filter_records(&self.records, &self.search_query)
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *self.draft.field_mut(field) = value.into();
    }

    /// Net weight for the read-only form field, `None` while both weight
    /// inputs are empty.
    pub fn computed_net_weight(&self) -> Option<f64> {
        self.draft.computed_net_weight()
    }

    /// Validate the draft and write it into the collection: in place when an
    /// edit is in progress, otherwise as the new first row.
    pub fn submit(&mut self) -> Result<SubmitOutcome, StoreError> {
        let plate = self.draft.plate_number.trim().to_string();
        if plate.is_empty() {
            debug!("submit aborted: plate number missing");
            self.focus_request = Some(FocusRequest::Immediate(DraftField::PlateNumber));
            return Err(StoreError::MissingRequiredField(DraftField::PlateNumber));
        }

        let gross = parse_number(&self.draft.yuk_bilan);
        let tare = parse_number(&self.draft.yuksiz);
        let check = match self.draft.check_number.trim() {
            "" => check_number(&self.ids.check_suffix()),
            given => given.to_string(),
        };
        let id = match &self.editing {
            Some(id) => id.clone(),
            None => self.ids.record_id(),
        };

        let record = Record::new(
            id.clone(),
            plate,
            gross,
            tare,
            self.draft.date.clone(),
            parse_number(&self.draft.summa),
            check,
        );
        debug_assert_eq!(record.sof_vazin, net_weight(gross, tare));

        let outcome = if self.editing.is_some() {
            for slot in self.records.iter_mut().filter(|r| r.id == id) {
                *slot = record.clone();
            }
            info!(id = %id, plate = %record.plate_number, "record updated");
            SubmitOutcome::Updated(id)
        } else {
            info!(id = %id, plate = %record.plate_number, "record created");
            self.records.insert(0, record);
            SubmitOutcome::Created(id)
        };

        self.reset_form();
        Ok(outcome)
    }

    /// Toggle the selection pointer.
    pub fn select(&mut self, id: &RecordId) {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.clone());
        }
    }

    /// Load a record into the form for editing. Returns false if the id is
    /// unknown.
    pub fn begin_edit(&mut self, id: &RecordId) -> bool {
        let Some(record) = self.record(id) else {
            return false;
        };
        let draft = Draft::from_record(record);
        let message = format!("Editing {}", record.plate_number);

        self.editing = Some(id.clone());
        self.selected = Some(id.clone());
        self.draft = draft;
        self.notifier.set(message);
        self.focus_request = Some(FocusRequest::Immediate(DraftField::PlateNumber));
        debug!(id = %id, "editing record");
        true
    }

    /// Remove a record. Deleting the record under edit also resets the form.
    pub fn delete(&mut self, id: &RecordId) {
        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        if self.records.len() != before {
            info!(id = %id, "record deleted");
        }

        if self.editing.as_ref() == Some(id) {
            self.reset_form();
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected.clone() {
            self.delete(&id);
        }
    }

    pub fn edit_selected(&mut self) -> bool {
        match self.selected.clone() {
            Some(id) => self.begin_edit(&id),
            None => false,
        }
    }

    /// Blank form, nothing selected or under edit.
    pub fn reset_form(&mut self) {
        self.draft = Draft::blank(self.clock.today());
        self.editing = None;
        self.selected = None;
    }

    /// Start a fresh entry; focus lands on the plate field after the next
    /// paint.
    pub fn begin_new(&mut self) {
        self.reset_form();
        self.notifier.set(MSG_NEW_ENTRY);
        self.focus_request = Some(FocusRequest::AfterPaint(DraftField::PlateNumber));
    }

    /// Throw away every change and restore the sample rows.
    pub fn reload_seed(&mut self) {
        self.records = seed_records();
        self.reset_form();
        self.search_query.clear();
        self.notifier.set(MSG_RELOADED);
        info!(count = self.records.len(), "records reloaded from seed");
    }

    /// Flash the relay notification. It clears itself after the configured
    /// delay unless another message replaces it first.
    pub fn relay(&mut self, now: Instant) -> DismissToken {
        debug!("relay signal");
        self.notifier
            .set_with_dismiss(MSG_RELAY, now, self.relay_dismiss)
    }

    /// Advance timers. Returns true if the notification was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notifier.tick(now)
    }
}
