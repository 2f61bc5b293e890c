//! View controller: owns the screen state and turns user actions into
//! backend calls.

use crate::client::{ResourceClient, ResultSearch};
use crate::errors::ActionError;
use crate::filters::{AppointmentFilter, ResultFilter};
use crate::forms::{AppointmentForm, RecordForm, ResultForm};
use crate::models::{Appointment, MedicalResult, Resource, ResultStatus};
use crate::store::Store;
use crate::view::{Notice, Section};
use tracing::{info, warn};

/// CRUD state of one resource type: its cache and its form draft.
pub struct Crud<F: RecordForm> {
    pub client: ResourceClient<F::Record>,
    pub store: Store<F::Record>,
    pub draft: F,
}

/// What a successful save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Created(Option<i64>),
    Updated(i64),
}

impl<F: RecordForm> Crud<F> {
    pub fn new(client: ResourceClient<F::Record>) -> Self {
        Self {
            client,
            store: Store::default(),
            draft: F::default(),
        }
    }

    pub async fn refresh(&mut self) -> Result<usize, ActionError> {
        let records = self.client.list().await?;
        let count = records.len();
        self.store.replace(records);
        Ok(count)
    }

    /// Sends the submitted form. The submitted values stay in the draft
    /// unless the backend accepted them.
    pub async fn save(&mut self, form: F) -> Result<Saved, ActionError> {
        self.draft = form;
        let record = self.draft.to_record()?;
        let saved = match self.draft.target_id()? {
            Some(id) => {
                self.client.update(id, &record).await?;
                Saved::Updated(id)
            }
            None => {
                let created = self.client.create(&record).await?;
                Saved::Created(created.id())
            }
        };
        self.draft = F::default();
        Ok(saved)
    }

    pub async fn edit(&mut self, id: i64) -> Result<(), ActionError> {
        let record = self.client.get(id).await?;
        self.draft = F::from_record(&record);
        Ok(())
    }

    /// Returns `false` without touching the backend when not confirmed.
    pub async fn delete(&mut self, id: i64, confirmed: bool) -> Result<bool, ActionError> {
        if !confirmed {
            return Ok(false);
        }
        self.client.remove(id).await?;
        Ok(true)
    }

    pub fn apply_filter(&mut self, filter: <F::Record as Resource>::Filter) -> usize {
        self.store.set_filter(filter);
        self.store.visible().len()
    }

    pub fn reset_draft(&mut self) {
        self.draft = F::default();
    }
}

pub struct Controller {
    pub section: Section,
    pub notices: Vec<Notice>,
    pub appointments: Crud<AppointmentForm>,
    pub results: Crud<ResultForm>,
}

impl Controller {
    pub fn new(
        appointments: ResourceClient<Appointment>,
        results: ResourceClient<MedicalResult>,
    ) -> Self {
        Self {
            section: Section::default(),
            notices: Vec::new(),
            appointments: Crud::new(appointments),
            results: Crud::new(results),
        }
    }

    pub fn show(&mut self, section: Section, fresh: bool) {
        if fresh {
            match section {
                Section::AppointmentForm => self.appointments.reset_draft(),
                Section::ResultForm => self.results.reset_draft(),
                Section::Panel | Section::Results => {}
            }
        }
        self.section = section;
    }

    /// Drains the notices raised since the last page render, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Fetches every collection that has not been fetched yet.
    pub async fn ensure_loaded(&mut self) {
        if !self.appointments.store.is_loaded() {
            let outcome = self.appointments.refresh().await;
            self.report_refresh::<Appointment>(outcome);
        }
        if !self.results.store.is_loaded() {
            let outcome = self.results.refresh().await;
            self.report_refresh::<MedicalResult>(outcome);
        }
    }

    pub async fn refresh_appointments(&mut self) {
        let outcome = self.appointments.refresh().await;
        self.report_refresh::<Appointment>(outcome);
        self.section = Section::Panel;
    }

    pub async fn refresh_results(&mut self) {
        let outcome = self.results.refresh().await;
        self.report_refresh::<MedicalResult>(outcome);
        self.section = Section::Results;
    }

    pub async fn save_appointment(&mut self, form: AppointmentForm) {
        let outcome = self.appointments.save(form).await;
        if self.report_save::<Appointment>(outcome) {
            let refreshed = self.appointments.refresh().await;
            self.report_refresh::<Appointment>(refreshed);
            self.section = Section::Panel;
        } else {
            self.section = Section::AppointmentForm;
        }
    }

    pub async fn save_result(&mut self, form: ResultForm) {
        let outcome = self.results.save(form).await;
        if self.report_save::<MedicalResult>(outcome) {
            let refreshed = self.results.refresh().await;
            self.report_refresh::<MedicalResult>(refreshed);
            self.section = Section::Results;
        } else {
            self.section = Section::ResultForm;
        }
    }

    pub async fn edit_appointment(&mut self, id: i64) {
        match self.appointments.edit(id).await {
            Ok(()) => self.section = Section::AppointmentForm,
            Err(err) => self.fail(format!("Could not load appointment {id}"), err),
        }
    }

    pub async fn edit_result(&mut self, id: i64) {
        match self.results.edit(id).await {
            Ok(()) => self.section = Section::ResultForm,
            Err(err) => self.fail(format!("Could not load medical result {id}"), err),
        }
    }

    pub async fn delete_appointment(&mut self, id: i64, confirmed: bool) {
        let outcome = self.appointments.delete(id, confirmed).await;
        if self.report_delete::<Appointment>(id, outcome) {
            let refreshed = self.appointments.refresh().await;
            self.report_refresh::<Appointment>(refreshed);
        }
        self.section = Section::Panel;
    }

    pub async fn delete_result(&mut self, id: i64, confirmed: bool) {
        let outcome = self.results.delete(id, confirmed).await;
        if self.report_delete::<MedicalResult>(id, outcome) {
            let refreshed = self.results.refresh().await;
            self.report_refresh::<MedicalResult>(refreshed);
        }
        self.section = Section::Results;
    }

    pub fn filter_appointments(&mut self, filter: AppointmentFilter) {
        let shown = self.appointments.apply_filter(filter);
        if shown == 0 && !self.appointments.store.filter().is_empty() {
            self.notify(Notice::info("No appointment matches the filter."));
        }
        self.section = Section::Panel;
    }

    pub fn filter_results(&mut self, filter: ResultFilter) {
        let shown = self.results.apply_filter(filter);
        if shown == 0 && !self.results.store.filter().is_empty() {
            self.notify(Notice::info("No medical result matches the filter."));
        }
        self.section = Section::Results;
    }

    pub async fn change_result_status(&mut self, id: i64, raw_status: &str) {
        self.section = Section::Results;
        let Some(status) = ResultStatus::parse(raw_status) else {
            self.fail("Status not changed", ActionError::required("Status"));
            return;
        };
        match self.results.client.change_status(id, &status).await {
            Ok(_) => {
                info!(id, %status, "medical result status changed");
                self.notify(Notice::success(format!(
                    "Result {id} is now {}.",
                    status.label()
                )));
                let refreshed = self.results.refresh().await;
                self.report_refresh::<MedicalResult>(refreshed);
            }
            Err(err) => self.fail(format!("Could not change status of result {id}"), err),
        }
    }

    pub async fn search_results(&mut self, field: &str, term: &str) {
        self.section = Section::Results;
        let outcome = match ResultSearch::from_parts(field, term) {
            Ok(search) => self.results.client.search(&search).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(records) => {
                let title = format!("Search: {} \u{201c}{}\u{201d}", field.trim(), term.trim());
                self.results.store.show_remote(title, records);
            }
            Err(err) => self.fail("Search failed", err),
        }
    }

    pub async fn pending_results(&mut self) {
        self.section = Section::Results;
        match self.results.client.pending().await {
            Ok(records) => self.results.store.show_remote("Pending results", records),
            Err(err) => self.fail("Could not load pending results", err),
        }
    }

    pub async fn recent_results(&mut self) {
        self.section = Section::Results;
        match self.results.client.recent().await {
            Ok(records) => self
                .results
                .store
                .show_remote("Issued in the last 30 days", records),
            Err(err) => self.fail("Could not load recent results", err),
        }
    }

    fn report_refresh<R: Resource>(&mut self, outcome: Result<usize, ActionError>) {
        match outcome {
            Ok(count) => info!(kind = R::KIND, count, "collection refreshed"),
            Err(err) => self.fail(format!("Could not load the {} list", R::KIND), err),
        }
    }

    fn report_save<R: Resource>(&mut self, outcome: Result<Saved, ActionError>) -> bool {
        match outcome {
            Ok(Saved::Created(id)) => {
                info!(kind = R::KIND, ?id, "record created");
                self.notify(Notice::success(format!("{} created.", capitalize(R::KIND))));
                true
            }
            Ok(Saved::Updated(id)) => {
                info!(kind = R::KIND, id, "record updated");
                self.notify(Notice::success(format!("{} updated.", capitalize(R::KIND))));
                true
            }
            Err(err) => {
                self.fail(format!("Could not save the {}", R::KIND), err);
                false
            }
        }
    }

    fn report_delete<R: Resource>(&mut self, id: i64, outcome: Result<bool, ActionError>) -> bool {
        match outcome {
            Ok(true) => {
                info!(kind = R::KIND, id, "record deleted");
                self.notify(Notice::success(format!("{} deleted.", capitalize(R::KIND))));
                true
            }
            Ok(false) => {
                self.notify(Notice::info("Deletion cancelled."));
                false
            }
            Err(err) => {
                self.fail(format!("Could not delete {} {id}", R::KIND), err);
                false
            }
        }
    }

    fn fail(&mut self, context: impl Into<String>, err: ActionError) {
        let context = context.into();
        match &err {
            ActionError::Validation(_) => info!(%context, error = %err, "action rejected"),
            _ => warn!(%context, error = %err, "action failed"),
        }
        self.notify(Notice::error(format!("{context}: {err}")));
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
