//! Submitted form fields and their conversion into wire records.

use crate::errors::ActionError;
use crate::format;
use crate::models::{Appointment, MedicalResult, Resource, ResultStatus};
use serde::Deserialize;

/// Editable draft of one record, as the form shows it.
pub trait RecordForm: Clone + Default + Send + Sync + 'static {
    type Record: Resource;

    fn from_record(record: &Self::Record) -> Self;

    /// Raw content of the hidden identifier field.
    fn raw_id(&self) -> &str;

    /// Trims the fields and checks every required one is present.
    fn to_record(&self) -> Result<Self::Record, ActionError>;

    /// `Some` selects the update path, `None` the create path.
    fn target_id(&self) -> Result<Option<i64>, ActionError> {
        let raw = self.raw_id().trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<i64>()
            .map(Some)
            .map_err(|_| ActionError::validation(format!("invalid identifier '{raw}'")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    pub id: String,
    pub patient: String,
    pub specialty: String,
    pub date_time: String,
    pub reason: String,
}

impl RecordForm for AppointmentForm {
    type Record = Appointment;

    fn from_record(record: &Appointment) -> Self {
        Self {
            id: record.id.map(|id| id.to_string()).unwrap_or_default(),
            patient: record.patient.clone(),
            specialty: record.specialty.clone(),
            date_time: format::raw_to_input(&record.date_time),
            reason: record.reason.clone(),
        }
    }

    fn raw_id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> Result<Appointment, ActionError> {
        Ok(Appointment {
            id: self.target_id()?,
            patient: required(&self.patient, "Patient")?,
            specialty: required(&self.specialty, "Specialty")?,
            date_time: required(&self.date_time, "Date and time")?,
            reason: required(&self.reason, "Reason")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResultForm {
    pub id: String,
    pub patient: String,
    pub exam_type: String,
    pub responsible_physician: String,
    pub status: String,
    pub exam_date: String,
    pub issue_date: String,
    pub results: String,
    pub observations: String,
    pub description: String,
}

impl RecordForm for ResultForm {
    type Record = MedicalResult;

    fn from_record(record: &MedicalResult) -> Self {
        Self {
            id: record.id.map(|id| id.to_string()).unwrap_or_default(),
            patient: record.patient.clone(),
            exam_type: record.exam_type.clone(),
            responsible_physician: record.responsible_physician.clone(),
            status: record.status.as_str().to_string(),
            exam_date: record.exam_date.as_ref().map(format::to_input).unwrap_or_default(),
            issue_date: record.issue_date.as_ref().map(format::to_input).unwrap_or_default(),
            results: record.results.clone(),
            observations: record.observations.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
        }
    }

    fn raw_id(&self) -> &str {
        &self.id
    }

    fn to_record(&self) -> Result<MedicalResult, ActionError> {
        let id = self.target_id()?;
        let patient = required(&self.patient, "Patient")?;
        let exam_type = required(&self.exam_type, "Exam type")?;
        let responsible_physician = required(&self.responsible_physician, "Responsible physician")?;
        let exam_date = required(&self.exam_date, "Exam date")?;
        let exam_date = format::parse_datetime(&exam_date)
            .ok_or_else(|| ActionError::validation(format!("invalid exam date '{exam_date}'")))?;
        let issue_date = match optional(&self.issue_date) {
            Some(raw) => Some(format::parse_datetime(&raw).ok_or_else(|| {
                ActionError::validation(format!("invalid issue date '{raw}'"))
            })?),
            None => None,
        };
        let results = required(&self.results, "Results")?;

        Ok(MedicalResult {
            id,
            patient,
            exam_type,
            results,
            responsible_physician,
            exam_date: Some(exam_date),
            issue_date,
            description: optional(&self.description),
            observations: optional(&self.observations),
            status: ResultStatus::parse(&self.status).unwrap_or_default(),
        })
    }
}

/// Server-side search over medical results.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub field: String,
    pub term: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub confirmed: String,
}

impl DeleteForm {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed.trim().eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub status: String,
}

fn required(value: &str, field: &str) -> Result<String, ActionError> {
    optional(value).ok_or_else(|| ActionError::required(field))
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn filled_appointment() -> AppointmentForm {
        AppointmentForm {
            id: String::new(),
            patient: "  Ana ".into(),
            specialty: "cardiology".into(),
            date_time: "2024-01-01T10:00".into(),
            reason: " checkup".into(),
        }
    }

    #[test]
    fn appointment_fields_are_trimmed() {
        let record = filled_appointment().to_record().unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.patient, "Ana");
        assert_eq!(record.reason, "checkup");
    }

    #[test]
    fn blank_field_is_a_validation_failure() {
        let mut form = filled_appointment();
        form.specialty = "   ".into();
        match form.to_record() {
            Err(ActionError::Validation(message)) => assert_eq!(message, "Specialty is required"),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn identifier_selects_update_path() {
        let mut form = filled_appointment();
        assert_eq!(form.target_id().unwrap(), None);
        form.id = " 12 ".into();
        assert_eq!(form.target_id().unwrap(), Some(12));
        form.id = "abc".into();
        assert!(form.target_id().is_err());
    }

    #[test]
    fn appointment_draft_uses_input_format() {
        let record = Appointment {
            id: Some(3),
            patient: "Pedro López".into(),
            specialty: "Pediatría".into(),
            date_time: "2025-10-25 14:00".into(),
            reason: "Consulta general".into(),
        };
        let form = AppointmentForm::from_record(&record);
        assert_eq!(form.id, "3");
        assert_eq!(form.date_time, "2025-10-25T14:00");
    }

    #[test]
    fn result_round_trips_through_draft() {
        let exam = NaiveDate::from_ymd_opt(2025, 10, 13)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let record = MedicalResult {
            id: Some(5),
            patient: "Juan Pérez".into(),
            exam_type: "Hemograma Completo".into(),
            results: "Hemoglobina: 14.2 g/dL".into(),
            responsible_physician: "Dr. María González".into(),
            exam_date: Some(exam),
            issue_date: None,
            description: None,
            observations: Some("Normal".into()),
            status: ResultStatus::Completed,
        };

        let form = ResultForm::from_record(&record);
        assert_eq!(form.exam_date, "2025-10-13T08:30");
        assert_eq!(form.status, "COMPLETADO");
        assert_eq!(form.to_record().unwrap(), record);
    }

    #[test]
    fn result_defaults_status_and_issue_date() {
        let form = ResultForm {
            patient: "Laura Gómez".into(),
            exam_type: "Perfil Lipídico".into(),
            responsible_physician: "Dr. Patricia Silva".into(),
            exam_date: "2025-10-10T07:00".into(),
            results: "Colesterol Total: 180 mg/dL".into(),
            ..Default::default()
        };
        let record = form.to_record().unwrap();
        assert_eq!(record.status, ResultStatus::Pending);
        assert!(record.issue_date.is_none());
        assert!(record.observations.is_none());
    }

    #[test]
    fn bad_exam_date_is_rejected() {
        let form = ResultForm {
            patient: "Laura".into(),
            exam_type: "Perfil".into(),
            responsible_physician: "Dr. Silva".into(),
            exam_date: "yesterday".into(),
            results: "ok".into(),
            ..Default::default()
        };
        assert!(matches!(form.to_record(), Err(ActionError::Validation(_))));
    }

    #[test]
    fn delete_needs_explicit_true() {
        assert!(DeleteForm { confirmed: "true".into() }.is_confirmed());
        assert!(!DeleteForm { confirmed: "false".into() }.is_confirmed());
        assert!(!DeleteForm::default().is_confirmed());
    }
}
