//! Client-side filtering over the cached collections.
//!
//! Filters never touch the cache they read from; they return a fresh
//! vector so applying the same filter twice yields the same records.

use crate::models::{Appointment, MedicalResult, Resource, ResultStatus};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppointmentFilter {
    pub patient: String,
    pub specialty: String,
    pub date: String,
}

impl AppointmentFilter {
    pub fn is_empty(&self) -> bool {
        self.patient.trim().is_empty()
            && self.specialty.trim().is_empty()
            && self.date.trim().is_empty()
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        contains_ignore_case(&appointment.patient, &self.patient)
            && equals_ignore_case(&appointment.specialty, &self.specialty)
            && appointment.date_time.starts_with(self.date.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResultFilter {
    pub patient: String,
    pub exam_type: String,
    pub status: String,
}

impl ResultFilter {
    pub fn is_empty(&self) -> bool {
        self.patient.trim().is_empty()
            && self.exam_type.trim().is_empty()
            && self.status.trim().is_empty()
    }

    pub fn matches(&self, result: &MedicalResult) -> bool {
        let status_ok = match ResultStatus::parse(&self.status) {
            Some(wanted) => result.status.matches(&wanted),
            None => true,
        };
        status_ok
            && contains_ignore_case(&result.patient, &self.patient)
            && contains_ignore_case(&result.exam_type, &self.exam_type)
    }
}

pub fn apply<R: Resource>(records: &[R], filter: &R::Filter) -> Vec<R> {
    records
        .iter()
        .filter(|record| record.matches(filter))
        .cloned()
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn equals_ignore_case(value: &str, wanted: &str) -> bool {
    let wanted = wanted.trim();
    wanted.is_empty() || value.trim().to_lowercase() == wanted.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Appointment {
        Appointment {
            id: Some(1),
            patient: "Ana".into(),
            specialty: "cardiology".into(),
            date_time: "2024-01-01T10:00".into(),
            reason: "checkup".into(),
        }
    }

    fn result(id: i64, patient: &str, exam: &str, status: ResultStatus) -> MedicalResult {
        MedicalResult {
            id: Some(id),
            patient: patient.into(),
            exam_type: exam.into(),
            results: "ok".into(),
            responsible_physician: "Dr. Silva".into(),
            exam_date: None,
            issue_date: None,
            description: None,
            observations: None,
            status,
        }
    }

    #[test]
    fn patient_substring_is_case_insensitive() {
        let list = vec![ana()];
        let filter = AppointmentFilter {
            patient: "an".into(),
            ..Default::default()
        };
        assert_eq!(apply(&list, &filter), list);
    }

    #[test]
    fn other_specialty_matches_nothing() {
        let list = vec![ana()];
        let filter = AppointmentFilter {
            specialty: "neurology".into(),
            ..Default::default()
        };
        assert!(apply(&list, &filter).is_empty());
    }

    #[test]
    fn date_matches_by_prefix() {
        let list = vec![ana()];
        let hit = AppointmentFilter {
            date: "2024-01-01".into(),
            ..Default::default()
        };
        let miss = AppointmentFilter {
            date: "2024-01-02".into(),
            ..Default::default()
        };
        assert_eq!(apply(&list, &hit).len(), 1);
        assert!(apply(&list, &miss).is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_source_alone() {
        let list = vec![
            result(1, "Juan Pérez", "Hemograma Completo", ResultStatus::Completed),
            result(2, "Ana María", "Electrocardiograma", ResultStatus::Completed),
            result(3, "Pedro López", "Radiografía de Tórax", ResultStatus::Pending),
        ];
        let snapshot = list.clone();
        let filter = ResultFilter {
            status: "completado".into(),
            ..Default::default()
        };

        let once = apply(&list, &filter);
        let twice = apply(&once, &filter);

        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
        assert_eq!(list, snapshot);
    }

    #[test]
    fn exam_type_substring() {
        let list = vec![
            result(1, "Juan", "Hemograma Completo", ResultStatus::Completed),
            result(2, "Ana", "Electrocardiograma", ResultStatus::Pending),
        ];
        let filter = ResultFilter {
            exam_type: "HEMO".into(),
            ..Default::default()
        };
        let found = apply(&list, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, Some(1));
    }

    #[test]
    fn unknown_status_matches_any_case() {
        let list = vec![
            result(1, "Juan", "Hemograma", ResultStatus::Other("Archivado".into())),
            result(2, "Ana", "Perfil", ResultStatus::Pending),
        ];
        let filter = ResultFilter {
            status: "ARCHIVADO".into(),
            ..Default::default()
        };
        let found = apply(&list, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].status.as_str(), "Archivado");
    }

    #[test]
    fn empty_filter_keeps_everything() {
        assert!(ResultFilter::default().is_empty());
        assert!(AppointmentFilter::default().is_empty());
        let list = vec![ana()];
        assert_eq!(apply(&list, &AppointmentFilter::default()), list);
    }
}
