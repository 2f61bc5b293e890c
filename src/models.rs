use crate::filters::{AppointmentFilter, ResultFilter};
use chrono::NaiveDateTime;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A record type the backend exposes as a REST collection.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Filter: Clone + Default + fmt::Debug + Send + Sync;

    /// Human readable name used in notices and log lines.
    const KIND: &'static str;

    fn id(&self) -> Option<i64>;

    fn matches(&self, filter: &Self::Filter) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "paciente", default, deserialize_with = "nullable_string")]
    pub patient: String,
    #[serde(rename = "especialidad", default, deserialize_with = "nullable_string")]
    pub specialty: String,
    #[serde(rename = "fechaHora", default, deserialize_with = "nullable_string")]
    pub date_time: String,
    #[serde(rename = "motivo", default, deserialize_with = "nullable_string")]
    pub reason: String,
}

impl Resource for Appointment {
    type Filter = AppointmentFilter;

    const KIND: &'static str = "appointment";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn matches(&self, filter: &AppointmentFilter) -> bool {
        filter.matches(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "paciente", default, deserialize_with = "nullable_string")]
    pub patient: String,
    #[serde(rename = "tipoExamen", default, deserialize_with = "nullable_string")]
    pub exam_type: String,
    #[serde(rename = "resultados", default, deserialize_with = "nullable_string")]
    pub results: String,
    #[serde(rename = "medicoResponsable", default, deserialize_with = "nullable_string")]
    pub responsible_physician: String,
    #[serde(rename = "fechaExamen", default)]
    pub exam_date: Option<NaiveDateTime>,
    /// Left out of the request when unset so the backend stamps the current time.
    #[serde(rename = "fechaEmision", default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDateTime>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "observaciones", default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: ResultStatus,
}

impl Resource for MedicalResult {
    type Filter = ResultFilter;

    const KIND: &'static str = "medical result";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn matches(&self, filter: &ResultFilter) -> bool {
        filter.matches(self)
    }
}

/// Lifecycle of a medical result as reported by the backend.
///
/// Values the backend may add later are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ResultStatus {
    #[default]
    Pending,
    Completed,
    Reviewed,
    Other(String),
}

impl ResultStatus {
    pub const KNOWN: [ResultStatus; 3] = [
        ResultStatus::Pending,
        ResultStatus::Completed,
        ResultStatus::Reviewed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ResultStatus::Pending => "PENDIENTE",
            ResultStatus::Completed => "COMPLETADO",
            ResultStatus::Reviewed => "REVISADO",
            ResultStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ResultStatus::Pending => "Pending",
            ResultStatus::Completed => "Completed",
            ResultStatus::Reviewed => "Reviewed",
            ResultStatus::Other(raw) => raw,
        }
    }

    /// Parses a status as typed in a form. Empty input means no status.
    /// Values outside the known set are kept exactly as given.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.to_uppercase().as_str() {
            "PENDIENTE" | "PENDING" => ResultStatus::Pending,
            "COMPLETADO" | "COMPLETED" => ResultStatus::Completed,
            "REVISADO" | "REVIEWED" => ResultStatus::Reviewed,
            _ => ResultStatus::Other(raw.to_string()),
        })
    }

    /// Case-insensitive equality, used when filtering.
    pub fn matches(&self, other: &ResultStatus) -> bool {
        self.as_str().to_lowercase() == other.as_str().to_lowercase()
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResultStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResultStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(ResultStatus::parse)
            .unwrap_or_default())
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn appointment_uses_backend_field_names() {
        let appointment = Appointment {
            id: None,
            patient: "Ana".into(),
            specialty: "cardiology".into(),
            date_time: "2024-01-01T10:00".into(),
            reason: "checkup".into(),
        };

        let value = serde_json::to_value(&appointment).unwrap();
        assert_eq!(
            value,
            json!({
                "paciente": "Ana",
                "especialidad": "cardiology",
                "fechaHora": "2024-01-01T10:00",
                "motivo": "checkup"
            })
        );
    }

    #[test]
    fn result_tolerates_nulls_from_backend() {
        let result: MedicalResult = serde_json::from_value(json!({
            "id": 5,
            "paciente": "Pedro López",
            "tipoExamen": "Radiografía de Tórax",
            "resultados": null,
            "medicoResponsable": "Dr. Ana Rodríguez",
            "fechaExamen": "2025-10-19T08:15:30.123456",
            "fechaEmision": null,
            "observaciones": null,
            "estado": null
        }))
        .unwrap();

        assert_eq!(result.id, Some(5));
        assert_eq!(result.results, "");
        assert_eq!(result.status, ResultStatus::Pending);
        assert!(result.exam_date.is_some());
        assert!(result.issue_date.is_none());
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status: ResultStatus = serde_json::from_value(json!("ARCHIVADO")).unwrap();
        assert_eq!(status, ResultStatus::Other("ARCHIVADO".into()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("ARCHIVADO"));
    }

    #[test]
    fn unknown_status_keeps_its_spelling() {
        let status: ResultStatus = serde_json::from_value(json!("Archivado")).unwrap();
        assert_eq!(status, ResultStatus::Other("Archivado".into()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Archivado"));
        assert!(status.matches(&ResultStatus::Other("ARCHIVADO".into())));
    }

    #[test]
    fn status_parse_accepts_english_labels() {
        assert_eq!(ResultStatus::parse(" completed "), Some(ResultStatus::Completed));
        assert_eq!(ResultStatus::parse("REVISADO"), Some(ResultStatus::Reviewed));
        assert_eq!(ResultStatus::parse("   "), None);
    }
}
