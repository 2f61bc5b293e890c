use crate::errors::ActionError;
use crate::models::{MedicalResult, Resource, ResultStatus};
use reqwest::{Client, Response, StatusCode};
use std::marker::PhantomData;
use tracing::debug;

/// JSON client for one REST collection (`{base}` and `{base}/{id}`).
pub struct ResourceClient<R> {
    http: Client,
    base_url: String,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            _record: PhantomData,
        }
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{id}", self.base_url)
    }

    pub async fn list(&self) -> Result<Vec<R>, ActionError> {
        debug!(url = %self.base_url, "GET {} list", R::KIND);
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .map_err(ActionError::Network)?;
        read_json(check(response).await?).await
    }

    pub async fn get(&self, id: i64) -> Result<R, ActionError> {
        let url = self.item_url(id);
        debug!(%url, "GET {}", R::KIND);
        let response = self.http.get(&url).send().await.map_err(ActionError::Network)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ActionError::NotFound { kind: R::KIND, id });
        }
        read_json(check(response).await?).await
    }

    pub async fn create(&self, record: &R) -> Result<R, ActionError> {
        debug!(url = %self.base_url, "POST {}", R::KIND);
        let response = self
            .http
            .post(&self.base_url)
            .json(record)
            .send()
            .await
            .map_err(ActionError::Network)?;
        read_json(check(response).await?).await
    }

    pub async fn update(&self, id: i64, record: &R) -> Result<R, ActionError> {
        let url = self.item_url(id);
        debug!(%url, "PUT {}", R::KIND);
        let response = self
            .http
            .put(&url)
            .json(record)
            .send()
            .await
            .map_err(ActionError::Network)?;
        read_json(check(response).await?).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), ActionError> {
        let url = self.item_url(id);
        debug!(%url, "DELETE {}", R::KIND);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(ActionError::Network)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ActionError::NotFound { kind: R::KIND, id });
        }
        check(response).await?;
        Ok(())
    }
}

/// Server-side lookups the results endpoint offers besides plain CRUD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSearch {
    Patient(String),
    ExamType(String),
    Physician(String),
    Status(ResultStatus),
}

impl ResultSearch {
    /// Builds a search from the `field` / `term` pair of the search form.
    pub fn from_parts(field: &str, term: &str) -> Result<Self, ActionError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ActionError::required("Search term"));
        }
        match field.trim() {
            "patient" => Ok(Self::Patient(term.to_string())),
            "exam_type" => Ok(Self::ExamType(term.to_string())),
            "physician" => Ok(Self::Physician(term.to_string())),
            "status" => ResultStatus::parse(term)
                .map(Self::Status)
                .ok_or_else(|| ActionError::required("Status")),
            other => Err(ActionError::validation(format!(
                "unknown search field '{other}'"
            ))),
        }
    }

    fn path_and_query(&self) -> (&'static str, &'static str, String) {
        match self {
            Self::Patient(term) => ("buscar/paciente", "paciente", term.clone()),
            Self::ExamType(term) => ("buscar/tipo-examen", "tipoExamen", term.clone()),
            Self::Physician(term) => ("buscar/medico", "medicoResponsable", term.clone()),
            Self::Status(status) => ("buscar/estado", "estado", status.as_str().to_string()),
        }
    }
}

impl ResourceClient<MedicalResult> {
    pub async fn search(&self, search: &ResultSearch) -> Result<Vec<MedicalResult>, ActionError> {
        let (path, key, value) = search.path_and_query();
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, %key, %value, "search medical results");
        let response = self
            .http
            .get(&url)
            .query(&[(key, value.as_str())])
            .send()
            .await
            .map_err(ActionError::Network)?;
        read_json(check(response).await?).await
    }

    pub async fn pending(&self) -> Result<Vec<MedicalResult>, ActionError> {
        self.list_at("pendientes").await
    }

    /// Results issued during the last 30 days, as computed by the backend.
    pub async fn recent(&self) -> Result<Vec<MedicalResult>, ActionError> {
        self.list_at("recientes").await
    }

    pub async fn change_status(
        &self,
        id: i64,
        status: &ResultStatus,
    ) -> Result<MedicalResult, ActionError> {
        let url = format!("{}/cambiar-estado", self.item_url(id));
        debug!(%url, %status, "change medical result status");
        let response = self
            .http
            .put(&url)
            .query(&[("estado", status.as_str())])
            .send()
            .await
            .map_err(ActionError::Network)?;
        read_json(check(response).await?).await
    }

    async fn list_at(&self, path: &str) -> Result<Vec<MedicalResult>, ActionError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "GET medical results view");
        let response = self.http.get(&url).send().await.map_err(ActionError::Network)?;
        read_json(check(response).await?).await
    }
}

async fn check(response: Response) -> Result<Response, ActionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.trim().to_string()
    };
    Err(ActionError::Http { status, message })
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ActionError> {
    response.json::<T>().await.map_err(ActionError::Decode)
}
