use crate::errors::AppError;
use crate::filters::{AppointmentFilter, ResultFilter};
use crate::forms::{AppointmentForm, DeleteForm, ResultForm, SearchForm, StatusForm};
use crate::state::AppState;
use crate::ui::render_page;
use crate::view::Section;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SectionQuery {
    pub fresh: bool,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut controller = state.controller.lock().await;
    controller.ensure_loaded().await;
    let notices = controller.take_notices();
    Html(render_page(&controller, &notices))
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn show_section(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<SectionQuery>,
) -> Result<Redirect, AppError> {
    let section = Section::from_slug(&slug)
        .ok_or_else(|| AppError::not_found(format!("unknown section '{slug}'")))?;
    state.controller.lock().await.show(section, query.fresh);
    Ok(Redirect::to("/"))
}

pub async fn save_appointment(
    State(state): State<AppState>,
    Form(form): Form<AppointmentForm>,
) -> Redirect {
    state.controller.lock().await.save_appointment(form).await;
    Redirect::to("/")
}

pub async fn edit_appointment(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    state.controller.lock().await.edit_appointment(id).await;
    Redirect::to("/")
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    state
        .controller
        .lock()
        .await
        .delete_appointment(id, form.is_confirmed())
        .await;
    Redirect::to("/")
}

pub async fn filter_appointments(
    State(state): State<AppState>,
    Query(filter): Query<AppointmentFilter>,
) -> Redirect {
    state.controller.lock().await.filter_appointments(filter);
    Redirect::to("/")
}

pub async fn refresh_appointments(State(state): State<AppState>) -> Redirect {
    state.controller.lock().await.refresh_appointments().await;
    Redirect::to("/")
}

pub async fn save_result(State(state): State<AppState>, Form(form): Form<ResultForm>) -> Redirect {
    state.controller.lock().await.save_result(form).await;
    Redirect::to("/")
}

pub async fn edit_result(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    state.controller.lock().await.edit_result(id).await;
    Redirect::to("/")
}

pub async fn delete_result(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    state
        .controller
        .lock()
        .await
        .delete_result(id, form.is_confirmed())
        .await;
    Redirect::to("/")
}

pub async fn change_result_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    state
        .controller
        .lock()
        .await
        .change_result_status(id, &form.status)
        .await;
    Redirect::to("/")
}

pub async fn filter_results(
    State(state): State<AppState>,
    Query(filter): Query<ResultFilter>,
) -> Redirect {
    state.controller.lock().await.filter_results(filter);
    Redirect::to("/")
}

pub async fn search_results(
    State(state): State<AppState>,
    Query(search): Query<SearchForm>,
) -> Redirect {
    state
        .controller
        .lock()
        .await
        .search_results(&search.field, &search.term)
        .await;
    Redirect::to("/")
}

pub async fn pending_results(State(state): State<AppState>) -> Redirect {
    state.controller.lock().await.pending_results().await;
    Redirect::to("/")
}

pub async fn recent_results(State(state): State<AppState>) -> Redirect {
    state.controller.lock().await.recent_results().await;
    Redirect::to("/")
}

pub async fn refresh_results(State(state): State<AppState>) -> Redirect {
    state.controller.lock().await.refresh_results().await;
    Redirect::to("/")
}
