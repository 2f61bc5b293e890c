use crate::controller::Controller;
use crate::filters::{AppointmentFilter, ResultFilter};
use crate::format;
use crate::forms::{AppointmentForm, ResultForm};
use crate::models::{Appointment, MedicalResult, ResultStatus};
use crate::view::{Notice, Section};
use std::collections::BTreeSet;

pub const EMPTY_APPOINTMENTS: &str = "No appointments found.";
pub const EMPTY_RESULTS: &str = "No medical results found.";

pub fn render_page(controller: &Controller, notices: &[Notice]) -> String {
    let active = controller.section;
    let appointments = &controller.appointments.store;
    let results = &controller.results.store;

    let results_title = results
        .remote()
        .map(|view| view.title.clone())
        .unwrap_or_else(|| "All results".to_string());

    let slots = [
        ("NAV", render_nav(active)),
        ("NOTICE", render_notices(notices)),
        ("PANEL_CLASS", section_class(Section::Panel, active).to_string()),
        (
            "APPOINTMENT_FORM_CLASS",
            section_class(Section::AppointmentForm, active).to_string(),
        ),
        ("RESULTS_CLASS", section_class(Section::Results, active).to_string()),
        ("RESULT_FORM_CLASS", section_class(Section::ResultForm, active).to_string()),
        (
            "APPOINTMENT_FILTER",
            render_appointment_filter(appointments.filter(), appointments.all()),
        ),
        ("APPOINTMENT_CARDS", render_appointment_cards(&appointments.visible())),
        ("APPOINTMENT_FORM", render_appointment_form(&controller.appointments.draft)),
        ("RESULT_SUMMARY", render_summary(results.all())),
        ("RESULT_TOOLS", render_result_tools(results.filter())),
        ("RESULTS_TITLE", escape(&results_title)),
        ("RESULT_CARDS", render_result_cards(&results.visible())),
        ("RESULT_FORM", render_result_form(&controller.results.draft)),
    ];
    fill_template(PAGE_HTML, &slots)
}

/// Replaces each `{{NAME}}` slot in one pass over the template. Inserted
/// values are never scanned again, so record text stays literal.
fn fill_template(template: &str, slots: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match slots.iter().find(|(slot, _)| *slot == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Highlights the control whose text equals the active section's label.
pub fn render_nav(active: Section) -> String {
    Section::ALL
        .iter()
        .map(|section| {
            let class = if section.label() == active.label() {
                "tab active"
            } else {
                "tab"
            };
            let fresh = if section.is_form() { "?fresh=true" } else { "" };
            format!(
                r#"<a class="{class}" href="/section/{}{fresh}">{}</a>"#,
                section.slug(),
                section.label()
            )
        })
        .collect()
}

fn section_class(section: Section, active: Section) -> &'static str {
    if section == active {
        "section active"
    } else {
        "section hidden"
    }
}

fn render_notices(notices: &[Notice]) -> String {
    if notices.is_empty() {
        return r#"<p class="status" role="status"></p>"#.to_string();
    }
    notices
        .iter()
        .map(|notice| {
            format!(
                r#"<p class="status" role="alert" data-type="{}">{}</p>"#,
                notice.level.css_class(),
                escape(&notice.message)
            )
        })
        .collect()
}

pub fn render_appointment_cards(records: &[Appointment]) -> String {
    if records.is_empty() {
        return format!(r#"<p class="empty">{EMPTY_APPOINTMENTS}</p>"#);
    }
    records.iter().map(appointment_card).collect()
}

fn appointment_card(appointment: &Appointment) -> String {
    format!(
        r#"<article class="card" data-id="{id}">
  <header><h3>{patient}</h3><span class="tag">{specialty}</span></header>
  <p class="meta">{when}</p>
  <p>{reason}</p>
  <div class="card-actions">
    <button type="button" data-action="edit">Edit</button>
    <button type="button" class="danger" data-action="delete">Delete</button>
  </div>
</article>
"#,
        id = id_attr(appointment.id),
        patient = escape(&appointment.patient),
        specialty = escape(&appointment.specialty),
        when = escape(&format::display_raw(&appointment.date_time)),
        reason = escape(&appointment.reason),
    )
}

pub fn render_result_cards(records: &[MedicalResult]) -> String {
    if records.is_empty() {
        return format!(r#"<p class="empty">{EMPTY_RESULTS}</p>"#);
    }
    records.iter().map(result_card).collect()
}

fn result_card(result: &MedicalResult) -> String {
    let observations = match result.observations.as_deref() {
        Some(text) if !text.trim().is_empty() => {
            format!(r#"<p class="hint">{}</p>"#, escape(text))
        }
        _ => String::new(),
    };
    format!(
        r#"<article class="card" data-id="{id}">
  <header><h3>{patient}</h3><span class="badge" data-status="{status}">{status_label}</span></header>
  <p class="meta">{exam_type} · {physician}</p>
  <p class="meta">Exam {exam_date} · Issued {issue_date}</p>
  <p>{results}</p>
  {observations}
  <div class="card-actions">
    <button type="button" data-action="edit">Edit</button>
    <button type="button" class="danger" data-action="delete">Delete</button>
    <select data-role="status" aria-label="New status">{options}</select>
    <button type="button" data-action="status">Set status</button>
  </div>
</article>
"#,
        id = id_attr(result.id),
        patient = escape(&result.patient),
        status = escape(result.status.as_str()),
        status_label = escape(result.status.label()),
        exam_type = escape(&result.exam_type),
        physician = escape(&result.responsible_physician),
        exam_date = format::display(result.exam_date.as_ref()),
        issue_date = format::display(result.issue_date.as_ref()),
        results = escape(&result.results),
        observations = observations,
        options = status_options(result.status.as_str(), false),
    )
}

fn render_summary(all: &[MedicalResult]) -> String {
    let count = |status: &ResultStatus| all.iter().filter(|r| &r.status == status).count();
    let stats: String = ResultStatus::KNOWN
        .iter()
        .map(|status| {
            format!(
                r#"<div class="stat"><span class="label">{}</span><span class="value">{}</span></div>"#,
                status.label(),
                count(status)
            )
        })
        .collect();
    format!(
        r#"<div class="stat"><span class="label">Total</span><span class="value">{}</span></div>{stats}"#,
        all.len()
    )
}

fn render_appointment_filter(filter: &AppointmentFilter, all: &[Appointment]) -> String {
    let specialties: BTreeSet<&str> = all
        .iter()
        .map(|a| a.specialty.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let mut options = String::from(r#"<option value="">All specialties</option>"#);
    for specialty in specialties {
        let selected = if specialty.eq_ignore_ascii_case(filter.specialty.trim()) {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{0}"{selected}>{0}</option>"#,
            escape(specialty)
        ));
    }
    format!(
        r#"<form class="filters" method="get" action="/appointments/filter">
  <input name="patient" placeholder="Patient" value="{patient}">
  <select name="specialty">{options}</select>
  <input type="date" name="date" value="{date}">
  <button type="submit">Filter</button>
</form>"#,
        patient = escape(&filter.patient),
        date = escape(&filter.date),
    )
}

fn render_result_tools(filter: &ResultFilter) -> String {
    format!(
        r#"<form class="filters" method="get" action="/results/filter">
  <input name="patient" placeholder="Patient" value="{patient}">
  <input name="exam_type" placeholder="Exam type" value="{exam_type}">
  <select name="status">{options}</select>
  <button type="submit">Filter</button>
</form>
<form class="filters" method="get" action="/results/search">
  <select name="field">
    <option value="patient">Patient</option>
    <option value="exam_type">Exam type</option>
    <option value="physician">Physician</option>
    <option value="status">Status</option>
  </select>
  <input name="term" placeholder="Search on the server">
  <button type="submit">Search</button>
  <a class="tab" href="/results/pending">Pending</a>
  <a class="tab" href="/results/recent">Recent</a>
</form>"#,
        patient = escape(&filter.patient),
        exam_type = escape(&filter.exam_type),
        options = status_options(&filter.status, true),
    )
}

pub fn render_appointment_form(draft: &AppointmentForm) -> String {
    let heading = if draft.id.trim().is_empty() {
        "New appointment"
    } else {
        "Edit appointment"
    };
    format!(
        r#"<h2>{heading}</h2>
<form id="appointment-form" class="record-form" method="post" action="/appointments">
  <input type="hidden" name="id" value="{id}">
  <label>Patient <input name="patient" value="{patient}" required></label>
  <label>Specialty <input name="specialty" value="{specialty}" list="specialties" required></label>
  <datalist id="specialties">
    <option value="Odontología"><option value="Cardiología"><option value="Pediatría">
    <option value="Neurología"><option value="Medicina General">
  </datalist>
  <label>Date and time <input type="datetime-local" name="date_time" value="{date_time}" required></label>
  <label>Reason <textarea name="reason" required>{reason}</textarea></label>
  <div class="card-actions">
    <button class="btn-primary" type="submit">Save</button>
    <a class="tab" href="/section/panel">Cancel</a>
  </div>
</form>"#,
        id = escape(&draft.id),
        patient = escape(&draft.patient),
        specialty = escape(&draft.specialty),
        date_time = escape(&draft.date_time),
        reason = escape(&draft.reason),
    )
}

pub fn render_result_form(draft: &ResultForm) -> String {
    let heading = if draft.id.trim().is_empty() {
        "New medical result"
    } else {
        "Edit medical result"
    };
    format!(
        r#"<h2>{heading}</h2>
<form id="result-form" class="record-form" method="post" action="/results">
  <input type="hidden" name="id" value="{id}">
  <label>Patient <input name="patient" value="{patient}" required></label>
  <label>Exam type <input name="exam_type" value="{exam_type}" required></label>
  <label>Responsible physician <input name="responsible_physician" value="{physician}" required></label>
  <label>Status <select name="status">{options}</select></label>
  <label>Exam date <input type="datetime-local" name="exam_date" value="{exam_date}" required></label>
  <label>Issue date <input type="datetime-local" name="issue_date" value="{issue_date}"></label>
  <label>Results <textarea name="results" required>{results}</textarea></label>
  <label>Observations <textarea name="observations">{observations}</textarea></label>
  <label>Description <textarea name="description">{description}</textarea></label>
  <div class="card-actions">
    <button class="btn-primary" type="submit">Save</button>
    <a class="tab" href="/section/results">Cancel</a>
  </div>
</form>"#,
        id = escape(&draft.id),
        patient = escape(&draft.patient),
        exam_type = escape(&draft.exam_type),
        physician = escape(&draft.responsible_physician),
        options = status_options(&draft.status, false),
        exam_date = escape(&draft.exam_date),
        issue_date = escape(&draft.issue_date),
        results = escape(&draft.results),
        observations = escape(&draft.observations),
        description = escape(&draft.description),
    )
}

fn status_options(selected: &str, allow_any: bool) -> String {
    let selected = ResultStatus::parse(selected);
    let mut options = if allow_any {
        String::from(r#"<option value="">Any status</option>"#)
    } else {
        String::new()
    };
    for status in ResultStatus::KNOWN.iter() {
        let mark = if selected.as_ref() == Some(status) { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{}"{mark}>{}</option>"#,
            status.as_str(),
            status.label()
        ));
    }
    if let Some(other @ ResultStatus::Other(_)) = &selected {
        options.push_str(&format!(
            r#"<option value="{0}" selected>{0}</option>"#,
            escape(other.as_str())
        ));
    }
    options
}

fn id_attr(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>VitalApp</title>
  <style>
    :root {
      --bg-1: #eef5f3;
      --ink: #20302d;
      --accent: #1f8a70;
      --accent-2: #2f4858;
      --danger: #c63b2b;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #f7fbfa 60%, #ffffff 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    nav,
    .card-actions,
    .filters {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      align-items: center;
    }

    .tab {
      border-radius: 999px;
      padding: 8px 14px;
      font-weight: 600;
      color: #6b645d;
      text-decoration: none;
      background: rgba(47, 72, 88, 0.08);
    }

    .tab.active {
      background: var(--accent);
      color: white;
    }

    .section.hidden {
      display: none;
    }

    .section.active {
      display: grid;
      gap: 16px;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    .stat,
    .card {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .cards {
      display: grid;
      gap: 12px;
    }

    .card header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .card h3 {
      margin: 0;
    }

    .tag,
    .badge {
      font-size: 0.8rem;
      padding: 4px 10px;
      border-radius: 999px;
      background: rgba(31, 138, 112, 0.12);
    }

    .badge[data-status="PENDIENTE"] {
      background: rgba(255, 170, 0, 0.2);
    }

    .meta,
    .hint,
    .empty {
      color: #6f6a65;
      margin: 4px 0;
    }

    .record-form {
      display: grid;
      gap: 12px;
    }

    .record-form label {
      display: grid;
      gap: 4px;
      font-weight: 600;
    }

    input,
    select,
    textarea {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 8px 16px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
    }

    button.danger {
      background: var(--danger);
    }

    .btn-primary {
      background: var(--accent);
    }

    .status {
      min-height: 1.2em;
      margin: 0;
    }

    .status[data-type="error"] {
      color: var(--danger);
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>VitalApp</h1>
      <nav>{{NAV}}</nav>
    </header>

    {{NOTICE}}

    <section id="panel" class="{{PANEL_CLASS}}">
      {{APPOINTMENT_FILTER}}
      <form method="post" action="/appointments/refresh"><button type="submit">Refresh</button></form>
      <div id="appointment-list" class="cards" data-list="/appointments">
{{APPOINTMENT_CARDS}}
      </div>
    </section>

    <section id="appointment-form-section" class="{{APPOINTMENT_FORM_CLASS}}">
      {{APPOINTMENT_FORM}}
    </section>

    <section id="results" class="{{RESULTS_CLASS}}">
      <div class="panel">{{RESULT_SUMMARY}}</div>
      {{RESULT_TOOLS}}
      <div class="filters">
        <h2>{{RESULTS_TITLE}}</h2>
        <form method="post" action="/results/refresh"><button type="submit">Show all</button></form>
      </div>
      <div id="result-list" class="cards" data-list="/results">
{{RESULT_CARDS}}
      </div>
    </section>

    <section id="result-form-section" class="{{RESULT_FORM_CLASS}}">
      {{RESULT_FORM}}
    </section>

    <form id="delete-form" method="post" hidden>
      <input type="hidden" name="confirmed" value="false">
    </form>
    <form id="status-form" method="post" hidden>
      <input type="hidden" name="status" value="">
    </form>
  </main>

  <script>
    const deleteForm = document.getElementById('delete-form');
    const statusForm = document.getElementById('status-form');

    document.querySelectorAll('[data-list]').forEach((list) => {
      list.addEventListener('click', (event) => {
        const button = event.target.closest('button[data-action]');
        if (!button) {
          return;
        }
        const card = button.closest('[data-id]');
        const id = card && card.dataset.id;
        if (!id) {
          return;
        }
        const base = list.dataset.list;
        const action = button.dataset.action;

        if (action === 'edit') {
          window.location.href = `${base}/${id}/edit`;
        } else if (action === 'delete') {
          deleteForm.action = `${base}/${id}/delete`;
          deleteForm.elements.confirmed.value = window.confirm('Delete this record?') ? 'true' : 'false';
          deleteForm.submit();
        } else if (action === 'status') {
          const select = card.querySelector('select[data-role="status"]');
          statusForm.action = `${base}/${id}/status`;
          statusForm.elements.status.value = select ? select.value : '';
          statusForm.submit();
        }
      });
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ResourceClient;
    use reqwest::Client;

    fn offline_controller() -> Controller {
        let http = Client::new();
        Controller::new(
            ResourceClient::new(http.clone(), "http://127.0.0.1:9/api/citas"),
            ResourceClient::new(http, "http://127.0.0.1:9/api/resultados-medicos"),
        )
    }

    fn result(id: i64, status: ResultStatus) -> MedicalResult {
        MedicalResult {
            id: Some(id),
            patient: "Juan Pérez".into(),
            exam_type: "Hemograma Completo".into(),
            results: "Hemoglobina: 14.2 g/dL".into(),
            responsible_physician: "Dr. María González".into(),
            exam_date: None,
            issue_date: None,
            description: None,
            observations: None,
            status,
        }
    }

    fn ana() -> Appointment {
        Appointment {
            id: Some(1),
            patient: "Ana".into(),
            specialty: "cardiology".into(),
            date_time: "2024-01-01T10:00".into(),
            reason: "checkup".into(),
        }
    }

    #[test]
    fn empty_lists_render_placeholder_only() {
        let html = render_appointment_cards(&[]);
        assert!(html.contains(EMPTY_APPOINTMENTS));
        assert!(!html.contains(r#"class="card""#));

        let html = render_result_cards(&[]);
        assert!(html.contains(EMPTY_RESULTS));
        assert!(!html.contains(r#"class="card""#));
    }

    #[test]
    fn cards_carry_the_identifier_as_data() {
        let html = render_appointment_cards(&[ana()]);
        assert_eq!(html.matches(r#"class="card""#).count(), 1);
        assert!(html.contains(r#"data-id="1""#));
        assert!(html.contains(r#"data-action="edit""#));
        assert!(html.contains(r#"data-action="delete""#));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn markup_is_escaped() {
        let mut appointment = ana();
        appointment.reason = "<script>alert('x')</script>".into();
        let html = render_appointment_cards(&[appointment]);
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn nav_highlights_by_label() {
        let nav = render_nav(Section::Results);
        assert_eq!(nav.matches("tab active").count(), 1);
        assert!(nav.contains(r#"<a class="tab active" href="/section/results">Medical results</a>"#));
        assert!(nav.contains("/section/result-form?fresh=true"));
    }

    #[test]
    fn form_keeps_hidden_identifier() {
        let form = AppointmentForm {
            id: "7".into(),
            patient: "Ana".into(),
            ..Default::default()
        };
        let html = render_appointment_form(&form);
        assert!(html.contains(r#"<input type="hidden" name="id" value="7">"#));
        assert!(html.contains("Edit appointment"));
    }

    #[test]
    fn status_select_marks_current_value() {
        let html = status_options("REVISADO", false);
        assert!(html.contains(r#"<option value="REVISADO" selected>Reviewed</option>"#));
        assert!(!html.contains("Any status"));

        let html = status_options("ARCHIVADO", true);
        assert!(html.contains(r#"<option value="ARCHIVADO" selected>ARCHIVADO</option>"#));
    }

    #[test]
    fn record_text_never_expands_page_slots() {
        let mut controller = offline_controller();
        let mut appointment = ana();
        appointment.patient = "{{RESULT_FORM}}".into();
        controller.appointments.store.replace(vec![appointment]);

        let html = render_page(&controller, &[]);
        assert_eq!(html.matches(r#"id="result-form""#).count(), 1);
        assert!(html.contains("<h3>{{RESULT_FORM}}</h3>"));
    }

    #[test]
    fn unknown_slots_are_left_alone() {
        let slots = [("A", "{{B}}".to_string()), ("B", "b".to_string())];
        assert_eq!(fill_template("{{A}}-{{B}}-{{C}}-{{", &slots), "{{B}}-b-{{C}}-{{");
    }

    #[test]
    fn every_notice_is_rendered() {
        let controller = offline_controller();
        let notices = [
            Notice::error("Could not save the appointment: Specialty is required"),
            Notice::error("Could not load the appointment list: offline"),
        ];
        let html = render_page(&controller, &notices);
        assert_eq!(html.matches(r#"role="alert""#).count(), 2);
        assert!(html.contains("Specialty is required"));
        assert!(html.contains("offline"));
    }

    #[test]
    fn summary_counts_each_status() {
        let html = render_summary(&[
            result(1, ResultStatus::Pending),
            result(2, ResultStatus::Pending),
            result(3, ResultStatus::Reviewed),
        ]);
        assert!(html.contains(r#"<span class="label">Total</span><span class="value">3</span>"#));
        assert!(html.contains(r#"<span class="label">Pending</span><span class="value">2</span>"#));
        assert!(html.contains(r#"<span class="label">Completed</span><span class="value">0</span>"#));
        assert!(html.contains(r#"<span class="label">Reviewed</span><span class="value">1</span>"#));
    }
}
