use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Form,
};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::ingest::{self, EmailMessage};
use crate::models::application::{ApplicationForm, NewJobApplication};
use crate::state::AppState;
use crate::view::{ApplicationTable, EditPage, IndexPage};

type Page = (StatusCode, Html<String>);

/// What the write step (if any) of a request produced, shown above the table.
#[derive(Debug, Default)]
struct Outcome {
    notice: Option<String>,
    error: Option<(StatusCode, String)>,
}

impl Outcome {
    fn notice(message: impl Into<String>) -> Self {
        Self {
            notice: Some(message.into()),
            error: None,
        }
    }

    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            notice: None,
            error: Some((status, message.into())),
        }
    }
}

/// Reads the full list once and renders the page around it.
///
/// The table is rebuilt from this read alone. A failed read renders an empty
/// table with the error shown, instead of a stale or partial one.
async fn render_index(state: &AppState, outcome: Outcome) -> Result<Page, AppError> {
    match state.api.list().await {
        Ok(records) => render_page(ApplicationTable::from_records(&records), None, outcome),
        Err(e) => {
            warn!("Failed to load applications: {e}");
            render_page(
                ApplicationTable::default(),
                Some(format!("Could not load applications: {e}")),
                outcome,
            )
        }
    }
}

fn render_page(
    table: ApplicationTable,
    list_error: Option<String>,
    outcome: Outcome,
) -> Result<Page, AppError> {
    debug!("Rendering {} application rows", table.len());
    let mut page = IndexPage::new(table);
    let mut status = StatusCode::OK;

    if let Some(notice) = outcome.notice {
        page = page.with_notice(notice);
    }

    let mut errors = Vec::new();
    if let Some((write_status, message)) = outcome.error {
        status = write_status;
        errors.push(message);
    }
    if let Some(message) = list_error {
        if status == StatusCode::OK {
            status = StatusCode::BAD_GATEWAY;
        }
        errors.push(message);
    }
    if !errors.is_empty() {
        page = page.with_error(errors.join(" "));
    }

    Ok((status, Html(page.render()?)))
}

async fn create_and_render(state: &AppState, payload: NewJobApplication) -> Result<Page, AppError> {
    let outcome = match state.api.create(&payload).await {
        Ok(()) => {
            info!("Created application for {}", payload.company_name);
            Outcome::notice(format!("Added application for {}.", payload.company_name))
        }
        Err(e) => {
            warn!("Failed to create application: {e}");
            Outcome::error(
                StatusCode::BAD_GATEWAY,
                format!("Could not save application: {e}."),
            )
        }
    };
    render_index(state, outcome).await
}

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Page, AppError> {
    render_index(&state, Outcome::default()).await
}

/// POST /applications
///
/// One create request, then one read. The form comes back empty whether or not
/// the create succeeded.
pub async fn handle_submit(
    State(state): State<AppState>,
    Form(form): Form<ApplicationForm>,
) -> Result<Page, AppError> {
    create_and_render(&state, form.into_payload()).await
}

/// GET /applications/:id/edit
///
/// A failed read renders the tracker page with the error banner, like the other page routes.
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Page, AppError> {
    let records = match state.api.list().await {
        Ok(records) => records,
        Err(e) => {
            warn!("Failed to load application {id} for editing: {e}");
            return render_page(
                ApplicationTable::default(),
                Some(format!("Could not load applications: {e}")),
                Outcome::default(),
            );
        }
    };
    let record = records
        .iter()
        .find(|r| r.id == Some(id))
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    Ok((
        StatusCode::OK,
        Html(EditPage::for_record(id, record).render()?),
    ))
}

/// POST /applications/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ApplicationForm>,
) -> Result<Page, AppError> {
    let outcome = match state.api.update(id, &form.into_payload()).await {
        Ok(Some(_)) => {
            info!("Updated application {id}");
            Outcome::notice(format!("Updated application {id}."))
        }
        Ok(None) => Outcome::error(
            StatusCode::NOT_FOUND,
            format!("Application {id} no longer exists."),
        ),
        Err(e) => {
            warn!("Failed to update application {id}: {e}");
            Outcome::error(
                StatusCode::BAD_GATEWAY,
                format!("Could not update application {id}: {e}."),
            )
        }
    };
    render_index(&state, outcome).await
}

/// POST /applications/:id/delete
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Page, AppError> {
    let outcome = match state.api.delete(id).await {
        Ok(()) => {
            info!("Deleted application {id}");
            Outcome::notice(format!("Deleted application {id}."))
        }
        Err(e) => {
            warn!("Failed to delete application {id}: {e}");
            Outcome::error(
                StatusCode::BAD_GATEWAY,
                format!("Could not delete application {id}: {e}."),
            )
        }
    };
    render_index(&state, outcome).await
}

/// POST /applications/import
pub async fn handle_import(
    State(state): State<AppState>,
    Form(email): Form<EmailMessage>,
) -> Result<Page, AppError> {
    match ingest::extract_application(&email, ingest::today()) {
        Ok(payload) => create_and_render(&state, payload).await,
        Err(e) => {
            info!("Email import rejected: {e}");
            render_index(
                &state,
                Outcome::error(StatusCode::UNPROCESSABLE_ENTITY, format!("{e}.")),
            )
            .await
        }
    }
}
