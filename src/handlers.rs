// src/handlers.rs
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use http::StatusCode;
use serde::Deserialize;

use crate::error::{ApiError, AppError};
use crate::models::NewQuestion;
use crate::polls::{self, VoteOutcome};
use crate::routes::AppState;

/// Form body of a vote. `choice` is kept raw so that a missing or garbled
/// value re-renders the form instead of failing the request. An unreadable
/// body counts as no choice.
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    fn choice_id(&self) -> Option<i64> {
        self.choice.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

/// Path segments that are not integers can never name a question.
fn question_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}

/// List the latest published questions
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let questions = polls::latest_questions(state.store.as_ref(), state.clock.now()).await?;
    Ok(Html(state.templates.index(&questions)?))
}

/// Show a question with its voting form
pub async fn detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let poll =
        polls::published_poll(state.store.as_ref(), question_id(&raw_id)?, state.clock.now())
            .await?;
    Ok(Html(state.templates.detail(&poll, None)?))
}

/// Show the vote tallies of a question
pub async fn results(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let poll =
        polls::published_poll(state.store.as_ref(), question_id(&raw_id)?, state.clock.now())
            .await?;
    Ok(Html(state.templates.results(&poll)?))
}

/// Vote for a choice
pub async fn vote(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    form: Result<Form<VoteForm>, FormRejection>,
) -> Result<Response, AppError> {
    let id = question_id(&raw_id)?;
    let choice_id = match form {
        Ok(Form(form)) => form.choice_id(),
        Err(rejection) => {
            tracing::debug!(question_id = id, %rejection, "unreadable vote form");
            None
        }
    };
    let outcome = polls::cast_vote(state.store.as_ref(), id, choice_id, state.clock.now()).await?;

    match outcome {
        VoteOutcome::Recorded(_) => Ok(Redirect::to(&format!("/{id}/results/")).into_response()),
        VoteOutcome::Rejected {
            poll,
            error_message,
        } => Ok(Html(state.templates.detail(&poll, Some(error_message))?).into_response()),
    }
}

/// Create a question with its choices (admin)
pub async fn create_question(
    State(state): State<AppState>,
    body: Result<Json<NewQuestion>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(new) = body.map_err(|rejection| AppError::Invalid(rejection.body_text()))?;
    let poll = polls::create_poll(state.store.as_ref(), new, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(poll)).into_response())
}

/// Delete a question and its choices (admin)
pub async fn delete_question(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|_| AppError::NotFound)?;
    polls::delete_poll(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
