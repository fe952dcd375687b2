// src/polls.rs
//! Poll operations shared by the HTTP handlers. Every read takes an explicit
//! `now` so visibility is decided by the caller's clock.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{Choice, NewQuestion, Poll, QuestionSummary, MAX_TEXT_LEN};
use crate::store::PollStore;

/// How many questions the index page shows.
pub const LATEST_LIMIT: i64 = 5;

pub const NO_CHOICE_MESSAGE: &str = "You didn't select a choice.";

/// Result of a vote submission on a visible question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded(Choice),
    /// No valid choice was submitted; the detail page is shown again.
    Rejected {
        poll: Poll,
        error_message: &'static str,
    },
}

/// The latest published questions, most recent first.
pub async fn latest_questions(
    store: &dyn PollStore,
    now: DateTime<Utc>,
) -> Result<Vec<QuestionSummary>, AppError> {
    let questions = store.list_published_before(now, LATEST_LIMIT).await?;
    Ok(questions
        .into_iter()
        .map(|question| QuestionSummary::new(question, now))
        .collect())
}

/// Looks up a question and its choices. Missing and not-yet-published
/// questions are both `NotFound`.
pub async fn published_poll(
    store: &dyn PollStore,
    question_id: i64,
    now: DateTime<Utc>,
) -> Result<Poll, AppError> {
    let question = store
        .find_question(question_id)
        .await?
        .filter(|q| q.is_published(now))
        .ok_or(AppError::NotFound)?;
    let choices = store.choices_for(question.id).await?;
    Ok(Poll { question, choices })
}

pub async fn cast_vote(
    store: &dyn PollStore,
    question_id: i64,
    choice_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<VoteOutcome, AppError> {
    let poll = published_poll(store, question_id, now).await?;

    let recorded = match choice_id {
        Some(choice_id) if poll.choice(choice_id).is_some() => {
            store.increment_votes(question_id, choice_id).await?
        }
        _ => None,
    };

    match recorded {
        Some(choice) => {
            tracing::info!(question_id, choice_id = choice.id, votes = choice.votes, "vote recorded");
            Ok(VoteOutcome::Recorded(choice))
        }
        None => {
            tracing::debug!(question_id, ?choice_id, "vote rejected");
            Ok(VoteOutcome::Rejected {
                poll,
                error_message: NO_CHOICE_MESSAGE,
            })
        }
    }
}

pub async fn create_poll(
    store: &dyn PollStore,
    new: NewQuestion,
    now: DateTime<Utc>,
) -> Result<Poll, AppError> {
    let question_text = validate_text("question_text", &new.question_text)?;
    let choices = new
        .choices
        .iter()
        .map(|text| validate_text("choice_text", text).map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;
    let pub_date = new.pub_date.unwrap_or(now);

    let poll = store.create_question(question_text, pub_date, &choices).await?;
    tracing::info!(
        question_id = poll.question.id,
        choices = poll.choices.len(),
        "question created"
    );
    Ok(poll)
}

pub async fn delete_poll(store: &dyn PollStore, question_id: i64) -> Result<(), AppError> {
    if !store.delete_question(question_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(question_id, "question deleted");
    Ok(())
}

fn validate_text<'a>(field: &str, text: &'a str) -> Result<&'a str, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Invalid(format!("{field} must not be blank")));
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::Invalid(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(text)
}
