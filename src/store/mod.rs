// src/store/mod.rs
//! Persistence for questions and choices.
//!
//! Handlers only talk to [`PollStore`]; the backing store is picked at
//! startup (PostgreSQL when a database URL is configured, memory otherwise).

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Choice, Poll, Question};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("vote counter of choice {0} is full")]
    CounterOverflow(i64),
}

#[async_trait]
pub trait PollStore: Send + Sync {
    async fn find_question(&self, id: i64) -> Result<Option<Question>, StoreError>;

    /// Questions with `pub_date <= cutoff`, most recent first, at most `limit`.
    async fn list_published_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, StoreError>;

    /// Choices of a question ordered by id.
    async fn choices_for(&self, question_id: i64) -> Result<Vec<Choice>, StoreError>;

    /// Adds one vote to `choice_id` if it belongs to `question_id`, as a
    /// single atomic operation. Returns the updated choice, or `None` when
    /// the pair does not match.
    async fn increment_votes(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> Result<Option<Choice>, StoreError>;

    /// Inserts a question and its choices together. `pub_date` must be set.
    async fn create_question(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
        choices: &[String],
    ) -> Result<Poll, StoreError>;

    /// Deletes a question and its choices. Returns false if it did not exist.
    async fn delete_question(&self, id: i64) -> Result<bool, StoreError>;
}

