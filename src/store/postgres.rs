// src/store/postgres.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{PollStore, StoreError};
use crate::models::{Choice, Poll, Question};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PollStore for PgStore {
    async fn find_question(&self, id: i64) -> Result<Option<Question>, StoreError> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question_text, pub_date
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn list_published_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, StoreError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question_text, pub_date
            FROM questions
            WHERE pub_date <= $1
            ORDER BY pub_date DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn choices_for(&self, question_id: i64) -> Result<Vec<Choice>, StoreError> {
        let choices = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, question_id, choice_text, votes
            FROM choices
            WHERE question_id = $1
            ORDER BY id
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    async fn increment_votes(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> Result<Option<Choice>, StoreError> {
        // Single statement: the row lock serializes concurrent votes.
        let choice = sqlx::query_as::<_, Choice>(
            r#"
            UPDATE choices
            SET votes = votes + 1
            WHERE id = $1 AND question_id = $2
            RETURNING id, question_id, choice_text, votes
            "#,
        )
        .bind(choice_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(choice)
    }

    async fn create_question(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
        choices: &[String],
    ) -> Result<Poll, StoreError> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (question_text, pub_date)
            VALUES ($1, $2)
            RETURNING id, question_text, pub_date
            "#,
        )
        .bind(question_text)
        .bind(pub_date)
        .fetch_one(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(choices.len());
        for choice_text in choices {
            let choice = sqlx::query_as::<_, Choice>(
                r#"
                INSERT INTO choices (question_id, choice_text)
                VALUES ($1, $2)
                RETURNING id, question_id, choice_text, votes
                "#,
            )
            .bind(question.id)
            .bind(choice_text)
            .fetch_one(&mut *tx)
            .await?;
            created.push(choice);
        }

        tx.commit().await?;

        Ok(Poll {
            question,
            choices: created,
        })
    }

    async fn delete_question(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
