// src/store/memory.rs
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{PollStore, StoreError};
use crate::models::{Choice, Poll, Question};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    questions: BTreeMap<i64, Question>,
    choices: BTreeMap<i64, Choice>,
    last_question_id: i64,
    last_choice_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn find_question(&self, id: i64) -> Result<Option<Question>, StoreError> {
        Ok(self.inner.read().await.questions.get(&id).cloned())
    }

    async fn list_published_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, StoreError> {
        let tables = self.inner.read().await;
        let mut questions: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| q.pub_date <= cutoff)
            .cloned()
            .collect();
        questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        questions.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(questions)
    }

    async fn choices_for(&self, question_id: i64) -> Result<Vec<Choice>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .choices
            .values()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn increment_votes(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> Result<Option<Choice>, StoreError> {
        let mut tables = self.inner.write().await;
        match tables.choices.get_mut(&choice_id) {
            Some(choice) if choice.question_id == question_id => {
                choice.votes = choice
                    .votes
                    .checked_add(1)
                    .ok_or(StoreError::CounterOverflow(choice_id))?;
                Ok(Some(choice.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn create_question(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
        choices: &[String],
    ) -> Result<Poll, StoreError> {
        let mut tables = self.inner.write().await;

        tables.last_question_id += 1;
        let question = Question {
            id: tables.last_question_id,
            question_text: question_text.to_string(),
            pub_date,
        };
        tables.questions.insert(question.id, question.clone());

        let mut created = Vec::with_capacity(choices.len());
        for choice_text in choices {
            tables.last_choice_id += 1;
            let choice = Choice {
                id: tables.last_choice_id,
                question_id: question.id,
                choice_text: choice_text.clone(),
                votes: 0,
            };
            tables.choices.insert(choice.id, choice.clone());
            created.push(choice);
        }

        Ok(Poll {
            question,
            choices: created,
        })
    }

    async fn delete_question(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.questions.remove(&id).is_none() {
            return Ok(false);
        }
        tables.choices.retain(|_, c| c.question_id != id);
        Ok(true)
    }
}
