// src/models.rs
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of question and choice texts.
pub const MAX_TEXT_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// True when `pub_date` falls within the 24 hours ending at `now`,
    /// both endpoints included.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now >= self.pub_date && self.pub_date >= now - Duration::days(1)
    }

    /// Questions are only shown once their publish time has been reached.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.question_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i32,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.choice_text)
    }
}

/// A question together with its choices, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Poll {
    pub question: Question,
    pub choices: Vec<Choice>,
}

impl Poll {
    pub fn choice(&self, choice_id: i64) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    pub fn total_votes(&self) -> i64 {
        self.choices.iter().map(|c| i64::from(c.votes)).sum()
    }
}

/// Input for creating a question and its initial choices.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub question_text: String,
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// Row shape used by the index page.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    #[serde(flatten)]
    pub question: Question,
    pub published_recently: bool,
}

impl QuestionSummary {
    pub fn new(question: Question, now: DateTime<Utc>) -> Self {
        let published_recently = question.was_published_recently(now);
        Self {
            question,
            published_recently,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn question_at(pub_date: DateTime<Utc>) -> Question {
        Question {
            id: 1,
            question_text: "What's up?".to_string(),
            pub_date,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case::same_instant(Duration::zero(), true)]
    #[case::one_hour_ago(Duration::hours(-1), true)]
    #[case::exactly_one_day_ago(Duration::days(-1), true)]
    #[case::just_over_one_day_ago(Duration::days(-1) - Duration::nanoseconds(1), false)]
    #[case::fifteen_days_ago(Duration::days(-15), false)]
    #[case::one_second_ahead(Duration::seconds(1), false)]
    #[case::thirty_days_ahead(Duration::days(30), false)]
    fn recency_window(#[case] offset: Duration, #[case] expected: bool) {
        let question = question_at(now() + offset);
        assert_eq!(question.was_published_recently(now()), expected);
    }

    #[test]
    fn recency_holds_at_both_window_edges_for_the_same_pub_date() {
        let question = question_at(now());
        assert!(question.was_published_recently(now()));
        assert!(question.was_published_recently(now() + Duration::hours(24)));
        assert!(!question.was_published_recently(
            now() + Duration::hours(24) + Duration::microseconds(1)
        ));
    }

    #[test]
    fn published_once_pub_date_is_reached() {
        assert!(question_at(now()).is_published(now()));
        assert!(question_at(now() - Duration::days(3)).is_published(now()));
        assert!(!question_at(now() + Duration::seconds(1)).is_published(now()));
    }

    #[test]
    fn display_uses_texts() {
        let question = question_at(now());
        assert_eq!(question.to_string(), "What's up?");

        let choice = Choice {
            id: 3,
            question_id: 1,
            choice_text: "Not much".to_string(),
            votes: 0,
        };
        assert_eq!(choice.to_string(), "Not much");
    }

    #[test]
    fn poll_totals_and_lookup() {
        let poll = Poll {
            question: question_at(now()),
            choices: vec![
                Choice {
                    id: 1,
                    question_id: 1,
                    choice_text: "a".to_string(),
                    votes: 2,
                },
                Choice {
                    id: 2,
                    question_id: 1,
                    choice_text: "b".to_string(),
                    votes: 5,
                },
            ],
        };
        assert_eq!(poll.total_votes(), 7);
        assert_eq!(poll.choice(2).map(|c| c.votes), Some(5));
        assert!(poll.choice(9).is_none());
    }
}
