// src/templates.rs
use tera::{Context, Tera};

use crate::models::{Poll, QuestionSummary};

const BASE: &str = "polls/base.html";
const INDEX: &str = "polls/index.html";
const DETAIL: &str = "polls/detail.html";
const RESULTS: &str = "polls/results.html";

/// HTML pages, compiled once at startup from the templates bundled into
/// the binary.
#[derive(Debug)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (BASE, include_str!("../templates/base.html")),
            (INDEX, include_str!("../templates/index.html")),
            (DETAIL, include_str!("../templates/detail.html")),
            (RESULTS, include_str!("../templates/results.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn index(&self, latest_question_list: &[QuestionSummary]) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("latest_question_list", latest_question_list);
        self.tera.render(INDEX, &context)
    }

    pub fn detail(&self, poll: &Poll, error_message: Option<&str>) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("question", &poll.question);
        context.insert("choices", &poll.choices);
        if let Some(message) = error_message {
            context.insert("error_message", message);
        }
        self.tera.render(DETAIL, &context)
    }

    pub fn results(&self, poll: &Poll) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("question", &poll.question);
        context.insert("choices", &poll.choices);
        context.insert("total_votes", &poll.total_votes());
        self.tera.render(RESULTS, &context)
    }
}
