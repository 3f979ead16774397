//! Database row models.

use serde::{Deserialize, Serialize};

/// A scraped job posting.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub url: String,
    pub source: String,
    /// Epoch milliseconds.
    pub posted_at: i64,
}

/// A job posting about to be inserted (no id yet).
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub url: String,
    pub source: String,
}

/// An alert subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    /// Comma-separated keyword list as stored.
    pub keywords: String,
    pub active: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Subscriber {
    /// Keywords as individual lowercase terms.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }
}
