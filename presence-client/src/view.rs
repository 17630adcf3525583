//! View-model state for the two presentation modes.
//!
//! Both views follow the same request lifecycle: [`begin`](ElderView::begin)
//! clears the shown result, then exactly one of `record_success` or
//! `record_failure` settles it. Counters only move on success.
use crate::api::Answer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

pub const ELDER_HISTORY_LIMIT: usize = 3;
pub const CUSTOM_CATEGORY: &str = "Custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Elder,
    Teen,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Elder => "elder",
            Mode::Teen => "teen",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elder" => Ok(Mode::Elder),
            "teen" => Ok(Mode::Teen),
            other => Err(format!("unknown mode '{other}' (expected elder or teen)")),
        }
    }
}

/// A canned question offered as a one-key shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub label: &'static str,
    pub query: &'static str,
    pub category: &'static str,
}

pub const ELDER_SUGGESTIONS: [Shortcut; 3] = [
    Shortcut {
        label: "Medicines & side effects",
        query: "common side effects of high blood pressure medicines for older adults",
        category: "Medicines",
    },
    Shortcut {
        label: "Gentle exercise",
        query: "simple knee and back exercises for seniors at home",
        category: "Exercise",
    },
    Shortcut {
        label: "Avoiding scams",
        query: "how older adults can avoid phone and email scams",
        category: "Scams",
    },
];

pub const TEEN_QUICK_TOPICS: [Shortcut; 4] = [
    Shortcut {
        label: "Study Routine",
        query: "how to build a consistent study routine",
        category: "Study routine",
    },
    Shortcut {
        label: "Mental Health",
        query: "tips for managing stress and anxiety for college students",
        category: "Mental health",
    },
    Shortcut {
        label: "Scholarships",
        query: "scholarships for computer science students in the US",
        category: "Scholarships",
    },
    Shortcut {
        label: "Time Management",
        query: "how to manage time between school, work, and side projects",
        category: "Time management",
    },
];

pub const TEEN_QUICK_ACTIONS: [Shortcut; 3] = [
    Shortcut {
        label: "Find CS side-project ideas",
        query: "what are some simple project ideas to learn javascript",
        category: "Side projects",
    },
    Shortcut {
        label: "Check your sleep basics",
        query: "how much sleep does a 17 year old need for good health",
        category: "Sleep",
    },
    Shortcut {
        label: "Reduce distractions plan",
        query: "tips for staying off social media during homework",
        category: "Distractions",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElderHistoryEntry {
    pub question: String,
    pub title: String,
    pub url: String,
}

/// Simplified view: the current answer plus the last few questions.
#[derive(Debug, Clone, Default)]
pub struct ElderView {
    current: Option<Answer>,
    last_question: Option<String>,
    history: VecDeque<ElderHistoryEntry>,
}

impl ElderView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.current = None;
    }

    pub fn record_success(&mut self, question: &str, answer: Answer) {
        let question = question.trim().to_string();
        self.history.push_front(ElderHistoryEntry {
            question: question.clone(),
            title: answer.title.clone(),
            url: answer.url.clone(),
        });
        self.history.truncate(ELDER_HISTORY_LIMIT);
        self.last_question = Some(question);
        self.current = Some(answer);
    }

    pub fn record_failure(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Answer> {
        self.current.as_ref()
    }

    pub fn last_question(&self) -> Option<&str> {
        self.last_question.as_deref()
    }

    /// Newest first.
    pub fn history(&self) -> impl Iterator<Item = &ElderHistoryEntry> {
        self.history.iter()
    }

    pub fn answers_this_session(&self) -> usize {
        self.history.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchKind {
    Manual,
    QuickTopic,
    QuickAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCounts {
    pub manual: u32,
    pub quick_topic: u32,
    pub quick_action: u32,
}

impl KindCounts {
    fn bump(&mut self, kind: SearchKind) {
        match kind {
            SearchKind::Manual => self.manual += 1,
            SearchKind::QuickTopic => self.quick_topic += 1,
            SearchKind::QuickAction => self.quick_action += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.manual + self.quick_topic + self.quick_action
    }
}

/// Dashboard view: the current answer plus session activity counters.
#[derive(Debug, Clone)]
pub struct TeenSession {
    started_at: DateTime<Utc>,
    current: Option<Answer>,
    search_count: u32,
    kind_counts: KindCounts,
    // Insertion order, so ties in `top_category` go to the earliest.
    category_counts: Vec<(String, u32)>,
    last_topic: Option<String>,
    search_timestamps: Vec<DateTime<Utc>>,
}

impl TeenSession {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            current: None,
            search_count: 0,
            kind_counts: KindCounts::default(),
            category_counts: Vec::new(),
            last_topic: None,
            search_timestamps: Vec::new(),
        }
    }

    pub fn begin(&mut self) {
        self.current = None;
    }

    pub fn record_success(
        &mut self,
        topic: &str,
        kind: SearchKind,
        category: &str,
        answer: Answer,
        at: DateTime<Utc>,
    ) {
        self.search_count += 1;
        self.kind_counts.bump(kind);
        match self.category_counts.iter_mut().find(|(name, _)| name == category) {
            Some((_, count)) => *count += 1,
            None => self.category_counts.push((category.to_string(), 1)),
        }
        self.last_topic = Some(topic.trim().to_string());
        self.search_timestamps.push(at);
        self.current = Some(answer);
    }

    pub fn record_failure(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Answer> {
        self.current.as_ref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn search_count(&self) -> u32 {
        self.search_count
    }

    pub fn kind_counts(&self) -> KindCounts {
        self.kind_counts
    }

    pub fn category_counts(&self) -> &[(String, u32)] {
        &self.category_counts
    }

    pub fn last_topic(&self) -> Option<&str> {
        self.last_topic.as_deref()
    }

    pub fn search_timestamps(&self) -> &[DateTime<Utc>] {
        &self.search_timestamps
    }

    pub fn top_category(&self) -> Option<&str> {
        let mut best: Option<&(String, u32)> = None;
        for entry in &self.category_counts {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn answer(n: u32) -> Answer {
        Answer {
            title: format!("Title {n}"),
            summary: "Short.".to_string(),
            url: format!("https://example.gov/{n}"),
        }
    }

    #[test]
    fn elder_history_keeps_three_newest_first() {
        let mut view = ElderView::new();
        for n in 1..=5 {
            view.begin();
            view.record_success(&format!(" question {n} "), answer(n));
        }
        let questions: Vec<_> = view.history().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["question 5", "question 4", "question 3"]);
        assert_eq!(view.current().map(|a| a.title.as_str()), Some("Title 5"));
        assert_eq!(view.last_question(), Some("question 5"));
    }

    #[test]
    fn elder_failure_clears_result_but_keeps_history() {
        let mut view = ElderView::new();
        view.record_success("q", answer(1));
        view.begin();
        assert!(view.current().is_none());
        view.record_failure();
        assert!(view.current().is_none());
        assert_eq!(view.answers_this_session(), 1);
    }

    #[test]
    fn teen_counters_move_only_on_success() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut session = TeenSession::new(t0);

        session.begin();
        session.record_failure();
        assert_eq!(session.search_count(), 0);
        assert_eq!(session.kind_counts().total(), 0);

        session.record_success("sleep", SearchKind::QuickAction, "Sleep", answer(1), t0);
        session.record_success("study", SearchKind::QuickTopic, "Study routine", answer(2), t0);
        session.record_success("more sleep", SearchKind::Manual, "Sleep", answer(3), t0);

        assert_eq!(session.search_count(), 3);
        assert_eq!(
            session.kind_counts(),
            KindCounts {
                manual: 1,
                quick_topic: 1,
                quick_action: 1
            }
        );
        assert_eq!(session.top_category(), Some("Sleep"));
        assert_eq!(session.last_topic(), Some("more sleep"));
        assert_eq!(session.search_timestamps().len(), 3);
    }

    #[test]
    fn top_category_tie_goes_to_first_seen() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut session = TeenSession::new(t0);
        assert_eq!(session.top_category(), None);
        session.record_success("a", SearchKind::Manual, "A", answer(1), t0);
        session.record_success("b", SearchKind::Manual, "B", answer(2), t0);
        assert_eq!(session.top_category(), Some("A"));
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Teen".parse::<Mode>().unwrap(), Mode::Teen);
        assert_eq!(Mode::Elder.to_string(), "elder");
        assert!("adult".parse::<Mode>().is_err());
    }
}
