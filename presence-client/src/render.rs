use crate::api::Answer;
use crate::view::{
    ELDER_SUGGESTIONS, ElderView, Mode, TEEN_QUICK_ACTIONS, TEEN_QUICK_TOPICS, TeenSession,
};
use std::fmt::Write;
use textwrap::{Options, fill};

pub const DEFAULT_WIDTH: usize = 72;

fn para(out: &mut String, text: &str, width: usize, indent: &str) {
    let opts = Options::new(width.max(20))
        .initial_indent(indent)
        .subsequent_indent(indent);
    out.push_str(&fill(text, opts));
    out.push('\n');
}

/// Large-print style: blank lines between parts, source spelled out.
pub fn elder_answer(answer: &Answer, width: usize) -> String {
    let mut out = String::new();
    para(&mut out, &answer.title, width, "");
    out.push('\n');
    para(&mut out, &answer.summary, width, "  ");
    out.push('\n');
    para(&mut out, &format!("Source: {}", answer.url), width, "");
    out
}

/// Compact answer with the last topic.
pub fn teen_answer(answer: &Answer, session: &TeenSession, width: usize) -> String {
    let mut out = String::new();
    para(&mut out, &format!("# {}", answer.title), width, "");
    para(&mut out, &answer.summary, width, "");
    let _ = writeln!(out, "-> {}", answer.url);
    if let Some(topic) = session.last_topic() {
        let _ = writeln!(out, "(topic: {topic})");
    }
    out
}

pub fn elder_history(view: &ElderView, width: usize) -> String {
    let mut out = String::new();
    if view.answers_this_session() == 0 {
        out.push_str("No questions yet.\n");
        return out;
    }
    for (i, entry) in view.history().enumerate() {
        para(
            &mut out,
            &format!("{}. {} ({})", i + 1, entry.question, entry.title),
            width,
            "",
        );
    }
    out
}

pub fn teen_stats(session: &TeenSession) -> String {
    let kinds = session.kind_counts();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Session started {}",
        session.started_at().format("%H:%M UTC")
    );
    let _ = writeln!(out, "Searches: {}", session.search_count());
    let _ = writeln!(
        out,
        "  typed {} / quick topics {} / quick actions {}",
        kinds.manual, kinds.quick_topic, kinds.quick_action
    );
    if let Some(top) = session.top_category() {
        let _ = writeln!(out, "Top category: {top}");
    }
    for (name, count) in session.category_counts() {
        let _ = writeln!(out, "  {name}: {count}");
    }
    out
}

pub fn help(mode: Mode) -> String {
    let mut out = String::from("Type a question, or pick a shortcut:\n");
    match mode {
        Mode::Elder => {
            for (i, s) in ELDER_SUGGESTIONS.iter().enumerate() {
                let _ = writeln!(out, "  {}  {}", i + 1, s.label);
            }
        }
        Mode::Teen => {
            for (i, s) in TEEN_QUICK_TOPICS.iter().enumerate() {
                let _ = writeln!(out, "  t{}  {}", i + 1, s.label);
            }
            for (i, s) in TEEN_QUICK_ACTIONS.iter().enumerate() {
                let _ = writeln!(out, "  a{}  {}", i + 1, s.label);
            }
        }
    }
    out.push_str("Commands: /today /history /stats /help /quit\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn answer() -> Answer {
        Answer {
            title: "Flu shots".into(),
            summary: "Flu shots are free for people over 65. Ask your pharmacy or clinic. It only takes a few minutes.".into(),
            url: "https://www.cdc.gov/flu".into(),
        }
    }

    #[test]
    fn elder_answer_wraps_summary() {
        let text = elder_answer(&answer(), 40);
        assert!(text.starts_with("Flu shots\n"));
        assert!(text.contains("Source: https://www.cdc.gov/flu"));
        assert!(text.lines().all(|l| l.chars().count() <= 40));
        assert!(text.lines().filter(|l| l.starts_with("  ")).count() > 1);
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(elder_history(&ElderView::new(), 40), "No questions yet.\n");
    }

    #[test]
    fn help_lists_teen_shortcuts() {
        let text = help(Mode::Teen);
        assert!(text.contains("t4  Time Management"));
        assert!(text.contains("a3  Reduce distractions plan"));
    }

    #[test]
    fn stats_show_counts() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap();
        let mut s = TeenSession::new(start);
        s.record_success("x", crate::view::SearchKind::QuickTopic, "Sleep", answer(), Utc::now());
        let text = teen_stats(&s);
        assert!(text.starts_with("Session started 09:30 UTC\n"));
        assert!(text.contains("Searches: 1"));
        assert!(text.contains("Top category: Sleep"));
    }
}
