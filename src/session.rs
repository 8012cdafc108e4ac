use itertools::{EitherOrBoth, Itertools};
use std::time::SystemTime;
use tracing::info;

use crate::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum CompletionReason {
    #[strum(serialize = "matched")]
    Matched,
    #[strum(serialize = "time up")]
    TimeUp,
}

/// How a single target position should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Incorrect,
    Next,
    Pending,
}

/// One run of the typing test: a target sentence, what has been typed
/// against it, and the countdown it is racing.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    target: String,
    target_len: usize,
    typed: String,
    started_at: Option<SystemTime>,
    completed_at: Option<SystemTime>,
    duration_secs: u32,
    remaining_secs: u32,
    completion: Option<CompletionReason>,
    accuracy: u32,
}

impl Session {
    pub fn new(target: String, duration_secs: u32) -> Self {
        let target_len = target.chars().count();
        Self {
            target,
            target_len,
            typed: String::new(),
            started_at: None,
            completed_at: None,
            duration_secs,
            remaining_secs: duration_secs,
            completion: None,
            accuracy: 0,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<SystemTime> {
        self.completed_at
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn completion(&self) -> Option<CompletionReason> {
        self.completion
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_some()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn phase(&self) -> Phase {
        match (self.has_started(), self.is_completed()) {
            (_, true) => Phase::Completed,
            (true, false) => Phase::Running,
            (false, false) => Phase::NotStarted,
        }
    }

    pub fn submit_input(&mut self, text: &str) {
        self.submit_input_at(text, SystemTime::now());
    }

    /// Replace the typed text with the full current value of the input.
    ///
    /// Anything past the end of the target is dropped. Does nothing once the
    /// session has completed.
    pub fn submit_input_at(&mut self, text: &str, now: SystemTime) {
        if self.is_completed() {
            return;
        }

        let text: String = text.chars().take(self.target_len).collect();

        if self.started_at.is_none() && !text.is_empty() {
            self.started_at = Some(now);
            info!(
                target_chars = self.target_len,
                duration_secs = self.duration_secs,
                "session started"
            );
        }

        self.typed = text;

        if self.typed == self.target {
            self.complete_at(CompletionReason::Matched, now);
        }
    }

    pub fn write(&mut self, c: char) {
        let mut text = self.typed.clone();
        text.push(c);
        self.submit_input(&text);
    }

    pub fn backspace(&mut self) {
        let mut text = self.typed.clone();
        if text.pop().is_some() {
            self.submit_input(&text);
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(SystemTime::now());
    }

    /// One second of the countdown has passed.
    pub fn tick_at(&mut self, now: SystemTime) {
        if self.is_completed() {
            return;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.complete_at(CompletionReason::TimeUp, now);
        }
    }

    /// Returns true only for the call that actually completed the session.
    pub fn complete_at(&mut self, reason: CompletionReason, now: SystemTime) -> bool {
        if self.is_completed() {
            return false;
        }

        self.completed_at = Some(now);
        self.accuracy = self.compute_accuracy();
        self.completion = Some(reason);

        info!(
            reason = %reason,
            wpm = self.speed(),
            accuracy = self.accuracy,
            "session completed"
        );

        true
    }

    /// Accuracy captured when the session completed, 0 before that.
    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    pub fn compute_accuracy(&self) -> u32 {
        metrics::accuracy(&self.typed, &self.target)
    }

    /// Words per minute over the completed session.
    pub fn speed(&self) -> u32 {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => metrics::words_per_minute(
                &self.typed,
                end.duration_since(start).unwrap_or_default(),
            ),
            _ => 0,
        }
    }

    pub fn mismatches(&self) -> Vec<usize> {
        self.typed
            .chars()
            .zip(self.target.chars())
            .enumerate()
            .filter(|(_, (t, e))| t != e)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn classify(&self) -> Vec<(char, CharClass)> {
        let mut next_marked = false;

        self.target
            .chars()
            .zip_longest(self.typed.chars())
            .filter_map(|pair| match pair {
                EitherOrBoth::Both(expected, typed) if expected == typed => {
                    Some((expected, CharClass::Correct))
                }
                EitherOrBoth::Both(expected, _) => Some((expected, CharClass::Incorrect)),
                EitherOrBoth::Left(expected) if !next_marked => {
                    next_marked = true;
                    Some((expected, CharClass::Next))
                }
                EitherOrBoth::Left(expected) => Some((expected, CharClass::Pending)),
                EitherOrBoth::Right(_) => None,
            })
            .collect()
    }

    /// Start over against a new target, keeping the configured duration.
    pub fn restart(&mut self, target: String) {
        info!("session restarted");
        *self = Session::new(target, self.duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
    }

    #[test]
    fn test_session_new() {
        let session = Session::new("hello world".to_string(), 300);

        assert_eq!(session.target(), "hello world");
        assert_eq!(session.typed(), "");
        assert_eq!(session.remaining_secs(), 300);
        assert_eq!(session.duration_secs(), 300);
        assert_eq!(session.started_at(), None);
        assert_eq!(session.completed_at(), None);
        assert_eq!(session.accuracy(), 0);
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(!session.is_completed());
    }

    #[test]
    fn test_first_character_starts_session() {
        let mut session = Session::new("abc".to_string(), 60);

        session.submit_input_at("a", at(1));
        assert_eq!(session.started_at(), Some(at(1)));
        assert_eq!(session.phase(), Phase::Running);

        session.submit_input_at("ab", at(2));
        assert_eq!(session.started_at(), Some(at(1)));
    }

    #[test]
    fn test_start_survives_clearing_input() {
        let mut session = Session::new("abc".to_string(), 60);

        session.submit_input_at("a", at(1));
        session.submit_input_at("", at(2));
        session.submit_input_at("a", at(3));

        assert_eq!(session.started_at(), Some(at(1)));
    }

    #[test]
    fn test_empty_submit_does_not_start() {
        let mut session = Session::new("abc".to_string(), 60);

        session.submit_input_at("", at(1));
        assert_eq!(session.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_mismatches() {
        let mut session = Session::new("abc".to_string(), 60);

        session.submit_input_at("abx", at(1));
        assert_eq!(session.mismatches(), vec![2]);

        session.submit_input_at("xbx", at(2));
        assert_eq!(session.mismatches(), vec![0, 2]);

        session.submit_input_at("", at(3));
        assert!(session.mismatches().is_empty());
    }

    #[test]
    fn test_exact_match_completes() {
        let mut session = Session::new("Hello, world!".to_string(), 300);

        session.submit_input_at("H", at(0));
        session.submit_input_at("Hello, world!", at(6));

        assert!(session.is_completed());
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.completion(), Some(CompletionReason::Matched));
        assert_eq!(session.accuracy(), 100);
        // 2 words in 6 seconds
        assert_eq!(session.speed(), 20);
        assert_eq!(session.remaining_secs(), 300);
    }

    #[test]
    fn test_partial_input_then_stop() {
        let mut session = Session::new("abc".to_string(), 60);

        session.submit_input_at("abx", at(1));
        assert!(!session.is_completed());

        assert!(session.complete_at(CompletionReason::TimeUp, at(2)));
        assert_eq!(session.accuracy(), 66);
    }

    #[test]
    fn test_input_is_clamped_to_target_length() {
        let mut session = Session::new("abc".to_string(), 60);

        session.submit_input_at("abxyz", at(1));
        assert_eq!(session.typed(), "abx");
        assert!(!session.is_completed());

        session.submit_input_at("abcd", at(2));
        assert_eq!(session.typed(), "abc");
        assert!(session.is_completed());
    }

    #[test]
    fn test_input_ignored_after_completion() {
        let mut session = Session::new("ab".to_string(), 60);

        session.submit_input_at("ab", at(1));
        session.submit_input_at("a", at(2));
        session.backspace();
        session.write('z');

        assert_eq!(session.typed(), "ab");
        assert_eq!(session.completed_at(), Some(at(1)));
    }

    #[test]
    fn test_write_and_backspace() {
        let mut session = Session::new("test".to_string(), 60);

        session.write('t');
        session.write('x');
        assert_eq!(session.typed(), "tx");
        assert_eq!(session.mismatches(), vec![1]);

        session.backspace();
        assert_eq!(session.typed(), "t");

        session.write('e');
        session.write('s');
        session.write('t');
        assert!(session.is_completed());
    }

    #[test]
    fn test_backspace_on_empty_input() {
        let mut session = Session::new("test".to_string(), 60);

        session.backspace();
        assert_eq!(session.typed(), "");
        assert_eq!(session.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_tick_counts_down() {
        let mut session = Session::new("test".to_string(), 3);
        session.submit_input_at("t", at(0));

        session.tick_at(at(1));
        assert_eq!(session.remaining_secs(), 2);
        session.tick_at(at(2));
        assert_eq!(session.remaining_secs(), 1);
        assert!(!session.is_completed());

        session.tick_at(at(3));
        assert_eq!(session.remaining_secs(), 0);
        assert_eq!(session.completion(), Some(CompletionReason::TimeUp));
        assert_eq!(session.completed_at(), Some(at(3)));
    }

    #[test]
    fn test_tick_after_completion_is_noop() {
        let mut session = Session::new("ab".to_string(), 10);
        session.submit_input_at("ab", at(1));

        session.tick_at(at(2));
        assert_eq!(session.remaining_secs(), 10);
        assert_eq!(session.completion(), Some(CompletionReason::Matched));
    }

    #[test]
    fn test_idle_timeout() {
        let mut session = Session::new("never typed".to_string(), 60);

        for sec in 1..=60 {
            session.tick_at(at(sec));
        }

        assert!(session.is_completed());
        assert_eq!(session.completion(), Some(CompletionReason::TimeUp));
        assert_eq!(session.accuracy(), 0);
        assert_eq!(session.speed(), 0);
    }

    #[test]
    fn test_remaining_is_monotonic() {
        let mut session = Session::new("abc".to_string(), 5);
        session.submit_input_at("a", at(0));

        let mut last = session.remaining_secs();
        for sec in 1..10 {
            session.tick_at(at(sec));
            assert!(session.remaining_secs() <= last);
            last = session.remaining_secs();
        }
        assert!(session.is_completed());
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut session = Session::new("abc".to_string(), 60);
        session.submit_input_at("ab", at(0));

        assert!(session.complete_at(CompletionReason::TimeUp, at(4)));
        assert!(!session.complete_at(CompletionReason::Matched, at(9)));

        assert_eq!(session.completed_at(), Some(at(4)));
        assert_matches!(session.completion(), Some(CompletionReason::TimeUp));
    }

    #[test]
    fn test_speed_before_completion() {
        let mut session = Session::new("abc def".to_string(), 60);
        assert_eq!(session.speed(), 0);

        session.submit_input_at("abc", at(0));
        assert_eq!(session.speed(), 0);
    }

    #[test]
    fn test_speed_zero_elapsed() {
        let mut session = Session::new("a".to_string(), 60);
        session.submit_input_at("a", at(0));

        assert!(session.is_completed());
        assert_eq!(session.speed(), 0);
    }

    #[test]
    fn test_classify() {
        let mut session = Session::new("abcd".to_string(), 60);
        session.submit_input_at("ax", at(0));

        assert_eq!(
            session.classify(),
            vec![
                ('a', CharClass::Correct),
                ('b', CharClass::Incorrect),
                ('c', CharClass::Next),
                ('d', CharClass::Pending),
            ]
        );
    }

    #[test]
    fn test_classify_untouched_and_finished() {
        let mut session = Session::new("ab".to_string(), 60);
        assert_eq!(
            session.classify(),
            vec![('a', CharClass::Next), ('b', CharClass::Pending)]
        );

        session.submit_input_at("ab", at(0));
        assert_eq!(
            session.classify(),
            vec![('a', CharClass::Correct), ('b', CharClass::Correct)]
        );
    }

    #[test]
    fn test_restart_matches_fresh_session() {
        let mut session = Session::new("abc".to_string(), 45);
        session.submit_input_at("ab", at(0));
        session.tick_at(at(1));
        session.complete_at(CompletionReason::TimeUp, at(2));

        session.restart("xyz".to_string());

        assert_eq!(session, Session::new("xyz".to_string(), 45));
        assert_eq!(session.phase(), Phase::NotStarted);
    }
}
