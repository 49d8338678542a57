use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use std::collections::VecDeque;

use crate::content::VocabularyItem;
use crate::error::SessionError;
use crate::normalize::answers_match;

pub const DEFAULT_ROUND_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for an answer to the head word.
    Input,
    /// Head word answered correctly; waiting for `advance`.
    CorrectFeedback,
    /// Head word was missed; waiting for it to be retyped.
    ForcedRewrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Correct,
    Incorrect,
    /// Retyped after a miss and moved to the back of the queue.
    Requeued,
    /// Retype did not match; nothing moved.
    TryAgain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    NextItem,
    NextRound,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based.
    pub round: usize,
    pub rounds: usize,
    pub remaining: usize,
    pub round_len: usize,
    pub phase: Phase,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy)]
struct Slot<'a> {
    item: &'a VocabularyItem,
    missed: bool,
}

impl<'a> Slot<'a> {
    fn new(item: &'a VocabularyItem) -> Self {
        Self { item, missed: false }
    }
}

/// Typed-recall quiz: the learner sees a meaning and types the English word.
///
/// The list is shuffled once and cut into rounds. Each round keeps a queue of
/// words still owed. A word answered right leaves the queue on
/// [`advance`](Self::advance); a missed word must be retyped, then goes to the
/// back of the same queue and comes around again. A round ends when its queue
/// is empty.
#[derive(Debug, Clone)]
pub struct RecallSession<'a> {
    source: Vec<&'a VocabularyItem>,
    round_size: usize,
    rounds: Vec<Vec<&'a VocabularyItem>>,
    round: usize,
    queue: VecDeque<Slot<'a>>,
    phase: Phase,
    input: String,
    complete: bool,
    first_try_correct: usize,
    misses: usize,
}

impl<'a> RecallSession<'a> {
    pub fn start<I>(items: I, round_size: usize) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = &'a VocabularyItem>,
    {
        Self::start_with_rng(items, round_size, &mut thread_rng())
    }

    pub fn start_with_rng<I, R>(items: I, round_size: usize, rng: &mut R) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = &'a VocabularyItem>,
        R: Rng + ?Sized,
    {
        if round_size == 0 {
            return Err(SessionError::InvalidRoundSize);
        }

        let source: Vec<&'a VocabularyItem> = items.into_iter().collect();
        let mut shuffled = source.clone();
        shuffled.shuffle(rng);

        let rounds: Vec<Vec<&'a VocabularyItem>> =
            shuffled.chunks(round_size).map(|chunk| chunk.to_vec()).collect();
        let queue = rounds
            .first()
            .map(|first| first.iter().copied().map(Slot::new).collect())
            .unwrap_or_default();
        let complete = rounds.is_empty();

        tracing::info!(
            items = source.len(),
            rounds = rounds.len(),
            round_size,
            "recall session started"
        );

        Ok(Self {
            source,
            round_size,
            rounds,
            round: 0,
            queue,
            phase: Phase::Input,
            input: String::new(),
            complete,
            first_try_correct: 0,
            misses: 0,
        })
    }

    /// Reshuffles the original list and starts over.
    pub fn restart(&mut self) {
        self.restart_with_rng(&mut thread_rng());
    }

    pub fn restart_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let source = std::mem::take(&mut self.source);
        // round_size was validated when the session was created
        if let Ok(session) = Self::start_with_rng(source, self.round_size, rng) {
            *self = session;
        }
    }

    pub fn submit(&mut self, raw: &str) -> Result<Submission, SessionError> {
        if self.complete {
            return Err(SessionError::Complete);
        }
        let retyping = match self.phase {
            Phase::CorrectFeedback => {
                return Err(SessionError::InvalidTransition {
                    action: "submit an answer",
                    phase: self.phase,
                })
            }
            Phase::Input => false,
            Phase::ForcedRewrite => true,
        };
        let head = match self.queue.front() {
            Some(slot) => *slot,
            None => return Err(SessionError::Complete),
        };

        self.input = raw.to_string();
        let matched = answers_match(raw, &head.item.word);

        let outcome = match (retyping, matched) {
            (false, true) => {
                self.phase = Phase::CorrectFeedback;
                if !head.missed {
                    self.first_try_correct += 1;
                }
                Submission::Correct
            }
            (false, false) => {
                tracing::debug!(id = head.item.id, "missed, retype required");
                self.phase = Phase::ForcedRewrite;
                self.misses += 1;
                if let Some(slot) = self.queue.front_mut() {
                    slot.missed = true;
                }
                self.input.clear();
                Submission::Incorrect
            }
            (true, true) => {
                self.queue.rotate_left(1);
                tracing::debug!(id = head.item.id, remaining = self.queue.len(), "requeued");
                self.phase = Phase::Input;
                self.input.clear();
                Submission::Requeued
            }
            (true, false) => Submission::TryAgain,
        };
        Ok(outcome)
    }

    pub fn advance(&mut self) -> Result<Advanced, SessionError> {
        if self.complete {
            return Err(SessionError::Complete);
        }
        if self.phase != Phase::CorrectFeedback {
            return Err(SessionError::InvalidTransition {
                action: "advance",
                phase: self.phase,
            });
        }

        self.queue.pop_front();
        self.phase = Phase::Input;
        self.input.clear();

        if !self.queue.is_empty() {
            return Ok(Advanced::NextItem);
        }

        if self.round + 1 < self.rounds.len() {
            self.round += 1;
            self.queue = self.rounds[self.round].iter().copied().map(Slot::new).collect();
            tracing::info!(round = self.round + 1, of = self.rounds.len(), "next round");
            Ok(Advanced::NextRound)
        } else {
            self.complete = true;
            tracing::info!(
                first_try_correct = self.first_try_correct,
                misses = self.misses,
                "recall session complete"
            );
            Ok(Advanced::Finished)
        }
    }

    pub fn current(&self) -> Option<&'a VocabularyItem> {
        if self.complete {
            return None;
        }
        self.queue.front().map(|slot| slot.item)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn round_index(&self) -> usize {
        self.round
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn round_size(&self) -> usize {
        self.round_size
    }

    pub fn rounds(&self) -> &[Vec<&'a VocabularyItem>] {
        &self.rounds
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> impl Iterator<Item = &'a VocabularyItem> + '_ {
        self.queue.iter().map(|slot| slot.item)
    }

    /// Words answered correctly without ever being missed.
    pub fn first_try_correct(&self) -> usize {
        self.first_try_correct
    }

    /// Wrong first answers, counting a word again each time it is missed.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn progress(&self) -> Progress {
        Progress {
            round: self.round,
            rounds: self.rounds.len(),
            remaining: self.queue.len(),
            round_len: self.rounds.get(self.round).map_or(0, Vec::len),
            phase: self.phase,
            complete: self.complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn items(words: &[&str]) -> Vec<VocabularyItem> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| VocabularyItem::new(i as u32 + 1, w, &format!("meaning of {w}")))
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn answer_current(session: &mut RecallSession) -> Advanced {
        let word = session.current().unwrap().word.clone();
        assert_eq!(session.submit(&word).unwrap(), Submission::Correct);
        session.advance().unwrap()
    }

    #[test]
    fn test_rounds_are_a_partition() {
        let words: Vec<String> = (0..25).map(|i| format!("word{i}")).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let list = items(&refs);
        let session = RecallSession::start_with_rng(&list, 10, &mut rng()).unwrap();

        let sizes: Vec<usize> = session.rounds().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);

        let mut ids: Vec<u32> = session.rounds().iter().flatten().map(|i| i.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=25).collect::<Vec<_>>());
        assert_eq!(session.remaining(), 10);
        assert_eq!(session.phase(), Phase::Input);
    }

    #[test]
    fn test_empty_list_completes_immediately() {
        let session = RecallSession::start(std::iter::empty::<&VocabularyItem>(), 10).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.round_count(), 0);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_zero_round_size_is_rejected() {
        let list = items(&["cat"]);
        assert_eq!(
            RecallSession::start(&list, 0).unwrap_err(),
            SessionError::InvalidRoundSize
        );
    }

    #[test]
    fn test_three_words_one_round() {
        let list = items(&["cat", "dog", "bird"]);
        let mut session = RecallSession::start_with_rng(&list, DEFAULT_ROUND_SIZE, &mut rng()).unwrap();
        assert_eq!(session.round_count(), 1);

        assert_eq!(answer_current(&mut session), Advanced::NextItem);
        assert_eq!(session.remaining(), 2);
        assert_eq!(answer_current(&mut session), Advanced::NextItem);
        assert_eq!(answer_current(&mut session), Advanced::Finished);
        assert!(session.is_complete());
        assert_eq!(session.first_try_correct(), 3);
    }

    #[test]
    fn test_tagged_headword_matches_loose_input() {
        let list = items(&["recycle (v)"]);
        let mut session = RecallSession::start(&list, 10).unwrap();
        assert_eq!(session.submit("Recycle!").unwrap(), Submission::Correct);
        assert_eq!(session.phase(), Phase::CorrectFeedback);
        assert_eq!(session.current().unwrap().id, 1);
    }

    #[test]
    fn test_miss_then_retype_moves_to_tail() {
        let list = items(&["waste (n)", "landfill (n)", "reuse (v)"]);
        let mut session = RecallSession::start_with_rng(&list, 10, &mut rng()).unwrap();
        let head = session.current().unwrap();

        assert_eq!(session.submit("wasted").unwrap(), Submission::Incorrect);
        assert_eq!(session.phase(), Phase::ForcedRewrite);
        assert_eq!(session.input(), "");
        assert_eq!(session.current().unwrap().id, head.id);

        assert_eq!(session.submit(head.headword()).unwrap(), Submission::Requeued);
        assert_eq!(session.phase(), Phase::Input);
        assert_eq!(session.remaining(), 3);
        assert_ne!(session.current().unwrap().id, head.id);
        assert_eq!(session.queue().last().unwrap().id, head.id);
        assert_eq!(session.misses(), 1);
    }

    #[test]
    fn test_failed_retype_changes_nothing() {
        let list = items(&["waste (n)", "landfill (n)"]);
        let mut session = RecallSession::start_with_rng(&list, 10, &mut rng()).unwrap();
        let head = session.current().unwrap().id;
        session.submit("nope").unwrap();

        for attempt in ["still wrong", "", "wast"] {
            assert_eq!(session.submit(attempt).unwrap(), Submission::TryAgain);
            assert_eq!(session.phase(), Phase::ForcedRewrite);
            assert_eq!(session.current().unwrap().id, head);
            assert_eq!(session.remaining(), 2);
        }
        assert_eq!(session.input(), "wast");
        assert_eq!(session.advance().unwrap_err(), SessionError::InvalidTransition {
            action: "advance",
            phase: Phase::ForcedRewrite,
        });
    }

    #[test]
    fn test_requeued_item_must_be_recalled_again() {
        let list = items(&["waste"]);
        let mut session = RecallSession::start(&list, 10).unwrap();

        assert_eq!(session.submit("west").unwrap(), Submission::Incorrect);
        assert_eq!(session.submit("waste").unwrap(), Submission::Requeued);
        assert!(!session.is_complete());
        assert_eq!(session.current().unwrap().id, 1);

        assert_eq!(session.submit("waste").unwrap(), Submission::Correct);
        assert_eq!(session.advance().unwrap(), Advanced::Finished);
        assert!(session.is_complete());
    }

    #[test]
    fn test_requeued_word_does_not_count_as_first_try() {
        let list = items(&["waste", "reuse"]);
        let mut session = RecallSession::start_with_rng(&list, 10, &mut rng()).unwrap();
        let missed = session.current().unwrap().word.clone();
        session.submit("nope").unwrap();
        session.submit(&missed).unwrap();

        answer_current(&mut session);
        assert_eq!(session.current().unwrap().word, missed);
        assert_eq!(answer_current(&mut session), Advanced::Finished);
        assert_eq!(session.first_try_correct(), 1);
        assert_eq!(session.misses(), 1);
    }

    #[test]
    fn test_shared_ids_keep_separate_first_try_status() {
        let list = vec![VocabularyItem::new(1, "cat", "con mèo"), VocabularyItem::new(1, "dog", "con chó")];
        let mut session = RecallSession::start_with_rng(&list, 10, &mut rng()).unwrap();

        let missed = session.current().unwrap().word.clone();
        assert_eq!(session.submit("nope").unwrap(), Submission::Incorrect);
        assert_eq!(session.submit(&missed).unwrap(), Submission::Requeued);

        assert_ne!(session.current().unwrap().word, missed);
        answer_current(&mut session);
        assert_eq!(session.first_try_correct(), 1);

        answer_current(&mut session);
        assert_eq!(session.first_try_correct(), 1);
        assert_eq!(session.misses(), 1);
        assert!(session.is_complete());
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let list = items(&["cat", "dog"]);
        let mut session = RecallSession::start(&list, 10).unwrap();

        assert!(matches!(
            session.advance(),
            Err(SessionError::InvalidTransition { phase: Phase::Input, .. })
        ));

        let word = session.current().unwrap().word.clone();
        session.submit(&word).unwrap();
        let before = session.progress();
        assert!(matches!(
            session.submit(&word),
            Err(SessionError::InvalidTransition { phase: Phase::CorrectFeedback, .. })
        ));
        assert_eq!(session.progress(), before);

        session.advance().unwrap();
        answer_current(&mut session);
        assert_eq!(session.submit("cat"), Err(SessionError::Complete));
        assert_eq!(session.advance(), Err(SessionError::Complete));
    }

    #[test]
    fn test_rounds_drain_in_order() {
        let list = items(&["a", "b", "c", "d", "e"]);
        let mut session = RecallSession::start_with_rng(&list, 2, &mut rng()).unwrap();
        let expected: Vec<Vec<u32>> = session
            .rounds()
            .iter()
            .map(|r| r.iter().map(|i| i.id).collect())
            .collect();

        let mut seen: Vec<Vec<u32>> = vec![Vec::new(); expected.len()];
        loop {
            let round = session.round_index();
            let before = session.remaining();
            seen[round].push(session.current().unwrap().id);
            let step = answer_current(&mut session);
            match step {
                Advanced::NextItem => assert_eq!(session.remaining(), before - 1),
                Advanced::NextRound => assert_eq!(session.round_index(), round + 1),
                Advanced::Finished => break,
            }
        }
        assert_eq!(seen, expected);
        assert!(session.is_complete());
    }

    #[test]
    fn test_restart_reshuffles_everything() {
        let list = items(&["a", "b", "c", "d", "e", "f"]);
        let mut session = RecallSession::start_with_rng(&list, 4, &mut rng()).unwrap();
        session.submit("zzz").unwrap();

        session.restart_with_rng(&mut StdRng::seed_from_u64(99));
        assert_eq!(session.phase(), Phase::Input);
        assert_eq!(session.round_index(), 0);
        assert_eq!(session.round_count(), 2);
        assert_eq!(session.misses(), 0);
        assert_eq!(session.rounds().iter().flatten().count(), 6);
    }

    #[test]
    fn test_shuffle_is_roughly_uniform() {
        let list = items(&["a", "b", "c"]);
        let mut rng = rng();
        let mut firsts = [0usize; 3];
        for _ in 0..3000 {
            let session = RecallSession::start_with_rng(&list, 10, &mut rng).unwrap();
            firsts[session.current().unwrap().id as usize - 1] += 1;
        }
        for count in firsts {
            assert!((800..1200).contains(&count), "skewed first position: {firsts:?}");
        }
    }
}
