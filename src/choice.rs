use rand::seq::SliceRandom;
use rand::Rng;

use crate::content::VocabularyItem;
use crate::normalize::normalize;

pub const MAX_OPTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Show the English word, pick its meaning.
    WordToMeaning,
    /// Show the meaning, pick the English word.
    MeaningToWord,
}

impl Direction {
    fn prompt(self, item: &VocabularyItem) -> &str {
        match self {
            Direction::WordToMeaning => &item.word,
            Direction::MeaningToWord => &item.meaning,
        }
    }

    fn option(self, item: &VocabularyItem) -> &str {
        match self {
            Direction::WordToMeaning => &item.meaning,
            Direction::MeaningToWord => item.headword(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChoiceQuestion<'a> {
    pub item: &'a VocabularyItem,
    pub prompt: &'a str,
    pub options: Vec<&'a str>,
    pub answer: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answered {
    pub correct: bool,
    pub answer_index: usize,
}

/// Multiple-choice quiz over a pool of words. Distractors come from the same pool.
#[derive(Debug, Clone)]
pub struct ChoiceQuiz<'a> {
    questions: Vec<ChoiceQuestion<'a>>,
    position: usize,
    answered: Option<Answered>,
    correct: usize,
    total_answered: usize,
}

impl<'a> ChoiceQuiz<'a> {
    pub fn new<R: Rng + ?Sized>(pool: &[&'a VocabularyItem], direction: Direction, rng: &mut R) -> Self {
        let mut order = pool.to_vec();
        order.shuffle(rng);

        let questions = order
            .into_iter()
            .map(|item| build_question(item, pool, direction, rng))
            .collect();

        Self::from_questions(questions)
    }

    /// Up to `length` words drawn from the pool, each asked in a random direction.
    pub fn mixed<R: Rng + ?Sized>(pool: &[&'a VocabularyItem], length: usize, rng: &mut R) -> Self {
        let picked: Vec<&'a VocabularyItem> = pool.choose_multiple(rng, length).copied().collect();

        let questions = picked
            .into_iter()
            .map(|item| {
                let direction = if rng.gen_bool(0.5) {
                    Direction::WordToMeaning
                } else {
                    Direction::MeaningToWord
                };
                build_question(item, pool, direction, rng)
            })
            .collect();

        Self::from_questions(questions)
    }

    fn from_questions(questions: Vec<ChoiceQuestion<'a>>) -> Self {
        Self {
            questions,
            position: 0,
            answered: None,
            correct: 0,
            total_answered: 0,
        }
    }

    pub fn current(&self) -> Option<&ChoiceQuestion<'a>> {
        self.questions.get(self.position)
    }

    /// Grades the chosen option. A question is graded once; repeat calls
    /// return the first result.
    pub fn answer(&mut self, choice: usize) -> Option<Answered> {
        if let Some(done) = self.answered {
            return Some(done);
        }
        let question = self.questions.get(self.position)?;
        let result = Answered {
            correct: choice == question.answer,
            answer_index: question.answer,
        };
        self.total_answered += 1;
        if result.correct {
            self.correct += 1;
        }
        self.answered = Some(result);
        Some(result)
    }

    /// Moves to the next question. Returns `false` once the quiz is over.
    pub fn next(&mut self) -> bool {
        if self.position < self.questions.len() {
            self.position += 1;
        }
        self.answered = None;
        self.position < self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.questions.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// `(correct, answered)`
    pub fn score(&self) -> (usize, usize) {
        (self.correct, self.total_answered)
    }
}

fn build_question<'a, R: Rng + ?Sized>(
    item: &'a VocabularyItem,
    pool: &[&'a VocabularyItem],
    direction: Direction,
    rng: &mut R,
) -> ChoiceQuestion<'a> {
    let right = direction.option(item);
    let mut taken = vec![normalize(right)];

    let mut others: Vec<&'a VocabularyItem> = pool.iter().copied().filter(|o| o.id != item.id).collect();
    others.shuffle(rng);

    let mut options = vec![right];
    for other in others {
        if options.len() == MAX_OPTIONS {
            break;
        }
        let text = direction.option(other);
        let key = normalize(text);
        if taken.contains(&key) {
            continue;
        }
        taken.push(key);
        options.push(text);
    }
    options.shuffle(rng);

    let answer = options.iter().position(|o| *o == right).unwrap_or(0);
    ChoiceQuestion {
        item,
        prompt: direction.prompt(item),
        options,
        answer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words() -> Vec<VocabularyItem> {
        vec![
            VocabularyItem::new(1, "landfill (n)", "bãi rác"),
            VocabularyItem::new(2, "recycle (v)", "tái chế"),
            VocabularyItem::new(3, "reuse (v)", "tái sử dụng"),
            VocabularyItem::new(4, "waste (n)", "rác thải"),
            VocabularyItem::new(5, "pollution (n)", "sự ô nhiễm"),
            VocabularyItem::new(6, "rubbish (n)", "rác thải"),
        ]
    }

    #[test]
    fn test_question_shape() {
        let list = words();
        let pool: Vec<&VocabularyItem> = list.iter().collect();
        let quiz = ChoiceQuiz::new(&pool, Direction::WordToMeaning, &mut StdRng::seed_from_u64(1));
        assert_eq!(quiz.len(), 6);

        for question in &quiz.questions {
            assert_eq!(question.options.len(), MAX_OPTIONS);
            assert_eq!(question.options[question.answer], question.item.meaning);
            assert_eq!(question.prompt, question.item.word);

            let mut keys: Vec<String> = question.options.iter().map(|o| normalize(o)).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), MAX_OPTIONS, "duplicate option in {:?}", question.options);
        }
    }

    #[test]
    fn test_meaning_to_word_uses_headwords() {
        let list = words();
        let pool: Vec<&VocabularyItem> = list.iter().collect();
        let quiz = ChoiceQuiz::new(&pool, Direction::MeaningToWord, &mut StdRng::seed_from_u64(2));
        let question = quiz.current().unwrap();
        assert_eq!(question.options[question.answer], question.item.headword());
        assert!(question.options.iter().all(|o| !o.contains('(')));
    }

    #[test]
    fn test_scoring() {
        let list = words();
        let pool: Vec<&VocabularyItem> = list.iter().collect();
        let mut quiz = ChoiceQuiz::new(&pool, Direction::WordToMeaning, &mut StdRng::seed_from_u64(5));

        let right = quiz.current().unwrap().answer;
        assert!(quiz.answer(right).unwrap().correct);
        // graded once
        assert!(quiz.answer(right + 1).unwrap().correct);
        assert!(quiz.next());

        let wrong = (quiz.current().unwrap().answer + 1) % MAX_OPTIONS;
        let result = quiz.answer(wrong).unwrap();
        assert!(!result.correct);
        assert_eq!(quiz.score(), (1, 2));

        while quiz.next() {}
        assert!(quiz.is_finished());
        assert!(quiz.answer(0).is_none());
    }

    #[test]
    fn test_mixed_draws_distinct_words() {
        let list = words();
        let pool: Vec<&VocabularyItem> = list.iter().collect();
        let quiz = ChoiceQuiz::mixed(&pool, 4, &mut StdRng::seed_from_u64(8));
        assert_eq!(quiz.len(), 4);

        let mut ids: Vec<u32> = quiz.questions.iter().map(|q| q.item.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);

        for question in &quiz.questions {
            let right = question.options[question.answer];
            assert!(right == question.item.meaning || right == question.item.headword());
        }

        let all = ChoiceQuiz::mixed(&pool, 50, &mut StdRng::seed_from_u64(8));
        assert_eq!(all.len(), pool.len());
    }

    #[test]
    fn test_single_item_pool() {
        let list = words();
        let pool = vec![&list[0]];
        let mut quiz = ChoiceQuiz::new(&pool, Direction::WordToMeaning, &mut StdRng::seed_from_u64(9));
        assert_eq!(quiz.current().unwrap().options, vec!["bãi rác"]);
        assert!(quiz.answer(0).unwrap().correct);
        assert!(!quiz.next());
    }
}
