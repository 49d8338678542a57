use rand::Rng;

use crate::choice::ChoiceQuiz;
use crate::content::Part;

pub const DEFAULT_EXAM_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Excellent,
    Good,
    Pass,
    Retry,
}

impl Band {
    pub fn from_percent(percent: u32) -> Self {
        if percent >= 90 {
            Band::Excellent
        } else if percent >= 70 {
            Band::Good
        } else if percent >= 50 {
            Band::Pass
        } else {
            Band::Retry
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Excellent => "Excellent",
            Band::Good => "Good",
            Band::Pass => "Pass",
            Band::Retry => "Keep practising",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
    pub band: Band,
}

impl Report {
    /// Unanswered questions count as wrong.
    pub fn new(correct: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            (correct * 100 / total) as u32
        };
        Self {
            correct,
            total,
            percent,
            band: Band::from_percent(percent),
        }
    }
}

/// Mixed-direction multiple choice across every unit of a part.
pub fn for_part<'a, R: Rng + ?Sized>(part: &'a Part, length: usize, rng: &mut R) -> ChoiceQuiz<'a> {
    let pool = part.items();
    tracing::info!(part = %part.title, pool = pool.len(), length, "exam started");
    ChoiceQuiz::mixed(&pool, length, rng)
}

pub fn report(quiz: &ChoiceQuiz) -> Report {
    let (correct, _) = quiz.score();
    Report::new(correct, quiz.len())
}
