use crate::choice::Direction;
use crate::content::ContentProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Flashcards,
    Choice(Direction),
    Recall,
    Grammar,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Flashcards,
        Mode::Choice(Direction::WordToMeaning),
        Mode::Choice(Direction::MeaningToWord),
        Mode::Recall,
        Mode::Grammar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Flashcards => "Flashcards",
            Mode::Choice(Direction::WordToMeaning) => "Multiple choice: English → Vietnamese",
            Mode::Choice(Direction::MeaningToWord) => "Multiple choice: Vietnamese → English",
            Mode::Recall => "Typed recall: Vietnamese → English",
            Mode::Grammar => "Grammar notes",
        }
    }
}

/// One variant per screen, carrying just the indices that screen needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Parts,
    /// Lists the units of a part, followed by the part exam.
    Units { part: usize },
    Modes { part: usize, unit: usize },
    Practice { part: usize, unit: usize, mode: Mode },
    Topic { part: usize, unit: usize, topic: usize },
    Exam { part: usize },
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Select(usize),
    Back,
    Home,
    Quit,
    /// A practice screen ran to its end.
    Finished,
}

pub const HOME_START: usize = 0;
pub const HOME_QUIT: usize = 1;

/// Index of the exam entry on the units screen of `part`.
pub fn exam_entry(content: &dyn ContentProvider, part: usize) -> Option<usize> {
    content.part(part).map(|p| p.units.len())
}

/// The single place screen transitions are decided. Selections that do not
/// name anything keep the current screen.
pub fn navigate(screen: &Screen, event: Event, content: &dyn ContentProvider) -> Screen {
    use Screen::*;

    match (screen, event) {
        (_, Event::Quit) => Exit,
        (Exit, _) => Exit,
        (_, Event::Home) => Home,

        (Home, Event::Select(HOME_START)) => Parts,
        (Home, Event::Select(HOME_QUIT)) | (Home, Event::Back) => Exit,

        (Parts, Event::Select(part)) if content.part(part).is_some() => Units { part },
        (Parts, Event::Back) => Home,

        (Units { part }, Event::Select(unit)) if content.unit(*part, unit).is_some() => Modes {
            part: *part,
            unit,
        },
        (Units { part }, Event::Select(index)) if exam_entry(content, *part) == Some(index) => {
            Exam { part: *part }
        }
        (Units { .. }, Event::Back) => Parts,

        (Modes { part, unit }, Event::Select(index)) if index < Mode::ALL.len() => Practice {
            part: *part,
            unit: *unit,
            mode: Mode::ALL[index],
        },
        (Modes { part, .. }, Event::Back) => Units { part: *part },

        (Practice { part, unit, mode: Mode::Grammar }, Event::Select(topic))
            if content
                .unit(*part, *unit)
                .map_or(false, |u| topic < u.grammar.len()) =>
        {
            Topic {
                part: *part,
                unit: *unit,
                topic,
            }
        }
        (Practice { part, unit, .. }, Event::Back | Event::Finished) => Modes {
            part: *part,
            unit: *unit,
        },

        (Topic { part, unit, .. }, Event::Back | Event::Finished) => Practice {
            part: *part,
            unit: *unit,
            mode: Mode::Grammar,
        },

        (Exam { part }, Event::Back | Event::Finished) => Units { part: *part },

        (current, _) => current.clone(),
    }
}
