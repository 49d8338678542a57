pub mod choice;
pub mod content;
pub mod error;
pub mod exam;
pub mod flashcards;
pub mod normalize;
pub mod recall;
pub mod screen;
pub mod speech;
pub mod theme;

pub use content::{ContentProvider, Library, Part, Unit, VocabularyItem};
pub use error::{ContentError, SessionError};
pub use recall::{Phase, RecallSession, Submission};
