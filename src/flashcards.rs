use rand::seq::SliceRandom;
use rand::Rng;

use crate::content::VocabularyItem;
use crate::speech::Lang;

/// Flip cards over a list of words. Front is the word, back is the meaning.
#[derive(Debug, Clone)]
pub struct Deck<'a> {
    cards: Vec<&'a VocabularyItem>,
    position: usize,
    flipped: bool,
    announced: bool,
}

impl<'a> Deck<'a> {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a VocabularyItem>,
    {
        Self {
            cards: items.into_iter().collect(),
            position: 0,
            flipped: false,
            announced: false,
        }
    }

    pub fn shuffled<I, R>(items: I, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = &'a VocabularyItem>,
        R: Rng + ?Sized,
    {
        let mut deck = Self::new(items);
        deck.cards.shuffle(rng);
        deck
    }

    pub fn current(&self) -> Option<&'a VocabularyItem> {
        self.cards.get(self.position).copied()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
        self.announced = false;
    }

    /// Text to pronounce for the face now showing: the word in English on the
    /// front, the meaning in Vietnamese on the back. Yields once per face.
    pub fn announcement(&mut self) -> Option<(&'a str, Lang)> {
        if self.announced {
            return None;
        }
        let card = self.current()?;
        self.announced = true;
        if self.flipped {
            Some((card.meaning.as_str(), Lang::Vietnamese))
        } else {
            Some((card.headword(), Lang::English))
        }
    }

    /// Wraps to the first card after the last. New cards always show their front.
    pub fn next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.position = (self.position + 1) % self.cards.len();
        self.flipped = false;
        self.announced = false;
    }

    pub fn previous(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.position = self.position.checked_sub(1).unwrap_or(self.cards.len() - 1);
        self.flipped = false;
        self.announced = false;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
