use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::ContentError;
use crate::theme::Accent;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VocabularyItem {
    pub id: u32,
    /// Headword, optionally tagged with a part of speech: `"landfill (n)"`.
    pub word: String,
    #[serde(default)]
    pub ipa: String,
    pub meaning: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub family: Vec<String>,
}

impl VocabularyItem {
    pub fn new(id: u32, word: &str, meaning: &str) -> Self {
        Self {
            id,
            word: word.to_string(),
            ipa: String::new(),
            meaning: meaning.to_string(),
            examples: Vec::new(),
            synonyms: Vec::new(),
            family: Vec::new(),
        }
    }

    /// The word without its part-of-speech tag.
    pub fn headword(&self) -> &str {
        match self.word.find('(') {
            Some(at) => self.word[..at].trim(),
            None => self.word.trim(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        let open = self.word.find('(')?;
        let rest = &self.word[open + 1..];
        let close = rest.find(')')?;
        Some(rest[..close].trim())
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GrammarTopic {
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Unit {
    pub number: u32,
    pub title: String,
    pub vocabulary: Vec<VocabularyItem>,
    #[serde(default)]
    pub grammar: Vec<GrammarTopic>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Part {
    pub title: String,
    #[serde(default)]
    pub grade: Option<u32>,
    #[serde(default)]
    pub accent: Accent,
    pub units: Vec<Unit>,
}

impl Part {
    /// Every word of every unit, in content order.
    pub fn items(&self) -> Vec<&VocabularyItem> {
        self.units.iter().flat_map(|u| u.vocabulary.iter()).collect()
    }

    pub fn label(&self) -> String {
        match self.grade {
            Some(grade) => format!("Grade {}: {}", grade, self.title),
            None => self.title.clone(),
        }
    }
}

/// Read-only access to parts, units and words. Sessions are always started
/// from slices handed out here, so tests can swap in their own fixtures.
pub trait ContentProvider {
    fn parts(&self) -> &[Part];

    fn part(&self, index: usize) -> Option<&Part> {
        self.parts().get(index)
    }

    fn unit(&self, part: usize, unit: usize) -> Option<&Unit> {
        self.part(part)?.units.get(unit)
    }

    fn all_items(&self) -> Vec<&VocabularyItem> {
        self.parts()
            .iter()
            .flat_map(|p| p.units.iter())
            .flat_map(|u| u.vocabulary.iter())
            .collect()
    }
}

#[derive(Deserialize)]
struct Document {
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
pub struct Library {
    parts: Vec<Part>,
}

impl Library {
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_yaml(include_str!("../data.yaml"))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loading content from {}", path.display());
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self, ContentError> {
        let document: Document = serde_yaml::from_str(data)?;
        Self::from_parts(document.parts)
    }

    pub fn from_parts(parts: Vec<Part>) -> Result<Self, ContentError> {
        validate(&parts)?;
        let library = Self { parts };
        tracing::info!(
            parts = library.parts.len(),
            items = library.all_items().len(),
            "content loaded"
        );
        Ok(library)
    }
}

impl ContentProvider for Library {
    fn parts(&self) -> &[Part] {
        &self.parts
    }
}

fn validate(parts: &[Part]) -> Result<(), ContentError> {
    if parts.is_empty() {
        return Err(ContentError::NoParts);
    }

    let mut seen = HashSet::new();
    for part in parts {
        for unit in &part.units {
            if unit.vocabulary.is_empty() {
                return Err(ContentError::EmptyUnit {
                    part: part.title.clone(),
                    unit: unit.number,
                });
            }
            for item in &unit.vocabulary {
                if item.headword().is_empty() {
                    return Err(ContentError::MissingField { id: item.id, field: "word" });
                }
                if item.meaning.trim().is_empty() {
                    return Err(ContentError::MissingField { id: item.id, field: "meaning" });
                }
                if !seen.insert(item.id) {
                    return Err(ContentError::DuplicateId(item.id));
                }
            }
            for topic in &unit.grammar {
                if topic.title.trim().is_empty() || topic.explanation.trim().is_empty() {
                    return Err(ContentError::EmptyGrammar { unit: unit.number });
                }
            }
        }
    }
    Ok(())
}
