//! Data models for the flashcard system

use serde::{Deserialize, Serialize};

/// A stored flashcard with question (front) and answer (back)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Backend-assigned id
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// A flashcard that has not been saved yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlashcard {
    pub question: String,
    pub answer: String,
}

impl NewFlashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Both sides must be present
    pub fn is_complete(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }

    pub fn with_id(self, id: impl Into<String>) -> Flashcard {
        Flashcard {
            id: id.into(),
            question: self.question,
            answer: self.answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness() {
        assert!(NewFlashcard::new("Q", "A").is_complete());
        assert!(!NewFlashcard::new("Q", "   ").is_complete());
        assert!(!NewFlashcard::new("", "A").is_complete());
        assert!(!NewFlashcard::default().is_complete());
    }

    #[test]
    fn test_document_has_no_id() {
        let value = serde_json::to_value(NewFlashcard::new("2+2?", "4")).unwrap();
        assert_eq!(value, serde_json::json!({ "question": "2+2?", "answer": "4" }));

        let card = NewFlashcard::new("2+2?", "4").with_id("abc");
        assert_eq!(card.id, "abc");
    }
}
