//! Deterministic quiz generator used when the generation backend is unavailable.

use crate::models::{Flashcard, GenerateResponse, QuizQuestion};

pub const MAX_ITEMS: usize = 5;
const OPTION_CHARS: usize = 50;
const FLASHCARD_CHARS: usize = 80;
const EMPTY_SUMMARY: &str = "Content processed.";
const DISTRACTORS: [&str; 3] = ["Something different", "Opposite meaning", "Unrelated fact"];

/// Split text on periods, dropping empty fragments
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Build a quiz and flashcards from the leading sentences of `text`
pub fn generate_mock_quiz(text: &str) -> GenerateResponse {
    let sentences = split_sentences(text);

    let summary = if sentences.is_empty() {
        EMPTY_SUMMARY.to_string()
    } else {
        format!("{}.", sentences.iter().take(2).copied().collect::<Vec<_>>().join(". "))
    };

    let count = sentences.len().min(MAX_ITEMS);
    let mut quiz_questions = Vec::with_capacity(count);
    let mut flashcards = Vec::with_capacity(count);

    for (i, sentence) in sentences.iter().take(count).enumerate() {
        let correct = if sentence.chars().count() > OPTION_CHARS {
            format!("{}...", take_chars(sentence, OPTION_CHARS))
        } else {
            sentence.to_string()
        };

        let mut options = vec![correct];
        options.extend(DISTRACTORS.iter().map(|d| d.to_string()));

        quiz_questions.push(QuizQuestion {
            question_type: "mcq".to_string(),
            question: "Which statement is true about the content?".to_string(),
            options,
            correct_index: 0,
            difficulty: "easy".to_string(),
            explanation: Some("Based on the provided content".to_string()),
        });

        flashcards.push(Flashcard {
            front: format!("Key point {}", i + 1),
            back: take_chars(sentence, FLASHCARD_CHARS),
        });
    }

    GenerateResponse {
        summary,
        quiz_questions,
        flashcards,
    }
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris_scenario() {
        let response = generate_mock_quiz("Paris is the capital of France. It has the Eiffel Tower.");

        assert_eq!(response.summary, "Paris is the capital of France. It has the Eiffel Tower.");
        assert_eq!(response.quiz_questions.len(), 2);
        assert_eq!(response.flashcards.len(), 2);
        assert_eq!(response.quiz_questions[0].options[0], "Paris is the capital of France");
        assert_eq!(response.flashcards[1].front, "Key point 2");
        assert_eq!(response.flashcards[1].back, "It has the Eiffel Tower");
    }

    #[test]
    fn test_zero_sentences() {
        for text in ["", "...", " . . ", "\n"] {
            let response = generate_mock_quiz(text);
            assert_eq!(response.summary, "Content processed.", "input {:?}", text);
            assert!(response.quiz_questions.is_empty());
            assert!(response.flashcards.is_empty());
        }
    }

    #[test]
    fn test_caps_at_five_items() {
        let text = (1..=8).map(|i| format!("Sentence number {}.", i)).collect::<String>();
        let response = generate_mock_quiz(&text);

        assert_eq!(response.quiz_questions.len(), 5);
        assert_eq!(response.flashcards.len(), 5);
        assert_eq!(response.summary, "Sentence number 1. Sentence number 2.");
    }

    #[test]
    fn test_question_shape() {
        let response = generate_mock_quiz("One. Two. Three");
        for question in &response.quiz_questions {
            assert_eq!(question.correct_index, 0);
            assert_eq!(question.options.len(), 4);
            assert_eq!(question.difficulty, "easy");
            assert_eq!(question.question_type, "mcq");
            assert_eq!(&question.options[1..], &DISTRACTORS);
            assert_eq!(question.explanation.as_deref(), Some("Based on the provided content"));
        }
    }

    #[test]
    fn test_long_sentences_are_truncated() {
        let sentence = "x".repeat(100);
        let response = generate_mock_quiz(&sentence);

        assert_eq!(response.quiz_questions[0].options[0], format!("{}...", "x".repeat(50)));
        assert_eq!(response.flashcards[0].back, "x".repeat(80));
    }

    #[test]
    fn test_exactly_fifty_chars_has_no_ellipsis() {
        let sentence = "y".repeat(50);
        let response = generate_mock_quiz(&sentence);
        assert_eq!(response.quiz_questions[0].options[0], sentence);
    }

    #[test]
    fn test_truncation_respects_multibyte_characters() {
        let sentence = "日本".repeat(40);
        let response = generate_mock_quiz(&sentence);

        assert_eq!(response.quiz_questions[0].options[0].chars().count(), 53);
        assert_eq!(response.flashcards[0].back.chars().count(), 80);
    }

    #[test]
    fn test_single_sentence_summary() {
        let response = generate_mock_quiz("  Rust is fast  ");
        assert_eq!(response.summary, "Rust is fast.");
    }

    #[test]
    fn test_deterministic() {
        let text = "Water boils at 100 degrees. Ice melts at zero. Steam is hot.";
        assert_eq!(generate_mock_quiz(text), generate_mock_quiz(text));
    }
}
