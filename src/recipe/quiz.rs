use serde::{Deserialize, Serialize};

use super::Formattable;

/// The quiz at the end of a recipe. Completing it earns experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub questions: Vec<Question>,
    /// Bonus for answering every question correctly.
    pub all_correct_reward: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: Formattable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Formattable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// At least one.
    pub correct_answers: Vec<Formattable>,
    #[serde(default)]
    pub wrong_answers: Vec<Formattable>,
    pub reward: u64,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answers.iter().any(|correct| correct == answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
    pub reward: u64,
}

impl QuizResult {
    pub fn all_correct(&self) -> bool {
        self.correct == self.total
    }
}

impl Quiz {
    /// Scores `answers`, where `answers[i]` is the answer picked for question `i`.
    /// Unanswered questions count as wrong.
    pub fn score<S: AsRef<str>>(&self, answers: &[S]) -> QuizResult {
        let mut correct = 0;
        let mut reward = 0u64;
        for (question, answer) in self.questions.iter().zip(answers) {
            if question.is_correct(answer.as_ref()) {
                correct += 1;
                reward = reward.saturating_add(question.reward);
            }
        }

        let total = self.questions.len();
        if correct == total {
            reward = reward.saturating_add(self.all_correct_reward);
        }

        QuizResult {
            correct,
            total,
            reward,
        }
    }
}
