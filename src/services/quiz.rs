use crate::models::{PublicQuizQuestion, QuizQuestion, QuizScore};
use std::collections::HashMap;
use std::path::Path;

/// Subject quizzes, keyed by lowercase subject name
#[derive(Debug, Clone, Default)]
pub struct QuizBank {
    subjects: HashMap<String, Vec<QuizQuestion>>,
}

impl QuizBank {
    pub fn new(subjects: HashMap<String, Vec<QuizQuestion>>) -> Self {
        let subjects = subjects
            .into_iter()
            .map(|(subject, questions)| (subject.to_lowercase(), questions))
            .collect();
        Self { subjects }
    }

    /// Load the bank from a JSON object of `subject -> [question]`
    ///
    /// Falls back to an empty bank when the file is missing or malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                serde_json::from_str::<HashMap<String, Vec<QuizQuestion>>>(&raw)
                    .map_err(|e| e.to_string())
            });

        match parsed {
            Ok(subjects) => {
                tracing::info!("Loaded {} quiz subjects from {}", subjects.len(), path.display());
                Self::new(subjects)
            }
            Err(e) => {
                tracing::warn!("Quiz bank {} unavailable ({}), serving no quizzes", path.display(), e);
                Self::default()
            }
        }
    }

    /// Questions for a subject with the answer key removed
    pub fn questions(&self, subject: &str) -> Vec<PublicQuizQuestion> {
        self.subjects
            .get(&subject.to_lowercase())
            .map(|questions| questions.iter().map(PublicQuizQuestion::from).collect())
            .unwrap_or_default()
    }

    /// Grade a submission of `question id -> selected option`
    ///
    /// Only ids that belong to the subject count toward the total.
    pub fn grade(&self, subject: &str, answers: &HashMap<String, i64>) -> QuizScore {
        let Some(questions) = self.subjects.get(&subject.to_lowercase()) else {
            return QuizScore { score: 0, total: 0, percentage: 0.0 };
        };

        let by_id: HashMap<String, &QuizQuestion> =
            questions.iter().map(|q| (q.id.to_string(), q)).collect();

        let mut score = 0;
        let mut total = 0;
        for (question_id, selected) in answers {
            if let Some(question) = by_id.get(question_id.trim()) {
                total += 1;
                if usize::try_from(*selected).ok() == Some(question.correct) {
                    score += 1;
                }
            }
        }

        let percentage = if total > 0 {
            score as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        QuizScore { score, total, percentage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuizBank {
        let questions = vec![
            QuizQuestion {
                id: 1,
                question: "What does SQL stand for?".to_string(),
                options: vec!["Structured Query Language".to_string(), "Simple Query Logic".to_string()],
                correct: 0,
            },
            QuizQuestion {
                id: 2,
                question: "Which is a measure of central tendency?".to_string(),
                options: vec!["Variance".to_string(), "Mean".to_string()],
                correct: 1,
            },
        ];
        QuizBank::new(HashMap::from([("Data_Analytics".to_string(), questions)]))
    }

    #[test]
    fn test_questions_hide_answers() {
        let questions = bank().questions("DATA_ANALYTICS");
        assert_eq!(questions.len(), 2);
        let json = serde_json::to_value(&questions[0]).unwrap();
        assert!(json.get("correct").is_none());
    }

    #[test]
    fn test_grade_counts_only_known_ids() {
        let answers = HashMap::from([
            ("1".to_string(), 0),
            ("2".to_string(), 0),
            ("99".to_string(), 1),
        ]);

        let result = bank().grade("data_analytics", &answers);

        assert_eq!(result.score, 1);
        assert_eq!(result.total, 2);
        assert_eq!(result.percentage, 50.0);
    }

    #[test]
    fn test_grade_unknown_subject() {
        let result = bank().grade("astrology", &HashMap::from([("1".to_string(), 0)]));
        assert_eq!(result.total, 0);
        assert_eq!(result.percentage, 0.0);
    }

    #[test]
    fn test_negative_selection_is_wrong() {
        let result = bank().grade("data_analytics", &HashMap::from([("1".to_string(), -1)]));
        assert_eq!(result.score, 0);
        assert_eq!(result.total, 1);
    }

    #[test]
    fn test_missing_file_gives_empty_bank() {
        let bank = QuizBank::load("/no/such/quizzes.json");
        assert!(bank.questions("python").is_empty());
        assert!(bank.questions("sql").is_empty());
    }
}
