use crate::core::keywords::score_resume;
use crate::models::{AnswerEvaluation, ChatMessage, ResumeAnalysis};
use crate::services::completion::{extract_delimited, CompletionOptions, CompletionService};
use std::sync::Arc;

const QUESTION_COUNT: usize = 5;
const HISTORY_TURNS: usize = 5;
/// Roles a client may supply in chat history
const HISTORY_ROLES: [&str; 2] = ["user", "assistant"];
const JOB_DESCRIPTION_EXCERPT: usize = 1000;
const RESUME_EXCERPT: usize = 2000;

const INTERVIEWER_PROMPT: &str = "You are a professional technical interviewer. Generate strictly a JSON array of strings containing interview questions. The questions should be in the requested language if specified, otherwise English.";
const COACH_PROMPT: &str = "You are an interview coach. Evaluate the answer and return JSON with 'score' (1-10) and 'feedback' (string).";
const COUNSELOR_PROMPT: &str = "You are an expert Career Counselor. You must reply in the SAME LANGUAGE as the user. Be encouraging, professional, and concise.";
const ATS_PROMPT: &str = "You are an applicant tracking system. Compare the resume with the job description and return only a JSON object with keys score (0-100), missing_keywords, matched_keywords, verdict (Excellent/Good/Needs Improvement/Poor) and summary (one sentence).";

const OFFLINE_CHAT_REPLY: &str = "I am currently in offline mode because no completion service is configured. I can still help with basic questions!";
const FAILED_CHAT_REPLY: &str = "I'm having trouble reaching the assistant right now. Please try again later.";

/// Interview prep, chat and resume scoring on top of an optional completion service
///
/// Every operation has a deterministic offline answer, used when no service is
/// configured or the call fails.
#[derive(Clone, Default)]
pub struct CareerAssistant {
    completion: Option<Arc<dyn CompletionService>>,
}

impl CareerAssistant {
    pub fn new(completion: Option<Arc<dyn CompletionService>>) -> Self {
        Self { completion }
    }

    pub fn offline() -> Self {
        Self { completion: None }
    }

    pub fn is_online(&self) -> bool {
        self.completion.is_some()
    }

    /// Interview questions for a role and topic
    pub async fn generate_questions(&self, role: &str, topic: &str) -> Vec<String> {
        let Some(completion) = &self.completion else {
            return fallback_questions(role, topic);
        };

        let messages = [
            ChatMessage::system(INTERVIEWER_PROMPT),
            ChatMessage::user(format!(
                "Generate {} interview questions for a {} position focusing on {}.",
                QUESTION_COUNT, role, topic
            )),
        ];

        match completion.complete(&messages, CompletionOptions::default()).await {
            Ok(reply) => extract_delimited(&reply, '[', ']')
                .and_then(|json| serde_json::from_str::<Vec<String>>(json).ok())
                .filter(|questions| !questions.is_empty())
                .unwrap_or_else(|| {
                    tracing::warn!("Could not parse interview questions from completion, using fallback");
                    fallback_questions(role, topic)
                }),
            Err(e) => {
                tracing::warn!("Interview question generation failed: {}", e);
                fallback_questions(role, topic)
            }
        }
    }

    /// Score an interview answer from 1 to 10 with feedback
    pub async fn evaluate_answer(&self, question: &str, answer: &str) -> AnswerEvaluation {
        let Some(completion) = &self.completion else {
            return evaluate_by_length(answer);
        };

        let messages = [
            ChatMessage::system(COACH_PROMPT),
            ChatMessage::user(format!("Question: {}\nAnswer: {}", question, answer)),
        ];

        match completion.complete(&messages, CompletionOptions::default()).await {
            Ok(reply) => extract_delimited(&reply, '{', '}')
                .and_then(|json| serde_json::from_str::<AnswerEvaluation>(json).ok())
                .unwrap_or_else(|| AnswerEvaluation {
                    score: 7,
                    feedback: format!("{}...", reply.chars().take(100).collect::<String>()),
                }),
            Err(e) => {
                tracing::warn!("Answer evaluation failed: {}", e);
                AnswerEvaluation {
                    score: 5,
                    feedback: "Could not evaluate answer via AI. Please check your connection."
                        .to_string(),
                }
            }
        }
    }

    /// Reply to a chat message given recent history
    pub async fn chat(&self, message: &str, history: &[ChatMessage]) -> String {
        let Some(completion) = &self.completion else {
            return OFFLINE_CHAT_REPLY.to_string();
        };

        let turns: Vec<&ChatMessage> = history
            .iter()
            .filter(|turn| HISTORY_ROLES.contains(&turn.role.as_str()))
            .collect();
        let recent = &turns[turns.len().saturating_sub(HISTORY_TURNS)..];

        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(ChatMessage::system(COUNSELOR_PROMPT));
        messages.extend(recent.iter().map(|turn| (*turn).clone()));
        messages.push(ChatMessage::user(message));

        match completion.complete(&messages, CompletionOptions::default()).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Chat completion failed: {}", e);
                FAILED_CHAT_REPLY.to_string()
            }
        }
    }

    /// Score a resume against a job description
    ///
    /// Tries the completion service first and falls back to keyword overlap.
    pub async fn analyze_resume(&self, resume_text: &str, job_description: &str) -> ResumeAnalysis {
        if let Some(completion) = &self.completion {
            let messages = [
                ChatMessage::system(ATS_PROMPT),
                ChatMessage::user(format!(
                    "JOB DESCRIPTION:\n{}\n\nRESUME:\n{}",
                    excerpt(job_description, JOB_DESCRIPTION_EXCERPT),
                    excerpt(resume_text, RESUME_EXCERPT)
                )),
            ];
            let options = CompletionOptions {
                temperature: 0.1,
                json_object: true,
            };

            match completion.complete(&messages, options).await {
                Ok(reply) => {
                    let parsed = extract_delimited(&reply, '{', '}')
                        .and_then(|json| serde_json::from_str::<ResumeAnalysis>(json).ok());
                    if let Some(mut analysis) = parsed {
                        analysis.score = analysis.score.clamp(0.0, 100.0);
                        return analysis;
                    }
                    tracing::warn!("Unparseable resume analysis from completion, using keyword match");
                }
                Err(e) => {
                    tracing::warn!("AI resume analysis failed, using keyword match: {}", e);
                }
            }
        }

        score_resume(resume_text, job_description)
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Templated questions used when no completion is available
pub fn fallback_questions(role: &str, topic: &str) -> Vec<String> {
    vec![
        format!("Tell me about a time you handled a difficult situation as a {}.", role),
        format!("What are your greatest strengths relevant to {}?", role),
        format!("Why do you want to work in the {} industry?", topic),
        "Describe a project you are proud of.".to_string(),
        "Where do you see yourself in 5 years?".to_string(),
    ]
}

/// Length-based answer score used when no completion is available
pub fn evaluate_by_length(answer: &str) -> AnswerEvaluation {
    let word_count = answer.split_whitespace().count();
    let score = (word_count / 5).clamp(1, 10) as u32;

    let feedback = if word_count > 50 {
        "Excellent detail! You covered the main points well."
    } else if word_count < 10 {
        "Too short. Please elaborate on your experience."
    } else {
        "Good effort! Try to be more specific and use the STAR method."
    };

    AnswerEvaluation {
        score,
        feedback: feedback.to_string(),
    }
}
