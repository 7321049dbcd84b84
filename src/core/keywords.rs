use crate::models::ResumeAnalysis;
use std::collections::HashMap;

/// How many job-description keywords are checked against a resume
const MAX_KEYWORDS: usize = 20;

/// Score reported when the job description yields no keywords
const NO_KEYWORD_SCORE: f64 = 50.0;

const SECTION_BONUS: f64 = 5.0;

const STOP_WORDS: &[&str] = &[
    "and", "the", "to", "of", "in", "for", "with", "a", "an", "is", "are", "on", "at", "be",
    "will", "that", "this", "by", "as",
];

/// Extract the most frequent significant words of a job description
///
/// Words are maximal runs of word characters made only of `a-z`, at least two
/// long, after lowercasing. Ties in frequency keep first-seen order.
pub fn extract_keywords(job_description: &str) -> Vec<String> {
    let text = job_description.to_lowercase();

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.len() >= 2 && word.chars().all(|c| c.is_ascii_lowercase()))
        .filter(|word| !STOP_WORDS.contains(word))
        .enumerate()
    {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first_seen))| (word, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

/// Keyword-overlap score of a resume against a job description
///
/// Used whenever the completion service is unavailable.
pub fn score_resume(resume_text: &str, job_description: &str) -> ResumeAnalysis {
    let resume = resume_text.to_lowercase();
    let keywords = extract_keywords(job_description);

    if keywords.is_empty() {
        return ResumeAnalysis {
            score: NO_KEYWORD_SCORE,
            missing_keywords: vec![],
            matched_keywords: vec![],
            verdict: verdict(NO_KEYWORD_SCORE).to_string(),
            summary: "Job description too short for keyword analysis.".to_string(),
        };
    }

    let (matched, missing): (Vec<String>, Vec<String>) = keywords
        .iter()
        .cloned()
        .partition(|keyword| resume.contains(keyword.as_str()));

    let mut score = matched.len() as f64 / keywords.len() as f64 * 100.0;

    if resume.contains("education") {
        score += SECTION_BONUS;
    }
    if resume.contains("skills") {
        score += SECTION_BONUS;
    }
    if resume.contains("project") || resume.contains("experience") {
        score += SECTION_BONUS;
    }

    let score = ((score * 10.0).round() / 10.0).min(100.0);

    ResumeAnalysis {
        score,
        missing_keywords: missing,
        matched_keywords: matched,
        verdict: verdict(score).to_string(),
        summary: "Basic keyword analysis performed.".to_string(),
    }
}

fn verdict(score: f64) -> &'static str {
    if score > 60.0 {
        "Good"
    } else {
        "Needs Improvement"
    }
}
