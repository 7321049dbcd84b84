// Unit tests for Internship Match

use internship_match::core::keywords::{extract_keywords, score_resume};
use internship_match::core::scoring::{
    calculate_match_score, education_factor, experience_factor, interest_factor, location_factor,
    skills_factor,
};
use internship_match::core::Matcher;
use internship_match::models::{CandidateProfile, OpportunityRecord, ScoringWeights};
use internship_match::services::live_jobs::{build_search_query, filter_postings, RawHit};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn data_candidate() -> CandidateProfile {
    CandidateProfile {
        education: "undergraduate".to_string(),
        skills: strings(&["python", "sql"]),
        interests: strings(&["data"]),
        location: "Mumbai".to_string(),
        previous_experience: false,
    }
}

fn opportunity(id: &str) -> OpportunityRecord {
    OpportunityRecord {
        id: id.to_string(),
        title: format!("Internship {}", id),
        organization: "Acme".to_string(),
        sector: "Data Science".to_string(),
        required_education: "undergraduate".to_string(),
        required_skills: strings(&["python", "sql", "excel"]),
        location: "Mumbai".to_string(),
        remote_available: false,
        experience_required: false,
        ..Default::default()
    }
}

#[test]
fn test_concrete_scenario_scores_ninety() {
    let score = calculate_match_score(&data_candidate(), &opportunity("1"), &ScoringWeights::default());
    assert_eq!(score, 90.0);
}

#[test]
fn test_score_is_deterministic() {
    let profile = data_candidate();
    let opp = opportunity("1");
    let weights = ScoringWeights::default();

    let first = calculate_match_score(&profile, &opp, &weights);
    for _ in 0..10 {
        assert_eq!(calculate_match_score(&profile, &opp, &weights), first);
    }
}

#[test]
fn test_score_bounds() {
    let weights = ScoringWeights::default();
    let profiles = [CandidateProfile::default(), data_candidate()];
    let opportunities = [
        OpportunityRecord::default(),
        opportunity("1"),
        OpportunityRecord {
            required_education: "postgraduate".to_string(),
            experience_required: true,
            sector: "Law".to_string(),
            ..opportunity("2")
        },
    ];

    for profile in &profiles {
        for opp in &opportunities {
            let score = calculate_match_score(profile, opp, &weights);
            assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
            assert_eq!((score * 10.0).round() / 10.0, score);
        }
    }
}

#[test]
fn test_education_bonus_is_monotonic() {
    let profile = data_candidate();
    let weights = ScoringWeights::default();

    let exact = calculate_match_score(&profile, &opportunity("1"), &weights);
    let related = calculate_match_score(
        &CandidateProfile {
            education: "graduate".to_string(),
            ..profile.clone()
        },
        &opportunity("1"),
        &weights,
    );
    let unrelated = calculate_match_score(
        &CandidateProfile {
            education: "diploma".to_string(),
            ..profile
        },
        &opportunity("1"),
        &weights,
    );

    assert!(exact > related);
    assert!(related > unrelated);
}

#[test]
fn test_education_factor_cases() {
    assert_eq!(education_factor("Undergraduate", "undergraduate"), 1.0);
    assert_eq!(education_factor("diploma", "any"), 1.0);
    assert_eq!(education_factor("postgraduate", "graduate"), 0.8);
    assert_eq!(education_factor("undergraduate", "graduate"), 0.8);
    assert_eq!(education_factor("high school", "graduate"), 0.0);
}

#[test]
fn test_skills_factor_is_proportional() {
    let required = strings(&["python", "sql", "excel", "tableau"]);
    assert_eq!(skills_factor(&[], &required), 0.0);
    assert_eq!(skills_factor(&strings(&["Python"]), &required), 0.25);
    assert_eq!(skills_factor(&strings(&["python", "SQL"]), &required), 0.5);
    assert_eq!(skills_factor(&strings(&["python", "sql", "excel", "tableau"]), &required), 1.0);
    assert_eq!(skills_factor(&strings(&["python"]), &[]), 0.5);
}

#[test]
fn test_interest_factor_cases() {
    assert_eq!(interest_factor(&[], "Finance"), 0.3);
    assert_eq!(interest_factor(&strings(&["finance"]), "Finance"), 1.0);
    assert_eq!(interest_factor(&strings(&["web technology"]), "Technology"), 1.0);
    assert_eq!(interest_factor(&strings(&["data science"]), "Data"), 1.0);
    assert_eq!(interest_factor(&strings(&["social media"]), "Social Impact"), 0.6);
    assert_eq!(interest_factor(&strings(&["cooking"]), "Finance"), 0.0);
}

#[test]
fn test_remote_overrides_location() {
    assert_eq!(location_factor("Mumbai", "Mumbai", true), 0.8);
    assert_eq!(location_factor("Delhi", "Mumbai", true), 0.8);
    assert_eq!(location_factor("Mumbai", "mumbai", false), 1.0);
    assert_eq!(location_factor("Navi Mumbai", "Mumbai, Maharashtra", false), 0.7);
    assert_eq!(location_factor("Delhi", "Mumbai", false), 0.4);
}

#[test]
fn test_experience_factor_cases() {
    assert_eq!(experience_factor(false, false), 1.0);
    assert_eq!(experience_factor(true, false), 1.0);
    assert_eq!(experience_factor(true, true), 1.0);
    assert_eq!(experience_factor(false, true), 0.6);
}

#[test]
fn test_weights_are_normalized() {
    let profile = data_candidate();
    let opp = opportunity("1");

    let doubled = ScoringWeights {
        education: 0.5,
        skills: 0.6,
        interest: 0.5,
        location: 0.3,
        experience: 0.1,
    };

    assert_eq!(
        calculate_match_score(&profile, &opp, &doubled),
        calculate_match_score(&profile, &opp, &ScoringWeights::default())
    );
}

#[test]
fn test_rank_truncates_and_orders() {
    let matcher = Matcher::default();
    let catalog = vec![
        OpportunityRecord {
            sector: "Law".to_string(),
            ..opportunity("low")
        },
        opportunity("high"),
        OpportunityRecord {
            remote_available: true,
            ..opportunity("mid")
        },
    ];

    let ranked = matcher.rank(&data_candidate(), &catalog, 2);

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].opportunity.id, "high");
    assert_eq!(ranked[1].opportunity.id, "mid");
    assert!(ranked[0].match_score >= ranked[1].match_score);
}

#[test]
fn test_rank_keeps_catalog_order_for_ties() {
    let matcher = Matcher::default();
    let catalog: Vec<OpportunityRecord> = ["a", "b", "c", "d"].iter().map(|id| opportunity(id)).collect();

    let ids: Vec<String> = matcher
        .rank(&data_candidate(), &catalog, 10)
        .into_iter()
        .map(|s| s.opportunity.id)
        .collect();

    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_rank_empty_catalog_and_zero_top_n() {
    let matcher = Matcher::default();
    assert!(matcher.rank(&data_candidate(), &[], 5).is_empty());
    assert!(matcher.rank(&data_candidate(), &[opportunity("1")], 0).is_empty());
}

#[test]
fn test_available_sectors() {
    let catalog = vec![
        OpportunityRecord {
            sector: "Technology".to_string(),
            ..Default::default()
        },
        OpportunityRecord {
            sector: "Finance".to_string(),
            ..Default::default()
        },
        OpportunityRecord {
            sector: "Technology".to_string(),
            ..Default::default()
        },
        OpportunityRecord::default(),
    ];

    assert_eq!(
        Matcher::available_sectors(&catalog),
        vec!["Finance", "Other", "Technology"]
    );
}

#[test]
fn test_keyword_extraction_drops_stop_words() {
    let keywords = extract_keywords("We are looking for a Python developer with SQL and Python skills.");
    assert_eq!(keywords[0], "python");
    assert!(keywords.contains(&"sql".to_string()));
    assert!(!keywords.contains(&"and".to_string()));
}

#[test]
fn test_resume_score_verdicts() {
    let jd = "python sql tableau statistics";

    let strong = score_resume("Skills: python, sql, tableau, statistics. Education: B.Tech", jd);
    assert_eq!(strong.score, 100.0);
    assert_eq!(strong.verdict, "Good");

    let weak = score_resume("I like painting", jd);
    assert_eq!(weak.score, 0.0);
    assert_eq!(weak.verdict, "Needs Improvement");
    assert_eq!(weak.missing_keywords.len(), 4);
}

#[test]
fn test_search_query_for_profile() {
    assert_eq!(build_search_query(&data_candidate()), "python sql data Intern");
}

#[test]
fn test_filter_postings_cleans_titles() {
    let hits = vec![RawHit {
        title: "Analyst Intern - Indeed.com".to_string(),
        url: "https://in.indeed.com/viewjob?jk=1".to_string(),
        body: String::new(),
    }];

    let postings = filter_postings(hits, "India", 5);

    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].title, "Analyst Intern");
    assert_eq!(postings[0].company, "Indeed");
}

#[test]
fn test_offline_assistant_falls_back() {
    use internship_match::services::CareerAssistant;

    let assistant = CareerAssistant::offline();

    let questions = tokio_test::block_on(assistant.generate_questions("Analyst", "Finance"));
    assert_eq!(questions.len(), 5);
    assert!(questions[2].contains("Finance"));

    let long_answer = vec!["word"; 60].join(" ");
    let evaluation = tokio_test::block_on(assistant.evaluate_answer("Why us?", &long_answer));
    assert_eq!(evaluation.score, 10);
    assert!(evaluation.feedback.starts_with("Excellent"));

    let analysis = tokio_test::block_on(assistant.analyze_resume("anything", "a an the"));
    assert_eq!(analysis.score, 50.0);
    assert!(analysis.missing_keywords.is_empty());
}
