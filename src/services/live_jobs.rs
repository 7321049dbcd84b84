use crate::models::{CandidateProfile, JobPosting};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Job boards whose links are trusted without a title check
const KNOWN_BOARDS: &[&str] = &["linkedin.com", "indeed.com", "naukri.com", "glassdoor.com"];

/// Titles containing any of these are products or courses, not postings
const SPAM_KEYWORDS: &[&str] = &[
    "price", "buy", "shop", "store", "cart", "dvd", "cd", "toy", "puzzle", "course", "bootcamp",
    "training", "certificate", "admission", "syllabus", "fee",
];

/// Errors that can occur when querying the job feed
#[derive(Debug, Error)]
pub enum LiveJobsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// A best-effort source of live job postings
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(
        &self,
        query: &str,
        location: &str,
        limit: usize,
    ) -> Result<Vec<JobPosting>, LiveJobsError>;
}

/// Raw hit returned by the search feed
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    pub title: String,
    #[serde(alias = "href")]
    pub url: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedResponse {
    Wrapped { results: Vec<RawHit> },
    Bare(Vec<RawHit>),
}

/// Job search backed by an HTTP search feed
///
/// The feed returns generic web hits; they are filtered down to plausible
/// internship postings before being returned.
pub struct HttpJobSource {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpJobSource {
    pub fn new(endpoint: String, api_key: Option<String>, timeout_secs: u64) -> Result<Self, LiveJobsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn search(
        &self,
        query: &str,
        location: &str,
        limit: usize,
    ) -> Result<Vec<JobPosting>, LiveJobsError> {
        let search_query = format!(
            "\"{}\" internship {} (site:linkedin.com/jobs OR site:indeed.com OR site:naukri.com OR site:glassdoor.com)",
            query, location
        );

        let url = format!(
            "{}?q={}&max_results={}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&search_query),
            limit * 2
        );

        tracing::debug!("Searching live jobs: {}", search_query);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(LiveJobsError::ApiError(format!(
                "Job search failed: {}",
                response.status()
            )));
        }

        let hits = match response.json::<FeedResponse>().await? {
            FeedResponse::Wrapped { results } => results,
            FeedResponse::Bare(results) => results,
        };

        let postings = filter_postings(hits, location, limit);
        tracing::debug!("Live job search for {:?} kept {} postings", query, postings.len());

        Ok(postings)
    }
}

/// Turn raw search hits into postings
///
/// Drops spam and off-board hits that do not look like jobs, cleans board
/// suffixes from titles, guesses the company and de-duplicates by URL.
pub fn filter_postings(hits: Vec<RawHit>, location: &str, limit: usize) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    let mut postings = Vec::new();

    for hit in hits {
        if postings.len() >= limit {
            break;
        }

        let title_lower = hit.title.to_lowercase();
        if title_lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| SPAM_KEYWORDS.contains(&word))
        {
            continue;
        }

        let on_board = KNOWN_BOARDS.iter().any(|board| hit.url.contains(board));
        if !on_board && !title_lower.contains("intern") && !title_lower.contains("job") {
            continue;
        }

        if !seen.insert(hit.url.clone()) {
            continue;
        }

        postings.push(JobPosting {
            id: posting_id(&hit.url),
            title: hit
                .title
                .replace(" | LinkedIn", "")
                .replace(" - Indeed.com", "")
                .trim()
                .to_string(),
            company: extract_company(&hit.title, &hit.url),
            location: location.to_string(),
            apply_url: hit.url,
            source: "Live Web".to_string(),
            posted_at: Some("Recently".to_string()),
        });
    }

    postings
}

fn extract_company(title: &str, url: &str) -> String {
    let after_at = title.split_once(" at ").map(|(_, rest)| rest);

    let company = if url.contains("linkedin.com") {
        after_at
            .map(|rest| rest.split(" | ").next().unwrap_or(rest))
            .unwrap_or("LinkedIn")
    } else if url.contains("indeed.com") {
        "Indeed"
    } else if let Some(rest) = after_at {
        rest.split('-').next().unwrap_or(rest)
    } else {
        "External Source"
    };

    company.trim().to_string()
}

/// Stable id derived from the posting URL (FNV-1a)
fn posting_id(url: &str) -> String {
    let hash = url.bytes().fold(0xcbf29ce484222325u64, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x100000001b3)
    });
    format!("{:x}", hash)
}

/// Search query used to look up live postings for a profile
///
/// Two skills and one interest, or "Intern" when the profile has neither,
/// followed by " Intern".
pub fn build_search_query(profile: &CandidateProfile) -> String {
    let mut parts: Vec<&str> = profile.skills.iter().take(2).map(String::as_str).collect();
    parts.extend(profile.interests.iter().take(1).map(String::as_str));

    if parts.is_empty() {
        parts.push("Intern");
    }

    format!("{} Intern", parts.join(" "))
}

/// Caches search results per query and location
pub struct CachedJobSource {
    inner: Arc<dyn JobSource>,
    cache: moka::future::Cache<String, Arc<Vec<JobPosting>>>,
}

impl CachedJobSource {
    pub fn new(inner: Arc<dyn JobSource>, capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }

    fn key(query: &str, location: &str, limit: usize) -> String {
        format!("{}|{}|{}", query.to_lowercase(), location.to_lowercase(), limit)
    }
}

#[async_trait]
impl JobSource for CachedJobSource {
    async fn search(
        &self,
        query: &str,
        location: &str,
        limit: usize,
    ) -> Result<Vec<JobPosting>, LiveJobsError> {
        let key = Self::key(query, location, limit);

        if let Some(hit) = self.cache.get(&key).await {
            tracing::trace!("Live jobs cache hit: {}", key);
            return Ok(hit.as_ref().clone());
        }

        let postings = self.inner.search(query, location, limit).await?;
        self.cache.insert(key, Arc::new(postings.clone())).await;

        Ok(postings)
    }
}
