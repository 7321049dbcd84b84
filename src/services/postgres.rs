use crate::models::{CandidateProfile, ProfileDetails};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Account record, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Saved profile: matcher fields plus the descriptive details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub user_id: i64,
    #[serde(flatten)]
    pub profile: CandidateProfile,
    #[serde(flatten)]
    pub details: ProfileDetails,
    pub updated_at: DateTime<Utc>,
}

/// A tracked job application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub company_name: String,
    pub role_title: String,
    pub status: String,
    pub applied_date: DateTime<Utc>,
    pub job_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub breakdown: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningStats {
    pub avg_quiz_score: f64,
}

/// One entry of the recent-activity feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    pub subtitle: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Per-user dashboard summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub applications: ApplicationStats,
    pub learning: LearningStats,
    pub recent_activity: Vec<Activity>,
}

/// PostgreSQL client for user-owned career data
///
/// Stores profiles, tracked applications, resume scans and quiz results.
/// The matcher never depends on this client; it is only used by the
/// account-scoped endpoints.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        settings: &crate::config::DatabaseSettings,
    ) -> Result<Self, PostgresError> {
        tracing::info!(
            "Connecting to PostgreSQL (max {} connections)",
            settings.max_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            settings.acquire_timeout_secs,
        )
        .await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, PostgresError> {
        let query = r#"
            SELECT id, email, full_name, phone, created_at
            FROM users
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("user {}", user_id)))?;

        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// Insert or update the user's profile
    ///
    /// Missing project and work-history documents are stored as `[]`.
    pub async fn save_profile(
        &self,
        user_id: i64,
        profile: &CandidateProfile,
        details: &ProfileDetails,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO user_profiles (
                user_id, education, skills, interests, location, previous_experience,
                bio, institution, gpa, academic_score, languages, certifications,
                github, linkedin, projects_json, work_history_json, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    COALESCE($15, '[]'), COALESCE($16, '[]'), NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                education = EXCLUDED.education,
                skills = EXCLUDED.skills,
                interests = EXCLUDED.interests,
                location = EXCLUDED.location,
                previous_experience = EXCLUDED.previous_experience,
                bio = EXCLUDED.bio,
                institution = EXCLUDED.institution,
                gpa = EXCLUDED.gpa,
                academic_score = EXCLUDED.academic_score,
                languages = EXCLUDED.languages,
                certifications = EXCLUDED.certifications,
                github = EXCLUDED.github,
                linkedin = EXCLUDED.linkedin,
                projects_json = EXCLUDED.projects_json,
                work_history_json = EXCLUDED.work_history_json,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(&profile.education)
            .bind(&profile.skills)
            .bind(&profile.interests)
            .bind(&profile.location)
            .bind(profile.previous_experience)
            .bind(&details.bio)
            .bind(&details.institution)
            .bind(&details.gpa)
            .bind(&details.academic_score)
            .bind(&details.languages)
            .bind(&details.certifications)
            .bind(&details.github)
            .bind(&details.linkedin)
            .bind(&details.projects_json)
            .bind(&details.work_history_json)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Saved profile for user {}", user_id);

        Ok(())
    }

    /// Insert or update only the matcher fields, leaving the details untouched
    pub async fn save_match_profile(
        &self,
        user_id: i64,
        profile: &CandidateProfile,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO user_profiles (
                user_id, education, skills, interests, location, previous_experience, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                education = EXCLUDED.education,
                skills = EXCLUDED.skills,
                interests = EXCLUDED.interests,
                location = EXCLUDED.location,
                previous_experience = EXCLUDED.previous_experience,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(&profile.education)
            .bind(&profile.skills)
            .bind(&profile.interests)
            .bind(&profile.location)
            .bind(profile.previous_experience)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<Option<StoredProfile>, PostgresError> {
        let query = r#"
            SELECT user_id, education, skills, interests, location, previous_experience,
                   bio, institution, gpa, academic_score, languages, certifications,
                   github, linkedin, projects_json, work_history_json, updated_at
            FROM user_profiles
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| stored_profile_from_row(&row)).transpose()
    }

    /// Record a new application with status "Applied"
    pub async fn add_application(
        &self,
        user_id: i64,
        company: &str,
        role: &str,
        link: Option<&str>,
    ) -> Result<Application, PostgresError> {
        let query = r#"
            INSERT INTO applications (user_id, company_name, role_title, status, job_link)
            VALUES ($1, $2, $3, 'Applied', $4)
            RETURNING id, company_name, role_title, status, applied_date, job_link
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(company)
            .bind(role)
            .bind(link)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("User {} applied to {} at {}", user_id, role, company);

        application_from_row(&row)
    }

    /// Applications for a user, newest first
    pub async fn list_applications(&self, user_id: i64) -> Result<Vec<Application>, PostgresError> {
        let query = r#"
            SELECT id, company_name, role_title, status, applied_date, job_link
            FROM applications
            WHERE user_id = $1
            ORDER BY applied_date DESC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        rows.iter().map(application_from_row).collect()
    }

    pub async fn record_ats_scan(
        &self,
        user_id: i64,
        role: &str,
        score: f64,
        missing_keywords: &[String],
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO ats_scans (user_id, role_title, match_score, missing_keywords)
            VALUES ($1, $2, $3, $4)
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(role)
            .bind(score)
            .bind(missing_keywords.join(","))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn record_quiz_result(
        &self,
        user_id: i64,
        subject: &str,
        score: u32,
        total: u32,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO quiz_results (user_id, subject, score, total_questions)
            VALUES ($1, $2, $3, $4)
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(subject)
            .bind(score as f64)
            .bind(total as i32)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Application breakdown, quiz average and the five latest activities
    pub async fn dashboard_stats(&self, user_id: i64) -> Result<DashboardStats, PostgresError> {
        let breakdown_query = r#"
            SELECT status, COUNT(*) AS count
            FROM applications
            WHERE user_id = $1
            GROUP BY status
        "#;

        let rows = sqlx::query(breakdown_query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let mut breakdown = BTreeMap::new();
        for row in &rows {
            breakdown.insert(row.try_get::<String, _>("status")?, row.try_get::<i64, _>("count")?);
        }
        let total = breakdown.values().sum();

        let quiz_query = r#"
            SELECT AVG(score)::float8 AS avg_score,
                   AVG(total_questions)::float8 AS avg_total
            FROM quiz_results
            WHERE user_id = $1
        "#;

        let row = sqlx::query(quiz_query)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        let avg_quiz_score = average_percentage(row.try_get("avg_score")?, row.try_get("avg_total")?);

        let activity_query = r#"
            SELECT company_name AS title, role_title AS subtitle, applied_date AS date,
                   'Application' AS kind
            FROM applications WHERE user_id = $1
            UNION ALL
            SELECT subject AS title, CAST(score AS TEXT) AS subtitle, scan_date AS date,
                   'Quiz' AS kind
            FROM quiz_results WHERE user_id = $1
            ORDER BY date DESC
            LIMIT 5
        "#;

        let rows = sqlx::query(activity_query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let recent_activity = rows
            .iter()
            .map(|row| {
                Ok(Activity {
                    title: row.try_get("title")?,
                    subtitle: row.try_get("subtitle")?,
                    date: row.try_get("date")?,
                    kind: row.try_get("kind")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(DashboardStats {
            applications: ApplicationStats { total, breakdown },
            learning: LearningStats { avg_quiz_score },
            recent_activity,
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn stored_profile_from_row(row: &PgRow) -> Result<StoredProfile, PostgresError> {
    Ok(StoredProfile {
        user_id: row.try_get("user_id")?,
        profile: CandidateProfile {
            education: row.try_get("education")?,
            skills: row.try_get("skills")?,
            interests: row.try_get("interests")?,
            location: row.try_get("location")?,
            previous_experience: row.try_get("previous_experience")?,
        },
        details: ProfileDetails {
            bio: row.try_get("bio")?,
            institution: row.try_get("institution")?,
            gpa: row.try_get("gpa")?,
            academic_score: row.try_get("academic_score")?,
            languages: row.try_get("languages")?,
            certifications: row.try_get("certifications")?,
            github: row.try_get("github")?,
            linkedin: row.try_get("linkedin")?,
            projects_json: row.try_get("projects_json")?,
            work_history_json: row.try_get("work_history_json")?,
        },
        updated_at: row.try_get("updated_at")?,
    })
}

fn application_from_row(row: &PgRow) -> Result<Application, PostgresError> {
    Ok(Application {
        id: row.try_get("id")?,
        company_name: row.try_get("company_name")?,
        role_title: row.try_get("role_title")?,
        status: row.try_get("status")?,
        applied_date: row.try_get("applied_date")?,
        job_link: row.try_get("job_link")?,
    })
}

/// Mean quiz percentage from the average score and average question count,
/// rounded to one decimal
pub fn average_percentage(avg_score: Option<f64>, avg_total: Option<f64>) -> f64 {
    match (avg_score, avg_total) {
        (Some(score), Some(total)) if total > 0.0 => (score / total * 1000.0).round() / 10.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_percentage() {
        assert_eq!(average_percentage(Some(3.0), Some(4.0)), 75.0);
        assert_eq!(average_percentage(Some(2.0), Some(3.0)), 66.7);
        assert_eq!(average_percentage(None, None), 0.0);
        assert_eq!(average_percentage(Some(1.0), Some(0.0)), 0.0);
    }

    #[test]
    fn test_dashboard_stats_serialization() {
        let stats = DashboardStats {
            recent_activity: vec![Activity {
                title: "Acme".to_string(),
                subtitle: "Data Intern".to_string(),
                date: Utc::now(),
                kind: "Application".to_string(),
            }],
            ..Default::default()
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["applications"]["total"], 0);
        assert_eq!(json["learning"]["avg_quiz_score"], 0.0);
        assert_eq!(json["recent_activity"][0]["type"], "Application");
    }

    #[test]
    fn test_stored_profile_flattens_fields() {
        let stored = StoredProfile {
            user_id: 7,
            profile: CandidateProfile {
                skills: vec!["python".to_string()],
                ..Default::default()
            },
            details: ProfileDetails {
                github: Some("octocat".to_string()),
                ..Default::default()
            },
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["skills"][0], "python");
        assert_eq!(json["github"], "octocat");
        assert_eq!(json["user_id"], 7);
    }
}
