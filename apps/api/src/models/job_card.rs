use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Base resume substituted when a job card is created without one.
pub const DEFAULT_BASE_RESUME: &str = "John Doe
Software Engineer
Email: john.doe@email.com | Phone: (555) 123-4567

EXPERIENCE
Software Developer at Tech Corp (2022-Present)
- Developed web applications using React and Node.js
- Collaborated with cross-functional teams
- Maintained code quality and documentation

Junior Developer at StartupXYZ (2020-2022)
- Built responsive websites
- Worked with databases and APIs
- Participated in agile development processes

EDUCATION
Bachelor of Science in Computer Science
University of Technology (2016-2020)

SKILLS
- JavaScript, React, Node.js
- HTML, CSS, MongoDB
- Git, Agile methodologies";

/// Optimization status of a job card.
///
/// Pending → Optimizing → Optimized, with Optimizing → Pending on failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "Pending Optimization")]
    PendingOptimization,
    #[serde(rename = "Optimizing")]
    Optimizing,
    #[serde(rename = "Optimized")]
    Optimized,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::PendingOptimization => "Pending Optimization",
            JobStatus::Optimizing => "Optimizing",
            JobStatus::Optimized => "Optimized",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending Optimization" => Ok(JobStatus::PendingOptimization),
            "Optimizing" => Ok(JobStatus::Optimizing),
            "Optimized" => Ok(JobStatus::Optimized),
            other => Err(format!("unknown job status '{other}'")),
        }
    }
}

/// A tracked job application paired with its resume content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub id: Uuid,
    pub client_name: String,
    pub company_name: String,
    pub position: String,
    pub job_description: String,
    pub job_link: String,
    pub status: JobStatus,
    pub optimized_on: Option<DateTime<Utc>>,
    pub base_resume: String,
    pub optimized_resume: Option<String>,
    pub changes_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `job_cards` row. Status is stored as its display string.
#[derive(Debug, Clone, FromRow)]
pub struct JobCardRow {
    pub id: Uuid,
    pub client_name: String,
    pub company_name: String,
    pub position: String,
    pub job_description: String,
    pub job_link: String,
    pub status: String,
    pub optimized_on: Option<DateTime<Utc>>,
    pub base_resume: String,
    pub optimized_resume: Option<String>,
    pub changes_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobCardRow> for JobCard {
    type Error = String;

    fn try_from(row: JobCardRow) -> Result<Self, Self::Error> {
        Ok(JobCard {
            id: row.id,
            client_name: row.client_name,
            company_name: row.company_name,
            position: row.position,
            job_description: row.job_description,
            job_link: row.job_link,
            status: row.status.parse()?,
            optimized_on: row.optimized_on,
            base_resume: row.base_resume,
            optimized_resume: row.optimized_resume,
            changes_summary: row.changes_summary,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Validated fields for a new job card.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobCard {
    pub client_name: String,
    pub company_name: String,
    pub position: String,
    pub job_description: String,
    pub job_link: String,
    pub base_resume: String,
}

/// The editable subset of a job card. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCardPatch {
    pub client_name: Option<String>,
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub job_description: Option<String>,
    pub job_link: Option<String>,
    pub base_resume: Option<String>,
}

impl JobCardPatch {
    /// Applies every present field onto `card`.
    pub fn apply_to(&self, card: &mut JobCard) {
        if let Some(v) = &self.client_name {
            card.client_name = v.clone();
        }
        if let Some(v) = &self.company_name {
            card.company_name = v.clone();
        }
        if let Some(v) = &self.position {
            card.position = v.clone();
        }
        if let Some(v) = &self.job_description {
            card.job_description = v.clone();
        }
        if let Some(v) = &self.job_link {
            card.job_link = v.clone();
        }
        if let Some(v) = &self.base_resume {
            card.base_resume = v.clone();
        }
    }
}
