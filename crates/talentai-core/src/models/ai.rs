//! Request and response payloads for the AI feature endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::string_or_number;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum CoverLetterTone {
    #[default]
    Professional,
    Enthusiastic,
    Concise,
}

impl std::str::FromStr for CoverLetterTone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "professional" => Ok(CoverLetterTone::Professional),
            "enthusiastic" => Ok(CoverLetterTone::Enthusiastic),
            "concise" => Ok(CoverLetterTone::Concise),
            other => Err(format!("Unknown tone: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CoverLetterRequest {
    pub job_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<CoverLetterTone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_points: Option<Vec<String>>,
}

impl CoverLetterRequest {
    pub fn new(job_id: i64) -> Self {
        Self {
            job_id,
            tone: None,
            custom_points: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CoverLetter {
    pub cover_letter: String,
    #[serde(default)]
    pub key_points_highlighted: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub word_count: u32,
    pub tone_used: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ResumeAnalysisRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_job_id: Option<i64>,
}

/// Applicant-tracking-system compatibility breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct AtsScore {
    pub overall_score: i64,
    pub formatting_score: i64,
    pub content_score: i64,
    pub keyword_score: i64,
    pub issues: Vec<String>,
    pub strengths: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct ResumeAnalysis {
    pub overall_quality_score: i64,
    pub ats_compatibility: AtsScore,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub suggestions: Vec<Value>,
    pub keyword_optimization: Value,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct KeywordRequest<'a> {
    pub resume_text: &'a str,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct KeywordOptimization {
    pub keyword_match_score: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MatchScore {
    #[serde(deserialize_with = "string_or_number")]
    pub job_id: String,
    pub match_score: f64,
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub match_reasons: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct MonthlyQuota {
    pub cover_letters: u32,
    pub resume_analyses: u32,
    pub remaining_cover_letters: u32,
    pub remaining_analyses: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct AiUsageStats {
    pub cover_letters_generated: u32,
    pub resumes_analyzed: u32,
    pub monthly_quota: MonthlyQuota,
    pub upgrade_available: bool,
    pub current_plan: String,
}
