//! Typed wrappers for each backend endpoint.
//!
//! All of these go through `ApiClient::send` and so share its token
//! refresh and retry behaviour; none add error handling of their own.

use serde::Serialize;

use crate::models::ai::KeywordRequest;
use crate::models::application::NewApplication;
use crate::models::{
    AiUsageStats, Application, CandidateProfile, CoverLetter, CoverLetterRequest, EmployerProfile,
    Job, JobDraft, JobQuery, KeywordOptimization, MatchScore, ResumeAnalysis,
    ResumeAnalysisRequest, User,
};

use super::{ApiClient, ApiError, ApiRequest};

/// Validate an id before placing it in a URL path.
fn path_segment(id: &str) -> Result<&str, ApiError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(ApiError::InvalidRequest(format!("Invalid id: {:?}", id)))
    }
}

impl ApiClient {
    // ===== Account =====

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    // ===== Jobs =====

    pub async fn list_jobs(&self, query: JobQuery) -> Result<Vec<Job>, ApiError> {
        let request = ApiRequest::get("/jobs")
            .query("skip", query.skip)
            .query("limit", query.limit)
            .query("status", query.status);
        self.send_json(&request).await
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job, ApiError> {
        self.get(&format!("/jobs/{}", path_segment(job_id)?)).await
    }

    pub async fn create_job(&self, job: &JobDraft) -> Result<Job, ApiError> {
        self.post("/jobs", job).await
    }

    pub async fn update_job(&self, job_id: &str, job: &JobDraft) -> Result<Job, ApiError> {
        self.put(&format!("/jobs/{}", path_segment(job_id)?), job).await
    }

    pub async fn delete_job(&self, job_id: &str) -> Result<(), ApiError> {
        let request = ApiRequest::delete(format!("/jobs/{}", path_segment(job_id)?));
        self.send(&request).await?;
        Ok(())
    }

    // ===== Applications =====

    /// List applications, optionally only those for one job.
    pub async fn list_applications(&self, job_id: Option<&str>) -> Result<Vec<Application>, ApiError> {
        let request = ApiRequest::get("/applications").query("job_id", job_id);
        self.send_json(&request).await
    }

    pub async fn create_application(
        &self,
        job_id: &str,
        cover_letter: Option<&str>,
    ) -> Result<Application, ApiError> {
        self.post(
            "/applications",
            &NewApplication {
                job_id,
                cover_letter,
            },
        )
        .await
    }

    // ===== Profiles =====

    pub async fn candidate_profile(&self) -> Result<CandidateProfile, ApiError> {
        self.get("/candidates/me").await
    }

    pub async fn update_candidate_profile<P: Serialize + ?Sized>(
        &self,
        profile: &P,
    ) -> Result<CandidateProfile, ApiError> {
        self.put("/candidates/me", profile).await
    }

    pub async fn employer_profile(&self) -> Result<EmployerProfile, ApiError> {
        self.get("/employers/me").await
    }

    pub async fn update_employer_profile<P: Serialize + ?Sized>(
        &self,
        profile: &P,
    ) -> Result<EmployerProfile, ApiError> {
        self.put("/employers/me", profile).await
    }

    // ===== AI Features =====

    pub async fn generate_cover_letter(
        &self,
        request: &CoverLetterRequest,
    ) -> Result<CoverLetter, ApiError> {
        self.post("/ai/generate-cover-letter", request).await
    }

    pub async fn analyze_resume(
        &self,
        request: &ResumeAnalysisRequest,
    ) -> Result<ResumeAnalysis, ApiError> {
        self.post("/ai/analyze-resume", request).await
    }

    /// Keyword suggestions for tailoring a resume to one job.
    pub async fn optimize_keywords(
        &self,
        job_id: i64,
        resume_text: &str,
    ) -> Result<KeywordOptimization, ApiError> {
        let request = ApiRequest::post("/ai/optimize-keywords")
            .query("job_id", Some(job_id))
            .json(&KeywordRequest { resume_text })?;
        self.send_json(&request).await
    }

    pub async fn ai_usage_stats(&self) -> Result<AiUsageStats, ApiError> {
        self.get("/ai/usage-stats").await
    }

    pub async fn match_score(&self, job_id: i64) -> Result<MatchScore, ApiError> {
        self.get(&format!("/ai/match-score/{}", job_id)).await
    }
}
