//! Data models for TalentAI Pro API records.
//!
//! - `User`, `UserRole`: the authenticated account
//! - `Job`, `JobDraft`, `JobQuery`: job postings
//! - `Application`: candidate applications
//! - `CandidateProfile`, `EmployerProfile`: profile records
//! - AI payloads: `CoverLetter`, `ResumeAnalysis`, `KeywordOptimization`, etc.

pub mod ai;
pub mod application;
pub mod id;
pub mod job;
pub mod profile;
pub mod user;

pub use ai::{
    AiUsageStats, AtsScore, CoverLetter, CoverLetterRequest, CoverLetterTone, KeywordOptimization,
    MatchScore, MonthlyQuota, ResumeAnalysis, ResumeAnalysisRequest,
};
pub use application::{Application, ApplicationStatus};
pub use job::{Job, JobDraft, JobQuery, JobStatus};
pub use profile::{CandidateProfile, EmployerProfile};
pub use user::{User, UserRole};
