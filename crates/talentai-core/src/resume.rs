//! Quick client-side extraction of contact details and skills from
//! plain-text resumes, used to prefill application forms before the
//! server-side parser runs.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Skills recognised by `extract_fields`, in reporting order.
pub const COMMON_SKILLS: &[&str] = &[
    "JavaScript",
    "Python",
    "Java",
    "React",
    "Node.js",
    "TypeScript",
    "Angular",
    "Vue",
    "Django",
    "Flask",
    "FastAPI",
    "AWS",
    "Docker",
    "Kubernetes",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "Git",
    "CI/CD",
    "Machine Learning",
    "TensorFlow",
    "PyTorch",
    "SQL",
    "NoSQL",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ResumeFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid email regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
            .expect("valid phone regex")
    })
}

/// Extract name, email, phone and known skills from resume text.
///
/// Missing fields are left empty. The name is the first non-blank line.
/// Skills match as case-insensitive substrings, so "JavaScript" also
/// reports "Java".
pub fn extract_fields(text: &str) -> ResumeFields {
    let name = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string();

    let email = email_regex()
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let phone = phone_regex()
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let lowered = text.to_lowercase();
    let skills = COMMON_SKILLS
        .iter()
        .filter(|skill| lowered.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect();

    ResumeFields {
        name,
        email,
        phone,
        skills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\n  Jane Doe  \nSenior Engineer\njane.doe@example.com | +1 555-123-4567\n\nSkills: python, Docker, PostgreSQL, machine learning\n";

    #[test]
    fn test_extract_contact_fields() {
        let fields = extract_fields(RESUME);
        assert_eq!(fields.name, "Jane Doe");
        assert_eq!(fields.email, "jane.doe@example.com");
        assert_eq!(fields.phone, "+1 555-123-4567");
    }

    #[test]
    fn test_extract_skills_in_list_order() {
        let fields = extract_fields(RESUME);
        assert_eq!(
            fields.skills,
            vec!["Python", "Docker", "PostgreSQL", "Machine Learning", "SQL"]
        );
    }

    #[test]
    fn test_substring_skill_matches() {
        let fields = extract_fields("Frontend dev\nJavaScript and GitHub");
        assert_eq!(fields.skills, vec!["JavaScript", "Java", "Git"]);
    }

    #[test]
    fn test_phone_without_country_code() {
        let fields = extract_fields("Call (555) 123-4567 anytime");
        assert_eq!(fields.phone, "(555) 123-4567");
        assert!(fields.email.is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extract_fields("   \n\n"), ResumeFields::default());
    }
}
