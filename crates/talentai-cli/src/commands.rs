//! Command-line parsing and execution.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use talentai_core::models::{
    CoverLetterRequest, CoverLetterTone, JobQuery, JobStatus, ResumeAnalysisRequest, UserRole,
};
use talentai_core::utils::{format_date, truncate_string};
use talentai_core::{resume, ApiClient, Config};

pub const USAGE: &str = "\
Usage: talentai <command> [args]

Account:
  login [email]                      Log in (prompts for password)
  register <email> <employer|candidate>
  logout
  whoami                             Show the logged-in account
  state                              Show the local session state

Jobs and applications:
  jobs [--status S] [--skip N] [--limit N]
  job <id>
  apply <job_id> [cover_letter_file]
  applications [job_id]

Profiles:
  profile                            Candidate profile
  employer-profile

AI features:
  cover-letter <job_id> [--tone T] [--point P]...
  analyze-resume <file> [--job ID]
  optimize-keywords <job_id> <file>
  match <job_id>
  usage

Offline:
  extract-resume <file>              Pull contact details and skills from a text resume
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: Option<String> },
    Register { email: String, role: UserRole },
    Logout,
    Whoami,
    State,
    Jobs { skip: Option<u32>, limit: Option<u32>, status: Option<JobStatus> },
    Job { id: String },
    Apply { job_id: String, cover_letter: Option<PathBuf> },
    Applications { job_id: Option<String> },
    Profile,
    EmployerProfile,
    CoverLetter { job_id: i64, tone: Option<CoverLetterTone>, points: Vec<String> },
    AnalyzeResume { file: PathBuf, job_id: Option<i64> },
    OptimizeKeywords { job_id: i64, file: PathBuf },
    Match { job_id: i64 },
    Usage,
    ExtractResume { file: PathBuf },
    Help,
}

fn parse_num<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {}: {}", what, value))
}

/// Value following a `--flag`.
fn flag_value<'a>(args: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str> {
    args.next()
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn required<'a>(arg: Option<&'a String>, what: &str) -> Result<&'a str> {
    arg.map(String::as_str)
        .ok_or_else(|| anyhow!("Missing {}\n\n{}", what, USAGE))
}

impl Command {
    /// Parse arguments following the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };

        let command = match name.as_str() {
            "login" => Command::Login { email: rest.first().cloned() },
            "register" => Command::Register {
                email: required(rest.first(), "email")?.to_string(),
                role: required(rest.get(1), "role")?
                    .parse()
                    .map_err(|e: String| anyhow!(e))?,
            },
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "state" => Command::State,
            "jobs" => {
                let (mut skip, mut limit, mut status) = (None, None, None);
                let mut iter = rest.iter();
                while let Some(arg) = iter.next() {
                    match arg.as_str() {
                        "--skip" => skip = Some(parse_num(flag_value(&mut iter, "--skip")?, "skip")?),
                        "--limit" => limit = Some(parse_num(flag_value(&mut iter, "--limit")?, "limit")?),
                        "--status" => {
                            status = Some(
                                flag_value(&mut iter, "--status")?
                                    .parse()
                                    .map_err(|e: String| anyhow!(e))?,
                            )
                        }
                        other => bail!("Unknown option for jobs: {}", other),
                    }
                }
                Command::Jobs { skip, limit, status }
            }
            "job" => Command::Job { id: required(rest.first(), "job id")?.to_string() },
            "apply" => Command::Apply {
                job_id: required(rest.first(), "job id")?.to_string(),
                cover_letter: rest.get(1).map(PathBuf::from),
            },
            "applications" => Command::Applications { job_id: rest.first().cloned() },
            "profile" => Command::Profile,
            "employer-profile" => Command::EmployerProfile,
            "cover-letter" => {
                let job_id = parse_num(required(rest.first(), "job id")?, "job id")?;
                let (mut tone, mut points) = (None, Vec::new());
                let mut iter = rest.iter().skip(1);
                while let Some(arg) = iter.next() {
                    match arg.as_str() {
                        "--tone" => {
                            tone = Some(
                                flag_value(&mut iter, "--tone")?
                                    .parse()
                                    .map_err(|e: String| anyhow!(e))?,
                            )
                        }
                        "--point" => points.push(flag_value(&mut iter, "--point")?.to_string()),
                        other => bail!("Unknown option for cover-letter: {}", other),
                    }
                }
                Command::CoverLetter { job_id, tone, points }
            }
            "analyze-resume" => {
                let file = PathBuf::from(required(rest.first(), "resume file")?);
                let mut job_id = None;
                let mut iter = rest.iter().skip(1);
                while let Some(arg) = iter.next() {
                    match arg.as_str() {
                        "--job" => job_id = Some(parse_num(flag_value(&mut iter, "--job")?, "job id")?),
                        other => bail!("Unknown option for analyze-resume: {}", other),
                    }
                }
                Command::AnalyzeResume { file, job_id }
            }
            "optimize-keywords" => Command::OptimizeKeywords {
                job_id: parse_num(required(rest.first(), "job id")?, "job id")?,
                file: PathBuf::from(required(rest.get(1), "resume file")?),
            },
            "match" => Command::Match {
                job_id: parse_num(required(rest.first(), "job id")?, "job id")?,
            },
            "usage" => Command::Usage,
            "extract-resume" => Command::ExtractResume {
                file: PathBuf::from(required(rest.first(), "resume file")?),
            },
            "help" | "--help" | "-h" => Command::Help,
            other => bail!("Unknown command: {}\n\n{}", other, USAGE),
        };
        Ok(command)
    }

    /// Whether the command talks to the backend.
    pub fn needs_client(&self) -> bool {
        !matches!(self, Command::Help | Command::ExtractResume { .. })
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_text(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn run(command: Command, client: &ApiClient, config: &mut Config) -> Result<()> {
    match command {
        Command::Login { email } => {
            let email = match email.or_else(|| config.last_email.clone()) {
                Some(email) => email,
                None => bail!("Missing email\n\n{}", USAGE),
            };
            let password = rpassword::prompt_password("Password: ")?;
            client.login(&email, &password).await?;
            config.last_email = Some(email.clone());
            config.save().context("Failed to save config")?;
            eprintln!("Logged in as {}", email);
        }
        Command::Register { email, role } => {
            let password = rpassword::prompt_password("Choose a password: ")?;
            let user = client.register(&email, &password, role).await?;
            print_json(&user)?;
        }
        Command::Logout => {
            client.logout();
            eprintln!("Logged out");
        }
        Command::Whoami => print_json(&client.current_user().await?)?,
        Command::State => println!("{:?}", client.session_state()),
        Command::Jobs { skip, limit, status } => {
            let jobs = client.list_jobs(JobQuery { skip, limit, status }).await?;
            for job in &jobs {
                println!(
                    "{:<38} {:<40} {:<9} {:<24} {}",
                    job.id,
                    truncate_string(&job.title, 40),
                    job.status.map(|s| s.as_str()).unwrap_or("-"),
                    job.salary_display().unwrap_or_else(|| "-".into()),
                    job.posted_at
                        .as_deref()
                        .or(job.created_at.as_deref())
                        .map(format_date)
                        .unwrap_or_default(),
                );
            }
            eprintln!("{} job(s)", jobs.len());
        }
        Command::Job { id } => print_json(&client.get_job(&id).await?)?,
        Command::Apply { job_id, cover_letter } => {
            let letter = cover_letter.as_ref().map(read_text).transpose()?;
            let application = client.create_application(&job_id, letter.as_deref()).await?;
            print_json(&application)?;
        }
        Command::Applications { job_id } => {
            print_json(&client.list_applications(job_id.as_deref()).await?)?
        }
        Command::Profile => print_json(&client.candidate_profile().await?)?,
        Command::EmployerProfile => print_json(&client.employer_profile().await?)?,
        Command::CoverLetter { job_id, tone, points } => {
            let request = CoverLetterRequest {
                job_id,
                tone,
                custom_points: if points.is_empty() { None } else { Some(points) },
            };
            let letter = client.generate_cover_letter(&request).await?;
            println!("{}\n", letter.cover_letter);
            eprintln!("{} words", letter.word_count);
            for suggestion in &letter.suggestions {
                eprintln!("  - {}", suggestion);
            }
        }
        Command::AnalyzeResume { file, job_id } => {
            let request = ResumeAnalysisRequest {
                resume_text: Some(read_text(&file)?),
                target_job_id: job_id,
            };
            print_json(&client.analyze_resume(&request).await?)?;
        }
        Command::OptimizeKeywords { job_id, file } => {
            let text = read_text(&file)?;
            print_json(&client.optimize_keywords(job_id, &text).await?)?;
        }
        Command::Match { job_id } => print_json(&client.match_score(job_id).await?)?,
        Command::Usage => print_json(&client.ai_usage_stats().await?)?,
        Command::ExtractResume { file } => print_json(&resume::extract_fields(&read_text(&file)?))?,
        Command::Help => print!("{}", USAGE),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_jobs_flags() {
        let cmd = Command::parse(&args(&["jobs", "--status", "active", "--limit", "5"])).unwrap();
        assert_eq!(
            cmd,
            Command::Jobs { skip: None, limit: Some(5), status: Some(JobStatus::Active) }
        );
    }

    #[test]
    fn test_parse_cover_letter() {
        let cmd = Command::parse(&args(&[
            "cover-letter", "12", "--tone", "concise", "--point", "Shipped v2", "--point", "On call lead",
        ]))
        .unwrap();
        assert_eq!(
            cmd,
            Command::CoverLetter {
                job_id: 12,
                tone: Some(CoverLetterTone::Concise),
                points: vec!["Shipped v2".into(), "On call lead".into()],
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse(&args(&["match", "abc"])).is_err());
        assert!(Command::parse(&args(&["jobs", "--limit"])).is_err());
        assert!(Command::parse(&args(&["register", "a@b.com", "recruiter"])).is_err());
        assert!(Command::parse(&args(&["frobnicate"])).is_err());
    }

    #[test]
    fn test_help_and_offline_commands() {
        assert_eq!(Command::parse(&[]).unwrap(), Command::Help);
        let cmd = Command::parse(&args(&["extract-resume", "cv.txt"])).unwrap();
        assert!(!cmd.needs_client());
        assert!(Command::parse(&args(&["logout"])).unwrap().needs_client());
    }
}
