use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use interview_core::Clock;
use interview_core::model::{
    AudioPayload, CodeSubmission, ProblemId, SessionId, SessionKind, VisibilitySignal,
};
use services::{AppServices, StubCamera};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidAnswer { raw: String },
    InvalidSessionId { raw: String },
    MissingSessionId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAnswer { raw } => write!(f, "invalid --answer value: {raw}"),
            ArgsError::InvalidSessionId { raw } => write!(f, "invalid --session value: {raw}"),
            ArgsError::MissingSessionId => write!(f, "feedback requires --session <id>"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  interview login    [--token <token>]");
    eprintln!("  interview analyze  [--jd <text>] [--resume <path>]");
    eprintln!("  interview tech     [--answer <index>] [--blur-toggles <n>]");
    eprintln!("  interview hr       [--transcript <text>]");
    eprintln!("  interview feedback --session <id>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_API_BASE   backend base URL (default http://localhost:8000)");
    eprintln!("  RUST_LOG             tracing filter (e.g. services=debug)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Login,
    Analyze,
    Tech,
    Hr,
    Feedback,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "login" => Some(Self::Login),
            "analyze" => Some(Self::Analyze),
            "tech" => Some(Self::Tech),
            "hr" => Some(Self::Hr),
            "feedback" => Some(Self::Feedback),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    token: String,
    jd_text: Option<String>,
    resume_path: Option<String>,
    answer: usize,
    blur_toggles: u32,
    transcript: Option<String>,
    session_id: Option<SessionId>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--token" => parsed.token = require_value(args, "--token")?,
                "--jd" => parsed.jd_text = Some(require_value(args, "--jd")?),
                "--resume" => parsed.resume_path = Some(require_value(args, "--resume")?),
                "--answer" => {
                    let value = require_value(args, "--answer")?;
                    parsed.answer = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidAnswer { raw: value.clone() })?;
                }
                "--blur-toggles" => {
                    let value = require_value(args, "--blur-toggles")?;
                    parsed.blur_toggles = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidAnswer { raw: value.clone() })?;
                }
                "--transcript" => parsed.transcript = Some(require_value(args, "--transcript")?),
                "--session" => {
                    let value = require_value(args, "--session")?;
                    let id = SessionId::from_str(&value)
                        .map_err(|_| ArgsError::InvalidSessionId { raw: value.clone() })?;
                    parsed.session_id = Some(id);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

async fn run_login(services: &AppServices, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let authed = services.auth().login(&args.token).await?;
    println!("{}", serde_json::to_string_pretty(&authed.user)?);
    Ok(())
}

async fn run_analyze(
    services: &AppServices,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let jd_text = args
        .jd_text
        .clone()
        .unwrap_or_else(|| "Backend developer: Python + SQL".to_owned());
    let (resume_bytes, file_name) = match &args.resume_path {
        Some(path) => (std::fs::read(path)?, path.clone()),
        None => (b"python, sql".to_vec(), "resume.txt".to_owned()),
    };

    let outcome = services
        .analyze()
        .analyze(&jd_text, resume_bytes, &file_name)
        .await?;
    println!("match score: {:.2}", outcome.result.score);
    for skill in &outcome.result.skills {
        println!("  {}: {}", skill.name, skill.level);
    }
    if !outcome.result.gaps.is_empty() {
        println!("gaps: {}", outcome.result.gaps.join(", "));
    }
    Ok(())
}

/// Sends n blur/focus pairs through the emitter so a dev backend shows a
/// non-empty integrity trail.
async fn simulate_toggles(tx: &mpsc::Sender<VisibilitySignal>, pairs: u32) {
    for _ in 0..pairs {
        if tx.send(VisibilitySignal::Hidden).await.is_err() {
            return;
        }
        if tx.send(VisibilitySignal::Visible).await.is_err() {
            return;
        }
    }
}

async fn run_tech(services: &AppServices, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut sessions = services.session_client();
    let session_id = sessions
        .start(SessionKind::Tech)
        .await?
        .id()
        .clone();
    info!(session = %session_id, "tech session started");

    // No camera path in a terminal: the probe reports webcam_off, which is
    // exactly what the integrity trail should say.
    let (tx, rx) = mpsc::channel(16);
    let handle = services
        .proctor_emitter()
        .start(session_id.clone(), rx, Arc::new(StubCamera::denied()));
    simulate_toggles(&tx, args.blur_toggles).await;

    let mut flow = services.question_flow();
    let mut question = Some(flow.fetch_next(&session_id).await?.clone());
    while let Some(q) = question {
        let (position, total) = q.display_position();
        println!("Q{position}/{total}: {}", q.question);
        for (i, option) in q.options.iter().enumerate() {
            println!("  [{i}] {option}");
        }
        let advance = flow.submit(&session_id, args.answer).await?;
        println!(
            "  -> {} (score {})",
            if advance.result.correct {
                "correct"
            } else {
                "incorrect"
            },
            advance.result.total_score
        );
        question = advance.next;
    }
    println!("MCQ round complete.");

    let code_result = services
        .submission_pipeline()
        .run_code(&CodeSubmission {
            problem_id: ProblemId::new("sum_two"),
            language: "python".to_owned(),
            source: "def solve(a,b):\n    return a+b".to_owned(),
        })
        .await?;
    println!("code run: {}", serde_json::to_string_pretty(&code_result)?);

    drop(tx);
    handle.cancel();
    handle.join().await;
    let ended = sessions.end()?;
    println!("session ended: {}", ended.id());
    println!("fetch results later with: interview feedback --session {}", ended.id());
    Ok(())
}

async fn run_hr(services: &AppServices, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut sessions = services.session_client();
    let session_id = sessions.start(SessionKind::Hr).await?.id().clone();
    info!(session = %session_id, "hr session started");

    let (tx, rx) = mpsc::channel(16);
    let handle = services
        .proctor_emitter()
        .start(session_id.clone(), rx, Arc::new(StubCamera::denied()));

    let pipeline = services.submission_pipeline();
    let question = pipeline.next_hr_question(&session_id).await?;
    println!("Question: {}", question.question);

    let transcript = args.transcript.clone().unwrap_or_default();
    let review = pipeline
        .submit_hr_answer(&session_id, &AudioPayload::placeholder(), &transcript)
        .await?;
    println!("transcript: {}", review.transcript);
    println!("metrics: {}", serde_json::to_string_pretty(&review.metrics)?);

    drop(tx);
    handle.cancel();
    handle.join().await;
    let ended = sessions.end()?;
    println!("session ended: {}", ended.id());
    Ok(())
}

async fn run_feedback(
    services: &AppServices,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let session_id = args
        .session_id
        .clone()
        .ok_or(ArgsError::MissingSessionId)?;
    let feedback = services.feedback_aggregator().fetch(&session_id).await;

    match feedback.report {
        Ok(report) => {
            println!("summary: {}", report.summary);
            println!("scores: {}", serde_json::to_string_pretty(&report.scores)?);
        }
        Err(err) => println!("feedback unavailable: {err}"),
    }
    match feedback.flags {
        Ok(flags) => {
            println!(
                "proctoring: hard_flag={} tab_blur_count={}",
                flags.hard_flag, flags.soft_flag_count
            );
            for event in &flags.events {
                println!("  event: {}", event.kind);
            }
        }
        Err(err) => println!("proctor flags unavailable: {err}"),
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    argv.remove(0);

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let services = AppServices::from_env(Clock::default_clock());

    match cmd {
        Command::Login => run_login(&services, &args).await,
        Command::Analyze => run_analyze(&services, &args).await,
        Command::Tech => run_tech(&services, &args).await,
        Command::Hr => run_hr(&services, &args).await,
        Command::Feedback => run_feedback(&services, &args).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
