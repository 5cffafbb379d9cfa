//! focus-check binary entry point.
//!
//! An interactive terminal questionnaire: answers are edited with short
//! commands, a diagnosis is an explicit action, and the result card is
//! rendered from the presenter's descriptors. Logs go to stderr so the
//! questionnaire output stays clean.

use std::io::{BufRead, Write};

use focus_check::client::{ClientConfig, DiagnosisClient};
use focus_check::config::Config;
use focus_check::error::ScreenError;
use focus_check::evidence::{AnswerValue, EvidenceStore};
use focus_check::presenter::{
    improvement_rows, DiagnosisScreen, FeedbackState, ScoreDisplay, ScreenState,
};
use focus_check::schema::{InputKind, Schema};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Configuration loaded: base_url={}, timeout={}ms",
        config.base_url,
        config.request_timeout_ms
    );

    let client = match DiagnosisClient::new(ClientConfig::from(&config)) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Client error: {e}");
            std::process::exit(1);
        }
    };

    let schema = Schema::builtin();
    let mut screen = DiagnosisScreen::new(client, EvidenceStore::new(schema));

    println!("focus-check — concentration risk diagnosis");
    print_help();
    print_questions(&screen);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Input error: {e}");
                break;
            }
        }

        match run_command(&mut screen, line.trim()).await {
            Flow::Continue => {}
            Flow::Quit => break,
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

async fn run_command(screen: &mut DiagnosisScreen<DiagnosisClient>, line: &str) -> Flow {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None | Some("h" | "help") => {
            print_help();
            print_questions(screen);
        }
        Some("t" | "toggle") => {
            if let Some(id) = resolve_question(screen, parts.next()) {
                match screen.evidence_mut().toggle(&id) {
                    Ok(value) => println!("  {id} -> {value}"),
                    Err(e) => println!("  {e}"),
                }
            }
        }
        Some("s" | "set") => {
            let id = resolve_question(screen, parts.next());
            let value = parts.next().and_then(|v| v.parse::<f64>().ok());
            match (id, value) {
                (Some(id), Some(value)) => {
                    match screen.evidence_mut().set(&id, AnswerValue::Number(value)) {
                        Ok(()) => println!("  {id} -> {value}"),
                        Err(e) => println!("  {e}"),
                    }
                }
                _ => println!("  usage: set <question#> <value>"),
            }
        }
        Some("d" | "diagnose") => {
            println!("  running inference...");
            match screen.diagnose().await {
                Ok(()) => print_result(screen),
                Err(ScreenError::Busy) => println!("  a diagnosis is already in flight"),
                Err(e) => println!("  {e}"),
            }
        }
        Some("f" | "feedback") => {
            let is_correct = match parts.next() {
                Some("y" | "yes") => true,
                Some("n" | "no") => false,
                _ => {
                    println!("  usage: feedback y|n");
                    return Flow::Continue;
                }
            };
            match screen.send_feedback(is_correct).await {
                Ok(()) => match screen.state() {
                    ScreenState::Success {
                        feedback: FeedbackState::Sent,
                        ..
                    } => println!("  thanks, feedback recorded"),
                    _ => println!("  feedback could not be delivered, try again later"),
                },
                Err(e) => println!("  {e}"),
            }
        }
        Some("r" | "reset") => {
            screen.evidence_mut().reset();
            print_questions(screen);
        }
        Some("q" | "quit" | "exit") => return Flow::Quit,
        Some(other) => println!("  unknown command: {other} (try 'help')"),
    }
    Flow::Continue
}

/// Map a 1-based question number to its id.
fn resolve_question(
    screen: &DiagnosisScreen<DiagnosisClient>,
    arg: Option<&str>,
) -> Option<String> {
    let index: usize = match arg.and_then(|a| a.parse().ok()) {
        Some(n) if n >= 1 => n,
        _ => {
            println!("  expected a question number (see 'help')");
            return None;
        }
    };
    let question = screen.evidence().schema().iter().nth(index - 1);
    match question {
        Some(q) => Some(q.id.clone()),
        None => {
            println!("  no question #{index}");
            None
        }
    }
}

fn print_help() {
    println!();
    println!("commands:");
    println!("  t <n>        toggle question n");
    println!("  s <n> <v>    set slider question n to v");
    println!("  d            run the diagnosis");
    println!("  f y|n        was the diagnosis correct?");
    println!("  r            reset all answers");
    println!("  q            quit");
}

fn print_questions(screen: &DiagnosisScreen<DiagnosisClient>) {
    println!();
    for (index, question) in screen.evidence().schema().iter().enumerate() {
        let current = screen.evidence().get(&question.id);
        let rendered = match (&question.input_kind, current) {
            (InputKind::Toggle, Some(AnswerValue::Bool(true))) => "[x]".to_string(),
            (InputKind::Toggle, _) => "[ ]".to_string(),
            (InputKind::Slider { min, max, .. }, Some(AnswerValue::Number(n))) => {
                format!("[{n} of {min}..{max}]")
            }
            (InputKind::Slider { .. }, _) => "[?]".to_string(),
        };
        println!(
            "  {}. {} {}  — {}",
            index + 1,
            rendered,
            question.label,
            question.sub_label
        );
    }
    println!();
}

fn print_result(screen: &DiagnosisScreen<DiagnosisClient>) {
    match screen.state() {
        ScreenState::Success { response, .. } => {
            let style = response.risk_level.style();
            let display = ScoreDisplay::from_score(response.risk_score);
            let filled = (display.bar_width_percent / 5.0).round() as usize;

            println!();
            println!("  estimated concentration-drop probability: {}", display.percent_text);
            println!("  [{}{}]", "#".repeat(filled), "-".repeat(20 - filled.min(20)));
            println!("  verdict: {} ({})", style.label, style.icon);
            if !response.advice.is_empty() {
                println!("  advice: {}", response.advice);
            }
            let rows = improvement_rows(&response.improvements);
            if !rows.is_empty() {
                println!("  what would help most:");
                for row in rows {
                    println!("    {} {} — {}", row.delta_text, row.factor, row.advice);
                }
            }
            println!("  was this diagnosis correct? (f y / f n)");
            println!();
        }
        ScreenState::Failed { error } => {
            println!("  diagnosis failed: {error}");
            println!("  check that the inference service is running, then try again");
        }
        ScreenState::Idle | ScreenState::Loading => {}
    }
}
