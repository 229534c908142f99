use colored::*;
use console::Term;
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::{ wrap, Options };

use veritas::models::transition_system::Edge;
use veritas::models::verification::VerificationStatus;

fn terminal_width() -> usize {
    let (_, cols) = Term::stdout().size();
    (cols as usize).clamp(40, 120)
}

fn tagged(tag: ColoredString, message: &str) -> String {
    format!("{} {}", tag, message)
}

/// Section title followed by a rule across the terminal
pub fn print_header(title: &str) {
    let width = terminal_width();
    println!();
    println!("{}", title.to_uppercase().bold().cyan());
    println!("{}", "─".repeat(width.min(title.len().max(50))).dimmed());
}

/// Wrap free text to the terminal, indenting continuation lines.
/// Lines of the summary table are printed as is.
pub fn print_text(text: &str) {
    let options = Options::new(terminal_width() - 4).subsequent_indent("    ");
    for line in text.lines() {
        if line.starts_with(' ') || line.starts_with('=') {
            println!("{}", line);
            continue;
        }
        for wrapped in wrap(line, &options) {
            println!("{}", wrapped);
        }
    }
}

pub fn print_error(message: &str) {
    eprintln!("{}", tagged("error:".red().bold(), message));
}

pub fn print_warning(message: &str) {
    println!("{}", tagged("warning:".yellow().bold(), message));
}

pub fn print_success(message: &str) {
    println!("{}", tagged("ok:".green().bold(), message));
}

pub fn print_info(message: &str) {
    println!("{}", tagged("·".blue().bold(), message));
}

/// `label: value` with the label emphasised
pub fn print_result(label: &str, value: &str) {
    println!("{:>14} {}", format!("{}:", label).bold(), value);
}

/// Colour a verdict: green holds, red fails, yellow is inconclusive
pub fn print_verification_status(status: &VerificationStatus) {
    let text = format!("{} {}", status.marker(), status.to_string().to_uppercase());
    let painted = match status {
        VerificationStatus::Satisfied => text.green(),
        VerificationStatus::Violated | VerificationStatus::Error => text.red(),
        VerificationStatus::Unknown | VerificationStatus::Timeout => text.yellow(),
    };
    println!("{:>14} {}", "Result:".bold(), painted.bold());
}

/// Render an edge path as `a -[event]-> b -[event]-> c`
pub fn format_path(path: &[Edge]) -> String {
    match path.first() {
        None => "(initial state)".to_string(),
        Some(first) => {
            let mut rendered = first.from.clone();
            for edge in path {
                rendered.push_str(&format!(" -[{}]-> {}", edge.label, edge.to));
            }
            rendered
        }
    }
}

/// Spinner shown while the state space is explored
pub fn exploration_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        spinner.set_style(style.tick_chars("◐◓◑◒ "));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
