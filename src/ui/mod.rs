use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

static QUIET: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);
static INTERRUPTED: LazyLock<Arc<AtomicBool>> =
    LazyLock::new(|| Arc::new(AtomicBool::new(false)));

/// Disable colours when stdout is not a terminal or `NO_COLOR` is set.
pub fn init_colors() {
    if std::env::var_os("NO_COLOR").is_some() || !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    #[cfg(windows)]
    {
        let _ = colored::control::set_virtual_terminal(true);
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn mark_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// The process-wide flag the Ctrl-C handler sets.
pub fn interrupt_flag() -> Arc<AtomicBool> {
    Arc::clone(&INTERRUPTED)
}

#[cfg(test)]
pub(crate) fn reset_interrupted() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn header(title: &str) {
    if quiet() {
        return;
    }
    println!("\n{}", title.bold().underline());
}

pub fn success(msg: &str) {
    if quiet() {
        return;
    }
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn info(msg: &str) {
    if quiet() {
        return;
    }
    println!("{} {}", "ℹ".blue().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Debug trace, printed only with `--verbose`.
pub fn verbose(msg: &str) {
    if !is_verbose() {
        return;
    }
    eprintln!("{} {}", "→".bright_black(), msg.dimmed());
}

pub fn keyval(key: &str, val: &str) {
    if quiet() {
        return;
    }
    println!("{}: {}", key.bold(), val);
}

pub fn indent(msg: &str, level: usize) {
    let spaces = " ".repeat(level * 2);
    println!("{}{}", spaces, msg);
}

/// Outcome line for one item of a batch (restore, tap replay).
pub fn outcome(label: &str, ok: bool, detail: Option<&str>) {
    let mark = if ok { "✓".green() } else { "✗".red() };
    match detail {
        Some(detail) => println!("  {:<40} {} {}", label, mark, detail.dimmed()),
        None => println!("  {:<40} {}", label, mark),
    }
}

/// Ask a yes/no question. Without a terminal on stdin nobody can answer, so
/// the answer is no.
pub fn prompt_yes_no(question: &str) -> bool {
    if !atty::is(atty::Stream::Stdin) {
        warning(&format!(
            "{} (no terminal to answer; assuming no, pass --yes to accept)",
            question
        ));
        return false;
    }

    print!("{} {} [Y/n] ", "?".yellow().bold(), question);

    if let Err(e) = io::stdout().flush() {
        eprintln!("\nWarning: Failed to flush terminal: {}", e);
        return false;
    }

    read_answer(&mut io::stdin().lock())
}

/// Empty line means yes; end of input or a read error means no.
fn read_answer(reader: &mut impl BufRead) -> bool {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => false,
        Ok(_) => {
            let input = input.trim().to_lowercase();
            input.is_empty() || input == "y" || input == "yes"
        }
        Err(e) => {
            eprintln!("\nWarning: Failed to read input: {}", e);
            false
        }
    }
}

/// Width available for a single output line.
pub fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(100)
}

/// Cut `text` so it fits in `max` columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 1 {
        return "…".to_string();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}
