use std::io::{self, BufRead, Write};

use eyre::Result;

pub fn bold(text: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", text)
}

pub fn green(text: &str) -> String {
    format!("\x1b[32m{}\x1b[0m", text)
}

pub fn red(text: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", text)
}

pub fn yellow(text: &str) -> String {
    format!("\x1b[33m{}\x1b[0m", text)
}

pub fn dim(text: &str) -> String {
    format!("\x1b[2m{}\x1b[0m", text)
}

pub fn print_header(header: &str) {
    let lines = header.split('\n').collect::<Vec<_>>();
    let width = lines
        .iter()
        .map(|line| visible_len(line))
        .max()
        .unwrap_or(0)
        + 4;
    let w = term_size::dimensions().map_or(width, |(w, _)| w.max(width));

    let horizontal_border = "─".repeat(w - 2);
    println!("┌{}┐", horizontal_border);
    for line in lines {
        let line_padding = w - visible_len(line) - 4;
        println!("│ {}{} │", line, " ".repeat(line_padding));
    }
    println!("└{}┘", horizontal_border);
}

fn visible_len(line: &str) -> usize {
    strip_ansi_escapes::strip(line)
        .map(|bytes| String::from_utf8_lossy(&bytes).chars().count())
        .unwrap_or_else(|_| line.chars().count())
}

/// Print `label` and read one trimmed line from stdin. An empty answer yields `default`, if any.
pub fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(default) => print!("{} [{}]: ", label, default),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    answer(label, &input, default)
}

/// Like [`prompt`] without a default, but the typed text is not echoed.
pub fn prompt_secret(label: &str) -> Result<String> {
    let input = rpassword::prompt_password(format!("{}: ", label))?;
    answer(label, &input, None)
}

fn answer(label: &str, input: &str, default: Option<&str>) -> Result<String> {
    let input = input.trim();
    match (input.is_empty(), default) {
        (true, Some(default)) => Ok(default.to_string()),
        (true, None) => eyre::bail!("{} is required", label),
        (false, _) => Ok(input.to_string()),
    }
}

pub fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub fn exit_with_error<T>(e: eyre::Error) -> T {
    eprintln!("{:?}", e);
    std::process::exit(1);
}
