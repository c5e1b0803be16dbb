use builddiff::{
    group::{compile_pattern, group_by_regex},
    present::format_grouped,
};
use eyre::Result;

// Usage: group_log <log file> <pattern> [flags] [key group] [value group]
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (file_path, pattern) = match (args.first(), args.get(1)) {
        (Some(file_path), Some(pattern)) => (file_path, pattern),
        _ => eyre::bail!("usage: group_log <log file> <pattern> [flags] [key group] [value group]"),
    };
    let flags = args.get(2).map(String::as_str).unwrap_or("m");
    let key_group = args.get(3).map(String::as_str).unwrap_or("key");
    let value_group = args.get(4).map(String::as_str).unwrap_or("values");

    let log = std::fs::read_to_string(file_path)?;
    let regex = compile_pattern(pattern, Some(flags))?;
    let grouped = group_by_regex(&log, &regex, key_group, value_group)?;
    print!("{}", format_grouped(&grouped));
    Ok(())
}
