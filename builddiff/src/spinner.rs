use indicatif::ProgressStyle;

const TICK_CHARS: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

pub fn make_spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.yellow.bold} {msg}")
        .unwrap()
        .tick_chars(TICK_CHARS)
}

pub fn make_download_spinner() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.yellow.bold} {msg} {elapsed:.dim}")
        .unwrap()
        .tick_chars(TICK_CHARS)
}
