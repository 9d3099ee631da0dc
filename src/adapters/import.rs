use crate::domain::model::Participant;
use regex::Regex;
use std::sync::OnceLock;

fn pasted_delimiters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\n,;]+").expect("valid delimiter pattern"))
}

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n]+").expect("valid line pattern"))
}

/// Names typed or pasted by hand: separated by newlines, commas or semicolons.
pub fn parse_pasted_names(text: &str) -> Vec<String> {
    pasted_delimiters()
        .split(text)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names from an uploaded file: one per line, optionally wrapped in quotes.
pub fn parse_file_names(text: &str) -> Vec<String> {
    line_breaks()
        .split(text)
        .map(str::trim)
        .map(strip_wrapping_quotes)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_wrapping_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

pub fn participants_from_names<I, S>(names: I) -> Vec<Participant>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Participant::new).collect()
}
