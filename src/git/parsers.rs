//! Git output parsers

/// First line of command output with any line terminator removed
///
/// Empty output yields an empty string.
pub fn first_line(output: &str) -> String {
    output
        .lines()
        .next()
        .map(|line| line.trim_end_matches('\r').to_string())
        .unwrap_or_default()
}

/// All non-blank lines of command output, in order
pub fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
