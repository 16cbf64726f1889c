//! Parsers for `openssl speed` output
//!
//! Both parsers locate the final result table in the raw output, so the
//! progress chatter printed before it (and the per-child lines of a
//! `-multi` run) never matches.

/// Bytes per megabyte used for the normalized throughput unit
const BYTES_PER_MB: f64 = 1_000_000.0;

/// Extract the throughput for `block_size` in MB/s.
///
/// Reads the `type 16 bytes 64 bytes ...` header to find the column,
/// then the last row whose trailing fields are all throughput figures
/// such as `1563148.29k` (thousands of bytes per second).
pub fn parse_mb_s(output: &str, block_size: u32) -> Option<f64> {
    let lines: Vec<&str> = output.lines().collect();
    let header_idx = lines.iter().rposition(|line| {
        line.trim_start().starts_with("type") && line.contains(" bytes")
    })?;

    let sizes = header_sizes(lines[header_idx]);
    let column = sizes.iter().position(|&size| size == block_size)?;

    lines[header_idx + 1..]
        .iter()
        .filter_map(|line| throughput_fields(line, sizes.len()))
        .last()
        .map(|fields| fields[column] / BYTES_PER_MB)
}

/// Extract operations per second for `op` (`sign`, `verify`, ...) from
/// the result row containing `row_keyword` (`dsa`, `rsa`, `ecdsa`).
pub fn parse_dsa_ops(output: &str, op: &str, row_keyword: &str) -> Option<f64> {
    let wanted = format!("{}/s", op);
    let mut rate_columns: Option<Vec<&str>> = None;
    let mut found = None;

    for line in output.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.iter().any(|t| t.ends_with("/s")) && !tokens.contains(&"bits") {
            rate_columns = Some(tokens.into_iter().filter(|t| t.ends_with("/s")).collect());
            continue;
        }

        let Some(columns) = &rate_columns else {
            continue;
        };

        let is_row = tokens.contains(&"bits")
            && tokens.iter().any(|t| t.eq_ignore_ascii_case(row_keyword));
        if !is_row {
            continue;
        }

        let Some(column) = columns.iter().position(|c| *c == wanted) else {
            continue;
        };

        let rates = trailing_numbers(&tokens);
        if rates.len() < columns.len() {
            continue;
        }
        let offset = rates.len() - columns.len();
        found = Some(rates[offset + column]);
    }

    found
}

/// Buffer sizes announced in a throughput header line
fn header_sizes(header: &str) -> Vec<u32> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    tokens
        .windows(2)
        .filter(|pair| pair[1] == "bytes")
        .filter_map(|pair| pair[0].parse().ok())
        .collect()
}

/// Trailing `count` throughput fields in bytes/s, if the row has them
fn throughput_fields(line: &str, count: usize) -> Option<Vec<f64>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if count == 0 || tokens.len() <= count {
        return None;
    }
    tokens[tokens.len() - count..]
        .iter()
        .map(|token| parse_suffixed(token))
        .collect()
}

/// Parse `123.45k` style figures into bytes per second
fn parse_suffixed(token: &str) -> Option<f64> {
    let (number, multiplier) = match token.chars().last()? {
        'k' => (&token[..token.len() - 1], 1e3),
        'M' => (&token[..token.len() - 1], 1e6),
        'G' => (&token[..token.len() - 1], 1e9),
        _ => (token, 1.0),
    };
    let value: f64 = number.parse().ok()?;
    value.is_finite().then_some(value * multiplier)
}

/// The run of plain numbers at the end of a row, in order
fn trailing_numbers(tokens: &[&str]) -> Vec<f64> {
    let mut numbers: Vec<f64> = tokens
        .iter()
        .rev()
        .map_while(|t| t.parse::<f64>().ok())
        .collect();
    numbers.reverse();
    numbers
}
