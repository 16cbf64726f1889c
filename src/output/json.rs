//! JSON output formatter

use serde::Serialize;

/// Print any serializable value as pretty JSON to stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
