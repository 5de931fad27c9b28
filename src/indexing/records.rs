use crate::core::error::Result;
use std::path::Path;

/// One entry of the symbol names resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    /// Dot-segmented name, e.g. "info.circle.fill"
    pub full_name: String,
    /// Value handed to the clipboard when the symbol is picked
    pub identifier: String,
}

impl SymbolRecord {
    pub fn new(full_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            identifier: identifier.into(),
        }
    }
}

/// Parse one `<fullName>_<identifier>` line.
///
/// The line is split on every underscore: the full name is the first part and
/// the identifier the last, so a line without an underscore maps to itself.
pub fn parse_record(line: &str) -> SymbolRecord {
    let mut parts = line.split('_');
    let first = parts.next().unwrap_or_default();
    let last = parts.last().unwrap_or(first);
    SymbolRecord::new(first, last)
}

/// Parse the whole resource text, ignoring empty lines
pub fn parse_records(text: &str) -> Vec<SymbolRecord> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(parse_record)
        .collect()
}

/// Read and parse the resource file at `path`
pub fn read_records(path: &Path) -> Result<Vec<SymbolRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_records(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_identifier() {
        let record = parse_record("info.circle_circle.info");
        assert_eq!(record.full_name, "info.circle");
        assert_eq!(record.identifier, "circle.info");
    }

    #[test]
    fn test_parse_without_underscore() {
        let record = parse_record("bolt.fill");
        assert_eq!(record.full_name, "bolt.fill");
        assert_eq!(record.identifier, "bolt.fill");
    }

    #[test]
    fn test_parse_takes_first_and_last_parts() {
        let record = parse_record("a.b_middle_c.d");
        assert_eq!(record.full_name, "a.b");
        assert_eq!(record.identifier, "c.d");
    }

    #[test]
    fn test_parse_records_skips_empty_lines() {
        let records = parse_records("bolt_bolt\n\n\r\ninfo_info\r\n");
        assert_eq!(
            records,
            vec![SymbolRecord::new("bolt", "bolt"), SymbolRecord::new("info", "info")]
        );
    }
}
