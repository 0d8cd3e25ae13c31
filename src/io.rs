use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid virtual address: {0:?}")]
    Parse(String),
}

/// Parse whitespace-separated virtual addresses.
///
/// Addresses are signed so negative input reaches the manager and is
/// reported per address instead of failing the whole file.
pub fn parse_virtual_addresses(content: &str) -> Result<Vec<i64>, InputError> {
    content
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| InputError::Parse(token.to_string()))
        })
        .collect()
}

pub fn read_virtual_addresses<P: AsRef<Path>>(path: P) -> Result<Vec<i64>, InputError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_virtual_addresses(&content)
}

pub fn format_results(results: &[i64]) -> String {
    let output: Vec<String> = results.iter().map(|r| r.to_string()).collect();
    output.join(" ")
}

pub fn write_results<P: AsRef<Path>>(path: P, results: &[i64]) -> Result<(), InputError> {
    let path = path.as_ref();
    fs::write(path, format_results(results)).map_err(|source| InputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_whitespace() {
        let vas = parse_virtual_addresses("1024 2048\n3072\t-7  ").unwrap();
        assert_eq!(vas, vec![1024, 2048, 3072, -7]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_virtual_addresses("").unwrap().is_empty());
        assert!(parse_virtual_addresses(" \n ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_virtual_addresses("12 abc 7").unwrap_err();
        assert!(matches!(err, InputError::Parse(ref t) if t == "abc"));
    }

    #[test]
    fn test_format_results() {
        assert_eq!(format_results(&[4608, 5047, -1]), "4608 5047 -1");
        assert_eq!(format_results(&[]), "");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_virtual_addresses("/nonexistent/addresses.txt").unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
    }
}
