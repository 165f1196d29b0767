// File Operations for the Small-Prime Cache
// Reads and writes the prime table used by trial division

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::rsa::{RsaError, SmallPrimeTable};

/// Errors that can occur while loading or storing the prime cache
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid entry {value:?} on line {line}")]
    InvalidEntry { line: usize, value: String },

    #[error("Invalid prime table: {0}")]
    InvalidTable(#[from] RsaError),
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Read entire file into memory
fn read_file(path: &Path) -> FileResult<String> {
    let mut file = File::open(path)?;
    let mut data = String::new();
    file.read_to_string(&mut data)?;
    Ok(data)
}

/// Write data to file, creating parent directories as needed
fn write_file(path: &Path, data: &[u8]) -> FileResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data)?;
    Ok(())
}

/// Parse a prime list: the first comma-separated field of every
/// non-empty line. Plain one-per-line files and headerless CSV both work.
pub fn parse_prime_list(text: &str) -> FileResult<Vec<u64>> {
    let mut primes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let field = line.split(',').next().unwrap_or("").trim();
        if field.is_empty() {
            continue;
        }
        let value = field.parse::<u64>().map_err(|_| FileError::InvalidEntry {
            line: idx + 1,
            value: field.to_string(),
        })?;
        primes.push(value);
    }
    Ok(primes)
}

/// Load a validated prime table from `path`
pub fn load_prime_table(path: &Path) -> FileResult<SmallPrimeTable> {
    let primes = parse_prime_list(&read_file(path)?)?;
    let table = SmallPrimeTable::new(primes)?;
    info!("loaded {} small primes from {}", table.len(), path.display());
    Ok(table)
}

/// Store `table` at `path`, one prime per line
pub fn save_prime_table(path: &Path, table: &SmallPrimeTable) -> FileResult<()> {
    let mut out = String::with_capacity(table.len() * 8);
    for prime in table.as_slice() {
        out.push_str(&prime.to_string());
        out.push('\n');
    }
    write_file(path, out.as_bytes())?;
    debug!("cached {} small primes at {}", table.len(), path.display());
    Ok(())
}

/// Load the cache at `path`, or sieve the first `count` primes and write
/// them there when no cache exists yet
pub fn load_or_create_prime_table(path: &Path, count: usize) -> FileResult<SmallPrimeTable> {
    if path.exists() {
        return load_prime_table(path);
    }

    let table = SmallPrimeTable::first(count)?;
    save_prime_table(path, &table)?;
    info!("created prime cache with {} entries at {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_csv() {
        assert_eq!(parse_prime_list("2\n3\n\n5\n").unwrap(), vec![2, 3, 5]);
        assert_eq!(parse_prime_list("2,first\n3,second\r\n5").unwrap(), vec![2, 3, 5]);
    }

    #[test]
    fn test_parse_invalid_entry() {
        let err = parse_prime_list("2\nthree\n").unwrap_err();
        assert!(matches!(err, FileError::InvalidEntry { line: 2, .. }));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("primes.txt");
        let table = SmallPrimeTable::first(50).unwrap();

        save_prime_table(&path, &table).unwrap();
        assert_eq!(load_prime_table(&path).unwrap(), table);
    }

    #[test]
    fn test_load_rejects_bad_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("primes.txt");
        fs::write(&path, "2\n3\n4\n").unwrap();

        assert!(matches!(load_prime_table(&path), Err(FileError::InvalidTable(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_prime_table(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(FileError::IoError(_))));
    }

    #[test]
    fn test_load_or_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("primes.txt");

        let created = load_or_create_prime_table(&path, 25).unwrap();
        assert_eq!(created.len(), 25);
        assert!(path.exists());

        // a second call reads the cache instead of sieving a new size
        let loaded = load_or_create_prime_table(&path, 100).unwrap();
        assert_eq!(loaded, created);
    }
}
