//! High score persistence
//!
//! The whole file is one decimal integer. Reads degrade to zero when the
//! file is missing or unreadable; writes only happen when the new score
//! strictly beats the stored one, and a failed write is logged rather than
//! surfaced to the player.

use std::fs;
use std::path::Path;

/// Stored high score, or 0 when the file is missing or unreadable
pub fn load(path: &Path) -> u32 {
    match fs::read_to_string(path) {
        Ok(text) => match text.trim().parse() {
            Ok(score) => score,
            Err(_) => {
                log::warn!("high score file {} is not a number, treating as 0", path.display());
                0
            }
        },
        Err(err) => {
            log::debug!("no high score at {}: {err}", path.display());
            0
        }
    }
}

/// Persist `score` if it strictly beats the stored value.
///
/// Returns true when the score set a new record. Ties and lower scores
/// leave the file untouched, so a fresh 0 never clobbers anything.
pub fn record(path: &Path, score: u32) -> bool {
    let stored = load(path);
    if score <= stored {
        return false;
    }
    match fs::write(path, score.to_string()) {
        Ok(()) => log::info!("new high score {score} (previous {stored})"),
        Err(err) => log::warn!("could not persist high score to {}: {err}", path.display()),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct TempScore(PathBuf);

    impl TempScore {
        fn new(tag: &str) -> Self {
            Self(std::env::temp_dir().join(format!("pantry-moth-test-{tag}-{}", std::process::id())))
        }
    }

    impl Drop for TempScore {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let tmp = TempScore::new("missing");
        assert_eq!(load(&tmp.0), 0);
    }

    #[test]
    fn test_garbage_reads_zero() {
        let tmp = TempScore::new("garbage");
        fs::write(&tmp.0, "not a score").unwrap();
        assert_eq!(load(&tmp.0), 0);
    }

    #[test]
    fn test_record_only_on_strict_improvement() {
        let tmp = TempScore::new("record");

        assert!(record(&tmp.0, 10));
        assert_eq!(load(&tmp.0), 10);

        // Lower and tied scores leave the file alone
        assert!(!record(&tmp.0, 7));
        assert!(!record(&tmp.0, 10));
        assert_eq!(load(&tmp.0), 10);

        assert!(record(&tmp.0, 11));
        assert_eq!(load(&tmp.0), 11);
    }

    #[test]
    fn test_zero_never_writes() {
        let tmp = TempScore::new("zero");
        assert!(!record(&tmp.0, 0));
        assert!(!tmp.0.exists());
    }

    #[test]
    fn test_whitespace_tolerated() {
        let tmp = TempScore::new("ws");
        fs::write(&tmp.0, "  250\n").unwrap();
        assert_eq!(load(&tmp.0), 250);
    }
}
