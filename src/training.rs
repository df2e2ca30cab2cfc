//! Bulk training from a corpus file.
//!
//! `:train <path>` loads the file into a bounded FIFO; the console then
//! replays one queued line per loop iteration through the normal turn path.
//! Replayed lines are always utterances; a corpus cannot issue commands.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::AppError;

/// Outcome of [`TrainingQueue::load_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Queued {
    pub queued: usize,
    /// Lines that did not fit under the cap.
    pub dropped: usize,
}

#[derive(Debug)]
pub struct TrainingQueue {
    pending: VecDeque<String>,
    cap: usize,
}

impl TrainingQueue {
    pub fn new(cap: usize) -> Self {
        Self { pending: VecDeque::new(), cap }
    }

    /// Queue `line` unless the queue is full.
    pub fn push(&mut self, line: impl Into<String>) -> bool {
        if self.pending.len() >= self.cap {
            return false;
        }
        self.pending.push_back(line.into());
        true
    }

    /// Queue every non-blank, trimmed line of `path`.
    pub fn load_file(&mut self, path: &Path) -> Result<Queued, AppError> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::Training(format!("cannot read {}: {e}", path.display())))?;

        let mut result = Queued { queued: 0, dropped: 0 };
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if self.push(line) {
                result.queued += 1;
            } else {
                result.dropped += 1;
            }
        }

        if result.dropped > 0 {
            warn!(path = %path.display(), dropped = result.dropped, cap = self.cap, "training queue full");
        }
        info!(path = %path.display(), queued = result.queued, "training corpus queued");
        Ok(result)
    }

    pub fn pop(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// Lines still waiting to be replayed.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn fifo_order() {
        let mut q = TrainingQueue::new(10);
        assert!(q.push("a"));
        assert!(q.push("b"));
        assert_eq!(q.pop().as_deref(), Some("a"));
        assert_eq!(q.pop().as_deref(), Some("b"));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn cap_is_enforced() {
        let mut q = TrainingQueue::new(1);
        assert!(q.push("a"));
        assert!(!q.push("b"));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn load_file_skips_blank_lines() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all("わたしはケーキが食べたいです\n\n  機械学習を勉強しています  \n朝は何を食べましたか\n".as_bytes())
            .unwrap();

        let mut q = TrainingQueue::new(2);
        let r = q.load_file(f.path()).unwrap();
        assert_eq!(r, Queued { queued: 2, dropped: 1 });
        assert_eq!(q.pop().as_deref(), Some("わたしはケーキが食べたいです"));
        assert_eq!(q.pop().as_deref(), Some("機械学習を勉強しています"));
        assert!(q.is_empty());
    }

    #[test]
    fn missing_file_errors() {
        let mut q = TrainingQueue::new(2);
        assert!(q.load_file(Path::new("/nonexistent/corpus.txt")).is_err());
    }
}
