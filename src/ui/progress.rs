//! Progress indicators for batch conversions
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars

use linya::{Bar, Progress};
use std::sync::{Arc, Mutex};

/// Thread-safe document progress bar, shared across rayon workers
#[derive(Clone)]
pub struct DocumentProgress {
  progress: Arc<Mutex<Progress>>,
  bar: Arc<Bar>,
}

impl DocumentProgress {
  /// Create a new progress bar over `total` documents
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      progress: Arc::new(Mutex::new(progress)),
      bar: Arc::new(bar),
    }
  }

  /// Increment progress by 1 (thread-safe)
  pub fn inc(&self) {
    // A poisoned lock only means another worker panicked mid-draw
    let mut progress = match self.progress.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    };
    progress.inc_and_draw(&self.bar, 1);
  }
}
