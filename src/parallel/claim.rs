use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared cursor handing out job indices `0..len` exactly once each.
///
/// Workers call [`ClaimCounter::next_index`] until it returns `None`. Issuance
/// order across threads is unspecified; only uniqueness and complete coverage
/// are guaranteed. The cursor never moves backwards and never exceeds `len`.
#[derive(Debug)]
pub struct ClaimCounter {
    next: AtomicUsize,
    len: usize,
}

impl ClaimCounter {
    pub fn new(len: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            len,
        }
    }

    /// Claim the next unissued index, or `None` once every index is taken.
    pub fn next_index(&self) -> Option<usize> {
        // Fast path: an exhausted cursor is observed without a write.
        if self.next.load(Ordering::Acquire) >= self.len {
            return None;
        }

        self.next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |next| {
                (next < self.len).then_some(next + 1)
            })
            .ok()
    }

    /// Number of indices handed out so far.
    pub fn issued(&self) -> usize {
        self.next.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_exhausted(&self) -> bool {
        self.issued() >= self.len
    }
}

/// Cooperative stop flag checked by workers before every claim.
///
/// Clones share the same flag. In-flight jobs are never interrupted; the pool
/// simply stops claiming new ones.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The underlying flag, for wiring into signal handlers.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}
