use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

struct StatusInner {
    file_name: Box<str>,
    parsing: AtomicBool,
    progress_bits: AtomicU32,
    cancelled: AtomicBool,
}

/// Shared status handle for one parse pipeline. All reads are lock-free so a
/// concurrent status poll never blocks ingestion; the file name is fixed for
/// the lifetime of the handle.
#[derive(Clone)]
pub struct StatusHandle {
    inner: std::sync::Arc<StatusInner>,
}

impl StatusHandle {
    pub fn new<S>(file_name: S) -> Self
    where
        S: Into<Box<str>>,
    {
        Self {
            inner: std::sync::Arc::new(StatusInner {
                file_name: file_name.into(),
                parsing: AtomicBool::new(false),
                progress_bits: AtomicU32::new(0.0_f32.to_bits()),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    pub fn begin(&self) {
        self.inner.parsing.store(true, Ordering::Release);
    }

    pub fn set_progress(&self, fraction: f32) {
        let clamped = fraction.clamp(0.0, 1.0);
        self.inner
            .progress_bits
            .store(clamped.to_bits(), Ordering::Release);
    }

    pub fn finish(&self) {
        self.inner.parsing.store(false, Ordering::Release);
    }

    pub fn request_cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    /// Checked cooperatively between round batches, never mid-batch.
    pub fn cancel_requested(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> common::ParseStatus {
        common::ParseStatus {
            is_parsing: self.inner.parsing.load(Ordering::Acquire),
            progress: f32::from_bits(self.inner.progress_bits.load(Ordering::Acquire)),
            file_name: self.inner.file_name.to_string(),
        }
    }
}

impl core::fmt::Debug for StatusHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("StatusHandle")
            .field("file_name", &snapshot.file_name)
            .field("is_parsing", &snapshot.is_parsing)
            .field("progress", &snapshot.progress)
            .finish()
    }
}
