use std::collections::VecDeque;

/// Default maximum number of buffered lines.
pub const DEFAULT_MAX_ENTRIES: usize = 4096;
/// Default maximum number of buffered bytes.
pub const DEFAULT_MAX_BYTES: usize = 8 * 1024 * 1024;

/// Bounded FIFO of fully rendered lines, held while file output is deferred.
///
/// When either cap would be exceeded the oldest lines are dropped, so memory
/// stays bounded no matter how long the logger waits before promotion. The
/// newest line is always kept, even if it alone exceeds the byte cap.
#[derive(Debug)]
pub struct PendingBuffer {
    entries: VecDeque<Vec<u8>>,
    total_bytes: usize,
    max_entries: usize,
    max_bytes: usize,
    dropped: u64,
}

impl PendingBuffer {
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            total_bytes: 0,
            max_entries: max_entries.max(1),
            max_bytes,
            dropped: 0,
        }
    }

    /// Changes the caps, evicting old lines if the buffer is now over them.
    pub fn set_limits(&mut self, max_entries: usize, max_bytes: usize) {
        self.max_entries = max_entries.max(1);
        self.max_bytes = max_bytes;
        self.evict(0, 0);
    }

    pub fn push(&mut self, line: Vec<u8>) {
        self.evict(line.len(), 1);
        self.total_bytes += line.len();
        self.entries.push_back(line);
    }

    /// Oldest buffered line, for replay.
    pub fn front(&self) -> Option<&[u8]> {
        self.entries.front().map(Vec::as_slice)
    }

    /// Removes the oldest line once it has been replayed.
    pub fn pop_front(&mut self) -> Option<Vec<u8>> {
        let line = self.entries.pop_front()?;
        self.total_bytes -= line.len();
        Some(line)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Number of lines discarded under cap pressure since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(Vec::as_slice)
    }

    // Makes room for `bytes` more bytes in `entries` more lines.
    fn evict(&mut self, bytes: usize, entries: usize) {
        while let Some(front) = self.entries.front() {
            let over_count = self.entries.len() + entries > self.max_entries;
            let over_bytes = self.total_bytes + bytes > self.max_bytes;
            if !over_count && !over_bytes {
                break;
            }
            self.total_bytes -= front.len();
            self.entries.pop_front();
            self.dropped += 1;
        }
    }
}

impl Default for PendingBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_MAX_BYTES)
    }
}
