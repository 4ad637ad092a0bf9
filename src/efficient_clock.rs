//! Per-thread timestamp cache for the rendering path.
//!
//! Locale-aware calendar formatting is the most expensive part of rendering a
//! line, and most lines are logged within the same second as the previous one.
//! This module keeps the rendered timestamp of the last seen second per
//! thread, so formatting only happens when the second changes.
//!
//! The cache is an optimization only: a cold or unavailable cache produces the
//! same output, it just formats again.

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Datelike, Local, Timelike};

/// Timestamp layout of the default line prefix.
pub const DEFAULT_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cached view of the wall clock for one thread.
///
/// # Examples
///
/// ```
/// # use rolling_logger::efficient_clock::ClockCache;
/// use chrono::{Local, TimeZone};
///
/// let mut cache = ClockCache::new();
/// let now = Local.with_ymd_and_hms(2025, 6, 17, 9, 30, 5).unwrap();
///
/// // First lookup formats the second
/// assert!(cache.refresh(&now));
/// assert_eq!(cache.stamp(), "2025-06-17 09:30:05");
///
/// // Same second again is served from the cache
/// assert!(!cache.refresh(&now));
/// ```
pub struct ClockCache {
    second: Option<i64>,
    day_key: i32,
    stamp: String,
    pattern_id: u64,
    chunks: Vec<Option<String>>,
    thread_id: Option<u64>,
}

impl ClockCache {
    /// Creates an empty cache. The first `refresh` always formats.
    pub const fn new() -> Self {
        Self {
            second: None,
            day_key: 0,
            stamp: String::new(),
            pattern_id: 0,
            chunks: Vec::new(),
            thread_id: None,
        }
    }

    /// Brings the cache up to date with `now`.
    ///
    /// Returns `true` when the wall-clock second changed and the cached
    /// strings were recomputed.
    pub fn refresh(&mut self, now: &DateTime<Local>) -> bool {
        let second = now.timestamp();
        if self.second == Some(second) {
            return false;
        }
        self.second = Some(second);
        self.day_key = day_key(now);
        self.stamp.clear();
        // Every item in DEFAULT_STAMP_FORMAT is valid, so this cannot fail.
        let _ = write!(self.stamp, "{}", now.format(DEFAULT_STAMP_FORMAT));
        for chunk in self.chunks.iter_mut() {
            *chunk = None;
        }
        true
    }

    /// Rendered `DEFAULT_STAMP_FORMAT` for the last refreshed second.
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Calendar day of the last refreshed second, see [`day_key`].
    pub fn day_key(&self) -> i32 {
        self.day_key
    }

    /// Returns the strftime rendering of `format` for `now`, cached per
    /// second and per compiled pattern.
    ///
    /// `pattern_id` identifies the compiled pattern that owns the chunk;
    /// switching to a different pattern drops the chunks of the old one.
    /// `format` must already be validated as strftime syntax. If formatting
    /// still fails, the raw format text is returned instead.
    pub fn time_chunk(
        &mut self,
        pattern_id: u64,
        index: usize,
        format: &str,
        now: &DateTime<Local>,
    ) -> &str {
        self.refresh(now);
        if self.pattern_id != pattern_id {
            self.pattern_id = pattern_id;
            self.chunks.clear();
        }
        if self.chunks.len() <= index {
            self.chunks.resize(index + 1, None);
        }
        self.chunks[index].get_or_insert_with(|| {
            let mut rendered = String::new();
            match write!(rendered, "{}", now.format(format)) {
                Ok(()) => rendered,
                Err(_) => format.to_string(),
            }
        })
    }

    /// Stable integer identifier of the current thread.
    ///
    /// Thread ids are opaque and not guaranteed small or ordinal, so the id is
    /// hashed once per thread and reused.
    pub fn thread_id(&mut self) -> u64 {
        *self.thread_id.get_or_insert_with(current_thread_hash)
    }
}

impl Default for ClockCache {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CLOCK_CACHE: Cell<ClockCache> = const { Cell::new(ClockCache::new()) };
}

/// Runs `f` with this thread's clock cache.
///
/// The cache is moved out of the thread-local for the duration of `f`, so a
/// nested call (or a call during thread teardown) sees a cold cache instead of
/// failing.
pub fn with_clock_cache<R>(f: impl FnOnce(&mut ClockCache) -> R) -> R {
    let mut cache = CLOCK_CACHE.try_with(Cell::take).unwrap_or_default();
    let result = f(&mut cache);
    let _ = CLOCK_CACHE.try_with(|cell| cell.set(cache));
    result
}

/// Millisecond part of `now`, always below 1000.
#[inline(always)]
pub fn millis(now: &DateTime<Local>) -> u32 {
    now.nanosecond() / 1_000_000 % 1000
}

/// Calendar-day key used for day-rollover detection: days since 0001-01-01
/// in local time. Two instants share a key exactly when they fall on the same
/// local date.
#[inline(always)]
pub fn day_key(now: &DateTime<Local>) -> i32 {
    now.date_naive().num_days_from_ce()
}

fn current_thread_hash() -> u64 {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 17, 23, 59, 59).unwrap()
    }

    #[test]
    fn test_refresh_only_on_new_second() {
        let mut cache = ClockCache::new();
        let t = fixed();
        assert!(cache.refresh(&t));
        assert!(!cache.refresh(&(t + Duration::milliseconds(400))));
        assert!(cache.refresh(&(t + Duration::seconds(1))));
    }

    #[test]
    fn test_day_key_changes_across_midnight() {
        let mut cache = ClockCache::new();
        let t = fixed();
        cache.refresh(&t);
        let before = cache.day_key();
        cache.refresh(&(t + Duration::seconds(1)));
        assert_eq!(cache.day_key(), before + 1);
    }

    #[test]
    fn test_time_chunk_is_cached_per_pattern() {
        let mut cache = ClockCache::new();
        let t = fixed();
        assert_eq!(cache.time_chunk(7, 0, "%Y/%m", &t), "2025/06");
        assert_eq!(cache.time_chunk(7, 1, "%H", &t), "23");
        // A different pattern id with the same slot renders its own format
        assert_eq!(cache.time_chunk(8, 0, "%d", &t), "17");
    }

    #[test]
    fn test_millis() {
        let t = fixed() + Duration::milliseconds(123);
        assert_eq!(millis(&t), 123);
    }

    #[test]
    fn test_thread_id_is_stable_and_per_thread() {
        let here = with_clock_cache(|c| c.thread_id());
        assert_eq!(here, with_clock_cache(|c| c.thread_id()));
        let there = std::thread::spawn(|| with_clock_cache(|c| c.thread_id()))
            .join()
            .unwrap();
        assert_ne!(here, there);
    }

    #[test]
    fn test_nested_use_falls_back_to_cold_cache() {
        let t = fixed();
        let stamp = with_clock_cache(|outer| {
            outer.refresh(&t);
            with_clock_cache(|inner| {
                inner.refresh(&t);
                inner.stamp().to_string()
            })
        });
        assert_eq!(stamp, "2025-06-17 23:59:59");
    }
}
