//! Keyed polling cache. Each watched key carries its own schedule: refetch
//! intervals depend on whether the cached data has live matches, failures are
//! retried with exponential backoff before the error is surfaced.
use crate::{LeagueStanding, Match, TickerItem};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Retries after a failure before the error is recorded.
pub const RETRY_ATTEMPTS: u32 = 2;
const RETRY_BASE: Duration = Duration::from_secs(1);
const RETRY_CAP: Duration = Duration::from_secs(30);

/// Backoff before retry number `failures` (1-based): min(1s * 2^(n-1), 30s).
pub fn retry_delay(failures: u32) -> Duration {
    let exp = failures.saturating_sub(1).min(16);
    (RETRY_BASE * 2u32.pow(exp)).min(RETRY_CAP)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Match lists and match detail while something is live.
    pub live: Duration,
    pub idle: Duration,
    pub standings: Duration,
    pub ticker: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            live: Duration::from_millis(15_000),
            idle: Duration::from_secs(60),
            standings: Duration::from_secs(5 * 60),
            ticker: Duration::from_secs(20),
        }
    }
}

pub trait CacheKey: Clone + Eq + Hash {
    type Value;

    /// Delay until the next fetch after a successful one.
    fn refetch_interval(&self, value: Option<&Self::Value>, intervals: &PollIntervals) -> Duration;

    /// Age after which a cached value no longer counts as fresh.
    fn stale_time(&self, intervals: &PollIntervals) -> Duration {
        self.refetch_interval(None, intervals)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Match list for a date; `None` is today.
    Matches(Option<String>),
    Match(u64),
    /// Standings for one league, or every tracked league.
    Standings(Option<u64>),
    Ticker,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Matches(Vec<Match>),
    /// `None` when the provider has no such match.
    Match(Option<Box<Match>>),
    Standings(Vec<LeagueStanding>),
    Ticker(Vec<TickerItem>),
}

impl QueryData {
    pub fn has_live(&self) -> bool {
        match self {
            QueryData::Matches(matches) => matches.iter().any(Match::is_live),
            QueryData::Match(m) => m.as_ref().is_some_and(|m| m.is_live()),
            QueryData::Standings(_) | QueryData::Ticker(_) => false,
        }
    }
}

impl CacheKey for QueryKey {
    type Value = QueryData;

    fn refetch_interval(&self, value: Option<&QueryData>, intervals: &PollIntervals) -> Duration {
        match self {
            QueryKey::Matches(_) | QueryKey::Match(_) => {
                if value.is_some_and(QueryData::has_live) {
                    intervals.live
                } else {
                    intervals.idle
                }
            }
            QueryKey::Standings(_) => intervals.standings,
            QueryKey::Ticker => intervals.ticker,
        }
    }

    fn stale_time(&self, intervals: &PollIntervals) -> Duration {
        match self {
            QueryKey::Standings(_) => intervals.standings,
            QueryKey::Ticker => intervals.ticker,
            QueryKey::Matches(_) | QueryKey::Match(_) => intervals.live,
        }
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: Option<V>,
    updated_at: Option<Instant>,
    error: Option<String>,
    failures: u32,
    in_flight: bool,
    next_fetch: Instant,
}

impl<V> Entry<V> {
    fn new(now: Instant) -> Self {
        Self {
            value: None,
            updated_at: None,
            error: None,
            failures: 0,
            in_flight: false,
            next_fetch: now,
        }
    }
}

#[derive(Debug)]
pub struct QueryCache<K: CacheKey> {
    entries: HashMap<K, Entry<K::Value>>,
    intervals: PollIntervals,
}

impl<K: CacheKey> Default for QueryCache<K> {
    fn default() -> Self {
        Self::new(PollIntervals::default())
    }
}

impl<K: CacheKey> QueryCache<K> {
    pub fn new(intervals: PollIntervals) -> Self {
        Self { entries: HashMap::new(), intervals }
    }

    pub fn intervals(&self) -> &PollIntervals {
        &self.intervals
    }

    /// Start polling `key`. A key seen for the first time is due immediately;
    /// watching an already watched key changes nothing.
    pub fn watch(&mut self, key: K, now: Instant) {
        self.entries.entry(key).or_insert_with(|| Entry::new(now));
    }

    pub fn unwatch(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub fn is_watched(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys whose fetch time has come, marked in flight so they are handed out once.
    pub fn due(&mut self, now: Instant) -> Vec<K> {
        let mut due = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if !entry.in_flight && entry.next_fetch <= now {
                entry.in_flight = true;
                due.push(key.clone());
            }
        }
        due
    }

    /// Record the outcome of a fetch. Results for keys no longer watched are dropped.
    pub fn resolve(&mut self, key: &K, result: Result<K::Value, String>, now: Instant) {
        let intervals = self.intervals;
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        entry.in_flight = false;
        match result {
            Ok(value) => {
                entry.next_fetch = now + key.refetch_interval(Some(&value), &intervals);
                entry.value = Some(value);
                entry.updated_at = Some(now);
                entry.error = None;
                entry.failures = 0;
            }
            Err(message) => {
                entry.failures += 1;
                if entry.failures <= RETRY_ATTEMPTS {
                    log::debug!("fetch failed (attempt {}), retrying: {message}", entry.failures);
                    entry.next_fetch = now + retry_delay(entry.failures);
                } else {
                    log::warn!("fetch failed after {RETRY_ATTEMPTS} retries: {message}");
                    entry.error = Some(message);
                    entry.failures = 0;
                    entry.next_fetch = now + key.refetch_interval(entry.value.as_ref(), &intervals);
                }
            }
        }
    }

    /// Make `key` due now, e.g. on a manual refresh.
    pub fn invalidate(&mut self, key: &K, now: Instant) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.next_fetch = now;
        }
    }

    pub fn invalidate_all(&mut self, now: Instant) {
        for entry in self.entries.values_mut() {
            entry.next_fetch = now;
        }
    }

    pub fn is_stale(&self, key: &K, now: Instant) -> bool {
        match self.entries.get(key).and_then(|e| e.updated_at) {
            Some(at) => now.saturating_duration_since(at) >= key.stale_time(&self.intervals),
            None => true,
        }
    }

    pub fn value(&self, key: &K) -> Option<&K::Value> {
        self.entries.get(key).and_then(|e| e.value.as_ref())
    }

    pub fn updated_at(&self, key: &K) -> Option<Instant> {
        self.entries.get(key).and_then(|e| e.updated_at)
    }

    pub fn error(&self, key: &K) -> Option<&str> {
        self.entries.get(key).and_then(|e| e.error.as_deref())
    }

    pub fn is_fetching(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|e| e.in_flight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchStatus;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn matches(status: MatchStatus) -> QueryData {
        QueryData::Matches(vec![Match { id: 1, status, ..Default::default() }])
    }

    fn today() -> QueryKey {
        QueryKey::Matches(None)
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(retry_delay(1), secs(1));
        assert_eq!(retry_delay(2), secs(2));
        assert_eq!(retry_delay(3), secs(4));
        assert_eq!(retry_delay(6), secs(30));
        assert_eq!(retry_delay(40), secs(30));
    }

    #[test]
    fn first_watch_is_due_once() {
        let now = Instant::now();
        let mut cache = QueryCache::default();
        cache.watch(today(), now);
        assert_eq!(cache.due(now), vec![today()]);
        assert!(cache.due(now).is_empty(), "in-flight key handed out twice");
        assert!(cache.is_fetching(&today()));
    }

    #[test]
    fn live_data_refetches_faster() {
        let now = Instant::now();
        let mut cache = QueryCache::default();
        cache.watch(today(), now);
        cache.due(now);
        cache.resolve(&today(), Ok(matches(MatchStatus::SecondHalf)), now);
        assert!(cache.due(now + secs(14)).is_empty());
        assert_eq!(cache.due(now + secs(15)), vec![today()]);

        let later = now + secs(15);
        cache.resolve(&today(), Ok(matches(MatchStatus::FullTime)), later);
        assert!(cache.due(later + secs(59)).is_empty());
        assert_eq!(cache.due(later + secs(60)), vec![today()]);
    }

    #[test]
    fn custom_live_interval_is_used() {
        let now = Instant::now();
        let intervals = PollIntervals { live: secs(5), ..Default::default() };
        let mut cache = QueryCache::new(intervals);
        cache.watch(today(), now);
        cache.due(now);
        cache.resolve(&today(), Ok(matches(MatchStatus::HalfTime)), now);
        assert_eq!(cache.due(now + secs(5)), vec![today()]);
    }

    #[test]
    fn failures_retry_then_surface_and_keep_value() {
        let now = Instant::now();
        let mut cache = QueryCache::default();
        cache.watch(today(), now);
        cache.due(now);
        cache.resolve(&today(), Ok(matches(MatchStatus::NotStarted)), now);

        let t1 = now + secs(60);
        cache.due(t1);
        cache.resolve(&today(), Err("boom".into()), t1);
        assert_eq!(cache.error(&today()), None, "error surfaced before retries ran out");
        assert_eq!(cache.due(t1 + secs(1)), vec![today()]);

        let t2 = t1 + secs(1);
        cache.resolve(&today(), Err("boom".into()), t2);
        assert!(cache.due(t2 + secs(1)).is_empty());
        assert_eq!(cache.due(t2 + secs(2)), vec![today()]);

        let t3 = t2 + secs(2);
        cache.resolve(&today(), Err("boom".into()), t3);
        assert_eq!(cache.error(&today()), Some("boom"));
        assert_eq!(cache.value(&today()), Some(&matches(MatchStatus::NotStarted)));
        assert!(cache.due(t3 + secs(59)).is_empty());
        assert_eq!(cache.due(t3 + secs(60)), vec![today()]);

        cache.resolve(&today(), Ok(matches(MatchStatus::FirstHalf)), t3 + secs(60));
        assert_eq!(cache.error(&today()), None);
    }

    #[test]
    fn standings_go_stale_after_five_minutes() {
        let now = Instant::now();
        let key = QueryKey::Standings(None);
        let mut cache = QueryCache::default();
        assert!(cache.is_stale(&key, now));
        cache.watch(key.clone(), now);
        cache.due(now);
        cache.resolve(&key, Ok(QueryData::Standings(Vec::new())), now);
        assert!(!cache.is_stale(&key, now + secs(299)));
        assert!(cache.is_stale(&key, now + secs(300)));
        assert_eq!(cache.updated_at(&key), Some(now));
    }

    #[test]
    fn invalidate_forces_a_refetch() {
        let now = Instant::now();
        let key = QueryKey::Ticker;
        let mut cache = QueryCache::default();
        cache.watch(key.clone(), now);
        cache.due(now);
        cache.resolve(&key, Ok(QueryData::Ticker(Vec::new())), now);
        assert!(cache.due(now + secs(1)).is_empty());
        cache.invalidate(&key, now + secs(1));
        assert_eq!(cache.due(now + secs(1)), vec![key]);
    }

    #[test]
    fn unwatched_results_are_dropped() {
        let now = Instant::now();
        let key = QueryKey::Match(7);
        let mut cache = QueryCache::default();
        cache.watch(key.clone(), now);
        cache.due(now);
        cache.unwatch(&key);
        cache.resolve(&key, Ok(QueryData::Match(None)), now);
        assert!(!cache.is_watched(&key));
        assert_eq!(cache.value(&key), None);
    }
}
