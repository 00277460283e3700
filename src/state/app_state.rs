use crate::app::MenuItem;
use chrono::{DateTime, Local};
use football_api::Match;
use football_api::client::TRACKED_LEAGUES;
use football_api::filter::MatchTab;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(6);

// ---------------------------------------------------------------------------
// Scores list state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScoresState {
    pub tab: MatchTab,
    pub query: String,
    /// Keystrokes go to the search line instead of the key bindings.
    pub searching: bool,
    pub favorites_only: bool,
    /// Index into the filtered, sorted list.
    pub selected: usize,
}

impl ScoresState {
    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.selected = 0;
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
        self.selected = 0;
    }

    pub fn select_next(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the cursor on the list after it shrank.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.searching = false;
        self.selected = 0;
    }

    pub fn toggle_favorites_only(&mut self) {
        self.favorites_only = !self.favorites_only;
        self.selected = 0;
    }
}

// ---------------------------------------------------------------------------
// Match detail state
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DetailTab {
    #[default]
    Events,
    Statistics,
    Lineups,
    Info,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] =
        [DetailTab::Events, DetailTab::Statistics, DetailTab::Lineups, DetailTab::Info];

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Events => "Events",
            DetailTab::Statistics => "Statistics",
            DetailTab::Lineups => "Lineups",
            DetailTab::Info => "Info",
        }
    }

    /// Statistics and lineups can't be opened when the provider sent none.
    pub fn is_available(&self, m: &Match) -> bool {
        match self {
            DetailTab::Statistics => m.has_statistics(),
            DetailTab::Lineups => m.lineups.is_some(),
            DetailTab::Events | DetailTab::Info => true,
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    /// The next available tab, wrapping around.
    fn cycle(&self, m: &Match, forward: bool) -> Self {
        let n = Self::ALL.len();
        let start = self.index();
        (1..n)
            .map(|i| if forward { (start + i) % n } else { (start + n - i) % n })
            .map(|i| Self::ALL[i])
            .find(|t| t.is_available(m))
            .unwrap_or(*self)
    }
}

#[derive(Debug, Default)]
pub struct MatchDetailState {
    pub match_id: Option<u64>,
    pub tab: DetailTab,
    pub scroll_offset: u16,
}

impl MatchDetailState {
    pub fn open(&mut self, match_id: u64) {
        if self.match_id != Some(match_id) {
            self.tab = DetailTab::Events;
            self.scroll_offset = 0;
        }
        self.match_id = Some(match_id);
    }

    pub fn next_tab(&mut self, m: &Match) {
        self.tab = self.tab.cycle(m, true);
        self.scroll_offset = 0;
    }

    pub fn prev_tab(&mut self, m: &Match) {
        self.tab = self.tab.cycle(m, false);
        self.scroll_offset = 0;
    }

    /// Fall back to events when the open tab lost its data on refresh.
    pub fn settle(&mut self, m: &Match) {
        if !self.tab.is_available(m) {
            self.tab = DetailTab::Events;
        }
    }
}

// ---------------------------------------------------------------------------
// Standings state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StandingsState {
    /// `None` lists every tracked league.
    pub league: Option<u64>,
    pub scroll_offset: u16,
}

impl StandingsState {
    pub fn next_league(&mut self) {
        self.league = match self.league.and_then(|id| TRACKED_LEAGUES.iter().position(|&l| l == id)) {
            None => TRACKED_LEAGUES.first().copied(),
            Some(i) => TRACKED_LEAGUES.get(i + 1).copied(),
        };
        self.scroll_offset = 0;
    }

    pub fn prev_league(&mut self) {
        self.league = match self.league.and_then(|id| TRACKED_LEAGUES.iter().position(|&l| l == id)) {
            None => TRACKED_LEAGUES.last().copied(),
            Some(0) => None,
            Some(i) => TRACKED_LEAGUES.get(i - 1).copied(),
        };
        self.scroll_offset = 0;
    }
}

// ---------------------------------------------------------------------------
// Toast
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn new(title: impl Into<String>, body: impl Into<String>, now: Instant) -> Self {
        Self { title: title.into(), body: body.into(), expires_at: now + TOAST_TTL }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    /// Wall clock of the last successful match list refresh.
    pub last_updated: Option<DateTime<Local>>,
    pub scores: ScoresState,
    pub detail: MatchDetailState,
    pub standings: StandingsState,
    pub toast: Option<Toast>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
