use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Toast};
use crate::state::favorites::FavoritesStore;
use crate::state::goals::{GoalWatcher, Notifier, TerminalNotifier};
use chrono::{Local, SecondsFormat, Utc};
use football_api::cache::{PollIntervals, QueryCache, QueryData, QueryKey};
use football_api::filter::{self, MatchFilter};
use football_api::{LeagueStanding, Match, Side, TickerItem};
use log::{error, info};
use std::time::Instant;

/// Today's match list. Drives the scores view, the header and goal alerts.
pub const TODAY: QueryKey = QueryKey::Matches(None);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MenuItem {
    #[default]
    Scores,
    Match,
    Standings,
    Help,
}

/// Where a cached query stands from the point of view of a view.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a, T: ?Sized> {
    Pending,
    Missing,
    Found(&'a T),
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub cache: QueryCache<QueryKey>,
    pub favorites: FavoritesStore,
    pub goals: GoalWatcher,
    notifier: Box<dyn Notifier + Send>,
    /// Headlines rebuilt from each refresh of today's list.
    ticker: Vec<TickerItem>,
    /// Keys the cache currently polls on behalf of the views.
    watched: Vec<QueryKey>,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        Self::with_parts(settings, FavoritesStore::load(), Box::new(TerminalNotifier))
    }

    pub fn with_parts(
        settings: AppSettings,
        favorites: FavoritesStore,
        notifier: Box<dyn Notifier + Send>,
    ) -> Self {
        let intervals = PollIntervals { live: settings.poll_interval, ..PollIntervals::default() };
        Self {
            goals: GoalWatcher::new(settings.notifications),
            cache: QueryCache::new(intervals),
            state: AppState::new(),
            settings,
            favorites,
            notifier,
            ticker: Vec::new(),
            watched: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Queries: what to poll, and what came back
    // -----------------------------------------------------------------------

    /// Queries the visible screen depends on. The ticker is derived from
    /// `TODAY`, so it never costs a request of its own.
    fn active_queries(&self) -> Vec<QueryKey> {
        let mut keys = vec![TODAY];
        match self.state.active_tab {
            MenuItem::Match => keys.extend(self.state.detail.match_id.map(QueryKey::Match)),
            MenuItem::Standings => keys.push(QueryKey::Standings(self.state.standings.league)),
            MenuItem::Scores | MenuItem::Help => {}
        }
        keys
    }

    /// Watch what the screen needs and stop polling what it no longer shows.
    pub fn sync_queries(&mut self, now: Instant) {
        let active = self.active_queries();
        for key in self.watched.iter().filter(|k| !active.contains(k)) {
            self.cache.unwatch(key);
        }
        for key in &active {
            self.cache.watch(key.clone(), now);
        }
        self.watched = active;
    }

    /// Keys to hand to the network worker now.
    pub fn due_queries(&mut self, now: Instant) -> Vec<QueryKey> {
        self.sync_queries(now);
        self.cache.due(now)
    }

    pub fn on_query_resolved(
        &mut self,
        key: QueryKey,
        result: Result<QueryData, String>,
        now: Instant,
    ) {
        if let Err(message) = &result {
            error!("{key:?} failed: {message}");
        }
        let ok = result.is_ok();
        self.cache.resolve(&key, result, now);
        if !ok || !self.cache.is_watched(&key) {
            return;
        }

        match key {
            QueryKey::Matches(None) => self.on_matches_refreshed(now),
            QueryKey::Match(_) => {
                if let Lookup::Found(m) = self.detail_match() {
                    let m = m.clone();
                    self.state.detail.settle(&m);
                }
            }
            QueryKey::Matches(Some(_)) | QueryKey::Standings(_) | QueryKey::Ticker => {}
        }
    }

    fn on_matches_refreshed(&mut self, now: Instant) {
        self.state.last_updated = Some(Local::now());

        let alerts = match self.cache.value(&TODAY) {
            Some(QueryData::Matches(matches)) => {
                let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
                self.ticker = filter::build_ticker(matches, &stamp);
                self.goals.observe(matches)
            }
            _ => Vec::new(),
        };
        for alert in alerts {
            self.notifier.notify(&alert);
            self.state.toast = Some(Toast::new(alert.title, alert.body, now));
        }

        let visible = self.visible_matches().len();
        self.state.scores.clamp(visible);
    }

    /// Force every watched query due, e.g. on `r`.
    pub fn refresh(&mut self, now: Instant) {
        info!("manual refresh");
        self.cache.invalidate_all(now);
    }

    /// Once a second. Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.state.toast = None;
            return true;
        }
        false
    }

    // -----------------------------------------------------------------------
    // Cached data, as the views see it
    // -----------------------------------------------------------------------

    pub fn matches(&self) -> &[Match] {
        match self.cache.value(&TODAY) {
            Some(QueryData::Matches(matches)) => matches,
            _ => &[],
        }
    }

    pub fn matches_loaded(&self) -> bool {
        self.cache.value(&TODAY).is_some()
    }

    /// Set once retries are exhausted; cleared by the next success.
    pub fn matches_error(&self) -> Option<&str> {
        self.cache.error(&TODAY)
    }

    pub fn live_count(&self) -> usize {
        filter::live_count(self.matches())
    }

    /// The scores list after tab, search and favorites filters, sorted and
    /// then grouped by league, i.e. in the order the rows are drawn.
    pub fn visible_matches(&self) -> Vec<&Match> {
        let scores = &self.state.scores;
        let favorites = self.favorites.favorites();
        let favorite_ids: Vec<u64> = self
            .matches()
            .iter()
            .filter(|m| favorites.includes(m))
            .map(|m| m.id)
            .collect();
        let filtered = filter::filter_matches(
            self.matches(),
            &MatchFilter {
                tab: Some(scores.tab),
                query: &scores.query,
                favorites: scores.favorites_only.then_some(favorite_ids.as_slice()),
            },
        );
        filter::group_by_league(filtered)
            .into_iter()
            .flat_map(|group| group.matches)
            .collect()
    }

    pub fn selected_list_match(&self) -> Option<&Match> {
        self.visible_matches().get(self.state.scores.selected).copied()
    }

    /// The open match with detail, or its list entry while the detail loads.
    pub fn detail_match(&self) -> Lookup<'_, Match> {
        let Some(id) = self.state.detail.match_id else {
            return Lookup::Missing;
        };
        match self.cache.value(&QueryKey::Match(id)) {
            Some(QueryData::Match(Some(m))) => Lookup::Found(&**m),
            Some(QueryData::Match(None)) => Lookup::Missing,
            _ => match self.matches().iter().find(|m| m.id == id) {
                Some(m) => Lookup::Found(m),
                None => Lookup::Pending,
            },
        }
    }

    pub fn standings(&self) -> Lookup<'_, [LeagueStanding]> {
        let key = QueryKey::Standings(self.state.standings.league);
        match self.cache.value(&key) {
            Some(QueryData::Standings(tables)) => Lookup::Found(tables.as_slice()),
            _ if self.cache.error(&key).is_some() => Lookup::Missing,
            _ => Lookup::Pending,
        }
    }

    pub fn ticker(&self) -> &[TickerItem] {
        &self.ticker
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Scores list
    // -----------------------------------------------------------------------

    pub fn scores_down(&mut self) {
        let len = self.visible_matches().len();
        self.state.scores.select_next(len);
    }

    pub fn scores_up(&mut self) {
        self.state.scores.select_prev();
    }

    /// Open the highlighted match on the Match tab. False when the list is empty.
    pub fn open_selected_match(&mut self) -> bool {
        let Some(id) = self.selected_list_match().map(|m| m.id) else {
            return false;
        };
        self.state.detail.open(id);
        self.update_tab(MenuItem::Match);
        true
    }

    pub fn toggle_selected_favorite(&mut self) {
        if let Some(id) = self.selected_list_match().map(|m| m.id) {
            self.favorites.toggle_match(id);
            let visible = self.visible_matches().len();
            self.state.scores.clamp(visible);
        }
    }

    // -----------------------------------------------------------------------
    // Match detail
    // -----------------------------------------------------------------------

    pub fn toggle_detail_favorite(&mut self) {
        if let Some(id) = self.state.detail.match_id {
            self.favorites.toggle_match(id);
        }
    }

    /// Favourite one side of the open match. Its other matches follow it
    /// into the favorites filter.
    pub fn toggle_detail_team_favorite(&mut self, side: Side) {
        let Lookup::Found(m) = self.detail_match() else {
            return;
        };
        let team = m.team(side);
        let (id, name) = (team.id, team.name.clone());
        let now_favorite = self.favorites.toggle_team(id);
        info!("{name} {} favourites", if now_favorite { "added to" } else { "removed from" });
    }

    pub fn detail_next_tab(&mut self) {
        if let Lookup::Found(m) = self.detail_match() {
            let m = m.clone();
            self.state.detail.next_tab(&m);
        }
    }

    pub fn detail_prev_tab(&mut self) {
        if let Lookup::Found(m) = self.detail_match() {
            let m = m.clone();
            self.state.detail.prev_tab(&m);
        }
    }

    pub fn detail_scroll_down(&mut self) {
        self.state.detail.scroll_offset = self.state.detail.scroll_offset.saturating_add(1);
    }

    pub fn detail_scroll_up(&mut self) {
        self.state.detail.scroll_offset = self.state.detail.scroll_offset.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Standings
    // -----------------------------------------------------------------------

    pub fn standings_scroll_down(&mut self) {
        self.state.standings.scroll_offset = self.state.standings.scroll_offset.saturating_add(1);
    }

    pub fn standings_scroll_up(&mut self) {
        self.state.standings.scroll_offset = self.state.standings.scroll_offset.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Goal alerts
    // -----------------------------------------------------------------------

    pub fn toggle_notifications(&mut self, now: Instant) {
        let enabled = self.goals.toggle();
        let label = if enabled { "Goal notifications on" } else { "Goal notifications off" };
        info!("{label}");
        self.state.toast = Some(Toast::new(label, "", now));
    }
}
