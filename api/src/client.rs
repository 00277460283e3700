use crate::api_football::{
    ApiEvent, ApiLineup, ApiTeam, Envelope, Fixture, LineupSlot, StandingsItem, TeamStatistics,
};
use crate::football_data::{FdMatch, FdTeam, MatchesResponse, StandingsResponse};
use crate::{
    EventType, League, LeagueStanding, Lineups, Match, MatchEvent, MatchScore, MatchStatistic,
    MatchStatus, PlayerLineup, Side, StandingEntry, StatValue, Team, TeamLineup, TickerItem, filter,
};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use futures_util::future::try_join_all;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_API_FOOTBALL_HOST: &str = "v3.football.api-sports.io";
const FOOTBALL_DATA_BASE: &str = "https://api.football-data.org/v4";
const PLACEHOLDER_KEY: &str = "your_api_key_here";
const SEASON: u16 = 2025;
const DEFAULT_FORMATION: &str = "4-4-2";
const MOCK_MATCHES_JSON: &str = include_str!("../data/mock_matches.json");
const MOCK_STANDINGS_JSON: &str = include_str!("../data/mock_standings.json");

/// Leagues shown by default: Premier League, La Liga, Serie A, Bundesliga, Ligue 1.
pub const TRACKED_LEAGUES: [u64; 5] = [39, 140, 135, 78, 61];

/// API-Football league id → football-data.org competition id.
const FOOTBALL_DATA_COMPETITIONS: [(u64, u64); 5] =
    [(39, 2021), (140, 2014), (135, 2019), (78, 2002), (61, 2015)];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Mock,
    ApiFootball,
    FootballData,
}

impl Provider {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mock" => Some(Provider::Mock),
            "api-football" => Some(Provider::ApiFootball),
            "football-data" => Some(Provider::FootballData),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::Mock => "mock",
            Provider::ApiFootball => "api-football",
            Provider::FootballData => "football-data",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: String,
    /// Scheme and host, e.g. `https://v3.football.api-sports.io`.
    pub api_football_base: String,
    pub football_data_base: String,
    /// Serve the embedded dataset when a provider request fails.
    pub fallback_to_mock: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Mock,
            api_key: String::new(),
            api_football_base: format!("https://{DEFAULT_API_FOOTBALL_HOST}"),
            football_data_base: FOOTBALL_DATA_BASE.to_owned(),
            fallback_to_mock: true,
        }
    }
}

impl ProviderConfig {
    /// Read `KICKOFF_API_PROVIDER`, `KICKOFF_API_KEY`, `KICKOFF_API_HOST` and
    /// `KICKOFF_MOCK_FALLBACK`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(name) = std::env::var("KICKOFF_API_PROVIDER") {
            match Provider::parse(&name) {
                Some(provider) => config.provider = provider,
                None => log::warn!("unknown provider {name:?}, using mock data"),
            }
        }
        if let Ok(key) = std::env::var("KICKOFF_API_KEY") {
            config.api_key = key.trim().to_owned();
        }
        if let Ok(host) = std::env::var("KICKOFF_API_HOST")
            && !host.trim().is_empty()
        {
            config.api_football_base = format!("https://{}", host.trim());
        }
        if let Ok(flag) = std::env::var("KICKOFF_MOCK_FALLBACK") {
            config.fallback_to_mock = !matches!(flag.trim(), "0" | "false" | "no" | "off");
        }
        config
    }

    /// The provider actually queried. Without a usable key that is the mock.
    pub fn effective_provider(&self) -> Provider {
        if self.api_key.is_empty() || self.api_key == PLACEHOLDER_KEY {
            Provider::Mock
        } else {
            self.provider
        }
    }
}

/// Football data client over API-Football, football-data.org or the embedded mock.
#[derive(Debug, Clone)]
pub struct FootballApi {
    client: Client,
    timeout: Duration,
    config: ProviderConfig,
}

impl Default for FootballApi {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl FootballApi {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("kickoff/0.1 (terminal live scores)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn provider(&self) -> Provider {
        self.config.effective_provider()
    }

    /// Matches for `date` (`YYYY-MM-DD`), today (UTC) when `None`.
    pub async fn fetch_matches(&self, date: Option<&str>) -> ApiResult<Vec<Match>> {
        let date = date.map(str::to_owned).unwrap_or_else(today);
        let result: ApiResult<Vec<Match>> = match self.provider() {
            Provider::Mock => return mock_matches(),
            Provider::ApiFootball => {
                let url = format!("{}/fixtures?date={date}", self.config.api_football_base);
                self.get::<Envelope<Fixture>>(&url)
                    .await
                    .map(|env| env.response.iter().map(map_fixture).collect())
            }
            Provider::FootballData => {
                let url = format!(
                    "{}/matches?dateFrom={date}&dateTo={date}",
                    self.config.football_data_base
                );
                self.get::<MatchesResponse>(&url)
                    .await
                    .map(|res| res.matches.iter().map(map_fd_match).collect())
            }
        };
        self.or_mock(result, "matches", mock_matches)
    }

    /// One match with events, statistics and lineups. `None` when unknown.
    pub async fn fetch_match(&self, id: u64) -> ApiResult<Option<Match>> {
        let result = match self.provider() {
            Provider::Mock => return mock_match(id),
            Provider::ApiFootball => self.fetch_af_match(id).await,
            Provider::FootballData => {
                let url = format!("{}/matches/{id}", self.config.football_data_base);
                match self.get::<FdMatch>(&url).await {
                    Ok(raw) => Ok(Some(map_fd_match(&raw))),
                    Err(ApiError::NotFound(_)) => Ok(None),
                    Err(e) => Err(e),
                }
            }
        };
        self.or_mock(result, "match detail", || mock_match(id))
    }

    async fn fetch_af_match(&self, id: u64) -> ApiResult<Option<Match>> {
        let base = &self.config.api_football_base;
        let fixtures: Envelope<Fixture> = self.get(&format!("{base}/fixtures?id={id}")).await?;
        let Some(mut fixture) = fixtures.response.into_iter().next() else {
            return Ok(None);
        };

        // Detail endpoints are best effort; a failure leaves that section empty.
        let events_url = format!("{base}/fixtures/events?fixture={id}");
        let stats_url = format!("{base}/fixtures/statistics?fixture={id}");
        let lineups_url = format!("{base}/fixtures/lineups?fixture={id}");
        let (events, statistics, lineups) = futures_util::join!(
            self.get::<Envelope<ApiEvent>>(&events_url),
            self.get::<Envelope<TeamStatistics>>(&stats_url),
            self.get::<Envelope<ApiLineup>>(&lineups_url),
        );
        let events = tolerate(events, "events");
        let statistics = tolerate(statistics, "statistics");
        let lineups = tolerate(lineups, "lineups");

        if !events.is_empty() {
            fixture.events = events;
        }
        if !statistics.is_empty() {
            fixture.statistics = statistics;
        }
        let mut game = map_fixture(&fixture);
        game.lineups = map_lineups(&lineups, fixture.teams.home.id);
        Ok(Some(game))
    }

    /// Standings for `league`, or for every tracked league.
    pub async fn fetch_standings(&self, league: Option<u64>) -> ApiResult<Vec<LeagueStanding>> {
        let leagues: Vec<u64> = league.map_or_else(|| TRACKED_LEAGUES.to_vec(), |id| vec![id]);
        let result: ApiResult<Vec<LeagueStanding>> = match self.provider() {
            Provider::Mock => return mock_standings(league),
            Provider::ApiFootball => {
                let base = &self.config.api_football_base;
                let requests = leagues.iter().map(|id| {
                    let url = format!("{base}/standings?league={id}&season={SEASON}");
                    async move { self.get::<Envelope<StandingsItem>>(&url).await }
                });
                try_join_all(requests).await.map(|pages| {
                    pages
                        .into_iter()
                        .filter_map(|env| env.response.into_iter().next())
                        .filter_map(map_af_standings)
                        .collect()
                })
            }
            Provider::FootballData => {
                let base = &self.config.football_data_base;
                let requests = leagues.iter().filter_map(|&id| {
                    let competition = football_data_competition(id)?;
                    let url = format!("{base}/competitions/{competition}/standings");
                    Some(async move { self.get::<StandingsResponse>(&url).await })
                });
                try_join_all(requests)
                    .await
                    .map(|pages| pages.into_iter().filter_map(map_fd_standings).collect())
            }
        };
        self.or_mock(result, "standings", || mock_standings(league))
    }

    /// The static list of tracked leagues.
    pub async fn fetch_leagues(&self) -> ApiResult<Vec<League>> {
        Ok(tracked_leagues())
    }

    /// Headline events of today's live matches, newest first. Costs one
    /// match-list request; callers already polling the list should use
    /// `filter::build_ticker` on it instead.
    pub async fn fetch_ticker(&self) -> ApiResult<Vec<TickerItem>> {
        let matches = self.fetch_matches(None).await?;
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(filter::build_ticker(&matches, &stamp))
    }

    pub async fn search_matches(&self, query: &str) -> ApiResult<Vec<Match>> {
        let matches = self.fetch_matches(None).await?;
        Ok(matches
            .into_iter()
            .filter(|m| filter::matches_query(m, query))
            .collect())
    }

    fn or_mock<T>(
        &self,
        result: ApiResult<T>,
        what: &str,
        fallback: impl FnOnce() -> ApiResult<T>,
    ) -> ApiResult<T> {
        match result {
            Err(e) if self.config.fallback_to_mock => {
                log::error!("{} {what} request failed, serving mock data: {e}", self.provider().label());
                fallback()
            }
            other => other,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let request = self.client.get(url).timeout(self.timeout);
        let request = match self.provider() {
            Provider::ApiFootball => request.header("x-apisports-key", &self.config.api_key),
            Provider::FootballData => request.header("X-Auth-Token", &self.config.api_key),
            Provider::Mock => request,
        };
        log::debug!("GET {url}");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Err(ApiError::NotFound(url.to_owned()))
            }
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

fn tolerate<T>(result: ApiResult<Envelope<T>>, what: &str) -> Vec<T> {
    match result {
        Ok(env) => env.response,
        Err(e) => {
            log::warn!("fixture {what} unavailable: {e}");
            Vec::new()
        }
    }
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub fn tracked_leagues() -> Vec<League> {
    let league = |id: u64, name: &str, country: &str| League {
        id,
        name: name.to_owned(),
        country: country.to_owned(),
        logo: format!("https://media.api-sports.io/football/leagues/{id}.png"),
        flag: None,
        season: Some(SEASON),
    };
    vec![
        league(39, "Premier League", "England"),
        league(140, "La Liga", "Spain"),
        league(135, "Serie A", "Italy"),
        league(78, "Bundesliga", "Germany"),
        league(61, "Ligue 1", "France"),
    ]
}

fn football_data_competition(league_id: u64) -> Option<u64> {
    FOOTBALL_DATA_COMPETITIONS
        .iter()
        .find(|(af, _)| *af == league_id)
        .map(|(_, fd)| *fd)
}

/// Competition ids come back as the tracked league ids so favourites and
/// standings line up across providers.
fn league_id_from_competition(competition: u64) -> u64 {
    FOOTBALL_DATA_COMPETITIONS
        .iter()
        .find(|(_, fd)| *fd == competition)
        .map_or(competition, |(af, _)| *af)
}

/// First three letters of the name, uppercased.
fn short_name(name: &str) -> String {
    name.chars().take(3).collect::<String>().to_uppercase()
}

/// Calendar date as sent by the provider and kick-off time in local time.
fn split_kickoff(iso: &str) -> (String, String) {
    let date = iso.split('T').next().unwrap_or(iso).to_owned();
    let time = match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.with_timezone(&Local).format("%H:%M").to_string(),
        Err(_) => iso.get(11..16).unwrap_or_default().to_owned(),
    };
    (date, time)
}

// ---------------------------------------------------------------------------
// Mock dataset
// ---------------------------------------------------------------------------

fn mock_matches() -> ApiResult<Vec<Match>> {
    let mut matches: Vec<Match> = serde_json::from_str(MOCK_MATCHES_JSON)
        .map_err(|e| ApiError::Other(format!("invalid embedded match data: {e}")))?;
    let seed = Utc::now().timestamp_millis().unsigned_abs();
    for m in matches.iter_mut() {
        let cap = match m.status {
            MatchStatus::FirstHalf => 45,
            MatchStatus::SecondHalf => 90,
            _ => continue,
        };
        if let Some(minute) = m.minute.as_mut() {
            let nudge = ((seed + m.id) % 3) as u16;
            *minute = (*minute + nudge).min(cap);
        }
    }
    Ok(matches)
}

fn mock_match(id: u64) -> ApiResult<Option<Match>> {
    Ok(mock_matches()?.into_iter().find(|m| m.id == id))
}

fn mock_standings(league: Option<u64>) -> ApiResult<Vec<LeagueStanding>> {
    let standings: Vec<LeagueStanding> = serde_json::from_str(MOCK_STANDINGS_JSON)
        .map_err(|e| ApiError::Other(format!("invalid embedded standings data: {e}")))?;
    Ok(match league {
        Some(id) => standings.into_iter().filter(|s| s.league.id == id).collect(),
        None => standings,
    })
}

// ---------------------------------------------------------------------------
// Mapping: API-Football wire types → domain types
// ---------------------------------------------------------------------------

fn map_af_team(team: &ApiTeam) -> Team {
    Team {
        id: team.id,
        name: team.name.clone(),
        short_name: short_name(&team.name),
        logo: team.logo.clone().unwrap_or_default(),
        code: None,
    }
}

fn map_fixture(f: &Fixture) -> Match {
    let home_id = f.teams.home.id;
    let (date, time) = split_kickoff(&f.fixture.date);
    Match {
        id: f.fixture.id,
        league: League {
            id: f.league.id,
            name: f.league.name.clone(),
            country: f.league.country.clone(),
            logo: f.league.logo.clone().unwrap_or_default(),
            flag: f.league.flag.clone(),
            season: f.league.season,
        },
        home_team: map_af_team(&f.teams.home),
        away_team: map_af_team(&f.teams.away),
        score: MatchScore {
            home: f.goals.home.unwrap_or(0),
            away: f.goals.away.unwrap_or(0),
            ht_home: f.score.halftime.home,
            ht_away: f.score.halftime.away,
            ft_home: f.score.fulltime.home,
            ft_away: f.score.fulltime.away,
            et_home: f.score.extratime.home,
            et_away: f.score.extratime.away,
            pen_home: f.score.penalty.home,
            pen_away: f.score.penalty.away,
        },
        status: MatchStatus::from_code(&f.fixture.status.short),
        minute: f.fixture.status.elapsed,
        extra_minute: f.fixture.status.extra,
        date,
        time,
        venue: f.fixture.venue.as_ref().and_then(|v| v.name.clone()),
        referee: f.fixture.referee.clone(),
        events: f
            .events
            .iter()
            .enumerate()
            .map(|(i, e)| map_event(f.fixture.id, i, e, home_id))
            .collect(),
        statistics: map_statistics(&f.statistics, home_id),
        lineups: None,
    }
}

fn map_event(fixture_id: u64, index: usize, e: &ApiEvent, home_id: u64) -> MatchEvent {
    MatchEvent {
        id: format!("e-{fixture_id}-{index}"),
        event_type: map_event_type(&e.event_type, e.detail.as_deref().unwrap_or_default()),
        minute: e.time.elapsed.unwrap_or(0),
        extra_minute: e.time.extra,
        team: if e.team.id == Some(home_id) { Side::Home } else { Side::Away },
        player: e.player.name.clone().unwrap_or_else(|| "Unknown".into()),
        assist: e.assist.as_ref().and_then(|a| a.name.clone()),
        detail: e.detail.clone(),
    }
}

fn map_event_type(kind: &str, detail: &str) -> EventType {
    match (kind, detail) {
        ("Goal", "Penalty") => EventType::PenaltyGoal,
        ("Goal", "Own Goal") => EventType::OwnGoal,
        ("Goal", "Missed Penalty") => EventType::PenaltyMissed,
        ("Card", "Yellow Card") => EventType::YellowCard,
        ("Card", "Red Card") => EventType::RedCard,
        ("subst", _) => EventType::Substitution,
        ("Var", _) => EventType::Var,
        _ => EventType::Goal,
    }
}

fn stat_value(value: Option<&serde_json::Value>) -> StatValue {
    match value {
        Some(serde_json::Value::Number(n)) => StatValue::Number(n.as_f64().unwrap_or(0.0)),
        Some(serde_json::Value::String(s)) => StatValue::Text(s.clone()),
        _ => StatValue::Number(0.0),
    }
}

/// Pairs the home list with the other team's list by position.
fn map_statistics(stats: &[TeamStatistics], home_id: u64) -> Option<Vec<MatchStatistic>> {
    if stats.len() < 2 {
        return None;
    }
    let home_idx = stats
        .iter()
        .position(|s| s.team.id == Some(home_id))
        .unwrap_or(0);
    let home = &stats[home_idx];
    let away = &stats[if home_idx == 0 { 1 } else { 0 }];
    Some(
        home.statistics
            .iter()
            .enumerate()
            .map(|(i, entry)| MatchStatistic {
                stat_type: entry.stat_type.clone(),
                home: stat_value(entry.value.as_ref()),
                away: stat_value(away.statistics.get(i).and_then(|s| s.value.as_ref())),
            })
            .collect(),
    )
}

fn map_lineup_players(slots: &[LineupSlot]) -> Vec<PlayerLineup> {
    slots
        .iter()
        .map(|slot| PlayerLineup {
            id: slot.player.id.unwrap_or(0),
            name: slot.player.name.clone(),
            number: slot.player.number.unwrap_or(0),
            position: slot.player.pos.clone().unwrap_or_default(),
            rating: None,
            photo: None,
        })
        .collect()
}

fn map_team_lineup(lineup: &ApiLineup) -> TeamLineup {
    TeamLineup {
        formation: lineup
            .formation
            .clone()
            .unwrap_or_else(|| DEFAULT_FORMATION.into()),
        start_xi: map_lineup_players(&lineup.start_xi),
        substitutes: map_lineup_players(&lineup.substitutes),
        coach: lineup
            .coach
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_default(),
    }
}

fn map_lineups(lineups: &[ApiLineup], home_id: u64) -> Option<Lineups> {
    if lineups.len() < 2 {
        return None;
    }
    let home_idx = lineups
        .iter()
        .position(|l| l.team.id == Some(home_id))
        .unwrap_or(0);
    let away_idx = if home_idx == 0 { 1 } else { 0 };
    Some(Lineups {
        home: map_team_lineup(&lineups[home_idx]),
        away: map_team_lineup(&lineups[away_idx]),
    })
}

fn map_af_standings(item: StandingsItem) -> Option<LeagueStanding> {
    let league = item.league;
    let rows = league.standings.into_iter().next().filter(|rows| !rows.is_empty())?;
    Some(LeagueStanding {
        league: League {
            id: league.id,
            name: league.name,
            country: league.country,
            logo: league.logo.unwrap_or_default(),
            flag: league.flag,
            season: league.season,
        },
        standings: rows
            .into_iter()
            .map(|row| StandingEntry {
                rank: row.rank,
                team: map_af_team(&row.team),
                played: row.all.played.unwrap_or(0),
                won: row.all.win.unwrap_or(0),
                drawn: row.all.draw.unwrap_or(0),
                lost: row.all.lose.unwrap_or(0),
                goals_for: row.all.goals.goals_for.unwrap_or(0),
                goals_against: row.all.goals.against.unwrap_or(0),
                goal_difference: row.goals_diff,
                points: row.points,
                form: row.form,
                description: row.description,
            })
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Mapping: football-data.org wire types → domain types
// ---------------------------------------------------------------------------

fn map_fd_status(status: &str) -> MatchStatus {
    match status {
        "SCHEDULED" | "TIMED" => MatchStatus::NotStarted,
        "IN_PLAY" => MatchStatus::Live,
        "PAUSED" => MatchStatus::HalfTime,
        "FINISHED" => MatchStatus::FullTime,
        "SUSPENDED" => MatchStatus::Suspended,
        "POSTPONED" => MatchStatus::Postponed,
        "CANCELLED" => MatchStatus::Cancelled,
        "AWARDED" => MatchStatus::Awarded,
        _ => MatchStatus::NotStarted,
    }
}

fn map_fd_team(team: &FdTeam) -> Team {
    let name = team.name.clone().unwrap_or_else(|| "TBD".into());
    Team {
        id: team.id.unwrap_or(0),
        short_name: team.tla.clone().unwrap_or_else(|| short_name(&name)),
        name,
        logo: team.crest.clone().unwrap_or_default(),
        code: team.tla.clone(),
    }
}

fn map_fd_match(m: &FdMatch) -> Match {
    let (date, time) = split_kickoff(&m.utc_date);
    let full = m.score.full_time.unwrap_or_default();
    let half = m.score.half_time.unwrap_or_default();
    let referee = m
        .referees
        .iter()
        .find(|r| r.role.as_deref() == Some("REFEREE"))
        .or_else(|| m.referees.first())
        .and_then(|r| r.name.clone());
    Match {
        id: m.id,
        league: League {
            id: league_id_from_competition(m.competition.id),
            name: m.competition.name.clone(),
            country: m.area.name.clone(),
            logo: m.competition.emblem.clone().unwrap_or_default(),
            flag: m.area.flag.clone(),
            season: None,
        },
        home_team: map_fd_team(&m.home_team),
        away_team: map_fd_team(&m.away_team),
        score: MatchScore {
            home: full.home.unwrap_or(0),
            away: full.away.unwrap_or(0),
            ht_home: half.home,
            ht_away: half.away,
            ..Default::default()
        },
        status: map_fd_status(&m.status),
        minute: m.minute,
        extra_minute: None,
        date,
        time,
        venue: m.venue.clone(),
        referee,
        events: Vec::new(),
        statistics: None,
        lineups: None,
    }
}

fn map_fd_standings(res: StandingsResponse) -> Option<LeagueStanding> {
    let table = res
        .standings
        .iter()
        .find(|t| t.table_type == "TOTAL")
        .or_else(|| res.standings.first())?;
    if table.table.is_empty() {
        return None;
    }
    let season = res
        .season
        .as_ref()
        .and_then(|s| s.start_date.as_deref())
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok());
    Some(LeagueStanding {
        league: League {
            id: league_id_from_competition(res.competition.id),
            name: res.competition.name.clone(),
            country: res.area.name.clone(),
            logo: res.competition.emblem.clone().unwrap_or_default(),
            flag: res.area.flag.clone(),
            season,
        },
        standings: table
            .table
            .iter()
            .map(|row| StandingEntry {
                rank: row.position,
                team: map_fd_team(&row.team),
                played: row.played_games,
                won: row.won,
                drawn: row.draw,
                lost: row.lost,
                goals_for: row.goals_for,
                goals_against: row.goals_against,
                goal_difference: row.goal_difference,
                points: row.points,
                form: row.form.as_ref().map(|f| f.replace(',', "")),
                description: None,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn provider(kind: Provider, server: &Server) -> FootballApi {
        FootballApi::new(ProviderConfig {
            provider: kind,
            api_key: "test-key".into(),
            api_football_base: server.url(),
            football_data_base: server.url(),
            fallback_to_mock: false,
        })
    }

    const FIXTURE_JSON: &str = r#"{
        "response": [{
            "fixture": {
                "id": 868100,
                "referee": "Michael Oliver",
                "date": "2025-10-12T15:30:00+00:00",
                "venue": { "name": "Anfield", "city": "Liverpool" },
                "status": { "short": "2H", "elapsed": 67, "extra": null }
            },
            "league": { "id": 39, "name": "Premier League", "country": "England", "logo": "l.png", "flag": "f.svg", "season": 2025 },
            "teams": {
                "home": { "id": 40, "name": "Liverpool", "logo": "liv.png" },
                "away": { "id": 49, "name": "Chelsea", "logo": "che.png" }
            },
            "goals": { "home": 2, "away": null },
            "score": {
                "halftime": { "home": 1, "away": 0 },
                "fulltime": { "home": null, "away": null },
                "extratime": { "home": null, "away": null },
                "penalty": { "home": null, "away": null }
            }
        }]
    }"#;

    #[test]
    fn config_falls_back_to_mock_without_a_key() {
        let mut config = ProviderConfig { provider: Provider::ApiFootball, ..Default::default() };
        assert_eq!(config.effective_provider(), Provider::Mock);
        config.api_key = PLACEHOLDER_KEY.into();
        assert_eq!(config.effective_provider(), Provider::Mock);
        config.api_key = "abc".into();
        assert_eq!(config.effective_provider(), Provider::ApiFootball);
    }

    #[test]
    fn provider_names_parse() {
        assert_eq!(Provider::parse("api-football"), Some(Provider::ApiFootball));
        assert_eq!(Provider::parse(" Football-Data "), Some(Provider::FootballData));
        assert_eq!(Provider::parse("espn"), None);
    }

    #[test]
    fn event_types_follow_type_and_detail() {
        assert_eq!(map_event_type("Goal", "Normal Goal"), EventType::Goal);
        assert_eq!(map_event_type("Goal", "Penalty"), EventType::PenaltyGoal);
        assert_eq!(map_event_type("Goal", "Own Goal"), EventType::OwnGoal);
        assert_eq!(map_event_type("Goal", "Missed Penalty"), EventType::PenaltyMissed);
        assert_eq!(map_event_type("Card", "Yellow Card"), EventType::YellowCard);
        assert_eq!(map_event_type("Card", "Red Card"), EventType::RedCard);
        assert_eq!(map_event_type("subst", "Substitution 1"), EventType::Substitution);
        assert_eq!(map_event_type("Var", "Goal cancelled"), EventType::Var);
        assert_eq!(map_event_type("Something", ""), EventType::Goal);
    }

    #[test]
    fn football_data_statuses_map_to_short_codes() {
        assert_eq!(map_fd_status("SCHEDULED"), MatchStatus::NotStarted);
        assert_eq!(map_fd_status("TIMED"), MatchStatus::NotStarted);
        assert_eq!(map_fd_status("IN_PLAY"), MatchStatus::Live);
        assert_eq!(map_fd_status("PAUSED"), MatchStatus::HalfTime);
        assert_eq!(map_fd_status("FINISHED"), MatchStatus::FullTime);
        assert_eq!(map_fd_status("SUSPENDED"), MatchStatus::Suspended);
        assert_eq!(map_fd_status("POSTPONED"), MatchStatus::Postponed);
        assert_eq!(map_fd_status("CANCELLED"), MatchStatus::Cancelled);
        assert_eq!(map_fd_status("AWARDED"), MatchStatus::Awarded);
        assert_eq!(map_fd_status("LIVE_ISH"), MatchStatus::NotStarted);
    }

    #[test]
    fn statistics_need_two_teams_and_pair_by_index() {
        let raw: Vec<TeamStatistics> = serde_json::from_str(
            r#"[
                { "team": { "id": 49 }, "statistics": [
                    { "type": "Shots on Goal", "value": 3 },
                    { "type": "Ball Possession", "value": "46%" }
                ]},
                { "team": { "id": 40 }, "statistics": [
                    { "type": "Shots on Goal", "value": 6 },
                    { "type": "Ball Possession", "value": "54%" },
                    { "type": "expected_goals", "value": null }
                ]}
            ]"#,
        )
        .unwrap();
        let stats = map_statistics(&raw, 40).unwrap();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].home, StatValue::Number(6.0));
        assert_eq!(stats[0].away, StatValue::Number(3.0));
        assert_eq!(stats[1].home, StatValue::Text("54%".into()));
        assert_eq!(stats[2].away, StatValue::Number(0.0));
        assert_eq!(map_statistics(&raw[..1], 40), None);
    }

    #[test]
    fn short_names_are_three_uppercase_letters() {
        assert_eq!(short_name("Liverpool"), "LIV");
        assert_eq!(short_name("PSV"), "PSV");
        assert_eq!(short_name("Al"), "AL");
    }

    #[test]
    fn kickoff_splits_date_and_time() {
        let (date, time) = split_kickoff("2025-10-12T15:30:00+00:00");
        assert_eq!(date, "2025-10-12");
        assert_eq!(time.len(), 5);
        let (date, time) = split_kickoff("2025-10-12 15:30");
        assert_eq!(date, "2025-10-12 15:30");
        assert_eq!(time, "15:30");
    }

    #[test]
    fn embedded_mock_data_parses() {
        let matches = mock_matches().expect("mock matches should parse");
        assert!(matches.iter().any(Match::is_live));
        assert!(matches.iter().any(Match::is_upcoming));
        assert!(matches.iter().any(Match::is_finished));
        assert!(matches.iter().any(|m| m.bucket().is_none()));
        let standings = mock_standings(None).expect("mock standings should parse");
        assert_eq!(standings.len(), TRACKED_LEAGUES.len());
        assert_eq!(mock_standings(Some(140)).unwrap().len(), 1);
    }

    #[test]
    fn mock_minutes_only_move_forward_within_the_half() {
        let original: Vec<Match> = serde_json::from_str(MOCK_MATCHES_JSON).unwrap();
        let nudged = mock_matches().unwrap();
        for (before, after) in original.iter().zip(&nudged) {
            match (before.minute, after.minute) {
                (Some(b), Some(a)) => assert!(a >= b && a <= b + 2, "{} {b} -> {a}", before.id),
                (b, a) => assert_eq!(b, a),
            }
            if after.status == MatchStatus::FirstHalf {
                assert!(after.minute.unwrap_or(0) <= 45);
            }
        }
    }

    #[tokio::test]
    async fn mock_provider_serves_the_embedded_dataset() {
        let api = FootballApi::default();
        assert_eq!(api.provider(), Provider::Mock);
        assert!(!api.fetch_matches(None).await.unwrap().is_empty());
        assert_eq!(api.fetch_match(1001).await.unwrap().unwrap().home_team.short_name, "LIV");
        assert!(api.fetch_match(42).await.unwrap().is_none());
        assert_eq!(api.fetch_leagues().await.unwrap().len(), 5);
        let found = api.search_matches("barcelona").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1004);
    }

    #[tokio::test]
    async fn mock_ticker_only_has_live_headlines() {
        let api = FootballApi::default();
        let items = api.fetch_ticker().await.unwrap();
        assert!(!items.is_empty());
        assert!(items.iter().all(|i| i.event_type.is_headline()));
        assert!(items.windows(2).all(|w| w[0].minute >= w[1].minute));
        assert!(items.iter().all(|i| i.match_id != 1003), "finished match in ticker");
    }

    #[tokio::test]
    async fn api_football_fixtures_are_mapped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/fixtures")
            .match_query(Matcher::UrlEncoded("date".into(), "2025-10-12".into()))
            .match_header("x-apisports-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(FIXTURE_JSON)
            .create_async()
            .await;

        let api = provider(Provider::ApiFootball, &server);
        let matches = api.fetch_matches(Some("2025-10-12")).await.unwrap();
        mock.assert_async().await;

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.id, 868100);
        assert_eq!(m.status, MatchStatus::SecondHalf);
        assert_eq!(m.minute, Some(67));
        assert_eq!((m.score.home, m.score.away), (2, 0));
        assert_eq!(m.score.half_time(), Some((1, 0)));
        assert_eq!(m.home_team.short_name, "LIV");
        assert_eq!(m.date, "2025-10-12");
        assert_eq!(m.venue.as_deref(), Some("Anfield"));
        assert!(m.events.is_empty());
        assert_eq!(m.statistics, None);
    }

    #[tokio::test]
    async fn api_football_detail_merges_events_stats_and_lineups() {
        let mut server = Server::new_async().await;
        let fixture = server
            .mock("GET", "/fixtures")
            .match_query(Matcher::UrlEncoded("id".into(), "868100".into()))
            .with_status(200)
            .with_body(FIXTURE_JSON)
            .create_async()
            .await;
        server
            .mock("GET", "/fixtures/events")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"response":[
                    {"time":{"elapsed":12,"extra":null},"team":{"id":40},"player":{"id":1,"name":"Mohamed Salah"},"assist":{"id":2,"name":"Trent Alexander-Arnold"},"type":"Goal","detail":"Normal Goal"},
                    {"time":{"elapsed":45,"extra":2},"team":{"id":49},"player":{"id":3,"name":null},"assist":{"id":null,"name":null},"type":"Card","detail":"Yellow Card"}
                ]}"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/fixtures/statistics")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/fixtures/lineups")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"response":[
                    {"team":{"id":49},"formation":null,"startXI":[{"player":{"id":9,"name":"Cole Palmer","number":20,"pos":"M"}}],"substitutes":[],"coach":{"id":5,"name":"Enzo Maresca"}},
                    {"team":{"id":40},"formation":"4-3-3","startXI":[{"player":{"id":7,"name":"Alisson","number":1,"pos":"G"}}],"substitutes":[],"coach":null}
                ]}"#,
            )
            .create_async()
            .await;

        let api = provider(Provider::ApiFootball, &server);
        let m = api.fetch_match(868100).await.unwrap().unwrap();
        fixture.assert_async().await;

        assert_eq!(m.events.len(), 2);
        assert_eq!(m.events[0].id, "e-868100-0");
        assert_eq!(m.events[0].team, Side::Home);
        assert_eq!(m.events[0].assist.as_deref(), Some("Trent Alexander-Arnold"));
        assert_eq!(m.events[1].event_type, EventType::YellowCard);
        assert_eq!(m.events[1].team, Side::Away);
        assert_eq!(m.events[1].player, "Unknown");
        assert_eq!(m.events[1].minute_label(), "45'+2");
        assert_eq!(m.statistics, None, "failed statistics should be tolerated");

        let lineups = m.lineups.unwrap();
        assert_eq!(lineups.home.formation, "4-3-3");
        assert_eq!(lineups.home.start_xi[0].name, "Alisson");
        assert_eq!(lineups.away.formation, DEFAULT_FORMATION);
        assert_eq!(lineups.away.coach, "Enzo Maresca");
    }

    #[tokio::test]
    async fn api_football_unknown_fixture_is_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/fixtures")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"response":[]}"#)
            .create_async()
            .await;
        let api = provider(Provider::ApiFootball, &server);
        assert!(api.fetch_match(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn server_errors_surface_without_fallback() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/fixtures")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let api = provider(Provider::ApiFootball, &server);
        let err = api.fetch_matches(Some("2025-10-12")).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(..)), "{err}");
    }

    #[tokio::test]
    async fn server_errors_fall_back_to_mock_when_enabled() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/fixtures")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;
        let mut api = provider(Provider::ApiFootball, &server);
        api.config.fallback_to_mock = true;
        let matches = api.fetch_matches(Some("2025-10-12")).await.unwrap();
        assert_eq!(matches.len(), mock_matches().unwrap().len());
    }

    #[tokio::test]
    async fn malformed_bodies_are_parse_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/fixtures")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;
        let api = provider(Provider::ApiFootball, &server);
        let err = api.fetch_matches(Some("2025-10-12")).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)), "{err}");
    }

    #[tokio::test]
    async fn football_data_matches_are_mapped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/matches")
            .match_query(Matcher::Any)
            .match_header("X-Auth-Token", "test-key")
            .with_status(200)
            .with_body(
                r#"{"matches":[{
                    "id": 537785,
                    "utcDate": "2025-10-12T14:00:00Z",
                    "status": "PAUSED",
                    "minute": 45,
                    "competition": { "id": 2021, "name": "Premier League", "code": "PL", "emblem": "pl.png" },
                    "area": { "name": "England", "flag": "eng.svg" },
                    "homeTeam": { "id": 65, "name": "Manchester City FC", "tla": "MCI", "crest": "mci.png" },
                    "awayTeam": { "id": 66, "name": "Manchester United FC", "tla": null, "crest": null },
                    "score": { "fullTime": { "home": 1, "away": null }, "halfTime": { "home": 1, "away": 0 } },
                    "referees": [
                        { "name": "Darren England", "type": "ASSISTANT_REFEREE_N1" },
                        { "name": "Simon Hooper", "type": "REFEREE" }
                    ]
                }]}"#,
            )
            .create_async()
            .await;

        let api = provider(Provider::FootballData, &server);
        let matches = api.fetch_matches(Some("2025-10-12")).await.unwrap();
        mock.assert_async().await;

        let m = &matches[0];
        assert_eq!(m.status, MatchStatus::HalfTime);
        assert_eq!(m.league.id, 39);
        assert_eq!(m.league.country, "England");
        assert_eq!(m.home_team.short_name, "MCI");
        assert_eq!(m.away_team.short_name, "MAN");
        assert_eq!((m.score.home, m.score.away), (1, 0));
        assert_eq!(m.score.half_time(), Some((1, 0)));
        assert_eq!(m.referee.as_deref(), Some("Simon Hooper"));
    }

    #[tokio::test]
    async fn football_data_missing_match_is_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/matches/99")
            .with_status(404)
            .create_async()
            .await;
        let api = provider(Provider::FootballData, &server);
        assert!(api.fetch_match(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn football_data_standings_use_the_total_table() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/competitions/2014/standings")
            .with_status(200)
            .with_body(
                r#"{
                    "competition": { "id": 2014, "name": "Primera Division", "code": "PD", "emblem": "pd.png" },
                    "area": { "name": "Spain", "flag": "es.svg" },
                    "season": { "startDate": "2025-08-15" },
                    "standings": [
                        { "type": "HOME", "table": [] },
                        { "type": "TOTAL", "table": [{
                            "position": 1,
                            "team": { "id": 81, "name": "FC Barcelona", "tla": "FCB", "crest": "fcb.png" },
                            "playedGames": 9, "form": "W,W,D,W,L",
                            "won": 6, "draw": 2, "lost": 1, "points": 20,
                            "goalsFor": 24, "goalsAgainst": 9, "goalDifference": 15
                        }]}
                    ]
                }"#,
            )
            .create_async()
            .await;
        let api = provider(Provider::FootballData, &server);
        let standings = api.fetch_standings(Some(140)).await.unwrap();
        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].league.id, 140);
        assert_eq!(standings[0].league.season, Some(2025));
        let row = &standings[0].standings[0];
        assert_eq!(row.team.short_name, "FCB");
        assert_eq!(row.form.as_deref(), Some("WWDWL"));
        assert_eq!(row.goal_difference, 15);
    }

    #[tokio::test]
    async fn api_football_standings_skip_empty_leagues() {
        let mut server = Server::new_async().await;
        server
            .mock(
                "GET",
                Matcher::Regex(r"^/standings\?league=(140|135|78|61)&season=2025$".into()),
            )
            .with_status(200)
            .with_body(r#"{"response":[]}"#)
            .expect(4)
            .create_async()
            .await;
        server
            .mock("GET", "/standings")
            .match_query(Matcher::UrlEncoded("league".into(), "39".into()))
            .with_status(200)
            .with_body(
                r#"{"response":[{"league":{
                    "id": 39, "name": "Premier League", "country": "England", "logo": "l.png", "flag": null, "season": 2025,
                    "standings": [[{
                        "rank": 1, "team": { "id": 40, "name": "Liverpool", "logo": "liv.png" },
                        "points": 23, "goalsDiff": 14, "form": "WWWDW", "description": "Promotion - Champions League (League phase: )",
                        "all": { "played": 9, "win": 7, "draw": 2, "lose": 0, "goals": { "for": 20, "against": 6 } }
                    }]]
                }}]}"#,
            )
            .create_async()
            .await;

        let api = provider(Provider::ApiFootball, &server);
        let standings = api.fetch_standings(None).await.unwrap();
        assert_eq!(standings.len(), 1);
        let row = &standings[0].standings[0];
        assert_eq!(row.team.short_name, "LIV");
        assert_eq!((row.won, row.drawn, row.lost), (7, 2, 0));
        assert_eq!(row.goals_for, 20);
        assert_eq!(row.recent_form(), vec!['W', 'W', 'W', 'D', 'W']);
    }
}
