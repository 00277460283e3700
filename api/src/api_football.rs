/// API-Football v3 raw wire types (the `response` payloads).
/// Endpoint root: https://v3.football.api-sports.io
/// These map to the domain types in client.rs.
use serde::Deserialize;

/// Every API-Football endpoint wraps its payload in `{ "response": [...] }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "Vec::new")]
    pub response: Vec<T>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self { response: Vec::new() }
    }
}

// ---------------------------------------------------------------------------
// Fixtures  (/fixtures?date= , /fixtures?id=)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct Fixture {
    pub fixture: FixtureInfo,
    pub league: ApiLeague,
    pub teams: FixtureTeams,
    #[serde(default)]
    pub goals: ScorePair,
    #[serde(default)]
    pub score: ScoreBreakdown,
    /// Only present on `/fixtures?id=`; merged in from `/fixtures/events` otherwise.
    #[serde(default)]
    pub events: Vec<ApiEvent>,
    #[serde(default)]
    pub statistics: Vec<TeamStatistics>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FixtureInfo {
    pub id: u64,
    pub referee: Option<String>,
    pub date: String, // ISO 8601 with offset
    pub venue: Option<ApiVenue>,
    pub status: FixtureStatus,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiVenue {
    pub name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FixtureStatus {
    pub short: String, // "1H", "FT", ...
    pub elapsed: Option<u16>,
    pub extra: Option<u16>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiLeague {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub logo: Option<String>,
    pub flag: Option<String>,
    pub season: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FixtureTeams {
    pub home: ApiTeam,
    pub away: ApiTeam,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiTeam {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct ScorePair {
    pub home: Option<u16>,
    pub away: Option<u16>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct ScoreBreakdown {
    #[serde(default)]
    pub halftime: ScorePair,
    #[serde(default)]
    pub fulltime: ScorePair,
    #[serde(default)]
    pub extratime: ScorePair,
    #[serde(default)]
    pub penalty: ScorePair,
}

// ---------------------------------------------------------------------------
// Events  (/fixtures/events?fixture=)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ApiEvent {
    pub time: EventTime,
    pub team: EventTeam,
    #[serde(default)]
    pub player: EventPerson,
    pub assist: Option<EventPerson>,
    #[serde(rename = "type")]
    pub event_type: String, // "Goal", "Card", "subst", "Var"
    pub detail: Option<String>, // "Normal Goal", "Yellow Card", ...
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct EventTime {
    pub elapsed: Option<u16>,
    pub extra: Option<u16>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct EventTeam {
    pub id: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EventPerson {
    pub id: Option<u64>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Statistics  (/fixtures/statistics?fixture=)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct TeamStatistics {
    pub team: EventTeam,
    #[serde(default)]
    pub statistics: Vec<StatEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatEntry {
    #[serde(rename = "type")]
    pub stat_type: String,
    /// Number, string ("55%") or null.
    pub value: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Lineups  (/fixtures/lineups?fixture=)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ApiLineup {
    pub team: EventTeam,
    pub formation: Option<String>,
    #[serde(rename = "startXI", default)]
    pub start_xi: Vec<LineupSlot>,
    #[serde(default)]
    pub substitutes: Vec<LineupSlot>,
    pub coach: Option<EventPerson>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LineupSlot {
    pub player: LineupPlayer,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LineupPlayer {
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    pub number: Option<u16>,
    pub pos: Option<String>,
}

// ---------------------------------------------------------------------------
// Standings  (/standings?league=&season=)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct StandingsItem {
    pub league: StandingsLeague,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StandingsLeague {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub logo: Option<String>,
    pub flag: Option<String>,
    pub season: Option<u16>,
    /// One table per group; domestic leagues have exactly one.
    #[serde(default)]
    pub standings: Vec<Vec<StandingRow>>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub rank: u16,
    pub team: ApiTeam,
    pub points: u16,
    pub goals_diff: i32,
    pub form: Option<String>,
    pub description: Option<String>,
    pub all: StandingRecord,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct StandingRecord {
    pub played: Option<u16>,
    pub win: Option<u16>,
    pub draw: Option<u16>,
    pub lose: Option<u16>,
    pub goals: StandingGoals,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct StandingGoals {
    #[serde(rename = "for")]
    pub goals_for: Option<u16>,
    pub against: Option<u16>,
}
