/// football-data.org v4 raw wire types.
/// Endpoint root: https://api.football-data.org/v4
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<FdMatch>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FdMatch {
    pub id: u64,
    pub utc_date: String,
    pub status: String, // "SCHEDULED", "IN_PLAY", "FINISHED", ...
    pub minute: Option<u16>,
    pub competition: FdCompetition,
    #[serde(default)]
    pub area: FdArea,
    pub home_team: FdTeam,
    pub away_team: FdTeam,
    #[serde(default)]
    pub score: FdScore,
    pub venue: Option<String>,
    #[serde(default)]
    pub referees: Vec<FdReferee>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FdCompetition {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub code: Option<String>,
    pub emblem: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FdArea {
    #[serde(default)]
    pub name: String,
    pub flag: Option<String>,
}

/// Team fields are null until a knockout slot is decided.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FdTeam {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub tla: Option<String>,
    pub crest: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct FdScore {
    pub full_time: Option<FdPair>,
    pub half_time: Option<FdPair>,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct FdPair {
    pub home: Option<u16>,
    pub away: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FdReferee {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub role: Option<String>, // "REFEREE", "ASSISTANT_REFEREE_N1", ...
}

// ---------------------------------------------------------------------------
// Standings  (/competitions/{id}/standings)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct StandingsResponse {
    pub competition: FdCompetition,
    #[serde(default)]
    pub area: FdArea,
    pub season: Option<FdSeason>,
    #[serde(default)]
    pub standings: Vec<FdStandingTable>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FdSeason {
    pub start_date: Option<String>, // "2025-08-15"
}

#[derive(Debug, Deserialize, Clone)]
pub struct FdStandingTable {
    #[serde(rename = "type")]
    pub table_type: String, // "TOTAL", "HOME", "AWAY"
    #[serde(default)]
    pub table: Vec<FdTableRow>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FdTableRow {
    pub position: u16,
    pub team: FdTeam,
    pub played_games: u16,
    pub form: Option<String>, // "W,D,L,W,W"
    pub won: u16,
    pub draw: u16,
    pub lost: u16,
    pub points: u16,
    pub goals_for: u16,
    pub goals_against: u16,
    pub goal_difference: i32,
}
