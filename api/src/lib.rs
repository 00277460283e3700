pub mod api_football;
pub mod cache;
pub mod client;
pub mod filter;
pub mod football_data;

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types: normalized model, independent of any provider wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,       // "Liverpool"
    pub short_name: String, // "LIV"
    #[serde(default)]
    pub logo: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: u64,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub logo: String,
    pub flag: Option<String>,
    pub season: Option<u16>,
}

/// Current score plus the optional per-phase breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub home: u16,
    pub away: u16,
    pub ht_home: Option<u16>,
    pub ht_away: Option<u16>,
    pub ft_home: Option<u16>,
    pub ft_away: Option<u16>,
    pub et_home: Option<u16>,
    pub et_away: Option<u16>,
    pub pen_home: Option<u16>,
    pub pen_away: Option<u16>,
}

impl MatchScore {
    pub fn half_time(&self) -> Option<(u16, u16)> {
        self.ht_home.zip(self.ht_away)
    }

    pub fn penalties(&self) -> Option<(u16, u16)> {
        self.pen_home.zip(self.pen_away)
    }
}

/// Display bucket of a match. A status maps to at most one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Live,
    Upcoming,
    Finished,
}

/// Provider short status codes (API-Football vocabulary).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "TBD")]
    ToBeDefined,
    #[default]
    #[serde(rename = "NS")]
    NotStarted,
    #[serde(rename = "1H")]
    FirstHalf,
    #[serde(rename = "HT")]
    HalfTime,
    #[serde(rename = "2H")]
    SecondHalf,
    #[serde(rename = "ET")]
    ExtraTime,
    #[serde(rename = "BT")]
    BreakTime, // break before/inside extra time
    #[serde(rename = "P")]
    PenaltiesInProgress,
    #[serde(rename = "FT")]
    FullTime,
    #[serde(rename = "AET")]
    AfterExtraTime,
    #[serde(rename = "PEN")]
    AfterPenalties,
    #[serde(rename = "SUSP")]
    Suspended,
    #[serde(rename = "INT")]
    Interrupted,
    #[serde(rename = "PST")]
    Postponed,
    #[serde(rename = "CANC")]
    Cancelled,
    #[serde(rename = "ABD")]
    Abandoned,
    #[serde(rename = "AWD")]
    Awarded,
    #[serde(rename = "WO")]
    Walkover,
    #[serde(rename = "LIVE")]
    Live,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 19] = [
        MatchStatus::ToBeDefined,
        MatchStatus::NotStarted,
        MatchStatus::FirstHalf,
        MatchStatus::HalfTime,
        MatchStatus::SecondHalf,
        MatchStatus::ExtraTime,
        MatchStatus::BreakTime,
        MatchStatus::PenaltiesInProgress,
        MatchStatus::FullTime,
        MatchStatus::AfterExtraTime,
        MatchStatus::AfterPenalties,
        MatchStatus::Suspended,
        MatchStatus::Interrupted,
        MatchStatus::Postponed,
        MatchStatus::Cancelled,
        MatchStatus::Abandoned,
        MatchStatus::Awarded,
        MatchStatus::Walkover,
        MatchStatus::Live,
    ];

    /// Parse a provider short code. Unknown codes are treated as not started.
    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .unwrap_or(MatchStatus::NotStarted)
    }

    pub fn code(&self) -> &'static str {
        match self {
            MatchStatus::ToBeDefined => "TBD",
            MatchStatus::NotStarted => "NS",
            MatchStatus::FirstHalf => "1H",
            MatchStatus::HalfTime => "HT",
            MatchStatus::SecondHalf => "2H",
            MatchStatus::ExtraTime => "ET",
            MatchStatus::BreakTime => "BT",
            MatchStatus::PenaltiesInProgress => "P",
            MatchStatus::FullTime => "FT",
            MatchStatus::AfterExtraTime => "AET",
            MatchStatus::AfterPenalties => "PEN",
            MatchStatus::Suspended => "SUSP",
            MatchStatus::Interrupted => "INT",
            MatchStatus::Postponed => "PST",
            MatchStatus::Cancelled => "CANC",
            MatchStatus::Abandoned => "ABD",
            MatchStatus::Awarded => "AWD",
            MatchStatus::Walkover => "WO",
            MatchStatus::Live => "LIVE",
        }
    }

    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            MatchStatus::FirstHalf
            | MatchStatus::HalfTime
            | MatchStatus::SecondHalf
            | MatchStatus::ExtraTime
            | MatchStatus::BreakTime
            | MatchStatus::PenaltiesInProgress
            | MatchStatus::Live => Some(Bucket::Live),
            MatchStatus::ToBeDefined | MatchStatus::NotStarted => Some(Bucket::Upcoming),
            MatchStatus::FullTime
            | MatchStatus::AfterExtraTime
            | MatchStatus::AfterPenalties
            | MatchStatus::Awarded
            | MatchStatus::Walkover => Some(Bucket::Finished),
            MatchStatus::Suspended
            | MatchStatus::Interrupted
            | MatchStatus::Postponed
            | MatchStatus::Cancelled
            | MatchStatus::Abandoned => None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.bucket() == Some(Bucket::Live)
    }

    pub fn is_upcoming(&self) -> bool {
        self.bucket() == Some(Bucket::Upcoming)
    }

    pub fn is_finished(&self) -> bool {
        self.bucket() == Some(Bucket::Finished)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Goal,
    PenaltyGoal,
    OwnGoal,
    PenaltyMissed,
    YellowCard,
    RedCard,
    Substitution,
    Var,
}

/// Colour family an event is rendered in. The terminal layer picks the colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTone {
    Scored,
    Setback,
    Caution,
    Change,
    Review,
}

impl EventType {
    pub fn icon(&self) -> &'static str {
        match self {
            EventType::Goal => "⚽",
            EventType::PenaltyGoal => "⚽ (P)",
            EventType::OwnGoal => "⚽ (OG)",
            EventType::PenaltyMissed => "❌ (P)",
            EventType::YellowCard => "🟨",
            EventType::RedCard => "🟥",
            EventType::Substitution => "🔄",
            EventType::Var => "📺",
        }
    }

    pub fn tone(&self) -> EventTone {
        match self {
            EventType::Goal | EventType::PenaltyGoal => EventTone::Scored,
            EventType::OwnGoal | EventType::PenaltyMissed | EventType::RedCard => {
                EventTone::Setback
            }
            EventType::YellowCard => EventTone::Caution,
            EventType::Substitution => EventTone::Change,
            EventType::Var => EventTone::Review,
        }
    }

    /// Headline events make it into the live ticker.
    pub fn is_headline(&self) -> bool {
        matches!(
            self,
            EventType::Goal
                | EventType::PenaltyGoal
                | EventType::OwnGoal
                | EventType::PenaltyMissed
                | EventType::RedCard
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Home,
    Away,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub minute: u16,
    pub extra_minute: Option<u16>,
    pub team: Side,
    pub player: String,
    pub assist: Option<String>,
    pub detail: Option<String>,
}

impl MatchEvent {
    /// "45'+2" style minute label.
    pub fn minute_label(&self) -> String {
        match self.extra_minute {
            Some(extra) if extra > 0 => format!("{}'+{extra}", self.minute),
            _ => format!("{}'", self.minute),
        }
    }
}

/// Statistic values arrive either as numbers or as strings such as "55%".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl Default for StatValue {
    fn default() -> Self {
        StatValue::Number(0.0)
    }
}

impl StatValue {
    /// Numeric reading of the value. Strings parse their leading number
    /// ("55%" → 55.0); anything else is None.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) if n.is_finite() => Some(*n),
            StatValue::Number(_) => None,
            StatValue::Text(s) => parse_leading_f64(s),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            StatValue::Number(n) => write!(f, "{n}"),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistic {
    #[serde(rename = "type")]
    pub stat_type: String,
    pub home: StatValue,
    pub away: StatValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerLineup {
    pub id: u64,
    pub name: String,
    pub number: u16,
    pub position: String,
    pub rating: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamLineup {
    pub formation: String,
    pub start_xi: Vec<PlayerLineup>,
    pub substitutes: Vec<PlayerLineup>,
    pub coach: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lineups {
    pub home: TeamLineup,
    pub away: TeamLineup,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: u64,
    pub league: League,
    pub home_team: Team,
    pub away_team: Team,
    pub score: MatchScore,
    pub status: MatchStatus,
    pub minute: Option<u16>,
    pub extra_minute: Option<u16>,
    pub date: String, // "2025-10-12"
    pub time: String, // "16:30", local time
    pub venue: Option<String>,
    pub referee: Option<String>,
    #[serde(default)]
    pub events: Vec<MatchEvent>,
    pub statistics: Option<Vec<MatchStatistic>>,
    pub lineups: Option<Lineups>,
}

impl Match {
    pub fn bucket(&self) -> Option<Bucket> {
        self.status.bucket()
    }

    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    pub fn is_upcoming(&self) -> bool {
        self.status.is_upcoming()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn has_statistics(&self) -> bool {
        self.statistics.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// "LIV 2 - 1 CHE"
    pub fn scoreline(&self) -> String {
        format!(
            "{} {} - {} {}",
            self.home_team.short_name, self.score.home, self.score.away, self.away_team.short_name
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub rank: u16,
    pub team: Team,
    pub played: u16,
    pub won: u16,
    pub drawn: u16,
    pub lost: u16,
    pub goals_for: u16,
    pub goals_against: u16,
    pub goal_difference: i32,
    pub points: u16,
    pub form: Option<String>, // "WWDLW", oldest first
    pub description: Option<String>,
}

impl StandingEntry {
    /// Last five results, oldest first.
    pub fn recent_form(&self) -> Vec<char> {
        let form: Vec<char> = self
            .form
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        form[form.len().saturating_sub(5)..].to_vec()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueStanding {
    pub league: League,
    pub standings: Vec<StandingEntry>,
}

impl LeagueStanding {
    /// Distinct qualification descriptions, in table order.
    pub fn descriptions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for entry in &self.standings {
            if let Some(desc) = entry.description.as_deref()
                && !out.contains(&desc)
            {
                out.push(desc);
            }
        }
        out
    }
}

/// One headline line for the live ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerItem {
    pub id: String,
    pub match_id: u64,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub message: String,
    pub minute: u16,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_partition_the_status_enum() {
        for status in MatchStatus::ALL {
            let hits = [status.is_live(), status.is_upcoming(), status.is_finished()]
                .iter()
                .filter(|b| **b)
                .count();
            assert!(hits <= 1, "{status} sits in {hits} buckets");
        }
    }

    #[test]
    fn interrupted_and_called_off_statuses_have_no_bucket() {
        for status in [
            MatchStatus::Suspended,
            MatchStatus::Interrupted,
            MatchStatus::Postponed,
            MatchStatus::Cancelled,
            MatchStatus::Abandoned,
        ] {
            assert_eq!(status.bucket(), None, "{status}");
        }
    }

    #[test]
    fn bucket_lookup_matches_known_codes() {
        assert_eq!(MatchStatus::from_code("1H").bucket(), Some(Bucket::Live));
        assert_eq!(MatchStatus::from_code("P").bucket(), Some(Bucket::Live));
        assert_eq!(MatchStatus::from_code("LIVE").bucket(), Some(Bucket::Live));
        assert_eq!(MatchStatus::from_code("TBD").bucket(), Some(Bucket::Upcoming));
        assert_eq!(MatchStatus::from_code("WO").bucket(), Some(Bucket::Finished));
        assert_eq!(MatchStatus::from_code("AWD").bucket(), Some(Bucket::Finished));
    }

    #[test]
    fn unknown_status_code_is_not_started() {
        assert_eq!(MatchStatus::from_code("XYZ"), MatchStatus::NotStarted);
        assert_eq!(MatchStatus::from_code(""), MatchStatus::NotStarted);
    }

    #[test]
    fn status_codes_round_trip_through_serde() {
        let json = serde_json::to_string(&MatchStatus::SecondHalf).unwrap();
        assert_eq!(json, "\"2H\"");
        let back: MatchStatus = serde_json::from_str("\"AET\"").unwrap();
        assert_eq!(back, MatchStatus::AfterExtraTime);
    }

    #[test]
    fn stat_value_reads_leading_numbers() {
        assert_eq!(StatValue::Text("55%".into()).as_f64(), Some(55.0));
        assert_eq!(StatValue::Text(" 1.5 xG".into()).as_f64(), Some(1.5));
        assert_eq!(StatValue::Text("n/a".into()).as_f64(), None);
        assert_eq!(StatValue::Number(7.0).as_f64(), Some(7.0));
        assert_eq!(StatValue::Number(7.0).to_string(), "7");
    }

    #[test]
    fn stat_value_deserializes_numbers_and_strings() {
        let stat: MatchStatistic =
            serde_json::from_str(r#"{"type":"Ball Possession","home":"61%","away":39}"#).unwrap();
        assert_eq!(stat.home, StatValue::Text("61%".into()));
        assert_eq!(stat.away, StatValue::Number(39.0));
    }

    #[test]
    fn recent_form_keeps_last_five() {
        let entry = StandingEntry {
            form: Some("LLWWDWW".into()),
            ..Default::default()
        };
        assert_eq!(entry.recent_form(), vec!['W', 'W', 'D', 'W', 'W']);
        assert!(StandingEntry::default().recent_form().is_empty());
    }

    #[test]
    fn minute_label_includes_stoppage_time() {
        let mut event = MatchEvent { minute: 45, extra_minute: Some(2), ..Default::default() };
        assert_eq!(event.minute_label(), "45'+2");
        event.extra_minute = None;
        assert_eq!(event.minute_label(), "45'");
    }

    #[test]
    fn descriptions_are_distinct_and_ordered() {
        let row = |desc: Option<&str>| StandingEntry {
            description: desc.map(str::to_string),
            ..Default::default()
        };
        let standing = LeagueStanding {
            league: League::default(),
            standings: vec![
                row(Some("Promotion - Champions League")),
                row(Some("Promotion - Champions League")),
                row(None),
                row(Some("Relegation")),
            ],
        };
        assert_eq!(
            standing.descriptions(),
            vec!["Promotion - Champions League", "Relegation"]
        );
    }
}
