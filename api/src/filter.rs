//! Pure list operations over normalized matches: tab filter, search,
//! favorites, ordering and league grouping. Nothing here touches the network.
use crate::{Bucket, Match, MatchStatus, Side, StatValue, TickerItem};
use chrono::{Datelike, Duration, NaiveDate};
use std::borrow::Borrow;

/// The three list views of the scores screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchTab {
    #[default]
    Live,
    Fixtures,
    Results,
}

impl MatchTab {
    pub const ALL: [MatchTab; 3] = [MatchTab::Live, MatchTab::Fixtures, MatchTab::Results];

    pub fn label(&self) -> &'static str {
        match self {
            MatchTab::Live => "Live",
            MatchTab::Fixtures => "Fixtures",
            MatchTab::Results => "Results",
        }
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            MatchTab::Live => Bucket::Live,
            MatchTab::Fixtures => Bucket::Upcoming,
            MatchTab::Results => Bucket::Finished,
        }
    }

    /// Message shown when the tab has nothing to list.
    pub fn empty_message(&self) -> &'static str {
        match self {
            MatchTab::Live => "No live matches right now",
            MatchTab::Fixtures => "No upcoming fixtures",
            MatchTab::Results => "No results available",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            MatchTab::Live => MatchTab::Fixtures,
            MatchTab::Fixtures => MatchTab::Results,
            MatchTab::Results => MatchTab::Live,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            MatchTab::Live => MatchTab::Results,
            MatchTab::Fixtures => MatchTab::Live,
            MatchTab::Results => MatchTab::Fixtures,
        }
    }
}

pub fn filter_by_tab<'a, I>(matches: I, tab: MatchTab) -> Vec<&'a Match>
where
    I: IntoIterator<Item = &'a Match>,
{
    matches
        .into_iter()
        .filter(|m| m.bucket() == Some(tab.bucket()))
        .collect()
}

/// Case-insensitive substring match on team names, short names and league name.
/// An empty query matches everything. Whitespace is matched literally.
pub fn matches_query(m: &Match, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }
    [
        m.home_team.name.as_str(),
        m.away_team.name.as_str(),
        m.home_team.short_name.as_str(),
        m.away_team.short_name.as_str(),
        m.league.name.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

pub fn filter_favorites<'a, I>(matches: I, favorite_ids: &[u64]) -> Vec<&'a Match>
where
    I: IntoIterator<Item = &'a Match>,
{
    matches
        .into_iter()
        .filter(|m| favorite_ids.contains(&m.id))
        .collect()
}

fn sort_tier(status: MatchStatus) -> u8 {
    match status.bucket() {
        Some(Bucket::Live) => 0,
        Some(Bucket::Upcoming) => 1,
        _ => 2,
    }
}

/// Live first, then upcoming, then everything else; ties by kickoff time.
/// Stable, so equal keys keep their provider order.
pub fn sort_matches<M: Borrow<Match>>(matches: &mut [M]) {
    matches.sort_by(|a, b| {
        let a = <M as Borrow<Match>>::borrow(a);
        let b = <M as Borrow<Match>>::borrow(b);
        sort_tier(a.status)
            .cmp(&sort_tier(b.status))
            .then_with(|| a.time.cmp(&b.time))
    });
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueGroup<'a> {
    pub league_id: u64,
    pub league_name: String,
    pub country: String,
    pub matches: Vec<&'a Match>,
}

impl LeagueGroup<'_> {
    pub fn title(&self) -> String {
        if self.country.is_empty() {
            self.league_name.clone()
        } else {
            format!("{} — {}", self.country, self.league_name)
        }
    }
}

/// Groups keyed by (league id, league name) in first-seen order.
pub fn group_by_league<'a, I>(matches: I) -> Vec<LeagueGroup<'a>>
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut groups: Vec<LeagueGroup<'a>> = Vec::new();
    for m in matches {
        match groups
            .iter_mut()
            .find(|g| g.league_id == m.league.id && g.league_name == m.league.name)
        {
            Some(group) => group.matches.push(m),
            None => groups.push(LeagueGroup {
                league_id: m.league.id,
                league_name: m.league.name.clone(),
                country: m.league.country.clone(),
                matches: vec![m],
            }),
        }
    }
    groups
}

/// Everything the scores list filters on.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchFilter<'f> {
    pub tab: Option<MatchTab>,
    pub query: &'f str,
    /// When set, only these match ids survive.
    pub favorites: Option<&'f [u64]>,
}

/// Tab, then search, then favorites, then ordering.
pub fn filter_matches<'a>(matches: &'a [Match], filter: &MatchFilter<'_>) -> Vec<&'a Match> {
    let mut out: Vec<&Match> = match filter.tab {
        Some(tab) => filter_by_tab(matches, tab),
        None => matches.iter().collect(),
    };
    out.retain(|m| matches_query(m, filter.query));
    if let Some(ids) = filter.favorites {
        out = filter_favorites(out, ids);
    }
    sort_matches(&mut out);
    out
}

pub fn live_count(matches: &[Match]) -> usize {
    matches.iter().filter(|m| m.is_live()).count()
}

/// Bar shares for one statistic. Unparseable values count as zero.
pub fn stat_percent(home: &StatValue, away: &StatValue) -> (u16, u16) {
    let h = home.as_f64().unwrap_or(0.0);
    let a = away.as_f64().unwrap_or(0.0);
    let total = h + a;
    if total == 0.0 {
        return (50, 50);
    }
    (
        (h / total * 100.0).round() as u16,
        (a / total * 100.0).round() as u16,
    )
}

/// Side with the strictly larger value, when both sides parse.
pub fn stat_leader(home: &StatValue, away: &StatValue) -> Option<Side> {
    let (h, a) = (home.as_f64()?, away.as_f64()?);
    if h > a {
        Some(Side::Home)
    } else if a > h {
        Some(Side::Away)
    } else {
        None
    }
}

fn clock(minute: Option<u16>, extra: Option<u16>, status: MatchStatus) -> String {
    match (minute, extra) {
        (Some(m), Some(e)) if e > 0 => format!("{m}'+{e}"),
        (Some(m), _) => format!("{m}'"),
        (None, _) => status.code().to_owned(),
    }
}

pub fn status_display(status: MatchStatus, minute: Option<u16>, extra: Option<u16>) -> String {
    match status {
        MatchStatus::NotStarted => "Not Started".into(),
        MatchStatus::FirstHalf | MatchStatus::SecondHalf => clock(minute, extra, status),
        MatchStatus::ExtraTime => match minute {
            Some(m) => format!("ET {m}'"),
            None => "ET".into(),
        },
        MatchStatus::BreakTime => "Break".into(),
        MatchStatus::PenaltiesInProgress => "PEN".into(),
        MatchStatus::Live => match minute {
            Some(m) if m > 0 => format!("{m}'"),
            _ => "LIVE".into(),
        },
        other => other.code().into(),
    }
}

/// "Today", "Tomorrow", "Yesterday" or "Sat 12 Oct". Unparseable dates are
/// returned unchanged.
pub fn format_date(date: &str, today: NaiveDate) -> String {
    let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return date.to_owned();
    };
    if day == today {
        "Today".into()
    } else if day == today + Duration::days(1) {
        "Tomorrow".into()
    } else if day == today - Duration::days(1) {
        "Yesterday".into()
    } else {
        format!("{} {} {}", day.format("%a"), day.day(), day.format("%b"))
    }
}

/// Headline events of live matches, newest first.
pub fn build_ticker(matches: &[Match], timestamp: &str) -> Vec<TickerItem> {
    let mut items: Vec<(u16, u16, TickerItem)> = matches
        .iter()
        .filter(|m| m.is_live())
        .flat_map(|m| {
            m.events
                .iter()
                .filter(|e| e.event_type.is_headline())
                .map(move |e| {
                    let team = &m.team(e.team).short_name;
                    let item = TickerItem {
                        id: format!("t-{}", e.id),
                        match_id: m.id,
                        event_type: e.event_type,
                        message: format!(
                            "{} {} {} ({team}) | {}",
                            e.event_type.icon(),
                            e.minute_label(),
                            e.player,
                            m.scoreline()
                        ),
                        minute: e.minute,
                        timestamp: timestamp.to_owned(),
                    };
                    (e.minute, e.extra_minute.unwrap_or(0), item)
                })
        })
        .collect();
    items.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    items.into_iter().map(|(_, _, item)| item).collect()
}
