use football_api::{Match, Side};
use log::{info, warn};
use std::collections::HashMap;
use std::io::{self, Write};

/// A goal spotted between two refreshes of the same live match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalAlert {
    pub match_id: u64,
    pub side: Side,
    pub title: String,
    pub body: String,
    /// Same goal, same tag: lets a notifier collapse duplicates.
    pub tag: String,
}

impl GoalAlert {
    fn new(m: &Match, side: Side) -> Self {
        let minute = m.minute.map(|min| format!(" ({min}')")).unwrap_or_default();
        Self {
            match_id: m.id,
            side,
            title: format!("GOAL! {}", m.team(side).name),
            body: format!("{}{minute}", m.scoreline()),
            tag: format!("goal-{}-{}-{}", m.id, m.score.home, m.score.away),
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, alert: &GoalAlert);
}

/// Rings the terminal bell. The toast itself is raised by the app.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, alert: &GoalAlert) {
        if let Err(e) = ring_bell(&mut std::io::stdout()) {
            warn!("failed to ring the bell: {e}");
        }
        let side = match alert.side {
            Side::Home => "home",
            Side::Away => "away",
        };
        info!("match {} ({side} goal) {}: {}", alert.match_id, alert.title, alert.body);
    }
}

fn ring_bell<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(b"\x07")?;
    out.flush()
}

/// Remembers the last live score of each match and reports increases.
#[derive(Debug, Default)]
pub struct GoalWatcher {
    enabled: bool,
    last_scores: HashMap<u64, (u16, u16)>,
}

impl GoalWatcher {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, last_scores: HashMap::new() }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip alerts on or off; returns the new setting. Switching off forgets
    /// every score so stale ones can't fire when switched back on.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.last_scores.clear();
        }
        self.enabled
    }

    pub fn observe(&mut self, matches: &[Match]) -> Vec<GoalAlert> {
        if !self.enabled {
            return Vec::new();
        }
        let mut alerts = Vec::new();
        for m in matches.iter().filter(|m| m.is_live()) {
            let current = (m.score.home, m.score.away);
            if let Some(&(home, away)) = self.last_scores.get(&m.id) {
                if current.0 > home {
                    alerts.push(GoalAlert::new(m, Side::Home));
                }
                if current.1 > away {
                    alerts.push(GoalAlert::new(m, Side::Away));
                }
            }
            self.last_scores.insert(m.id, current);
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use football_api::{MatchScore, MatchStatus, Team};

    fn live(id: u64, home: u16, away: u16) -> Match {
        Match {
            id,
            home_team: Team { name: "Liverpool".into(), short_name: "LIV".into(), ..Default::default() },
            away_team: Team { name: "Chelsea".into(), short_name: "CHE".into(), ..Default::default() },
            score: MatchScore { home, away, ..Default::default() },
            status: MatchStatus::SecondHalf,
            minute: Some(67),
            ..Default::default()
        }
    }

    #[test]
    fn first_sighting_is_silent() {
        let mut watcher = GoalWatcher::new(true);
        assert!(watcher.observe(&[live(1, 2, 1)]).is_empty());
    }

    #[test]
    fn home_goal_raises_one_alert() {
        let mut watcher = GoalWatcher::new(true);
        watcher.observe(&[live(1, 1, 1)]);

        let alerts = watcher.observe(&[live(1, 2, 1)]);
        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.side, Side::Home);
        assert_eq!(alert.title, "GOAL! Liverpool");
        assert_eq!(alert.body, "LIV 2 - 1 CHE (67')");
        assert_eq!(alert.tag, "goal-1-2-1");

        // Same score again: nothing new.
        assert!(watcher.observe(&[live(1, 2, 1)]).is_empty());
    }

    #[test]
    fn both_sides_scoring_between_polls_alerts_twice() {
        let mut watcher = GoalWatcher::new(true);
        watcher.observe(&[live(1, 0, 0)]);
        let alerts = watcher.observe(&[live(1, 1, 1)]);
        let sides: Vec<Side> = alerts.iter().map(|a| a.side).collect();
        assert_eq!(sides, vec![Side::Home, Side::Away]);
    }

    #[test]
    fn lower_scores_do_not_alert() {
        let mut watcher = GoalWatcher::new(true);
        watcher.observe(&[live(1, 2, 1)]);
        // VAR took one back.
        assert!(watcher.observe(&[live(1, 1, 1)]).is_empty());
        // Scoring again from the corrected score does alert.
        assert_eq!(watcher.observe(&[live(1, 2, 1)]).len(), 1);
    }

    #[test]
    fn finished_and_disabled_are_ignored() {
        let mut watcher = GoalWatcher::new(false);
        watcher.observe(&[live(1, 0, 0)]);
        assert!(watcher.observe(&[live(1, 1, 0)]).is_empty());

        assert!(watcher.toggle());
        let mut finished = live(2, 0, 0);
        finished.status = MatchStatus::FullTime;
        watcher.observe(&[finished.clone()]);
        finished.score.home = 1;
        assert!(watcher.observe(&[finished]).is_empty());
    }

    #[test]
    fn switching_off_forgets_scores() {
        let mut watcher = GoalWatcher::new(true);
        watcher.observe(&[live(1, 0, 0)]);
        assert!(!watcher.toggle());
        assert!(watcher.toggle());
        assert!(watcher.observe(&[live(1, 3, 0)]).is_empty());
    }

    #[test]
    fn bell_write_errors_are_returned() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut out = Vec::new();
        ring_bell(&mut out).unwrap();
        assert_eq!(out, b"\x07");
        let err = ring_bell(&mut Closed).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn notifier_receives_alerts() {
        #[derive(Default)]
        struct Recorder(Vec<String>);
        impl Notifier for Recorder {
            fn notify(&mut self, alert: &GoalAlert) {
                self.0.push(alert.tag.clone());
            }
        }

        let mut watcher = GoalWatcher::new(true);
        let mut recorder = Recorder::default();
        watcher.observe(&[live(9, 0, 0)]);
        for alert in watcher.observe(&[live(9, 0, 1)]) {
            recorder.notify(&alert);
        }
        assert_eq!(recorder.0, vec!["goal-9-0-1"]);
    }
}
