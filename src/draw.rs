use chrono::Local;
use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};

use crate::app::{App, Lookup, MenuItem};
use crate::components::stats_bar::StatsBarView;
use crate::components::ticker::TickerView;
use crate::components::timeline::TimelineView;
use crate::state::app_state::{DetailTab, ScoresState};
use crate::state::favorites::Favorites;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use football_api::filter::{self, MatchTab};
use football_api::{LeagueStanding, Match, StandingEntry, TeamLineup};

static TABS: &[&str; 3] = &["Scores", "Match", "Standings"];

const ORANGE: Color = Color::Rgb(255, 140, 0);

static HELP: &[(&str, &str)] = &[
    ("1 / 2 / 3", "Scores, Match and Standings tabs"),
    ("?", "this help, Esc to leave"),
    ("h / l, Tab", "previous / next tab, league or section"),
    ("j / k", "move selection or scroll"),
    ("Enter", "open the selected match"),
    ("s", "favourite the selected match"),
    ("t / T", "favourite the home / away team of the open match"),
    ("F", "show favourite matches only"),
    ("/", "search teams and leagues, Esc clears"),
    ("r", "refresh now"),
    ("n", "goal notifications on / off"),
    ("f", "full screen"),
    ("\"", "log pane"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let drawn = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
            f.render_widget(TickerView { items: app.ticker() }, layout.ticker);
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Scores => draw_scores(f, layout.main, app),
            MenuItem::Match => draw_match(f, layout.main, app),
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main, app),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_toast(f, f.area(), app);
        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = drawn {
        error!("failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

// ---------------------------------------------------------------------------
// Chrome: header, tabs, toast, logs
// ---------------------------------------------------------------------------

pub fn live_summary(live: usize) -> String {
    match live {
        0 => "All live scores and fixtures".to_string(),
        1 => "1 match live now".to_string(),
        n => format!("{n} matches live now"),
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let live = app.live_count();
    let left = Line::from(vec![
        Span::styled(" ⚽ kickoff ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            live_summary(live),
            Style::default().fg(if live > 0 { Color::Green } else { Color::Gray }),
        ),
    ]);
    f.render_widget(Paragraph::new(left), area);

    let bell = if app.goals.is_enabled() { "🔔 alerts on" } else { "🔕 alerts off" };
    let updated = app
        .state
        .last_updated
        .map(|t| format!("Updated {}", t.format("%H:%M:%S")))
        .unwrap_or_default();
    // Leave the last columns to the loading spinner.
    let right = format!("{bell}  {updated}    ");
    f.render_widget(
        Paragraph::new(right).style(dim()).alignment(Alignment::Right),
        area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Scores => 0,
        MenuItem::Match => 1,
        MenuItem::Standings => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_toast(f: &mut Frame, area: Rect, app: &App) {
    let Some(toast) = app.state.toast.as_ref() else {
        return;
    };
    let width = 44.min(area.width);
    let height = if toast.body.is_empty() { 3 } else { 4 };
    let popup = Rect::new(
        area.right().saturating_sub(width + 1),
        area.y + 1,
        width,
        height.min(area.height),
    );

    let block = default_border(Color::Yellow).title(Span::styled(
        format!(" {} ", toast.title),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ));
    let body = if toast.body.is_empty() { toast.title.as_str() } else { toast.body.as_str() };
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(body).block(block), popup);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(dim())
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_target(false);
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg).style(dim()).alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(2), 0, 1, 1)
    };
    f.render_widget(spinner, area);
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Why the filtered list is empty, most specific filter first.
pub fn empty_scores_message(scores: &ScoresState) -> String {
    if scores.favorites_only {
        "No favorite matches found".to_string()
    } else if !scores.query.is_empty() {
        format!("No matches found for \"{}\"", scores.query)
    } else {
        scores.tab.empty_message().to_string()
    }
}

fn draw_scores(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Scores ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [tab_line, search_line, _gap, list] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    draw_match_tabs(f, tab_line, app);
    draw_search_line(f, search_line, &app.state.scores);

    if !app.matches_loaded() {
        let msg = match app.matches_error() {
            Some(err) => format!("Failed to load matches:\n{err}"),
            None => "Loading matches...".to_string(),
        };
        f.render_widget(
            Paragraph::new(msg).style(dim()).alignment(Alignment::Center),
            list,
        );
        return;
    }

    let mut list = list;
    if app.matches_error().is_some() {
        let [warning, rest] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(list);
        f.render_widget(
            Paragraph::new("Failed to load matches. Showing cached data.")
                .style(Style::default().fg(Color::Red)),
            warning,
        );
        list = rest;
    }

    let visible = app.visible_matches();
    if visible.is_empty() {
        f.render_widget(
            Paragraph::new(empty_scores_message(&app.state.scores))
                .style(dim())
                .alignment(Alignment::Center),
            list,
        );
        return;
    }

    let favorites = app.favorites.favorites();
    let selected_id = visible.get(app.state.scores.selected).map(|m| m.id);
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;

    for group in filter::group_by_league(visible) {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            group.title(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for m in group.matches {
            let selected = selected_id == Some(m.id);
            if selected {
                selected_line = lines.len();
            }
            lines.push(match_row(m, selected, favorites.includes(m)));
        }
    }

    let offset = selected_line.saturating_sub(list.height.saturating_sub(1) as usize) as u16;
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), list);
}

fn draw_match_tabs(f: &mut Frame, area: Rect, app: &App) {
    let scores = &app.state.scores;
    let live = app.live_count();
    let mut spans = Vec::new();
    for tab in MatchTab::ALL {
        let label = match tab {
            MatchTab::Live if live > 0 => format!(" {} ({live}) ", tab.label()),
            _ => format!(" {} ", tab.label()),
        };
        let style = if tab == scores.tab {
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        let style = match tab {
            MatchTab::Live if live > 0 => style.fg(Color::Green),
            _ => style,
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    if scores.favorites_only {
        spans.push(Span::styled("  ★ favorites only", Style::default().fg(Color::Yellow)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_search_line(f: &mut Frame, area: Rect, scores: &ScoresState) {
    let line = if scores.searching {
        Line::from(Span::styled(
            format!("/ {}_", scores.query),
            Style::default().fg(Color::Yellow),
        ))
    } else if !scores.query.is_empty() {
        Line::from(vec![
            Span::styled("Search: ", dim()),
            Span::raw(scores.query.as_str()),
            Span::styled("  (Esc clears)", dim()),
        ])
    } else {
        Line::from(Span::styled(
            "/ search   s favourite   F favorites only   Enter details",
            dim(),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn score_text(m: &Match) -> String {
    if m.is_upcoming() {
        "  vs  ".to_string()
    } else {
        format!(" {} - {} ", m.score.home, m.score.away)
    }
}

fn status_text(m: &Match) -> String {
    if m.is_upcoming() && !m.time.is_empty() {
        m.time.clone()
    } else {
        filter::status_display(m.status, m.minute, m.extra_minute)
    }
}

fn match_row(m: &Match, selected: bool, favorite: bool) -> Line<'static> {
    let status_style = if m.is_live() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        dim()
    };
    let line = Line::from(vec![
        Span::raw(if selected { "> " } else { "  " }),
        Span::styled(format!("{:<12}", status_text(m)), status_style),
        Span::raw(format!("{:>22}", clip(&m.home_team.name, 22))),
        Span::styled(score_text(m), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{:<22}", clip(&m.away_team.name, 22))),
        Span::styled(if favorite { " ★" } else { "" }, Style::default().fg(Color::Yellow)),
    ]);
    if selected {
        line.style(Style::default().bg(Color::DarkGray))
    } else {
        line
    }
}

fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ---------------------------------------------------------------------------
// Match detail
// ---------------------------------------------------------------------------

fn draw_match(f: &mut Frame, area: Rect, app: &App) {
    let m = match app.detail_match() {
        Lookup::Found(m) => m,
        Lookup::Pending => return draw_placeholder(f, area, "Loading match..."),
        Lookup::Missing if app.state.detail.match_id.is_some() => {
            return draw_placeholder(f, area, "Match not found");
        }
        Lookup::Missing => {
            return draw_placeholder(f, area, "Select a match on the Scores tab and press Enter");
        }
    };

    let block = default_border(Color::White).title(format!(" {} ", m.league.name));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, tabs, _gap, body] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(match_header(m, app.favorites.favorites())).alignment(Alignment::Center),
        header,
    );
    draw_detail_tabs(f, tabs, m, app.state.detail.tab);

    let scroll = app.state.detail.scroll_offset;
    match app.state.detail.tab {
        DetailTab::Events => f.render_widget(
            TimelineView {
                events: &m.events,
                home_name: &m.home_team.name,
                away_name: &m.away_team.name,
                scroll_offset: scroll,
            },
            body,
        ),
        DetailTab::Statistics => f.render_widget(
            StatsBarView {
                statistics: m.statistics.as_deref().unwrap_or_default(),
                scroll_offset: scroll,
            },
            body,
        ),
        DetailTab::Lineups => draw_lineups(f, body, m, scroll),
        DetailTab::Info => f.render_widget(Paragraph::new(info_lines(m)), body),
    }
}

fn match_header(m: &Match, favorites: &Favorites) -> Vec<Line<'static>> {
    let status_style = if m.is_live() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        dim()
    };
    let star = Style::default().fg(Color::Yellow);
    let team_star = |id: u64, mark: &'static str| if favorites.is_favorite_team(id) { mark } else { "" };
    let mut teams = vec![
        Span::styled(team_star(m.home_team.id, "★ "), star),
        Span::styled(m.home_team.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(score_text(m), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled(m.away_team.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(team_star(m.away_team.id, " ★"), star),
    ];
    if favorites.is_favorite_match(m.id) {
        teams.push(Span::styled("  ★ match", star));
    }

    let mut extra = Vec::new();
    if let Some((h, a)) = m.score.half_time() {
        extra.push(format!("HT {h}-{a}"));
    }
    if let Some((h, a)) = m.score.penalties() {
        extra.push(format!("PEN {h}-{a}"));
    }

    vec![
        Line::from(Span::styled(status_text(m), status_style)),
        Line::from(teams),
        Line::from(Span::styled(extra.join("   "), dim())),
    ]
}

fn draw_detail_tabs(f: &mut Frame, area: Rect, m: &Match, active: DetailTab) {
    let mut spans = Vec::new();
    for tab in DetailTab::ALL {
        let style = if !tab.is_available(m) {
            dim().add_modifier(Modifier::CROSSED_OUT)
        } else if tab == active {
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", tab.label()), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_lineups(f: &mut Frame, area: Rect, m: &Match, scroll: u16) {
    let Some(lineups) = m.lineups.as_ref() else {
        f.render_widget(
            Paragraph::new("Lineups not available").style(dim()).alignment(Alignment::Center),
            area,
        );
        return;
    };
    let [home, away] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    for (side_area, name, lineup) in [
        (home, &m.home_team.name, &lineups.home),
        (away, &m.away_team.name, &lineups.away),
    ] {
        f.render_widget(
            Paragraph::new(lineup_lines(name, lineup)).scroll((scroll, 0)),
            side_area,
        );
    }
}

fn lineup_lines(team: &str, lineup: &TeamLineup) -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(team.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", lineup.formation), dim()),
        ]),
    ];
    if !lineup.coach.is_empty() {
        lines.push(Line::from(Span::styled(format!("Coach: {}", lineup.coach), dim())));
    }

    for (title, players) in [("Starting XI", &lineup.start_xi), ("Substitutes", &lineup.substitutes)] {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(title, heading)));
        for p in players {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>3} ", p.number), dim()),
                Span::raw(p.name.clone()),
                Span::styled(format!("  {}", p.position), dim()),
            ]));
        }
    }
    lines
}

fn info_lines(m: &Match) -> Vec<Line<'static>> {
    let today = Local::now().date_naive();
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<10}"), dim()),
            Span::raw(value),
        ])
    };
    let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "Unknown".to_string());
    let league = if m.league.country.is_empty() {
        m.league.name.clone()
    } else {
        format!("{} ({})", m.league.name, m.league.country)
    };

    vec![
        row("Date", filter::format_date(&m.date, today)),
        row("Kick-off", m.time.clone()),
        row("Venue", or_unknown(&m.venue)),
        row("Referee", or_unknown(&m.referee)),
        row("League", league),
    ]
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// Row colour of a qualification or relegation zone.
pub fn description_color(description: &str) -> Option<Color> {
    let desc = description.to_lowercase();
    if desc.contains("champions league") {
        Some(Color::Blue)
    } else if desc.contains("europa league") {
        Some(ORANGE)
    } else if desc.contains("conference") {
        Some(Color::Green)
    } else if desc.contains("relegation") {
        Some(Color::Red)
    } else {
        None
    }
}

fn form_color(result: char) -> Color {
    match result {
        'W' => Color::Green,
        'D' => Color::Yellow,
        'L' => Color::Red,
        _ => Color::DarkGray,
    }
}

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.state.standings.league {
        None => " Standings: all leagues (h/l to pick one) ".to_string(),
        Some(_) => " Standings (h/l to change league) ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let tables = match app.standings() {
        Lookup::Found(tables) => tables,
        Lookup::Pending => {
            f.render_widget(
                Paragraph::new("Loading standings...").style(dim()).alignment(Alignment::Center),
                inner,
            );
            return;
        }
        Lookup::Missing => {
            f.render_widget(
                Paragraph::new("Failed to load standings")
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }
    };

    if tables.is_empty() {
        f.render_widget(
            Paragraph::new("No standings available").style(dim()).alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = tables.iter().flat_map(standing_lines).collect();
    f.render_widget(
        Paragraph::new(lines).scroll((app.state.standings.scroll_offset, 0)),
        inner,
    );
}

fn standing_lines(table: &LeagueStanding) -> Vec<Line<'static>> {
    let title = if table.league.country.is_empty() {
        table.league.name.clone()
    } else {
        format!("{} — {}", table.league.country, table.league.name)
    };
    let mut lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{:>3}  {:<24}{:>4}{:>4}{:>4}{:>4}{:>5}{:>5}{:>5}{:>5}  Form",
                "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
            ),
            dim(),
        )),
    ];
    lines.extend(table.standings.iter().map(standing_row));

    let legend: Vec<Span> = table
        .descriptions()
        .into_iter()
        .filter_map(|desc| {
            description_color(desc)
                .map(|color| Span::styled(format!("■ {desc}   "), Style::default().fg(color)))
        })
        .collect();
    if !legend.is_empty() {
        lines.push(Line::from(legend));
    }
    lines.push(Line::from(""));
    lines
}

fn standing_row(entry: &StandingEntry) -> Line<'static> {
    let zone = entry.description.as_deref().and_then(description_color);
    let rank_style = match zone {
        Some(color) => Style::default().fg(color).add_modifier(Modifier::BOLD),
        None => Style::default(),
    };
    let mut spans = vec![
        Span::styled(format!("{:>3}", entry.rank), rank_style),
        Span::raw(format!(
            "  {:<24}{:>4}{:>4}{:>4}{:>4}{:>5}{:>5}{:>+5}",
            clip(&entry.team.name, 23),
            entry.played,
            entry.won,
            entry.drawn,
            entry.lost,
            entry.goals_for,
            entry.goals_against,
            entry.goal_difference,
        )),
        Span::styled(
            format!("{:>5}  ", entry.points),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    spans.extend(
        entry
            .recent_form()
            .into_iter()
            .map(|c| Span::styled(c.to_string(), Style::default().fg(form_color(c)))),
    );
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Help
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = HELP
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Favorites are saved to {}", app.favorites.path().display()),
        dim(),
    )));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
