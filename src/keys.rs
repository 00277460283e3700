use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use football_api::Side;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Apply one key press. Queries the new screen needs are picked up by the
/// caller through `App::due_queries`.
pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;
    let now = Instant::now();

    if guard.state.scores.searching {
        handle_search_input(key_event, &mut guard);
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => quit(),

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Scores),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Match),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Standings),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Scores list
        (MenuItem::Scores, Char('j') | KeyCode::Down, _) => guard.scores_down(),
        (MenuItem::Scores, Char('k') | KeyCode::Up, _) => guard.scores_up(),
        (MenuItem::Scores, Char('l') | KeyCode::Right | KeyCode::Tab, _) => {
            guard.state.scores.next_tab()
        }
        (MenuItem::Scores, Char('h') | KeyCode::Left | KeyCode::BackTab, _) => {
            guard.state.scores.prev_tab()
        }
        (MenuItem::Scores, KeyCode::Enter, _) => {
            guard.open_selected_match();
        }
        (MenuItem::Scores, Char('s'), _) => guard.toggle_selected_favorite(),
        (MenuItem::Scores, Char('F'), _) => guard.state.scores.toggle_favorites_only(),
        (MenuItem::Scores, Char('/'), _) => guard.state.scores.searching = true,
        (MenuItem::Scores, KeyCode::Esc, _) => guard.state.scores.clear_query(),

        // Match detail
        (MenuItem::Match, Char('l') | KeyCode::Right | KeyCode::Tab, _) => guard.detail_next_tab(),
        (MenuItem::Match, Char('h') | KeyCode::Left | KeyCode::BackTab, _) => {
            guard.detail_prev_tab()
        }
        (MenuItem::Match, Char('j') | KeyCode::Down, _) => guard.detail_scroll_down(),
        (MenuItem::Match, Char('k') | KeyCode::Up, _) => guard.detail_scroll_up(),
        (MenuItem::Match, Char('s'), _) => guard.toggle_detail_favorite(),
        (MenuItem::Match, Char('t'), _) => guard.toggle_detail_team_favorite(Side::Home),
        (MenuItem::Match, Char('T'), _) => guard.toggle_detail_team_favorite(Side::Away),
        (MenuItem::Match, KeyCode::Esc, _) => guard.update_tab(MenuItem::Scores),

        // Standings
        (MenuItem::Standings, Char('l') | KeyCode::Right | KeyCode::Tab, _) => {
            guard.state.standings.next_league()
        }
        (MenuItem::Standings, Char('h') | KeyCode::Left | KeyCode::BackTab, _) => {
            guard.state.standings.prev_league()
        }
        (MenuItem::Standings, Char('j') | KeyCode::Down, _) => guard.standings_scroll_down(),
        (MenuItem::Standings, Char('k') | KeyCode::Up, _) => guard.standings_scroll_up(),

        // Global
        (_, Char('r'), _) => guard.refresh(now),
        (_, Char('n'), _) => guard.toggle_notifications(now),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

fn handle_search_input(key_event: KeyEvent, app: &mut App) {
    let scores = &mut app.state.scores;
    match (key_event.code, key_event.modifiers) {
        (Char('c'), KeyModifiers::CONTROL) => quit(),
        (KeyCode::Esc, _) => scores.clear_query(),
        (KeyCode::Enter, _) => scores.searching = false,
        (KeyCode::Backspace, _) => scores.pop_query(),
        (Char(c), _) => scores.push_query(c),
        _ => {}
    }
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}
