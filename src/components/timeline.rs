use football_api::{EventTone, EventType, MatchEvent, Side};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

/// Width of the centre column holding the minute, e.g. ` 90'+4 `.
const MINUTE_COL: u16 = 8;

pub fn tone_color(tone: EventTone) -> Color {
    match tone {
        EventTone::Scored => Color::Green,
        EventTone::Setback => Color::Red,
        EventTone::Caution => Color::Yellow,
        EventTone::Change => Color::Blue,
        EventTone::Review => Color::Magenta,
    }
}

/// Events in match order. Stoppage time sorts after the minute it extends.
pub fn sorted_events(events: &[MatchEvent]) -> Vec<&MatchEvent> {
    let mut sorted: Vec<&MatchEvent> = events.iter().collect();
    sorted.sort_by_key(|e| (e.minute, e.extra_minute.unwrap_or(0)));
    sorted
}

pub fn event_text(event: &MatchEvent) -> String {
    let mut text = format!("{} {}", event.event_type.icon(), event.player);
    match (&event.event_type, &event.assist, &event.detail) {
        (EventType::Substitution, _, Some(detail)) => text.push_str(&format!(" ({detail})")),
        (_, Some(assist), _) => text.push_str(&format!(" (assist: {assist})")),
        _ => {}
    }
    text
}

/// Two-sided event timeline: home events right-aligned left of the minute
/// column, away events left-aligned to its right.
pub struct TimelineView<'a> {
    pub events: &'a [MatchEvent],
    pub home_name: &'a str,
    pub away_name: &'a str,
    pub scroll_offset: u16,
}

impl<'a> Widget for TimelineView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < MINUTE_COL + 4 || area.height < 2 {
            return;
        }

        let dim = Style::default().fg(Color::DarkGray);
        let side_w = (area.width - MINUTE_COL) / 2;
        let mid_x = area.x + side_w;
        let away_x = mid_x + MINUTE_COL;

        // Team names as column headers
        let home = clip(self.home_name, side_w.saturating_sub(1));
        let bold = Style::default().add_modifier(Modifier::BOLD);
        buf.set_string(mid_x.saturating_sub(width_of(&home) + 1), area.y, &home, bold);
        buf.set_string(away_x + 1, area.y, clip(self.away_name, side_w.saturating_sub(1)), bold);

        if self.events.is_empty() {
            let msg = "No events recorded yet";
            let x = area.x + area.width.saturating_sub(msg.len() as u16) / 2;
            buf.set_string(x, area.y + 1, msg, dim);
            return;
        }

        let rows = area.height - 1;
        for (row, event) in sorted_events(self.events)
            .into_iter()
            .skip(self.scroll_offset as usize)
            .take(rows as usize)
            .enumerate()
        {
            let y = area.y + 1 + row as u16;
            let style = Style::default().fg(tone_color(event.event_type.tone()));

            let minute = event.minute_label();
            let mx = mid_x + MINUTE_COL.saturating_sub(minute.len() as u16) / 2;
            buf.set_string(mid_x, y, " ".repeat(MINUTE_COL as usize), dim);
            buf.set_string(mx, y, &minute, dim.add_modifier(Modifier::BOLD));

            let text = clip(&event_text(event), side_w.saturating_sub(1));
            match event.team {
                Side::Home => {
                    let x = mid_x.saturating_sub(width_of(&text) + 1).max(area.x);
                    buf.set_string(x, y, &text, style);
                }
                Side::Away => {
                    buf.set_string(away_x + 1, y, &text, style);
                }
            }
        }
    }
}

fn width_of(s: &str) -> u16 {
    tui::text::Span::raw(s).width() as u16
}

/// Truncate to `max` display columns.
fn clip(s: &str, max: u16) -> String {
    let mut out = String::new();
    for c in s.chars() {
        let mut next = out.clone();
        next.push(c);
        if width_of(&next) > max {
            break;
        }
        out = next;
    }
    out
}
