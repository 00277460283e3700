use football_api::filter::{stat_leader, stat_percent};
use football_api::{MatchStatistic, Side};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

/// Label row, bar row, spacer.
pub const STAT_HEIGHT: u16 = 3;

const LEADING: Color = Color::Green;
const TRAILING: Color = Color::DarkGray;

/// Columns of a `width` wide bar given to the home side.
pub fn home_cells(width: u16, home_pct: u16, away_pct: u16) -> u16 {
    let total = u32::from(home_pct) + u32::from(away_pct);
    if total == 0 {
        return width / 2;
    }
    ((u32::from(width) * u32::from(home_pct) + total / 2) / total) as u16
}

/// One split bar per statistic, the leading side highlighted.
pub struct StatsBarView<'a> {
    pub statistics: &'a [MatchStatistic],
    pub scroll_offset: u16,
}

impl<'a> Widget for StatsBarView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 12 || area.height < 2 {
            return;
        }

        if self.statistics.is_empty() {
            let msg = "Statistics not available";
            let x = area.x + area.width.saturating_sub(msg.len() as u16) / 2;
            buf.set_string(x, area.y, msg, Style::default().fg(Color::DarkGray));
            return;
        }

        let visible = (area.height / STAT_HEIGHT).max(1) as usize;
        for (i, stat) in self
            .statistics
            .iter()
            .skip(self.scroll_offset as usize)
            .take(visible)
            .enumerate()
        {
            let y = area.y + i as u16 * STAT_HEIGHT;
            draw_stat(stat, Rect::new(area.x, y, area.width, 2), buf);
        }
    }
}

fn draw_stat(stat: &MatchStatistic, area: Rect, buf: &mut Buffer) {
    let leader = stat_leader(&stat.home, &stat.away);
    let side_style = |side: Side| {
        if leader == Some(side) {
            Style::default().fg(LEADING).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let home = stat.home.to_string();
    let away = stat.away.to_string();
    buf.set_string(area.x, area.y, &home, side_style(Side::Home));
    let label_x = area.x + area.width.saturating_sub(stat.stat_type.len() as u16) / 2;
    buf.set_string(label_x, area.y, &stat.stat_type, Style::default().fg(Color::DarkGray));
    let away_x = area.right().saturating_sub(away.len() as u16);
    buf.set_string(away_x, area.y, &away, side_style(Side::Away));

    if area.height < 2 {
        return;
    }
    let (home_pct, away_pct) = stat_percent(&stat.home, &stat.away);
    let split = home_cells(area.width, home_pct, away_pct);
    let bar_color = |side: Side| if leader == Some(side) { LEADING } else { TRAILING };
    let y = area.y + 1;
    buf.set_string(
        area.x,
        y,
        "━".repeat(split as usize),
        Style::default().fg(bar_color(Side::Home)),
    );
    buf.set_string(
        area.x + split,
        y,
        "━".repeat((area.width - split) as usize),
        Style::default().fg(bar_color(Side::Away)),
    );
}
