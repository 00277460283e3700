use football_api::TickerItem;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

const SEPARATOR: &str = "  •  ";
const LABEL: &str = " LIVE ";

pub fn ticker_text(items: &[TickerItem]) -> String {
    items
        .iter()
        .map(|item| item.message.as_str())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// One-line headline strip. Draws nothing while no live match has news.
pub struct TickerView<'a> {
    pub items: &'a [TickerItem],
}

impl<'a> Widget for TickerView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.items.is_empty() || area.width <= LABEL.len() as u16 || area.height == 0 {
            return;
        }

        let label = Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD);
        buf.set_string(area.x, area.y, LABEL, label);

        let x = area.x + LABEL.len() as u16 + 1;
        let room = area.right().saturating_sub(x) as usize;
        buf.set_stringn(x, area.y, ticker_text(self.items), room, Style::default().fg(Color::Gray));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(message: &str) -> TickerItem {
        TickerItem { message: message.into(), ..Default::default() }
    }

    #[test]
    fn messages_are_joined_with_bullets() {
        let items = [item("⚽ 67' Salah (LIV) | LIV 2 - 1 CHE"), item("🟥 50' Rice (ARS) | ARS 0 - 0 TOT")];
        assert_eq!(
            ticker_text(&items),
            "⚽ 67' Salah (LIV) | LIV 2 - 1 CHE  •  🟥 50' Rice (ARS) | ARS 0 - 0 TOT"
        );
    }

    #[test]
    fn nothing_drawn_without_items() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        TickerView { items: &[] }.render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn label_then_text() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        TickerView { items: &[item("GOAL")] }.render(area, &mut buf);
        assert_eq!(buf.cell((1, 0)).map(|c| c.symbol()), Some("L"));
        assert_eq!(buf.cell((1, 0)).map(|c| c.bg), Some(Color::Red));
        assert_eq!(buf.cell((7, 0)).map(|c| c.symbol()), Some("G"));
    }
}
