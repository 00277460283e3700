use tui::layout::{Constraint, Layout, Rect, Size};

pub const TAB_BAR_HEIGHT: u16 = 3;
pub const HEADER_HEIGHT: u16 = 1;
pub const TICKER_HEIGHT: u16 = 1;
const LOG_PANE_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
#[derive(Debug, Default, PartialEq)]
pub struct LayoutAreas {
    pub header: Rect,
    pub ticker: Rect,
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    /// Zero-sized unless the log pane is open.
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (body, logs) = Self::split_logs(area, show_logs);

        if full_screen {
            return LayoutAreas { main: body, logs, ..LayoutAreas::default() };
        }

        let [header, ticker, tab, main] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(TICKER_HEIGHT),
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(body);

        LayoutAreas {
            header,
            ticker,
            tab_bar: Self::split_tab_bar(tab),
            main,
            logs,
        }
    }

    fn split_logs(area: Rect, show_logs: bool) -> (Rect, Rect) {
        if !show_logs {
            return (area, Rect::ZERO);
        }
        let [body, logs] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Percentage(LOG_PANE_PERCENT),
        ])
        .areas(area);
        (body, logs)
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_ticker_and_tabs_sit_above_main() {
        let areas = LayoutAreas::new(Size::new(100, 40));
        assert_eq!(areas.header, Rect::new(0, 0, 100, 1));
        assert_eq!(areas.ticker, Rect::new(0, 1, 100, 1));
        assert_eq!(areas.tab_bar[0].y, 2);
        assert_eq!(areas.main.y, 2 + TAB_BAR_HEIGHT);
        assert_eq!(areas.main.height, 40 - 2 - TAB_BAR_HEIGHT);
        assert_eq!(areas.logs, Rect::ZERO);
    }

    #[test]
    fn full_screen_gives_main_everything() {
        let mut areas = LayoutAreas::default();
        areas.update(Rect::new(0, 0, 80, 24), true, false);
        assert_eq!(areas.main, Rect::new(0, 0, 80, 24));
        assert_eq!(areas.header, Rect::ZERO);
    }

    #[test]
    fn log_pane_takes_the_bottom() {
        let mut areas = LayoutAreas::default();
        areas.update(Rect::new(0, 0, 80, 40), false, true);
        assert_eq!(areas.logs.height, 12);
        assert_eq!(areas.logs.y + areas.logs.height, 40);
        assert_eq!(areas.main.y + areas.main.height, areas.logs.y);
    }
}
