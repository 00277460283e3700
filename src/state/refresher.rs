use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

const POLL_TICK: Duration = Duration::from_secs(1);

/// Drives the query cache. Each tick asks the app which queries are due; the
/// cache owns the actual schedules (15s live, 60s idle, 5 min standings).
pub struct PeriodicRefresher {
    ui_events: mpsc::Sender<UiEvent>,
}

impl PeriodicRefresher {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events }
    }

    pub async fn run(self) {
        let mut ticks = interval(POLL_TICK);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        ticks.tick().await;

        loop {
            ticks.tick().await;
            if self.ui_events.send(UiEvent::PollTick).await.is_err() {
                break;
            }
        }
    }
}
