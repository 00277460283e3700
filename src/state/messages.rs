use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use football_api::cache::{QueryData, QueryKey};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    Fetch { key: QueryKey },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// Outcome of one fetch, handed to the query cache as is.
    QueryResolved { key: QueryKey, result: Result<QueryData, String> },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Once a second: hand due queries to the network worker, expire toasts.
    PollTick,
}
