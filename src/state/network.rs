use crate::state::messages::{NetworkRequest, NetworkResponse};
use football_api::cache::{QueryData, QueryKey};
use football_api::client::{ApiResult, FootballApi};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: FootballApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: FootballApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        debug!("network worker using provider {}", self.client.provider().label());
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let NetworkRequest::Fetch { key } = request;
            let result = fetch_query(&self.client, &key).await;

            debug!("query {key:?} complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = NetworkResponse::QueryResolved {
                key,
                result: result.map_err(|err| err.to_string()),
            };

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

/// Run the provider call behind a query key.
pub async fn fetch_query(client: &FootballApi, key: &QueryKey) -> ApiResult<QueryData> {
    match key {
        QueryKey::Matches(date) => client
            .fetch_matches(date.as_deref())
            .await
            .map(QueryData::Matches),
        QueryKey::Match(id) => client
            .fetch_match(*id)
            .await
            .map(|m| QueryData::Match(m.map(Box::new))),
        QueryKey::Standings(league) => client
            .fetch_standings(*league)
            .await
            .map(QueryData::Standings),
        QueryKey::Ticker => client.fetch_ticker().await.map(QueryData::Ticker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use football_api::client::ProviderConfig;

    fn mock_client() -> FootballApi {
        FootballApi::new(ProviderConfig::default())
    }

    #[tokio::test]
    async fn match_list_query_returns_matches() {
        let data = fetch_query(&mock_client(), &QueryKey::Matches(None)).await.unwrap();
        let QueryData::Matches(matches) = data else {
            panic!("expected a match list, got {data:?}");
        };
        assert!(!matches.is_empty());
    }

    #[tokio::test]
    async fn unknown_match_resolves_to_none() {
        let data = fetch_query(&mock_client(), &QueryKey::Match(424242)).await.unwrap();
        assert_eq!(data, QueryData::Match(None));
    }

    #[tokio::test]
    async fn standings_query_filters_by_league() {
        let data = fetch_query(&mock_client(), &QueryKey::Standings(Some(39))).await.unwrap();
        let QueryData::Standings(tables) = data else {
            panic!("expected standings, got {data:?}");
        };
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].league.id, 39);
    }

    #[tokio::test]
    async fn worker_answers_each_request_with_a_resolution() {
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        let worker = NetworkWorker::new(mock_client(), req_rx, resp_tx);
        let task = tokio::spawn(worker.run());

        req_tx.send(NetworkRequest::Fetch { key: QueryKey::Ticker }).await.unwrap();

        let resolved = loop {
            match resp_rx.recv().await {
                Some(NetworkResponse::QueryResolved { key, result }) => break (key, result),
                Some(NetworkResponse::LoadingStateChanged { .. }) => continue,
                None => panic!("worker hung up"),
            }
        };
        assert_eq!(resolved.0, QueryKey::Ticker);
        assert!(matches!(resolved.1, Ok(QueryData::Ticker(_))));
        task.abort();
    }
}
