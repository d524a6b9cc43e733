//! Background fetches on the tokio runtime
//!
//! The fetch is the only async operation of a map. It runs on a spawned task
//! and is never cancelled; the result is handed back through
//! [`crate::InteractivePropertyMap::complete_load`], which discards it if the
//! map was unmounted or a newer fetch started in the meantime.

use crate::{
    core::{map::InteractivePropertyMap, state::LoadTicket},
    data::{property::PropertyGeoRecord, provider::GeoDataProvider},
    MapError, Result,
};
use ::tokio::task::{JoinError, JoinHandle};
use futures::FutureExt;
use std::sync::Arc;

type FetchResult = Result<Vec<PropertyGeoRecord>>;

/// A fetch running on the runtime, tagged with its ticket
#[derive(Debug)]
pub struct PendingLoad {
    ticket: LoadTicket,
    handle: Option<JoinHandle<FetchResult>>,
}

impl PendingLoad {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }

    /// Returns the result once the task is done, without blocking
    pub fn try_take(&mut self) -> Option<FetchResult> {
        let handle = self.handle.as_mut()?;
        if !handle.is_finished() {
            return None;
        }
        let joined = handle.now_or_never()?;
        self.handle = None;
        Some(joined.unwrap_or_else(|err| Err(join_error(err))))
    }

    /// Waits for the fetch to finish
    pub async fn wait(mut self) -> FetchResult {
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or_else(|err| Err(join_error(err))),
            None => Err(MapError::DataFetch("fetch result already taken".into())),
        }
    }
}

fn join_error(err: JoinError) -> MapError {
    MapError::DataFetch(format!("fetch task failed: {err}"))
}

/// Spawns `provider.fetch_properties` for `ticket`
pub fn spawn_load(
    provider: Arc<dyn GeoDataProvider>,
    ticket: LoadTicket,
    max_count: Option<usize>,
) -> PendingLoad {
    #[cfg(feature = "debug")]
    log::debug!("Spawning fetch for load {}", ticket.generation());

    let handle = ::tokio::spawn(async move { provider.fetch_properties(max_count).await });
    PendingLoad {
        ticket,
        handle: Some(handle),
    }
}

impl InteractivePropertyMap {
    /// Spawns the in-flight fetch, if there is one
    pub fn spawn_in_flight(&self, provider: Arc<dyn GeoDataProvider>) -> Option<PendingLoad> {
        let ticket = self.in_flight()?;
        Some(spawn_load(provider, ticket, self.max_properties()))
    }

    /// Waits for a spawned fetch and applies it
    pub async fn finish(&mut self, pending: PendingLoad) -> crate::core::state::LoadOutcome {
        let ticket = pending.ticket();
        let result = pending.wait().await;
        self.complete_load(ticket, result)
    }
}
