//! Lifecycle of the map's data: Loading, Error, Empty or Ready
//!
//! Exactly one state is active. Only fetch completion, an explicit retry or an
//! external refresh move the machine, and every fetch is identified by a
//! [`LoadTicket`] so a response for an outdated fetch, or one that arrives
//! after unmount, cannot touch the state.

use crate::core::{
    geo::LatLng,
    viewport::{FitBounds, ViewportCalculator},
};
use crate::data::property::{filter_renderable, PropertyGeoRecord};
use crate::Result;

/// What the map region shows
#[derive(Debug, Clone, PartialEq)]
pub enum MapUiState {
    Loading,
    Error { message: String },
    Empty,
    Ready {
        /// Renderable records, in provider order
        records: Vec<PropertyGeoRecord>,
        bounds: FitBounds,
    },
}

/// Discriminant of [`MapUiState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Loading,
    Error,
    Empty,
    Ready,
}

impl StateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error => "error",
            Self::Empty => "empty",
            Self::Ready => "ready",
        }
    }
}

impl MapUiState {
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Loading => StateKind::Loading,
            Self::Error { .. } => StateKind::Error,
            Self::Empty => StateKind::Empty,
            Self::Ready { .. } => StateKind::Ready,
        }
    }

    pub fn records(&self) -> &[PropertyGeoRecord] {
        match self {
            Self::Ready { records, .. } => records,
            _ => &[],
        }
    }

    pub fn fit_bounds(&self) -> Option<&FitBounds> {
        match self {
            Self::Ready { bounds, .. } => Some(bounds),
            _ => None,
        }
    }
}

/// Identifies one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of handing a fetch result to [`MapStateMachine::complete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// State moved to the given kind
    Applied(StateKind),
    /// Ticket was not the one in flight
    Stale,
    /// Map is no longer mounted
    Unmounted,
}

#[derive(Debug)]
pub struct MapStateMachine {
    state: MapUiState,
    calculator: ViewportCalculator,
    mounted: bool,
    generation: u64,
    in_flight: Option<LoadTicket>,
}

impl MapStateMachine {
    pub fn new(calculator: ViewportCalculator) -> Self {
        Self {
            state: MapUiState::Loading,
            calculator,
            mounted: false,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &MapUiState {
        &self.state
    }

    pub fn kind(&self) -> StateKind {
        self.state.kind()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn in_flight(&self) -> Option<LoadTicket> {
        self.in_flight
    }

    /// Enters Loading and issues the first fetch ticket
    pub fn mount(&mut self) -> LoadTicket {
        self.mounted = true;
        self.begin_load()
    }

    /// Starts a fetch unless one is already in flight
    pub fn begin_load(&mut self) -> LoadTicket {
        if let Some(ticket) = self.in_flight {
            return ticket;
        }
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        self.transition(MapUiState::Loading);
        ticket
    }

    /// Leaves Error for Loading. A no-op in every other state.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        if !self.mounted || self.kind() != StateKind::Error {
            return None;
        }
        Some(self.begin_load())
    }

    /// Reloads from Empty or Ready, e.g. after a filter change
    pub fn refresh(&mut self) -> Option<LoadTicket> {
        if !self.mounted || !matches!(self.kind(), StateKind::Empty | StateKind::Ready) {
            return None;
        }
        Some(self.begin_load())
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.in_flight = None;
    }

    /// Applies the result of the fetch identified by `ticket`
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<PropertyGeoRecord>>,
    ) -> LoadOutcome {
        if !self.mounted {
            return LoadOutcome::Unmounted;
        }
        if self.in_flight != Some(ticket) {
            #[cfg(feature = "debug")]
            log::debug!("Discarding stale response for load {}", ticket.generation);
            return LoadOutcome::Stale;
        }
        self.in_flight = None;

        let next = match result {
            Ok(records) => self.settle(records),
            Err(err) => MapUiState::Error {
                message: err.message(),
            },
        };
        let kind = next.kind();
        self.transition(next);
        LoadOutcome::Applied(kind)
    }

    fn settle(&self, records: Vec<PropertyGeoRecord>) -> MapUiState {
        let records = filter_renderable(records);
        let points: Vec<LatLng> = records.iter().filter_map(|r| r.position()).collect();

        match self.calculator.compute(&points) {
            Some(bounds) => MapUiState::Ready { records, bounds },
            None => MapUiState::Empty,
        }
    }

    fn transition(&mut self, next: MapUiState) {
        #[cfg(feature = "debug")]
        log::debug!("Map state {} -> {}", self.state.kind().as_str(), next.kind().as_str());
        self.state = next;
    }
}

impl Default for MapStateMachine {
    fn default() -> Self {
        Self::new(ViewportCalculator::default())
    }
}
