//! Search flow: forward lookup, antipode, reverse lookup, publish.
//!
//! A search runs through [`SearchPhase`]s strictly in order. Only a completed
//! search touches [`SearchState`], replacing it whole through a watch channel,
//! and then asks the shell for a camera move. Failures produce a [`Notice`]
//! and leave the published state alone.

use std::sync::atomic::{AtomicU64, Ordering};

use geocode::{GeocodeError, Geocoder, PlaceResult};
use layers::MarkerPairStyle;
use scene::camera::PointOfView;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, CameraFraming, StaleResponsePolicy};
use crate::state::{PlacePair, SearchState};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Geocoding,
    AntipodeComputed,
    ReverseGeocoding,
    Complete,
    Failed,
}

impl SearchPhase {
    pub fn can_advance_to(self, next: SearchPhase) -> bool {
        use SearchPhase::*;
        matches!(
            (self, next),
            (Idle, Geocoding)
                | (Geocoding, AntipodeComputed)
                | (Geocoding, Failed)
                | (AntipodeComputed, ReverseGeocoding)
                | (ReverseGeocoding, Complete)
                | (ReverseGeocoding, Failed)
                | (Complete, Idle)
                | (Failed, Idle)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// State was published and a camera move requested.
    Completed { generation: u64 },
    /// A lookup failed in phase `at`; state is unchanged.
    Failed { at: SearchPhase, error: GeocodeError },
    /// A newer search was issued while this one was in flight; its result was dropped.
    Superseded { generation: u64 },
    /// Blank query; nothing was looked up.
    Rejected,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraRequest {
    pub pov: PointOfView,
    pub duration_ms: u64,
}

/// User-facing message for a failed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NotFound { query: String },
    NetworkError { message: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::NotFound { .. } => write!(f, "City not found!"),
            Notice::NetworkError { message } => write!(f, "Lookup failed: {message}"),
        }
    }
}

/// Receiving ends handed to the presentation side.
#[derive(Debug)]
pub struct SceneLink {
    pub state: watch::Receiver<SearchState>,
    pub camera: mpsc::UnboundedReceiver<CameraRequest>,
    pub notices: mpsc::UnboundedReceiver<Notice>,
}

pub struct SearchOrchestrator<G> {
    geocoder: G,
    camera: CameraFraming,
    markers: MarkerPairStyle,
    policy: StaleResponsePolicy,
    issued: AtomicU64,
    state_tx: watch::Sender<SearchState>,
    camera_tx: mpsc::UnboundedSender<CameraRequest>,
    notice_tx: mpsc::UnboundedSender<Notice>,
}

impl<G: Geocoder> SearchOrchestrator<G> {
    pub fn new(geocoder: G, config: &AppConfig) -> (Self, SceneLink) {
        let (state_tx, state) = watch::channel(SearchState::default());
        let (camera_tx, camera) = mpsc::unbounded_channel();
        let (notice_tx, notices) = mpsc::unbounded_channel();
        let orchestrator = Self {
            geocoder,
            camera: config.camera,
            markers: config.markers.clone(),
            policy: config.stale_policy,
            issued: AtomicU64::new(0),
            state_tx,
            camera_tx,
            notice_tx,
        };
        (
            orchestrator,
            SceneLink {
                state,
                camera,
                notices,
            },
        )
    }

    /// Snapshot of the published state.
    pub fn state(&self) -> SearchState {
        self.state_tx.borrow().clone()
    }

    /// Generation of the most recently issued search (0 before the first).
    pub fn latest_generation(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Runs one search to completion.
    ///
    /// Overlapping calls are allowed; a new search never cancels an older
    /// one. Which result wins is decided by the configured
    /// [`StaleResponsePolicy`].
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            debug!("ignoring blank query");
            return SearchOutcome::Rejected;
        }

        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, query, "search started");
        let mut phase = SearchPhase::Idle;
        self.advance(&mut phase, SearchPhase::Geocoding, generation);

        let origin = match self.geocoder.forward(query).await {
            Ok(place) => place,
            Err(error) => return self.fail(generation, query, phase, error),
        };

        let antipode_point = origin.point.antipode();
        self.advance(&mut phase, SearchPhase::AntipodeComputed, generation);
        debug!(
            generation,
            lat = antipode_point.latitude,
            lon = antipode_point.longitude,
            "antipode computed"
        );

        self.advance(&mut phase, SearchPhase::ReverseGeocoding, generation);
        let antipode_name = match self.geocoder.reverse(antipode_point).await {
            Ok(name) => name,
            Err(error) => return self.fail(generation, query, phase, error),
        };

        if self.is_stale(generation) {
            info!(generation, query, "dropping superseded result");
            return SearchOutcome::Superseded { generation };
        }

        self.advance(&mut phase, SearchPhase::Complete, generation);
        let pov = self.camera.point_of_view(origin.point);
        let places = PlacePair {
            origin,
            antipode: PlaceResult::new(antipode_point, antipode_name),
        };
        info!(
            generation,
            origin = places.origin.short_name(),
            antipode = places.antipode.short_name(),
            "search complete"
        );
        self.state_tx
            .send_replace(SearchState::completed(query, places, &self.markers));

        let request = CameraRequest {
            pov,
            duration_ms: self.camera.duration_ms,
        };
        if self.camera_tx.send(request).is_err() {
            debug!(generation, "no scene attached for camera move");
        }
        SearchOutcome::Completed { generation }
    }

    fn advance(&self, phase: &mut SearchPhase, next: SearchPhase, generation: u64) {
        let from = *phase;
        debug_assert!(from.can_advance_to(next), "{from:?} -> {next:?}");
        debug!(generation, from = ?from, to = ?next, "search phase");
        *phase = next;
    }

    fn is_stale(&self, generation: u64) -> bool {
        match self.policy {
            StaleResponsePolicy::LatestIssued => generation != self.latest_generation(),
            StaleResponsePolicy::LatestCompleted => false,
        }
    }

    fn fail(
        &self,
        generation: u64,
        query: &str,
        mut phase: SearchPhase,
        error: GeocodeError,
    ) -> SearchOutcome {
        if self.is_stale(generation) {
            debug!(generation, error = %error, "superseded search failed");
            return SearchOutcome::Superseded { generation };
        }

        let at = phase;
        self.advance(&mut phase, SearchPhase::Failed, generation);
        warn!(generation, query, phase = ?at, error = %error, "search failed");
        let notice = match &error {
            GeocodeError::NotFound { query } => Notice::NotFound {
                query: query.clone(),
            },
            GeocodeError::Network(message) => Notice::NetworkError {
                message: message.clone(),
            },
        };
        if self.notice_tx.send(notice).is_err() {
            debug!(generation, "no listener for notices");
        }
        SearchOutcome::Failed { at, error }
    }
}
