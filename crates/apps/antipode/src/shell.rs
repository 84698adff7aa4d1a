//! Presentation shell: owns the globe engine and keeps it in step with the
//! published [`SearchState`].

use std::fmt;

use layers::{BeamStyle, beam_layer, points_from_markers};
use runtime::{Event, EventBus, EventKind, Frame};
use scene::GlobeEngine;
use tracing::debug;

use crate::config::AppConfig;
use crate::orchestrator::{Notice, SceneLink};
use crate::post_process::ScenePostProcessor;
use crate::state::{PlacePair, SearchState};

/// Text shown once a search completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    pub origin_short: String,
    pub antipode_short: String,
    pub antipode_full: String,
}

impl InfoPanel {
    pub fn from_places(places: &PlacePair) -> Self {
        Self {
            origin_short: places.origin.short_name().to_string(),
            antipode_short: places.antipode.short_name().to_string(),
            antipode_full: places.antipode.display_name.clone(),
        }
    }
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "LOCATION: {}  ⇌  ANTIPODE: {}",
            self.origin_short, self.antipode_short
        )?;
        write!(f, "{}", self.antipode_full)
    }
}

pub struct PresentationShell<E> {
    engine: E,
    link: SceneLink,
    marker_altitude: f64,
    beam_style: BeamStyle,
    post: ScenePostProcessor,
    next_frame: Frame,
    events: EventBus,
    info: Option<InfoPanel>,
    notices: Vec<Notice>,
}

impl<E: GlobeEngine> PresentationShell<E> {
    /// Attaches to `engine` and arms the one-shot scene post-process.
    pub fn mount(engine: E, link: SceneLink, config: &AppConfig) -> Self {
        let first = Frame::first_at_hz(config.frame_hz);
        let mut shell = Self {
            engine,
            link,
            marker_altitude: config.markers.altitude,
            beam_style: config.beam,
            post: ScenePostProcessor::new(&config.post_process, first.time),
            next_frame: first,
            events: EventBus::new(),
            info: None,
            notices: Vec::new(),
        };
        shell.sync_bindings(first);
        shell
    }

    /// One render-loop iteration. Returns the frame that was run.
    pub fn frame(&mut self) -> Frame {
        let frame = self.next_frame;

        if self.link.state.has_changed().unwrap_or(false) {
            self.sync_bindings(frame);
        }

        while let Ok(request) = self.link.camera.try_recv() {
            if self.engine.transition_camera(request.pov, request.duration_ms) {
                self.events.emit(
                    frame,
                    EventKind::CameraTransition,
                    format!("lon {:.2} over {} ms", request.pov.lon, request.duration_ms),
                );
            } else {
                debug!(frame = frame.index, "scene not ready; camera move dropped");
            }
        }

        self.engine.tick(frame);

        if let Some(updated) = self.post.tick(frame, &mut self.engine) {
            self.events
                .emit(frame, EventKind::PostProcess, format!("{updated} meshes"));
        }

        while let Ok(notice) = self.link.notices.try_recv() {
            self.events
                .emit(frame, EventKind::Notice, notice.to_string());
            self.notices.push(notice);
        }

        self.next_frame = frame.next();
        frame
    }

    fn sync_bindings(&mut self, frame: Frame) {
        let state: SearchState = self.link.state.borrow_and_update().clone();

        self.engine
            .set_points_data(points_from_markers(&state.markers, self.marker_altitude));
        self.engine
            .set_custom_layer(beam_layer(state.beam.clone(), self.beam_style));
        self.info = state.info.as_ref().map(InfoPanel::from_places);

        self.events.emit(
            frame,
            EventKind::BindingsSynced,
            format!("{} markers, {} beams", state.markers.len(), state.beam.len()),
        );
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn info_panel(&self) -> Option<&InfoPanel> {
        self.info.as_ref()
    }

    /// Notices received since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Takes the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn post_processor(&self) -> &ScenePostProcessor {
        &self.post
    }

    /// Detaches from the engine, cancelling the post-process if it has not run.
    pub fn unmount(mut self) -> E {
        self.post.cancel();
        self.engine
    }
}
