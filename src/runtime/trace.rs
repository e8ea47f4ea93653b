use crate::{
    animator::{
        engine::{AnimatorFrame, AnimatorSignal, CommandKind, Ticket},
        variant::Stage,
    },
    foundation::{
        core::Millis,
        error::{ChoreoError, ChoreoResult},
    },
    scene::{
        controller::{Intent, IntentRequest},
        host::ViewportSnapshot,
        state::{SceneLayer, SceneState},
    },
};

/// Boundary of the reveal scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPhase {
    /// Document extended and the scroll started.
    Start,
    /// Scroll reached its target.
    End,
}

/// One observable step of a session, in clock order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// An intent and its outcome.
    Intent {
        /// Clock value.
        at: Millis,
        /// What was asked.
        request: IntentRequest,
        /// Started or ignored.
        outcome: Intent,
    },
    /// A scene state was committed.
    Scene {
        /// Clock value.
        at: Millis,
        /// Committed state.
        state: SceneState,
    },
    /// A command was sent to the animator.
    Command {
        /// Clock value.
        at: Millis,
        /// Command tag.
        command: CommandKind,
        /// Ticket, for commands that resolve.
        ticket: Option<Ticket>,
    },
    /// A signal drained from the animator.
    Animator {
        /// The signal, carrying its own instant.
        signal: AnimatorSignal,
    },
    /// A scroll boundary of the leaf fall.
    Scroll {
        /// Clock value.
        at: Millis,
        /// Start or end.
        phase: ScrollPhase,
        /// Scroll offset at this boundary.
        offset: f64,
    },
    /// Home became visible after the reverse overlay.
    HomeFadeIn {
        /// Clock value.
        at: Millis,
    },
    /// The session was torn down.
    Teardown {
        /// Clock value.
        at: Millis,
    },
}

/// Append-only event log.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    /// Append one event.
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// All events in push order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Scene states in the order they were committed.
    pub fn scenes(&self) -> impl Iterator<Item = (Millis, &SceneState)> {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::Scene { at, state } => Some((*at, state)),
            _ => None,
        })
    }

    /// Instants at which `kind` was issued.
    pub fn commands(&self, kind: CommandKind) -> Vec<Millis> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Command { at, command, .. } if *command == kind => Some(*at),
                _ => None,
            })
            .collect()
    }

    /// Instants at which `stage` was entered, across all clones.
    pub fn stage_entries(&self, stage: Stage) -> Vec<Millis> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Animator {
                    signal: AnimatorSignal::StageEntered { stage: s, at, .. },
                } if *s == stage => Some(*at),
                _ => None,
            })
            .collect()
    }

    /// Serialize the log as pretty JSON.
    pub fn to_json_pretty(&self) -> ChoreoResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ChoreoError::serde(e.to_string()))
    }
}

/// Everything rendered at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    /// Clock value.
    pub at: Millis,
    /// Scene state.
    pub state: SceneState,
    /// Mounted layers, bottom to top.
    pub layers: Vec<SceneLayer>,
    /// Clone and overlay.
    pub animator: AnimatorFrame,
    /// Container flags and scroll.
    pub viewport: ViewportSnapshot,
}
