//! Scene controller: owns the scene state and the single transitioning guard, turns intents into
//! animator commands, and commits steady scenes after fixed settle waits.

use std::sync::Arc;

use crate::{
    animation::ease::Ease,
    animator::{
        engine::{AnimatorCommand, AnimatorSignal, CarriesAnimatorTask, Ticket, TransitionAnimator},
        variant::{Direction, Stage, Variant, select_variant},
    },
    config::{settings::ChoreoConfig, timing::TimingConfig},
    content::catalog::{ContentCatalog, ContentRecord, ObjectId},
    foundation::core::{Millis, ViewRect, Viewport},
    runtime::trace::{ScrollPhase, Trace, TraceEvent},
    scene::{
        host::{SceneHost, SharedViewport},
        lock::{ScrollExtension, ViewportLock},
        state::{DetailLayout, Scene, SceneState},
    },
    timing::scheduler::Scheduler,
};

/// User intent as recorded in traces.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum IntentRequest {
    /// Open the detail of a grid object.
    Select {
        /// Object clicked on the grid.
        object: ObjectId,
    },
    /// Leave the steady detail or visualizer scene.
    Back,
}

/// Why an intent was dropped.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// A transition is already running; intents are never queued.
    Busy,
    /// The intent has no meaning in the current scene.
    WrongScene {
        /// Scene the intent arrived in.
        scene: Scene,
    },
    /// The catalog has no such object.
    UnknownObject {
        /// Requested id.
        object: ObjectId,
    },
    /// Detail is showing but no catalog record matches it.
    NoActiveContent,
    /// The session was torn down.
    TornDown,
}

/// Outcome of an intent. Intents never fail; they either start a transition or are ignored.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// A transition started and the guard is held.
    Started,
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl Intent {
    /// Return `true` for [`Intent::Started`].
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Deferred controller work. `epoch` ties the task to the transition that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerTask {
    /// Destination scene is mounted; measure and issue the begin command.
    Measure {
        /// Transition epoch at scheduling time.
        epoch: u64,
    },
    /// Settle window elapsed; commit the steady scene and release.
    Settle {
        /// Transition epoch at scheduling time.
        epoch: u64,
    },
    /// Fall has progressed far enough; extend the document and start scrolling.
    StartScroll {
        /// Transition epoch at scheduling time.
        epoch: u64,
    },
    /// One frame of the reveal scroll.
    ScrollFrame {
        /// Transition epoch at scheduling time.
        epoch: u64,
    },
    /// Reveal scroll finished.
    Reveal {
        /// Transition epoch at scheduling time.
        epoch: u64,
    },
    /// Grace period after the reveal elapsed; release.
    FinishReveal {
        /// Transition epoch at scheduling time.
        epoch: u64,
    },
    /// Home is back behind the reverse overlay; release and reset scroll.
    RestoreHome {
        /// Transition epoch at scheduling time.
        epoch: u64,
    },
}

impl ControllerTask {
    /// Transition epoch the task was scheduled in.
    pub fn epoch(&self) -> u64 {
        match *self {
            Self::Measure { epoch }
            | Self::Settle { epoch }
            | Self::StartScroll { epoch }
            | Self::ScrollFrame { epoch }
            | Self::Reveal { epoch }
            | Self::FinishReveal { epoch }
            | Self::RestoreHome { epoch } => epoch,
        }
    }
}

/// Scheduler payloads able to carry both animator and controller work.
pub trait SessionTask: CarriesAnimatorTask + From<ControllerTask> {}

impl<T> SessionTask for T where T: CarriesAnimatorTask + From<ControllerTask> {}

/// Collaborators the controller drives, borrowed for the duration of one call.
pub struct Ports<'a, T> {
    /// Session clock and timer queue.
    pub timers: &'a mut Scheduler<T>,
    /// Clone and overlay owner.
    pub animator: &'a mut TransitionAnimator,
    /// Measurement and notification seam.
    pub host: &'a mut dyn SceneHost,
    /// Event log.
    pub trace: &'a mut Trace,
}

impl<T: SessionTask> Ports<'_, T> {
    fn now(&self) -> Millis {
        self.timers.now()
    }

    fn command(&mut self, cmd: AnimatorCommand) -> Option<Ticket> {
        let at = self.timers.now();
        let command = cmd.kind();
        let ticket = self.animator.send(cmd, self.timers);
        self.trace.push(TraceEvent::Command {
            at,
            command,
            ticket,
        });
        ticket
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Forward(Variant),
    Back,
    ReverseOverlay,
}

#[derive(Clone, Copy, Debug)]
struct ScrollAnim {
    start: Millis,
    from: f64,
    distance: f64,
}

#[derive(Debug)]
struct ActiveTransition {
    flow: Flow,
    content: Option<Arc<ContentRecord>>,
    source: ViewRect,
    awaiting: Option<Ticket>,
    issued_at: Option<Millis>,
    scroll_anim: Option<ScrollAnim>,
    // Dropped with the transition; field order is restore order.
    scroll: Option<ScrollExtension>,
    _lock: ViewportLock,
}

/// Owner of [`SceneState`] and the transitioning guard.
pub struct SceneController {
    catalog: ContentCatalog,
    timing: TimingConfig,
    viewport: Viewport,
    surface: SharedViewport,
    state: SceneState,
    epoch: u64,
    active: Option<ActiveTransition>,
}

impl std::fmt::Debug for SceneController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneController")
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl SceneController {
    /// Controller on Home with no transition running.
    pub fn new(config: &ChoreoConfig, catalog: ContentCatalog, surface: SharedViewport) -> Self {
        Self {
            catalog,
            timing: config.timing.clone(),
            viewport: config.viewport,
            surface,
            state: SceneState::default(),
            epoch: 0,
            active: None,
        }
    }

    /// Current scene state.
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Catalog the controller resolves objects against.
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// Destination used when nothing can be measured.
    pub fn fallback_rect(&self) -> ViewRect {
        let fb = &self.timing.fallback;
        self.viewport
            .lower_middle_rect(fb.width, fb.height, fb.top_fraction)
    }

    fn schedule<T: SessionTask>(&self, delay_ms: u64, task: ControllerTask, ports: &mut Ports<'_, T>) {
        ports.timers.schedule(delay_ms, T::from(task));
    }

    fn commit<T: SessionTask>(&mut self, next: SceneState, ports: &mut Ports<'_, T>) {
        let at = ports.now();
        tracing::debug!(
            scene = ?next.scene,
            layout = ?next.detail_layout,
            transitioning = next.is_transitioning,
            at = at.0,
            "scene changed"
        );
        self.state = next;
        ports.host.scene_changed(&self.state, at);
        ports.trace.push(TraceEvent::Scene {
            at,
            state: self.state.clone(),
        });
    }

    fn record_intent<T: SessionTask>(
        &self,
        request: IntentRequest,
        outcome: &Intent,
        ports: &mut Ports<'_, T>,
    ) {
        if let Intent::Ignored(reason) = outcome {
            tracing::debug!(?request, ?reason, "intent ignored");
        }
        ports.trace.push(TraceEvent::Intent {
            at: ports.now(),
            request,
            outcome: outcome.clone(),
        });
    }

    /// Select a grid object. `source` is the measured grid element rect; when absent the host's
    /// grid rect and then the catalog placement are used.
    #[tracing::instrument(level = "debug", skip_all, fields(object = %id))]
    pub fn select_object<T: SessionTask>(
        &mut self,
        id: &ObjectId,
        source: Option<ViewRect>,
        ports: &mut Ports<'_, T>,
    ) -> Intent {
        let checked = if self.state.is_transitioning {
            Err(IgnoreReason::Busy)
        } else if self.state.scene != Scene::Home {
            Err(IgnoreReason::WrongScene {
                scene: self.state.scene,
            })
        } else {
            self.catalog
                .by_id(id.as_str())
                .cloned()
                .ok_or_else(|| IgnoreReason::UnknownObject { object: id.clone() })
        };
        let request = IntentRequest::Select { object: id.clone() };
        match checked {
            Err(reason) => {
                let outcome = Intent::Ignored(reason);
                self.record_intent(request, &outcome, ports);
                outcome
            }
            Ok(content) => {
                self.record_intent(request, &Intent::Started, ports);
                self.start_forward(content, source, ports);
                Intent::Started
            }
        }
    }

    fn start_forward<T: SessionTask>(
        &mut self,
        content: Arc<ContentRecord>,
        source: Option<ViewRect>,
        ports: &mut Ports<'_, T>,
    ) {
        let variant = select_variant(content.role, Direction::Forward);
        let source = source
            .filter(|r| r.is_well_formed())
            .or_else(|| ports.host.grid_rect(&content.id).filter(|r| r.is_well_formed()))
            .unwrap_or_else(|| content.placement.resolve(self.viewport));

        self.epoch += 1;
        self.active = Some(ActiveTransition {
            flow: Flow::Forward(variant),
            content: Some(content.clone()),
            source,
            awaiting: None,
            issued_at: None,
            scroll_anim: None,
            scroll: None,
            _lock: ViewportLock::acquire(&self.surface),
        });

        let scene = match variant {
            Variant::Default => Scene::TransitioningToDetail,
            Variant::LeafFall => Scene::TransitioningToSpotify,
            Variant::ImmersivePortal => Scene::TransitioningToImmersive,
            Variant::Wipe => Scene::TransitioningWipe,
        };
        let detail_layout = if variant == Variant::Wipe {
            DetailLayout::FullPanel
        } else {
            DetailLayout::Standard
        };
        self.commit(
            SceneState {
                scene,
                active_content_key: Some(content.content_key.clone()),
                active_object: Some(content.id.clone()),
                is_transitioning: true,
                detail_layout,
            },
            ports,
        );
        self.schedule(
            self.timing.mount_delay_ms,
            ControllerTask::Measure { epoch: self.epoch },
            ports,
        );
    }

    /// Reverse the current steady scene back to Home.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn go_back<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) -> Intent {
        let checked = if self.state.is_transitioning {
            Err(IgnoreReason::Busy)
        } else {
            match self.state.scene {
                Scene::Detail => self.active_record().map(Some).ok_or(IgnoreReason::NoActiveContent),
                Scene::Spotify => Ok(None),
                scene => Err(IgnoreReason::WrongScene { scene }),
            }
        };
        match checked {
            Err(reason) => {
                let outcome = Intent::Ignored(reason);
                self.record_intent(IntentRequest::Back, &outcome, ports);
                outcome
            }
            Ok(content) => {
                self.record_intent(IntentRequest::Back, &Intent::Started, ports);
                match content {
                    Some(content) => self.start_back(content, ports),
                    None => self.start_reverse_overlay(ports),
                }
                Intent::Started
            }
        }
    }

    fn active_record(&self) -> Option<Arc<ContentRecord>> {
        let by_object = self
            .state
            .active_object
            .as_ref()
            .and_then(|id| self.catalog.by_id(id.as_str()));
        let by_key = || {
            self.state
                .active_content_key
                .as_deref()
                .and_then(|key| self.catalog.by_content_key(key))
        };
        by_object.or_else(by_key).cloned()
    }

    fn start_back<T: SessionTask>(&mut self, content: Arc<ContentRecord>, ports: &mut Ports<'_, T>) {
        let fallback = self.fallback_rect();
        let source = ports
            .host
            .placeholder_rect(self.state.detail_layout)
            .filter(|r| r.is_well_formed())
            .unwrap_or(fallback);
        let dest = ports
            .host
            .grid_rect(&content.id)
            .filter(|r| r.is_well_formed())
            .or_else(|| Some(content.placement.resolve(self.viewport)))
            .filter(|r| r.is_well_formed())
            .unwrap_or(fallback);

        self.epoch += 1;
        self.active = Some(ActiveTransition {
            flow: Flow::Back,
            content: Some(content.clone()),
            source,
            awaiting: None,
            issued_at: None,
            scroll_anim: None,
            scroll: None,
            _lock: ViewportLock::acquire(&self.surface),
        });
        self.commit(
            SceneState {
                scene: Scene::TransitioningBack,
                is_transitioning: true,
                ..self.state.clone()
            },
            ports,
        );
        let ticket = ports.command(AnimatorCommand::BeginBack {
            source,
            dest,
            content,
        });
        self.await_ticket(ticket, ports.now());
    }

    fn start_reverse_overlay<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        self.epoch += 1;
        self.active = Some(ActiveTransition {
            flow: Flow::ReverseOverlay,
            content: None,
            source: self.fallback_rect(),
            awaiting: None,
            issued_at: None,
            scroll_anim: None,
            scroll: None,
            _lock: ViewportLock::acquire(&self.surface),
        });
        self.commit(
            SceneState {
                is_transitioning: true,
                ..self.state.clone()
            },
            ports,
        );
        let ticket = ports.command(AnimatorCommand::BeginReverseOverlay);
        self.await_ticket(ticket, ports.now());
    }

    fn await_ticket(&mut self, ticket: Option<Ticket>, at: Millis) {
        if let Some(active) = self.active.as_mut() {
            active.awaiting = ticket;
            active.issued_at = Some(at);
        }
    }

    /// React to an animator notification.
    pub fn on_signal<T: SessionTask>(&mut self, signal: &AnimatorSignal, ports: &mut Ports<'_, T>) {
        match signal {
            AnimatorSignal::Resolved { ticket, .. } => {
                let Some(active) = self.active.as_mut() else {
                    return;
                };
                if active.awaiting != Some(*ticket) {
                    return;
                }
                active.awaiting = None;
                let flow = active.flow;
                let issued_at = active.issued_at.unwrap_or_else(|| ports.now());
                self.on_resolved(flow, issued_at, ports);
            }
            AnimatorSignal::StageEntered {
                generation,
                stage: Stage::PortalZoom,
                ..
            } if *generation == ports.animator.clone_generation() => {
                let portal = self
                    .active
                    .as_ref()
                    .is_some_and(|a| a.flow == Flow::Forward(Variant::ImmersivePortal));
                if portal {
                    self.commit(
                        SceneState {
                            detail_layout: DetailLayout::Immersive,
                            ..self.state.clone()
                        },
                        ports,
                    );
                }
            }
            _ => {}
        }
    }

    fn on_resolved<T: SessionTask>(&mut self, flow: Flow, issued_at: Millis, ports: &mut Ports<'_, T>) {
        let epoch = self.epoch;
        let settle = &self.timing.settle;
        match flow {
            Flow::Forward(Variant::Default) => {
                self.schedule(settle.default_ms, ControllerTask::Settle { epoch }, ports)
            }
            Flow::Forward(Variant::ImmersivePortal) => {
                self.schedule(settle.immersive_ms, ControllerTask::Settle { epoch }, ports)
            }
            Flow::Forward(Variant::Wipe) => {
                self.schedule(settle.wipe_ms, ControllerTask::Settle { epoch }, ports)
            }
            Flow::Back => self.schedule(settle.back_ms, ControllerTask::Settle { epoch }, ports),
            Flow::Forward(Variant::LeafFall) => {
                let extension = ScrollExtension::acquire(&self.surface, self.viewport.height);
                if let Some(active) = self.active.as_mut() {
                    active.scroll = Some(extension);
                }
                let leaf = &self.timing.leaf;
                let start = issued_at.after(leaf.centering_ms + leaf.scroll_delay_ms);
                let delay = start.since(ports.now());
                self.schedule(delay, ControllerTask::StartScroll { epoch }, ports);
            }
            Flow::ReverseOverlay => {
                let at = ports.now();
                self.commit(
                    SceneState {
                        is_transitioning: true,
                        ..SceneState::default()
                    },
                    ports,
                );
                ports.host.home_fade_in(at);
                ports.trace.push(TraceEvent::HomeFadeIn { at });
                self.schedule(
                    self.timing.overlay.home_restore_ms,
                    ControllerTask::RestoreHome { epoch },
                    ports,
                );
            }
        }
    }

    /// Run one deferred task. Tasks from a finished or torn-down transition are ignored.
    pub fn on_task<T: SessionTask>(&mut self, task: ControllerTask, ports: &mut Ports<'_, T>) {
        if task.epoch() != self.epoch || self.active.is_none() {
            tracing::trace!(?task, epoch = self.epoch, "stale controller task ignored");
            return;
        }
        match task {
            ControllerTask::Measure { .. } => self.measure_and_begin(ports),
            ControllerTask::Settle { .. } => self.settle(ports),
            ControllerTask::StartScroll { .. } => self.start_scroll(ports),
            ControllerTask::ScrollFrame { .. } => self.scroll_frame(ports),
            ControllerTask::Reveal { .. } => self.reveal(ports),
            ControllerTask::FinishReveal { .. } => self.finish(ports),
            ControllerTask::RestoreHome { .. } => {
                ports.command(AnimatorCommand::Release);
                self.surface.borrow_mut().scroll_to(0.0);
                self.finish_without_release(ports);
            }
        }
    }

    fn measure_and_begin<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        let fallback = self.fallback_rect();
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let (Flow::Forward(variant), Some(content)) = (active.flow, active.content.clone()) else {
            return;
        };
        let source = active.source;
        let measured = match variant {
            Variant::Default => ports.host.placeholder_rect(DetailLayout::Standard),
            Variant::LeafFall | Variant::ImmersivePortal | Variant::Wipe => None,
        };
        let dest = measured.filter(|r| r.is_well_formed()).unwrap_or_else(|| {
            tracing::debug!(?variant, "no placeholder; using fallback rect");
            fallback
        });
        let ticket = ports.command(AnimatorCommand::BeginForward {
            source,
            dest,
            content,
        });
        self.await_ticket(ticket, ports.now());
    }

    fn settle<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        let Some(flow) = self.active.as_ref().map(|a| a.flow) else {
            return;
        };
        let next = match flow {
            Flow::Back => SceneState::default(),
            Flow::Forward(_) => SceneState {
                scene: Scene::Detail,
                is_transitioning: false,
                ..self.state.clone()
            },
            Flow::ReverseOverlay => return,
        };
        self.commit(next, ports);
        ports.command(AnimatorCommand::Release);
        self.active = None;
    }

    fn start_scroll<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        let from = self.surface.borrow().scroll_offset();
        let now = ports.now();
        if let Some(active) = self.active.as_mut() {
            active.scroll_anim = Some(ScrollAnim {
                start: now,
                from,
                distance: self.viewport.height,
            });
        }
        ports.trace.push(TraceEvent::Scroll {
            at: now,
            phase: ScrollPhase::Start,
            offset: from,
        });
        let epoch = self.epoch;
        self.schedule(self.timing.leaf.scroll_ms, ControllerTask::Reveal { epoch }, ports);
        ports
            .timers
            .request_frame(T::from(ControllerTask::ScrollFrame { epoch }));
    }

    fn scroll_frame<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        let Some(anim) = self.active.as_ref().and_then(|a| a.scroll_anim) else {
            return;
        };
        let duration = self.timing.leaf.scroll_ms.max(1) as f64;
        let p = ports.now().since(anim.start) as f64 / duration;
        if p >= 1.0 {
            return;
        }
        let offset = anim.from + anim.distance * Ease::OutCubic.apply(p);
        self.surface.borrow_mut().scroll_to(offset);
        ports
            .timers
            .request_frame(T::from(ControllerTask::ScrollFrame { epoch: self.epoch }));
    }

    fn reveal<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        let now = ports.now();
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if let Some(anim) = active.scroll_anim.take() {
            let end = anim.from + anim.distance;
            self.surface.borrow_mut().scroll_to(end);
            ports.trace.push(TraceEvent::Scroll {
                at: now,
                phase: ScrollPhase::End,
                offset: end,
            });
        }
        let extension = active.scroll.take();

        self.commit(
            SceneState {
                scene: Scene::Spotify,
                active_content_key: None,
                active_object: None,
                is_transitioning: true,
                detail_layout: DetailLayout::Standard,
            },
            ports,
        );
        drop(extension);
        self.schedule(
            self.timing.leaf.release_after_reveal_ms,
            ControllerTask::FinishReveal { epoch: self.epoch },
            ports,
        );
    }

    fn finish<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        ports.command(AnimatorCommand::Release);
        self.finish_without_release(ports);
    }

    fn finish_without_release<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        self.commit(
            SceneState {
                is_transitioning: false,
                ..self.state.clone()
            },
            ports,
        );
        self.active = None;
    }

    /// Drop the running transition and its guards. Pending controller tasks become inert.
    ///
    /// An interrupted transition lands on Home: the guards have already restored the surface, so
    /// the grid is the only scene consistent with it. A steady scene is kept as is.
    pub fn teardown<T: SessionTask>(&mut self, ports: &mut Ports<'_, T>) {
        self.epoch += 1;
        let interrupted = self.active.take().is_some();
        if interrupted {
            tracing::debug!("controller torn down mid-transition");
        }
        if interrupted || self.state.is_transitioning || !self.state.scene.is_steady() {
            self.commit(SceneState::default(), ports);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/controller.rs"]
mod tests;
