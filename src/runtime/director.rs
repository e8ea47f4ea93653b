//! Session driver: one virtual clock, one animator, one controller.
//!
//! Every callback runs to completion on the caller's thread; the director pops due wake-ups in
//! `(due, sequence)` order and, after each one, feeds the animator's signals back to the
//! controller until both are quiet.

use std::{cell::RefCell, rc::Rc};

use crate::{
    animator::engine::{AnimatorCommand, TransitionAnimator},
    config::settings::ChoreoConfig,
    content::catalog::{ContentCatalog, ObjectId},
    foundation::{
        core::{Millis, ViewRect},
        error::ChoreoResult,
    },
    runtime::{
        task::Task,
        trace::{FrameSnapshot, Trace, TraceEvent},
    },
    scene::{
        controller::{IgnoreReason, Intent, IntentRequest, Ports, SceneController},
        host::{InMemoryViewport, SceneHost, SharedViewport, StaticHost},
        state::SceneState,
    },
    timing::scheduler::Scheduler,
};

/// Owner of a transition session.
pub struct Director<H: SceneHost = StaticHost> {
    config: ChoreoConfig,
    timers: Scheduler<Task>,
    animator: TransitionAnimator,
    controller: SceneController,
    host: H,
    surface: SharedViewport,
    trace: Trace,
    torn_down: bool,
}

impl Director<StaticHost> {
    /// Session over an in-memory viewport whose document is `scroll_height` tall.
    pub fn in_memory(
        config: ChoreoConfig,
        catalog: ContentCatalog,
        host: StaticHost,
        scroll_height: f64,
    ) -> ChoreoResult<(Self, Rc<RefCell<InMemoryViewport>>)> {
        let viewport = InMemoryViewport::shared(scroll_height);
        let director = Self::new(config, catalog, host, viewport.clone())?;
        Ok((director, viewport))
    }
}

impl<H: SceneHost> Director<H> {
    /// Session over `host` and `surface`, idle on Home at clock 0. Rejects an invalid config.
    pub fn new(
        config: ChoreoConfig,
        catalog: ContentCatalog,
        host: H,
        surface: SharedViewport,
    ) -> ChoreoResult<Self> {
        config.validate()?;
        tracing::debug!(
            objects = catalog.len(),
            width = config.viewport.width,
            height = config.viewport.height,
            "director created"
        );
        Ok(Self {
            timers: Scheduler::new(config.frame_interval_ms),
            animator: TransitionAnimator::new(&config),
            controller: SceneController::new(&config, catalog, surface.clone()),
            config,
            host,
            surface,
            trace: Trace::default(),
            torn_down: false,
        })
    }

    /// Validated session config.
    pub fn config(&self) -> &ChoreoConfig {
        &self.config
    }

    /// Current virtual clock value.
    pub fn now(&self) -> Millis {
        self.timers.now()
    }

    /// Current scene state.
    pub fn state(&self) -> &SceneState {
        self.controller.state()
    }

    /// Everything observed so far.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Host the controller measures against.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host, for moving placeholders between intents.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Clone and overlay owner, for inspection.
    pub fn animator(&self) -> &TransitionAnimator {
        &self.animator
    }

    /// Catalog of grid objects.
    pub fn catalog(&self) -> &ContentCatalog {
        self.controller.catalog()
    }

    /// Number of timers and frame callbacks still queued.
    pub fn pending(&self) -> usize {
        self.timers.pending()
    }

    fn ports(&mut self) -> (&mut SceneController, Ports<'_, Task>) {
        (
            &mut self.controller,
            Ports {
                timers: &mut self.timers,
                animator: &mut self.animator,
                host: &mut self.host,
                trace: &mut self.trace,
            },
        )
    }

    fn ignore_halted(&mut self, request: IntentRequest) -> Intent {
        let outcome = Intent::Ignored(IgnoreReason::TornDown);
        tracing::debug!(?request, "intent after teardown ignored");
        self.trace.push(TraceEvent::Intent {
            at: self.timers.now(),
            request,
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Select a grid object at the current instant.
    pub fn select_object(&mut self, id: impl Into<ObjectId>, source: Option<ViewRect>) -> Intent {
        let id = id.into();
        if self.torn_down {
            return self.ignore_halted(IntentRequest::Select { object: id });
        }
        let (controller, mut ports) = self.ports();
        let outcome = controller.select_object(&id, source, &mut ports);
        self.pump();
        outcome
    }

    /// Go back from the current steady scene at the current instant.
    pub fn go_back(&mut self) -> Intent {
        if self.torn_down {
            return self.ignore_halted(IntentRequest::Back);
        }
        let (controller, mut ports) = self.ports();
        let outcome = controller.go_back(&mut ports);
        self.pump();
        outcome
    }

    fn pump(&mut self) {
        loop {
            let signals = self.animator.drain_signals();
            if signals.is_empty() {
                break;
            }
            for signal in signals {
                self.trace.push(TraceEvent::Animator {
                    signal: signal.clone(),
                });
                let (controller, mut ports) = self.ports();
                controller.on_signal(&signal, &mut ports);
            }
        }
    }

    /// Run every wake-up due at or before `until`, then move the clock there.
    pub fn advance_to(&mut self, until: Millis) {
        while let Some(fired) = self.timers.pop_due(until) {
            match fired.task {
                Task::Animator(task) => self.animator.on_task(task, &mut self.timers),
                Task::Controller(task) => {
                    let (controller, mut ports) = self.ports();
                    controller.on_task(task, &mut ports);
                }
            }
            self.pump();
        }
        self.timers.advance_to(until);
    }

    /// Advance the clock by `delta_ms`.
    pub fn advance_by(&mut self, delta_ms: u64) {
        self.advance_to(self.timers.now().after(delta_ms));
    }

    /// Advance until nothing is queued or `horizon_ms` has elapsed. Returns `true` when idle.
    pub fn run_until_idle(&mut self, horizon_ms: u64) -> bool {
        let limit = self.timers.now().after(horizon_ms);
        while let Some(due) = self.timers.next_due() {
            if due > limit {
                break;
            }
            self.advance_to(due);
        }
        self.timers.pending() == 0
    }

    /// Sample everything visible at the current instant.
    pub fn render(&self) -> FrameSnapshot {
        let at = self.timers.now();
        let state = self.controller.state().clone();
        FrameSnapshot {
            at,
            layers: state.visible_layers(),
            state,
            animator: self.animator.frame(at),
            viewport: self.surface.borrow().snapshot(),
        }
    }

    /// Cancel every pending timer and frame callback, release the animator and drop the running
    /// transition's guards. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let at = self.timers.now();
        let cancelled = self.timers.clear();
        self.animator.send(AnimatorCommand::Release, &mut self.timers);
        for signal in self.animator.drain_signals() {
            self.trace.push(TraceEvent::Animator { signal });
        }
        let (controller, mut ports) = self.ports();
        controller.teardown(&mut ports);
        self.trace.push(TraceEvent::Teardown { at });
        tracing::debug!(cancelled, at = at.0, "director torn down");
    }

    /// Return `true` after [`Director::teardown`].
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl<H: SceneHost> Drop for Director<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/director.rs"]
mod tests;
