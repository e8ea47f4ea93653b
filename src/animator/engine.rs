//! Transition animator: one floating clone, one optional overlay, and a generation-stamped stage
//! machine driven entirely by scheduler callbacks.
//!
//! Invariants:
//! - Every callback carries the generation of the lane (clone or overlay) that scheduled it and is
//!   a no-op when that lane has moved on, whether or not the timer was cancelled in time.
//! - A stage's successor is scheduled from the stage's own entry, never batched up front.
//! - Stage geometry is derived from the descriptor captured at command time.

use std::sync::Arc;

use crate::{
    animation::{
        ease::Ease,
        rng::Rng64,
        tween::{ClonePose, Tween},
    },
    animator::{
        clone::CloneDescriptor,
        overlay::{OverlayFrame, OverlayMode, OverlayState},
        variant::{Direction, Stage, Variant, select_variant},
    },
    config::{
        settings::ChoreoConfig,
        timing::{PortalFinish, TimingConfig},
    },
    content::catalog::{ContentRecord, ObjectId},
    foundation::core::{Generation, Millis, Vec2, ViewRect, Viewport},
    timing::scheduler::Scheduler,
};

/// Completion handle returned by commands that resolve later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Ticket(pub u64);

/// Typed commands accepted by [`TransitionAnimator::send`].
#[derive(Clone, Debug)]
pub enum AnimatorCommand {
    /// Start a forward clone; resolves after the bootstrap delay.
    BeginForward {
        /// Measured grid element.
        source: ViewRect,
        /// Measured detail placeholder, or the fallback rect.
        dest: ViewRect,
        /// Content the clone shows.
        content: Arc<ContentRecord>,
    },
    /// Start a back clone; resolves after the bootstrap delay.
    BeginBack {
        /// Detail placeholder the clone leaves from.
        source: ViewRect,
        /// Grid element the clone returns to.
        dest: ViewRect,
        /// Content the clone shows.
        content: Arc<ContentRecord>,
    },
    /// Cancel pending work, discard the clone and hide the overlay. Never resolves.
    Release,
    /// Fade the cover in without a clone; resolves when the fade completes.
    BeginReverseOverlay,
    /// Fade the cover out; resolves when the fade completes.
    BeginOverlayFadeOut,
}

/// Payload-free tag of an [`AnimatorCommand`], for logs and traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// See [`AnimatorCommand::BeginForward`].
    BeginForward,
    /// See [`AnimatorCommand::BeginBack`].
    BeginBack,
    /// See [`AnimatorCommand::Release`].
    Release,
    /// See [`AnimatorCommand::BeginReverseOverlay`].
    BeginReverseOverlay,
    /// See [`AnimatorCommand::BeginOverlayFadeOut`].
    BeginOverlayFadeOut,
}

impl AnimatorCommand {
    /// Tag of this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::BeginForward { .. } => CommandKind::BeginForward,
            Self::BeginBack { .. } => CommandKind::BeginBack,
            Self::Release => CommandKind::Release,
            Self::BeginReverseOverlay => CommandKind::BeginReverseOverlay,
            Self::BeginOverlayFadeOut => CommandKind::BeginOverlayFadeOut,
        }
    }
}

/// Notifications drained by the owner after each command or callback.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum AnimatorSignal {
    /// A command issued with `ticket` has completed.
    Resolved {
        /// Ticket handed out by [`TransitionAnimator::send`].
        ticket: Ticket,
        /// Completion instant.
        at: Millis,
    },
    /// The clone entered a stage of its variant.
    StageEntered {
        /// Clone generation the stage belongs to.
        generation: Generation,
        /// Variant being played.
        variant: Variant,
        /// Stage entered.
        stage: Stage,
        /// Entry instant.
        at: Millis,
        /// Pose the stage starts from.
        pose: ClonePose,
    },
    /// The overlay was mounted.
    OverlayShown {
        /// Forward cover or reverse fade.
        mode: OverlayMode,
        /// Mount instant.
        at: Millis,
    },
    /// Clone and overlay were discarded.
    Released {
        /// Clone generation current at release.
        generation: Generation,
        /// Release instant.
        at: Millis,
    },
}

/// Which piece of animator state a callback belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    /// The clone and its stage callbacks.
    Clone,
    /// The overlay and its fade callbacks.
    Overlay,
}

/// Deferred animator work, queued on the shared scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorTask {
    /// Enter stage `index` of the clone's stage list.
    EnterStage {
        /// Clone generation that scheduled the entry.
        generation: Generation,
        /// Position in [`Variant::stages`].
        index: usize,
    },
    /// Mount the forward overlay.
    ShowOverlay {
        /// Clone generation that scheduled the mount.
        generation: Generation,
    },
    /// Resolve a command ticket.
    Resolve {
        /// Lane whose generation guards the resolution.
        lane: Lane,
        /// Generation of `lane` when the command was issued.
        generation: Generation,
        /// Ticket to resolve.
        ticket: Ticket,
    },
}

impl AnimatorTask {
    /// Lane whose generation must still match for this task to run.
    pub fn lane(&self) -> Lane {
        match self {
            Self::EnterStage { .. } | Self::ShowOverlay { .. } => Lane::Clone,
            Self::Resolve { lane, .. } => *lane,
        }
    }

    /// Generation stamped when the task was scheduled.
    pub fn generation(&self) -> Generation {
        match self {
            Self::EnterStage { generation, .. }
            | Self::ShowOverlay { generation }
            | Self::Resolve { generation, .. } => *generation,
        }
    }
}

/// Scheduler payloads that can carry animator work.
pub trait CarriesAnimatorTask: From<AnimatorTask> {
    /// The animator task inside this payload, if any.
    fn animator_task(&self) -> Option<&AnimatorTask>;
}

impl CarriesAnimatorTask for AnimatorTask {
    fn animator_task(&self) -> Option<&AnimatorTask> {
        Some(self)
    }
}

/// Rendered state of the clone at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CloneFrame {
    /// Lifecycle stamp of the clone.
    pub generation: Generation,
    /// Grid object the clone was cut from.
    pub object_id: ObjectId,
    /// Variant being played.
    pub variant: Variant,
    /// Forward into a detail scene, or back onto the grid.
    pub direction: Direction,
    /// Stage the clone is in.
    pub stage: Stage,
    /// Interpolated pose at this instant.
    pub pose: ClonePose,
    /// Closed or open image, per direction.
    pub image_ref: Option<String>,
    /// Caption drawn on the clone.
    pub label: String,
    /// Panel background once the wipe has recolored the clone.
    pub background: Option<String>,
    /// Stacking order above the scenes.
    pub z_index: i32,
}

/// Everything the animator draws at one instant.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct AnimatorFrame {
    /// Floating clone, if one is mounted.
    pub clone: Option<CloneFrame>,
    /// Cover overlay, if one is mounted.
    pub overlay: Option<OverlayFrame>,
}

#[derive(Clone, Copy, Debug)]
struct LeafJitter {
    rotation_deg: f64,
    drift_px: f64,
}

#[derive(Clone, Debug)]
struct ActiveClone {
    descriptor: CloneDescriptor,
    stage_index: usize,
    segment: Tween<ClonePose>,
    background: Option<String>,
    jitter: LeafJitter,
}

impl ActiveClone {
    fn stage(&self) -> Stage {
        self.descriptor.variant.stages()[self.stage_index]
    }
}

struct StagePlan {
    from: ClonePose,
    to: ClonePose,
    duration_ms: u64,
    ease: Ease,
    background: Option<String>,
}

/// Owner of the clone, its stage machine and the overlay.
#[derive(Debug)]
pub struct TransitionAnimator {
    timing: TimingConfig,
    viewport: Viewport,
    seed: u64,
    last_stamp: Generation,
    clone_gen: Generation,
    overlay_gen: Generation,
    clone: Option<ActiveClone>,
    overlay: Option<OverlayState>,
    next_ticket: u64,
    signals: Vec<AnimatorSignal>,
}

impl TransitionAnimator {
    /// Idle animator with no clone and no overlay.
    pub fn new(config: &ChoreoConfig) -> Self {
        Self {
            timing: config.timing.clone(),
            viewport: config.viewport,
            seed: config.seed,
            last_stamp: Generation::default(),
            clone_gen: Generation::default(),
            overlay_gen: Generation::default(),
            clone: None,
            overlay: None,
            next_ticket: 0,
            signals: Vec::new(),
        }
    }

    /// Generation of the current (or most recently retired) clone lifecycle.
    pub fn clone_generation(&self) -> Generation {
        self.clone_gen
    }

    /// Descriptor of the live clone.
    pub fn descriptor(&self) -> Option<&CloneDescriptor> {
        self.clone.as_ref().map(|c| &c.descriptor)
    }

    /// Current stage of the live clone.
    pub fn stage(&self) -> Option<Stage> {
        self.clone.as_ref().map(ActiveClone::stage)
    }

    /// Return `true` while an overlay is present.
    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_some()
    }

    /// Take the signals produced since the last drain, in emission order.
    pub fn drain_signals(&mut self) -> Vec<AnimatorSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Handle one command. Returns a ticket for commands that resolve later.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = ?cmd.kind(), now = timers.now().0))]
    pub fn send<T>(&mut self, cmd: AnimatorCommand, timers: &mut Scheduler<T>) -> Option<Ticket>
    where
        T: CarriesAnimatorTask,
    {
        match cmd {
            AnimatorCommand::BeginForward {
                source,
                dest,
                content,
            } => Some(self.begin(Direction::Forward, source, dest, content, timers)),
            AnimatorCommand::BeginBack {
                source,
                dest,
                content,
            } => Some(self.begin(Direction::Back, source, dest, content, timers)),
            AnimatorCommand::Release => {
                self.release(timers);
                None
            }
            AnimatorCommand::BeginReverseOverlay => {
                let now = timers.now();
                self.retire_overlay(timers);
                let fade_ms = self.timing.overlay.reverse_fade_ms;
                self.overlay = Some(OverlayState::fade_in(OverlayMode::Reverse, now, fade_ms));
                self.signals.push(AnimatorSignal::OverlayShown {
                    mode: OverlayMode::Reverse,
                    at: now,
                });
                Some(self.resolve_after(Lane::Overlay, self.overlay_gen, fade_ms, timers))
            }
            AnimatorCommand::BeginOverlayFadeOut => {
                let now = timers.now();
                let from = self
                    .overlay
                    .as_ref()
                    .map(|o| o.frame(now).opacity)
                    .unwrap_or(0.0);
                self.retire_overlay(timers);
                let fade_ms = self.timing.overlay.fade_out_ms;
                self.overlay = Some(OverlayState::fade_out(from, now, fade_ms));
                Some(self.resolve_after(Lane::Overlay, self.overlay_gen, fade_ms, timers))
            }
        }
    }

    fn stamp(&mut self) -> Generation {
        self.last_stamp = self.last_stamp.next();
        self.last_stamp
    }

    fn cancel_lane<T: CarriesAnimatorTask>(
        &self,
        lane: Lane,
        generation: Generation,
        timers: &mut Scheduler<T>,
    ) -> usize {
        timers.cancel_where(|t| {
            t.animator_task()
                .is_some_and(|a| a.lane() == lane && a.generation() == generation)
        })
    }

    fn retire_clone<T: CarriesAnimatorTask>(&mut self, timers: &mut Scheduler<T>) {
        self.cancel_lane(Lane::Clone, self.clone_gen, timers);
        self.clone = None;
        self.clone_gen = self.stamp();
    }

    fn retire_overlay<T: CarriesAnimatorTask>(&mut self, timers: &mut Scheduler<T>) {
        self.cancel_lane(Lane::Overlay, self.overlay_gen, timers);
        self.overlay = None;
        self.overlay_gen = self.stamp();
    }

    fn resolve_after<T: CarriesAnimatorTask>(
        &mut self,
        lane: Lane,
        generation: Generation,
        delay_ms: u64,
        timers: &mut Scheduler<T>,
    ) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        timers.schedule(
            delay_ms,
            T::from(AnimatorTask::Resolve {
                lane,
                generation,
                ticket,
            }),
        );
        ticket
    }

    fn begin<T: CarriesAnimatorTask>(
        &mut self,
        direction: Direction,
        source: ViewRect,
        dest: ViewRect,
        content: Arc<ContentRecord>,
        timers: &mut Scheduler<T>,
    ) -> Ticket {
        let now = timers.now();
        self.retire_overlay(timers);
        self.retire_clone(timers);
        let generation = self.clone_gen;

        let variant = select_variant(content.role, direction);
        let mut rng = Rng64::for_stream(self.seed, generation.0);
        let leaf = &self.timing.leaf;
        let jitter = LeafJitter {
            rotation_deg: rng.range(leaf.rotation_min_deg, leaf.rotation_max_deg),
            drift_px: rng.range(-leaf.drift_px, leaf.drift_px),
        };

        let start_pose = ClonePose {
            rotation_deg: self.timing.motion.start_rotation_deg,
            ..ClonePose::at(source)
        };
        let descriptor = CloneDescriptor {
            source_rect: source,
            dest_rect: dest,
            content,
            direction,
            variant,
            generation,
            viewport: self.viewport,
            issued_at: now,
        };
        tracing::debug!(
            generation = generation.0,
            ?variant,
            ?direction,
            object = %descriptor.object_id(),
            "clone created"
        );
        self.clone = Some(ActiveClone {
            descriptor,
            stage_index: 0,
            segment: Tween::hold(start_pose, now),
            background: None,
            jitter,
        });
        self.signals.push(AnimatorSignal::StageEntered {
            generation,
            variant,
            stage: Stage::AtSource,
            at: now,
            pose: start_pose,
        });

        // Motion is anchored at command time; the zero-delay hop keeps stage entry callback-driven.
        timers.schedule(
            0,
            T::from(AnimatorTask::EnterStage {
                generation,
                index: 1,
            }),
        );
        let bootstrap_ms = self.timing.bootstrap_ms;
        self.resolve_after(Lane::Clone, generation, bootstrap_ms, timers)
    }

    fn release<T: CarriesAnimatorTask>(&mut self, timers: &mut Scheduler<T>) {
        let released = self.clone_gen;
        self.retire_clone(timers);
        self.retire_overlay(timers);
        tracing::debug!(generation = released.0, "released");
        self.signals.push(AnimatorSignal::Released {
            generation: released,
            at: timers.now(),
        });
    }

    /// Run one deferred task. Stale tasks are ignored.
    pub fn on_task<T: CarriesAnimatorTask>(&mut self, task: AnimatorTask, timers: &mut Scheduler<T>) {
        let now = timers.now();
        let current = match task.lane() {
            Lane::Clone => self.clone_gen,
            Lane::Overlay => self.overlay_gen,
        };
        if task.generation() != current {
            tracing::trace!(?task, current = current.0, "stale animator task ignored");
            return;
        }

        match task {
            AnimatorTask::EnterStage { generation, index } => {
                self.enter_stage(generation, index, timers);
            }
            AnimatorTask::ShowOverlay { .. } => {
                if self.clone.is_none() {
                    return;
                }
                let fade_ms = self.timing.leaf.overlay_fade_ms;
                self.overlay = Some(OverlayState::fade_in(OverlayMode::Forward, now, fade_ms));
                tracing::debug!(at = now.0, "overlay shown");
                self.signals.push(AnimatorSignal::OverlayShown {
                    mode: OverlayMode::Forward,
                    at: now,
                });
            }
            AnimatorTask::Resolve { lane, ticket, .. } => {
                if lane == Lane::Overlay
                    && self
                        .overlay
                        .as_ref()
                        .is_some_and(|o| o.mode() == OverlayMode::FadeOut)
                {
                    self.overlay = None;
                }
                self.signals
                    .push(AnimatorSignal::Resolved { ticket, at: now });
            }
        }
    }

    fn enter_stage<T: CarriesAnimatorTask>(
        &mut self,
        generation: Generation,
        index: usize,
        timers: &mut Scheduler<T>,
    ) {
        let now = timers.now();
        let Some(clone) = self.clone.as_ref() else {
            return;
        };
        let variant = clone.descriptor.variant;
        let stages = variant.stages();
        if index != clone.stage_index + 1 || index >= stages.len() {
            return;
        }
        let stage = stages[index];
        let plan = self.plan_stage(clone, stage, now);

        let Some(clone) = self.clone.as_mut() else {
            return;
        };
        clone.stage_index = index;
        clone.segment = Tween {
            from: plan.from,
            to: plan.to,
            start: now,
            duration_ms: plan.duration_ms,
            ease: plan.ease,
        };
        if plan.background.is_some() {
            clone.background = plan.background;
        }

        tracing::debug!(
            generation = generation.0,
            ?variant,
            ?stage,
            at = now.0,
            duration_ms = plan.duration_ms,
            "stage entered"
        );
        self.signals.push(AnimatorSignal::StageEntered {
            generation,
            variant,
            stage,
            at: now,
            pose: plan.from,
        });

        if index + 1 < stages.len() {
            timers.schedule(
                plan.duration_ms,
                T::from(AnimatorTask::EnterStage {
                    generation,
                    index: index + 1,
                }),
            );
        }
        if stage == Stage::Falling {
            timers.schedule(
                self.timing.leaf.overlay_offset_ms,
                T::from(AnimatorTask::ShowOverlay { generation }),
            );
        }
    }

    fn plan_stage(&self, clone: &ActiveClone, stage: Stage, now: Millis) -> StagePlan {
        let d = &clone.descriptor;
        let vp = d.viewport;
        let from = clone.segment.sample(now);
        let t = &self.timing;
        let straight = ClonePose { rotation_deg: 0.0, ..from };

        match stage {
            Stage::AtSource => StagePlan {
                from,
                to: from,
                duration_ms: 0,
                ease: Ease::Linear,
                background: None,
            },
            Stage::AnimatingToDest => StagePlan {
                from,
                to: ClonePose::at(d.dest_rect),
                duration_ms: t.motion.move_ms,
                ease: t.motion.ease,
                background: None,
            },
            Stage::Centering => {
                let duration_ms = match d.variant {
                    Variant::ImmersivePortal => t.portal.centering_ms,
                    _ => t.leaf.centering_ms,
                };
                StagePlan {
                    from,
                    to: ClonePose {
                        rect: d.source_rect.centered_at(vp.center()),
                        ..straight
                    },
                    duration_ms,
                    ease: Ease::Standard,
                    background: None,
                }
            }
            Stage::Falling => StagePlan {
                from,
                to: ClonePose {
                    rect: from.rect.translated(Vec2::new(
                        clone.jitter.drift_px,
                        vp.height + t.leaf.fall_extra_px,
                    )),
                    rotation_deg: clone.jitter.rotation_deg,
                    scale: from.scale,
                    opacity: 0.0,
                    brightness: t.leaf.fall_brightness,
                },
                duration_ms: t.leaf.fall_ms,
                ease: Ease::Leaf,
                background: None,
            },
            Stage::PortalZoom => {
                let (opacity, brightness) = match t.portal.finish {
                    PortalFinish::FadeOut => (0.0, from.brightness),
                    PortalFinish::Flash => (1.0, t.portal.flash_brightness),
                };
                StagePlan {
                    from,
                    to: ClonePose {
                        scale: t.portal.zoom_scale,
                        opacity,
                        brightness,
                        ..from
                    },
                    duration_ms: t.portal.zoom_ms,
                    ease: Ease::InOutCubic,
                    background: None,
                }
            }
            Stage::ExitRight => StagePlan {
                from,
                to: ClonePose {
                    rect: from.rect.with_left(vp.width),
                    rotation_deg: t.wipe.exit_rotation_deg,
                    opacity: t.wipe.exit_opacity,
                    ..from
                },
                duration_ms: t.wipe.exit_ms,
                ease: Ease::Standard,
                background: None,
            },
            Stage::PrepareFullPanel => {
                let panel = full_panel_offscreen(vp);
                StagePlan {
                    from: panel,
                    to: panel,
                    duration_ms: 0,
                    ease: Ease::Linear,
                    background: Some(t.wipe.panel_color.clone()),
                }
            }
            Stage::Swiping => StagePlan {
                from,
                to: ClonePose::at(vp.full_rect()),
                duration_ms: t.wipe.swipe_ms,
                ease: Ease::InOutCubic,
                background: None,
            },
        }
    }

    /// Sample the clone and overlay at `now`.
    pub fn frame(&self, now: Millis) -> AnimatorFrame {
        let clone = self.clone.as_ref().map(|c| {
            let d = &c.descriptor;
            CloneFrame {
                generation: d.generation,
                object_id: d.object_id().clone(),
                variant: d.variant,
                direction: d.direction,
                stage: c.stage(),
                pose: c.segment.sample(now),
                image_ref: d.image_ref().map(str::to_owned),
                label: d.label().to_owned(),
                background: c.background.clone(),
                z_index: if d.variant == Variant::LeafFall {
                    10_000
                } else {
                    9_999
                },
            }
        });
        AnimatorFrame {
            clone,
            overlay: self.overlay.as_ref().map(|o| o.frame(now)),
        }
    }
}

/// Full-viewport panel parked just past the right edge.
fn full_panel_offscreen(vp: Viewport) -> ClonePose {
    ClonePose::at(ViewRect::new(vp.width, 0.0, vp.width, vp.height))
}

#[cfg(test)]
#[path = "../../tests/unit/animator/engine.rs"]
mod tests;
