//! choreo orchestrates scene transitions for a single-page experience: a home grid of objects that
//! morph into detail views through choreographed clone animations and back again.
//!
//! The public surface is session-oriented:
//!
//! - Load a [`ChoreoConfig`] and a [`ContentCatalog`]
//! - Create a [`Director`] over a [`SceneHost`] and a [`ViewportSurface`]
//! - Feed intents, advance the virtual clock, and [`Director::render`] what is visible
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod animator;
pub(crate) mod config;
pub(crate) mod content;
pub(crate) mod runtime;
pub(crate) mod scene;
pub(crate) mod timing;

pub use crate::foundation::core::{Generation, Millis, Point, Rect, Size, Vec2, ViewRect, Viewport};
pub use crate::foundation::error::{ChoreoError, ChoreoResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::rng::Rng64;
pub use crate::animation::tween::{ClonePose, Lerp, Tween};
pub use crate::animator::clone::CloneDescriptor;
pub use crate::animator::engine::{
    AnimatorCommand, AnimatorFrame, AnimatorSignal, AnimatorTask, CarriesAnimatorTask, CloneFrame,
    CommandKind, Lane, Ticket, TransitionAnimator,
};
pub use crate::animator::overlay::{OverlayFrame, OverlayMode};
pub use crate::animator::variant::{Direction, Stage, Variant, select_variant};
pub use crate::config::settings::ChoreoConfig;
pub use crate::config::timing::{
    FallbackRect, LeafFallTiming, MotionTiming, OverlayTiming, PortalFinish, PortalTiming,
    SettleTiming, TimingConfig, WipeTiming,
};
pub use crate::content::catalog::{
    CatalogDef, ContentCatalog, ContentRecord, ImageRefs, ObjectId, ObjectRole, Placement,
};
pub use crate::runtime::director::Director;
pub use crate::runtime::task::Task;
pub use crate::runtime::trace::{FrameSnapshot, ScrollPhase, Trace, TraceEvent};
pub use crate::scene::controller::{
    ControllerTask, IgnoreReason, Intent, IntentRequest, Ports, SceneController, SessionTask,
};
pub use crate::scene::host::{
    InMemoryViewport, SceneHost, SharedViewport, StaticHost, ViewportSnapshot, ViewportSurface,
};
pub use crate::scene::lock::{ScrollExtension, ViewportLock};
pub use crate::scene::state::{
    DetailLayout, LayerModifier, Scene, SceneLayer, SceneRoot, SceneState,
};
pub use crate::timing::scheduler::{Fired, Scheduler, TimerId, WakeKind};
