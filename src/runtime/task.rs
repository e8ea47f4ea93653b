use crate::{
    animator::engine::{AnimatorTask, CarriesAnimatorTask},
    scene::controller::ControllerTask,
};

/// Payload of every entry on the session scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Clone or overlay work.
    Animator(AnimatorTask),
    /// Scene controller work.
    Controller(ControllerTask),
}

impl From<AnimatorTask> for Task {
    fn from(t: AnimatorTask) -> Self {
        Self::Animator(t)
    }
}

impl From<ControllerTask> for Task {
    fn from(t: ControllerTask) -> Self {
        Self::Controller(t)
    }
}

impl CarriesAnimatorTask for Task {
    fn animator_task(&self) -> Option<&AnimatorTask> {
        match self {
            Self::Animator(t) => Some(t),
            Self::Controller(_) => None,
        }
    }
}
