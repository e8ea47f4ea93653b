pub(crate) mod director;
pub(crate) mod task;
pub(crate) mod trace;
