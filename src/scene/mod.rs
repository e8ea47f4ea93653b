pub(crate) mod controller;
pub(crate) mod host;
pub(crate) mod lock;
pub(crate) mod state;
