pub(crate) mod clone;
pub(crate) mod engine;
pub(crate) mod overlay;
pub(crate) mod variant;
