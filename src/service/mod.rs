pub(crate) mod chartographer;
pub(crate) mod config;
pub(crate) mod limits;
