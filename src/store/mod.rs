pub(crate) mod blob;
pub(crate) mod metadata;
pub(crate) mod sqlite;
