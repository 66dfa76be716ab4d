pub(crate) mod analytics;
pub(crate) mod table;
