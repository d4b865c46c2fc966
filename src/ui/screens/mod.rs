pub(crate) mod categories;
pub(crate) mod dashboard;
pub(crate) mod entries;
