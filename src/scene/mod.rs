pub(crate) mod edit;
pub(crate) mod model;
pub(crate) mod order;
pub(crate) mod repository;
