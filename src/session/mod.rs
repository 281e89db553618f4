pub(crate) mod admin;
pub(crate) mod display;
pub(crate) mod stage;
pub(crate) mod user;
