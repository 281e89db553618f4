pub(crate) mod upload;
pub(crate) mod url;
