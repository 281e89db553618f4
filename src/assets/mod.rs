pub(crate) mod decode;
pub(crate) mod media;
pub(crate) mod source;
pub(crate) mod store;
pub(crate) mod video;
