pub(crate) mod encoder;
pub(crate) mod error;
pub(crate) mod prompt;
pub(crate) mod relay;
pub(crate) mod upstream;
