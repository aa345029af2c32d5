pub(crate) mod error;
pub(crate) mod handlers;
pub(crate) mod routes;
pub(crate) mod transport;
