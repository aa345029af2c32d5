pub(crate) mod rest;
