mod common;
mod readiness;
mod routing;
mod service;
