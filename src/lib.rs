// Library for tests to access modules

pub mod config;
pub mod dispatcher;
pub mod docker_repo;
pub mod grouping;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod session;
