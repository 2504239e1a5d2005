//! Router-level tests, driven through `tower::ServiceExt::oneshot`

pub mod api;
pub mod dispatcher;
pub mod forms;
