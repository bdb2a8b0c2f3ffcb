//! A client for the Grantdesk API implementing **a subset of its API (!)**:
//! the role grant assignment flow (load a role's permission tree, edit it
//! in memory, replace the role's grant set).

pub mod api;
pub mod assignment;
pub mod authentication;
pub mod clients;
pub mod errors;
pub(crate) mod response;
pub mod server;
pub(crate) mod urls;
