//! HTTP server plumbing shared by every route

pub mod middleware;
