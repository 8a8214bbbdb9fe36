//! Tablecast - device-facing real-time gateway for restaurant floors
//!
//! This crate implements the messaging subsystem between a floor-management
//! backend and its connected hardware: embedded table displays, kitchen
//! screens, and staff apps. It classifies long-lived WebSocket connections
//! into role pools, fans out order-lifecycle notices, and pushes letterboxed
//! JPEG frames to bandwidth-constrained displays over a chunked text
//! protocol.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
