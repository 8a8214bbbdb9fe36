//! Application layer - Commands and Handlers.
//!
//! These are the entry points the rest of the floor-management system
//! calls: image pushes and order-lifecycle notifications. The CRUD side
//! of the system (orders, bookings, payments) lives elsewhere and only
//! ever talks to this crate through these handlers.

pub mod handlers;
