//! # relaybuf Core
//!
//! The bounded byte buffer shared by the relaybuf inbound and outbound
//! endpoints.
//!
//! This crate provides:
//! - [`SharedBuffer`] with a single exclusive lock guarding storage and fill length
//! - [`BufferGuard`] as the only way to reach the storage
//! - [`Transfer`] and [`Delivery`] outcome records (truncation, no-op, copy faults)
//! - [`Interrupt`] tokens for cancellable lock waits
//! - [`UserSource`] / [`UserSink`] for copies from and to caller memory
//! - [`BufferConfig`] and the error types

pub mod buffer;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod transfer;
pub mod usercopy;

pub use buffer::{BufferGuard, BufferStats, SharedBuffer, StatsSnapshot};
pub use config::{BufferConfig, DEFAULT_CAPACITY, DrainMode, FaultAccounting};
pub use error::{BufferError, BusyCause, Result};
pub use interrupt::Interrupt;
pub use transfer::{Delivery, Direction, Transfer, TransferStatus};
pub use usercopy::{UserSink, UserSource};
