//! A miniature traffic-light intersection built around a blocking message
//! channel.
//!
//! The crate has two layers. At the bottom sits [`Channel`], a thread-safe
//! FIFO queue whose receive operation parks the calling thread until a value
//! is available. On top of it, [`TrafficLight`] owns the authoritative signal
//! phase and a background "cycler" thread that flips the phase between
//! [`Phase::Red`] and [`Phase::Green`] at randomized intervals, publishing
//! every transition into the channel. Any number of caller threads can block
//! on [`TrafficLight::wait_for_green`] until the signal becomes passable.
//!
//! The cycler is a managed thread: [`TrafficLight::simulate`] starts it, and
//! [`TrafficLight::stop`] (or dropping the light) halts and joins it. There
//! is no work-stealing, no async surface, and no real-time guarantee; the
//! design only promises eventual, correctly-ordered delivery of phase
//! transitions across threads.

#![no_std]
#![cfg_attr(feature = "shuttle", allow(dead_code))]

// -----------------------------------------------------------------------------
// Boilerplate for building without the standard library

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod channel;
mod light;
mod util;

// -----------------------------------------------------------------------------
// Top-level exports

pub use channel::Channel;
pub use light::CycleTiming;
pub use light::Phase;
pub use light::TrafficLight;

// -----------------------------------------------------------------------------
// Platform Support

// This crate uses `loom` and `shuttle` for model testing, which requires
// mocking all of the core threading primitives (`Mutex` and the like).
//
// To make things a bit simpler, we re-export all the important types in the
// `platform` module.

#[cfg(all(not(loom), not(feature = "shuttle")))]
mod platform {

    // Core exports

    pub use alloc::sync::Arc;
    pub use core::sync::atomic::AtomicBool;
    pub use core::sync::atomic::AtomicU32;
    pub use core::sync::atomic::Ordering;
    pub use std::sync::Condvar;
    pub use std::sync::Mutex;
    pub use std::thread::Builder as ThreadBuilder;
    pub use std::thread::JoinHandle;
}

#[cfg(loom)]
mod platform {

    // Core exports

    pub use loom::sync::Arc;
    pub use loom::sync::Condvar;
    pub use loom::sync::Mutex;
    pub use loom::sync::atomic::AtomicBool;
    pub use loom::sync::atomic::AtomicU32;
    pub use loom::sync::atomic::Ordering;
    pub use loom::thread::Builder as ThreadBuilder;
    pub use loom::thread::JoinHandle;
}

#[cfg(all(not(loom), feature = "shuttle"))]
mod platform {

    // Core exports

    pub use shuttle::sync::Arc;
    pub use shuttle::sync::Condvar;
    pub use shuttle::sync::Mutex;
    pub use shuttle::sync::atomic::AtomicBool;
    pub use shuttle::sync::atomic::AtomicU32;
    pub use shuttle::sync::atomic::Ordering;
    pub use shuttle::thread::Builder as ThreadBuilder;
    pub use shuttle::thread::JoinHandle;
}
