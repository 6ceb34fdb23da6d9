#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![no_std]

//! Encode and decode ICMP messages, including the RFC 4884 extension
//! structure carried by destination-unreachable, time-exceeded and
//! parameter-problem messages.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

mod error;
pub use error::{Error, Result};

mod traits;
pub use traits::Pdu;

mod raw;
pub use raw::RawPayload;

pub mod checksum_utils;

pub mod extensions;
pub mod icmp;
