//! # KISS Bridge Library
//!
//! Bridge a packet-radio modem and a host computer over KISS framing.
//!
//! Radio packets are relayed to the host as FlexNet KISS frames (control
//! byte 0x20 and a trailing CRC-16); KISS frames from the host are checked
//! and either transmitted over the radio or turned into a radio reset.

pub mod config;
pub mod error;
pub mod kiss;
pub mod link;
pub mod framer;
pub mod serial;
pub mod indicator;
