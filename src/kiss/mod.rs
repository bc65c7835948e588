//! # KISS Protocol Module
//!
//! KISS framing for FlexNet/AX.25 traffic between a radio and a host.
//!
//! This module handles:
//! - FlexNet CRC-16 calculation
//! - Byte stuffing and frame assembly (radio → host, diagnostics → host)
//! - Incremental deframing of host input (host → radio)
//! - Bounded working buffers shared by both directions

pub mod protocol;
pub mod crc;
pub mod buffer;
pub mod encoder;
pub mod decoder;
