//! Configuration bitstream interface for the Moss toolchain.
//!
//! Devices in this class are programmed by a single flat run of
//! configuration bits. This crate provides the [`Bitstream`] image type and
//! the [`ConfigCell`] trait every configurable cell implements to load and
//! save its field of the image at a fixed base offset.
//!
//! The place-and-route engine does not touch bitstreams; its contract with
//! this crate is only that every netlist cell is mated with a device site
//! before serialization runs, so each cell knows which physical field it
//! owns.
//!
//! # Usage
//!
//! ```
//! use moss_bitstream::{Bitstream, ConfigCell, MuxedInputCell};
//! use std::collections::BTreeMap;
//!
//! let mut table = BTreeMap::new();
//! table.insert("OSC".to_owned(), 0);
//! table.insert("PIN3".to_owned(), 1);
//! let mut cell = MuxedInputCell::new("clkbuf_0", 8, 1, table);
//! cell.select("PIN3");
//!
//! let mut image = Bitstream::new(32);
//! assert!(cell.save(&mut image));
//! assert_eq!(image.read_bits(8, 1), 1);
//! ```

#![warn(missing_docs)]

pub mod cell;
pub mod image;

pub use cell::{save_cells, ConfigCell, MuxedInputCell};
pub use image::Bitstream;
