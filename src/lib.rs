//! Arbitrary-length bit arrays and a prefix-code text codec built on them.
//!
//! - [`BitArray`]: bit sequence with slicing, boolean algebra, concatenation
//!   and byte/string/list conversions in little-endian bit order.
//! - [`codec`]: encode text against a prefix-free [`CodeTable`] and decode it
//!   back by greedy matching.
//! - [`table`]: build code tables from symbol frequencies.
//! - [`container`]: store a table and an encoded payload in one blob.

pub mod bit_array;
pub mod codec;
pub mod container;
pub mod error;
pub mod table;

pub use bit_array::BitArray;
pub use codec::{decode, encode, CodeTable};
pub use error::{Error, Result, TableError};
pub use table::{build_table, TableStrategy};
