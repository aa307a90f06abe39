//! A dynamically-sized, word-packed bitset library written in pure Rust.
//! `no_std` + `alloc`, no `unsafe` — bits live in a heap-allocated run of
//! `u64` words.
//!
//! [`Bitset`] is the main struct in this library. Its [features](#features)
//! are listed below.
//!
//! # Examples
//! ```
//! use word_bitset::Bitset;
//!
//! let mut bitset = Bitset::new(10).unwrap();
//! assert_eq!(bitset.popcount(), 0);
//! assert!(!bitset.is_set(3));
//! bitset.set(3);
//! assert!(bitset.is_set(3));
//! assert_eq!(bitset.popcount(), 1);
//! assert_eq!(bitset.trailing_zeros(), 3);
//! ```
//!
//! # Use Cases
//!
//! - Flag sets whose length is only known at runtime
//! - Dataflow / reachability style algorithms built on bulk bitwise ops
//!   (`&`, `|`, `^`, `!`) and run-length queries
//! - Code that must observe allocation failure instead of aborting:
//!   every allocating constructor returns a `Result`
//! - Does not support SIMD or parallel execution, so it's not ideal for
//!   cases where performance needs to be fully maxed out
//!
//! # Features
//!
//! - `#![no_std]` compatible (requires `alloc`)
//! - Length fixed at construction, checked allocation via [`Bitset::new`]
//! - Bit-level operations: `set`, `unset`, `toggle`, `is_set`
//! - Whole-set queries: `popcount`, `leading_zeros`, `leading_ones`,
//!   `trailing_zeros`, `trailing_ones`
//! - Bulk bitwise ops, in place and via operators:
//!   - `&`, `|`, `^`, `!`
//!   - `&=`, `|=`, `^=`
//! - Efficient iteration:
//!   - `iter()` (all bits as bools)
//!   - `iter_ones()` (indices of set bits)
//! - Raw word access for callers that want to drive the storage directly

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod bitset;

pub use bitset::{Bitset, BitsetIter, IterOnes, OutOfMemory, WORD_BITS, word_count};
