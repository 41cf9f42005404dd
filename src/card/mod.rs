//! Decoders for the MIFARE Classic memory layout.
//!
//! All decoders follow the same conventions:
//!
//! * **Slices in, values out** - every function takes an already-loaded
//!   dump (or part of one) and returns owned, immutable values. Nothing is
//!   read from or written back to a card.
//! * **Local failures stay local** - an inconsistent access-bits slot is an
//!   error for the blocks it governs only; callers decide whether to carry
//!   on.
//!
//! ## Module overview
//!
//! | Module           | Covers |
//! |------------------|--------|
//! | [`geometry`]     | Dump size → card family, sector offsets and block counts |
//! | [`access`]       | Access-bits field: condition extraction and complement check |
//! | [`permissions`]  | Trailer and data permission tables per condition |
//! | [`trailer`]      | Sector trailer split into key A, access bits, key B |
//! | [`manufacturer`] | Block 0: UID, BCC, SAK, ATQA |

pub mod access;
pub mod geometry;
pub mod manufacturer;
pub mod permissions;
pub mod trailer;
