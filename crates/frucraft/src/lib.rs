//! # frucraft
//!
//! A library for reading, editing and writing IPMI FRU inventory records, the
//! binary blobs hardware vendors store in a board's EEPROM.
//!
//! A record is a common header followed by optional areas (internal use,
//! chassis, board, product, multi-record). Each area is an ordered list of
//! fields whose offsets chain from the area base. Editing a variable-length
//! field grows its area in 8-byte steps and shifts every later area, with
//! padding, header offsets and checksums recomputed on every edit.
//!
//! ## Example
//!
//! ```
//! use frucraft::area::AreaId;
//! use frucraft::record::Record;
//!
//! let mut record = Record::new();
//! record.enable_area(AreaId::BoardInfo).unwrap();
//! record
//!     .set_field_by_key(AreaId::BoardInfo, "manufacturer_data", b"ACME")
//!     .unwrap();
//!
//! let image = record.finalize().unwrap();
//! assert_eq!(image.len(), 8 + 64);
//!
//! let decoded = Record::decode(&image).unwrap();
//! assert!(decoded.checksum_failures().is_empty());
//! assert_eq!(decoded.encode(), image);
//! ```

pub mod area;
pub mod bits;
pub mod constants;
pub mod describe;
pub mod errors;
pub mod field;
pub mod lookup;
pub mod record;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use record::{Record, RecordValues};
