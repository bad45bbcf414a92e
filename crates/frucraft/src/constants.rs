//! Layout constants of the FRU information storage format.

use crate::bits::BitRange;

/// Granularity of area offsets stored in the common header.
pub const MUL_OFFSET: usize = 8;
/// Granularity of area lengths stored in each info area.
pub const MUL_LENGTH: usize = 8;

/// Largest value of a 1-byte offset or length field, in quanta.
pub const MAX_QUANTA: usize = 0xFF;

/// Type code bits of a type/length byte.
pub const RANGE_TYPE: BitRange = BitRange::new(7, 6);
/// Data length bits of a type/length byte.
pub const RANGE_LENGTH: BitRange = BitRange::new(5, 0);
/// Version bits of a format version byte.
pub const RANGE_FORMAT_VERSION: BitRange = BitRange::new(3, 0);

/// Longest data a type/length byte can announce.
pub const MAX_DATA_LEN: usize = 0x3F;

/// Terminator of free-text info fields.
pub const INFO_FIELD_END_BYTE: u8 = 0xC1;

/// Format version written into new areas.
pub const FORMAT_VERSION: u8 = 0x01;
/// Type/length byte of an empty data field: type code `11`, length 0.
pub const DEFAULT_TYPE_LENGTH: u8 = 0xC0;

/// Manufacturing date/time is counted in minutes from this instant.
pub const BEGIN_DATE: (i32, u32, u32) = (1996, 1, 1);
/// Width of the date/time field in bytes.
pub const DATE_TIME_SIZE: usize = 3;
/// Input format of the date/time setter.
pub const DATE_INPUT_FORMAT: &str = "%H:%M %d.%m.%y";
/// Rendering format of the date/time description.
pub const DATE_DISPLAY_FORMAT: &str = "%a %b %d %H:%M %Y";

pub const SUGGESTED_SIZE_COMMON_HEADER: usize = 8;
pub const SUGGESTED_SIZE_INTERNAL_USE_AREA: usize = 72;
pub const SUGGESTED_SIZE_CHASSIS_INFO_AREA: usize = 32;
pub const SUGGESTED_SIZE_BOARD_INFO_AREA: usize = 64;
pub const SUGGESTED_SIZE_PRODUCT_INFO_AREA: usize = 80;

/// Column widths of the tabular description.
pub const LEN_NUMBER: usize = 5;
pub const LEN_NAME: usize = 30;
pub const LEN_INFO: usize = 36;
/// Data bytes printed per description line.
pub const LEN_WIDTH: usize = 8;
