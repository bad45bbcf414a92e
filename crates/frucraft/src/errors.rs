//! Error types for bit access, decoding, field validation and layout consistency.

use thiserror::Error;

/// Errors produced when reading or writing a bit window of a byte slice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitError {
    /// Requested bit range is beyond the end of the data.
    #[error("bit window {begin}..={end} is outside a {len}-byte buffer")]
    OutOfBounds { begin: usize, end: usize, len: usize },
    /// More than 64 bits were requested in a single read.
    #[error("bit window of {bits} bits does not fit in 64 bits")]
    TooManyBits { bits: usize },
    /// Window bounds are reversed (`begin` must be the higher bit).
    #[error("bit window {begin}..={end} is reversed")]
    Reversed { begin: usize, end: usize },
}

/// Errors produced while decoding a binary image into a [crate::record::Record].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A field's resolved offset and size run past the end of the buffer.
    #[error("{field} in {area}: needs bytes {offset}..{end}, buffer has {len}")]
    OutOfBounds {
        area: String,
        field: String,
        offset: usize,
        end: usize,
        len: usize,
    },
    /// An info field has no 0xC1 terminator before the end of the buffer.
    #[error("{field} in {area}: no 0xC1 terminator after offset {offset}")]
    MissingSentinel {
        area: String,
        field: String,
        offset: usize,
    },
    /// The declared area length is smaller than the data it carries.
    #[error("{area}: declared {declared} bytes but fields need {needed}")]
    AreaOverflow {
        area: String,
        declared: usize,
        needed: usize,
    },
    /// The internal use area has no later area to bound it, or the gap is not positive.
    #[error("internal use area at offset {offset} has no following area that bounds it")]
    InternalUseUnbounded { offset: usize },
    /// A bit window could not be read from a decoded field.
    #[error(transparent)]
    Bits(#[from] BitError),
}

/// A user-supplied value was rejected; the previous field contents are retained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input must be a decimal number.
    #[error("parameter must be a number, got {input:?}")]
    NotANumber { input: String },
    /// A numeric code does not fit the field.
    #[error("value {value} is out of range 0..={max}")]
    CodeOutOfRange { value: u64, max: u64 },
    /// Date/time input does not match `H:M DD.MM.YY`.
    #[error("format = \"H:M DD.MM.YY\", got {input:?}")]
    InvalidDate { input: String },
    /// Date/time lies before 1996-01-01 00:00 or past the 3-byte minute range.
    #[error("date {input:?} is outside the encodable range")]
    DateOutOfRange { input: String },
    /// The field is derived by the engine and cannot be edited.
    #[error("{field} changes automatically and cannot be set")]
    ReadOnly { field: String },
    /// Shrinking the area would cut into live data; only padding may be dropped.
    #[error("area can't be shrunk to {requested} bytes, minimum is {minimum}")]
    ShrinkBelowLiveData { requested: usize, minimum: usize },
    /// Data longer than the 6-bit length of a type/length byte.
    #[error("data of {len} bytes exceeds the maximum of {max}")]
    DataTooLong { len: usize, max: usize },
    /// Free text may not contain the 0xC1 terminator byte.
    #[error("free text may not contain the 0xC1 terminator")]
    SentinelInText,
    /// The area length would not fit its 1-byte length field.
    #[error("area size {size} exceeds the maximum of {max} bytes")]
    AreaTooLarge { size: usize, max: usize },
    /// An area offset would not fit its 1-byte header field.
    #[error("record grows to {size} bytes, areas can only start below {max}")]
    RecordTooLarge { size: usize, max: usize },
    /// The internal use area is sized by the next area, so it cannot be the last one.
    #[error("internal use area needs a later area to bound it")]
    InternalUseLast,
    /// The field belongs to an area that is not present.
    #[error("{area} is not present")]
    AreaAbsent { area: String },
    /// No field with that index or key exists in the area.
    #[error("{area} has no field {field:?}")]
    UnknownField { area: String, field: String },
}

/// The tree disagrees with itself after a cascade; this is an engine bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The encoded length of an area does not match its declared size.
    #[error("{area}: declared {declared} bytes, fields encode {actual}")]
    SizeMismatch {
        area: String,
        declared: usize,
        actual: usize,
    },
    /// An area followed by other areas is not a whole number of quanta.
    #[error("{area}: size {size} is not a multiple of 8")]
    Unquantized { area: String, size: usize },
    /// Fixed fields and data already exceed the declared area size.
    #[error("{area}: fields need {needed} bytes, area declares {declared}")]
    NegativePadding {
        area: String,
        declared: usize,
        needed: usize,
    },
}

/// Top-level error for record operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FruError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("invalid value: {0}")]
    Validation(#[from] ValidationError),
    #[error("internal inconsistency: {0}")]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Bits(#[from] BitError),
    /// A value-driven update failed for one named field.
    #[error("{area} / {field}: {source}")]
    Field {
        area: String,
        field: String,
        #[source]
        source: Box<FruError>,
    },
}

impl FruError {
    /// Returns the validation error behind this error, looking through field context.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            FruError::Validation(err) => Some(err),
            FruError::Field { source, .. } => source.as_validation(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = ValidationError::ShrinkBelowLiveData {
            requested: 16,
            minimum: 40,
        };
        assert_eq!(
            err.to_string(),
            "area can't be shrunk to 16 bytes, minimum is 40"
        );

        let err = ValidationError::ReadOnly {
            field: "Checksum".to_string(),
        };
        assert_eq!(err.to_string(), "Checksum changes automatically and cannot be set");
    }

    #[test]
    fn test_decode_display() {
        let err = DecodeError::MissingSentinel {
            area: "Board Info Area".to_string(),
            field: "Additional custom Mfg".to_string(),
            offset: 40,
        };
        assert!(err.to_string().contains("0xC1"));
        assert!(err.to_string().contains("Board Info Area"));
    }

    #[test]
    fn test_as_validation_through_context() {
        let err = FruError::Field {
            area: "Board Info Area".to_string(),
            field: "mfg_date_time".to_string(),
            source: Box::new(FruError::Validation(ValidationError::InvalidDate {
                input: "tomorrow".to_string(),
            })),
        };
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::InvalidDate { .. })
        ));
        assert!(FruError::Bits(BitError::TooManyBits { bits: 65 })
            .as_validation()
            .is_none());
    }
}
