//! Definition of the fields that make up an [crate::area::Area].

use crate::{
    bits::{self, BitRange},
    constants::{
        DATE_TIME_SIZE, DEFAULT_TYPE_LENGTH, FORMAT_VERSION, INFO_FIELD_END_BYTE, MUL_LENGTH,
        MUL_OFFSET, RANGE_FORMAT_VERSION, RANGE_LENGTH, RANGE_TYPE,
    },
    describe::{self, Describe},
    lookup,
    value::{self, FieldValue},
};

/// Static table a code field is described with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTable {
    Chassis,
    Language,
}

/// Behavior of a field: how its size is resolved, how it decodes and what input it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Low nibble holds the format version; fixed to 1.
    FormatVersion,
    /// Header byte holding an area offset in multiples of 8; 0 = area absent.
    Offset,
    /// Area length in multiples of 8.
    Length,
    /// Type code in bits 7..6, length of the following data field in bits 5..0.
    TypeLength,
    /// Variable data whose length lives in the type/length field at index `length`.
    Data { length: usize },
    /// Minutes since 1996-01-01 00:00, 3 bytes.
    DateTime,
    /// 1-byte code described through a static table.
    EnumLookup(CodeTable),
    /// Free text terminated by 0xC1, sentinel included.
    Info,
    /// Zero fill up to the declared area size, checksum excluded.
    Padding,
    /// Zero-sum checksum over the preceding bytes of the area.
    Checksum,
    /// Opaque payload bounded by the area extent.
    Raw,
}

impl FieldKind {
    /// Size of fixed-width kinds, `None` for kinds whose size is derived.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            FieldKind::FormatVersion
            | FieldKind::Offset
            | FieldKind::Length
            | FieldKind::TypeLength
            | FieldKind::EnumLookup(_)
            | FieldKind::Checksum => Some(1),
            FieldKind::DateTime => Some(DATE_TIME_SIZE),
            FieldKind::Data { .. } | FieldKind::Info | FieldKind::Padding | FieldKind::Raw => None,
        }
    }

    /// Contents of a freshly constructed field of this kind.
    pub fn default_data(&self) -> Vec<u8> {
        match self {
            FieldKind::FormatVersion => vec![FORMAT_VERSION],
            FieldKind::Length => vec![0x02],
            FieldKind::TypeLength => vec![DEFAULT_TYPE_LENGTH],
            FieldKind::DateTime => vec![0; DATE_TIME_SIZE],
            FieldKind::Info => vec![INFO_FIELD_END_BYTE],
            FieldKind::Offset | FieldKind::EnumLookup(_) | FieldKind::Checksum => vec![0],
            FieldKind::Data { .. } | FieldKind::Padding | FieldKind::Raw => Vec::new(),
        }
    }

    /// Kinds maintained by the engine that reject user input.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            FieldKind::FormatVersion
                | FieldKind::Offset
                | FieldKind::TypeLength
                | FieldKind::Padding
                | FieldKind::Checksum
        )
    }
}

/// A single named field: raw bytes plus the kind that interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) number: usize,
    pub(crate) kind: FieldKind,
    pub(crate) data: Vec<u8>,
    pub(crate) present: bool,
}

impl Field {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self::with_data(name, kind, kind.default_data())
    }

    pub fn with_data(name: &str, kind: FieldKind, data: Vec<u8>) -> Self {
        Field {
            name: name.to_string(),
            number: 0,
            kind,
            data,
            present: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the field inside its area.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Raw bytes as stored in the image.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn is_read_only(&self) -> bool {
        self.kind.is_read_only()
    }

    /// Key used by value-driven construction: lower case, spaces and `/` turned into `_`.
    ///
    /// `"Part Number type/length"` becomes `"part_number_type_length"`.
    pub fn key(&self) -> String {
        self.name.replace(['/', ' '], "_").to_lowercase()
    }

    /// Bytes this field contributes to the encoded image.
    pub fn encoded_bytes(&self) -> &[u8] {
        if self.present { &self.data } else { &[] }
    }

    fn window(&self, range: BitRange) -> u64 {
        bits::extract(&self.data, Some(range)).unwrap_or(0)
    }

    /// Typed view of the field contents.
    pub fn value(&self) -> FieldValue {
        match self.kind {
            FieldKind::FormatVersion => FieldValue::Version(self.window(RANGE_FORMAT_VERSION) as u8),
            FieldKind::Offset => FieldValue::Quanta {
                quanta: bits::to_uint(&self.data) as usize,
                bytes: MUL_OFFSET * bits::to_uint(&self.data) as usize,
            },
            FieldKind::Length => FieldValue::Quanta {
                quanta: bits::to_uint(&self.data) as usize,
                bytes: MUL_LENGTH * bits::to_uint(&self.data) as usize,
            },
            FieldKind::TypeLength => FieldValue::TypeLength {
                type_code: self.window(RANGE_TYPE) as u8,
                len: self.window(RANGE_LENGTH) as usize,
            },
            FieldKind::Data { .. } => FieldValue::Text(self.data.clone()),
            FieldKind::DateTime => FieldValue::Minutes(bits::to_uint(&self.data)),
            FieldKind::EnumLookup(table) => {
                let code = bits::to_uint(&self.data) as u8;
                let name = match table {
                    CodeTable::Chassis => lookup::chassis_type(code).map(|c| c.info),
                    CodeTable::Language => lookup::language_code(code).map(|l| l.short_name),
                };
                FieldValue::Code { code, name }
            }
            FieldKind::Info => {
                let end = self
                    .data
                    .iter()
                    .position(|&b| b == INFO_FIELD_END_BYTE)
                    .unwrap_or(self.data.len());
                FieldValue::Text(self.data[..end].to_vec())
            }
            FieldKind::Padding => FieldValue::Padding(self.data.len()),
            FieldKind::Checksum => FieldValue::Checksum(bits::to_uint(&self.data) as u8),
            FieldKind::Raw => FieldValue::Raw(self.data.clone()),
        }
    }

    /// One-line human readable interpretation of the contents.
    pub fn info(&self) -> String {
        match self.value() {
            FieldValue::Version(version) => format!("{version}"),
            FieldValue::Quanta { bytes, .. } => format!("Multiple on {MUL_LENGTH} = {bytes}"),
            FieldValue::TypeLength { type_code, len } => {
                format!("Type code: {type_code} Data len: {len}")
            }
            FieldValue::Text(text) => value::latin1(&text),
            FieldValue::Minutes(minutes) => value::describe_minutes(minutes),
            FieldValue::Code { name, .. } => name.unwrap_or("Unknown").to_string(),
            FieldValue::Padding(len) => format!("{len} bytes"),
            FieldValue::Raw(bytes) => format!("{} bytes", bytes.len()),
            FieldValue::Checksum(sum) => format!("{sum}"),
        }
    }
}

impl Describe for Field {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn summary(&self) -> String {
        self.info()
    }

    fn describe(&self) -> String {
        describe::table_row(self.number, &self.name, &self.info(), &self.data)
    }

    fn children(&self) -> Vec<&dyn Describe> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(name: &str, kind: FieldKind, data: Vec<u8>) -> Field {
        let mut field = Field::with_data(name, kind, data);
        field.present = true;
        field
    }

    #[test]
    fn test_key_mangling() {
        let field = Field::new("Part Number type/length", FieldKind::TypeLength);
        assert_eq!(field.key(), "part_number_type_length");

        let field = Field::new("Mfg Date/Time", FieldKind::DateTime);
        assert_eq!(field.key(), "mfg_date_time");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(FieldKind::FormatVersion.default_data(), vec![0x01]);
        assert_eq!(FieldKind::TypeLength.default_data(), vec![0xC0]);
        assert_eq!(FieldKind::Info.default_data(), vec![0xC1]);
        assert_eq!(FieldKind::DateTime.default_data(), vec![0, 0, 0]);
        assert!(FieldKind::Data { length: 0 }.default_data().is_empty());
    }

    #[test]
    fn test_absent_field_encodes_nothing() {
        let field = Field::new("Checksum", FieldKind::Checksum);
        assert!(field.encoded_bytes().is_empty());

        let field = present("Checksum", FieldKind::Checksum, vec![0x42]);
        assert_eq!(field.encoded_bytes(), &[0x42]);
    }

    #[test]
    fn test_info_strings() {
        let version = present("Format Version", FieldKind::FormatVersion, vec![0xF1]);
        assert_eq!(version.info(), "1");

        let offset = present("Board Info Area Offset", FieldKind::Offset, vec![0x02]);
        assert_eq!(offset.info(), "Multiple on 8 = 16");

        let type_length = present("Serial Number type/length", FieldKind::TypeLength, vec![0xC5]);
        assert_eq!(type_length.info(), "Type code: 3 Data len: 5");

        let data = present("Serial Number Data", FieldKind::Data { length: 0 }, b"AB\0CD".to_vec());
        assert_eq!(data.info(), "AB CD");

        let chassis = present("Chassis Type", FieldKind::EnumLookup(CodeTable::Chassis), vec![0x17]);
        assert_eq!(chassis.info(), "Rack Mount Chassis");

        let unknown = present("Chassis Type", FieldKind::EnumLookup(CodeTable::Chassis), vec![0x00]);
        assert_eq!(unknown.info(), "Unknown");

        let language = present("Language Code", FieldKind::EnumLookup(CodeTable::Language), vec![25]);
        assert_eq!(language.info(), "en");

        let checksum = present("Checksum", FieldKind::Checksum, vec![0xFD]);
        assert_eq!(checksum.info(), "253");
    }

    #[test]
    fn test_info_field_value_strips_sentinel() {
        let info = present("Info fields", FieldKind::Info, vec![b'h', b'i', 0xC1]);
        assert_eq!(info.value(), FieldValue::Text(b"hi".to_vec()));
        assert_eq!(info.info(), "hi");
    }

    #[test]
    fn test_describe_row() {
        let field = present("Chassis Type", FieldKind::EnumLookup(CodeTable::Chassis), vec![0x17]);
        let row = field.describe();
        assert!(row.starts_with("0    Chassis Type"));
        assert!(row.contains("Rack Mount Chassis"));
        assert!(row.ends_with("| 0x17 \n"));
        assert!(field.children().is_empty());
    }

    #[test]
    fn test_read_only_kinds() {
        assert!(FieldKind::Checksum.is_read_only());
        assert!(FieldKind::Padding.is_read_only());
        assert!(FieldKind::Offset.is_read_only());
        assert!(!FieldKind::Length.is_read_only());
        assert!(!FieldKind::DateTime.is_read_only());
    }
}
