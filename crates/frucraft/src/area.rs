//! Areas: ordered fields whose offsets chain from the area base, plus the
//! growth rules that keep an area's declared size in step with its data.

use tracing::debug;

use crate::{
    bits,
    constants::{INFO_FIELD_END_BYTE, MAX_DATA_LEN, MAX_QUANTA, MUL_LENGTH, RANGE_LENGTH},
    describe::{self, Describe},
    errors::{DecodeError, FruError, StructuralError, ValidationError},
    field::{Field, FieldKind},
    value,
};

/// The six areas of a FRU image, in record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AreaId {
    CommonHeader,
    InternalUse,
    ChassisInfo,
    BoardInfo,
    ProductInfo,
    MultiRecord,
}

impl AreaId {
    pub const ALL: [AreaId; 6] = [
        AreaId::CommonHeader,
        AreaId::InternalUse,
        AreaId::ChassisInfo,
        AreaId::BoardInfo,
        AreaId::ProductInfo,
        AreaId::MultiRecord,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            AreaId::CommonHeader => "Common Header",
            AreaId::InternalUse => "Internal Use Area",
            AreaId::ChassisInfo => "Chassis Info Area",
            AreaId::BoardInfo => "Board Info Area",
            AreaId::ProductInfo => "Product Info Area",
            AreaId::MultiRecord => "Multi Record Area",
        }
    }

    pub fn from_name(name: &str) -> Option<AreaId> {
        AreaId::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// How an area's size is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// Stored in the area's own length field (index), in multiples of 8.
    LengthField(usize),
    /// Extends up to the next present area.
    NextArea,
    /// Extends to the end of the image.
    EndOfImage,
}

/// Where an area lives in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Compile-time offset and size (the common header).
    Fixed { offset: usize, size: usize },
    /// Offset stored in the common header field `offset_field`.
    Dynamic { offset_field: usize, sizing: Sizing },
}

/// Zero-sum checksum: the byte that makes `bytes` plus itself sum to 0 mod 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b))
        .wrapping_neg()
}

/// A named, ordered sequence of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    id: AreaId,
    placement: Placement,
    fields: Vec<Field>,
    present: bool,
}

impl Area {
    pub fn new(id: AreaId, placement: Placement) -> Self {
        Area {
            id,
            placement,
            fields: Vec::new(),
            present: false,
        }
    }

    /// Appends a field; its number is its index.
    pub fn push(&mut self, mut field: Field) -> usize {
        field.number = self.fields.len();
        field.present = self.present;
        self.fields.push(field);
        self.fields.len() - 1
    }

    /// Appends a type/length field and the data field it sizes.
    pub fn push_text(&mut self, label: &str) -> usize {
        let length = self.push(Field::new(&format!("{label} type/length"), FieldKind::TypeLength));
        self.push(Field::new(&format!("{label} Data"), FieldKind::Data { length }))
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Index of the field whose [Field::key] is `key`.
    pub fn find(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key() == key)
    }

    pub(crate) fn field_data_mut(&mut self, index: usize) -> &mut Vec<u8> {
        &mut self.fields[index].data
    }

    pub(crate) fn set_present(&mut self, present: bool) {
        self.present = present;
        for field in &mut self.fields {
            field.present = present;
        }
    }

    fn index_of(&self, kind: FieldKind) -> Option<usize> {
        self.fields.iter().position(|f| f.kind == kind)
    }

    pub fn padding_index(&self) -> Option<usize> {
        self.index_of(FieldKind::Padding)
    }

    pub fn checksum_index(&self) -> Option<usize> {
        self.index_of(FieldKind::Checksum)
    }

    fn length_index(&self) -> Option<usize> {
        match self.placement {
            Placement::Dynamic {
                sizing: Sizing::LengthField(index),
                ..
            } => Some(index),
            _ => None,
        }
    }

    fn unknown_field(&self, index: usize) -> FruError {
        ValidationError::UnknownField {
            area: self.id.name().to_string(),
            field: index.to_string(),
        }
        .into()
    }

    fn read_only(&self, index: usize) -> FruError {
        ValidationError::ReadOnly {
            field: self.fields[index].name.clone(),
        }
        .into()
    }

    /// Declared size in bytes.
    ///
    /// Areas without a length field declare exactly what their fields hold.
    pub fn declared_size(&self) -> Result<usize, FruError> {
        match self.placement {
            Placement::Fixed { size, .. } => Ok(size),
            Placement::Dynamic {
                sizing: Sizing::LengthField(index),
                ..
            } => Ok(bits::to_uint(&self.fields[index].data) as usize * MUL_LENGTH),
            Placement::Dynamic { .. } => Ok(self.fields.iter().map(|f| f.data.len()).sum()),
        }
    }

    /// Resolved size of field `index`.
    pub fn field_size(&self, index: usize) -> Result<usize, FruError> {
        let field = self.fields.get(index).ok_or_else(|| self.unknown_field(index))?;

        if let Some(size) = field.kind.fixed_size() {
            return Ok(size);
        }

        match field.kind {
            FieldKind::Data { length } => {
                let type_length = &self.fields[length].data;
                Ok(bits::extract(type_length, Some(RANGE_LENGTH))? as usize)
            }
            FieldKind::Padding => self.padding_size(),
            _ => Ok(field.data.len()),
        }
    }

    /// Offset of field `index` relative to the area base: the left neighbour's
    /// offset plus its size, 0 for the first field.
    pub fn field_offset(&self, index: usize) -> Result<usize, FruError> {
        if index >= self.fields.len() {
            return Err(self.unknown_field(index));
        }

        let mut offset = 0;
        for left in 0..index {
            offset += self.field_size(left)?;
        }

        Ok(offset)
    }

    /// Padding bytes needed to fill the declared size; 0 for areas without padding.
    pub fn padding_size(&self) -> Result<usize, FruError> {
        let Some(padding) = self.padding_index() else {
            return Ok(0);
        };

        let declared = self.declared_size()?;
        let mut needed = self.field_offset(padding)?;
        for trailing in padding + 1..self.fields.len() {
            needed += self.field_size(trailing)?;
        }

        declared.checked_sub(needed).ok_or_else(|| {
            StructuralError::NegativePadding {
                area: self.id.name().to_string(),
                declared,
                needed,
            }
            .into()
        })
    }

    /// Concatenation of the present fields' bytes; empty when the area is absent.
    pub fn encoded_bytes(&self) -> Vec<u8> {
        if !self.present {
            return Vec::new();
        }

        self.fields
            .iter()
            .flat_map(|f| f.encoded_bytes().iter().copied())
            .collect()
    }

    /// Whether the stored checksum zeroes the area sum. Areas without a checksum pass.
    pub fn checksum_ok(&self) -> bool {
        if !self.present || self.checksum_index().is_none() {
            return true;
        }

        checksum(&self.encoded_bytes()) == 0
    }

    pub(crate) fn decode(
        &mut self,
        data: &[u8],
        base: usize,
        bound: Option<usize>,
    ) -> Result<(), DecodeError> {
        self.set_present(true);

        let mut offset = base;
        for index in 0..self.fields.len() {
            let size = self.decoded_size(data, index, base, offset, bound)?;
            let end = offset + size;

            let field = &mut self.fields[index];
            if end > data.len() {
                return Err(DecodeError::OutOfBounds {
                    area: self.id.name().to_string(),
                    field: field.name.clone(),
                    offset,
                    end,
                    len: data.len(),
                });
            }

            field.data = data[offset..end].to_vec();
            offset = end;
        }

        debug!(area = self.id.name(), base, size = offset - base, "decoded area");
        Ok(())
    }

    fn decoded_size(
        &self,
        data: &[u8],
        index: usize,
        base: usize,
        offset: usize,
        bound: Option<usize>,
    ) -> Result<usize, DecodeError> {
        let field = &self.fields[index];
        let overflow = |declared: usize, needed: usize| DecodeError::AreaOverflow {
            area: self.id.name().to_string(),
            declared,
            needed,
        };

        match field.kind {
            FieldKind::Info => data
                .get(offset..)
                .and_then(|rest| rest.iter().position(|&b| b == INFO_FIELD_END_BYTE))
                .map(|pos| pos + 1)
                .ok_or_else(|| DecodeError::MissingSentinel {
                    area: self.id.name().to_string(),
                    field: field.name.clone(),
                    offset,
                }),
            FieldKind::Raw => {
                let end = bound.unwrap_or(data.len());
                end.checked_sub(offset)
                    .ok_or_else(|| overflow(end.saturating_sub(base), offset - base))
            }
            FieldKind::Padding => {
                let declared = self.declared_size().map_err(|_| overflow(0, offset - base))?;
                let trailing: usize = self.fields[index + 1..]
                    .iter()
                    .map(|f| f.kind.fixed_size().unwrap_or(0))
                    .sum();
                let needed = offset - base + trailing;
                declared
                    .checked_sub(needed)
                    .ok_or_else(|| overflow(declared, needed))
            }
            FieldKind::Data { length } => {
                Ok(bits::extract(&self.fields[length].data, Some(RANGE_LENGTH))? as usize)
            }
            kind => Ok(kind.fixed_size().unwrap_or(0)),
        }
    }

    /// Applies user input to field `index`, growing the area when data no longer fits.
    ///
    /// Leaves derived fields (padding, checksum, header offsets) stale; the caller
    /// runs the record's reconcile pass afterwards.
    pub(crate) fn apply_input(&mut self, index: usize, input: &[u8]) -> Result<(), FruError> {
        let kind = self
            .fields
            .get(index)
            .ok_or_else(|| self.unknown_field(index))?
            .kind;
        if kind.is_read_only() {
            return Err(self.read_only(index));
        }

        match kind {
            FieldKind::Length => {
                let requested = value::parse_number(input)?;
                self.resize(usize::try_from(requested).unwrap_or(usize::MAX))
            }
            FieldKind::Data { length } => self.set_data(index, length, input),
            FieldKind::Info => self.set_info(index, input),
            FieldKind::DateTime => {
                let minutes = value::parse_datetime(input)?;
                self.fields[index].data = bits::from_uint(minutes, self.field_size(index)?);
                Ok(())
            }
            FieldKind::EnumLookup(_) => {
                self.fields[index].data = vec![value::parse_code(input)?];
                Ok(())
            }
            FieldKind::Raw => self.set_raw(index, input),
            _ => Err(self.read_only(index)),
        }
    }

    /// Sets the declared size, quantized down to a multiple of 8.
    ///
    /// Shrinking may only drop padding, never live data.
    pub(crate) fn resize(&mut self, requested: usize) -> Result<(), FruError> {
        let Some(length) = self.length_index() else {
            return Err(ValidationError::ReadOnly {
                field: format!("{} length", self.id.name()),
            }
            .into());
        };

        let size = requested / MUL_LENGTH * MUL_LENGTH;
        let max = MAX_QUANTA * MUL_LENGTH;
        if size > max {
            return Err(ValidationError::AreaTooLarge { size, max }.into());
        }

        let table_size = self.declared_size()?;
        let unused = self.padding_size()?;
        if size < table_size && table_size - size > unused {
            return Err(ValidationError::ShrinkBelowLiveData {
                requested: size,
                minimum: table_size - (unused - unused % MUL_LENGTH),
            }
            .into());
        }

        self.fields[length].data = vec![(size / MUL_LENGTH) as u8];
        Ok(())
    }

    /// Grows the declared size one quantum at a time until `new_len` bytes fit
    /// where field `index` currently holds its data.
    ///
    /// Growth continues while `new_len >= unused + current size`, so data that
    /// would fill the area exactly, leaving no padding, still adds a quantum.
    fn grow_for(&mut self, index: usize, new_len: usize) -> Result<(), FruError> {
        let Some(length) = self.length_index() else {
            return Ok(());
        };

        let field_size = self.field_size(index)?;
        let mut unused = self.padding_size()?;

        while new_len >= unused + field_size {
            let quanta = bits::to_uint(&self.fields[length].data) as usize + 1;
            if quanta > MAX_QUANTA {
                return Err(ValidationError::AreaTooLarge {
                    size: quanta * MUL_LENGTH,
                    max: MAX_QUANTA * MUL_LENGTH,
                }
                .into());
            }

            self.fields[length].data = vec![quanta as u8];
            unused = self.padding_size()?;
            debug!(
                area = self.id.name(),
                size = quanta * MUL_LENGTH,
                unused,
                "grew area"
            );
        }

        Ok(())
    }

    fn set_data(&mut self, index: usize, length: usize, input: &[u8]) -> Result<(), FruError> {
        if input.len() > MAX_DATA_LEN {
            return Err(ValidationError::DataTooLong {
                len: input.len(),
                max: MAX_DATA_LEN,
            }
            .into());
        }

        self.grow_for(index, input.len())?;

        let type_length = &self.fields[length].data;
        self.fields[length].data = bits::inject(type_length, &[input.len() as u8], RANGE_LENGTH)?;
        self.fields[index].data = input.to_vec();
        Ok(())
    }

    fn set_info(&mut self, index: usize, input: &[u8]) -> Result<(), FruError> {
        if input.contains(&INFO_FIELD_END_BYTE) {
            return Err(ValidationError::SentinelInText.into());
        }

        let mut data = input.to_vec();
        data.push(INFO_FIELD_END_BYTE);

        self.grow_for(index, data.len())?;
        self.fields[index].data = data;
        Ok(())
    }

    fn set_raw(&mut self, index: usize, input: &[u8]) -> Result<(), FruError> {
        let mut data = input.to_vec();

        // areas followed by others must stay whole quanta
        if let Placement::Dynamic {
            sizing: Sizing::NextArea,
            ..
        } = self.placement
        {
            let prefix = self.field_offset(index)?;
            let total = (prefix + data.len()).div_ceil(MUL_LENGTH) * MUL_LENGTH;
            data.resize(total - prefix, 0);
        }

        self.fields[index].data = data;
        Ok(())
    }

    /// Rewrites the padding field with zeros of its derived size.
    pub(crate) fn refresh_padding(&mut self) -> Result<(), FruError> {
        if let Some(padding) = self.padding_index() {
            let size = self.padding_size()?;
            self.fields[padding].data = vec![0; size];
        }

        Ok(())
    }

    /// Recomputes the checksum over every other byte of the area.
    pub(crate) fn refresh_checksum(&mut self) {
        let Some(index) = self.checksum_index() else {
            return;
        };

        let sum = checksum(
            &self
                .fields
                .iter()
                .enumerate()
                .filter(|(i, f)| *i != index && f.present)
                .flat_map(|(_, f)| f.data.iter().copied())
                .collect::<Vec<u8>>(),
        );
        self.fields[index].data = vec![sum];
    }

    /// Checks that the encoded area matches its declared size.
    pub fn verify(&self) -> Result<(), FruError> {
        if !self.present {
            return Ok(());
        }

        let declared = self.declared_size()?;
        let actual = self.encoded_bytes().len();
        if declared != actual {
            return Err(StructuralError::SizeMismatch {
                area: self.id.name().to_string(),
                declared,
                actual,
            }
            .into());
        }

        Ok(())
    }
}

impl Describe for Area {
    fn name(&self) -> &str {
        self.id.name()
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn summary(&self) -> String {
        if !self.present {
            return format!("{} NOT PRESENT", self.id.name());
        }

        match self.declared_size() {
            Ok(size) => format!("{}: {} fields, {} bytes", self.id.name(), self.fields.len(), size),
            Err(err) => format!("{}: {err}", self.id.name()),
        }
    }

    fn describe(&self) -> String {
        if !self.present {
            return describe::banner(&format!("{} NOT PRESENT", self.id.name()));
        }

        let mut out = describe::banner(self.id.name());
        out.push_str(&describe::table_header());
        for field in &self.fields {
            out.push_str(&field.describe());
            out.push('\n');
        }

        out
    }

    fn children(&self) -> Vec<&dyn Describe> {
        self.fields.iter().map(|f| f as &dyn Describe).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::CodeTable;

    /// Chassis-like area: version, length (4 quanta), type, one text pair, info, padding, checksum.
    fn sample_area() -> Area {
        let mut area = Area::new(
            AreaId::ChassisInfo,
            Placement::Dynamic {
                offset_field: 2,
                sizing: Sizing::LengthField(1),
            },
        );
        area.push(Field::new("Format Version", FieldKind::FormatVersion));
        area.push(Field::with_data("Length", FieldKind::Length, vec![4]));
        area.push(Field::new("Chassis Type", FieldKind::EnumLookup(CodeTable::Chassis)));
        area.push_text("Part Number");
        area.push(Field::new("Info fields", FieldKind::Info));
        area.push(Field::new("Any remaining unused space", FieldKind::Padding));
        area.push(Field::new("Checksum", FieldKind::Checksum));
        area.set_present(true);
        area.refresh_padding().unwrap();
        area.refresh_checksum();
        area
    }

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(&[0x01, 0x02, 0, 0, 0, 0, 0]), 0xFD);
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0x80, 0x80]), 0);
    }

    #[test]
    fn test_area_names_roundtrip() {
        for id in AreaId::ALL {
            assert_eq!(AreaId::from_name(id.name()), Some(id));
        }
        assert_eq!(AreaId::from_name("Nope"), None);
    }

    #[test]
    fn test_offset_chain() {
        let area = sample_area();
        assert_eq!(area.field_offset(0).unwrap(), 0);
        for i in 1..area.fields().len() {
            assert_eq!(
                area.field_offset(i).unwrap(),
                area.field_offset(i - 1).unwrap() + area.field_size(i - 1).unwrap()
            );
        }
    }

    #[test]
    fn test_padding_fills_declared_size() {
        let area = sample_area();
        // 1 + 1 + 1 + 1 + 0 + 1 = 5 bytes ahead of padding, 1 checksum byte behind
        assert_eq!(area.padding_size().unwrap(), 32 - 5 - 1);
        assert_eq!(area.encoded_bytes().len(), 32);
        assert!(area.checksum_ok());
        area.verify().unwrap();
    }

    #[test]
    fn test_set_data_within_padding() {
        let mut area = sample_area();
        area.apply_input(4, b"PN-1234").unwrap();
        assert_eq!(area.field(3).unwrap().data(), &[0xC7]);
        assert_eq!(area.field_size(4).unwrap(), 7);
        assert_eq!(area.declared_size().unwrap(), 32);
        assert_eq!(area.padding_size().unwrap(), 26 - 7);
    }

    #[test]
    fn test_set_data_grows_area() {
        let mut area = sample_area();
        // 26 bytes of padding: 26 >= 26 + 0 forces one quantum
        area.apply_input(4, &[b'x'; 26]).unwrap();
        assert_eq!(area.field(1).unwrap().data(), &[5]);
        assert_eq!(area.padding_size().unwrap(), 8);
    }

    #[test]
    fn test_exact_fit_still_grows() {
        let mut area = sample_area();
        area.apply_input(4, &[b'x'; 10]).unwrap();
        area.apply_input(1, b"16").unwrap();
        assert_eq!(area.padding_size().unwrap(), 0);

        area.apply_input(4, &[b'y'; 10]).unwrap();
        assert_eq!(area.declared_size().unwrap(), 24);
        assert_eq!(area.padding_size().unwrap(), 8);
    }

    #[test]
    fn test_set_data_too_long() {
        let mut area = sample_area();
        let err = area.apply_input(4, &[b'x'; 64]).unwrap_err();
        assert_eq!(
            err,
            FruError::Validation(ValidationError::DataTooLong { len: 64, max: 63 })
        );
    }

    #[test]
    fn test_type_code_bits_preserved() {
        let mut area = sample_area();
        area.field_data_mut(3)[0] = 0x40;
        area.apply_input(4, b"abc").unwrap();
        assert_eq!(area.field(3).unwrap().data(), &[0x43]);
    }

    #[test]
    fn test_resize_quantizes_down() {
        let mut area = sample_area();
        area.apply_input(1, b"45").unwrap();
        assert_eq!(area.declared_size().unwrap(), 40);
    }

    #[test]
    fn test_resize_rejects_cutting_live_data() {
        let mut area = sample_area();
        let err = area.apply_input(1, b"0").unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::ShrinkBelowLiveData { requested: 0, .. })
        ));
        assert_eq!(area.declared_size().unwrap(), 32);
    }

    #[test]
    fn test_resize_may_drop_padding() {
        let mut area = sample_area();
        area.apply_input(4, &[b'x'; 10]).unwrap();
        // padding is now 16 bytes: dropping 16 is allowed
        area.apply_input(1, b"16").unwrap();
        assert_eq!(area.padding_size().unwrap(), 0);
    }

    #[test]
    fn test_resize_rejects_non_number() {
        let mut area = sample_area();
        let err = area.apply_input(1, b"big").unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_read_only_fields() {
        let mut area = sample_area();
        for index in [0, 3, 6, 7] {
            let err = area.apply_input(index, b"1").unwrap_err();
            assert!(matches!(
                err.as_validation(),
                Some(ValidationError::ReadOnly { .. })
            ));
        }
    }

    #[test]
    fn test_set_info_appends_sentinel() {
        let mut area = sample_area();
        area.apply_input(5, b"note").unwrap();
        assert_eq!(area.field(5).unwrap().data(), b"note\xC1");
        assert!(matches!(
            area.apply_input(5, &[b'a', 0xC1]).unwrap_err().as_validation(),
            Some(ValidationError::SentinelInText)
        ));
    }

    #[test]
    fn test_set_code() {
        let mut area = sample_area();
        area.apply_input(2, b"23").unwrap();
        assert_eq!(area.field(2).unwrap().data(), &[23]);
        assert!(area.apply_input(2, b"300").is_err());
    }

    #[test]
    fn test_decode_missing_sentinel() {
        let mut area = sample_area();
        let image = [0x01, 0x04, 0x17, 0xC0, 0x00, 0x00];
        let err = area.decode(&image, 0, None).unwrap_err();
        assert!(matches!(err, DecodeError::MissingSentinel { .. }));
    }

    #[test]
    fn test_decode_overflowing_length() {
        let mut area = sample_area();
        // declares one quantum but needs more than 8 bytes
        let mut image = vec![0x01, 0x01, 0x17, 0xC7];
        image.extend_from_slice(b"PN-1234");
        image.extend_from_slice(&[0xC1, 0x00]);
        let err = area.decode(&image, 0, None).unwrap_err();
        assert!(matches!(err, DecodeError::AreaOverflow { declared: 8, .. }));
    }

    #[test]
    fn test_describe_separates_rows() {
        let text = sample_area().describe();
        assert!(text.contains("+ Chassis Info Area"));
        assert!(text.contains(" \n\n1    Length"));
        assert!(text.ends_with(" \n\n"));
    }

    #[test]
    fn test_describe_absent_area() {
        let mut area = sample_area();
        area.set_present(false);
        assert!(area.describe().contains("Chassis Info Area NOT PRESENT"));
        assert!(area.encoded_bytes().is_empty());
    }
}
