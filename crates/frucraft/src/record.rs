//! The whole FRU image: common header, four info areas and the multi-record area.
//!
//! A [Record] is built once, either by decoding a binary image or from a
//! [RecordValues] mapping, then edited through [Record::set_field] and written
//! out with [Record::encode] or [Record::finalize].
//!
//! Every edit runs [Record::reconcile], which recomputes the derived bytes in
//! one deterministic pass:
//! 1. padding of every area with a length field,
//! 2. the header offsets, laying present areas out back to back in record order,
//! 3. every area checksum, the header's last since it covers the offsets.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    area::{Area, AreaId, Placement, Sizing},
    bits,
    constants::{
        MAX_QUANTA, MUL_LENGTH, MUL_OFFSET, SUGGESTED_SIZE_BOARD_INFO_AREA,
        SUGGESTED_SIZE_CHASSIS_INFO_AREA, SUGGESTED_SIZE_COMMON_HEADER,
        SUGGESTED_SIZE_INTERNAL_USE_AREA, SUGGESTED_SIZE_PRODUCT_INFO_AREA,
    },
    describe::Describe,
    errors::{DecodeError, FruError, StructuralError, ValidationError},
    field::{CodeTable, Field, FieldKind},
    value::{self, FieldValue},
};

/// Value source for [Record::from_values]: area name to field key to text.
///
/// Field keys are [Field::key]s, e.g. `"part_number_data"`.
pub type RecordValues = BTreeMap<String, BTreeMap<String, String>>;

fn header() -> Area {
    let mut area = Area::new(
        AreaId::CommonHeader,
        Placement::Fixed {
            offset: 0,
            size: SUGGESTED_SIZE_COMMON_HEADER,
        },
    );
    area.push(Field::new("Format Version", FieldKind::FormatVersion));
    for id in &AreaId::ALL[1..] {
        area.push(Field::new(&format!("{} Offset", id.name()), FieldKind::Offset));
    }
    area.push(Field::with_data("PAD", FieldKind::Padding, vec![0]));
    area.push(Field::new("Checksum", FieldKind::Checksum));
    area
}

fn info_area(id: AreaId, size: usize) -> Area {
    let mut area = Area::new(
        id,
        Placement::Dynamic {
            offset_field: id.index(),
            sizing: Sizing::LengthField(1),
        },
    );
    area.push(Field::new("Format Version", FieldKind::FormatVersion));
    area.push(Field::with_data(
        "Length",
        FieldKind::Length,
        vec![(size / MUL_LENGTH) as u8],
    ));
    area
}

fn close_info_area(area: &mut Area, info: &str) {
    area.push(Field::new(info, FieldKind::Info));
    area.push(Field::new("Any remaining unused space", FieldKind::Padding));
    area.push(Field::new("Checksum", FieldKind::Checksum));
}

/// Fresh, absent area with its default contents.
fn default_area(id: AreaId) -> Area {
    match id {
        AreaId::CommonHeader => header(),
        AreaId::InternalUse => {
            let mut area = Area::new(
                id,
                Placement::Dynamic {
                    offset_field: id.index(),
                    sizing: Sizing::NextArea,
                },
            );
            area.push(Field::new("Internal Use Format Version", FieldKind::FormatVersion));
            area.push(Field::with_data(
                "Firmware data",
                FieldKind::Raw,
                vec![0; SUGGESTED_SIZE_INTERNAL_USE_AREA - 1],
            ));
            area
        }
        AreaId::ChassisInfo => {
            let mut area = info_area(id, SUGGESTED_SIZE_CHASSIS_INFO_AREA);
            area.push(Field::new("Chassis Type", FieldKind::EnumLookup(CodeTable::Chassis)));
            area.push_text("Part Number");
            area.push_text("Serial Number");
            close_info_area(&mut area, "Info fields");
            area
        }
        AreaId::BoardInfo => {
            let mut area = info_area(id, SUGGESTED_SIZE_BOARD_INFO_AREA);
            area.push(Field::new("Language Code", FieldKind::EnumLookup(CodeTable::Language)));
            area.push(Field::new("Mfg Date/Time", FieldKind::DateTime));
            for label in ["Manufacturer", "Product Name", "Serial Number", "Part Number", "FRU File ID"] {
                area.push_text(label);
            }
            close_info_area(&mut area, "Additional custom Mfg");
            area
        }
        AreaId::ProductInfo => {
            let mut area = info_area(id, SUGGESTED_SIZE_PRODUCT_INFO_AREA);
            area.push(Field::new("Language Code", FieldKind::EnumLookup(CodeTable::Language)));
            for label in [
                "Manufacturer Name",
                "Product Name",
                "Part Number",
                "Version",
                "Serial Number",
                "Asset Tag",
                "FRU File ID",
            ] {
                area.push_text(label);
            }
            close_info_area(&mut area, "Custom product info area");
            area
        }
        AreaId::MultiRecord => {
            let mut area = Area::new(
                id,
                Placement::Dynamic {
                    offset_field: id.index(),
                    sizing: Sizing::EndOfImage,
                },
            );
            area.push(Field::new("Multi Record data", FieldKind::Raw));
            area
        }
    }
}

/// A complete FRU record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    areas: Vec<Area>,
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl Record {
    /// A record holding only the common header.
    pub fn new() -> Self {
        let mut areas: Vec<Area> = AreaId::ALL.into_iter().map(default_area).collect();

        let header = &mut areas[AreaId::CommonHeader.index()];
        header.set_present(true);
        header.refresh_checksum();

        Record { areas }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn area(&self, id: AreaId) -> &Area {
        &self.areas[id.index()]
    }

    fn header(&self) -> &Area {
        self.area(AreaId::CommonHeader)
    }

    /// Absolute offset of an area, `None` when it is absent.
    pub fn area_offset(&self, id: AreaId) -> Option<usize> {
        let area = self.area(id);
        if !area.is_present() {
            return None;
        }

        match area.placement() {
            Placement::Fixed { offset, .. } => Some(offset),
            Placement::Dynamic { offset_field, .. } => self
                .header()
                .field(offset_field)
                .map(|f| bits::to_uint(f.data()) as usize * MUL_OFFSET),
        }
    }

    /// Absolute offset of field `index` of an area.
    pub fn field_offset(&self, id: AreaId, index: usize) -> Result<usize, FruError> {
        let base = self.area_offset(id).ok_or_else(|| absent(id))?;
        Ok(base + self.area(id).field_offset(index)?)
    }

    /// Decodes a whole binary image.
    ///
    /// Areas whose header offset is 0 stay absent. Stored checksums are kept as
    /// they are; see [Record::checksum_failures].
    pub fn decode(data: &[u8]) -> Result<Record, FruError> {
        let mut record = Record::new();
        record.areas[AreaId::CommonHeader.index()].decode(data, 0, None)?;

        let offsets: Vec<usize> = AreaId::ALL
            .into_iter()
            .map(|id| match record.area(id).placement() {
                Placement::Fixed { offset, .. } => offset,
                Placement::Dynamic { offset_field, .. } => record
                    .header()
                    .field(offset_field)
                    .map_or(0, |f| bits::to_uint(f.data()) as usize * MUL_OFFSET),
            })
            .collect();

        for id in &AreaId::ALL[1..] {
            let base = offsets[id.index()];
            if base == 0 {
                debug!(area = id.name(), "area not present");
                continue;
            }

            let bound = match record.area(*id).placement() {
                Placement::Dynamic {
                    sizing: Sizing::NextArea,
                    ..
                } => {
                    let next = offsets[id.index() + 1..].iter().copied().find(|&o| o != 0);
                    match next {
                        Some(next) if next > base => Some(next),
                        _ => return Err(DecodeError::InternalUseUnbounded { offset: base }.into()),
                    }
                }
                _ => None,
            };

            record.areas[id.index()].decode(data, base, bound)?;
        }

        for id in record.checksum_failures() {
            debug!(area = id.name(), "stored checksum does not match");
        }

        Ok(record)
    }

    /// Concatenation of all present areas in record order.
    pub fn encode(&self) -> Vec<u8> {
        self.areas.iter().flat_map(Area::encoded_bytes).collect()
    }

    /// Recomputes padding, header offsets and checksums, then checks every area
    /// against its declared size. Running it twice changes nothing.
    pub fn reconcile(&mut self) -> Result<(), FruError> {
        let internal_use = AreaId::InternalUse.index();
        if self.areas[internal_use].is_present()
            && !self.areas[internal_use + 1..].iter().any(Area::is_present)
        {
            return Err(ValidationError::InternalUseLast.into());
        }

        for area in &mut self.areas {
            if area.is_present() {
                area.refresh_padding()?;
            }
        }

        let mut offset = 0;
        let mut previous: Option<(AreaId, usize)> = None;
        let mut quanta = vec![0u8; AreaId::ALL.len()];

        for area in &self.areas {
            if !area.is_present() {
                continue;
            }

            if offset % MUL_OFFSET != 0 {
                if let Some((id, size)) = previous {
                    return Err(StructuralError::Unquantized {
                        area: id.name().to_string(),
                        size,
                    }
                    .into());
                }
            }

            if let Placement::Dynamic { offset_field, .. } = area.placement() {
                let q = offset / MUL_OFFSET;
                if q > MAX_QUANTA {
                    return Err(ValidationError::RecordTooLarge {
                        size: offset,
                        max: MAX_QUANTA * MUL_OFFSET,
                    }
                    .into());
                }
                quanta[offset_field] = q as u8;
            }

            let size = area.declared_size()?;
            previous = Some((area.id(), size));
            offset += size;
        }

        let header = &mut self.areas[AreaId::CommonHeader.index()];
        for id in &AreaId::ALL[1..] {
            *header.field_data_mut(id.index()) = vec![quanta[id.index()]];
        }

        for area in self.areas.iter_mut().rev() {
            area.refresh_checksum();
        }

        for area in &self.areas {
            area.verify()?;
        }

        debug!(size = offset, "reconciled record");
        Ok(())
    }

    /// Runs `op`, restoring the record to its previous state if it fails.
    fn transaction<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, FruError>,
    ) -> Result<T, FruError> {
        let snapshot = self.clone();
        let result = op(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    /// Sets field `index` of an area from user input and reconciles.
    ///
    /// On error the record is left exactly as it was.
    pub fn set_field(&mut self, id: AreaId, index: usize, input: &[u8]) -> Result<(), FruError> {
        self.transaction(|record| {
            let area = &mut record.areas[id.index()];
            if !area.is_present() {
                return Err(absent(id));
            }

            area.apply_input(index, input)?;
            record.reconcile()
        })
    }

    /// Like [Record::set_field], addressing the field by its key.
    pub fn set_field_by_key(&mut self, id: AreaId, key: &str, input: &[u8]) -> Result<(), FruError> {
        let index = self
            .area(id)
            .find(key)
            .ok_or_else(|| ValidationError::UnknownField {
                area: id.name().to_string(),
                field: key.to_string(),
            })?;

        self.set_field(id, index, input)
    }

    /// Adds an area with default contents, replacing whatever it held before.
    ///
    /// The internal use area ends where the next area starts, so enabling it
    /// fails unless a later area is already present.
    pub fn enable_area(&mut self, id: AreaId) -> Result<(), FruError> {
        if id == AreaId::CommonHeader {
            return Ok(());
        }

        self.transaction(|record| {
            let mut area = default_area(id);
            area.set_present(true);
            record.areas[id.index()] = area;
            record.reconcile()
        })
    }

    /// Drops an area from the record; the header cannot be dropped.
    pub fn disable_area(&mut self, id: AreaId) -> Result<(), FruError> {
        if id == AreaId::CommonHeader {
            return Err(ValidationError::ReadOnly {
                field: id.name().to_string(),
            }
            .into());
        }

        self.transaction(|record| {
            record.areas[id.index()].set_present(false);
            record.reconcile()
        })
    }

    /// Builds a record from text values.
    ///
    /// Every named area is enabled; within it, fields are set in layout order
    /// from their keys. Unknown area names and keys are ignored, keys naming
    /// derived fields are skipped with a warning. The record is reconciled once
    /// at the end.
    pub fn from_values(values: &RecordValues) -> Result<Record, FruError> {
        let mut record = Record::new();

        for (name, fields) in values {
            let Some(id) = AreaId::from_name(name) else {
                debug!(area = name.as_str(), "ignoring unknown area");
                continue;
            };

            if id != AreaId::CommonHeader {
                let mut area = default_area(id);
                area.set_present(true);
                record.areas[id.index()] = area;
            }

            let area = &mut record.areas[id.index()];
            for index in 0..area.fields().len() {
                let field = &area.fields()[index];
                let Some(text) = fields.get(&field.key()) else {
                    continue;
                };

                if field.is_read_only() {
                    warn!(area = id.name(), field = field.name(), "skipping read-only field");
                    continue;
                }

                let field_name = field.name().to_string();
                area.apply_input(index, text.as_bytes())
                    .map_err(|source| FruError::Field {
                        area: id.name().to_string(),
                        field: field_name,
                        source: Box::new(source),
                    })?;
            }
        }

        record.reconcile()?;
        Ok(record)
    }

    /// Text form of every present area, the inverse of [Record::from_values] for
    /// content that is valid UTF-8. Derived and opaque fields are left out.
    pub fn to_values(&self) -> RecordValues {
        let mut values = RecordValues::new();

        for area in &self.areas[1..] {
            if !area.is_present() {
                continue;
            }

            let fields = area
                .fields()
                .iter()
                .filter(|f| !f.is_read_only())
                .filter_map(|f| Some((f.key(), field_text(f)?)))
                .collect();
            values.insert(area.id().name().to_string(), fields);
        }

        values
    }

    /// Present areas whose stored checksum does not zero the area sum.
    pub fn checksum_failures(&self) -> Vec<AreaId> {
        self.areas
            .iter()
            .filter(|area| !area.checksum_ok())
            .map(Area::id)
            .collect()
    }

    /// Reconciles and encodes; the save path.
    pub fn finalize(&mut self) -> Result<Vec<u8>, FruError> {
        self.transaction(|record| {
            record.reconcile()?;
            Ok(record.encode())
        })
    }
}

fn absent(id: AreaId) -> FruError {
    ValidationError::AreaAbsent {
        area: id.name().to_string(),
    }
    .into()
}

fn field_text(field: &Field) -> Option<String> {
    match field.value() {
        FieldValue::Quanta { bytes, .. } => Some(bytes.to_string()),
        FieldValue::Text(text) => String::from_utf8(text).ok(),
        FieldValue::Minutes(minutes) => value::format_minutes_input(minutes),
        FieldValue::Code { code, .. } => Some(code.to_string()),
        _ => None,
    }
}

impl Describe for Record {
    fn name(&self) -> &str {
        "FRU"
    }

    fn is_present(&self) -> bool {
        true
    }

    fn summary(&self) -> String {
        let present = self.areas.iter().filter(|a| a.is_present()).count();
        format!("FRU: {present} areas, {} bytes", self.encode().len())
    }

    fn describe(&self) -> String {
        self.areas.iter().map(Area::describe).collect()
    }

    fn children(&self) -> Vec<&dyn Describe> {
        self.areas.iter().map(|a| a as &dyn Describe).collect()
    }
}
