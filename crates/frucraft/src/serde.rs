//! JSON-friendly shapes for value sources and record snapshots.
//!
//! [RecordDef] is what a host hands in to build a record:
//!
//! ```json
//! { "Board Info Area": { "manufacturer_data": "ACME", "mfg_date_time": "14:30 15.03.24" } }
//! ```
//!
//! [RecordView] is what it gets back to render a record without walking the tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    area::Area,
    field::Field,
    record::{Record, RecordValues},
};

/// Value source keyed by area name, then by field key.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct RecordDef {
    pub areas: BTreeMap<String, BTreeMap<String, String>>,
}

impl From<RecordDef> for RecordValues {
    fn from(value: RecordDef) -> Self {
        value.areas
    }
}

impl From<RecordValues> for RecordDef {
    fn from(areas: RecordValues) -> Self {
        RecordDef { areas }
    }
}

/// Snapshot of a whole record.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecordView {
    /// Length of the encoded image in bytes.
    pub size: usize,
    pub areas: Vec<AreaView>,
}

/// Snapshot of one area.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AreaView {
    pub name: String,
    pub present: bool,
    /// Absolute offset, absent areas have none.
    pub offset: Option<usize>,
    /// Declared size in bytes.
    pub size: Option<usize>,
    pub checksum_ok: bool,
    pub fields: Vec<FieldView>,
}

/// Snapshot of one field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldView {
    pub number: usize,
    pub name: String,
    /// Key accepted by value-driven construction.
    pub key: String,
    pub read_only: bool,
    pub info: String,
    pub data: Vec<u8>,
}

impl From<&Field> for FieldView {
    fn from(field: &Field) -> Self {
        FieldView {
            number: field.number(),
            name: field.name().to_string(),
            key: field.key(),
            read_only: field.is_read_only(),
            info: field.info(),
            data: field.data().to_vec(),
        }
    }
}

impl AreaView {
    fn new(record: &Record, area: &Area) -> Self {
        AreaView {
            name: area.id().name().to_string(),
            present: area.is_present(),
            offset: record.area_offset(area.id()),
            size: area
                .is_present()
                .then(|| area.declared_size().ok())
                .flatten(),
            checksum_ok: area.checksum_ok(),
            fields: area.fields().iter().map(FieldView::from).collect(),
        }
    }
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        RecordView {
            size: record.encode().len(),
            areas: record
                .areas()
                .iter()
                .map(|area| AreaView::new(record, area))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaId;

    #[test]
    fn test_record_def_from_json() {
        let json = r#"{
            "Chassis Info Area": { "chassis_type": "23", "serial_number_data": "SN-9" },
            "Internal Use Area": {}
        }"#;

        let def: RecordDef = serde_json::from_str(json).unwrap();
        let record = Record::from_values(&def.into()).unwrap();

        assert_eq!(record.area_offset(AreaId::InternalUse), Some(8));
        assert_eq!(record.area_offset(AreaId::ChassisInfo), Some(80));
        assert_eq!(record.area(AreaId::ChassisInfo).fields()[6].data(), b"SN-9");
    }

    #[test]
    fn test_record_view() {
        let mut record = Record::new();
        record.enable_area(AreaId::ProductInfo).unwrap();

        let view = RecordView::from(&record);
        assert_eq!(view.size, 88);
        assert_eq!(view.areas.len(), 6);

        let product = &view.areas[AreaId::ProductInfo.index()];
        assert_eq!(product.offset, Some(8));
        assert_eq!(product.size, Some(80));
        assert!(product.checksum_ok);
        assert_eq!(product.fields[1].info, "Multiple on 8 = 80");

        let chassis = &view.areas[AreaId::ChassisInfo.index()];
        assert!(!chassis.present);
        assert_eq!(chassis.offset, None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["areas"][0]["fields"][7]["name"], "Checksum");
    }
}
