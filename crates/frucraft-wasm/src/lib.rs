//! WASM bindings for the `frucraft` FRU record engine.
//!
//! This crate exposes the record tree to a JavaScript shell: decode an EEPROM
//! image, browse areas and fields, edit values, and write the image back.
//!
//! ```text
//! // Pseudo TypeScript example
//! //
//! // const record = WasmRecord.decode(eepromBytes);
//! // record.setText("Board Info Area", "serial_number_data", "SN-0042");
//! // const view = record.view();   // { size, areas: [{ name, fields: [...] }] }
//! // const image = record.finalize();
//! //
//! // const fresh = WasmRecord.fromValues(JSON.stringify({
//! //   "Product Info Area": { "product_name_data": "Widget" }
//! // }));
//! ```
//!
//! Errors are returned as `JsValue` strings carrying the human-readable reason.

mod convert;

use frucraft::{
    describe::Describe,
    lookup,
    record::Record,
    serde::{RecordDef, RecordView},
};
use wasm_bindgen::prelude::*;

/// A FRU record owned by the JavaScript side.
#[wasm_bindgen]
pub struct WasmRecord {
    record: Record,
}

#[wasm_bindgen]
impl WasmRecord {
    /// An empty record holding only the common header.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmRecord {
        WasmRecord {
            record: Record::new(),
        }
    }

    /// Decodes a complete binary image.
    pub fn decode(data: &[u8]) -> Result<WasmRecord, JsValue> {
        let record = Record::decode(data).map_err(convert::error_to_js)?;
        Ok(WasmRecord { record })
    }

    /// Builds a record from a JSON value source shaped like [`RecordDef`].
    #[wasm_bindgen(js_name = fromValues)]
    pub fn from_values(values_json: &str) -> Result<WasmRecord, JsValue> {
        let def: RecordDef = serde_json::from_str(values_json).map_err(convert::error_to_js)?;
        let record = Record::from_values(&def.into()).map_err(convert::error_to_js)?;
        Ok(WasmRecord { record })
    }

    /// Same as [`WasmRecord::from_values`] for a plain JS object.
    #[wasm_bindgen(js_name = fromObject)]
    pub fn from_object(values: JsValue) -> Result<WasmRecord, JsValue> {
        let def: RecordDef = serde_wasm_bindgen::from_value(values).map_err(convert::error_to_js)?;
        let record = Record::from_values(&def.into()).map_err(convert::error_to_js)?;
        Ok(WasmRecord { record })
    }

    /// Snapshot of every area and field, see [`RecordView`].
    pub fn view(&self) -> Result<JsValue, JsValue> {
        convert::to_js(&RecordView::from(&self.record))
    }

    /// Value-source form of the record, accepted back by `fromObject`.
    #[wasm_bindgen(js_name = toValues)]
    pub fn to_values(&self) -> Result<JsValue, JsValue> {
        convert::to_js(&RecordDef::from(self.record.to_values()))
    }

    /// Tabular description of the whole record.
    pub fn describe(&self) -> String {
        self.record.describe()
    }

    #[wasm_bindgen(js_name = describeArea)]
    pub fn describe_area(&self, area: &str) -> Result<String, JsValue> {
        let id = convert::area_id(area)?;
        Ok(self.record.area(id).describe())
    }

    /// Sets a field from raw bytes; the record is unchanged on error.
    pub fn set(&mut self, area: &str, key: &str, value: &[u8]) -> Result<(), JsValue> {
        let id = convert::area_id(area)?;
        self.record
            .set_field_by_key(id, key, value)
            .map_err(convert::error_to_js)
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, area: &str, key: &str, value: &str) -> Result<(), JsValue> {
        self.set(area, key, value.as_bytes())
    }

    #[wasm_bindgen(js_name = enableArea)]
    pub fn enable_area(&mut self, area: &str) -> Result<(), JsValue> {
        let id = convert::area_id(area)?;
        self.record.enable_area(id).map_err(convert::error_to_js)
    }

    #[wasm_bindgen(js_name = disableArea)]
    pub fn disable_area(&mut self, area: &str) -> Result<(), JsValue> {
        let id = convert::area_id(area)?;
        self.record.disable_area(id).map_err(convert::error_to_js)
    }

    /// Names of present areas whose stored checksum is wrong.
    #[wasm_bindgen(js_name = checksumFailures)]
    pub fn checksum_failures(&self) -> Vec<String> {
        self.record
            .checksum_failures()
            .into_iter()
            .map(|id| id.name().to_string())
            .collect()
    }

    /// Current bytes, without reconciling.
    pub fn encode(&self) -> Vec<u8> {
        self.record.encode()
    }

    /// Reconciles and returns the image to write back.
    pub fn finalize(&mut self) -> Result<Vec<u8>, JsValue> {
        self.record.finalize().map_err(convert::error_to_js)
    }
}

impl Default for WasmRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_name = listChassisTypes)]
pub fn list_chassis_types() -> String {
    lookup::list_chassis_types()
}

#[wasm_bindgen(js_name = listLanguageCodes)]
pub fn list_language_codes() -> String {
    lookup::list_language_codes()
}
