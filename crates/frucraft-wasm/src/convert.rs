use frucraft::area::AreaId;
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn error_to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(error_to_js)
}

/// Resolves an area by its display name, e.g. `"Board Info Area"`.
pub fn area_id(name: &str) -> Result<AreaId, JsValue> {
    AreaId::from_name(name).ok_or_else(|| JsValue::from_str(&format!("unknown area {name:?}")))
}
