//! Request payload parsing
//!
//! JSON bodies and HTML forms both arrive as untyped key/value maps. They are
//! normalized into a [`Payload`] and parsed into one typed request per
//! endpoint. Parsing fails closed: a missing or non-coercible field, or an id
//! absent from the lookup tables, rejects the request before any model is
//! touched.
//!
//! Integer fields accept JSON integers, JSON floats (truncated toward zero)
//! and strings holding an integer. The pH field accepts any number.

use agripredict_common::{
    CropDescriptor, DistrictDescriptor, ServiceError, ServiceResult, require_crop,
    require_district,
};
use ml_inference::{FertilizerReading, SoilReading};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

/// Short form field names used by the browser pages
const FORM_ALIASES: [(&str, &str); 8] = [
    ("dist", "district"),
    ("temp", "temperature"),
    ("h", "humidity"),
    ("mc", "moisture_content"),
    ("n", "nitrogen"),
    ("p", "phosphorus"),
    ("k", "potassium"),
    ("rain", "rainfall"),
];

fn canonical_field(name: &str) -> &str {
    FORM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| canonical)
}

/// Untyped request fields keyed by canonical name
#[derive(Debug, Clone, Default)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    /// Wrap a JSON body, which must be an object
    pub fn from_json(value: Value) -> ServiceResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(ServiceError::MalformedInput(
                "request body must be a JSON object".to_string(),
            )),
        }
    }

    /// Wrap submitted form fields, expanding the short field names
    #[must_use]
    pub fn from_form(form: FxHashMap<String, String>) -> Self {
        let fields = form
            .into_iter()
            .map(|(name, value)| (canonical_field(&name).to_string(), Value::String(value)))
            .collect();
        Self { fields }
    }

    fn present(&self, field: &str) -> ServiceResult<&Value> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Err(ServiceError::missing_field(field)),
            Some(Value::String(s)) if s.trim().is_empty() => Err(ServiceError::missing_field(field)),
            Some(value) => Ok(value),
        }
    }

    /// Integer field
    pub fn int(&self, field: &str) -> ServiceResult<i64> {
        coerce_int(self.present(field)?)
            .ok_or_else(|| ServiceError::invalid_field(field, "an integer"))
    }

    /// Numeric field
    pub fn number(&self, field: &str) -> ServiceResult<f64> {
        coerce_number(self.present(field)?)
            .ok_or_else(|| ServiceError::invalid_field(field, "a number"))
    }

    /// Non-empty text field
    pub fn text(&self, field: &str) -> ServiceResult<String> {
        match self.present(field)? {
            Value::String(s) => Ok(s.trim().to_string()),
            _ => Err(ServiceError::invalid_field(field, "text")),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Typed request parsed from a payload
pub trait FromPayload: Sized {
    fn from_payload(payload: &Payload) -> ServiceResult<Self>;
}

/// `{district, crop, area}`, shared by production, estimation and the
/// registration form
#[derive(Debug, Clone, Copy)]
pub struct ProductionRequest {
    pub crop: &'static CropDescriptor,
    pub district: &'static DistrictDescriptor,
    pub area_acres: i64,
}

impl FromPayload for ProductionRequest {
    fn from_payload(payload: &Payload) -> ServiceResult<Self> {
        let district = payload.int("district")?;
        let crop = payload.int("crop")?;
        let area_acres = payload.int("area")?;
        Ok(Self {
            crop: require_crop(crop)?,
            district: require_district(district)?,
            area_acres,
        })
    }
}

/// `{crop, area, production}`
#[derive(Debug, Clone, Copy)]
pub struct PriceRequest {
    pub crop: &'static CropDescriptor,
    pub area_acres: i64,
    pub production: i64,
}

impl FromPayload for PriceRequest {
    fn from_payload(payload: &Payload) -> ServiceResult<Self> {
        let crop = payload.int("crop")?;
        let area_acres = payload.int("area")?;
        let production = payload.int("production")?;
        Ok(Self {
            crop: require_crop(crop)?,
            area_acres,
            production,
        })
    }
}

/// `{crop}`, shared by demand and statistics
#[derive(Debug, Clone, Copy)]
pub struct CropRequest {
    pub crop: &'static CropDescriptor,
}

impl FromPayload for CropRequest {
    fn from_payload(payload: &Payload) -> ServiceResult<Self> {
        Ok(Self {
            crop: require_crop(payload.int("crop")?)?,
        })
    }
}

/// `{user, district, crop, area}`
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub user: String,
    pub production: ProductionRequest,
}

impl FromPayload for RegistrationRequest {
    fn from_payload(payload: &Payload) -> ServiceResult<Self> {
        let user = payload.text("user")?;
        Ok(Self {
            user,
            production: ProductionRequest::from_payload(payload)?,
        })
    }
}

impl FromPayload for FertilizerReading {
    fn from_payload(payload: &Payload) -> ServiceResult<Self> {
        let reading = Self {
            temperature: payload.int("temperature")?,
            humidity: payload.int("humidity")?,
            moisture_content: payload.int("moisture_content")?,
            crop: payload.int("crop")?,
            nitrogen: payload.int("nitrogen")?,
            phosphorus: payload.int("phosphorus")?,
            potassium: payload.int("potassium")?,
        };
        require_crop(reading.crop)?;
        Ok(reading)
    }
}

impl FromPayload for SoilReading {
    fn from_payload(payload: &Payload) -> ServiceResult<Self> {
        Ok(Self {
            nitrogen: payload.int("nitrogen")?,
            phosphorus: payload.int("phosphorus")?,
            potassium: payload.int("potassium")?,
            temperature: payload.int("temperature")?,
            humidity: payload.int("humidity")?,
            ph: payload.number("ph")?,
            rainfall: payload.int("rainfall")?,
        })
    }
}
