use std::{
    error::Error,
    fmt::{self, Display},
};

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::{Map, Value};

/// Number of raw numeric attributes.
pub const NUMERIC_COUNT: usize = 8;

/// Total length of the encoded feature vector.
pub const FEATURE_COUNT: usize = NUMERIC_COUNT + OceanProximity::ALL.len();

/// Name of the categorical attribute.
pub const OCEAN_PROXIMITY: &str = "ocean_proximity";

/// A raw numeric attribute of the request and how a client should present it.
#[derive(Debug, Clone, Copy)]
pub struct NumericField {
    pub name: &'static str,
    pub description: &'static str,
    pub example: f64,
}

/// The numeric attributes, in the order the model was trained on.
pub const NUMERIC_FIELDS: [NumericField; NUMERIC_COUNT] = [
    NumericField {
        name: "longitude",
        description: "Longitude coordinate",
        example: -122.23,
    },
    NumericField {
        name: "latitude",
        description: "Latitude coordinate",
        example: 37.88,
    },
    NumericField {
        name: "housing_median_age",
        description: "Median age of houses",
        example: 41.0,
    },
    NumericField {
        name: "total_rooms",
        description: "Total number of rooms",
        example: 880.0,
    },
    NumericField {
        name: "total_bedrooms",
        description: "Total number of bedrooms",
        example: 129.0,
    },
    NumericField {
        name: "population",
        description: "Population in the area",
        example: 322.0,
    },
    NumericField {
        name: "households",
        description: "Number of households",
        example: 126.0,
    },
    NumericField {
        name: "median_income",
        description: "Median income (in tens of thousands)",
        example: 8.3252,
    },
];

/// Categories of the `ocean_proximity` attribute, in one-hot slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OceanProximity {
    UnderOneHourOcean,
    Inland,
    Island,
    NearBay,
    NearOcean,
}

impl OceanProximity {
    pub const ALL: [Self; 5] = [
        Self::UnderOneHourOcean,
        Self::Inland,
        Self::Island,
        Self::NearBay,
        Self::NearOcean,
    ];

    /// Category used when the request doesn't mention one.
    pub const DEFAULT: Self = Self::Inland;

    pub fn label(self) -> &'static str {
        match self {
            Self::UnderOneHourOcean => "<1H OCEAN",
            Self::Inland => "INLAND",
            Self::Island => "ISLAND",
            Self::NearBay => "NEAR BAY",
            Self::NearOcean => "NEAR OCEAN",
        }
    }

    /// Name of this category's one-hot slot in the feature vector.
    pub fn slot_name(self) -> &'static str {
        match self {
            Self::UnderOneHourOcean => "ocean_proximity_<1H OCEAN",
            Self::Inland => "ocean_proximity_INLAND",
            Self::Island => "ocean_proximity_ISLAND",
            Self::NearBay => "ocean_proximity_NEAR BAY",
            Self::NearOcean => "ocean_proximity_NEAR OCEAN",
        }
    }

    /// Exact, case sensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Names of all feature vector slots, in order.
pub fn feature_names() -> impl Iterator<Item = &'static str> {
    NUMERIC_FIELDS
        .iter()
        .map(|field| field.name)
        .chain(OceanProximity::ALL.into_iter().map(OceanProximity::slot_name))
}

/// Feature encoding failures.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeErr {
    NotAnObject { kind: &'static str },
    NotNumeric { field: &'static str, value: String },
    WrongType { field: &'static str, kind: &'static str },
    NonFinite { field: &'static str },
}

impl Display for EncodeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeErr::NotAnObject { kind } => {
                write!(f, "request body must be a JSON object, got {kind}")
            }
            EncodeErr::NotNumeric { field, value } => {
                write!(f, "{field}: could not convert string to float: '{value}'")
            }
            EncodeErr::WrongType { field, kind } => write!(
                f,
                "{field}: argument must be a string or a real number, not {kind}"
            ),
            EncodeErr::NonFinite { field } => write!(f, "{field}: input contains NaN or infinity"),
        }
    }
}

impl Error for EncodeErr {}

/// The fixed order feature vector handed to the scaler.
///
/// Serializes as an ordered `{name: value}` map, one-hot slots as integers.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    numeric: [f64; NUMERIC_COUNT],
    proximity: Option<OceanProximity>,
}

impl FeatureVector {
    pub fn new(numeric: [f64; NUMERIC_COUNT], proximity: Option<OceanProximity>) -> Self {
        Self { numeric, proximity }
    }

    /// Encodes a prediction request.
    ///
    /// Missing numeric attributes count as `0`, a missing category as
    /// [`OceanProximity::DEFAULT`]. A category that is present but unknown, including a non
    /// string one, selects no slot at all.
    ///
    /// # Arguments
    /// * `request` - The decoded request body.
    ///
    /// # Returns
    /// The feature vector, or an error if the body is not an object or a numeric attribute
    /// can't be coerced to a float.
    pub fn encode(request: &Value) -> Result<Self, EncodeErr> {
        let Value::Object(attrs) = request else {
            return Err(EncodeErr::NotAnObject {
                kind: kind_of(request),
            });
        };

        let mut numeric = [0.0; NUMERIC_COUNT];
        for (slot, field) in numeric.iter_mut().zip(&NUMERIC_FIELDS) {
            *slot = match attrs.get(field.name) {
                Some(value) => coerce(field.name, value)?,
                None => 0.0,
            };
        }

        Ok(Self {
            numeric,
            proximity: proximity(attrs),
        })
    }

    pub fn proximity(&self) -> Option<OceanProximity> {
        self.proximity
    }

    fn one_hot(&self) -> [u8; 5] {
        let mut one_hot = [0; 5];
        if let Some(category) = self.proximity {
            one_hot[category.slot()] = 1;
        }

        one_hot
    }

    /// The numeric values in slot order.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        let mut values = [0.0; FEATURE_COUNT];
        let (numeric, one_hot) = values.split_at_mut(NUMERIC_COUNT);
        numeric.copy_from_slice(&self.numeric);
        for (v, bit) in one_hot.iter_mut().zip(self.one_hot()) {
            *v = f64::from(bit);
        }

        values
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (field, value) in NUMERIC_FIELDS.iter().zip(self.numeric) {
            map.serialize_entry(field.name, &value)?;
        }
        for (category, bit) in OceanProximity::ALL.into_iter().zip(self.one_hot()) {
            map.serialize_entry(category.slot_name(), &bit)?;
        }

        map.end()
    }
}

fn proximity(attrs: &Map<String, Value>) -> Option<OceanProximity> {
    match attrs.get(OCEAN_PROXIMITY) {
        None => Some(OceanProximity::DEFAULT),
        Some(Value::String(label)) => OceanProximity::from_label(label),
        Some(_) => None,
    }
}

fn coerce(field: &'static str, value: &Value) -> Result<f64, EncodeErr> {
    let wrong_type = || EncodeErr::WrongType {
        field,
        kind: kind_of(value),
    };

    let x: f64 = match value {
        Value::Number(n) => n.as_f64().ok_or_else(wrong_type)?,
        Value::Bool(b) => if *b { 1.0 } else { 0.0 },
        Value::String(s) => s.trim().parse().map_err(|_| EncodeErr::NotNumeric {
            field,
            value: s.clone(),
        })?,
        Value::Null | Value::Array(_) | Value::Object(_) => return Err(wrong_type()),
    };

    // "nan", "inf" and overflowing literals parse fine but no model accepts them
    if !x.is_finite() {
        return Err(EncodeErr::NonFinite { field });
    }

    Ok(x)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Metadata used by clients to render an input form.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureCatalog;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FieldInfo {
    Number {
        description: &'static str,
        example: f64,
    },
    Select {
        options: [&'static str; 5],
        description: &'static str,
    },
}

impl Serialize for FeatureCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUMERIC_COUNT + 1))?;
        for field in &NUMERIC_FIELDS {
            let info = FieldInfo::Number {
                description: field.description,
                example: field.example,
            };
            map.serialize_entry(field.name, &info)?;
        }

        let info = FieldInfo::Select {
            options: OceanProximity::ALL.map(OceanProximity::label),
            description: "Proximity to ocean",
        };
        map.serialize_entry(OCEAN_PROXIMITY, &info)?;

        map.end()
    }
}
