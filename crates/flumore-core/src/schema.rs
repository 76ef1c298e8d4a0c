//! The fixed FLUMORE schema descriptor announced to the host once per session.

use serde::{Deserialize, Serialize};

/// Feature type every FLUMORE record carries.
pub const FEATURE_TYPE: &str = "FLUMORE";

/// Geometry marker telling the host the features carry no geometry.
pub const GEOMETRY_NONE: &str = "flumore_none";

/// Attribute the geometry marker is stored under on the schema feature.
pub const GEOMETRY_ATTRIBUTE: &str = "fme_geometry{0}";

/// Attribute names in wire order.
pub const ATTRIBUTE_NAMES: [&str; 8] = ["id", "h", "vres", "wsp", "x", "y", "z", "date"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Int32,
    Float64,
    Utf8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Static description of the records a reader produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub feature_type: String,
    pub fields: Vec<Field>,
    pub geometry: String,
}

impl SchemaDescriptor {
    /// The descriptor for FLUMORE simulation records.
    pub fn flumore() -> Self {
        let fields = ATTRIBUTE_NAMES
            .iter()
            .map(|name| {
                let dt = match *name {
                    "id" => DataType::Int32,
                    "date" => DataType::Utf8,
                    _ => DataType::Float64,
                };
                Field::new(*name, dt)
            })
            .collect();
        Self {
            feature_type: FEATURE_TYPE.to_string(),
            fields,
            geometry: GEOMETRY_NONE.to_string(),
        }
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl Default for SchemaDescriptor {
    fn default() -> Self {
        Self::flumore()
    }
}
