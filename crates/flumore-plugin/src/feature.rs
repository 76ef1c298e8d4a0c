//! Host-facing feature: a typed, ordered attribute list plus optional geometry.

use serde::{Deserialize, Serialize};

use flumore_core::log::{LogSink, Severity};
use flumore_core::schema::{SchemaDescriptor, GEOMETRY_ATTRIBUTE};
use flumore_core::types::{AttributeValue, Record};
use flumore_geom::GeometryNode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    pub feature_type: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryNode>,
}

impl Feature {
    pub fn new(feature_type: impl Into<String>) -> Self {
        Self {
            feature_type: feature_type.into(),
            ..Self::default()
        }
    }

    pub fn with_geometry(mut self, geometry: GeometryNode) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set `name`, replacing an earlier value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: AttributeValue) {
        let name = name.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Feature carrying one flattened data record.
    pub fn from_record(record: &Record) -> Self {
        let mut feature = Feature::new(record.feature_type.clone());
        for (name, value) in record.attributes() {
            feature.set_attribute(name, value);
        }
        feature
    }

    /// Schema announcement: geometry marker first, then every attribute
    /// declared without a value.
    pub fn schema(descriptor: &SchemaDescriptor) -> Self {
        let mut feature = Feature::new(descriptor.feature_type.clone());
        feature.set_attribute(
            GEOMETRY_ATTRIBUTE,
            AttributeValue::Str(descriptor.geometry.clone()),
        );
        for name in descriptor.attribute_names() {
            feature.set_attribute(name, AttributeValue::Null);
        }
        feature
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Send the feature's JSON form to the host log.
pub fn log_feature(sink: &dyn LogSink, feature: &Feature) {
    match feature.to_json() {
        Ok(json) => sink.log_event(Severity::Info, &json),
        Err(e) => sink.log_event(
            Severity::Warning,
            &format!("could not serialize {} feature: {e}", feature.feature_type),
        ),
    }
}
