//! FLUMORE writer: one geometry decomposition pass per written feature.

use tracing::{info, warn};

use flumore_core::error::Error as CoreError;
use flumore_core::types::AttributeValue;
use flumore_geom::{Decomposer, GeometryNode, Trace};

use crate::error::{ProtocolViolation, Result};
use crate::feature::Feature;
use crate::host::HostContext;
use crate::messages;

static NULL_GEOMETRY: GeometryNode = GeometryNode::Null;

/// Feature-type definition built from the writer's open parameters:
/// `[feature_type, name_1, type_1, name_2, type_2, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFeature {
    pub feature_type: String,
    pub attributes: Vec<(String, String)>,
}

impl SchemaFeature {
    pub fn from_parameters(parameters: &[String]) -> flumore_core::Result<Self> {
        let (feature_type, rest) = parameters
            .split_first()
            .ok_or_else(|| CoreError::Schema("writer parameters name no feature type".into()))?;
        if feature_type.trim().is_empty() {
            return Err(CoreError::Schema("feature type is empty".into()));
        }
        if rest.len() % 2 != 0 {
            let dangling = rest.last().map(String::as_str).unwrap_or_default();
            return Err(CoreError::Schema(format!(
                "attribute '{dangling}' has no type"
            )));
        }
        let attributes = rest
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        Ok(Self {
            feature_type: feature_type.clone(),
            attributes,
        })
    }

    pub fn to_feature(&self) -> Feature {
        let mut feature = Feature::new(self.feature_type.clone());
        for (name, ty) in &self.attributes {
            feature.set_attribute(name.clone(), AttributeValue::Str(ty.clone()));
        }
        feature
    }
}

pub struct WriterSession {
    dataset: String,
    schema: SchemaFeature,
    last_trace: Trace,
    written: u64,
    failed: u64,
}

impl WriterSession {
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn schema(&self) -> &SchemaFeature {
        &self.schema
    }

    /// Visits of the most recent `write`, including a failed one's partial trace.
    pub fn last_trace(&self) -> &Trace {
        &self.last_trace
    }

    pub fn features_written(&self) -> u64 {
        self.written
    }

    pub fn features_failed(&self) -> u64 {
        self.failed
    }
}

pub struct FlumoreWriter {
    type_name: String,
    keyword: String,
    host: HostContext,
    session: Option<WriterSession>,
}

impl FlumoreWriter {
    pub fn new(type_name: impl Into<String>, keyword: impl Into<String>, host: HostContext) -> Self {
        Self {
            type_name: type_name.into(),
            keyword: keyword.into(),
            host,
            session: None,
        }
    }

    pub fn with_host(host: HostContext) -> Self {
        Self::new(messages::TYPE_NAME, messages::KEYWORD, host)
    }

    pub fn id(&self) -> u32 {
        messages::PLUGIN_ID
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn multi_file_writer(&self) -> bool {
        true
    }

    pub fn properties(&self, _category: &str) -> Option<Vec<String>> {
        None
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&WriterSession> {
        self.session.as_ref()
    }

    pub fn last_trace(&self) -> Option<&Trace> {
        self.session.as_ref().map(WriterSession::last_trace)
    }

    pub fn open(&mut self, dataset: &str, parameters: &[String]) -> Result<()> {
        if self.session.is_some() {
            return Err(ProtocolViolation::AlreadyOpen.into());
        }
        let schema = SchemaFeature::from_parameters(parameters)?;
        self.host.log.info(&messages::opening_writer(dataset));
        info!(dataset, feature_type = %schema.feature_type, "writer opened");
        self.session = Some(WriterSession {
            dataset: dataset.to_string(),
            schema,
            last_trace: Trace::new(),
            written: 0,
            failed: 0,
        });
        Ok(())
    }

    /// Decompose the feature's geometry (absent geometry counts as `Null`).
    /// A failure rejects this feature only; the session stays open.
    pub fn write(&mut self, feature: &Feature) -> Result<()> {
        let session = self.session.as_mut().ok_or(ProtocolViolation::NotOpen)?;
        let geometry = feature.geometry.as_ref().unwrap_or(&NULL_GEOMETRY);

        let decomposer = Decomposer::with_config(self.host.tools.as_ref(), &self.host.config);
        let mut trace = Trace::new();
        let outcome = decomposer.decompose(geometry, &mut trace);
        session.last_trace = trace;

        match outcome {
            Ok(()) => {
                session.written += 1;
                Ok(())
            }
            Err(e) => {
                session.failed += 1;
                self.host.log.error(messages::MSG_WRITE_ERROR);
                warn!(feature_type = %feature.feature_type, error = %e, "geometry rejected");
                Err(e.into())
            }
        }
    }

    /// Ends the session. Closing a writer that is not open is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            self.host.log.info(&messages::closing_writer(&session.dataset));
            info!(
                dataset = %session.dataset,
                written = session.written,
                failed = session.failed,
                "writer closed"
            );
        }
        Ok(())
    }

    pub fn abort(&mut self) -> Result<()> {
        self.close()
    }
}
