//! FLUMORE reader: schema announcement and one record per `read`.
//!
//! All cursor and latch state lives in a [`ReaderSession`] created by `open`
//! and dropped by `close`, so reader instances never share progress.

use tracing::info;

use flumore_core::schema::SchemaDescriptor;
use flumore_io::DatasetCursor;

use crate::error::{ProtocolViolation, Result};
use crate::feature::{log_feature, Feature};
use crate::host::HostContext;
use crate::messages;

/// Fixed at `open` from the parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Opened without parameters: schema exchange first, then data.
    SchemaNegotiation,
    /// Opened with parameters: data only.
    Data,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaReply {
    pub feature: Feature,
    /// `false` on the first request of a session, `true` afterwards.
    pub end_of_schema: bool,
}

pub struct ReaderSession {
    dataset: String,
    mode: SessionMode,
    cursor: DatasetCursor,
    schema_sent: bool,
    parameter: Option<String>,
}

impl ReaderSession {
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn cursor(&self) -> &DatasetCursor {
        &self.cursor
    }

    /// Mapping-file parameter found when the session was opened, if any.
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }
}

pub struct FlumoreReader {
    type_name: String,
    keyword: String,
    host: HostContext,
    session: Option<ReaderSession>,
}

impl FlumoreReader {
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

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ReaderSession> {
        self.session.as_ref()
    }

    pub fn open(&mut self, dataset: &str, parameters: &[String]) -> Result<()> {
        if self.session.is_some() {
            return Err(ProtocolViolation::AlreadyOpen.into());
        }
        self.host.log.info(&messages::opening_reader(dataset));

        let (mode, parameter) = if parameters.is_empty() {
            (SessionMode::SchemaNegotiation, self.read_parameters())
        } else {
            (SessionMode::Data, None)
        };
        info!(dataset, ?mode, "reader opened");

        self.session = Some(ReaderSession {
            dataset: dataset.to_string(),
            mode,
            cursor: DatasetCursor::new(self.host.source.clone(), dataset),
            schema_sent: false,
            parameter,
        });
        Ok(())
    }

    fn read_parameters(&self) -> Option<String> {
        let tag = self.host.config.parameter_tag.as_str();
        let value = self
            .host
            .mapping
            .fetch_with_prefix(&self.keyword, &self.type_name, tag);
        match &value {
            Some(v) => self.host.log.info(&messages::parameter_value(tag, v)),
            None => self.host.log.info(messages::MSG_NO_PARAMETER),
        }
        value
    }

    pub fn read_schema(&mut self) -> Result<SchemaReply> {
        let session = self.session.as_mut().ok_or(ProtocolViolation::NotOpen)?;
        if session.mode == SessionMode::Data {
            return Err(ProtocolViolation::SchemaInDataMode.into());
        }
        let end_of_schema = session.schema_sent;
        session.schema_sent = true;
        Ok(SchemaReply {
            feature: Feature::schema(&SchemaDescriptor::flumore()),
            end_of_schema,
        })
    }

    /// Next record as a feature; `None` is end of file.
    pub fn read(&mut self) -> Result<Option<Feature>> {
        let session = self.session.as_mut().ok_or(ProtocolViolation::NotOpen)?;
        let Some(record) = session.cursor.advance()? else {
            return Ok(None);
        };
        let feature = Feature::from_record(&record);
        if self.host.config.log_features {
            log_feature(self.host.log.as_ref(), &feature);
        }
        Ok(Some(feature))
    }

    /// Ends the session. Closing a reader that is not open is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            self.host.log.info(&messages::closing_reader(&session.dataset));
            info!(
                dataset = %session.dataset,
                records = session.cursor.records_emitted(),
                "reader closed"
            );
        }
        Ok(())
    }

    pub fn abort(&mut self) -> Result<()> {
        self.close()
    }

    /// The reader publishes no properties for any category.
    pub fn properties(&self, _category: &str) -> Option<Vec<String>> {
        None
    }
}
