//! Host services a plug-in session is bound to.

use std::collections::HashMap;
use std::sync::Arc;

use flumore_core::config::AdapterConfig;
use flumore_core::log::{LogSink, TracingLogSink};
use flumore_geom::{GeometryTools, StandardGeometryTools};
use flumore_io::readers::{source_for, DatasetSource};

/// Directive lookup in the host's mapping file.
pub trait MappingFile: Send + Sync {
    /// Value of `tag`, looked up under `keyword` first and `type_name` second.
    fn fetch_with_prefix(&self, keyword: &str, type_name: &str, tag: &str) -> Option<String>;
}

/// Mapping file with no directives.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMappingFile;

impl MappingFile for NoMappingFile {
    fn fetch_with_prefix(&self, _keyword: &str, _type_name: &str, _tag: &str) -> Option<String> {
        None
    }
}

/// Mapping file backed by a fixed `(prefix, tag) -> value` table.
#[derive(Debug, Default, Clone)]
pub struct StaticMappingFile {
    entries: HashMap<(String, String), String>,
}

impl StaticMappingFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directive(
        mut self,
        prefix: impl Into<String>,
        tag: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.entries
            .insert((prefix.into(), tag.into()), value.into());
        self
    }

    fn get(&self, prefix: &str, tag: &str) -> Option<&String> {
        self.entries.get(&(prefix.to_string(), tag.to_string()))
    }
}

impl MappingFile for StaticMappingFile {
    fn fetch_with_prefix(&self, keyword: &str, type_name: &str, tag: &str) -> Option<String> {
        self.get(keyword, tag)
            .or_else(|| self.get(type_name, tag))
            .cloned()
    }
}

/// Everything a reader or writer borrows from its host. Clones share services.
#[derive(Clone)]
pub struct HostContext {
    pub log: Arc<dyn LogSink>,
    pub tools: Arc<dyn GeometryTools>,
    pub mapping: Arc<dyn MappingFile>,
    pub source: Arc<dyn DatasetSource>,
    pub config: AdapterConfig,
}

impl HostContext {
    /// Standalone services: `tracing` log, bundled geometry tools, no mapping
    /// file, and the source adapter selected by `config.source_format`.
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            log: Arc::new(TracingLogSink),
            tools: Arc::new(StandardGeometryTools::new()),
            mapping: Arc::new(NoMappingFile),
            source: source_for(config.source_format),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(AdapterConfig::from_env())
    }

    pub fn with_log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn with_tools(mut self, tools: Arc<dyn GeometryTools>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_mapping(mut self, mapping: Arc<dyn MappingFile>) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_source(mut self, source: Arc<dyn DatasetSource>) -> Self {
        self.source = source;
        self
    }
}

impl Default for HostContext {
    fn default() -> Self {
        Self::new(AdapterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_prefix_wins_over_type_name() {
        let map = StaticMappingFile::new()
            .with_directive("FLUMORE", "FLUMORE_PARAMETER", "by-type")
            .with_directive("FLUMORE_1", "FLUMORE_PARAMETER", "by-keyword");
        assert_eq!(
            map.fetch_with_prefix("FLUMORE_1", "FLUMORE", "FLUMORE_PARAMETER"),
            Some("by-keyword".to_string())
        );
        assert_eq!(
            map.fetch_with_prefix("OTHER", "FLUMORE", "FLUMORE_PARAMETER"),
            Some("by-type".to_string())
        );
        assert_eq!(map.fetch_with_prefix("OTHER", "NONE", "FLUMORE_PARAMETER"), None);
        assert_eq!(NoMappingFile.fetch_with_prefix("a", "b", "c"), None);
    }
}
