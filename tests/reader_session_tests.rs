//! Reader protocol end to end: schema exchange, record stream, session lifecycle.

use std::fs;
use std::io::Write;
use std::sync::Arc;

use flumore_core::config::{AdapterConfig, SourceFormat};
use flumore_core::log::{RecordingLogSink, Severity};
use flumore_core::types::{AttributeValue, Dataset, Group, Row};
use flumore_io::MemorySource;
use flumore_plugin::{FlumoreReader, HostContext, PluginError, ProtocolViolation, Status};

fn row(id: i32, h: f64) -> Row {
    Row {
        id,
        h,
        vres: 0.5,
        wsp: 3.0,
        x: 10.0,
        y: 20.0,
        z: 1.0,
    }
}

fn reader_over(groups: Vec<Group>) -> (FlumoreReader, MemorySource, RecordingLogSink) {
    let source = MemorySource::new(Dataset::new(groups));
    let log = RecordingLogSink::new();
    let host = HostContext::default()
        .with_log(Arc::new(log.clone()))
        .with_source(Arc::new(source.clone()));
    (FlumoreReader::with_host(host), source, log)
}

fn drain(reader: &mut FlumoreReader) -> Vec<(i32, String)> {
    let mut out = Vec::new();
    while let Some(f) = reader.read().expect("read") {
        let id = match f.attribute("id") {
            Some(AttributeValue::I32(id)) => *id,
            other => panic!("id attribute missing: {other:?}"),
        };
        let date = f
            .attribute("date")
            .and_then(AttributeValue::as_str)
            .expect("date")
            .to_string();
        out.push((id, date));
    }
    out
}

fn temp_path(name: &str) -> String {
    let mut path = std::env::temp_dir();
    path.push(format!("flumore-reader-tests-{}-{name}", std::process::id()));
    path.to_string_lossy().to_string()
}

#[test]
fn test_single_group_yields_two_records_then_eof() {
    let (mut reader, _, _) = reader_over(vec![Group::new(
        "2020-01-01T00:00Z",
        vec![row(1, 1.0), row(2, 2.0)],
    )]);
    reader.open("sim.json", &[]).expect("open");

    let schema = reader.read_schema().expect("schema");
    assert!(!schema.end_of_schema);
    assert_eq!(schema.feature.feature_type, "FLUMORE");

    let first = reader.read().expect("read").expect("first record");
    assert_eq!(first.feature_type, "FLUMORE");
    assert_eq!(
        first.attribute("date").and_then(AttributeValue::as_str),
        Some("2020-01-01T00:00Z")
    );
    assert_eq!(first.attribute("h").and_then(AttributeValue::as_f64), Some(1.0));
    let second = reader.read().expect("read").expect("second record");
    assert_eq!(second.attribute("id"), Some(&AttributeValue::I32(2)));
    assert!(reader.read().expect("read").is_none());
    assert!(reader.read().expect("read").is_none());
}

#[test]
fn test_records_follow_group_order_without_gaps() {
    let (mut reader, source, _) = reader_over(vec![
        Group::new("t0", vec![row(1, 0.0), row(2, 0.0), row(3, 0.0)]),
        Group::new("t1", vec![]),
        Group::new("t2", vec![row(4, 0.0)]),
        Group::new("t3", vec![row(5, 0.0), row(6, 0.0)]),
    ]);
    reader.open("sim.json", &["DATA".into()]).expect("open");
    let records = drain(&mut reader);
    let ids: Vec<i32> = records.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(records[3].1, "t2");
    assert_eq!(source.load_count(), 1);
}

#[test]
fn test_dataset_is_not_loaded_before_first_read() {
    let (mut reader, source, _) = reader_over(vec![Group::new("t0", vec![row(1, 0.0)])]);
    reader.open("sim.json", &[]).expect("open");
    reader.read_schema().expect("schema");
    assert_eq!(source.load_count(), 0);
    reader.read().expect("read");
    assert_eq!(source.load_count(), 1);
}

#[test]
fn test_reopen_starts_a_fresh_cursor() {
    let (mut reader, source, log) = reader_over(vec![Group::new("t0", vec![row(1, 0.0), row(2, 0.0)])]);
    reader.open("sim.json", &[]).expect("open");
    assert_eq!(drain(&mut reader).len(), 2);
    reader.close().expect("close");

    reader.open("sim.json", &[]).expect("reopen");
    assert!(!reader.read_schema().expect("schema").end_of_schema);
    assert_eq!(drain(&mut reader).len(), 2);
    reader.abort().expect("abort");
    assert_eq!(source.load_count(), 2);
    assert_eq!(
        log.messages_at(Severity::Info)
            .iter()
            .filter(|m| m.starts_with("Closing FLUMORE reader"))
            .count(),
        2
    );
}

#[test]
fn test_sessions_do_not_share_progress() {
    let groups = vec![Group::new("t0", vec![row(1, 0.0), row(2, 0.0), row(3, 0.0)])];
    let (mut a, _, _) = reader_over(groups.clone());
    let (mut b, _, _) = reader_over(groups);
    a.open("a", &[]).expect("open a");
    b.open("b", &[]).expect("open b");

    a.read().expect("read a");
    a.read().expect("read a");
    let first_b = b.read().expect("read b").expect("record");
    assert_eq!(first_b.attribute("id"), Some(&AttributeValue::I32(1)));
    assert!(!b.read_schema().expect("schema b").end_of_schema);
    assert!(!a.read_schema().expect("schema a").end_of_schema);
}

#[test]
fn test_load_failure_is_fatal_for_the_session() {
    let source = MemorySource::failing("simulation file is truncated");
    let host = HostContext::default().with_source(Arc::new(source.clone()));
    let mut reader = FlumoreReader::with_host(host);
    reader.open("broken.json", &[]).expect("open");

    for _ in 0..2 {
        let res = reader.read();
        assert_eq!(Status::from(&res), Status::Failure);
        match res {
            Err(PluginError::Load(e)) => assert!(e.to_string().contains("truncated")),
            other => panic!("expected load error, got {other:?}"),
        }
    }
    assert_eq!(source.load_count(), 1);
    reader.close().expect("close");
}

#[test]
fn test_read_before_open_is_rejected() {
    let (mut reader, _, _) = reader_over(vec![]);
    assert!(matches!(
        reader.read_schema(),
        Err(PluginError::Protocol(ProtocolViolation::NotOpen))
    ));
}

#[test]
fn test_each_record_is_logged_as_json() {
    let (mut reader, _, log) = reader_over(vec![Group::new("t0", vec![row(7, 0.0)])]);
    reader.open("sim.json", &["DATA".into()]).expect("open");
    drain(&mut reader);
    let feature_lines: Vec<String> = log
        .messages_at(Severity::Info)
        .into_iter()
        .filter(|m| m.starts_with('{'))
        .collect();
    assert_eq!(feature_lines.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&feature_lines[0]).expect("json");
    assert_eq!(value["feature_type"], "FLUMORE");
}

#[test]
fn test_feature_logging_can_be_disabled() {
    let source = MemorySource::new(Dataset::new(vec![Group::new("t0", vec![row(1, 0.0)])]));
    let log = RecordingLogSink::new();
    let config = AdapterConfig {
        log_features: false,
        ..AdapterConfig::default()
    };
    let host = HostContext::new(config)
        .with_log(Arc::new(log.clone()))
        .with_source(Arc::new(source));
    let mut reader = FlumoreReader::with_host(host);
    reader.open("sim.json", &["DATA".into()]).expect("open");
    drain(&mut reader);
    assert!(!log.entries().iter().any(|(_, m)| m.starts_with('{')));
}

#[test]
fn test_csv_file_through_reader() {
    let path = temp_path("run.csv");
    {
        let mut file = fs::File::create(&path).expect("create csv");
        writeln!(file, "date,id,h,vres,wsp,x,y,z").expect("header");
        writeln!(file, "2020-01-01T00:00Z,1,1.0,0.1,2.0,0,0,0").expect("row");
        writeln!(file, "2020-01-01T00:00Z,2,1.2,0.1,2.0,1,0,0").expect("row");
        writeln!(file, "2020-01-01T01:00Z,1,0.8,0.1,2.0,0,0,0").expect("row");
    }
    let config = AdapterConfig {
        source_format: SourceFormat::Auto,
        ..AdapterConfig::default()
    };
    let mut reader = FlumoreReader::with_host(HostContext::new(config));
    reader.open(&path, &[]).expect("open");
    let records = drain(&mut reader);
    reader.close().expect("close");
    let _ = fs::remove_file(&path);

    assert_eq!(
        records,
        vec![
            (1, "2020-01-01T00:00Z".to_string()),
            (2, "2020-01-01T00:00Z".to_string()),
            (1, "2020-01-01T01:00Z".to_string()),
        ]
    );
}
