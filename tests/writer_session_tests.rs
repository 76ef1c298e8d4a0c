//! Writer protocol end to end.

use std::sync::Arc;

use flumore_core::log::{RecordingLogSink, Severity};
use flumore_geom::{
    ArcNode, Coord, CsgOperation, CsgSolid, GeometryKind, GeometryNode, StandardGeometryTools,
};
use flumore_plugin::{Feature, FlumoreWriter, HostContext, PluginError, Status};

fn params(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn writer() -> (FlumoreWriter, Arc<StandardGeometryTools>, RecordingLogSink) {
    let tools = Arc::new(StandardGeometryTools::new());
    let log = RecordingLogSink::new();
    let host = HostContext::default()
        .with_tools(tools.clone())
        .with_log(Arc::new(log.clone()));
    (FlumoreWriter::with_host(host), tools, log)
}

#[test]
fn test_open_builds_schema_feature_and_logs() {
    let (mut w, _, log) = writer();
    w.open("out.ffs", &params(&["FLUMORE", "id", "fme_int32", "date", "fme_char(20)"]))
        .expect("open");
    let schema = w.session().expect("session").schema().to_feature();
    assert_eq!(schema.feature_type, "FLUMORE");
    let names: Vec<&str> = schema.attribute_names().collect();
    assert_eq!(names, ["id", "date"]);
    assert!(log.contains("Opening FLUMORE writer on dataset 'out.ffs'"));
}

#[test]
fn test_each_write_is_one_decomposition_pass() {
    let (mut w, tools, _) = writer();
    w.open("out", &params(&["FLUMORE"])).expect("open");

    let arc = ArcNode::by_center_start_end(
        Coord::new(0.0, 0.0),
        Coord::new(1.0, 0.0),
        Coord::new(0.0, 1.0),
    );
    let features = vec![
        Feature::new("FLUMORE").with_geometry(GeometryNode::Arc(arc)),
        Feature::new("FLUMORE").with_geometry(GeometryNode::aggregate(vec![
            GeometryNode::point(1.0, 1.0),
            GeometryNode::point(2.0, 2.0),
        ])),
    ];
    let expected = [
        vec![
            GeometryKind::Point,
            GeometryKind::Point,
            GeometryKind::Point,
            GeometryKind::Arc,
        ],
        vec![GeometryKind::Point, GeometryKind::Point, GeometryKind::Aggregate],
    ];
    for (feature, kinds) in features.iter().zip(expected.iter()) {
        let res = w.write(feature);
        assert_eq!(Status::from(&res), Status::Success);
        assert_eq!(&w.last_trace().expect("trace").kinds(), kinds);
    }
    assert_eq!(w.session().map(|s| s.features_written()), Some(2));
    w.close().expect("close");
    assert!(tools.ledger().snapshot().is_balanced());
}

#[test]
fn test_rejected_geometry_logs_error_and_session_continues() {
    let (mut w, tools, log) = writer();
    w.open("out", &params(&["FLUMORE"])).expect("open");

    let unsupported = CsgSolid::new(
        CsgOperation::Difference,
        GeometryNode::BRepSolid {
            outer: Some(Box::new(GeometryNode::Null)),
            inner: vec![],
        },
        GeometryNode::BRepSolid {
            outer: Some(Box::new(GeometryNode::Null)),
            inner: vec![],
        },
    );
    let res = w.write(&Feature::new("FLUMORE").with_geometry(GeometryNode::CsgSolid(unsupported)));
    assert_eq!(Status::from(&res), Status::Failure);
    assert!(matches!(res, Err(PluginError::Decomposition(_))));
    assert_eq!(log.messages_at(Severity::Error).len(), 1);

    w.write(&Feature::new("FLUMORE")).expect("null geometry");
    assert_eq!(
        w.last_trace().map(|t| t.kinds()),
        Some(vec![GeometryKind::Null])
    );
    w.abort().expect("abort");
    assert!(!w.is_open());
    assert!(tools.ledger().snapshot().is_balanced());
}

#[test]
fn test_writers_are_independent() {
    let (mut a, _, _) = writer();
    let (mut b, _, _) = writer();
    a.open("a", &params(&["A"])).expect("open a");
    b.open("b", &params(&["B"])).expect("open b");
    a.write(&Feature::new("A").with_geometry(GeometryNode::polygon(GeometryNode::line(vec![]))))
        .expect("write a");
    assert_eq!(b.last_trace().map(|t| t.len()), Some(0));
    a.close().expect("close a");
    assert!(b.is_open());
}
