//! Importer tests: stream invariants, index resolution, failure modes.

use std::io::Cursor;

use render_api::{AssetSource, RenderError};
use umbra_renderer::importer::{import_model, parse_model};

const CUBE_OBJ: &str = include_str!("../../../demo/assets/cube.obj");

fn parse(text: &str) -> Result<umbra_renderer::MeshData, RenderError> {
    parse_model("test.obj", Cursor::new(text.as_bytes().to_vec()))
}

#[test]
fn cube_asset_yields_36_vertices() {
    let mesh = parse(CUBE_OBJ).expect("cube should parse");
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.positions.len(), 36);
    assert_eq!(mesh.normals.len(), 36);
    assert_eq!(mesh.texcoords.len(), 36);
}

#[test]
fn streams_always_equal_three_times_face_count() {
    let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1/1 2/2/1 3/3/1
f 3/3/1 2/2/1 1/1/1
";
    let mesh = parse(text).expect("well-formed input");
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.positions.len(), mesh.normals.len());
    assert_eq!(mesh.positions.len(), mesh.texcoords.len());
}

#[test]
fn shared_vertices_are_duplicated() {
    let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
v 1.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.5 0.5
f 1/1/1 2/1/1 3/1/1
f 2/1/1 4/1/1 3/1/1
";
    let mesh = parse(text).expect("quad");
    // Vertices 2 and 3 appear in both triangles and are emitted twice.
    assert_eq!(mesh.positions.len(), 6);
    assert_eq!(mesh.positions[1], mesh.positions[3]);
    assert_eq!(mesh.positions[2], mesh.positions[5]);
}

#[test]
fn out_of_range_normal_index_is_a_parse_error() {
    let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vn 0.0 1.0 0.0
vn 1.0 0.0 0.0
vn 0.0 0.0 -1.0
vt 0.0 0.0
f 1/1/99 2/1/1 3/1/1
";
    match parse(text) {
        Err(RenderError::Parse { line, reason }) => {
            assert_eq!(line, 9);
            assert!(reason.contains("99"), "reason: {reason}");
        }
        other => panic!("expected Parse error, got {other:?}"),
    }
}

#[test]
fn zero_index_is_out_of_range() {
    let text = "\
v 0.0 0.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
f 0/1/1 1/1/1 1/1/1
";
    assert!(matches!(parse(text), Err(RenderError::Parse { .. })));
}

#[test]
fn non_numeric_index_is_a_parse_error() {
    let text = "\
v 0.0 0.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
f a/1/1 1/1/1 1/1/1
";
    assert!(matches!(parse(text), Err(RenderError::Parse { .. })));
}

#[test]
fn quad_face_is_rejected() {
    let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
f 1/1/1 2/1/1 3/1/1 4/1/1
";
    match parse(text) {
        Err(RenderError::Parse { reason, .. }) => {
            assert!(reason.contains("4 points"), "reason: {reason}")
        }
        other => panic!("expected Parse error, got {other:?}"),
    }
}

#[test]
fn malformed_point_specifier_is_rejected() {
    let text = "\
v 0.0 0.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
f 1/1 1/1/1 1/1/1
";
    assert!(matches!(parse(text), Err(RenderError::Parse { .. })));
}

#[test]
fn short_vertex_record_is_rejected() {
    let text = "v 0.0 0.0\n";
    assert!(matches!(parse(text), Err(RenderError::Parse { .. })));
}

#[test]
fn unknown_record_kinds_are_ignored() {
    let text = "\
# comment
o cube
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
s off
f 1/1/1 2/1/1 3/1/1
";
    let mesh = parse(text).expect("comments and object names are skipped");
    assert_eq!(mesh.triangle_count(), 1);
}

struct MemAssets {
    name: &'static str,
    text: &'static str,
}

impl AssetSource for MemAssets {
    fn open(&self, name: &str) -> Result<Box<dyn std::io::BufRead>, RenderError> {
        if name == self.name {
            Ok(Box::new(Cursor::new(self.text.as_bytes().to_vec())))
        } else {
            Err(RenderError::ResourceUnavailable {
                name: name.to_string(),
                reason: "not found".to_string(),
            })
        }
    }
}

#[test]
fn missing_asset_is_resource_unavailable() {
    let source = MemAssets {
        name: "cube.obj",
        text: CUBE_OBJ,
    };
    let err = import_model(&source, "teapot.obj").unwrap_err();
    assert!(matches!(err, RenderError::ResourceUnavailable { .. }));
    assert!(!err.is_fatal());
}

#[test]
fn import_through_asset_source() {
    let source = MemAssets {
        name: "cube.obj",
        text: CUBE_OBJ,
    };
    let mesh = import_model(&source, "cube.obj").expect("cube via source");
    assert_eq!(mesh.vertex_count(), 36);
}
