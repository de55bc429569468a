//! Minimal OBJ-style importer: `v`/`vn`/`vt` records plus triangular
//! `f v/t/n v/t/n v/t/n` faces, de-indexed into flat attribute streams.
//! Shared vertices are duplicated on purpose; import simplicity over memory.

use std::io::BufRead;

use render_api::{AssetSource, RenderError};

use crate::mesh::MeshData;

/// Open `name` through the host's asset source and parse it.
pub fn import_model(source: &dyn AssetSource, name: &str) -> Result<MeshData, RenderError> {
    let reader = source.open(name)?;
    parse_model(name, reader)
}

/// Parse the line-oriented model format into de-indexed attribute streams.
///
/// Two passes: the first buckets attribute and face records in order, the
/// second resolves each face's three `vertex/texel/normal` point specifiers
/// (1-based) against the buckets. Any malformed record or index fails the
/// whole asset; the output is never partially populated.
pub fn parse_model<R: BufRead>(name: &str, reader: R) -> Result<MeshData, RenderError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    // Face payloads kept raw until all attributes are known.
    let mut faces: Vec<(usize, String)> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| RenderError::ResourceUnavailable {
            name: name.to_string(),
            reason: format!("read failed at line {line_no}: {e}"),
        })?;
        if let Some(rest) = line.strip_prefix("f ") {
            faces.push((line_no, rest.to_string()));
        } else if let Some(rest) = line.strip_prefix("v ") {
            positions.push(parse_components::<3>(rest, line_no, "vertex")?);
        } else if let Some(rest) = line.strip_prefix("vn ") {
            normals.push(parse_components::<3>(rest, line_no, "normal")?);
        } else if let Some(rest) = line.strip_prefix("vt ") {
            texcoords.push(parse_components::<2>(rest, line_no, "texcoord")?);
        }
    }

    let mut mesh = MeshData::with_capacity(faces.len() * 3);
    for (line_no, face) in &faces {
        let points: Vec<&str> = face.split_whitespace().collect();
        if points.len() != 3 {
            return Err(parse_error(
                *line_no,
                format!("face has {} points, expected 3", points.len()),
            ));
        }
        for point in points {
            let spec: Vec<&str> = point.split('/').collect();
            if spec.len() != 3 {
                return Err(parse_error(
                    *line_no,
                    format!("point specifier `{point}` is not vertex/texel/normal"),
                ));
            }
            mesh.positions
                .push(*resolve(&positions, spec[0], "vertex", *line_no)?);
            mesh.texcoords
                .push(*resolve(&texcoords, spec[1], "texcoord", *line_no)?);
            mesh.normals
                .push(*resolve(&normals, spec[2], "normal", *line_no)?);
        }
    }

    debug_assert_eq!(mesh.positions.len(), 3 * faces.len());
    log::debug!(
        "imported `{name}`: {} triangles, {} vertices",
        faces.len(),
        mesh.vertex_count()
    );
    Ok(mesh)
}

fn parse_error(line: usize, reason: String) -> RenderError {
    RenderError::Parse { line, reason }
}

fn parse_components<const N: usize>(
    rest: &str,
    line: usize,
    what: &str,
) -> Result<[f32; N], RenderError> {
    let mut out = [0.0f32; N];
    let mut tokens = rest.split_whitespace();
    for slot in out.iter_mut() {
        let token = tokens.next().ok_or_else(|| {
            parse_error(line, format!("{what} record has fewer than {N} components"))
        })?;
        *slot = token
            .parse()
            .map_err(|_| parse_error(line, format!("non-numeric {what} component `{token}`")))?;
    }
    Ok(out)
}

/// Resolve a 1-based index string against an attribute bucket.
fn resolve<'a, T>(
    bucket: &'a [T],
    index: &str,
    what: &str,
    line: usize,
) -> Result<&'a T, RenderError> {
    let one_based: usize = index
        .parse()
        .map_err(|_| parse_error(line, format!("non-numeric {what} index `{index}`")))?;
    one_based
        .checked_sub(1)
        .and_then(|i| bucket.get(i))
        .ok_or_else(|| {
            parse_error(
                line,
                format!("{what} index {one_based} out of range 1..={}", bucket.len()),
            )
        })
}
