/// Wavefront OBJ loader for the subset the renderer consumes
///
/// Handled records: `v x y z`, `vn x y z`, `vt u v` (v flipped on load so
/// texture space matches image rows), `f a/b/c d/e/f g/h/i` with 1-based
/// indices. Every other record (`#`, `o`, `s`, `mtllib`, `usemtl`, ...) is
/// skipped.
use nom::{
    character::complete::{char, multispace0, multispace1, u64 as index},
    combinator::all_consuming,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    Finish, IResult,
};

use crate::error::Error;
use crate::mesh::{Corner, Face, RawMesh};

use nalgebra::{Point2, Point3, Vector3};

/// Parse an OBJ document into the indexed [`RawMesh`] form.
///
/// Face indices are converted to 0-based and validated against the completed
/// attribute tables before returning, so a [`RawMesh`] produced here always
/// flattens without [`Error::MalformedMesh`].
pub fn parse_obj(input: &str) -> Result<RawMesh, Error> {
    let mut mesh = RawMesh::default();

    for (number, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        let lineno = number + 1;

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest),
            None => (line, ""),
        };

        match keyword {
            "v" => {
                let (x, y, z) = run(float3, rest, lineno)?;
                mesh.positions.push(Point3::new(x, y, z));
            }
            "vn" => {
                let (x, y, z) = run(float3, rest, lineno)?;
                mesh.normals.push(Vector3::new(x, y, z));
            }
            "vt" => {
                let (u, v) = run(float2, rest, lineno)?;
                // Image rows grow downward while OBJ v grows upward.
                mesh.texcoords.push(Point2::new(u, 1.0 - v));
            }
            "f" => {
                let triples = run(face_triples, rest, lineno)?;
                let mut corners = [Corner::new(0, 0, 0); 3];
                for (c, (vi, ti, ni)) in triples.iter().enumerate() {
                    corners[c] = Corner::new(
                        to_zero_based(*vi, lineno)?,
                        to_zero_based(*ti, lineno)?,
                        to_zero_based(*ni, lineno)?,
                    );
                }
                mesh.faces.push(Face { corners });
            }
            _ => {}
        }
    }

    log::debug!(
        "parsed OBJ: {} positions, {} normals, {} texcoords, {} faces",
        mesh.positions.len(),
        mesh.normals.len(),
        mesh.texcoords.len(),
        mesh.faces.len()
    );

    validate_indices(&mesh)?;
    Ok(mesh)
}

fn run<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    rest: &'a str,
    lineno: usize,
) -> Result<O, Error> {
    all_consuming(terminated(parser, multispace0))(rest)
        .finish()
        .map(|(_, value)| value)
        .map_err(|e: nom::error::Error<&str>| Error::ObjSyntax {
            line: lineno,
            message: format!("unexpected input at \"{}\"", truncated(e.input)),
        })
}

fn to_zero_based(index: u64, lineno: usize) -> Result<usize, Error> {
    if index == 0 {
        return Err(Error::ObjSyntax {
            line: lineno,
            message: "face indices are 1-based, found 0".to_string(),
        });
    }
    Ok((index - 1) as usize)
}

fn validate_indices(mesh: &RawMesh) -> Result<(), Error> {
    for (face, f) in mesh.faces.iter().enumerate() {
        for (corner, c) in f.corners.iter().enumerate() {
            mesh.check_corner(face, corner, c)?;
        }
    }
    Ok(())
}

fn truncated(input: &str) -> &str {
    let end = input
        .char_indices()
        .nth(24)
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    &input[..end]
}

fn float3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, (x, y, z)))
}

fn float2(input: &str) -> IResult<&str, (f32, f32)> {
    let (input, u) = preceded(multispace0, float)(input)?;
    let (input, v) = preceded(multispace1, float)(input)?;
    Ok((input, (u, v)))
}

/// `vertex/texcoord/normal` — empty slots are not supported, every corner
/// must carry all three indices.
fn index_triple(input: &str) -> IResult<&str, (u64, u64, u64)> {
    tuple((
        index,
        preceded(char('/'), index),
        preceded(char('/'), index),
    ))(input)
}

fn face_triples(input: &str) -> IResult<&str, [(u64, u64, u64); 3]> {
    let (input, a) = preceded(multispace0, index_triple)(input)?;
    let (input, b) = preceded(multispace1, index_triple)(input)?;
    let (input, c) = preceded(multispace1, index_triple)(input)?;
    Ok((input, [a, b, c]))
}
