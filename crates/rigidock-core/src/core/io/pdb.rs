use crate::core::io::traits::StructureFile;
use crate::core::models::atom::AtomProperty;
use crate::core::models::rigid_body::RigidBody;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Minimum length of an `ATOM` record: the z coordinate ends at column 54.
const MIN_ATOM_LINE_LEN: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for an ATOM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// First blank-delimited token starting at `start`, allowing at most
/// `max_leading` leading blanks. Returns an empty string when the field is blank.
fn leading_token(line: &str, start: usize, max_leading: usize) -> &str {
    let Some(rest) = line.get(start..) else {
        return "";
    };
    let skipped = rest.len() - rest.trim_start_matches(' ').len();
    if skipped > max_leading {
        return "";
    }
    rest[skipped..].split(' ').next().unwrap_or("")
}

fn char_at(line: &str, index: usize) -> char {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ')
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_int(line: &str, line_num: usize, start: usize, end: usize) -> Result<i32, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Column-fixed PDB reader and writer for `ATOM` records.
///
/// Every other record type is skipped on read. The text after the coordinate
/// columns is kept verbatim in [`AtomProperty::extra`] and interpreted as a
/// reduced-model trailer (category and charge).
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<RigidBody, Self::Error> {
        let mut body = RigidBody::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if !line.starts_with("ATOM  ") {
                continue;
            }
            if line.len() < MIN_ATOM_LINE_LEN {
                return Err(PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::LineTooShort,
                });
            }

            let x = parse_float(&line, line_num, 30, 38)?;
            let y = parse_float(&line, line_num, 38, 46)?;
            let z = parse_float(&line, line_num, 46, 54)?;

            let mut property = AtomProperty {
                atom_type: leading_token(&line, 12, 3).to_uppercase(),
                residue_type: leading_token(&line, 17, 2).to_uppercase(),
                alt_loc: char_at(&line, 16),
                chain_id: char_at(&line, 21),
                residue_id: parse_int(&line, line_num, 22, 26)?,
                atom_id: parse_int(&line, line_num, 6, 11)?,
                extra: line.get(MIN_ATOM_LINE_LEN..).unwrap_or("").to_string(),
                ..Default::default()
            };
            property.apply_reduced_trailer();

            body.add_atom(property, Point3::new(x, y, z));
        }

        Ok(body)
    }

    fn write_to(body: &RigidBody, writer: &mut impl Write) -> Result<(), Self::Error> {
        for (atom, position) in body.atoms().iter().zip(body.world_coords()) {
            writeln!(
                writer,
                "ATOM  {:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{}",
                atom.atom_id,
                atom.atom_type,
                atom.residue_type,
                atom.chain_id,
                atom.residue_id,
                position.x,
                position.y,
                position.z,
                atom.extra
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
HEADER    REDUCED RECEPTOR
ATOM      1 CA   LYS A  12      10.125  -3.500   7.000    1  1.000 0 0
ATOM      2 CSE  LYS A  12      11.000  -2.250   6.500   12  0.000 0 0
REMARK not an atom
HETATM    3 O    HOH W   1       0.000   0.000   0.000
ATOM      3 cb  Bala B  13       1.000   2.000   3.000
";

    fn read(text: &str) -> Result<RigidBody, PdbError> {
        PdbFile::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn read_from_keeps_only_atom_records() {
        let body = read(SAMPLE).unwrap();
        assert_eq!(body.len(), 3);
        assert_eq!(body.coords(0), Point3::new(10.125, -3.5, 7.0));
        assert_eq!(body.coords(2), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn read_from_parses_identifiers_and_names() {
        let body = read(SAMPLE).unwrap();
        let atom = body.atom(1);
        assert_eq!(atom.atom_type, "CSE");
        assert_eq!(atom.residue_type, "LYS");
        assert_eq!(atom.chain_id, 'A');
        assert_eq!(atom.residue_id, 12);
        assert_eq!(atom.atom_id, 2);

        let lower = body.atom(2);
        assert_eq!(lower.atom_type, "CB");
        assert_eq!(lower.alt_loc, 'B');
        assert_eq!(lower.residue_type, "ALA");
        assert_eq!(lower.chain_id, 'B');
    }

    #[test]
    fn read_from_interprets_reduced_trailer() {
        let body = read(SAMPLE).unwrap();
        assert_eq!(body.category(0), 0);
        assert_eq!(body.charge(0), 1.0);
        assert_eq!(body.category(1), 11);
        assert_eq!(body.charge(1), 0.0);
        assert_eq!(body.category(2), 0);
        assert_eq!(body.atom(0).extra, "    1  1.000 0 0");
    }

    #[test]
    fn read_from_rejects_short_atom_line() {
        let err = read("ATOM      1 CA   LYS A  12      10.125  -3.500\n").unwrap_err();
        assert!(matches!(
            err,
            PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::LineTooShort
            }
        ));
    }

    #[test]
    fn read_from_reports_bad_coordinate_columns() {
        let text = "ATOM      1 CA   LYS A  12      10.125  abcdef   7.000\n";
        let err = read(text).unwrap_err();
        match err {
            PdbError::Parse {
                line,
                kind: PdbParseErrorKind::InvalidFloat { columns, value },
            } => {
                assert_eq!(line, 1);
                assert_eq!(columns, "39-46");
                assert_eq!(value, "abcdef");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_from_reports_bad_serial() {
        let text = "ATOM    x 1 CA   LYS A  12      10.125  -3.500   7.000\n";
        assert!(matches!(
            read(text).unwrap_err(),
            PdbError::Parse {
                kind: PdbParseErrorKind::InvalidInt { .. },
                ..
            }
        ));
    }

    #[test]
    fn write_to_uses_fixed_columns_and_world_coordinates() {
        let mut body = read(SAMPLE).unwrap();
        body.translate(&Vector3::new(1.0, 1.0, 1.0));
        let mut out = Vec::new();
        PdbFile::write_to(&body, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let first = text.lines().next().unwrap();
        assert_eq!(
            first,
            "ATOM      1 CA   LYS A  12      11.125  -2.500   8.000    1  1.000 0 0"
        );
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn written_file_reads_back_with_same_properties() {
        let body = read(SAMPLE).unwrap();
        let file = NamedTempFile::new().unwrap();
        PdbFile::write_to_path(&body, file.path()).unwrap();
        let reread = RigidBody::from_pdb(file.path()).unwrap();
        assert_eq!(reread.len(), body.len());
        for i in 0..body.len() {
            assert_eq!(reread.coords(i), body.coords(i));
            assert_eq!(reread.category(i), body.category(i));
            assert_eq!(reread.charge(i), body.charge(i));
        }
        assert_eq!(reread.description(), file.path().display().to_string());
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let err = PdbFile::read_from_path("/nonexistent/receptor.pdb").unwrap_err();
        assert!(matches!(err, PdbError::Io(_)));
    }
}
