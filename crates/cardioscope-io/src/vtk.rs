//! Legacy VTK (`.vtk`) polydata reader.
//!
//! Supports `ASCII` and `BINARY` (big-endian) files with a `DATASET POLYDATA`
//! section. Both cell layouts are understood: the classic one where every cell
//! is written as `n id0 id1 ...`, and the `OFFSETS`/`CONNECTIVITY` layout
//! written by VTK 9. Attribute blocks (`POINT_DATA`, `CELL_DATA`) may hold
//! `SCALARS`, `COLOR_SCALARS`, `VECTORS`, `NORMALS`, `TEXTURE_COORDINATES`,
//! `TENSORS` and `FIELD` arrays. Standalone `LOOKUP_TABLE` sections and
//! `METADATA` blocks are skipped.

use cardioscope_core::{CellArray, CellKind, DataArray, FieldData, MeshDataset, ScalarType, Vec3};

use crate::error::ParseError;

type ParseResult<T> = std::result::Result<T, ParseError>;

const MAGIC: &str = "# vtk datafile version";

/// Data encoding declared on the third header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Binary,
}

/// The three fixed lines at the top of a legacy file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyHeader {
    pub version: String,
    pub title: String,
    pub encoding: Encoding,
}

/// Parses a legacy VTK file.
///
/// Returns `Ok(None)` when the file is well formed but holds no geometry:
/// no `DATASET` section, or a polydata section without points.
pub fn read_legacy(bytes: &[u8]) -> ParseResult<Option<MeshDataset>> {
    let mut reader = LegacyReader::new(bytes)?;
    log::debug!(
        "legacy vtk {} ({:?}): {}",
        reader.header.version,
        reader.header.encoding,
        reader.header.title
    );
    reader.read_body()
}

/// Reads only the header lines.
pub fn read_header(bytes: &[u8]) -> ParseResult<LegacyHeader> {
    LegacyReader::new(bytes).map(|r| r.header)
}

/// Byte cursor that hands out whitespace-separated tokens and whole lines.
#[derive(Clone, Copy)]
struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::syntax(self.line, message)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'\n' {
                self.line += 1;
            } else if !b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn as_text(&self, bytes: &'a [u8]) -> ParseResult<&'a str> {
        std::str::from_utf8(bytes).map_err(|_| self.error("invalid text in header"))
    }

    fn next_token(&mut self) -> ParseResult<Option<&'a str>> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .data
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let data: &'a [u8] = self.data;
        self.as_text(&data[start..self.pos]).map(Some)
    }

    /// Reads up to the end of the current line and moves past the newline.
    fn read_line(&mut self) -> ParseResult<Option<&'a str>> {
        if self.at_end() {
            return Ok(None);
        }
        let start = self.pos;
        while self.data.get(self.pos).is_some_and(|&b| b != b'\n') {
            self.pos += 1;
        }
        let end = self.pos;
        if self.pos < self.data.len() {
            self.pos += 1;
            self.line += 1;
        }
        let data: &'a [u8] = self.data;
        let text = self.as_text(&data[start..end])?;
        Ok(Some(text.trim_end_matches('\r')))
    }

    /// Skips blank space and returns the next non-empty line split into words.
    fn next_header(&mut self) -> ParseResult<Option<(usize, Vec<&'a str>)>> {
        self.skip_whitespace();
        let line = self.line;
        Ok(self
            .read_line()?
            .map(|text| (line, text.split_whitespace().collect())))
    }

    /// True when the next token (without consuming it) equals `keyword`.
    fn peek_keyword(&self, keyword: &str) -> bool {
        let mut ahead = *self;
        ahead.skip_whitespace();
        let rest = &ahead.data[ahead.pos..];
        rest.len() >= keyword.len()
            && rest[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
            && rest
                .get(keyword.len())
                .map_or(true, u8::is_ascii_whitespace)
    }

    fn take(&mut self, n: usize) -> ParseResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.error("unexpected end of binary data"))?;
        let data: &'a [u8] = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Point,
    Cell,
}

struct LegacyReader<'a> {
    tokens: Tokens<'a>,
    header: LegacyHeader,
}

impl<'a> LegacyReader<'a> {
    fn new(bytes: &'a [u8]) -> ParseResult<Self> {
        let mut tokens = Tokens::new(bytes);

        let magic = tokens
            .read_line()?
            .ok_or_else(|| tokens.error("empty file"))?;
        let lowered = magic.to_ascii_lowercase();
        let Some(version) = lowered.strip_prefix(MAGIC) else {
            return Err(ParseError::syntax(1, "not a legacy VTK file"));
        };
        let version = version.trim().to_string();

        let title = tokens
            .read_line()?
            .ok_or_else(|| tokens.error("missing title line"))?
            .trim()
            .to_string();

        let encoding_line = tokens
            .read_line()?
            .ok_or_else(|| tokens.error("missing ASCII/BINARY line"))?;
        let encoding = match encoding_line.trim().to_ascii_uppercase().as_str() {
            "ASCII" => Encoding::Ascii,
            "BINARY" => Encoding::Binary,
            other => {
                return Err(ParseError::syntax(
                    3,
                    format!("expected ASCII or BINARY, found '{other}'"),
                ))
            }
        };

        Ok(Self {
            tokens,
            header: LegacyHeader {
                version,
                title,
                encoding,
            },
        })
    }

    fn read_body(&mut self) -> ParseResult<Option<MeshDataset>> {
        let mut seen_dataset = false;
        let mut points: Vec<Vec3> = Vec::new();
        let mut cells: Vec<(CellKind, CellArray)> = Vec::new();
        let mut point_data = FieldData::new();
        let mut cell_data = FieldData::new();
        let mut block: Option<(Block, usize)> = None;

        while let Some((line, words)) = self.tokens.next_header()? {
            let Some(&keyword) = words.first() else {
                continue;
            };
            match keyword.to_ascii_uppercase().as_str() {
                "DATASET" => {
                    let kind = word(&words, 1, line, "dataset type")?;
                    if !kind.eq_ignore_ascii_case("POLYDATA") {
                        return Err(ParseError::Unsupported(format!(
                            "dataset type {kind} (only POLYDATA is read)"
                        )));
                    }
                    seen_dataset = true;
                }
                "POINTS" => {
                    let n = number(&words, 1, line, "point count")?;
                    let ty = scalar_type(&words, 2, line)?;
                    let values = self.read_values(product(n, 3, line, "point count")?, ty)?;
                    points = values
                        .chunks_exact(3)
                        .map(|c| Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32))
                        .collect();
                }
                "VERTICES" | "LINES" | "POLYGONS" | "TRIANGLE_STRIPS" => {
                    let kind = match keyword.to_ascii_uppercase().as_str() {
                        "VERTICES" => CellKind::Vertex,
                        "LINES" => CellKind::Line,
                        "POLYGONS" => CellKind::Polygon,
                        _ => CellKind::TriangleStrip,
                    };
                    let first = number(&words, 1, line, "cell count")?;
                    let second = number(&words, 2, line, "cell list size")?;
                    let array = if self.tokens.peek_keyword("OFFSETS") {
                        self.read_offset_cells(first, second)?
                    } else {
                        self.read_classic_cells(first, second)?
                    };
                    cells.push((kind, array));
                }
                "POINT_DATA" => {
                    block = Some((Block::Point, number(&words, 1, line, "point count")?));
                }
                "CELL_DATA" => {
                    block = Some((Block::Cell, number(&words, 1, line, "cell count")?));
                }
                "FIELD" => {
                    let count = number(&words, 2, line, "field array count")?;
                    let arrays = self.read_field(count)?;
                    match block {
                        Some((Block::Point, _)) => arrays.into_iter().for_each(|a| {
                            point_data.add_array(a);
                        }),
                        Some((Block::Cell, _)) => arrays.into_iter().for_each(|a| {
                            cell_data.add_array(a);
                        }),
                        None => log::debug!("ignoring {} dataset-level field arrays", arrays.len()),
                    }
                }
                "LOOKUP_TABLE" => {
                    let size = number(&words, 2, line, "lookup table size")?;
                    let ty = match self.header.encoding {
                        Encoding::Ascii => ScalarType::Float,
                        Encoding::Binary => ScalarType::UnsignedChar,
                    };
                    self.read_values(product(size, 4, line, "lookup table size")?, ty)?;
                    log::debug!("skipped lookup table with {size} entries");
                }
                "METADATA" => self.skip_metadata()?,
                "SCALARS" | "COLOR_SCALARS" | "VECTORS" | "NORMALS" | "TEXTURE_COORDINATES"
                | "TENSORS" | "TENSORS6" => {
                    let Some((target, count)) = block else {
                        return Err(ParseError::syntax(
                            line,
                            format!("{keyword} before POINT_DATA or CELL_DATA"),
                        ));
                    };
                    let array = self.read_attribute(&words, line, count)?;
                    let data = match target {
                        Block::Point => &mut point_data,
                        Block::Cell => &mut cell_data,
                    };
                    let is_scalars = keyword.eq_ignore_ascii_case("SCALARS");
                    let name = array.name().to_string();
                    data.add_array(array);
                    if is_scalars && data.active_scalars().is_none() {
                        data.set_active_scalars(&name);
                    }
                }
                other => {
                    return Err(ParseError::syntax(line, format!("unknown keyword '{other}'")));
                }
            }
        }

        if !seen_dataset || points.is_empty() {
            return Ok(None);
        }

        let mut mesh = MeshDataset::new(points);
        for (kind, array) in cells {
            *mesh.cells_mut(kind) = array;
        }
        *mesh.point_data_mut() = point_data;
        *mesh.cell_data_mut() = cell_data;
        mesh.validate()
            .map_err(|e| ParseError::syntax(self.tokens.line, e.to_string()))?;
        Ok(Some(mesh))
    }

    /// Reads `count` numbers of type `ty` in the file's encoding.
    fn read_values(&mut self, count: usize, ty: ScalarType) -> ParseResult<Vec<f64>> {
        match self.header.encoding {
            Encoding::Ascii => {
                // every ASCII value takes at least a digit and a separator
                let mut values = Vec::with_capacity(count.min(self.tokens.remaining() / 2 + 1));
                for _ in 0..count {
                    let token = self
                        .tokens
                        .next_token()?
                        .ok_or_else(|| self.tokens.error("unexpected end of data"))?;
                    let value = token
                        .parse::<f64>()
                        .map_err(|_| self.tokens.error(format!("invalid number '{token}'")))?;
                    values.push(value);
                }
                Ok(values)
            }
            Encoding::Binary => {
                let size = ty.byte_size().ok_or_else(|| {
                    ParseError::Unsupported(format!("binary {} arrays", ty.vtk_name()))
                })?;
                let len = count
                    .checked_mul(size)
                    .ok_or_else(|| self.tokens.error("array too large"))?;
                let bytes = self.tokens.take(len)?;
                Ok(decode_big_endian(bytes, ty, size))
            }
        }
    }

    fn read_classic_cells(&mut self, n_cells: usize, size: usize) -> ParseResult<CellArray> {
        let values = self.read_values(size, ScalarType::Int)?;
        let mut array = CellArray::new();
        let mut cursor = 0;
        let mut ids = Vec::new();
        for _ in 0..n_cells {
            let n = values
                .get(cursor)
                .copied()
                .ok_or_else(|| self.tokens.error("cell list shorter than declared"))?;
            let n = to_index(n).ok_or_else(|| self.tokens.error("invalid cell size"))? as usize;
            let slice = values
                .get(cursor + 1..cursor + 1 + n)
                .ok_or_else(|| self.tokens.error("cell list shorter than declared"))?;
            ids.clear();
            for &v in slice {
                ids.push(to_index(v).ok_or_else(|| self.tokens.error("invalid point id"))?);
            }
            array.push(&ids);
            cursor += 1 + n;
        }
        if cursor != values.len() {
            return Err(self.tokens.error(format!(
                "cell list size {size} does not match {n_cells} cells"
            )));
        }
        Ok(array)
    }

    fn read_offset_cells(&mut self, n_offsets: usize, n_conn: usize) -> ParseResult<CellArray> {
        let (line, words) = self.expect_header("OFFSETS")?;
        let ty = scalar_type(&words, 1, line)?;
        let offsets = self
            .read_values(n_offsets, ty)?
            .into_iter()
            .map(|v| to_index(v).map(|i| i as usize))
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| self.tokens.error("invalid offset"))?;

        let (line, words) = self.expect_header("CONNECTIVITY")?;
        let ty = scalar_type(&words, 1, line)?;
        let connectivity = self
            .read_values(n_conn, ty)?
            .into_iter()
            .map(to_index)
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(|| self.tokens.error("invalid point id"))?;

        if offsets.is_empty() && connectivity.is_empty() {
            return Ok(CellArray::new());
        }
        CellArray::from_offsets(offsets, connectivity)
            .ok_or_else(|| self.tokens.error("offsets do not partition the connectivity list"))
    }

    fn read_field(&mut self, count: usize) -> ParseResult<Vec<DataArray>> {
        let mut arrays = Vec::with_capacity(count.min(self.tokens.remaining()));
        for _ in 0..count {
            let (line, words) = self
                .tokens
                .next_header()?
                .ok_or_else(|| self.tokens.error("missing field array"))?;
            let name = decode_name(word(&words, 0, line, "array name")?);
            if name == "NULL_ARRAY" {
                continue;
            }
            let components = number(&words, 1, line, "component count")?;
            let tuples = number(&words, 2, line, "tuple count")?;
            let ty = scalar_type(&words, 3, line)?;
            let values = self.read_values(product(components, tuples, line, "field array size")?, ty)?;
            arrays.push(DataArray::new(name, components, values, ty));
            if self.tokens.peek_keyword("METADATA") {
                self.tokens.next_header()?;
                self.skip_metadata()?;
            }
        }
        Ok(arrays)
    }

    fn read_attribute(&mut self, words: &[&str], line: usize, n: usize) -> ParseResult<DataArray> {
        let keyword = words[0].to_ascii_uppercase();
        let name = decode_name(word(words, 1, line, "array name")?);
        let len = |components: usize| product(n, components, line, "attribute size");

        let array = match keyword.as_str() {
            "SCALARS" => {
                let ty = scalar_type(words, 2, line)?;
                let components = match words.get(3) {
                    Some(_) => number(words, 3, line, "component count")?,
                    None => 1,
                };
                if self.tokens.peek_keyword("LOOKUP_TABLE") {
                    self.tokens.next_header()?;
                }
                let values = self.read_values(len(components)?, ty)?;
                DataArray::new(name, components, values, ty)
            }
            "COLOR_SCALARS" => {
                let components = number(words, 2, line, "component count")?;
                let values = match self.header.encoding {
                    Encoding::Ascii => self.read_values(len(components)?, ScalarType::Float)?,
                    Encoding::Binary => self
                        .read_values(len(components)?, ScalarType::UnsignedChar)?
                        .into_iter()
                        .map(|v| v / 255.0)
                        .collect(),
                };
                DataArray::new(name, components, values, ScalarType::Float)
            }
            "TEXTURE_COORDINATES" => {
                let components = number(words, 2, line, "dimension")?;
                let ty = scalar_type(words, 3, line)?;
                let values = self.read_values(len(components)?, ty)?;
                DataArray::new(name, components, values, ty)
            }
            _ => {
                let components = match keyword.as_str() {
                    "TENSORS" => 9,
                    "TENSORS6" => 6,
                    _ => 3,
                };
                let ty = scalar_type(words, 2, line)?;
                let values = self.read_values(len(components)?, ty)?;
                DataArray::new(name, components, values, ty)
            }
        };

        if self.tokens.peek_keyword("METADATA") {
            self.tokens.next_header()?;
            self.skip_metadata()?;
        }
        Ok(array)
    }

    fn expect_header(&mut self, keyword: &str) -> ParseResult<(usize, Vec<&'a str>)> {
        let (line, words) = self
            .tokens
            .next_header()?
            .ok_or_else(|| self.tokens.error(format!("expected {keyword}")))?;
        if !words.first().is_some_and(|w| w.eq_ignore_ascii_case(keyword)) {
            return Err(ParseError::syntax(line, format!("expected {keyword}")));
        }
        Ok((line, words))
    }

    /// Skips the lines of a `METADATA` block, which ends at a blank line.
    fn skip_metadata(&mut self) -> ParseResult<()> {
        while let Some(text) = self.tokens.read_line()? {
            if text.trim().is_empty() {
                break;
            }
        }
        Ok(())
    }
}

fn word<'w>(words: &[&'w str], index: usize, line: usize, what: &str) -> ParseResult<&'w str> {
    words
        .get(index)
        .copied()
        .ok_or_else(|| ParseError::syntax(line, format!("missing {what}")))
}

fn number(words: &[&str], index: usize, line: usize, what: &str) -> ParseResult<usize> {
    let text = word(words, index, line, what)?;
    text.parse()
        .map_err(|_| ParseError::syntax(line, format!("invalid {what} '{text}'")))
}

/// Multiplies two counts read from the file, rejecting products that overflow.
fn product(a: usize, b: usize, line: usize, what: &str) -> ParseResult<usize> {
    a.checked_mul(b)
        .ok_or_else(|| ParseError::syntax(line, format!("{what} too large ({a} x {b})")))
}

fn scalar_type(words: &[&str], index: usize, line: usize) -> ParseResult<ScalarType> {
    let name = word(words, index, line, "data type")?;
    ScalarType::from_vtk_name(name)
        .ok_or_else(|| ParseError::syntax(line, format!("unknown data type '{name}'")))
}

fn to_index(value: f64) -> Option<u32> {
    (value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX)).then(|| value as u32)
}

/// Undoes the `%XX` escaping the legacy writer applies to array names.
fn decode_name(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(b) = raw
                .get(i + 1..i + 3)
                .filter(|hex| hex.bytes().all(|c| c.is_ascii_hexdigit()))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn be<const N: usize>(chunk: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(chunk);
    buf
}

fn decode_big_endian(bytes: &[u8], ty: ScalarType, size: usize) -> Vec<f64> {
    bytes
        .chunks_exact(size)
        .map(|c| match ty {
            ScalarType::UnsignedChar | ScalarType::Bit => f64::from(c[0]),
            ScalarType::Char => f64::from(c[0] as i8),
            ScalarType::UnsignedShort => f64::from(u16::from_be_bytes(be(c))),
            ScalarType::Short => f64::from(i16::from_be_bytes(be(c))),
            ScalarType::UnsignedInt | ScalarType::UnsignedLong => {
                f64::from(u32::from_be_bytes(be(c)))
            }
            ScalarType::Int | ScalarType::Long => f64::from(i32::from_be_bytes(be(c))),
            ScalarType::Float => f64::from(f32::from_be_bytes(be(c))),
            ScalarType::Double => f64::from_be_bytes(be(c)),
            ScalarType::Int64 => i64::from_be_bytes(be(c)) as f64,
            ScalarType::UInt64 => u64::from_be_bytes(be(c)) as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TETRA: &str = "# vtk DataFile Version 3.0
tetra
ASCII
DATASET POLYDATA
POINTS 4 float
0 0 0  1 0 0  0 1 0
0 0 1
POLYGONS 4 16
3 0 1 2
3 0 1 3
3 0 2 3
3 1 2 3
CELL_DATA 4
SCALARS region int 1
LOOKUP_TABLE default
10 57 200 120
FIELD extra 1
thickness 1 4 float
0.5 0.5 1.5 2.5
POINT_DATA 4
NORMALS n float
0 0 -1 0 0 -1 0 0 -1 0 0 1
";

    fn binary_triangle(scalars: &[f32]) -> Vec<u8> {
        let mut out = b"# vtk DataFile Version 3.0\nbin\nBINARY\nDATASET POLYDATA\nPOINTS 3 float\n"
            .to_vec();
        for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(b"\nPOLYGONS 1 4\n");
        for v in [3i32, 0, 1, 2] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(format!("\nCELL_DATA 1\nSCALARS s float {}\nLOOKUP_TABLE default\n", scalars.len()).as_bytes());
        for v in scalars {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.push(b'\n');
        out
    }

    #[test]
    fn test_read_ascii_polydata() {
        let mesh = read_legacy(TETRA.as_bytes()).unwrap().unwrap();
        assert_eq!(mesh.num_points(), 4);
        assert_eq!(mesh.num_cells(), 4);
        assert_eq!(mesh.points()[3], Vec3::Z);
        assert_eq!(mesh.cells(CellKind::Polygon).cell(3), Some([1u32, 2, 3].as_slice()));

        let cell_data = mesh.cell_data();
        assert_eq!(cell_data.num_arrays(), 2);
        assert_eq!(cell_data.array_name(0), Some("region"));
        assert_eq!(cell_data.array_name(1), Some("thickness"));
        assert_eq!(cell_data.active_scalars().unwrap().name(), "region");
        assert_eq!(cell_data.array(0).unwrap().scalar_type(), ScalarType::Int);
        assert_eq!(cell_data.array(0).unwrap().values(), &[10.0, 57.0, 200.0, 120.0]);

        let normals = mesh.point_data().get("n").unwrap();
        assert_eq!(normals.components(), 3);
        assert_eq!(normals.num_tuples(), 4);
    }

    #[test]
    fn test_read_offsets_connectivity_layout() {
        let text = "# vtk DataFile Version 5.1
modern
ASCII
DATASET POLYDATA
POINTS 4 float
0 0 0 1 0 0 1 1 0 0 1 0
POLYGONS 3 6
OFFSETS vtktypeint64
0 3 6
CONNECTIVITY vtktypeint64
0 1 2 0 2 3
LINES 2 2
OFFSETS vtktypeint64
0 2
CONNECTIVITY vtktypeint64
0 2
";
        let mesh = read_legacy(text.as_bytes()).unwrap().unwrap();
        assert_eq!(mesh.cells(CellKind::Polygon).num_cells(), 2);
        assert_eq!(mesh.cells(CellKind::Line).cell(0), Some([0u32, 2].as_slice()));
        // Numbering puts lines before polygons.
        let kinds: Vec<CellKind> = mesh.iter_cells().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![CellKind::Line, CellKind::Polygon, CellKind::Polygon]);
    }

    #[test]
    fn test_read_binary_polydata() {
        let bytes = binary_triangle(&[7.5]);
        let mesh = read_legacy(&bytes).unwrap().unwrap();
        assert_eq!(mesh.num_points(), 3);
        assert_eq!(mesh.points()[1], Vec3::X);
        assert_eq!(mesh.cells(CellKind::Polygon).cell(0), Some([0u32, 1, 2].as_slice()));
        assert_eq!(mesh.cell_data().array(0).unwrap().values(), &[7.5]);
        assert_eq!(read_header(&bytes).unwrap().encoding, Encoding::Binary);
    }

    #[test]
    fn test_binary_multi_component_scalars() {
        let bytes = binary_triangle(&[3.0, 4.0]);
        let mesh = read_legacy(&bytes).unwrap().unwrap();
        let array = mesh.cell_data().array(0).unwrap();
        assert_eq!(array.components(), 2);
        assert_eq!(array.scalar(0), Some(5.0));
    }

    #[test]
    fn test_no_dataset_is_empty() {
        let text = "# vtk DataFile Version 3.0\nnothing\nASCII\n";
        assert!(read_legacy(text.as_bytes()).unwrap().is_none());

        let text = "# vtk DataFile Version 3.0\nno points\nASCII\nDATASET POLYDATA\nPOINTS 0 float\n";
        assert!(read_legacy(text.as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_other_dataset_kinds_unsupported() {
        let text = "# vtk DataFile Version 3.0\ngrid\nASCII\nDATASET STRUCTURED_POINTS\n";
        assert!(matches!(
            read_legacy(text.as_bytes()),
            Err(ParseError::Unsupported(_))
        ));
    }

    #[test]
    fn test_malformed_input_reports_line() {
        assert!(matches!(
            read_legacy(b"solid ascii\n"),
            Err(ParseError::Syntax { line: 1, .. })
        ));

        let text = "# vtk DataFile Version 3.0\nbad\nASCII\nDATASET POLYDATA\nPOINTS 1 float\n0 0 zero\n";
        match read_legacy(text.as_bytes()) {
            Err(ParseError::Syntax { line, message }) => {
                assert_eq!(line, 6);
                assert!(message.contains("zero"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_point_id_rejected() {
        let text = "# vtk DataFile Version 3.0\nbad ids\nASCII\nDATASET POLYDATA\nPOINTS 1 float\n0 0 0\nVERTICES 1 2\n1 5\n";
        assert!(read_legacy(text.as_bytes()).is_err());
    }

    #[test]
    fn test_truncated_binary_rejected() {
        let mut bytes = binary_triangle(&[1.0]);
        bytes.truncate(80);
        assert!(read_legacy(&bytes).is_err());
    }

    #[test]
    fn test_metadata_and_escaped_names() {
        let text = "# vtk DataFile Version 5.1
meta
ASCII
DATASET POLYDATA
POINTS 1 float
0 0 0
METADATA
INFORMATION 0

VERTICES 2 1
OFFSETS vtktypeint64
0 1
CONNECTIVITY vtktypeint64
0
CELL_DATA 1
FIELD FieldData 1
wall%20thickness 1 1 double
2.25
METADATA
INFORMATION 0

";
        let mesh = read_legacy(text.as_bytes()).unwrap().unwrap();
        assert_eq!(mesh.cell_data().array_name(0), Some("wall thickness"));
        assert_eq!(mesh.cell_data().array(0).unwrap().values(), &[2.25]);
    }

    #[test]
    fn test_decode_name() {
        assert_eq!(decode_name("a%20b"), "a b");
        assert_eq!(decode_name("100%"), "100%");
        assert_eq!(decode_name("plain"), "plain");
        assert_eq!(decode_name("%+F"), "%+F");
        assert_eq!(decode_name("%-1x"), "%-1x");
    }

    fn polydata(body: &str) -> String {
        format!("# vtk DataFile Version 3.0\nhuge\nASCII\nDATASET POLYDATA\n{body}")
    }

    #[test]
    fn test_overflowing_counts_rejected() {
        for body in [
            "POINTS 9223372036854775807 float\n0 0 0\n",
            "POINTS 1 float\n0 0 0\nLOOKUP_TABLE t 9223372036854775807\n",
            "POINTS 1 float\n0 0 0\nCELL_DATA 9223372036854775807\nTENSORS t float\n0\n",
            "POINTS 1 float\n0 0 0\nCELL_DATA 1\nFIELD f 1\na 4294967296 4294967296 float\n0\n",
        ] {
            assert!(
                matches!(read_legacy(polydata(body).as_bytes()), Err(ParseError::Syntax { .. })),
                "accepted: {body}"
            );
        }
    }

    #[test]
    fn test_huge_ascii_count_fails_without_allocating() {
        let text = polydata("POINTS 1000000000000000 float\n0 0 0\n");
        match read_legacy(text.as_bytes()) {
            Err(ParseError::Syntax { message, .. }) => {
                assert!(message.contains("unexpected end of data"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_ascii_rejected() {
        let text = polydata("POINTS 3 float\n0 0 0 1 0 0 0 1\n");
        assert!(read_legacy(text.as_bytes()).is_err());

        let text = polydata("POINTS 3 float\n0 0 0 1 0 0 0 1 0\nPOLYGONS 1 4\n3 0 1\n");
        assert!(read_legacy(text.as_bytes()).is_err());

        let text = polydata("POINTS 3 float\n0 0 0 1 0 0 0 1 0\nCELL_DATA 2\nSCALARS s float\n1\n");
        assert!(read_legacy(text.as_bytes()).is_err());
    }

    proptest! {
        #[test]
        fn arbitrary_body_never_panics(body in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut bytes = polydata("").into_bytes();
            bytes.extend_from_slice(&body);
            let _ = read_legacy(&bytes);
        }

        #[test]
        fn any_point_count_is_handled(n in any::<usize>(), k in 0usize..12) {
            let coords = vec!["1"; k].join(" ");
            let text = polydata(&format!("POINTS {n} float\n{coords}\n"));
            let result = read_legacy(text.as_bytes());
            if n.checked_mul(3) == Some(k) && n > 0 {
                prop_assert!(matches!(result, Ok(Some(_))));
            } else if n > 0 {
                prop_assert!(result.is_err());
            }
        }
    }
}
