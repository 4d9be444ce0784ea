//! DS9 region file reader.
//!
//! Supports the subset of the DS9 format that describes pixel-space masks:
//! `circle`, `box`, `ellipse` and `polygon` in `image` or `physical`
//! coordinates. DS9 pixel coordinates are 1-based and are converted to the
//! 0-based convention used by [`RegionShape`].

use std::path::Path;

use tracing::debug;

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::regions::reader::{RegionFormat, RegionReader};
use crate::fringe_pipeline::regions::types::{Region, RegionShape};

pub struct Ds9RegionReader;

/// Coordinate systems that need a WCS solution to map onto pixels.
const SKY_SYSTEMS: &[&str] = &[
    "fk4", "fk5", "icrs", "galactic", "ecliptic", "j2000", "b1950", "wcs", "linear",
    "amplifier", "detector",
];

const PIXEL_SYSTEMS: &[&str] = &["image", "physical"];

impl RegionReader for Ds9RegionReader {
    fn read_regions(&self, path: &Path, format: RegionFormat) -> Result<Vec<Region>> {
        match format {
            RegionFormat::Ds9 => {}
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            FringeError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        let regions = self.parse_str(&text)?;
        debug!("Read {} regions from {}", regions.len(), path.display());
        Ok(regions)
    }
}

impl Ds9RegionReader {
    /// Parses DS9 region text, keeping regions in file order.
    pub fn parse_str(&self, text: &str) -> Result<Vec<Region>> {
        let mut regions = Vec::new();

        for (line_index, raw_line) in text.lines().enumerate() {
            let line_no = line_index + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (statements, properties) = match line.split_once('#') {
                Some((statements, properties)) => (statements, Some(properties)),
                None => (line, None),
            };
            let label = properties.and_then(parse_text_property);

            for statement in statements.split(';') {
                let statement = statement.trim();
                if statement.is_empty() {
                    continue;
                }
                let keyword = statement.to_ascii_lowercase();
                if keyword.starts_with("global") || PIXEL_SYSTEMS.contains(&keyword.as_str()) {
                    continue;
                }
                if SKY_SYSTEMS.iter().any(|system| keyword.starts_with(system)) {
                    return Err(FringeError::UnsupportedRegion(format!(
                        "coordinate system '{statement}' at line {line_no}, only pixel coordinates are supported"
                    )));
                }

                let shape = parse_shape(statement, line_no)?;
                regions.push(Region {
                    shape,
                    label: label.clone(),
                });
            }
        }

        Ok(regions)
    }
}

fn parse_shape(statement: &str, line: usize) -> Result<RegionShape> {
    let statement = statement.strip_prefix('+').unwrap_or(statement).trim();
    if statement.starts_with('-') {
        return Err(FringeError::UnsupportedRegion(format!(
            "excluded region '{statement}' at line {line}"
        )));
    }

    let (name, args) = match statement.find('(') {
        Some(open) => {
            let close = statement.rfind(')').ok_or_else(|| FringeError::RegionParse {
                line,
                message: format!("missing ')' in '{statement}'"),
            })?;
            if close < open {
                return Err(FringeError::RegionParse {
                    line,
                    message: format!("malformed '{statement}'"),
                });
            }
            (&statement[..open], &statement[open + 1..close])
        }
        None => statement
            .split_once(char::is_whitespace)
            .unwrap_or((statement, "")),
    };
    let name = name.trim().to_ascii_lowercase();

    let values = args
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|_| FringeError::RegionParse {
                line,
                message: format!("invalid number '{token}' in {name}"),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let arity_error = |expected: &str| FringeError::RegionParse {
        line,
        message: format!("{name} expects {expected} values, got {}", values.len()),
    };

    match name.as_str() {
        "circle" => match values[..] {
            [x, y, radius] => Ok(RegionShape::Circle {
                x: x - 1.0,
                y: y - 1.0,
                radius,
            }),
            _ => Err(arity_error("3")),
        },
        "box" => match values[..] {
            [x, y, width, height] | [x, y, width, height, _] => Ok(RegionShape::Box {
                x: x - 1.0,
                y: y - 1.0,
                width,
                height,
                angle: values.get(4).copied().unwrap_or(0.0),
            }),
            _ => Err(arity_error("4 or 5")),
        },
        "ellipse" => match values[..] {
            [x, y, rx, ry] | [x, y, rx, ry, _] => Ok(RegionShape::Ellipse {
                x: x - 1.0,
                y: y - 1.0,
                rx,
                ry,
                angle: values.get(4).copied().unwrap_or(0.0),
            }),
            _ => Err(arity_error("4 or 5")),
        },
        "polygon" => {
            if values.len() < 6 || values.len() % 2 != 0 {
                return Err(arity_error("an even number (at least 6) of"));
            }
            let vertices = values
                .chunks_exact(2)
                .map(|xy| (xy[0] - 1.0, xy[1] - 1.0))
                .collect();
            Ok(RegionShape::Polygon { vertices })
        }
        other => Err(FringeError::UnsupportedRegion(format!(
            "shape '{other}' at line {line}"
        ))),
    }
}

/// Extracts the `text={...}` (or `text="..."`) property.
fn parse_text_property(properties: &str) -> Option<String> {
    let start = properties.find("text=")? + "text=".len();
    let rest = &properties[start..];
    let close = match rest.chars().next()? {
        '{' => '}',
        '"' => '"',
        '\'' => '\'',
        _ => return None,
    };
    let body = &rest[1..];
    let end = body.find(close)?;
    Some(body[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Region file format: DS9 version 4.1
global color=green dashlist=8 3 width=1 font=\"helvetica 10 normal roman\" select=1
image
box(3.5,3.5,2,2,0) # text={bright 1}
box(7.5,3.5,2,2,0) # color=red text={dark 1}
circle(5,8,1.5)
";

    #[test]
    fn test_parse_sample_file() {
        let regions = Ds9RegionReader.parse_str(SAMPLE).unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(
            regions[0].shape,
            RegionShape::Box { x: 2.5, y: 2.5, width: 2.0, height: 2.0, angle: 0.0 }
        );
        assert_eq!(regions[0].label.as_deref(), Some("bright 1"));
        assert_eq!(regions[1].label.as_deref(), Some("dark 1"));
        assert_eq!(regions[2].shape, RegionShape::Circle { x: 4.0, y: 7.0, radius: 1.5 });
        assert_eq!(regions[2].label, None);
    }

    #[test]
    fn test_semicolon_statements_and_polygon() {
        let regions = Ds9RegionReader
            .parse_str("physical;polygon(1,1,5,1,1,5);ellipse(10,10,4,2,30)")
            .unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(
            regions[0].shape,
            RegionShape::Polygon { vertices: vec![(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)] }
        );
        assert_eq!(
            regions[1].shape,
            RegionShape::Ellipse { x: 9.0, y: 9.0, rx: 4.0, ry: 2.0, angle: 30.0 }
        );
    }

    #[test]
    fn test_box_without_angle_and_plus_prefix() {
        let regions = Ds9RegionReader.parse_str("+box(2,2,3,1)").unwrap();
        assert_eq!(
            regions[0].shape,
            RegionShape::Box { x: 1.0, y: 1.0, width: 3.0, height: 1.0, angle: 0.0 }
        );
    }

    #[test]
    fn test_sky_coordinates_rejected() {
        let err = Ds9RegionReader
            .parse_str("fk5\ncircle(10:00:00,+20:00:00,5\")")
            .unwrap_err();
        assert!(matches!(err, FringeError::UnsupportedRegion(_)));
    }

    #[test]
    fn test_excluded_region_rejected() {
        let err = Ds9RegionReader.parse_str("image\n-circle(5,5,2)").unwrap_err();
        assert!(matches!(err, FringeError::UnsupportedRegion(_)));
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let err = Ds9RegionReader.parse_str("image\npoint(5,5)").unwrap_err();
        assert!(matches!(err, FringeError::UnsupportedRegion(_)));
    }

    #[test]
    fn test_bad_arity_reports_line() {
        let err = Ds9RegionReader.parse_str("image\n\ncircle(5,5)").unwrap_err();
        assert!(matches!(err, FringeError::RegionParse { line: 3, .. }));
    }

    #[test]
    fn test_invalid_number() {
        let err = Ds9RegionReader.parse_str("circle(5,x,2)").unwrap_err();
        assert!(matches!(err, FringeError::RegionParse { line: 1, .. }));
    }

    #[test]
    fn test_read_regions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fringe.reg");
        std::fs::write(&path, SAMPLE).unwrap();
        let regions = Ds9RegionReader.read_regions(&path, RegionFormat::Ds9).unwrap();
        assert_eq!(regions.len(), 3);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("DS9".parse::<RegionFormat>().unwrap(), RegionFormat::Ds9);
        assert!("crtf".parse::<RegionFormat>().is_err());
    }
}
