use crate::core::data::colour::Colour;
use crate::core::palette::table::ColourTable;
use serde::Deserialize;

/// On-disk colour pack schema. Entries are validated leniently after
/// parsing: a bad entry is skipped, it never fails the whole file.
#[derive(Debug, Deserialize)]
pub(crate) struct PackFile {
    pub pack_name: String,
    #[serde(default)]
    pub maps: Vec<MapEntry>,
}

/// One colormap entry: either a verbatim colour list or a gradient
/// specification to synthesise a table from.
#[derive(Debug, Deserialize)]
pub(crate) struct MapEntry {
    pub map_name: Option<String>,
    pub colors: Option<Vec<Vec<i64>>>,
    pub gradient_points: Option<Vec<GradientPoint>>,
    pub num_colors: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradientPoint {
    pub pos: f64,
    pub color: Vec<i64>,
}

#[derive(Debug, PartialEq)]
pub(crate) enum EntryRejection {
    MissingName,
    BadColour { map_name: String },
    EmptyGradient { map_name: String },
    TooFewColours { map_name: String },
    NoColourSource { map_name: String },
}

impl std::fmt::Display for EntryRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "entry has no map_name"),
            Self::BadColour { map_name } => {
                write!(f, "map `{}` has a colour outside [0, 255] rgb", map_name)
            }
            Self::EmptyGradient { map_name } => {
                write!(f, "map `{}` has no gradient points", map_name)
            }
            Self::TooFewColours { map_name } => {
                write!(f, "map `{}` must request at least 2 colours", map_name)
            }
            Self::NoColourSource { map_name } => {
                write!(f, "map `{}` has neither colors nor gradient_points", map_name)
            }
        }
    }
}

fn parse_colour(raw: &[i64]) -> Option<Colour> {
    if raw.len() != 3 || raw.iter().any(|&c| !(0..=255).contains(&c)) {
        return None;
    }

    Some(Colour {
        r: raw[0] as u8,
        g: raw[1] as u8,
        b: raw[2] as u8,
    })
}

/// Linear interpolation over sorted control points with endpoint clamping
/// outside the covered range.
fn interpolate_channel(points: &[(f64, f64)], t: f64) -> f64 {
    let first = points[0];
    let last = points[points.len() - 1];

    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }

    for window in points.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if t <= x1 {
            if x1 == x0 {
                return y1;
            }
            return y0 + (y1 - y0) * (t - x0) / (x1 - x0);
        }
    }

    last.1
}

fn synthesise_gradient(points: &[(f64, Colour)], num_colors: usize) -> ColourTable {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let channel =
        |pick: fn(Colour) -> u8| -> Vec<(f64, f64)> {
            sorted
                .iter()
                .map(|(pos, colour)| (*pos, f64::from(pick(*colour))))
                .collect()
        };
    let reds = channel(|c| c.r);
    let greens = channel(|c| c.g);
    let blues = channel(|c| c.b);

    let colours = (0..num_colors)
        .map(|i| {
            let t = if num_colors > 1 {
                i as f64 / (num_colors - 1) as f64
            } else {
                0.0
            };
            let level = |points: &[(f64, f64)]| -> u8 {
                interpolate_channel(points, t).round().clamp(0.0, 255.0) as u8
            };

            Colour {
                r: level(&reds),
                g: level(&greens),
                b: level(&blues),
            }
        })
        .collect();

    ColourTable::new(colours)
}

/// Turns one schema entry into a named table, or says why it was rejected.
pub(crate) fn validate_entry(entry: &MapEntry) -> Result<(String, ColourTable), EntryRejection> {
    let map_name = entry
        .map_name
        .clone()
        .filter(|name| !name.is_empty())
        .ok_or(EntryRejection::MissingName)?;

    if let Some(colors) = &entry.colors {
        let parsed: Option<Vec<Colour>> = colors.iter().map(|raw| parse_colour(raw)).collect();
        let colours = parsed.ok_or_else(|| EntryRejection::BadColour {
            map_name: map_name.clone(),
        })?;

        return Ok((map_name, ColourTable::new(colours)));
    }

    if let Some(points) = &entry.gradient_points {
        if points.is_empty() {
            return Err(EntryRejection::EmptyGradient { map_name });
        }

        let num_colors = entry.num_colors.unwrap_or(256);
        if num_colors < 2 {
            return Err(EntryRejection::TooFewColours { map_name });
        }

        let parsed: Option<Vec<(f64, Colour)>> = points
            .iter()
            .map(|p| parse_colour(&p.color).map(|c| (p.pos, c)))
            .collect();
        let control = parsed.ok_or_else(|| EntryRejection::BadColour {
            map_name: map_name.clone(),
        })?;

        return Ok((map_name, synthesise_gradient(&control, num_colors)));
    }

    Err(EntryRejection::NoColourSource { map_name })
}
