/// Text frame-sheets.
///
/// File format: a header line `columns rows frame_width frame_height`, then the
/// character grid, `rows × frame_height` lines of up to
/// `columns × frame_width` characters.  Short lines are padded with spaces;
/// a space is transparent when drawn.

use std::collections::HashMap;
use std::path::Path;

use crate::entities::AssetId;
use crate::error::GameError;
use crate::sprite::{FrameRect, SheetGeometry};

/// Largest sheet side, in cells, that a header may declare.
pub const MAX_SHEET_CELLS: u32 = u16::MAX as u32;
/// Largest total sheet area, in cells.
pub const MAX_SHEET_AREA: u64 = 1 << 20;

fn bundled_text(asset: AssetId) -> &'static str {
    match asset {
        AssetId::WhiteBird => include_str!("../assets/white_bird.txt"),
        AssetId::BlueBird => include_str!("../assets/blue_bird.txt"),
        AssetId::TurboBird => include_str!("../assets/turbo_bird.txt"),
        AssetId::Monster => include_str!("../assets/monster.txt"),
        AssetId::Shotgun => include_str!("../assets/shotgun.txt"),
        AssetId::Landscape => include_str!("../assets/landscape.txt"),
    }
}

/// Swap glyphs that point left/right so a flipped sprite still reads correctly.
pub fn mirror_glyph(c: char) -> char {
    match c {
        '/' => '\\',
        '\\' => '/',
        '(' => ')',
        ')' => '(',
        '<' => '>',
        '>' => '<',
        '{' => '}',
        '}' => '{',
        '[' => ']',
        ']' => '[',
        other => other,
    }
}

#[derive(Clone, Debug)]
pub struct GlyphSheet {
    geometry: SheetGeometry,
    cells: Vec<Vec<char>>,
}

impl GlyphSheet {
    pub fn parse(asset: &str, text: &str) -> Result<Self, GameError> {
        let mut lines = text.lines();
        let header = lines
            .next()
            .ok_or_else(|| GameError::resource(asset, "empty sheet"))?;
        let fields: Vec<u32> = header
            .split_whitespace()
            .map(|f| f.parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|e| GameError::resource(asset, format!("bad header `{header}`: {e}")))?;
        let [columns, rows, frame_width, frame_height] = fields[..] else {
            return Err(GameError::resource(
                asset,
                format!("header needs 4 numbers, got `{header}`"),
            ));
        };

        let span = |count: u32, size: u32, axis: &str| {
            count
                .checked_mul(size)
                .filter(|&cells| cells <= MAX_SHEET_CELLS)
                .ok_or_else(|| {
                    GameError::resource(
                        asset,
                        format!("sheet {axis} {count} x {size} exceeds {MAX_SHEET_CELLS} cells"),
                    )
                })
        };
        let width = span(columns, frame_width, "width")?;
        let height = span(rows, frame_height, "height")?;
        if u64::from(width) * u64::from(height) > MAX_SHEET_AREA {
            return Err(GameError::resource(
                asset,
                format!("{width}x{height} sheet exceeds {MAX_SHEET_AREA} cells"),
            ));
        }
        let mut cells: Vec<Vec<char>> = Vec::with_capacity(height as usize);
        for (i, line) in lines.enumerate() {
            if i as u32 >= height {
                if line.trim().is_empty() {
                    continue;
                }
                return Err(GameError::resource(
                    asset,
                    format!("more than {height} grid lines"),
                ));
            }
            let mut row: Vec<char> = line.chars().collect();
            if row.len() > width as usize {
                return Err(GameError::resource(
                    asset,
                    format!("line {} is wider than {width} cells", i + 2),
                ));
            }
            row.resize(width as usize, ' ');
            cells.push(row);
        }
        cells.resize(height as usize, vec![' '; width as usize]);

        Ok(Self {
            geometry: SheetGeometry {
                width,
                height,
                columns,
                rows,
            },
            cells,
        })
    }

    pub fn geometry(&self) -> SheetGeometry {
        self.geometry
    }

    /// Glyph at a sheet cell; out-of-range cells are blank.
    pub fn cell(&self, x: u32, y: u32) -> char {
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(' ')
    }

    /// The rows of one frame, optionally flipped left-to-right.
    pub fn frame_lines(&self, source: FrameRect, mirrored: bool) -> Vec<Vec<char>> {
        (source.y..source.y + source.height)
            .map(|y| {
                let row: Vec<char> = (source.x..source.x + source.width)
                    .map(|x| self.cell(x, y))
                    .collect();
                if mirrored {
                    row.into_iter().rev().map(mirror_glyph).collect()
                } else {
                    row
                }
            })
            .collect()
    }
}

/// Every sheet the game draws, keyed by asset.
#[derive(Clone, Debug)]
pub struct AssetStore {
    sheets: HashMap<AssetId, GlyphSheet>,
}

impl AssetStore {
    /// Sheets compiled into the binary.
    pub fn bundled() -> Result<Self, GameError> {
        let mut sheets = HashMap::new();
        for asset in AssetId::ALL {
            sheets.insert(asset, GlyphSheet::parse(asset.file_name(), bundled_text(asset))?);
        }
        Ok(Self { sheets })
    }

    /// Load every sheet from `dir`.  The first missing or malformed file aborts.
    pub fn load_dir(dir: &Path) -> Result<Self, GameError> {
        let mut sheets = HashMap::new();
        for asset in AssetId::ALL {
            let path = dir.join(asset.file_name());
            let id = path.display().to_string();
            let text = std::fs::read_to_string(&path)
                .map_err(|e| GameError::resource(id.as_str(), e.to_string()))?;
            sheets.insert(asset, GlyphSheet::parse(&id, &text)?);
            tracing::debug!(asset = %id, "loaded frame sheet");
        }
        Ok(Self { sheets })
    }

    pub fn sheet(&self, asset: AssetId) -> Result<&GlyphSheet, GameError> {
        self.sheets
            .get(&asset)
            .ok_or_else(|| GameError::resource(asset.file_name(), "not loaded"))
    }

    pub fn geometry(&self, asset: AssetId) -> Result<SheetGeometry, GameError> {
        self.sheet(asset).map(GlyphSheet::geometry)
    }
}
