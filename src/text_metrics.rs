use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Approximate advance width per character when no matching font face can
/// be loaded (headless CI, minimal containers).
const FALLBACK_CHAR_FACTOR: f32 = 0.56;

/// Measures rendered text width in world units. Falls back to a per-char
/// estimate when the font stack cannot be resolved, so callers always get
/// a usable width.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    let fallback = text.chars().count() as f32 * font_size * FALLBACK_CHAR_FACTOR;
    let Ok(mut guard) = TEXT_MEASURER.lock() else {
        return fallback;
    };
    guard.measure(text, font_size, font_family).unwrap_or(fallback)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<LoadedFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_string();
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get(&key)?.as_ref()?;
        Some(face.measure_width(text, font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<LoadedFace> {
        let mut names: Vec<String> = Vec::new();
        let mut families: Vec<Family<'_>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => families.push(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    families.push(Family::SansSerif)
                }
                "monospace" | "ui-monospace" => families.push(Family::Monospace),
                _ => names.push(raw.to_string()),
            }
        }
        let named: Vec<Family<'_>> = names.iter().map(|n| Family::Name(n.as_str())).collect();
        let mut order: Vec<Family<'_>> = named;
        order.extend(families);
        if order.is_empty() {
            order.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &order,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded = None;
        self.db.with_face_data(id, |data, index| {
            loaded = LoadedFace::parse(data.to_vec(), index);
        });
        loaded
    }
}

struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl LoadedFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * FALLBACK_CHAR_FACTOR;

        if text.is_ascii() {
            let mut width = 0.0f32;
            for byte in text.as_bytes() {
                if *byte == b'\n' {
                    continue;
                }
                let advance = self.ascii_advances[*byte as usize];
                if advance == 0 {
                    width += fallback;
                } else {
                    width += advance as f32 * scale;
                }
            }
            return width.max(0.0);
        }

        let Ok(face) = Face::parse(&self.data, self.index) else {
            return text.chars().count() as f32 * fallback;
        };
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            match face.glyph_index(ch) {
                Some(glyph) => {
                    let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                    if advance == 0 {
                        width += fallback;
                    } else {
                        width += advance as f32 * scale;
                    }
                }
                None => width += fallback,
            }
        }
        width.max(0.0)
    }
}
