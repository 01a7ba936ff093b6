use owned_ttf_parser::{AsFaceRef, OwnedFace};
use printpdf::{BuiltinFont, IndirectFontRef, PdfDocumentReference};
use std::path::{Path, PathBuf};

use super::RenderError;

const REGULAR: &str = "DejaVuSansCondensed.ttf";
const BOLD: &str = "DejaVuSansCondensed-Bold.ttf";
const ITALIC: &str = "DejaVuSansCondensed-Oblique.ttf";

/// Directories searched, in order, after the user-supplied one.
const SEARCH_DIRS: [&str; 6] = [
    "fonts",
    "assets/fonts",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/local/share/fonts",
];

/// The three faces a report is drawn with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSet {
    source: Source,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Source {
    TrueType(PathBuf),
    Builtin,
}

/// Advance assumed for a glyph whose width is unknown, in ems.
const GLYPH_WIDTH: f32 = 0.5;

/// Faces registered with one PDF document.
pub(crate) struct LoadedFonts {
    pub(crate) regular: LoadedFace,
    pub(crate) bold: LoadedFace,
    pub(crate) italic: LoadedFace,
}

/// A face registered with a PDF document, with the metrics used to lay out
/// its text.
pub(crate) struct LoadedFace {
    pub(crate) font: IndirectFontRef,
    metrics: Option<OwnedFace>,
}

impl LoadedFace {
    /// Width of `text` in ems. Built-in faces, and glyphs missing from a
    /// TrueType face, count [`GLYPH_WIDTH`] per character.
    pub(crate) fn text_width(&self, text: &str) -> f32 {
        let Some(face) = &self.metrics else {
            return text.chars().map(|_| GLYPH_WIDTH).sum();
        };
        let face = face.as_face_ref();
        let units_per_em = f32::from(face.units_per_em());
        text.chars()
            .map(|c| {
                face.glyph_index(c)
                    .and_then(|id| face.glyph_hor_advance(id))
                    .map_or(GLYPH_WIDTH, |advance| f32::from(advance) / units_per_em)
            })
            .sum()
    }
}

impl FontSet {
    /// Looks for the DejaVu Sans Condensed family in `preferred`, then in the
    /// standard locations. Falls back to the PDF built-in Helvetica faces,
    /// which only cover Latin text.
    ///
    /// TrueType faces are embedded whole, which adds about 2 MB to every
    /// report. Built-in faces add nothing.
    #[must_use]
    pub fn discover(preferred: Option<&Path>) -> Self {
        let found = preferred
            .into_iter()
            .map(Path::to_path_buf)
            .chain(SEARCH_DIRS.iter().map(PathBuf::from))
            .find(|dir| has_family(dir));
        if let Some(dir) = found {
            log::debug!("using fonts from {}", dir.display());
            Self {
                source: Source::TrueType(dir),
            }
        } else {
            log::warn!(
                "{REGULAR} not found; non-Latin text will not render with the built-in fonts"
            );
            Self::builtin()
        }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            source: Source::Builtin,
        }
    }

    /// Returns `true` if the faces can render non-Latin scripts.
    #[must_use]
    pub fn is_unicode(&self) -> bool {
        matches!(self.source, Source::TrueType(_))
    }

    pub(crate) fn load(&self, doc: &PdfDocumentReference) -> Result<LoadedFonts, RenderError> {
        match &self.source {
            Source::TrueType(dir) => Ok(LoadedFonts {
                regular: external(doc, &dir.join(REGULAR))?,
                bold: external(doc, &dir.join(BOLD))?,
                italic: external(doc, &dir.join(ITALIC))?,
            }),
            Source::Builtin => Ok(LoadedFonts {
                regular: builtin(doc, BuiltinFont::Helvetica)?,
                bold: builtin(doc, BuiltinFont::HelveticaBold)?,
                italic: builtin(doc, BuiltinFont::HelveticaOblique)?,
            }),
        }
    }
}

fn has_family(dir: &Path) -> bool {
    [REGULAR, BOLD, ITALIC]
        .iter()
        .all(|name| dir.join(name).is_file())
}

fn external(doc: &PdfDocumentReference, path: &Path) -> Result<LoadedFace, RenderError> {
    let bytes = std::fs::read(path).map_err(|source| RenderError::Font {
        path: path.to_path_buf(),
        source,
    })?;
    let font = doc
        .add_external_font(bytes.as_slice())
        .map_err(|e| RenderError::Pdf(format!("{}: {e:?}", path.display())))?;
    let metrics = OwnedFace::from_vec(bytes, 0)
        .map_err(|e| RenderError::Pdf(format!("{}: {e}", path.display())))?;
    Ok(LoadedFace {
        font,
        metrics: Some(metrics),
    })
}

fn builtin(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<LoadedFace, RenderError> {
    let font = doc
        .add_builtin_font(font)
        .map_err(|e| RenderError::Pdf(format!("{e:?}")))?;
    Ok(LoadedFace {
        font,
        metrics: None,
    })
}
