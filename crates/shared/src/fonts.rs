use ab_glyph::FontVec;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

/// An ordered list of candidate font files, tried until one loads.
///
/// The defaults cover the DejaVu/Liberation locations common on Linux
/// plus the macOS supplemental fonts, so the composer works without any
/// font configuration on a typical machine. Alternate chains can be
/// supplied for testing or unusual systems.
#[derive(Debug, Clone)]
pub struct FontChain {
    pub candidates: Vec<PathBuf>,
}

impl FontChain {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Candidates for the bold face, falling back to regular files so a
    /// system with only one weight installed still renders.
    pub fn bold_default() -> Self {
        Self::new(
            [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
                "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
                "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
                "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
        )
    }

    pub fn regular_default() -> Self {
        Self::new(
            [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
        )
    }

    /// Try each candidate in order; a file that is missing or not a valid
    /// TrueType font moves on to the next.
    pub fn load(&self) -> Result<FontVec> {
        for path in &self.candidates {
            if let Ok(bytes) = fs::read(path) {
                if let Ok(font) = FontVec::try_from_vec(bytes) {
                    return Ok(font);
                }
            }
        }
        anyhow::bail!(
            "No usable font found. Tried: {}",
            self.candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// The two faces the composer draws with.
pub struct FontSet {
    pub bold: FontVec,
    pub regular: FontVec,
}

impl FontSet {
    pub fn load(bold: &FontChain, regular: &FontChain) -> Result<Self> {
        Ok(Self {
            bold: bold.load()?,
            regular: regular.load()?,
        })
    }

    /// Load from the default system locations.
    pub fn load_system() -> Result<Self> {
        Self::load(&FontChain::bold_default(), &FontChain::regular_default())
    }
}
