//! Qualitative colour palettes and colour assignment to trait values.
//!
//! The palettes are the qualitative ColorBrewer and Tableau sets as shipped
//! with common plotting libraries. Each distinct value gets its own colour,
//! so a palette can colour at most as many values as it has entries.

use crate::error::PhyloError;
use log::{debug, error};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =#========================================================================#=
// RGB
// =#========================================================================#=
/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses a hex colour `#rrggbb` (the `#` is optional).
    ///
    /// # Example
    /// ```
    /// use phylokit::palette::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#e41a1c"), Some(Rgb(228, 26, 28)));
    /// assert_eq!(Rgb::from_hex("e41a"), None);
    /// ```
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats the colour as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(colour: Rgb) -> Self {
        image::Rgb([colour.0, colour.1, colour.2])
    }
}

// =#========================================================================#=
// PALETTES
// =#========================================================================#=
const SET1: [Rgb; 9] = [
    Rgb(0xe4, 0x1a, 0x1c), Rgb(0x37, 0x7e, 0xb8), Rgb(0x4d, 0xaf, 0x4a), Rgb(0x98, 0x4e, 0xa3),
    Rgb(0xff, 0x7f, 0x00), Rgb(0xff, 0xff, 0x33), Rgb(0xa6, 0x56, 0x28), Rgb(0xf7, 0x81, 0xbf),
    Rgb(0x99, 0x99, 0x99),
];
const SET2: [Rgb; 8] = [
    Rgb(0x66, 0xc2, 0xa5), Rgb(0xfc, 0x8d, 0x62), Rgb(0x8d, 0xa0, 0xcb), Rgb(0xe7, 0x8a, 0xc3),
    Rgb(0xa6, 0xd8, 0x54), Rgb(0xff, 0xd9, 0x2f), Rgb(0xe5, 0xc4, 0x94), Rgb(0xb3, 0xb3, 0xb3),
];
const SET3: [Rgb; 12] = [
    Rgb(0x8d, 0xd3, 0xc7), Rgb(0xff, 0xff, 0xb3), Rgb(0xbe, 0xba, 0xda), Rgb(0xfb, 0x80, 0x72),
    Rgb(0x80, 0xb1, 0xd3), Rgb(0xfd, 0xb4, 0x62), Rgb(0xb3, 0xde, 0x69), Rgb(0xfc, 0xcd, 0xe5),
    Rgb(0xd9, 0xd9, 0xd9), Rgb(0xbc, 0x80, 0xbd), Rgb(0xcc, 0xeb, 0xc5), Rgb(0xff, 0xed, 0x6f),
];
const PASTEL1: [Rgb; 9] = [
    Rgb(0xfb, 0xb4, 0xae), Rgb(0xb3, 0xcd, 0xe3), Rgb(0xcc, 0xeb, 0xc5), Rgb(0xde, 0xcb, 0xe4),
    Rgb(0xfe, 0xd9, 0xa6), Rgb(0xff, 0xff, 0xcc), Rgb(0xe5, 0xd8, 0xbd), Rgb(0xfd, 0xda, 0xec),
    Rgb(0xf2, 0xf2, 0xf2),
];
const PASTEL2: [Rgb; 8] = [
    Rgb(0xb3, 0xe2, 0xcd), Rgb(0xfd, 0xcd, 0xac), Rgb(0xcb, 0xd5, 0xe8), Rgb(0xf4, 0xca, 0xe4),
    Rgb(0xe6, 0xf5, 0xc9), Rgb(0xff, 0xf2, 0xae), Rgb(0xf1, 0xe2, 0xcc), Rgb(0xcc, 0xcc, 0xcc),
];
const DARK2: [Rgb; 8] = [
    Rgb(0x1b, 0x9e, 0x77), Rgb(0xd9, 0x5f, 0x02), Rgb(0x75, 0x70, 0xb3), Rgb(0xe7, 0x29, 0x8a),
    Rgb(0x66, 0xa6, 0x1e), Rgb(0xe6, 0xab, 0x02), Rgb(0xa6, 0x76, 0x1d), Rgb(0x66, 0x66, 0x66),
];
const ACCENT: [Rgb; 8] = [
    Rgb(0x7f, 0xc9, 0x7f), Rgb(0xbe, 0xae, 0xd4), Rgb(0xfd, 0xc0, 0x86), Rgb(0xff, 0xff, 0x99),
    Rgb(0x38, 0x6c, 0xb0), Rgb(0xf0, 0x02, 0x7f), Rgb(0xbf, 0x5b, 0x17), Rgb(0x66, 0x66, 0x66),
];
const PAIRED: [Rgb; 12] = [
    Rgb(0xa6, 0xce, 0xe3), Rgb(0x1f, 0x78, 0xb4), Rgb(0xb2, 0xdf, 0x8a), Rgb(0x33, 0xa0, 0x2c),
    Rgb(0xfb, 0x9a, 0x99), Rgb(0xe3, 0x1a, 0x1c), Rgb(0xfd, 0xbf, 0x6f), Rgb(0xff, 0x7f, 0x00),
    Rgb(0xca, 0xb2, 0xd6), Rgb(0x6a, 0x3d, 0x9a), Rgb(0xff, 0xff, 0x99), Rgb(0xb1, 0x59, 0x28),
];
const TAB10: [Rgb; 10] = [
    Rgb(0x1f, 0x77, 0xb4), Rgb(0xff, 0x7f, 0x0e), Rgb(0x2c, 0xa0, 0x2c), Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd), Rgb(0x8c, 0x56, 0x4b), Rgb(0xe3, 0x77, 0xc2), Rgb(0x7f, 0x7f, 0x7f),
    Rgb(0xbc, 0xbd, 0x22), Rgb(0x17, 0xbe, 0xcf),
];
const TAB20: [Rgb; 20] = [
    Rgb(0x1f, 0x77, 0xb4), Rgb(0xae, 0xc7, 0xe8), Rgb(0xff, 0x7f, 0x0e), Rgb(0xff, 0xbb, 0x78),
    Rgb(0x2c, 0xa0, 0x2c), Rgb(0x98, 0xdf, 0x8a), Rgb(0xd6, 0x27, 0x28), Rgb(0xff, 0x98, 0x96),
    Rgb(0x94, 0x67, 0xbd), Rgb(0xc5, 0xb0, 0xd5), Rgb(0x8c, 0x56, 0x4b), Rgb(0xc4, 0x9c, 0x94),
    Rgb(0xe3, 0x77, 0xc2), Rgb(0xf7, 0xb6, 0xd2), Rgb(0x7f, 0x7f, 0x7f), Rgb(0xc7, 0xc7, 0xc7),
    Rgb(0xbc, 0xbd, 0x22), Rgb(0xdb, 0xdb, 0x8d), Rgb(0x17, 0xbe, 0xcf), Rgb(0x9e, 0xda, 0xe5),
];

/// Named qualitative palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Set1,
    Set2,
    Set3,
    Pastel1,
    Pastel2,
    Dark2,
    Accent,
    Paired,
    Tab10,
    Tab20,
}

impl Palette {
    /// All palettes, in the order listed above.
    pub const ALL: [Palette; 10] = [
        Palette::Set1,
        Palette::Set2,
        Palette::Set3,
        Palette::Pastel1,
        Palette::Pastel2,
        Palette::Dark2,
        Palette::Accent,
        Palette::Paired,
        Palette::Tab10,
        Palette::Tab20,
    ];

    /// Looks up a palette by name, ignoring case (`"Set1"`, `"tab20"`, ...).
    ///
    /// # Errors
    /// [PhyloError::UnknownPalette] if no palette has that name.
    pub fn from_name(name: &str) -> Result<Palette, PhyloError> {
        Palette::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| PhyloError::UnknownPalette(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Palette::Set1 => "Set1",
            Palette::Set2 => "Set2",
            Palette::Set3 => "Set3",
            Palette::Pastel1 => "Pastel1",
            Palette::Pastel2 => "Pastel2",
            Palette::Dark2 => "Dark2",
            Palette::Accent => "Accent",
            Palette::Paired => "Paired",
            Palette::Tab10 => "tab10",
            Palette::Tab20 => "tab20",
        }
    }

    /// Returns the colours of this palette in order.
    pub fn colours(&self) -> &'static [Rgb] {
        match self {
            Palette::Set1 => &SET1,
            Palette::Set2 => &SET2,
            Palette::Set3 => &SET3,
            Palette::Pastel1 => &PASTEL1,
            Palette::Pastel2 => &PASTEL2,
            Palette::Dark2 => &DARK2,
            Palette::Accent => &ACCENT,
            Palette::Paired => &PAIRED,
            Palette::Tab10 => &TAB10,
            Palette::Tab20 => &TAB20,
        }
    }

    /// Number of colours in this palette.
    pub fn len(&self) -> usize {
        self.colours().len()
    }
}

impl FromStr for Palette {
    type Err = PhyloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::from_name(s)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =#========================================================================#=
// ASSIGNMENT
// =#========================================================================#=
/// Assigns a colour of `palette` to each distinct value.
///
/// Values are deduplicated keeping the order they are first seen in, and
/// get the palette's colours in that order. With an `allow_list`, only
/// values on it are coloured.
///
/// # Errors
/// [PhyloError::PaletteExhausted] if there are more distinct values than
/// colours in the palette.
///
/// # Example
/// ```
/// use phylokit::palette::{try_assign_colours, Palette, Rgb};
///
/// let values = ["bat", "civet", "bat"];
/// let colours = try_assign_colours(&values, Palette::Set1, None).unwrap();
/// assert_eq!(colours.len(), 2);
/// assert_eq!(colours["civet"], Rgb::from_hex("#377eb8").unwrap());
/// ```
pub fn try_assign_colours<S: AsRef<str>>(
    values: &[S],
    palette: Palette,
    allow_list: Option<&[String]>,
) -> Result<HashMap<String, Rgb>, PhyloError> {
    let mut distinct: Vec<&str> = Vec::new();
    for value in values.iter().map(AsRef::as_ref) {
        let allowed = allow_list.is_none_or(|list| list.iter().any(|a| a == value));
        if allowed && !distinct.contains(&value) {
            distinct.push(value);
        }
    }

    let colours = palette.colours();
    if distinct.len() > colours.len() {
        return Err(PhyloError::PaletteExhausted {
            requested: distinct.len(),
            available: colours.len(),
        });
    }

    debug!("Assigning {} colours from {palette}", distinct.len());
    Ok(distinct.into_iter().zip(colours).map(|(value, &colour)| (value.to_string(), colour)).collect())
}

/// Like [try_assign_colours], but logs a failure and returns an empty map.
pub fn assign_colours<S: AsRef<str>>(
    values: &[S],
    palette: Palette,
    allow_list: Option<&[String]>,
) -> HashMap<String, Rgb> {
    try_assign_colours(values, palette, allow_list).unwrap_or_else(|e| {
        error!("{e}, no colours assigned");
        HashMap::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_palette_sizes() {
        let sizes: Vec<usize> = Palette::ALL.iter().map(Palette::len).collect();
        assert_eq!(sizes, vec![9, 8, 12, 9, 8, 8, 8, 12, 10, 20]);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Palette::from_name("set1").unwrap(), Palette::Set1);
        assert_eq!("Tab20".parse::<Palette>().unwrap(), Palette::Tab20);
        assert!(matches!(Palette::from_name("viridis"), Err(PhyloError::UnknownPalette(n)) if n == "viridis"));
    }

    #[test]
    fn test_hex_round_trip() {
        let colour = Rgb::from_hex("#1F77B4").unwrap();
        assert_eq!(colour, Rgb(31, 119, 180));
        assert_eq!(colour.to_hex(), "#1f77b4");
        assert_eq!(Rgb::from_hex("#zz0000"), None);
    }

    #[test]
    fn test_set1_nine_distinct() {
        let values: Vec<String> = (0..9).map(|i| format!("clade{i}")).collect();
        let colours = assign_colours(&values, Palette::Set1, None);
        assert_eq!(colours.len(), 9);
        let distinct: HashSet<Rgb> = colours.values().copied().collect();
        assert_eq!(distinct.len(), 9);
        assert_eq!(colours["clade0"], SET1[0]);
        assert_eq!(colours["clade8"], SET1[8]);
    }

    #[test]
    fn test_exhausted() {
        let _ = env_logger::builder().is_test(true).try_init();
        let values: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let result = try_assign_colours(&values, Palette::Set1, None);
        assert!(matches!(result, Err(PhyloError::PaletteExhausted { requested: 10, available: 9 })));
        assert!(assign_colours(&values, Palette::Set1, None).is_empty());
    }

    #[test]
    fn test_allow_list() {
        let values = ["bat", "undef", "civet", "pangolin"];
        let allow = vec!["civet".to_string(), "bat".to_string()];
        let colours = try_assign_colours(&values, Palette::Dark2, Some(&allow)).unwrap();
        assert_eq!(colours.len(), 2);
        assert_eq!(colours["bat"], DARK2[0]);
        assert_eq!(colours["civet"], DARK2[1]);
        assert!(!colours.contains_key("undef"));
    }
}
