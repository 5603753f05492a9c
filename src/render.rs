//! Quick raster drawing of a tree as a rectangular phylogram.
//!
//! Branches run horizontally from the parent's x to the vertex's x at the
//! vertex's y; every vertex with children gets a vertical connector spanning
//! its children. x is the absolute time if set, otherwise the height; y is
//! the coordinate assigned by [Tree::sort_branches]. Tips are drawn as
//! outlined disks, filled by the colour of a trait value.

use crate::error::PhyloError;
use crate::model::Tree;
use crate::palette::{Palette, Rgb, assign_colours};
use crate::traits::UNDEFINED;
use image::{ImageBuffer, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use log::{debug, info};
use std::path::Path;

static BRANCH_COLOUR: image::Rgb<u8> = image::Rgb([0, 0, 0]); // black
static OUTLINE_COLOUR: image::Rgb<u8> = image::Rgb([0, 0, 0]); // black

/// Fill of tips without a coloured trait value (grey)
pub const DEFAULT_TIP_COLOUR: Rgb = Rgb(0x80, 0x80, 0x80);

// =#========================================================================#=
// RENDER OPTIONS
// =#========================================================================#=
/// Settings for [render_tree].
///
/// # Defaults
/// 1200x1600 pixels, 40 pixel margin, 1 pixel branches, tips of radius 3 on
/// a white background, coloured by nothing with palette [Palette::Set1].
///
/// # Example
/// ```no_run
/// use phylokit::palette::Palette;
/// use phylokit::render::{render_tree, RenderOptions};
///
/// let mut tree = phylokit::newick::parse_str("((A:1,B:2):1,C:2);")?;
/// let options = RenderOptions::default()
///     .with_size(800, 600)
///     .with_trait_key("host")
///     .with_palette(Palette::Dark2);
/// render_tree(&mut tree, &options, "tree.png")?;
/// # Ok::<(), phylokit::PhyloError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    width: u32,
    height: u32,
    margin: u32,
    branch_width: u32,
    tip_size: u32,
    background: Rgb,
    trait_key: Option<String>,
    palette: Palette,
    allow_list: Option<Vec<String>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1600,
            margin: 40,
            branch_width: 1,
            tip_size: 3,
            background: Rgb(255, 255, 255),
            trait_key: None,
            palette: Palette::Set1,
            allow_list: None,
        }
    }
}

impl RenderOptions {
    /// Sets the image size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    /// Sets the blank border around the tree in pixels.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the branch line width in pixels.
    pub fn with_branch_width(mut self, width: u32) -> Self {
        self.branch_width = width.max(1);
        self
    }

    /// Sets the tip radius in pixels; the outline adds to it.
    pub fn with_tip_size(mut self, size: u32) -> Self {
        self.tip_size = size;
        self
    }

    pub fn with_background(mut self, colour: Rgb) -> Self {
        self.background = colour;
        self
    }

    /// Colours tips by the value of this trait.
    pub fn with_trait_key(mut self, key: &str) -> Self {
        self.trait_key = Some(key.to_string());
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Only these trait values are coloured; others get [DEFAULT_TIP_COLOUR].
    pub fn with_allow_list<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.allow_list = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

// =#========================================================================#=
// RENDERING
// =#========================================================================#=
/// Draws `tree` to a PNG (or any format `image` infers from the extension) at `path`.
///
/// Branches are sorted in ascending order first if the tree has no
/// y-coordinates yet. Tip colours come from [assign_colours] over the values
/// of the configured trait; [UNDEFINED] values and values not on the allow
/// list are drawn in [DEFAULT_TIP_COLOUR], as are all tips if the palette
/// has too few colours.
///
/// # Errors
/// [PhyloError::Image] if the image cannot be written.
pub fn render_tree<P: AsRef<Path>>(tree: &mut Tree, options: &RenderOptions, path: P) -> Result<(), PhyloError> {
    let mut img: RgbImage = ImageBuffer::from_pixel(options.width, options.height, options.background.into());

    if tree.is_root_set() {
        if tree.root().y().is_none() {
            tree.sort_branches(false);
        }
        draw_tree(&mut img, tree, options);
    }

    img.save(path.as_ref())?;
    info!("Tree drawn to {}", path.as_ref().display());
    Ok(())
}

/// Maps tree coordinates onto pixels inside the margins.
struct Frame {
    x_min: f64,
    x_span: f64,
    y_min: f64,
    y_span: f64,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn new(xs: &[f64], ys: &[f64], options: &RenderOptions) -> Frame {
        let (x_min, x_max) = min_max(xs);
        let (y_min, y_max) = min_max(ys);
        let margin = options.margin.min(options.width / 2).min(options.height / 2) as f64;
        Frame {
            x_min,
            x_span: x_max - x_min,
            y_min,
            y_span: y_max - y_min,
            left: margin,
            top: margin,
            width: options.width as f64 - 2.0 * margin,
            height: options.height as f64 - 2.0 * margin,
        }
    }

    fn px(&self, x: f64) -> i32 {
        scale(x, self.x_min, self.x_span, self.left, self.width)
    }

    fn py(&self, y: f64) -> i32 {
        scale(y, self.y_min, self.y_span, self.top, self.height)
    }
}

/// Degenerate ranges are centred.
fn scale(value: f64, min: f64, span: f64, offset: f64, length: f64) -> i32 {
    let fraction = if span > 0.0 { (value - min) / span } else { 0.5 };
    (offset + fraction * length).round() as i32
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn draw_tree(img: &mut RgbImage, tree: &Tree, options: &RenderOptions) {
    let xs: Vec<f64> = tree
        .vertices()
        .map(|v| v.absolute_time().or(v.height()).unwrap_or(0.0))
        .collect();
    let ys: Vec<f64> = tree.vertices().map(|v| v.y().unwrap_or(0.0)).collect();
    let frame = Frame::new(&xs, &ys, options);
    let half_width = (options.branch_width / 2) as i32;

    for vertex in tree.vertices() {
        let index = vertex.index();
        let x = frame.px(xs[index]);
        let y = frame.py(ys[index]);

        if let Some(parent) = vertex.parent_index() {
            let parent_x = frame.px(xs[parent]);
            draw_segment(img, (parent_x.min(x), y - half_width), (parent_x.max(x), y - half_width), options.branch_width);
        }

        if !vertex.is_leaf() {
            let child_ys: Vec<i32> = vertex.children().iter().map(|&c| frame.py(ys[c])).collect();
            let top = child_ys.iter().copied().min().unwrap_or(y);
            let bottom = child_ys.iter().copied().max().unwrap_or(y);
            draw_segment(img, (x - half_width, top), (x - half_width, bottom), options.branch_width);
        }
    }

    let colours = tip_colours(tree, options);
    let radius = options.tip_size as i32;
    for vertex in tree.leaves() {
        let centre = (frame.px(xs[vertex.index()]), frame.py(ys[vertex.index()]));
        let fill = options
            .trait_key
            .as_deref()
            .and_then(|key| vertex.trait_value(key))
            .and_then(|value| colours.get(value))
            .copied()
            .unwrap_or(DEFAULT_TIP_COLOUR);
        draw_filled_circle_mut(img, centre, radius + 1, OUTLINE_COLOUR);
        draw_filled_circle_mut(img, centre, radius, fill.into());
    }
}

/// Axis-parallel line of `width` pixels from `from` to `to` (inclusive).
fn draw_segment(img: &mut RgbImage, from: (i32, i32), to: (i32, i32), width: u32) {
    let (w, h) = if from.1 == to.1 {
        ((to.0 - from.0 + 1) as u32, width)
    } else {
        (width, (to.1 - from.1 + 1) as u32)
    };
    draw_filled_rect_mut(img, Rect::at(from.0, from.1).of_size(w.max(1), h.max(1)), BRANCH_COLOUR);
}

fn tip_colours(tree: &Tree, options: &RenderOptions) -> std::collections::HashMap<String, Rgb> {
    let Some(key) = options.trait_key.as_deref() else {
        return Default::default();
    };
    let values: Vec<&str> = tree
        .leaves()
        .filter_map(|v| v.trait_value(key))
        .filter(|&value| value != UNDEFINED)
        .collect();
    let colours = assign_colours(&values, options.palette, options.allow_list.as_deref());
    debug!("Colouring tips by {key}: {} values", colours.len());
    colours
}
