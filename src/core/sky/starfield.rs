//! Star-field generation
//!
//! Draws the master stars of the home tile from the star random stream and,
//! when the chart wraps around, tiles replicas into the eight neighbors.
//!
//! Sizes are skewed towards small stars: each size is the product of
//! `size_random_count` uniform draws raised to `size_distribution_power`,
//! mapped onto the configured size range.

use rand::Rng;
use rand_chacha::ChaChaRng;
use tracing::{debug, info};

use super::field::SkyField;
use super::star::{ColorMode, Point, StarColor};
use crate::core::error::Result;
use crate::core::models::ChartConfig;

/// Lower bound of a random color index
pub const COLOR_INDEX_MIN: f64 = -0.4;
/// Width of the random color index interval
pub const COLOR_INDEX_SPAN: f64 = 2.4;

/// Generate the star field for `config`
pub fn generate_field(config: &ChartConfig, rng: &mut ChaChaRng) -> Result<SkyField> {
    let stars = &config.stars;
    let color_mode = ColorMode::parse(&stars.color)?;
    let (width, height) = (
        config.box_size.width as f64,
        config.box_size.height as f64,
    );

    let mut field = SkyField::new(width, height, config.box_size.replicate);
    let home = field.home();
    info!(
        "Generating {} stars in {}",
        stars.count,
        field.quadrant(home)
    );

    let min_size = stars.size_range.min();
    let size_span = stars.size_range.max() - min_size;
    let placeholder = match color_mode {
        ColorMode::Fixed(rgba) => StarColor::Rgba(rgba),
        ColorMode::RandomColorIndex => StarColor::ColorIndex(0.0),
    };

    let mut masters = Vec::with_capacity(stars.count);
    for _ in 0..stars.count {
        let mut r = 1.0;
        for _ in 0..stars.size_random_count {
            r *= rng.random::<f64>();
        }
        let size = r.powf(stars.size_distribution_power) * size_span + min_size;
        let w = rng.random::<f64>() * width;
        let h = rng.random::<f64>() * height;
        masters.push(field.create_master(Point::new(w, h), size, placeholder, home));
    }

    // Colors come last so the geometry sequence does not depend on the color mode.
    if color_mode == ColorMode::RandomColorIndex {
        for &id in &masters {
            let index = rng.random::<f64>() * COLOR_INDEX_SPAN + COLOR_INDEX_MIN;
            field.set_master_color(id, StarColor::ColorIndex(index));
        }
    }

    if config.box_size.replicate {
        field.tile_neighbors();
        debug!(
            "Tiled {} replicas into {} neighbor quadrants",
            field.stars().len() - masters.len(),
            field.quadrants().len() - 1
        );
    }

    Ok(field)
}
