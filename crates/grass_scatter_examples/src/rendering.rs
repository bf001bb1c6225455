use std::path::Path;

use glam::Vec2;
use grass_scatter::prelude::{PatchGrid, Placement};
use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[derive(Debug, Clone, Copy)]
pub enum DotStyle {
    /// Filled square of the given half-size in pixels.
    Square { color: [u8; 3], half: i32 },
    /// Filled circle; color is shaded by placement height.
    Circle { color: [u8; 3], radius: i32 },
}

/// Top-down render settings. The domain is centered on the world origin,
/// with world X to the right and world Z up the image.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub domain_extent: Vec2,
    pub background: [u8; 3],
    pub grounded: DotStyle,
    pub fallback: DotStyle,
    pub grid: Option<(PatchGrid, [u8; 3])>,
    /// Height range mapped to dark..bright shading.
    pub height_range: (f32, f32),
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), domain_extent: Vec2) -> Self {
        Self {
            image_size,
            domain_extent,
            background: [20, 24, 20],
            grounded: DotStyle::Circle {
                color: [120, 200, 90],
                radius: 2,
            },
            fallback: DotStyle::Square {
                color: [220, 70, 60],
                half: 2,
            },
            grid: None,
            height_range: (-5.0, 5.0),
        }
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    pub fn with_grid(mut self, grid: PatchGrid, rgb: [u8; 3]) -> Self {
        self.grid = Some((grid, rgb));
        self
    }

    pub fn with_height_range(mut self, min: f32, max: f32) -> Self {
        self.height_range = (min, max);
        self
    }

    fn to_pixel(&self, x: f32, z: f32) -> (i32, i32) {
        let (w, h) = self.image_size;
        let u = (x / self.domain_extent.x + 0.5) * w as f32;
        let v = (0.5 - z / self.domain_extent.y) * h as f32;
        (u.floor() as i32, v.floor() as i32)
    }

    fn shade(&self, color: [u8; 3], height: f32) -> [u8; 3] {
        let (lo, hi) = self.height_range;
        let t = if hi > lo {
            ((height - lo) / (hi - lo)).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let k = 0.45 + 0.55 * t;
        color.map(|c| (c as f32 * k).round() as u8)
    }
}

/// Renders placements as dots and writes a PNG to `path`.
pub fn render_placements_to_png<'p, I, P>(
    placements: I,
    config: &RenderConfig,
    path: P,
) -> anyhow::Result<()>
where
    I: IntoIterator<Item = &'p Placement>,
    P: AsRef<Path>,
{
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    if let Some((grid, rgb)) = config.grid {
        draw_grid(&mut img, config, &grid, rgb);
    }

    for p in placements {
        let (px, py) = config.to_pixel(p.position.x, p.position.z);
        let style = if p.grounded {
            config.grounded
        } else {
            config.fallback
        };
        match style {
            DotStyle::Square { color, half } => {
                for dy in -half..=half {
                    for dx in -half..=half {
                        put(&mut img, px + dx, py + dy, color);
                    }
                }
            }
            DotStyle::Circle { color, radius } => {
                let shaded = config.shade(color, p.position.y);
                for dy in -radius..=radius {
                    for dx in -radius..=radius {
                        if dx * dx + dy * dy <= radius * radius {
                            put(&mut img, px + dx, py + dy, shaded);
                        }
                    }
                }
            }
        }
    }

    img.save(path.as_ref())?;
    tracing::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

fn draw_grid(img: &mut RgbImage, config: &RenderConfig, grid: &PatchGrid, rgb: [u8; 3]) {
    let (w, h) = config.image_size;
    let corner = grid.bottom_corner();
    for i in 0..=grid.resolution {
        let offset = corner.x + i as f32 * grid.patch_size;
        let (x, _) = config.to_pixel(offset, 0.0);
        for y in 0..h as i32 {
            put(img, x, y, rgb);
        }
        let (_, y) = config.to_pixel(0.0, offset);
        for x in 0..w as i32 {
            put(img, x, y, rgb);
        }
    }
}

fn put(img: &mut RgbImage, x: i32, y: i32, rgb: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(rgb));
    }
}
