#![forbid(unsafe_code)]

mod rendering;
mod terrain;

pub use rendering::{init_tracing, render_placements_to_png, DotStyle, RenderConfig};
pub use terrain::{rolling_hills, tuft_prefab};
