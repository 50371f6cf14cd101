pub mod scale;
pub mod types;

pub use scale::{BandScale, LinearScale};
pub use types::{PixelRect, Viewport};
