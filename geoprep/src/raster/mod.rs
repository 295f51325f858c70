mod contour;
mod extract;
mod geotransform;
mod mask;

pub use contour::{contour_area, simplify_contour, trace_external};
pub use extract::{ExtractOptions, LineExtractor};
pub use geotransform::GeoTransform;
pub use mask::{ColorSpec, HsvRange, Mask, RgbRange};
