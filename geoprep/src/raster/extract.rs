use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use log::{debug, info};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;

use super::contour::{contour_area, simplify_contour, trace_external};
use super::geotransform::GeoTransform;
use super::mask::{ColorSpec, Mask};
use crate::models::Crs;
use crate::reproject::Reprojector;

/// Tuning knobs for line extraction. The defaults are the values the red
/// transmission line on the regional claim map was extracted with; `precise`
/// keeps small disconnected strokes that the default morphology eats.
pub struct ExtractOptions {
    pub source_crs: Crs,
    pub color: ColorSpec,
    pub precise: bool,
    /// Contours with fewer traced pixels than this are noise.
    pub min_points: usize,
    /// ... unless their pixel area clears this bar. Infinite by default,
    /// so only the point count decides.
    pub min_area: f64,
    /// Douglas-Peucker epsilon in pixels.
    pub epsilon: f64,
    /// Map bounds (west, south, east, north) for scans without GeoTIFF tags.
    pub bounds: Option<[f64; 4]>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            source_crs: Crs::WebMercator,
            color: ColorSpec::red(),
            precise: false,
            min_points: 50,
            min_area: f64::INFINITY,
            epsilon: 2.0,
            bounds: None,
        }
    }
}

impl ExtractOptions {
    /// Sensitive variant: catches the short stub segments between claim
    /// blocks at the cost of more noise to filter later.
    pub fn precise() -> Self {
        Self {
            color: ColorSpec::red_sensitive(),
            precise: true,
            min_points: 5,
            min_area: 10.0,
            epsilon: 0.5,
            ..Self::default()
        }
    }
}

/// Extracts colored line work from a scanned GeoTIFF map as WGS84
/// LineString features.
pub struct LineExtractor {
    options: ExtractOptions,
}

impl LineExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn extract<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<FeatureCollection> {
        self.extract_with_mask(path, None::<&Path>)
    }

    /// Extracts line work, optionally writing the thresholded mask as a
    /// grayscale PNG for visual inspection.
    pub fn extract_with_mask<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        path: P,
        mask_out: Option<Q>,
    ) -> anyhow::Result<FeatureCollection> {
        let path = path.as_ref();
        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let f = File::open(path)?;
        let mut decoder = Decoder::new(BufReader::new(f))?;
        let (width, height) = decoder.dimensions()?;
        let colortype = decoder.colortype()?;
        info!("{}: {}x{} {:?}", source, width, height, colortype);

        let transform = self.geotransform(&mut decoder, width, height)?;
        let rgb = decode_rgb(&mut decoder, colortype, width as usize, height as usize)?;

        let mut mask = Mask::from_rgb(&rgb, width as usize, height as usize, &self.options.color);
        debug!("mask has {} foreground pixels", mask.foreground_count());
        mask = if self.options.precise {
            // Tiny closing only: opening would erase the short stubs this
            // mode exists to keep.
            mask.close(2)
        } else {
            mask.close(3).open(3)
        };

        if let Some(mask_path) = mask_out {
            let img = image::GrayImage::from_raw(width, height, mask.data.clone())
                .ok_or_else(|| anyhow!("mask buffer does not match image dimensions"))?;
            img.save(mask_path.as_ref())?;
        }

        let mut contours: Vec<(Vec<(f64, f64)>, f64)> = trace_external(&mask)
            .into_iter()
            .map(|c| {
                let area = contour_area(&c);
                (c, area)
            })
            .filter(|(c, area)| c.len() >= self.options.min_points || *area >= self.options.min_area)
            .collect();
        contours.sort_by(|a, b| b.1.total_cmp(&a.1));
        info!("kept {} contours after filtering", contours.len());

        let reprojector = if self.options.source_crs.is_geographic() {
            None
        } else {
            Some(Reprojector::new(&self.options.source_crs, &Crs::Wgs84)?)
        };

        let mut features = Vec::new();
        for (contour, area) in contours {
            let simplified = simplify_contour(&contour, self.options.epsilon);
            if simplified.len() < 2 {
                continue;
            }
            let mut coords = Vec::with_capacity(simplified.len());
            for (col, row) in simplified {
                let (x, y) = transform.pixel_to_geo(col, row);
                let (lon, lat) = match &reprojector {
                    Some(r) => r.transform_coord(x, y)?,
                    None => (x, y),
                };
                coords.push(vec![lon, lat]);
            }
            features.push(segment_feature(features.len(), coords, area, &source, &self.options.color.hex));
        }

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    fn geotransform(
        &self,
        decoder: &mut Decoder<BufReader<File>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<GeoTransform> {
        let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag);
        let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag);
        if let (Ok(scale), Ok(tie)) = (scale, tiepoint) {
            if scale.len() >= 2 && tie.len() >= 5 {
                // Tiepoint maps pixel (i, j) to map (x, y).
                return Ok(GeoTransform::new(
                    tie[3] - tie[0] * scale[0],
                    tie[4] + tie[1] * scale[1],
                    scale[0],
                    -scale[1],
                ));
            }
        }
        match self.options.bounds {
            Some([west, south, east, north]) => {
                Ok(GeoTransform::from_bounds(west, south, east, north, width, height))
            }
            None => bail!("TIFF carries no georeferencing tags; supply explicit map bounds"),
        }
    }
}

fn decode_rgb(
    decoder: &mut Decoder<BufReader<File>>,
    colortype: ColorType,
    width: usize,
    height: usize,
) -> anyhow::Result<Vec<u8>> {
    let DecodingResult::U8(data) = decoder.read_image()? else {
        bail!("Only 8-bit scans are supported");
    };
    let pixels = width * height;
    let rgb = match colortype {
        ColorType::RGB(8) => data,
        ColorType::RGBA(8) => {
            let mut rgb = Vec::with_capacity(pixels * 3);
            for px in data.chunks_exact(4) {
                rgb.extend_from_slice(&px[..3]);
            }
            rgb
        }
        ColorType::Gray(8) => {
            let mut rgb = Vec::with_capacity(pixels * 3);
            for v in data {
                rgb.extend_from_slice(&[v, v, v]);
            }
            rgb
        }
        other => bail!("Unsupported TIFF color type: {:?}", other),
    };
    if rgb.len() != pixels * 3 {
        bail!("Decoded buffer size does not match image dimensions");
    }
    Ok(rgb)
}

fn segment_feature(
    index: usize,
    coords: Vec<Vec<f64>>,
    area: f64,
    source: &str,
    hex: &str,
) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("FID".to_string(), index.into());
    properties.insert("name".to_string(), format!("Line Segment {}", index + 1).into());
    properties.insert("color".to_string(), hex.to_string().into());
    properties.insert("kind".to_string(), "line".into());
    properties.insert("area".to_string(), area.into());
    properties.insert("source".to_string(), source.to_string().into());
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coords))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{colortype, TiffEncoder};

    /// Writes a small RGB TIFF with a red horizontal stroke on white.
    fn write_test_tiff(path: &Path) {
        let (width, height) = (32u32, 16u32);
        let mut data = vec![255u8; (width * height * 3) as usize];
        // Tall enough to survive the 3x3 opening.
        for col in 4..28usize {
            for row in 6..10usize {
                let i = (row * width as usize + col) * 3;
                data[i] = 220;
                data[i + 1] = 10;
                data[i + 2] = 10;
            }
        }
        let f = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(f).unwrap();
        encoder
            .write_image::<colortype::RGB8>(width, height, &data)
            .unwrap();
    }

    #[test]
    fn test_extract_red_stroke() {
        let path = std::env::temp_dir().join("geoprep-extract-test.tif");
        write_test_tiff(&path);

        let options = ExtractOptions {
            min_points: 10,
            epsilon: 0.5,
            // Web Mercator bounds somewhere over the Golden Triangle.
            bounds: Some([-14450000.0, 7470000.0, -14440000.0, 7480000.0]),
            ..ExtractOptions::default()
        };
        let collection = LineExtractor::new(options).extract(&path).unwrap();
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props.get("name").unwrap(), "Line Segment 1");
        assert_eq!(props.get("color").unwrap(), "#FF0000");

        match &feature.geometry.as_ref().unwrap().value {
            Value::LineString(coords) => {
                assert!(coords.len() >= 2);
                for position in coords {
                    // Output must be WGS84 over the map bounds.
                    assert!(position[0] > -130.0 && position[0] < -129.0, "lon {}", position[0]);
                    assert!(position[1] > 55.0 && position[1] < 56.5, "lat {}", position[1]);
                }
            }
            other => panic!("unexpected geometry: {:?}", other),
        }
        std::fs::remove_file(&path).unwrap();
    }

    /// Writes an RGB TIFF with a square red blob on white.
    fn write_blob_tiff(path: &Path, size: usize) {
        let (width, height) = (16u32, 16u32);
        let mut data = vec![255u8; (width * height * 3) as usize];
        for col in 6..6 + size {
            for row in 6..6 + size {
                let i = (row * width as usize + col) * 3;
                data[i] = 220;
                data[i + 1] = 10;
                data[i + 2] = 10;
            }
        }
        let f = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(f).unwrap();
        encoder
            .write_image::<colortype::RGB8>(width, height, &data)
            .unwrap();
    }

    const BLOB_BOUNDS: [f64; 4] = [-14450000.0, 7470000.0, -14440000.0, 7480000.0];

    #[test]
    fn test_default_options_drop_small_contours() {
        let path = std::env::temp_dir().join("geoprep-extract-small.tif");
        // A 4x4 blob traces to a 12-pixel contour, well under min_points.
        write_blob_tiff(&path, 4);

        let options = ExtractOptions {
            bounds: Some(BLOB_BOUNDS),
            ..ExtractOptions::default()
        };
        let collection = LineExtractor::new(options).extract(&path).unwrap();
        assert!(
            collection.features.is_empty(),
            "{} feature(s) survived the min_points filter",
            collection.features.len()
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_precise_options_keep_small_contours() {
        let path = std::env::temp_dir().join("geoprep-extract-small-precise.tif");
        write_blob_tiff(&path, 4);

        let options = ExtractOptions {
            bounds: Some(BLOB_BOUNDS),
            ..ExtractOptions::precise()
        };
        let collection = LineExtractor::new(options).extract(&path).unwrap();
        assert_eq!(collection.features.len(), 1);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_area_threshold_rescues_short_contours() {
        let path = std::env::temp_dir().join("geoprep-extract-area.tif");
        // A 6x6 blob: 20-pixel contour, pixel area 25.
        write_blob_tiff(&path, 6);

        let options = ExtractOptions {
            min_points: 100,
            min_area: 20.0,
            bounds: Some(BLOB_BOUNDS),
            ..ExtractOptions::default()
        };
        let collection = LineExtractor::new(options).extract(&path).unwrap();
        assert_eq!(collection.features.len(), 1);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_extract_requires_georeference() {
        let path = std::env::temp_dir().join("geoprep-extract-nogeo.tif");
        write_test_tiff(&path);
        let result = LineExtractor::new(ExtractOptions::default()).extract(&path);
        assert!(result.is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_mask_gives_empty_collection() {
        let path = std::env::temp_dir().join("geoprep-extract-blank.tif");
        let (width, height) = (8u32, 8u32);
        let data = vec![255u8; (width * height * 3) as usize];
        let f = File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(f).unwrap();
        encoder
            .write_image::<colortype::RGB8>(width, height, &data)
            .unwrap();

        let options = ExtractOptions {
            bounds: Some([0.0, 0.0, 1.0, 1.0]),
            source_crs: Crs::Wgs84,
            ..ExtractOptions::default()
        };
        let collection = LineExtractor::new(options).extract(&path).unwrap();
        assert!(collection.features.is_empty());
        std::fs::remove_file(&path).unwrap();
    }
}
