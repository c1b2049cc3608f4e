//! Minimal GeoTIFF codec for 8-bit chunky rasters.
//!
//! Georeferencing is carried in the GeoTIFF model tags and the projection
//! string travels as the GTCitationGeoKey text in GeoAsciiParamsTag. When a
//! file names its CRS with a free-text citation plus an EPSG key, the
//! projection string keeps both as `<citation>|EPSG:<code>`.

use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek};
use std::path::Path;

use memmap2::Mmap;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

use crate::consts::REQUIRED_BAND_COUNT;
use crate::error::{Result, ScenePairError};
use crate::geo::GeoTransform;
use crate::raster::{RasterImage, RasterSource};

const GT_MODEL_TYPE_KEY: u16 = 1024;
const GT_RASTER_TYPE_KEY: u16 = 1025;
const GT_CITATION_KEY: u16 = 1026;
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const GEO_ASCII_PARAMS_TAG: u16 = 34737;

const EPSG_SUFFIX: &str = "|EPSG:";

const EXTRA_SAMPLE_UNASSOCIATED_ALPHA: u16 = 2;
const PLANAR_CONFIG_SEPARATE: u16 = 2;

/// Read a GeoTIFF into memory, shape = (bands, height, width).
pub fn read_geotiff(path: &Path) -> Result<RasterImage> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    let mut decoder = Decoder::new(Cursor::new(&mmap[..]))?.with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    if let Some(planar) = decoder.find_tag(Tag::PlanarConfiguration)? {
        if planar.into_u16()? == PLANAR_CONFIG_SEPARATE {
            return Err(ScenePairError::MalformedRaster(
                "band-sequential (planar) layout is not supported".into(),
            ));
        }
    }

    let geotransform = read_geotransform(&mut decoder)?;
    let projection = read_projection(&mut decoder)?;

    let samples = match decoder.read_image()? {
        DecodingResult::U8(buf) => buf,
        _ => {
            return Err(ScenePairError::MalformedRaster(
                "only 8-bit unsigned samples are supported".into(),
            ))
        }
    };

    let pixels = width * height;
    if pixels == 0 || samples.len() % pixels != 0 {
        return Err(ScenePairError::MalformedRaster(format!(
            "{} samples do not divide into {width}x{height} pixels",
            samples.len()
        )));
    }
    let band_count = samples.len() / pixels;

    RasterImage::from_interleaved(&samples, width, height, band_count, geotransform, projection)
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<GeoTransform> {
    if let Some(matrix) = decoder.find_tag(Tag::ModelTransformationTag)? {
        let m = matrix.into_f64_vec()?;
        if m.len() < 16 {
            return Err(ScenePairError::MalformedRaster(
                "ModelTransformationTag needs 16 values".into(),
            ));
        }
        return Ok(GeoTransform::from_coefficients([m[3], m[0], m[1], m[7], m[4], m[5]]));
    }

    let tiepoint = decoder.find_tag(Tag::ModelTiepointTag)?;
    let scale = decoder.find_tag(Tag::ModelPixelScaleTag)?;
    match (tiepoint, scale) {
        (Some(tiepoint), Some(scale)) => {
            let t = tiepoint.into_f64_vec()?;
            let s = scale.into_f64_vec()?;
            if t.len() < 6 || s.len() < 2 {
                return Err(ScenePairError::MalformedRaster(
                    "truncated tiepoint or pixel scale tag".into(),
                ));
            }
            let (i, j, x, y) = (t[0], t[1], t[3], t[4]);
            Ok(GeoTransform::north_up(x - i * s[0], y + j * s[1], s[0], -s[1]))
        }
        _ => Err(ScenePairError::MalformedRaster(
            "no georeferencing tags".into(),
        )),
    }
}

fn read_projection<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<String> {
    let Some(directory) = decoder.find_tag(Tag::GeoKeyDirectoryTag)? else {
        return Ok(String::new());
    };
    let keys = directory.into_u16_vec()?;
    let ascii = match decoder.find_tag(Tag::GeoAsciiParamsTag)? {
        Some(value) => value.into_string()?,
        None => String::new(),
    };
    Ok(projection_from_geokeys(&keys, &ascii))
}

/// Resolve a projection string from a GeoKeyDirectory: the citation text,
/// with `|EPSG:<code>` appended when the code is not already in it, or just
/// `EPSG:<code>` without a citation.
pub fn projection_from_geokeys(keys: &[u16], ascii: &str) -> String {
    let mut citation = None;
    let mut epsg = None;

    for entry in keys.get(4..).unwrap_or_default().chunks_exact(4) {
        let (key, location, count, value) = (entry[0], entry[1], entry[2], entry[3]);
        match key {
            GT_CITATION_KEY if location == GEO_ASCII_PARAMS_TAG => {
                let start = value as usize;
                let end = start + count as usize;
                citation = ascii
                    .get(start..end)
                    .map(|s| s.trim_end_matches(['|', '\0']).to_string());
            }
            GEOGRAPHIC_TYPE_KEY | PROJECTED_CS_TYPE_KEY if location == 0 => {
                if epsg.is_none() || key == PROJECTED_CS_TYPE_KEY {
                    epsg = Some(value);
                }
            }
            _ => {}
        }
    }

    match (citation, epsg) {
        (Some(text), Some(code)) if !text.is_empty() && epsg_code(&text) != Some(code) => {
            format!("{text}{EPSG_SUFFIX}{code}")
        }
        (Some(text), _) if !text.is_empty() => text,
        (_, Some(code)) => format!("EPSG:{code}"),
        _ => String::new(),
    }
}

/// Build a GeoKeyDirectory and its ASCII params for a projection string.
pub fn geokeys_for_projection(projection: &str) -> Result<(Vec<u16>, String)> {
    let mut entries: Vec<[u16; 4]> = Vec::new();
    let mut ascii = String::new();
    let (citation, epsg) = split_projection(projection);
    let geographic = is_geographic(citation, epsg);

    if !citation.is_empty() {
        let model = if geographic {
            MODEL_TYPE_GEOGRAPHIC
        } else {
            MODEL_TYPE_PROJECTED
        };
        entries.push([GT_MODEL_TYPE_KEY, 0, 1, model]);
    }
    entries.push([GT_RASTER_TYPE_KEY, 0, 1, RASTER_PIXEL_IS_AREA]);
    if !citation.is_empty() {
        ascii = format!("{citation}|");
        let count = u16::try_from(ascii.len()).map_err(|_| {
            ScenePairError::MalformedRaster(format!(
                "projection string of {} bytes does not fit a GeoKey",
                ascii.len()
            ))
        })?;
        entries.push([GT_CITATION_KEY, GEO_ASCII_PARAMS_TAG, count, 0]);
    }
    if let Some(code) = epsg {
        let key = if geographic {
            GEOGRAPHIC_TYPE_KEY
        } else {
            PROJECTED_CS_TYPE_KEY
        };
        entries.push([key, 0, 1, code]);
    }

    let mut keys = vec![1, 1, 0, entries.len() as u16];
    keys.extend(entries.iter().flatten());
    Ok((keys, ascii))
}

/// Split `<citation>|EPSG:<code>` into its parts; any other string is its own
/// citation with the code parsed out of it, if any.
fn split_projection(projection: &str) -> (&str, Option<u16>) {
    if let Some((citation, code)) = projection.rsplit_once(EPSG_SUFFIX) {
        if let Ok(code) = code.trim().parse() {
            return (citation, Some(code));
        }
    }
    (projection, epsg_code(projection))
}

/// EPSG code from `EPSG:<code>` or the last `AUTHORITY["EPSG","<code>"]`.
fn epsg_code(projection: &str) -> Option<u16> {
    if let Some(code) = projection.trim().strip_prefix("EPSG:") {
        return code.trim().parse().ok();
    }
    let idx = projection.rfind("AUTHORITY[\"EPSG\",\"")?;
    let rest = &projection[idx + "AUTHORITY[\"EPSG\",\"".len()..];
    rest.split('"').next()?.parse().ok()
}

fn is_geographic(projection: &str, epsg: Option<u16>) -> bool {
    let wkt = projection.trim_start();
    if wkt.starts_with("PROJCS") || wkt.starts_with("PROJCRS") {
        return false;
    }
    if wkt.starts_with("GEOGCS") || wkt.starts_with("GEOGCRS") {
        return true;
    }
    // Geographic 2D CRS codes live in the 4000 range.
    matches!(epsg, Some(4000..=4999))
}

/// Write a 4-band 8-bit raster as an RGBA GeoTIFF.
pub fn write_geotiff(raster: &RasterImage, path: &Path) -> Result<()> {
    let found = raster.band_count();
    if found != REQUIRED_BAND_COUNT {
        return Err(ScenePairError::BandCountMismatch {
            expected: REQUIRED_BAND_COUNT,
            found,
        });
    }

    let width = raster.width() as u32;
    let height = raster.height() as u32;
    let gt = raster.geotransform;
    let (keys, ascii) = geokeys_for_projection(&raster.projection)?;

    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    let mut image = encoder.new_image::<colortype::RGBA8>(width, height)?;
    {
        let dir = image.encoder();
        dir.write_tag(Tag::ExtraSamples, &[EXTRA_SAMPLE_UNASSOCIATED_ALPHA][..])?;
        if gt.is_rotated() {
            let matrix = [
                gt.pixel_width,
                gt.row_rotation,
                0.0,
                gt.origin_x,
                gt.col_rotation,
                gt.pixel_height,
                0.0,
                gt.origin_y,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0,
            ];
            dir.write_tag(Tag::ModelTransformationTag, &matrix[..])?;
        } else {
            let scale = [gt.pixel_width, -gt.pixel_height, 0.0];
            let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
            dir.write_tag(Tag::ModelPixelScaleTag, &scale[..])?;
            dir.write_tag(Tag::ModelTiepointTag, &tiepoint[..])?;
        }
        dir.write_tag(Tag::GeoKeyDirectoryTag, &keys[..])?;
        if !ascii.is_empty() {
            dir.write_tag(Tag::GeoAsciiParamsTag, ascii.as_str())?;
        }
    }
    image.write_data(&raster.to_interleaved())?;
    Ok(())
}
