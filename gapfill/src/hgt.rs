//! SRTM-layout `.hgt` tile import and export.
//!
//! `.hgt` files are bare grids of 16-bit big-endian signed elevations, one
//! degree on each side, with the void value -32768 where the sensor saw
//! nothing. 1-arc-second tiles hold 3601×3601 samples, 3-arc-second tiles
//! 1201×1201; the layout runs north to south, west to east. The southwest
//! corner is encoded in the file name (`N35E138.hgt`).
//!
//! Reads go through a memory map and yield a [`Raster`] whose void cells are
//! true absence. Tiles wrapped in a local `.hgt.zip` archive are opened
//! transparently.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{FillError, Result};
use crate::filename::tile_coords;
use crate::raster::Raster;
use crate::region::{CellSize, Region};

/// Samples per row/column of a 1-arc-second tile.
const ARCSEC1_SAMPLES: usize = 3601;

/// Samples per row/column of a 3-arc-second tile.
const ARCSEC3_SAMPLES: usize = 1201;

/// File size of a 1-arc-second tile: 3601 × 3601 × 2 bytes.
const ARCSEC1_SIZE: usize = ARCSEC1_SAMPLES * ARCSEC1_SAMPLES * 2;

/// File size of a 3-arc-second tile: 1201 × 1201 × 2 bytes.
const ARCSEC3_SIZE: usize = ARCSEC3_SAMPLES * ARCSEC3_SAMPLES * 2;

/// Value marking voids in `.hgt` files.
pub const HGT_VOID: i16 = -32768;

/// Ground length of one degree along a meridian, in meters.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Sample spacing of an `.hgt` tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HgtResolution {
    /// 1 arc-second (~30 m at the equator).
    OneArcSecond,
    /// 3 arc-seconds (~90 m at the equator).
    ThreeArcSecond,
}

impl HgtResolution {
    /// Samples per row/column at this resolution.
    pub fn samples(&self) -> usize {
        match self {
            HgtResolution::OneArcSecond => ARCSEC1_SAMPLES,
            HgtResolution::ThreeArcSecond => ARCSEC3_SAMPLES,
        }
    }

    /// Sample spacing in degrees.
    pub fn degrees(&self) -> f64 {
        match self {
            HgtResolution::OneArcSecond => 1.0 / 3600.0,
            HgtResolution::ThreeArcSecond => 3.0 / 3600.0,
        }
    }
}

/// An `.hgt` tile loaded into a [`Raster`].
#[derive(Debug)]
pub struct HgtTile {
    raster: Raster,
    resolution: HgtResolution,
    base_lat: i32,
    base_lon: i32,
}

impl HgtTile {
    /// Load a tile from an `.hgt` or `.hgt.zip` file.
    ///
    /// The southwest corner comes from the file name and the resolution from
    /// the file size.
    ///
    /// # Errors
    ///
    /// - [`FillError::BadTileName`] if the name doesn't encode coordinates.
    /// - [`FillError::InvalidFileSize`] if the size matches no known layout.
    /// - [`FillError::Io`] for unreadable files or malformed archives.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (base_lat, base_lon) =
            tile_coords(&path.to_string_lossy()).ok_or_else(|| FillError::BadTileName {
                path: path.to_path_buf(),
            })?;

        let is_zip = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("zip"))
            .unwrap_or(false);
        if is_zip {
            return Self::from_zip(path, base_lat, base_lon);
        }

        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and private to this call; the
        // file is not modified while mapped.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap, base_lat, base_lon)
    }

    /// Extract the first `.hgt` entry of a zip archive and parse it.
    fn from_zip(path: &Path, base_lat: i32, base_lon: i32) -> Result<Self> {
        let invalid =
            |e: zip::result::ZipError| std::io::Error::new(std::io::ErrorKind::InvalidData, e);

        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file).map_err(invalid)?;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(invalid)?;
            if entry.name().to_ascii_lowercase().ends_with(".hgt") {
                let mut raw = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut raw)?;
                return Self::from_bytes(&raw, base_lat, base_lon);
            }
        }
        Err(FillError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no .hgt entry in {}", path.display()),
        )))
    }

    /// Parse raw tile bytes with an explicit southwest corner.
    pub fn from_bytes(bytes: &[u8], base_lat: i32, base_lon: i32) -> Result<Self> {
        let (samples, resolution) = match bytes.len() {
            ARCSEC1_SIZE => (ARCSEC1_SAMPLES, HgtResolution::OneArcSecond),
            ARCSEC3_SIZE => (ARCSEC3_SAMPLES, HgtResolution::ThreeArcSecond),
            size => return Err(FillError::InvalidFileSize { size }),
        };

        // Samples sit on the degree lattice, so the covered area extends
        // half a step beyond the integer-degree square on every side.
        let res = 1.0 / (samples - 1) as f64;
        let region = Region::new(
            base_lat as f64 + 1.0 + res / 2.0,
            base_lat as f64 - res / 2.0,
            base_lon as f64 + 1.0 + res / 2.0,
            base_lon as f64 - res / 2.0,
            res,
            res,
        )?;

        let mut data = Vec::with_capacity(samples * samples);
        for i in 0..samples * samples {
            let v = i16::from_be_bytes([bytes[2 * i], bytes[2 * i + 1]]);
            data.push(if v == HGT_VOID { f64::NAN } else { v as f64 });
        }

        Ok(Self {
            raster: Raster::from_vec(region, data)?,
            resolution,
            base_lat,
            base_lon,
        })
    }

    /// The tile's elevation grid (voids are absent cells).
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Consume the tile, keeping only the grid.
    pub fn into_raster(self) -> Raster {
        self.raster
    }

    /// Sample spacing of this tile.
    pub fn resolution(&self) -> HgtResolution {
        self.resolution
    }

    /// Southwest corner latitude.
    pub fn base_lat(&self) -> i32 {
        self.base_lat
    }

    /// Southwest corner longitude.
    pub fn base_lon(&self) -> i32 {
        self.base_lon
    }

    /// Ground size of one cell at this tile's latitude.
    ///
    /// The east-west extent shrinks with the cosine of latitude; the
    /// north-south extent is latitude-independent. This feeds metric
    /// buffer distances on tiles whose map units are degrees.
    pub fn ground_cell_size(&self) -> CellSize {
        let res = self.resolution.degrees();
        let mid_lat = (self.base_lat as f64 + 0.5).to_radians();
        CellSize {
            ew: res * METERS_PER_DEGREE * mid_lat.cos(),
            ns: res * METERS_PER_DEGREE,
        }
    }
}

/// Write `raster` as an `.hgt` file.
///
/// Absent cells become [`HGT_VOID`]; everything else is rounded to the
/// nearest meter. The grid must be square with a known tile edge length.
///
/// # Errors
///
/// Returns [`FillError::InvalidFileSize`] if the grid is not 1201² or 3601².
pub fn write_hgt<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<()> {
    let samples = raster.rows();
    if raster.cols() != samples || (samples != ARCSEC1_SAMPLES && samples != ARCSEC3_SAMPLES) {
        return Err(FillError::InvalidFileSize {
            size: raster.rows() * raster.cols() * 2,
        });
    }

    let mut out = Vec::with_capacity(samples * samples * 2);
    for row in 0..samples {
        for col in 0..samples {
            let v = match raster.get(row, col) {
                Some(v) => v.round().clamp(-32767.0, 32767.0) as i16,
                None => HGT_VOID,
            };
            out.extend_from_slice(&v.to_be_bytes());
        }
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    /// Raw 3-arc-second tile bytes with a per-sample value function.
    fn tile_bytes(value: impl Fn(usize, usize) -> i16) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ARCSEC3_SIZE);
        for row in 0..ARCSEC3_SAMPLES {
            for col in 0..ARCSEC3_SAMPLES {
                bytes.extend_from_slice(&value(row, col).to_be_bytes());
            }
        }
        bytes
    }

    fn write_tile(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_open_reads_values_and_extent() {
        let tmp = TempDir::new().unwrap();
        let bytes = tile_bytes(|row, col| if row == 600 && col == 600 { 500 } else { 0 });
        let path = write_tile(tmp.path(), "N35E138.hgt", &bytes);

        let tile = HgtTile::open(&path).unwrap();
        assert_eq!(tile.resolution(), HgtResolution::ThreeArcSecond);
        assert_eq!(tile.base_lat(), 35);
        assert_eq!(tile.base_lon(), 138);

        let raster = tile.raster();
        assert_eq!(raster.rows(), ARCSEC3_SAMPLES);
        assert_eq!(raster.cols(), ARCSEC3_SAMPLES);
        assert_eq!(raster.get(600, 600), Some(500.0));
        assert_eq!(raster.get(0, 0), Some(0.0));

        // Row 0 is the north edge: the tile center sits near (138.5, 35.5).
        assert_eq!(raster.value_at(138.5, 35.5), Some(500.0));
    }

    #[test]
    fn test_voids_become_absent_cells() {
        let tmp = TempDir::new().unwrap();
        let bytes = tile_bytes(|row, col| if row == 10 && col == 20 { HGT_VOID } else { 7 });
        let path = write_tile(tmp.path(), "S12W077.hgt", &bytes);

        let tile = HgtTile::open(&path).unwrap();
        assert!(tile.raster().is_absent(10, 20));
        assert_eq!(tile.raster().get(10, 21), Some(7.0));
        assert_eq!(
            tile.raster().valid_count(),
            ARCSEC3_SAMPLES * ARCSEC3_SAMPLES - 1
        );
    }

    #[test]
    fn test_invalid_file_size() {
        let tmp = TempDir::new().unwrap();
        let path = write_tile(tmp.path(), "N00E000.hgt", &[0u8; 1000]);
        let err = HgtTile::open(&path).unwrap_err();
        assert!(matches!(err, FillError::InvalidFileSize { size: 1000 }));
    }

    #[test]
    fn test_unparseable_name() {
        let tmp = TempDir::new().unwrap();
        let path = write_tile(tmp.path(), "elevation.hgt", &[0u8; 4]);
        let err = HgtTile::open(&path).unwrap_err();
        assert!(matches!(err, FillError::BadTileName { .. }));
    }

    #[test]
    fn test_open_zip_archive() {
        let tmp = TempDir::new().unwrap();
        let bytes = tile_bytes(|_, _| 123);

        let zip_path = tmp.path().join("N40E010.hgt.zip");
        let file = std::fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("N40E010.hgt", options).unwrap();
        writer.write_all(&bytes).unwrap();
        writer.finish().unwrap();

        let tile = HgtTile::open(&zip_path).unwrap();
        assert_eq!(tile.base_lat(), 40);
        assert_eq!(tile.raster().get(100, 100), Some(123.0));
    }

    #[test]
    fn test_write_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let bytes = tile_bytes(|row, col| {
            if row == 3 && col == 4 {
                HGT_VOID
            } else {
                ((row + col) % 2000) as i16
            }
        });
        let path = write_tile(tmp.path(), "N10E020.hgt", &bytes);

        let tile = HgtTile::open(&path).unwrap();
        let copy_path = tmp.path().join("N10E021.hgt");
        write_hgt(tile.raster(), &copy_path).unwrap();

        let copy = HgtTile::open(&copy_path).unwrap();
        assert!(copy.raster().is_absent(3, 4));
        assert_eq!(copy.raster().get(100, 200), Some(300.0));
        assert_eq!(copy.raster().valid_count(), tile.raster().valid_count());
    }

    #[test]
    fn test_write_rejects_non_tile_grids() {
        let region = Region::from_grid(0.0, 300.0, 10, 10, 30.0, 30.0).unwrap();
        let raster = Raster::filled(region, 1.0);
        let tmp = TempDir::new().unwrap();
        let err = write_hgt(&raster, tmp.path().join("N00E000.hgt")).unwrap_err();
        assert!(matches!(err, FillError::InvalidFileSize { .. }));
    }

    #[test]
    fn test_ground_cell_size_shrinks_with_latitude() {
        let tmp = TempDir::new().unwrap();
        let bytes = tile_bytes(|_, _| 0);
        let equator = HgtTile::open(write_tile(tmp.path(), "N00E000.hgt", &bytes)).unwrap();
        let far_north = HgtTile::open(write_tile(tmp.path(), "N59E000.hgt", &bytes)).unwrap();

        let eq_cell = equator.ground_cell_size();
        let north_cell = far_north.ground_cell_size();

        // ~92.8 m per 3-arcsec step along a meridian, everywhere.
        assert!((eq_cell.ns - 92.77).abs() < 0.1, "ns = {}", eq_cell.ns);
        assert_eq!(eq_cell.ns, north_cell.ns);
        // East-west shrinks toward the pole.
        assert!(eq_cell.ew > 92.0);
        assert!(north_cell.ew < 50.0);
    }
}
