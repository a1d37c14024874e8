//! Tile naming convention helpers.
//!
//! `.hgt` tiles are named after the southwest corner of the 1°×1° square
//! they cover: `{N|S}dd{E|W}ddd.hgt`, e.g. `N35E138.hgt` or `S12W077.hgt`.

use std::path::Path;

/// Name of the tile covering the point `(lat, lon)`.
///
/// # Examples
///
/// ```
/// use gapfill::filename::tile_filename;
///
/// assert_eq!(tile_filename(35.5, 138.7), "N35E138.hgt");
/// assert_eq!(tile_filename(-12.3, -77.1), "S13W078.hgt");
/// ```
pub fn tile_filename(lat: f64, lon: f64) -> String {
    let lat = lat.floor() as i32;
    let lon = lon.floor() as i32;
    format!(
        "{}{:02}{}{:03}.hgt",
        if lat >= 0 { 'N' } else { 'S' },
        lat.abs(),
        if lon >= 0 { 'E' } else { 'W' },
        lon.abs()
    )
}

/// Southwest-corner coordinates encoded in a tile file name.
///
/// Accepts full paths and the `.hgt` / `.hgt.zip` extensions, in any case.
/// Returns `None` when the name does not follow the convention.
///
/// # Examples
///
/// ```
/// use gapfill::filename::tile_coords;
///
/// assert_eq!(tile_coords("N35E138.hgt"), Some((35, 138)));
/// assert_eq!(tile_coords("/data/s12w077.hgt.zip"), Some((-12, -77)));
/// assert_eq!(tile_coords("elevation.hgt"), None);
/// ```
pub fn tile_coords(name: &str) -> Option<(i32, i32)> {
    let mut stem = Path::new(name).file_name()?.to_str()?;
    for ext in [".zip", ".hgt"] {
        if stem.len() >= ext.len() && stem[stem.len() - ext.len()..].eq_ignore_ascii_case(ext) {
            stem = &stem[..stem.len() - ext.len()];
        }
    }
    if stem.len() != 7 || !stem.is_ascii() {
        return None;
    }

    let lat_sign = match stem.as_bytes()[0].to_ascii_uppercase() {
        b'N' => 1,
        b'S' => -1,
        _ => return None,
    };
    let lon_sign = match stem.as_bytes()[3].to_ascii_uppercase() {
        b'E' => 1,
        b'W' => -1,
        _ => return None,
    };
    let lat: i32 = stem[1..3].parse().ok()?;
    let lon: i32 = stem[4..7].parse().ok()?;
    Some((lat_sign * lat, lon_sign * lon))
}
