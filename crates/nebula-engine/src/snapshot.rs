//! PNG snapshots of the raster surface.

use std::fs;
use std::path::Path;

use nebula_common::{NebulaError, NebulaResult};
use nebula_kernel::raster::PixelSurface;
use nebula_kernel::surface::DrawSurface;
use tracing::info;

/// Writes the surface to `path` as an RGBA PNG.
pub fn write_png(surface: &PixelSurface, path: &Path) -> NebulaResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let size = surface.size();
    let image = image::RgbaImage::from_raw(size.width(), size.height(), surface.as_bytes().to_vec())
        .ok_or_else(|| NebulaError::Image("pixel buffer does not match surface size".into()))?;

    image
        .save(path)
        .map_err(|e| NebulaError::Image(e.to_string()))?;

    info!(
        "Wrote {}x{} snapshot to {}",
        size.width(),
        size.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_common::{Rgba, SurfaceSize};
    use tempfile::TempDir;

    #[test]
    fn test_png_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("frames").join("shot.png");

        let mut surface = PixelSurface::new(SurfaceSize::new(16, 9).expect("valid size"));
        surface.fill_surface(Rgba::rgb(0x0a, 0x15, 0x35));
        write_png(&surface, &path).expect("snapshot written");

        let decoded = image::open(&path).expect("readable png").to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 9));
        assert_eq!(decoded.get_pixel(3, 4).0, [0x0a, 0x15, 0x35, 0xff]);
    }
}
