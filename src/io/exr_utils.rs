/* Copyright 2020 @TwoCookingMice */

use crate::math::bitmap::Bitmap;

use exr::prelude::*;

pub type ExrResult = std::result::Result<(), exr::error::Error>;

// Write an RGBA bitmap to an EXR file
pub fn write_exr_to_file(image: &Bitmap, file_path: &str) -> ExrResult {
    log::info!("Starting writing openexr images: {}.", file_path);

    let width = image.width();
    let height = image.height();
    let write_result = write_rgba_file(file_path, width, height, |x, y| {
        image[(x, y)].to_tuple()
    });
    match &write_result {
        Ok(()) => log::info!("EXR written to: {}.", file_path),
        Err(e) => log::warn!("EXR written error: {}.", e),
    }
    write_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::color::Color4f;

    #[test]
    fn test_written_file_reads_back() {
        let mut bitmap = Bitmap::new(3, 2);
        bitmap[(2, 1)] = Color4f::new(0.25, 0.5, 1.0, 1.0);

        let path = std::env::temp_dir().join("aovkit_exr_utils_test.exr");
        let path = path.to_string_lossy().to_string();
        write_exr_to_file(&bitmap, &path).unwrap();

        let image = read()
            .no_deep_data()
            .largest_resolution_level()
            .rgba_channels(
                |resolution, _| vec![(0.0f32, 0.0f32, 0.0f32, 0.0f32); resolution.width() * resolution.height()],
                |pixels, position, (r, g, b, a): (f32, f32, f32, f32)| {
                    pixels[position.y() * 3 + position.x()] = (r, g, b, a);
                },
            )
            .first_valid_layer()
            .all_attributes()
            .from_file(&path)
            .unwrap();
        let pixels = image.layer_data.channel_data.pixels;
        assert_eq!(pixels.len(), 6);
        assert_eq!(pixels[5], (0.25, 0.5, 1.0, 1.0));
        assert_eq!(pixels[0], (0.0, 0.0, 0.0, 0.0));

        let _ = std::fs::remove_file(&path);
    }
}
