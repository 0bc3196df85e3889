//! Tests for template scaling, vertical tiling and noise tiles

#[cfg(test)]
mod tests {
    use sirds::StereogramError;
    use sirds::algorithm::pattern::{
        PatternSource, generate_tile, noise_tile, scaled_height, template_tile,
    };
    use sirds::buffer::PixelBuffer;

    fn assert_rows_repeat(tile: &PixelBuffer, period: usize) {
        for y in period..tile.height() {
            for x in 0..tile.width() {
                assert_eq!(
                    tile.pixel(x, y),
                    tile.pixel(x, y % period),
                    "row {y} should repeat row {}",
                    y % period
                );
            }
        }
    }

    fn striped_template(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            [(x * 20) as u8, (y * 12) as u8, 90, 255]
        })
    }

    // Tests a square template fills a 50x200 tile with four exact repeats
    // Verified by advancing the copy position by one row too few
    #[test]
    fn test_square_template_repeats_four_times() {
        let template = PixelBuffer::filled(10, 10, [30, 160, 90, 255]);

        assert_eq!(scaled_height(&template, 50).unwrap(), 50);

        let tile = template_tile(&template, 50, 200).unwrap();
        assert_eq!((tile.width(), tile.height()), (50, 200));
        assert_rows_repeat(&tile, 50);
    }

    // Tests the last repeat is clipped at the tile bottom
    // Verified by skipping the final partial copy
    #[test]
    fn test_partial_final_repeat() {
        let template = striped_template(10, 10);
        let tile = template_tile(&template, 20, 50).unwrap();

        assert_eq!((tile.width(), tile.height()), (20, 50));
        assert_rows_repeat(&tile, 20);
        assert!((0..20).all(|x| tile.pixel(x, 49).is_some_and(|p| p[3] == 255)));
    }

    // Tests aspect ratio is preserved for non-square templates
    // Verified by using width / height instead of height / width
    #[test]
    fn test_scaled_height_follows_aspect_ratio() {
        let tall = PixelBuffer::new(10, 20);
        let wide = PixelBuffer::new(40, 10);

        assert_eq!(scaled_height(&tall, 10).unwrap(), 20);
        assert_eq!(scaled_height(&wide, 20).unwrap(), 5);
    }

    // Tests repeats replicate the tile's own top band
    // Verified by reading from the scaled template at every repeat
    #[test]
    fn test_tall_template_band_replicated() {
        let template = striped_template(10, 20);
        let tile = template_tile(&template, 10, 30).unwrap();

        assert_rows_repeat(&tile, 20);
    }

    // Tests a template taller than the tile is clipped, not squashed
    // Verified by resizing to the tile height
    #[test]
    fn test_template_taller_than_tile() {
        let template = striped_template(10, 40);
        let tile = template_tile(&template, 10, 15).unwrap();

        assert_eq!((tile.width(), tile.height()), (10, 15));
        assert_eq!(scaled_height(&template, 10).unwrap(), 40);
    }

    // Tests zero-sized templates are rejected
    // Verified by removing the zero-height guard
    #[test]
    fn test_degenerate_templates() {
        let flat = PixelBuffer::new(10, 0);
        assert!(matches!(
            scaled_height(&flat, 50),
            Err(StereogramError::DegenerateTemplate {
                width: 10,
                height: 0
            })
        ));

        let empty = PixelBuffer::new(0, 10);
        assert!(scaled_height(&empty, 50).is_err());
        assert!(scaled_height(&PixelBuffer::new(4, 4), 0).is_err());
    }

    // Tests very wide templates still cover the whole tile one row at a time
    // Verified by rejecting scaled heights below one row
    #[test]
    fn test_wide_template_scales_to_single_row() {
        let sliver = PixelBuffer::filled(1000, 1, [200, 40, 10, 255]);
        assert_eq!(scaled_height(&sliver, 10).unwrap(), 1);

        let strip = PixelBuffer::filled(400, 1, [5, 6, 7, 255]);
        let tile = generate_tile(&PatternSource::Template(strip), 170, 100).unwrap();

        assert_eq!((tile.width(), tile.height()), (170, 100));
        assert_rows_repeat(&tile, 1);
        assert!(
            (0..100).all(|y| (0..170).all(|x| tile.pixel(x, y) == Some([5, 6, 7, 255])))
        );
    }

    // Tests translucent templates produce opaque tiles
    // Verified by removing set_opaque
    #[test]
    fn test_template_tile_is_opaque() {
        let template = PixelBuffer::filled(4, 4, [10, 20, 30, 0]);
        let tile = template_tile(&template, 8, 20).unwrap();

        for y in 0..20 {
            for x in 0..8 {
                assert_eq!(tile.pixel(x, y).map(|p| p[3]), Some(255));
            }
        }
    }

    // Tests template tiles are reproducible
    // Verified by introducing a random offset in the draw position
    #[test]
    fn test_template_tile_deterministic() {
        let source = PatternSource::Template(striped_template(7, 5));

        let first = generate_tile(&source, 30, 90).unwrap();
        let second = generate_tile(&source, 30, 90).unwrap();

        assert_eq!(first, second);
    }

    // Tests noise pixels are opaque grays covering the whole tile
    // Verified by drawing the red channel independently
    #[test]
    fn test_noise_tile_is_opaque_gray() {
        let tile = noise_tile(7, 16, 24);

        assert_eq!((tile.width(), tile.height()), (16, 24));
        for y in 0..24 {
            for x in 0..16 {
                let [r, g, b, a] = tile.pixel(x, y).unwrap();
                assert_eq!(r, g);
                assert_eq!(g, b);
                assert_eq!(a, 255);
            }
        }
    }

    // Tests noise depends only on the seed
    // Verified by seeding from entropy
    #[test]
    fn test_noise_tile_seeded() {
        assert_eq!(noise_tile(1, 16, 16), noise_tile(1, 16, 16));
        assert_ne!(noise_tile(1, 16, 16), noise_tile(2, 16, 16));
    }

    // Tests noise is not constant across the tile
    // Verified by drawing a single value for the whole tile
    #[test]
    fn test_noise_tile_varies() {
        let tile = noise_tile(3, 32, 32);
        let first = tile.pixel(0, 0).unwrap();

        let differing = (0..32)
            .flat_map(|y| (0..32).map(move |x| (x, y)))
            .filter(|&(x, y)| tile.pixel(x, y) != Some(first))
            .count();
        assert!(differing > 900, "only {differing} pixels differ from the first");
    }

    // Tests zero-width tiles are rejected for both sources
    // Verified by removing the tile width guard
    #[test]
    fn test_zero_width_tile_rejected() {
        let noise = PatternSource::Noise { seed: 0 };
        assert!(matches!(
            generate_tile(&noise, 0, 10),
            Err(StereogramError::InvalidParameter {
                parameter: "tile_width",
                ..
            })
        ));

        let template = PatternSource::Template(PixelBuffer::filled(2, 2, [0, 0, 0, 255]));
        assert!(generate_tile(&template, 0, 10).is_err());
    }
}
