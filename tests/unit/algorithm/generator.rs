//! Tests for parameter validation and the generation pipeline

#[cfg(test)]
mod tests {
    use sirds::algorithm::generator::build_thread_pool;
    use sirds::{
        DepthMap, GenerationConfig, Parameters, PatternSource, PixelBuffer, StereogramError,
        StereogramGenerator,
    };

    fn checker_template() -> PixelBuffer {
        PixelBuffer::from_fn(8, 6, |x, y| {
            if (x + y) % 2 == 0 {
                [250, 40, 40, 255]
            } else {
                [20, 20, 200, 255]
            }
        })
    }

    fn ramp_depth(width: usize, height: usize) -> DepthMap {
        DepthMap::from_buffer(PixelBuffer::from_fn(width, height, |x, _| {
            let red = (x * 255 / width.max(1)) as u8;
            [red, red, red, 255]
        }))
    }

    fn sequential(separation: usize, depth_strength: i32) -> GenerationConfig {
        GenerationConfig {
            parameters: Parameters::new(separation, depth_strength).unwrap(),
            parallel: false,
            threads: None,
        }
    }

    // Tests defaults match the documented separation and strength
    // Verified by changing DEFAULT_SEPARATION
    #[test]
    fn test_default_parameters() {
        let parameters = Parameters::default();

        assert_eq!(parameters.separation(), 170);
        assert_eq!(parameters.depth_strength(), 25);
        assert!(GenerationConfig::default().parallel);
    }

    // Tests zero separation is rejected while any strength is accepted
    // Verified by rejecting negative strengths
    #[test]
    fn test_parameter_validation() {
        assert!(matches!(
            Parameters::new(0, 25),
            Err(StereogramError::InvalidParameter {
                parameter: "separation",
                ..
            })
        ));
        assert!(Parameters::new(1, -400).is_ok());
        assert!(Parameters::new(1, 4000).is_ok());
    }

    // Tests the intended strength range is inclusive at both ends
    // Verified by using an exclusive upper bound
    #[test]
    fn test_intended_strength_range() {
        let intended = |strength| Parameters::new(10, strength).unwrap().is_intended_strength();

        assert!(!intended(-1));
        assert!(intended(0));
        assert!(intended(100));
        assert!(!intended(101));
    }

    // Tests output matches depth map dimensions, not tile dimensions
    // Verified by sizing output from the tile
    #[test]
    fn test_output_matches_depth_dimensions() {
        let generator = StereogramGenerator::new(sequential(30, 25)).unwrap();
        let depth = ramp_depth(97, 41);

        let output = generator
            .generate(&depth, &PatternSource::Noise { seed: 4 })
            .unwrap();

        assert_eq!((output.width(), output.height()), (97, 41));
        assert!(!generator.is_parallel());
        assert_eq!(generator.config().parameters.separation(), 30);
    }

    // Tests the tile is separation wide and depth-map tall
    // Verified by using the template height
    #[test]
    fn test_tile_dimensions() {
        let generator = StereogramGenerator::new(sequential(24, 25)).unwrap();
        let tile = generator
            .tile(&PatternSource::Template(checker_template()), 77)
            .unwrap();

        assert_eq!((tile.width(), tile.height()), (24, 77));
    }

    // Tests template generations are byte-identical
    // Verified by seeding noise into the template path
    #[test]
    fn test_template_generation_deterministic() {
        let generator = StereogramGenerator::new(sequential(40, 30)).unwrap();
        let depth = ramp_depth(150, 60);
        let source = PatternSource::Template(checker_template());

        let first = generator.generate(&depth, &source).unwrap();
        let second = generator.generate(&depth, &source).unwrap();

        assert_eq!(
            first.to_rgba_image().unwrap().into_raw(),
            second.to_rgba_image().unwrap().into_raw()
        );
    }

    // Tests the pooled generator matches the sequential one
    // Verified by linking rows out of order in the pool
    #[test]
    fn test_parallel_generator_matches_sequential() {
        let depth = ramp_depth(200, 50);
        let source = PatternSource::Noise { seed: 17 };

        let pooled = StereogramGenerator::new(GenerationConfig {
            parameters: Parameters::new(45, 40).unwrap(),
            parallel: true,
            threads: Some(3),
        })
        .unwrap();
        let single = StereogramGenerator::new(sequential(45, 40)).unwrap();

        assert!(pooled.is_parallel());
        assert_eq!(
            pooled.generate(&depth, &source).unwrap(),
            single.generate(&depth, &source).unwrap()
        );
    }

    // Tests degenerate templates abort generation
    // Verified by substituting a noise tile on failure
    #[test]
    fn test_degenerate_template_aborts() {
        let generator = StereogramGenerator::new(sequential(20, 25)).unwrap();
        let depth = ramp_depth(40, 10);

        let result = generator.generate(&depth, &PatternSource::Template(PixelBuffer::new(5, 0)));

        assert!(matches!(
            result,
            Err(StereogramError::DegenerateTemplate { .. })
        ));
    }

    // Tests worker pool sizing and rejection of zero threads
    // Verified by ignoring the requested thread count
    #[test]
    fn test_thread_pool_configuration() {
        assert_eq!(build_thread_pool(Some(2)).unwrap().current_num_threads(), 2);
        assert!(build_thread_pool(None).is_ok());
        assert!(matches!(
            build_thread_pool(Some(0)),
            Err(StereogramError::InvalidParameter {
                parameter: "threads",
                ..
            })
        ));

        let config = GenerationConfig {
            threads: Some(0),
            ..GenerationConfig::default()
        };
        assert!(StereogramGenerator::new(config).is_err());
    }
}
