use proptest::prelude::*;
use texsquish::{block_mask, Algorithm, Format, Params, COLOUR_WEIGHTS_PERCEPTUAL, COLOUR_WEIGHTS_UNIFORM};

fn any_format() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Bc1), Just(Format::Bc2), Just(Format::Bc3)]
}

fn any_params() -> impl Strategy<Value = Params> {
    (
        prop_oneof![
            Just(Algorithm::RangeFit),
            Just(Algorithm::ClusterFit),
            Just(Algorithm::IterativeClusterFit)
        ],
        prop_oneof![Just(COLOUR_WEIGHTS_PERCEPTUAL), Just(COLOUR_WEIGHTS_UNIFORM)],
        any::<bool>(),
    )
        .prop_map(|(algorithm, weights, weigh_colour_by_alpha)| Params {
            algorithm,
            weights,
            weigh_colour_by_alpha,
        })
}

fn any_texels() -> impl Strategy<Value = [[u8; 4]; 16]> {
    any::<[[u8; 4]; 16]>()
}

proptest! {
    #[test]
    fn storage_size_law(format in any_format(), width in 0usize..40, height in 0usize..40) {
        let blocks = ((width + 3) / 4) * ((height + 3) / 4);
        prop_assert_eq!(format.compressed_size(width, height), blocks * format.block_size());

        let rgba = vec![0x5Au8; width * height * 4];
        let compressed = format.compress_to_vec(&rgba, width, height, Params::default()).unwrap();
        prop_assert_eq!(compressed.len(), blocks * format.block_size());
    }

    #[test]
    fn masked_texels_never_influence_output(
        format in any_format(),
        params in any_params(),
        rgba in any_texels(),
        noise in any_texels(),
        mask in any::<u16>(),
    ) {
        let mut expected = [0u8; 16];
        format.compress_block_masked(&rgba, mask, params, &mut expected).unwrap();

        let mut scrambled = rgba;
        for (i, pixel) in scrambled.iter_mut().enumerate() {
            if mask & (1 << i) == 0 {
                *pixel = noise[i];
            }
        }
        let mut actual = [0u8; 16];
        format.compress_block_masked(&scrambled, mask, params, &mut actual).unwrap();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn decompression_is_deterministic(format in any_format(), block in any::<[u8; 16]>()) {
        let first = format.decompress_block(&block).unwrap();
        let second = format.decompress_block(&block).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn single_colour_blocks_are_within_one(
        format in any_format(),
        params in any_params(),
        rgb in any::<[u8; 3]>(),
    ) {
        let rgba = [[rgb[0], rgb[1], rgb[2], 255]; 16];
        let mut block = [0u8; 16];
        format.compress_block(&rgba, params, &mut block).unwrap();

        let decoded = format.decompress_block(&block).unwrap();
        for pixel in decoded {
            for channel in 0..3 {
                prop_assert!((pixel[channel] as i32 - rgb[channel] as i32).abs() <= 1);
            }
            prop_assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn edge_tiles_cover_the_image(width in 1usize..24, height in 1usize..24) {
        let blocks_wide = (width + 3) / 4;
        let blocks_high = (height + 3) / 4;
        let covered: u32 = (0..blocks_high)
            .flat_map(|y| (0..blocks_wide).map(move |x| (x, y)))
            .map(|(x, y)| block_mask(x, y, width, height).count_ones())
            .sum();
        prop_assert_eq!(covered as usize, width * height);
    }

    #[test]
    fn bc1_transparency_survives(rgb in any::<[u8; 3]>(), holes in any::<u16>()) {
        let mut rgba = [[rgb[0], rgb[1], rgb[2], 255]; 16];
        for (i, pixel) in rgba.iter_mut().enumerate() {
            if holes & (1 << i) != 0 {
                pixel[3] = 0;
            }
        }
        let mut block = [0u8; 8];
        Format::Bc1.compress_block(&rgba, Params::default(), &mut block).unwrap();

        let decoded = Format::Bc1.decompress_block(&block).unwrap();
        for (i, pixel) in decoded.iter().enumerate() {
            let transparent = holes & (1 << i) != 0;
            prop_assert_eq!(pixel[3] == 0, transparent);
        }
    }
}
