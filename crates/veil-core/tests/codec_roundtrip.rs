//! Integration tests for the keyed permutation codec and the file pipeline.
//!
//! Grids are generated from a seeded RNG so failures are reproducible.

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use veil_core::codec::{KeyedPermutationCodec, PixelFormat, PixelGrid};
use veil_core::{Config, Direction, ImageTransformer, Veil};

const FORMATS: [PixelFormat; 4] = [
    PixelFormat::Luma8,
    PixelFormat::LumaA8,
    PixelFormat::Rgb8,
    PixelFormat::Rgba8,
];

fn random_grid(rng: &mut StdRng) -> PixelGrid {
    let width = rng.gen_range(1..=40);
    let height = rng.gen_range(1..=40);
    let format = FORMATS[rng.gen_range(0..FORMATS.len())];
    let len = width as usize * height as usize * format.channels();
    let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
    PixelGrid::new(width, height, format, data).unwrap()
}

fn random_password(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..24);
    (0..len).map(|_| rng.gen_range(' '..='~')).collect()
}

/// Grid whose RGBA pixels spell out their own index as a little-endian u32.
fn index_grid(width: u32, height: u32) -> PixelGrid {
    let data = (0..width * height).flat_map(|i| i.to_le_bytes()).collect();
    PixelGrid::new(width, height, PixelFormat::Rgba8, data).unwrap()
}

fn index_at(grid: &PixelGrid, x: u32, y: u32) -> u32 {
    let px = grid.pixel(x, y).unwrap();
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

#[test]
fn decode_inverts_encode_for_random_grids() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    for _ in 0..150 {
        let grid = random_grid(&mut rng);
        let password = random_password(&mut rng);
        let codec = KeyedPermutationCodec::from_password(&password);

        let encoded = codec.encode(&grid).unwrap();
        assert_eq!(encoded.width(), grid.width());
        assert_eq!(encoded.height(), grid.height());
        assert_eq!(encoded.format(), grid.format());
        assert_eq!(codec.decode(&encoded).unwrap(), grid, "password {password:?}");
    }
}

#[test]
fn in_place_and_gather_agree() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);
    for _ in 0..60 {
        let grid = random_grid(&mut rng);
        let codec = KeyedPermutationCodec::from_password(&random_password(&mut rng));

        let gathered = codec.encode(&grid).unwrap();
        let mut swapped = grid.clone();
        codec.encode_in_place(&mut swapped).unwrap();
        assert_eq!(gathered, swapped);
    }
}

#[test]
fn encode_moves_whole_rows_and_columns() {
    let (width, height) = (17, 13);
    let grid = index_grid(width, height);
    let encoded = KeyedPermutationCodec::from_password("in place")
        .encode(&grid)
        .unwrap();
    assert_ne!(encoded, grid);

    for y in 0..height {
        let source_row = index_at(&encoded, 0, y) / width;
        for x in 0..width {
            assert_eq!(index_at(&encoded, x, y) / width, source_row);
        }
    }
    for x in 0..width {
        let source_col = index_at(&encoded, x, 0) % width;
        for y in 0..height {
            assert_eq!(index_at(&encoded, x, y) % width, source_col);
        }
    }

    let mut seen: Vec<u32> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| index_at(&encoded, x, y))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..width * height).collect::<Vec<_>>());
}

#[test]
fn wrong_password_does_not_restore() {
    let grid = index_grid(11, 9);
    let encoded = KeyedPermutationCodec::from_password("roundtrip")
        .encode(&grid)
        .unwrap();
    assert_ne!(encoded, grid);

    let wrong = KeyedPermutationCodec::from_password("roundtrip!")
        .decode(&encoded)
        .unwrap();
    assert_ne!(wrong, grid);
    let right = KeyedPermutationCodec::from_password("roundtrip")
        .decode(&encoded)
        .unwrap();
    assert_eq!(right, grid);
}

#[test]
fn distinct_passwords_encode_differently() {
    let pairs = [
        ("alpha", "beta"),
        ("hunter2", "hunter3"),
        ("", "x"),
        ("test", "Test"),
        ("k0", "k1"),
    ];
    for (width, height) in [(8, 6), (16, 12)] {
        let grid = index_grid(width, height);
        for (a, b) in pairs {
            let left = KeyedPermutationCodec::from_password(a).encode(&grid).unwrap();
            let right = KeyedPermutationCodec::from_password(b).encode(&grid).unwrap();
            assert_ne!(left, right, "{a:?} vs {b:?} on {width}x{height}");
        }
    }

    let grid = index_grid(16, 12);
    let mut encodings: Vec<Vec<u8>> = (0..20)
        .map(|i| {
            let codec = KeyedPermutationCodec::from_password(&format!("key-{i}"));
            codec.encode(&grid).unwrap().as_bytes().to_vec()
        })
        .collect();
    encodings.sort();
    encodings.dedup();
    assert_eq!(encodings.len(), 20);
}

#[test]
fn single_column_only_moves_rows() {
    let grid = index_grid(1, 6);
    let encoded = KeyedPermutationCodec::from_password("column")
        .encode(&grid)
        .unwrap();
    assert_ne!(encoded, grid);
    let mut rows: Vec<u32> = (0..6).map(|y| index_at(&encoded, 0, y)).collect();
    rows.sort_unstable();
    assert_eq!(rows, vec![0, 1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn jpeg_file_roundtrip_through_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("holiday.jpg");
    let img = ImageBuffer::from_fn(24, 16, |x, y| Rgb([(x * 10) as u8, (y * 15) as u8, 90]));
    DynamicImage::ImageRgb8(img).save(&input).unwrap();
    // Lossy source: compare against what the decoder actually sees
    let source_pixels = image::open(&input).unwrap().to_rgb8();

    let veil = Veil::new(Config::default());
    let transformer: ImageTransformer = veil.transformer("hunter2");

    let encoded = transformer.transform(&input, Direction::Encode).await.unwrap();
    assert_eq!(encoded.source_format, "jpeg");
    assert_eq!(encoded.output_path, dir.path().join("holiday.veiled.png"));

    let decoded = transformer
        .transform(&encoded.output_path, Direction::Decode)
        .await
        .unwrap();
    let restored = image::open(&decoded.output_path).unwrap();
    assert_eq!(restored.dimensions(), (24, 16));
    assert_eq!(restored.to_rgb8().as_raw(), source_pixels.as_raw());
}
