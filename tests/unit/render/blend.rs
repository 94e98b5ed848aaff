use super::*;

const SAMPLES: [Rgba8; 6] = [
    [0, 0, 0, 0],
    [0, 0, 0, 255],
    [255, 255, 255, 255],
    [255, 0, 0, 128],
    [12, 200, 77, 31],
    [130, 64, 250, 200],
];

#[test]
fn black_opaque_background_is_identity_for_opaque_glyphs() {
    assert_eq!(screen([0, 0, 0, 255], [100, 50, 0, 255]), [100, 50, 0, 255]);
    assert_eq!(screen([0, 0, 0, 255], [0, 0, 0, 0]), [0, 0, 0, 255]);
}

#[test]
fn white_saturates() {
    assert_eq!(
        screen([255, 255, 255, 255], [40, 90, 10, 255]),
        [255, 255, 255, 255]
    );
}

#[test]
fn color_is_premultiplied_by_output_alpha() {
    // alpha = 128/255, red = 1.0 * 128/255
    assert_eq!(screen([255, 0, 0, 128], [0, 0, 0, 0]), [128, 0, 0, 128]);
    // half + half: 1 - 0.5 * 0.5
    let half = 0.5_f64;
    let expected = ((1.0_f64 - (1.0 - 128.0 / 255.0) * (1.0 - 128.0 / 255.0)) * 255.0).round() as u8;
    assert_eq!(screen([0, 0, 0, 128], [0, 0, 0, 128])[3], expected);
    assert!(expected > (half * 255.0) as u8);
}

#[test]
fn single_pair_is_commutative() {
    for a in SAMPLES {
        for b in SAMPLES {
            assert_eq!(screen(a, b), screen(b, a), "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn fold_depends_on_layer_order() {
    let a = [255, 0, 0, 128];
    let b = [0, 0, 0, 0];
    let c = [0, 0, 0, 255];

    let forward = screen(screen(a, b), c);
    let backward = screen(screen(c, b), a);
    assert_eq!(forward, [128, 0, 0, 255]);
    assert_eq!(backward, [255, 0, 0, 255]);
}

/// 2x2 RGBA frames, row-major, with mixed alpha.
const FRAME_A: [u8; 16] = [
    255, 0, 0, 128, 0, 255, 0, 255, //
    10, 20, 30, 0, 200, 100, 50, 64,
];
const FRAME_B: [u8; 16] = [
    0, 0, 0, 0, 0, 0, 255, 128, //
    255, 255, 255, 255, 50, 50, 50, 200,
];
const FRAME_C: [u8; 16] = [
    0, 0, 0, 255, 0, 0, 0, 255, //
    0, 0, 0, 255, 90, 0, 0, 255,
];

fn fold(layers: &[&[u8; 16]]) -> Vec<u8> {
    let mut acc = layers[0].to_vec();
    for layer in &layers[1..] {
        screen_in_place(&mut acc, layer.as_slice()).unwrap();
    }
    acc
}

#[test]
fn frame_pair_is_commutative() {
    assert_eq!(fold(&[&FRAME_A, &FRAME_B]), fold(&[&FRAME_B, &FRAME_A]));
    assert_eq!(fold(&[&FRAME_B, &FRAME_C]), fold(&[&FRAME_C, &FRAME_B]));
    assert_eq!(fold(&[&FRAME_A, &FRAME_C]), fold(&[&FRAME_C, &FRAME_A]));
}

#[test]
fn frame_fold_depends_on_order() {
    let forward = fold(&[&FRAME_A, &FRAME_B, &FRAME_C]);
    let backward = fold(&[&FRAME_C, &FRAME_B, &FRAME_A]);
    assert_ne!(forward, backward);
    assert_eq!(forward[..4], [128, 0, 0, 255]);
    assert_eq!(backward[..4], [255, 0, 0, 255]);
}

#[test]
fn in_place_applies_per_pixel() {
    let mut dst = vec![0, 0, 0, 255, 255, 0, 0, 128];
    let src = vec![100, 50, 0, 255, 0, 0, 0, 0];
    screen_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![100, 50, 0, 255, 128, 0, 0, 128]);
}

#[test]
fn in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(screen_in_place(&mut dst, &[0u8; 4]).is_err());
    let mut odd = vec![0u8; 6];
    assert!(screen_in_place(&mut odd, &[0u8; 6]).is_err());
}
