use super::*;
use crate::assets::store::{UniformMetrics, WidthRatios};
use crate::text::tokens::{CaseMode, GlyphCase, TokenPolicy, tokenize};

fn params(base: u32, spacing: f64, space: u32, width: u32) -> LayoutParameters {
    LayoutParameters::new(
        base,
        spacing,
        space,
        Canvas {
            width,
            height: 1080,
        },
    )
    .unwrap()
}

fn tokens(text: &str, case: CaseMode) -> Vec<TextToken> {
    tokenize(text, case, TokenPolicy::Strict).unwrap()
}

/// Advance sum computed independently of the engine, for uniform glyph widths.
fn advance_sum(tokens: &[TextToken], p: &LayoutParameters) -> i64 {
    let base = i64::from(p.base_char_size);
    let spacing = (base as f64 * p.spacing_factor).round() as i64;
    let glyphs = tokens
        .iter()
        .filter(|t| matches!(t, TextToken::Glyph(_)))
        .count() as i64;
    let spaces = tokens.len() as i64 - glyphs;
    glyphs * base + (glyphs - 1).max(0) * spacing + spaces * i64::from(p.space_width)
}

#[test]
fn parameters_are_validated() {
    let canvas = Canvas {
        width: 100,
        height: 100,
    };
    assert!(LayoutParameters::new(0, -0.5, 20, canvas).is_err());
    assert!(LayoutParameters::new(150, 0.1, 20, canvas).is_err());
    assert!(LayoutParameters::new(150, -1.1, 20, canvas).is_err());
    assert!(LayoutParameters::new(150, -0.5, 0, canvas).is_err());
    assert!(LayoutParameters::new(150, -1.0, 20, canvas).is_ok());
    assert!(LayoutParameters::new(150, 0.0, 20, canvas).is_ok());
}

#[test]
fn empty_tokens_have_no_layout() {
    assert!(layout(&[], &params(150, -0.7, 20, 1920), &UniformMetrics).is_none());
}

#[test]
fn hi_second_glyph_advances_by_size_plus_spacing() {
    let p = params(150, -0.7, 20, 1920);
    let out = layout(&tokens("Hi", CaseMode::Mixed), &p, &UniformMetrics).unwrap();

    let glyphs: Vec<_> = out.glyphs().collect();
    assert_eq!(glyphs.len(), 2);
    assert_eq!(glyphs[0].key.case, GlyphCase::Upper);
    assert_eq!(glyphs[1].key.case, GlyphCase::Lower);
    assert_eq!(glyphs[1].x, glyphs[0].x + 150 - 105);
    assert_eq!(glyphs[1].x, glyphs[0].x + 45);

    assert_eq!(out.total_width, 195);
    assert_eq!(glyphs[0].x, (1920 - 195) / 2);
    assert_eq!(glyphs[0].y, (1080 - 150) / 2);
    assert_eq!(out.scale, ScaleDecision::NONE);
}

#[test]
fn a_space_b_reserves_one_space_advance() {
    let p = params(150, -0.7, 20, 1920);
    let spaced = layout(&tokens("a b", CaseMode::Lower), &p, &UniformMetrics).unwrap();
    let tight = layout(&tokens("ab", CaseMode::Lower), &p, &UniformMetrics).unwrap();

    assert_eq!(spaced.slots.len(), 3);
    assert!(spaced.slots[1].is_none());
    assert_eq!(spaced.glyph_count(), 2);

    let s: Vec<_> = spaced.glyphs().map(|g| g.x).collect();
    let t: Vec<_> = tight.glyphs().map(|g| g.x).collect();
    // Relative to the first glyph, the space adds exactly 20.
    assert_eq!(s[1] - s[0], t[1] - t[0] + 20);

    // 150 + 20 - 105 + 150: no trailing spacing after the last glyph.
    assert_eq!(spaced.unscaled_width, 215);
    assert_eq!(spaced.glyphs().nth(1).map(|g| g.token_index), Some(2));
}

#[test]
fn single_glyph_has_no_spacing() {
    let p = params(150, -0.7, 20, 1920);
    let out = layout(&tokens("x", CaseMode::Lower), &p, &UniformMetrics).unwrap();
    assert_eq!(out.unscaled_width, 150);
    assert_eq!(out.glyphs().next().unwrap().x, (1920 - 150) / 2);
}

#[test]
fn space_only_tokens_place_nothing() {
    let p = params(150, -0.7, 20, 1920);
    let out = layout(&[TextToken::Space, TextToken::Space], &p, &UniformMetrics).unwrap();
    assert_eq!(out.glyph_count(), 0);
    assert_eq!(out.slots, vec![None, None]);
    assert_eq!(out.unscaled_width, 40);
}

#[test]
fn advance_sum_matches_total_width() {
    let p = params(120, -0.4, 33, 4000);
    for text in ["a", "ab", "a b", "Hello World", "a  b c 1 2 3", "Zz 9"] {
        let t = tokens(text, CaseMode::Mixed);
        let out = layout(&t, &p, &UniformMetrics).unwrap();
        assert_eq!(out.unscaled_width, advance_sum(&t, &p), "text {text:?}");
    }
}

#[test]
fn layout_is_idempotent() {
    let p = params(150, -0.7, 20, 1920);
    let t = tokens("Ouais Ouais", CaseMode::Mixed);
    let a = layout(&t, &p, &UniformMetrics);
    let b = layout(&t, &p, &UniformMetrics);
    assert_eq!(a, b);
}

#[test]
fn below_threshold_positions_are_unscaled() {
    let p = params(150, -0.7, 20, 1920);
    let t = tokens("abcd", CaseMode::Lower);
    let out = layout(&t, &p, &UniformMetrics).unwrap();

    assert_eq!(out.scale.factor, 1.0);
    assert!(!out.scale.is_scaled());
    let x0 = out.glyphs().next().unwrap().x;
    let rel: Vec<_> = out.glyphs().map(|g| g.x - x0).collect();
    assert_eq!(rel, vec![0, 45, 90, 135]);
    assert!(out.glyphs().all(|g| g.width == 150 && g.height == 150));
}

#[test]
fn forty_glyphs_overflow_and_scale_down() {
    let p = params(150, -0.7, 20, 1920);
    let t = vec![
        TextToken::Glyph(GlyphKey {
            case: GlyphCase::Lower,
            ch: 'a',
        });
        40
    ];
    let out = layout(&t, &p, &UniformMetrics).unwrap();

    assert_eq!(out.unscaled_width, 150 + 39 * 45);
    assert!(out.scale.factor < 1.0);
    assert_eq!(out.scale.factor, 1920.0 * OVERFLOW_THRESHOLD / 1905.0);
    assert!(out.total_width <= 1728);

    let first = out.glyphs().next().unwrap();
    let last = out.glyphs().last().unwrap();
    let extent = last.x + i64::from(last.width) - first.x;
    assert!(extent <= 1728 + 40, "extent {extent}");
    assert!(out.glyphs().all(|g| g.width == (150.0 * out.scale.factor) as u32));
    assert_eq!(first.x, (1920 - out.total_width).div_euclid(2));
}

#[test]
fn width_ratios_only_change_that_glyph_width() {
    let p = params(100, -0.5, 20, 1920);
    let t = tokens("mam", CaseMode::Lower);
    let out = layout(&t, &p, &WidthRatios::wide_mw()).unwrap();

    let glyphs: Vec<_> = out.glyphs().collect();
    assert_eq!(glyphs[0].width, 120);
    assert_eq!(glyphs[1].width, 100);
    assert_eq!(glyphs[2].width, 120);
    assert!(glyphs.iter().all(|g| g.height == 100));
    assert_eq!(glyphs[1].x - glyphs[0].x, 120 - 50);
    assert_eq!(glyphs[2].x - glyphs[1].x, 100 - 50);
    assert_eq!(out.unscaled_width, 120 + 100 + 120 - 2 * 50);
}

#[test]
fn scale_decision_is_exact_at_threshold() {
    assert_eq!(ScaleDecision::for_width(900, 1000), ScaleDecision::NONE);
    assert_eq!(ScaleDecision::for_width(0, 1000), ScaleDecision::NONE);
    let d = ScaleDecision::for_width(1800, 1000);
    assert_eq!(d.factor, 0.5);
    assert_eq!(d.apply(-105), -52);
    assert_eq!(d.apply(151), 75);
}
