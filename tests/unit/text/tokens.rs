use super::*;

fn key(case: GlyphCase, ch: char) -> GlyphKey {
    GlyphKey { case, ch }
}

#[test]
fn mixed_case_keeps_input_case() {
    let tokens = tokenize("Hi", CaseMode::Mixed, TokenPolicy::Strict).unwrap();
    assert_eq!(
        tokens,
        vec![
            TextToken::Glyph(key(GlyphCase::Upper, 'h')),
            TextToken::Glyph(key(GlyphCase::Lower, 'i')),
        ]
    );
}

#[test]
fn case_modes_map_every_letter() {
    let upper = tokenize("ab", CaseMode::Upper, TokenPolicy::Strict).unwrap();
    assert!(upper.iter().all(
        |t| matches!(t, TextToken::Glyph(GlyphKey { case: GlyphCase::Upper, .. }))
    ));

    let lower = tokenize("AB", CaseMode::Lower, TokenPolicy::Strict).unwrap();
    assert!(lower.iter().all(
        |t| matches!(t, TextToken::Glyph(GlyphKey { case: GlyphCase::Lower, .. }))
    ));
}

#[test]
fn spaces_and_digits_are_tokens() {
    let tokens = tokenize("a 7", CaseMode::Upper, TokenPolicy::Strict).unwrap();
    assert_eq!(
        tokens,
        vec![
            TextToken::Glyph(key(GlyphCase::Upper, 'a')),
            TextToken::Space,
            TextToken::Glyph(key(GlyphCase::Lower, '7')),
        ]
    );
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let tokens = tokenize("  a  ", CaseMode::Mixed, TokenPolicy::Strict).unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(tokenize("   ", CaseMode::Mixed, TokenPolicy::Strict)
        .unwrap()
        .is_empty());
}

#[test]
fn strict_policy_rejects_unsupported_character() {
    let err = tokenize("a$b", CaseMode::Lower, TokenPolicy::Strict).unwrap_err();
    assert!(matches!(
        err,
        GlyphReelError::UnsupportedCharacter { ch: '$', index: 1 }
    ));
}

#[test]
fn lenient_policy_drops_unsupported_character() {
    let tokens = tokenize("a$b", CaseMode::Lower, TokenPolicy::Lenient).unwrap();
    assert_eq!(
        tokens,
        vec![
            TextToken::Glyph(key(GlyphCase::Lower, 'a')),
            TextToken::Glyph(key(GlyphCase::Lower, 'b')),
        ]
    );
}

#[test]
fn stems_round_trip_through_keys() {
    let k = GlyphKey::from_stem("upper_a").unwrap();
    assert_eq!(k, key(GlyphCase::Upper, 'a'));
    assert_eq!(k.stem(), "upper_a");
    assert_eq!(k.clip_file_name(), "a.mp4");

    assert_eq!(GlyphKey::from_stem("upper_A"), Some(key(GlyphCase::Upper, 'a')));
    assert!(GlyphKey::from_stem("title_a").is_none());
    assert!(GlyphKey::from_stem("lower_ab").is_none());
    assert!(GlyphKey::from_stem("lower_").is_none());
}

#[test]
fn multi_char_lowercase_letters_have_no_key() {
    assert!(GlyphKey::for_char('İ').is_none());

    let err = tokenize("aİ", CaseMode::Mixed, TokenPolicy::Strict).unwrap_err();
    assert!(matches!(
        err,
        GlyphReelError::UnsupportedCharacter { ch: 'İ', index: 1 }
    ));

    let tokens = tokenize("aİ", CaseMode::Mixed, TokenPolicy::Lenient).unwrap();
    assert_eq!(tokens, vec![TextToken::Glyph(key(GlyphCase::Lower, 'a'))]);
}
