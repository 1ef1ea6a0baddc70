//! Tests for segment tokenization: coverage of the default alphabet,
//! span bookkeeping, hole interleaving, and lexical errors.

use quasipeg::{tokenize, Element, LexErrorKind, Position, Token, TokenPattern};

fn texts(stream: &[Element]) -> Vec<String> {
    stream
        .iter()
        .map(|e| match e {
            Element::Token(t) => t.text().to_string(),
            Element::Hole(k) => format!("<{k}>"),
        })
        .collect()
}

#[test]
fn default_alphabet_covers_all_token_classes() {
    let source = "let x = 1.5e-3; # sum\nname \"str\\\"ing\" :=+ [ ]";
    let stream = tokenize(&[source], TokenPattern::default_pattern()).unwrap();
    let rebuilt: String = stream
        .iter()
        .filter_map(Element::as_token)
        .map(Token::text)
        .collect();
    assert_eq!(rebuilt, source);

    let words = texts(&stream);
    assert!(words.contains(&"1.5e-3".to_string()));
    assert!(words.contains(&"# sum\n".to_string()));
    assert!(words.contains(&"\"str\\\"ing\"".to_string()));
    assert!(words.contains(&":=+".to_string()));
    assert!(words.contains(&"[".to_string()));
}

#[test]
fn number_formats() {
    let stream = tokenize(&["12 1.5 2e-3 1.5e6"], TokenPattern::default_pattern()).unwrap();
    let numbers: Vec<_> = stream
        .iter()
        .filter_map(Element::as_token)
        .filter(|t| t.text().starts_with(|c: char| c.is_ascii_digit()))
        .map(Token::text)
        .collect();
    assert_eq!(numbers, ["12", "1.5", "2e-3", "1.5e6"]);
}

#[test]
fn spans_are_contiguous_within_each_segment() {
    let segments = ["a + b", "x#c\ny", ""];
    let stream = tokenize(&segments, TokenPattern::default_pattern()).unwrap();
    let mut expected_start = vec![0u32; segments.len()];
    for element in &stream {
        if let Element::Token(token) = element {
            let segment = token.pos.segment as usize;
            assert_eq!(token.pos.start, expected_start[segment], "token {token}");
            expected_start[segment] = token.pos.end;
        }
    }
    for (segment, end) in expected_start.iter().enumerate() {
        assert_eq!(*end as usize, segments[segment].len());
    }
}

#[test]
fn hole_markers_appear_once_per_gap_in_order() {
    let segments = ["a", "", "b c", ""];
    let stream = tokenize(&segments, TokenPattern::default_pattern()).unwrap();
    let holes: Vec<u32> = stream.iter().filter_map(Element::hole).collect();
    assert_eq!(holes, [0, 1, 2]);

    // Hole markers sit between the tokens of their neighboring segments.
    let segments_seen: Vec<Option<u32>> = stream
        .iter()
        .map(|e| e.as_token().map(|t| t.pos.segment))
        .collect();
    let mut max_before = 0;
    for (i, element) in stream.iter().enumerate() {
        if let Element::Hole(k) = element {
            for seg in segments_seen[..i].iter().flatten() {
                assert!(*seg <= *k);
            }
            max_before = max_before.max(*k);
        } else if let Some(seg) = segments_seen[i] {
            assert!(seg >= max_before);
        }
    }
}

#[test]
fn printable_forms() {
    assert_eq!(Position::new(1, 2, 5).to_string(), "#1@2:5");
    let token = Token::new("if", Position::new(0, 4, 6));
    assert_eq!(token.to_string(), "\"if\" at 0@4:6");
}

#[test]
fn unclassifiable_bytes_are_a_lexical_error() {
    let err = tokenize(&["a b ` c"], TokenPattern::default_pattern()).unwrap_err();
    assert_eq!(err.pos.segment, 0);
    assert_eq!(err.pos.start, 4);
    assert!(matches!(err.kind, LexErrorKind::Unclassifiable { .. }));
}

#[test]
fn non_ascii_input_is_rejected_cleanly() {
    let err = tokenize(&["x €"], TokenPattern::default_pattern()).unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::Unclassifiable { .. }));
}

#[test]
fn unterminated_string_is_reported() {
    let err = tokenize(&["ok \"no end"], TokenPattern::default_pattern()).unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::UnterminatedString));
    assert_eq!(err.pos.start, 3);
}

#[test]
fn custom_token_pattern_is_honored() {
    // Only digits and spaces.
    let pattern = TokenPattern::new([r"\d+", r"\s+"]).unwrap();
    assert!(tokenize(&["1 2 3"], &pattern).is_ok());
    assert!(tokenize(&["1 x"], &pattern).is_err());
}
