use itertools::Itertools;
use jack::{tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    match tokenize(source) {
        Ok(tokens) => tokens.into_iter().map(|token| token.kind).collect(),
        Err(err) => panic!("{}", err),
    }
}

/// Rebuild source text from tokens, without trivia.
fn reconstruct(kinds: &[TokenKind]) -> String {
    kinds.iter().map(TokenKind::to_source).join(" ")
}

#[test]
fn test_round_trip_counter() {
    let original = kinds(include_str!("fixtures/Counter.jack"));
    let reconstructed = reconstruct(&original);

    assert_eq!(kinds(&reconstructed), original);
    // Reconstructing again is stable.
    assert_eq!(reconstruct(&kinds(&reconstructed)), reconstructed);
}

#[test]
fn test_round_trip_main() {
    let original = kinds(include_str!("fixtures/Main.jack"));
    assert_eq!(kinds(&reconstruct(&original)), original);
}

#[test]
fn test_trivia_is_not_tokenized() {
    let with_trivia = kinds("/** doc */ let x = 1; // done\n");
    let without = kinds("let x=1;");
    assert_eq!(with_trivia, without);
}
