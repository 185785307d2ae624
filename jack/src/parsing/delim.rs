//! Delimited lists.
use super::{Parse, Parser};
use crate::{error::ParseError, tokens::Span};
use smol_str::SmolStr;

/// Parse a possibly empty, comma separated list.
///
/// The item production `P` does the lookahead: it returns `None` when
/// the current token can't start an item, which ends an empty list.
/// A comma that isn't followed by an item is reported with `on_missing`.
pub fn comma_separated<P, T>(
    input: &mut Parser,
    on_missing: fn(Span) -> ParseError,
) -> Result<Vec<T>, ParseError>
where
    P: Parse<Output = Option<T>>,
{
    let mut items = vec![];

    if let Some(item) = P::parse(input)? {
        items.push(item);

        while input.check_symbol(',') {
            let span = input.current_span();
            input.next_token();

            match P::parse(input)? {
                Some(item) => items.push(item),
                None => return Err(on_missing(span)),
            }
        }
    }

    Ok(items)
}

/// Parse a non-empty, comma separated list of names.
///
/// ```text
/// ID (',' ID)*
/// ```
pub fn ident_list(input: &mut Parser) -> Result<Vec<SmolStr>, ParseError> {
    let mut names = vec![input.expect_ident()?];
    while input.match_symbol(',') {
        names.push(input.expect_ident()?);
    }
    Ok(names)
}
