//! Two-letter coordinate tokens.
//!
//! Each axis index maps to one letter: `a`=0 .. `z`=25, `A`=26 .. `Z`=51.
//! A pass is the point `(size, size)`, so a board of size `n` needs the
//! letters for `0..=n`.

use crate::Point;

use super::error::SgfError;

/// Largest board whose pass sentinel still has a letter.
pub const MAX_BOARD_SIZE: u8 = 51;

pub fn index_to_letter(c: u8) -> Result<char, SgfError> {
    match c {
        0..=25 => Ok((b'a' + c) as char),
        26..=51 => Ok((b'A' + c - 26) as char),
        _ => Err(SgfError::UnencodableIndex(c)),
    }
}

pub fn letter_to_index(ch: char) -> Result<u8, SgfError> {
    match ch {
        'a'..='z' => Ok(ch as u8 - b'a'),
        'A'..='Z' => Ok(ch as u8 - b'A' + 26),
        _ => Err(SgfError::InvalidToken(ch.to_string())),
    }
}

/// Encode `(x, y)` as a token, X letter first.
pub fn coordinate_to_token(point: Point) -> Result<String, SgfError> {
    let mut token = String::with_capacity(2);
    token.push(index_to_letter(point.0)?);
    token.push(index_to_letter(point.1)?);
    Ok(token)
}

/// Decode a two-letter token like `"cd"` into `(2, 3)`.
pub fn token_to_coordinate(token: &str) -> Result<Point, SgfError> {
    let mut chars = token.chars();
    let (Some(x), Some(y), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(SgfError::InvalidToken(token.to_string()));
    };
    Ok((letter_to_index(x)?, letter_to_index(y)?))
}

pub fn pass_point(board_size: u8) -> Point {
    (board_size, board_size)
}

pub fn is_pass(point: Point, board_size: u8) -> bool {
    point == pass_point(board_size)
}

pub fn on_board((x, y): Point, board_size: u8) -> bool {
    x < board_size && y < board_size
}
