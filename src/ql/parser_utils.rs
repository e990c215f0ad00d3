use nom::{bytes::complete::take_while1, combinator::all_consuming, IResult};

pub type QlResult<'a, T> = IResult<&'a str, T, nom::error::Error<&'a str>>;

/// Characters that may never appear in an attribute path.
pub const ATTR_PATH_FORBIDDEN: &[char] = &['&', '?', '/', '#', ';', '=', '<', '>', '!', '~'];

fn is_attr_path_char(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control() && !c.is_ascii_whitespace() && !ATTR_PATH_FORBIDDEN.contains(&c)
}

/// Attribute path such as `temperature` or `location.coordinates`.
pub fn attr_path(input: &str) -> QlResult<&str> {
    take_while1(is_attr_path_char)(input)
}

/// True if the whole input is a single attribute path.
pub fn is_attr_path(input: &str) -> bool {
    all_consuming(attr_path)(input).is_ok()
}
