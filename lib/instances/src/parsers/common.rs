use super::nom_prelude::*;

/// A single numeric CSV cell, surrounding blanks allowed.
pub fn cell<'a, E>(input: &'a str) -> IResult<&'a str, f64, E>
  where
    E: ParseError<&'a str>
{
  delimited(space0, double, space0)(input)
}

/// One comma separated row of cells.  Does not consume the line ending.
pub fn row<'a, E>(input: &'a str) -> IResult<&'a str, Vec<f64>, E>
  where
    E: ParseError<&'a str>
{
  separated_list1(char(','), cell)(input)
}

/// Rows separated by one or more line endings; leading and trailing blank lines are skipped.
pub fn rows<'a, E>(input: &'a str) -> IResult<&'a str, Vec<Vec<f64>>, E>
  where
    E: ParseError<&'a str>
{
  delimited(
    multispace0,
    separated_list0(multispace1, row),
    pair(multispace0, eof),
  )(input)
}
