//! Time-range parsing for schedule expressions
//!
//! Only the `after <time>` and `before <time>` clauses matter for deciding
//! whether a window wraps midnight; every other word is skipped.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_till1, take_while_m_n},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, eof, map, map_opt, map_res, opt, peek, value},
    multi::separated_list0,
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult,
};

type Error<'a> = nom::error::Error<&'a str>;

const SECONDS_PER_HOUR: u32 = 3600;
const SECONDS_PER_MINUTE: u32 = 60;

/// `am` / `pm` suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Meridiem {
    Am,
    Pm,
}

/// Time of day, in seconds since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct TimeOfDay(u32);

impl TimeOfDay {
    /// Build from a wall-clock reading
    ///
    /// Without a meridiem the hour is read on a 24-hour clock. With one,
    /// the hour must be 1..=12 and `12am` is midnight.
    #[must_use]
    pub(crate) fn from_clock(hour: u32, minute: u32, meridiem: Option<Meridiem>) -> Option<Self> {
        if minute > 59 {
            return None;
        }
        let hour = match meridiem {
            None if hour <= 23 => hour,
            None => return None,
            Some(_) if !(1..=12).contains(&hour) => return None,
            Some(Meridiem::Am) => hour % 12,
            Some(Meridiem::Pm) => hour % 12 + 12,
        };
        Some(Self(hour * SECONDS_PER_HOUR + minute * SECONDS_PER_MINUTE))
    }
}

/// Which side of a window a clause bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    After,
    Before,
}

/// Window described by a schedule expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TimeWindow {
    pub(crate) after: Option<TimeOfDay>,
    pub(crate) before: Option<TimeOfDay>,
}

impl TimeWindow {
    /// Check if the window starts later in the day than it ends
    #[must_use]
    pub(crate) fn wraps_midnight(&self) -> bool {
        matches!((self.after, self.before), (Some(after), Some(before)) if after > before)
    }
}

/// One or two decimal digits
fn number(input: &str) -> IResult<&str, u32, Error<'_>> {
    map_res(take_while_m_n(1, 2, |c: char| c.is_ascii_digit()), |digits: &str| {
        digits.parse::<u32>()
    })(input)
}

fn minutes(input: &str) -> IResult<&str, u32, Error<'_>> {
    preceded(char(':'), number)(input)
}

fn meridiem(input: &str) -> IResult<&str, Meridiem, Error<'_>> {
    alt((
        value(Meridiem::Am, tag_no_case("am")),
        value(Meridiem::Pm, tag_no_case("pm")),
    ))(input)
}

/// `10`, `10pm`, `10:30`, `10:30 pm`
fn clock_time(input: &str) -> IResult<&str, TimeOfDay, Error<'_>> {
    terminated(
        map_opt(
            tuple((number, opt(minutes), opt(preceded(multispace0, meridiem)))),
            |(hour, minute, meridiem)| TimeOfDay::from_clock(hour, minute.unwrap_or(0), meridiem),
        ),
        peek(alt((multispace1, eof))),
    )(input)
}

fn boundary(input: &str) -> IResult<&str, Boundary, Error<'_>> {
    alt((
        value(Boundary::After, tag_no_case("after")),
        value(Boundary::Before, tag_no_case("before")),
    ))(input)
}

fn clause(input: &str) -> IResult<&str, (Boundary, TimeOfDay), Error<'_>> {
    separated_pair(boundary, multispace1, clock_time)(input)
}

fn word(input: &str) -> IResult<&str, &str, Error<'_>> {
    take_till1(char::is_whitespace)(input)
}

fn token(input: &str) -> IResult<&str, Option<(Boundary, TimeOfDay)>, Error<'_>> {
    alt((map(clause, Some), value(None, word)))(input)
}

fn expression(input: &str) -> IResult<&str, Vec<Option<(Boundary, TimeOfDay)>>, Error<'_>> {
    all_consuming(delimited(
        multispace0,
        separated_list0(multispace1, token),
        multispace0,
    ))(input)
}

/// Extract the after/before window of a schedule expression
///
/// The first clause of each kind wins. Returns `None` if the text cannot be
/// tokenized.
#[must_use]
pub(crate) fn parse_time_window(text: &str) -> Option<TimeWindow> {
    let (_, tokens) = expression(text).ok()?;
    let mut window = TimeWindow::default();
    for (boundary, time) in tokens.into_iter().flatten() {
        let slot = match boundary {
            Boundary::After => &mut window.after,
            Boundary::Before => &mut window.before,
        };
        slot.get_or_insert(time);
    }
    Some(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_time_of_day(text: &str) -> Option<TimeOfDay> {
        all_consuming(delimited(multispace0, clock_time, multispace0))(text)
            .ok()
            .map(|(_, time)| time)
    }

    fn hours(h: u32) -> Option<TimeOfDay> {
        TimeOfDay::from_clock(h, 0, None)
    }

    #[test]
    fn clock_conversions() {
        assert_eq!(TimeOfDay::from_clock(12, 0, Some(Meridiem::Am)), hours(0));
        assert_eq!(TimeOfDay::from_clock(12, 0, Some(Meridiem::Pm)), hours(12));
        assert_eq!(TimeOfDay::from_clock(10, 0, Some(Meridiem::Pm)), hours(22));
        assert_eq!(TimeOfDay::from_clock(13, 0, Some(Meridiem::Pm)), None);
        assert_eq!(TimeOfDay::from_clock(0, 0, Some(Meridiem::Am)), None);
        assert_eq!(TimeOfDay::from_clock(24, 0, None), None);
        assert_eq!(TimeOfDay::from_clock(9, 60, None), None);
        assert_eq!(TimeOfDay::from_clock(9, 30, None), Some(TimeOfDay(34_200)));
    }

    #[test]
    fn lone_times() {
        assert_eq!(parse_time_of_day("10pm"), hours(22));
        assert_eq!(parse_time_of_day("10:00PM"), hours(22));
        assert_eq!(parse_time_of_day("5:30 am"), TimeOfDay::from_clock(5, 30, None));
        assert_eq!(parse_time_of_day("17"), hours(17));
        assert_eq!(parse_time_of_day("10pmish"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn wrapping_window() {
        let window = parse_time_window("after 10:00pm and before 5:00am").unwrap();
        assert_eq!(window.after, hours(22));
        assert_eq!(window.before, hours(5));
        assert!(window.wraps_midnight());
    }

    #[test]
    fn daytime_window_does_not_wrap() {
        let window = parse_time_window("after 9am and before 5pm every weekday").unwrap();
        assert!(!window.wraps_midnight());
    }

    #[test]
    fn words_without_times_are_skipped() {
        let window = parse_time_window("after work and before 6am").unwrap();
        assert_eq!(window.after, None);
        assert_eq!(window.before, hours(6));
        assert!(!window.wraps_midnight());
    }

    #[test]
    fn first_clause_of_each_kind_wins() {
        let window = parse_time_window("after 11pm after 1am before 4am").unwrap();
        assert_eq!(window.after, hours(23));
    }

    #[test]
    fn blank_expression_has_no_window() {
        assert_eq!(parse_time_window("   "), Some(TimeWindow::default()));
    }
}
