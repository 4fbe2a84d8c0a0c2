//! Interactive selector prompts. Every prompt repeats until the answer parses; `None` means
//! input ended.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use bikeshare_explorer::processing::{DayFilter, MonthFilter};
use bikeshare_explorer::types::City;

/// Which selectors the user wants to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    Month,
    Day,
    Both,
    None,
}

impl FromStr for TimeFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(TimeFilter::Month),
            "day" => Ok(TimeFilter::Day),
            "both" => Ok(TimeFilter::Both),
            "none" => Ok(TimeFilter::None),
            _ => Err(()),
        }
    }
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask<R, W, T>(input: &mut R, out: &mut W, question: &str, invalid: &str) -> io::Result<Option<T>>
where
    R: BufRead,
    W: Write,
    T: FromStr,
{
    loop {
        writeln!(out, "{question}")?;
        out.flush()?;
        let Some(answer) = read_answer(input)? else {
            return Ok(None);
        };
        match answer.parse() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => writeln!(out, "{invalid}")?,
        }
    }
}

/// Ask for city, time filter, and the month/day it calls for.
pub fn get_filters<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<(City, MonthFilter, DayFilter)>> {
    writeln!(out, "Hello! Let's explore some US bikeshare data!")?;

    let Some(city) = ask::<_, _, City>(
        input,
        out,
        "Would you like to see data for Chicago, New York City, or Washington?",
        "Invalid input. Please enter a valid city name.",
    )?
    else {
        return Ok(None);
    };

    let Some(time_filter) = ask::<_, _, TimeFilter>(
        input,
        out,
        "Would you like to filter the data by month, day, both, or not at all? Type \"none\" for no time filter.",
        "Invalid input. Please enter a valid time filter or \"none\".",
    )?
    else {
        return Ok(None);
    };

    let month = match time_filter {
        TimeFilter::Month | TimeFilter::Both => match ask_month(input, out)? {
            Some(m) => m,
            None => return Ok(None),
        },
        TimeFilter::Day | TimeFilter::None => MonthFilter::All,
    };
    let day = match time_filter {
        TimeFilter::Day | TimeFilter::Both => match ask_day(input, out)? {
            Some(d) => d,
            None => return Ok(None),
        },
        TimeFilter::Month | TimeFilter::None => DayFilter::All,
    };

    Ok(Some((city, month, day)))
}

fn ask_month<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<MonthFilter>> {
    ask(
        input,
        out,
        "Which month? January, February, March, April, May, or June?",
        "Invalid input. Please enter a valid month name or \"all\".",
    )
}

fn ask_day<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<DayFilter>> {
    ask(
        input,
        out,
        "Which day? Please type a day of the week (e.g., Monday) or \"all\" to apply no day filter.",
        "Invalid input. Please enter a valid day name or \"all\".",
    )
}

/// `true` only for an explicit "yes".
pub fn ask_restart<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<bool> {
    writeln!(out, "\nWould you like to restart? Enter yes or no.")?;
    out.flush()?;
    Ok(read_answer(input)?.is_some_and(|a| a.eq_ignore_ascii_case("yes")))
}
