use ::chrono::DateTime;
use ::chrono::FixedOffset;
use ::nom::bytes::complete::tag;
use ::nom::bytes::complete::take_while_m_n;
use ::nom::character::complete::char;
use ::nom::character::complete::one_of;
use ::nom::combinator::eof;
use ::nom::combinator::opt;
use ::nom::sequence::terminated;
use ::nom::sequence::tuple;
use ::nom::IResult;

/// REFERENCE: [7.9.4 Dates, p119]
/// `D:YYYYMMDDHHmmSSOHH'mm'`, where every field after the year is optional
/// and defaults to the start of its range, and a missing offset means UTC.
pub(crate) fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let (_, fields) = date(text).ok()?;
    let DateFields {
        year,
        month,
        day,
        hours,
        minutes,
        seconds,
        sign,
        offset_hours,
        offset_minutes,
    } = fields;
    let month = month.unwrap_or("01");
    let day = day.unwrap_or("01");
    let hours = hours.unwrap_or("00");
    let minutes = minutes.unwrap_or("00");
    let seconds = seconds.unwrap_or("00");
    let offset = match sign.unwrap_or('Z') {
        'Z' => "Z".to_string(),
        sign => format!(
            "{}{}:{}",
            sign,
            offset_hours.unwrap_or("00"),
            offset_minutes.unwrap_or("00")
        ),
    };
    let rfc3339 = format!("{year}-{month}-{day}T{hours}:{minutes}:{seconds}{offset}");
    DateTime::parse_from_rfc3339(&rfc3339).ok()
}

struct DateFields<'a> {
    year: &'a str,
    month: Option<&'a str>,
    day: Option<&'a str>,
    hours: Option<&'a str>,
    minutes: Option<&'a str>,
    seconds: Option<&'a str>,
    sign: Option<char>,
    offset_hours: Option<&'a str>,
    offset_minutes: Option<&'a str>,
}

fn two_digits(text: &str) -> IResult<&str, &str> {
    take_while_m_n(2, 2, |c: char| c.is_ascii_digit())(text)
}

fn date(text: &str) -> IResult<&str, DateFields> {
    let (text, (_, year, month, day, hours, minutes, seconds)) = tuple((
        tag("D:"),
        take_while_m_n(4, 4, |c: char| c.is_ascii_digit()),
        opt(two_digits),
        opt(two_digits),
        opt(two_digits),
        opt(two_digits),
        opt(two_digits),
    ))(text)?;
    let (text, (sign, offset_hours, _, offset_minutes, _)) = terminated(
        tuple((
            opt(one_of("+-Z")),
            opt(two_digits),
            opt(char('\'')),
            opt(two_digits),
            opt(char('\'')),
        )),
        eof,
    )(text)?;
    Ok((
        text,
        DateFields {
            year,
            month,
            day,
            hours,
            minutes,
            seconds,
            sign,
            offset_hours,
            offset_minutes,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc3339(text: &str) -> Option<String> {
        parse_date(text).map(|date| date.to_rfc3339())
    }

    #[test]
    fn parse_date_valid() {
        assert_eq!(
            rfc3339("D:20240131235958Z").as_deref(),
            Some("2024-01-31T23:59:58+00:00")
        );
        assert_eq!(
            rfc3339("D:19981223195200-08'00'").as_deref(),
            Some("1998-12-23T19:52:00-08:00")
        );
        assert_eq!(
            rfc3339("D:2001").as_deref(),
            Some("2001-01-01T00:00:00+00:00")
        );
        assert_eq!(
            rfc3339("D:200102+05").as_deref(),
            Some("2001-02-01T00:00:00+05:00")
        );
    }

    #[test]
    fn parse_date_invalid() {
        assert_eq!(rfc3339("2001"), None);
        assert_eq!(rfc3339("D:01"), None);
        assert_eq!(rfc3339("D:20011301"), None);
        assert_eq!(rfc3339("D:20010101 trailing"), None);
    }
}
