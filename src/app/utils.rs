// src/app/utils.rs: small presentation helpers for display records
use chrono::{Datelike, NaiveDate};

/// Parse the catalog's `YYYY-MM-DD` dates; blanks and junk are `None`.
pub(crate) fn parse_catalog_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// "October 15, 1999"
pub(crate) fn format_long_date(s: &str) -> Option<String> {
    parse_catalog_date(s).map(|d| d.format("%B %-d, %Y").to_string())
}

/// "2h 19m", or "45m" under an hour. Zero/negative runtimes mean unknown.
pub(crate) fn format_runtime(minutes: i32) -> Option<String> {
    if minutes <= 0 {
        return None;
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        Some(format!("{hours}h {mins}m"))
    } else {
        Some(format!("{mins}m"))
    }
}

fn year_prefix(s: &str) -> Option<&str> {
    let s = s.trim();
    let y = s.get(..4)?;
    y.chars().all(|c| c.is_ascii_digit()).then_some(y)
}

/// "2011 – Present", "2011 – 2019" or just "2011".
pub(crate) fn format_year_range(
    first_air: Option<&str>,
    last_air: Option<&str>,
    in_production: Option<bool>,
) -> Option<String> {
    let start = year_prefix(first_air?)?;
    if in_production == Some(true) {
        return Some(format!("{start} – Present"));
    }
    match last_air.and_then(year_prefix) {
        Some(end) if end != start => Some(format!("{start} – {end}")),
        _ => Some(start.to_string()),
    }
}

fn plural(n: i32, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// "8 Seasons · 73 Episodes"; zero counts are left out.
pub(crate) fn format_season_episodes(seasons: Option<i32>, episodes: Option<i32>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(n) = seasons.filter(|n| *n > 0) {
        parts.push(plural(n, "Season"));
    }
    if let Some(n) = episodes.filter(|n| *n > 0) {
        parts.push(plural(n, "Episode"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

/// Whole years between two dates.
pub(crate) fn years_between(from: NaiveDate, to: NaiveDate) -> Option<i32> {
    if to < from {
        return None;
    }
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    Some(years)
}

/// "34 years old" while alive, "Died at 61" otherwise.
pub(crate) fn format_age(birthday: Option<&str>, deathday: Option<&str>, today: NaiveDate) -> Option<String> {
    let born = parse_catalog_date(birthday?)?;
    match deathday.and_then(parse_catalog_date) {
        Some(died) => years_between(born, died).map(|age| format!("Died at {age}")),
        None => years_between(born, today).map(|age| format!("{age} years old")),
    }
}

/// Formatted birthday and birthplace joined with a middle dot.
pub(crate) fn format_birth_info(birthday: Option<&str>, place: Option<&str>) -> Option<String> {
    let parts: Vec<String> = [
        birthday.and_then(format_long_date),
        place
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn runtimes() {
        assert_eq!(format_runtime(139).as_deref(), Some("2h 19m"));
        assert_eq!(format_runtime(120).as_deref(), Some("2h 0m"));
        assert_eq!(format_runtime(45).as_deref(), Some("45m"));
        assert_eq!(format_runtime(0), None);
    }

    #[test]
    fn long_dates() {
        assert_eq!(format_long_date("1999-10-15").as_deref(), Some("October 15, 1999"));
        assert_eq!(format_long_date("2001-02-03").as_deref(), Some("February 3, 2001"));
        assert_eq!(format_long_date(""), None);
        assert_eq!(format_long_date("soon"), None);
    }

    #[test]
    fn year_ranges() {
        assert_eq!(
            format_year_range(Some("2011-04-17"), Some("2019-05-19"), Some(false)).as_deref(),
            Some("2011 – 2019")
        );
        assert_eq!(
            format_year_range(Some("2011-04-17"), None, Some(true)).as_deref(),
            Some("2011 – Present")
        );
        assert_eq!(
            format_year_range(Some("2020-01-01"), Some("2020-12-01"), None).as_deref(),
            Some("2020")
        );
        assert_eq!(format_year_range(Some("20"), None, None), None);
        assert_eq!(format_year_range(None, Some("2019-01-01"), None), None);
    }

    #[test]
    fn seasons_and_episodes() {
        assert_eq!(
            format_season_episodes(Some(8), Some(73)).as_deref(),
            Some("8 Seasons · 73 Episodes")
        );
        assert_eq!(
            format_season_episodes(Some(1), Some(1)).as_deref(),
            Some("1 Season · 1 Episode")
        );
        assert_eq!(format_season_episodes(Some(0), None), None);
    }

    #[test]
    fn ages() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            format_age(Some("1963-12-18"), None, today).as_deref(),
            Some("60 years old")
        );
        assert_eq!(
            format_age(Some("1963-05-01"), None, today).as_deref(),
            Some("61 years old")
        );
        assert_eq!(
            format_age(Some("1920-03-10"), Some("1990-03-09"), today).as_deref(),
            Some("Died at 69")
        );
        assert_eq!(format_age(None, None, today), None);
    }

    #[test]
    fn birth_info_joins_what_is_there() {
        assert_eq!(
            format_birth_info(Some("1963-12-18"), Some("Shawnee, Oklahoma, USA")).as_deref(),
            Some("December 18, 1963 · Shawnee, Oklahoma, USA")
        );
        assert_eq!(format_birth_info(None, Some("  ")), None);
        assert_eq!(
            format_birth_info(Some("bad"), Some("Paris")).as_deref(),
            Some("Paris")
        );
    }
}
