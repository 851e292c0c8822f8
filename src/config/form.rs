use crate::domain::model::{BirthSubmission, Locale, MIN_BIRTH_YEAR};
use crate::utils::error::{FortuneError, Result};
use crate::utils::validation::validate_range;
use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};
use std::io::{BufRead, Write};

const DEFAULT_YEAR: i32 = 1990;
const DEFAULT_MONTH: u32 = 1;
const DEFAULT_DAY: u32 = 1;

/// `HH:MM` 或 `HH:MM:SS`
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| FortuneError::validation("time", format!("'{}' is not HH:MM or HH:MM:SS", value)))
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Year,
    Month,
    Day,
    Time,
    Place,
}

impl Field {
    fn prompt(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Ko, Self::Year) => "태어난 연도를 입력하세요",
            (Locale::Ko, Self::Month) => "태어난 월을 입력하세요",
            (Locale::Ko, Self::Day) => "태어난 일을 입력하세요",
            (Locale::Ko, Self::Time) => "태어난 시간을 입력하세요 (HH:MM)",
            (Locale::Ko, Self::Place) => "태어난 장소를 입력하세요 (도시, 국가)",
            (Locale::En, Self::Year) => "Enter your birth year",
            (Locale::En, Self::Month) => "Enter your birth month",
            (Locale::En, Self::Day) => "Enter your birth day",
            (Locale::En, Self::Time) => "Enter your birth time (HH:MM)",
            (Locale::En, Self::Place) => "Enter your birth place (city, country)",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Time => "time",
            Self::Place => "place",
        }
    }
}

/// The five form inputs. Anything left as `None` is prompted for, or
/// defaulted when prompting is disabled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BirthForm {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub time: Option<NaiveTime>,
    pub place: Option<String>,
}

fn check_year(year: i32, now: DateTime<Utc>) -> Result<i32> {
    validate_range("year", year, MIN_BIRTH_YEAR, now.year())?;
    Ok(year)
}

fn check_month(month: u32) -> Result<u32> {
    validate_range("month", month, 1, 12)?;
    Ok(month)
}

fn check_day(day: u32) -> Result<u32> {
    validate_range("day", day, 1, 31)?;
    Ok(day)
}

fn parse_number<T: std::str::FromStr>(field: Field, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| FortuneError::validation(field.key(), format!("'{}' is not a number", raw)))
}

struct Prompter<'a, R: BufRead, W: Write> {
    input: &'a mut R,
    output: &'a mut W,
    locale: Locale,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    /// Asks until `accept` succeeds. An empty answer takes `default`.
    fn ask<T, F>(&mut self, field: Field, default: &str, accept: F) -> Result<T>
    where
        F: Fn(&str) -> Result<T>,
    {
        loop {
            write!(self.output, "{} [{}]: ", field.prompt(self.locale), default)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(FortuneError::validation(field.key(), "input ended before a value was given"));
            }

            let answer = match line.trim() {
                "" => default,
                other => other,
            };

            match accept(answer) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "❌ {}", e)?,
            }
        }
    }
}

impl BirthForm {
    /// Fills missing fields and range-checks every value. The calendar
    /// validity of the date is left to the session.
    pub fn complete<R: BufRead, W: Write>(
        self,
        input: &mut R,
        output: &mut W,
        now: DateTime<Utc>,
        interactive: bool,
        locale: Locale,
    ) -> Result<BirthSubmission> {
        let current_time = now.time().with_nanosecond(0).unwrap_or_else(|| now.time());
        let mut prompter = Prompter {
            input,
            output,
            locale,
        };

        let year = match self.year {
            Some(year) => check_year(year, now)?,
            None if interactive => prompter.ask(Field::Year, &DEFAULT_YEAR.to_string(), |raw| {
                check_year(parse_number(Field::Year, raw)?, now)
            })?,
            None => return Err(FortuneError::validation("year", "birth year is required")),
        };

        let month = match self.month {
            Some(month) => check_month(month)?,
            None if interactive => prompter.ask(Field::Month, &DEFAULT_MONTH.to_string(), |raw| {
                check_month(parse_number(Field::Month, raw)?)
            })?,
            None => return Err(FortuneError::validation("month", "birth month is required")),
        };

        let day = match self.day {
            Some(day) => check_day(day)?,
            None if interactive => prompter.ask(Field::Day, &DEFAULT_DAY.to_string(), |raw| {
                check_day(parse_number(Field::Day, raw)?)
            })?,
            None => return Err(FortuneError::validation("day", "birth day is required")),
        };

        // 未輸入時間時預設為目前的 UTC 時間
        let time = match self.time {
            Some(time) => time,
            None if interactive => {
                prompter.ask(Field::Time, &current_time.format("%H:%M").to_string(), parse_time)?
            }
            None => current_time,
        };

        let place = match self.place {
            Some(place) => place,
            None if interactive => prompter.ask(Field::Place, "", |raw| Ok(raw.to_string()))?,
            None => String::new(),
        };

        Ok(BirthSubmission {
            year,
            month,
            day,
            time,
            place,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Cursor;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 9, 30, 15).unwrap()
    }

    fn run(form: BirthForm, answers: &str, interactive: bool) -> (Result<BirthSubmission>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = form.complete(&mut input, &mut output, now(), interactive, Locale::En);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("07:05").unwrap(), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
        assert_eq!(
            parse_time(" 23:59:58 ").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 58).unwrap()
        );
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_prompts_for_every_field() {
        let (result, output) = run(BirthForm::default(), "1990\n6\n15\n12:00\nSeoul, South Korea\n", true);
        let submission = result.unwrap();

        assert_eq!(submission.year, 1990);
        assert_eq!(submission.month, 6);
        assert_eq!(submission.day, 15);
        assert_eq!(submission.time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(submission.place, "Seoul, South Korea");
        assert!(output.contains("Enter your birth year [1990]: "));
        assert!(output.contains("Enter your birth time (HH:MM) [09:30]: "));
    }

    #[test]
    fn test_out_of_range_answers_are_asked_again() {
        let (result, output) = run(BirthForm::default(), "1899\n2025\n2000\n13\n0\n2\n32\n29\n\n\n", true);
        let submission = result.unwrap();

        assert_eq!(submission.year, 2000);
        assert_eq!(submission.month, 2);
        assert_eq!(submission.day, 29);
        assert_eq!(submission.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(submission.place, "");
        assert_eq!(output.matches("❌").count(), 5);
    }

    #[test]
    fn test_blank_answers_take_defaults() {
        let (result, _) = run(BirthForm::default(), "\n\n\n\nBusan\n", true);
        let submission = result.unwrap();
        assert_eq!((submission.year, submission.month, submission.day), (1990, 1, 1));
        assert_eq!(submission.place, "Busan");
    }

    #[test]
    fn test_given_fields_are_not_prompted() {
        let form = BirthForm {
            year: Some(1985),
            month: Some(12),
            day: Some(22),
            time: None,
            place: Some("Tokyo".to_string()),
        };
        let (result, output) = run(form, "", false);
        let submission = result.unwrap();

        assert!(output.is_empty());
        assert_eq!(submission.time, NaiveTime::from_hms_opt(9, 30, 15).unwrap());
        assert_eq!(submission.place, "Tokyo");
    }

    #[test]
    fn test_non_interactive_requires_date() {
        let form = BirthForm {
            year: Some(1985),
            ..BirthForm::default()
        };
        let (result, _) = run(form, "", false);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("month"));
    }

    #[test]
    fn test_cli_value_out_of_range_fails() {
        let form = BirthForm {
            year: Some(2031),
            ..BirthForm::default()
        };
        assert!(run(form, "", true).0.is_err());
    }

    #[test]
    fn test_input_ending_early_fails() {
        let (result, _) = run(BirthForm::default(), "1990\n", true);
        assert!(result.is_err());
    }

    #[test]
    fn test_form_does_not_check_calendar_validity() {
        let form = BirthForm {
            year: Some(1990),
            month: Some(2),
            day: Some(30),
            time: Some(NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
            place: Some(String::new()),
        };
        assert!(run(form, "", false).0.is_ok());
    }
}
