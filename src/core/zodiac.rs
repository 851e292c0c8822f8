use crate::domain::model::ZodiacSign;

/// (start, end) inclusive, as (month, day). Capricorn wraps the year end.
const SIGN_RANGES: [((u32, u32), (u32, u32), ZodiacSign); 13] = [
    ((1, 1), (1, 19), ZodiacSign::Capricorn),
    ((1, 20), (2, 18), ZodiacSign::Aquarius),
    ((2, 19), (3, 20), ZodiacSign::Pisces),
    ((3, 21), (4, 19), ZodiacSign::Aries),
    ((4, 20), (5, 20), ZodiacSign::Taurus),
    ((5, 21), (6, 20), ZodiacSign::Gemini),
    ((6, 21), (7, 22), ZodiacSign::Cancer),
    ((7, 23), (8, 22), ZodiacSign::Leo),
    ((8, 23), (9, 22), ZodiacSign::Virgo),
    ((9, 23), (10, 22), ZodiacSign::Libra),
    ((10, 23), (11, 21), ZodiacSign::Scorpio),
    ((11, 22), (12, 21), ZodiacSign::Sagittarius),
    ((12, 22), (12, 31), ZodiacSign::Capricorn),
];

/// Sun sign for a calendar day. `Unknown` when no range matches
/// (month or day out of range).
pub fn zodiac_sign(month: u32, day: u32) -> ZodiacSign {
    SIGN_RANGES
        .iter()
        .find(|(start, end, _)| (*start..=*end).contains(&(month, day)))
        .map(|(_, _, sign)| *sign)
        .unwrap_or(ZodiacSign::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, NaiveDate};

    #[test]
    fn test_every_day_of_leap_year_has_a_sign() {
        let mut date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let mut transitions = 0;
        let mut previous = zodiac_sign(1, 1);

        while date.year() == 2000 {
            let sign = zodiac_sign(date.month(), date.day());
            assert_ne!(sign, ZodiacSign::Unknown, "no sign for {}", date);
            if sign != previous {
                transitions += 1;
                previous = sign;
            }
            date += Duration::days(1);
        }

        // Capricorn → Aquarius ... Sagittarius → Capricorn
        assert_eq!(transitions, 12);
    }

    #[test]
    fn test_known_days() {
        assert_eq!(zodiac_sign(1, 1), ZodiacSign::Capricorn);
        assert_eq!(zodiac_sign(3, 21), ZodiacSign::Aries);
        assert_eq!(zodiac_sign(6, 15), ZodiacSign::Gemini);
        assert_eq!(zodiac_sign(12, 31), ZodiacSign::Capricorn);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(zodiac_sign(1, 19), ZodiacSign::Capricorn);
        assert_eq!(zodiac_sign(1, 20), ZodiacSign::Aquarius);
        assert_eq!(zodiac_sign(12, 21), ZodiacSign::Sagittarius);
        assert_eq!(zodiac_sign(12, 22), ZodiacSign::Capricorn);
        assert_eq!(zodiac_sign(2, 29), ZodiacSign::Pisces);
    }

    #[test]
    fn test_out_of_range_is_unknown() {
        assert_eq!(zodiac_sign(13, 1), ZodiacSign::Unknown);
        assert_eq!(zodiac_sign(0, 10), ZodiacSign::Unknown);
        assert_eq!(zodiac_sign(12, 32), ZodiacSign::Unknown);
    }
}
