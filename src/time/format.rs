use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A compiled date/time pattern.
///
/// Patterns may be written Java-style (`yyyy-MM-dd'T'HH:mm:ss`) as most
/// templates do, or directly in strftime syntax when they contain a `%`.
///
/// Time fields the pattern leaves out default the way Java does: missing
/// minutes are `00` and a 12-hour clock without an AM/PM marker reads as AM.
/// A pattern with no time fields at all resolves to midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat {
    pattern: String,
    strftime: String,
    has_offset: bool,
    date_only: bool,
    fill_format: String,
    fill_text: String,
}

impl TimeFormat {
    /// Compile a pattern, translating Java-style letters when needed
    pub fn new(pattern: &str) -> Result<Self, String> {
        if pattern.trim().is_empty() {
            return Err("empty pattern".to_string());
        }
        let strftime = if pattern.contains('%') {
            pattern.to_string()
        } else {
            translate_java_pattern(pattern)?
        };

        let fields = specifiers(&strftime);
        let has = |letters: &str| fields.iter().any(|c| letters.contains(*c));
        let has_offset = has("z");
        let hour_24 = has("HkTRXc");
        let hour_12 = has("Ilr");
        let minute = has("MTRXrc");
        let epoch = has("s");
        let date_only = !(hour_24 || hour_12 || minute || epoch || has("SpP"));

        let mut fill_format = String::new();
        let mut fill_text = String::new();
        if !date_only && !epoch {
            if !hour_24 && !hour_12 {
                fill_format.push_str(" %H");
                fill_text.push_str(" 00");
            }
            if hour_12 && !has("pPr") {
                fill_format.push_str(" %p");
                fill_text.push_str(" AM");
            }
            if !minute {
                fill_format.push_str(" %M");
                fill_text.push_str(" 00");
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
            has_offset,
            date_only,
            fill_format,
            fill_text,
        })
    }

    /// The pattern as written by the user
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The equivalent strftime pattern
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Whether the pattern carries no time of day
    pub fn is_date_only(&self) -> bool {
        self.date_only
    }

    /// Parse text into seconds since the Unix epoch.
    ///
    /// Timestamps without an offset are taken as UTC; date-only patterns
    /// resolve to midnight.
    pub fn parse_epoch_seconds(&self, text: &str) -> Result<i64, chrono::ParseError> {
        let text = text.trim();
        if self.date_only {
            let date = NaiveDate::parse_from_str(text, &self.strftime)?;
            return Ok(date.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp()));
        }

        let format = format!("{}{}", self.strftime, self.fill_format);
        if self.has_offset {
            let normalized = match text.strip_suffix('Z') {
                Some(head) => format!("{}+00:00{}", head, self.fill_text),
                None => format!("{}{}", text, self.fill_text),
            };
            return DateTime::parse_from_str(&normalized, &format).map(|dt| dt.timestamp());
        }
        let completed = format!("{}{}", text, self.fill_text);
        NaiveDateTime::parse_from_str(&completed, &format).map(|dt| dt.and_utc().timestamp())
    }
}

/// Conversion letters of a strftime pattern, flags and widths stripped
fn specifiers(strftime: &str) -> Vec<char> {
    let mut found = Vec::new();
    let mut chars = strftime.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        for next in chars.by_ref() {
            if next.is_ascii_alphabetic() || next == '%' {
                found.push(next);
                break;
            }
        }
    }
    found
}

/// Translate a Java `SimpleDateFormat`-style pattern into strftime syntax
fn translate_java_pattern(pattern: &str) -> Result<String, String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            // '' is a literal quote, otherwise copy until the closing quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            if i >= chars.len() {
                return Err(format!("unterminated quote in '{}'", pattern));
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        let spec = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) | ('u', _) => "%Y",
            ('M', 1) | ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('D', _) => "%j",
            ('H', _) | ('k', _) => "%H",
            ('h', _) | ('K', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            // ".S" accepts any number of fraction digits
            ('S', _) if out.ends_with('.') => {
                out.pop();
                "%.f"
            }
            ('S', 1..=3) => "%3f",
            ('S', 4..=6) => "%6f",
            ('S', _) => "%9f",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('a', _) => "%p",
            ('Z', _) | ('X', 2) => "%z",
            ('X', 1) => "%#z",
            ('X', _) => "%:z",
            _ => {
                return Err(format!(
                    "unsupported pattern letter '{}' in '{}'",
                    c, pattern
                ))
            }
        };
        out.push_str(spec);
        i += run;
    }
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_common_patterns() {
        assert_eq!(
            translate_java_pattern("yyyy-MM-dd'T'HH:mm:ss").unwrap(),
            "%Y-%m-%dT%H:%M:%S"
        );
        assert_eq!(translate_java_pattern("dd/MM/yy").unwrap(), "%d/%m/%y");
        assert_eq!(translate_java_pattern("HH:mm:ss.SSS").unwrap(), "%H:%M:%S%.f");
        assert_eq!(translate_java_pattern("HHmmssSSS").unwrap(), "%H%M%S%3f");
        assert_eq!(translate_java_pattern("dd MMM yyyy").unwrap(), "%d %b %Y");
        assert_eq!(translate_java_pattern("h 'o''clock' a").unwrap(), "%I o'clock %p");
        assert!(translate_java_pattern("yyyy G").is_err());
        assert!(translate_java_pattern("'open").is_err());
    }

    #[test]
    fn test_parse_full_datetime() {
        let format = TimeFormat::new("yyyy-MM-dd'T'HH:mm:ss").unwrap();
        assert_eq!(format.parse_epoch_seconds("1970-01-01T00:01:00").unwrap(), 60);
        assert_eq!(
            format.parse_epoch_seconds("2020-01-01T01:00:00").unwrap(),
            1_577_840_400
        );
        assert!(format.parse_epoch_seconds("2020-13-01T00:00:00").is_err());
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let format = TimeFormat::new("yyyyMMdd").unwrap();
        assert_eq!(format.parse_epoch_seconds("19700102").unwrap(), 86_400);
    }

    #[test]
    fn test_hour_without_minutes_keeps_hour() {
        let format = TimeFormat::new("yyyy-MM-dd HH").unwrap();
        assert!(!format.is_date_only());
        assert_eq!(format.parse_epoch_seconds("2020-01-01 05").unwrap(), 1_577_854_800);
    }

    #[test]
    fn test_twelve_hour_clock_without_marker_is_morning() {
        let format = TimeFormat::new("yyyy-MM-dd hh:mm").unwrap();
        assert_eq!(format.parse_epoch_seconds("1970-01-01 03:30").unwrap(), 12_600);
        assert_eq!(format.parse_epoch_seconds("1970-01-01 12:00").unwrap(), 0);

        let marked = TimeFormat::new("yyyy-MM-dd hh:mm a").unwrap();
        assert_eq!(marked.parse_epoch_seconds("1970-01-01 03:30 PM").unwrap(), 55_800);
    }

    #[test]
    fn test_strftime_hour_only_is_completed() {
        let format = TimeFormat::new("%d/%m/%Y %H").unwrap();
        assert_eq!(format.parse_epoch_seconds("01/01/1970 07").unwrap(), 25_200);
    }

    #[test]
    fn test_single_fraction_digit() {
        let format = TimeFormat::new("yyyy-MM-dd HH:mm:ss.S").unwrap();
        assert_eq!(format.parse_epoch_seconds("1970-01-01 00:00:07.5").unwrap(), 7);
        assert_eq!(format.parse_epoch_seconds("1970-01-01 00:00:07.125").unwrap(), 7);
    }

    #[test]
    fn test_parse_with_offset() {
        let format = TimeFormat::new("yyyy-MM-dd HH:mm:ssXXX").unwrap();
        assert_eq!(format.parse_epoch_seconds("1970-01-01 01:00:00+01:00").unwrap(), 0);
        assert_eq!(format.parse_epoch_seconds("1970-01-01 00:00:10Z").unwrap(), 10);
    }

    #[test]
    fn test_strftime_passthrough() {
        let format = TimeFormat::new("%Y-%m-%d %H:%M").unwrap();
        assert_eq!(format.strftime(), "%Y-%m-%d %H:%M");
        assert_eq!(format.parse_epoch_seconds("1970-01-01 00:02").unwrap(), 120);
    }
}
