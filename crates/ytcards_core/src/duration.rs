const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

/// Parses `P[n]Y[n]M[n]DT[n]H[n]M[n]S` into seconds, using 365-day years and
/// 30-day months. Input without the leading `P` yields 0; trailing text after
/// the longest matching prefix is ignored.
pub fn parse_iso8601_duration(input: &str) -> u64 {
    let Some(rest) = input.strip_prefix('P') else {
        return 0;
    };
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total = 0u64;
    let mut cursor = Fields::new(date_part);
    let date_complete = cursor.consume(&[('Y', YEAR), ('M', MONTH), ('D', DAY)], &mut total);
    if !date_complete {
        return total;
    }
    if let Some(time) = time_part {
        let mut cursor = Fields::new(time);
        cursor.consume(&[('H', HOUR), ('M', MINUTE), ('S', 1)], &mut total);
    }
    total
}

struct Fields<'a> {
    rest: &'a str,
}

impl<'a> Fields<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    /// Reads `<digits><designator>` groups in the order given. Returns false
    /// when the section holds something other than the expected groups.
    fn consume(&mut self, designators: &[(char, u64)], total: &mut u64) -> bool {
        for (designator, unit) in designators {
            let digits_len = self.rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits_len == 0 {
                continue;
            }
            let (digits, tail) = self.rest.split_at(digits_len);
            if !tail.starts_with(*designator) {
                continue;
            }
            let value: u64 = digits.parse().unwrap_or(u64::MAX);
            *total = total.saturating_add(value.saturating_mul(*unit));
            self.rest = &tail[designator.len_utf8()..];
        }
        self.rest.is_empty()
    }
}

/// Formats seconds as `H:MM:SS`, or `M:SS` below one hour.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / HOUR;
    let minutes = (seconds % HOUR) / MINUTE;
    let seconds = seconds % MINUTE;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
