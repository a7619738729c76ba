use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed time '{text}': expected HH:MM")]
pub struct TimeFormatError {
    pub text: String,
}

/// Parse `"HH:MM"` into minutes since midnight.
pub fn to_minutes(text: &str) -> Result<u32, TimeFormatError> {
    let malformed = || TimeFormatError {
        text: text.to_string(),
    };

    let (hours, minutes) = text.trim().split_once(':').ok_or_else(malformed)?;
    let hours = parse_field(hours).ok_or_else(malformed)?;
    let minutes = parse_field(minutes).ok_or_else(malformed)?;

    if hours > 23 || minutes > 59 {
        return Err(malformed());
    }
    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as zero-padded `"HH:MM"`.
///
/// `minutes` must be below [`MINUTES_PER_DAY`]; reduce it first.
pub fn to_text(minutes: u32) -> String {
    debug_assert!(
        minutes < MINUTES_PER_DAY,
        "minutes out of range: {}",
        minutes
    );
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn parse_field(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(to_minutes("00:00"), Ok(0));
        assert_eq!(to_minutes("06:12"), Ok(372));
        assert_eq!(to_minutes("23:59"), Ok(1439));
        assert_eq!(to_minutes(" 7:05 "), Ok(425));
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", "0612", "24:00", "12:60", "-1:30", "ab:cd", "06:12 (CET)", "06:12:00", ":30"] {
            assert!(to_minutes(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn error_carries_offending_text() {
        let err = to_minutes("25:00").unwrap_err();
        assert_eq!(err.text, "25:00");
        assert!(err.to_string().contains("25:00"));
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(to_text(0), "00:00");
        assert_eq!(to_text(65), "01:05");
        assert_eq!(to_text(1439), "23:59");
    }

    proptest! {
        #[test]
        fn text_round_trips(h in 0u32..24, m in 0u32..60) {
            let text = format!("{:02}:{:02}", h, m);
            prop_assert_eq!(to_text(to_minutes(&text).unwrap()), text);
        }
    }
}
