use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const SHORT_DATE: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day], [year]");

const POST_TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day], [year] [hour repr:12]:[minute] [period]");

/// "Aug 07, 2026" — used for rendered comments.
pub fn short_date(ts: OffsetDateTime) -> String {
    ts.format(SHORT_DATE).unwrap_or_default()
}

/// "Aug 07, 2026 03:24 PM" — used for feed entries.
pub fn post_timestamp(ts: OffsetDateTime) -> String {
    ts.format(POST_TIMESTAMP).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn short_date_renders_month_day_year() {
        assert_eq!(short_date(datetime!(2026-08-07 00:00:00 UTC)), "Aug 07, 2026");
        assert_eq!(short_date(datetime!(2024-01-01 23:59:59 UTC)), "Jan 01, 2024");
    }

    #[test]
    fn post_timestamp_uses_twelve_hour_clock() {
        assert_eq!(
            post_timestamp(datetime!(2026-08-07 15:24:00 UTC)),
            "Aug 07, 2026 03:24 PM"
        );
        assert_eq!(
            post_timestamp(datetime!(2026-08-07 00:05:00 UTC)),
            "Aug 07, 2026 12:05 AM"
        );
        assert_eq!(
            post_timestamp(datetime!(2026-08-07 12:00:00 UTC)),
            "Aug 07, 2026 12:00 PM"
        );
    }
}
