#[cfg(test)]
mod tests {
    use crate::logic::{build_calendar_event, BOOKING_DURATION_SECS};
    use chrono::Duration;
    use proptest::prelude::*;
    use transfer_common::booking::{BookingField, FormSchema, RawBooking};

    const REQUIRED: [BookingField; 5] = [
        BookingField::Name,
        BookingField::Phone,
        BookingField::MeetingLocation,
        BookingField::Destination,
        BookingField::DateTime,
    ];

    fn complete(date_time: String) -> RawBooking {
        RawBooking::new()
            .with(BookingField::Name, "Ana Silva")
            .with(BookingField::Phone, "351912345678")
            .with(BookingField::MeetingLocation, "Vila do Conde")
            .with(BookingField::Destination, "Aeroporto OPO")
            .with(BookingField::DateTime, date_time)
    }

    // Local wall-clock times, away from the small hours where DST changes happen
    fn local_date_time() -> impl Strategy<Value = String> {
        (2024i32..2030, 1u32..=12, 1u32..=28, 4u32..=23, 0u32..60).prop_map(
            |(year, month, day, hour, minute)| {
                format!("{:04}-{:02}-{:02}T{:02}:{:02}", year, month, day, hour, minute)
            },
        )
    }

    fn zone() -> impl Strategy<Value = chrono_tz::Tz> {
        prop_oneof![
            Just(chrono_tz::Europe::Lisbon),
            Just(chrono_tz::Europe::Berlin),
            Just(chrono_tz::America::Sao_Paulo),
            Just(chrono_tz::UTC),
        ]
    }

    proptest! {
        // The event always ends exactly one hour after it starts
        #[test]
        fn test_event_lasts_one_hour(date_time in local_date_time(), tz in zone()) {
            let booking = FormSchema::transfer().validate(&complete(date_time)).unwrap();
            let event = build_calendar_event(&booking, tz).unwrap();
            prop_assert_eq!(event.end - event.start, Duration::seconds(BOOKING_DURATION_SECS));
            prop_assert_eq!(event.time_zone(), tz.name());
        }

        // Dropping or blanking any required field is always rejected and reported
        #[test]
        fn test_missing_required_field_is_rejected(
            date_time in local_date_time(),
            index in 0usize..REQUIRED.len(),
            blank in any::<bool>(),
            padding in "[ \t]{0,3}",
        ) {
            let field = REQUIRED[index];
            let mut raw = complete(date_time);
            if blank {
                raw.set(field, padding);
            } else {
                let mut partial = RawBooking::new();
                for other in REQUIRED.iter().copied().filter(|f| *f != field) {
                    partial.set(other, raw.get(other).unwrap_or_default().to_string());
                }
                raw = partial;
            }

            let err = FormSchema::transfer().validate(&raw).unwrap_err();
            prop_assert!(err.missing_fields.contains(&field.key()));
            prop_assert_eq!(err.summary(), "Missing required fields");
        }

        // Names and places are copied into the summary untouched
        #[test]
        fn test_summary_contains_booking_text(
            name in "[A-Za-zÀ-ÿ ]{1,30}",
            destination in "[A-Za-z0-9 ]{3,30}",
        ) {
            prop_assume!(!name.trim().is_empty() && destination.trim().len() >= 3);
            let raw = complete("2025-06-01T10:00".to_string())
                .with(BookingField::Name, name.clone())
                .with(BookingField::Destination, destination.clone());
            let booking = FormSchema::transfer().validate(&raw).unwrap();
            let event = build_calendar_event(&booking, chrono_tz::Europe::Lisbon).unwrap();
            prop_assert!(event.summary.contains(name.trim()));
            prop_assert!(event.summary.ends_with(destination.trim()));
        }
    }
}
