//! Translation between the wire shape ([`UserView`]) and the stored shape
//! ([`NewUser`] / [`User`]). Pure functions, no I/O.

use time::{
    format_description::FormatItem, macros::format_description, OffsetDateTime, PrimitiveDateTime,
    UtcOffset,
};
use tracing::warn;
use uuid::Uuid;

use super::dto::UserView;
use super::error::UserError;
use super::repo_types::{NewUser, User, MAX_FIELD_LEN};

/// Wire format of `date_of_birth`, e.g. `2020-01-01T12:12:35+00:00`.
/// The offset is the literal `+00:00`: births are always UTC, which is also
/// what a `TIMESTAMPTZ` column hands back.
pub const BIRTH_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]+00:00");

pub fn parse_identifier(raw: &str) -> Result<Uuid, UserError> {
    Uuid::parse_str(raw).map_err(|source| {
        warn!(id = %raw, "uuid parse failed");
        UserError::InvalidIdentifier {
            input: raw.to_string(),
            source,
        }
    })
}

pub fn parse_birth(raw: &str) -> Result<OffsetDateTime, UserError> {
    PrimitiveDateTime::parse(raw, BIRTH_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|source| {
            warn!(birth = %raw, "birth parse failed");
            UserError::InvalidTimestamp {
                input: raw.to_string(),
                source,
            }
        })
}

pub fn format_birth(birth: OffsetDateTime) -> String {
    let birth = birth.to_offset(UtcOffset::UTC);
    // Every component of BIRTH_FORMAT exists on OffsetDateTime, so formatting
    // cannot fail for in-range years.
    birth
        .format(BIRTH_FORMAT)
        .unwrap_or_else(|_| birth.to_string())
}

fn check_len(field: &'static str, value: &str) -> Result<(), UserError> {
    if value.chars().count() > MAX_FIELD_LEN {
        warn!(field, "field too long");
        return Err(UserError::InvalidField {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    Ok(())
}

/// Wire shape -> stored shape. The surrogate key is left to the store.
pub fn to_internal(view: UserView) -> Result<NewUser, UserError> {
    let external_id = parse_identifier(&view.id)?;
    let birth = parse_birth(&view.birth)?;
    check_len("name", &view.name)?;
    check_len("email", &view.email)?;

    Ok(NewUser {
        external_id,
        name: view.name,
        email: view.email,
        birth,
    })
}

/// Stored shape -> wire shape. Never fails.
pub fn to_external(user: &User) -> UserView {
    UserView {
        id: user.external_id.hyphenated().to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        birth: format_birth(user.birth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn view(id: &str, birth: &str) -> UserView {
        UserView {
            id: id.into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            birth: birth.into(),
        }
    }

    #[test]
    fn round_trip_is_exact() {
        let cases = [
            "2020-01-01T12:12:35+00:00",
            "1999-12-31T23:59:59+00:00",
            "1970-06-15T00:00:00+00:00",
        ];
        for birth in cases {
            let v = view("d95cc5a3-62d7-49ce-a094-f65a82caac5f", birth);
            let new = to_internal(v.clone()).expect("valid view");
            let stored = User::from_new(7, new);
            assert_eq!(to_external(&stored), v, "round trip of {birth}");
        }
    }

    #[test]
    fn parses_fixed_format() {
        let birth = parse_birth("2020-01-01T12:12:35+00:00").unwrap();
        assert_eq!(birth, datetime!(2020-01-01 12:12:35 UTC));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for raw in ["999", "not-a-uuid", ""] {
            let err = to_internal(view(raw, "2020-01-01T12:12:35+00:00")).unwrap_err();
            assert!(
                matches!(err, UserError::InvalidIdentifier { .. }),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_timestamps_off_format() {
        let id = "d95cc5a3-62d7-49ce-a094-f65a82caac5f";
        for raw in [
            "xxxx-01T12:12:35+00:00",
            "2020-01-01 12:12:35+00:00",
            "2020-01-01T12:12:35Z",
            "2020-01-01T12:12:35",
            "2020-01-01T12:12:35.123+00:00",
            "2020-01-01T12:12:35+00:00 ",
            "2020-02-30T12:12:35+00:00",
            "1991-03-04T05:06:07+02:00",
            "1970-06-15T00:00:00-08:00",
            "2020-01-01T12:12:35-00:00",
        ] {
            let err = to_internal(view(id, raw)).unwrap_err();
            assert!(
                matches!(err, UserError::InvalidTimestamp { .. }),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn formats_any_offset_as_utc() {
        let birth = datetime!(1991-03-04 05:06:07 +2);
        assert_eq!(format_birth(birth), "1991-03-04T03:06:07+00:00");
    }

    #[test]
    fn rejects_overlong_fields() {
        let mut v = view(
            "d95cc5a3-62d7-49ce-a094-f65a82caac5f",
            "2020-01-01T12:12:35+00:00",
        );
        v.email = format!("{}@example.com", "a".repeat(MAX_FIELD_LEN));
        let err = to_internal(v).unwrap_err();
        assert!(matches!(err, UserError::InvalidField { field: "email", .. }));
    }

    #[test]
    fn identifier_is_canonicalised() {
        let v = view(
            "D95CC5A3-62D7-49CE-A094-F65A82CAAC5F",
            "2020-01-01T12:12:35+00:00",
        );
        let stored = User::from_new(1, to_internal(v).unwrap());
        assert_eq!(to_external(&stored).id, "d95cc5a3-62d7-49ce-a094-f65a82caac5f");
    }
}
