use uuid::{Uuid, Variant};

/// Length of the canonical `8-4-4-4-12` textual form.
const HYPHENATED_LEN: usize = 36;

/// Checks that `candidate` is a canonical RFC 4122 UUID (versions 1 to 5).
///
/// Only the hyphenated form is accepted, in either case. The braced, URN and
/// simple forms that `Uuid::try_parse` also understands are rejected, since
/// identifiers end up as URL path segments and session values.
pub fn is_valid_identifier(candidate: &str) -> bool {
    if candidate.len() != HYPHENATED_LEN {
        return false;
    }

    match Uuid::try_parse(candidate) {
        Ok(uuid) => {
            matches!(uuid.get_version_num(), 1..=5) && uuid.get_variant() == Variant::RFC4122
        }
        Err(_) => false,
    }
}
