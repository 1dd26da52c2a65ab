use crate::domain::Balance;

/// Endpoint for querying the account balance.
pub const BALANCE_ENDPOINT: &str = "balance";

/// Response codes for the balance endpoint. A successful lookup does not
/// return a code at all but a `total/remaining` body.
pub const BALANCE_RESPONSE_CODES: &[(&str, &str)] = &[
    ("0", "connection_failed"),
    ("1", "invalid_username"),
    ("2", "invalid_password"),
];

/// Decode a `total/remaining` balance body.
///
/// Anything other than exactly two `/`-separated parts (including the bare
/// error codes above) decodes to `None`.
pub fn decode_balance_body(body: &str) -> Option<Balance> {
    let mut parts = body.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(total), Some(remaining), None) => Some(Balance {
            total: total.to_owned(),
            remaining: remaining.to_owned(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_well_formed_balance_body() {
        let balance = decode_balance_body("100/40").unwrap();
        assert_eq!(balance.total, "100");
        assert_eq!(balance.remaining, "40");
    }

    #[test]
    fn decode_rejects_wrong_part_counts() {
        assert_eq!(decode_balance_body("bad"), None);
        assert_eq!(decode_balance_body("1/2/3"), None);
        assert_eq!(decode_balance_body("0"), None);
    }

    #[test]
    fn decode_keeps_empty_sides_verbatim() {
        let balance = decode_balance_body("100/").unwrap();
        assert_eq!(balance.total, "100");
        assert_eq!(balance.remaining, "");
    }
}
