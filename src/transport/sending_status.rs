/// Endpoint for checking whether the gateway currently accepts sends.
pub const SENDING_STATUS_ENDPOINT: &str = "sendStatus";

/// Response codes for the sending-status endpoint.
pub const SENDING_STATUS_RESPONSE_CODES: &[(&str, &str)] = &[("1", "available")];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sending_status_codes_match_the_vendor_table() {
        assert_eq!(SENDING_STATUS_RESPONSE_CODES, &[("1", "available")]);
    }
}
