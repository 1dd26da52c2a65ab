use crate::domain::{DeleteSms, DeletionKey};

/// Endpoint for deleting a scheduled message.
pub const DELETE_SMS_ENDPOINT: &str = "deleteMsg";

/// Response codes for the delete endpoint.
pub const DELETE_SMS_RESPONSE_CODES: &[(&str, &str)] = &[
    ("1", "deleted"),
    ("2", "invalid_account_credentials"),
    ("3", "invalid_account_credentials"),
    ("4", "invalid_deletion_key"),
];

/// Encode the operation-specific form parameters of a delete.
pub fn encode_delete_sms_form(request: &DeleteSms) -> Vec<(String, String)> {
    vec![(
        DeletionKey::FIELD.to_owned(),
        request.deletion_key().as_str().to_owned(),
    )]
}

#[cfg(test)]
mod tests {
    use crate::domain::{DeleteSms, DeletionKey};

    use super::*;

    #[test]
    fn encode_delete_form_params() {
        let request = DeleteSms::new(DeletionKey::new("del-9").unwrap());
        assert_eq!(
            encode_delete_sms_form(&request),
            vec![("deleteKey".to_owned(), "del-9".to_owned())]
        );
    }

    #[test]
    fn delete_response_codes_match_the_vendor_table() {
        assert_eq!(
            DELETE_SMS_RESPONSE_CODES,
            &[
                ("1", "deleted"),
                ("2", "invalid_account_credentials"),
                ("3", "invalid_account_credentials"),
                ("4", "invalid_deletion_key"),
            ]
        );
    }
}
