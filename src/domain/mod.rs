//! Domain layer: strong types with validation and invariants (no I/O).

mod operation;
mod response;
mod validation;
mod value;

pub use operation::{DeleteSms, OperationInput, OperationKind, SendOptions, SendSms};
pub use response::Balance;
pub use validation::ValidationError;
pub use value::{
    AccountPassword, DeletionKey, MessageId, MessageText, PhoneNumber, ScheduleTime, SenderId,
    Username, VariableSet,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rejects_empty() {
        assert!(matches!(
            Username::new("   "),
            Err(ValidationError::Empty {
                field: Username::FIELD
            })
        ));
    }

    #[test]
    fn account_password_rejects_empty() {
        assert!(matches!(
            AccountPassword::new(""),
            Err(ValidationError::Empty {
                field: AccountPassword::FIELD
            })
        ));
    }

    #[test]
    fn message_text_rejects_blank() {
        assert!(MessageText::new(" \n ").is_err());
        assert_eq!(MessageText::new(" hi ").unwrap().as_str(), " hi ");
    }

    #[test]
    fn deletion_key_and_message_id_trim() {
        assert_eq!(DeletionKey::new(" k1 ").unwrap().as_str(), "k1");
        assert_eq!(MessageId::new(" m1 ").unwrap().as_str(), "m1");
    }

    #[test]
    fn registry_covers_exactly_four_operations() {
        assert_eq!(OperationKind::ALL.len(), 4);
        assert_eq!(OperationKind::lookup("getBalance"), Some(OperationKind::GetBalance));
        assert_eq!(OperationKind::lookup("balance"), None);
    }
}
