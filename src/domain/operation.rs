use uuid::Uuid;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    DeletionKey, MessageId, MessageText, PhoneNumber, ScheduleTime, SenderId, VariableSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// One supported Mobily API operation.
///
/// The set is closed: requests are only ever built for these four operations,
/// and [`OperationKind::lookup`] resolves the factory names the API surface
/// has always used.
pub enum OperationKind {
    SendSms,
    DeleteSms,
    GetBalance,
    SendingStatus,
}

impl OperationKind {
    /// Every operation the client knows how to build.
    pub const ALL: [Self; 4] = [
        Self::SendSms,
        Self::DeleteSms,
        Self::GetBalance,
        Self::SendingStatus,
    ];

    /// Canonical operation name accepted by the request factory.
    pub fn name(self) -> &'static str {
        match self {
            Self::SendSms => "sendSMS",
            Self::DeleteSms => "deleteSMS",
            Self::GetBalance => "getBalance",
            Self::SendingStatus => "sendingStatus",
        }
    }

    /// Resolve a factory name against the closed registry.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

#[derive(Debug, Clone, Default)]
/// Optional inputs for [`SendSms`].
pub struct SendOptions {
    /// Schedule the message instead of sending immediately.
    pub schedule: Option<ScheduleTime>,
    /// Per-recipient substitutions; non-empty switches the request to the
    /// variable-message endpoint.
    pub variable_sets: Vec<VariableSet>,
    /// Caller-chosen message id. A shared random id is generated when absent.
    pub message_id: Option<MessageId>,
    /// Sender name; the client default applies when absent.
    pub sender: Option<SenderId>,
    /// Caller-chosen deletion key. Defaults to the same generated id as
    /// `message_id`.
    pub deletion_key: Option<DeletionKey>,
}

#[derive(Debug, Clone)]
/// Inputs for sending a message, validated and normalized at construction.
pub struct SendSms {
    recipients: Vec<PhoneNumber>,
    message: MessageText,
    schedule: Option<ScheduleTime>,
    variable_sets: Vec<VariableSet>,
    message_id: MessageId,
    deletion_key: DeletionKey,
    sender: Option<SenderId>,
}

impl SendSms {
    /// Create a validated send input.
    ///
    /// Recipients are deduplicated keeping the first occurrence. When the
    /// options carry no message id or deletion key, one random id is
    /// generated and used for both, so a sent message can always be deleted.
    pub fn new(
        recipients: Vec<PhoneNumber>,
        message: MessageText,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: PhoneNumber::FIELD,
            });
        }

        let mut deduped = Vec::with_capacity(recipients.len());
        for number in recipients {
            if !deduped.contains(&number) {
                deduped.push(number);
            }
        }

        let fallback = Uuid::new_v4().simple().to_string();
        let message_id = match options.message_id {
            Some(id) => id,
            None => MessageId::new(fallback.clone())?,
        };
        let deletion_key = match options.deletion_key {
            Some(key) => key,
            None => DeletionKey::new(fallback)?,
        };

        Ok(Self {
            recipients: deduped,
            message,
            schedule: options.schedule,
            variable_sets: options.variable_sets,
            message_id,
            deletion_key,
            sender: options.sender,
        })
    }

    pub fn recipients(&self) -> &[PhoneNumber] {
        &self.recipients
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn schedule(&self) -> Option<&ScheduleTime> {
        self.schedule.as_ref()
    }

    pub fn variable_sets(&self) -> &[VariableSet] {
        &self.variable_sets
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub fn deletion_key(&self) -> &DeletionKey {
        &self.deletion_key
    }

    pub fn sender(&self) -> Option<&SenderId> {
        self.sender.as_ref()
    }
}

#[derive(Debug, Clone)]
/// Inputs for deleting a scheduled message.
pub struct DeleteSms {
    deletion_key: DeletionKey,
}

impl DeleteSms {
    pub fn new(deletion_key: DeletionKey) -> Self {
        Self { deletion_key }
    }

    pub fn deletion_key(&self) -> &DeletionKey {
        &self.deletion_key
    }
}

#[derive(Debug, Clone)]
/// Typed input for one API operation, tagged by [`OperationKind`].
pub enum OperationInput {
    SendSms(SendSms),
    DeleteSms(DeleteSms),
    GetBalance,
    SendingStatus,
}

impl OperationInput {
    /// The operation this input belongs to.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::SendSms(_) => OperationKind::SendSms,
            Self::DeleteSms(_) => OperationKind::DeleteSms,
            Self::GetBalance => OperationKind::GetBalance,
            Self::SendingStatus => OperationKind::SendingStatus,
        }
    }
}
