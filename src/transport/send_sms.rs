use crate::domain::{
    DeletionKey, MessageId, MessageText, PhoneNumber, ScheduleTime, SendSms, SenderId, VariableSet,
};

/// Endpoint for plain sends.
pub const SEND_SMS_ENDPOINT: &str = "msgSend";

/// Endpoint for sends carrying per-recipient variable sets.
pub const SEND_SMS_WITH_VARIABLES_ENDPOINT: &str = "msgSendWK";

/// Response codes for both send endpoints.
pub const SEND_SMS_RESPONSE_CODES: &[(&str, &str)] = &[
    ("1", "message_sent"),
    ("2", "no_credit"),
    ("3", "not_enough_credit"),
    ("4", "invalid_account_credentials"),
    ("5", "invalid_account_credentials"),
    ("6", "service_down"),
    ("10", "invalid_variable_sets_count"),
    ("13", "invalid_sender_name"),
    ("14", "inactive_sender_name"),
    ("15", "incorrect_phone_numbers"),
    ("16", "missing_sender_name"),
    ("17", "invalid_message_or_bad_encoding"),
    ("18", "sending_denied_by_support"),
    ("19", "missing_application_type"),
];

const TIME_SEND_FIELD: &str = "timeSend";
const DATE_SEND_FIELD: &str = "dateSend";
const VARIABLES_FIELD: &str = "msgKey";

// Both schedule fields carry a literal zero for immediate sends.
const UNSCHEDULED: &str = "0";

const TIME_SEND_FORMAT: &str = "%H:%M:%S";
const DATE_SEND_FORMAT: &str = "%m/%d/%y";

/// Pick the endpoint for a send: the variable-message endpoint whenever the
/// request carries variable sets.
pub fn send_sms_endpoint(request: &SendSms) -> &'static str {
    if request.variable_sets().is_empty() {
        SEND_SMS_ENDPOINT
    } else {
        SEND_SMS_WITH_VARIABLES_ENDPOINT
    }
}

/// Encode the operation-specific form parameters of a send.
///
/// Credentials and client-level defaults are merged in by the request engine
/// at send time; the `sender` field is emitted here only when the request
/// carries an explicit sender, so the client default can still apply.
pub fn encode_send_sms_form(request: &SendSms) -> Vec<(String, String)> {
    let numbers = request
        .recipients()
        .iter()
        .map(PhoneNumber::as_str)
        .collect::<Vec<_>>()
        .join(",");

    let mut params = vec![
        (PhoneNumber::FIELD.to_owned(), numbers),
        (
            MessageText::FIELD.to_owned(),
            request.message().as_str().to_owned(),
        ),
    ];

    if let Some(sender) = request.sender() {
        params.push((SenderId::FIELD.to_owned(), sender.as_str().to_owned()));
    }

    params.push((
        MessageId::FIELD.to_owned(),
        request.message_id().as_str().to_owned(),
    ));
    params.push((
        TIME_SEND_FIELD.to_owned(),
        schedule_field(request.schedule(), TIME_SEND_FORMAT),
    ));
    params.push((
        DATE_SEND_FIELD.to_owned(),
        schedule_field(request.schedule(), DATE_SEND_FORMAT),
    ));
    params.push((
        DeletionKey::FIELD.to_owned(),
        request.deletion_key().as_str().to_owned(),
    ));

    if !request.variable_sets().is_empty() {
        params.push((
            VARIABLES_FIELD.to_owned(),
            encode_variable_sets(request.variable_sets()),
        ));
    }

    params
}

fn schedule_field(schedule: Option<&ScheduleTime>, format: &str) -> String {
    match schedule {
        Some(time) => time.datetime().format(format).to_string(),
        None => UNSCHEDULED.to_owned(),
    }
}

/// Encode variable sets into the `msgKey` wire format: each substitution is
/// `key,*,value`, substitutions within one recipient join with `,@,`, and
/// recipients join with `***`.
fn encode_variable_sets(sets: &[VariableSet]) -> String {
    sets.iter()
        .map(|set| {
            set.pairs()
                .map(|(key, value)| format!("{key},*,{value}"))
                .collect::<Vec<_>>()
                .join(",@,")
        })
        .collect::<Vec<_>>()
        .join("***")
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use crate::domain::{
        DeletionKey, MessageId, MessageText, PhoneNumber, SendOptions, SendSms, SenderId,
        VariableSet,
    };

    use super::*;

    fn numbers(values: &[&str]) -> Vec<PhoneNumber> {
        values
            .iter()
            .map(|v| PhoneNumber::new(*v).unwrap())
            .collect()
    }

    fn lookup<'a>(params: &'a [(String, String)], key: &str) -> &'a str {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing param {key}; got: {params:?}"))
    }

    #[test]
    fn encode_immediate_send_form_params() {
        let options = SendOptions {
            message_id: Some(MessageId::new("id-1").unwrap()),
            deletion_key: Some(DeletionKey::new("del-1").unwrap()),
            ..Default::default()
        };
        let request = SendSms::new(
            numbers(&["966500000001", "966500000001", "966500000002"]),
            MessageText::new("hello").unwrap(),
            options,
        )
        .unwrap();

        assert_eq!(send_sms_endpoint(&request), "msgSend");
        let params = encode_send_sms_form(&request);
        assert_eq!(
            params,
            vec![
                (
                    "numbers".to_owned(),
                    "966500000001,966500000002".to_owned()
                ),
                ("msg".to_owned(), "hello".to_owned()),
                ("msgId".to_owned(), "id-1".to_owned()),
                ("timeSend".to_owned(), "0".to_owned()),
                ("dateSend".to_owned(), "0".to_owned()),
                ("deleteKey".to_owned(), "del-1".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_scheduled_send_splits_time_and_date_fields() {
        let schedule = Local.with_ymd_and_hms(2030, 6, 1, 17, 5, 9).unwrap();
        let options = SendOptions {
            schedule: Some(schedule.into()),
            ..Default::default()
        };
        let request = SendSms::new(
            numbers(&["966500000001"]),
            MessageText::new("later").unwrap(),
            options,
        )
        .unwrap();

        let params = encode_send_sms_form(&request);
        assert_eq!(lookup(&params, "timeSend"), "17:05:09");
        assert_eq!(lookup(&params, "dateSend"), "06/01/30");
    }

    #[test]
    fn encode_explicit_sender_is_included() {
        let options = SendOptions {
            sender: Some(SenderId::new("ACME").unwrap()),
            ..Default::default()
        };
        let request = SendSms::new(
            numbers(&["966500000001"]),
            MessageText::new("hi").unwrap(),
            options,
        )
        .unwrap();

        let params = encode_send_sms_form(&request);
        assert_eq!(lookup(&params, "sender"), "ACME");
    }

    #[test]
    fn encode_without_sender_omits_the_field() {
        let request = SendSms::new(
            numbers(&["966500000001"]),
            MessageText::new("hi").unwrap(),
            SendOptions::default(),
        )
        .unwrap();

        let params = encode_send_sms_form(&request);
        assert!(!params.iter().any(|(k, _)| k == "sender"));
    }

    #[test]
    fn variable_sets_switch_endpoint_and_encode_msg_key() {
        let options = SendOptions {
            variable_sets: vec![
                VariableSet::new([("name", "x")]),
                VariableSet::new([("name", "y")]),
            ],
            ..Default::default()
        };
        let request = SendSms::new(
            numbers(&["966500000001", "966500000002"]),
            MessageText::new("hi {name}").unwrap(),
            options,
        )
        .unwrap();

        assert_eq!(send_sms_endpoint(&request), "msgSendWK");
        let params = encode_send_sms_form(&request);
        assert_eq!(lookup(&params, "msgKey"), "name,*,x***name,*,y");
    }

    #[test]
    fn variable_sets_join_multiple_substitutions_per_recipient() {
        let options = SendOptions {
            variable_sets: vec![VariableSet::new([("first", "Ada"), ("last", "Lovelace")])],
            ..Default::default()
        };
        let request = SendSms::new(
            numbers(&["966500000001"]),
            MessageText::new("hi").unwrap(),
            options,
        )
        .unwrap();

        let params = encode_send_sms_form(&request);
        assert_eq!(lookup(&params, "msgKey"), "first,*,Ada,@,last,*,Lovelace");
    }

    #[test]
    fn send_response_codes_match_the_vendor_table() {
        assert_eq!(SEND_SMS_RESPONSE_CODES.len(), 14);
        let find = |code: &str| {
            SEND_SMS_RESPONSE_CODES
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, name)| *name)
        };
        assert_eq!(find("1"), Some("message_sent"));
        assert_eq!(find("4"), Some("invalid_account_credentials"));
        assert_eq!(find("5"), Some("invalid_account_credentials"));
        assert_eq!(find("19"), Some("missing_application_type"));
        assert_eq!(find("7"), None);
    }
}
