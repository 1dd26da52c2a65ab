//! The request engine and per-operation interpretation.

use tracing::debug;

use crate::client::MobilyClient;
use crate::domain::{
    AccountPassword, Balance, DeleteSms, DeletionKey, MessageId, OperationInput, OperationKind,
    ScheduleTime, SendSms, Username,
};
use crate::transport::{self, ResponseCodes};

/// Sentinel result for requests that never completed an HTTP exchange with a
/// usable body.
pub const REQUEST_FAILED: &str = "request_failed";

/// How a send ended on the wire.
#[derive(Debug, Clone)]
enum Outcome {
    Completed { status: u16, body: String },
    TransportFailed { error: String },
}

#[derive(Debug, Clone)]
/// The outcome of one API call, together with the owning operation's
/// response-code table.
///
/// Interpretation is two-staged: [`ApiResponse::successful`] reports whether
/// the HTTP exchange itself produced a usable body, while
/// [`ApiResponse::result`] resolves the vendor's protocol-level code. A
/// vendor error such as `no_credit` is still a *successful* exchange.
pub struct ApiResponse {
    outcome: Outcome,
    codes: ResponseCodes,
}

impl ApiResponse {
    /// HTTP status code, absent when the exchange never completed.
    pub fn status(&self) -> Option<u16> {
        match &self.outcome {
            Outcome::Completed { status, .. } => Some(*status),
            Outcome::TransportFailed { .. } => None,
        }
    }

    /// The raw response body; empty when the exchange never completed.
    pub fn raw(&self) -> &str {
        match &self.outcome {
            Outcome::Completed { body, .. } => body,
            Outcome::TransportFailed { .. } => "",
        }
    }

    /// The transport error text, when the exchange never completed.
    pub fn transport_error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Completed { .. } => None,
            Outcome::TransportFailed { error } => Some(error),
        }
    }

    /// Whether the exchange completed with status 200 and a non-empty body.
    ///
    /// Independent of the code table: a 200 response carrying a vendor
    /// failure code still counts as transport success.
    pub fn successful(&self) -> bool {
        matches!(
            &self.outcome,
            Outcome::Completed { status: 200, body } if !body.is_empty()
        )
    }

    /// The inverse of [`ApiResponse::successful`].
    pub fn failed(&self) -> bool {
        !self.successful()
    }

    /// Resolve the response to a named outcome.
    ///
    /// Failed exchanges resolve to [`REQUEST_FAILED`]. Otherwise the trimmed
    /// body is looked up in the operation's code table; unmapped vendor
    /// codes pass through verbatim.
    pub fn result(&self) -> &str {
        if !self.successful() {
            return REQUEST_FAILED;
        }
        transport::lookup_response_code(self.codes, self.raw()).unwrap_or_else(|| self.raw())
    }
}

#[derive(Debug, Clone)]
/// One prepared API call: an endpoint, its operation-specific parameters,
/// and (after sending) the cached response.
///
/// Client-level defaults and the account credentials are merged in at send
/// time, so defaults changed on the client after the request was created
/// still apply.
pub struct ApiRequest {
    client: MobilyClient,
    kind: OperationKind,
    endpoint: &'static str,
    params: Vec<(String, String)>,
    codes: ResponseCodes,
    response: Option<ApiResponse>,
}

impl ApiRequest {
    pub(crate) fn new(client: MobilyClient, input: &OperationInput) -> Self {
        Self {
            kind: input.kind(),
            endpoint: transport::endpoint(input),
            params: transport::encode_form(input),
            codes: transport::response_codes(input.kind()),
            client,
            response: None,
        }
    }

    /// The operation this request targets.
    pub fn operation(&self) -> OperationKind {
        self.kind
    }

    /// The endpoint name on the wire (without the `.php` suffix).
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// The operation-specific parameters fixed at construction.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The operation's response-code table.
    pub fn response_codes(&self) -> ResponseCodes {
        self.codes
    }

    /// The cached response, if this request has been sent.
    pub fn last_response(&self) -> Option<&ApiResponse> {
        self.response.as_ref()
    }

    /// Perform the HTTP exchange, cache the outcome, and return it.
    ///
    /// Always performs a fresh network call, replacing any cached response.
    /// Transport failures are not errors: they come back as a response whose
    /// [`ApiResponse::result`] is [`REQUEST_FAILED`].
    pub async fn send(&mut self) -> ApiResponse {
        let response = self.perform().await;
        self.response = Some(response.clone());
        response
    }

    /// The cached response, sending exactly once if none exists yet.
    pub async fn response(&mut self) -> ApiResponse {
        match &self.response {
            Some(response) => response.clone(),
            None => self.send().await,
        }
    }

    /// Whether the exchange completed with a usable body (see
    /// [`ApiResponse::successful`]). Sends the request if necessary.
    pub async fn successful(&mut self) -> bool {
        self.response().await.successful()
    }

    /// The inverse of [`ApiRequest::successful`].
    pub async fn failed(&mut self) -> bool {
        !self.successful().await
    }

    pub(crate) fn client(&self) -> &MobilyClient {
        &self.client
    }

    async fn perform(&self) -> ApiResponse {
        let config = self.client.config();
        let params = self.merged_params();

        let url = match config
            .base_uri()
            .join(&format!("{}.php", self.endpoint))
        {
            Ok(url) => url,
            Err(err) => {
                return ApiResponse {
                    outcome: Outcome::TransportFailed {
                        error: format!("invalid endpoint url: {err}"),
                    },
                    codes: self.codes,
                };
            }
        };

        if config.debug() {
            debug!(url = %url, params = ?redact_credentials(&params), "sending api request");
        }

        let outcome = match self.client.http().post_form(url.as_str(), params).await {
            Ok(response) => {
                if config.debug() {
                    debug!(status = response.status, body = %response.body, "api response received");
                }
                Outcome::Completed {
                    status: response.status,
                    body: response.body,
                }
            }
            Err(err) => {
                if config.debug() {
                    debug!(error = %err, "api request failed");
                }
                Outcome::TransportFailed {
                    error: err.to_string(),
                }
            }
        };

        ApiResponse {
            outcome,
            codes: self.codes,
        }
    }

    fn merged_params(&self) -> Vec<(String, String)> {
        let config = self.client.config();
        merge_params(
            self.client.param_defaults().form_params(),
            &self.params,
            config.username().as_str(),
            config.password().as_str(),
        )
    }
}

/// Layer the parameter sources: client defaults under the request's own
/// parameters, credentials last so they override any identically-named key.
pub(crate) fn merge_params(
    defaults: Vec<(String, String)>,
    params: &[(String, String)],
    username: &str,
    password: &str,
) -> Vec<(String, String)> {
    let mut merged = defaults;
    for (key, value) in params {
        upsert(&mut merged, key, value);
    }
    upsert(&mut merged, Username::FIELD, username);
    upsert(&mut merged, AccountPassword::FIELD, password);
    merged
}

fn upsert(params: &mut Vec<(String, String)>, key: &str, value: &str) {
    match params.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value.to_owned(),
        None => params.push((key.to_owned(), value.to_owned())),
    }
}

fn redact_credentials(params: &[(String, String)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| {
            if key == AccountPassword::FIELD {
                (key.clone(), "[REDACTED]".to_owned())
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
/// A prepared message send.
pub struct SendRequest {
    inner: ApiRequest,
    message_id: MessageId,
    deletion_key: DeletionKey,
    schedule: Option<ScheduleTime>,
}

impl SendRequest {
    pub(crate) fn new(client: MobilyClient, input: SendSms) -> Self {
        let message_id = input.message_id().clone();
        let deletion_key = input.deletion_key().clone();
        let schedule = input.schedule().copied();
        let inner = ApiRequest::new(client, &OperationInput::SendSms(input));
        Self {
            inner,
            message_id,
            deletion_key,
            schedule,
        }
    }

    /// The underlying request.
    pub fn request(&self) -> &ApiRequest {
        &self.inner
    }

    /// Send (always a fresh network call).
    pub async fn send(&mut self) -> ApiResponse {
        self.inner.send().await
    }

    /// The response, sending once if needed.
    pub async fn response(&mut self) -> ApiResponse {
        self.inner.response().await
    }

    pub async fn successful(&mut self) -> bool {
        self.inner.successful().await
    }

    pub async fn failed(&mut self) -> bool {
        self.inner.failed().await
    }

    /// Whether the gateway accepted the message.
    pub async fn sent(&mut self) -> bool {
        self.inner.response().await.raw() == "1"
    }

    /// The message id transmitted with this send.
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    /// The deletion key transmitted with this send.
    pub fn deletion_key(&self) -> &DeletionKey {
        &self.deletion_key
    }

    /// The schedule, when this is a scheduled send.
    pub fn schedule(&self) -> Option<&ScheduleTime> {
        self.schedule.as_ref()
    }

    /// Time remaining until the scheduled send, `None` for immediate sends.
    /// Negative once the schedule has passed.
    pub fn time_till_sending(&self) -> Option<chrono::Duration> {
        self.schedule.map(|schedule| schedule.until())
    }

    /// Delete the scheduled message.
    ///
    /// Only meaningful while the schedule is still in the future; otherwise
    /// this returns `false` without touching the network. On a future
    /// schedule it issues one delete request with this message's deletion
    /// key and reports whether the gateway confirmed the deletion.
    pub async fn cancel(&mut self) -> bool {
        match &self.schedule {
            Some(schedule) if schedule.is_future() => {}
            _ => return false,
        }

        let mut delete = self
            .inner
            .client()
            .delete_sms(DeleteSms::new(self.deletion_key.clone()));
        delete.send().await;
        delete.deleted().await
    }
}

#[derive(Debug, Clone)]
/// A prepared deletion of a scheduled message.
pub struct DeleteRequest {
    inner: ApiRequest,
}

impl DeleteRequest {
    pub(crate) fn new(client: MobilyClient, input: DeleteSms) -> Self {
        Self {
            inner: ApiRequest::new(client, &OperationInput::DeleteSms(input)),
        }
    }

    /// The underlying request.
    pub fn request(&self) -> &ApiRequest {
        &self.inner
    }

    /// Send (always a fresh network call).
    pub async fn send(&mut self) -> ApiResponse {
        self.inner.send().await
    }

    /// The response, sending once if needed.
    pub async fn response(&mut self) -> ApiResponse {
        self.inner.response().await
    }

    pub async fn successful(&mut self) -> bool {
        self.inner.successful().await
    }

    pub async fn failed(&mut self) -> bool {
        self.inner.failed().await
    }

    /// Whether the gateway confirmed the deletion.
    pub async fn deleted(&mut self) -> bool {
        self.inner.response().await.raw() == "1"
    }
}

#[derive(Debug, Clone)]
/// A prepared account-balance query.
pub struct BalanceRequest {
    inner: ApiRequest,
}

impl BalanceRequest {
    pub(crate) fn new(client: MobilyClient) -> Self {
        Self {
            inner: ApiRequest::new(client, &OperationInput::GetBalance),
        }
    }

    /// The underlying request.
    pub fn request(&self) -> &ApiRequest {
        &self.inner
    }

    /// Send (always a fresh network call).
    pub async fn send(&mut self) -> ApiResponse {
        self.inner.send().await
    }

    /// The response, sending once if needed.
    pub async fn response(&mut self) -> ApiResponse {
        self.inner.response().await
    }

    pub async fn successful(&mut self) -> bool {
        self.inner.successful().await
    }

    pub async fn failed(&mut self) -> bool {
        self.inner.failed().await
    }

    /// The decoded balance, `None` when the body is not `total/remaining`
    /// (including the bare error codes the endpoint returns instead).
    pub async fn balance(&mut self) -> Option<Balance> {
        let response = self.inner.response().await;
        transport::decode_balance_body(response.raw())
    }

    /// The total side of the balance.
    pub async fn total(&mut self) -> Option<String> {
        self.balance().await.map(|balance| balance.total)
    }

    /// The remaining side of the balance.
    pub async fn remaining(&mut self) -> Option<String> {
        self.balance().await.map(|balance| balance.remaining)
    }

    /// Whether there is any credit left.
    pub async fn available(&mut self) -> bool {
        match self.balance().await {
            Some(balance) => balance
                .remaining
                .trim()
                .parse::<i64>()
                .is_ok_and(|remaining| remaining > 0),
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
/// A prepared send-window availability query.
pub struct SendingStatusRequest {
    inner: ApiRequest,
}

impl SendingStatusRequest {
    pub(crate) fn new(client: MobilyClient) -> Self {
        Self {
            inner: ApiRequest::new(client, &OperationInput::SendingStatus),
        }
    }

    /// The underlying request.
    pub fn request(&self) -> &ApiRequest {
        &self.inner
    }

    /// Send (always a fresh network call).
    pub async fn send(&mut self) -> ApiResponse {
        self.inner.send().await
    }

    /// The response, sending once if needed.
    pub async fn response(&mut self) -> ApiResponse {
        self.inner.response().await
    }

    pub async fn successful(&mut self) -> bool {
        self.inner.successful().await
    }

    pub async fn failed(&mut self) -> bool {
        self.inner.failed().await
    }

    /// Whether the gateway currently accepts sends.
    pub async fn available(&mut self) -> bool {
        self.inner.response().await.raw() == "1"
    }
}

#[derive(Debug)]
/// A request built from the string registry, tagged by operation.
pub enum AnyRequest {
    Send(SendRequest),
    Delete(DeleteRequest),
    Balance(BalanceRequest),
    SendingStatus(SendingStatusRequest),
}

impl AnyRequest {
    /// The operation this request targets.
    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Send(_) => OperationKind::SendSms,
            Self::Delete(_) => OperationKind::DeleteSms,
            Self::Balance(_) => OperationKind::GetBalance,
            Self::SendingStatus(_) => OperationKind::SendingStatus,
        }
    }

    fn inner_mut(&mut self) -> &mut ApiRequest {
        match self {
            Self::Send(request) => &mut request.inner,
            Self::Delete(request) => &mut request.inner,
            Self::Balance(request) => &mut request.inner,
            Self::SendingStatus(request) => &mut request.inner,
        }
    }

    /// Send (always a fresh network call).
    pub async fn send(&mut self) -> ApiResponse {
        self.inner_mut().send().await
    }

    /// The response, sending once if needed.
    pub async fn response(&mut self) -> ApiResponse {
        self.inner_mut().response().await
    }

    pub async fn successful(&mut self) -> bool {
        self.inner_mut().successful().await
    }

    pub async fn failed(&mut self) -> bool {
        self.inner_mut().failed().await
    }
}
