//! Client layer: configuration, the request factory, and the HTTP seam.

mod request;

pub use request::{
    AnyRequest, ApiRequest, ApiResponse, BalanceRequest, DeleteRequest, REQUEST_FAILED,
    SendRequest, SendingStatusRequest,
};

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use url::Url;

use crate::domain::{
    AccountPassword, DeleteSms, OperationInput, OperationKind, SendSms, SenderId, Username,
};

const DEFAULT_BASE_URI: &str = "http://www.mobily.ws/api/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_APPLICATION_TYPE: &str = "68";
const DEFAULT_LANG: i64 = 3;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync + std::fmt::Debug {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Connection setup for a [`MobilyClient`].
///
/// Immutable once the client is built; use [`MobilyClient::builder`] to
/// override any of it up front.
pub struct ClientConfig {
    username: Username,
    password: AccountPassword,
    base_uri: Url,
    timeout: Duration,
    verify_ssl: bool,
    debug: bool,
}

impl ClientConfig {
    /// The account username (Mobily uses the account mobile number).
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// The account password.
    pub fn password(&self) -> &AccountPassword {
        &self.password
    }

    /// Base URI every endpoint name is resolved against.
    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Connect timeout applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether TLS certificates are verified.
    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Whether each wire exchange is logged at debug level.
    pub fn debug(&self) -> bool {
        self.debug
    }
}

#[derive(Debug, Clone)]
/// Default form parameters merged under every request's own parameters.
pub struct ParamDefaults {
    /// Default sender name, applied when a send carries no explicit sender.
    pub sender: Option<SenderId>,
    /// Domain name reported to the gateway. Mobily expects the calling
    /// site's host name; derive it before building the client (the crate
    /// does not sniff the environment) or leave it empty.
    pub domain_name: String,
    /// Application type code. `"68"` is the value Mobily assigns to
    /// third-party API integrations.
    pub application_type: String,
    /// Message language code.
    pub lang: i64,
}

impl ParamDefaults {
    /// Form field name for the domain name (`domainName`).
    pub const DOMAIN_NAME_FIELD: &'static str = "domainName";

    /// Form field name for the application type (`applicationType`).
    pub const APPLICATION_TYPE_FIELD: &'static str = "applicationType";

    /// Form field name for the language code (`lang`).
    pub const LANG_FIELD: &'static str = "lang";

    pub(crate) fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(sender) = &self.sender {
            params.push((SenderId::FIELD.to_owned(), sender.as_str().to_owned()));
        }
        params.push((
            Self::DOMAIN_NAME_FIELD.to_owned(),
            self.domain_name.clone(),
        ));
        params.push((
            Self::APPLICATION_TYPE_FIELD.to_owned(),
            self.application_type.clone(),
        ));
        params.push((Self::LANG_FIELD.to_owned(), self.lang.to_string()));
        params
    }
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self {
            sender: None,
            domain_name: String::new(),
            application_type: DEFAULT_APPLICATION_TYPE.to_owned(),
            lang: DEFAULT_LANG,
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MobilyClient`].
///
/// Transport failures during a send are deliberately absent here: they are
/// reported through [`ApiResponse::successful`] and the
/// [`REQUEST_FAILED`] result, never as an `Err`.
pub enum MobilyError {
    /// The requested operation name is not in the registry.
    #[error("unknown operation: {name}")]
    UnknownOperation { name: String },

    /// The typed input belongs to a different operation than the one named.
    #[error("operation {operation} cannot be built from {input} input")]
    OperationInputMismatch {
        operation: &'static str,
        input: &'static str,
    },

    /// The configured base URI could not be parsed.
    #[error("invalid base URI: {0}")]
    InvalidBaseUri(#[source] url::ParseError),

    /// The underlying HTTP client could not be constructed.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Clone)]
/// Builder for [`MobilyClient`].
///
/// Use this to override the base URI, timeout, TLS verification, debug
/// logging, or any of the parameter defaults.
pub struct MobilyClientBuilder {
    username: Username,
    password: AccountPassword,
    base_uri: String,
    timeout: Duration,
    verify_ssl: bool,
    debug: bool,
    defaults: ParamDefaults,
}

impl MobilyClientBuilder {
    /// Create a builder with the gateway's production base URI, a 5 second
    /// connect timeout, TLS verification off, and debug logging off.
    pub fn new(username: Username, password: AccountPassword) -> Self {
        Self {
            username,
            password,
            base_uri: DEFAULT_BASE_URI.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            verify_ssl: false,
            debug: false,
            defaults: ParamDefaults::default(),
        }
    }

    /// Override the base URI. Endpoint names are joined onto it, so it
    /// should end with a slash.
    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    /// Override the connect timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Toggle TLS certificate verification.
    pub fn verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Toggle debug logging of each wire exchange (password redacted).
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the default sender name.
    pub fn sender(mut self, sender: SenderId) -> Self {
        self.defaults.sender = Some(sender);
        self
    }

    /// Set the domain name reported to the gateway.
    pub fn domain_name(mut self, domain_name: impl Into<String>) -> Self {
        self.defaults.domain_name = domain_name.into();
        self
    }

    /// Override the application type code.
    pub fn application_type(mut self, application_type: impl Into<String>) -> Self {
        self.defaults.application_type = application_type.into();
        self
    }

    /// Override the message language code.
    pub fn lang(mut self, lang: i64) -> Self {
        self.defaults.lang = lang;
        self
    }

    /// Replace the parameter defaults wholesale.
    pub fn param_defaults(mut self, defaults: ParamDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Build a [`MobilyClient`].
    pub fn build(self) -> Result<MobilyClient, MobilyError> {
        let base_uri = Url::parse(&self.base_uri).map_err(MobilyError::InvalidBaseUri)?;

        let mut builder = reqwest::Client::builder().connect_timeout(self.timeout);
        if !self.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|err| MobilyError::Transport(Box::new(err)))?;

        Ok(MobilyClient {
            config: Arc::new(ClientConfig {
                username: self.username,
                password: self.password,
                base_uri,
                timeout: self.timeout,
                verify_ssl: self.verify_ssl,
                debug: self.debug,
            }),
            defaults: Arc::new(RwLock::new(self.defaults)),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Debug, Clone)]
/// High-level Mobily.ws client.
///
/// The client owns the connection setup and the parameter defaults, and is
/// the factory for every request. It is cheap to clone; clones share the
/// same transport and defaults.
pub struct MobilyClient {
    config: Arc<ClientConfig>,
    defaults: Arc<RwLock<ParamDefaults>>,
    http: Arc<dyn HttpTransport>,
}

impl MobilyClient {
    /// Create a client with the default setup.
    ///
    /// For overrides, use [`MobilyClient::builder`].
    pub fn new(username: Username, password: AccountPassword) -> Result<Self, MobilyError> {
        Self::builder(username, password).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(username: Username, password: AccountPassword) -> MobilyClientBuilder {
        MobilyClientBuilder::new(username, password)
    }

    /// The connection setup.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Snapshot of the current parameter defaults.
    pub fn param_defaults(&self) -> ParamDefaults {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the parameter defaults. Requests created earlier pick the new
    /// values up because defaults are read at send time.
    pub fn set_param_defaults(&self, defaults: ParamDefaults) {
        *self
            .defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner) = defaults;
    }

    /// Build a request for an operation by its registry name.
    ///
    /// Fails with [`MobilyError::UnknownOperation`] for names outside the
    /// registry and [`MobilyError::OperationInputMismatch`] when the typed
    /// input belongs to a different operation; neither touches the network.
    pub fn create_request(
        &self,
        operation: &str,
        input: OperationInput,
    ) -> Result<AnyRequest, MobilyError> {
        let kind = OperationKind::lookup(operation).ok_or_else(|| {
            MobilyError::UnknownOperation {
                name: operation.to_owned(),
            }
        })?;
        if kind != input.kind() {
            return Err(MobilyError::OperationInputMismatch {
                operation: kind.name(),
                input: input.kind().name(),
            });
        }

        Ok(match input {
            OperationInput::SendSms(send) => AnyRequest::Send(self.send_sms(send)),
            OperationInput::DeleteSms(delete) => AnyRequest::Delete(self.delete_sms(delete)),
            OperationInput::GetBalance => AnyRequest::Balance(self.get_balance()),
            OperationInput::SendingStatus => AnyRequest::SendingStatus(self.sending_status()),
        })
    }

    /// Build a request by name and send it immediately.
    pub async fn request(
        &self,
        operation: &str,
        input: OperationInput,
    ) -> Result<ApiResponse, MobilyError> {
        let mut request = self.create_request(operation, input)?;
        Ok(request.send().await)
    }

    /// Build a send request.
    pub fn send_sms(&self, input: SendSms) -> SendRequest {
        SendRequest::new(self.clone(), input)
    }

    /// Build a delete request for a scheduled message.
    pub fn delete_sms(&self, input: DeleteSms) -> DeleteRequest {
        DeleteRequest::new(self.clone(), input)
    }

    /// Build a balance query.
    pub fn get_balance(&self) -> BalanceRequest {
        BalanceRequest::new(self.clone())
    }

    /// Build a send-window availability query.
    pub fn sending_status(&self) -> SendingStatusRequest {
        SendingStatusRequest::new(self.clone())
    }

    pub(crate) fn http(&self) -> &Arc<dyn HttpTransport> {
        &self.http
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Scripted stand-in for the HTTP transport. Responses are consumed in
    /// order; once the script runs out every call gets a 200 `"1"` body.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug, Default)]
    struct FakeTransportState {
        script: VecDeque<Result<HttpResponse, String>>,
        calls: Vec<(String, Vec<(String, String)>)>,
    }

    impl FakeTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(self, status: u16, body: impl Into<String>) -> Self {
            self.state
                .lock()
                .unwrap()
                .script
                .push_back(Ok(HttpResponse {
                    status,
                    body: body.into(),
                }));
            self
        }

        pub(crate) fn fail(self, error: impl Into<String>) -> Self {
            self.state.lock().unwrap().script.push_back(Err(error.into()));
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.state.lock().unwrap().calls.len()
        }

        pub(crate) fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.state.lock().unwrap().calls.clone()
        }

        pub(crate) fn last_call(&self) -> (String, Vec<(String, String)>) {
            self.calls().last().cloned().expect("no calls recorded")
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_form<'a>(
            &'a self,
            url: &'a str,
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                state.calls.push((url.to_owned(), params));
                match state.script.pop_front() {
                    Some(Ok(response)) => Ok(response),
                    Some(Err(error)) => Err(error.into()),
                    None => Ok(HttpResponse {
                        status: 200,
                        body: "1".to_owned(),
                    }),
                }
            })
        }
    }

    pub(crate) fn test_client(transport: FakeTransport) -> MobilyClient {
        MobilyClient {
            config: Arc::new(ClientConfig {
                username: Username::new("966500000000").unwrap(),
                password: AccountPassword::new("secret").unwrap(),
                base_uri: Url::parse("http://gateway.invalid/api/").unwrap(),
                timeout: DEFAULT_TIMEOUT,
                verify_ssl: false,
                debug: false,
            }),
            defaults: Arc::new(RwLock::new(ParamDefaults::default())),
            http: Arc::new(transport),
        }
    }
}
