//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use url::Url;

use crate::domain::{
    Destinations, ErrorCode, MessageId, Password, SenderId, Sms, Username, ValidationError,
};
use crate::transport::{EnvelopeError, SoapResponse, SoapVersion};

const DEFAULT_ENDPOINT: &str = "http://www.24x.com/WS/SendSMS/service.asmx";
const DEFAULT_SENDER: &str = "sms24x";

const OP_CHECK_LOGIN_DETAILS: &str = "CheckLoginDetails";
const OP_CREDITS_AVAILABLE: &str = "CreditsAvailable";
const OP_SEND_SIMPLE_SMS: &str = "SendSimpleSMS";
const OP_SEND_FULL_SMS: &str = "SendFullSMS";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
enum TransportFailure {
    Fault { code: String, message: String },
    Other(Box<dyn StdError + Send + Sync>),
}

trait SoapTransport: Send + Sync {
    fn call<'a>(
        &'a self,
        endpoint: &'a str,
        operation: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<SoapResponse, TransportFailure>>;
}

#[derive(Debug, Clone)]
struct ReqwestSoapTransport {
    client: reqwest::Client,
    soap_version: SoapVersion,
}

impl SoapTransport for ReqwestSoapTransport {
    fn call<'a>(
        &'a self,
        endpoint: &'a str,
        operation: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<SoapResponse, TransportFailure>> {
        Box::pin(async move {
            let body = crate::transport::encode_envelope(self.soap_version, operation, &params);
            let mut request = self
                .client
                .post(endpoint)
                .header(
                    reqwest::header::CONTENT_TYPE,
                    self.soap_version.content_type(operation),
                )
                .body(body);
            if self.soap_version == SoapVersion::Soap11 {
                request = request.header(
                    "SOAPAction",
                    format!("\"{}\"", crate::transport::soap_action(operation)),
                );
            }
            let response = request
                .send()
                .await
                .map_err(|err| TransportFailure::Other(Box::new(err)))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|err| TransportFailure::Other(Box::new(err)))?;
            match crate::transport::decode_envelope(&text) {
                Ok(decoded) => Ok(decoded),
                Err(EnvelopeError::Fault { code, message }) => {
                    Err(TransportFailure::Fault { code, message })
                }
                Err(err @ EnvelopeError::Malformed { .. }) => {
                    if status.is_success() {
                        Err(TransportFailure::Fault {
                            code: "Client".to_owned(),
                            message: err.to_string(),
                        })
                    } else {
                        Err(TransportFailure::Fault {
                            code: format!("HTTP {}", status.as_u16()),
                            message: status.canonical_reason().unwrap_or("HTTP error").to_owned(),
                        })
                    }
                }
            }
        })
    }
}

#[derive(Debug, Clone)]
/// Username/password pair identifying a gateway account.
///
/// Every operation authenticates with one of these. A client may carry a
/// default context; calls can also supply their own per invocation.
pub struct AuthContext {
    username: Username,
    password: Password,
}

impl AuthContext {
    /// Create a context and validate that both parts are non-empty.
    ///
    /// The username is trimmed; the password is kept verbatim.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    /// Account name sent as the `UserName` parameter.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Account password sent as the `Password` parameter.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    fn push_params(&self, params: &mut Vec<(String, String)>) {
        params.push((Username::FIELD.to_owned(), self.username.as_str().to_owned()));
        params.push((Password::FIELD.to_owned(), self.password.as_str().to_owned()));
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`Sms24xClient`].
///
/// This error preserves:
/// - validation failures raised before anything is sent,
/// - gateway-reported failures (in-band `<code> - <message>` results and SOAP faults),
/// - transport failures (DNS, TLS, timeouts, malformed envelopes).
pub enum Sms24xError {
    /// No usable auth context, or the gateway rejected the one supplied.
    #[error("invalid auth context: {reason}")]
    InvalidAuthContext { reason: &'static str },

    /// A destination contained no digits at all.
    #[error("invalid destination: {input}")]
    InvalidDestination { input: String },

    /// The sender name fits neither the alphanumeric nor the numeric form.
    #[error("invalid sender: {input}")]
    InvalidSender { input: String },

    /// The envelope decoded, but the expected result field is missing.
    #[error("missing response property: {property}")]
    InvalidServerResponse { property: String },

    /// The gateway reported an operation failure inside the result string.
    #[error("server error {code}: {message}")]
    ServerErrorResponse { code: ErrorCode, message: String },

    /// The gateway answered with a SOAP fault instead of a result.
    #[error("SOAP fault {code}: {message}")]
    ProtocolFault { code: String, message: String },

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    UnexpectedError(#[source] Box<dyn StdError + Send + Sync>),

    /// The result field held a value the operation cannot interpret.
    #[error("unexpected server response: {value}")]
    UnexpectedServerResponse { value: String },

    /// The client itself could not be constructed.
    #[error("client setup failed: {0}")]
    RemoteSetupFailure(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    InvalidField(#[source] ValidationError),
}

impl From<ValidationError> for Sms24xError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidSender { input } => Self::InvalidSender { input },
            ValidationError::InvalidDestination { input } => Self::InvalidDestination { input },
            other => Self::InvalidField(other),
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`Sms24xClient`].
///
/// Use this when you need a default auth context verified at startup, another
/// endpoint or SOAP version, or HTTP client overrides.
pub struct Sms24xClientBuilder {
    default_auth: Option<AuthContext>,
    endpoint: String,
    soap_version: SoapVersion,
    default_sender: String,
    check_credentials: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl Sms24xClientBuilder {
    /// Create a builder with the default endpoint, SOAP 1.2, and no default
    /// auth context.
    pub fn new() -> Self {
        Self {
            default_auth: None,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            soap_version: SoapVersion::default(),
            default_sender: DEFAULT_SENDER.to_owned(),
            check_credentials: false,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set the default auth context used by calls that do not supply one.
    pub fn default_auth(mut self, auth: AuthContext) -> Self {
        self.default_auth = Some(auth);
        self
    }

    /// Override the gateway endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Select the SOAP protocol version used on the wire.
    pub fn soap_version(mut self, version: SoapVersion) -> Self {
        self.soap_version = version;
        self
    }

    /// Override the sender name used when a message does not carry one.
    ///
    /// The value is validated when a send first needs it, not here.
    pub fn default_sender(mut self, sender: impl Into<String>) -> Self {
        self.default_sender = sender.into();
        self
    }

    /// Verify the default auth context against the gateway during
    /// [`Sms24xClientBuilder::build`].
    pub fn check_credentials(mut self, check: bool) -> Self {
        self.check_credentials = check;
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`Sms24xClient`].
    ///
    /// Validates the endpoint URL and constructs the HTTP client. When
    /// [`Sms24xClientBuilder::check_credentials`] was requested and a default
    /// auth context is set, performs a `CheckLoginDetails` round trip before
    /// returning.
    pub async fn build(self) -> Result<Sms24xClient, Sms24xError> {
        Url::parse(&self.endpoint).map_err(|err| Sms24xError::RemoteSetupFailure(Box::new(err)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| Sms24xError::RemoteSetupFailure(Box::new(err)))?;

        let client = Sms24xClient {
            default_auth: self.default_auth,
            default_sender: self.default_sender,
            endpoint: self.endpoint,
            transport: Arc::new(ReqwestSoapTransport {
                client,
                soap_version: self.soap_version,
            }),
        };
        if self.check_credentials {
            client.verify_default_credentials().await?;
        }
        Ok(client)
    }
}

impl Default for Sms24xClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
/// High-level client for the 24x SMS gateway.
///
/// This type orchestrates destination normalization, SOAP encoding, and
/// result parsing. Each operation is a single call to
/// `http://www.24x.com/WS/SendSMS/service.asmx` (SOAP 1.2 by default); there
/// are no retries and no delivery tracking.
pub struct Sms24xClient {
    default_auth: Option<AuthContext>,
    default_sender: String,
    endpoint: String,
    transport: Arc<dyn SoapTransport>,
}

impl Sms24xClient {
    /// Create a client with default settings, optionally carrying a default
    /// auth context.
    ///
    /// For more customization, use [`Sms24xClient::builder`].
    pub fn new(default_auth: Option<AuthContext>) -> Self {
        Self {
            default_auth,
            default_sender: DEFAULT_SENDER.to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            transport: Arc::new(ReqwestSoapTransport {
                client: reqwest::Client::new(),
                soap_version: SoapVersion::default(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder() -> Sms24xClientBuilder {
        Sms24xClientBuilder::new()
    }

    /// Verify a username/password pair against the gateway.
    ///
    /// Errors:
    /// - [`Sms24xError::InvalidAuthContext`] when the gateway rejects the pair,
    /// - [`Sms24xError::ServerErrorResponse`] when the result carries an error string.
    pub async fn check_credentials(&self, auth: &AuthContext) -> Result<(), Sms24xError> {
        let raw = self
            .send_request(OP_CHECK_LOGIN_DETAILS, auth, Vec::new())
            .await?;
        if crate::transport::parse_loose_int(&raw) == 0 {
            return Err(Sms24xError::InvalidAuthContext {
                reason: "invalid credentials",
            });
        }
        Ok(())
    }

    /// Number of message credits left on the account.
    ///
    /// Errors:
    /// - [`Sms24xError::InvalidAuthContext`] when no auth context is available,
    /// - [`Sms24xError::ServerErrorResponse`] when the result carries an error string,
    /// - [`Sms24xError::UnexpectedServerResponse`] when the result is not a plain integer.
    pub async fn available_credits(&self, auth: Option<&AuthContext>) -> Result<u64, Sms24xError> {
        let auth = self.active_auth(auth)?;
        let raw = self
            .send_request(OP_CREDITS_AVAILABLE, auth, Vec::new())
            .await?;
        match crate::transport::parse_server_int(&raw) {
            Some(credits) => Ok(credits),
            None => Err(Sms24xError::UnexpectedServerResponse { value: raw }),
        }
    }

    /// Send a plain text message to one or more destinations, immediately,
    /// from the client's default sender.
    ///
    /// Destinations are normalized before sending: everything except digits
    /// and `+` is stripped, and a value left with no digits is rejected.
    ///
    /// Errors:
    /// - [`Sms24xError::InvalidDestination`] for a destination with no digits,
    /// - [`Sms24xError::InvalidSender`] when the default sender is invalid,
    /// - [`Sms24xError::ServerErrorResponse`] when the gateway rejects the send.
    pub async fn send_text(
        &self,
        text: &str,
        destinations: impl Into<Destinations>,
        auth: Option<&AuthContext>,
    ) -> Result<MessageId, Sms24xError> {
        let auth = self.active_auth(auth)?;
        let destinations = destinations.into().normalize()?;
        let sender = self.resolve_sender(None)?;
        let params = crate::transport::encode_send_simple_params(&destinations, &sender, text);
        let raw = self.send_request(OP_SEND_SIMPLE_SMS, auth, params).await?;
        expect_message_id(raw)
    }

    /// Send an [`Sms`], using the full operation when the message carries a
    /// sender, schedule, reply address, or user field, and delegating to
    /// [`Sms24xClient::send_text`] otherwise.
    ///
    /// A message without a schedule goes out immediately; its send time is
    /// the local clock at encode time.
    ///
    /// Errors: as for [`Sms24xClient::send_text`], plus
    /// [`Sms24xError::InvalidSender`] when the message's own sender is invalid.
    pub async fn send_sms(
        &self,
        sms: &Sms,
        destinations: impl Into<Destinations>,
        auth: Option<&AuthContext>,
    ) -> Result<MessageId, Sms24xError> {
        if sms.is_text_only() {
            return self.send_text(sms.text(), destinations, auth).await;
        }
        let auth = self.active_auth(auth)?;
        let destinations = destinations.into().normalize()?;
        let sender = self.resolve_sender(sms.sender())?;
        let send_at = sms
            .scheduled_at()
            .unwrap_or_else(|| Local::now().naive_local());
        let params = crate::transport::encode_send_full_params(
            &destinations,
            &sender,
            sms.text(),
            send_at,
            sms.reply_address(),
            sms.user_field(),
        );
        let raw = self.send_request(OP_SEND_FULL_SMS, auth, params).await?;
        expect_message_id(raw)
    }

    async fn verify_default_credentials(&self) -> Result<(), Sms24xError> {
        match self.default_auth.as_ref() {
            Some(auth) => self.check_credentials(auth).await,
            None => Ok(()),
        }
    }

    fn active_auth<'a>(
        &'a self,
        auth: Option<&'a AuthContext>,
    ) -> Result<&'a AuthContext, Sms24xError> {
        auth.or(self.default_auth.as_ref())
            .ok_or(Sms24xError::InvalidAuthContext {
                reason: "no auth context supplied and no default auth context defined",
            })
    }

    fn resolve_sender(&self, sender: Option<&str>) -> Result<SenderId, Sms24xError> {
        let value = sender.unwrap_or(&self.default_sender);
        Ok(SenderId::new(value)?)
    }

    async fn send_request(
        &self,
        operation: &str,
        auth: &AuthContext,
        params: Vec<(String, String)>,
    ) -> Result<String, Sms24xError> {
        let mut form = Vec::<(String, String)>::new();
        auth.push_params(&mut form);
        form.extend(params);

        let response = self
            .transport
            .call(&self.endpoint, operation, form)
            .await
            .map_err(|failure| match failure {
                TransportFailure::Fault { code, message } => {
                    Sms24xError::ProtocolFault { code, message }
                }
                TransportFailure::Other(err) => Sms24xError::UnexpectedError(err),
            })?;

        let property = format!("{operation}Result");
        let raw = match response.field(&property) {
            Some(raw) => raw,
            None => return Err(Sms24xError::InvalidServerResponse { property }),
        };
        if let Some(err) = crate::transport::parse_server_error(raw) {
            return Err(Sms24xError::ServerErrorResponse {
                code: ErrorCode::new(err.code),
                message: err.message,
            });
        }
        Ok(raw.to_owned())
    }
}

fn expect_message_id(raw: String) -> Result<MessageId, Sms24xError> {
    match crate::transport::parse_server_int(&raw) {
        Some(id) => Ok(MessageId::new(id)),
        None => Err(Sms24xError::UnexpectedServerResponse { value: raw }),
    }
}
