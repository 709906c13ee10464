//! EMS gRPC client.
//!
//! Speaks YANG-JSON to the device's manageability agent. Credentials travel
//! as per-request metadata, not channel state, so every call attaches
//! `username` / `password` / `timeout` headers. Connection health is probed
//! at construction with a short-deadline operational read.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde_json::Value;
use tonic::codec::Streaming;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Request, Status};
use tracing::{debug, warn};

use super::ems::{
    ConfigArgs, ConfigGetArgs, ConfigGetReply, GrpcConfigOperClient, GrpcExecClient, ShowCmdArgs,
};
use crate::error::Error;
use crate::netconf::Login;

/// Deadline for steady-state requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Short deadline for the initial connection probe.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Operational path used purely to verify the channel and credentials.
const PROBE_FILTER: &str = r#"{"Cisco-IOS-XR-shellutil-oper:system-time": "clock"}"#;

/// The payload whose rejection an error report should name.
enum ErrorInput<'a> {
    Yang(&'a str),
    Cli(&'a str),
}

/// A gRPC session against one device's EMS agent.
pub struct GrpcClient {
    login: Login,
    config: GrpcConfigOperClient<Channel>,
    exec: GrpcExecClient<Channel>,
    timeout_secs: u64,
}

impl GrpcClient {
    /// Open a channel and verify it with a short-deadline operational read.
    ///
    /// A probe that times out is reported as a refused connection: some
    /// devices rate-police connection attempts and simply go silent.
    pub async fn connect(login: Login) -> Result<Self, Error> {
        login.validate()?;
        let endpoint = Endpoint::from_shared(format!("http://{}:{}", login.host, login.port))
            .map_err(|e| Error::BadArgument {
                message: e.to_string(),
            })?
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));
        let channel = endpoint.connect().await.map_err(|e| Error::ConnectionRefused {
            message: e.to_string(),
        })?;

        let mut client = Self {
            login,
            config: GrpcConfigOperClient::new(channel.clone()),
            exec: GrpcExecClient::new(channel),
            timeout_secs: CONNECT_TIMEOUT_SECS,
        };

        debug!(host = %client.login.host, "probing grpc channel");
        match client.get_oper(PROBE_FILTER).await {
            Ok(_) => {}
            Err(Error::Timeout { .. }) => {
                return Err(Error::ConnectionRefused {
                    message: "timed out during initial connection".into(),
                });
            }
            Err(e) => return Err(e),
        }

        client.timeout_secs = DEFAULT_TIMEOUT_SECS;
        Ok(client)
    }

    /// Fetch configuration for a YANG-JSON path filter.
    pub async fn get_config(&mut self, yangpath: &str) -> Result<String, Error> {
        let request = self.request(ConfigGetArgs {
            req_id: 0,
            yangpathjson: yangpath.to_owned(),
        })?;
        let mut config = self.config.clone();
        let stream = self
            .deadline(async move { config.get_config(request).await })
            .await?;
        self.collect_get_replies(stream, yangpath).await
    }

    /// Fetch operational data for a YANG-JSON path filter.
    pub async fn get_oper(&mut self, yangpath: &str) -> Result<String, Error> {
        let request = self.request(ConfigGetArgs {
            req_id: 0,
            yangpathjson: yangpath.to_owned(),
        })?;
        let mut config = self.config.clone();
        let stream = self
            .deadline(async move { config.get_oper(request).await })
            .await?;
        self.collect_get_replies(stream, yangpath).await
    }

    pub async fn merge_config(&mut self, yangjson: &str) -> Result<(), Error> {
        let request = self.request(Self::config_args(yangjson))?;
        let mut config = self.config.clone();
        let reply = self
            .deadline(async move { config.merge_config(request).await })
            .await?
            .into_inner();
        self.check_edit_errors(&reply.errors, yangjson)
    }

    pub async fn replace_config(&mut self, yangjson: &str) -> Result<(), Error> {
        let request = self.request(Self::config_args(yangjson))?;
        let mut config = self.config.clone();
        let reply = self
            .deadline(async move { config.replace_config(request).await })
            .await?
            .into_inner();
        self.check_edit_errors(&reply.errors, yangjson)
    }

    pub async fn delete_config(&mut self, yangjson: &str) -> Result<(), Error> {
        let request = self.request(Self::config_args(yangjson))?;
        let mut config = self.config.clone();
        let reply = self
            .deadline(async move { config.delete_config(request).await })
            .await?
            .into_inner();
        self.check_edit_errors(&reply.errors, yangjson)
    }

    /// Run one CLI show command and return its text output with the echoed
    /// header stripped.
    pub async fn show_cmd_text(&mut self, command: &str) -> Result<String, Error> {
        let request = self.request(ShowCmdArgs {
            req_id: 0,
            cli: command.to_owned(),
        })?;
        let mut exec = self.exec.clone();
        let response = self
            .deadline(async move { exec.show_cmd_text_output(request).await })
            .await?;
        let mut stream = response.into_inner();

        let mut output = String::new();
        let mut first_error: Option<String> = None;
        while let Some(reply) = self.next_message(&mut stream).await? {
            if !reply.errors.is_empty() && first_error.is_none() {
                first_error = Some(reply.errors);
                continue;
            }
            output.push_str(&reply.output);
        }
        if let Some(errors) = first_error {
            return Err(self.classify_reported_errors(&errors, ErrorInput::Cli(command)));
        }
        Self::strip_text_header(command, &output)
    }

    // ── Request plumbing ────────────────────────────────────────────

    /// Wrap `args` with the credential/deadline metadata the agent expects.
    fn request<M>(&self, args: M) -> Result<Request<M>, Error> {
        let mut request = Request::new(args);
        let meta = request.metadata_mut();
        meta.insert("username", Self::metadata_value(&self.login.username)?);
        meta.insert(
            "password",
            Self::metadata_value(self.login.password.expose_secret())?,
        );
        meta.insert("timeout", Self::metadata_value(&self.timeout_secs.to_string())?);
        Ok(request)
    }

    fn metadata_value(text: &str) -> Result<MetadataValue<tonic::metadata::Ascii>, Error> {
        MetadataValue::try_from(text).map_err(|_| Error::BadArgument {
            message: "credentials must be ASCII for gRPC metadata".into(),
        })
    }

    async fn deadline<T>(
        &self,
        fut: impl Future<Output = Result<T, Status>>,
    ) -> Result<T, Error> {
        match tokio::time::timeout(Duration::from_secs(self.timeout_secs), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(status)) => Err(self.classify_status(status)),
            Err(_) => Err(Error::Timeout {
                timeout_secs: self.timeout_secs,
            }),
        }
    }

    async fn next_message<M: prost::Message + Default>(
        &self,
        stream: &mut Streaming<M>,
    ) -> Result<Option<M>, Error> {
        match tokio::time::timeout(Duration::from_secs(self.timeout_secs), stream.message()).await
        {
            Ok(Ok(msg)) => Ok(msg),
            Ok(Err(status)) => Err(self.classify_status(status)),
            Err(_) => Err(Error::Timeout {
                timeout_secs: self.timeout_secs,
            }),
        }
    }

    fn config_args(yangjson: &str) -> ConfigArgs {
        ConfigArgs {
            req_id: 0,
            yangjson: yangjson.to_owned(),
        }
    }

    /// Drain a get stream, concatenating `yangjson` payloads. The first
    /// reply carrying a non-empty `errors` field decides the outcome.
    async fn collect_get_replies(
        &mut self,
        response: tonic::Response<Streaming<ConfigGetReply>>,
        yangpath: &str,
    ) -> Result<String, Error> {
        let mut stream = response.into_inner();
        let mut output = String::new();
        let mut first_error: Option<String> = None;
        while let Some(reply) = self.next_message(&mut stream).await? {
            if !reply.errors.is_empty() && first_error.is_none() {
                first_error = Some(reply.errors);
                continue;
            }
            output.push_str(&reply.yangjson);
        }
        match first_error {
            Some(errors) => Err(self.classify_reported_errors(&errors, ErrorInput::Yang(yangpath))),
            None => Ok(output),
        }
    }

    fn check_edit_errors(&self, errors: &str, yangjson: &str) -> Result<(), Error> {
        if errors.is_empty() {
            return Ok(());
        }
        Err(self.classify_reported_errors(errors, ErrorInput::Yang(yangjson)))
    }

    // ── Error classification ────────────────────────────────────────

    fn classify_status(&self, status: Status) -> Error {
        warn!(code = ?status.code(), message = %status.message(), "grpc request failed");
        match status.code() {
            Code::Unavailable => Error::ConnectionRefused {
                message: format!("Connection refused: {}", status.message()),
            },
            Code::Unauthenticated => Error::Authentication {
                message: status.message().to_owned(),
            },
            Code::DeadlineExceeded => Error::Timeout {
                timeout_secs: self.timeout_secs,
            },
            _ => Error::client(status.message()),
        }
    }

    /// Classify the `errors` field of a reply.
    ///
    /// The agent's `*Reply` messages all carry an `errors` string, but some
    /// are a `cisco-grpc:errors` JSON envelope and some are plain text.
    fn classify_reported_errors(&self, errors: &str, input: ErrorInput<'_>) -> Error {
        match serde_json::from_str::<Value>(errors) {
            Ok(envelope) => Self::classify_json_error(&envelope, errors, input),
            Err(_) => Self::classify_text_error(errors, input),
        }
    }

    fn classify_json_error(envelope: &Value, raw: &str, input: ErrorInput<'_>) -> Error {
        let body = &envelope["cisco-grpc:errors"];
        let list = if body.is_array() { body } else { &body["error"] };
        let Some(list) = list.as_array() else {
            return Error::client(raw);
        };

        for entry in list {
            let error_type = entry["error-type"].as_str().unwrap_or("");
            let mut message = entry["error-message"]
                .as_str()
                .or_else(|| entry["error-tag"].as_str())
                .unwrap_or("")
                .to_owned();
            let error_path = entry["error-path"].as_str();
            if let Some(path) = error_path {
                message = format!("{message}: {path}");
            }

            if error_type == "protocol" && message == "Failed authentication" {
                return Error::Authentication { message };
            }
            if error_type == "application" {
                // Application errors without a path are advisory noise the
                // device emits alongside an otherwise-reported failure.
                if error_path.is_some() {
                    return Error::Yang {
                        rejected_input: input_text(&input).to_owned(),
                        error: message,
                    };
                }
                continue;
            }
            if error_type == "protocol" {
                return Error::Yang {
                    rejected_input: input_text(&input).to_owned(),
                    error: message,
                };
            }
            return Error::client(message);
        }
        Error::client(raw)
    }

    fn classify_text_error(errors: &str, input: ErrorInput<'_>) -> Error {
        match input {
            ErrorInput::Yang(text) => Error::Yang {
                rejected_input: text.to_owned(),
                error: errors.to_owned(),
            },
            ErrorInput::Cli(text) => Error::Cli {
                rejected_input: text.to_owned(),
                successful_input: String::new(),
                error: errors.to_owned(),
            },
        }
    }

    /// The agent frames show-command output with a dashed header echoing the
    /// command. Strip it; if the body then opens by echoing the command
    /// again, the CLI rejected it and the remainder is the error text.
    fn strip_text_header(command: &str, output: &str) -> Result<String, Error> {
        let lines: Vec<&str> = output.split('\n').skip(2).collect();
        if lines.is_empty() {
            return Ok(String::new());
        }
        if lines[0].trim() == command.trim() {
            return Err(Error::Cli {
                rejected_input: command.to_owned(),
                successful_input: String::new(),
                error: lines.join("\n"),
            });
        }
        Ok(lines.join("\n"))
    }
}

fn input_text<'a>(input: &ErrorInput<'a>) -> &'a str {
    match input {
        ErrorInput::Yang(text) | ErrorInput::Cli(text) => text,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn show_output_header_is_stripped() {
        let raw = "\n---------- show clock ----------\nMon Jan  1 00:00:00.000 UTC\n\n";
        let out = GrpcClient::strip_text_header("show clock", raw).unwrap();
        assert_eq!(out, "Mon Jan  1 00:00:00.000 UTC\n\n");
    }

    #[test]
    fn echoed_command_after_header_is_a_cli_rejection() {
        let raw = "\n---------- show bogus ----------\nshow bogus\n% Invalid input\n\n";
        let err = GrpcClient::strip_text_header("show bogus", raw).unwrap_err();
        match err {
            Error::Cli {
                rejected_input,
                error,
                ..
            } => {
                assert_eq!(rejected_input, "show bogus");
                assert!(error.contains("% Invalid input"));
            }
            other => panic!("expected Cli error, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_after_header_is_empty_output() {
        let out = GrpcClient::strip_text_header("show run", "\n---- show run ----").unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn auth_failure_envelope_maps_to_authentication() {
        let raw = r#"{"cisco-grpc:errors":[{"error-type":"protocol","error-message":"Failed authentication"}]}"#;
        let envelope: Value = serde_json::from_str(raw).unwrap();
        let err = GrpcClient::classify_json_error(&envelope, raw, ErrorInput::Yang("{}"));
        assert!(matches!(err, Error::Authentication { .. }));
    }

    #[test]
    fn application_error_with_path_maps_to_yang() {
        let raw = r#"{"cisco-grpc:errors":{"error":[{"error-type":"application","error-tag":"operation-failed","error-path":"ns:vrfs/vrf"}]}}"#;
        let envelope: Value = serde_json::from_str(raw).unwrap();
        let err = GrpcClient::classify_json_error(&envelope, raw, ErrorInput::Yang("{bad}"));
        match err {
            Error::Yang { error, .. } => assert_eq!(error, "operation-failed: ns:vrfs/vrf"),
            other => panic!("expected Yang error, got {other:?}"),
        }
    }

    #[test]
    fn protocol_error_names_the_rejected_input() {
        let raw = r#"{"cisco-grpc:errors":[{"error-type":"protocol","error-message":"bad path"}]}"#;
        let envelope: Value = serde_json::from_str(raw).unwrap();
        let err =
            GrpcClient::classify_json_error(&envelope, raw, ErrorInput::Yang(r#"{"x:y": null}"#));
        match err {
            Error::Yang { rejected_input, .. } => assert_eq!(rejected_input, r#"{"x:y": null}"#),
            other => panic!("expected Yang error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_error_text_maps_by_input_kind() {
        let err = GrpcClient::classify_text_error("Disallowed commands: foo", ErrorInput::Cli("foo"));
        assert!(matches!(err, Error::Cli { .. }));
    }
}
