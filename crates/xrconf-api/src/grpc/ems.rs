//! IOS-XR EMS gRPC service bindings.
//!
//! Message types and client stubs for the two services the manageability
//! agent exposes: `gRPCConfigOper` (YANG-JSON get/merge/replace/delete) and
//! `gRPCExec` (CLI show commands). Written against the wire contract of the
//! device's `ems_grpc.proto`; field numbers must not change.

use tonic::codegen::*;

// ── Messages ─────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigGetArgs {
    #[prost(int64, tag = "1")]
    pub req_id: i64,
    #[prost(string, tag = "2")]
    pub yangpathjson: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigGetReply {
    #[prost(int64, tag = "1")]
    pub res_req_id: i64,
    #[prost(string, tag = "2")]
    pub yangjson: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub errors: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigArgs {
    #[prost(int64, tag = "1")]
    pub req_id: i64,
    #[prost(string, tag = "2")]
    pub yangjson: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigReply {
    #[prost(int64, tag = "1")]
    pub res_req_id: i64,
    #[prost(string, tag = "2")]
    pub errors: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShowCmdArgs {
    #[prost(int64, tag = "1")]
    pub req_id: i64,
    #[prost(string, tag = "2")]
    pub cli: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShowCmdTextReply {
    #[prost(int64, tag = "1")]
    pub res_req_id: i64,
    #[prost(string, tag = "2")]
    pub output: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub errors: ::prost::alloc::string::String,
}

// ── gRPCConfigOper client ────────────────────────────────────────────

const CONFIG_OPER_SERVICE: &str = "IOSXRExtensibleManagabilityService.gRPCConfigOper";
const EXEC_SERVICE: &str = "IOSXRExtensibleManagabilityService.gRPCExec";

#[derive(Debug, Clone)]
pub struct GrpcConfigOperClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl<T> GrpcConfigOperClient<T>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner: tonic::client::Grpc::new(inner),
        }
    }

    /// Server-streaming read of configuration for a YANG-JSON path filter.
    pub async fn get_config(
        &mut self,
        request: impl tonic::IntoRequest<ConfigGetArgs>,
    ) -> Result<tonic::Response<tonic::codec::Streaming<ConfigGetReply>>, tonic::Status> {
        self.server_streaming_get(request, "GetConfig").await
    }

    /// Server-streaming read of operational data for a YANG-JSON path filter.
    pub async fn get_oper(
        &mut self,
        request: impl tonic::IntoRequest<ConfigGetArgs>,
    ) -> Result<tonic::Response<tonic::codec::Streaming<ConfigGetReply>>, tonic::Status> {
        self.server_streaming_get(request, "GetOper").await
    }

    pub async fn merge_config(
        &mut self,
        request: impl tonic::IntoRequest<ConfigArgs>,
    ) -> Result<tonic::Response<ConfigReply>, tonic::Status> {
        self.unary_edit(request, "MergeConfig").await
    }

    pub async fn replace_config(
        &mut self,
        request: impl tonic::IntoRequest<ConfigArgs>,
    ) -> Result<tonic::Response<ConfigReply>, tonic::Status> {
        self.unary_edit(request, "ReplaceConfig").await
    }

    pub async fn delete_config(
        &mut self,
        request: impl tonic::IntoRequest<ConfigArgs>,
    ) -> Result<tonic::Response<ConfigReply>, tonic::Status> {
        self.unary_edit(request, "DeleteConfig").await
    }

    async fn server_streaming_get(
        &mut self,
        request: impl tonic::IntoRequest<ConfigGetArgs>,
        method: &'static str,
    ) -> Result<tonic::Response<tonic::codec::Streaming<ConfigGetReply>>, tonic::Status> {
        self.inner.ready().await.map_err(|e| {
            tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
        })?;
        let codec = tonic::codec::ProstCodec::default();
        let path = http::uri::PathAndQuery::try_from(format!("/{CONFIG_OPER_SERVICE}/{method}"))
            .map_err(|e| tonic::Status::internal(e.to_string()))?;
        let mut req = request.into_request();
        req.extensions_mut()
            .insert(GrpcMethod::new(CONFIG_OPER_SERVICE, method));
        self.inner.server_streaming(req, path, codec).await
    }

    async fn unary_edit(
        &mut self,
        request: impl tonic::IntoRequest<ConfigArgs>,
        method: &'static str,
    ) -> Result<tonic::Response<ConfigReply>, tonic::Status> {
        self.inner.ready().await.map_err(|e| {
            tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
        })?;
        let codec = tonic::codec::ProstCodec::default();
        let path = http::uri::PathAndQuery::try_from(format!("/{CONFIG_OPER_SERVICE}/{method}"))
            .map_err(|e| tonic::Status::internal(e.to_string()))?;
        let mut req = request.into_request();
        req.extensions_mut()
            .insert(GrpcMethod::new(CONFIG_OPER_SERVICE, method));
        self.inner.unary(req, path, codec).await
    }
}

// ── gRPCExec client ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GrpcExecClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl<T> GrpcExecClient<T>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner: tonic::client::Grpc::new(inner),
        }
    }

    /// Server-streaming text output of one CLI show command.
    pub async fn show_cmd_text_output(
        &mut self,
        request: impl tonic::IntoRequest<ShowCmdArgs>,
    ) -> Result<tonic::Response<tonic::codec::Streaming<ShowCmdTextReply>>, tonic::Status> {
        self.inner.ready().await.map_err(|e| {
            tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
        })?;
        let codec = tonic::codec::ProstCodec::default();
        let path = http::uri::PathAndQuery::try_from(format!("/{EXEC_SERVICE}/ShowCmdTextOutput"))
            .map_err(|e| tonic::Status::internal(e.to_string()))?;
        let mut req = request.into_request();
        req.extensions_mut()
            .insert(GrpcMethod::new(EXEC_SERVICE, "ShowCmdTextOutput"));
        self.inner.server_streaming(req, path, codec).await
    }
}
