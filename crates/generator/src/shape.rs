//! RPC call shapes
//!
//! The client/server streaming flags of a method decide how its stub
//! receives input and returns output:
//!
//! | kind | client | server | input key | output key |
//! |------|--------|--------|-----------|------------|
//! | Unary | no | no | `request` | `response` |
//! | ClientStream | yes | no | `stream` | `response` |
//! | ServerStream | no | yes | `request` | `stream` |
//! | BidiStream | yes | yes | `stream` | `stream` |

use rpc_bones_common::MethodDescriptor;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RpcKind {
    Unary,
    ClientStream,
    ServerStream,
    BidiStream,
}

impl RpcKind {
    pub fn from_flags(client_streaming: bool, server_streaming: bool) -> Self {
        match (client_streaming, server_streaming) {
            (false, false) => RpcKind::Unary,
            (true, false) => RpcKind::ClientStream,
            (false, true) => RpcKind::ServerStream,
            (true, true) => RpcKind::BidiStream,
        }
    }
}

impl fmt::Display for RpcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcKind::Unary => write!(f, "Unary"),
            RpcKind::ClientStream => write!(f, "Client streaming"),
            RpcKind::ServerStream => write!(f, "Server streaming"),
            RpcKind::BidiStream => write!(f, "Bidirectional streaming"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputEnvelope {
    Request,
    RequestStream,
}

impl InputEnvelope {
    pub fn key(&self) -> &'static str {
        match self {
            InputEnvelope::Request => "request",
            InputEnvelope::RequestStream => "stream",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputEnvelope {
    Response,
    ResponseStream,
}

impl OutputEnvelope {
    pub fn key(&self) -> &'static str {
        match self {
            OutputEnvelope::Response => "response",
            OutputEnvelope::ResponseStream => "stream",
        }
    }
}

/// Parameter and return envelopes of a method stub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallShape {
    pub kind: RpcKind,
    pub input: InputEnvelope,
    pub output: OutputEnvelope,
}

/// Derive the call shape from a method's streaming flags
pub fn resolve(method: &MethodDescriptor) -> CallShape {
    CallShape {
        kind: RpcKind::from_flags(method.client_streaming, method.server_streaming),
        input: if method.client_streaming {
            InputEnvelope::RequestStream
        } else {
            InputEnvelope::Request
        },
        output: if method.server_streaming {
            OutputEnvelope::ResponseStream
        } else {
            OutputEnvelope::Response
        },
    }
}
