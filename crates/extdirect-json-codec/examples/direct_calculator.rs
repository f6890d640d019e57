//! Ext Direct Calculator Example
//!
//! A small hyper server that feeds every POST body through `DirectCodec` and
//! routes on the dispatch key with a plain `match`.
//!
//! ```sh
//! cargo run --example direct_calculator
//! curl -s localhost:8080/direct -d '{"action":"Calc","method":"Add","data":[{"a":1,"b":2}],"tid":1,"type":"rpc"}'
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use extdirect_json_codec::prelude::*;
use extdirect_json_codec::transport::DirectBody;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

#[derive(Debug, Default, Deserialize)]
struct Operands {
    a: f64,
    b: f64,
}

#[derive(Debug, thiserror::Error)]
enum CalcError {
    #[error("missing operands")]
    MissingOperands,
    #[error("division by zero")]
    DivisionByZero,
    #[error("result overflow")]
    Overflow,
}

fn finite(value: f64) -> Result<Value, CalcError> {
    if value.is_finite() {
        Ok(json!(value))
    } else {
        Err(CalcError::Overflow)
    }
}

async fn handle(codec: DirectCodec, req: Request<Incoming>) -> Result<Response<DirectBody>, Infallible> {
    if req.method() != Method::POST {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
        return Ok(response);
    }

    let mut call = codec.new_request_from_body(req.into_body()).await;
    Ok(dispatch(&mut call))
}

/// Route one decoded call and encode its outcome.
pub fn dispatch(call: &mut DirectCodecRequest) -> Response<DirectBody> {
    let key = match call.method() {
        Ok(key) => key,
        Err(err) => return codec_error_response(&err),
    };
    debug!("Dispatching {}", key);

    // `data: null` arrives as `None`; Add treats it as no operands.
    let reply = match key.as_str() {
        "Calc.Add" => match call.read_request::<Option<Operands>>() {
            Ok(ops) => {
                let ops = ops.unwrap_or_default();
                finite(ops.a + ops.b)
            }
            Err(err) => return codec_error_response(&err),
        },
        "Calc.Divide" => match call.read_request::<Option<Operands>>() {
            Ok(None) => Err(CalcError::MissingOperands),
            Ok(Some(ops)) if ops.b == 0.0 => Err(CalcError::DivisionByZero),
            Ok(Some(ops)) => finite(ops.a / ops.b),
            Err(err) => return codec_error_response(&err),
        },
        "Calc.Ping" => match call.read_request::<Option<Value>>() {
            Ok(_) => Ok(json!("pong")),
            Err(err) => return codec_error_response(&err),
        },
        _ => {
            let err = CodecError::malformed(format!("rpc: can't find method {key}"));
            return codec_error_response(&err);
        }
    };

    let mut writer = HttpResponseWriter::new();
    if let Err(err) = call.write_response(&mut writer, reply) {
        return codec_error_response(&err);
    }

    let status = if writer.is_empty() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    };
    writer.into_response(status)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("DIRECT_BIND")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()?;
    let codec = DirectCodec::builder()
        .params_mode(ParamsMode::Positional)
        .build();

    let listener = TcpListener::bind(addr).await?;
    info!("Ext Direct calculator listening on http://{}/direct", addr);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        debug!("New connection from {}", peer_addr);

        let codec = codec.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| handle(codec.clone(), req));

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                error!("Error serving connection: {}", err);
            }
        });
    }
}
