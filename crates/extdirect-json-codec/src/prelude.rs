//! # Ext Direct Codec Prelude
//!
//! ```rust
//! use extdirect_json_codec::prelude::*;
//! ```

pub use crate::codec::{Codec, CodecRequest, DirectCodec};
pub use crate::config::{CodecConfig, ParamsMode};
pub use crate::error::CodecError;
pub use crate::request::DirectRequest;
pub use crate::session::{DirectCodecRequest, SessionState};
pub use crate::transport::{HttpResponseWriter, ResponseWriter, codec_error_response};
