//! Typed records returned by the API.
//!
//! Records only read the fields they know about, so fields added by the server later on do not
//! break decoding.

mod product;
mod request;
mod ssl_check;
mod validation_call;

pub use self::{
    product::{Product, ProductPrice},
    request::{CertificateRequest, RequestEmbedded},
    ssl_check::SslCheck,
    validation_call::ValidationCall,
};
