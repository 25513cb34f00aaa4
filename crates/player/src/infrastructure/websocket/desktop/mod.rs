//! Desktop transport and timer on tokio

mod client;
mod timer;

pub use client::WsTransport;
pub use timer::TokioReconnectTimer;
