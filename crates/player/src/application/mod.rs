//! Application layer: notifications handed to the rendering layer and the
//! services that turn commands and server frames into session changes.

pub mod dto;
pub mod services;
