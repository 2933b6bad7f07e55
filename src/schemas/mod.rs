//! Request / response wire types, shared between routes, the store and the
//! upstream client. Everything here derives `ToSchema` so the OpenAPI
//! document stays in sync with the actual serialisation.

pub mod audio;
pub mod chat;
pub mod logs;
pub mod settings;
