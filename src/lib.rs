//! Manray Assistant: a minimal chat relay and its terminal client.
//!
//! Two binaries share this crate: `manray-relay` exposes the HTTP relay
//! that forwards chat turns to the Gemini API, and `manray` renders the
//! conversation in the terminal and talks to the relay.

// Interdiction stricte de pratiques dangereuses ou non idiomatiques
#![deny(unsafe_code)] // Le code unsafe est interdit
#![deny(missing_docs)] // Toute fonction, struct, enum ou module public doit être documenté
#![deny(non_camel_case_types)]
// Les types doivent suivre la convention CamelCase (exception explicite possible au besoin)

// Options supplémentaires pour ne rien laisser passer
#![deny(unused_must_use)] // Oblige à gérer explicitement les Result et Option
#![deny(non_snake_case)] // Les noms de variables et fonctions doivent être en snake_case
#![deny(non_upper_case_globals)] // Les constantes et globals doivent être en MAJUSCULE
#![forbid(unsafe_op_in_unsafe_fn)]
// Interdit l'utilisation d'unsafe même dans une fonction unsafe

/// Conversation client core: render list, connectivity, send pipeline.
pub mod client;
/// Upstream Gemini API client.
pub mod llm;
/// Wire contract shared by the relay and the client.
pub mod protocol;
/// HTTP relay server and API routes.
pub mod server;
/// Entry helpers for the relay binary.
pub mod startup;
/// Terminal UI adapter for the conversation client.
pub mod tui;
