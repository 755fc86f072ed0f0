// SPDX-License-Identifier: PMPL-1.0-or-later

//! Recognised document languages and their template labels.
//!
//! ## Supported languages
//!
//! | Code | Language  | Problem label | Solution label |
//! |------|-----------|---------------|----------------|
//! | eng  | English   | problem       | solution       |
//! | nor  | Norwegian | oppgave       | løsning        |
//!
//! The table is static data compiled into the binary. Unlike the content of
//! problem records there is no fallback: a document language outside this
//! table is rejected before any problem is loaded.

mod catalog;

pub use catalog::Lang;
