//! xapi-util – helpers for reading and showing experience-tracking statements.
//!
//! A statement records that an *actor* performed a *verb* on an *object*:
//! * an [`record::Actor`] is an Agent or a Group, identified by a mailbox,
//!   an OpenID, a mailbox SHA-1 sum or an account,
//! * a [`record::Verb`] is an IRI with a localized display map,
//! * a [`record::StatementObject`] is an Activity, an Agent, a Group, a
//!   reference to another statement, or a nested SubStatement.
//!
//! The crate never stores or sends statements. It turns their parts into
//! text: timestamps, localized labels, identifiers and display strings.
//!
//! ## Modules
//! * [`temporal`] – the ISO 8601 variant used for timestamps, with a fixed
//!   width UTC output form.
//! * [`language`] – language map lookup with BCP 47 style fallback
//!   (`en-US-CA` → `en-US` → `en`) and pluggable locale providers.
//! * [`record`] – the closed set of record variants and the conversion from
//!   loosely typed JSON into them.
//! * [`resolver`] – identifiers and display strings over those variants.
//! * [`encoding`] – byte length, base64, SHA-1/SHA-256 and random UUIDs.
//! * [`settings`] – settings file and environment configuration.
//!
//! ## Quick Start
//! ```
//! use xapi_util::language::StaticLocale;
//! use xapi_util::record::Statement;
//! use xapi_util::resolver::EntityResolver;
//!
//! let statement: Statement = r#"{
//!     "actor": { "mbox": "mailto:a@b.com", "name": "A" },
//!     "verb": { "id": "http://adlnet.gov/expapi/verbs/attempted", "display": { "en": "attempted" } },
//!     "object": { "id": "http://example.com/course" },
//!     "timestamp": "2016-06-15T10:00:00+02:00"
//! }"#.parse().unwrap();
//! let resolver = EntityResolver::new(StaticLocale::new("en-US"));
//! assert_eq!(resolver.statement_display(&statement), "A attempted http://example.com/course");
//! assert_eq!(statement.timestamp.unwrap().to_string(), "2016-06-15T08:00:00.000Z");
//! ```

pub mod encoding;
pub mod error;
pub mod language;
pub mod record;
pub mod resolver;
pub mod settings;
pub mod temporal;

pub use error::{Result, UtilError};
