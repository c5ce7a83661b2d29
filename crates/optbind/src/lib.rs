//! optbind: declarative command-line option binding.
//!
//! A container struct implements [`Options`] and declares which of its
//! fields are reached by which flags, which are positional arguments, and
//! which one collects leftovers. An [`OptionTable`] is built once per type
//! and maps argument lists onto instances. Tokens of the form `@file` are
//! replaced by the lines of that file before mapping.
//!
//! ```
//! use optbind::{ArgumentDescriptor, Declaration, DefinitionError, OptionDescriptor, Options};
//!
//! #[derive(Default)]
//! struct CopyCmd {
//!     force: bool,
//!     retries: u32,
//!     source: String,
//!     rest: Vec<String>,
//! }
//!
//! impl Options for CopyCmd {
//!     fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
//!         decl.field("force", |c| &mut c.force)
//!             .option(OptionDescriptor::boolean("-f")?)
//!             .option(OptionDescriptor::boolean("--force")?);
//!         decl.field("retries", |c| &mut c.retries)
//!             .option(OptionDescriptor::integer("--retries")?);
//!         decl.field("source", |c| &mut c.source)
//!             .argument(ArgumentDescriptor::new(0).with_name("SOURCE"));
//!         decl.field("rest", |c| &mut c.rest).catch_all();
//!         Ok(())
//!     }
//! }
//!
//! let (copy, leftovers) = optbind::parse::<CopyCmd, _>(["-f", "--retries=3", "a.txt", "b.txt"]).unwrap();
//! assert!(copy.force);
//! assert_eq!(copy.retries, 3);
//! assert_eq!(copy.source, "a.txt");
//! assert_eq!(copy.rest, ["b.txt"]);
//! assert!(leftovers.is_empty());
//! ```

pub mod command;
mod common;
pub mod convert;
mod declare;
mod descriptor;
mod error;
pub mod expand;
mod field;
pub mod help;
mod info;
mod parser;
mod table;
pub mod token;

pub use common::CommonOptions;
pub use declare::{Annotation, Declaration, FieldDecl, Options};
pub use descriptor::{ArgumentDescriptor, OptionDescriptor, OptionKind};
pub use error::{ConversionError, DefinitionError, Error, ParseError, ResponseFileError};
pub use expand::{expand, Arguments, Expander, RawArgument};
pub use field::{Category, FieldType, FieldValue, Value};
pub use info::{ArgumentInfo, FlagInfo, OptionGroupInfo, TableInfo};
pub use parser::{parse, parse_env, parse_into, table};
pub use table::OptionTable;
