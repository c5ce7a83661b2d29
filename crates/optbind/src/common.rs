//! Options most tools want: verbosity and help.

use crate::declare::{Declaration, Options};
use crate::descriptor::OptionDescriptor;
use crate::error::DefinitionError;

/// `-v/--verbose` and `-h/--help`. Splice into a container with
/// [`Declaration::include`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommonOptions {
    pub verbose: bool,
    pub show_help: bool,
}

impl Options for CommonOptions {
    fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
        decl.field("verbose", |o| &mut o.verbose)
            .option(OptionDescriptor::boolean("--verbose")?)
            .option(OptionDescriptor::boolean("-v")?)
            .describe("Verbose output");
        decl.field("show_help", |o| &mut o.show_help)
            .option(OptionDescriptor::boolean("--help")?)
            .option(OptionDescriptor::boolean("-h")?)
            .describe("Show the command line help");
        Ok(())
    }
}
