//! Assembly of a complete NuGet command line.

use crate::pack::PackOptions;
use crate::push::PushOptions;
use crate::quote::{quote_if_needed, split_token};
use crate::request::CommonOptions;
use crate::restore::RestoreOptions;

/// A NuGet verb together with its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Pack(PackOptions),
    Push(PushOptions),
    Restore(RestoreOptions),
}

impl Operation {
    /// The verb as NuGet.exe expects it.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Pack(_) => "pack",
            Operation::Push(_) => "push",
            Operation::Restore(_) => "restore",
        }
    }

    /// Files the verb acts on.
    pub fn targets(&self) -> &[String] {
        match self {
            Operation::Pack(opts) => opts.targets(),
            Operation::Push(opts) => opts.targets(),
            Operation::Restore(opts) => opts.targets(),
        }
    }

    /// Tokens specific to this verb.
    pub fn args(&self) -> Vec<String> {
        match self {
            Operation::Pack(opts) => opts.args(),
            Operation::Push(opts) => opts.args(),
            Operation::Restore(opts) => opts.args(),
        }
    }
}

/// A full invocation: the verb, its targets, and all options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuGetCommand {
    pub operation: Operation,
    pub common: CommonOptions,
}

impl NuGetCommand {
    /// Wrap an operation with default common options.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            common: CommonOptions::default(),
        }
    }

    /// Replace the common options.
    pub fn with_common(mut self, common: CommonOptions) -> Self {
        self.common = common;
        self
    }

    /// Build the token list: verb, quoted targets, common options, then
    /// verb-specific options. Recomputed on every call.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.operation.name().to_owned()];
        args.extend(
            self.operation
                .targets()
                .iter()
                .map(|t| quote_if_needed(t)),
        );
        args.extend(self.common.base_args());
        args.extend(self.operation.args());
        args
    }

    /// The tokens joined into a single command-line string.
    pub fn command_line(&self) -> String {
        self.args().join(" ")
    }

    /// The tokens split into individual process arguments, quotes removed.
    pub fn argv(&self) -> Vec<String> {
        self.args().iter().flat_map(|t| split_token(t)).collect()
    }
}
