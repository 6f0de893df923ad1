// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `cenv remove` command.

use clap::Args;
use miette::Result;

/// Remove conda package
#[derive(Debug, Args)]
pub struct CmdRemove {
    /// Package name or spec to remove
    pub(crate) package: String,

    #[clap(flatten)]
    pub(crate) env: crate::EnvFlags,
}

impl CmdRemove {
    pub fn run(&self, verbose: bool) -> Result<i32> {
        let result = self.env.open().and_then(|mut session| {
            let outcome = session.remove(&self.package)?;
            crate::print_outcome(&outcome, session.env_name());
            Ok(())
        });
        crate::report(result, verbose)
    }
}
