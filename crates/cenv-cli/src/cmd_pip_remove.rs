// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `cenv pip-remove` command.

use clap::Args;
use miette::Result;

/// Remove package with pip
#[derive(Debug, Args)]
pub struct CmdPipRemove {
    /// Package name or requirement spec to uninstall
    pub(crate) package: String,

    #[clap(flatten)]
    pub(crate) env: crate::EnvFlags,
}

impl CmdPipRemove {
    pub fn run(&self, verbose: bool) -> Result<i32> {
        let result = self.env.open().and_then(|mut session| {
            let outcome = session.pip_remove(&self.package)?;
            crate::print_outcome(&outcome, session.env_name());
            Ok(())
        });
        crate::report(result, verbose)
    }
}
