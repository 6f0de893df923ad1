// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `cenv pip-install` command.

use clap::Args;
use miette::Result;

/// Install package with pip
#[derive(Debug, Args)]
pub struct CmdPipInstall {
    /// Requirement spec, e.g. requests>=2 or git+https://host/repo.git
    pub(crate) package: String,

    #[clap(flatten)]
    pub(crate) env: crate::EnvFlags,
}

impl CmdPipInstall {
    pub fn run(&self, verbose: bool) -> Result<i32> {
        let result = self.env.open().and_then(|mut session| {
            let outcome = session.pip_install(&self.package)?;
            crate::print_outcome(&outcome, session.env_name());
            Ok(())
        });
        crate::report(result, verbose)
    }
}
