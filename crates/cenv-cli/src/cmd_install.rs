// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `cenv install` command.

use clap::Args;
use miette::Result;

/// Install conda package
#[derive(Debug, Args)]
pub struct CmdInstall {
    /// Package spec, e.g. numpy or numpy=1.26
    pub(crate) package: String,

    #[clap(flatten)]
    pub(crate) env: crate::EnvFlags,
}

impl CmdInstall {
    pub fn run(&self, verbose: bool) -> Result<i32> {
        let result = self.env.open().and_then(|mut session| {
            let outcome = session.install(&self.package)?;
            crate::print_outcome(&outcome, session.env_name());
            Ok(())
        });
        crate::report(result, verbose)
    }
}
