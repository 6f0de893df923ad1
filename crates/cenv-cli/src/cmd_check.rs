// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Verify that environment.yml describes the active environment.

use clap::Args;
use cenv::SpecEntry;
use colored::Colorize;
use miette::Result;

/// Verify environment.yml matches the active environment
#[derive(Debug, Args)]
pub struct CmdCheck {
    #[clap(flatten)]
    pub(crate) env: crate::EnvFlags,
}

impl CmdCheck {
    pub fn run(&self, verbose: bool) -> Result<i32> {
        let result = self.env.open().map(|session| {
            println!(
                "{} {} matches active environment {}",
                "✓".green(),
                session.path().display(),
                session.env_name()
            );
            println!("  prefix: {}", session.prefix().display());
            println!("  python: {}", session.python().display());
            let file = session.env_file();
            let conda_count = file
                .dependencies
                .iter()
                .filter(|dep| dep.spec().is_some())
                .count();
            let pip_count = file.pip_dependencies().map_or(0, |items| {
                items.iter().filter(|item| item.spec().is_some()).count()
            });
            println!("  {conda_count} conda and {pip_count} pip dependencies");
        });
        crate::report(result, verbose)
    }
}
