// Copyright 2023 The propmap Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Topic archiver: settings assembly and check.

#[macro_use]
extern crate commons;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate smart_default;
#[macro_use]
extern crate structopt;

mod config;

use commons::prelude_errors::*;
use structopt::StructOpt;

fn main() -> Result<(), Error> {
    let cli_opts = config::CliOptions::from_args();
    let verbosity = commons::de::verbosity_to_level(cli_opts.verbosity);
    env_logger::Builder::from_default_env()
        .filter(Some(module_path!()), verbosity)
        .filter(Some("propmap"), verbosity)
        .init();

    let settings = config::AppSettings::assemble(cli_opts)?;
    info!("application settings:\n{:#?}", &settings);

    println!("{}", settings);
    Ok(())
}
