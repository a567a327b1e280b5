use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};
use colored::Colorize;
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("file")
                .help("Text file holding the tree; the clipboard is read when omitted")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut config = mks::config::Config::load_from(".")?;
    config.verbose |= matches.get_flag("verbose");

    init_logger(config.verbose);

    if config.verbose {
        println!("executing in verbose mode");
    }

    let file = matches.get_one::<PathBuf>("file");

    let report = mks::api::make_structure(file.map(PathBuf::as_path), &config)?;

    println!(
        "{} {} directories, {} files",
        "Done!".green(),
        report.directories,
        report.files
    );

    Ok(())
}

fn init_logger(is_verbose: bool) {
    let default_filter = if is_verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
