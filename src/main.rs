use anyhow::Result;
use clap::{crate_version, App, Arg};
use std::path::{Path, PathBuf};
use tagpages::builder::TagPageBuilder;
use tagpages::config::Config;
use tagpages::generate::Generator;
use tagpages::layout::FsLayouts;
use tagpages::source::load_documents;
use tagpages::write::Writer;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("tagpages")
        .version(crate_version!())
        .about("Generates one listing page per tag for a static site")
        .arg(
            Arg::with_name("site")
                .help("The site directory (or any directory below it)")
                .index(1)
                .default_value("."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .takes_value(true)
                .help("The output directory [default: <site>/_site]"),
        )
        .arg(
            Arg::with_name("threads")
                .short("t")
                .long("threads")
                .value_name("N")
                .takes_value(true)
                .help("The number of worker threads [default: number of CPUs]"),
        )
        .arg(
            Arg::with_name("dry-run")
                .long("dry-run")
                .help("Print the pages that would be written instead of writing them"),
        )
        .get_matches();

    let site = PathBuf::from(matches.value_of("site").unwrap_or("."));
    let output = matches.value_of("output").map(Path::new);
    let threads = matches
        .value_of("threads")
        .map(str::parse::<usize>)
        .transpose()?;
    let config = Config::from_directory(&site, output, threads)?;

    let documents = load_documents(&config.documents_directory)?;
    let builder = TagPageBuilder::new(FsLayouts)
        .with_tag_directory(config.tag_directory.as_str())
        .with_template_name(config.tag_layout.as_str())
        .with_path_policy(config.path_policy);
    let pages = Generator::new(builder, &config.site_root, &config.layouts_directory)
        .with_threads(config.threads)
        .generate(&documents)?;

    if matches.is_present("dry-run") {
        for page in &pages {
            println!("{}\t{}", page.output_path().display(), page.tag());
        }
        return Ok(());
    }

    Writer {
        output_directory: &config.output_directory,
        site_url: config.site_url.as_ref(),
    }
    .write_pages(&pages)?;
    Ok(())
}
