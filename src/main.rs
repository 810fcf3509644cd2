use clap::Parser;
use volby_scrape::{process::process_page, Error};

/// Scrapes the election results of one territorial unit from volby.cz.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Page path of the territorial unit, relative to the results site root
    relative_url: String,
    /// Name of the output CSV file
    output: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match process_page(&args.relative_url, &args.output).await {
        Ok(()) => println!("Results saved to {}", args.output),
        Err(err @ (Error::Reqwest(_) | Error::BadUrl(_))) => {
            println!("Error while downloading the page: {err}")
        }
        Err(err) => println!("Error while processing the data: {err}"),
    }
}
