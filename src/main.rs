use clap::Parser;
use meridian::clock::SystemClock;
use meridian::convert::Converter;
use meridian::location::{NominatimGeocoder, StaticGeocoder, StaticZones, TimeApiZones};
use meridian::server;

/// Meridian — city-to-city time conversion.
///
/// Converts a moment given in one city's local time into another city's
/// local time. With no source city the host machine's own timezone is the
/// source; with no time, "now" is converted.
///
/// Examples:
///   meridian Tokyo
///   meridian Tokyo --from London
///   meridian Tokyo --from London --at "2024-06-01 12:00"
///   meridian Tokyo --from Paris --at 09:30
///   meridian --serve --port 8000
#[derive(Parser)]
#[command(name = "meridian", version, about, long_about = None)]
struct Cli {
    /// Destination city (positional). Example: meridian Tokyo
    #[arg(index = 1)]
    dest: Option<String>,

    /// Source city. Empty means the host machine's own timezone.
    #[arg(long, short = 'f', default_value = "")]
    from: String,

    /// Time to convert: "YYYY-MM-DD HH:MM", or bare "HH:MM" for today's
    /// date. Empty means now.
    #[arg(long, short = 'a', default_value = "")]
    at: String,

    /// Offline mode: resolve against the built-in city dataset only.
    #[arg(long)]
    offline: bool,

    /// Run the HTTP server instead of a one-shot conversion.
    #[arg(long)]
    serve: bool,

    /// Server bind address.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port.
    #[arg(long, short = 'p', default_value_t = 8000)]
    port: u16,
}

fn main() {
    let cli = Cli::parse();

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start async runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(server::start(&cli.host, cli.port));
        return;
    }

    let dest = match &cli.dest {
        Some(d) => d.clone(),
        None => {
            eprintln!("Error: No destination city specified.");
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  meridian Tokyo");
            eprintln!("  meridian Tokyo --from London --at \"2024-06-01 12:00\"");
            eprintln!("  meridian Tokyo --from Paris --at 09:30");
            eprintln!("  meridian --serve --port 8000");
            std::process::exit(1);
        }
    };

    let result = if cli.offline {
        Converter::new(StaticGeocoder, StaticZones, SystemClock).convert(&cli.from, &dest, &cli.at)
    } else {
        Converter::new(NominatimGeocoder::default(), TimeApiZones::default(), SystemClock)
            .convert(&cli.from, &dest, &cli.at)
    };

    match result {
        Ok(formatted) => {
            let source_label = if cli.from.trim().is_empty() {
                "local time"
            } else {
                cli.from.trim()
            };
            eprintln!("  {} \u{2192} {}", source_label, dest.trim());
            println!("{}", formatted);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
