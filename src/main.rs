use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{error, info, warn};

use scribe_sync::{BatchSync, Config, OutputFormat, TranscriptionClient};

fn cli() -> Command {
    Command::new("scribe-sync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Batch speech-to-text archiver for local media libraries")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Transcribe a single media file instead of running batch sync"),
        )
        .arg(
            Arg::new("media-dir")
                .short('d')
                .long("media-dir")
                .value_name("DIR")
                .help("Directory containing media files to sync")
                .default_value("files"),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Directory to save transcripts")
                .default_value("transcripts"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Transcript format: json, txt, srt")
                .default_value("json"),
        )
        .arg(
            Arg::new("language")
                .short('l')
                .long("language")
                .value_name("CODE")
                .help("ISO language code hint (auto-detect if omitted)"),
        )
        .arg(
            Arg::new("diarize")
                .long("diarize")
                .value_name("BOOL")
                .help("Override speaker diarization (true/false)")
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            Arg::new("serve")
                .long("serve")
                .help("Run the HTTP API server instead of a batch sync (requires the 'api' feature)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port for the HTTP API server")
                .default_value("5000"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let verbose = matches.get_flag("verbose");
    tracing_subscriber::fmt()
        .with_env_filter(if verbose {
            "scribe_sync=debug,info"
        } else {
            "scribe_sync=info,warn"
        })
        .init();

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    config.sync.media_dir = PathBuf::from(matches.get_one::<String>("media-dir").unwrap());
    config.sync.transcripts_dir = PathBuf::from(matches.get_one::<String>("output-dir").unwrap());
    config.sync.output_format = matches.get_one::<String>("format").unwrap().parse()?;
    if let Some(language) = matches.get_one::<String>("language") {
        config.transcription.language_code = Some(language.clone());
    }
    if let Some(diarize) = matches.get_one::<bool>("diarize") {
        config.transcription.diarize = *diarize;
    }

    config.validate()?;

    if matches.get_flag("serve") {
        let port: u16 = matches.get_one::<String>("port").unwrap().parse()?;
        return serve(config, port).await;
    }

    let format = config.sync.output_format;
    let client = TranscriptionClient::new(config.api.clone())?;
    let batch = BatchSync::new(client, config.transcription.clone());

    if let Some(input) = matches.get_one::<String>("input") {
        let input = PathBuf::from(input);
        match batch
            .transcribe_single(&input, &config.sync.transcripts_dir, format)
            .await
        {
            Ok(output) => info!("🎉 Done: {}", output.display()),
            Err(e) => {
                error!("❌ Transcription failed: {}", e);
                return Err(e.into());
            }
        }
        return Ok(());
    }

    info!("🚀 Starting batch transcription sync...");
    let start_time = std::time::Instant::now();
    let report = batch
        .run(&config.sync.media_dir, &config.sync.transcripts_dir, format)
        .await?;
    let duration = start_time.elapsed();

    info!("🎉 Sync completed in {:.2}s", duration.as_secs_f64());
    info!("✅ Successful: {}", report.successful);
    info!("❌ Failed: {}", report.failed);
    if report.successful > 0 {
        info!("📂 Transcripts saved in: {}", config.sync.transcripts_dir.display());
    }

    Ok(())
}

#[cfg(feature = "api")]
async fn serve(config: Config, port: u16) -> Result<()> {
    use std::sync::Arc;

    scribe_sync::ApiServer::new(Arc::new(config), port).start().await
}

#[cfg(not(feature = "api"))]
async fn serve(_config: Config, _port: u16) -> Result<()> {
    anyhow::bail!("HTTP server support is not compiled in; rebuild with --features api")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diarize_flag_parses_as_bool() {
        let matches = cli()
            .try_get_matches_from(["scribe-sync", "--diarize", "false"])
            .unwrap();
        assert_eq!(matches.get_one::<bool>("diarize"), Some(&false));

        let matches = cli().try_get_matches_from(["scribe-sync"]).unwrap();
        assert!(matches.get_one::<bool>("diarize").is_none());

        assert!(cli()
            .try_get_matches_from(["scribe-sync", "--diarize", "maybe"])
            .is_err());
    }

    #[test]
    fn test_default_directories_and_format() {
        let matches = cli().try_get_matches_from(["scribe-sync"]).unwrap();
        assert_eq!(matches.get_one::<String>("media-dir").unwrap(), "files");
        assert_eq!(matches.get_one::<String>("output-dir").unwrap(), "transcripts");
        assert_eq!(matches.get_one::<String>("format").unwrap(), "json");
    }
}
